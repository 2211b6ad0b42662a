use bytes::Bytes;
use serde_json::{Value, json};

use super::*;
use crate::llm::ir::{
	ContentPart, ErrorKind, FinishReason, MediaSource, MessageContent, Role, StreamEvent, ToolChoice,
	Usage,
};
use crate::parse::sse::SseFrame;

fn parse(kind: AdapterKind, body: Value) -> ir::ChatRequest {
	kind
		.parse_request(&Bytes::from(serde_json::to_vec(&body).unwrap()))
		.expect("request should parse")
}

fn build_json(kind: AdapterKind, req: &ir::ChatRequest) -> Value {
	serde_json::from_slice(&kind.build_request(req).expect("request should build")).unwrap()
}

#[test]
fn openai_lifts_leading_system_messages() {
	let req = parse(
		AdapterKind::OpenAI,
		json!({
			"model": "gpt-4o",
			"messages": [
				{"role": "system", "content": "be brief"},
				{"role": "system", "content": "be kind"},
				{"role": "user", "content": "hi"}
			],
			"stream": true
		}),
	);
	assert_eq!(req.system.as_deref(), Some("be brief\nbe kind"));
	assert_eq!(req.messages.len(), 1);
	assert!(req.stream);
	assert_eq!(req.model, "gpt-4o");
}

#[test]
fn openai_round_trip_preserves_semantics() {
	let original = json!({
		"model": "gpt-4o",
		"messages": [
			{"role": "system", "content": "sys"},
			{"role": "user", "content": "question"}
		],
		"temperature": 0.5,
		"top_p": 0.9,
		"max_tokens": 256,
		"stop": ["END"],
		"seed": 7
	});
	let req = parse(AdapterKind::OpenAI, original);
	let rebuilt = build_json(AdapterKind::OpenAI, &req);
	assert_eq!(rebuilt["model"], "gpt-4o");
	assert_eq!(rebuilt["messages"][0]["role"], "system");
	assert_eq!(rebuilt["messages"][0]["content"], "sys");
	assert_eq!(rebuilt["messages"][1]["content"], "question");
	assert_eq!(rebuilt["temperature"], 0.5);
	assert_eq!(rebuilt["max_tokens"], 256);
	assert_eq!(rebuilt["stop"], "END");
	assert_eq!(rebuilt["seed"], 7);

	// Parsing the rebuilt request lands on the same IR
	let reparsed = parse(AdapterKind::OpenAI, rebuilt);
	assert_eq!(reparsed.system, req.system);
	assert_eq!(reparsed.model, req.model);
	assert_eq!(reparsed.generation.max_tokens, req.generation.max_tokens);
	assert_eq!(reparsed.generation.stop, req.generation.stop);
}

#[test]
fn openai_parses_data_url_images() {
	let req = parse(
		AdapterKind::OpenAI,
		json!({
			"model": "gpt-4o",
			"messages": [{
				"role": "user",
				"content": [
					{"type": "text", "text": "what is this"},
					{"type": "image_url", "image_url": {"url": "data:image/png;base64,aGk="}},
					{"type": "image_url", "image_url": {"url": "https://example.com/cat.jpg"}}
				]
			}]
		}),
	);
	let MessageContent::Parts(parts) = &req.messages[0].content else {
		panic!("expected parts");
	};
	assert!(matches!(
		&parts[1],
		ContentPart::Image { source: MediaSource::Base64 { media_type, data } }
			if media_type == "image/png" && data == "aGk="
	));
	assert!(matches!(
		&parts[2],
		ContentPart::Image { source: MediaSource::Url { url } }
			if url == "https://example.com/cat.jpg"
	));
}

#[test]
fn openai_tools_and_tool_choice() {
	let req = parse(
		AdapterKind::OpenAI,
		json!({
			"model": "gpt-4o",
			"messages": [{"role": "user", "content": "weather?"}],
			"tools": [{
				"type": "function",
				"function": {
					"name": "get_weather",
					"description": "look up weather",
					"parameters": {"type": "object", "properties": {"city": {"type": "string"}}}
				}
			}],
			"tool_choice": {"type": "function", "function": {"name": "get_weather"}}
		}),
	);
	assert_eq!(req.tools.len(), 1);
	assert_eq!(req.tools[0].name, "get_weather");
	assert_eq!(
		req.tool_choice,
		Some(ToolChoice::Function {
			name: "get_weather".to_string()
		})
	);

	// Cross-dialect: the same IR expressed as Anthropic
	let wire = build_json(AdapterKind::Anthropic, &req);
	assert_eq!(wire["tools"][0]["name"], "get_weather");
	assert_eq!(wire["tools"][0]["input_schema"]["type"], "object");
	assert_eq!(wire["tool_choice"]["type"], "tool");
	assert_eq!(wire["tool_choice"]["name"], "get_weather");
}

#[test]
fn anthropic_request_build_places_system_top_level() {
	let req = parse(
		AdapterKind::OpenAI,
		json!({
			"model": "claude-3-opus",
			"messages": [
				{"role": "system", "content": "sys"},
				{"role": "user", "content": "hi"}
			]
		}),
	);
	let wire = build_json(AdapterKind::Anthropic, &req);
	assert_eq!(wire["system"], "sys");
	// Anthropic requires max_tokens; the builder fills the default
	assert_eq!(wire["max_tokens"], 4096);
	assert_eq!(wire["messages"][0]["role"], "user");
	assert_eq!(wire["messages"][0]["content"], "hi");
	assert!(wire["messages"].as_array().unwrap().len() == 1);
}

#[test]
fn anthropic_round_trip_preserves_semantics() {
	let original = json!({
		"model": "claude-3-opus",
		"system": "be helpful",
		"messages": [
			{"role": "user", "content": "hi"},
			{"role": "assistant", "content": [{"type": "text", "text": "hello"}]}
		],
		"max_tokens": 512,
		"temperature": 0.2,
		"stream": true,
		"thinking": {"type": "enabled", "budget_tokens": 2048}
	});
	let req = parse(AdapterKind::Anthropic, original);
	assert_eq!(req.system.as_deref(), Some("be helpful"));
	assert!(req.stream);
	assert!(req.wants_reasoning());
	assert_eq!(
		req.generation.reasoning.as_ref().unwrap().budget_tokens,
		Some(2048)
	);

	let rebuilt = build_json(AdapterKind::Anthropic, &req);
	assert_eq!(rebuilt["system"], "be helpful");
	assert_eq!(rebuilt["max_tokens"], 512);
	assert_eq!(rebuilt["thinking"]["type"], "enabled");
	assert_eq!(rebuilt["thinking"]["budget_tokens"], 2048);
	assert_eq!(rebuilt["messages"][1]["role"], "assistant");
}

#[test]
fn anthropic_tool_result_messages_cross_to_openai() {
	let req = parse(
		AdapterKind::Anthropic,
		json!({
			"model": "claude-3-opus",
			"max_tokens": 100,
			"messages": [
				{"role": "user", "content": "weather in SF?"},
				{"role": "assistant", "content": [
					{"type": "tool_use", "id": "toolu_1", "name": "get_weather", "input": {"city": "SF"}}
				]},
				{"role": "user", "content": [
					{"type": "tool_result", "tool_use_id": "toolu_1", "content": "sunny"}
				]}
			]
		}),
	);
	let wire = build_json(AdapterKind::OpenAI, &req);
	let messages = wire["messages"].as_array().unwrap();
	assert_eq!(messages[1]["role"], "assistant");
	assert_eq!(
		messages[1]["tool_calls"][0]["function"]["name"],
		"get_weather"
	);
	assert_eq!(messages[2]["role"], "tool");
	assert_eq!(messages[2]["tool_call_id"], "toolu_1");
	assert_eq!(messages[2]["content"], "sunny");
}

#[test]
fn google_request_build_shape() {
	let req = parse(
		AdapterKind::OpenAI,
		json!({
			"model": "gemini-2.5-flash",
			"messages": [
				{"role": "system", "content": "short answers"},
				{"role": "user", "content": "hello"},
				{"role": "assistant", "content": "hi"}
			],
			"max_tokens": 128,
			"stop": ["DONE"]
		}),
	);
	let wire = build_json(AdapterKind::Google, &req);
	assert_eq!(wire["systemInstruction"]["parts"][0]["text"], "short answers");
	assert_eq!(wire["contents"][0]["role"], "user");
	assert_eq!(wire["contents"][1]["role"], "model");
	assert_eq!(wire["generationConfig"]["maxOutputTokens"], 128);
	assert_eq!(wire["generationConfig"]["stopSequences"][0], "DONE");
	// The model rides in the URL, never the google body
	assert!(wire.get("model").is_none());
}

#[test]
fn google_response_parses_to_ir() {
	let resp = AdapterKind::Google
		.parse_response(&Bytes::from(
			serde_json::to_vec(&json!({
				"candidates": [{
					"content": {"role": "model", "parts": [{"text": "bonjour"}]},
					"finishReason": "STOP",
					"index": 0
				}],
				"usageMetadata": {
					"promptTokenCount": 3,
					"candidatesTokenCount": 5,
					"totalTokenCount": 8
				},
				"modelVersion": "gemini-2.5-flash"
			}))
			.unwrap(),
		))
		.unwrap();
	assert_eq!(resp.choices[0].message.content.as_deref(), Some("bonjour"));
	assert_eq!(resp.choices[0].finish_reason, Some(FinishReason::Stop));
	assert_eq!(resp.usage, Some(Usage::new(3, 5)));
	assert_eq!(resp.model, "gemini-2.5-flash");
}

#[test]
fn responses_request_items_parse() {
	let req = parse(
		AdapterKind::OpenAIResponses,
		json!({
			"model": "gpt-5.2",
			"instructions": "be direct",
			"input": [
				{"type": "message", "role": "user", "content": "hi"},
				{"type": "function_call", "call_id": "call_1", "name": "lookup", "arguments": "{\"q\":1}"},
				{"type": "function_call_output", "call_id": "call_1", "output": "42"}
			],
			"max_output_tokens": 64,
			"reasoning": {"effort": "high"}
		}),
	);
	assert_eq!(req.system.as_deref(), Some("be direct"));
	assert_eq!(req.messages.len(), 3);
	assert!(req.wants_reasoning());
	assert_eq!(req.generation.max_tokens, Some(64));
	let MessageContent::Parts(parts) = &req.messages[1].content else {
		panic!("expected parts");
	};
	assert!(matches!(&parts[0], ContentPart::ToolUse { name, .. } if name == "lookup"));

	// Cross-dialect equivalence: parse what the builder emits
	let rebuilt = build_json(AdapterKind::OpenAIResponses, &req);
	let reparsed = parse(AdapterKind::OpenAIResponses, rebuilt);
	assert_eq!(reparsed.system, req.system);
	assert_eq!(reparsed.messages.len(), req.messages.len());
	assert_eq!(reparsed.generation.max_tokens, req.generation.max_tokens);
}

#[test]
fn finish_reasons_collapse_unknowns_to_stop() {
	assert_eq!(openai::finish_reason_from_str("length"), FinishReason::Length);
	assert_eq!(
		openai::finish_reason_from_str("content_filter"),
		FinishReason::ContentFilter
	);
	assert_eq!(
		openai::finish_reason_from_str("weird_new_reason"),
		FinishReason::Stop
	);
}

#[test]
fn error_parsing_maps_the_taxonomy() {
	let openai_err = AdapterKind::OpenAI.parse_error(&Bytes::from(
		serde_json::to_vec(&json!({
			"error": {"message": "slow down", "type": "rate_limit_error", "code": "rate_limit_exceeded"}
		}))
		.unwrap(),
	));
	assert_eq!(openai_err.kind, ErrorKind::RateLimit);
	assert_eq!(openai_err.message, "slow down");

	let anthropic_err = AdapterKind::Anthropic.parse_error(&Bytes::from(
		serde_json::to_vec(&json!({
			"type": "error",
			"error": {"type": "authentication_error", "message": "bad key"}
		}))
		.unwrap(),
	));
	assert_eq!(anthropic_err.kind, ErrorKind::Authentication);

	let google_err = AdapterKind::Google.parse_error(&Bytes::from(
		serde_json::to_vec(&json!({
			"error": {"code": 404, "message": "no such model", "status": "NOT_FOUND"}
		}))
		.unwrap(),
	));
	assert_eq!(google_err.kind, ErrorKind::NotFound);

	// Unparseable bodies never fail; they carry the body verbatim
	let raw = AdapterKind::OpenAI.parse_error(&Bytes::from("upstream exploded"));
	assert_eq!(raw.kind, ErrorKind::Unknown);
	assert_eq!(raw.message, "upstream exploded");
}

fn run_stream(kind: AdapterKind, frames: &[SseFrame]) -> Vec<StreamEvent> {
	let mut parser = kind.stream_parser();
	let mut events = Vec::new();
	for f in frames {
		events.extend(parser.parse(f).unwrap());
	}
	events.extend(parser.finish());
	events
}

fn assert_single_start_and_end(events: &[StreamEvent]) {
	let starts = events
		.iter()
		.filter(|e| matches!(e, StreamEvent::Start { .. }))
		.count();
	let ends = events
		.iter()
		.filter(|e| matches!(e, StreamEvent::End { .. }))
		.count();
	assert_eq!(starts, 1, "exactly one start: {events:?}");
	assert_eq!(ends, 1, "exactly one end: {events:?}");
	assert!(matches!(events.first(), Some(StreamEvent::Start { .. })));
	assert!(matches!(events.last(), Some(StreamEvent::End { .. })));
}

#[test]
fn openai_stream_parses_to_ir_events() {
	let frames = vec![
		SseFrame::data(
			json!({"id": "c1", "model": "gpt-4o", "choices": [{"index": 0, "delta": {"role": "assistant", "content": "He"}}]})
				.to_string(),
		),
		SseFrame::data(
			json!({"id": "c1", "choices": [{"index": 0, "delta": {"content": "llo"}}]}).to_string(),
		),
		SseFrame::data(
			json!({
				"id": "c1",
				"choices": [{"index": 0, "delta": {}, "finish_reason": "stop"}],
				"usage": {"prompt_tokens": 4, "completion_tokens": 2, "total_tokens": 6}
			})
			.to_string(),
		),
		SseFrame::data("[DONE]"),
	];
	let events = run_stream(AdapterKind::OpenAI, &frames);
	assert_single_start_and_end(&events);
	assert_eq!(
		events[0],
		StreamEvent::Start {
			id: "c1".to_string(),
			model: "gpt-4o".to_string()
		}
	);
	assert_eq!(
		events[1],
		StreamEvent::Content {
			index: 0,
			delta: "He".to_string()
		}
	);
	assert_eq!(
		events.last().unwrap(),
		&StreamEvent::End {
			finish_reason: Some(FinishReason::Stop),
			usage: Some(Usage::new(4, 2)),
		}
	);
}

#[test]
fn anthropic_stream_parses_to_ir_events() {
	let frames = vec![
		SseFrame::named(
			"message_start",
			json!({
				"type": "message_start",
				"message": {
					"id": "msg_1", "type": "message", "role": "assistant", "content": [],
					"model": "claude-3-opus", "stop_reason": null, "stop_sequence": null,
					"usage": {"input_tokens": 10, "output_tokens": 0}
				}
			})
			.to_string(),
		),
		SseFrame::named(
			"content_block_start",
			json!({"type": "content_block_start", "index": 0, "content_block": {"type": "text", "text": ""}})
				.to_string(),
		),
		SseFrame::named(
			"content_block_delta",
			json!({"type": "content_block_delta", "index": 0, "delta": {"type": "text_delta", "text": "Hi"}})
				.to_string(),
		),
		SseFrame::named(
			"content_block_stop",
			json!({"type": "content_block_stop", "index": 0}).to_string(),
		),
		SseFrame::named(
			"message_delta",
			json!({
				"type": "message_delta",
				"delta": {"stop_reason": "end_turn", "stop_sequence": null},
				"usage": {"output_tokens": 7}
			})
			.to_string(),
		),
		SseFrame::named("message_stop", json!({"type": "message_stop"}).to_string()),
	];
	let events = run_stream(AdapterKind::Anthropic, &frames);
	assert_single_start_and_end(&events);
	assert!(
		events
			.iter()
			.any(|e| matches!(e, StreamEvent::Content { delta, .. } if delta == "Hi"))
	);
	assert_eq!(
		events.last().unwrap(),
		&StreamEvent::End {
			finish_reason: Some(FinishReason::Stop),
			usage: Some(Usage::new(10, 7)),
		}
	);
}

#[test]
fn anthropic_tool_stream_produces_tool_events() {
	let frames = vec![
		SseFrame::named(
			"message_start",
			json!({
				"type": "message_start",
				"message": {
					"id": "msg_1", "type": "message", "role": "assistant", "content": [],
					"model": "claude-3-opus", "stop_reason": null, "stop_sequence": null,
					"usage": {"input_tokens": 1, "output_tokens": 0}
				}
			})
			.to_string(),
		),
		SseFrame::named(
			"content_block_start",
			json!({
				"type": "content_block_start", "index": 0,
				"content_block": {"type": "tool_use", "id": "toolu_1", "name": "get_weather", "input": {}}
			})
			.to_string(),
		),
		SseFrame::named(
			"content_block_delta",
			json!({
				"type": "content_block_delta", "index": 0,
				"delta": {"type": "input_json_delta", "partial_json": "{\"city\":"}
			})
			.to_string(),
		),
		SseFrame::named("message_stop", json!({"type": "message_stop"}).to_string()),
	];
	let events = run_stream(AdapterKind::Anthropic, &frames);
	assert!(matches!(
		&events[1],
		StreamEvent::ToolCall { index: 0, id: Some(id), name: Some(name), arguments_delta: None }
			if id == "toolu_1" && name == "get_weather"
	));
	assert!(matches!(
		&events[2],
		StreamEvent::ToolCall { index: 0, arguments_delta: Some(d), .. } if d == "{\"city\":"
	));
}

#[test]
fn google_stream_ends_at_eof_without_marker() {
	let frames = vec![
		SseFrame::data(
			json!({
				"candidates": [{"content": {"role": "model", "parts": [{"text": "Bon"}]}, "index": 0}],
				"modelVersion": "gemini-2.5-flash"
			})
			.to_string(),
		),
		SseFrame::data(
			json!({
				"candidates": [{"content": {"parts": [{"text": "jour"}]}, "finishReason": "STOP", "index": 0}],
				"usageMetadata": {"promptTokenCount": 2, "candidatesTokenCount": 3, "totalTokenCount": 5}
			})
			.to_string(),
		),
	];
	let events = run_stream(AdapterKind::Google, &frames);
	assert_single_start_and_end(&events);
	assert_eq!(
		events.last().unwrap(),
		&StreamEvent::End {
			finish_reason: Some(FinishReason::Stop),
			usage: Some(Usage::new(2, 3)),
		}
	);
}

#[test]
fn responses_stream_parses_named_events() {
	let frames = vec![
		SseFrame::named(
			"response.created",
			json!({"type": "response.created", "response": {"id": "resp_1", "model": "gpt-5.2"}})
				.to_string(),
		),
		SseFrame::named(
			"response.output_text.delta",
			json!({"type": "response.output_text.delta", "item_id": "msg_1", "delta": "Hey"}).to_string(),
		),
		SseFrame::named(
			"response.completed",
			json!({
				"type": "response.completed",
				"response": {"id": "resp_1", "status": "completed",
					"usage": {"input_tokens": 5, "output_tokens": 1, "total_tokens": 6}}
			})
			.to_string(),
		),
	];
	let events = run_stream(AdapterKind::OpenAIResponses, &frames);
	assert_single_start_and_end(&events);
	assert_eq!(
		events[1],
		StreamEvent::Content {
			index: 0,
			delta: "Hey".to_string()
		}
	);
}

fn push_all(builder: &mut Box<dyn StreamBuilderState + Send>, events: &[StreamEvent]) -> Vec<SseFrame> {
	let mut frames = Vec::new();
	for e in events {
		frames.extend(builder.push(e));
	}
	frames.extend(builder.finish());
	frames
}

fn simple_events() -> Vec<StreamEvent> {
	vec![
		StreamEvent::Start {
			id: "id1".to_string(),
			model: "m".to_string(),
		},
		StreamEvent::Content {
			index: 0,
			delta: "Hello".to_string(),
		},
		StreamEvent::End {
			finish_reason: Some(FinishReason::Stop),
			usage: Some(Usage::new(3, 4)),
		},
	]
}

#[test]
fn anthropic_builder_frames_message_lifecycle() {
	let mut builder = AdapterKind::Anthropic.stream_builder();
	let frames = push_all(&mut builder, &simple_events());
	let names: Vec<&str> = frames.iter().filter_map(|f| f.event.as_deref()).collect();
	assert_eq!(
		names,
		vec![
			"message_start",
			"ping",
			"content_block_start",
			"content_block_delta",
			"content_block_stop",
			"message_delta",
			"message_stop",
		]
	);
	// No [DONE] terminator in this dialect
	assert!(!frames.iter().any(|f| f.is_done_marker()));
	let delta: Value = serde_json::from_str(&frames[3].data).unwrap();
	assert_eq!(delta["delta"]["text"], "Hello");
	let usage: Value = serde_json::from_str(&frames[5].data).unwrap();
	assert_eq!(usage["usage"]["output_tokens"], 4);
}

#[test]
fn openai_builder_ends_with_done_marker() {
	let mut builder = AdapterKind::OpenAI.stream_builder();
	let frames = push_all(&mut builder, &simple_events());
	assert!(frames.iter().all(|f| f.event.is_none()));
	assert!(frames.last().unwrap().is_done_marker());
	let first: Value = serde_json::from_str(&frames[0].data).unwrap();
	assert_eq!(first["object"], "chat.completion.chunk");
	assert_eq!(first["choices"][0]["delta"]["role"], "assistant");
	let final_chunk: Value = serde_json::from_str(&frames[frames.len() - 2].data).unwrap();
	assert_eq!(final_chunk["choices"][0]["finish_reason"], "stop");
	assert_eq!(final_chunk["usage"]["total_tokens"], 7);
}

#[test]
fn google_builder_emits_bare_data_frames() {
	let mut builder = AdapterKind::Google.stream_builder();
	let frames = push_all(&mut builder, &simple_events());
	assert!(frames.iter().all(|f| f.event.is_none()));
	assert!(!frames.iter().any(|f| f.is_done_marker()));
	let last: Value = serde_json::from_str(&frames.last().unwrap().data).unwrap();
	assert_eq!(last["candidates"][0]["finishReason"], "STOP");
	assert_eq!(last["usageMetadata"]["totalTokenCount"], 7);
}

#[test]
fn responses_builder_emits_named_lifecycle() {
	let mut builder = AdapterKind::OpenAIResponses.stream_builder();
	let frames = push_all(&mut builder, &simple_events());
	let names: Vec<&str> = frames.iter().filter_map(|f| f.event.as_deref()).collect();
	assert_eq!(names[0], "response.created");
	assert!(names.contains(&"response.output_item.added"));
	assert!(names.contains(&"response.output_text.delta"));
	assert_eq!(*names.last().unwrap(), "response.completed");
	assert!(!frames.iter().any(|f| f.is_done_marker()));
}

#[test]
fn cross_dialect_stream_translation_end_to_end() {
	// Upstream OpenAI chunks re-framed for an Anthropic client
	let frames = vec![
		SseFrame::data(
			json!({"id": "c1", "model": "kimi-k2", "choices": [{"index": 0, "delta": {"content": "Hi"}}]})
				.to_string(),
		),
		SseFrame::data(
			json!({"id": "c1", "choices": [{"index": 0, "delta": {}, "finish_reason": "stop"}],
				"usage": {"prompt_tokens": 1, "completion_tokens": 2, "total_tokens": 3}})
			.to_string(),
		),
		SseFrame::data("[DONE]"),
	];
	let events = run_stream(AdapterKind::Moonshot, &frames);
	let mut builder = AdapterKind::Anthropic.stream_builder();
	let out = push_all(&mut builder, &events);
	assert_eq!(out.first().unwrap().event.as_deref(), Some("message_start"));
	assert_eq!(out.last().unwrap().event.as_deref(), Some("message_stop"));
}

#[test]
fn qwen_media_parts_parse_and_degrade() {
	let req = parse(
		AdapterKind::Qwen,
		json!({
			"model": "qwen3-omni",
			"messages": [{
				"role": "user",
				"content": [
					{"type": "text", "text": "transcribe"},
					{"type": "input_audio", "input_audio": {"data": "UklGRg==", "format": "wav"}},
					{"type": "video_url", "video_url": {"url": "https://example.com/clip.mp4"}}
				]
			}]
		}),
	);
	let MessageContent::Parts(parts) = &req.messages[0].content else {
		panic!("expected parts");
	};
	assert!(matches!(&parts[1], ContentPart::Audio { .. }));
	assert!(matches!(&parts[2], ContentPart::Video { .. }));

	// Audio/video cannot cross into Anthropic; they degrade to text
	let wire = build_json(AdapterKind::Anthropic, &req);
	let blocks = wire["messages"][0]["content"].as_array().unwrap();
	assert_eq!(blocks.len(), 3);
	assert_eq!(blocks[2]["type"], "text");
	assert_eq!(blocks[2]["text"], "https://example.com/clip.mp4");
}

#[test]
fn adapter_names_round_trip() {
	for kind in AdapterKind::ALL {
		assert_eq!(AdapterKind::from_name(&kind.name()), Some(kind));
	}
	assert_eq!(AdapterKind::from_name("openai-responses"), Some(AdapterKind::OpenAIResponses));
	assert_eq!(AdapterKind::from_name("nope"), None);
}

#[test]
fn sse_style_table() {
	assert_eq!(AdapterKind::Anthropic.sse_style(), SseStyle::NamedEvents);
	assert_eq!(AdapterKind::OpenAIResponses.sse_style(), SseStyle::NamedEvents);
	assert_eq!(AdapterKind::Google.sse_style(), SseStyle::DataOnly);
	for kind in [
		AdapterKind::OpenAI,
		AdapterKind::DeepSeek,
		AdapterKind::Moonshot,
		AdapterKind::Qwen,
		AdapterKind::Zhipu,
	] {
		assert_eq!(kind.sse_style(), SseStyle::DataWithDone);
	}
}

#[test]
fn deepseek_reasoning_stream_content() {
	let frames = vec![
		SseFrame::data(
			json!({"id": "c1", "model": "deepseek-reasoner",
				"choices": [{"index": 0, "delta": {"reasoning_content": "thinking..."}}]})
			.to_string(),
		),
		SseFrame::data(
			json!({"id": "c1", "choices": [{"index": 0, "delta": {"content": "42"}, "finish_reason": "stop"}]})
				.to_string(),
		),
		SseFrame::data("[DONE]"),
	];
	let events = run_stream(AdapterKind::DeepSeek, &frames);
	assert!(matches!(
		&events[1],
		StreamEvent::Reasoning { delta } if delta == "thinking..."
	));
	assert!(matches!(
		&events[2],
		StreamEvent::Content { delta, .. } if delta == "42"
	));
}
