//! OpenAI Chat Completions dialect.
//!
//! This module also carries the shared wire types for the OpenAI-compatible
//! dialects (DeepSeek, Moonshot, Qwen, Zhipu), which differ only in hosts,
//! capabilities, and a few vendor fields that ride in `rest`.

use amux_core::strng;
use amux_core::strng::Strng;
use bytes::Bytes;
use serde_json::{Map, Value, json};

use crate::llm::ir::{
	ChatRequest, ChatResponse, Choice, ContentPart, ErrorKind, FinishReason, GenerationParams,
	MediaSource, Message, MessageContent, Reasoning, ResponseFormat, ResponseMessage, Role,
	StreamEvent, ToolCall, ToolChoice, ToolDef, Usage, WireError,
};
use crate::llm::{AdapterError, StreamBuilderState, StreamParserState};
use crate::parse::sse::SseFrame;

pub const NAME: Strng = strng::literal!("openai");
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_CHAT_PATH: &str = "/v1/chat/completions";

pub fn parse_request(bytes: &Bytes) -> Result<ChatRequest, AdapterError> {
	let raw: Value = serde_json::from_slice(bytes).map_err(AdapterError::RequestParsing)?;
	let wire: types::Request =
		serde_json::from_value(raw.clone()).map_err(AdapterError::RequestParsing)?;

	let mut system: Option<String> = None;
	let mut messages = Vec::with_capacity(wire.messages.len());
	for m in &wire.messages {
		// Leading system/developer messages lift into IR.system; multiple are
		// newline-joined.
		if (m.role == "system" || m.role == "developer") && messages.is_empty() {
			if let Some(text) = m.content.as_ref().map(content_text) {
				match system.as_mut() {
					Some(s) => {
						s.push('\n');
						s.push_str(&text);
					},
					None => system = Some(text),
				}
				continue;
			}
		}
		messages.push(parse_message(m));
	}

	let tools = wire
		.tools
		.iter()
		.flatten()
		.map(|t| ToolDef {
			name: t.function.name.clone(),
			description: t.function.description.clone(),
			parameters: t.function.parameters.clone().unwrap_or_else(|| json!({})),
		})
		.collect();

	let tool_choice = wire.tool_choice.as_ref().map(parse_tool_choice);

	let reasoning = parse_reasoning(&wire);
	let generation = GenerationParams {
		temperature: wire.temperature,
		top_p: wire.top_p,
		max_tokens: wire.max_completion_tokens.or(wire.max_tokens),
		stop: match &wire.stop {
			Some(types::Stop::String(s)) => vec![s.clone()],
			Some(types::Stop::StringArray(v)) => v.clone(),
			None => vec![],
		},
		presence_penalty: wire.presence_penalty,
		frequency_penalty: wire.frequency_penalty,
		seed: wire.seed,
		response_format: wire.response_format.as_ref().map(parse_response_format),
		reasoning,
		web_search: wire.web_search_options.is_some(),
	};

	Ok(ChatRequest {
		model: wire.model.unwrap_or_default(),
		messages,
		system,
		tools,
		tool_choice,
		stream: wire.stream.unwrap_or(false),
		generation,
		extensions: wire.rest,
		raw: Some(raw),
	})
}

pub fn build_request(req: &ChatRequest) -> Result<Vec<u8>, AdapterError> {
	if req.model.is_empty() {
		return Err(AdapterError::MissingModel);
	}
	let mut messages = Vec::with_capacity(req.messages.len() + 1);
	if let Some(system) = &req.system {
		messages.push(types::RequestMessage {
			role: "system".to_string(),
			content: Some(types::RequestContent::Text(system.clone())),
			..Default::default()
		});
	}
	for m in &req.messages {
		messages.extend(build_message(m));
	}

	let tools = if req.tools.is_empty() {
		None
	} else {
		Some(
			req
				.tools
				.iter()
				.map(|t| types::Tool {
					r#type: "function".to_string(),
					function: types::FunctionDef {
						name: t.name.clone(),
						description: t.description.clone(),
						parameters: Some(t.parameters.clone()),
					},
				})
				.collect(),
		)
	};

	let g = &req.generation;
	let wire = types::Request {
		model: Some(req.model.clone()),
		messages,
		temperature: g.temperature,
		top_p: g.top_p,
		// max_tokens is the form every compatible vendor accepts
		max_tokens: g.max_tokens,
		max_completion_tokens: None,
		stop: match g.stop.len() {
			0 => None,
			1 => Some(types::Stop::String(g.stop[0].clone())),
			_ => Some(types::Stop::StringArray(g.stop.clone())),
		},
		presence_penalty: g.presence_penalty,
		frequency_penalty: g.frequency_penalty,
		seed: g.seed,
		stream: if req.stream { Some(true) } else { None },
		stream_options: if req.stream {
			// Always request usage so the sinks get token counts
			Some(types::StreamOptions {
				include_usage: Some(true),
				include_obfuscation: None,
			})
		} else {
			None
		},
		tools,
		tool_choice: req.tool_choice.as_ref().map(build_tool_choice),
		response_format: g.response_format.as_ref().map(build_response_format),
		reasoning_effort: g
			.reasoning
			.as_ref()
			.filter(|r| r.enabled)
			.and_then(|r| r.effort.clone()),
		web_search_options: if g.web_search { Some(json!({})) } else { None },
		rest: req.extensions.clone(),
	};
	serde_json::to_vec(&wire).map_err(AdapterError::RequestMarshal)
}

pub fn parse_response(bytes: &Bytes) -> Result<ChatResponse, AdapterError> {
	let wire: types::Response =
		serde_json::from_slice(bytes).map_err(AdapterError::ResponseParsing)?;
	Ok(ChatResponse {
		id: wire.id.unwrap_or_default(),
		model: wire.model.unwrap_or_default(),
		created: wire.created.unwrap_or_default(),
		choices: wire
			.choices
			.iter()
			.map(|c| Choice {
				index: c.index,
				message: ResponseMessage {
					content: c.message.content.clone(),
					reasoning_content: c.message.reasoning_content.clone(),
					tool_calls: c
						.message
						.tool_calls
						.iter()
						.flatten()
						.map(parse_tool_call)
						.collect(),
				},
				finish_reason: c.finish_reason.as_deref().map(finish_reason_from_str),
			})
			.collect(),
		usage: wire.usage.as_ref().map(usage_from_wire),
		system_fingerprint: wire.system_fingerprint,
	})
}

pub fn build_response(resp: &ChatResponse) -> Result<Vec<u8>, AdapterError> {
	let wire = types::Response {
		id: Some(resp.id.clone()),
		object: Some("chat.completion".to_string()),
		created: Some(resp.created),
		model: Some(resp.model.clone()),
		choices: resp
			.choices
			.iter()
			.map(|c| types::ChatChoice {
				index: c.index,
				message: types::ChatResponseMessage {
					role: Some("assistant".to_string()),
					content: c.message.content.clone(),
					reasoning_content: c.message.reasoning_content.clone(),
					tool_calls: if c.message.tool_calls.is_empty() {
						None
					} else {
						Some(c.message.tool_calls.iter().map(build_tool_call).collect())
					},
				},
				finish_reason: c.finish_reason.map(|f| finish_reason_to_str(f).to_string()),
			})
			.collect(),
		usage: resp.usage.as_ref().map(usage_to_wire),
		system_fingerprint: resp.system_fingerprint.clone(),
		rest: Map::new(),
	};
	serde_json::to_vec(&wire).map_err(AdapterError::ResponseMarshal)
}

/// Map upstream error bodies into the canonical taxonomy. Never fails: an
/// unparseable body becomes an `Unknown` error carrying it verbatim.
pub fn parse_error(bytes: &Bytes) -> WireError {
	match serde_json::from_slice::<types::ErrorResponse>(bytes) {
		Ok(e) => {
			let code = e.error.code.as_ref().and_then(|c| match c {
				Value::String(s) => Some(s.clone()),
				Value::Number(n) => Some(n.to_string()),
				_ => None,
			});
			WireError {
				kind: ErrorKind::classify(code.as_deref(), e.error.r#type.as_deref()),
				message: e.error.message,
				code,
			}
		},
		Err(_) => WireError::unknown(String::from_utf8_lossy(bytes)),
	}
}

/// The single usage-conversion utility for this dialect.
pub fn usage_from_wire(u: &types::Usage) -> Usage {
	Usage {
		prompt_tokens: u.prompt_tokens as u64,
		completion_tokens: u.completion_tokens as u64,
		total_tokens: u.total_tokens as u64,
	}
}

fn usage_to_wire(u: &Usage) -> types::Usage {
	types::Usage {
		prompt_tokens: u.prompt_tokens as u32,
		completion_tokens: u.completion_tokens as u32,
		total_tokens: u.total_tokens as u32,
		prompt_tokens_details: None,
		completion_tokens_details: None,
	}
}

pub fn finish_reason_from_str(s: &str) -> FinishReason {
	match s {
		"length" => FinishReason::Length,
		"tool_calls" | "function_call" => FinishReason::ToolCalls,
		"content_filter" => FinishReason::ContentFilter,
		// Unknown reasons collapse to stop
		_ => FinishReason::Stop,
	}
}

pub fn finish_reason_to_str(f: FinishReason) -> &'static str {
	match f {
		FinishReason::Stop => "stop",
		FinishReason::Length => "length",
		FinishReason::ToolCalls => "tool_calls",
		FinishReason::ContentFilter => "content_filter",
	}
}

fn parse_message(m: &types::RequestMessage) -> Message {
	let role = match m.role.as_str() {
		"assistant" => Role::Assistant,
		"tool" | "function" => Role::Tool,
		"system" | "developer" => Role::System,
		_ => Role::User,
	};
	// Tool responses carry their call id as a dedicated field
	if role == Role::Tool {
		let content = m
			.content
			.as_ref()
			.map(content_text)
			.unwrap_or_default();
		return Message {
			role,
			content: MessageContent::Parts(vec![ContentPart::ToolResult {
				tool_use_id: m.tool_call_id.clone().unwrap_or_default(),
				content,
				is_error: false,
			}]),
		};
	}
	let mut parts: Vec<ContentPart> = Vec::new();
	match &m.content {
		Some(types::RequestContent::Text(t)) => {
			if m.tool_calls.is_none() {
				return Message {
					role,
					content: MessageContent::Text(t.clone()),
				};
			}
			parts.push(ContentPart::Text { text: t.clone() });
		},
		Some(types::RequestContent::Parts(ps)) => {
			for p in ps {
				parts.push(parse_content_part(p));
			}
		},
		None => {},
	}
	for tc in m.tool_calls.iter().flatten() {
		let call = parse_tool_call(tc);
		parts.push(ContentPart::ToolUse {
			id: call.id,
			name: call.name,
			input: serde_json::from_str(&call.arguments).unwrap_or(Value::Null),
		});
	}
	Message {
		role,
		content: MessageContent::Parts(parts),
	}
}

fn parse_content_part(p: &types::ContentPart) -> ContentPart {
	match p.r#type.as_str() {
		"image_url" => {
			if let Some(img) = &p.image_url {
				return ContentPart::Image {
					source: MediaSource::from_url(&img.url),
				};
			}
		},
		"input_audio" => {
			if let Some(audio) = &p.input_audio {
				let data = audio
					.get("data")
					.and_then(Value::as_str)
					.unwrap_or_default();
				let format = audio
					.get("format")
					.and_then(Value::as_str)
					.unwrap_or("wav");
				return ContentPart::Audio {
					source: MediaSource::Base64 {
						media_type: format!("audio/{format}"),
						data: data.to_string(),
					},
				};
			}
		},
		"video_url" => {
			if let Some(v) = &p.video_url
				&& let Some(url) = v.get("url").and_then(Value::as_str)
			{
				return ContentPart::Video {
					source: MediaSource::from_url(url),
				};
			}
		},
		_ => {},
	}
	ContentPart::Text {
		text: p.text.clone().unwrap_or_default(),
	}
}

/// One IR message can fan out to several wire messages (tool results become
/// standalone `tool` role messages in this dialect).
fn build_message(m: &Message) -> Vec<types::RequestMessage> {
	let role = m.role.as_str().to_string();
	match &m.content {
		MessageContent::Text(t) => vec![types::RequestMessage {
			role,
			content: Some(types::RequestContent::Text(t.clone())),
			..Default::default()
		}],
		MessageContent::Parts(parts) => {
			let mut out = Vec::new();
			let mut wire_parts: Vec<types::ContentPart> = Vec::new();
			let mut tool_calls: Vec<types::ToolCall> = Vec::new();
			for p in parts {
				match p {
					ContentPart::Text { text } => wire_parts.push(types::ContentPart {
						r#type: "text".to_string(),
						text: Some(text.clone()),
						..Default::default()
					}),
					ContentPart::Image { source } => wire_parts.push(types::ContentPart {
						r#type: "image_url".to_string(),
						image_url: Some(types::ImageUrl {
							url: source.to_url(),
						}),
						..Default::default()
					}),
					// Audio/video have no portable form here; degrade to text
					ContentPart::Audio { source } | ContentPart::Video { source } => {
						wire_parts.push(types::ContentPart {
							r#type: "text".to_string(),
							text: Some(source.to_url()),
							..Default::default()
						})
					},
					ContentPart::ToolUse { id, name, input } => tool_calls.push(types::ToolCall {
						index: None,
						id: Some(id.clone()),
						r#type: Some("function".to_string()),
						function: types::FunctionCall {
							name: Some(name.clone()),
							arguments: Some(input.to_string()),
						},
					}),
					ContentPart::ToolResult {
						tool_use_id,
						content,
						..
					} => out.push(types::RequestMessage {
						role: "tool".to_string(),
						content: Some(types::RequestContent::Text(content.clone())),
						tool_call_id: Some(tool_use_id.clone()),
						..Default::default()
					}),
				}
			}
			if !wire_parts.is_empty() || !tool_calls.is_empty() {
				let content = match wire_parts.len() {
					0 => None,
					1 if wire_parts[0].r#type == "text" => Some(types::RequestContent::Text(
						wire_parts[0].text.clone().unwrap_or_default(),
					)),
					_ => Some(types::RequestContent::Parts(wire_parts)),
				};
				out.insert(
					0,
					types::RequestMessage {
						role,
						content,
						tool_calls: if tool_calls.is_empty() {
							None
						} else {
							Some(tool_calls)
						},
						..Default::default()
					},
				);
			}
			out
		},
	}
}

fn parse_tool_choice(tc: &types::ToolChoiceOption) -> ToolChoice {
	match tc {
		types::ToolChoiceOption::Mode(m) => match m.as_str() {
			"none" => ToolChoice::None,
			"required" => ToolChoice::Required,
			_ => ToolChoice::Auto,
		},
		types::ToolChoiceOption::Named { function, .. } => ToolChoice::Function {
			name: function.name.clone().unwrap_or_default(),
		},
	}
}

fn build_tool_choice(tc: &ToolChoice) -> types::ToolChoiceOption {
	match tc {
		ToolChoice::Auto => types::ToolChoiceOption::Mode("auto".to_string()),
		ToolChoice::None => types::ToolChoiceOption::Mode("none".to_string()),
		ToolChoice::Required => types::ToolChoiceOption::Mode("required".to_string()),
		ToolChoice::Function { name } => types::ToolChoiceOption::Named {
			r#type: "function".to_string(),
			function: types::FunctionCall {
				name: Some(name.clone()),
				arguments: None,
			},
		},
	}
}

fn parse_response_format(rf: &types::ResponseFormatWire) -> ResponseFormat {
	match rf.r#type.as_str() {
		"json_object" => ResponseFormat::JsonObject,
		"json_schema" => ResponseFormat::JsonSchema {
			schema: rf.json_schema.clone().unwrap_or(Value::Null),
		},
		_ => ResponseFormat::Text,
	}
}

fn build_response_format(rf: &ResponseFormat) -> types::ResponseFormatWire {
	match rf {
		ResponseFormat::Text => types::ResponseFormatWire {
			r#type: "text".to_string(),
			json_schema: None,
		},
		ResponseFormat::JsonObject => types::ResponseFormatWire {
			r#type: "json_object".to_string(),
			json_schema: None,
		},
		ResponseFormat::JsonSchema { schema } => types::ResponseFormatWire {
			r#type: "json_schema".to_string(),
			json_schema: Some(schema.clone()),
		},
	}
}

fn parse_reasoning(wire: &types::Request) -> Option<Reasoning> {
	if let Some(effort) = &wire.reasoning_effort {
		return Some(Reasoning {
			enabled: effort != "none",
			budget_tokens: None,
			effort: Some(effort.clone()),
		});
	}
	// Qwen-style switch rides in the extension map
	if let Some(Value::Bool(enabled)) = wire.rest.get("enable_thinking") {
		return Some(Reasoning {
			enabled: *enabled,
			budget_tokens: wire
				.rest
				.get("thinking_budget")
				.and_then(Value::as_u64),
			effort: None,
		});
	}
	None
}

fn parse_tool_call(tc: &types::ToolCall) -> ToolCall {
	ToolCall {
		id: tc.id.clone().unwrap_or_default(),
		name: tc.function.name.clone().unwrap_or_default(),
		arguments: tc.function.arguments.clone().unwrap_or_default(),
	}
}

fn build_tool_call(tc: &ToolCall) -> types::ToolCall {
	types::ToolCall {
		index: None,
		id: Some(tc.id.clone()),
		r#type: Some("function".to_string()),
		function: types::FunctionCall {
			name: Some(tc.name.clone()),
			arguments: Some(tc.arguments.clone()),
		},
	}
}

fn content_text(c: &types::RequestContent) -> String {
	match c {
		types::RequestContent::Text(t) => t.clone(),
		types::RequestContent::Parts(ps) => ps
			.iter()
			.filter_map(|p| p.text.as_deref())
			.collect::<Vec<_>>()
			.join("\n"),
	}
}

/// Incremental parse of `chat.completion.chunk` frames into IR events.
///
/// The terminal `End` is held back until the upstream's `[DONE]` (or EOF)
/// because a usage-only chunk may trail the finish-reason chunk.
#[derive(Default)]
pub struct StreamParser {
	started: bool,
	ended: bool,
	finish_reason: Option<FinishReason>,
	usage: Option<Usage>,
}

impl StreamParserState for StreamParser {
	fn parse(&mut self, frame: &SseFrame) -> Result<Vec<StreamEvent>, AdapterError> {
		if frame.is_done_marker() {
			return Ok(self.end_events());
		}
		let chunk: types::StreamResponse =
			serde_json::from_str(&frame.data).map_err(AdapterError::StreamParsing)?;
		let mut events = Vec::new();
		if !self.started {
			self.started = true;
			events.push(StreamEvent::Start {
				id: chunk.id.clone().unwrap_or_default(),
				model: chunk.model.clone().unwrap_or_default(),
			});
		}
		for choice in &chunk.choices {
			if let Some(delta) = &choice.delta.content
				&& !delta.is_empty()
			{
				events.push(StreamEvent::Content {
					index: choice.index,
					delta: delta.clone(),
				});
			}
			if let Some(delta) = &choice.delta.reasoning_content
				&& !delta.is_empty()
			{
				events.push(StreamEvent::Reasoning {
					delta: delta.clone(),
				});
			}
			for (pos, tc) in choice.delta.tool_calls.iter().flatten().enumerate() {
				events.push(StreamEvent::ToolCall {
					index: tc.index.unwrap_or(pos as u32),
					id: tc.id.clone(),
					name: tc.function.name.clone(),
					arguments_delta: tc.function.arguments.clone(),
				});
			}
			if let Some(f) = &choice.finish_reason {
				self.finish_reason = Some(finish_reason_from_str(f));
			}
		}
		if let Some(u) = &chunk.usage {
			self.usage = Some(usage_from_wire(u));
		}
		Ok(events)
	}

	fn finish(&mut self) -> Vec<StreamEvent> {
		self.end_events()
	}
}

impl StreamParser {
	fn end_events(&mut self) -> Vec<StreamEvent> {
		if self.ended || !self.started {
			return vec![];
		}
		self.ended = true;
		vec![StreamEvent::End {
			finish_reason: self.finish_reason,
			usage: self.usage,
		}]
	}
}

/// Build `chat.completion.chunk` frames from IR events, ending with the
/// dialect's `[DONE]` terminator.
pub struct StreamBuilder {
	id: String,
	model: String,
	created: i64,
}

impl StreamBuilder {
	pub fn new() -> StreamBuilder {
		StreamBuilder {
			id: String::new(),
			model: String::new(),
			created: chrono::Utc::now().timestamp(),
		}
	}

	fn chunk(&self, choices: Vec<types::StreamChoice>, usage: Option<types::Usage>) -> SseFrame {
		let chunk = types::StreamResponse {
			id: Some(self.id.clone()),
			object: Some("chat.completion.chunk".to_string()),
			created: Some(self.created),
			model: Some(self.model.clone()),
			choices,
			usage,
		};
		SseFrame::data(serde_json::to_string(&chunk).expect("chunk serialization cannot fail"))
	}

	fn delta_chunk(&self, delta: types::Delta) -> SseFrame {
		self.chunk(
			vec![types::StreamChoice {
				index: 0,
				delta,
				finish_reason: None,
			}],
			None,
		)
	}
}

impl Default for StreamBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl StreamBuilderState for StreamBuilder {
	fn push(&mut self, event: &StreamEvent) -> Vec<SseFrame> {
		match event {
			StreamEvent::Start { id, model } => {
				self.id = id.clone();
				self.model = model.clone();
				vec![self.delta_chunk(types::Delta {
					role: Some("assistant".to_string()),
					..Default::default()
				})]
			},
			StreamEvent::Content { index, delta } => {
				vec![self.chunk(
					vec![types::StreamChoice {
						index: *index,
						delta: types::Delta {
							content: Some(delta.clone()),
							..Default::default()
						},
						finish_reason: None,
					}],
					None,
				)]
			},
			StreamEvent::Reasoning { delta } => {
				vec![self.delta_chunk(types::Delta {
					reasoning_content: Some(delta.clone()),
					..Default::default()
				})]
			},
			StreamEvent::ToolCall {
				index,
				id,
				name,
				arguments_delta,
			} => {
				vec![self.delta_chunk(types::Delta {
					tool_calls: Some(vec![types::ToolCall {
						index: Some(*index),
						id: id.clone(),
						r#type: Some("function".to_string()),
						function: types::FunctionCall {
							name: name.clone(),
							arguments: arguments_delta.clone(),
						},
					}]),
					..Default::default()
				})]
			},
			StreamEvent::End {
				finish_reason,
				usage,
			} => {
				vec![self.chunk(
					vec![types::StreamChoice {
						index: 0,
						delta: types::Delta::default(),
						finish_reason: Some(
							finish_reason_to_str(finish_reason.unwrap_or(FinishReason::Stop)).to_string(),
						),
					}],
					usage.as_ref().map(usage_to_wire),
				)]
			},
			// Error frames are written by the route layer in envelope form
			StreamEvent::Error { .. } => vec![],
		}
	}

	fn finish(&mut self) -> Vec<SseFrame> {
		vec![SseFrame::data("[DONE]")]
	}
}

pub mod types {
	// The canonical scalar shapes come straight from async-openai; the
	// request/message envelope stays hand-rolled because the gateway must
	// round-trip vendor fields (reasoning_content, enable_thinking, ...)
	// that the upstream crate's closed structs drop.
	pub use async_openai::types::chat::ChatCompletionStreamOptions as StreamOptions;
	pub use async_openai::types::chat::CompletionUsage as Usage;
	pub use async_openai::types::chat::StopConfiguration as Stop;
	use serde::{Deserialize, Serialize};
	use serde_json::{Map, Value};

	fn is_empty(m: &Map<String, Value>) -> bool {
		m.is_empty()
	}

	#[derive(Debug, Clone, Default, Serialize, Deserialize)]
	pub struct Request {
		#[serde(skip_serializing_if = "Option::is_none")]
		pub model: Option<String>,
		pub messages: Vec<RequestMessage>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub temperature: Option<f64>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub top_p: Option<f64>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub max_tokens: Option<u64>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub max_completion_tokens: Option<u64>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub stop: Option<Stop>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub presence_penalty: Option<f64>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub frequency_penalty: Option<f64>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub seed: Option<i64>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub stream: Option<bool>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub stream_options: Option<StreamOptions>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub tools: Option<Vec<Tool>>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub tool_choice: Option<ToolChoiceOption>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub response_format: Option<ResponseFormatWire>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub reasoning_effort: Option<String>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub web_search_options: Option<Value>,
		#[serde(flatten, default, skip_serializing_if = "is_empty")]
		pub rest: Map<String, Value>,
	}

	#[derive(Debug, Clone, Default, Serialize, Deserialize)]
	pub struct RequestMessage {
		pub role: String,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub content: Option<RequestContent>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub name: Option<String>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub tool_calls: Option<Vec<ToolCall>>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub tool_call_id: Option<String>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub reasoning_content: Option<String>,
	}

	#[derive(Debug, Clone, Serialize, Deserialize)]
	#[serde(untagged)]
	pub enum RequestContent {
		Text(String),
		Parts(Vec<ContentPart>),
	}

	#[derive(Debug, Clone, Default, Serialize, Deserialize)]
	pub struct ContentPart {
		pub r#type: String,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub text: Option<String>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub image_url: Option<ImageUrl>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub input_audio: Option<Value>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub video_url: Option<Value>,
	}

	#[derive(Debug, Clone, Serialize, Deserialize)]
	pub struct ImageUrl {
		pub url: String,
	}

	#[derive(Debug, Clone, Serialize, Deserialize)]
	pub struct Tool {
		pub r#type: String,
		pub function: FunctionDef,
	}

	#[derive(Debug, Clone, Serialize, Deserialize)]
	pub struct FunctionDef {
		pub name: String,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub description: Option<String>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub parameters: Option<Value>,
	}

	#[derive(Debug, Clone, Serialize, Deserialize)]
	#[serde(untagged)]
	pub enum ToolChoiceOption {
		Mode(String),
		Named {
			r#type: String,
			function: FunctionCall,
		},
	}

	#[derive(Debug, Clone, Default, Serialize, Deserialize)]
	pub struct FunctionCall {
		#[serde(skip_serializing_if = "Option::is_none")]
		pub name: Option<String>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub arguments: Option<String>,
	}

	#[derive(Debug, Clone, Serialize, Deserialize)]
	pub struct ToolCall {
		#[serde(skip_serializing_if = "Option::is_none")]
		pub index: Option<u32>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub id: Option<String>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub r#type: Option<String>,
		pub function: FunctionCall,
	}

	#[derive(Debug, Clone, Serialize, Deserialize)]
	pub struct ResponseFormatWire {
		pub r#type: String,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub json_schema: Option<Value>,
	}

	#[derive(Debug, Clone, Default, Serialize, Deserialize)]
	pub struct Response {
		#[serde(skip_serializing_if = "Option::is_none")]
		pub id: Option<String>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub object: Option<String>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub created: Option<i64>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub model: Option<String>,
		#[serde(default)]
		pub choices: Vec<ChatChoice>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub usage: Option<Usage>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub system_fingerprint: Option<String>,
		#[serde(flatten, default, skip_serializing_if = "is_empty")]
		pub rest: Map<String, Value>,
	}

	#[derive(Debug, Clone, Serialize, Deserialize)]
	pub struct ChatChoice {
		pub index: u32,
		pub message: ChatResponseMessage,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub finish_reason: Option<String>,
	}

	#[derive(Debug, Clone, Default, Serialize, Deserialize)]
	pub struct ChatResponseMessage {
		#[serde(skip_serializing_if = "Option::is_none")]
		pub role: Option<String>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub content: Option<String>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub reasoning_content: Option<String>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub tool_calls: Option<Vec<ToolCall>>,
	}

	#[derive(Debug, Clone, Default, Serialize, Deserialize)]
	pub struct StreamResponse {
		#[serde(skip_serializing_if = "Option::is_none")]
		pub id: Option<String>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub object: Option<String>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub created: Option<i64>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub model: Option<String>,
		#[serde(default)]
		pub choices: Vec<StreamChoice>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub usage: Option<Usage>,
	}

	#[derive(Debug, Clone, Serialize, Deserialize)]
	pub struct StreamChoice {
		pub index: u32,
		pub delta: Delta,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub finish_reason: Option<String>,
	}

	#[derive(Debug, Clone, Default, Serialize, Deserialize)]
	pub struct Delta {
		#[serde(skip_serializing_if = "Option::is_none")]
		pub role: Option<String>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub content: Option<String>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub reasoning_content: Option<String>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub tool_calls: Option<Vec<ToolCall>>,
	}

	#[derive(Debug, Clone, Serialize, Deserialize)]
	pub struct ErrorResponse {
		pub error: ErrorBody,
	}

	#[derive(Debug, Clone, Serialize, Deserialize)]
	pub struct ErrorBody {
		pub message: String,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub r#type: Option<String>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub code: Option<Value>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub param: Option<Value>,
	}
}
