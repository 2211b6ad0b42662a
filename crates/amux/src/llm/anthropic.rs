//! Anthropic Messages dialect.
//!
//! The system prompt is a top-level field, content is an array of typed
//! blocks, and streams are named `message_*` / `content_block_*` events with
//! no `[DONE]` terminator.

use std::collections::HashMap;

use amux_core::strng;
use amux_core::strng::Strng;
use bytes::Bytes;
use serde_json::{Map, Value, json};

use crate::llm::ir::{
	ChatRequest, ChatResponse, Choice, ContentPart, ErrorKind, FinishReason, GenerationParams,
	MediaSource, Message, MessageContent, Reasoning, ResponseMessage, Role, StreamEvent, ToolCall,
	ToolChoice, ToolDef, Usage, WireError,
};
use crate::llm::{AdapterError, StreamBuilderState, StreamParserState};
use crate::parse::sse::SseFrame;

pub const NAME: Strng = strng::literal!("anthropic");
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_CHAT_PATH: &str = "/v1/messages";

/// Anthropic requires max_tokens; used when the source dialect did not set
/// one.
const DEFAULT_MAX_TOKENS: u64 = 4096;

pub fn parse_request(bytes: &Bytes) -> Result<ChatRequest, AdapterError> {
	let raw: Value = serde_json::from_slice(bytes).map_err(AdapterError::RequestParsing)?;
	let wire: types::Request =
		serde_json::from_value(raw.clone()).map_err(AdapterError::RequestParsing)?;

	let system = wire.system.as_ref().map(|s| match s {
		types::SystemPrompt::Text(t) => t.clone(),
		types::SystemPrompt::Blocks(blocks) => blocks
			.iter()
			.map(|b| b.text.as_str())
			.collect::<Vec<_>>()
			.join("\n"),
	});

	let messages = wire.messages.iter().map(parse_message).collect();

	let tools = wire
		.tools
		.iter()
		.flatten()
		.map(|t| ToolDef {
			name: t.name.clone(),
			description: t.description.clone(),
			parameters: t.input_schema.clone(),
		})
		.collect();

	let tool_choice = wire.tool_choice.as_ref().map(|tc| match tc {
		types::ToolChoice::Auto => ToolChoice::Auto,
		types::ToolChoice::Any => ToolChoice::Required,
		types::ToolChoice::None => ToolChoice::None,
		types::ToolChoice::Tool { name } => ToolChoice::Function { name: name.clone() },
	});

	let reasoning = wire.thinking.as_ref().map(|t| match t {
		types::ThinkingInput::Enabled { budget_tokens } => Reasoning {
			enabled: true,
			budget_tokens: Some(*budget_tokens),
			effort: None,
		},
		types::ThinkingInput::Disabled {} => Reasoning::default(),
	});

	Ok(ChatRequest {
		model: wire.model.clone().unwrap_or_default(),
		messages,
		system,
		tools,
		tool_choice,
		stream: wire.stream.unwrap_or(false),
		generation: GenerationParams {
			temperature: wire.temperature,
			top_p: wire.top_p,
			max_tokens: wire.max_tokens,
			stop: wire.stop_sequences.clone().unwrap_or_default(),
			reasoning,
			..Default::default()
		},
		extensions: wire.rest,
		raw: Some(raw),
	})
}

pub fn build_request(req: &ChatRequest) -> Result<Vec<u8>, AdapterError> {
	if req.model.is_empty() {
		return Err(AdapterError::MissingModel);
	}
	let mut system = req.system.clone();
	let mut messages = Vec::with_capacity(req.messages.len());
	for m in &req.messages {
		// Non-leading system messages fold into the top-level field too
		if m.role == Role::System {
			let text = m.content.flatten_text();
			match system.as_mut() {
				Some(s) => {
					s.push('\n');
					s.push_str(&text);
				},
				None => system = Some(text),
			}
			continue;
		}
		messages.push(build_message(m));
	}

	let tools: Vec<types::Tool> = req
		.tools
		.iter()
		.map(|t| types::Tool {
			name: t.name.clone(),
			description: t.description.clone(),
			input_schema: t.parameters.clone(),
		})
		.collect();

	let thinking = req.generation.reasoning.as_ref().and_then(|r| {
		if !r.enabled {
			return None;
		}
		let budget = r.budget_tokens.unwrap_or(match r.effort.as_deref() {
			Some("medium") => 2048,
			Some("high") | Some("xhigh") => 4096,
			_ => 1024,
		});
		Some(types::ThinkingInput::Enabled {
			budget_tokens: budget,
		})
	});

	let wire = types::Request {
		model: Some(req.model.clone()),
		messages,
		system: system.map(types::SystemPrompt::Text),
		max_tokens: Some(req.generation.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)),
		stop_sequences: if req.generation.stop.is_empty() {
			None
		} else {
			Some(req.generation.stop.clone())
		},
		stream: if req.stream { Some(true) } else { None },
		temperature: req.generation.temperature,
		top_p: req.generation.top_p,
		tools: if tools.is_empty() { None } else { Some(tools) },
		tool_choice: req.tool_choice.as_ref().map(|tc| match tc {
			ToolChoice::Auto => types::ToolChoice::Auto,
			ToolChoice::Required => types::ToolChoice::Any,
			ToolChoice::None => types::ToolChoice::None,
			ToolChoice::Function { name } => types::ToolChoice::Tool { name: name.clone() },
		}),
		thinking,
		rest: Map::new(),
	};
	serde_json::to_vec(&wire).map_err(AdapterError::RequestMarshal)
}

pub fn parse_response(bytes: &Bytes) -> Result<ChatResponse, AdapterError> {
	let wire: types::MessagesResponse =
		serde_json::from_slice(bytes).map_err(AdapterError::ResponseParsing)?;
	let mut content: Option<String> = None;
	let mut reasoning_content: Option<String> = None;
	let mut tool_calls = Vec::new();
	for block in &wire.content {
		match block {
			types::ContentBlock::Text { text, .. } => match content.as_mut() {
				Some(c) => c.push_str(text),
				None => content = Some(text.clone()),
			},
			types::ContentBlock::Thinking { thinking, .. } => {
				reasoning_content = Some(thinking.clone());
			},
			types::ContentBlock::ToolUse { id, name, input, .. } => {
				tool_calls.push(ToolCall {
					id: id.clone(),
					name: name.clone(),
					arguments: input.to_string(),
				});
			},
			_ => {},
		}
	}
	Ok(ChatResponse {
		id: wire.id,
		model: wire.model,
		created: chrono::Utc::now().timestamp(),
		choices: vec![Choice {
			index: 0,
			message: ResponseMessage {
				content,
				reasoning_content,
				tool_calls,
			},
			finish_reason: wire.stop_reason.map(finish_from_stop_reason),
		}],
		usage: Some(usage_from_wire(&wire.usage)),
		system_fingerprint: None,
	})
}

pub fn build_response(resp: &ChatResponse) -> Result<Vec<u8>, AdapterError> {
	// Anthropic carries a single message; additional choices are dropped
	let choice = resp.choices.first();
	let mut content = Vec::new();
	if let Some(c) = choice {
		if let Some(thinking) = &c.message.reasoning_content {
			content.push(types::ContentBlock::Thinking {
				thinking: thinking.clone(),
				signature: String::new(),
			});
		}
		if let Some(text) = &c.message.content {
			content.push(types::ContentBlock::Text {
				text: text.clone(),
				citations: None,
			});
		}
		for tc in &c.message.tool_calls {
			content.push(types::ContentBlock::ToolUse {
				id: tc.id.clone(),
				name: tc.name.clone(),
				input: serde_json::from_str(&tc.arguments).unwrap_or(Value::Null),
			});
		}
	}
	let usage = resp.usage.unwrap_or_default();
	let wire = types::MessagesResponse {
		id: if resp.id.is_empty() {
			format!("msg_{}", uuid::Uuid::new_v4().simple())
		} else {
			resp.id.clone()
		},
		r#type: "message".to_string(),
		role: "assistant".to_string(),
		content,
		model: resp.model.clone(),
		stop_reason: choice
			.and_then(|c| c.finish_reason)
			.map(stop_reason_from_finish),
		stop_sequence: None,
		usage: usage_to_wire(&usage),
	};
	serde_json::to_vec(&wire).map_err(AdapterError::ResponseMarshal)
}

pub fn parse_error(bytes: &Bytes) -> WireError {
	match serde_json::from_slice::<types::MessagesErrorResponse>(bytes) {
		Ok(e) => WireError {
			kind: ErrorKind::classify(None, Some(e.error.r#type.as_str())),
			message: e.error.message,
			code: Some(e.error.r#type),
		},
		Err(_) => WireError::unknown(String::from_utf8_lossy(bytes)),
	}
}

pub fn usage_from_wire(u: &types::Usage) -> Usage {
	Usage::new(u.input_tokens, u.output_tokens)
}

fn usage_to_wire(u: &Usage) -> types::Usage {
	types::Usage {
		input_tokens: u.prompt_tokens,
		output_tokens: u.completion_tokens,
	}
}

pub fn finish_from_stop_reason(r: types::StopReason) -> FinishReason {
	match r {
		types::StopReason::EndTurn | types::StopReason::StopSequence => FinishReason::Stop,
		types::StopReason::MaxTokens => FinishReason::Length,
		types::StopReason::ToolUse => FinishReason::ToolCalls,
		types::StopReason::Refusal => FinishReason::ContentFilter,
		types::StopReason::Other => FinishReason::Stop,
	}
}

pub fn stop_reason_from_finish(f: FinishReason) -> types::StopReason {
	match f {
		FinishReason::Stop => types::StopReason::EndTurn,
		FinishReason::Length => types::StopReason::MaxTokens,
		FinishReason::ToolCalls => types::StopReason::ToolUse,
		FinishReason::ContentFilter => types::StopReason::Refusal,
	}
}

fn parse_message(m: &types::RequestMessage) -> Message {
	let role = match m.role.as_str() {
		"assistant" => Role::Assistant,
		_ => Role::User,
	};
	match &m.content {
		types::RequestContent::Text(t) => Message {
			role,
			content: MessageContent::Text(t.clone()),
		},
		types::RequestContent::Blocks(blocks) => {
			let parts = blocks
				.iter()
				.filter_map(|b| match b {
					types::ContentBlock::Text { text, .. } => Some(ContentPart::Text { text: text.clone() }),
					types::ContentBlock::Image { source } => Some(ContentPart::Image {
						source: parse_image_source(source),
					}),
					types::ContentBlock::ToolUse { id, name, input } => Some(ContentPart::ToolUse {
						id: id.clone(),
						name: name.clone(),
						input: input.clone(),
					}),
					types::ContentBlock::ToolResult {
						tool_use_id,
						content,
						is_error,
					} => Some(ContentPart::ToolResult {
						tool_use_id: tool_use_id.clone(),
						content: tool_result_text(content),
						is_error: is_error.unwrap_or(false),
					}),
					// Prior-turn thinking is not re-sent across dialects
					types::ContentBlock::Thinking { .. }
					| types::ContentBlock::RedactedThinking { .. }
					| types::ContentBlock::Unknown => None,
				})
				.collect();
			Message {
				role,
				content: MessageContent::Parts(parts),
			}
		},
	}
}

fn build_message(m: &Message) -> types::RequestMessage {
	let role = match m.role {
		Role::Assistant => "assistant",
		// Tool results travel as user messages in this dialect
		_ => "user",
	};
	let content = match &m.content {
		MessageContent::Text(t) => types::RequestContent::Text(t.clone()),
		MessageContent::Parts(parts) => {
			let blocks = parts
				.iter()
				.map(|p| match p {
					ContentPart::Text { text } => types::ContentBlock::Text {
						text: text.clone(),
						citations: None,
					},
					ContentPart::Image { source } => types::ContentBlock::Image {
						source: build_image_source(source),
					},
					// No audio/video blocks in this dialect; degrade to text
					ContentPart::Audio { source } | ContentPart::Video { source } => {
						types::ContentBlock::Text {
							text: source.to_url(),
							citations: None,
						}
					},
					ContentPart::ToolUse { id, name, input } => types::ContentBlock::ToolUse {
						id: id.clone(),
						name: name.clone(),
						input: input.clone(),
					},
					ContentPart::ToolResult {
						tool_use_id,
						content,
						is_error,
					} => types::ContentBlock::ToolResult {
						tool_use_id: tool_use_id.clone(),
						content: types::ToolResultContent::Text(content.clone()),
						is_error: if *is_error { Some(true) } else { None },
					},
				})
				.collect();
			types::RequestContent::Blocks(blocks)
		},
	};
	types::RequestMessage {
		role: role.to_string(),
		content,
	}
}

fn parse_image_source(source: &Value) -> MediaSource {
	let kind = source.get("type").and_then(Value::as_str).unwrap_or("");
	match kind {
		"base64" => MediaSource::Base64 {
			media_type: source
				.get("media_type")
				.and_then(Value::as_str)
				.unwrap_or("image/png")
				.to_string(),
			data: source
				.get("data")
				.and_then(Value::as_str)
				.unwrap_or_default()
				.to_string(),
		},
		_ => MediaSource::Url {
			url: source
				.get("url")
				.and_then(Value::as_str)
				.unwrap_or_default()
				.to_string(),
		},
	}
}

fn build_image_source(source: &MediaSource) -> Value {
	match source {
		MediaSource::Base64 { media_type, data } => json!({
			"type": "base64",
			"media_type": media_type,
			"data": data,
		}),
		MediaSource::Url { url } => json!({
			"type": "url",
			"url": url,
		}),
	}
}

fn tool_result_text(content: &types::ToolResultContent) -> String {
	match content {
		types::ToolResultContent::Text(t) => t.clone(),
		types::ToolResultContent::Blocks(parts) => parts
			.iter()
			.filter_map(|p| p.get("text").and_then(Value::as_str))
			.collect::<Vec<_>>()
			.join("\n"),
	}
}

/// Parse upstream `message_*` events into IR.
#[derive(Default)]
pub struct StreamParser {
	started: bool,
	ended: bool,
	input_tokens: u64,
	finish_reason: Option<FinishReason>,
	usage: Option<Usage>,
	/// Block index → tool ordinal for in-flight tool_use blocks.
	tool_blocks: HashMap<u32, u32>,
	tool_count: u32,
}

impl StreamParserState for StreamParser {
	fn parse(&mut self, frame: &SseFrame) -> Result<Vec<StreamEvent>, AdapterError> {
		let event: types::MessagesStreamEvent =
			serde_json::from_str(&frame.data).map_err(AdapterError::StreamParsing)?;
		let mut out = Vec::new();
		match event {
			types::MessagesStreamEvent::MessageStart { message } => {
				self.started = true;
				self.input_tokens = message.usage.input_tokens;
				out.push(StreamEvent::Start {
					id: message.id,
					model: message.model,
				});
			},
			types::MessagesStreamEvent::ContentBlockStart {
				index,
				content_block,
			} => match content_block {
				types::ContentBlock::ToolUse { id, name, .. } => {
					let ordinal = self.tool_count;
					self.tool_count += 1;
					self.tool_blocks.insert(index, ordinal);
					out.push(StreamEvent::ToolCall {
						index: ordinal,
						id: Some(id),
						name: Some(name),
						arguments_delta: None,
					});
				},
				_ => {},
			},
			types::MessagesStreamEvent::ContentBlockDelta { index, delta } => match delta {
				types::ContentBlockDelta::TextDelta { text } => {
					out.push(StreamEvent::Content {
						index: 0,
						delta: text,
					});
				},
				types::ContentBlockDelta::ThinkingDelta { thinking } => {
					out.push(StreamEvent::Reasoning { delta: thinking });
				},
				types::ContentBlockDelta::InputJsonDelta { partial_json } => {
					if let Some(ordinal) = self.tool_blocks.get(&index) {
						out.push(StreamEvent::ToolCall {
							index: *ordinal,
							id: None,
							name: None,
							arguments_delta: Some(partial_json),
						});
					}
				},
				types::ContentBlockDelta::SignatureDelta { .. } => {},
			},
			types::MessagesStreamEvent::MessageDelta { delta, usage } => {
				if let Some(r) = delta.stop_reason {
					self.finish_reason = Some(finish_from_stop_reason(r));
				}
				self.usage = Some(Usage::new(self.input_tokens, usage.output_tokens));
			},
			types::MessagesStreamEvent::MessageStop => {
				out.extend(self.end_events());
			},
			types::MessagesStreamEvent::ContentBlockStop { .. } | types::MessagesStreamEvent::Ping => {},
			types::MessagesStreamEvent::Error { error } => {
				out.push(StreamEvent::Error {
					error: WireError {
						kind: ErrorKind::classify(None, Some(error.r#type.as_str())),
						message: error.message,
						code: Some(error.r#type),
					},
				});
			},
		}
		Ok(out)
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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpenBlock {
	Text,
	Thinking,
	Tool(u32),
}

/// Build `message_*` events from IR. Content, reasoning, and tool-call
/// deltas each live in their own content block; switching kinds closes the
/// previous block.
pub struct StreamBuilder {
	open: Option<OpenBlock>,
	next_index: u32,
	/// IR tool ordinal → anthropic block index for reopened deltas.
	tool_index: HashMap<u32, u32>,
}

impl StreamBuilder {
	pub fn new() -> StreamBuilder {
		StreamBuilder {
			open: None,
			next_index: 0,
			tool_index: HashMap::new(),
		}
	}

	fn frame(event: &types::MessagesStreamEvent) -> SseFrame {
		SseFrame::named(
			event.event_name(),
			serde_json::to_string(event).expect("stream event serialization cannot fail"),
		)
	}

	fn close_open(&mut self, out: &mut Vec<SseFrame>) {
		if self.open.take().is_some() {
			out.push(Self::frame(&types::MessagesStreamEvent::ContentBlockStop {
				index: self.next_index - 1,
			}));
		}
	}

	fn open_block(&mut self, block: types::ContentBlock, out: &mut Vec<SseFrame>) -> u32 {
		let index = self.next_index;
		self.next_index += 1;
		out.push(Self::frame(&types::MessagesStreamEvent::ContentBlockStart {
			index,
			content_block: block,
		}));
		index
	}
}

impl Default for StreamBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl StreamBuilderState for StreamBuilder {
	fn push(&mut self, event: &StreamEvent) -> Vec<SseFrame> {
		let mut out = Vec::new();
		match event {
			StreamEvent::Start { id, model } => {
				let message = types::MessagesResponse {
					id: if id.is_empty() {
						format!("msg_{}", uuid::Uuid::new_v4().simple())
					} else {
						id.clone()
					},
					r#type: "message".to_string(),
					role: "assistant".to_string(),
					content: vec![],
					model: model.clone(),
					stop_reason: None,
					stop_sequence: None,
					usage: types::Usage {
						input_tokens: 0,
						output_tokens: 0,
					},
				};
				out.push(Self::frame(&types::MessagesStreamEvent::MessageStart {
					message,
				}));
				out.push(Self::frame(&types::MessagesStreamEvent::Ping));
			},
			StreamEvent::Content { delta, .. } => {
				if self.open != Some(OpenBlock::Text) {
					self.close_open(&mut out);
					self.open_block(
						types::ContentBlock::Text {
							text: String::new(),
							citations: None,
						},
						&mut out,
					);
					self.open = Some(OpenBlock::Text);
				}
				out.push(Self::frame(&types::MessagesStreamEvent::ContentBlockDelta {
					index: self.next_index - 1,
					delta: types::ContentBlockDelta::TextDelta {
						text: delta.clone(),
					},
				}));
			},
			StreamEvent::Reasoning { delta } => {
				if self.open != Some(OpenBlock::Thinking) {
					self.close_open(&mut out);
					self.open_block(
						types::ContentBlock::Thinking {
							thinking: String::new(),
							signature: String::new(),
						},
						&mut out,
					);
					self.open = Some(OpenBlock::Thinking);
				}
				out.push(Self::frame(&types::MessagesStreamEvent::ContentBlockDelta {
					index: self.next_index - 1,
					delta: types::ContentBlockDelta::ThinkingDelta {
						thinking: delta.clone(),
					},
				}));
			},
			StreamEvent::ToolCall {
				index,
				id,
				name,
				arguments_delta,
			} => {
				if self.open != Some(OpenBlock::Tool(*index)) {
					self.close_open(&mut out);
					let block_index = self.open_block(
						types::ContentBlock::ToolUse {
							id: id.clone().unwrap_or_else(|| {
								format!("toolu_{}", uuid::Uuid::new_v4().simple())
							}),
							name: name.clone().unwrap_or_default(),
							input: json!({}),
						},
						&mut out,
					);
					self.tool_index.insert(*index, block_index);
					self.open = Some(OpenBlock::Tool(*index));
				}
				if let Some(args) = arguments_delta {
					let block_index = self.tool_index.get(index).copied().unwrap_or(0);
					out.push(Self::frame(&types::MessagesStreamEvent::ContentBlockDelta {
						index: block_index,
						delta: types::ContentBlockDelta::InputJsonDelta {
							partial_json: args.clone(),
						},
					}));
				}
			},
			StreamEvent::End {
				finish_reason,
				usage,
			} => {
				self.close_open(&mut out);
				out.push(Self::frame(&types::MessagesStreamEvent::MessageDelta {
					delta: types::MessageDelta {
						stop_reason: Some(stop_reason_from_finish(
							finish_reason.unwrap_or(FinishReason::Stop),
						)),
						stop_sequence: None,
					},
					usage: types::MessageDeltaUsage {
						output_tokens: usage.map(|u| u.completion_tokens).unwrap_or(0),
					},
				}));
				out.push(Self::frame(&types::MessagesStreamEvent::MessageStop));
			},
			// Error frames are written by the route layer in envelope form
			StreamEvent::Error { .. } => {},
		}
		out
	}

	fn finish(&mut self) -> Vec<SseFrame> {
		vec![]
	}
}

pub mod types {
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
		pub system: Option<SystemPrompt>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub max_tokens: Option<u64>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub stop_sequences: Option<Vec<String>>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub stream: Option<bool>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub temperature: Option<f64>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub top_p: Option<f64>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub tools: Option<Vec<Tool>>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub tool_choice: Option<ToolChoice>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub thinking: Option<ThinkingInput>,
		#[serde(flatten, default, skip_serializing_if = "is_empty")]
		pub rest: Map<String, Value>,
	}

	#[derive(Debug, Clone, Serialize, Deserialize)]
	pub struct RequestMessage {
		pub role: String,
		pub content: RequestContent,
	}

	#[derive(Debug, Clone, Serialize, Deserialize)]
	#[serde(untagged)]
	pub enum RequestContent {
		Text(String),
		Blocks(Vec<ContentBlock>),
	}

	#[derive(Debug, Clone, Serialize, Deserialize)]
	#[serde(rename_all = "snake_case", tag = "type")]
	pub enum ContentBlock {
		Text {
			text: String,
			#[serde(skip_serializing_if = "Option::is_none")]
			citations: Option<Value>,
		},
		Image {
			source: Value,
		},
		Thinking {
			thinking: String,
			#[serde(default)]
			signature: String,
		},
		RedactedThinking {
			data: String,
		},
		ToolUse {
			id: String,
			name: String,
			input: Value,
		},
		ToolResult {
			tool_use_id: String,
			content: ToolResultContent,
			#[serde(skip_serializing_if = "Option::is_none")]
			is_error: Option<bool>,
		},
		// There are many more block types; pass them without failing
		#[serde(other)]
		Unknown,
	}

	#[derive(Debug, Clone, Serialize, Deserialize)]
	#[serde(untagged)]
	pub enum ToolResultContent {
		Text(String),
		Blocks(Vec<Value>),
	}

	#[derive(Debug, Clone, Serialize, Deserialize)]
	#[serde(untagged)]
	pub enum SystemPrompt {
		Text(String),
		Blocks(Vec<SystemBlock>),
	}

	#[derive(Debug, Clone, Serialize, Deserialize)]
	pub struct SystemBlock {
		pub text: String,
	}

	#[derive(Debug, Clone, Serialize, Deserialize)]
	pub struct Tool {
		pub name: String,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub description: Option<String>,
		pub input_schema: Value,
	}

	#[derive(Debug, Clone, Serialize, Deserialize)]
	#[serde(rename_all = "snake_case", tag = "type")]
	pub enum ToolChoice {
		Auto,
		Any,
		Tool { name: String },
		None,
	}

	#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
	#[serde(rename_all = "snake_case", tag = "type")]
	pub enum ThinkingInput {
		Enabled { budget_tokens: u64 },
		Disabled {},
	}

	#[derive(Debug, Clone, Serialize, Deserialize)]
	pub struct MessagesResponse {
		pub id: String,
		pub r#type: String,
		pub role: String,
		pub content: Vec<ContentBlock>,
		pub model: String,
		pub stop_reason: Option<StopReason>,
		pub stop_sequence: Option<String>,
		pub usage: Usage,
	}

	#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
	#[serde(rename_all = "snake_case")]
	pub enum StopReason {
		EndTurn,
		MaxTokens,
		StopSequence,
		ToolUse,
		Refusal,
		#[serde(other)]
		Other,
	}

	#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
	pub struct Usage {
		#[serde(default)]
		pub input_tokens: u64,
		#[serde(default)]
		pub output_tokens: u64,
	}

	#[derive(Debug, Clone, Serialize, Deserialize)]
	#[serde(rename_all = "snake_case", tag = "type")]
	pub enum MessagesStreamEvent {
		MessageStart {
			message: MessagesResponse,
		},
		ContentBlockStart {
			index: u32,
			content_block: ContentBlock,
		},
		ContentBlockDelta {
			index: u32,
			delta: ContentBlockDelta,
		},
		ContentBlockStop {
			index: u32,
		},
		MessageDelta {
			delta: MessageDelta,
			usage: MessageDeltaUsage,
		},
		MessageStop,
		Ping,
		Error {
			error: MessagesError,
		},
	}

	impl MessagesStreamEvent {
		pub fn event_name(&self) -> &'static str {
			match self {
				Self::MessageStart { .. } => "message_start",
				Self::ContentBlockStart { .. } => "content_block_start",
				Self::ContentBlockDelta { .. } => "content_block_delta",
				Self::ContentBlockStop { .. } => "content_block_stop",
				Self::MessageDelta { .. } => "message_delta",
				Self::MessageStop => "message_stop",
				Self::Ping => "ping",
				Self::Error { .. } => "error",
			}
		}
	}

	#[derive(Debug, Clone, Serialize, Deserialize)]
	#[serde(rename_all = "snake_case", tag = "type")]
	pub enum ContentBlockDelta {
		TextDelta { text: String },
		InputJsonDelta { partial_json: String },
		ThinkingDelta { thinking: String },
		SignatureDelta { signature: String },
	}

	#[derive(Debug, Clone, Serialize, Deserialize)]
	pub struct MessageDelta {
		pub stop_reason: Option<StopReason>,
		pub stop_sequence: Option<String>,
	}

	#[derive(Debug, Clone, Serialize, Deserialize)]
	pub struct MessageDeltaUsage {
		#[serde(default)]
		pub output_tokens: u64,
	}

	#[derive(Debug, Clone, Serialize, Deserialize)]
	pub struct MessagesErrorResponse {
		pub r#type: String,
		pub error: MessagesError,
	}

	#[derive(Debug, Clone, Serialize, Deserialize)]
	pub struct MessagesError {
		pub r#type: String,
		pub message: String,
	}
}
