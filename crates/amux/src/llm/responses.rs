//! OpenAI Responses dialect.
//!
//! Requests carry `input` items and top-level `instructions`; responses are
//! an `output` item list; streams are named `response.*` events with no
//! `[DONE]` terminator.

use std::collections::HashMap;

use amux_core::strng;
use amux_core::strng::Strng;
use bytes::Bytes;
use serde_json::{Map, Value, json};

use crate::llm::ir::{
	ChatRequest, ChatResponse, Choice, ContentPart, FinishReason, GenerationParams, MediaSource,
	Message, MessageContent, Reasoning, ResponseFormat, ResponseMessage, Role, StreamEvent,
	ToolCall, ToolChoice, ToolDef, Usage, WireError,
};
use crate::llm::{AdapterError, StreamBuilderState, StreamParserState, openai};
use crate::parse::sse::SseFrame;

pub const NAME: Strng = strng::literal!("openai-responses");
pub const DEFAULT_CHAT_PATH: &str = "/v1/responses";

pub fn parse_request(bytes: &Bytes) -> Result<ChatRequest, AdapterError> {
	let raw: Value = serde_json::from_slice(bytes).map_err(AdapterError::RequestParsing)?;
	let wire: types::Request =
		serde_json::from_value(raw.clone()).map_err(AdapterError::RequestParsing)?;

	let mut messages = Vec::new();
	match &wire.input {
		Some(types::Input::Text(t)) => messages.push(Message::text(Role::User, t.clone())),
		Some(types::Input::Items(items)) => {
			for item in items {
				if let Some(m) = parse_input_item(item) {
					messages.push(m);
				}
			}
		},
		None => {},
	}

	let tools = wire
		.tools
		.iter()
		.flatten()
		.filter(|t| t.r#type.as_deref().unwrap_or("function") == "function")
		.map(|t| ToolDef {
			name: t.name.clone().unwrap_or_default(),
			description: t.description.clone(),
			parameters: t.parameters.clone().unwrap_or_else(|| json!({})),
		})
		.collect();

	let tool_choice = wire.tool_choice.as_ref().map(|tc| match tc {
		Value::String(s) => match s.as_str() {
			"none" => ToolChoice::None,
			"required" => ToolChoice::Required,
			_ => ToolChoice::Auto,
		},
		Value::Object(o) => ToolChoice::Function {
			name: o
				.get("name")
				.and_then(Value::as_str)
				.unwrap_or_default()
				.to_string(),
		},
		_ => ToolChoice::Auto,
	});

	let reasoning = wire.reasoning.as_ref().map(|r| Reasoning {
		enabled: r.effort.as_deref() != Some("none"),
		budget_tokens: None,
		effort: r.effort.clone(),
	});

	Ok(ChatRequest {
		model: wire.model.clone().unwrap_or_default(),
		messages,
		system: wire.instructions.clone(),
		tools,
		tool_choice,
		stream: wire.stream.unwrap_or(false),
		generation: GenerationParams {
			temperature: wire.temperature,
			top_p: wire.top_p,
			max_tokens: wire.max_output_tokens,
			response_format: wire
				.text
				.as_ref()
				.and_then(|t| t.format.as_ref())
				.and_then(|f| match f.r#type.as_str() {
					"json_object" => Some(ResponseFormat::JsonObject),
					"json_schema" => Some(ResponseFormat::JsonSchema {
						schema: f.schema.clone().unwrap_or(Value::Null),
					}),
					_ => None,
				}),
			reasoning,
			..Default::default()
		},
		extensions: wire.rest,
		raw: Some(raw),
	})
}

fn parse_input_item(item: &types::InputItem) -> Option<Message> {
	match item.r#type.as_deref() {
		Some("function_call") => Some(Message {
			role: Role::Assistant,
			content: MessageContent::Parts(vec![ContentPart::ToolUse {
				id: item.call_id.clone().unwrap_or_default(),
				name: item.name.clone().unwrap_or_default(),
				input: item
					.arguments
					.as_deref()
					.and_then(|a| serde_json::from_str(a).ok())
					.unwrap_or(Value::Null),
			}]),
		}),
		Some("function_call_output") => Some(Message {
			role: Role::Tool,
			content: MessageContent::Parts(vec![ContentPart::ToolResult {
				tool_use_id: item.call_id.clone().unwrap_or_default(),
				content: item.output.clone().unwrap_or_default(),
				is_error: false,
			}]),
		}),
		// Prior reasoning items are not replayed across dialects
		Some("reasoning") => None,
		_ => {
			let role = match item.role.as_deref() {
				Some("assistant") => Role::Assistant,
				Some("system") | Some("developer") => Role::System,
				_ => Role::User,
			};
			let content = match &item.content {
				Some(types::ItemContent::Text(t)) => MessageContent::Text(t.clone()),
				Some(types::ItemContent::Parts(parts)) => MessageContent::Parts(
					parts
						.iter()
						.map(|p| match p.r#type.as_str() {
							"input_image" => ContentPart::Image {
								source: MediaSource::from_url(p.image_url.as_deref().unwrap_or_default()),
							},
							_ => ContentPart::Text {
								text: p.text.clone().unwrap_or_default(),
							},
						})
						.collect(),
				),
				None => return None,
			};
			Some(Message { role, content })
		},
	}
}

pub fn build_request(req: &ChatRequest) -> Result<Vec<u8>, AdapterError> {
	if req.model.is_empty() {
		return Err(AdapterError::MissingModel);
	}
	let mut items = Vec::new();
	for m in &req.messages {
		match &m.content {
			MessageContent::Text(t) => items.push(types::InputItem {
				r#type: Some("message".to_string()),
				role: Some(m.role.as_str().to_string()),
				content: Some(types::ItemContent::Text(t.clone())),
				..Default::default()
			}),
			MessageContent::Parts(parts) => {
				let mut content_parts = Vec::new();
				for p in parts {
					match p {
						ContentPart::Text { text } => content_parts.push(types::ItemContentPart {
							r#type: if m.role == Role::Assistant {
								"output_text".to_string()
							} else {
								"input_text".to_string()
							},
							text: Some(text.clone()),
							image_url: None,
						}),
						ContentPart::Image { source } => content_parts.push(types::ItemContentPart {
							r#type: "input_image".to_string(),
							text: None,
							image_url: Some(source.to_url()),
						}),
						ContentPart::Audio { source } | ContentPart::Video { source } => {
							content_parts.push(types::ItemContentPart {
								r#type: "input_text".to_string(),
								text: Some(source.to_url()),
								image_url: None,
							})
						},
						ContentPart::ToolUse { id, name, input } => items.push(types::InputItem {
							r#type: Some("function_call".to_string()),
							call_id: Some(id.clone()),
							name: Some(name.clone()),
							arguments: Some(input.to_string()),
							..Default::default()
						}),
						ContentPart::ToolResult {
							tool_use_id,
							content,
							..
						} => items.push(types::InputItem {
							r#type: Some("function_call_output".to_string()),
							call_id: Some(tool_use_id.clone()),
							output: Some(content.clone()),
							..Default::default()
						}),
					}
				}
				if !content_parts.is_empty() {
					items.push(types::InputItem {
						r#type: Some("message".to_string()),
						role: Some(m.role.as_str().to_string()),
						content: Some(types::ItemContent::Parts(content_parts)),
						..Default::default()
					});
				}
			},
		}
	}

	let tools: Vec<types::Tool> = req
		.tools
		.iter()
		.map(|t| types::Tool {
			r#type: Some("function".to_string()),
			name: Some(t.name.clone()),
			description: t.description.clone(),
			parameters: Some(t.parameters.clone()),
		})
		.collect();

	let wire = types::Request {
		model: Some(req.model.clone()),
		input: Some(types::Input::Items(items)),
		instructions: req.system.clone(),
		tools: if tools.is_empty() { None } else { Some(tools) },
		tool_choice: req.tool_choice.as_ref().map(|tc| match tc {
			ToolChoice::Auto => Value::String("auto".to_string()),
			ToolChoice::None => Value::String("none".to_string()),
			ToolChoice::Required => Value::String("required".to_string()),
			ToolChoice::Function { name } => json!({ "type": "function", "name": name }),
		}),
		stream: if req.stream { Some(true) } else { None },
		temperature: req.generation.temperature,
		top_p: req.generation.top_p,
		max_output_tokens: req.generation.max_tokens,
		reasoning: req
			.generation
			.reasoning
			.as_ref()
			.filter(|r| r.enabled)
			.map(|r| types::ReasoningConfig {
				effort: r.effort.clone().or(Some("medium".to_string())),
			}),
		text: req.generation.response_format.as_ref().map(|rf| types::TextConfig {
			format: Some(match rf {
				ResponseFormat::Text => types::TextFormat {
					r#type: "text".to_string(),
					schema: None,
				},
				ResponseFormat::JsonObject => types::TextFormat {
					r#type: "json_object".to_string(),
					schema: None,
				},
				ResponseFormat::JsonSchema { schema } => types::TextFormat {
					r#type: "json_schema".to_string(),
					schema: Some(schema.clone()),
				},
			}),
		}),
		rest: req.extensions.clone(),
	};
	serde_json::to_vec(&wire).map_err(AdapterError::RequestMarshal)
}

pub fn parse_response(bytes: &Bytes) -> Result<ChatResponse, AdapterError> {
	let wire: types::Response =
		serde_json::from_slice(bytes).map_err(AdapterError::ResponseParsing)?;
	Ok(response_to_ir(&wire))
}

fn response_to_ir(wire: &types::Response) -> ChatResponse {
	let mut content: Option<String> = None;
	let mut reasoning_content: Option<String> = None;
	let mut tool_calls = Vec::new();
	for item in &wire.output {
		match item.r#type.as_deref() {
			Some("message") => {
				for part in item.content.iter().flatten() {
					if part.r#type == "output_text"
						&& let Some(text) = &part.text
					{
						match content.as_mut() {
							Some(c) => c.push_str(text),
							None => content = Some(text.clone()),
						}
					}
				}
			},
			Some("function_call") => tool_calls.push(ToolCall {
				id: item.call_id.clone().unwrap_or_default(),
				name: item.name.clone().unwrap_or_default(),
				arguments: item.arguments.clone().unwrap_or_default(),
			}),
			Some("reasoning") => {
				let text = item
					.summary
					.iter()
					.flatten()
					.filter_map(|s| s.text.as_deref())
					.collect::<Vec<_>>()
					.join("\n");
				if !text.is_empty() {
					reasoning_content = Some(text);
				}
			},
			_ => {},
		}
	}
	let finish_reason = match wire.status.as_deref() {
		Some("incomplete") => Some(FinishReason::Length),
		_ if !tool_calls.is_empty() => Some(FinishReason::ToolCalls),
		Some("completed") => Some(FinishReason::Stop),
		_ => None,
	};
	ChatResponse {
		id: wire.id.clone().unwrap_or_default(),
		model: wire.model.clone().unwrap_or_default(),
		created: wire.created_at.unwrap_or_default(),
		choices: vec![Choice {
			index: 0,
			message: ResponseMessage {
				content,
				reasoning_content,
				tool_calls,
			},
			finish_reason,
		}],
		usage: wire.usage.as_ref().map(usage_from_wire),
		system_fingerprint: None,
	}
}

pub fn build_response(resp: &ChatResponse) -> Result<Vec<u8>, AdapterError> {
	let wire = response_from_ir(resp, "completed");
	serde_json::to_vec(&wire).map_err(AdapterError::ResponseMarshal)
}

fn response_from_ir(resp: &ChatResponse, status: &str) -> types::Response {
	let choice = resp.choices.first();
	let mut output = Vec::new();
	if let Some(c) = choice {
		if let Some(thinking) = &c.message.reasoning_content {
			output.push(types::OutputItem {
				r#type: Some("reasoning".to_string()),
				id: Some(format!("rs_{}", uuid::Uuid::new_v4().simple())),
				summary: Some(vec![types::SummaryPart {
					r#type: "summary_text".to_string(),
					text: Some(thinking.clone()),
				}]),
				..Default::default()
			});
		}
		if let Some(text) = &c.message.content {
			output.push(types::OutputItem {
				r#type: Some("message".to_string()),
				id: Some(format!("msg_{}", uuid::Uuid::new_v4().simple())),
				role: Some("assistant".to_string()),
				status: Some("completed".to_string()),
				content: Some(vec![types::OutputContentPart {
					r#type: "output_text".to_string(),
					text: Some(text.clone()),
					annotations: Some(vec![]),
				}]),
				..Default::default()
			});
		}
		for tc in &c.message.tool_calls {
			output.push(types::OutputItem {
				r#type: Some("function_call".to_string()),
				id: Some(format!("fc_{}", uuid::Uuid::new_v4().simple())),
				call_id: Some(tc.id.clone()),
				name: Some(tc.name.clone()),
				arguments: Some(tc.arguments.clone()),
				status: Some("completed".to_string()),
				..Default::default()
			});
		}
	}
	types::Response {
		id: Some(if resp.id.is_empty() {
			format!("resp_{}", uuid::Uuid::new_v4().simple())
		} else {
			resp.id.clone()
		}),
		object: Some("response".to_string()),
		created_at: Some(resp.created),
		status: Some(status.to_string()),
		model: Some(resp.model.clone()),
		output,
		usage: resp.usage.as_ref().map(|u| types::Usage {
			input_tokens: u.prompt_tokens,
			output_tokens: u.completion_tokens,
			total_tokens: u.total_tokens,
		}),
	}
}

/// Responses errors use the OpenAI envelope.
pub fn parse_error(bytes: &Bytes) -> WireError {
	openai::parse_error(bytes)
}

pub fn usage_from_wire(u: &types::Usage) -> Usage {
	Usage {
		prompt_tokens: u.input_tokens,
		completion_tokens: u.output_tokens,
		total_tokens: u.total_tokens,
	}
}

/// Parse `response.*` events into IR. Tool-call items are keyed by item id so
/// argument deltas can find their ordinal.
#[derive(Default)]
pub struct StreamParser {
	started: bool,
	ended: bool,
	tool_count: u32,
	tools_by_item: HashMap<String, u32>,
}

impl StreamParserState for StreamParser {
	fn parse(&mut self, frame: &SseFrame) -> Result<Vec<StreamEvent>, AdapterError> {
		let event: types::StreamEventWire =
			serde_json::from_str(&frame.data).map_err(AdapterError::StreamParsing)?;
		let mut out = Vec::new();
		match event.r#type.as_str() {
			"response.created" => {
				if !self.started {
					self.started = true;
					let (id, model) = event
						.response
						.as_ref()
						.map(|r| {
							(
								r.id.clone().unwrap_or_default(),
								r.model.clone().unwrap_or_default(),
							)
						})
						.unwrap_or_default();
					out.push(StreamEvent::Start { id, model });
				}
			},
			"response.output_text.delta" => {
				if let Some(delta) = event.delta.as_ref().and_then(Value::as_str) {
					out.push(StreamEvent::Content {
						index: 0,
						delta: delta.to_string(),
					});
				}
			},
			"response.reasoning_summary_text.delta" | "response.reasoning_text.delta" => {
				if let Some(delta) = event.delta.as_ref().and_then(Value::as_str) {
					out.push(StreamEvent::Reasoning {
						delta: delta.to_string(),
					});
				}
			},
			"response.output_item.added" => {
				if let Some(item) = &event.item
					&& item.r#type.as_deref() == Some("function_call")
				{
					let ordinal = self.tool_count;
					self.tool_count += 1;
					if let Some(item_id) = &item.id {
						self.tools_by_item.insert(item_id.clone(), ordinal);
					}
					out.push(StreamEvent::ToolCall {
						index: ordinal,
						id: item.call_id.clone(),
						name: item.name.clone(),
						arguments_delta: None,
					});
				}
			},
			"response.function_call_arguments.delta" => {
				if let Some(delta) = event.delta.as_ref().and_then(Value::as_str) {
					let ordinal = event
						.item_id
						.as_ref()
						.and_then(|id| self.tools_by_item.get(id))
						.copied()
						.unwrap_or(0);
					out.push(StreamEvent::ToolCall {
						index: ordinal,
						id: None,
						name: None,
						arguments_delta: Some(delta.to_string()),
					});
				}
			},
			"response.completed" | "response.incomplete" => {
				if !self.ended {
					self.ended = true;
					let usage = event
						.response
						.as_ref()
						.and_then(|r| r.usage.as_ref())
						.map(usage_from_wire);
					let finish = if event.r#type == "response.incomplete" {
						FinishReason::Length
					} else if self.tool_count > 0 {
						FinishReason::ToolCalls
					} else {
						FinishReason::Stop
					};
					out.push(StreamEvent::End {
						finish_reason: Some(finish),
						usage,
					});
				}
			},
			"response.failed" | "error" => {
				out.push(StreamEvent::Error {
					error: WireError::unknown(
						event
							.message
							.clone()
							.unwrap_or_else(|| "response failed".to_string()),
					),
				});
			},
			_ => {},
		}
		Ok(out)
	}

	fn finish(&mut self) -> Vec<StreamEvent> {
		if self.ended || !self.started {
			return vec![];
		}
		self.ended = true;
		vec![StreamEvent::End {
			finish_reason: None,
			usage: None,
		}]
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpenItem {
	Message,
	Tool(u32),
}

/// Build `response.*` events from IR.
pub struct StreamBuilder {
	id: String,
	model: String,
	created: i64,
	output_index: u32,
	open: Option<OpenItem>,
	message_item_id: Option<String>,
	tool_items: HashMap<u32, (String, String, String)>,
	content: String,
}

impl StreamBuilder {
	pub fn new() -> StreamBuilder {
		StreamBuilder {
			id: String::new(),
			model: String::new(),
			created: chrono::Utc::now().timestamp(),
			output_index: 0,
			open: None,
			message_item_id: None,
			tool_items: HashMap::new(),
			content: String::new(),
		}
	}

	fn frame(name: &str, mut body: Map<String, Value>) -> SseFrame {
		body.insert("type".to_string(), Value::String(name.to_string()));
		SseFrame::named(
			name,
			serde_json::to_string(&Value::Object(body)).expect("event serialization cannot fail"),
		)
	}

	fn skeleton(&self, status: &str) -> Value {
		json!({
			"id": self.id,
			"object": "response",
			"created_at": self.created,
			"status": status,
			"model": self.model,
			"output": [],
		})
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
				self.id = if id.is_empty() {
					format!("resp_{}", uuid::Uuid::new_v4().simple())
				} else {
					id.clone()
				};
				self.model = model.clone();
				let mut body = Map::new();
				body.insert("response".to_string(), self.skeleton("in_progress"));
				out.push(Self::frame("response.created", body));
			},
			StreamEvent::Content { delta, .. } => {
				if self.open != Some(OpenItem::Message) {
					let item_id = format!("msg_{}", uuid::Uuid::new_v4().simple());
					let mut body = Map::new();
					body.insert("output_index".to_string(), json!(self.output_index));
					body.insert(
						"item".to_string(),
						json!({
							"type": "message",
							"id": item_id,
							"role": "assistant",
							"status": "in_progress",
							"content": [],
						}),
					);
					out.push(Self::frame("response.output_item.added", body));
					self.message_item_id = Some(item_id);
					self.open = Some(OpenItem::Message);
					self.output_index += 1;
				}
				self.content.push_str(delta);
				let mut body = Map::new();
				body.insert(
					"item_id".to_string(),
					json!(self.message_item_id.clone().unwrap_or_default()),
				);
				body.insert("output_index".to_string(), json!(self.output_index - 1));
				body.insert("content_index".to_string(), json!(0));
				body.insert("delta".to_string(), json!(delta));
				out.push(Self::frame("response.output_text.delta", body));
			},
			StreamEvent::Reasoning { delta } => {
				let mut body = Map::new();
				body.insert("delta".to_string(), json!(delta));
				out.push(Self::frame("response.reasoning_summary_text.delta", body));
			},
			StreamEvent::ToolCall {
				index,
				id,
				name,
				arguments_delta,
			} => {
				if !self.tool_items.contains_key(index) {
					let item_id = format!("fc_{}", uuid::Uuid::new_v4().simple());
					let call_id = id
						.clone()
						.unwrap_or_else(|| format!("call_{}", uuid::Uuid::new_v4().simple()));
					let mut body = Map::new();
					body.insert("output_index".to_string(), json!(self.output_index));
					body.insert(
						"item".to_string(),
						json!({
							"type": "function_call",
							"id": item_id,
							"call_id": call_id,
							"name": name.clone().unwrap_or_default(),
							"arguments": "",
							"status": "in_progress",
						}),
					);
					out.push(Self::frame("response.output_item.added", body));
					self
						.tool_items
						.insert(*index, (item_id, call_id, String::new()));
					self.open = Some(OpenItem::Tool(*index));
					self.output_index += 1;
				}
				if let Some(delta) = arguments_delta
					&& let Some((item_id, _, args)) = self.tool_items.get_mut(index)
				{
					args.push_str(delta);
					let mut body = Map::new();
					body.insert("item_id".to_string(), json!(item_id.clone()));
					body.insert("delta".to_string(), json!(delta));
					out.push(Self::frame("response.function_call_arguments.delta", body));
				}
			},
			StreamEvent::End {
				finish_reason,
				usage,
			} => {
				if self.open == Some(OpenItem::Message)
					&& let Some(item_id) = &self.message_item_id
				{
					let mut body = Map::new();
					body.insert("item_id".to_string(), json!(item_id.clone()));
					body.insert("text".to_string(), json!(self.content.clone()));
					out.push(Self::frame("response.output_text.done", body));
				}
				for (item_id, _, args) in self.tool_items.values() {
					let mut body = Map::new();
					body.insert("item_id".to_string(), json!(item_id.clone()));
					body.insert("arguments".to_string(), json!(args.clone()));
					out.push(Self::frame(
						"response.function_call_arguments.done",
						body,
					));
				}
				let status = match finish_reason {
					Some(FinishReason::Length) => "incomplete",
					_ => "completed",
				};
				let mut response = self.skeleton(status);
				if let (Value::Object(obj), Some(u)) = (&mut response, usage) {
					obj.insert(
						"usage".to_string(),
						json!({
							"input_tokens": u.prompt_tokens,
							"output_tokens": u.completion_tokens,
							"total_tokens": u.total_tokens,
						}),
					);
				}
				let mut body = Map::new();
				body.insert("response".to_string(), response);
				out.push(Self::frame(
					if status == "incomplete" {
						"response.incomplete"
					} else {
						"response.completed"
					},
					body,
				));
			},
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
		#[serde(skip_serializing_if = "Option::is_none")]
		pub input: Option<Input>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub instructions: Option<String>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub tools: Option<Vec<Tool>>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub tool_choice: Option<Value>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub stream: Option<bool>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub temperature: Option<f64>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub top_p: Option<f64>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub max_output_tokens: Option<u64>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub reasoning: Option<ReasoningConfig>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub text: Option<TextConfig>,
		#[serde(flatten, default, skip_serializing_if = "is_empty")]
		pub rest: Map<String, Value>,
	}

	#[derive(Debug, Clone, Serialize, Deserialize)]
	#[serde(untagged)]
	pub enum Input {
		Text(String),
		Items(Vec<InputItem>),
	}

	#[derive(Debug, Clone, Default, Serialize, Deserialize)]
	pub struct InputItem {
		#[serde(skip_serializing_if = "Option::is_none")]
		pub r#type: Option<String>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub role: Option<String>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub content: Option<ItemContent>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub call_id: Option<String>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub name: Option<String>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub arguments: Option<String>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub output: Option<String>,
	}

	#[derive(Debug, Clone, Serialize, Deserialize)]
	#[serde(untagged)]
	pub enum ItemContent {
		Text(String),
		Parts(Vec<ItemContentPart>),
	}

	#[derive(Debug, Clone, Serialize, Deserialize)]
	pub struct ItemContentPart {
		pub r#type: String,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub text: Option<String>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub image_url: Option<String>,
	}

	#[derive(Debug, Clone, Serialize, Deserialize)]
	pub struct Tool {
		#[serde(skip_serializing_if = "Option::is_none")]
		pub r#type: Option<String>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub name: Option<String>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub description: Option<String>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub parameters: Option<Value>,
	}

	#[derive(Debug, Clone, Serialize, Deserialize)]
	pub struct ReasoningConfig {
		#[serde(skip_serializing_if = "Option::is_none")]
		pub effort: Option<String>,
	}

	#[derive(Debug, Clone, Serialize, Deserialize)]
	pub struct TextConfig {
		#[serde(skip_serializing_if = "Option::is_none")]
		pub format: Option<TextFormat>,
	}

	#[derive(Debug, Clone, Serialize, Deserialize)]
	pub struct TextFormat {
		pub r#type: String,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub schema: Option<Value>,
	}

	#[derive(Debug, Clone, Default, Serialize, Deserialize)]
	pub struct Response {
		#[serde(skip_serializing_if = "Option::is_none")]
		pub id: Option<String>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub object: Option<String>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub created_at: Option<i64>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub status: Option<String>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub model: Option<String>,
		#[serde(default)]
		pub output: Vec<OutputItem>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub usage: Option<Usage>,
	}

	#[derive(Debug, Clone, Default, Serialize, Deserialize)]
	pub struct OutputItem {
		#[serde(skip_serializing_if = "Option::is_none")]
		pub r#type: Option<String>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub id: Option<String>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub role: Option<String>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub status: Option<String>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub content: Option<Vec<OutputContentPart>>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub call_id: Option<String>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub name: Option<String>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub arguments: Option<String>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub summary: Option<Vec<SummaryPart>>,
	}

	#[derive(Debug, Clone, Serialize, Deserialize)]
	pub struct OutputContentPart {
		pub r#type: String,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub text: Option<String>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub annotations: Option<Vec<Value>>,
	}

	#[derive(Debug, Clone, Serialize, Deserialize)]
	pub struct SummaryPart {
		pub r#type: String,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub text: Option<String>,
	}

	#[derive(Debug, Clone, Default, Serialize, Deserialize)]
	pub struct Usage {
		#[serde(default)]
		pub input_tokens: u64,
		#[serde(default)]
		pub output_tokens: u64,
		#[serde(default)]
		pub total_tokens: u64,
	}

	/// One streamed `response.*` event, parsed loosely: only the fields the
	/// gateway observes are typed.
	#[derive(Debug, Clone, Deserialize)]
	pub struct StreamEventWire {
		pub r#type: String,
		#[serde(default)]
		pub response: Option<Response>,
		#[serde(default)]
		pub item: Option<OutputItem>,
		#[serde(default)]
		pub item_id: Option<String>,
		#[serde(default)]
		pub delta: Option<Value>,
		#[serde(default)]
		pub message: Option<String>,
	}
}
