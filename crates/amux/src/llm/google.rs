//! Google Gemini generateContent dialect.
//!
//! The model travels in the URL rather than the body, streams are bare
//! `data:` frames of full response objects with no terminator, and tool
//! calls arrive as complete objects rather than argument deltas.

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

pub const NAME: Strng = strng::literal!("google");
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_CHAT_PATH: &str = "/v1beta/models/{model}:streamGenerateContent";

/// Render a chat-path template for a concrete model and mode. Streaming gets
/// the `:streamGenerateContent` action with `alt=sse`; non-streaming swaps
/// in `:generateContent`.
pub fn resolve_path(template: &str, model: &str, stream: bool) -> String {
	let mut path = template.replace("{model}", model);
	if stream {
		if !path.contains("alt=sse") {
			path.push_str(if path.contains('?') { "&alt=sse" } else { "?alt=sse" });
		}
	} else {
		path = path.replace(":streamGenerateContent", ":generateContent");
	}
	path
}

pub fn parse_request(bytes: &Bytes) -> Result<ChatRequest, AdapterError> {
	let raw: Value = serde_json::from_slice(bytes).map_err(AdapterError::RequestParsing)?;
	let wire: types::Request =
		serde_json::from_value(raw.clone()).map_err(AdapterError::RequestParsing)?;

	let system = wire.system_instruction.as_ref().map(|c| {
		c.parts
			.iter()
			.filter_map(|p| p.text.as_deref())
			.collect::<Vec<_>>()
			.join("\n")
	});

	let messages = wire.contents.iter().map(parse_content).collect();

	let tools = wire
		.tools
		.iter()
		.flatten()
		.flat_map(|t| t.function_declarations.iter().flatten())
		.map(|f| ToolDef {
			name: f.name.clone(),
			description: f.description.clone(),
			parameters: f.parameters.clone().unwrap_or_else(|| json!({})),
		})
		.collect();

	let tool_choice = wire
		.tool_config
		.as_ref()
		.and_then(|tc| tc.function_calling_config.as_ref())
		.map(|fc| match fc.mode.as_deref() {
			Some("NONE") => ToolChoice::None,
			Some("ANY") => match fc.allowed_function_names.as_ref().and_then(|n| n.first()) {
				Some(name) => ToolChoice::Function { name: name.clone() },
				None => ToolChoice::Required,
			},
			_ => ToolChoice::Auto,
		});

	let g = wire.generation_config.as_ref();
	let reasoning = g
		.and_then(|g| g.thinking_config.as_ref())
		.map(|t| Reasoning {
			enabled: t.thinking_budget.map(|b| b != 0).unwrap_or(true),
			budget_tokens: t.thinking_budget.filter(|b| *b != 0),
			effort: None,
		});

	Ok(ChatRequest {
		// The route layer injects the URL-borne model before parse
		model: wire.model.clone().unwrap_or_default(),
		messages,
		system,
		tools,
		tool_choice,
		stream: false,
		generation: GenerationParams {
			temperature: g.and_then(|g| g.temperature),
			top_p: g.and_then(|g| g.top_p),
			max_tokens: g.and_then(|g| g.max_output_tokens),
			stop: g
				.and_then(|g| g.stop_sequences.clone())
				.unwrap_or_default(),
			presence_penalty: g.and_then(|g| g.presence_penalty),
			frequency_penalty: g.and_then(|g| g.frequency_penalty),
			seed: g.and_then(|g| g.seed),
			response_format: g.and_then(|g| match g.response_mime_type.as_deref() {
				Some("application/json") => Some(crate::llm::ir::ResponseFormat::JsonObject),
				_ => None,
			}),
			reasoning,
			web_search: wire
				.tools
				.iter()
				.flatten()
				.any(|t| t.google_search.is_some()),
		},
		extensions: wire.rest,
		raw: Some(raw),
	})
}

pub fn build_request(req: &ChatRequest) -> Result<Vec<u8>, AdapterError> {
	// The model is addressed through the URL, not the body
	let mut contents = Vec::with_capacity(req.messages.len());
	for m in &req.messages {
		contents.push(build_content(m));
	}

	let function_declarations: Vec<types::FunctionDeclaration> = req
		.tools
		.iter()
		.map(|t| types::FunctionDeclaration {
			name: t.name.clone(),
			description: t.description.clone(),
			parameters: Some(t.parameters.clone()),
		})
		.collect();
	let mut tools = Vec::new();
	if !function_declarations.is_empty() {
		tools.push(types::Tool {
			function_declarations: Some(function_declarations),
			google_search: None,
		});
	}
	if req.generation.web_search {
		tools.push(types::Tool {
			function_declarations: None,
			google_search: Some(json!({})),
		});
	}

	let tool_config = req.tool_choice.as_ref().map(|tc| types::ToolConfig {
		function_calling_config: Some(match tc {
			ToolChoice::Auto => types::FunctionCallingConfig {
				mode: Some("AUTO".to_string()),
				allowed_function_names: None,
			},
			ToolChoice::None => types::FunctionCallingConfig {
				mode: Some("NONE".to_string()),
				allowed_function_names: None,
			},
			ToolChoice::Required => types::FunctionCallingConfig {
				mode: Some("ANY".to_string()),
				allowed_function_names: None,
			},
			ToolChoice::Function { name } => types::FunctionCallingConfig {
				mode: Some("ANY".to_string()),
				allowed_function_names: Some(vec![name.clone()]),
			},
		}),
	});

	let g = &req.generation;
	let generation_config = types::GenerationConfig {
		temperature: g.temperature,
		top_p: g.top_p,
		max_output_tokens: g.max_tokens,
		stop_sequences: if g.stop.is_empty() {
			None
		} else {
			Some(g.stop.clone())
		},
		presence_penalty: g.presence_penalty,
		frequency_penalty: g.frequency_penalty,
		seed: g.seed,
		response_mime_type: g.response_format.as_ref().and_then(|rf| match rf {
			crate::llm::ir::ResponseFormat::JsonObject
			| crate::llm::ir::ResponseFormat::JsonSchema { .. } => {
				Some("application/json".to_string())
			},
			crate::llm::ir::ResponseFormat::Text => None,
		}),
		thinking_config: g.reasoning.as_ref().filter(|r| r.enabled).map(|r| {
			types::ThinkingConfig {
				thinking_budget: r.budget_tokens,
				include_thoughts: Some(true),
			}
		}),
	};

	let wire = types::Request {
		model: None,
		contents,
		system_instruction: req.system.as_ref().map(|s| types::Content {
			role: None,
			parts: vec![types::Part {
				text: Some(s.clone()),
				..Default::default()
			}],
		}),
		tools: if tools.is_empty() { None } else { Some(tools) },
		tool_config,
		generation_config: Some(generation_config),
		rest: Map::new(),
	};
	serde_json::to_vec(&wire).map_err(AdapterError::RequestMarshal)
}

pub fn parse_response(bytes: &Bytes) -> Result<ChatResponse, AdapterError> {
	let wire: types::Response =
		serde_json::from_slice(bytes).map_err(AdapterError::ResponseParsing)?;
	Ok(response_to_ir(&wire))
}

fn response_to_ir(wire: &types::Response) -> ChatResponse {
	let choices = wire
		.candidates
		.iter()
		.map(|cand| {
			let mut content: Option<String> = None;
			let mut reasoning_content: Option<String> = None;
			let mut tool_calls = Vec::new();
			for part in cand.content.iter().flat_map(|c| c.parts.iter()) {
				if let Some(text) = &part.text {
					let slot = if part.thought == Some(true) {
						&mut reasoning_content
					} else {
						&mut content
					};
					match slot.as_mut() {
						Some(s) => s.push_str(text),
						None => *slot = Some(text.clone()),
					}
				}
				if let Some(fc) = &part.function_call {
					tool_calls.push(ToolCall {
						// Gemini calls carry no id; synthesise a stable-enough one
						id: format!("call_{}", uuid::Uuid::new_v4().simple()),
						name: fc.name.clone(),
						arguments: fc.args.clone().unwrap_or(Value::Null).to_string(),
					});
				}
			}
			let finish_reason = cand.finish_reason.as_deref().map(|r| {
				if !tool_calls.is_empty() && r == "STOP" {
					FinishReason::ToolCalls
				} else {
					finish_reason_from_str(r)
				}
			});
			Choice {
				index: cand.index.unwrap_or(0),
				message: ResponseMessage {
					content,
					reasoning_content,
					tool_calls,
				},
				finish_reason,
			}
		})
		.collect();
	ChatResponse {
		id: wire.response_id.clone().unwrap_or_default(),
		model: wire.model_version.clone().unwrap_or_default(),
		created: chrono::Utc::now().timestamp(),
		choices,
		usage: wire.usage_metadata.as_ref().map(usage_from_wire),
		system_fingerprint: None,
	}
}

pub fn build_response(resp: &ChatResponse) -> Result<Vec<u8>, AdapterError> {
	let wire = response_from_ir(resp);
	serde_json::to_vec(&wire).map_err(AdapterError::ResponseMarshal)
}

fn response_from_ir(resp: &ChatResponse) -> types::Response {
	let candidates = resp
		.choices
		.iter()
		.map(|c| {
			let mut parts = Vec::new();
			if let Some(t) = &c.message.reasoning_content {
				parts.push(types::Part {
					text: Some(t.clone()),
					thought: Some(true),
					..Default::default()
				});
			}
			if let Some(t) = &c.message.content {
				parts.push(types::Part {
					text: Some(t.clone()),
					..Default::default()
				});
			}
			for tc in &c.message.tool_calls {
				parts.push(types::Part {
					function_call: Some(types::FunctionCall {
						name: tc.name.clone(),
						args: serde_json::from_str(&tc.arguments).ok(),
					}),
					..Default::default()
				});
			}
			types::Candidate {
				content: Some(types::Content {
					role: Some("model".to_string()),
					parts,
				}),
				finish_reason: c.finish_reason.map(|f| finish_reason_to_str(f).to_string()),
				index: Some(c.index),
			}
		})
		.collect();
	types::Response {
		candidates,
		usage_metadata: resp.usage.as_ref().map(|u| types::UsageMetadata {
			prompt_token_count: u.prompt_tokens,
			candidates_token_count: u.completion_tokens,
			total_token_count: u.total_tokens,
		}),
		model_version: if resp.model.is_empty() {
			None
		} else {
			Some(resp.model.clone())
		},
		response_id: if resp.id.is_empty() {
			None
		} else {
			Some(resp.id.clone())
		},
	}
}

pub fn parse_error(bytes: &Bytes) -> WireError {
	match serde_json::from_slice::<types::ErrorResponse>(bytes) {
		Ok(e) => WireError {
			kind: ErrorKind::classify(e.error.status.as_deref(), None),
			message: e.error.message,
			code: e.error.status,
		},
		Err(_) => WireError::unknown(String::from_utf8_lossy(bytes)),
	}
}

pub fn usage_from_wire(u: &types::UsageMetadata) -> Usage {
	Usage {
		prompt_tokens: u.prompt_token_count,
		completion_tokens: u.candidates_token_count,
		total_tokens: u.total_token_count,
	}
}

fn finish_reason_from_str(s: &str) -> FinishReason {
	match s {
		"MAX_TOKENS" => FinishReason::Length,
		"SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" | "SPII" => {
			FinishReason::ContentFilter
		},
		_ => FinishReason::Stop,
	}
}

fn finish_reason_to_str(f: FinishReason) -> &'static str {
	match f {
		FinishReason::Stop | FinishReason::ToolCalls => "STOP",
		FinishReason::Length => "MAX_TOKENS",
		FinishReason::ContentFilter => "SAFETY",
	}
}

fn parse_content(c: &types::Content) -> Message {
	let role = match c.role.as_deref() {
		Some("model") => Role::Assistant,
		_ => Role::User,
	};
	let mut parts = Vec::new();
	for p in &c.parts {
		if let Some(text) = &p.text {
			parts.push(ContentPart::Text { text: text.clone() });
		}
		if let Some(blob) = &p.inline_data {
			let source = MediaSource::Base64 {
				media_type: blob.mime_type.clone(),
				data: blob.data.clone(),
			};
			parts.push(media_part(&blob.mime_type, source));
		}
		if let Some(file) = &p.file_data {
			let source = MediaSource::Url {
				url: file.file_uri.clone(),
			};
			parts.push(media_part(file.mime_type.as_deref().unwrap_or(""), source));
		}
		if let Some(fc) = &p.function_call {
			parts.push(ContentPart::ToolUse {
				id: format!("call_{}", uuid::Uuid::new_v4().simple()),
				name: fc.name.clone(),
				input: fc.args.clone().unwrap_or(Value::Null),
			});
		}
		if let Some(fr) = &p.function_response {
			parts.push(ContentPart::ToolResult {
				tool_use_id: fr.name.clone(),
				content: fr.response.to_string(),
				is_error: false,
			});
		}
	}
	if parts.len() == 1
		&& let ContentPart::Text { text } = &parts[0]
	{
		return Message {
			role,
			content: MessageContent::Text(text.clone()),
		};
	}
	Message {
		role,
		content: MessageContent::Parts(parts),
	}
}

fn media_part(mime: &str, source: MediaSource) -> ContentPart {
	if mime.starts_with("audio/") {
		ContentPart::Audio { source }
	} else if mime.starts_with("video/") {
		ContentPart::Video { source }
	} else {
		ContentPart::Image { source }
	}
}

fn build_content(m: &Message) -> types::Content {
	let role = match m.role {
		Role::Assistant => "model",
		_ => "user",
	};
	let parts = match &m.content {
		MessageContent::Text(t) => vec![types::Part {
			text: Some(t.clone()),
			..Default::default()
		}],
		MessageContent::Parts(ps) => ps
			.iter()
			.map(|p| match p {
				ContentPart::Text { text } => types::Part {
					text: Some(text.clone()),
					..Default::default()
				},
				ContentPart::Image { source }
				| ContentPart::Audio { source }
				| ContentPart::Video { source } => match source {
					MediaSource::Base64 { media_type, data } => types::Part {
						inline_data: Some(types::Blob {
							mime_type: media_type.clone(),
							data: data.clone(),
						}),
						..Default::default()
					},
					MediaSource::Url { url } => types::Part {
						file_data: Some(types::FileData {
							mime_type: None,
							file_uri: url.clone(),
						}),
						..Default::default()
					},
				},
				ContentPart::ToolUse { name, input, .. } => types::Part {
					function_call: Some(types::FunctionCall {
						name: name.clone(),
						args: Some(input.clone()),
					}),
					..Default::default()
				},
				ContentPart::ToolResult {
					tool_use_id,
					content,
					..
				} => types::Part {
					function_response: Some(types::FunctionResponse {
						name: tool_use_id.clone(),
						response: serde_json::from_str(content)
							.unwrap_or_else(|_| json!({ "result": content })),
					}),
					..Default::default()
				},
			})
			.collect(),
	};
	types::Content {
		role: Some(role.to_string()),
		parts,
	}
}

/// Parse streamed response objects; Gemini has no explicit stop marker, so
/// the terminal `End` is emitted by `finish` at EOF.
#[derive(Default)]
pub struct StreamParser {
	started: bool,
	ended: bool,
	tool_count: u32,
	finish_reason: Option<FinishReason>,
	usage: Option<Usage>,
}

impl StreamParserState for StreamParser {
	fn parse(&mut self, frame: &SseFrame) -> Result<Vec<StreamEvent>, AdapterError> {
		let chunk: types::Response =
			serde_json::from_str(&frame.data).map_err(AdapterError::StreamParsing)?;
		let mut out = Vec::new();
		if !self.started {
			self.started = true;
			out.push(StreamEvent::Start {
				id: chunk.response_id.clone().unwrap_or_default(),
				model: chunk.model_version.clone().unwrap_or_default(),
			});
		}
		for cand in &chunk.candidates {
			for part in cand.content.iter().flat_map(|c| c.parts.iter()) {
				if let Some(text) = &part.text {
					if part.thought == Some(true) {
						out.push(StreamEvent::Reasoning {
							delta: text.clone(),
						});
					} else {
						out.push(StreamEvent::Content {
							index: cand.index.unwrap_or(0),
							delta: text.clone(),
						});
					}
				}
				if let Some(fc) = &part.function_call {
					let ordinal = self.tool_count;
					self.tool_count += 1;
					out.push(StreamEvent::ToolCall {
						index: ordinal,
						id: Some(format!("call_{}", uuid::Uuid::new_v4().simple())),
						name: Some(fc.name.clone()),
						arguments_delta: Some(fc.args.clone().unwrap_or(Value::Null).to_string()),
					});
				}
			}
			if let Some(r) = cand.finish_reason.as_deref() {
				let reason = if self.tool_count > 0 && r == "STOP" {
					FinishReason::ToolCalls
				} else {
					finish_reason_from_str(r)
				};
				self.finish_reason = Some(reason);
			}
		}
		if let Some(u) = &chunk.usage_metadata {
			self.usage = Some(usage_from_wire(u));
		}
		Ok(out)
	}

	fn finish(&mut self) -> Vec<StreamEvent> {
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

/// Build streamed response objects. Tool-call argument deltas accumulate and
/// flush as complete `functionCall` parts in the final frame, the way the
/// upstream emits them.
pub struct StreamBuilder {
	model: String,
	id: String,
	tools: Vec<(u32, Option<String>, String)>,
}

impl StreamBuilder {
	pub fn new() -> StreamBuilder {
		StreamBuilder {
			model: String::new(),
			id: String::new(),
			tools: Vec::new(),
		}
	}

	fn frame(&self, candidates: Vec<types::Candidate>, usage: Option<types::UsageMetadata>) -> SseFrame {
		let chunk = types::Response {
			candidates,
			usage_metadata: usage,
			model_version: if self.model.is_empty() {
				None
			} else {
				Some(self.model.clone())
			},
			response_id: if self.id.is_empty() {
				None
			} else {
				Some(self.id.clone())
			},
		};
		SseFrame::data(serde_json::to_string(&chunk).expect("chunk serialization cannot fail"))
	}

	fn text_candidate(index: u32, text: &str, thought: bool) -> types::Candidate {
		types::Candidate {
			content: Some(types::Content {
				role: Some("model".to_string()),
				parts: vec![types::Part {
					text: Some(text.to_string()),
					thought: if thought { Some(true) } else { None },
					..Default::default()
				}],
			}),
			finish_reason: None,
			index: Some(index),
		}
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
				vec![]
			},
			StreamEvent::Content { index, delta } => {
				vec![self.frame(vec![Self::text_candidate(*index, delta, false)], None)]
			},
			StreamEvent::Reasoning { delta } => {
				vec![self.frame(vec![Self::text_candidate(0, delta, true)], None)]
			},
			StreamEvent::ToolCall {
				index,
				name,
				arguments_delta,
				..
			} => {
				match self.tools.iter_mut().find(|(i, _, _)| i == index) {
					Some((_, existing_name, args)) => {
						if existing_name.is_none() {
							*existing_name = name.clone();
						}
						if let Some(delta) = arguments_delta {
							args.push_str(delta);
						}
					},
					None => self.tools.push((
						*index,
						name.clone(),
						arguments_delta.clone().unwrap_or_default(),
					)),
				}
				vec![]
			},
			StreamEvent::End {
				finish_reason,
				usage,
			} => {
				let mut parts = Vec::new();
				for (_, name, args) in self.tools.drain(..) {
					parts.push(types::Part {
						function_call: Some(types::FunctionCall {
							name: name.unwrap_or_default(),
							args: serde_json::from_str(&args).ok(),
						}),
						..Default::default()
					});
				}
				let candidate = types::Candidate {
					content: if parts.is_empty() {
						None
					} else {
						Some(types::Content {
							role: Some("model".to_string()),
							parts,
						})
					},
					finish_reason: Some(
						finish_reason_to_str(finish_reason.unwrap_or(FinishReason::Stop)).to_string(),
					),
					index: Some(0),
				};
				vec![self.frame(
					vec![candidate],
					usage.as_ref().map(|u| types::UsageMetadata {
						prompt_token_count: u.prompt_tokens,
						candidates_token_count: u.completion_tokens,
						total_token_count: u.total_tokens,
					}),
				)]
			},
			StreamEvent::Error { .. } => vec![],
		}
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
	#[serde(rename_all = "camelCase")]
	pub struct Request {
		/// Not part of the public wire format; the route layer injects the
		/// URL-borne model here before parsing.
		#[serde(skip_serializing_if = "Option::is_none")]
		pub model: Option<String>,
		pub contents: Vec<Content>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub system_instruction: Option<Content>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub tools: Option<Vec<Tool>>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub tool_config: Option<ToolConfig>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub generation_config: Option<GenerationConfig>,
		#[serde(flatten, default, skip_serializing_if = "is_empty")]
		pub rest: Map<String, Value>,
	}

	#[derive(Debug, Clone, Default, Serialize, Deserialize)]
	pub struct Content {
		#[serde(skip_serializing_if = "Option::is_none")]
		pub role: Option<String>,
		#[serde(default)]
		pub parts: Vec<Part>,
	}

	#[derive(Debug, Clone, Default, Serialize, Deserialize)]
	#[serde(rename_all = "camelCase")]
	pub struct Part {
		#[serde(skip_serializing_if = "Option::is_none")]
		pub text: Option<String>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub inline_data: Option<Blob>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub file_data: Option<FileData>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub function_call: Option<FunctionCall>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub function_response: Option<FunctionResponse>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub thought: Option<bool>,
	}

	#[derive(Debug, Clone, Serialize, Deserialize)]
	#[serde(rename_all = "camelCase")]
	pub struct Blob {
		pub mime_type: String,
		pub data: String,
	}

	#[derive(Debug, Clone, Serialize, Deserialize)]
	#[serde(rename_all = "camelCase")]
	pub struct FileData {
		#[serde(skip_serializing_if = "Option::is_none")]
		pub mime_type: Option<String>,
		pub file_uri: String,
	}

	#[derive(Debug, Clone, Serialize, Deserialize)]
	pub struct FunctionCall {
		pub name: String,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub args: Option<Value>,
	}

	#[derive(Debug, Clone, Serialize, Deserialize)]
	pub struct FunctionResponse {
		pub name: String,
		pub response: Value,
	}

	#[derive(Debug, Clone, Serialize, Deserialize)]
	#[serde(rename_all = "camelCase")]
	pub struct Tool {
		#[serde(skip_serializing_if = "Option::is_none")]
		pub function_declarations: Option<Vec<FunctionDeclaration>>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub google_search: Option<Value>,
	}

	#[derive(Debug, Clone, Serialize, Deserialize)]
	pub struct FunctionDeclaration {
		pub name: String,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub description: Option<String>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub parameters: Option<Value>,
	}

	#[derive(Debug, Clone, Serialize, Deserialize)]
	#[serde(rename_all = "camelCase")]
	pub struct ToolConfig {
		#[serde(skip_serializing_if = "Option::is_none")]
		pub function_calling_config: Option<FunctionCallingConfig>,
	}

	#[derive(Debug, Clone, Serialize, Deserialize)]
	#[serde(rename_all = "camelCase")]
	pub struct FunctionCallingConfig {
		#[serde(skip_serializing_if = "Option::is_none")]
		pub mode: Option<String>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub allowed_function_names: Option<Vec<String>>,
	}

	#[derive(Debug, Clone, Default, Serialize, Deserialize)]
	#[serde(rename_all = "camelCase")]
	pub struct GenerationConfig {
		#[serde(skip_serializing_if = "Option::is_none")]
		pub temperature: Option<f64>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub top_p: Option<f64>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub max_output_tokens: Option<u64>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub stop_sequences: Option<Vec<String>>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub presence_penalty: Option<f64>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub frequency_penalty: Option<f64>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub seed: Option<i64>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub response_mime_type: Option<String>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub thinking_config: Option<ThinkingConfig>,
	}

	#[derive(Debug, Clone, Serialize, Deserialize)]
	#[serde(rename_all = "camelCase")]
	pub struct ThinkingConfig {
		#[serde(skip_serializing_if = "Option::is_none")]
		pub thinking_budget: Option<u64>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub include_thoughts: Option<bool>,
	}

	#[derive(Debug, Clone, Default, Serialize, Deserialize)]
	#[serde(rename_all = "camelCase")]
	pub struct Response {
		#[serde(default)]
		pub candidates: Vec<Candidate>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub usage_metadata: Option<UsageMetadata>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub model_version: Option<String>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub response_id: Option<String>,
	}

	#[derive(Debug, Clone, Serialize, Deserialize)]
	#[serde(rename_all = "camelCase")]
	pub struct Candidate {
		#[serde(skip_serializing_if = "Option::is_none")]
		pub content: Option<Content>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub finish_reason: Option<String>,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub index: Option<u32>,
	}

	#[derive(Debug, Clone, Default, Serialize, Deserialize)]
	#[serde(rename_all = "camelCase")]
	pub struct UsageMetadata {
		#[serde(default)]
		pub prompt_token_count: u64,
		#[serde(default)]
		pub candidates_token_count: u64,
		#[serde(default)]
		pub total_token_count: u64,
	}

	#[derive(Debug, Clone, Serialize, Deserialize)]
	pub struct ErrorResponse {
		pub error: ErrorBody,
	}

	#[derive(Debug, Clone, Serialize, Deserialize)]
	pub struct ErrorBody {
		#[serde(skip_serializing_if = "Option::is_none")]
		pub code: Option<i64>,
		pub message: String,
		#[serde(skip_serializing_if = "Option::is_none")]
		pub status: Option<String>,
	}
}
