//! Dialect adapters.
//!
//! The eight dialects form a closed set; `AdapterKind` dispatches by match,
//! registered once at startup through configuration. Adapters are value
//! types with no shared state; everything stateful (stream parse/build)
//! lives in per-request machines returned by `stream_parser` and
//! `stream_builder`.

use amux_core::strng::Strng;
use bytes::Bytes;
use http::{HeaderMap, HeaderValue, header};
use serde::{Deserialize, Serialize};

use crate::llm::ir::{ChatRequest, ChatResponse, StreamEvent, WireError};
use crate::parse::sse::SseFrame;

pub mod anthropic;
pub mod deepseek;
pub mod google;
pub mod ir;
pub mod moonshot;
pub mod openai;
pub mod qwen;
pub mod responses;
pub mod zhipu;

#[cfg(test)]
mod tests;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdapterKind {
	#[serde(rename = "openai")]
	OpenAI,
	#[serde(rename = "openai-responses")]
	OpenAIResponses,
	#[serde(rename = "anthropic")]
	Anthropic,
	#[serde(rename = "deepseek")]
	DeepSeek,
	#[serde(rename = "moonshot")]
	Moonshot,
	#[serde(rename = "qwen")]
	Qwen,
	#[serde(rename = "zhipu")]
	Zhipu,
	#[serde(rename = "google")]
	Google,
}

impl AdapterKind {
	pub const ALL: [AdapterKind; 8] = [
		AdapterKind::OpenAI,
		AdapterKind::OpenAIResponses,
		AdapterKind::Anthropic,
		AdapterKind::DeepSeek,
		AdapterKind::Moonshot,
		AdapterKind::Qwen,
		AdapterKind::Zhipu,
		AdapterKind::Google,
	];

	pub fn name(&self) -> Strng {
		match self {
			AdapterKind::OpenAI => openai::NAME,
			AdapterKind::OpenAIResponses => responses::NAME,
			AdapterKind::Anthropic => anthropic::NAME,
			AdapterKind::DeepSeek => deepseek::NAME,
			AdapterKind::Moonshot => moonshot::NAME,
			AdapterKind::Qwen => qwen::NAME,
			AdapterKind::Zhipu => zhipu::NAME,
			AdapterKind::Google => google::NAME,
		}
	}

	pub fn from_name(name: &str) -> Option<AdapterKind> {
		AdapterKind::ALL
			.into_iter()
			.find(|k| k.name().as_str() == name)
	}

	pub fn capabilities(&self) -> Capabilities {
		match self {
			AdapterKind::OpenAI => openai_caps(),
			AdapterKind::OpenAIResponses => Capabilities {
				logprobs: false,
				..openai_caps()
			},
			AdapterKind::Anthropic => Capabilities {
				json_mode: false,
				logprobs: false,
				seed: false,
				..openai_caps()
			},
			AdapterKind::DeepSeek => Capabilities {
				vision: false,
				multimodal: false,
				web_search: false,
				..openai_caps()
			},
			AdapterKind::Moonshot => Capabilities {
				reasoning: false,
				..openai_caps()
			},
			AdapterKind::Qwen => Capabilities {
				logprobs: false,
				..openai_caps()
			},
			AdapterKind::Zhipu => Capabilities {
				logprobs: false,
				seed: false,
				..openai_caps()
			},
			AdapterKind::Google => Capabilities {
				logprobs: false,
				..openai_caps()
			},
		}
	}

	pub fn default_base_url(&self) -> &'static str {
		match self {
			AdapterKind::OpenAI | AdapterKind::OpenAIResponses => openai::DEFAULT_BASE_URL,
			AdapterKind::Anthropic => anthropic::DEFAULT_BASE_URL,
			AdapterKind::DeepSeek => deepseek::DEFAULT_BASE_URL,
			AdapterKind::Moonshot => moonshot::DEFAULT_BASE_URL,
			AdapterKind::Qwen => qwen::DEFAULT_BASE_URL,
			AdapterKind::Zhipu => zhipu::DEFAULT_BASE_URL,
			AdapterKind::Google => google::DEFAULT_BASE_URL,
		}
	}

	/// The upstream chat path used when the provider row does not override it.
	/// May contain a `{model}` placeholder (Google).
	pub fn default_chat_path(&self) -> &'static str {
		match self {
			AdapterKind::OpenAI => openai::DEFAULT_CHAT_PATH,
			AdapterKind::OpenAIResponses => responses::DEFAULT_CHAT_PATH,
			AdapterKind::Anthropic => anthropic::DEFAULT_CHAT_PATH,
			AdapterKind::DeepSeek => deepseek::DEFAULT_CHAT_PATH,
			AdapterKind::Moonshot => moonshot::DEFAULT_CHAT_PATH,
			AdapterKind::Qwen => qwen::DEFAULT_CHAT_PATH,
			AdapterKind::Zhipu => zhipu::DEFAULT_CHAT_PATH,
			AdapterKind::Google => google::DEFAULT_CHAT_PATH,
		}
	}

	/// The local endpoint a conversion proxy mounts for this inbound dialect.
	pub fn default_endpoint(&self) -> &'static str {
		match self {
			AdapterKind::OpenAI
			| AdapterKind::DeepSeek
			| AdapterKind::Moonshot
			| AdapterKind::Qwen
			| AdapterKind::Zhipu => "/v1/chat/completions",
			AdapterKind::Anthropic => "/v1/messages",
			AdapterKind::OpenAIResponses => "/v1/responses",
			AdapterKind::Google => "/v1beta/models/{model}:streamGenerateContent",
		}
	}

	pub fn parse_request(&self, bytes: &Bytes) -> Result<ChatRequest, AdapterError> {
		match self {
			AdapterKind::OpenAI => openai::parse_request(bytes),
			AdapterKind::OpenAIResponses => responses::parse_request(bytes),
			AdapterKind::Anthropic => anthropic::parse_request(bytes),
			AdapterKind::DeepSeek | AdapterKind::Moonshot | AdapterKind::Qwen | AdapterKind::Zhipu => {
				openai::parse_request(bytes)
			},
			AdapterKind::Google => google::parse_request(bytes),
		}
	}

	pub fn build_request(&self, req: &ChatRequest) -> Result<Vec<u8>, AdapterError> {
		match self {
			AdapterKind::OpenAI => openai::build_request(req),
			AdapterKind::OpenAIResponses => responses::build_request(req),
			AdapterKind::Anthropic => anthropic::build_request(req),
			AdapterKind::DeepSeek | AdapterKind::Moonshot | AdapterKind::Qwen | AdapterKind::Zhipu => {
				openai::build_request(req)
			},
			AdapterKind::Google => google::build_request(req),
		}
	}

	pub fn parse_response(&self, bytes: &Bytes) -> Result<ChatResponse, AdapterError> {
		match self {
			AdapterKind::OpenAI => openai::parse_response(bytes),
			AdapterKind::OpenAIResponses => responses::parse_response(bytes),
			AdapterKind::Anthropic => anthropic::parse_response(bytes),
			AdapterKind::DeepSeek | AdapterKind::Moonshot | AdapterKind::Qwen | AdapterKind::Zhipu => {
				openai::parse_response(bytes)
			},
			AdapterKind::Google => google::parse_response(bytes),
		}
	}

	pub fn build_response(&self, resp: &ChatResponse) -> Result<Vec<u8>, AdapterError> {
		match self {
			AdapterKind::OpenAI => openai::build_response(resp),
			AdapterKind::OpenAIResponses => responses::build_response(resp),
			AdapterKind::Anthropic => anthropic::build_response(resp),
			AdapterKind::DeepSeek | AdapterKind::Moonshot | AdapterKind::Qwen | AdapterKind::Zhipu => {
				openai::build_response(resp)
			},
			AdapterKind::Google => google::build_response(resp),
		}
	}

	/// Never fails; unparseable bodies are carried verbatim as `Unknown`.
	pub fn parse_error(&self, bytes: &Bytes) -> WireError {
		match self {
			AdapterKind::OpenAI
			| AdapterKind::DeepSeek
			| AdapterKind::Moonshot
			| AdapterKind::Qwen
			| AdapterKind::Zhipu
			| AdapterKind::OpenAIResponses => openai::parse_error(bytes),
			AdapterKind::Anthropic => anthropic::parse_error(bytes),
			AdapterKind::Google => google::parse_error(bytes),
		}
	}

	pub fn stream_parser(&self) -> Box<dyn StreamParserState + Send> {
		match self {
			AdapterKind::OpenAI
			| AdapterKind::DeepSeek
			| AdapterKind::Moonshot
			| AdapterKind::Qwen
			| AdapterKind::Zhipu => Box::new(openai::StreamParser::default()),
			AdapterKind::OpenAIResponses => Box::new(responses::StreamParser::default()),
			AdapterKind::Anthropic => Box::new(anthropic::StreamParser::default()),
			AdapterKind::Google => Box::new(google::StreamParser::default()),
		}
	}

	pub fn stream_builder(&self) -> Box<dyn StreamBuilderState + Send> {
		match self {
			AdapterKind::OpenAI
			| AdapterKind::DeepSeek
			| AdapterKind::Moonshot
			| AdapterKind::Qwen
			| AdapterKind::Zhipu => Box::new(openai::StreamBuilder::new()),
			AdapterKind::OpenAIResponses => Box::new(responses::StreamBuilder::new()),
			AdapterKind::Anthropic => Box::new(anthropic::StreamBuilder::new()),
			AdapterKind::Google => Box::new(google::StreamBuilder::new()),
		}
	}

	/// Whether SSE frames to the client carry `event:` names, and whether the
	/// stream ends with a `[DONE]` marker.
	pub fn sse_style(&self) -> SseStyle {
		match self {
			AdapterKind::Anthropic | AdapterKind::OpenAIResponses => SseStyle::NamedEvents,
			AdapterKind::Google => SseStyle::DataOnly,
			_ => SseStyle::DataWithDone,
		}
	}

	/// Install the upstream credential the way this dialect expects it.
	pub fn apply_auth(&self, headers: &mut HeaderMap, key: &str) {
		let Ok(mut value) = HeaderValue::from_str(key) else {
			return;
		};
		value.set_sensitive(true);
		match self {
			AdapterKind::Anthropic => {
				headers.insert("x-api-key", value);
				headers.insert("anthropic-version", HeaderValue::from_static("2023-06-01"));
			},
			AdapterKind::Google => {
				headers.insert("x-goog-api-key", value);
			},
			_ => {
				let Ok(mut bearer) = HeaderValue::from_str(&format!("Bearer {key}")) else {
					return;
				};
				bearer.set_sensitive(true);
				headers.insert(header::AUTHORIZATION, bearer);
			},
		}
	}
}

impl std::fmt::Display for AdapterKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.name().as_str())
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SseStyle {
	/// `event: <type>` + `data:`, no terminator (Anthropic, OpenAI Responses)
	NamedEvents,
	/// `data:` frames plus a final `data: [DONE]` (the OpenAI family)
	DataWithDone,
	/// Bare `data:` frames, no terminator (Google)
	DataOnly,
}

/// Advisory capability record; consulted for fail-fast rejection only, never
/// on the hot path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
	pub streaming: bool,
	pub tools: bool,
	pub vision: bool,
	pub multimodal: bool,
	pub system_prompt: bool,
	pub tool_choice: bool,
	pub reasoning: bool,
	pub web_search: bool,
	pub json_mode: bool,
	pub logprobs: bool,
	pub seed: bool,
}

fn openai_caps() -> Capabilities {
	Capabilities {
		streaming: true,
		tools: true,
		vision: true,
		multimodal: true,
		system_prompt: true,
		tool_choice: true,
		reasoning: true,
		web_search: true,
		json_mode: true,
		logprobs: true,
		seed: true,
	}
}

/// Per-stream parse state: one upstream SSE frame in, zero or more IR events
/// out. `finish` flushes whatever the dialect holds back until end-of-stream.
pub trait StreamParserState {
	fn parse(&mut self, frame: &SseFrame) -> Result<Vec<StreamEvent>, AdapterError>;
	fn finish(&mut self) -> Vec<StreamEvent>;
}

/// Per-stream build state: one IR event in, zero or more wire frames out.
/// `finish` emits the dialect terminator, if any.
pub trait StreamBuilderState {
	fn push(&mut self, event: &StreamEvent) -> Vec<SseFrame>;
	fn finish(&mut self) -> Vec<SseFrame>;
}

#[derive(thiserror::Error, Debug)]
pub enum AdapterError {
	#[error("failed to parse request: {0}")]
	RequestParsing(serde_json::Error),
	#[error("failed to marshal request: {0}")]
	RequestMarshal(serde_json::Error),
	#[error("failed to parse response: {0}")]
	ResponseParsing(serde_json::Error),
	#[error("failed to marshal response: {0}")]
	ResponseMarshal(serde_json::Error),
	#[error("failed to parse stream chunk: {0}")]
	StreamParsing(serde_json::Error),
	#[error("missing field: {0}")]
	MissingField(Strng),
	#[error("model not specified")]
	MissingModel,
	#[error("{0} is not supported by this provider")]
	UnsupportedCapability(&'static str),
}

impl AdapterError {
	/// Configuration-shaped errors (the caller asked for something the target
	/// dialect cannot do) versus malformed input.
	pub fn is_validation(&self) -> bool {
		matches!(
			self,
			AdapterError::RequestParsing(_) | AdapterError::MissingField(_) | AdapterError::MissingModel
		)
	}
}
