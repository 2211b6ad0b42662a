//! The canonical in-process representation of chat traffic.
//!
//! Every dialect parses into these types and builds back out of them; they
//! are the pivot between any two adapters. Wire-level serde stays in the
//! dialect modules; the IR itself never hits the network.

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
	System,
	User,
	Assistant,
	Tool,
}

impl Role {
	pub fn as_str(&self) -> &'static str {
		match self {
			Role::System => "system",
			Role::User => "user",
			Role::Assistant => "assistant",
			Role::Tool => "tool",
		}
	}
}

#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
	pub model: String,
	pub messages: Vec<Message>,
	/// Leading system messages are lifted here on parse and re-inserted on
	/// build in whatever form the target dialect uses.
	pub system: Option<String>,
	pub tools: Vec<ToolDef>,
	pub tool_choice: Option<ToolChoice>,
	pub stream: bool,
	pub generation: GenerationParams,
	/// Dialect-private options that survive a same-dialect round trip but are
	/// dropped on cross-dialect conversion.
	pub extensions: serde_json::Map<String, Value>,
	/// The original wire object, kept for debugging and body logging.
	pub raw: Option<Value>,
}

impl ChatRequest {
	/// Whether the caller opted into reasoning/thinking output, in any
	/// dialect's phrasing of it.
	pub fn wants_reasoning(&self) -> bool {
		self
			.generation
			.reasoning
			.as_ref()
			.map(|r| r.enabled)
			.unwrap_or(false)
	}
}

#[derive(Debug, Clone)]
pub struct Message {
	pub role: Role,
	pub content: MessageContent,
}

impl Message {
	pub fn text(role: Role, text: impl Into<String>) -> Self {
		Message {
			role,
			content: MessageContent::Text(text.into()),
		}
	}
}

#[derive(Debug, Clone)]
pub enum MessageContent {
	Text(String),
	Parts(Vec<ContentPart>),
}

impl MessageContent {
	pub fn as_text(&self) -> Option<&str> {
		match self {
			MessageContent::Text(t) => Some(t.as_str()),
			MessageContent::Parts(_) => None,
		}
	}

	/// Lossy downgrade used when a part cannot be expressed in the target
	/// dialect: concatenates the textual pieces and drops the rest.
	pub fn flatten_text(&self) -> String {
		match self {
			MessageContent::Text(t) => t.clone(),
			MessageContent::Parts(parts) => {
				let mut out = String::new();
				for p in parts {
					if let ContentPart::Text { text } = p {
						if !out.is_empty() {
							out.push('\n');
						}
						out.push_str(text);
					}
				}
				out
			},
		}
	}
}

#[derive(Debug, Clone)]
pub enum ContentPart {
	Text {
		text: String,
	},
	Image {
		source: MediaSource,
	},
	Audio {
		source: MediaSource,
	},
	Video {
		source: MediaSource,
	},
	ToolUse {
		id: String,
		name: String,
		input: Value,
	},
	ToolResult {
		tool_use_id: String,
		content: String,
		is_error: bool,
	},
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
	Base64 { media_type: String, data: String },
	Url { url: String },
}

impl MediaSource {
	/// `data:<media-type>;base64,<payload>` URLs become inline base64 sources;
	/// anything else stays a URL reference.
	pub fn from_url(url: &str) -> MediaSource {
		if let Some(rest) = url.strip_prefix("data:")
			&& let Some((meta, data)) = rest.split_once(',')
			&& let Some(media_type) = meta.strip_suffix(";base64")
		{
			return MediaSource::Base64 {
				media_type: media_type.to_string(),
				data: data.to_string(),
			};
		}
		MediaSource::Url {
			url: url.to_string(),
		}
	}

	pub fn to_url(&self) -> String {
		match self {
			MediaSource::Base64 { media_type, data } => {
				format!("data:{media_type};base64,{data}")
			},
			MediaSource::Url { url } => url.clone(),
		}
	}
}

#[derive(Debug, Clone)]
pub struct ToolDef {
	pub name: String,
	pub description: Option<String>,
	/// JSON schema for the tool arguments.
	pub parameters: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolChoice {
	Auto,
	None,
	Required,
	Function { name: String },
}

#[derive(Debug, Clone, Default)]
pub struct GenerationParams {
	pub temperature: Option<f64>,
	pub top_p: Option<f64>,
	pub max_tokens: Option<u64>,
	pub stop: Vec<String>,
	pub presence_penalty: Option<f64>,
	pub frequency_penalty: Option<f64>,
	pub seed: Option<i64>,
	pub response_format: Option<ResponseFormat>,
	pub reasoning: Option<Reasoning>,
	pub web_search: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseFormat {
	Text,
	JsonObject,
	JsonSchema { schema: Value },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reasoning {
	pub enabled: bool,
	pub budget_tokens: Option<u64>,
	pub effort: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ChatResponse {
	pub id: String,
	pub model: String,
	pub created: i64,
	pub choices: Vec<Choice>,
	pub usage: Option<Usage>,
	pub system_fingerprint: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Choice {
	pub index: u32,
	pub message: ResponseMessage,
	pub finish_reason: Option<FinishReason>,
}

#[derive(Debug, Clone, Default)]
pub struct ResponseMessage {
	pub content: Option<String>,
	pub reasoning_content: Option<String>,
	pub tool_calls: Vec<ToolCall>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCall {
	pub id: String,
	pub name: String,
	/// JSON-encoded arguments, passed through as the upstream produced them.
	pub arguments: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
	Stop,
	Length,
	ToolCalls,
	ContentFilter,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Usage {
	pub prompt_tokens: u64,
	pub completion_tokens: u64,
	pub total_tokens: u64,
}

impl Usage {
	pub fn new(prompt_tokens: u64, completion_tokens: u64) -> Usage {
		Usage {
			prompt_tokens,
			completion_tokens,
			total_tokens: prompt_tokens + completion_tokens,
		}
	}
}

/// One canonical event of a streamed response.
///
/// Every stream begins with exactly one `Start` and, when the upstream
/// completed normally, ends with exactly one `End`; content, reasoning, and
/// tool-call deltas interleave freely in between.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
	Start {
		id: String,
		model: String,
	},
	Content {
		index: u32,
		delta: String,
	},
	Reasoning {
		delta: String,
	},
	ToolCall {
		index: u32,
		id: Option<String>,
		name: Option<String>,
		arguments_delta: Option<String>,
	},
	End {
		finish_reason: Option<FinishReason>,
		usage: Option<Usage>,
	},
	Error {
		error: WireError,
	},
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	Validation,
	Authentication,
	Permission,
	NotFound,
	RateLimit,
	Api,
	Server,
	Unknown,
}

impl ErrorKind {
	/// Two-step classification: a known error code wins, otherwise the error
	/// type string decides, otherwise `Unknown`.
	pub fn classify(code: Option<&str>, error_type: Option<&str>) -> ErrorKind {
		if let Some(code) = code
			&& let Some(k) = Self::from_code(code)
		{
			return k;
		}
		if let Some(t) = error_type
			&& let Some(k) = Self::from_type(t)
		{
			return k;
		}
		ErrorKind::Unknown
	}

	fn from_code(code: &str) -> Option<ErrorKind> {
		Some(match code {
			"invalid_request_error" | "invalid_argument" | "INVALID_ARGUMENT" => ErrorKind::Validation,
			"invalid_api_key" | "authentication_error" | "UNAUTHENTICATED" => ErrorKind::Authentication,
			"permission_denied" | "PERMISSION_DENIED" | "insufficient_quota" => ErrorKind::Permission,
			"model_not_found" | "not_found_error" | "NOT_FOUND" => ErrorKind::NotFound,
			"rate_limit_exceeded" | "rate_limit_error" | "RESOURCE_EXHAUSTED" => ErrorKind::RateLimit,
			"overloaded_error" | "api_error" => ErrorKind::Api,
			"server_error" | "internal_error" | "INTERNAL" | "UNAVAILABLE" => ErrorKind::Server,
			_ => return None,
		})
	}

	fn from_type(t: &str) -> Option<ErrorKind> {
		Some(match t {
			"invalid_request_error" | "validation_error" => ErrorKind::Validation,
			"authentication_error" => ErrorKind::Authentication,
			"permission_error" | "permission_denied_error" => ErrorKind::Permission,
			"not_found_error" => ErrorKind::NotFound,
			"rate_limit_error" | "rate_limit_exceeded" => ErrorKind::RateLimit,
			"api_error" => ErrorKind::Api,
			"overloaded_error" | "server_error" | "internal_server_error" => ErrorKind::Server,
			_ => return None,
		})
	}
}

/// An upstream error body mapped into the canonical taxonomy.
#[derive(Debug, Clone, PartialEq)]
pub struct WireError {
	pub kind: ErrorKind,
	pub message: String,
	pub code: Option<String>,
}

impl WireError {
	pub fn unknown(message: impl Into<String>) -> WireError {
		WireError {
			kind: ErrorKind::Unknown,
			message: message.into(),
			code: None,
		}
	}
}
