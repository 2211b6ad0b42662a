//! The request path: error taxonomy, auth gate, chain resolver, bridge
//! cache, and the route engine.

pub mod auth;
pub mod cache;
pub mod resolver;
pub mod routes;

use bytes::Bytes;

use crate::http::{Response, StatusCode, header};
use crate::llm::AdapterKind;

/// Every failure the gateway can surface, with its wire code, HTTP status,
/// and retryability. Codes become the `code` field of the error envelope.
#[derive(thiserror::Error, Debug)]
pub enum ProxyError {
	#[error("API key required")]
	MissingApiKey,
	#[error("invalid API key")]
	InvalidApiKey,
	#[error("no proxy at this path")]
	ProxyNotFound,
	#[error("provider not found: {0}")]
	ProviderNotFound(String),
	#[error("proxy is disabled: {0}")]
	ProxyDisabled(String),
	#[error("provider is disabled: {0}")]
	ProviderDisabled(String),
	#[error("circular proxy chain detected at {0}")]
	CircularProxy(String),
	#[error("{0}")]
	ModelNotSupported(String),
	#[error(
		"model {0} requires an active mapping; configure one or address a provider directly with the provider/model naming scheme"
	)]
	ModelMappingRequired(String),
	#[error("upstream unreachable: {0}")]
	ProviderUnreachable(String),
	#[error("upstream request timed out")]
	ConnectionTimeout,
	#[error("upstream rate limited")]
	RateLimited,
	/// Upstream returned a non-2xx with a body; forwarded structurally.
	#[error("upstream error ({status})")]
	Upstream { status: StatusCode, body: Bytes },
	#[error("internal error: {0}")]
	Internal(String),
	#[error("invalid request: {0}")]
	InvalidRequest(String),
}

impl ProxyError {
	pub fn code(&self) -> &'static str {
		match self {
			ProxyError::MissingApiKey => "MISSING_API_KEY",
			ProxyError::InvalidApiKey => "INVALID_API_KEY",
			ProxyError::ProxyNotFound => "PROXY_NOT_FOUND",
			ProxyError::ProviderNotFound(_) => "PROVIDER_NOT_FOUND",
			ProxyError::ProxyDisabled(_) => "PROXY_DISABLED",
			ProxyError::ProviderDisabled(_) => "PROVIDER_DISABLED",
			ProxyError::CircularProxy(_) => "CIRCULAR_PROXY",
			ProxyError::ModelNotSupported(_) => "MODEL_NOT_SUPPORTED",
			ProxyError::ModelMappingRequired(_) => "MODEL_MAPPING_REQUIRED",
			ProxyError::ProviderUnreachable(_) => "PROVIDER_UNREACHABLE",
			ProxyError::ConnectionTimeout => "CONNECTION_TIMEOUT",
			ProxyError::RateLimited => "RATE_LIMITED",
			ProxyError::Upstream { .. } => "ADAPTER_ERROR",
			ProxyError::Internal(_) => "INTERNAL_ERROR",
			ProxyError::InvalidRequest(_) => "INVALID_REQUEST",
		}
	}

	pub fn status(&self) -> StatusCode {
		match self {
			ProxyError::MissingApiKey | ProxyError::InvalidApiKey => StatusCode::UNAUTHORIZED,
			ProxyError::ProxyNotFound => StatusCode::NOT_FOUND,
			ProxyError::ProviderNotFound(_) | ProxyError::ProviderDisabled(_) => {
				StatusCode::SERVICE_UNAVAILABLE
			},
			ProxyError::ProxyDisabled(_) => StatusCode::FORBIDDEN,
			ProxyError::CircularProxy(_) | ProxyError::Internal(_) => {
				StatusCode::INTERNAL_SERVER_ERROR
			},
			ProxyError::ModelNotSupported(_)
			| ProxyError::ModelMappingRequired(_)
			| ProxyError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
			ProxyError::ProviderUnreachable(_) => StatusCode::BAD_GATEWAY,
			ProxyError::ConnectionTimeout => StatusCode::GATEWAY_TIMEOUT,
			ProxyError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
			ProxyError::Upstream { status, .. } => *status,
		}
	}

	pub fn retryable(&self) -> bool {
		matches!(
			self,
			ProxyError::ProviderUnreachable(_) | ProxyError::ConnectionTimeout | ProxyError::RateLimited
		)
	}

	/// The error envelope in the inbound dialect's shape. Upstream errors
	/// with a structured body are forwarded verbatim with their status.
	pub fn into_response(self, inbound: AdapterKind) -> Response {
		if let ProxyError::Upstream { status, body } = self {
			return ::http::Response::builder()
				.status(status)
				.header(header::CONTENT_TYPE, "application/json")
				.body(crate::http::Body::from(body))
				.expect("response construction cannot fail");
		}
		let status = self.status();
		let body = envelope_json(inbound, self.code(), &self.to_string());
		::http::Response::builder()
			.status(status)
			.header(header::CONTENT_TYPE, "application/json")
			.body(crate::http::Body::from(body))
			.expect("response construction cannot fail")
	}
}

/// OpenAI-family envelope for everything except Anthropic inbound.
pub fn envelope_json(inbound: AdapterKind, code: &str, message: &str) -> Vec<u8> {
	let value = match inbound {
		AdapterKind::Anthropic => serde_json::json!({
			"type": "error",
			"error": { "type": code, "message": message },
		}),
		_ => serde_json::json!({
			"error": { "message": message, "type": "api_error", "code": code },
		}),
	};
	serde_json::to_vec(&value).expect("envelope serialization cannot fail")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn codes_statuses_and_retryability() {
		let cases: Vec<(ProxyError, &str, u16, bool)> = vec![
			(ProxyError::MissingApiKey, "MISSING_API_KEY", 401, false),
			(ProxyError::InvalidApiKey, "INVALID_API_KEY", 401, false),
			(ProxyError::ProxyNotFound, "PROXY_NOT_FOUND", 404, false),
			(
				ProxyError::ProviderNotFound("p".into()),
				"PROVIDER_NOT_FOUND",
				503,
				false,
			),
			(
				ProxyError::ProxyDisabled("p".into()),
				"PROXY_DISABLED",
				403,
				false,
			),
			(
				ProxyError::ProviderDisabled("p".into()),
				"PROVIDER_DISABLED",
				503,
				false,
			),
			(
				ProxyError::CircularProxy("p".into()),
				"CIRCULAR_PROXY",
				500,
				false,
			),
			(
				ProxyError::ModelMappingRequired("m".into()),
				"MODEL_MAPPING_REQUIRED",
				400,
				false,
			),
			(
				ProxyError::ProviderUnreachable("x".into()),
				"PROVIDER_UNREACHABLE",
				502,
				true,
			),
			(ProxyError::ConnectionTimeout, "CONNECTION_TIMEOUT", 504, true),
			(ProxyError::RateLimited, "RATE_LIMITED", 429, true),
			(
				ProxyError::InvalidRequest("x".into()),
				"INVALID_REQUEST",
				400,
				false,
			),
		];
		for (err, code, status, retryable) in cases {
			assert_eq!(err.code(), code);
			assert_eq!(err.status().as_u16(), status);
			assert_eq!(err.retryable(), retryable, "{code}");
		}
	}

	#[test]
	fn anthropic_envelope_shape() {
		let body = envelope_json(AdapterKind::Anthropic, "CIRCULAR_PROXY", "loop");
		let v: serde_json::Value = serde_json::from_slice(&body).unwrap();
		assert_eq!(v["type"], "error");
		assert_eq!(v["error"]["type"], "CIRCULAR_PROXY");
		assert_eq!(v["error"]["message"], "loop");
	}

	#[test]
	fn openai_envelope_shape() {
		let body = envelope_json(AdapterKind::OpenAI, "INVALID_API_KEY", "nope");
		let v: serde_json::Value = serde_json::from_slice(&body).unwrap();
		assert_eq!(v["error"]["code"], "INVALID_API_KEY");
		assert_eq!(v["error"]["type"], "api_error");
	}
}
