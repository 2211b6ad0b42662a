//! The Bridge: one inbound adapter composed with one outbound adapter
//! around a single request.
//!
//! Hooks are narrow and side-effect-only; the gateway uses them for exactly
//! one job, capturing upstream usage for the log and metric sinks. The
//! usage slot is created per request, never shared across requests on a
//! cached bridge.

use std::time::Duration;

use tracing::debug;

use crate::client::Client;
use crate::http::{Body, HeaderMap, HeaderValue, header};
use crate::llm::ir::{ChatRequest, StreamEvent, Usage};
use crate::llm::{AdapterError, AdapterKind, google};
use crate::parse::sse::{SseDecoder, SseEncoder};
use crate::parse::{passthrough, transform};
use crate::proxy::ProxyError;
use crate::store::Provider;
use crate::telemetry::log::AsyncLog;

#[derive(Debug, Clone)]
pub struct BridgeConfig {
	/// Decrypted upstream credential; absent when the provider has none.
	pub api_key: Option<String>,
	pub base_url: String,
	pub chat_path: String,
	pub timeout: Duration,
}

/// Per-request lifecycle hooks. Side-effect-only; hooks never mutate IR.
#[derive(Debug, Clone, Default)]
pub struct Hooks {
	pub usage: AsyncLog<Usage>,
}

impl Hooks {
	fn observe(&self, event: &StreamEvent) {
		if let StreamEvent::End {
			usage: Some(usage), ..
		} = event
		{
			self.usage.store(Some(*usage));
		}
	}
}

#[derive(Debug)]
pub struct Bridge {
	pub inbound: AdapterKind,
	pub outbound: AdapterKind,
	pub config: BridgeConfig,
}

impl Bridge {
	pub fn new(inbound: AdapterKind, outbound: AdapterKind, config: BridgeConfig) -> Bridge {
		Bridge {
			inbound,
			outbound,
			config,
		}
	}

	/// Build a bridge onto a provider row, with an already-decrypted (or
	/// pass-through) credential.
	pub fn to_provider(
		inbound: AdapterKind,
		provider: &Provider,
		api_key: Option<String>,
		timeout: Duration,
	) -> Bridge {
		Bridge::new(
			inbound,
			provider.adapter,
			BridgeConfig {
				api_key,
				base_url: provider.base_url().trim_end_matches('/').to_string(),
				chat_path: provider.chat_path().to_string(),
				timeout,
			},
		)
	}

	/// Advisory capability gate; rejects combinations the outbound dialect
	/// cannot express before any upstream traffic happens.
	pub fn check_capabilities(&self, req: &ChatRequest) -> Result<(), ProxyError> {
		let caps = self.outbound.capabilities();
		let unsupported = |what: &str| {
			Err(ProxyError::ModelNotSupported(format!(
				"{what} is not supported by {}",
				self.outbound.name()
			)))
		};
		if req.stream && !caps.streaming {
			return unsupported("streaming");
		}
		if (!req.tools.is_empty() || req.tool_choice.is_some()) && !caps.tools {
			return unsupported("tool calling");
		}
		if !caps.vision && req.messages.iter().any(has_image) {
			return unsupported("image input");
		}
		if req.generation.web_search && !caps.web_search {
			return unsupported("web search");
		}
		if matches!(
			req.generation.response_format,
			Some(crate::llm::ir::ResponseFormat::JsonObject)
				| Some(crate::llm::ir::ResponseFormat::JsonSchema { .. })
		) && !caps.json_mode
		{
			return unsupported("JSON output mode");
		}
		Ok(())
	}

	fn upstream_url(&self, model: &str, stream: bool) -> String {
		let path = if self.outbound == AdapterKind::Google || self.config.chat_path.contains("{model}")
		{
			google::resolve_path(&self.config.chat_path, model, stream)
		} else {
			self.config.chat_path.clone()
		};
		format!("{}{}", self.config.base_url, path)
	}

	fn request_headers(&self) -> HeaderMap {
		let mut headers = HeaderMap::new();
		headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
		if let Some(key) = &self.config.api_key {
			self.outbound.apply_auth(&mut headers, key);
		}
		headers
	}

	/// Non-streaming request/response round trip: parse and build on both
	/// sides, returning the inbound-dialect body bytes.
	pub async fn chat(
		&self,
		client: &Client,
		req: &ChatRequest,
		hooks: &Hooks,
	) -> Result<Vec<u8>, ProxyError> {
		self.check_capabilities(req)?;
		let body = self.outbound.build_request(req).map_err(adapter_to_proxy)?;
		let url = self.upstream_url(&req.model, false);
		let resp = client
			.call(&url, self.request_headers(), body, self.config.timeout)
			.await?;
		if resp.status == crate::http::StatusCode::TOO_MANY_REQUESTS && resp.bytes.is_empty() {
			return Err(ProxyError::RateLimited);
		}
		if !resp.status.is_success() {
			return Err(ProxyError::Upstream {
				status: resp.status,
				body: resp.bytes,
			});
		}
		let ir = self
			.outbound
			.parse_response(&resp.bytes)
			.map_err(|e| ProxyError::Internal(format!("failed to parse upstream response: {e}")))?;
		if let Some(usage) = ir.usage {
			hooks.usage.store(Some(usage));
		}
		self.inbound.build_response(&ir).map_err(adapter_to_proxy)
	}

	/// Streaming round trip: the returned body re-frames upstream SSE into
	/// the inbound dialect, one chunk at a time, pulled by the client.
	pub async fn chat_stream(
		&self,
		client: &Client,
		req: &ChatRequest,
		hooks: &Hooks,
	) -> Result<Body, ProxyError> {
		self.check_capabilities(req)?;
		let body = self.outbound.build_request(req).map_err(adapter_to_proxy)?;
		let url = self.upstream_url(&req.model, true);
		let resp = client
			.call_streaming(&url, self.request_headers(), body, self.config.timeout)
			.await?;
		if !resp.status.is_success() {
			let bytes = crate::http::to_bytes(resp.body)
				.await
				.unwrap_or_default();
			return Err(ProxyError::Upstream {
				status: resp.status,
				body: bytes,
			});
		}

		let mut parser = self.outbound.stream_parser();
		let mut builder = self.inbound.stream_builder();
		let hooks = hooks.clone();
		Ok(transform::parser(
			resp.body,
			SseDecoder::new(),
			SseEncoder,
			move |item| {
				let mut frames = Vec::new();
				let at_end = item.is_none();
				let events = match item {
					Some(frame) => match parser.parse(&frame) {
						Ok(events) => events,
						Err(err) => {
							// Upstream noise; skip the chunk
							debug!("failed to parse stream chunk: {err}");
							vec![]
						},
					},
					None => parser.finish(),
				};
				for event in &events {
					hooks.observe(event);
					frames.extend(builder.push(event));
				}
				if at_end {
					frames.extend(builder.finish());
				}
				frames
			},
		))
	}

	/// Same-dialect streaming: bytes pass through untouched while the
	/// outbound parser observes events for usage bookkeeping.
	pub fn observe_stream(outbound: AdapterKind, body: Body, hooks: &Hooks) -> Body {
		let mut parser = outbound.stream_parser();
		let hooks = hooks.clone();
		passthrough::parser(body, SseDecoder::new(), move |item| {
			let events = match item {
				Some(frame) => match parser.parse(&frame) {
					Ok(events) => events,
					Err(err) => {
						debug!("failed to parse stream chunk: {err}");
						vec![]
					},
				},
				None => parser.finish(),
			};
			for event in &events {
				hooks.observe(event);
			}
		})
	}
}

fn has_image(m: &crate::llm::ir::Message) -> bool {
	match &m.content {
		crate::llm::ir::MessageContent::Text(_) => false,
		crate::llm::ir::MessageContent::Parts(parts) => parts
			.iter()
			.any(|p| matches!(p, crate::llm::ir::ContentPart::Image { .. })),
	}
}

fn adapter_to_proxy(err: AdapterError) -> ProxyError {
	if err.is_validation() {
		ProxyError::InvalidRequest(err.to_string())
	} else {
		ProxyError::Internal(err.to_string())
	}
}
