//! Route engine: mounts local paths from configuration and runs the shared
//! request lifecycle: id assignment, source detection, auth, resolution,
//! mapping, streaming decision, dialect framing, and sink emission.

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, ready};
use std::time::Instant;

use amux_core::strng::Strng;
use axum::Router;
use axum::extract::{Extension, Path, State};
use axum::routing::{get, post};
use bytes::Bytes;
use http_body::Body as HttpBody;
use pin_project_lite::pin_project;
use serde_json::{Value, json};
use tracing::warn;

use crate::bridge::{Bridge, Hooks};
use crate::client::Client;
use crate::config::Settings;
use crate::http::{Body, HeaderValue, Request, Response, StatusCode, header};
use crate::llm::ir::Usage;
use crate::llm::{AdapterKind, SseStyle};
use crate::mapping::{self, MappingEngine};
use crate::parse::sse::{SseFrame, encode_frame};
use crate::proxy::auth::{self, KeyDecision};
use crate::proxy::cache::BridgeCache;
use crate::proxy::resolver::resolve_chain;
use crate::proxy::ProxyError;
use crate::store::{CliType, Provider, Store};
use crate::telemetry::log::{LogSink, RequestLogRecord, RequestSource, truncate_body};
use crate::telemetry::metrics::Metrics;

#[derive(Debug, Clone)]
pub enum RouteTarget {
	CodeSwitch(CliType),
	Passthrough(Strng),
	Conversion(Strng),
}

impl RouteTarget {
	fn kind(&self) -> &'static str {
		match self {
			RouteTarget::CodeSwitch(_) => "codeswitch",
			RouteTarget::Passthrough(_) => "passthrough",
			RouteTarget::Conversion(_) => "conversion",
		}
	}
}

pub struct AppInner {
	pub store: Arc<Store>,
	pub settings: Settings,
	pub cache: BridgeCache,
	pub mapping: MappingEngine,
	pub metrics: Arc<Metrics>,
	pub log: Arc<LogSink>,
	pub client: Client,
}

#[derive(Clone)]
pub struct AppState(pub Arc<AppInner>);

impl AppState {
	fn inner(&self) -> &AppInner {
		&self.0
	}
}

/// Build the full router from configuration. Routes must all be installed
/// before the listener starts accepting.
pub fn build_router(state: AppState) -> Router {
	let mut router = Router::new()
		.route("/", get(status_page))
		.route("/health", get(health))
		.route("/metrics", get(metrics_export))
		.route("/v1/proxies", get(list_proxies))
		.route("/code/{cli}/v1/messages", post(chat_entry));

	for p in state.inner().store.providers() {
		if !p.enabled {
			continue;
		}
		let Some(path) = p.passthrough_path.clone().filter(|p| !p.is_empty()) else {
			continue;
		};
		let chat_path = p.chat_path();
		let route_path = match chat_path.find("{model}:") {
			// Google-style action suffix: capture the remainder as a wildcard
			Some(idx) => format!("/providers/{}{}{{*rest}}", path, &chat_path[..idx]),
			None => format!("/providers/{path}{chat_path}"),
		};
		router = router.route(
			&route_path,
			post(chat_entry).layer(Extension(RouteTarget::Passthrough(p.id.clone()))),
		);
		router = router.route(
			&format!("/providers/{path}/v1/models"),
			get(provider_models).layer(Extension(RouteTarget::Passthrough(p.id.clone()))),
		);
	}

	for p in state.inner().store.proxies() {
		if !p.enabled {
			continue;
		}
		let endpoint = p.inbound.default_endpoint();
		let route_path = match endpoint.find("{model}:") {
			Some(idx) => format!("/proxies/{}{}{{*rest}}", p.path, &endpoint[..idx]),
			None => format!("/proxies/{}{}", p.path, endpoint),
		};
		router = router.route(
			&route_path,
			post(chat_entry).layer(Extension(RouteTarget::Conversion(p.id.clone()))),
		);
		router = router.route(
			&format!("/proxies/{}/v1/models", p.path),
			get(proxy_models).layer(Extension(RouteTarget::Conversion(p.id.clone()))),
		);
	}

	let cors = &state.inner().settings.proxy.cors;
	if cors.enabled {
		router = router.layer(cors_layer(&cors.origins));
	}
	router.with_state(state)
}

fn cors_layer(origins: &[String]) -> tower_http::cors::CorsLayer {
	use tower_http::cors::{AllowOrigin, CorsLayer};
	let layer = CorsLayer::new()
		.allow_methods([
			crate::http::Method::GET,
			crate::http::Method::POST,
			crate::http::Method::OPTIONS,
		])
		.allow_headers([
			header::CONTENT_TYPE,
			header::AUTHORIZATION,
			crate::http::HeaderName::from_static("x-request-id"),
		]);
	if origins.iter().any(|o| o == "*") {
		layer.allow_origin(AllowOrigin::any())
	} else {
		let parsed: Vec<HeaderValue> = origins
			.iter()
			.filter_map(|o| HeaderValue::from_str(o).ok())
			.collect();
		layer.allow_origin(AllowOrigin::list(parsed))
	}
}

/// Everything the sinks need about one request; filled as the lifecycle
/// progresses.
struct RequestCtx {
	request_id: String,
	source: RequestSource,
	route_kind: &'static str,
	proxy_id: Option<Strng>,
	provider_id: Option<Strng>,
	passthrough_path: Option<Strng>,
	source_model: String,
	target_model: String,
	request_body: Option<String>,
}

impl RequestCtx {
	fn new(request_id: String, route_kind: &'static str) -> RequestCtx {
		RequestCtx {
			request_id,
			source: RequestSource::Local,
			route_kind,
			proxy_id: None,
			provider_id: None,
			passthrough_path: None,
			source_model: String::new(),
			target_model: String::new(),
			request_body: None,
		}
	}
}

/// Emits the log record and metrics for one finished request. For streaming
/// responses this rides the response body and fires when it completes (or
/// is dropped by a disconnecting client).
struct Finalizer {
	state: AppState,
	ctx: RequestCtx,
	usage: crate::telemetry::log::AsyncLog<Usage>,
	start: Instant,
}

impl Finalizer {
	fn complete(self, status: u16, error: Option<String>, response_body: Option<String>) {
		let inner = self.state.inner();
		let usage = self.usage.take();
		let success = (200..400).contains(&status);
		inner.metrics.record(
			self.ctx.route_kind,
			self.ctx.proxy_id.as_ref(),
			self.ctx.provider_id.as_ref(),
			success,
			status,
			self.start.elapsed().as_millis() as u64,
			usage.map(|u| u.prompt_tokens),
			usage.map(|u| u.completion_tokens),
		);
		inner.metrics.connection_closed();
		inner.log.append(RequestLogRecord {
			request_id: self.ctx.request_id,
			timestamp: chrono::Utc::now(),
			proxy_id: self.ctx.proxy_id,
			provider_id: self.ctx.provider_id,
			passthrough_path: self.ctx.passthrough_path,
			source_model: self.ctx.source_model,
			target_model: self.ctx.target_model,
			status_code: status,
			input_tokens: usage.map(|u| u.prompt_tokens),
			output_tokens: usage.map(|u| u.completion_tokens),
			latency_ms: self.start.elapsed().as_millis() as u64,
			request_body: self.ctx.request_body,
			response_body,
			error,
			source: self.ctx.source,
		});
	}
}

pin_project! {
	/// Wraps a streaming response body: converts a mid-stream transport
	/// failure into a dialect error frame, and fires the finalizer exactly
	/// once when the stream completes, errors, or is dropped.
	struct StreamingBody {
		#[pin]
		inner: Body,
		inbound: AdapterKind,
		finalizer: Option<Finalizer>,
		done: bool,
	}

	impl PinnedDrop for StreamingBody {
		fn drop(this: Pin<&mut Self>) {
			let this = this.project();
			if let Some(f) = this.finalizer.take() {
				// Client went away before the stream finished
				f.complete(499, Some("client disconnected".to_string()), None);
			}
		}
	}
}

impl HttpBody for StreamingBody {
	type Data = Bytes;
	type Error = crate::http::Error;

	fn poll_frame(
		self: Pin<&mut Self>,
		cx: &mut Context<'_>,
	) -> Poll<Option<Result<http_body::Frame<Self::Data>, Self::Error>>> {
		let mut this = self.project();
		if *this.done {
			return Poll::Ready(None);
		}
		match ready!(this.inner.as_mut().poll_frame(cx)) {
			Some(Ok(frame)) => Poll::Ready(Some(Ok(frame))),
			Some(Err(err)) => {
				*this.done = true;
				let message = err.to_string();
				if let Some(f) = this.finalizer.take() {
					f.complete(500, Some(message.clone()), None);
				}
				Poll::Ready(Some(Ok(http_body::Frame::data(error_frame(
					*this.inbound,
					"ADAPTER_ERROR",
					&message,
				)))))
			},
			None => {
				*this.done = true;
				if let Some(f) = this.finalizer.take() {
					f.complete(200, None, None);
				}
				Poll::Ready(None)
			},
		}
	}
}

/// One SSE error frame in the inbound dialect's framing.
fn error_frame(inbound: AdapterKind, code: &str, message: &str) -> Bytes {
	let payload = String::from_utf8(crate::proxy::envelope_json(inbound, code, message))
		.unwrap_or_default();
	let frame = match inbound.sse_style() {
		SseStyle::NamedEvents => SseFrame::named("error", payload),
		SseStyle::DataWithDone | SseStyle::DataOnly => SseFrame::data(payload),
	};
	encode_frame(&frame)
}

async fn chat_entry(
	State(state): State<AppState>,
	target: Option<Extension<RouteTarget>>,
	Path(params): Path<HashMap<String, String>>,
	req: Request,
) -> Response {
	let target = match target {
		Some(Extension(t)) => t,
		// The fixed /code/{cli} routes carry the CLI type in the path
		None => match params.get("cli").and_then(|c| CliType::from_path_segment(c)) {
			Some(cli) => RouteTarget::CodeSwitch(cli),
			None => {
				return with_request_id(
					ProxyError::ProxyNotFound.into_response(AdapterKind::Anthropic),
					&uuid::Uuid::new_v4().to_string(),
				);
			},
		},
	};

	let request_id = uuid::Uuid::new_v4().to_string();
	let start = Instant::now();
	let state2 = state.clone();
	state.inner().metrics.connection_opened();
	let mut ctx = RequestCtx::new(request_id.clone(), target.kind());

	match handle_chat(&state2, &target, &params, req, &mut ctx, start).await {
		Ok(resp) => with_request_id(resp, &request_id),
		Err((err, inbound)) => {
			let code = error_log_code(&err);
			let message = err.to_string();
			let status = err.status().as_u16();
			let resp = err.into_response(inbound);
			let finalizer = Finalizer {
				state: state2,
				ctx,
				usage: Default::default(),
				start,
			};
			finalizer.complete(status, Some(format!("{code}: {message}")), None);
			with_request_id(resp, &request_id)
		},
	}
}

/// Upstream 429s keep their own log code even though the body is forwarded
/// structurally.
fn error_log_code(err: &ProxyError) -> &'static str {
	match err {
		ProxyError::Upstream { status, .. } if *status == StatusCode::TOO_MANY_REQUESTS => {
			"RATE_LIMITED"
		},
		other => other.code(),
	}
}

fn with_request_id(mut resp: Response, request_id: &str) -> Response {
	if let Ok(v) = HeaderValue::from_str(request_id) {
		resp.headers_mut().insert("x-request-id", v);
	}
	resp
}

async fn handle_chat(
	state: &AppState,
	target: &RouteTarget,
	params: &HashMap<String, String>,
	req: Request,
	ctx: &mut RequestCtx,
	start: Instant,
) -> Result<Response, (ProxyError, AdapterKind)> {
	let inner = state.inner();
	let headers = req.headers().clone();
	let uri = req.uri().clone();

	// Resolve the destination first so errors render in the right dialect
	let (inbound, provider, proxy_id) = match target {
		RouteTarget::Conversion(proxy_id) => {
			let proxy = inner
				.store
				.proxy(proxy_id)
				.ok_or((ProxyError::ProxyNotFound, AdapterKind::OpenAI))?;
			let inbound = proxy.inbound;
			let resolved =
				resolve_chain(&inner.store, proxy_id).map_err(|e| (e, inbound))?;
			(inbound, resolved.provider, Some(proxy_id.clone()))
		},
		RouteTarget::Passthrough(provider_id) => {
			let provider = inner.store.provider(provider_id).ok_or((
				ProxyError::ProviderNotFound(provider_id.to_string()),
				AdapterKind::OpenAI,
			))?;
			if !provider.enabled {
				return Err((
					ProxyError::ProviderDisabled(provider_id.to_string()),
					provider.adapter,
				));
			}
			let inbound = provider.adapter;
			(inbound, provider, None)
		},
		// The code-switch provider is only known after mapping; start from
		// the configured switch and let codex prefixes override below
		RouteTarget::CodeSwitch(_) => {
			let inbound = AdapterKind::Anthropic;
			(inbound, Provider::placeholder(), None)
		},
	};
	let mut provider = provider;
	ctx.proxy_id = proxy_id.clone();
	if let RouteTarget::Passthrough(_) = target {
		ctx.passthrough_path = provider.passthrough_path.clone();
	}

	let (decision, source) =
		auth::authenticate(&inner.store, &inner.settings, &headers).map_err(|e| (e, inbound))?;
	ctx.source = source;

	let bytes = crate::http::to_bytes(req.into_body())
		.await
		.map_err(|_| (ProxyError::InvalidRequest("request body too large".into()), inbound))?;

	let mut ir = inbound
		.parse_request(&bytes)
		.map_err(|e| (ProxyError::InvalidRequest(e.to_string()), inbound))?;

	// Google-style endpoints carry the model in the URL, not the body
	if inbound == AdapterKind::Google && ir.model.is_empty() {
		if let Some(model) = params
			.get("model")
			.or_else(|| params.get("rest"))
			.map(|m| m.split(':').next().unwrap_or(m).to_string())
		{
			ir.model = model;
		}
	}

	let query = uri.query().unwrap_or_default();
	let streaming = ir.stream
		|| (inbound == AdapterKind::Google
			&& (query.contains("alt=sse") || uri.path().contains("stream")));
	ir.stream = streaming;
	ctx.source_model = ir.model.clone();
	if inner.settings.logs.save_request_body {
		ctx.request_body = Some(truncate_body(
			&String::from_utf8_lossy(&bytes),
			inner.settings.logs.max_body_size,
		));
	}

	// Model mapping
	match target {
		RouteTarget::Conversion(proxy_id) => {
			if let Some(mapped) = inner
				.mapping
				.conversion_target(&inner.store, proxy_id, &ir.model)
			{
				ir.model = mapped.to_string();
			}
		},
		RouteTarget::CodeSwitch(cli) => {
			let prefixed = mapping::parse_provider_prefix(&ir.model)
				.map(|(kind, rest)| (kind, rest.to_string()));
			if *cli == CliType::Codex
				&& let Some((kind, rest)) = prefixed
			{
				// provider/model addressing overrides the configured switch
				provider = inner.store.provider_by_adapter(kind).ok_or((
					ProxyError::ProviderNotFound(kind.name().to_string()),
					inbound,
				))?;
				ir.model = rest;
			} else {
				let compiled = inner.mapping.code_switch(&inner.store, *cli).ok_or((
					ProxyError::ProviderNotFound(format!(
						"no code-switch configuration for {}",
						cli.as_str()
					)),
					inbound,
				))?;
				provider = inner.store.provider(&compiled.provider_id).ok_or((
					ProxyError::ProviderNotFound(compiled.provider_id.to_string()),
					inbound,
				))?;
				if !provider.enabled {
					return Err((
						ProxyError::ProviderDisabled(provider.id.to_string()),
						inbound,
					));
				}
				match compiled.resolve(&ir.model, ir.wants_reasoning()) {
					Some(mapped) => ir.model = mapped.to_string(),
					None => {
						if *cli == CliType::Codex && mapping::is_codex_default_model(&ir.model) {
							return Err((ProxyError::ModelMappingRequired(ir.model.clone()), inbound));
						}
					},
				}
			}
		},
		RouteTarget::Passthrough(_) => {},
	}
	ctx.target_model = ir.model.clone();
	ctx.provider_id = Some(provider.id.clone());

	// Credentials: pass-through keys travel verbatim and are never cached
	let pass_through = decision.is_pass_through();
	let api_key = match decision {
		KeyDecision::PassThrough(k) => Some(k),
		_ => inner.store.provider_key(&provider),
	};
	let timeout = inner.settings.proxy.timeout_duration();

	let bridge: Arc<Bridge> = match (&proxy_id, pass_through || provider.is_pool) {
		(Some(proxy_id), false) => match inner.cache.get(proxy_id, &provider.id) {
			Some(b) => b,
			None => {
				let b = Arc::new(Bridge::to_provider(inbound, &provider, api_key, timeout));
				inner
					.cache
					.put(proxy_id.clone(), provider.id.clone(), b.clone());
				b
			},
		},
		_ => Arc::new(Bridge::to_provider(inbound, &provider, api_key, timeout)),
	};

	let hooks = Hooks::default();

	if streaming {
		let body = match target {
			RouteTarget::Passthrough(_) => {
				// Same dialect in and out: forward the original body, observe
				// the stream for usage
				let upstream = passthrough_call(inner, &bridge, &uri, &provider, bytes)
					.await
					.map_err(|e| (e, inbound))?;
				Bridge::observe_stream(provider.adapter, upstream, &hooks)
			},
			_ => bridge
				.chat_stream(&inner.client, &ir, &hooks)
				.await
				.map_err(|e| (e, inbound))?,
		};
		let finalizer = Finalizer {
			state: state.clone(),
			ctx: std::mem::replace(ctx, RequestCtx::new(String::new(), "")),
			usage: hooks.usage.clone(),
			start,
		};
		let body = Body::new(StreamingBody {
			inner: body,
			inbound,
			finalizer: Some(finalizer),
			done: false,
		});
		let resp = ::http::Response::builder()
			.status(StatusCode::OK)
			.header(header::CONTENT_TYPE, "text/event-stream")
			.header(header::CACHE_CONTROL, "no-cache")
			.header(header::CONNECTION, "keep-alive")
			.header("x-accel-buffering", "no")
			.body(body)
			.expect("response construction cannot fail");
		Ok(resp)
	} else {
		let out = match target {
			RouteTarget::Passthrough(_) => {
				let out = passthrough_buffered(inner, &bridge, &uri, &provider, bytes)
					.await
					.map_err(|e| (e, inbound))?;
				// Best-effort usage bookkeeping from the untouched body
				if let Ok(parsed) = provider.adapter.parse_response(&Bytes::from(out.clone()))
					&& let Some(usage) = parsed.usage
				{
					hooks.usage.store(Some(usage));
				}
				out
			},
			_ => bridge
				.chat(&inner.client, &ir, &hooks)
				.await
				.map_err(|e| (e, inbound))?,
		};
		let response_body = if inner.settings.logs.save_response_body {
			Some(truncate_body(
				&String::from_utf8_lossy(&out),
				inner.settings.logs.max_body_size,
			))
		} else {
			None
		};
		let finalizer = Finalizer {
			state: state.clone(),
			ctx: std::mem::replace(ctx, RequestCtx::new(String::new(), "")),
			usage: hooks.usage.clone(),
			start,
		};
		finalizer.complete(200, None, response_body);
		let resp = ::http::Response::builder()
			.status(StatusCode::OK)
			.header(header::CONTENT_TYPE, "application/json")
			.body(Body::from(out))
			.expect("response construction cannot fail");
		Ok(resp)
	}
}

/// Passthrough upstream URL: the client's path below the provider mount,
/// re-rooted on the provider's base URL, query included.
fn passthrough_url(provider: &Provider, uri: &crate::http::Uri) -> String {
	let mount = format!(
		"/providers/{}",
		provider
			.passthrough_path
			.as_deref()
			.unwrap_or_default()
	);
	let upstream_path = uri.path().strip_prefix(mount.as_str()).unwrap_or(uri.path());
	let base = provider.base_url().trim_end_matches('/');
	match uri.query() {
		Some(q) => format!("{base}{upstream_path}?{q}"),
		None => format!("{base}{upstream_path}"),
	}
}

async fn passthrough_call(
	inner: &AppInner,
	bridge: &Bridge,
	uri: &crate::http::Uri,
	provider: &Provider,
	body: Bytes,
) -> Result<Body, ProxyError> {
	let url = passthrough_url(provider, uri);
	let mut headers = crate::http::HeaderMap::new();
	headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
	if let Some(key) = &bridge.config.api_key {
		provider.adapter.apply_auth(&mut headers, key);
	}
	let resp = inner
		.client
		.call_streaming(&url, headers, body.to_vec(), bridge.config.timeout)
		.await?;
	if !resp.status.is_success() {
		let bytes = crate::http::to_bytes(resp.body).await.unwrap_or_default();
		return Err(ProxyError::Upstream {
			status: resp.status,
			body: bytes,
		});
	}
	Ok(resp.body)
}

async fn passthrough_buffered(
	inner: &AppInner,
	bridge: &Bridge,
	uri: &crate::http::Uri,
	provider: &Provider,
	body: Bytes,
) -> Result<Vec<u8>, ProxyError> {
	let url = passthrough_url(provider, uri);
	let mut headers = crate::http::HeaderMap::new();
	headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
	if let Some(key) = &bridge.config.api_key {
		provider.adapter.apply_auth(&mut headers, key);
	}
	let resp = inner
		.client
		.call(&url, headers, body.to_vec(), bridge.config.timeout)
		.await?;
	if !resp.status.is_success() {
		return Err(ProxyError::Upstream {
			status: resp.status,
			body: resp.bytes,
		});
	}
	Ok(resp.bytes.to_vec())
}

async fn provider_models(
	State(state): State<AppState>,
	Extension(target): Extension<RouteTarget>,
) -> Response {
	let RouteTarget::Passthrough(provider_id) = &target else {
		return ProxyError::ProxyNotFound.into_response(AdapterKind::OpenAI);
	};
	match state.inner().store.provider(provider_id) {
		Some(p) => models_response(&p),
		None => ProxyError::ProviderNotFound(provider_id.to_string())
			.into_response(AdapterKind::OpenAI),
	}
}

async fn proxy_models(
	State(state): State<AppState>,
	Extension(target): Extension<RouteTarget>,
) -> Response {
	let RouteTarget::Conversion(proxy_id) = &target else {
		return ProxyError::ProxyNotFound.into_response(AdapterKind::OpenAI);
	};
	match resolve_chain(&state.inner().store, proxy_id) {
		Ok(resolved) => models_response(&resolved.provider),
		Err(e) => {
			let inbound = state
				.inner()
				.store
				.proxy(proxy_id)
				.map(|p| p.inbound)
				.unwrap_or(AdapterKind::OpenAI);
			e.into_response(inbound)
		},
	}
}

fn models_response(provider: &Provider) -> Response {
	let data: Vec<Value> = provider
		.models
		.iter()
		.map(|m| {
			json!({
				"id": m.as_str(),
				"object": "model",
				"owned_by": provider.name.as_str(),
			})
		})
		.collect();
	json_response(StatusCode::OK, &json!({ "object": "list", "data": data }))
}

async fn list_proxies(State(state): State<AppState>) -> Response {
	let proxies: Vec<Value> = state
		.inner()
		.store
		.proxies()
		.into_iter()
		.filter(|p| p.enabled)
		.map(|p| {
			json!({
				"id": p.id.as_str(),
				"name": p.name.as_deref(),
				"path": format!("/proxies/{}", p.path),
				"inbound": p.inbound.name().as_str(),
			})
		})
		.collect();
	json_response(StatusCode::OK, &json!({ "proxies": proxies }))
}

async fn health(State(state): State<AppState>) -> Response {
	let snapshot = state.inner().metrics.snapshot();
	json_response(
		StatusCode::OK,
		&json!({
			"status": "ok",
			"uptime": snapshot.uptime_seconds,
			"metrics": snapshot,
		}),
	)
}

async fn metrics_export(State(state): State<AppState>) -> Response {
	::http::Response::builder()
		.status(StatusCode::OK)
		.header(
			header::CONTENT_TYPE,
			"application/openmetrics-text; version=1.0.0; charset=utf-8",
		)
		.body(Body::from(state.inner().metrics.encode_prometheus()))
		.expect("response construction cannot fail")
}

async fn status_page(State(state): State<AppState>) -> Response {
	let inner = state.inner();
	let body = format!(
		"amux {} - local LLM gateway\nproviders: {}\nproxies: {}\n",
		amux_core::version::version(),
		inner.store.providers().len(),
		inner.store.proxies().len(),
	);
	::http::Response::builder()
		.status(StatusCode::OK)
		.header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
		.body(Body::from(body))
		.expect("response construction cannot fail")
}

fn json_response(status: StatusCode, value: &Value) -> Response {
	let body = serde_json::to_vec(value).unwrap_or_else(|e| {
		warn!("failed to serialize response: {e}");
		b"{}".to_vec()
	});
	::http::Response::builder()
		.status(status)
		.header(header::CONTENT_TYPE, "application/json")
		.body(Body::from(body))
		.expect("response construction cannot fail")
}
