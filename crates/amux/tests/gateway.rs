//! End-to-end gateway tests: boot on an ephemeral port, point providers at
//! a wiremock upstream, drive real HTTP through the routes.

use std::sync::{Arc, Mutex};

use amux::app::Server;
use amux::config::Settings;
use amux::llm::AdapterKind;
use amux::store::{
	CliType, CodeSwitch, ModelMapping, OutboundTarget, PlaintextSecrets, PlatformKey, Provider,
	Proxy, Store,
};
use amux::telemetry::log::{LogWriter, RequestLogRecord};
use amux_core::strng;
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Clone, Default)]
struct CapturingWriter {
	records: Arc<Mutex<Vec<RequestLogRecord>>>,
}

impl LogWriter for CapturingWriter {
	fn write(&self, records: &[RequestLogRecord]) -> anyhow::Result<()> {
		self.records.lock().unwrap().extend_from_slice(records);
		Ok(())
	}
}

struct TestGateway {
	server: Arc<Server>,
	base: String,
	writer: CapturingWriter,
	client: reqwest::Client,
}

impl TestGateway {
	async fn start(store: Arc<Store>, settings: Settings) -> TestGateway {
		let writer = CapturingWriter::default();
		let server = Server::with_log_writer(store, settings, Box::new(writer.clone()));
		let addr = server.start().await.expect("server starts");
		TestGateway {
			server,
			base: format!("http://{addr}"),
			writer,
			client: reqwest::Client::new(),
		}
	}

	fn records(&self) -> Vec<RequestLogRecord> {
		self.server.state().0.log.flush();
		self.writer.records.lock().unwrap().clone()
	}

	async fn stop(self) {
		self.server.stop().await;
	}
}

fn settings_on_port_zero() -> Settings {
	let mut s = Settings::default();
	s.proxy.port = 0;
	s.logs.enabled = true;
	s
}

fn moonshot_provider(upstream: &MockServer) -> Provider {
	Provider {
		id: strng::new("kimi"),
		name: strng::new("Kimi"),
		adapter: AdapterKind::Moonshot,
		base_url: Some(upstream.uri()),
		chat_path: None,
		models_path: None,
		api_key: Some("sk-moonshot-stored".to_string()),
		models: vec![strng::new("moonshot-v1-32k")],
		enabled: true,
		passthrough_path: None,
		is_pool: false,
		oauth_provider_type: None,
	}
}

fn conversion_store(upstream: &MockServer) -> Arc<Store> {
	let store = Arc::new(Store::new(Arc::new(PlaintextSecrets)));
	store.insert_provider(moonshot_provider(upstream));
	store.insert_proxy(Proxy {
		id: strng::new("px1"),
		name: Some(strng::new("anthropic to moonshot")),
		inbound: AdapterKind::Anthropic,
		outbound: OutboundTarget::Provider {
			id: strng::new("kimi"),
		},
		path: strng::new("anthropic-moonshot"),
		enabled: true,
	});
	store.set_mappings(
		&strng::new("px1"),
		vec![ModelMapping {
			proxy_id: strng::new("px1"),
			source_model: strng::new("claude-3-opus"),
			target_model: strng::new("moonshot-v1-32k"),
			is_default: false,
		}],
	);
	store
}

fn completion_body() -> Value {
	json!({
		"id": "cmpl-1",
		"object": "chat.completion",
		"created": 1700000000,
		"model": "moonshot-v1-32k",
		"choices": [{
			"index": 0,
			"message": {"role": "assistant", "content": "hello from upstream"},
			"finish_reason": "stop"
		}],
		"usage": {"prompt_tokens": 9, "completion_tokens": 4, "total_tokens": 13}
	})
}

#[tokio::test(flavor = "multi_thread")]
async fn conversion_proxy_translates_and_maps_models() {
	let upstream = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/v1/chat/completions"))
		.respond_with(ResponseTemplate::new(200).set_body_json(completion_body()))
		.mount(&upstream)
		.await;

	let gw = TestGateway::start(conversion_store(&upstream), settings_on_port_zero()).await;

	let resp = gw
		.client
		.post(format!("{}/proxies/anthropic-moonshot/v1/messages", gw.base))
		.json(&json!({
			"model": "claude-3-opus",
			"max_tokens": 100,
			"messages": [{"role": "user", "content": "hi"}]
		}))
		.send()
		.await
		.unwrap();
	assert_eq!(resp.status(), 200);
	assert!(resp.headers().contains_key("x-request-id"));
	let body: Value = resp.json().await.unwrap();
	assert_eq!(body["type"], "message");
	assert_eq!(body["role"], "assistant");
	assert_eq!(body["content"][0]["text"], "hello from upstream");
	assert_eq!(body["usage"]["input_tokens"], 9);
	assert_eq!(body["usage"]["output_tokens"], 4);

	// The upstream saw the mapped model and the stored credential
	let received = upstream.received_requests().await.unwrap();
	assert_eq!(received.len(), 1);
	let sent: Value = serde_json::from_slice(&received[0].body).unwrap();
	assert_eq!(sent["model"], "moonshot-v1-32k");
	assert_eq!(
		received[0].headers.get("authorization").unwrap(),
		"Bearer sk-moonshot-stored"
	);

	// Log record carries both model names and token counts
	let records = gw.records();
	assert_eq!(records.len(), 1);
	assert_eq!(records[0].source_model, "claude-3-opus");
	assert_eq!(records[0].target_model, "moonshot-v1-32k");
	assert_eq!(records[0].status_code, 200);
	assert_eq!(records[0].input_tokens, Some(9));
	assert_eq!(records[0].output_tokens, Some(4));

	gw.stop().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn conversion_proxy_streams_anthropic_frames() {
	let upstream = MockServer::start().await;
	let sse = concat!(
		"data: {\"id\":\"c1\",\"model\":\"moonshot-v1-32k\",\"choices\":[{\"index\":0,\"delta\":{\"role\":\"assistant\",\"content\":\"Hel\"}}]}\n\n",
		"data: {\"id\":\"c1\",\"choices\":[{\"index\":0,\"delta\":{\"content\":\"lo\"}}]}\n\n",
		"data: {\"id\":\"c1\",\"choices\":[{\"index\":0,\"delta\":{},\"finish_reason\":\"stop\"}],\"usage\":{\"prompt_tokens\":5,\"completion_tokens\":2,\"total_tokens\":7}}\n\n",
		"data: [DONE]\n\n",
	);
	Mock::given(method("POST"))
		.and(path("/v1/chat/completions"))
		.respond_with(ResponseTemplate::new(200).set_body_raw(sse.as_bytes(), "text/event-stream"))
		.mount(&upstream)
		.await;

	let gw = TestGateway::start(conversion_store(&upstream), settings_on_port_zero()).await;

	let resp = gw
		.client
		.post(format!("{}/proxies/anthropic-moonshot/v1/messages", gw.base))
		.json(&json!({
			"model": "claude-3-opus",
			"max_tokens": 100,
			"stream": true,
			"messages": [{"role": "user", "content": "hi"}]
		}))
		.send()
		.await
		.unwrap();
	assert_eq!(resp.status(), 200);
	assert_eq!(
		resp.headers().get("content-type").unwrap(),
		"text/event-stream"
	);
	let text = resp.text().await.unwrap();
	assert!(text.starts_with("event: message_start"), "{text}");
	assert!(text.contains("event: content_block_delta"));
	assert!(text.contains("\"text\":\"Hel\""));
	assert!(text.trim_end().ends_with("data: {\"type\":\"message_stop\"}"), "{text}");
	assert!(!text.contains("[DONE]"));

	// Streamed usage reaches the log through the hook slot
	let records = gw.records();
	assert_eq!(records.len(), 1);
	assert_eq!(records[0].input_tokens, Some(5));
	assert_eq!(records[0].output_tokens, Some(2));

	gw.stop().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn circular_proxy_chain_is_rejected() {
	let store = Arc::new(Store::new(Arc::new(PlaintextSecrets)));
	store.insert_proxy(Proxy {
		id: strng::new("a"),
		name: None,
		inbound: AdapterKind::Anthropic,
		outbound: OutboundTarget::Proxy { id: strng::new("b") },
		path: strng::new("loop-a"),
		enabled: true,
	});
	store.insert_proxy(Proxy {
		id: strng::new("b"),
		name: None,
		inbound: AdapterKind::OpenAI,
		outbound: OutboundTarget::Proxy { id: strng::new("a") },
		path: strng::new("loop-b"),
		enabled: true,
	});
	let gw = TestGateway::start(store, settings_on_port_zero()).await;

	let resp = gw
		.client
		.post(format!("{}/proxies/loop-a/v1/messages", gw.base))
		.json(&json!({"model": "m", "max_tokens": 1, "messages": []}))
		.send()
		.await
		.unwrap();
	assert_eq!(resp.status(), 500);
	let body: Value = resp.json().await.unwrap();
	// Anthropic inbound dialect gets the anthropic envelope
	assert_eq!(body["type"], "error");
	assert_eq!(body["error"]["type"], "CIRCULAR_PROXY");

	gw.stop().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn pass_through_keys_reach_upstream_and_skip_the_cache() {
	let upstream = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/v1/chat/completions"))
		.respond_with(ResponseTemplate::new(200).set_body_json(completion_body()))
		.mount(&upstream)
		.await;

	let store = conversion_store(&upstream);
	let mut settings = settings_on_port_zero();
	settings.security.unified_api_key.enabled = true;
	let gw = TestGateway::start(store, settings).await;

	for key in ["my-own-key", "my-other-key"] {
		let resp = gw
			.client
			.post(format!("{}/proxies/anthropic-moonshot/v1/messages", gw.base))
			.header("authorization", format!("Bearer {key}"))
			.json(&json!({
				"model": "claude-3-opus",
				"max_tokens": 10,
				"messages": [{"role": "user", "content": "hi"}]
			}))
			.send()
			.await
			.unwrap();
		assert_eq!(resp.status(), 200);
	}

	let received = upstream.received_requests().await.unwrap();
	assert_eq!(received.len(), 2);
	assert_eq!(
		received[0].headers.get("authorization").unwrap(),
		"Bearer my-own-key"
	);
	assert_eq!(
		received[1].headers.get("authorization").unwrap(),
		"Bearer my-other-key"
	);
	// Per-request credentials never enter the bridge cache
	assert!(gw.server.state().0.cache.is_empty());

	gw.stop().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn platform_keys_validate_and_tunnel_requests_require_keys() {
	let upstream = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/v1/chat/completions"))
		.respond_with(ResponseTemplate::new(200).set_body_json(completion_body()))
		.mount(&upstream)
		.await;

	let store = conversion_store(&upstream);
	store.set_platform_keys(vec![PlatformKey {
		id: strng::new("k1"),
		key: strng::new("sk-amux.valid"),
		name: None,
		enabled: true,
	}]);
	let mut settings = settings_on_port_zero();
	settings.security.unified_api_key.enabled = true;
	let gw = TestGateway::start(store, settings).await;
	let url = format!("{}/proxies/anthropic-moonshot/v1/messages", gw.base);
	let body = json!({
		"model": "claude-3-opus",
		"max_tokens": 10,
		"messages": [{"role": "user", "content": "hi"}]
	});

	// Valid platform key: accepted, upstream gets the stored credential
	let resp = gw
		.client
		.post(&url)
		.header("authorization", "Bearer sk-amux.valid")
		.json(&body)
		.send()
		.await
		.unwrap();
	assert_eq!(resp.status(), 200);
	let received = upstream.received_requests().await.unwrap();
	assert_eq!(
		received[0].headers.get("authorization").unwrap(),
		"Bearer sk-moonshot-stored"
	);

	// Unknown platform key: rejected
	let resp = gw
		.client
		.post(&url)
		.header("authorization", "Bearer sk-amux.bogus")
		.json(&body)
		.send()
		.await
		.unwrap();
	assert_eq!(resp.status(), 401);
	let err: Value = resp.json().await.unwrap();
	assert_eq!(err["error"]["type"], "INVALID_API_KEY");

	// Keyless through the tunnel: rejected; keyless local is internal
	let resp = gw
		.client
		.post(&url)
		.header("cf-ray", "8abc")
		.json(&body)
		.send()
		.await
		.unwrap();
	assert_eq!(resp.status(), 401);
	let resp = gw.client.post(&url).json(&body).send().await.unwrap();
	assert_eq!(resp.status(), 200);

	gw.stop().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn codex_default_model_without_mapping_is_refused() {
	let upstream = MockServer::start().await;
	let store = conversion_store(&upstream);
	store.set_code_switch(CodeSwitch {
		cli: CliType::Codex,
		provider_id: strng::new("kimi"),
		enabled: true,
	});
	let gw = TestGateway::start(store, settings_on_port_zero()).await;

	let resp = gw
		.client
		.post(format!("{}/code/codex/v1/messages", gw.base))
		.json(&json!({
			"model": "gpt-5.2-codex",
			"max_tokens": 10,
			"messages": [{"role": "user", "content": "hi"}]
		}))
		.send()
		.await
		.unwrap();
	assert_eq!(resp.status(), 400);
	let body: Value = resp.json().await.unwrap();
	assert_eq!(body["error"]["type"], "MODEL_MAPPING_REQUIRED");
	let message = body["error"]["message"].as_str().unwrap();
	assert!(message.contains("provider/model"), "{message}");

	gw.stop().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn codex_provider_prefix_selects_adapter_and_strips() {
	let upstream = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/v1/chat/completions"))
		.respond_with(ResponseTemplate::new(200).set_body_json(completion_body()))
		.mount(&upstream)
		.await;
	let store = conversion_store(&upstream);
	store.set_code_switch(CodeSwitch {
		cli: CliType::Codex,
		provider_id: strng::new("kimi"),
		enabled: true,
	});
	let gw = TestGateway::start(store, settings_on_port_zero()).await;

	let resp = gw
		.client
		.post(format!("{}/code/codex/v1/messages", gw.base))
		.json(&json!({
			"model": "moonshot/kimi-k2",
			"max_tokens": 10,
			"messages": [{"role": "user", "content": "hi"}]
		}))
		.send()
		.await
		.unwrap();
	assert_eq!(resp.status(), 200);
	let received = upstream.received_requests().await.unwrap();
	let sent: Value = serde_json::from_slice(&received[0].body).unwrap();
	assert_eq!(sent["model"], "kimi-k2");

	gw.stop().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn google_passthrough_injects_url_model_and_streams_bare_frames() {
	let upstream = MockServer::start().await;
	let sse = concat!(
		"data: {\"candidates\":[{\"content\":{\"role\":\"model\",\"parts\":[{\"text\":\"Bon\"}]},\"index\":0}],\"modelVersion\":\"gemini-2.5-flash\"}\n\n",
		"data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"jour\"}]},\"finishReason\":\"STOP\",\"index\":0}],\"usageMetadata\":{\"promptTokenCount\":2,\"candidatesTokenCount\":3,\"totalTokenCount\":5}}\n\n",
	);
	Mock::given(method("POST"))
		.and(path(
			"/v1beta/models/gemini-2.5-flash:streamGenerateContent",
		))
		.and(query_param("alt", "sse"))
		.respond_with(ResponseTemplate::new(200).set_body_raw(sse.as_bytes(), "text/event-stream"))
		.mount(&upstream)
		.await;

	let store = Arc::new(Store::new(Arc::new(PlaintextSecrets)));
	store.insert_provider(Provider {
		id: strng::new("gem"),
		name: strng::new("Gemini"),
		adapter: AdapterKind::Google,
		base_url: Some(upstream.uri()),
		chat_path: None,
		models_path: None,
		api_key: Some("goog-key".to_string()),
		models: vec![strng::new("gemini-2.5-flash")],
		enabled: true,
		passthrough_path: Some(strng::new("gem1")),
		is_pool: false,
		oauth_provider_type: None,
	});
	let gw = TestGateway::start(store, settings_on_port_zero()).await;

	let resp = gw
		.client
		.post(format!(
			"{}/providers/gem1/v1beta/models/gemini-2.5-flash:streamGenerateContent?alt=sse",
			gw.base
		))
		.json(&json!({
			"contents": [{"role": "user", "parts": [{"text": "bonjour?"}]}]
		}))
		.send()
		.await
		.unwrap();
	assert_eq!(resp.status(), 200);
	let text = resp.text().await.unwrap();
	assert!(text.starts_with("data: "), "{text}");
	assert!(!text.contains("[DONE]"));
	assert!(text.contains("Bonjour") || text.contains("Bon"));

	let received = upstream.received_requests().await.unwrap();
	assert_eq!(received.len(), 1);
	assert_eq!(
		received[0].headers.get("x-goog-api-key").unwrap(),
		"goog-key"
	);

	// The URL-borne model lands in the log even though the body had none
	let records = gw.records();
	assert_eq!(records.len(), 1);
	assert_eq!(records[0].source_model, "gemini-2.5-flash");
	assert_eq!(records[0].input_tokens, Some(2));
	assert_eq!(records[0].output_tokens, Some(3));

	gw.stop().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn models_health_and_proxy_listing() {
	let upstream = MockServer::start().await;
	let store = conversion_store(&upstream);
	let gw = TestGateway::start(store, settings_on_port_zero()).await;

	let resp = gw
		.client
		.get(format!("{}/proxies/anthropic-moonshot/v1/models", gw.base))
		.send()
		.await
		.unwrap();
	assert_eq!(resp.status(), 200);
	let body: Value = resp.json().await.unwrap();
	assert_eq!(body["object"], "list");
	assert_eq!(body["data"][0]["id"], "moonshot-v1-32k");

	let resp = gw
		.client
		.get(format!("{}/v1/proxies", gw.base))
		.send()
		.await
		.unwrap();
	let body: Value = resp.json().await.unwrap();
	assert_eq!(body["proxies"][0]["path"], "/proxies/anthropic-moonshot");

	let resp = gw
		.client
		.get(format!("{}/health", gw.base))
		.send()
		.await
		.unwrap();
	assert_eq!(resp.status(), 200);
	let body: Value = resp.json().await.unwrap();
	assert_eq!(body["status"], "ok");
	assert!(body["metrics"]["totalRequests"].is_number());

	let resp = gw
		.client
		.get(format!("{}/metrics", gw.base))
		.send()
		.await
		.unwrap();
	assert_eq!(resp.status(), 200);

	gw.stop().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn upstream_errors_forward_structurally() {
	let upstream = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/v1/chat/completions"))
		.respond_with(ResponseTemplate::new(429).set_body_json(json!({
			"error": {"message": "rate limited", "type": "rate_limit_error"}
		})))
		.mount(&upstream)
		.await;
	let gw = TestGateway::start(conversion_store(&upstream), settings_on_port_zero()).await;

	let resp = gw
		.client
		.post(format!("{}/proxies/anthropic-moonshot/v1/messages", gw.base))
		.json(&json!({
			"model": "claude-3-opus",
			"max_tokens": 10,
			"messages": [{"role": "user", "content": "hi"}]
		}))
		.send()
		.await
		.unwrap();
	// Structured upstream bodies pass through with their status
	assert_eq!(resp.status(), 429);
	let body: Value = resp.json().await.unwrap();
	assert_eq!(body["error"]["message"], "rate limited");

	let records = gw.records();
	assert_eq!(records[0].status_code, 429);
	assert!(records[0].error.as_deref().unwrap().starts_with("RATE_LIMITED"));

	gw.stop().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn restart_preserves_routing() {
	let upstream = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/v1/chat/completions"))
		.respond_with(ResponseTemplate::new(200).set_body_json(completion_body()))
		.mount(&upstream)
		.await;
	let gw = TestGateway::start(conversion_store(&upstream), settings_on_port_zero()).await;

	let addr = gw.server.restart().await.expect("restart");
	let resp = gw
		.client
		.post(format!("http://{addr}/proxies/anthropic-moonshot/v1/messages"))
		.json(&json!({
			"model": "claude-3-opus",
			"max_tokens": 10,
			"messages": [{"role": "user", "content": "hi"}]
		}))
		.send()
		.await
		.unwrap();
	assert_eq!(resp.status(), 200);

	gw.stop().await;
}
