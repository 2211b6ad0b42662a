//! Rolling in-memory metrics plus a Prometheus mirror.
//!
//! The in-memory side feeds `/health` (counters, latency percentiles over a
//! 1000-sample window, requests-per-minute over a 60 s window); the
//! prometheus-client families feed `/metrics`.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use amux_core::strng::Strng;
use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::registry::Registry;
use serde::Serialize;

const LATENCY_WINDOW: usize = 1000;
const RPM_WINDOW: Duration = Duration::from_secs(60);

#[derive(Clone, Hash, Default, Debug, PartialEq, Eq, EncodeLabelSet)]
pub struct RequestLabels {
	pub route: String,
	pub target: String,
	pub status: String,
}

#[derive(Debug, Default, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Counters {
	pub total_requests: u64,
	pub success_requests: u64,
	pub failed_requests: u64,
	pub input_tokens: u64,
	pub output_tokens: u64,
}

impl Counters {
	fn record(&mut self, success: bool, input: Option<u64>, output: Option<u64>) {
		self.total_requests += 1;
		if success {
			self.success_requests += 1;
		} else {
			self.failed_requests += 1;
		}
		self.input_tokens += input.unwrap_or(0);
		self.output_tokens += output.unwrap_or(0);
	}
}

struct MetricsInner {
	global: Counters,
	per_proxy: HashMap<Strng, Counters>,
	per_provider: HashMap<Strng, Counters>,
	latencies: VecDeque<u64>,
	request_times: VecDeque<Instant>,
	window_start: Instant,
}

pub struct Metrics {
	inner: Mutex<MetricsInner>,
	active_connections: AtomicI64,
	requests: Family<RequestLabels, Counter>,
	registry: Mutex<Registry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
	#[serde(flatten)]
	pub counters: Counters,
	pub per_proxy: HashMap<Strng, Counters>,
	pub per_provider: HashMap<Strng, Counters>,
	pub latency_p50_ms: u64,
	pub latency_p95_ms: u64,
	pub latency_p99_ms: u64,
	pub requests_per_minute: usize,
	pub active_connections: i64,
	pub uptime_seconds: u64,
}

impl Metrics {
	pub fn new() -> Metrics {
		let mut registry = Registry::with_prefix("amux");
		let requests = Family::<RequestLabels, Counter>::default();
		registry.register(
			"requests",
			"Requests handled, by route kind, target, and status",
			requests.clone(),
		);
		Metrics {
			inner: Mutex::new(MetricsInner {
				global: Counters::default(),
				per_proxy: HashMap::new(),
				per_provider: HashMap::new(),
				latencies: VecDeque::with_capacity(LATENCY_WINDOW),
				request_times: VecDeque::new(),
				window_start: Instant::now(),
			}),
			active_connections: AtomicI64::new(0),
			requests,
			registry: Mutex::new(registry),
		}
	}

	#[allow(clippy::too_many_arguments)]
	pub fn record(
		&self,
		route: &str,
		proxy_id: Option<&Strng>,
		provider_id: Option<&Strng>,
		success: bool,
		status: u16,
		latency_ms: u64,
		input_tokens: Option<u64>,
		output_tokens: Option<u64>,
	) {
		{
			let mut inner = self.inner.lock().unwrap();
			inner.global.record(success, input_tokens, output_tokens);
			if let Some(id) = proxy_id {
				inner
					.per_proxy
					.entry(id.clone())
					.or_default()
					.record(success, input_tokens, output_tokens);
			}
			if let Some(id) = provider_id {
				inner
					.per_provider
					.entry(id.clone())
					.or_default()
					.record(success, input_tokens, output_tokens);
			}
			if inner.latencies.len() == LATENCY_WINDOW {
				inner.latencies.pop_front();
			}
			inner.latencies.push_back(latency_ms);
			let now = Instant::now();
			inner.request_times.push_back(now);
			while let Some(front) = inner.request_times.front() {
				if now.duration_since(*front) > RPM_WINDOW {
					inner.request_times.pop_front();
				} else {
					break;
				}
			}
		}
		let target = provider_id
			.or(proxy_id)
			.map(|s| s.to_string())
			.unwrap_or_default();
		self
			.requests
			.get_or_create(&RequestLabels {
				route: route.to_string(),
				target,
				status: status.to_string(),
			})
			.inc();
	}

	pub fn connection_opened(&self) {
		self.active_connections.fetch_add(1, Ordering::Relaxed);
	}

	pub fn connection_closed(&self) {
		self.active_connections.fetch_sub(1, Ordering::Relaxed);
	}

	/// Restart the uptime/RPM window; called when the listener starts.
	pub fn reset_window(&self) {
		let mut inner = self.inner.lock().unwrap();
		inner.window_start = Instant::now();
		inner.request_times.clear();
	}

	pub fn snapshot(&self) -> MetricsSnapshot {
		let inner = self.inner.lock().unwrap();
		// Naive sort; reads come at dashboard rate
		let mut sorted: Vec<u64> = inner.latencies.iter().copied().collect();
		sorted.sort_unstable();
		let now = Instant::now();
		let rpm = inner
			.request_times
			.iter()
			.filter(|t| now.duration_since(**t) <= RPM_WINDOW)
			.count();
		MetricsSnapshot {
			counters: inner.global,
			per_proxy: inner.per_proxy.clone(),
			per_provider: inner.per_provider.clone(),
			latency_p50_ms: percentile(&sorted, 50),
			latency_p95_ms: percentile(&sorted, 95),
			latency_p99_ms: percentile(&sorted, 99),
			requests_per_minute: rpm,
			active_connections: self.active_connections.load(Ordering::Relaxed),
			uptime_seconds: inner.window_start.elapsed().as_secs(),
		}
	}

	/// OpenMetrics text export for `/metrics`.
	pub fn encode_prometheus(&self) -> String {
		let registry = self.registry.lock().unwrap();
		let mut out = String::new();
		let _ = prometheus_client::encoding::text::encode(&mut out, &registry);
		out
	}
}

impl Default for Metrics {
	fn default() -> Self {
		Self::new()
	}
}

fn percentile(sorted: &[u64], p: usize) -> u64 {
	if sorted.is_empty() {
		return 0;
	}
	let rank = (sorted.len() * p).div_ceil(100);
	let idx = rank.saturating_sub(1).min(sorted.len() - 1);
	sorted[idx]
}

#[cfg(test)]
mod tests {
	use amux_core::strng;

	use super::*;

	#[test]
	fn counters_split_by_scope() {
		let m = Metrics::new();
		let proxy = strng::new("px1");
		let provider = strng::new("pv1");
		m.record("conversion", Some(&proxy), Some(&provider), true, 200, 12, Some(10), Some(20));
		m.record("conversion", Some(&proxy), None, false, 502, 40, None, None);
		let snap = m.snapshot();
		assert_eq!(snap.counters.total_requests, 2);
		assert_eq!(snap.counters.success_requests, 1);
		assert_eq!(snap.counters.failed_requests, 1);
		assert_eq!(snap.counters.input_tokens, 10);
		assert_eq!(snap.per_proxy[&proxy].total_requests, 2);
		assert_eq!(snap.per_provider[&provider].total_requests, 1);
		assert_eq!(snap.requests_per_minute, 2);
	}

	#[test]
	fn percentiles_over_window() {
		let m = Metrics::new();
		for i in 1..=100u64 {
			m.record("passthrough", None, None, true, 200, i, None, None);
		}
		let snap = m.snapshot();
		assert_eq!(snap.latency_p50_ms, 50);
		assert_eq!(snap.latency_p95_ms, 95);
		assert_eq!(snap.latency_p99_ms, 99);
	}

	#[test]
	fn latency_window_is_bounded() {
		let m = Metrics::new();
		for i in 0..1500u64 {
			m.record("passthrough", None, None, true, 200, i, None, None);
		}
		let inner = m.inner.lock().unwrap();
		assert_eq!(inner.latencies.len(), 1000);
		assert_eq!(*inner.latencies.front().unwrap(), 500);
	}

	#[test]
	fn active_connection_pairing() {
		let m = Metrics::new();
		m.connection_opened();
		m.connection_opened();
		m.connection_closed();
		assert_eq!(m.snapshot().active_connections, 1);
	}

	#[test]
	fn prometheus_export_contains_family() {
		let m = Metrics::new();
		m.record("conversion", None, None, true, 200, 1, None, None);
		let text = m.encode_prometheus();
		assert!(text.contains("amux_requests"));
	}
}
