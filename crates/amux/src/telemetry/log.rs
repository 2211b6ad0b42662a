//! Request logging: a per-request async usage slot and a buffered sink in
//! front of the log-writer collaborator.

use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use amux_core::strng::Strng;
use crossbeam::atomic::AtomicCell;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Entries buffered beyond this count flush immediately.
pub const MAX_BUFFER_SIZE: usize = 100;
/// Periodic flush cadence.
pub const FLUSH_INTERVAL: Duration = Duration::from_secs(5);

/// AsyncLog is a wrapper around an item that can be atomically set.
/// The intent is to provide additional info to the log after the request
/// handler has lost its reference, generally things derived from the
/// response body mid-stream.
#[derive(Clone)]
pub struct AsyncLog<T>(Arc<AtomicCell<Option<T>>>);

impl<T> AsyncLog<T> {
	// non_atomic_mutate is a racey method to modify the current value.
	// If there is no current value, a default is used.
	// This is NOT atomically safe; during the mutation, loads() on the item
	// will be empty. This is ok for our usage cases.
	pub fn non_atomic_mutate(&self, f: impl FnOnce(&mut T))
	where
		T: Default,
	{
		let mut cur = self.0.take().unwrap_or_default();
		f(&mut cur);
		self.0.store(Some(cur));
	}

	pub fn store(&self, v: Option<T>) {
		self.0.store(v)
	}

	pub fn take(&self) -> Option<T> {
		self.0.take()
	}
}

impl<T: Copy> AsyncLog<T> {
	pub fn load(&self) -> Option<T> {
		self.0.load()
	}
}

impl<T> Default for AsyncLog<T> {
	fn default() -> Self {
		AsyncLog(Arc::new(AtomicCell::new(None)))
	}
}

impl<T: Debug> Debug for AsyncLog<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AsyncLog").finish_non_exhaustive()
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestSource {
	Local,
	Tunnel,
}

impl RequestSource {
	pub fn as_str(&self) -> &'static str {
		match self {
			RequestSource::Local => "local",
			RequestSource::Tunnel => "tunnel",
		}
	}
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestLogRecord {
	pub request_id: String,
	pub timestamp: chrono::DateTime<chrono::Utc>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub proxy_id: Option<Strng>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub provider_id: Option<Strng>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub passthrough_path: Option<Strng>,
	pub source_model: String,
	pub target_model: String,
	pub status_code: u16,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub input_tokens: Option<u64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub output_tokens: Option<u64>,
	pub latency_ms: u64,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub request_body: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub response_body: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
	pub source: RequestSource,
}

/// Truncate a captured body to the configured cap, marking the cut.
pub fn truncate_body(body: &str, max: usize) -> String {
	if body.len() <= max {
		return body.to_string();
	}
	let mut cut = max;
	while !body.is_char_boundary(cut) {
		cut -= 1;
	}
	format!("{}…[truncated]", &body[..cut])
}

/// Where flushed records land. Persistence is a collaborator concern.
pub trait LogWriter: Send + Sync {
	fn write(&self, records: &[RequestLogRecord]) -> anyhow::Result<()>;
}

/// Default writer: one structured tracing line per record.
#[derive(Default)]
pub struct TracingLogWriter;

impl LogWriter for TracingLogWriter {
	fn write(&self, records: &[RequestLogRecord]) -> anyhow::Result<()> {
		for r in records {
			info!(
				target: "amux::request",
				"{}",
				serde_json::to_string(r).unwrap_or_default()
			);
		}
		Ok(())
	}
}

/// Buffered request-log sink. Appends are a lock-push; flushes run every
/// [`FLUSH_INTERVAL`] or as soon as [`MAX_BUFFER_SIZE`] entries are pending.
/// A failed flush re-prepends its batch so the next flush retries it.
pub struct LogSink {
	buffer: Mutex<Vec<RequestLogRecord>>,
	writer: Box<dyn LogWriter>,
	enabled: AtomicBool,
}

impl LogSink {
	pub fn new(writer: Box<dyn LogWriter>, enabled: bool) -> Arc<LogSink> {
		Arc::new(LogSink {
			buffer: Mutex::new(Vec::new()),
			writer,
			enabled: AtomicBool::new(enabled),
		})
	}

	pub fn set_enabled(&self, enabled: bool) {
		self.enabled.store(enabled, Ordering::Relaxed);
	}

	pub fn append(&self, record: RequestLogRecord) {
		if !self.enabled.load(Ordering::Relaxed) {
			return;
		}
		let should_flush = {
			let mut buffer = self.buffer.lock().unwrap();
			buffer.push(record);
			buffer.len() >= MAX_BUFFER_SIZE
		};
		if should_flush {
			self.flush();
		}
	}

	pub fn pending(&self) -> usize {
		self.buffer.lock().unwrap().len()
	}

	/// Swap the buffer out, write outside the lock, re-prepend on failure.
	pub fn flush(&self) {
		let batch = {
			let mut buffer = self.buffer.lock().unwrap();
			if !self.enabled.load(Ordering::Relaxed) {
				// Logging was turned off with entries pending; drop them
				buffer.clear();
				return;
			}
			if buffer.is_empty() {
				return;
			}
			std::mem::take(&mut *buffer)
		};
		if let Err(err) = self.writer.write(&batch) {
			warn!("request log flush failed, requeueing {} entries: {err}", batch.len());
			let mut buffer = self.buffer.lock().unwrap();
			let mut restored = batch;
			restored.extend(std::mem::take(&mut *buffer));
			*buffer = restored;
		}
	}

	/// Background flusher; runs until the sink is dropped by all handles.
	pub fn spawn_flusher(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
		let weak = Arc::downgrade(self);
		tokio::spawn(async move {
			let mut interval = tokio::time::interval(FLUSH_INTERVAL);
			interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
			loop {
				interval.tick().await;
				match weak.upgrade() {
					Some(sink) => sink.flush(),
					None => {
						debug!("log sink dropped, stopping flusher");
						return;
					},
				}
			}
		})
	}
}
