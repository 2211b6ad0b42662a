//! Server lifecycle: start clears the bridge cache, installs every route,
//! then binds; stop drains; restart is stop+start under the lifecycle lock
//! so a mid-restart request sees a clean connection refusal.

use amux_core::prelude::*;
use tokio::sync::watch;

use crate::client::Client;
use crate::config::Settings;
use crate::mapping::MappingEngine;
use crate::proxy::cache::BridgeCache;
use crate::proxy::routes::{AppInner, AppState, build_router};
use crate::store::{ChangeEvent, Store};
use crate::telemetry::log::{LogSink, LogWriter, TracingLogWriter};
use crate::telemetry::metrics::Metrics;

struct Running {
	shutdown: watch::Sender<bool>,
	serve: tokio::task::JoinHandle<()>,
	flusher: tokio::task::JoinHandle<()>,
	addr: SocketAddr,
}

pub struct Server {
	state: AppState,
	running: AsyncMutex<Option<Running>>,
}

impl Server {
	pub fn new(store: Arc<Store>, settings: Settings) -> Arc<Server> {
		Server::with_log_writer(store, settings, Box::new(TracingLogWriter))
	}

	pub fn with_log_writer(
		store: Arc<Store>,
		settings: Settings,
		writer: Box<dyn LogWriter>,
	) -> Arc<Server> {
		let log = LogSink::new(writer, settings.logs.enabled);
		let inner = Arc::new(AppInner {
			store: store.clone(),
			settings,
			cache: BridgeCache::default(),
			mapping: MappingEngine::new(),
			metrics: Arc::new(Metrics::new()),
			log,
			client: Client::new(),
		});

		// Configuration writes invalidate exactly the affected scope
		let weak = Arc::downgrade(&inner);
		store.on_change(move |event| {
			let Some(inner) = weak.upgrade() else { return };
			match event {
				ChangeEvent::Provider(id) => inner.cache.invalidate_provider(id),
				ChangeEvent::Proxy(id) => {
					inner.cache.invalidate(id);
					inner.mapping.invalidate_proxy(id);
				},
				ChangeEvent::CodeSwitch(cli) => inner.mapping.invalidate_cli(*cli),
				ChangeEvent::Settings => {},
			}
		});

		Arc::new(Server {
			state: AppState(inner),
			running: AsyncMutex::new(None),
		})
	}

	pub fn state(&self) -> &AppState {
		&self.state
	}

	pub async fn start(&self) -> anyhow::Result<SocketAddr> {
		let mut running = self.running.lock().await;
		if running.is_some() {
			anyhow::bail!("server already running");
		}
		let inner = &self.state.0;
		inner.cache.clear();

		// Routes are installed before the listener accepts a connection
		let router = build_router(self.state.clone());
		let bind = format!("{}:{}", inner.settings.proxy.host, inner.settings.proxy.port);
		let listener = tokio::net::TcpListener::bind(&bind)
			.await
			.with_context(|| format!("bind {bind}"))?;
		let addr = listener.local_addr()?;

		let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
		let serve = tokio::spawn(async move {
			let shutdown = async move {
				let _ = shutdown_rx.wait_for(|v| *v).await;
			};
			if let Err(e) = axum::serve(listener, router)
				.with_graceful_shutdown(shutdown)
				.await
			{
				tracing::error!("server error: {e}");
			}
		});
		let flusher = inner.log.spawn_flusher();
		inner.metrics.reset_window();
		info!("listening on http://{addr}");

		*running = Some(Running {
			shutdown: shutdown_tx,
			serve,
			flusher,
			addr,
		});
		Ok(addr)
	}

	pub async fn stop(&self) {
		let mut running = self.running.lock().await;
		if let Some(run) = running.take() {
			let _ = run.shutdown.send(true);
			let _ = run.serve.await;
			run.flusher.abort();
			// Final flush so shutdown loses no log entries
			self.state.0.log.flush();
			info!("stopped listening on {}", run.addr);
		}
	}

	pub async fn restart(&self) -> anyhow::Result<SocketAddr> {
		self.stop().await;
		self.start().await
	}

	pub async fn local_addr(&self) -> Option<SocketAddr> {
		self.running.lock().await.as_ref().map(|r| r.addr)
	}
}
