// Signal watching derived from https://github.com/istio/ztunnel (Apache 2.0 licensed)

//! Process shutdown signal.
//!
//! `shutdown()` resolves once SIGINT or SIGTERM arrives; the caller then
//! drains the gateway through `Server::stop`. A second Ctrl+C during the
//! drain exits the process immediately.

use tracing::info;

#[cfg(unix)]
pub async fn shutdown() {
	use tokio::signal::unix::SignalKind;

	tokio::select! {
		_ = watch_signal(SignalKind::interrupt(), "SIGINT") => {
			// Let an impatient operator cut the drain short
			tokio::spawn(async {
				watch_signal(SignalKind::interrupt(), "SIGINT").await;
				info!("second Ctrl+C, exiting immediately");
				std::process::exit(0);
			});
		},
		_ = watch_signal(SignalKind::terminate(), "SIGTERM") => {},
	}
}

#[cfg(unix)]
async fn watch_signal(kind: tokio::signal::unix::SignalKind, name: &'static str) {
	tokio::signal::unix::signal(kind)
		.expect("failed to register signal handler")
		.recv()
		.await;
	info!("received {name}, shutting down");
}

#[cfg(not(unix))]
pub async fn shutdown() {
	tokio::signal::ctrl_c()
		.await
		.expect("failed to register signal handler");
	info!("received interrupt, shutting down");
}
