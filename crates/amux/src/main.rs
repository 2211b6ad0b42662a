use std::path::PathBuf;
use std::sync::Arc;

use amux_core::signal;
use anyhow::Context as _;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use amux::app::Server;
use amux::config;
use amux::store::PlaintextSecrets;

#[derive(Parser)]
#[command(name = "amux", about = "Local LLM gateway", version)]
struct Args {
	/// Configuration file (YAML). Falls back to $AMUX_CONFIG.
	#[arg(long, short)]
	config: Option<PathBuf>,
	/// Override the listen port.
	#[arg(long)]
	port: Option<u16>,
	/// Override the listen host.
	#[arg(long)]
	host: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.init();

	let args = Args::parse();
	let path = args
		.config
		.or_else(|| std::env::var("AMUX_CONFIG").ok().map(PathBuf::from));

	let cfg = match &path {
		Some(p) => config::load_config(p).with_context(|| format!("load config {}", p.display()))?,
		None => config::ConfigFile::default(),
	};
	let mut settings = cfg.settings.clone();
	if let Some(port) = args.port {
		settings.proxy.port = port;
	}
	if let Some(host) = args.host {
		settings.proxy.host = host;
	}

	let store = config::populate_store(&cfg, Arc::new(PlaintextSecrets));
	let server = Server::new(store, settings);
	server.start().await?;

	signal::shutdown().await;
	server.stop().await;
	Ok(())
}
