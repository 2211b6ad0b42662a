//! amux: a local LLM gateway.
//!
//! One process exposes uniform chat endpoints on configurable local paths
//! and translates between the wire dialects of eight upstream providers,
//! streaming included. See `config` for the settings surface, `llm` for the
//! dialect adapters, and `proxy::routes` for the request path.

pub mod app;
pub mod bridge;
pub mod client;
pub mod config;
pub mod http;
pub mod llm;
pub mod mapping;
pub mod parse;
pub mod proxy;
pub mod store;
pub mod telemetry;

pub use app::Server;
pub use proxy::ProxyError;
