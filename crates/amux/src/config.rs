//! Settings and configuration-file loading.
//!
//! Settings keys and defaults mirror the table in the gateway's
//! documentation: `proxy.port` 9527, `proxy.host` 127.0.0.1, `proxy.timeout`
//! 60 s, CORS on with `*`, unified API key off, logging on with body capture
//! off.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::store::{
	CodeSwitch, CodeSwitchRule, ModelMapping, PlatformKey, Provider, Proxy, SecretStore, Store,
};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
	pub proxy: ProxySettings,
	pub security: SecuritySettings,
	pub logs: LogSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProxySettings {
	pub port: u16,
	pub host: String,
	/// Per-request upstream deadline, milliseconds.
	pub timeout: u64,
	pub cors: CorsSettings,
}

impl Default for ProxySettings {
	fn default() -> Self {
		ProxySettings {
			port: 9527,
			host: "127.0.0.1".to_string(),
			timeout: 60_000,
			cors: CorsSettings::default(),
		}
	}
}

impl ProxySettings {
	pub fn timeout_duration(&self) -> Duration {
		Duration::from_millis(self.timeout)
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CorsSettings {
	pub enabled: bool,
	pub origins: Vec<String>,
}

impl Default for CorsSettings {
	fn default() -> Self {
		CorsSettings {
			enabled: true,
			origins: vec!["*".to_string()],
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SecuritySettings {
	pub unified_api_key: UnifiedApiKeySettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UnifiedApiKeySettings {
	pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogSettings {
	pub enabled: bool,
	pub save_request_body: bool,
	pub save_response_body: bool,
	pub max_body_size: usize,
	pub retention_days: u32,
	pub max_entries: usize,
}

impl Default for LogSettings {
	fn default() -> Self {
		LogSettings {
			enabled: true,
			save_request_body: false,
			save_response_body: false,
			max_body_size: 10_240,
			retention_days: 30,
			max_entries: 10_000,
		}
	}
}

/// The on-disk configuration document: settings plus the store rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigFile {
	pub settings: Settings,
	pub providers: Vec<Provider>,
	pub proxies: Vec<Proxy>,
	pub mappings: Vec<ModelMapping>,
	pub code_switches: Vec<CodeSwitch>,
	pub code_switch_rules: Vec<CodeSwitchRule>,
	pub platform_keys: Vec<PlatformKey>,
}

pub fn parse_config(contents: &str) -> anyhow::Result<ConfigFile> {
	Ok(serde_yaml::from_str(contents)?)
}

pub fn load_config(path: &Path) -> anyhow::Result<ConfigFile> {
	let contents = std::fs::read_to_string(path)?;
	parse_config(&contents)
}

/// Populate a store from a parsed configuration document.
pub fn populate_store(cfg: &ConfigFile, secrets: Arc<dyn SecretStore>) -> Arc<Store> {
	let store = Arc::new(Store::new(secrets));
	for p in &cfg.providers {
		store.insert_provider(p.clone());
	}
	for p in &cfg.proxies {
		store.insert_proxy(p.clone());
	}
	for p in &cfg.proxies {
		let for_proxy = cfg
			.mappings
			.iter()
			.filter(|m| m.proxy_id == p.id)
			.cloned()
			.collect::<Vec<_>>();
		if !for_proxy.is_empty() {
			store.set_mappings(&p.id, for_proxy);
		}
	}
	for cs in &cfg.code_switches {
		store.set_code_switch(cs.clone());
	}
	for cli in [crate::store::CliType::ClaudeCode, crate::store::CliType::Codex] {
		let rules = cfg
			.code_switch_rules
			.iter()
			.filter(|r| r.cli == cli)
			.cloned()
			.collect::<Vec<_>>();
		if !rules.is_empty() {
			store.set_code_switch_rules(cli, rules);
		}
	}
	store.set_platform_keys(cfg.platform_keys.clone());
	store
}
