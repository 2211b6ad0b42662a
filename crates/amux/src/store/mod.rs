//! In-memory configuration store.
//!
//! Provider, proxy, mapping, and key rows are owned here and read-only to
//! the request path. Mutations notify registered listeners so the bridge and
//! mapping caches can invalidate the affected scope.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use amux_core::strng::Strng;
use serde::{Deserialize, Serialize};

use crate::llm::AdapterKind;

fn default_true() -> bool {
	true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
	pub id: Strng,
	#[serde(default)]
	pub name: Strng,
	pub adapter: AdapterKind,
	#[serde(default)]
	pub base_url: Option<String>,
	#[serde(default)]
	pub chat_path: Option<String>,
	#[serde(default)]
	pub models_path: Option<String>,
	/// Opaque ciphertext; decrypted on demand through the SecretStore.
	#[serde(default)]
	pub api_key: Option<String>,
	#[serde(default)]
	pub models: Vec<Strng>,
	#[serde(default = "default_true")]
	pub enabled: bool,
	/// When set, the provider is exposed on `/providers/{path}` without
	/// translation.
	#[serde(default)]
	pub passthrough_path: Option<Strng>,
	#[serde(default)]
	pub is_pool: bool,
	#[serde(default)]
	pub oauth_provider_type: Option<Strng>,
}

impl Provider {
	/// A stand-in row used before code-switch mapping has selected the real
	/// provider; never used for upstream traffic.
	pub fn placeholder() -> Provider {
		Provider {
			id: Strng::new(),
			name: Strng::new(),
			adapter: AdapterKind::OpenAI,
			base_url: None,
			chat_path: None,
			models_path: None,
			api_key: None,
			models: vec![],
			enabled: false,
			passthrough_path: None,
			is_pool: false,
			oauth_provider_type: None,
		}
	}

	pub fn base_url(&self) -> &str {
		self
			.base_url
			.as_deref()
			.unwrap_or_else(|| self.adapter.default_base_url())
	}

	pub fn chat_path(&self) -> &str {
		self
			.chat_path
			.as_deref()
			.unwrap_or_else(|| self.adapter.default_chat_path())
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum OutboundTarget {
	Provider { id: Strng },
	Proxy { id: Strng },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proxy {
	pub id: Strng,
	#[serde(default)]
	pub name: Option<Strng>,
	pub inbound: AdapterKind,
	pub outbound: OutboundTarget,
	pub path: Strng,
	#[serde(default = "default_true")]
	pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelMapping {
	pub proxy_id: Strng,
	pub source_model: Strng,
	pub target_model: Strng,
	#[serde(default)]
	pub is_default: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CliType {
	#[serde(rename = "claudecode")]
	ClaudeCode,
	#[serde(rename = "codex")]
	Codex,
}

impl CliType {
	pub fn as_str(&self) -> &'static str {
		match self {
			CliType::ClaudeCode => "claudecode",
			CliType::Codex => "codex",
		}
	}

	pub fn from_path_segment(s: &str) -> Option<CliType> {
		match s {
			"claudecode" => Some(CliType::ClaudeCode),
			"codex" => Some(CliType::Codex),
			_ => None,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeSwitch {
	pub cli: CliType,
	pub provider_id: Strng,
	#[serde(default = "default_true")]
	pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MappingKind {
	Exact,
	Family,
	Reasoning,
	Default,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeSwitchRule {
	pub cli: CliType,
	pub provider_id: Strng,
	/// For `family` rules this is the family keyword, matched as a
	/// case-insensitive substring of the requested model.
	#[serde(default)]
	pub source_model: Strng,
	pub target_model: Strng,
	pub kind: MappingKind,
	#[serde(default)]
	pub priority: i32,
	#[serde(default = "default_true")]
	pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformKey {
	pub id: Strng,
	pub key: Strng,
	#[serde(default)]
	pub name: Option<Strng>,
	#[serde(default = "default_true")]
	pub enabled: bool,
}

/// Scope of a configuration mutation, delivered to change listeners so
/// caches can invalidate precisely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
	Provider(Strng),
	Proxy(Strng),
	CodeSwitch(CliType),
	Settings,
}

/// Secret decryption collaborator. At-rest encryption is outside the core;
/// the default store treats stored keys as plaintext.
pub trait SecretStore: Send + Sync {
	fn decrypt(&self, cipher: &str) -> Option<String>;
}

#[derive(Default)]
pub struct PlaintextSecrets;

impl SecretStore for PlaintextSecrets {
	fn decrypt(&self, cipher: &str) -> Option<String> {
		Some(cipher.to_string())
	}
}

#[derive(Default)]
struct StoreState {
	providers: HashMap<Strng, Provider>,
	proxies: HashMap<Strng, Proxy>,
	mappings: Vec<ModelMapping>,
	code_switches: Vec<CodeSwitch>,
	code_switch_rules: Vec<CodeSwitchRule>,
	platform_keys: Vec<PlatformKey>,
}

type Listener = Box<dyn Fn(&ChangeEvent) + Send + Sync>;

pub struct Store {
	state: RwLock<StoreState>,
	listeners: Mutex<Vec<Listener>>,
	key_last_used: Mutex<HashMap<Strng, chrono::DateTime<chrono::Utc>>>,
	secrets: Arc<dyn SecretStore>,
}

impl Store {
	pub fn new(secrets: Arc<dyn SecretStore>) -> Store {
		Store {
			state: RwLock::new(StoreState::default()),
			listeners: Mutex::new(Vec::new()),
			key_last_used: Mutex::new(HashMap::new()),
			secrets,
		}
	}

	pub fn on_change(&self, listener: impl Fn(&ChangeEvent) + Send + Sync + 'static) {
		self.listeners.lock().unwrap().push(Box::new(listener));
	}

	fn notify(&self, event: ChangeEvent) {
		for l in self.listeners.lock().unwrap().iter() {
			l(&event);
		}
	}

	pub fn provider(&self, id: &str) -> Option<Provider> {
		self.state.read().unwrap().providers.get(id).cloned()
	}

	pub fn providers(&self) -> Vec<Provider> {
		let state = self.state.read().unwrap();
		let mut out: Vec<Provider> = state.providers.values().cloned().collect();
		out.sort_by(|a, b| a.id.cmp(&b.id));
		out
	}

	pub fn provider_by_adapter(&self, adapter: AdapterKind) -> Option<Provider> {
		let state = self.state.read().unwrap();
		let mut candidates: Vec<&Provider> = state
			.providers
			.values()
			.filter(|p| p.enabled && p.adapter == adapter)
			.collect();
		candidates.sort_by(|a, b| a.id.cmp(&b.id));
		candidates.first().map(|p| (*p).clone())
	}

	pub fn proxy(&self, id: &str) -> Option<Proxy> {
		self.state.read().unwrap().proxies.get(id).cloned()
	}

	pub fn proxies(&self) -> Vec<Proxy> {
		let state = self.state.read().unwrap();
		let mut out: Vec<Proxy> = state.proxies.values().cloned().collect();
		out.sort_by(|a, b| a.id.cmp(&b.id));
		out
	}

	pub fn proxy_by_path(&self, path: &str) -> Option<Proxy> {
		let state = self.state.read().unwrap();
		state
			.proxies
			.values()
			.find(|p| p.path.as_str() == path)
			.cloned()
	}

	pub fn mappings_for_proxy(&self, proxy_id: &str) -> Vec<ModelMapping> {
		let state = self.state.read().unwrap();
		state
			.mappings
			.iter()
			.filter(|m| m.proxy_id.as_str() == proxy_id)
			.cloned()
			.collect()
	}

	pub fn code_switch(&self, cli: CliType) -> Option<CodeSwitch> {
		let state = self.state.read().unwrap();
		state
			.code_switches
			.iter()
			.find(|c| c.cli == cli && c.enabled)
			.cloned()
	}

	pub fn code_switch_rules(&self, cli: CliType, provider_id: &str) -> Vec<CodeSwitchRule> {
		let state = self.state.read().unwrap();
		state
			.code_switch_rules
			.iter()
			.filter(|r| r.cli == cli && r.provider_id.as_str() == provider_id && r.active)
			.cloned()
			.collect()
	}

	pub fn platform_key(&self, key: &str) -> Option<PlatformKey> {
		let state = self.state.read().unwrap();
		state
			.platform_keys
			.iter()
			.find(|k| k.key.as_str() == key)
			.cloned()
	}

	pub fn touch_platform_key(&self, id: &Strng) {
		self
			.key_last_used
			.lock()
			.unwrap()
			.insert(id.clone(), chrono::Utc::now());
	}

	pub fn key_last_used(&self, id: &str) -> Option<chrono::DateTime<chrono::Utc>> {
		self.key_last_used.lock().unwrap().get(id).copied()
	}

	/// Decrypt a provider's stored credential.
	pub fn provider_key(&self, provider: &Provider) -> Option<String> {
		provider
			.api_key
			.as_deref()
			.and_then(|cipher| self.secrets.decrypt(cipher))
	}

	pub fn insert_provider(&self, provider: Provider) {
		let id = provider.id.clone();
		self
			.state
			.write()
			.unwrap()
			.providers
			.insert(id.clone(), provider);
		self.notify(ChangeEvent::Provider(id));
	}

	pub fn remove_provider(&self, id: &str) {
		let removed = self.state.write().unwrap().providers.remove(id);
		if let Some(p) = removed {
			self.notify(ChangeEvent::Provider(p.id));
		}
	}

	pub fn insert_proxy(&self, proxy: Proxy) {
		let id = proxy.id.clone();
		self.state.write().unwrap().proxies.insert(id.clone(), proxy);
		self.notify(ChangeEvent::Proxy(id));
	}

	pub fn remove_proxy(&self, id: &str) {
		let removed = self.state.write().unwrap().proxies.remove(id);
		if let Some(p) = removed {
			self.notify(ChangeEvent::Proxy(p.id));
		}
	}

	pub fn set_mappings(&self, proxy_id: &Strng, mappings: Vec<ModelMapping>) {
		{
			let mut state = self.state.write().unwrap();
			state
				.mappings
				.retain(|m| m.proxy_id.as_str() != proxy_id.as_str());
			state.mappings.extend(mappings);
		}
		self.notify(ChangeEvent::Proxy(proxy_id.clone()));
	}

	pub fn set_code_switch(&self, switch: CodeSwitch) {
		let cli = switch.cli;
		{
			let mut state = self.state.write().unwrap();
			state.code_switches.retain(|c| c.cli != cli);
			state.code_switches.push(switch);
		}
		self.notify(ChangeEvent::CodeSwitch(cli));
	}

	pub fn set_code_switch_rules(&self, cli: CliType, rules: Vec<CodeSwitchRule>) {
		{
			let mut state = self.state.write().unwrap();
			state.code_switch_rules.retain(|r| r.cli != cli);
			state.code_switch_rules.extend(rules);
		}
		self.notify(ChangeEvent::CodeSwitch(cli));
	}

	pub fn set_platform_keys(&self, keys: Vec<PlatformKey>) {
		self.state.write().unwrap().platform_keys = keys;
	}
}
