//! Model-name remapping.
//!
//! Conversion proxies use a flat source→target dictionary loaded on the
//! proxy's first request. Code-assistant routes use the layered rule set
//! (exact → reasoning → family → default) compiled per CLI type with a
//! five-minute TTL.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use amux_core::strng::Strng;

use crate::store::{CliType, MappingKind, Store};

pub const CODE_SWITCH_TTL: Duration = Duration::from_secs(300);

/// Model identifiers the Codex CLI uses by default. Requests naming one of
/// these must have an active mapping; the gateway refuses to forward them
/// as-is.
pub const CODEX_DEFAULT_MODELS: &[&str] = &[
	"gpt-5.2-codex",
	"gpt-5.1-codex-max",
	"gpt-5.1-codex",
	"gpt-5-codex",
	"gpt-5.1",
	"gpt-5",
	"codex-mini-latest",
];

#[derive(Debug, Default)]
pub struct ConversionMappings {
	map: HashMap<Strng, Strng>,
	default_target: Option<Strng>,
}

impl ConversionMappings {
	pub fn resolve(&self, model: &str) -> Option<Strng> {
		if let Some(target) = self.map.get(model) {
			return Some(target.clone());
		}
		if model.is_empty() {
			return self.default_target.clone();
		}
		None
	}
}

#[derive(Debug)]
pub struct CompiledCodeSwitch {
	pub provider_id: Strng,
	exact: HashMap<Strng, Strng>,
	/// (family keyword lowercased, target, priority), sorted ascending by
	/// priority; lower wins.
	family: Vec<(String, Strng, i32)>,
	reasoning_target: Option<Strng>,
	default_target: Option<Strng>,
	cached_at: Instant,
}

impl CompiledCodeSwitch {
	/// Precedence: exact, then reasoning (iff the request opted into
	/// thinking), then family by ascending priority, then default.
	pub fn resolve(&self, model: &str, wants_reasoning: bool) -> Option<Strng> {
		if let Some(target) = self.exact.get(model) {
			return Some(target.clone());
		}
		if wants_reasoning && let Some(target) = &self.reasoning_target {
			return Some(target.clone());
		}
		let lower = model.to_lowercase();
		for (family, target, _) in &self.family {
			if lower.contains(family.as_str()) {
				return Some(target.clone());
			}
		}
		self.default_target.clone()
	}
}

pub struct MappingEngine {
	conversion: Mutex<HashMap<Strng, Arc<ConversionMappings>>>,
	code_switch: Mutex<HashMap<CliType, Arc<CompiledCodeSwitch>>>,
}

impl MappingEngine {
	pub fn new() -> MappingEngine {
		MappingEngine {
			conversion: Mutex::new(HashMap::new()),
			code_switch: Mutex::new(HashMap::new()),
		}
	}

	/// Map a conversion-proxy model; a missing entry passes through
	/// unchanged.
	pub fn conversion_target(&self, store: &Store, proxy_id: &Strng, model: &str) -> Option<Strng> {
		let mappings = {
			let mut cache = self.conversion.lock().unwrap();
			match cache.get(proxy_id) {
				Some(m) => m.clone(),
				None => {
					let mut map = HashMap::new();
					let mut default_target = None;
					for row in store.mappings_for_proxy(proxy_id) {
						if row.is_default {
							default_target = Some(row.target_model.clone());
						}
						map.insert(row.source_model, row.target_model);
					}
					let compiled = Arc::new(ConversionMappings {
						map,
						default_target,
					});
					cache.insert(proxy_id.clone(), compiled.clone());
					compiled
				},
			}
		};
		mappings.resolve(model)
	}

	/// The compiled rule set for a code-assistant route, honoring the TTL.
	pub fn code_switch(&self, store: &Store, cli: CliType) -> Option<Arc<CompiledCodeSwitch>> {
		{
			let cache = self.code_switch.lock().unwrap();
			if let Some(compiled) = cache.get(&cli)
				&& compiled.cached_at.elapsed() < CODE_SWITCH_TTL
			{
				return Some(compiled.clone());
			}
		}
		let switch = store.code_switch(cli)?;
		let rules = store.code_switch_rules(cli, &switch.provider_id);
		let mut exact = HashMap::new();
		let mut family = Vec::new();
		let mut reasoning_target = None;
		let mut default_target = None;
		for rule in rules {
			match rule.kind {
				MappingKind::Exact => {
					exact.insert(rule.source_model, rule.target_model);
				},
				MappingKind::Family => family.push((
					rule.source_model.to_lowercase(),
					rule.target_model,
					rule.priority,
				)),
				MappingKind::Reasoning => reasoning_target = Some(rule.target_model),
				MappingKind::Default => default_target = Some(rule.target_model),
			}
		}
		family.sort_by_key(|(_, _, priority)| *priority);
		let compiled = Arc::new(CompiledCodeSwitch {
			provider_id: switch.provider_id,
			exact,
			family,
			reasoning_target,
			default_target,
			cached_at: Instant::now(),
		});
		self
			.code_switch
			.lock()
			.unwrap()
			.insert(cli, compiled.clone());
		Some(compiled)
	}

	pub fn invalidate_proxy(&self, proxy_id: &str) {
		self
			.conversion
			.lock()
			.unwrap()
			.retain(|id, _| id.as_str() != proxy_id);
	}

	/// Code-switch invalidation is by CLI type only, never per provider.
	pub fn invalidate_cli(&self, cli: CliType) {
		self.code_switch.lock().unwrap().remove(&cli);
	}

	pub fn clear(&self) {
		self.conversion.lock().unwrap().clear();
		self.code_switch.lock().unwrap().clear();
	}
}

impl Default for MappingEngine {
	fn default() -> Self {
		Self::new()
	}
}

/// `<adapterType>/<model>` identifiers select a provider by adapter type
/// and forward with the prefix stripped.
pub fn parse_provider_prefix(model: &str) -> Option<(crate::llm::AdapterKind, &str)> {
	let (prefix, rest) = model.split_once('/')?;
	let kind = crate::llm::AdapterKind::from_name(prefix)?;
	if rest.is_empty() {
		return None;
	}
	Some((kind, rest))
}

pub fn is_codex_default_model(model: &str) -> bool {
	CODEX_DEFAULT_MODELS.contains(&model)
}

#[cfg(test)]
mod tests {
	use std::sync::Arc as StdArc;

	use amux_core::strng;

	use super::*;
	use crate::llm::AdapterKind;
	use crate::store::{CodeSwitch, CodeSwitchRule, ModelMapping, PlaintextSecrets};

	fn store() -> Store {
		Store::new(StdArc::new(PlaintextSecrets))
	}

	fn rule(kind: MappingKind, source: &str, target: &str, priority: i32) -> CodeSwitchRule {
		CodeSwitchRule {
			cli: CliType::ClaudeCode,
			provider_id: strng::new("pv"),
			source_model: strng::new(source),
			target_model: strng::new(target),
			kind,
			priority,
			active: true,
		}
	}

	fn engine_with_rules(rules: Vec<CodeSwitchRule>) -> (MappingEngine, Store) {
		let s = store();
		s.set_code_switch(CodeSwitch {
			cli: CliType::ClaudeCode,
			provider_id: strng::new("pv"),
			enabled: true,
		});
		s.set_code_switch_rules(CliType::ClaudeCode, rules);
		(MappingEngine::new(), s)
	}

	#[test]
	fn conversion_lookup_and_passthrough() {
		let s = store();
		s.set_mappings(
			&strng::new("px"),
			vec![ModelMapping {
				proxy_id: strng::new("px"),
				source_model: strng::new("claude-3-opus"),
				target_model: strng::new("moonshot-v1-32k"),
				is_default: false,
			}],
		);
		let engine = MappingEngine::new();
		assert_eq!(
			engine.conversion_target(&s, &strng::new("px"), "claude-3-opus"),
			Some(strng::new("moonshot-v1-32k"))
		);
		assert_eq!(
			engine.conversion_target(&s, &strng::new("px"), "unmapped-model"),
			None
		);
	}

	#[test]
	fn conversion_cache_invalidation_reloads() {
		let s = store();
		let px = strng::new("px");
		s.set_mappings(
			&px,
			vec![ModelMapping {
				proxy_id: px.clone(),
				source_model: strng::new("a"),
				target_model: strng::new("b"),
				is_default: false,
			}],
		);
		let engine = MappingEngine::new();
		assert_eq!(engine.conversion_target(&s, &px, "a"), Some(strng::new("b")));

		s.set_mappings(
			&px,
			vec![ModelMapping {
				proxy_id: px.clone(),
				source_model: strng::new("a"),
				target_model: strng::new("c"),
				is_default: false,
			}],
		);
		// Stale until invalidated
		assert_eq!(engine.conversion_target(&s, &px, "a"), Some(strng::new("b")));
		engine.invalidate_proxy(&px);
		assert_eq!(engine.conversion_target(&s, &px, "a"), Some(strng::new("c")));
	}

	#[test]
	fn code_switch_precedence_order() {
		let (engine, s) = engine_with_rules(vec![
			rule(MappingKind::Exact, "claude-3-opus", "exact-target", 0),
			rule(MappingKind::Reasoning, "", "reasoning-target", 0),
			rule(MappingKind::Family, "opus", "family-opus", 2),
			rule(MappingKind::Family, "claude", "family-claude", 1),
			rule(MappingKind::Default, "", "default-target", 0),
		]);
		let compiled = engine.code_switch(&s, CliType::ClaudeCode).unwrap();

		// exact wins over everything
		assert_eq!(
			compiled.resolve("claude-3-opus", true),
			Some(strng::new("exact-target"))
		);
		// reasoning applies only when thinking was requested
		assert_eq!(
			compiled.resolve("claude-3-sonnet", true),
			Some(strng::new("reasoning-target"))
		);
		// family: lowest priority number first, case-insensitive substring
		assert_eq!(
			compiled.resolve("Claude-3-Sonnet", false),
			Some(strng::new("family-claude"))
		);
		// default catches the rest
		assert_eq!(
			compiled.resolve("some-other-model", false),
			Some(strng::new("default-target"))
		);
	}

	#[test]
	fn code_switch_family_priority_ordering() {
		let (engine, s) = engine_with_rules(vec![
			rule(MappingKind::Family, "opus", "low-priority", 5),
			rule(MappingKind::Family, "opus", "high-priority", 1),
		]);
		let compiled = engine.code_switch(&s, CliType::ClaudeCode).unwrap();
		assert_eq!(
			compiled.resolve("claude-3-opus", false),
			Some(strng::new("high-priority"))
		);
	}

	#[test]
	fn code_switch_passthrough_when_nothing_matches() {
		let (engine, s) = engine_with_rules(vec![rule(MappingKind::Exact, "a", "b", 0)]);
		let compiled = engine.code_switch(&s, CliType::ClaudeCode).unwrap();
		assert_eq!(compiled.resolve("unrelated", false), None);
	}

	#[test]
	fn code_switch_invalidation_is_per_cli() {
		let (engine, s) = engine_with_rules(vec![rule(MappingKind::Exact, "a", "b", 0)]);
		let first = engine.code_switch(&s, CliType::ClaudeCode).unwrap();
		s.set_code_switch_rules(
			CliType::ClaudeCode,
			vec![rule(MappingKind::Exact, "a", "changed", 0)],
		);
		// TTL has not elapsed; still cached
		let cached = engine.code_switch(&s, CliType::ClaudeCode).unwrap();
		assert!(StdArc::ptr_eq(&first, &cached));
		engine.invalidate_cli(CliType::ClaudeCode);
		let reloaded = engine.code_switch(&s, CliType::ClaudeCode).unwrap();
		assert_eq!(reloaded.resolve("a", false), Some(strng::new("changed")));
	}

	#[test]
	fn provider_prefix_parsing() {
		assert_eq!(
			parse_provider_prefix("moonshot/kimi-k2"),
			Some((AdapterKind::Moonshot, "kimi-k2"))
		);
		assert_eq!(
			parse_provider_prefix("openai-responses/gpt-5.2"),
			Some((AdapterKind::OpenAIResponses, "gpt-5.2"))
		);
		assert_eq!(parse_provider_prefix("not-an-adapter/m"), None);
		assert_eq!(parse_provider_prefix("plain-model"), None);
		assert_eq!(parse_provider_prefix("openai/"), None);
	}

	#[test]
	fn codex_default_models_require_mapping() {
		assert!(is_codex_default_model("gpt-5.2-codex"));
		assert!(!is_codex_default_model("kimi-k2"));
	}
}
