//! Proxy-chain resolution.
//!
//! Chains are a DAG of ids resolved against the store with a visited set;
//! there are no parent pointers and no depth cap beyond the cycle check.

use std::collections::HashSet;

use amux_core::strng::Strng;

use crate::proxy::ProxyError;
use crate::store::{OutboundTarget, Provider, Store};

#[derive(Debug)]
pub struct ResolvedChain {
	/// Proxy ids walked, in order, starting with the entry proxy.
	pub chain: Vec<Strng>,
	pub provider: Provider,
}

pub fn resolve_chain(store: &Store, id: &str) -> Result<ResolvedChain, ProxyError> {
	let mut visited: HashSet<Strng> = HashSet::new();
	let mut chain = Vec::new();
	let mut current = Strng::from(id);
	loop {
		if !visited.insert(current.clone()) {
			return Err(ProxyError::CircularProxy(current.to_string()));
		}
		let proxy = store
			.proxy(&current)
			.ok_or(ProxyError::ProxyNotFound)?;
		if !proxy.enabled {
			return Err(ProxyError::ProxyDisabled(proxy.id.to_string()));
		}
		chain.push(proxy.id.clone());
		match &proxy.outbound {
			OutboundTarget::Provider { id } => {
				let provider = store
					.provider(id)
					.ok_or_else(|| ProxyError::ProviderNotFound(id.to_string()))?;
				if !provider.enabled {
					return Err(ProxyError::ProviderDisabled(provider.id.to_string()));
				}
				return Ok(ResolvedChain { chain, provider });
			},
			OutboundTarget::Proxy { id } => {
				current = id.clone();
			},
		}
	}
}

/// The terminal provider id and chain length; used by the self-test path.
pub fn find_bottom_provider(store: &Store, id: &str) -> Result<(Strng, usize), ProxyError> {
	let resolved = resolve_chain(store, id)?;
	Ok((resolved.provider.id, resolved.chain.len()))
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use amux_core::strng;

	use super::*;
	use crate::llm::AdapterKind;
	use crate::store::{PlaintextSecrets, Proxy};

	fn store() -> Store {
		Store::new(Arc::new(PlaintextSecrets))
	}

	fn provider(id: &str, enabled: bool) -> Provider {
		Provider {
			id: strng::new(id),
			name: strng::new(id),
			adapter: AdapterKind::Moonshot,
			base_url: None,
			chat_path: None,
			models_path: None,
			api_key: None,
			models: vec![],
			enabled,
			passthrough_path: None,
			is_pool: false,
			oauth_provider_type: None,
		}
	}

	fn proxy(id: &str, outbound: OutboundTarget, enabled: bool) -> Proxy {
		Proxy {
			id: strng::new(id),
			name: None,
			inbound: AdapterKind::Anthropic,
			outbound,
			path: strng::new(id),
			enabled,
		}
	}

	#[test]
	fn resolves_a_two_hop_chain() {
		let s = store();
		s.insert_provider(provider("pv", true));
		s.insert_proxy(proxy(
			"a",
			OutboundTarget::Proxy {
				id: strng::new("b"),
			},
			true,
		));
		s.insert_proxy(proxy(
			"b",
			OutboundTarget::Provider {
				id: strng::new("pv"),
			},
			true,
		));
		let resolved = resolve_chain(&s, "a").unwrap();
		assert_eq!(resolved.chain, vec![strng::new("a"), strng::new("b")]);
		assert_eq!(resolved.provider.id.as_str(), "pv");
		assert_eq!(find_bottom_provider(&s, "a").unwrap(), (strng::new("pv"), 2));
	}

	#[test]
	fn rejects_a_cycle_after_two_visits() {
		let s = store();
		s.insert_proxy(proxy(
			"a",
			OutboundTarget::Proxy {
				id: strng::new("b"),
			},
			true,
		));
		s.insert_proxy(proxy(
			"b",
			OutboundTarget::Proxy {
				id: strng::new("a"),
			},
			true,
		));
		match resolve_chain(&s, "a") {
			Err(ProxyError::CircularProxy(at)) => assert_eq!(at, "a"),
			other => panic!("expected CircularProxy, got {other:?}"),
		}
	}

	#[test]
	fn surfaces_missing_and_disabled_nodes() {
		let s = store();
		assert!(matches!(
			resolve_chain(&s, "nope"),
			Err(ProxyError::ProxyNotFound)
		));

		s.insert_proxy(proxy(
			"off",
			OutboundTarget::Provider {
				id: strng::new("pv"),
			},
			false,
		));
		assert!(matches!(
			resolve_chain(&s, "off"),
			Err(ProxyError::ProxyDisabled(_))
		));

		s.insert_proxy(proxy(
			"dangling",
			OutboundTarget::Provider {
				id: strng::new("missing"),
			},
			true,
		));
		assert!(matches!(
			resolve_chain(&s, "dangling"),
			Err(ProxyError::ProviderNotFound(_))
		));

		s.insert_provider(provider("pv-off", false));
		s.insert_proxy(proxy(
			"to-disabled",
			OutboundTarget::Provider {
				id: strng::new("pv-off"),
			},
			true,
		));
		assert!(matches!(
			resolve_chain(&s, "to-disabled"),
			Err(ProxyError::ProviderDisabled(_))
		));
	}
}
