//! Bridge cache: LRU keyed by (proxy, provider).
//!
//! Bridges built for pass-through credentials never enter the cache; the
//! lock is held only for map mutations, never across I/O.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use amux_core::strng::Strng;

use crate::bridge::Bridge;

pub const DEFAULT_MAX_ENTRIES: usize = 50;

struct Entry {
	bridge: Arc<Bridge>,
	last_used: Instant,
}

pub struct BridgeCache {
	entries: Mutex<HashMap<(Strng, Strng), Entry>>,
	max_entries: usize,
}

impl BridgeCache {
	pub fn new(max_entries: usize) -> BridgeCache {
		BridgeCache {
			entries: Mutex::new(HashMap::new()),
			max_entries,
		}
	}

	pub fn get(&self, proxy_id: &Strng, provider_id: &Strng) -> Option<Arc<Bridge>> {
		let mut entries = self.entries.lock().unwrap();
		let entry = entries.get_mut(&(proxy_id.clone(), provider_id.clone()))?;
		entry.last_used = Instant::now();
		Some(entry.bridge.clone())
	}

	pub fn put(&self, proxy_id: Strng, provider_id: Strng, bridge: Arc<Bridge>) {
		let mut entries = self.entries.lock().unwrap();
		let key = (proxy_id, provider_id);
		if !entries.contains_key(&key) && entries.len() >= self.max_entries {
			// Evict the least recently used entry
			if let Some(oldest) = entries
				.iter()
				.min_by_key(|(_, e)| e.last_used)
				.map(|(k, _)| k.clone())
			{
				entries.remove(&oldest);
			}
		}
		entries.insert(
			key,
			Entry {
				bridge,
				last_used: Instant::now(),
			},
		);
	}

	pub fn invalidate(&self, proxy_id: &str) {
		self
			.entries
			.lock()
			.unwrap()
			.retain(|(p, _), _| p.as_str() != proxy_id);
	}

	pub fn invalidate_provider(&self, provider_id: &str) {
		self
			.entries
			.lock()
			.unwrap()
			.retain(|(_, p), _| p.as_str() != provider_id);
	}

	pub fn clear(&self) {
		self.entries.lock().unwrap().clear();
	}

	pub fn len(&self) -> usize {
		self.entries.lock().unwrap().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl Default for BridgeCache {
	fn default() -> Self {
		Self::new(DEFAULT_MAX_ENTRIES)
	}
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use amux_core::strng;

	use super::*;
	use crate::bridge::BridgeConfig;
	use crate::llm::AdapterKind;

	fn bridge() -> Arc<Bridge> {
		Arc::new(Bridge::new(
			AdapterKind::Anthropic,
			AdapterKind::Moonshot,
			BridgeConfig {
				api_key: None,
				base_url: "https://api.moonshot.cn".to_string(),
				chat_path: "/v1/chat/completions".to_string(),
				timeout: Duration::from_secs(60),
			},
		))
	}

	#[test]
	fn hit_refreshes_lru_order() {
		let cache = BridgeCache::new(2);
		cache.put(strng::new("p1"), strng::new("v"), bridge());
		cache.put(strng::new("p2"), strng::new("v"), bridge());
		// Touch p1 so p2 becomes the eviction candidate
		assert!(cache.get(&strng::new("p1"), &strng::new("v")).is_some());
		cache.put(strng::new("p3"), strng::new("v"), bridge());
		assert_eq!(cache.len(), 2);
		assert!(cache.get(&strng::new("p2"), &strng::new("v")).is_none());
		assert!(cache.get(&strng::new("p1"), &strng::new("v")).is_some());
		assert!(cache.get(&strng::new("p3"), &strng::new("v")).is_some());
	}

	#[test]
	fn size_never_exceeds_max() {
		let cache = BridgeCache::new(3);
		for i in 0..10 {
			cache.put(strng::new(format!("p{i}")), strng::new("v"), bridge());
			assert!(cache.len() <= 3);
		}
	}

	#[test]
	fn invalidate_removes_all_entries_for_scope() {
		let cache = BridgeCache::new(10);
		cache.put(strng::new("p1"), strng::new("v1"), bridge());
		cache.put(strng::new("p1"), strng::new("v2"), bridge());
		cache.put(strng::new("p2"), strng::new("v1"), bridge());

		cache.invalidate("p1");
		assert!(cache.get(&strng::new("p1"), &strng::new("v1")).is_none());
		assert!(cache.get(&strng::new("p1"), &strng::new("v2")).is_none());
		assert!(cache.get(&strng::new("p2"), &strng::new("v1")).is_some());

		cache.invalidate_provider("v1");
		assert!(cache.get(&strng::new("p2"), &strng::new("v1")).is_none());

		cache.put(strng::new("p3"), strng::new("v3"), bridge());
		cache.clear();
		assert!(cache.is_empty());
	}
}
