//! The auth gate: key extraction, platform keys, pass-through keys, and the
//! internal-request shortcut used by the embedded UI.

use amux_core::strng::Strng;

use crate::config::Settings;
use crate::http::{HeaderMap, header};
use crate::proxy::ProxyError;
use crate::store::Store;
use crate::telemetry::log::RequestSource;

/// Keys issued by this gateway carry this prefix.
pub const PLATFORM_KEY_PREFIX: &str = "sk-amux.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyDecision {
	/// Use the provider's stored credential.
	ProviderStored,
	/// Forward the client's credential verbatim; never cache the bridge.
	PassThrough(String),
	/// A platform key validated against the key table; upstream still uses
	/// the provider's stored credential.
	Platform { key_id: Strng },
}

impl KeyDecision {
	pub fn is_pass_through(&self) -> bool {
		matches!(self, KeyDecision::PassThrough(_))
	}
}

/// `Authorization: Bearer <k>`, then bare `Authorization`, then `x-api-key`.
pub fn extract_key(headers: &HeaderMap) -> Option<String> {
	if let Some(auth) = headers
		.get(header::AUTHORIZATION)
		.and_then(|v| v.to_str().ok())
	{
		if let Some(bearer) = auth.strip_prefix("Bearer ") {
			return Some(bearer.trim().to_string());
		}
		return Some(auth.trim().to_string());
	}
	headers
		.get("x-api-key")
		.and_then(|v| v.to_str().ok())
		.map(|v| v.trim().to_string())
}

/// A Cloudflare header marks the request as arriving through the tunnel.
pub fn detect_source(headers: &HeaderMap) -> RequestSource {
	for h in ["cf-ray", "cf-connecting-ip", "cf-visitor"] {
		if headers.contains_key(h) {
			return RequestSource::Tunnel;
		}
	}
	RequestSource::Local
}

pub fn authenticate(
	store: &Store,
	settings: &Settings,
	headers: &HeaderMap,
) -> Result<(KeyDecision, RequestSource), ProxyError> {
	let source = detect_source(headers);
	let key = extract_key(headers);

	if !settings.security.unified_api_key.enabled {
		return Ok((KeyDecision::ProviderStored, source));
	}

	let Some(key) = key else {
		// Local requests with no credential at all are internal (the embedded
		// UI); everything else needs a key.
		if source == RequestSource::Local {
			return Ok((KeyDecision::ProviderStored, source));
		}
		return Err(ProxyError::MissingApiKey);
	};

	if key.starts_with(PLATFORM_KEY_PREFIX) {
		let row = store.platform_key(&key).ok_or(ProxyError::InvalidApiKey)?;
		if !row.enabled {
			return Err(ProxyError::InvalidApiKey);
		}
		store.touch_platform_key(&row.id);
		return Ok((KeyDecision::Platform { key_id: row.id }, source));
	}

	Ok((KeyDecision::PassThrough(key), source))
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use amux_core::strng;

	use super::*;
	use crate::http::HeaderValue;
	use crate::store::{PlaintextSecrets, PlatformKey};

	fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
		let mut h = HeaderMap::new();
		for (k, v) in pairs {
			h.insert(
				crate::http::HeaderName::try_from(*k).unwrap(),
				HeaderValue::from_str(v).unwrap(),
			);
		}
		h
	}

	fn store_with_key(enabled: bool) -> Store {
		let store = Store::new(Arc::new(PlaintextSecrets));
		store.set_platform_keys(vec![PlatformKey {
			id: strng::new("k1"),
			key: strng::new("sk-amux.abc123"),
			name: None,
			enabled,
		}]);
		store
	}

	fn settings(auth: bool) -> Settings {
		let mut s = Settings::default();
		s.security.unified_api_key.enabled = auth;
		s
	}

	#[test]
	fn extraction_order() {
		assert_eq!(
			extract_key(&headers(&[("authorization", "Bearer abc")])),
			Some("abc".to_string())
		);
		assert_eq!(
			extract_key(&headers(&[("authorization", "rawkey")])),
			Some("rawkey".to_string())
		);
		assert_eq!(
			extract_key(&headers(&[("x-api-key", "xyz")])),
			Some("xyz".to_string())
		);
		assert_eq!(
			extract_key(&headers(&[("authorization", "Bearer a"), ("x-api-key", "b")])),
			Some("a".to_string())
		);
		assert_eq!(extract_key(&headers(&[])), None);
	}

	#[test]
	fn tunnel_detection() {
		assert_eq!(detect_source(&headers(&[])), RequestSource::Local);
		assert_eq!(
			detect_source(&headers(&[("cf-ray", "8abc")])),
			RequestSource::Tunnel
		);
		assert_eq!(
			detect_source(&headers(&[("cf-connecting-ip", "1.2.3.4")])),
			RequestSource::Tunnel
		);
	}

	#[test]
	fn auth_disabled_uses_stored_key() {
		let store = store_with_key(true);
		let (decision, _) = authenticate(&store, &settings(false), &headers(&[])).unwrap();
		assert_eq!(decision, KeyDecision::ProviderStored);
	}

	#[test]
	fn internal_shortcut_applies_to_local_keyless_requests() {
		let store = store_with_key(true);
		let (decision, source) = authenticate(&store, &settings(true), &headers(&[])).unwrap();
		assert_eq!(decision, KeyDecision::ProviderStored);
		assert_eq!(source, RequestSource::Local);

		// Through the tunnel the same request is rejected
		let err = authenticate(&store, &settings(true), &headers(&[("cf-ray", "x")]));
		assert!(matches!(err, Err(ProxyError::MissingApiKey)));
	}

	#[test]
	fn platform_keys_validate_against_the_table() {
		let store = store_with_key(true);
		let (decision, _) = authenticate(
			&store,
			&settings(true),
			&headers(&[("authorization", "Bearer sk-amux.abc123")]),
		)
		.unwrap();
		assert_eq!(
			decision,
			KeyDecision::Platform {
				key_id: strng::new("k1")
			}
		);
		assert!(store.key_last_used("k1").is_some());

		let err = authenticate(
			&store,
			&settings(true),
			&headers(&[("authorization", "Bearer sk-amux.wrong")]),
		);
		assert!(matches!(err, Err(ProxyError::InvalidApiKey)));
	}

	#[test]
	fn disabled_platform_key_is_rejected() {
		let store = store_with_key(false);
		let err = authenticate(
			&store,
			&settings(true),
			&headers(&[("authorization", "Bearer sk-amux.abc123")]),
		);
		assert!(matches!(err, Err(ProxyError::InvalidApiKey)));
	}

	#[test]
	fn unknown_keys_pass_through_verbatim() {
		let store = store_with_key(true);
		let (decision, _) = authenticate(
			&store,
			&settings(true),
			&headers(&[("authorization", "Bearer my-own-key")]),
		)
		.unwrap();
		assert_eq!(decision, KeyDecision::PassThrough("my-own-key".to_string()));
	}
}
