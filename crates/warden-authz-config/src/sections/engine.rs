// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Engine configuration section.

use serde::{Deserialize, Serialize};
use warden_authz::IndeterminatePolicy;

pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EngineConfigLayer {
	pub indeterminate_policy: Option<IndeterminatePolicy>,
	pub log_level: Option<String>,
	pub default_denial_handler: Option<String>,
}

impl EngineConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.indeterminate_policy.is_some() {
			self.indeterminate_policy = other.indeterminate_policy;
		}
		if other.log_level.is_some() {
			self.log_level = other.log_level;
		}
		if other.default_denial_handler.is_some() {
			self.default_denial_handler = other.default_denial_handler;
		}
	}

	pub fn finalize(self) -> EngineConfig {
		EngineConfig {
			indeterminate_policy: self.indeterminate_policy.unwrap_or_default(),
			log_level: self
				.log_level
				.unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
			default_denial_handler: self.default_denial_handler,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
	/// How indeterminate decisions are treated by callers.
	pub indeterminate_policy: IndeterminatePolicy,
	/// Fallback log level when `RUST_LOG` is unset.
	pub log_level: String,
	/// Denial handler for decisions that do not name one.
	pub default_denial_handler: Option<String>,
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			indeterminate_policy: IndeterminatePolicy::Permissive,
			log_level: DEFAULT_LOG_LEVEL.to_string(),
			default_denial_handler: None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_layer_finalize_defaults() {
		let config = EngineConfigLayer::default().finalize();
		assert_eq!(config, EngineConfig::default());
		assert_eq!(config.log_level, "info");
	}

	#[test]
	fn test_merge_overwrites() {
		let mut base = EngineConfigLayer {
			indeterminate_policy: Some(IndeterminatePolicy::Permissive),
			log_level: Some("debug".to_string()),
			default_denial_handler: Some("login".to_string()),
		};
		let overlay = EngineConfigLayer {
			indeterminate_policy: Some(IndeterminatePolicy::Strict),
			log_level: None,
			..Default::default()
		};
		base.merge(overlay);
		assert_eq!(base.indeterminate_policy, Some(IndeterminatePolicy::Strict));
		assert_eq!(base.log_level.as_deref(), Some("debug"));
		assert_eq!(base.default_denial_handler.as_deref(), Some("login"));
	}

	#[test]
	fn test_deserialize_layer_partial() {
		let layer: EngineConfigLayer =
			toml::from_str(r#"indeterminate_policy = "strict""#).unwrap();
		assert_eq!(layer.indeterminate_policy, Some(IndeterminatePolicy::Strict));
		assert!(layer.log_level.is_none());
	}

	#[test]
	fn test_deserialize_rejects_unknown_policy() {
		let result: Result<EngineConfigLayer, _> =
			toml::from_str(r#"indeterminate_policy = "lenient""#);
		assert!(result.is_err());
	}
}
