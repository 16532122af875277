// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Partial policy configuration produced by a single source.

use serde::{Deserialize, Serialize};

use crate::sections::{AclConfig, EngineConfigLayer};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PolicyConfigLayer {
	#[serde(default)]
	pub engine: Option<EngineConfigLayer>,
	#[serde(default)]
	pub acls: Option<Vec<AclConfig>>,
}

impl PolicyConfigLayer {
	/// Overlays `other` on top of `self`.
	///
	/// Engine settings merge field by field. ACL lists do not merge: a
	/// source that declares any ACLs replaces the whole list.
	pub fn merge(&mut self, other: Self) {
		if let Some(overlay) = other.engine {
			self.engine.get_or_insert_with(Default::default).merge(overlay);
		}
		if other.acls.is_some() {
			self.acls = other.acls;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use warden_authz::IndeterminatePolicy;

	#[test]
	fn test_engine_merges_fieldwise() {
		let mut base = PolicyConfigLayer {
			engine: Some(EngineConfigLayer {
				log_level: Some("debug".to_string()),
				..Default::default()
			}),
			acls: None,
		};
		base.merge(PolicyConfigLayer {
			engine: Some(EngineConfigLayer {
				indeterminate_policy: Some(IndeterminatePolicy::Strict),
				..Default::default()
			}),
			acls: None,
		});

		let engine = base.engine.unwrap();
		assert_eq!(engine.log_level.as_deref(), Some("debug"));
		assert_eq!(engine.indeterminate_policy, Some(IndeterminatePolicy::Strict));
	}

	#[test]
	fn test_acls_replace_as_a_whole() {
		let mut base = PolicyConfigLayer {
			engine: None,
			acls: Some(vec![AclConfig::default(), AclConfig::default()]),
		};

		base.merge(PolicyConfigLayer::default());
		assert_eq!(base.acls.as_ref().map(Vec::len), Some(2));

		base.merge(PolicyConfigLayer {
			engine: None,
			acls: Some(vec![AclConfig {
				base_path: "/blog".to_string(),
				..Default::default()
			}]),
		});
		let acls = base.acls.unwrap();
		assert_eq!(acls.len(), 1);
		assert_eq!(acls[0].base_path, "/blog");
	}
}
