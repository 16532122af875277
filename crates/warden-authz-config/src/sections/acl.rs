// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! ACL configuration section.
//!
//! ```toml
//! [[acls]]
//! base_path = "/blog"
//! default_denial_handler = "login"
//!
//! [[acls.rules]]
//! effect = "deny"
//! targets = ["post_article", "object:blog:delete_post"]
//! predicate = 'not in_any_group("editors", "admins")'
//! message = "Only editors may do that"
//! ```

use serde::{Deserialize, Deserializer, Serialize};

/// Prefix that marks a rule target as a named object instead of a path.
pub const OBJECT_TARGET_PREFIX: &str = "object:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
	Allow,
	Deny,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AclConfig {
	#[serde(default = "default_base_path")]
	pub base_path: String,
	/// Effect applied when no rule matches.
	#[serde(default)]
	pub default: Option<Effect>,
	#[serde(default)]
	pub default_reason: Option<String>,
	#[serde(default)]
	pub default_denial_handler: Option<String>,
	#[serde(default)]
	pub rules: Vec<RuleConfig>,
}

impl Default for AclConfig {
	fn default() -> Self {
		Self {
			base_path: default_base_path(),
			default: None,
			default_reason: None,
			default_denial_handler: None,
			rules: Vec::new(),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
	pub effect: Effect,
	/// Paths relative to the ACL base path, or `object:<name>`.
	#[serde(alias = "target", deserialize_with = "one_or_many")]
	pub targets: Vec<String>,
	/// Predicate expression, e.g. `in_group("admins") and not is_anonymous()`.
	#[serde(default)]
	pub predicate: Option<String>,
	#[serde(default)]
	pub named_args: Vec<String>,
	#[serde(default)]
	pub positional_args: usize,
	#[serde(default)]
	pub message: Option<String>,
	#[serde(default = "default_propagate")]
	pub propagate: bool,
	#[serde(default)]
	pub force_inclusion: bool,
	#[serde(default)]
	pub denial_handler: Option<String>,
}

fn default_base_path() -> String {
	"/".to_string()
}

fn default_propagate() -> bool {
	true
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
	One(String),
	Many(Vec<String>),
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(match OneOrMany::deserialize(deserializer)? {
		OneOrMany::One(target) => vec![target],
		OneOrMany::Many(targets) => targets,
	})
}
