// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Declarative policy configuration for the Warden authorization engine.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML policy
//!   file, environment)
//! - A small expression language for rule predicates
//! - Compilation of a loaded policy into an [`warden_authz::AclCollection`]
//!
//! # Usage
//!
//! ```ignore
//! use warden_authz_config::{compile, load_policy_with_file};
//!
//! let policy = load_policy_with_file("policy.toml")?;
//! let acls = compile(&policy)?;
//! ```

pub mod compile;
pub mod error;
pub mod expr;
pub mod layer;
pub mod sections;
pub mod sources;

pub use compile::compile;
pub use error::ConfigError;
pub use expr::{parse_predicate, ExprError};
pub use layer::PolicyConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use std::str::FromStr;

use tracing::level_filters::LevelFilter;
use tracing::{debug, info};

/// Fully resolved policy configuration.
#[derive(Debug, Clone, Default)]
pub struct PolicyConfig {
	pub engine: EngineConfig,
	pub acls: Vec<AclConfig>,
}

impl PolicyConfig {
	pub fn rule_count(&self) -> usize {
		self.acls.iter().map(|acl| acl.rules.len()).sum()
	}
}

/// Load the policy from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`WARDEN_AUTHZ_*`)
/// 2. Policy file (`/etc/warden/policy.toml`), skipped if absent
/// 3. Built-in defaults
pub fn load_policy() -> Result<PolicyConfig, ConfigError> {
	load_policy_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource::process()),
	])
}

/// Load the policy from a specific file, which must exist.
pub fn load_policy_with_file(
	policy_path: impl Into<std::path::PathBuf>,
) -> Result<PolicyConfig, ConfigError> {
	load_policy_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::required(policy_path)),
		Box::new(EnvSource::process()),
	])
}

/// Load the policy from an explicit set of sources.
pub fn load_policy_from_sources(
	mut sources: Vec<Box<dyn ConfigSource>>,
) -> Result<PolicyConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = PolicyConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
fn finalize(layer: PolicyConfigLayer) -> Result<PolicyConfig, ConfigError> {
	let engine = layer.engine.unwrap_or_default().finalize();
	let acls = layer.acls.unwrap_or_default();

	validate_engine(&engine)?;
	validate_acls(&acls)?;

	let config = PolicyConfig { engine, acls };
	info!(
		indeterminate_policy = ?config.engine.indeterminate_policy,
		log_level = %config.engine.log_level,
		acls = config.acls.len(),
		rules = config.rule_count(),
		"Policy configuration loaded"
	);
	Ok(config)
}

fn validate_engine(engine: &EngineConfig) -> Result<(), ConfigError> {
	LevelFilter::from_str(&engine.log_level).map_err(|_| {
		ConfigError::invalid_value(
			"engine.log_level",
			format!(
				"'{}' is not a log level (expected trace, debug, info, warn, error or off)",
				engine.log_level
			),
		)
	})?;
	Ok(())
}

/// Validate cross-field rules the engine cannot check on its own.
fn validate_acls(acls: &[AclConfig]) -> Result<(), ConfigError> {
	for (index, acl) in acls.iter().enumerate() {
		if acl.default_reason.is_some() && acl.default.is_none() {
			return Err(ConfigError::validation(format!(
				"acls[{index}].default_reason is set but acls[{index}].default is not"
			)));
		}
		if acl.base_path.trim().is_empty() {
			return Err(ConfigError::invalid_value(
				format!("acls[{index}].base_path"),
				"must not be empty",
			));
		}
	}
	Ok(())
}
