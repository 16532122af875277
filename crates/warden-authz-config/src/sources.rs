// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: built-in defaults, TOML policy files and
//! environment variables.

use std::path::PathBuf;

use tracing::{debug, trace};
use warden_authz::IndeterminatePolicy;

use crate::error::ConfigError;
use crate::layer::PolicyConfigLayer;
use crate::sections::EngineConfigLayer;

/// System-wide policy file read by [`crate::load_policy`].
pub const SYSTEM_POLICY_PATH: &str = "/etc/warden/policy.toml";

pub const ENV_INDETERMINATE_POLICY: &str = "WARDEN_AUTHZ_INDETERMINATE_POLICY";
pub const ENV_LOG_LEVEL: &str = "WARDEN_AUTHZ_LOG_LEVEL";
pub const ENV_DEFAULT_DENIAL_HANDLER: &str = "WARDEN_AUTHZ_DEFAULT_DENIAL_HANDLER";

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<PolicyConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<PolicyConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(PolicyConfigLayer::default())
	}
}

/// TOML policy file source.
pub struct TomlSource {
	path: PathBuf,
	required: bool,
}

impl TomlSource {
	/// A file that is skipped when absent.
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self {
			path: path.into(),
			required: false,
		}
	}

	/// A file that must exist.
	pub fn required(path: impl Into<PathBuf>) -> Self {
		Self {
			path: path.into(),
			required: true,
		}
	}

	pub fn system() -> Self {
		Self::new(SYSTEM_POLICY_PATH)
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-policy"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<PolicyConfigLayer, ConfigError> {
		if !self.path.exists() {
			if self.required {
				return Err(ConfigError::FileNotFound(self.path.clone()));
			}
			debug!(path = %self.path.display(), "policy file not found, skipping");
			return Ok(PolicyConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading policy file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: PolicyConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!(
			acls = layer.acls.as_ref().map_or(0, Vec::len),
			"parsed policy layer from TOML"
		);
		Ok(layer)
	}
}

type Lookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Environment variable source.
///
/// Convention: WARDEN_AUTHZ_<FIELD>. Only the engine section can be set
/// from the environment; ACLs always come from a policy file.
pub struct EnvSource {
	lookup: Lookup,
}

impl EnvSource {
	/// Reads the process environment.
	pub fn process() -> Self {
		Self::with_lookup(|name| std::env::var(name).ok())
	}

	/// Reads variables through `lookup` instead of the process environment.
	pub fn with_lookup(lookup: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Self {
		Self {
			lookup: Box::new(lookup),
		}
	}

	fn var(&self, name: &str) -> Option<String> {
		(self.lookup)(name).filter(|s| !s.is_empty())
	}

	fn load_engine(&self) -> Result<EngineConfigLayer, ConfigError> {
		let indeterminate_policy = match self.var(ENV_INDETERMINATE_POLICY) {
			Some(value) => Some(value.parse::<IndeterminatePolicy>().map_err(|message| {
				ConfigError::invalid_value(ENV_INDETERMINATE_POLICY, message)
			})?),
			None => None,
		};

		Ok(EngineConfigLayer {
			indeterminate_policy,
			log_level: self.var(ENV_LOG_LEVEL),
			default_denial_handler: self.var(ENV_DEFAULT_DENIAL_HANDLER),
		})
	}
}

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<PolicyConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(PolicyConfigLayer {
			engine: Some(self.load_engine()?),
			acls: None,
		})
	}
}
