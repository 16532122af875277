// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration error types.

use std::path::PathBuf;

use warden_authz::AuthzError;

use crate::expr::ExprError;

/// Errors that can occur while loading, validating or compiling a policy.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	/// I/O error reading the policy file
	#[error("Failed to read {path}: {source}")]
	FileRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// A policy file that must exist does not
	#[error("Policy file not found: {0}")]
	FileNotFound(PathBuf),

	/// TOML parsing error
	#[error("TOML parse error in {path}: {source}")]
	TomlParse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	/// Invalid value for a single key
	#[error("Invalid value for {key}: {message}")]
	InvalidValue { key: String, message: String },

	/// Cross-field validation error
	#[error("Validation error: {0}")]
	Validation(String),

	/// A rule's predicate expression could not be compiled
	#[error("Invalid predicate in {location}: {source}")]
	Predicate {
		location: String,
		#[source]
		source: ExprError,
	},

	/// The engine rejected a rule
	#[error("Invalid rule in {location}: {source}")]
	Rule {
		location: String,
		#[source]
		source: AuthzError,
	},
}

impl ConfigError {
	pub fn validation(msg: impl Into<String>) -> Self {
		Self::Validation(msg.into())
	}

	pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
		Self::InvalidValue {
			key: key.into(),
			message: message.into(),
		}
	}
}
