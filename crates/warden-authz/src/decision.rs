// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The result of an authorization decision.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::NotAuthorized;

/// Names the application handler that should render a denial.
///
/// The engine never invokes it; it travels with the decision so the caller
/// can pick a response (a login redirect, a custom 403 page, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DenialHandler(String);

impl DenialHandler {
	pub fn new(name: impl Into<String>) -> Self {
		Self(name.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for DenialHandler {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// How callers treat decisions flagged as indeterminate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndeterminatePolicy {
	/// Honour the decision as made (indeterminate decisions allow).
	#[default]
	Permissive,
	/// Refuse anything that could not be determined.
	Strict,
}

impl std::str::FromStr for IndeterminatePolicy {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"permissive" => Ok(Self::Permissive),
			"strict" => Ok(Self::Strict),
			other => Err(format!(
				"unknown indeterminate policy '{other}' (expected 'permissive' or 'strict')"
			)),
		}
	}
}

/// Immutable outcome of evaluating an ACL or ACL collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizationDecision {
	allow: bool,
	indeterminate: bool,
	reason: Option<String>,
	denial_handler: Option<DenialHandler>,
}

impl AuthorizationDecision {
	pub fn allowed() -> Self {
		Self {
			allow: true,
			indeterminate: false,
			reason: None,
			denial_handler: None,
		}
	}

	pub fn denied() -> Self {
		Self {
			allow: false,
			indeterminate: false,
			reason: None,
			denial_handler: None,
		}
	}

	/// A decision whose governing predicate could not be evaluated. It
	/// allows, and says so.
	pub fn indeterminate() -> Self {
		Self {
			allow: true,
			indeterminate: true,
			reason: None,
			denial_handler: None,
		}
	}

	pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
		self.reason = Some(reason.into());
		self
	}

	pub(crate) fn with_optional_reason(mut self, reason: Option<String>) -> Self {
		self.reason = reason;
		self
	}

	pub fn with_denial_handler(mut self, handler: DenialHandler) -> Self {
		self.denial_handler = Some(handler);
		self
	}

	pub(crate) fn with_optional_denial_handler(mut self, handler: Option<DenialHandler>) -> Self {
		self.denial_handler = handler;
		self
	}

	/// Fills in the denial handler from an enclosing default if none is set.
	pub(crate) fn or_denial_handler(mut self, fallback: Option<&DenialHandler>) -> Self {
		if self.denial_handler.is_none() {
			self.denial_handler = fallback.cloned();
		}
		self
	}

	pub fn allow(&self) -> bool {
		self.allow
	}

	pub fn is_indeterminate(&self) -> bool {
		self.indeterminate
	}

	pub fn reason(&self) -> Option<&str> {
		self.reason.as_deref()
	}

	pub fn denial_handler(&self) -> Option<&DenialHandler> {
		self.denial_handler.as_ref()
	}

	/// Whether the request may proceed under `policy`.
	pub fn is_allowed_under(&self, policy: IndeterminatePolicy) -> bool {
		match policy {
			IndeterminatePolicy::Permissive => self.allow,
			IndeterminatePolicy::Strict => self.allow && !self.indeterminate,
		}
	}

	/// Converts a negative decision into [`NotAuthorized`].
	pub fn ensure_allowed(&self, policy: IndeterminatePolicy) -> Result<(), NotAuthorized> {
		if self.is_allowed_under(policy) {
			return Ok(());
		}
		Err(NotAuthorized {
			reason: self.reason.clone(),
			denial_handler: self.denial_handler.clone(),
			indeterminate: self.indeterminate,
		})
	}
}
