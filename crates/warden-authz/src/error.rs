// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for rule construction and for denied requests.

use thiserror::Error;

use crate::decision::DenialHandler;

/// Result type alias for rule construction.
pub type Result<T> = std::result::Result<T, AuthzError>;

/// Errors raised while building rules.
///
/// These are configuration mistakes and are reported when an ACL is being
/// assembled, never while a request is being evaluated.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthzError {
	#[error("object name must not be empty")]
	EmptyObjectName,

	#[error("invalid object name '{0}': object names must not contain '/'")]
	InvalidObjectName(String),

	#[error("rule declares no targets")]
	NoTargets,

	#[error("denial handler '{0}' can only be attached to a deny rule")]
	DenialHandlerOnAllow(String),
}

/// A request was denied.
///
/// This is the typed condition a caller raises once an
/// [`AuthorizationDecision`](crate::AuthorizationDecision) comes back negative.
/// Whatever surfaces it to the user (an HTTP 403, a CLI exit code) lives
/// outside the engine.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("not authorized: {}", describe_reason(.reason))]
pub struct NotAuthorized {
	pub reason: Option<String>,
	pub denial_handler: Option<DenialHandler>,
	pub indeterminate: bool,
}

fn describe_reason(reason: &Option<String>) -> &str {
	reason.as_deref().unwrap_or("access denied")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn not_authorized_displays_reason() {
		let err = NotAuthorized {
			reason: Some("The current user must be anonymous".to_string()),
			denial_handler: None,
			indeterminate: false,
		};
		assert_eq!(
			err.to_string(),
			"not authorized: The current user must be anonymous"
		);
	}

	#[test]
	fn not_authorized_without_reason() {
		let err = NotAuthorized {
			reason: None,
			denial_handler: None,
			indeterminate: true,
		};
		assert_eq!(err.to_string(), "not authorized: access denied");
	}

	#[test]
	fn invalid_object_name_message() {
		let err = AuthzError::InvalidObjectName("blog/post".to_string());
		assert!(err.to_string().contains("must not contain '/'"));
	}
}
