// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Extension point for application-specific predicates.

use std::fmt;

use super::message::Placeholders;
use crate::context::EvaluationContext;

/// Outcome of a [`Checker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
	Met,
	Unmet(Failure),
	Indeterminate,
}

impl Check {
	/// Unmet, using the predicate's message template as-is.
	pub fn unmet() -> Self {
		Self::Unmet(Failure::default())
	}

	/// Unmet, with extra values for the predicate's message template.
	pub fn unmet_with(placeholders: Placeholders) -> Self {
		Self::Unmet(Failure {
			reason: None,
			placeholders,
		})
	}

	/// Unmet, replacing the predicate's message template with `reason`.
	/// `reason` may itself contain placeholders.
	pub fn unmet_because(reason: impl Into<String>) -> Self {
		Self::Unmet(Failure {
			reason: Some(reason.into()),
			placeholders: Placeholders::new(),
		})
	}

	pub fn from_bool(met: bool) -> Self {
		if met {
			Self::Met
		} else {
			Self::unmet()
		}
	}
}

/// Details reported by a checker that is not met.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Failure {
	pub reason: Option<String>,
	pub placeholders: Placeholders,
}

impl Failure {
	pub fn with_placeholder(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.placeholders.insert(name.into(), value.into());
		self
	}
}

/// A user-defined condition.
///
/// Implementations are shared between every request evaluated concurrently,
/// so `check` takes `&self` and must report everything request-specific
/// through its return value.
pub trait Checker: fmt::Debug + Send + Sync {
	fn check(&self, ctx: &EvaluationContext<'_>) -> Check;

	/// Template used when the wrapping predicate has no message of its own.
	fn default_message(&self) -> &str {
		"The condition is not met"
	}

	/// Construction-time attributes exposed to the message template.
	fn attributes(&self) -> Placeholders {
		Placeholders::new()
	}
}
