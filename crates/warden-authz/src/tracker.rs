// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Specificity bookkeeping for a single decision.
//!
//! When several rules cover the same request, the most specific one wins:
//!
//! 1. An object rule matching the request's object overrides the path rules
//!    before it and puts every path rule after it, forced or not, out of
//!    scope.
//! 2. Among path rules, the longest protected path wins.
//! 3. Among equally specific rules, the one declared last wins.
//! 4. A forced rule, once it participates, ends the scan: nothing after it
//!    can override it. A forced path rule declared before a matching object
//!    rule therefore still decides; one declared after it is out of scope.
//!
//! Callers scan rules in declaration order, ask [`MatchTracker::is_in_scope`]
//! before evaluating a rule, and call [`MatchTracker::record`] for each rule
//! that ends up deciding. A tracker lives for exactly one decision.

use crate::context::AccessRequest;
use crate::path::NormalizedPath;
use crate::target::{ObjectId, Target};

/// What a rule covers, as seen by the tracker.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ScopeTarget<'a> {
	Path(&'a NormalizedPath),
	Object(&'a ObjectId),
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Scope<'a> {
	pub target: ScopeTarget<'a>,
	pub propagate: bool,
	pub force_inclusion: bool,
}

impl<'a> Scope<'a> {
	pub fn of_target(target: &'a Target, propagate: bool, force_inclusion: bool) -> Self {
		let target = match target {
			Target::Path(path) => ScopeTarget::Path(path),
			Target::Object(object) => ScopeTarget::Object(object),
		};
		Self {
			target,
			propagate,
			force_inclusion,
		}
	}

	/// Scope of a whole ACL inside a collection: always propagated, never
	/// forced.
	pub fn of_base_path(base_path: &'a NormalizedPath) -> Self {
		Self {
			target: ScopeTarget::Path(base_path),
			propagate: true,
			force_inclusion: false,
		}
	}
}

#[derive(Debug, Default)]
pub(crate) struct MatchTracker {
	longest_path_match: usize,
	object_rule_found: bool,
	forced_rule_found: bool,
}

impl MatchTracker {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn is_in_scope(&self, scope: Scope<'_>, request: &AccessRequest) -> bool {
		if self.forced_rule_found {
			return false;
		}

		match scope.target {
			ScopeTarget::Object(object) => request.object() == Some(object),
			ScopeTarget::Path(protected) => {
				let requested = request.path();
				if self.object_rule_found || !requested.is_within(protected) {
					return false;
				}
				if scope.force_inclusion {
					return true;
				}

				let covers_request =
					scope.propagate || requested.specificity() == protected.specificity();
				covers_request && protected.specificity() >= self.longest_path_match
			}
		}
	}

	pub fn record(&mut self, scope: Scope<'_>) {
		match scope.target {
			ScopeTarget::Path(protected) => {
				self.longest_path_match = protected.specificity();
				if scope.force_inclusion {
					self.forced_rule_found = true;
				}
			}
			ScopeTarget::Object(_) => self.object_rule_found = true,
		}
	}

	/// True once a forced rule has been recorded; scanning can stop.
	pub fn is_settled(&self) -> bool {
		self.forced_rule_found
	}
}
