// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Ordered collections of ACLs.
//!
//! A collection resolves a request the same way an ACL resolves its
//! entries, one level up: each ACL is scoped by its base path, the most
//! specific base path with an opinion wins, and later ACLs win ties.
//! An ACL that returns no decision leaves the running decision untouched.

use tracing::{debug, instrument, trace};

use crate::acl::Acl;
use crate::context::EvaluationContext;
use crate::decision::{AuthorizationDecision, DenialHandler};
use crate::tracker::{MatchTracker, Scope};

#[derive(Debug, Clone, Default)]
pub struct AclCollection {
	acls: Vec<Acl>,
	default_decision: Option<AuthorizationDecision>,
	default_denial_handler: Option<DenialHandler>,
}

impl AclCollection {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_acl(mut self, acl: Acl) -> Self {
		self.acls.push(acl);
		self
	}

	pub fn with_acls(mut self, acls: impl IntoIterator<Item = Acl>) -> Self {
		self.acls.extend(acls);
		self
	}

	pub fn with_default_decision(mut self, decision: AuthorizationDecision) -> Self {
		self.default_decision = Some(decision);
		self
	}

	pub fn with_default_denial_handler(mut self, handler: DenialHandler) -> Self {
		self.default_denial_handler = Some(handler);
		self
	}

	pub fn acls(&self) -> &[Acl] {
		&self.acls
	}

	pub fn default_denial_handler(&self) -> Option<&DenialHandler> {
		self.default_denial_handler.as_ref()
	}

	#[instrument(
		level = "debug",
		skip(self, ctx),
		fields(
			acls = self.acls.len(),
			path = %ctx.request.path(),
			object = ?ctx.request.object().map(|o| o.as_str()),
		)
	)]
	pub fn decide(&self, ctx: &EvaluationContext<'_>) -> Option<AuthorizationDecision> {
		let mut decision = self.default_decision.clone();
		let mut tracker = MatchTracker::new();

		for acl in &self.acls {
			let scope = Scope::of_base_path(acl.base_path());
			if !tracker.is_in_scope(scope, ctx.request) {
				trace!(base_path = %acl.base_path(), "acl out of scope");
				continue;
			}

			if let Some(acl_decision) = acl.decide(ctx) {
				decision = Some(acl_decision);
				tracker.record(scope);
			}
		}

		let decision =
			decision.map(|d| d.or_denial_handler(self.default_denial_handler.as_ref()));
		if decision.is_none() {
			debug!("no acl has an opinion");
		}
		decision
	}
}
