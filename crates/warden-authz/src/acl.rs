// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Access control lists.
//!
//! An [`Acl`] is an ordered list of entries rooted at a base path. Path
//! targets given to [`Acl::allow`] and [`Acl::deny`] are relative to that
//! base: in an ACL rooted at `/blog`, `allow("posts", ..)` protects
//! `/blog/posts/`.
//!
//! # Example
//!
//! ```
//! use warden_authz::{
//!     AccessRequest, Acl, Credentials, EvaluationContext, Predicate, RuleOptions,
//! };
//!
//! let acl = Acl::new("/blog")
//!     .allow("/", RuleOptions::new())?
//!     .deny(
//!         "/post_article",
//!         RuleOptions::new().predicate(Predicate::not(Predicate::in_group("editors"))),
//!     )?;
//!
//! let visitor = Credentials::for_user("guest");
//! let request = AccessRequest::new("/blog/post_article");
//! let decision = acl.decide(&EvaluationContext::new(&visitor, &request)).unwrap();
//! assert!(!decision.allow());
//! # Ok::<(), warden_authz::AuthzError>(())
//! ```

use tracing::{debug, instrument, trace};

use crate::ace::{Ace, RuleOptions};
use crate::context::EvaluationContext;
use crate::decision::{AuthorizationDecision, DenialHandler};
use crate::error::{AuthzError, Result};
use crate::path::NormalizedPath;
use crate::target::IntoTargets;
use crate::tracker::MatchTracker;

#[derive(Debug, Clone, Default)]
pub struct Acl {
	base_path: NormalizedPath,
	entries: Vec<Ace>,
	default_decision: Option<AuthorizationDecision>,
	default_denial_handler: Option<DenialHandler>,
}

impl Acl {
	pub fn new(base_path: &str) -> Self {
		Self {
			base_path: NormalizedPath::new(base_path),
			..Self::default()
		}
	}

	/// Decision returned when no entry applies.
	pub fn with_default_decision(mut self, decision: AuthorizationDecision) -> Self {
		self.default_decision = Some(decision);
		self
	}

	/// Denial handler attached to decisions that do not carry their own.
	pub fn with_default_denial_handler(mut self, handler: DenialHandler) -> Self {
		self.default_denial_handler = Some(handler);
		self
	}

	/// Appends one allow entry per target.
	pub fn allow(self, targets: impl IntoTargets, options: RuleOptions) -> Result<Self> {
		if let Some(handler) = &options.denial_handler {
			return Err(AuthzError::DenialHandlerOnAllow(handler.to_string()));
		}
		self.push_entries(targets, true, options)
	}

	/// Appends one deny entry per target.
	pub fn deny(self, targets: impl IntoTargets, options: RuleOptions) -> Result<Self> {
		self.push_entries(targets, false, options)
	}

	fn push_entries(
		mut self,
		targets: impl IntoTargets,
		allow: bool,
		options: RuleOptions,
	) -> Result<Self> {
		let targets = targets.into_targets();
		if targets.is_empty() {
			return Err(AuthzError::NoTargets);
		}

		for target in targets {
			let target = target.rooted_at(&self.base_path);
			debug!(
				base_path = %self.base_path,
				rule_target = %target,
				allow,
				"registering access control entry"
			);
			self.entries.push(Ace::new(target, allow, options.clone()));
		}
		Ok(self)
	}

	pub fn base_path(&self) -> &NormalizedPath {
		&self.base_path
	}

	pub fn entries(&self) -> &[Ace] {
		&self.entries
	}

	pub fn default_decision(&self) -> Option<&AuthorizationDecision> {
		self.default_decision.as_ref()
	}

	pub fn default_denial_handler(&self) -> Option<&DenialHandler> {
		self.default_denial_handler.as_ref()
	}

	/// Resolves a request against this list.
	///
	/// Returns `None` when no entry applies and there is no default
	/// decision; the list has no opinion on the request.
	#[instrument(
		level = "debug",
		skip(self, ctx),
		fields(
			base_path = %self.base_path,
			path = %ctx.request.path(),
			user_id = ?ctx.credentials.user_id,
		)
	)]
	pub fn decide(&self, ctx: &EvaluationContext<'_>) -> Option<AuthorizationDecision> {
		let mut decision = self.default_decision.clone();
		let mut tracker = MatchTracker::new();

		for (index, entry) in self.entries.iter().enumerate() {
			let scope = entry.scope();
			if !tracker.is_in_scope(scope, ctx.request) {
				trace!(index, rule_target = %entry.target(), "entry out of scope");
				continue;
			}

			let Some(participation) = entry.participation(ctx) else {
				trace!(index, rule_target = %entry.target(), "entry does not participate");
				continue;
			};

			debug!(
				index,
				rule_target = %entry.target(),
				allow = entry.allows(),
				indeterminate = participation.indeterminate,
				forced = entry.is_forced(),
				"entry participates"
			);
			decision = Some(entry.decision(participation));
			tracker.record(scope);
			if tracker.is_settled() {
				break;
			}
		}

		let decision =
			decision.map(|d| d.or_denial_handler(self.default_denial_handler.as_ref()));
		match &decision {
			Some(d) => debug!(
				allow = d.allow(),
				indeterminate = d.is_indeterminate(),
				reason = ?d.reason(),
				"acl decided"
			),
			None => debug!("acl has no opinion"),
		}
		decision
	}
}
