// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Access control entries.

use std::collections::BTreeSet;

use crate::context::EvaluationContext;
use crate::decision::{AuthorizationDecision, DenialHandler};
use crate::predicate::{Evaluation, Predicate};
use crate::target::Target;
use crate::tracker::Scope;

/// Optional settings for an `allow` or `deny` rule.
#[derive(Debug, Clone)]
pub struct RuleOptions {
	pub predicate: Option<Predicate>,
	pub named_args: BTreeSet<String>,
	pub positional_args: usize,
	pub message: Option<String>,
	pub propagate: bool,
	pub force_inclusion: bool,
	pub denial_handler: Option<DenialHandler>,
}

impl Default for RuleOptions {
	fn default() -> Self {
		Self {
			predicate: None,
			named_args: BTreeSet::new(),
			positional_args: 0,
			message: None,
			propagate: true,
			force_inclusion: false,
			denial_handler: None,
		}
	}
}

impl RuleOptions {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn predicate(mut self, predicate: Predicate) -> Self {
		self.predicate = Some(predicate);
		self
	}

	pub fn named_arg(mut self, name: impl Into<String>) -> Self {
		self.named_args.insert(name.into());
		self
	}

	pub fn positional_args(mut self, minimum: usize) -> Self {
		self.positional_args = minimum;
		self
	}

	pub fn message(mut self, message: impl Into<String>) -> Self {
		self.message = Some(message.into());
		self
	}

	/// Whether the rule also covers paths nested beneath its target.
	/// Defaults to `true`.
	pub fn propagate(mut self, propagate: bool) -> Self {
		self.propagate = propagate;
		self
	}

	/// Makes the rule absolute: once it participates, no later rule can
	/// override it, however specific.
	pub fn force_inclusion(mut self) -> Self {
		self.force_inclusion = true;
		self
	}

	pub fn denial_handler(mut self, handler: DenialHandler) -> Self {
		self.denial_handler = Some(handler);
		self
	}
}

/// How an in-scope entry takes part in a decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Participation {
	pub reason: Option<String>,
	pub indeterminate: bool,
}

/// A single allow or deny rule.
///
/// Deny entries store their predicate negated, so for every entry
/// "the stored predicate holds" means "this entry applies": a deny entry
/// guarded by `in_group("trolls")` applies when the user *is* a troll, and
/// the negated predicate's failure becomes the denial reason.
#[derive(Debug, Clone)]
pub struct Ace {
	target: Target,
	predicate: Option<Predicate>,
	allow: bool,
	named_args: BTreeSet<String>,
	positional_args: usize,
	message: Option<String>,
	propagate: bool,
	force_inclusion: bool,
	denial_handler: Option<DenialHandler>,
}

impl Ace {
	pub(crate) fn new(target: Target, allow: bool, options: RuleOptions) -> Self {
		let predicate = if allow {
			options.predicate
		} else {
			options.predicate.map(Predicate::not)
		};

		Self {
			target,
			predicate,
			allow,
			named_args: options.named_args,
			positional_args: options.positional_args,
			message: options.message,
			propagate: options.propagate,
			force_inclusion: options.force_inclusion,
			denial_handler: options.denial_handler,
		}
	}

	pub fn target(&self) -> &Target {
		&self.target
	}

	/// The stored predicate; negated for deny entries.
	pub fn predicate(&self) -> Option<&Predicate> {
		self.predicate.as_ref()
	}

	pub fn allows(&self) -> bool {
		self.allow
	}

	pub fn named_args(&self) -> &BTreeSet<String> {
		&self.named_args
	}

	pub fn positional_args(&self) -> usize {
		self.positional_args
	}

	pub fn message(&self) -> Option<&str> {
		self.message.as_deref()
	}

	pub fn propagates(&self) -> bool {
		self.propagate
	}

	pub fn is_forced(&self) -> bool {
		self.force_inclusion
	}

	pub fn denial_handler(&self) -> Option<&DenialHandler> {
		self.denial_handler.as_ref()
	}

	pub(crate) fn scope(&self) -> Scope<'_> {
		Scope::of_target(&self.target, self.propagate, self.force_inclusion)
	}

	/// Decides whether this entry takes part in the decision for `ctx`.
	///
	/// Argument preconditions are checked first; an entry whose operation
	/// signature does not fit the request is skipped without evaluating its
	/// predicate.
	pub(crate) fn participation(&self, ctx: &EvaluationContext<'_>) -> Option<Participation> {
		let request = ctx.request;
		if request.positional_args() < self.positional_args
			|| !self.named_args.is_subset(request.named_args())
		{
			return None;
		}

		let Some(predicate) = &self.predicate else {
			return Some(Participation {
				reason: self.message.clone(),
				indeterminate: false,
			});
		};

		match (predicate.evaluate(ctx), self.allow) {
			(Evaluation::Met, true) => Some(Participation {
				reason: self.message.clone(),
				indeterminate: false,
			}),
			(Evaluation::Unmet { reason }, false) => Some(Participation {
				reason: self.message.clone().or(Some(reason)),
				indeterminate: false,
			}),
			(Evaluation::Indeterminate, _) => Some(Participation {
				reason: self.message.clone(),
				indeterminate: true,
			}),
			(Evaluation::Met, false) | (Evaluation::Unmet { .. }, true) => None,
		}
	}

	pub(crate) fn decision(&self, participation: Participation) -> AuthorizationDecision {
		let base = if participation.indeterminate {
			AuthorizationDecision::indeterminate()
		} else if self.allow {
			AuthorizationDecision::allowed()
		} else {
			AuthorizationDecision::denied()
		};

		base
			.with_optional_reason(participation.reason)
			.with_optional_denial_handler(self.denial_handler.clone())
	}
}
