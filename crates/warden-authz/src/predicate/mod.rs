// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Predicate algebra.
//!
//! A [`Predicate`] is a condition over an [`EvaluationContext`] with three
//! possible outcomes (see [`Evaluation`]):
//!
//! - **Met**: the condition holds
//! - **Unmet**: it does not, with a human-readable reason
//! - **Indeterminate**: it could not be decided
//!
//! Predicates form a closed sum type. Credential checks (`is_user`,
//! `in_group`, `has_permission`, ...) are leaves; `not`, `all` and `any`
//! compose them. Application-specific leaves plug in through
//! [`Checker`] and [`Predicate::custom`].
//!
//! # Combinator semantics
//!
//! | combinator | Met | Unmet | Indeterminate |
//! |---|---|---|---|
//! | `not(p)` | `p` unmet | `p` met | `p` indeterminate |
//! | `all(ps)` | every child met | any child unmet (first reason) | otherwise |
//! | `any(ps)` | any child met | every child unmet (all reasons) | otherwise |
//!
//! # Statelessness
//!
//! `evaluate` takes `&self` and returns its result by value. A predicate is
//! built once and shared by every request evaluated concurrently; nothing
//! about a particular evaluation is ever written back onto it.

pub mod checker;
pub mod message;

use std::fmt::{self, Write as _};
use std::slice;
use std::sync::Arc;

use serde::Serialize;

pub use checker::{Check, Checker, Failure};
pub use message::{interpolate, Placeholders};

use crate::context::EvaluationContext;
use crate::decision::IndeterminatePolicy;
use crate::error::NotAuthorized;
use message::placeholder;

const IS_USER_MESSAGE: &str = r#"The current user must be "{user_name}""#;
const IN_GROUP_MESSAGE: &str = r#"The current user must belong to the group "{group_name}""#;
const IN_ANY_GROUP_MESSAGE: &str =
	"The member must belong to at least one of the following groups: {group_list}";
const IS_ANONYMOUS_MESSAGE: &str = "The current user must be anonymous";
const NOT_ANONYMOUS_MESSAGE: &str = "The current user must have been authenticated";
const HAS_PERMISSION_MESSAGE: &str = r#"The user must have the "{permission_name}" permission"#;
const HAS_ANY_PERMISSION_MESSAGE: &str =
	"The user must have at least one of the following permissions: {permission_list}";
const NOT_MESSAGE: &str = "The condition must not be met";
const ALL_MESSAGE: &str = "{failed_predicate}";
const ANY_MESSAGE: &str =
	"At least one of the following predicates must be met: {failed_predicates}";

/// Result of evaluating a predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Evaluation {
	Met,
	Unmet { reason: String },
	Indeterminate,
}

impl Evaluation {
	pub fn is_met(&self) -> bool {
		matches!(self, Self::Met)
	}

	pub fn is_unmet(&self) -> bool {
		matches!(self, Self::Unmet { .. })
	}

	pub fn is_indeterminate(&self) -> bool {
		matches!(self, Self::Indeterminate)
	}

	pub fn reason(&self) -> Option<&str> {
		match self {
			Self::Unmet { reason } => Some(reason),
			_ => None,
		}
	}
}

/// The shape of a predicate.
#[derive(Debug, Clone)]
pub enum PredicateKind {
	IsUser { user_name: String },
	InGroup { group_name: String },
	InAnyGroup { groups: Vec<String> },
	IsAnonymous,
	NotAnonymous,
	HasPermission { permission_name: String },
	HasAnyPermission { permissions: Vec<String> },
	Not(Box<Predicate>),
	All(Vec<Predicate>),
	Any(Vec<Predicate>),
	Custom(Arc<dyn Checker>),
}

impl PredicateKind {
	fn default_message(&self) -> &str {
		match self {
			Self::IsUser { .. } => IS_USER_MESSAGE,
			Self::InGroup { .. } => IN_GROUP_MESSAGE,
			Self::InAnyGroup { .. } => IN_ANY_GROUP_MESSAGE,
			Self::IsAnonymous => IS_ANONYMOUS_MESSAGE,
			Self::NotAnonymous => NOT_ANONYMOUS_MESSAGE,
			Self::HasPermission { .. } => HAS_PERMISSION_MESSAGE,
			Self::HasAnyPermission { .. } => HAS_ANY_PERMISSION_MESSAGE,
			Self::Not(_) => NOT_MESSAGE,
			Self::All(_) => ALL_MESSAGE,
			Self::Any(_) => ANY_MESSAGE,
			Self::Custom(checker) => checker.default_message(),
		}
	}
}

/// A condition over a request's credentials.
#[derive(Debug, Clone)]
pub struct Predicate {
	kind: PredicateKind,
	message: Option<String>,
}

impl Predicate {
	fn from_kind(kind: PredicateKind) -> Self {
		Self {
			kind,
			message: None,
		}
	}

	/// Met when the current user id is `user_name`.
	pub fn is_user(user_name: impl Into<String>) -> Self {
		Self::from_kind(PredicateKind::IsUser {
			user_name: user_name.into(),
		})
	}

	/// Met when the user belongs to `group_name`.
	pub fn in_group(group_name: impl Into<String>) -> Self {
		Self::from_kind(PredicateKind::InGroup {
			group_name: group_name.into(),
		})
	}

	/// Met when the user belongs to every listed group. Reports the first
	/// missing group.
	pub fn in_all_groups<I, S>(groups: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self::all(groups.into_iter().map(Self::in_group).collect())
	}

	/// Met when the user belongs to at least one listed group.
	pub fn in_any_group<I, S>(groups: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self::from_kind(PredicateKind::InAnyGroup {
			groups: groups.into_iter().map(Into::into).collect(),
		})
	}

	pub fn is_anonymous() -> Self {
		Self::from_kind(PredicateKind::IsAnonymous)
	}

	pub fn not_anonymous() -> Self {
		Self::from_kind(PredicateKind::NotAnonymous)
	}

	/// Met when the user has `permission_name`.
	pub fn has_permission(permission_name: impl Into<String>) -> Self {
		Self::from_kind(PredicateKind::HasPermission {
			permission_name: permission_name.into(),
		})
	}

	/// Met when the user has every listed permission. Reports the first
	/// missing permission.
	pub fn has_all_permissions<I, S>(permissions: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self::all(
			permissions
				.into_iter()
				.map(Self::has_permission)
				.collect(),
		)
	}

	/// Met when the user has at least one listed permission.
	pub fn has_any_permission<I, S>(permissions: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self::from_kind(PredicateKind::HasAnyPermission {
			permissions: permissions.into_iter().map(Into::into).collect(),
		})
	}

	pub fn not(predicate: Predicate) -> Self {
		Self::from_kind(PredicateKind::Not(Box::new(predicate)))
	}

	pub fn all(predicates: Vec<Predicate>) -> Self {
		Self::from_kind(PredicateKind::All(predicates))
	}

	pub fn any(predicates: Vec<Predicate>) -> Self {
		Self::from_kind(PredicateKind::Any(predicates))
	}

	pub fn custom(checker: impl Checker + 'static) -> Self {
		Self::from_kind(PredicateKind::Custom(Arc::new(checker)))
	}

	/// Replaces the default failure message.
	///
	/// The template may reference the predicate's attributes
	/// (`{group_name}`, `{permission_list}`, ...). For `all` the first
	/// failing child's reason is available as `{failed_predicate}`; for
	/// `any` the joined reasons are available as `{failed_predicates}`.
	pub fn with_message(mut self, template: impl Into<String>) -> Self {
		self.message = Some(template.into());
		self
	}

	pub fn kind(&self) -> &PredicateKind {
		&self.kind
	}

	pub fn message(&self) -> Option<&str> {
		self.message.as_deref()
	}

	pub fn evaluate(&self, ctx: &EvaluationContext<'_>) -> Evaluation {
		let credentials = ctx.credentials;
		match &self.kind {
			PredicateKind::IsUser { user_name } => self.require(
				credentials.is_user(user_name),
				|| placeholder("user_name", user_name.as_str()),
			),
			PredicateKind::InGroup { group_name } => self.require(
				credentials.in_group(group_name),
				|| placeholder("group_name", group_name.as_str()),
			),
			PredicateKind::InAnyGroup { groups } => self.require(
				groups.iter().any(|group| credentials.in_group(group)),
				|| placeholder("group_list", groups.join(", ")),
			),
			PredicateKind::IsAnonymous => {
				self.require(credentials.is_anonymous(), Placeholders::new)
			}
			PredicateKind::NotAnonymous => {
				self.require(!credentials.is_anonymous(), Placeholders::new)
			}
			PredicateKind::HasPermission { permission_name } => self.require(
				credentials.has_permission(permission_name),
				|| placeholder("permission_name", permission_name.as_str()),
			),
			PredicateKind::HasAnyPermission { permissions } => self.require(
				permissions
					.iter()
					.any(|permission| credentials.has_permission(permission)),
				|| placeholder("permission_list", permissions.join(", ")),
			),
			PredicateKind::Not(inner) => match inner.evaluate(ctx) {
				Evaluation::Met => self.unmet(Placeholders::new()),
				Evaluation::Unmet { .. } => Evaluation::Met,
				Evaluation::Indeterminate => Evaluation::Indeterminate,
			},
			PredicateKind::All(children) => self.evaluate_all(children, ctx),
			PredicateKind::Any(children) => self.evaluate_any(children, ctx),
			PredicateKind::Custom(checker) => self.evaluate_custom(checker.as_ref(), ctx),
		}
	}

	/// Plain boolean view of [`evaluate`](Self::evaluate). Unmet and
	/// indeterminate both read as `false`.
	pub fn is_met(&self, ctx: &EvaluationContext<'_>) -> bool {
		self.evaluate(ctx).is_met()
	}

	/// Converts the evaluation into a caller-facing result.
	pub fn ensure(
		&self,
		ctx: &EvaluationContext<'_>,
		policy: IndeterminatePolicy,
	) -> Result<(), NotAuthorized> {
		match self.evaluate(ctx) {
			Evaluation::Met => Ok(()),
			Evaluation::Unmet { reason } => Err(NotAuthorized {
				reason: Some(reason),
				denial_handler: None,
				indeterminate: false,
			}),
			Evaluation::Indeterminate => match policy {
				IndeterminatePolicy::Permissive => Ok(()),
				IndeterminatePolicy::Strict => Err(NotAuthorized {
					reason: None,
					denial_handler: None,
					indeterminate: true,
				}),
			},
		}
	}

	fn require(&self, met: bool, placeholders: impl FnOnce() -> Placeholders) -> Evaluation {
		if met {
			Evaluation::Met
		} else {
			self.unmet(placeholders())
		}
	}

	fn unmet(&self, placeholders: Placeholders) -> Evaluation {
		let template = self
			.message
			.as_deref()
			.unwrap_or_else(|| self.kind.default_message());
		Evaluation::Unmet {
			reason: interpolate(template, &placeholders),
		}
	}

	fn evaluate_all(&self, children: &[Predicate], ctx: &EvaluationContext<'_>) -> Evaluation {
		let mut indeterminate = false;
		for child in children {
			match child.evaluate(ctx) {
				Evaluation::Met => {}
				Evaluation::Unmet { reason } => {
					return self.unmet(placeholder("failed_predicate", reason));
				}
				Evaluation::Indeterminate => indeterminate = true,
			}
		}

		if indeterminate {
			Evaluation::Indeterminate
		} else {
			Evaluation::Met
		}
	}

	fn evaluate_any(&self, children: &[Predicate], ctx: &EvaluationContext<'_>) -> Evaluation {
		let mut reasons = Vec::with_capacity(children.len());
		let mut indeterminate = false;
		for child in children {
			match child.evaluate(ctx) {
				Evaluation::Met => return Evaluation::Met,
				Evaluation::Unmet { reason } => reasons.push(reason),
				Evaluation::Indeterminate => indeterminate = true,
			}
		}

		if indeterminate {
			Evaluation::Indeterminate
		} else {
			self.unmet(placeholder("failed_predicates", reasons.join(", ")))
		}
	}

	fn evaluate_custom(&self, checker: &dyn Checker, ctx: &EvaluationContext<'_>) -> Evaluation {
		match checker.check(ctx) {
			Check::Met => Evaluation::Met,
			Check::Indeterminate => Evaluation::Indeterminate,
			Check::Unmet(failure) => {
				let mut placeholders = checker.attributes();
				placeholders.extend(failure.placeholders);
				let template = failure
					.reason
					.as_deref()
					.or(self.message.as_deref())
					.unwrap_or_else(|| checker.default_message());
				Evaluation::Unmet {
					reason: interpolate(template, &placeholders),
				}
			}
		}
	}
}

/// Writes `value` as a double-quoted literal. Only `"` and `\` are escaped;
/// every other character, control characters included, is written as-is.
fn write_string(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
	f.write_char('"')?;
	for c in value.chars() {
		if c == '"' || c == '\\' {
			f.write_char('\\')?;
		}
		f.write_char(c)?;
	}
	f.write_char('"')
}

fn write_call(f: &mut fmt::Formatter<'_>, name: &str, args: &[String]) -> fmt::Result {
	write!(f, "{name}(")?;
	for (i, arg) in args.iter().enumerate() {
		if i > 0 {
			f.write_str(", ")?;
		}
		write_string(f, arg)?;
	}
	f.write_str(")")
}

fn write_joined(
	f: &mut fmt::Formatter<'_>,
	operator: &str,
	empty: &str,
	children: &[Predicate],
) -> fmt::Result {
	if children.is_empty() {
		return f.write_str(empty);
	}
	f.write_str("(")?;
	for (i, child) in children.iter().enumerate() {
		if i > 0 {
			write!(f, " {operator} ")?;
		}
		write!(f, "{child}")?;
	}
	f.write_str(")")
}

/// Renders the predicate in the expression syntax accepted by the policy
/// configuration loader. An empty `all` renders as `true` and an empty `any`
/// as `false`. Custom predicates render as their checker's debug form, which
/// the loader does not accept.
impl fmt::Display for Predicate {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.kind {
			PredicateKind::IsUser { user_name } => {
				write_call(f, "is_user", slice::from_ref(user_name))
			}
			PredicateKind::InGroup { group_name } => {
				write_call(f, "in_group", slice::from_ref(group_name))
			}
			PredicateKind::InAnyGroup { groups } => write_call(f, "in_any_group", groups),
			PredicateKind::IsAnonymous => f.write_str("is_anonymous()"),
			PredicateKind::NotAnonymous => f.write_str("not_anonymous()"),
			PredicateKind::HasPermission { permission_name } => {
				write_call(f, "has_permission", slice::from_ref(permission_name))
			}
			PredicateKind::HasAnyPermission { permissions } => {
				write_call(f, "has_any_permission", permissions)
			}
			PredicateKind::Not(inner) => write!(f, "not {inner}"),
			PredicateKind::All(children) => write_joined(f, "and", "true", children),
			PredicateKind::Any(children) => write_joined(f, "or", "false", children),
			PredicateKind::Custom(checker) => write!(f, "custom({checker:?})"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::context::{AccessRequest, Credentials};
	use proptest::prelude::*;
	use std::mem::discriminant;

	#[derive(Debug)]
	struct Constant(Check);

	impl Checker for Constant {
		fn check(&self, _ctx: &EvaluationContext<'_>) -> Check {
			self.0.clone()
		}
	}

	fn met() -> Predicate {
		Predicate::custom(Constant(Check::Met))
	}

	fn unmet(reason: &str) -> Predicate {
		Predicate::custom(Constant(Check::unmet_because(reason)))
	}

	fn indeterminate() -> Predicate {
		Predicate::custom(Constant(Check::Indeterminate))
	}

	fn evaluate(predicate: &Predicate, credentials: &Credentials) -> Evaluation {
		let request = AccessRequest::new("/");
		predicate.evaluate(&EvaluationContext::new(credentials, &request))
	}

	fn evaluate_anonymous(predicate: &Predicate) -> Evaluation {
		evaluate(predicate, &Credentials::anonymous())
	}

	mod builtin {
		use super::*;

		#[test]
		fn is_user() {
			let predicate = Predicate::is_user("gustavo");
			assert!(evaluate(&predicate, &Credentials::for_user("gustavo")).is_met());
			assert_eq!(
				evaluate(&predicate, &Credentials::for_user("rms")).reason(),
				Some(r#"The current user must be "gustavo""#)
			);
			assert!(evaluate_anonymous(&predicate).is_unmet());
		}

		#[test]
		fn in_group() {
			let predicate = Predicate::in_group("developers");
			let developer = Credentials::for_user("linus").with_group("developers");
			assert!(evaluate(&predicate, &developer).is_met());
			assert_eq!(
				evaluate(&predicate, &Credentials::for_user("linus")).reason(),
				Some(r#"The current user must belong to the group "developers""#)
			);
		}

		#[test]
		fn in_all_groups_reports_first_missing() {
			let predicate = Predicate::in_all_groups(["developers", "admins", "php"]);
			let credentials = Credentials::for_user("rasmus").with_groups(["developers", "php"]);
			assert_eq!(
				evaluate(&predicate, &credentials).reason(),
				Some(r#"The current user must belong to the group "admins""#)
			);
			let everything = credentials.with_group("admins");
			assert!(evaluate(&predicate, &everything).is_met());
		}

		#[test]
		fn in_any_group_lists_groups() {
			let predicate = Predicate::in_any_group(["admins", "developers"]);
			let expected = "The member must belong to at least one of the following groups: \
				admins, developers";
			assert_eq!(evaluate_anonymous(&predicate).reason(), Some(expected));
			let developer = Credentials::for_user("guido").with_group("developers");
			assert!(evaluate(&predicate, &developer).is_met());
		}

		#[test]
		fn anonymity() {
			let user = Credentials::for_user("richard");
			assert!(evaluate_anonymous(&Predicate::is_anonymous()).is_met());
			assert_eq!(
				evaluate(&Predicate::is_anonymous(), &user).reason(),
				Some("The current user must be anonymous")
			);
			assert!(evaluate(&Predicate::not_anonymous(), &user).is_met());
			assert_eq!(
				evaluate_anonymous(&Predicate::not_anonymous()).reason(),
				Some("The current user must have been authenticated")
			);
		}

		#[test]
		fn permissions() {
			let credentials =
				Credentials::for_user("ballmer").with_permissions(["see-site", "edit-site"]);

			assert!(evaluate(&Predicate::has_permission("see-site"), &credentials).is_met());
			assert_eq!(
				evaluate(&Predicate::has_permission("commit"), &credentials).reason(),
				Some(r#"The user must have the "commit" permission"#)
			);
			assert_eq!(
				evaluate(
					&Predicate::has_all_permissions(["see-site", "commit", "review"]),
					&credentials
				)
				.reason(),
				Some(r#"The user must have the "commit" permission"#)
			);
			assert!(evaluate(
				&Predicate::has_any_permission(["commit", "edit-site"]),
				&credentials
			)
			.is_met());
			let neither = Predicate::has_any_permission(["commit", "review"]);
			assert_eq!(
				evaluate(&neither, &credentials).reason(),
				Some("The user must have at least one of the following permissions: commit, review")
			);
		}

		#[test]
		fn custom_message_sees_attributes() {
			let predicate =
				Predicate::in_group("admins").with_message("Only {group_name} may do this");
			assert_eq!(
				evaluate_anonymous(&predicate).reason(),
				Some("Only admins may do this")
			);
		}
	}

	mod algebra {
		use super::*;

		#[test]
		fn not_inverts() {
			assert!(evaluate_anonymous(&Predicate::not(unmet("nope"))).is_met());
			assert_eq!(
				evaluate_anonymous(&Predicate::not(met())).reason(),
				Some("The condition must not be met")
			);
			assert!(evaluate_anonymous(&Predicate::not(indeterminate())).is_indeterminate());
		}

		#[test]
		fn all_with_indeterminate_is_indeterminate() {
			let predicate = Predicate::all(vec![met(), indeterminate()]);
			assert!(evaluate_anonymous(&predicate).is_indeterminate());
		}

		#[test]
		fn all_reports_the_unmet_reason() {
			let predicate = Predicate::all(vec![met(), unmet("second failed")]);
			assert_eq!(evaluate_anonymous(&predicate).reason(), Some("second failed"));
		}

		#[test]
		fn all_prefers_unmet_over_earlier_indeterminate() {
			let predicate = Predicate::all(vec![indeterminate(), unmet("late failure")]);
			assert_eq!(evaluate_anonymous(&predicate).reason(), Some("late failure"));
		}

		#[test]
		fn all_reports_only_the_first_unmet() {
			let predicate = Predicate::all(vec![unmet("first"), unmet("second")]);
			assert_eq!(evaluate_anonymous(&predicate).reason(), Some("first"));
		}

		#[test]
		fn any_with_indeterminate_and_unmet_is_indeterminate() {
			let predicate = Predicate::any(vec![indeterminate(), unmet("nope")]);
			assert!(evaluate_anonymous(&predicate).is_indeterminate());
		}

		#[test]
		fn any_with_met_and_indeterminate_is_met() {
			let predicate = Predicate::any(vec![met(), indeterminate()]);
			assert!(evaluate_anonymous(&predicate).is_met());
		}

		#[test]
		fn any_aggregates_every_reason() {
			let predicate = Predicate::any(vec![unmet("first"), unmet("second")]);
			assert_eq!(
				evaluate_anonymous(&predicate).reason(),
				Some("At least one of the following predicates must be met: first, second")
			);
		}

		#[test]
		fn empty_combinators() {
			assert!(evaluate_anonymous(&Predicate::all(vec![])).is_met());
			assert!(evaluate_anonymous(&Predicate::any(vec![])).is_unmet());
		}

		#[test]
		fn all_message_override_wraps_child_reason() {
			let predicate = Predicate::all(vec![unmet("missing badge")])
				.with_message("Entry refused: {failed_predicate}");
			assert_eq!(
				evaluate_anonymous(&predicate).reason(),
				Some("Entry refused: missing badge")
			);
		}

		#[test]
		fn is_met_treats_indeterminate_as_false() {
			let credentials = Credentials::anonymous();
			let request = AccessRequest::new("/");
			let ctx = EvaluationContext::new(&credentials, &request);
			assert!(!indeterminate().is_met(&ctx));
			assert!(met().is_met(&ctx));
		}

		#[test]
		fn ensure_applies_indeterminate_policy() {
			let credentials = Credentials::anonymous();
			let request = AccessRequest::new("/");
			let ctx = EvaluationContext::new(&credentials, &request);

			assert!(indeterminate()
				.ensure(&ctx, IndeterminatePolicy::Permissive)
				.is_ok());
			let err = indeterminate()
				.ensure(&ctx, IndeterminatePolicy::Strict)
				.unwrap_err();
			assert!(err.indeterminate);

			let err = unmet("no entry")
				.ensure(&ctx, IndeterminatePolicy::Permissive)
				.unwrap_err();
			assert_eq!(err.reason.as_deref(), Some("no entry"));
		}
	}

	mod custom {
		use super::*;

		#[derive(Debug)]
		struct OwnsPost {
			post_owner: String,
		}

		impl Checker for OwnsPost {
			fn check(&self, ctx: &EvaluationContext<'_>) -> Check {
				match ctx.credentials.user_id.as_deref() {
					None => Check::Indeterminate,
					Some(user) if user == self.post_owner => Check::Met,
					Some(user) => Check::Unmet(Failure::default().with_placeholder("user", user)),
				}
			}

			fn default_message(&self) -> &str {
				"{user} does not own posts written by {post_owner}"
			}

			fn attributes(&self) -> Placeholders {
				placeholder("post_owner", self.post_owner.as_str())
			}
		}

		#[test]
		fn merges_attributes_and_call_site_placeholders() {
			let predicate = Predicate::custom(OwnsPost {
				post_owner: "ada".to_string(),
			});
			assert_eq!(
				evaluate(&predicate, &Credentials::for_user("grace")).reason(),
				Some("grace does not own posts written by ada")
			);
			assert!(evaluate(&predicate, &Credentials::for_user("ada")).is_met());
			assert!(evaluate_anonymous(&predicate).is_indeterminate());
		}

		#[test]
		fn explicit_reason_wins_over_message() {
			let predicate = unmet("explicit {x}").with_message("ignored");
			assert_eq!(evaluate_anonymous(&predicate).reason(), Some("explicit {x}"));
		}

		#[test]
		fn predicate_message_overrides_checker_default() {
			let predicate = Predicate::custom(Constant(Check::unmet())).with_message("custom text");
			assert_eq!(evaluate_anonymous(&predicate).reason(), Some("custom text"));
		}
	}

	#[test]
	fn display_uses_expression_syntax() {
		let predicate = Predicate::all(vec![
			Predicate::in_group("admins"),
			Predicate::not(Predicate::is_anonymous()),
			Predicate::has_any_permission(["a", "b"]),
		]);
		assert_eq!(
			predicate.to_string(),
			r#"(in_group("admins") and not is_anonymous() and has_any_permission("a", "b"))"#
		);
	}

	#[test]
	fn display_escapes_only_quotes_and_backslashes() {
		assert_eq!(
			Predicate::is_user("say \"hi\" \\ bye").to_string(),
			r#"is_user("say \"hi\" \\ bye")"#
		);
		assert_eq!(Predicate::in_group("a\u{7}b").to_string(), "in_group(\"a\u{7}b\")");
	}

	#[test]
	fn display_of_empty_combinators() {
		assert_eq!(Predicate::all(vec![]).to_string(), "true");
		assert_eq!(Predicate::any(vec![]).to_string(), "false");
		assert_eq!(Predicate::not(Predicate::any(vec![])).to_string(), "not false");
	}

	#[test]
	fn predicates_are_shareable() {
		fn assert_send_sync<T: Send + Sync>() {}
		assert_send_sync::<Predicate>();
	}

	fn leaf() -> impl Strategy<Value = Predicate> {
		prop_oneof![Just(0u8), Just(1u8), Just(2u8)].prop_map(|n| match n {
			0 => met(),
			1 => unmet("leaf failed"),
			_ => indeterminate(),
		})
	}

	fn tree() -> impl Strategy<Value = Predicate> {
		leaf().prop_recursive(3, 24, 4, |inner| {
			prop_oneof![
				inner.clone().prop_map(Predicate::not),
				proptest::collection::vec(inner.clone(), 0..4).prop_map(Predicate::all),
				proptest::collection::vec(inner, 0..4).prop_map(Predicate::any),
			]
		})
	}

	proptest! {
		#[test]
		fn double_negation_preserves_outcome(p in tree()) {
			let direct = evaluate_anonymous(&p);
			let doubled = evaluate_anonymous(&Predicate::not(Predicate::not(p)));
			prop_assert_eq!(discriminant(&direct), discriminant(&doubled));
		}

		#[test]
		fn de_morgan_holds(a in tree(), b in tree()) {
			let negated_all =
				evaluate_anonymous(&Predicate::not(Predicate::all(vec![a.clone(), b.clone()])));
			let any_negated =
				evaluate_anonymous(&Predicate::any(vec![Predicate::not(a), Predicate::not(b)]));
			prop_assert_eq!(discriminant(&negated_all), discriminant(&any_negated));
		}

		#[test]
		fn combinators_follow_children(children in proptest::collection::vec(tree(), 0..5)) {
			let outcomes: Vec<Evaluation> = children.iter().map(evaluate_anonymous).collect();
			let all = evaluate_anonymous(&Predicate::all(children.clone()));
			let any = evaluate_anonymous(&Predicate::any(children));

			prop_assert_eq!(all.is_met(), outcomes.iter().all(Evaluation::is_met));
			prop_assert_eq!(all.is_unmet(), outcomes.iter().any(Evaluation::is_unmet));
			prop_assert_eq!(any.is_met(), outcomes.iter().any(Evaluation::is_met));
			prop_assert_eq!(any.is_unmet(), outcomes.iter().all(Evaluation::is_unmet));
		}
	}
}
