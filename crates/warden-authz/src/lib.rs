// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization decisions for Warden.
//!
//! This crate provides:
//! - A predicate algebra over the caller's credentials (`all`, `any`, `not`
//!   and the built-in user, group and permission checks) with a three-valued
//!   result: met, unmet with a reason, or indeterminate
//! - Access control lists keyed by path or by named object, resolved by
//!   specificity
//! - Ordered ACL collections rooted at different base paths
//!
//! Decisions are computed from immutable values; an [`Acl`] or
//! [`AclCollection`] can be shared across threads and evaluated
//! concurrently.
//!
//! # Usage
//!
//! ```
//! use warden_authz::{
//!     AccessRequest, Acl, AclCollection, Credentials, EvaluationContext,
//!     IndeterminatePolicy, Predicate, RuleOptions,
//! };
//!
//! let blog = Acl::new("/blog")
//!     .allow("/", RuleOptions::new())?
//!     .deny(
//!         "/admin",
//!         RuleOptions::new()
//!             .predicate(Predicate::not(Predicate::in_group("editors")))
//!             .message("Only editors may administer the blog"),
//!     )?;
//! let policy = AclCollection::new().with_acl(blog);
//!
//! let visitor = Credentials::for_user("guest");
//! let request = AccessRequest::new("/blog/admin/settings");
//! let decision = policy
//!     .decide(&EvaluationContext::new(&visitor, &request))
//!     .unwrap();
//!
//! assert!(decision.ensure_allowed(IndeterminatePolicy::Strict).is_err());
//! assert_eq!(decision.reason(), Some("Only editors may administer the blog"));
//! # Ok::<(), warden_authz::AuthzError>(())
//! ```

pub mod ace;
pub mod acl;
pub mod collection;
pub mod context;
pub mod decision;
pub mod error;
pub mod path;
pub mod predicate;
pub mod target;

mod tracker;

pub use ace::{Ace, RuleOptions};
pub use acl::Acl;
pub use collection::AclCollection;
pub use context::{AccessRequest, Credentials, EvaluationContext};
pub use decision::{AuthorizationDecision, DenialHandler, IndeterminatePolicy};
pub use error::{AuthzError, NotAuthorized, Result};
pub use path::{normalize_path, NormalizedPath};
pub use predicate::{
	interpolate, Check, Checker, Evaluation, Failure, Placeholders, Predicate, PredicateKind,
};
pub use target::{IntoTargets, ObjectId, Target};
