// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Inputs to an authorization decision.
//!
//! - [`Credentials`]: who is asking (user id, groups, permissions)
//! - [`AccessRequest`]: what they are asking for (path, object, arguments)
//! - [`EvaluationContext`]: both, borrowed for the duration of one decision
//!
//! Group and permission membership is resolved by the caller before the
//! engine runs. The engine only reads these values.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::path::NormalizedPath;
use crate::target::ObjectId;

/// Credentials of the subject making a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
	pub user_id: Option<String>,
	#[serde(default)]
	pub groups: BTreeSet<String>,
	#[serde(default)]
	pub permissions: BTreeSet<String>,
}

impl Credentials {
	/// Credentials for an unauthenticated request.
	pub fn anonymous() -> Self {
		Self::default()
	}

	pub fn for_user(user_id: impl Into<String>) -> Self {
		Self {
			user_id: Some(user_id.into()),
			..Self::default()
		}
	}

	pub fn with_group(mut self, group: impl Into<String>) -> Self {
		self.groups.insert(group.into());
		self
	}

	pub fn with_groups<I, S>(mut self, groups: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.groups.extend(groups.into_iter().map(Into::into));
		self
	}

	pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
		self.permissions.insert(permission.into());
		self
	}

	pub fn with_permissions<I, S>(mut self, permissions: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.permissions.extend(permissions.into_iter().map(Into::into));
		self
	}

	pub fn is_anonymous(&self) -> bool {
		self.user_id.is_none()
	}

	pub fn is_user(&self, user_id: &str) -> bool {
		self.user_id.as_deref() == Some(user_id)
	}

	pub fn in_group(&self, group: &str) -> bool {
		self.groups.contains(group)
	}

	pub fn has_permission(&self, permission: &str) -> bool {
		self.permissions.contains(permission)
	}
}

/// What is being accessed.
///
/// Produced by whatever maps an incoming request onto a protected path and,
/// optionally, a protected object. `named_args` and `positional_args`
/// describe the signature of the operation being invoked; entries that
/// require arguments the request does not carry are skipped without
/// evaluating their predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccessRequest {
	path: NormalizedPath,
	object: Option<ObjectId>,
	named_args: BTreeSet<String>,
	positional_args: usize,
}

impl AccessRequest {
	pub fn new(path: &str) -> Self {
		Self {
			path: NormalizedPath::new(path),
			..Self::default()
		}
	}

	pub fn with_object(mut self, object: ObjectId) -> Self {
		self.object = Some(object);
		self
	}

	pub fn with_named_arg(mut self, name: impl Into<String>) -> Self {
		self.named_args.insert(name.into());
		self
	}

	pub fn with_named_args<I, S>(mut self, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.named_args.extend(names.into_iter().map(Into::into));
		self
	}

	pub fn with_positional_args(mut self, count: usize) -> Self {
		self.positional_args = count;
		self
	}

	pub fn path(&self) -> &NormalizedPath {
		&self.path
	}

	pub fn object(&self) -> Option<&ObjectId> {
		self.object.as_ref()
	}

	pub fn named_args(&self) -> &BTreeSet<String> {
		&self.named_args
	}

	pub fn positional_args(&self) -> usize {
		self.positional_args
	}
}

/// Borrowed view of everything a predicate may inspect.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
	pub credentials: &'a Credentials,
	pub request: &'a AccessRequest,
}

impl<'a> EvaluationContext<'a> {
	pub fn new(credentials: &'a Credentials, request: &'a AccessRequest) -> Self {
		Self {
			credentials,
			request,
		}
	}
}
