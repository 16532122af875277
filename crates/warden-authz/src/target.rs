// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Rule targets: protected paths and protected objects.

use std::fmt;

use serde::Serialize;

use crate::error::{AuthzError, Result};
use crate::path::NormalizedPath;

/// Name of a protected object (an access control object, typically a
/// `resource:operation` pair).
///
/// Object names are flat identifiers. A `/` inside one is rejected at
/// construction so an object can never be confused with a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
	pub fn new(name: impl Into<String>) -> Result<Self> {
		let name = name.into();
		if name.trim().is_empty() {
			return Err(AuthzError::EmptyObjectName);
		}
		if name.contains('/') {
			return Err(AuthzError::InvalidObjectName(name));
		}
		Ok(Self(name))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for ObjectId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// What a rule protects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Target {
	Path(NormalizedPath),
	Object(ObjectId),
}

impl Target {
	pub fn path(raw: &str) -> Self {
		Self::Path(NormalizedPath::new(raw))
	}

	pub fn object(name: impl Into<String>) -> Result<Self> {
		ObjectId::new(name).map(Self::Object)
	}

	/// Re-roots a path target beneath `base`. Object targets are unchanged.
	pub(crate) fn rooted_at(self, base: &NormalizedPath) -> Self {
		match self {
			Self::Path(path) => Self::Path(base.join(path.as_str())),
			Self::Object(object) => Self::Object(object),
		}
	}
}

impl fmt::Display for Target {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Path(path) => write!(f, "{path}"),
			Self::Object(object) => write!(f, "object:{object}"),
		}
	}
}

/// Anything that expands into one or more rule targets.
///
/// A single path, a single object, or a collection of either can be handed
/// to [`Acl::allow`](crate::Acl::allow) and [`Acl::deny`](crate::Acl::deny);
/// collections fan out into one entry per target.
pub trait IntoTargets {
	fn into_targets(self) -> Vec<Target>;
}

impl IntoTargets for Target {
	fn into_targets(self) -> Vec<Target> {
		vec![self]
	}
}

impl IntoTargets for &str {
	fn into_targets(self) -> Vec<Target> {
		vec![Target::path(self)]
	}
}

impl IntoTargets for String {
	fn into_targets(self) -> Vec<Target> {
		vec![Target::path(&self)]
	}
}

impl IntoTargets for NormalizedPath {
	fn into_targets(self) -> Vec<Target> {
		vec![Target::Path(self)]
	}
}

impl IntoTargets for ObjectId {
	fn into_targets(self) -> Vec<Target> {
		vec![Target::Object(self)]
	}
}

impl<T: IntoTargets> IntoTargets for Vec<T> {
	fn into_targets(self) -> Vec<Target> {
		self.into_iter().flat_map(IntoTargets::into_targets).collect()
	}
}

impl<T: IntoTargets, const N: usize> IntoTargets for [T; N] {
	fn into_targets(self) -> Vec<Target> {
		self.into_iter().flat_map(IntoTargets::into_targets).collect()
	}
}
