// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Path normalization.
//!
//! Every path the engine compares, whether it comes from rule configuration
//! or from an incoming request, goes through [`normalize_path`] first. A
//! normalized path has exactly one leading `/`, exactly one trailing `/`,
//! and never two separators in a row. Prefix comparison on normalized paths
//! is therefore segment-aware: `/blog/` is a prefix of `/blog/posts/` but not
//! of `/blogs/`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Collapses separator runs and ensures a leading and trailing `/`.
pub fn normalize_path(raw: &str) -> String {
	let mut normalized = String::with_capacity(raw.len() + 2);
	normalized.push('/');
	for segment in raw.split('/').filter(|s| !s.is_empty()) {
		normalized.push_str(segment);
		normalized.push('/');
	}
	normalized
}

/// A path that has been through [`normalize_path`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct NormalizedPath(String);

impl NormalizedPath {
	pub fn new(raw: &str) -> Self {
		Self(normalize_path(raw))
	}

	pub fn root() -> Self {
		Self("/".to_string())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	pub fn is_root(&self) -> bool {
		self.0 == "/"
	}

	/// Number of bytes in the normalized form. Used as the specificity
	/// measure when several rules cover the same request.
	pub(crate) fn specificity(&self) -> usize {
		self.0.len()
	}

	/// Returns true if `self` lies at or beneath `ancestor`.
	pub fn is_within(&self, ancestor: &NormalizedPath) -> bool {
		self.0.starts_with(&ancestor.0)
	}

	/// Appends `child` below this path and normalizes the result.
	pub fn join(&self, child: &str) -> Self {
		Self::new(&format!("{}{}", self.0, child))
	}
}

impl Default for NormalizedPath {
	fn default() -> Self {
		Self::root()
	}
}

impl From<&str> for NormalizedPath {
	fn from(raw: &str) -> Self {
		Self::new(raw)
	}
}

impl From<String> for NormalizedPath {
	fn from(raw: String) -> Self {
		Self::new(&raw)
	}
}

impl From<NormalizedPath> for String {
	fn from(path: NormalizedPath) -> Self {
		path.0
	}
}

impl AsRef<str> for NormalizedPath {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for NormalizedPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}
