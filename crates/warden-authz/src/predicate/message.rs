// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Failure message templates.
//!
//! Templates use `{name}` placeholders. A placeholder with no value is left
//! in the output verbatim.

use std::collections::BTreeMap;

/// Named values substituted into a message template.
pub type Placeholders = BTreeMap<String, String>;

/// Substitutes `{name}` placeholders in `template`.
pub fn interpolate(template: &str, placeholders: &Placeholders) -> String {
	let mut rendered = String::with_capacity(template.len());
	let mut rest = template;

	while let Some(open) = rest.find('{') {
		rendered.push_str(&rest[..open]);
		let after = &rest[open + 1..];
		let Some(close) = after.find('}') else {
			rendered.push_str(&rest[open..]);
			return rendered;
		};

		let name = &after[..close];
		match placeholders.get(name) {
			Some(value) => rendered.push_str(value),
			None => {
				rendered.push('{');
				rendered.push_str(name);
				rendered.push('}');
			}
		}
		rest = &after[close + 1..];
	}

	rendered.push_str(rest);
	rendered
}

pub(crate) fn placeholder(name: &str, value: impl Into<String>) -> Placeholders {
	let mut placeholders = Placeholders::new();
	placeholders.insert(name.to_string(), value.into());
	placeholders
}
