// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Predicate expressions.
//!
//! Policy files write predicates as boolean expressions over the built-in
//! checks:
//!
//! ```text
//! in_group("admins") or (not_anonymous() and has_permission("posts.read"))
//! ```
//!
//! `not` binds tighter than `and`, which binds tighter than `or`. Keywords
//! are case-insensitive; function names are not. Chains of `and` or `or`
//! become a single `all` or `any` predicate. The literals `true` and `false`
//! stand for an empty `all` (always met) and an empty `any` (never met).

pub mod ast;
pub mod lower;
pub mod parser;

pub use ast::Expr;
pub use lower::lower;
pub use parser::ExpressionParser;

use warden_authz::Predicate;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExprError {
	#[error("syntax error at offset {offset}: {message}")]
	Syntax { offset: usize, message: String },

	#[error("unknown predicate function '{0}'")]
	UnknownFunction(String),

	#[error("{function}() takes {expected}, got {found}")]
	Arity {
		function: String,
		expected: &'static str,
		found: usize,
	},
}

/// Parses and lowers `source` into a [`Predicate`].
pub fn parse_predicate(source: &str) -> Result<Predicate, ExprError> {
	let expr = ExpressionParser::parse(source)?;
	lower(&expr)
}
