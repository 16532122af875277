// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
	Call { name: String, args: Vec<String> },
	Not(Box<Expr>),
	And(Vec<Expr>),
	Or(Vec<Expr>),
}

impl Expr {
	pub fn call(name: impl Into<String>, args: Vec<String>) -> Self {
		Self::Call {
			name: name.into(),
			args,
		}
	}

	/// Builds an `and` chain, collapsing a single operand to itself.
	pub(crate) fn and(mut operands: Vec<Expr>) -> Self {
		if operands.len() == 1 {
			if let Some(only) = operands.pop() {
				return only;
			}
		}
		Self::And(operands)
	}

	/// Builds an `or` chain, collapsing a single operand to itself.
	pub(crate) fn or(mut operands: Vec<Expr>) -> Self {
		if operands.len() == 1 {
			if let Some(only) = operands.pop() {
				return only;
			}
		}
		Self::Or(operands)
	}
}
