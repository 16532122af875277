// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Lowering of parsed expressions onto the predicate library.

use warden_authz::Predicate;

use super::ast::Expr;
use super::ExprError;

pub fn lower(expr: &Expr) -> Result<Predicate, ExprError> {
	match expr {
		Expr::Call { name, args } => lower_call(name, args),
		Expr::Not(inner) => Ok(Predicate::not(lower(inner)?)),
		Expr::And(operands) => Ok(Predicate::all(lower_all(operands)?)),
		Expr::Or(operands) => Ok(Predicate::any(lower_all(operands)?)),
	}
}

fn lower_all(operands: &[Expr]) -> Result<Vec<Predicate>, ExprError> {
	operands.iter().map(lower).collect()
}

fn lower_call(name: &str, args: &[String]) -> Result<Predicate, ExprError> {
	match name {
		"is_user" => single(name, args).map(Predicate::is_user),
		"in_group" => single(name, args).map(Predicate::in_group),
		"in_all_groups" => non_empty(name, args).map(Predicate::in_all_groups),
		"in_any_group" => non_empty(name, args).map(Predicate::in_any_group),
		"is_anonymous" => none(name, args).map(|()| Predicate::is_anonymous()),
		"not_anonymous" => none(name, args).map(|()| Predicate::not_anonymous()),
		"has_permission" => single(name, args).map(Predicate::has_permission),
		"has_all_permissions" => non_empty(name, args).map(Predicate::has_all_permissions),
		"has_any_permission" => non_empty(name, args).map(Predicate::has_any_permission),
		_ => Err(ExprError::UnknownFunction(name.to_string())),
	}
}

fn none(name: &str, args: &[String]) -> Result<(), ExprError> {
	if args.is_empty() {
		Ok(())
	} else {
		Err(arity(name, "no arguments", args))
	}
}

fn single(name: &str, args: &[String]) -> Result<String, ExprError> {
	match args {
		[only] => Ok(only.clone()),
		_ => Err(arity(name, "exactly one argument", args)),
	}
}

fn non_empty(name: &str, args: &[String]) -> Result<Vec<String>, ExprError> {
	if args.is_empty() {
		Err(arity(name, "at least one argument", args))
	} else {
		Ok(args.to_vec())
	}
}

fn arity(name: &str, expected: &'static str, args: &[String]) -> ExprError {
	ExprError::Arity {
		function: name.to_string(),
		expected,
		found: args.len(),
	}
}
