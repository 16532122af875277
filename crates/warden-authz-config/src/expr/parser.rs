// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use winnow::ascii::{multispace0, Caseless};
use winnow::error::{ContextError, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{any, one_of, take_while};

use super::ast::Expr;
use super::ExprError;

pub struct ExpressionParser;

impl ExpressionParser {
	pub fn parse(input: &str) -> Result<Expr, ExprError> {
		parse_expression
			.parse(input)
			.map_err(|e| ExprError::Syntax {
				offset: e.offset(),
				message: describe(e.inner()),
			})
	}
}

fn describe(error: &ContextError) -> String {
	let message = error.to_string();
	if message.is_empty() {
		"unexpected input".to_string()
	} else {
		message.replace('\n', "; ")
	}
}

fn parse_expression(input: &mut &str) -> Result<Expr, ContextError> {
	let expr = parse_or_expr(input)?;
	ws(input)?;
	Ok(expr)
}

fn parse_or_expr(input: &mut &str) -> Result<Expr, ContextError> {
	let mut operands = vec![parse_and_expr(input)?];

	loop {
		let checkpoint = *input;
		ws(input)?;
		if !keyword(input, "or") {
			*input = checkpoint;
			break;
		}
		operands.push(parse_and_expr(input)?);
	}

	Ok(Expr::or(operands))
}

fn parse_and_expr(input: &mut &str) -> Result<Expr, ContextError> {
	let mut operands = vec![parse_not_expr(input)?];

	loop {
		let checkpoint = *input;
		ws(input)?;
		if !keyword(input, "and") {
			*input = checkpoint;
			break;
		}
		operands.push(parse_not_expr(input)?);
	}

	Ok(Expr::and(operands))
}

fn parse_not_expr(input: &mut &str) -> Result<Expr, ContextError> {
	ws(input)?;
	if keyword(input, "not") {
		let operand = parse_not_expr(input)?;
		return Ok(Expr::Not(Box::new(operand)));
	}
	parse_atom(input)
}

fn parse_atom(input: &mut &str) -> Result<Expr, ContextError> {
	ws(input)?;

	if input.starts_with('(') {
		symbol(input, '(')?;
		let expr = parse_or_expr(input)?;
		ws(input)?;
		symbol(input, ')')?;
		return Ok(expr);
	}
	if keyword(input, "true") {
		return Ok(Expr::And(Vec::new()));
	}
	if keyword(input, "false") {
		return Ok(Expr::Or(Vec::new()));
	}

	parse_call(input)
}

fn parse_call(input: &mut &str) -> Result<Expr, ContextError> {
	let name = identifier(input)?;
	ws(input)?;
	symbol(input, '(')?;
	ws(input)?;

	let mut args = Vec::new();
	if input.starts_with(')') {
		symbol(input, ')')?;
		return Ok(Expr::call(name, args));
	}

	loop {
		args.push(string_literal(input)?);
		ws(input)?;
		if input.starts_with(',') {
			symbol(input, ',')?;
			ws(input)?;
			continue;
		}
		symbol(input, ')')?;
		return Ok(Expr::call(name, args));
	}
}

fn identifier<'i>(input: &mut &'i str) -> Result<&'i str, ContextError> {
	(
		one_of(|c: char| c.is_ascii_alphabetic() || c == '_'),
		take_while(0.., is_identifier_char),
	)
		.take()
		.context(StrContext::Label("predicate"))
		.context(StrContext::Expected(StrContextValue::Description(
			"function call",
		)))
		.parse_next(input)
}

/// Double-quoted string with `\"`, `\\`, `\n`, `\t` and `\r` escapes. Any other
/// character, including a raw control character, is taken literally.
fn string_literal(input: &mut &str) -> Result<String, ContextError> {
	symbol(input, '"')?;

	let mut value = String::new();
	loop {
		value.push_str(unescaped(input)?);
		match string_char(input)? {
			'"' => return Ok(value),
			_ => {
				let escaped = match string_char(input)? {
					'n' => '\n',
					't' => '\t',
					'r' => '\r',
					other => other,
				};
				value.push(escaped);
			}
		}
	}
}

fn unescaped<'i>(input: &mut &'i str) -> Result<&'i str, ContextError> {
	take_while(0.., |c: char| c != '"' && c != '\\').parse_next(input)
}

fn string_char(input: &mut &str) -> Result<char, ContextError> {
	any.context(StrContext::Label("string literal"))
		.context(StrContext::Expected(StrContextValue::CharLiteral('"')))
		.parse_next(input)
}

fn symbol(input: &mut &str, c: char) -> Result<(), ContextError> {
	c.context(StrContext::Expected(StrContextValue::CharLiteral(c)))
		.parse_next(input)
		.map(|_| ())
}

fn ws(input: &mut &str) -> Result<(), ContextError> {
	multispace0.parse_next(input).map(|_: &str| ())
}

/// Consumes `word` if it appears next as a whole word, ignoring case.
fn keyword(input: &mut &str, word: &'static str) -> bool {
	let checkpoint = *input;
	let matched: Result<&str, ContextError> = Caseless(word).parse_next(input);
	if matched.is_ok() && !input.starts_with(is_identifier_char) {
		return true;
	}
	*input = checkpoint;
	false
}

fn is_identifier_char(c: char) -> bool {
	c.is_ascii_alphanumeric() || c == '_'
}
