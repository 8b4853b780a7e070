// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Textual delete-predicate parser.
//!
//! ```text
//! expr  := term (("AND" | "OR") term)*
//! term  := "(" expr ")" | key op value
//! key   := identifier | "quoted"
//! op    := "=" | "!=" | "=~" | "!~"
//! value := "quoted"            (for = and !=)
//!        | /pattern/           (for =~ and !~)
//! ```
//!
//! Keywords are case-insensitive. A chain of terms joined by the same
//! keyword becomes one logical node with the terms as children in source
//! order; mixing AND and OR at one level requires parentheses. Parentheses
//! nest at most [`MAX_DEPTH`] levels.

use crate::error::ParseError;
use crate::expr::{LogicalNode, LogicalOperator, Operator, PredicateExpr, TagRuleNode};

/// Maximum nesting of parenthesised groups.
pub const MAX_DEPTH: usize = 64;

/// Parses predicate text. Blank input parses to `None`, meaning "match all".
pub fn parse(input: &str) -> Result<Option<PredicateExpr>, ParseError> {
	let mut parser = Parser::new(input);
	parser.skip_ws();
	if parser.at_end() {
		return Ok(None);
	}

	let expr = parser.parse_expr()?;
	parser.skip_ws();
	if !parser.at_end() {
		return Err(parser.error(format!("unexpected input {:?}", parser.rest())));
	}
	Ok(Some(expr))
}

struct Parser<'a> {
	input: &'a str,
	pos: usize,
	depth: usize,
}

impl<'a> Parser<'a> {
	fn new(input: &'a str) -> Self {
		Self {
			input,
			pos: 0,
			depth: 0,
		}
	}

	fn rest(&self) -> &'a str {
		&self.input[self.pos..]
	}

	fn at_end(&self) -> bool {
		self.pos >= self.input.len()
	}

	fn peek(&self) -> Option<char> {
		self.rest().chars().next()
	}

	fn bump(&mut self) -> Option<char> {
		let c = self.peek()?;
		self.pos += c.len_utf8();
		Some(c)
	}

	fn eat(&mut self, s: &str) -> bool {
		if self.rest().starts_with(s) {
			self.pos += s.len();
			true
		} else {
			false
		}
	}

	fn skip_ws(&mut self) {
		while self.peek().is_some_and(char::is_whitespace) {
			self.bump();
		}
	}

	fn error(&self, message: impl Into<String>) -> ParseError {
		ParseError::new(self.pos, message)
	}

	fn parse_expr(&mut self) -> Result<PredicateExpr, ParseError> {
		let mut terms = vec![self.parse_term()?];
		let mut joined_by: Option<LogicalOperator> = None;

		loop {
			self.skip_ws();
			let start = self.pos;
			let Some(op) = self.parse_keyword() else {
				break;
			};
			match joined_by {
				Some(prev) if prev != op => {
					return Err(ParseError::new(
						start,
						format!("cannot mix {prev} and {op} without parentheses"),
					));
				}
				_ => joined_by = Some(op),
			}
			terms.push(self.parse_term()?);
		}

		match joined_by {
			None => Ok(terms.remove(0)),
			Some(op) => Ok(PredicateExpr::Logical(LogicalNode::new(op, terms))),
		}
	}

	fn parse_keyword(&mut self) -> Option<LogicalOperator> {
		let word = self.peek_word();
		let op = if word.eq_ignore_ascii_case("and") {
			LogicalOperator::And
		} else if word.eq_ignore_ascii_case("or") {
			LogicalOperator::Or
		} else {
			return None;
		};
		self.pos += word.len();
		Some(op)
	}

	fn peek_word(&self) -> &'a str {
		let rest = self.rest();
		let end = rest
			.find(|c: char| !is_ident_char(c))
			.unwrap_or(rest.len());
		&rest[..end]
	}

	fn parse_term(&mut self) -> Result<PredicateExpr, ParseError> {
		self.skip_ws();
		if self.peek() == Some('(') {
			if self.depth >= MAX_DEPTH {
				return Err(self.error("predicate nested too deeply"));
			}
			self.pos += 1;
			self.depth += 1;
			let expr = self.parse_expr()?;
			self.skip_ws();
			if !self.eat(")") {
				return Err(self.error("expected ')'"));
			}
			self.depth -= 1;
			return Ok(expr);
		}

		let key = self.parse_key()?;
		self.skip_ws();
		let operator = self.parse_operator()?;
		self.skip_ws();
		let value = if operator.is_regex() {
			self.parse_regex()?
		} else {
			self.parse_string()?
		};
		Ok(TagRuleNode::new(key, operator, value).into())
	}

	fn parse_key(&mut self) -> Result<String, ParseError> {
		if self.peek() == Some('"') {
			return self.parse_string();
		}
		let word = self.peek_word();
		if word.is_empty() {
			return Err(match self.peek() {
				Some(c) => self.error(format!("expected tag key, found {c:?}")),
				None => self.error("expected tag key, found end of input"),
			});
		}
		self.pos += word.len();
		Ok(word.to_string())
	}

	fn parse_operator(&mut self) -> Result<Operator, ParseError> {
		if self.eat("=~") {
			Ok(Operator::RegexEqual)
		} else if self.eat("!~") {
			Ok(Operator::NotRegexEqual)
		} else if self.eat("!=") {
			Ok(Operator::NotEqual)
		} else if self.eat("=") {
			Ok(Operator::Equal)
		} else {
			Err(self.error("expected one of =, !=, =~, !~"))
		}
	}

	fn parse_string(&mut self) -> Result<String, ParseError> {
		let start = self.pos;
		if !self.eat("\"") {
			return Err(self.error("expected double-quoted string"));
		}
		let mut out = String::new();
		loop {
			match self.bump() {
				Some('"') => return Ok(out),
				Some('\\') => match self.bump() {
					Some(c @ ('"' | '\\')) => out.push(c),
					Some('n') => out.push('\n'),
					Some('t') => out.push('\t'),
					Some(c) => {
						out.push('\\');
						out.push(c);
					}
					None => break,
				},
				Some(c) => out.push(c),
				None => break,
			}
		}
		Err(ParseError::new(start, "unterminated string"))
	}

	fn parse_regex(&mut self) -> Result<String, ParseError> {
		let start = self.pos;
		if !self.eat("/") {
			return Err(self.error("expected /regex/ after regex operator"));
		}
		let mut out = String::new();
		loop {
			match self.bump() {
				Some('/') => return Ok(out),
				Some('\\') => match self.bump() {
					Some('/') => out.push('/'),
					Some(c) => {
						out.push('\\');
						out.push(c);
					}
					None => break,
				},
				Some(c) => out.push(c),
				None => break,
			}
		}
		Err(ParseError::new(start, "unterminated regex"))
	}
}

fn is_ident_char(c: char) -> bool {
	c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':')
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::compile::compile;
	use crate::node::{Logical, Node, NodeValue};
	use proptest::prelude::*;

	fn rule(key: &str, op: Operator, value: &str) -> PredicateExpr {
		PredicateExpr::tag_rule(key, op, value)
	}

	#[test]
	fn blank_input_matches_all() {
		assert_eq!(parse("").unwrap(), None);
		assert_eq!(parse("   \n\t").unwrap(), None);
	}

	#[test]
	fn single_rule() {
		assert_eq!(
			parse(r#"tag1="v""#).unwrap(),
			Some(rule("tag1", Operator::Equal, "v"))
		);
	}

	#[test]
	fn and_chain_is_one_logical_node_in_source_order() {
		let expr = parse(r#"tag1="v" AND tag2="w" and _measurement="cpu""#)
			.unwrap()
			.unwrap();
		assert_eq!(
			expr,
			PredicateExpr::and(vec![
				rule("tag1", Operator::Equal, "v"),
				rule("tag2", Operator::Equal, "w"),
				rule("_measurement", Operator::Equal, "cpu"),
			])
		);
	}

	#[test]
	fn all_operators_parse() {
		let expr = parse(r#"a!="1" AND b=~/^x\/y$/ AND c !~ /z/"#).unwrap().unwrap();
		assert_eq!(
			expr,
			PredicateExpr::and(vec![
				rule("a", Operator::NotEqual, "1"),
				rule("b", Operator::RegexEqual, "^x/y$"),
				rule("c", Operator::NotRegexEqual, "z"),
			])
		);
	}

	#[test]
	fn quoted_keys_and_escapes() {
		let expr = parse(r#""my tag"="say \"hi\"""#).unwrap().unwrap();
		assert_eq!(expr, rule("my tag", Operator::Equal, "say \"hi\""));
	}

	#[test]
	fn parentheses_nest() {
		let expr = parse(r#"(a="1" AND b="2") AND c="3""#).unwrap().unwrap();
		assert_eq!(
			expr,
			PredicateExpr::and(vec![
				PredicateExpr::and(vec![
					rule("a", Operator::Equal, "1"),
					rule("b", Operator::Equal, "2"),
				]),
				rule("c", Operator::Equal, "3"),
			])
		);
	}

	#[test]
	fn or_parses_but_does_not_compile() {
		let expr = parse(r#"a="1" OR b="2""#).unwrap().unwrap();
		let err = compile(&expr).unwrap_err();
		assert_eq!(err.to_string(), "the logical operator \"or\" is invalid");
	}

	#[test]
	fn mixing_keywords_requires_parentheses() {
		let err = parse(r#"a="1" AND b="2" OR c="3""#).unwrap_err();
		assert!(err.message.contains("cannot mix and and or"));
	}

	#[test]
	fn syntax_errors() {
		assert!(parse(r#"a="1"#).unwrap_err().message.contains("unterminated string"));
		assert!(parse("a=~/x").unwrap_err().message.contains("unterminated regex"));
		assert!(parse("a 1").unwrap_err().message.contains("expected one of"));
		assert!(parse("a=1").unwrap_err().message.contains("double-quoted"));
		assert!(parse(r#"a=~"x""#).unwrap_err().message.contains("/regex/"));
		assert!(parse(r#"(a="1""#).unwrap_err().message.contains("')'"));
		assert!(parse(r#"a="1" b="2""#).unwrap_err().message.contains("unexpected input"));
		assert!(parse(r#"a="1" AND"#).unwrap_err().message.contains("expected tag key"));
	}

	#[test]
	fn error_positions_point_into_input() {
		let err = parse(r#"tag1="v" AND ="w""#).unwrap_err();
		assert_eq!(err.position, 13);
	}

	#[test]
	fn nesting_up_to_limit_parses() {
		let text = format!("{}a=\"1\"{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
		assert_eq!(parse(&text).unwrap(), Some(rule("a", Operator::Equal, "1")));
	}

	#[test]
	fn deep_nesting_is_rejected_without_recursing() {
		let text = format!("{}a=\"1\"{}", "(".repeat(200_000), ")".repeat(200_000));
		let err = parse(&text).unwrap_err();
		assert_eq!(err.message, "predicate nested too deeply");
		assert_eq!(err.position, MAX_DEPTH);
	}

	#[test]
	fn sibling_groups_do_not_accumulate_depth() {
		let group = r#"(a="1")"#;
		let text = vec![group; MAX_DEPTH * 2].join(" AND ");
		let expr = parse(&text).unwrap().unwrap();
		let PredicateExpr::Logical(node) = expr else {
			panic!("expected logical node");
		};
		assert_eq!(node.children.len(), MAX_DEPTH * 2);
	}

	#[test]
	fn keyword_prefix_is_not_a_keyword() {
		let expr = parse(r#"android="1""#).unwrap().unwrap();
		assert_eq!(expr, rule("android", Operator::Equal, "1"));
	}

	#[test]
	fn parsed_and_chain_compiles_to_and_root() {
		let expr = parse(r#"tag1="v" AND tag2="w""#).unwrap().unwrap();
		let node = compile(&expr).unwrap();
		assert_eq!(node.value, NodeValue::Logical(Logical::And));
		assert_eq!(node.children[0].children[0], Node::tag_ref("tag1"));
		assert_eq!(node.children[1].children[0], Node::tag_ref("tag2"));
	}

	proptest! {
		#[test]
		fn simple_rules_round_trip(
			key in "[a-z_][a-z0-9_]{0,10}",
			value in "[a-zA-Z0-9 ._-]{0,16}",
		) {
			prop_assume!(!key.eq_ignore_ascii_case("and") && !key.eq_ignore_ascii_case("or"));
			let text = format!("{key}=\"{value}\"");
			prop_assert_eq!(parse(&text).unwrap(), Some(rule(&key, Operator::Equal, &value)));
		}
	}
}
