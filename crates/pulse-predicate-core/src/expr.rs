// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User-facing predicate expressions, prior to compilation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CompileError;

/// Logical combinator of a [`LogicalNode`].
///
/// `Or` is representable so the textual form can express it, but only `And`
/// compiles into a delete predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalOperator {
	And,
	Or,
}

impl LogicalOperator {
	pub fn as_str(&self) -> &'static str {
		match self {
			LogicalOperator::And => "and",
			LogicalOperator::Or => "or",
		}
	}
}

impl fmt::Display for LogicalOperator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for LogicalOperator {
	type Err = CompileError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"and" => Ok(LogicalOperator::And),
			"or" => Ok(LogicalOperator::Or),
			_ => Err(CompileError::InvalidLogicalOperator(s.to_string())),
		}
	}
}

/// Tag comparison operator of a [`TagRuleNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
	#[serde(rename = "equal")]
	Equal,
	#[serde(rename = "notequal")]
	NotEqual,
	#[serde(rename = "equalregex")]
	RegexEqual,
	#[serde(rename = "notequalregex")]
	NotRegexEqual,
}

impl Operator {
	pub fn as_str(&self) -> &'static str {
		match self {
			Operator::Equal => "equal",
			Operator::NotEqual => "notequal",
			Operator::RegexEqual => "equalregex",
			Operator::NotRegexEqual => "notequalregex",
		}
	}

	/// Returns true for the operators whose value is a regex pattern.
	pub fn is_regex(&self) -> bool {
		matches!(self, Operator::RegexEqual | Operator::NotRegexEqual)
	}

	pub fn all() -> &'static [Operator] {
		&[
			Operator::Equal,
			Operator::NotEqual,
			Operator::RegexEqual,
			Operator::NotRegexEqual,
		]
	}
}

impl fmt::Display for Operator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Operator {
	type Err = CompileError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Operator::all()
			.iter()
			.copied()
			.find(|op| op.as_str() == s)
			.ok_or_else(|| CompileError::UnknownOperator(s.to_string()))
	}
}

/// A single comparison between a tag key and a value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRuleNode {
	pub key: String,
	pub operator: Operator,
	/// A plain string, or a regex pattern when the operator is a regex operator.
	pub value: String,
}

impl TagRuleNode {
	pub fn new(key: impl Into<String>, operator: Operator, value: impl Into<String>) -> Self {
		Self {
			key: key.into(),
			operator,
			value: value.into(),
		}
	}
}

/// A combinator over child expressions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicalNode {
	pub operator: LogicalOperator,
	pub children: Vec<PredicateExpr>,
}

impl LogicalNode {
	pub fn new(operator: LogicalOperator, children: Vec<PredicateExpr>) -> Self {
		Self { operator, children }
	}

	pub fn and(children: Vec<PredicateExpr>) -> Self {
		Self::new(LogicalOperator::And, children)
	}
}

/// A predicate expression tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PredicateExpr {
	Logical(LogicalNode),
	TagRule(TagRuleNode),
}

impl PredicateExpr {
	pub fn tag_rule(key: impl Into<String>, operator: Operator, value: impl Into<String>) -> Self {
		PredicateExpr::TagRule(TagRuleNode::new(key, operator, value))
	}

	pub fn and(children: Vec<PredicateExpr>) -> Self {
		PredicateExpr::Logical(LogicalNode::and(children))
	}
}

impl From<TagRuleNode> for PredicateExpr {
	fn from(node: TagRuleNode) -> Self {
		PredicateExpr::TagRule(node)
	}
}

impl From<LogicalNode> for PredicateExpr {
	fn from(node: LogicalNode) -> Self {
		PredicateExpr::Logical(node)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn operator_from_str_round_trips_wire_spelling() {
		for op in Operator::all() {
			assert_eq!(op.as_str().parse::<Operator>().unwrap(), *op);
		}
	}

	#[test]
	fn unknown_operator_is_rejected() {
		let err = "gt".parse::<Operator>().unwrap_err();
		assert_eq!(err.to_string(), "unsupported operator: gt");
	}

	#[test]
	fn logical_operator_parse_is_case_insensitive() {
		assert_eq!("AND".parse::<LogicalOperator>().unwrap(), LogicalOperator::And);
		assert_eq!("Or".parse::<LogicalOperator>().unwrap(), LogicalOperator::Or);
		assert!("xor".parse::<LogicalOperator>().is_err());
	}

	#[test]
	fn regex_operators() {
		assert!(Operator::RegexEqual.is_regex());
		assert!(Operator::NotRegexEqual.is_regex());
		assert!(!Operator::Equal.is_regex());
		assert!(!Operator::NotEqual.is_regex());
	}

	#[test]
	fn expression_json_shape() {
		let expr = PredicateExpr::and(vec![PredicateExpr::tag_rule("tag1", Operator::Equal, "v")]);
		let json = serde_json::to_value(&expr).unwrap();
		assert_eq!(
			json,
			serde_json::json!({
				"type": "logical",
				"operator": "and",
				"children": [
					{ "type": "tag_rule", "key": "tag1", "operator": "equal", "value": "v" }
				],
			})
		);
	}
}
