// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Lowering of predicate expressions into storage-engine node trees.
//!
//! Compilation is pure and all-or-nothing: either the whole tree lowers or an
//! error describing the first failing node is returned.

use serde::Serialize;

use crate::error::{CompileError, Result};
use crate::expr::{LogicalNode, LogicalOperator, Operator, PredicateExpr, TagRuleNode};
use crate::node::{Comparison, Logical, Node};

/// Compiles an expression tree into a node tree.
pub fn compile(expr: &PredicateExpr) -> Result<Node> {
	match expr {
		PredicateExpr::Logical(node) => compile_logical(node),
		PredicateExpr::TagRule(node) => compile_tag_rule(node),
	}
}

/// Maps a logical operator to its wire value. Only AND is valid for deletes.
pub fn logical_value(op: LogicalOperator) -> Result<Logical> {
	match op {
		LogicalOperator::And => Ok(Logical::And),
		LogicalOperator::Or => Err(CompileError::InvalidLogicalOperator(op.to_string())),
	}
}

/// Maps a tag-rule operator to its wire comparison. Only equality is
/// accepted for deletes; the remaining operators are legal tag rules that the
/// delete path rejects.
pub fn comparison_value(op: Operator) -> Result<Comparison> {
	match op {
		Operator::Equal => Ok(Comparison::Equal),
		Operator::NotEqual | Operator::RegexEqual | Operator::NotRegexEqual => {
			Err(CompileError::UnsupportedOperator(op))
		}
	}
}

/// Builds the literal leaf for a rule: regex operators get a regex literal,
/// everything else a string literal.
pub fn literal_for(rule: &TagRuleNode) -> Node {
	if rule.operator.is_regex() {
		Node::regex_literal(rule.value.clone())
	} else {
		Node::string_literal(rule.value.clone())
	}
}

fn compile_logical(node: &LogicalNode) -> Result<Node> {
	let op = logical_value(node.operator)?;
	let children = node
		.children
		.iter()
		.enumerate()
		.map(|(index, child)| {
			compile(child).map_err(|source| CompileError::InvalidChild {
				index,
				source: Box::new(source),
			})
		})
		.collect::<Result<Vec<_>>>()?;
	Ok(Node::logical(op, children))
}

fn compile_tag_rule(rule: &TagRuleNode) -> Result<Node> {
	let literal = literal_for(rule);
	let op = comparison_value(rule.operator)?;
	Ok(Node::comparison(op, Node::tag_ref(rule.key.clone()), literal))
}

/// A delete predicate that has passed compilation.
///
/// Holds the source expression alongside its compiled tree so callers never
/// need to compile twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Predicate {
	expr: PredicateExpr,
	node: Node,
}

impl Predicate {
	pub fn new(expr: PredicateExpr) -> Result<Self> {
		let node = compile(&expr)?;
		Ok(Self { expr, node })
	}

	pub fn expr(&self) -> &PredicateExpr {
		&self.expr
	}

	pub fn node(&self) -> &Node {
		&self.node
	}

	pub fn into_node(self) -> Node {
		self.node
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::CompileErrorKind;
	use crate::node::{Literal, NodeType, NodeValue};
	use proptest::prelude::*;

	fn eq(key: &str, value: &str) -> PredicateExpr {
		PredicateExpr::tag_rule(key, Operator::Equal, value)
	}

	#[test]
	fn equal_rule_compiles_to_comparison() {
		let node = compile(&eq("tag1", "v")).unwrap();
		assert_eq!(node.value, NodeValue::Comparison(Comparison::Equal));
		assert_eq!(
			node.children,
			vec![Node::tag_ref("tag1"), Node::string_literal("v")]
		);
	}

	#[test]
	fn rejected_operators_are_unsupported() {
		for op in [
			Operator::NotEqual,
			Operator::RegexEqual,
			Operator::NotRegexEqual,
		] {
			let err = compile(&PredicateExpr::tag_rule("k", op, "v")).unwrap_err();
			assert_eq!(err, CompileError::UnsupportedOperator(op));
			assert_eq!(err.kind(), CompileErrorKind::UnsupportedOperator);
		}
	}

	#[test]
	fn literal_kind_follows_operator() {
		let regex = TagRuleNode::new("k", Operator::RegexEqual, "^a");
		assert_eq!(
			literal_for(&regex).value,
			NodeValue::Literal(Literal::Regex("^a".into()))
		);
		let not_regex = TagRuleNode::new("k", Operator::NotRegexEqual, "^a");
		assert_eq!(
			literal_for(&not_regex).value,
			NodeValue::Literal(Literal::Regex("^a".into()))
		);
		let not_equal = TagRuleNode::new("k", Operator::NotEqual, "a");
		assert_eq!(
			literal_for(&not_equal).value,
			NodeValue::Literal(Literal::String("a".into()))
		);
	}

	#[test]
	fn and_node_preserves_child_order() {
		let expr = PredicateExpr::and(vec![eq("tag1", "v"), eq("tag2", "w")]);
		let node = compile(&expr).unwrap();
		assert_eq!(node.value, NodeValue::Logical(Logical::And));
		assert_eq!(node.children.len(), 2);
		assert_eq!(node.children[0].children[0], Node::tag_ref("tag1"));
		assert_eq!(node.children[1].children[0], Node::tag_ref("tag2"));
	}

	#[test]
	fn empty_and_compiles() {
		let node = compile(&PredicateExpr::and(vec![])).unwrap();
		assert_eq!(node.node_type(), NodeType::LogicalExpression);
		assert!(node.children.is_empty());
	}

	#[test]
	fn or_is_an_invalid_logical_operator() {
		let expr = PredicateExpr::Logical(LogicalNode::new(
			LogicalOperator::Or,
			vec![eq("a", "1"), eq("b", "2")],
		));
		let err = compile(&expr).unwrap_err();
		assert_eq!(err.kind(), CompileErrorKind::InvalidOperator);
		assert_eq!(err.to_string(), "the logical operator \"or\" is invalid");
	}

	#[test]
	fn failing_child_is_wrapped_with_its_index() {
		let expr = PredicateExpr::and(vec![
			eq("a", "1"),
			eq("b", "2"),
			PredicateExpr::tag_rule("c", Operator::NotEqual, "3"),
		]);
		let err = compile(&expr).unwrap_err();
		assert_eq!(err.kind(), CompileErrorKind::InvalidChild);
		assert_eq!(err.path(), vec![2]);
		assert_eq!(
			err.root_cause(),
			&CompileError::UnsupportedOperator(Operator::NotEqual)
		);
	}

	#[test]
	fn nested_failure_reports_full_path() {
		let expr = PredicateExpr::and(vec![
			eq("a", "1"),
			PredicateExpr::and(vec![PredicateExpr::tag_rule("b", Operator::RegexEqual, "x")]),
		]);
		let err = compile(&expr).unwrap_err();
		assert_eq!(err.path(), vec![1, 0]);
	}

	#[test]
	fn predicate_keeps_expression_and_node() {
		let expr = PredicateExpr::and(vec![eq("tag1", "v")]);
		let predicate = Predicate::new(expr.clone()).unwrap();
		assert_eq!(predicate.expr(), &expr);
		assert_eq!(predicate.node(), &compile(&expr).unwrap());
	}

	fn arb_key() -> impl Strategy<Value = String> {
		"[a-z_][a-z0-9_]{0,12}"
	}

	proptest! {
		#[test]
		fn and_of_equal_rules_preserves_order_and_length(
			rules in prop::collection::vec((arb_key(), ".{0,16}"), 0..12)
		) {
			let children = rules
				.iter()
				.map(|(k, v)| PredicateExpr::tag_rule(k.clone(), Operator::Equal, v.clone()))
				.collect::<Vec<_>>();
			let node = compile(&PredicateExpr::and(children)).unwrap();
			prop_assert_eq!(node.children.len(), rules.len());
			for (child, (key, value)) in node.children.iter().zip(&rules) {
				prop_assert_eq!(&child.children[0], &Node::tag_ref(key.clone()));
				prop_assert_eq!(&child.children[1], &Node::string_literal(value.clone()));
			}
		}

		#[test]
		fn non_equal_operators_always_fail(
			key in arb_key(),
			value in ".{0,32}",
			op in prop::sample::select(vec![
				Operator::NotEqual,
				Operator::RegexEqual,
				Operator::NotRegexEqual,
			]),
		) {
			let err = compile(&PredicateExpr::tag_rule(key, op, value)).unwrap_err();
			prop_assert_eq!(err, CompileError::UnsupportedOperator(op));
		}
	}
}
