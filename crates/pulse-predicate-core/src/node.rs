// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Storage-engine facing predicate tree.
//!
//! A [`Node`] is what the storage engine receives as a pushdown filter for a
//! bulk delete. Constructors here assemble nodes from already-valid parts and
//! perform no validation; the compiler in [`crate::compile`] is the only
//! producer of trees that are guaranteed well-formed.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The wire kind of a node, derived from its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
	LogicalExpression,
	ComparisonExpression,
	Literal,
	TagRef,
}

/// Comparison operators understood by the storage engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
	Equal,
	NotEqual,
	StartsWith,
	Regex,
	NotRegex,
	Lt,
	Lte,
	Gt,
	Gte,
}

impl Comparison {
	fn symbol(&self) -> &'static str {
		match self {
			Comparison::Equal => "=",
			Comparison::NotEqual => "!=",
			Comparison::StartsWith => "startswith",
			Comparison::Regex => "=~",
			Comparison::NotRegex => "!~",
			Comparison::Lt => "<",
			Comparison::Lte => "<=",
			Comparison::Gt => ">",
			Comparison::Gte => ">=",
		}
	}
}

/// Logical combinators understood by the storage engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Logical {
	And,
	Or,
}

impl fmt::Display for Logical {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Logical::And => write!(f, "AND"),
			Logical::Or => write!(f, "OR"),
		}
	}
}

/// A literal leaf value. The variant decides how the engine interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Literal {
	String(String),
	Regex(String),
}

/// Kind-specific payload of a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "node_type", content = "value", rename_all = "snake_case")]
pub enum NodeValue {
	#[serde(rename = "comparison_expression")]
	Comparison(Comparison),
	#[serde(rename = "logical_expression")]
	Logical(Logical),
	Literal(Literal),
	TagRef(String),
}

/// A node of the compiled predicate tree.
///
/// Comparison nodes carry exactly two children (tag reference, then literal),
/// logical nodes carry any number of children, and leaves carry none.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Node {
	#[serde(flatten)]
	pub value: NodeValue,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub children: Vec<Node>,
}

impl Node {
	/// Builds a comparison between a tag reference and a literal.
	pub fn comparison(op: Comparison, tag_ref: Node, literal: Node) -> Self {
		Self {
			value: NodeValue::Comparison(op),
			children: vec![tag_ref, literal],
		}
	}

	/// Builds a logical node over the given children, preserving their order.
	pub fn logical(op: Logical, children: Vec<Node>) -> Self {
		Self {
			value: NodeValue::Logical(op),
			children,
		}
	}

	pub fn string_literal(value: impl Into<String>) -> Self {
		Self::leaf(NodeValue::Literal(Literal::String(value.into())))
	}

	pub fn regex_literal(value: impl Into<String>) -> Self {
		Self::leaf(NodeValue::Literal(Literal::Regex(value.into())))
	}

	pub fn tag_ref(key: impl Into<String>) -> Self {
		Self::leaf(NodeValue::TagRef(key.into()))
	}

	fn leaf(value: NodeValue) -> Self {
		Self {
			value,
			children: Vec::new(),
		}
	}

	/// Returns the wire kind of this node.
	pub fn node_type(&self) -> NodeType {
		match self.value {
			NodeValue::Comparison(_) => NodeType::ComparisonExpression,
			NodeValue::Logical(_) => NodeType::LogicalExpression,
			NodeValue::Literal(_) => NodeType::Literal,
			NodeValue::TagRef(_) => NodeType::TagRef,
		}
	}

	/// Number of nodes in the tree rooted here.
	pub fn size(&self) -> usize {
		1 + self.children.iter().map(Node::size).sum::<usize>()
	}
}

impl fmt::Display for Node {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.value {
			NodeValue::TagRef(key) => write!(f, "{key}"),
			NodeValue::Literal(Literal::String(v)) => write!(f, "{v:?}"),
			NodeValue::Literal(Literal::Regex(v)) => write!(f, "/{v}/"),
			NodeValue::Comparison(op) => match self.children.as_slice() {
				[lhs, rhs] => write!(f, "{lhs} {} {rhs}", op.symbol()),
				_ => write!(f, "<malformed {}>", op.symbol()),
			},
			NodeValue::Logical(op) => {
				write!(f, "(")?;
				for (i, child) in self.children.iter().enumerate() {
					if i > 0 {
						write!(f, " {op} ")?;
					}
					write!(f, "{child}")?;
				}
				write!(f, ")")
			}
		}
	}
}
