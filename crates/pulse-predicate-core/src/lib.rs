// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Delete predicates for Pulse.
//!
//! A delete request carries a boolean filter over series tags. This crate
//! owns the three representations that filter passes through:
//!
//! - text, as typed by the user (`tag1="v" AND tag2="w"`), handled by [`parser`]
//! - [`PredicateExpr`], the typed expression tree
//! - [`Node`], the canonical tree the storage engine evaluates as a pushdown filter
//!
//! [`compile`] lowers an expression into a node tree and rejects anything the
//! delete path cannot execute.
//!
//! # Example
//!
//! ```
//! use pulse_predicate_core::{parse, Predicate};
//!
//! let expr = parse(r#"host="a" AND region="eu""#).unwrap().unwrap();
//! let predicate = Predicate::new(expr).unwrap();
//! assert_eq!(predicate.node().children.len(), 2);
//! ```

pub mod compile;
pub mod error;
pub mod expr;
pub mod node;
pub mod parser;

pub use compile::{compile, Predicate};
pub use error::{CompileError, CompileErrorKind, ParseError, PredicateError, Result};
pub use expr::{LogicalNode, LogicalOperator, Operator, PredicateExpr, TagRuleNode};
pub use node::{Comparison, Literal, Logical, Node, NodeType, NodeValue};
pub use parser::{parse, MAX_DEPTH};

/// Parses and compiles predicate text in one step.
///
/// Blank text yields `Ok(None)`, meaning the delete matches every series.
pub fn parse_predicate(text: &str) -> std::result::Result<Option<Predicate>, PredicateError> {
	match parse(text)? {
		Some(expr) => Ok(Some(Predicate::new(expr)?)),
		None => Ok(None),
	}
}
