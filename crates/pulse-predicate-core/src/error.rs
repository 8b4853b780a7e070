// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use thiserror::Error;

use crate::expr::Operator;

/// Stable classification of a [`CompileError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompileErrorKind {
	InvalidOperator,
	UnsupportedOperator,
	InvalidChild,
}

/// Errors produced while lowering a predicate expression into a node tree.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompileError {
	#[error("the logical operator {0:?} is invalid")]
	InvalidLogicalOperator(String),

	#[error("unsupported operator: {0}")]
	UnknownOperator(String),

	#[error("operator {0} is not supported for delete predicate yet")]
	UnsupportedOperator(Operator),

	#[error("err in child {index}, err: {source}")]
	InvalidChild {
		index: usize,
		#[source]
		source: Box<CompileError>,
	},
}

impl CompileError {
	pub fn kind(&self) -> CompileErrorKind {
		match self {
			CompileError::InvalidLogicalOperator(_) | CompileError::UnknownOperator(_) => {
				CompileErrorKind::InvalidOperator
			}
			CompileError::UnsupportedOperator(_) => CompileErrorKind::UnsupportedOperator,
			CompileError::InvalidChild { .. } => CompileErrorKind::InvalidChild,
		}
	}

	/// Follows child wrappers down to the error that started the failure.
	pub fn root_cause(&self) -> &CompileError {
		match self {
			CompileError::InvalidChild { source, .. } => source.root_cause(),
			other => other,
		}
	}

	/// Child indices from the root to the failing node.
	pub fn path(&self) -> Vec<usize> {
		let mut path = Vec::new();
		let mut current = self;
		while let CompileError::InvalidChild { index, source } = current {
			path.push(*index);
			current = source;
		}
		path
	}
}

/// Syntax error in textual predicate input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid predicate at position {position}: {message}")]
pub struct ParseError {
	/// Byte offset into the input.
	pub position: usize,
	pub message: String,
}

impl ParseError {
	pub fn new(position: usize, message: impl Into<String>) -> Self {
		Self {
			position,
			message: message.into(),
		}
	}
}

/// Any failure turning predicate text into a compiled predicate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PredicateError {
	#[error(transparent)]
	Parse(#[from] ParseError),

	#[error(transparent)]
	Compile(#[from] CompileError),
}

pub type Result<T> = std::result::Result<T, CompileError>;

#[cfg(test)]
mod tests {
	use super::*;

	fn nested() -> CompileError {
		CompileError::InvalidChild {
			index: 1,
			source: Box::new(CompileError::InvalidChild {
				index: 0,
				source: Box::new(CompileError::UnsupportedOperator(Operator::NotEqual)),
			}),
		}
	}

	#[test]
	fn child_error_message_names_index_and_inner_error() {
		assert_eq!(
			nested().to_string(),
			"err in child 1, err: err in child 0, err: operator notequal is not supported for delete predicate yet"
		);
	}

	#[test]
	fn root_cause_and_path() {
		let err = nested();
		assert_eq!(err.kind(), CompileErrorKind::InvalidChild);
		assert_eq!(
			err.root_cause(),
			&CompileError::UnsupportedOperator(Operator::NotEqual)
		);
		assert_eq!(err.path(), vec![1, 0]);
	}

	#[test]
	fn invalid_logical_operator_quotes_name() {
		let err = CompileError::InvalidLogicalOperator("or".to_string());
		assert_eq!(err.to_string(), "the logical operator \"or\" is invalid");
		assert_eq!(err.kind(), CompileErrorKind::InvalidOperator);
	}
}
