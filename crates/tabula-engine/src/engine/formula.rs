//! Parsed formulas.
//!
//! A [`Formula`] owns the expression tree for a cell's `=...` text. It never
//! looks at a sheet directly: evaluation goes through a caller-supplied lookup,
//! so the sheet can hand in a read-only view of itself.

use super::ast::Expr;
use super::parser::{self, ParseError};
use super::position::Position;
use super::value::{FormulaError, Value};

#[derive(Clone, Debug, PartialEq)]
pub struct Formula {
    ast: Expr,
    /// Sorted, deduplicated, valid positions only.
    references: Vec<Position>,
}

impl Formula {
    /// Parse expression text, without the leading `=`.
    pub fn parse(expression: &str) -> Result<Formula, ParseError> {
        let ast = parser::parse(expression)?;

        let mut references = Vec::new();
        ast.collect_cells(&mut references);
        references.retain(Position::is_valid);
        references.sort();
        references.dedup();

        Ok(Formula { ast, references })
    }

    /// Evaluate against `lookup`, which returns the current value of a cell.
    ///
    /// Never fails outward: bad operands and arithmetic errors come back as
    /// [`Value::Error`]. A referenced cell holding any error is itself a bad
    /// operand, so it yields `#VALUE!`.
    pub fn evaluate<F>(&self, lookup: F) -> Value
    where
        F: Fn(Position) -> Value,
    {
        let resolve = |pos: Position| match lookup(pos) {
            Value::Error(_) => Err(FormulaError::Value),
            value => value.as_number(),
        };
        self.ast.eval(&resolve).into()
    }

    /// Cells this formula reads, sorted and without duplicates.
    ///
    /// References to positions outside the addressable range are left out;
    /// they can never hold a value and evaluate to `#REF!` instead.
    pub fn referenced_cells(&self) -> &[Position] {
        &self.references
    }

    /// Canonical expression text, without the leading `=`.
    pub fn expression(&self) -> String {
        self.ast.to_string()
    }
}
