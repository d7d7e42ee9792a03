//! Spreadsheet engine API.
//!
//! This module provides the computation pieces the sheet is built from:
//!
//! - [`Position`], [`Size`] - Grid coordinates (A1 notation <-> row/col indices)
//! - [`Value`], [`FormulaError`] - Computed cell results
//! - [`Formula`] - Parsed arithmetic expression, evaluation and referenced cells
//! - [`detect_cycle`] - Circular dependency detection over a proposed edit
//! - [`format_number`] - Format numbers for display

mod ast;
mod cycle;
mod format;
mod formula;
mod parser;
mod position;
mod value;

pub use cycle::detect_cycle;
pub use format::format_number;
pub use formula::Formula;
pub use parser::ParseError;
pub use position::{MAX_COLS, MAX_ROWS, Position, Size};
pub use value::{FormulaError, Value};
