//! Error types for Tabula core.

use thiserror::Error;

use tabula_engine::engine::{ParseError, Position};

/// Errors that abort a sheet operation.
///
/// A failed operation leaves the sheet exactly as it was. Formula evaluation
/// problems (`#DIV/0!` and friends) are values, not errors, and never show up here.
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Invalid position: row {}, col {}", .0.row, .0.col)]
    InvalidPosition(Position),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Circular dependency detected at {0}")]
    CircularDependency(Position),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SheetError>;
