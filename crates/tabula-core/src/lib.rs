//! tabula-core - UI-agnostic sheet model.

pub mod cell;
pub mod error;
pub mod sheet;

pub use cell::{Cell, CellContent};
pub use error::{Result, SheetError};
pub use sheet::Sheet;

pub use tabula_engine::engine::{FormulaError, Position, Size, Value};
