//! tabula_engine - Spreadsheet engine: positions, values and arithmetic formulas.

pub mod engine;
