//! Cell data structures for the sheet grid.
//!
//! - [`CellContent`] - What the user typed: nothing, literal text, or a formula
//! - [`Cell`] - Content plus a memoized value

use std::cell::OnceCell;

use tabula_engine::engine::{Formula, ParseError, Position, Value};

use crate::sheet::Sheet;

/// Marks the start of a formula.
pub const FORMULA_SIGN: char = '=';
/// Forces the rest of the text to be taken literally.
pub const ESCAPE_SIGN: char = '\'';

/// The content stored in a cell.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum CellContent {
    #[default]
    Empty,
    Text(String),
    Formula(Formula),
}

impl CellContent {
    /// Classify user input.
    /// - Empty string -> Empty
    /// - Starts with '=' and has more after it -> Formula (parsed without the '=')
    /// - Otherwise -> Text, kept verbatim (including a lone "=" or a leading "'")
    pub fn from_input(text: &str) -> Result<CellContent, ParseError> {
        if text.is_empty() {
            return Ok(CellContent::Empty);
        }
        match text.strip_prefix(FORMULA_SIGN) {
            Some(expression) if !expression.is_empty() => {
                Ok(CellContent::Formula(Formula::parse(expression)?))
            }
            _ => Ok(CellContent::Text(text.to_string())),
        }
    }
}

/// A cell in the sheet grid.
#[derive(Clone, Debug, Default)]
pub struct Cell {
    content: CellContent,
    /// Last computed value; unset until first read or after invalidation.
    cache: OnceCell<Value>,
}

impl Cell {
    pub fn new_empty() -> Cell {
        Cell::default()
    }

    /// Build a cell from user input. Fails only if a formula does not parse.
    pub fn from_input(text: &str) -> Result<Cell, ParseError> {
        Ok(Cell {
            content: CellContent::from_input(text)?,
            cache: OnceCell::new(),
        })
    }

    pub fn content(&self) -> &CellContent {
        &self.content
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.content, CellContent::Empty)
    }

    pub fn is_formula(&self) -> bool {
        matches!(self.content, CellContent::Formula(_))
    }

    /// The text a user would edit: literal text as typed, or `=` plus the
    /// canonical formula expression.
    pub fn text(&self) -> String {
        match &self.content {
            CellContent::Empty => String::new(),
            CellContent::Text(s) => s.clone(),
            CellContent::Formula(f) => format!("{}{}", FORMULA_SIGN, f.expression()),
        }
    }

    /// The computed value, reading other cells through `sheet`.
    ///
    /// Memoized until the sheet invalidates this cell. Uncomputed formulas
    /// upstream are filled in first, deepest first, so the evaluation itself
    /// only ever reads cached values.
    pub fn value(&self, sheet: &Sheet) -> Value {
        self.cache
            .get_or_init(|| match &self.content {
                CellContent::Empty => Value::empty(),
                CellContent::Text(s) => {
                    Value::Text(s.strip_prefix(ESCAPE_SIGN).unwrap_or(s).to_string())
                }
                CellContent::Formula(f) => {
                    sheet.warm_references(f.referenced_cells());
                    log::trace!("evaluating ={}", f.expression());
                    f.evaluate(|pos| sheet.lookup(pos))
                }
            })
            .clone()
    }

    /// Cells this cell's formula reads. Empty for non-formula cells.
    pub fn referenced_cells(&self) -> &[Position] {
        match &self.content {
            CellContent::Formula(f) => f.referenced_cells(),
            CellContent::Empty | CellContent::Text(_) => &[],
        }
    }

    pub fn has_cached_value(&self) -> bool {
        self.cache.get().is_some()
    }

    pub(crate) fn invalidate_cache(&mut self) {
        self.cache.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_input_classification() {
        assert_eq!(CellContent::from_input("").unwrap(), CellContent::Empty);
        assert_eq!(
            CellContent::from_input("hello").unwrap(),
            CellContent::Text("hello".into())
        );
        assert_eq!(CellContent::from_input("=").unwrap(), CellContent::Text("=".into()));
        assert_eq!(
            CellContent::from_input("'=1+2").unwrap(),
            CellContent::Text("'=1+2".into())
        );
        assert!(matches!(
            CellContent::from_input("=1+2").unwrap(),
            CellContent::Formula(_)
        ));
    }

    #[test]
    fn test_from_input_parse_error() {
        assert!(Cell::from_input("=1+").is_err());
        assert!(Cell::from_input("=(").is_err());
    }

    #[test]
    fn test_text_value_strips_one_escape() {
        let sheet = Sheet::new();
        let cell = Cell::from_input("'=1+2").unwrap();
        assert_eq!(cell.text(), "'=1+2");
        assert_eq!(cell.value(&sheet), Value::Text("=1+2".into()));

        let cell = Cell::from_input("''x").unwrap();
        assert_eq!(cell.value(&sheet), Value::Text("'x".into()));
    }

    #[test]
    fn test_formula_text_is_canonical() {
        let cell = Cell::from_input("=((1)) + (2*a1)").unwrap();
        assert_eq!(cell.text(), "=1+2*A1");
        assert_eq!(cell.referenced_cells(), &[Position::new(0, 0)]);
    }

    #[test]
    fn test_value_is_memoized_until_invalidated() {
        let sheet = Sheet::new();
        let mut cell = Cell::from_input("=6*7").unwrap();
        assert!(!cell.has_cached_value());
        assert_eq!(cell.value(&sheet), Value::Number(42.0));
        assert!(cell.has_cached_value());
        assert_eq!(cell.value(&sheet), Value::Number(42.0));

        cell.invalidate_cache();
        assert!(!cell.has_cached_value());
        cell.invalidate_cache();
        assert!(!cell.has_cached_value());
    }

    #[test]
    fn test_empty_cell() {
        let sheet = Sheet::new();
        let cell = Cell::new_empty();
        assert!(cell.is_empty());
        assert_eq!(cell.text(), "");
        assert_eq!(cell.value(&sheet), Value::empty());
        assert!(cell.referenced_cells().is_empty());
    }
}
