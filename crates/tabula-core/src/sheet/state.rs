use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap, HashSet};

use tabula_engine::engine::{Position, Size};

use crate::cell::Cell;
use crate::error::{Result, SheetError};

/// A position ordered column-major, so the last entry of a set of these is
/// the right-most non-empty cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ColumnMajor(pub Position);

impl Ord for ColumnMajor {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.0.col, self.0.row).cmp(&(other.0.col, other.0.row))
    }
}

impl PartialOrd for ColumnMajor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// An in-memory spreadsheet.
///
/// Owns every cell, the reverse dependency index and the printable-size
/// bookkeeping. All mutation goes through [`Sheet::set_cell`] and
/// [`Sheet::clear_cell`], which keep the three in sync.
#[derive(Debug)]
pub struct Sheet {
    /// Sparse cell storage; a missing entry inside `extent` is an empty cell.
    pub(crate) cells: HashMap<Position, Cell>,
    /// Area the grid has been grown to. Never shrinks.
    pub(crate) extent: Size,
    /// Reverse dependency map: cell -> cells whose formulas read it
    pub(crate) dependents: HashMap<Position, HashSet<Position>>,
    /// Non-empty cells, row-major
    pub(crate) non_empty_by_row: BTreeSet<Position>,
    /// Non-empty cells, column-major
    pub(crate) non_empty_by_col: BTreeSet<ColumnMajor>,
    /// Shared stand-in for empty slots inside the extent.
    pub(crate) empty: Cell,
}

impl Sheet {
    pub fn new() -> Self {
        Sheet {
            cells: HashMap::new(),
            extent: Size::default(),
            dependents: HashMap::new(),
            non_empty_by_row: BTreeSet::new(),
            non_empty_by_col: BTreeSet::new(),
            empty: Cell::new_empty(),
        }
    }

    /// The cell at `pos`.
    ///
    /// Returns `Ok(None)` for positions the grid has never been grown to.
    /// Inside the grid, unset positions yield an empty cell.
    pub fn cell(&self, pos: Position) -> Result<Option<&Cell>> {
        check_position(pos)?;
        if !self.extent.contains(pos) {
            return Ok(None);
        }
        Ok(Some(self.cells.get(&pos).unwrap_or(&self.empty)))
    }

    /// Smallest rectangle anchored at A1 that holds every non-empty cell.
    pub fn printable_size(&self) -> Size {
        match (self.non_empty_by_row.last(), self.non_empty_by_col.last()) {
            (Some(bottom), Some(right)) => Size::new(bottom.row + 1, right.0.col + 1),
            _ => Size::default(),
        }
    }

    /// Cells whose formulas currently read `pos`, sorted.
    pub fn dependents(&self, pos: Position) -> Vec<Position> {
        let mut deps: Vec<Position> = self
            .dependents
            .get(&pos)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();
        deps.sort();
        deps
    }

    /// Whether any formula reads `pos`.
    pub fn is_referenced(&self, pos: Position) -> bool {
        self.dependents.get(&pos).is_some_and(|set| !set.is_empty())
    }
}

impl Default for Sheet {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn check_position(pos: Position) -> Result<()> {
    if pos.is_valid() {
        Ok(())
    } else {
        Err(SheetError::InvalidPosition(pos))
    }
}
