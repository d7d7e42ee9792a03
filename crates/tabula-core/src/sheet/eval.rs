use std::collections::HashSet;

use tabula_engine::engine::{Position, Value};

use super::Sheet;
use crate::cell::Cell;
use crate::error::Result;

impl Sheet {
    /// Computed value of the cell at `pos`; empty text outside the grid.
    pub fn value(&self, pos: Position) -> Result<Value> {
        Ok(self
            .cell(pos)?
            .map(|cell| cell.value(self))
            .unwrap_or_else(Value::empty))
    }

    /// Editable text of the cell at `pos`; empty outside the grid.
    pub fn text(&self, pos: Position) -> Result<String> {
        Ok(self.cell(pos)?.map(Cell::text).unwrap_or_default())
    }

    /// Read-only view handed to formulas during evaluation.
    ///
    /// Unset cells read as empty text, which formulas treat as 0. Invalid
    /// positions never get here: formulas turn them into `#REF!` first.
    pub(crate) fn lookup(&self, pos: Position) -> Value {
        match self.cells.get(&pos) {
            Some(cell) => cell.value(self),
            None => Value::empty(),
        }
    }

    /// Compute and cache every uncached formula reachable from `roots`,
    /// dependencies before the cells that read them.
    ///
    /// Walks with an explicit stack: by the time a cell is evaluated all of
    /// its inputs are cached, so chain length never turns into call depth.
    pub(crate) fn warm_references(&self, roots: &[Position]) {
        let mut seen = HashSet::new();
        let mut stack: Vec<(Position, bool)> = roots.iter().rev().map(|&pos| (pos, false)).collect();

        while let Some((pos, inputs_ready)) = stack.pop() {
            let Some(cell) = self.cells.get(&pos) else {
                continue;
            };
            if inputs_ready {
                cell.value(self);
                continue;
            }
            if !cell.is_formula() || cell.has_cached_value() || !seen.insert(pos) {
                continue;
            }
            stack.push((pos, true));
            stack.extend(cell.referenced_cells().iter().rev().map(|&dep| (dep, false)));
        }
    }
}
