use std::collections::HashSet;

use log::debug;
use tabula_engine::engine::{Position, Size, detect_cycle};

use super::Sheet;
use super::state::{ColumnMajor, check_position};
use crate::cell::Cell;
use crate::error::{Result, SheetError};

impl Sheet {
    /// Set cell contents from input text.
    ///
    /// Fails without touching the sheet if the position is invalid, the
    /// formula does not parse, or the new references would close a cycle.
    pub fn set_cell(&mut self, pos: Position, text: &str) -> Result<()> {
        check_position(pos)?;

        let cell = Cell::from_input(text).inspect_err(|e| {
            debug!("rejected edit at {}: {}", pos, e);
        })?;

        if let Some(path) = detect_cycle(pos, cell.referenced_cells(), |p| self.live_references(p)) {
            let route: Vec<String> = path.iter().map(Position::to_string).collect();
            debug!("rejected edit at {}: cycle {}", pos, route.join(" -> "));
            return Err(SheetError::CircularDependency(pos));
        }

        // Nothing below can fail: the edit commits as a whole.
        self.grow_to(pos);
        self.remove_edges(pos);
        for &dep in cell.referenced_cells() {
            self.dependents.entry(dep).or_default().insert(pos);
        }

        if cell.is_empty() {
            self.cells.remove(&pos);
            self.untrack_non_empty(pos);
        } else {
            self.cells.insert(pos, cell);
            self.non_empty_by_row.insert(pos);
            self.non_empty_by_col.insert(ColumnMajor(pos));
        }

        let invalidated = self.invalidate_from(pos);
        debug!("set {} ({} cached values invalidated)", pos, invalidated);
        Ok(())
    }

    /// Clear the specified cell.
    ///
    /// A no-op for cells that are already empty or outside the grid.
    /// Formulas still reading the cell keep their edges and see it as empty.
    pub fn clear_cell(&mut self, pos: Position) -> Result<()> {
        check_position(pos)?;
        if !self.extent.contains(pos) || !self.cells.contains_key(&pos) {
            return Ok(());
        }

        self.remove_edges(pos);
        self.cells.remove(&pos);
        self.untrack_non_empty(pos);

        let invalidated = self.invalidate_from(pos);
        debug!("cleared {} ({} cached values invalidated)", pos, invalidated);
        Ok(())
    }

    /// References of a cell as currently stored in the grid.
    fn live_references(&self, pos: Position) -> &[Position] {
        self.cells
            .get(&pos)
            .map(Cell::referenced_cells)
            .unwrap_or(&[])
    }

    fn grow_to(&mut self, pos: Position) {
        self.extent = Size::new(
            self.extent.rows.max(pos.row + 1),
            self.extent.cols.max(pos.col + 1),
        );
    }

    /// Drop `pos`'s outgoing edges from the reverse dependency index.
    fn remove_edges(&mut self, pos: Position) {
        let Some(old) = self.cells.get(&pos) else {
            return;
        };
        for dep in old.referenced_cells() {
            if let Some(set) = self.dependents.get_mut(dep) {
                set.remove(&pos);
                if set.is_empty() {
                    self.dependents.remove(dep);
                }
            }
        }
    }

    fn untrack_non_empty(&mut self, pos: Position) {
        self.non_empty_by_row.remove(&pos);
        self.non_empty_by_col.remove(&ColumnMajor(pos));
    }

    /// Invalidate the cached value at `changed` and at every cell that depends
    /// on it, transitively. Returns how many cached values were dropped.
    fn invalidate_from(&mut self, changed: Position) -> usize {
        let mut to_process = vec![changed];
        let mut visited = HashSet::new();
        let mut invalidated = 0;

        while let Some(pos) = to_process.pop() {
            if !visited.insert(pos) {
                continue;
            }
            if let Some(cell) = self.cells.get_mut(&pos)
                && cell.has_cached_value()
            {
                cell.invalidate_cache();
                invalidated += 1;
            }
            if let Some(deps) = self.dependents.get(&pos) {
                to_process.extend(deps.iter().copied().filter(|d| !visited.contains(d)));
            }
        }

        invalidated
    }
}
