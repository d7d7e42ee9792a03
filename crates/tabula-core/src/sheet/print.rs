//! Tab-separated dumps of the printable area.

use std::io::Write;

use tabula_engine::engine::Position;

use super::Sheet;
use crate::cell::Cell;
use crate::error::Result;

impl Sheet {
    /// Write every cell's computed value, one row per line.
    pub fn print_values<W: Write>(&self, out: &mut W) -> Result<()> {
        self.print_with(out, |cell| cell.value(self).to_string())
    }

    /// Write every cell's editable text, one row per line.
    pub fn print_texts<W: Write>(&self, out: &mut W) -> Result<()> {
        self.print_with(out, Cell::text)
    }

    fn print_with<W, F>(&self, out: &mut W, render: F) -> Result<()>
    where
        W: Write,
        F: Fn(&Cell) -> String,
    {
        let size = self.printable_size();
        for row in 0..size.rows {
            for col in 0..size.cols {
                if col > 0 {
                    out.write_all(b"\t")?;
                }
                if let Some(cell) = self.cells.get(&Position::new(row, col)) {
                    out.write_all(render(cell).as_bytes())?;
                }
            }
            out.write_all(b"\n")?;
        }
        Ok(())
    }
}
