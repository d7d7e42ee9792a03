//! Line-oriented sheet commands read by the binary.
//!
//! ```text
//! # comment
//! A1 = 5
//! B1 = =A1*2
//! clear A1
//! ```

use anyhow::{Context, Result, anyhow, bail};
use tabula_core::{Position, Sheet};

#[derive(Debug, PartialEq)]
pub enum Command {
    Set(Position, String),
    Clear(Position),
}

fn parse_address(text: &str) -> Result<Position> {
    text.trim().parse::<Position>().map_err(|e| anyhow!(e))
}

/// Parse one input line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    if let Some(addr) = line.strip_prefix("clear ") {
        return Ok(Some(Command::Clear(parse_address(addr)?)));
    }
    let Some((addr, text)) = line.split_once('=') else {
        bail!("expected `<cell> = <text>` or `clear <cell>`");
    };
    Ok(Some(Command::Set(parse_address(addr)?, text.trim().to_string())))
}

/// Apply every command in `input` to `sheet`, stopping at the first failure.
pub fn apply_script(sheet: &mut Sheet, input: &str) -> Result<()> {
    for (index, line) in input.lines().enumerate() {
        let line_no = index + 1;
        let Some(command) = parse_line(line).with_context(|| format!("line {}", line_no))? else {
            continue;
        };
        let result = match command {
            Command::Set(pos, text) => sheet.set_cell(pos, &text),
            Command::Clear(pos) => sheet.clear_cell(pos),
        };
        result.with_context(|| format!("line {}", line_no))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_core::Value;

    #[test]
    fn test_parse_line_forms() {
        assert_eq!(parse_line("").unwrap(), None);
        assert_eq!(parse_line("  # note").unwrap(), None);
        assert_eq!(
            parse_line("B1 = =A1*2").unwrap(),
            Some(Command::Set(Position::new(0, 1), "=A1*2".into()))
        );
        assert_eq!(
            parse_line("a2=hello world").unwrap(),
            Some(Command::Set(Position::new(1, 0), "hello world".into()))
        );
        assert_eq!(
            parse_line("clear C3").unwrap(),
            Some(Command::Clear(Position::new(2, 2)))
        );
    }

    #[test]
    fn test_parse_line_errors() {
        assert!(parse_line("just text").is_err());
        assert!(parse_line("1A = 3").is_err());
        let err = parse_line("clear nowhere").unwrap_err();
        assert_eq!(err.to_string(), "Invalid cell address: nowhere");
    }

    #[test]
    fn test_apply_script() {
        let mut sheet = Sheet::new();
        apply_script(&mut sheet, "A1 = 5\nB1 = =A1*2\n\n# bump\nA1 = 7\n").unwrap();
        assert_eq!(sheet.value(Position::new(0, 1)).unwrap(), Value::Number(14.0));
    }

    #[test]
    fn test_apply_script_reports_line() {
        let mut sheet = Sheet::new();
        let err = apply_script(&mut sheet, "A1 = =B1\nB1 = =A1\n").unwrap_err();
        assert!(format!("{:#}", err).starts_with("line 2: Circular dependency"));
    }
}
