//! Boxed text rendering of tables

use std::fmt;
use std::io::Write;

use anyhow::Result;

use crate::model::Table;

use super::TableFormatter;

/// Rows shown by `Display` before the rest is summarized
const DEFAULT_MAX_ROWS: usize = 10;

/// Box-drawn text table
pub struct TextOutput {
    max_rows: Option<usize>,
}

impl TextOutput {
    pub fn new() -> Self {
        Self {
            max_rows: Some(DEFAULT_MAX_ROWS),
        }
    }

    /// Print every row
    pub fn unbounded() -> Self {
        Self { max_rows: None }
    }

    pub fn with_max_rows(max_rows: usize) -> Self {
        Self {
            max_rows: Some(max_rows),
        }
    }

    pub fn format(&self, table: &Table) -> String {
        let shown = self
            .max_rows
            .map_or(table.nrow(), |max| max.min(table.nrow()));

        let mut out = format!("A Table: {} x {}\n", table.nrow(), table.ncol());
        if table.ncol() == 0 {
            return out;
        }

        let mut data: Vec<Vec<String>> = Vec::with_capacity(shown + 2);
        data.push(table.names());
        data.push(
            table
                .columns()
                .iter()
                .map(|c| format!("<{}>", c.kind()))
                .collect(),
        );
        for row in 0..shown {
            data.push(
                table
                    .columns()
                    .iter()
                    .map(|c| c.get(row).unwrap_or_default().display().into_owned())
                    .collect(),
            );
        }
        out.push_str(&build_table(&data));

        let hidden = table.nrow() - shown;
        if hidden > 0 {
            out.push_str(&format!("and {hidden} more rows\n"));
        }
        out
    }
}

impl Default for TextOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl TableFormatter for TextOutput {
    fn render(&self, table: &Table, writer: &mut dyn Write) -> Result<()> {
        write!(writer, "{}", self.format(table))?;
        Ok(())
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&TextOutput::new().format(self))
    }
}

fn border(widths: &[usize], left: char, mid: char, right: char) -> String {
    let inner: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    format!("{left}{}{right}\n", inner.join(&mid.to_string()))
}

fn line(cells: &[String], widths: &[usize]) -> String {
    let mut out = String::from("│");
    for (cell, width) in cells.iter().zip(widths) {
        let pad = width.saturating_sub(cell.chars().count());
        out.push_str(&format!(" {cell}{} │", " ".repeat(pad)));
    }
    out.push('\n');
    out
}

/// Column-aligned box table; the first two rows form the header
fn build_table(data: &[Vec<String>]) -> String {
    let Some(header) = data.first() else {
        return String::new();
    };
    let mut widths = vec![0; header.len()];
    for row in data {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut output = border(&widths, '┌', '┬', '┐');
    for (i, row) in data.iter().enumerate() {
        output.push_str(&line(row, &widths));
        if i == 1 {
            output.push_str(&border(&widths, '├', '┼', '┤'));
        }
    }
    output.push_str(&border(&widths, '└', '┴', '┘'));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Value;

    #[test]
    fn test_display_shows_shape_kinds_and_nulls() {
        let t = crate::table_of!("name", "age"; "Ann", 31, "Bob", Value::Null).unwrap();
        let text = t.to_string();
        assert!(text.starts_with("A Table: 2 x 2\n"));
        assert!(text.contains("<String>"));
        assert!(text.contains("│ Bob      │ NA    │"));
    }

    #[test]
    fn test_truncates_long_tables() {
        let t = Table::new(vec![crate::model::Column::ints("i", 0..25)]).unwrap();
        let text = TextOutput::with_max_rows(5).format(&t);
        assert!(text.contains("and 20 more rows"));
        assert!(!TextOutput::unbounded().format(&t).contains("more rows"));
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(Table::empty().to_string(), "A Table: 0 x 0\n");
    }
}
