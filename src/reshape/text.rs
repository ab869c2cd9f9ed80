//! Text based column reshaping: unite, separate and type conversion

use crate::error::{FrameError, Result};
use crate::model::{Column, ColumnKind, Table};

/// Parse a text column into `Int`, `Double` or `Boolean` when every
/// non-null cell allows it; other columns are returned unchanged.
pub fn convert_type(column: &Column) -> Result<Column> {
    let Some(cells) = column.as_strs() else {
        return Ok(column.clone());
    };
    let present: Vec<&str> = cells.iter().flatten().map(|s| s.trim()).collect();
    if present.is_empty() {
        return Ok(column.clone());
    }

    if present.iter().all(|s| s.parse::<i32>().is_ok()) {
        let parsed = cells.iter().map(|c| c.as_deref().and_then(|s| s.trim().parse::<i32>().ok()));
        return Ok(Column::ints(column.name(), parsed));
    }
    if present.iter().all(|s| s.parse::<f64>().is_ok()) {
        let parsed = cells.iter().map(|c| c.as_deref().and_then(|s| s.trim().parse::<f64>().ok()));
        return Ok(Column::doubles(column.name(), parsed));
    }
    if present.iter().all(|s| parse_bool(s).is_some()) {
        let parsed = cells.iter().map(|c| c.as_deref().and_then(parse_bool));
        return Ok(Column::bools(column.name(), parsed));
    }
    Ok(column.clone())
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

impl Table {
    /// Paste the `columns` together into a new text column appended at the
    /// end; nulls render as `NA`.
    pub fn unite<S: AsRef<str>>(&self, name: &str, columns: &[S], sep: &str, remove: bool) -> Result<Table> {
        if columns.is_empty() {
            return Err(FrameError::InvalidArgument(
                "unite() needs at least one column".to_string(),
            ));
        }
        let parts: Vec<&Column> = columns
            .iter()
            .map(|c| self.column(c.as_ref()))
            .collect::<Result<_>>()?;

        let united = Column::strings(
            name,
            (0..self.nrow()).map(|row| {
                parts
                    .iter()
                    .map(|c| c.get(row).unwrap_or_default().display().into_owned())
                    .collect::<Vec<_>>()
                    .join(sep)
            }),
        );

        let base = if remove {
            let drop: Vec<&str> = parts.iter().map(|c| c.name()).collect();
            Table::from_columns(
                self.columns()
                    .iter()
                    .filter(|c| !drop.contains(&c.name()))
                    .cloned()
                    .collect(),
            )
        } else {
            self.clone()
        };
        if base.contains(name) {
            return Err(FrameError::DuplicateColumnName(name.to_string()));
        }
        base.with_column(united)
    }

    /// Split a text column at `sep` into the `into` columns, appended at the
    /// end. Every non-null cell must split into exactly `into.len()` parts;
    /// `NA` parts become null.
    pub fn separate<S: AsRef<str>>(
        &self,
        column: &str,
        into: &[S],
        sep: &str,
        remove: bool,
        convert: bool,
    ) -> Result<Table> {
        let source = self.column(column)?;
        let cells = source.as_strs().ok_or_else(|| {
            FrameError::UnsupportedOperation(format!(
                "separate() needs a {} column but '{}' is {}",
                ColumnKind::Str,
                column,
                source.kind()
            ))
        })?;
        if sep.is_empty() {
            return Err(FrameError::InvalidArgument("separator must not be empty".to_string()));
        }

        let split: Vec<Option<Vec<&str>>> = cells
            .iter()
            .map(|c| c.as_deref().map(|s| s.split(sep).collect()))
            .collect();
        for parts in split.iter().flatten() {
            if parts.len() != into.len() {
                return Err(FrameError::InvalidArgument(format!(
                    "'{}' splits into {} parts but {} columns were given",
                    parts.join(sep),
                    parts.len(),
                    into.len()
                )));
            }
        }

        let mut new_columns = Vec::with_capacity(into.len());
        for (i, name) in into.iter().enumerate() {
            let values = split.iter().map(|parts| {
                parts
                    .as_ref()
                    .map(|p| p[i])
                    .filter(|s| *s != "NA")
                    .map(str::to_string)
            });
            let col = Column::strings(name.as_ref(), values);
            new_columns.push(if convert { convert_type(&col)? } else { col });
        }

        let base = if remove {
            Table::from_columns(
                self.columns()
                    .iter()
                    .filter(|c| c.name() != column)
                    .cloned()
                    .collect(),
            )
        } else {
            self.clone()
        };
        let mut columns = base.columns().to_vec();
        columns.extend(new_columns);
        Table::new(columns)
    }
}
