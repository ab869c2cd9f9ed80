//! Table and row data structures

use indexmap::{IndexMap, IndexSet};
use rustc_hash::{FxBuildHasher, FxHashSet};

use super::column::Column;
use super::kind::ColumnKind;
use super::value::Value;
use crate::error::{FrameError, Result};

/// One row as a name to value mapping, in column order
pub type Row = IndexMap<String, Value>;

/// An immutable, ordered collection of equally long, uniquely named columns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Create a table, validating unique names and equal column lengths
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        for column in &columns {
            if !seen.insert(column.name()) {
                return Err(FrameError::DuplicateColumnName(column.name().to_string()));
            }
        }
        if let Some(first) = columns.first() {
            if let Some(bad) = columns.iter().find(|c| c.len() != first.len()) {
                return Err(FrameError::DimensionMismatch {
                    expected: first.len(),
                    actual: bad.len(),
                });
            }
        }
        Ok(Self { columns })
    }

    /// Table without columns or rows
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap columns already known to satisfy the table invariants
    pub(crate) fn from_columns(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// Number of rows; zero for a table without columns
    pub fn nrow(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn ncol(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nrow() == 0
    }

    /// Column names in order
    pub fn names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name().to_string()).collect()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.get(name)
            .ok_or_else(|| FrameError::ColumnNotFound(name.to_string()))
    }

    pub fn get(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Column names paired with their kinds
    pub fn schema(&self) -> Vec<(String, ColumnKind)> {
        self.columns
            .iter()
            .map(|c| (c.name().to_string(), c.kind()))
            .collect()
    }

    /// Cell values of one row
    pub fn row_values(&self, row: usize) -> Option<Vec<Value>> {
        if row >= self.nrow() {
            return None;
        }
        Some(
            self.columns
                .iter()
                .map(|c| c.get(row).unwrap_or_default())
                .collect(),
        )
    }

    /// One row keyed by column name
    pub fn row(&self, row: usize) -> Option<Row> {
        let values = self.row_values(row)?;
        Some(self.names().into_iter().zip(values).collect())
    }

    /// Iterate rows keyed by column name
    pub fn rows(&self) -> impl Iterator<Item = Row> + '_ {
        (0..self.nrow()).filter_map(move |i| self.row(i))
    }

    /// Gather rows by index, in the given order
    pub fn take_rows(&self, rows: &[usize]) -> Table {
        Self::from_columns(self.columns.iter().map(|c| c.take(rows)).collect())
    }

    /// Add a column, replacing one of the same name in place
    pub fn with_column(&self, column: Column) -> Result<Table> {
        if self.ncol() > 0 && column.len() != self.nrow() {
            return Err(FrameError::DimensionMismatch {
                expected: self.nrow(),
                actual: column.len(),
            });
        }
        let mut columns = self.columns.clone();
        match self.column_index(column.name()) {
            Some(i) => columns[i] = column,
            None => columns.push(column),
        }
        Ok(Self::from_columns(columns))
    }

    /// Add several columns in order
    pub fn add_columns(&self, columns: Vec<Column>) -> Result<Table> {
        columns
            .into_iter()
            .try_fold(self.clone(), |table, column| table.with_column(column))
    }

    /// Stack tables vertically, matching columns by name.
    ///
    /// Columns missing from a part are filled with nulls and differing
    /// kinds are widened. Column order follows first appearance.
    pub fn bind_rows(tables: &[Table]) -> Result<Table> {
        let names: IndexSet<&str, FxBuildHasher> = tables
            .iter()
            .flat_map(|t| t.columns.iter().map(Column::name))
            .collect();

        let columns = names
            .iter()
            .map(|&name| {
                let parts: Vec<Column> = tables
                    .iter()
                    .map(|t| {
                        t.get(name)
                            .cloned()
                            .unwrap_or_else(|| Column::nulls(name, ColumnKind::Any, t.nrow()))
                    })
                    .collect();
                let refs: Vec<&Column> = parts.iter().collect();
                Column::concat(name, &refs)
            })
            .collect::<Result<Vec<_>>>()?;

        Table::new(columns)
    }

    /// Place the columns of `other` to the right of this table's columns
    pub fn bind_cols(&self, other: &Table) -> Result<Table> {
        if self.ncol() == 0 {
            return Ok(other.clone());
        }
        if other.ncol() == 0 {
            return Ok(self.clone());
        }
        if self.nrow() != other.nrow() {
            return Err(FrameError::DimensionMismatch {
                expected: self.nrow(),
                actual: other.nrow(),
            });
        }
        let columns = self
            .columns
            .iter()
            .chain(other.columns.iter())
            .cloned()
            .collect();
        Table::new(columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> Table {
        Table::new(vec![
            Column::strings("name", ["Max", "Anna", "Tom"]),
            Column::ints("age", vec![Some(23), None, Some(41)]),
        ])
        .unwrap()
    }

    #[test]
    fn test_new_rejects_duplicates() {
        let result = Table::new(vec![Column::ints("a", [1]), Column::ints("a", [2])]);
        assert_eq!(result, Err(FrameError::DuplicateColumnName("a".to_string())));
    }

    #[test]
    fn test_new_rejects_uneven_columns() {
        let result = Table::new(vec![Column::ints("a", [1]), Column::ints("b", [1, 2])]);
        assert!(matches!(
            result,
            Err(FrameError::DimensionMismatch { expected: 1, actual: 2 })
        ));
    }

    #[test]
    fn test_rows_and_schema() {
        let table = people();
        assert_eq!(table.nrow(), 3);
        assert_eq!(table.names(), vec!["name", "age"]);
        assert_eq!(table.schema()[1], ("age".to_string(), ColumnKind::Int));

        let row = table.row(1).unwrap();
        assert_eq!(row["name"], Value::from("Anna"));
        assert!(row["age"].is_null());
        assert_eq!(table.rows().count(), 3);
        assert!(table.row(3).is_none());
    }

    #[test]
    fn test_with_column_replaces_in_place() {
        let table = people()
            .with_column(Column::strings("name", ["a", "b", "c"]))
            .unwrap();
        assert_eq!(table.names(), vec!["name", "age"]);
        assert_eq!(table.column("name").unwrap().get(0), Some(Value::from("a")));
        assert!(people().with_column(Column::ints("x", [1])).is_err());
    }

    #[test]
    fn test_bind_rows_fills_missing_columns() {
        let extra = Table::new(vec![
            Column::strings("name", ["Lisa"]),
            Column::doubles("weight", [55.5]),
        ])
        .unwrap();

        let bound = Table::bind_rows(&[people(), extra]).unwrap();
        assert_eq!(bound.names(), vec!["name", "age", "weight"]);
        assert_eq!(bound.nrow(), 4);
        assert_eq!(bound.column("age").unwrap().kind(), ColumnKind::Int);
        assert_eq!(bound.column("age").unwrap().get(3), Some(Value::Null));
        assert_eq!(bound.column("weight").unwrap().kind(), ColumnKind::Double);
        assert_eq!(bound.column("weight").unwrap().get(0), Some(Value::Null));
    }

    #[test]
    fn test_bind_cols() {
        let right = Table::new(vec![Column::bools("member", [true, false, true])]).unwrap();
        let wide = people().bind_cols(&right).unwrap();
        assert_eq!(wide.names(), vec!["name", "age", "member"]);
        assert!(people().bind_cols(&people()).is_err());
        assert_eq!(Table::empty().bind_cols(&right).unwrap(), right);
    }
}
