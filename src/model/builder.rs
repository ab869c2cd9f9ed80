//! Construction of tables from row-major values and typed records

use super::column::Column;
use super::table::{Row, Table};
use super::value::Value;
use crate::error::{FrameError, Result};

/// Builds a table from a header and values listed row by row
#[derive(Debug, Clone)]
pub struct TableBuilder {
    header: Vec<String>,
}

impl TableBuilder {
    pub fn new<S: AsRef<str>>(header: &[S]) -> Self {
        Self {
            header: header.iter().map(|s| s.as_ref().to_string()).collect(),
        }
    }

    /// Split `values` into rows of `header.len()` cells and resolve the
    /// kind of every column from its values.
    pub fn build(&self, values: Vec<Value>) -> Result<Table> {
        let ncol = self.header.len();
        if ncol == 0 {
            if values.is_empty() {
                return Ok(Table::empty());
            }
            return Err(FrameError::InvalidArgument(
                "values given for a table without columns".to_string(),
            ));
        }
        if values.len() % ncol != 0 {
            return Err(FrameError::InvalidArgument(format!(
                "{} values do not fill rows of {} columns",
                values.len(),
                ncol
            )));
        }

        let mut per_column: Vec<Vec<Value>> = vec![Vec::with_capacity(values.len() / ncol); ncol];
        for (i, value) in values.into_iter().enumerate() {
            per_column[i % ncol].push(value);
        }

        let columns = self
            .header
            .iter()
            .zip(per_column)
            .map(|(name, values)| Column::infer(name.as_str(), values))
            .collect();
        Table::new(columns)
    }
}

/// Build a table from a header and row-major cell values.
///
/// ```
/// use colframe::table_of;
///
/// let table = table_of!("id", "val"; 1, "x", 2, "y", 3, None::<&str>).unwrap();
/// assert_eq!(table.nrow(), 3);
/// ```
#[macro_export]
macro_rules! table_of {
    ($($name:expr),+ $(,)?; $($value:expr),* $(,)?) => {
        $crate::model::TableBuilder::new(&[$($name),+])
            .build(vec![$($crate::model::Value::from($value)),*])
    };
}

impl Table {
    /// Build a table from named rows.
    ///
    /// Column names and order come from the first row; cells missing from
    /// later rows become null.
    pub fn from_rows(rows: &[Row]) -> Result<Table> {
        let Some(first) = rows.first() else {
            return Ok(Table::empty());
        };
        let columns = first
            .keys()
            .map(|name| {
                let values = rows
                    .iter()
                    .map(|row| row.get(name).cloned().unwrap_or_default())
                    .collect();
                Column::infer(name.as_str(), values)
            })
            .collect();
        Table::new(columns)
    }

    /// Convert typed records into a table via a caller supplied mapping
    pub fn from_records<T, F>(records: &[T], mapping: F) -> Result<Table>
    where
        F: Fn(&T) -> Row,
    {
        let rows: Vec<Row> = records.iter().map(mapping).collect();
        Table::from_rows(&rows)
    }

    /// Convert every row into a typed record
    pub fn to_records<T, F>(&self, mapping: F) -> Result<Vec<T>>
    where
        F: Fn(&Row) -> Result<T>,
    {
        self.rows().map(|row| mapping(&row)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ColumnKind;

    #[derive(Debug, PartialEq)]
    struct Person {
        name: String,
        age: i32,
    }

    fn person_row(p: &Person) -> Row {
        Row::from([
            ("name".to_string(), Value::from(p.name.as_str())),
            ("age".to_string(), Value::from(p.age)),
        ])
    }

    #[test]
    fn test_builder_resolves_kinds() {
        let table = crate::table_of!("id", "val"; 1, "x", 2, "y", 3, Value::Null).unwrap();
        assert_eq!(table.names(), vec!["id", "val"]);
        assert_eq!(table.column("id").unwrap().kind(), ColumnKind::Int);
        assert_eq!(table.column("val").unwrap().kind(), ColumnKind::Str);
        assert_eq!(table.column("val").unwrap().get(2), Some(Value::Null));
    }

    #[test]
    fn test_builder_rejects_ragged_values() {
        let result = TableBuilder::new(&["a", "b"]).build(vec![1.into(), 2.into(), 3.into()]);
        assert!(matches!(result, Err(FrameError::InvalidArgument(_))));
    }

    #[test]
    fn test_records_round_trip() {
        let people = vec![
            Person { name: "Max".into(), age: 23 },
            Person { name: "Anna".into(), age: 40 },
        ];
        let table = Table::from_records(&people, person_row).unwrap();
        assert_eq!(table.nrow(), 2);

        let back = table
            .to_records(|row| {
                Ok(Person {
                    name: row["name"].display().into_owned(),
                    age: row["age"].as_i32().unwrap_or_default(),
                })
            })
            .unwrap();
        assert_eq!(back, people);
    }
}
