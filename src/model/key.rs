//! Composite grouping keys

use std::fmt;

use super::column::Column;
use super::table::Table;
use super::value::Value;
use crate::error::Result;

/// Values of the grouping columns for one row, compared in column order
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct GroupKey(Vec<Value>);

impl GroupKey {
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[Value] {
        &self.0
    }

    /// Check if any component is null
    pub fn has_null(&self) -> bool {
        self.0.iter().any(Value::is_null)
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<_> = self.0.iter().map(|v| v.display()).collect();
        write!(f, "({})", parts.join(", "))
    }
}

/// Builder for computing composite keys from a table's columns
pub struct KeyBuilder<'a> {
    columns: Vec<&'a Column>,
}

impl<'a> KeyBuilder<'a> {
    /// Resolve the key columns by name
    pub fn with_column_names<S: AsRef<str>>(table: &'a Table, names: &[S]) -> Result<Self> {
        let columns = names
            .iter()
            .map(|name| table.column(name.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { columns })
    }

    /// Build the key of one row
    pub fn build_key(&self, row: usize) -> GroupKey {
        GroupKey(
            self.columns
                .iter()
                .map(|c| c.get(row).unwrap_or_default())
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_key() {
        let table = Table::new(vec![
            Column::strings("name", ["Max", "Anna"]),
            Column::ints("age", vec![Some(23), None]),
        ])
        .unwrap();

        let builder = KeyBuilder::with_column_names(&table, &["age", "name"]).unwrap();
        let key = builder.build_key(1);
        assert_eq!(key.values(), &[Value::Null, Value::from("Anna")]);
        assert!(key.has_null());
        assert_eq!(key.to_string(), "(NA, Anna)");
    }

    #[test]
    fn test_missing_key_column() {
        let table = Table::new(vec![Column::ints("a", [1])]).unwrap();
        assert!(KeyBuilder::with_column_names(&table, &["b"]).is_err());
    }

    #[test]
    fn test_keys_order_nulls_last() {
        let mut keys = vec![
            GroupKey::new(vec![Value::Null]),
            GroupKey::new(vec![Value::Int(2)]),
            GroupKey::new(vec![Value::Int(1)]),
        ];
        keys.sort();
        assert_eq!(keys[0], GroupKey::new(vec![Value::Int(1)]));
        assert_eq!(keys[2], GroupKey::new(vec![Value::Null]));
    }
}
