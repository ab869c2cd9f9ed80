//! Reshaping between long and wide layouts

mod text;

use indexmap::IndexSet;
use rustc_hash::{FxBuildHasher, FxHashSet};

use crate::error::{FrameError, Result};
use crate::group::partition;
use crate::model::{Column, ColumnKind, Table, Value};
use crate::select::Selector;
use crate::verbs::Frame;

pub use text::convert_type;

impl Table {
    /// Turn the distinct values of `key` into columns holding the matching
    /// `value` cells.
    ///
    /// Rows are identified by every other column. New columns are ordered by
    /// key value and take the most specific kind their cells allow; with
    /// `convert` set, text columns are parsed into numbers or booleans.
    pub fn spread(&self, key: &str, value: &str, convert: bool) -> Result<Table> {
        let key_column = self.column(key)?;
        self.column(value)?;

        let mut distinct: Vec<Value> = key_column
            .iter()
            .collect::<IndexSet<Value, FxBuildHasher>>()
            .into_iter()
            .collect();
        distinct.sort();
        let new_names: Vec<String> = distinct.iter().map(|v| v.display().into_owned()).collect();

        let mut seen: FxHashSet<&str> = FxHashSet::default();
        for name in &new_names {
            // a null key renders as "NA" and may clash with a literal "NA"
            if !seen.insert(name.as_str()) || (name != key && name != value && self.contains(name)) {
                return Err(FrameError::DuplicateColumnName(name.clone()));
            }
        }

        let id_columns: Vec<String> = self
            .names()
            .into_iter()
            .filter(|n| n != key && n != value)
            .collect();
        let key_frame = Table::new(vec![Column::infer(key, distinct)])?;

        let grouped = partition(self, &id_columns)?;
        let mut id_parts: Vec<Table> = vec![without(grouped.template(), &[key, value])];
        let mut spread_values: Vec<Vec<Value>> = vec![Vec::new(); new_names.len()];

        for group in grouped.groups() {
            let pairs = group.table().select(&[key, value])?;
            if pairs.distinct(&[key])?.nrow() != pairs.nrow() {
                return Err(FrameError::KeyNotUnique(key.to_string()));
            }
            let block = key_frame.left_join(&pairs, &[key])?;
            for (cells, cell) in spread_values.iter_mut().zip(block.column(value)?.iter()) {
                cells.push(cell);
            }
            id_parts.push(without(group.table(), &[key, value]).take_rows(&[0]));
        }

        let ids = Table::bind_rows(&id_parts)?;
        let mut spread: Vec<Column> = new_names
            .iter()
            .zip(spread_values)
            .map(|(name, cells)| Column::infer(name.as_str(), cells))
            .collect();
        if convert {
            spread = spread.iter().map(convert_type).collect::<Result<_>>()?;
        }
        ids.bind_cols(&Table::new(spread)?)
    }

    /// Stack the `columns` into a `key` column holding their names and a
    /// `value` column holding their cells; other columns are repeated.
    ///
    /// Values of incompatible kinds are rendered as text.
    pub fn gather<S: AsRef<str>>(
        &self,
        key: &str,
        value: &str,
        columns: &[S],
        convert: bool,
    ) -> Result<Table> {
        if columns.is_empty() {
            return Err(FrameError::InvalidArgument(
                "gather() needs at least one column".to_string(),
            ));
        }
        let gathered: Vec<&Column> = columns
            .iter()
            .map(|c| self.column(c.as_ref()))
            .collect::<Result<_>>()?;
        let gathered_names: Vec<&str> = gathered.iter().map(|c| c.name()).collect();
        let rest = without(self, &gathered_names);

        let widened = gathered
            .iter()
            .map(|c| c.kind())
            .reduce(ColumnKind::widen)
            .unwrap_or(ColumnKind::Any);
        let all_any = gathered.iter().any(|c| c.kind() == ColumnKind::Any);
        let value_column = if widened == ColumnKind::Any && !all_any {
            let text: Vec<Column> = gathered.iter().map(|c| c.to_strings()).collect();
            Column::concat(value, &text.iter().collect::<Vec<_>>())?
        } else {
            Column::concat(value, &gathered)?
        };

        let nrow = self.nrow();
        let key_column = Column::strings(
            key,
            gathered
                .iter()
                .flat_map(|c| std::iter::repeat(c.name().to_string()).take(nrow)),
        );
        let key_column = if convert {
            convert_type(&key_column)?
        } else {
            key_column
        };

        let repeated: Vec<usize> = (0..gathered.len() * nrow).map(|i| i % nrow.max(1)).collect();
        let rest = if rest.ncol() == 0 {
            rest
        } else {
            rest.take_rows(&repeated)
        };
        rest.bind_cols(&Table::new(vec![key_column, value_column])?)
    }

    /// `gather` over the columns chosen by a selector
    pub fn gather_with(&self, key: &str, value: &str, selector: &Selector, convert: bool) -> Result<Table> {
        let columns = selector.resolve(&self.schema())?;
        self.gather(key, value, &columns, convert)
    }
}

fn without(table: &Table, names: &[&str]) -> Table {
    Table::from_columns(
        table
            .columns()
            .iter()
            .filter(|c| !names.contains(&c.name()))
            .cloned()
            .collect(),
    )
}
