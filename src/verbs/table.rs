//! Verbs on ungrouped tables

use std::cmp::Ordering;

use log::warn;
use rand::seq::index;
use rand::Rng;
use rustc_hash::FxHashSet;

use super::{Formula, Frame, SortKey};
use crate::error::{FrameError, Result};
use crate::group::GroupedTable;
use crate::model::{Column, ColumnKind, GroupKey, KeyBuilder, Table, Value};

/// Order two cells, keeping nulls last in both directions
fn compare_nulls_last(a: &Value, b: &Value, descending: bool) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) if descending => b.cmp(a),
        (false, false) => a.cmp(b),
    }
}

/// Row indices for a sample of `n` out of `nrow` rows
pub(crate) fn sample_rows<R: Rng + ?Sized>(
    nrow: usize,
    n: usize,
    replace: bool,
    rng: &mut R,
) -> Result<Vec<usize>> {
    if replace {
        if nrow == 0 && n > 0 {
            return Err(FrameError::InvalidArgument(
                "cannot sample rows from an empty table".to_string(),
            ));
        }
        return Ok((0..n).map(|_| rng.gen_range(0..nrow)).collect());
    }
    if n > nrow {
        return Err(FrameError::InvalidArgument(format!(
            "cannot take a sample of {n} rows without replacement from {nrow} rows"
        )));
    }
    Ok(index::sample(rng, nrow, n).into_vec())
}

/// Number of rows drawn by `sample_frac`
pub(crate) fn fraction_to_count(nrow: usize, fraction: f64, replace: bool) -> Result<usize> {
    if !fraction.is_finite() || fraction < 0.0 {
        return Err(FrameError::InvalidArgument(format!(
            "sample fraction must be finite and non-negative, got {fraction}"
        )));
    }
    if !replace && fraction > 1.0 {
        return Err(FrameError::InvalidArgument(format!(
            "sample fraction {fraction} exceeds 1 without replacement"
        )));
    }
    let count = (nrow as f64 * fraction).round();
    if count >= isize::MAX as f64 {
        return Err(FrameError::InvalidArgument(format!(
            "sample fraction {fraction} draws too many rows from {nrow} rows"
        )));
    }
    Ok(count as usize)
}

impl Frame for Table {
    fn nrow(&self) -> usize {
        Table::nrow(self)
    }

    fn names(&self) -> Vec<String> {
        Table::names(self)
    }

    fn schema(&self) -> Vec<(String, ColumnKind)> {
        Table::schema(self)
    }

    fn grouping(&self) -> Vec<String> {
        Vec::new()
    }

    fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Table> {
        if names.is_empty() {
            warn!("select() called without columns; returning an empty table");
            return Ok(Table::empty());
        }
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let columns = names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                if !seen.insert(name) {
                    return Err(FrameError::DuplicateColumnName(name.to_string()));
                }
                self.column(name).cloned()
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Table::from_columns(columns))
    }

    fn filter<F>(&self, predicate: F) -> Result<Table>
    where
        F: Fn(&Table) -> Result<Vec<bool>>,
    {
        let mask = predicate(self)?;
        if mask.len() != self.nrow() {
            return Err(FrameError::DimensionMismatch {
                expected: self.nrow(),
                actual: mask.len(),
            });
        }
        let columns = self
            .columns()
            .iter()
            .map(|c| c.filter(&mask))
            .collect::<Result<Vec<_>>>()?;
        Ok(Table::from_columns(columns))
    }

    fn mutate(&self, formula: &Formula) -> Result<Table> {
        let column = formula
            .evaluate(self)?
            .into_column(formula.name(), self.nrow(), self.ncol() == 0)?;
        self.with_column(column)
    }

    fn sort_by<I, K>(&self, keys: I) -> Result<Table>
    where
        I: IntoIterator<Item = K>,
        K: Into<SortKey>,
    {
        let keys: Vec<SortKey> = keys.into_iter().map(Into::into).collect();
        if keys.is_empty() {
            warn!("sort_by() called without sort keys; table is returned unchanged");
            return Ok(self.clone());
        }

        let sort_columns = keys
            .iter()
            .map(|k| Ok((self.column(&k.column)?.to_values(), k.descending)))
            .collect::<Result<Vec<_>>>()?;

        let mut order: Vec<usize> = (0..self.nrow()).collect();
        order.sort_by(|&a, &b| {
            sort_columns
                .iter()
                .map(|(values, descending)| compare_nulls_last(&values[a], &values[b], *descending))
                .find(|o| o.is_ne())
                .unwrap_or(Ordering::Equal)
        });
        Ok(self.take_rows(&order))
    }

    fn summarize(&self, rules: &[Formula]) -> Result<Table> {
        let columns = rules
            .iter()
            .map(|rule| {
                let value = rule.evaluate(self)?.into_scalar(rule.name())?;
                let kind = value.kind().unwrap_or(ColumnKind::Any);
                Column::from_values(rule.name(), kind, vec![value])
            })
            .collect::<Result<Vec<_>>>()?;
        Table::new(columns)
    }

    fn group_by<S: AsRef<str>>(&self, by: &[S]) -> Result<GroupedTable> {
        GroupedTable::from_table(self, by)
    }

    fn ungroup(&self) -> Table {
        self.clone()
    }

    fn rename<S: AsRef<str>>(&self, pairs: &[(S, S)]) -> Result<Table> {
        let mut columns = self.columns().to_vec();
        for (old, new) in pairs {
            let i = self
                .column_index(old.as_ref())
                .ok_or_else(|| FrameError::ColumnNotFound(old.as_ref().to_string()))?;
            columns[i] = columns[i].renamed(new.as_ref());
        }
        Table::new(columns)
    }

    fn distinct<S: AsRef<str>>(&self, columns: &[S]) -> Result<Table> {
        let names: Vec<String> = if columns.is_empty() {
            self.names()
        } else {
            columns.iter().map(|c| c.as_ref().to_string()).collect()
        };
        let keys = KeyBuilder::with_column_names(self, &names)?;
        let mut seen: FxHashSet<GroupKey> = FxHashSet::default();
        let rows: Vec<usize> = (0..self.nrow())
            .filter(|&i| seen.insert(keys.build_key(i)))
            .collect();
        Ok(self.take_rows(&rows))
    }

    fn sample_n<R: Rng + ?Sized>(&self, n: usize, replace: bool, rng: &mut R) -> Result<Table> {
        let rows = sample_rows(self.nrow(), n, replace, rng)?;
        Ok(self.take_rows(&rows))
    }

    fn sample_frac<R: Rng + ?Sized>(&self, fraction: f64, replace: bool, rng: &mut R) -> Result<Table> {
        let n = fraction_to_count(self.nrow(), fraction, replace)?;
        self.sample_n(n, replace, rng)
    }
}
