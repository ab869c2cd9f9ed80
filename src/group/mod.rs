//! Grouping of table rows by key columns

use std::fmt;

use indexmap::IndexMap;
use log::{error, warn};
use rand::Rng;
use rustc_hash::FxBuildHasher;

use crate::error::{FrameError, Result};
use crate::model::{ColumnKind, GroupKey, KeyBuilder, Table};
use crate::verbs::{Formula, Frame, SortKey};

/// The rows of one distinct key
#[derive(Debug, Clone, PartialEq)]
pub struct DataGroup {
    key: GroupKey,
    table: Table,
}

impl DataGroup {
    pub fn key(&self) -> &GroupKey {
        &self.key
    }

    pub fn table(&self) -> &Table {
        &self.table
    }
}

/// A table partitioned into groups of equal key values.
///
/// Groups are kept in order of first key occurrence.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedTable {
    by: Vec<String>,
    groups: Vec<DataGroup>,
    template: Table,
}

/// Partition `table` by `by` without any diagnostics
pub(crate) fn partition<S: AsRef<str>>(table: &Table, by: &[S]) -> Result<GroupedTable> {
    let by: Vec<String> = by.iter().map(|s| s.as_ref().to_string()).collect();
    for (i, name) in by.iter().enumerate() {
        if by[..i].contains(name) {
            return Err(FrameError::DuplicateColumnName(name.clone()));
        }
    }

    let keys = KeyBuilder::with_column_names(table, &by)?;
    let mut index: IndexMap<GroupKey, Vec<usize>, FxBuildHasher> = IndexMap::default();
    for row in 0..table.nrow() {
        index.entry(keys.build_key(row)).or_default().push(row);
    }

    let groups = index
        .into_iter()
        .map(|(key, rows)| DataGroup {
            key,
            table: table.take_rows(&rows),
        })
        .collect();

    Ok(GroupedTable {
        by,
        groups,
        template: table.take_rows(&[]),
    })
}

impl GroupedTable {
    /// Group `table` by the named columns.
    ///
    /// An empty `by` yields a single group holding every row.
    pub fn from_table<S: AsRef<str>>(table: &Table, by: &[S]) -> Result<Self> {
        if by.is_empty() {
            warn!("group_by() called without columns; all rows form a single group");
        }
        partition(table, by)
    }

    pub fn by(&self) -> &[String] {
        &self.by
    }

    pub fn groups(&self) -> &[DataGroup] {
        &self.groups
    }

    pub fn ngroups(&self) -> usize {
        self.groups.len()
    }

    /// Zero-row table with the columns of every group
    pub fn template(&self) -> &Table {
        &self.template
    }

    /// One row per group holding its key values
    pub fn grouped_by(&self) -> Result<Table> {
        let parts = self
            .groups
            .iter()
            .map(|g| Ok(g.table.select(&self.by)?.take_rows(&[0])))
            .collect::<Result<Vec<_>>>()?;
        if parts.is_empty() {
            return self.template.select(&self.by);
        }
        Table::bind_rows(&parts)
    }

    /// Groups ordered by key, nulls last
    pub(crate) fn sorted_by_key(mut self) -> Self {
        self.groups.sort_by(|a, b| a.key.cmp(&b.key));
        self
    }

    /// Apply `f` to every group, recombine and group again by the same
    /// columns. Without groups `f` is applied to the template instead.
    fn map_groups<F>(&self, f: F) -> Result<GroupedTable>
    where
        F: Fn(&Table) -> Result<Table>,
    {
        if self.groups.is_empty() {
            return partition(&f(&self.template)?, &self.by);
        }
        let parts = self
            .groups
            .iter()
            .map(|g| f(&g.table))
            .collect::<Result<Vec<_>>>()?;
        partition(&Table::bind_rows(&parts)?, &self.by)
    }

    /// Apply a row-preserving transformation to every group, keeping keys
    fn map_tables<F>(&self, f: F) -> Result<GroupedTable>
    where
        F: Fn(&Table) -> Result<Table>,
    {
        let groups = self
            .groups
            .iter()
            .map(|g| {
                Ok(DataGroup {
                    key: g.key.clone(),
                    table: f(&g.table)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(GroupedTable {
            by: self.by.clone(),
            groups,
            template: f(&self.template)?,
        })
    }
}

impl Frame for GroupedTable {
    fn nrow(&self) -> usize {
        self.groups.iter().map(|g| g.table.nrow()).sum()
    }

    fn names(&self) -> Vec<String> {
        self.template.names()
    }

    fn schema(&self) -> Vec<(String, ColumnKind)> {
        self.template.schema()
    }

    fn grouping(&self) -> Vec<String> {
        self.by.clone()
    }

    /// Grouping columns are always kept, in front of the selection
    fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<GroupedTable> {
        let mut keep = self.by.clone();
        let missing: Vec<&str> = self
            .by
            .iter()
            .filter(|b| !names.iter().any(|n| n.as_ref() == b.as_str()))
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            warn!(
                "grouping columns {:?} can not be removed from a grouped table and are kept",
                missing
            );
        }
        keep.extend(
            names
                .iter()
                .map(|n| n.as_ref().to_string())
                .filter(|n| !self.by.contains(n)),
        );
        self.map_tables(|t| t.select(&keep))
    }

    fn filter<F>(&self, predicate: F) -> Result<GroupedTable>
    where
        F: Fn(&Table) -> Result<Vec<bool>>,
    {
        self.map_groups(|t| t.filter(&predicate))
    }

    fn mutate(&self, formula: &Formula) -> Result<GroupedTable> {
        self.map_groups(|t| t.mutate(formula))
    }

    fn sort_by<I, K>(&self, keys: I) -> Result<GroupedTable>
    where
        I: IntoIterator<Item = K>,
        K: Into<SortKey>,
    {
        let keys: Vec<SortKey> = keys.into_iter().map(Into::into).collect();
        self.map_tables(|t| t.sort_by(keys.iter().cloned()))
    }

    /// One row per group: the key columns followed by the summaries
    fn summarize(&self, rules: &[Formula]) -> Result<Table> {
        if self.groups.is_empty() {
            return self.template.select(&self.by);
        }
        let parts = self
            .groups
            .iter()
            .map(|g| {
                let key = g.table.select(&self.by)?.take_rows(&[0]);
                key.bind_cols(&g.table.summarize(rules)?)
            })
            .collect::<Result<Vec<_>>>()?;
        Table::bind_rows(&parts)
    }

    fn group_by<S: AsRef<str>>(&self, by: &[S]) -> Result<GroupedTable> {
        self.ungroup().group_by(by)
    }

    fn ungroup(&self) -> Table {
        if self.groups.is_empty() {
            return self.template.clone();
        }
        let parts: Vec<Table> = self.groups.iter().map(|g| g.table.clone()).collect();
        // groups share one schema up to kind widening, which never fails
        match Table::bind_rows(&parts) {
            Ok(table) => table,
            Err(e) => {
                debug_assert!(false, "groups could not be rebound: {e}");
                error!("groups could not be rebound: {e}");
                self.template.clone()
            }
        }
    }

    fn rename<S: AsRef<str>>(&self, pairs: &[(S, S)]) -> Result<GroupedTable> {
        let mut renamed = self.map_tables(|t| t.rename(pairs))?;
        for (old, new) in pairs {
            for b in renamed.by.iter_mut() {
                if b == old.as_ref() {
                    *b = new.as_ref().to_string();
                }
            }
        }
        Ok(renamed)
    }

    fn distinct<S: AsRef<str>>(&self, columns: &[S]) -> Result<GroupedTable> {
        self.map_groups(|t| t.distinct(columns))
    }

    fn sample_n<R: Rng + ?Sized>(&self, n: usize, replace: bool, rng: &mut R) -> Result<GroupedTable> {
        let parts = self
            .groups
            .iter()
            .map(|g| g.table.sample_n(n, replace, rng))
            .collect::<Result<Vec<_>>>()?;
        self.regroup(parts)
    }

    fn sample_frac<R: Rng + ?Sized>(
        &self,
        fraction: f64,
        replace: bool,
        rng: &mut R,
    ) -> Result<GroupedTable> {
        let parts = self
            .groups
            .iter()
            .map(|g| g.table.sample_frac(fraction, replace, rng))
            .collect::<Result<Vec<_>>>()?;
        self.regroup(parts)
    }
}

impl GroupedTable {
    fn regroup(&self, parts: Vec<Table>) -> Result<GroupedTable> {
        if parts.is_empty() {
            return partition(&self.template, &self.by);
        }
        partition(&Table::bind_rows(&parts)?, &self.by)
    }
}

impl fmt::Display for GroupedTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Grouped by: {} [{} groups]",
            self.by.join(", "),
            self.groups.len()
        )?;
        write!(f, "{}", self.ungroup())
    }
}
