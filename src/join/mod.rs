//! Relational joins between tables
//!
//! Both sides are grouped by the join columns and their groups are merged
//! in key order. Every matched pair of groups contributes the cartesian
//! product of its rows.

mod merge;

use log::info;

use crate::error::{FrameError, Result};
use crate::group::partition;
use crate::model::{Column, ColumnKind, Table, Value};
use crate::verbs::Frame;

pub use merge::merge_groups;

/// Which unmatched rows a join keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    /// Every left row
    Left,
    /// Every right row
    Right,
    /// Only rows with a match on both sides
    Inner,
    /// Every row of both sides
    Outer,
}

impl JoinType {
    fn keeps(self, has_left: bool, has_right: bool) -> bool {
        match self {
            JoinType::Left => has_left,
            JoinType::Right => has_right,
            JoinType::Inner => has_left && has_right,
            JoinType::Outer => true,
        }
    }
}

/// Join configuration
#[derive(Debug, Clone, PartialEq)]
pub struct JoinOptions {
    /// Join columns; `None` joins on every shared column name and an empty
    /// list produces the cartesian product
    pub by: Option<Vec<String>>,
    /// Join on differently named columns as `(left, right)` pairs
    pub by_pairs: Vec<(String, String)>,
    /// Appended to non-key columns present on both sides
    pub suffixes: (String, String),
}

impl Default for JoinOptions {
    fn default() -> Self {
        Self {
            by: None,
            by_pairs: Vec::new(),
            suffixes: (".x".to_string(), ".y".to_string()),
        }
    }
}

impl JoinOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_by<I, S>(mut self, by: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.by = Some(by.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_by_pairs<I, L, R>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (L, R)>,
        L: Into<String>,
        R: Into<String>,
    {
        self.by_pairs = pairs
            .into_iter()
            .map(|(l, r)| (l.into(), r.into()))
            .collect();
        self
    }

    pub fn with_suffixes(mut self, left: impl Into<String>, right: impl Into<String>) -> Self {
        self.suffixes = (left.into(), right.into());
        self
    }
}

/// Join columns used when none are given: names shared by both tables
fn default_by(left: &Table, right: &Table) -> Vec<String> {
    let by: Vec<String> = left
        .names()
        .into_iter()
        .filter(|n| right.contains(n))
        .collect();
    info!("joining by shared columns {:?}", by);
    by
}

/// Rename the `right` side of every pair to its `left` name
fn align_pairs(right: &Table, pairs: &[(String, String)]) -> Result<Table> {
    let renames: Vec<(&str, &str)> = pairs
        .iter()
        .filter(|(l, r)| l != r)
        .map(|(l, r)| (r.as_str(), l.as_str()))
        .collect();
    right.rename(&renames)
}

/// Append `suffix` to the named columns
fn add_suffix(table: &Table, names: &[String], suffix: &str) -> Result<Table> {
    let renames: Vec<(String, String)> = names
        .iter()
        .map(|n| (n.clone(), format!("{n}{suffix}")))
        .collect();
    table.rename(&renames)
}

/// Widen numeric key columns of different kinds to a common kind
fn harmonize_keys(left: &mut Table, right: &mut Table, by: &[String]) -> Result<()> {
    for name in by {
        let (lk, rk) = (left.column(name)?.kind(), right.column(name)?.kind());
        if lk == rk {
            continue;
        }
        let kind = lk.widen(rk);
        if kind.is_numeric() {
            *left = left.with_column(left.column(name)?.cast(kind)?)?;
            *right = right.with_column(right.column(name)?.cast(kind)?)?;
        }
    }
    Ok(())
}

/// Cartesian product of two row blocks; the left index varies fastest
fn cartesian(left: &Table, left_rows: usize, right: &Table, right_rows: usize) -> Result<Table> {
    let left_index: Vec<usize> = (0..right_rows).flat_map(|_| 0..left_rows).collect();
    let right_index: Vec<usize> = (0..right_rows)
        .flat_map(|r| std::iter::repeat(r).take(left_rows))
        .collect();
    left.take_rows(&left_index)
        .bind_cols(&right.take_rows(&right_index))
}

/// Columns of `table` not named in `names`
fn without(table: &Table, names: &[String]) -> Table {
    Table::from_columns(
        table
            .columns()
            .iter()
            .filter(|c| !names.iter().any(|n| n == c.name()))
            .cloned()
            .collect(),
    )
}

/// One-row table of nulls with the columns of `template`
fn null_row(template: &Table) -> Table {
    Table::from_columns(
        template
            .columns()
            .iter()
            .map(|c| Column::nulls(c.name(), c.kind(), 1))
            .collect(),
    )
}

/// Join two tables
pub fn join(left: &Table, right: &Table, how: JoinType, options: &JoinOptions) -> Result<Table> {
    let right = align_pairs(right, &options.by_pairs)?;
    let by: Vec<String> = if !options.by_pairs.is_empty() {
        options.by_pairs.iter().map(|(l, _)| l.clone()).collect()
    } else {
        match &options.by {
            Some(by) => by.clone(),
            None => default_by(left, &right),
        }
    };
    for name in &by {
        if !left.contains(name) || !right.contains(name) {
            return Err(FrameError::ColumnNotFound(name.clone()));
        }
    }

    let shared: Vec<String> = left
        .names()
        .into_iter()
        .filter(|n| right.contains(n) && !by.contains(n))
        .collect();
    let mut left = add_suffix(left, &shared, &options.suffixes.0)?;
    let mut right = add_suffix(&right, &shared, &options.suffixes.1)?;
    harmonize_keys(&mut left, &mut right, &by)?;

    let rest: Vec<String> = left.names().into_iter().filter(|n| !by.contains(n)).collect();
    let key_first: Vec<String> = by.iter().chain(rest.iter()).cloned().collect();
    let left = if key_first.is_empty() { left } else { left.select(&key_first)? };

    let left_groups = partition(&left, &by)?.sorted_by_key();
    let right_groups = partition(&right, &by)?.sorted_by_key();

    let left_null = null_row(left_groups.template());
    let right_slim = without(right_groups.template(), &by);
    let right_null = null_row(&right_slim);

    let mut parts = vec![left_groups.template().bind_cols(&right_slim)?];
    for (l, r) in merge_groups(left_groups.groups(), right_groups.groups()) {
        if !how.keeps(l.is_some(), r.is_some()) {
            continue;
        }
        let (left_block, left_rows) = match (l, r) {
            (Some(g), _) => (g.table().clone(), g.table().nrow()),
            (None, Some(g)) => (fill_keys(&left_null, &by, g.key().values())?, 1),
            (None, None) => continue,
        };
        let (right_block, right_rows) = match r {
            Some(g) => (without(g.table(), &by), g.table().nrow()),
            None => (right_null.clone(), 1),
        };
        parts.push(cartesian(&left_block, left_rows, &right_block, right_rows)?);
    }

    Table::bind_rows(&parts)
}

/// Null row whose key columns carry the key of an unmatched right group
fn fill_keys(null_row: &Table, by: &[String], key: &[Value]) -> Result<Table> {
    let columns = by
        .iter()
        .zip(key)
        .map(|(name, value)| {
            let kind = null_row.column(name)?.kind();
            Column::from_values(name.as_str(), kind, vec![value.clone()]).or_else(|_| {
                Column::from_values(name.as_str(), ColumnKind::Any, vec![value.clone()])
            })
        })
        .collect::<Result<Vec<_>>>()?;
    null_row.add_columns(columns)
}

impl Table {
    /// Join with `right` using explicit options
    pub fn join(&self, right: &Table, how: JoinType, options: &JoinOptions) -> Result<Table> {
        join(self, right, how, options)
    }

    fn join_by<S: AsRef<str>>(&self, right: &Table, by: &[S], how: JoinType) -> Result<Table> {
        let options = JoinOptions::new().with_by(by.iter().map(|s| s.as_ref().to_string()));
        join(self, right, how, &options)
    }

    /// Join on every column name shared by both tables
    pub fn natural_join(&self, right: &Table, how: JoinType) -> Result<Table> {
        join(self, right, how, &JoinOptions::new())
    }

    /// Keep every row of `self`; an empty `by` gives the cartesian product
    pub fn left_join<S: AsRef<str>>(&self, right: &Table, by: &[S]) -> Result<Table> {
        self.join_by(right, by, JoinType::Left)
    }

    pub fn right_join<S: AsRef<str>>(&self, right: &Table, by: &[S]) -> Result<Table> {
        self.join_by(right, by, JoinType::Right)
    }

    pub fn inner_join<S: AsRef<str>>(&self, right: &Table, by: &[S]) -> Result<Table> {
        self.join_by(right, by, JoinType::Inner)
    }

    pub fn outer_join<S: AsRef<str>>(&self, right: &Table, by: &[S]) -> Result<Table> {
        self.join_by(right, by, JoinType::Outer)
    }

    /// Rows of `self` with a match in `right`, without adding columns.
    ///
    /// With an empty `by` every row matches a non-empty `right`.
    pub fn semi_join<S: AsRef<str>>(&self, right: &Table, by: &[S]) -> Result<Table> {
        if by.is_empty() {
            return if right.nrow() > 0 { Ok(self.clone()) } else { self.head(0) };
        }
        let by: Vec<String> = by.iter().map(|s| s.as_ref().to_string()).collect();
        let keys = right.distinct(&by)?.select(&by)?;
        join(self, &keys, JoinType::Inner, &JoinOptions::new().with_by(by))?.select(&self.names())
    }

    /// Every combination of rows of both tables
    pub fn cross_join(&self, right: &Table) -> Result<Table> {
        join(self, right, JoinType::Inner, &JoinOptions::new().with_by(Vec::<String>::new()))
    }
}
