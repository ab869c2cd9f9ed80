//! Table verbs shared by plain and grouped tables

mod table;

use rand::Rng;
use rustc_hash::FxHashSet;

use crate::error::{FrameError, Result};
use crate::group::GroupedTable;
use crate::model::{Column, ColumnKind, Table, Value};
use crate::select::Selector;

/// Result of evaluating a user expression against a table
#[derive(Debug, Clone)]
pub enum Computed {
    /// A single value, broadcast by `mutate`
    Scalar(Value),
    Column(Column),
    Values(Vec<Value>),
    /// Not a valid column or summary; always rejected
    Table(Table),
}

impl Computed {
    fn describe(&self) -> &'static str {
        match self {
            Computed::Scalar(_) => "scalar",
            Computed::Column(_) => "column",
            Computed::Values(_) => "list",
            Computed::Table(_) => "table",
        }
    }

    /// Turn the result into a column of `nrow` cells named `name`.
    ///
    /// A table without columns accepts a column of any length.
    pub(crate) fn into_column(self, name: &str, nrow: usize, any_length: bool) -> Result<Column> {
        let column = match self {
            Computed::Scalar(value) => {
                let kind = value.kind().unwrap_or(ColumnKind::Any);
                Column::from_values(name, kind, vec![value; nrow])?
            }
            Computed::Column(column) => column.renamed(name),
            Computed::Values(values) => Column::infer(name, values),
            Computed::Table(_) => {
                return Err(FrameError::UnsupportedOperation(format!(
                    "expression for '{name}' evaluated into a table, not a column"
                )))
            }
        };
        if !any_length && column.len() != nrow {
            return Err(FrameError::DimensionMismatch {
                expected: nrow,
                actual: column.len(),
            });
        }
        Ok(column)
    }

    /// Extract the value of a summary rule
    pub(crate) fn into_scalar(self, name: &str) -> Result<Value> {
        match self {
            Computed::Scalar(value) => Ok(value),
            other => Err(FrameError::NonScalarValue {
                name: name.to_string(),
                found: other.describe(),
            }),
        }
    }
}

macro_rules! computed_scalar {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Computed {
                fn from(v: $t) -> Self {
                    Computed::Scalar(v.into())
                }
            }
        )*
    };
}

computed_scalar!(
    Value,
    i32,
    i64,
    f64,
    bool,
    String,
    &str,
    Option<i32>,
    Option<i64>,
    Option<f64>,
    Option<bool>,
    Option<String>
);

impl From<usize> for Computed {
    fn from(n: usize) -> Self {
        match i32::try_from(n) {
            Ok(i) => Computed::Scalar(Value::Int(i)),
            Err(_) => Computed::Scalar(Value::Long(n as i64)),
        }
    }
}

impl From<Column> for Computed {
    fn from(c: Column) -> Self {
        Computed::Column(c)
    }
}

impl From<Vec<Value>> for Computed {
    fn from(v: Vec<Value>) -> Self {
        Computed::Values(v)
    }
}

impl From<Vec<bool>> for Computed {
    fn from(v: Vec<bool>) -> Self {
        Computed::Column(Column::bools("", v))
    }
}

impl From<Vec<i32>> for Computed {
    fn from(v: Vec<i32>) -> Self {
        Computed::Column(Column::ints("", v))
    }
}

impl From<Vec<f64>> for Computed {
    fn from(v: Vec<f64>) -> Self {
        Computed::Column(Column::doubles("", v))
    }
}

impl From<Vec<String>> for Computed {
    fn from(v: Vec<String>) -> Self {
        Computed::Column(Column::strings("", v))
    }
}

impl From<Table> for Computed {
    fn from(t: Table) -> Self {
        Computed::Table(t)
    }
}

type Expression = Box<dyn Fn(&Table) -> Result<Computed>>;

/// A named expression evaluated against a table or group
pub struct Formula {
    name: String,
    expr: Expression,
}

impl Formula {
    pub fn new<F, R>(name: impl Into<String>, expr: F) -> Self
    where
        F: Fn(&Table) -> Result<R> + 'static,
        R: Into<Computed>,
    {
        Self {
            name: name.into(),
            expr: Box::new(move |table: &Table| expr(table).map(Into::into)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn evaluate(&self, table: &Table) -> Result<Computed> {
        (self.expr)(table)
    }
}

impl std::fmt::Debug for Formula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Formula").field("name", &self.name).finish()
    }
}

/// Shorthand for [`Formula::new`]
pub fn formula<F, R>(name: impl Into<String>, expr: F) -> Formula
where
    F: Fn(&Table) -> Result<R> + 'static,
    R: Into<Computed>,
{
    Formula::new(name, expr)
}

/// A sort column and its direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub column: String,
    pub descending: bool,
}

/// Ascending sort on `column`
pub fn asc(column: impl Into<String>) -> SortKey {
    SortKey {
        column: column.into(),
        descending: false,
    }
}

/// Descending sort on `column`; nulls still sort last
pub fn desc(column: impl Into<String>) -> SortKey {
    SortKey {
        column: column.into(),
        descending: true,
    }
}

impl From<&str> for SortKey {
    fn from(column: &str) -> Self {
        asc(column)
    }
}

impl From<String> for SortKey {
    fn from(column: String) -> Self {
        asc(column)
    }
}

impl From<&String> for SortKey {
    fn from(column: &String) -> Self {
        asc(column.clone())
    }
}

/// Verbs available on tables and grouped tables.
///
/// On a grouped table every verb except `summarize`, `group_by` and
/// `ungroup` acts on each group independently and keeps the grouping.
pub trait Frame: Sized + Clone {
    fn nrow(&self) -> usize;

    fn names(&self) -> Vec<String>;

    /// Column names with their kinds, in order
    fn schema(&self) -> Vec<(String, ColumnKind)>;

    /// Columns the frame is grouped by; empty for a plain table
    fn grouping(&self) -> Vec<String>;

    /// Keep the named columns, in the given order
    fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Self>;

    /// Keep rows for which the predicate yields true
    fn filter<F>(&self, predicate: F) -> Result<Self>
    where
        F: Fn(&Table) -> Result<Vec<bool>>;

    /// Add or replace the column computed by `formula`
    fn mutate(&self, formula: &Formula) -> Result<Self>;

    /// Stable sort by the given keys, nulls last
    fn sort_by<I, K>(&self, keys: I) -> Result<Self>
    where
        I: IntoIterator<Item = K>,
        K: Into<SortKey>;

    /// Collapse into one row (per group) of scalar summaries
    fn summarize(&self, rules: &[Formula]) -> Result<Table>;

    fn group_by<S: AsRef<str>>(&self, by: &[S]) -> Result<GroupedTable>;

    fn ungroup(&self) -> Table;

    /// Rename columns, keeping their positions
    fn rename<S: AsRef<str>>(&self, pairs: &[(S, S)]) -> Result<Self>;

    /// Keep the first row of every distinct combination of `columns`;
    /// all columns when empty
    fn distinct<S: AsRef<str>>(&self, columns: &[S]) -> Result<Self>;

    /// Draw `n` rows
    fn sample_n<R: Rng + ?Sized>(&self, n: usize, replace: bool, rng: &mut R) -> Result<Self>;

    /// Draw `round(nrow * fraction)` rows
    fn sample_frac<R: Rng + ?Sized>(&self, fraction: f64, replace: bool, rng: &mut R) -> Result<Self>;

    /// Add or replace the column `name` computed by `expr`
    fn add_column<F, R>(&self, name: &str, expr: F) -> Result<Self>
    where
        F: Fn(&Table) -> Result<R> + 'static,
        R: Into<Computed>,
    {
        self.mutate(&Formula::new(name, expr))
    }

    /// Apply several formulas in order; later ones see earlier results
    fn mutate_all(&self, formulas: &[Formula]) -> Result<Self> {
        formulas.iter().try_fold(self.clone(), |frame, f| frame.mutate(f))
    }

    /// Like `mutate_all` but keep only grouping and computed columns
    fn transmute(&self, formulas: &[Formula]) -> Result<Self> {
        let mutated = self.mutate_all(formulas)?;
        let mut keep = self.grouping();
        for f in formulas {
            if !keep.iter().any(|k| k == f.name()) {
                keep.push(f.name().to_string());
            }
        }
        mutated.select(&keep)
    }

    /// Drop the named columns
    fn remove<S: AsRef<str>>(&self, names: &[S]) -> Result<Self> {
        let current = self.names();
        for name in names {
            if !current.iter().any(|c| c == name.as_ref()) {
                return Err(FrameError::ColumnNotFound(name.as_ref().to_string()));
            }
        }
        let keep: Vec<String> = current
            .into_iter()
            .filter(|c| !names.iter().any(|n| n.as_ref() == c))
            .collect();
        self.select(&keep)
    }

    /// Keep the columns chosen by a selector
    fn select_with(&self, selector: &Selector) -> Result<Self> {
        let names = selector.resolve(&self.schema())?;
        self.select(&names)
    }

    /// Drop the columns chosen by a selector
    fn remove_with(&self, selector: &Selector) -> Result<Self> {
        let names = selector.resolve(&self.schema())?;
        self.remove(&names)
    }

    /// Keep the rows at the given 0-based positions; positions past the end
    /// are ignored and row order is preserved
    fn slice(&self, rows: &[usize]) -> Result<Self> {
        let rows: FxHashSet<usize> = rows.iter().copied().collect();
        self.filter(move |t| Ok((0..t.nrow()).map(|i| rows.contains(&i)).collect()))
    }

    fn head(&self, n: usize) -> Result<Self> {
        self.filter(move |t| Ok((0..t.nrow()).map(|i| i < n).collect()))
    }

    fn tail(&self, n: usize) -> Result<Self> {
        self.filter(move |t| {
            let first = t.nrow().saturating_sub(n);
            Ok((0..t.nrow()).map(|i| i >= first).collect())
        })
    }

    /// Count rows per combination of grouping columns and `columns`
    fn count<S: AsRef<str>>(&self, columns: &[S], name: &str) -> Result<Table> {
        let mut by = self.grouping();
        for c in columns {
            if !by.iter().any(|b| b == c.as_ref()) {
                by.push(c.as_ref().to_string());
            }
        }
        let rule = [Formula::new(name, |t: &Table| Ok(t.nrow()))];
        let table = self.ungroup();
        if by.is_empty() {
            table.summarize(&rule)
        } else {
            table.group_by(&by)?.summarize(&rule)
        }
    }

    /// Add a 1-based row number column, numbered per group
    fn add_row_number(&self, name: &str) -> Result<Self> {
        let name = name.to_string();
        self.mutate(&Formula::new(name, |t: &Table| {
            Ok(Column::ints("", (1..=t.nrow()).map(|i| i as i32)))
        }))
    }
}
