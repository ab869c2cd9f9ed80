//! Column selection expressions
//!
//! A selector marks every column with `Some(true)`, `Some(false)` or `None`.
//! Positive terms mark every column, negative terms (`except`, `!term`) only
//! mark the columns they exclude. Terms are combined with `&`.

use std::ops::{BitAnd, Not};

use regex::Regex;

use crate::error::{FrameError, Result};
use crate::model::ColumnKind;

/// A column selection expression
#[derive(Debug, Clone)]
pub enum Selector {
    StartsWith(String),
    EndsWith(String),
    Matches(Regex),
    OneOf(Vec<String>),
    /// Inclusive range between two column names, in table order
    Range(String, String),
    OfKind(ColumnKind),
    Everything,
    Except(Vec<String>),
    Not(Box<Selector>),
    And(Box<Selector>, Box<Selector>),
}

pub fn starts_with(prefix: impl Into<String>) -> Selector {
    Selector::StartsWith(prefix.into())
}

pub fn ends_with(suffix: impl Into<String>) -> Selector {
    Selector::EndsWith(suffix.into())
}

/// Columns whose whole name matches `pattern`
pub fn matches(pattern: &str) -> Result<Selector> {
    Regex::new(&format!("^(?:{pattern})$"))
        .map(Selector::Matches)
        .map_err(|e| FrameError::InvalidArgument(format!("invalid column pattern '{pattern}': {e}")))
}

pub fn one_of<I, S>(names: I) -> Selector
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Selector::OneOf(names.into_iter().map(Into::into).collect())
}

pub fn range(from: impl Into<String>, to: impl Into<String>) -> Selector {
    Selector::Range(from.into(), to.into())
}

pub fn of_kind(kind: ColumnKind) -> Selector {
    Selector::OfKind(kind)
}

pub fn everything() -> Selector {
    Selector::Everything
}

pub fn except<I, S>(names: I) -> Selector
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Selector::Except(names.into_iter().map(Into::into).collect())
}

impl Not for Selector {
    type Output = Selector;

    fn not(self) -> Selector {
        Selector::Not(Box::new(self))
    }
}

impl BitAnd for Selector {
    type Output = Selector;

    fn bitand(self, rhs: Selector) -> Selector {
        Selector::And(Box::new(self), Box::new(rhs))
    }
}

/// Per-column marks and whether they came from a positive expression
struct Marks {
    marks: Vec<Option<bool>>,
    positive: bool,
}

fn render(marks: &[Option<bool>], names: &[&str]) -> String {
    marks
        .iter()
        .zip(names)
        .map(|(m, n)| match m {
            Some(true) => format!("+{n}"),
            Some(false) => format!("-{n}"),
            None => "<null>".to_string(),
        })
        .collect::<Vec<_>>()
        .join(",")
}

fn positive<F>(schema: &[(String, ColumnKind)], f: F) -> Marks
where
    F: Fn(&str, ColumnKind) -> bool,
{
    Marks {
        marks: schema.iter().map(|(n, k)| Some(f(n.as_str(), *k))).collect(),
        positive: true,
    }
}

/// Null-aware AND: a missing mark defers to the other side
fn and(a: Option<bool>, b: Option<bool>) -> Option<bool> {
    match (a, b) {
        (None, None) => None,
        (Some(v), None) | (None, Some(v)) => Some(v),
        (Some(x), Some(y)) => Some(x && y),
    }
}

impl Selector {
    fn marks(&self, schema: &[(String, ColumnKind)]) -> Result<Marks> {
        Ok(match self {
            Selector::StartsWith(prefix) => positive(schema, |n, _| n.starts_with(prefix.as_str())),
            Selector::EndsWith(suffix) => positive(schema, |n, _| n.ends_with(suffix.as_str())),
            Selector::Matches(re) => positive(schema, |n, _| re.is_match(n)),
            Selector::OneOf(names) => positive(schema, |n, _| names.iter().any(|x| x == n)),
            Selector::OfKind(kind) => positive(schema, |_, k| k == *kind),
            Selector::Everything => positive(schema, |_, _| true),
            Selector::Range(from, to) => {
                let position = |name: &str| {
                    schema
                        .iter()
                        .position(|(n, _)| n == name)
                        .ok_or_else(|| FrameError::ColumnNotFound(name.to_string()))
                };
                let (a, b) = (position(from)?, position(to)?);
                let (lo, hi) = (a.min(b), a.max(b));
                Marks {
                    marks: (0..schema.len()).map(|i| Some(lo <= i && i <= hi)).collect(),
                    positive: true,
                }
            }
            Selector::Except(names) => Marks {
                marks: schema
                    .iter()
                    .map(|(n, _)| names.iter().any(|x| x == n).then_some(false))
                    .collect(),
                positive: false,
            },
            Selector::Not(inner) => {
                let inner = inner.marks(schema)?;
                let marks = if inner.positive {
                    inner
                        .marks
                        .iter()
                        .map(|m| if *m == Some(true) { Some(false) } else { None })
                        .collect()
                } else {
                    inner.marks.iter().map(|m| Some(*m == Some(false))).collect()
                };
                Marks {
                    marks,
                    positive: !inner.positive,
                }
            }
            Selector::And(lhs, rhs) => {
                let (l, r) = (lhs.marks(schema)?, rhs.marks(schema)?);
                let marks: Vec<Option<bool>> =
                    l.marks.iter().zip(&r.marks).map(|(a, b)| and(*a, *b)).collect();
                if l.positive != r.positive {
                    let names: Vec<&str> = schema.iter().map(|(n, _)| n.as_str()).collect();
                    return Err(FrameError::InvalidColumnSelect(render(&marks, &names)));
                }
                Marks {
                    marks,
                    positive: l.positive,
                }
            }
        })
    }

    /// Resolve against an ordered `(name, kind)` schema.
    ///
    /// Any `true` mark makes the selection positive and only marked columns
    /// are kept; otherwise every column not marked `false` is kept.
    pub fn resolve(&self, schema: &[(String, ColumnKind)]) -> Result<Vec<String>> {
        let Marks { marks, .. } = self.marks(schema)?;
        let has_positive = marks.iter().any(|m| *m == Some(true));
        Ok(schema
            .iter()
            .zip(&marks)
            .filter(|(_, m)| {
                if has_positive {
                    **m == Some(true)
                } else {
                    **m != Some(false)
                }
            })
            .map(|((n, _), _)| n.clone())
            .collect())
    }
}
