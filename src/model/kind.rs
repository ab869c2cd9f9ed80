//! Column kinds and kind inference

use serde::{Deserialize, Serialize};

use super::value::Value;

/// Element type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ColumnKind {
    Int,
    Long,
    Double,
    Bool,
    Str,
    Any,
}

impl ColumnKind {
    /// Check if values of this kind take part in arithmetic
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnKind::Int | ColumnKind::Long | ColumnKind::Double)
    }

    /// Widen the kind to accommodate another kind
    pub fn widen(self, other: ColumnKind) -> ColumnKind {
        if self == other {
            return self;
        }

        match (self, other) {
            (ColumnKind::Int, ColumnKind::Long) | (ColumnKind::Long, ColumnKind::Int) => {
                ColumnKind::Long
            }
            (a, b) if a.is_numeric() && b.is_numeric() => ColumnKind::Double,
            _ => ColumnKind::Any,
        }
    }

    /// Kinds whose values are accepted unchanged by a column of this kind
    fn accepts(self, value: ColumnKind) -> bool {
        match self {
            ColumnKind::Long => matches!(value, ColumnKind::Int | ColumnKind::Long),
            ColumnKind::Double => value.is_numeric(),
            ColumnKind::Any => true,
            kind => kind == value,
        }
    }
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnKind::Int => write!(f, "Int"),
            ColumnKind::Long => write!(f, "Long"),
            ColumnKind::Double => write!(f, "Double"),
            ColumnKind::Bool => write!(f, "Boolean"),
            ColumnKind::Str => write!(f, "String"),
            ColumnKind::Any => write!(f, "Any"),
        }
    }
}

/// Kind of the non-null values in `values`, or `None` if all are null
pub fn common_kind(values: &[Value]) -> Option<ColumnKind> {
    let mut seen = values.iter().filter_map(Value::kind);
    let first = seen.next()?;
    Some(seen.fold(first, ColumnKind::widen))
}

/// Resolve the most specific kind able to hold every value.
///
/// Candidates are tried in the order Int, Long, String, Double, Boolean;
/// the first whose accepted kinds cover every non-null value wins. Empty and
/// all-null inputs resolve to `Any`.
pub fn resolve_kind(values: &[Value]) -> ColumnKind {
    let mut present: Vec<ColumnKind> = Vec::with_capacity(3);
    for kind in values.iter().filter_map(Value::kind) {
        if !present.contains(&kind) {
            present.push(kind);
        }
    }
    if present.is_empty() {
        return ColumnKind::Any;
    }

    [
        ColumnKind::Int,
        ColumnKind::Long,
        ColumnKind::Str,
        ColumnKind::Double,
        ColumnKind::Bool,
    ]
    .into_iter()
    .find(|candidate| present.iter().all(|&k| candidate.accepts(k)))
    .unwrap_or(ColumnKind::Any)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widen() {
        assert_eq!(ColumnKind::Int.widen(ColumnKind::Long), ColumnKind::Long);
        assert_eq!(ColumnKind::Int.widen(ColumnKind::Double), ColumnKind::Double);
        assert_eq!(ColumnKind::Long.widen(ColumnKind::Double), ColumnKind::Double);
        assert_eq!(ColumnKind::Str.widen(ColumnKind::Int), ColumnKind::Any);
        assert_eq!(ColumnKind::Bool.widen(ColumnKind::Bool), ColumnKind::Bool);
    }

    #[test]
    fn test_resolve_kind() {
        assert_eq!(resolve_kind(&[1.into(), Value::Null]), ColumnKind::Int);
        assert_eq!(resolve_kind(&[1.into(), 5i64.into()]), ColumnKind::Long);
        assert_eq!(resolve_kind(&["a".into(), Value::Null]), ColumnKind::Str);
        assert_eq!(resolve_kind(&[1.into(), 2.5.into()]), ColumnKind::Double);
        assert_eq!(resolve_kind(&[true.into()]), ColumnKind::Bool);
        assert_eq!(resolve_kind(&[1.into(), "a".into()]), ColumnKind::Any);
        assert_eq!(resolve_kind(&[]), ColumnKind::Any);
        assert_eq!(resolve_kind(&[Value::Null, Value::Null]), ColumnKind::Any);
    }

    #[test]
    fn test_common_kind() {
        assert_eq!(common_kind(&[Value::Null]), None);
        assert_eq!(
            common_kind(&[1.into(), Value::Null, 2.0.into()]),
            Some(ColumnKind::Double)
        );
    }
}
