//! Named, typed, immutable columns

use std::sync::Arc;

use super::kind::{resolve_kind, ColumnKind};
use super::value::{Nullable, Object, Value};
use crate::error::{FrameError, Result};

/// Typed cell storage; cloning shares the underlying buffer
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Double(Arc<[Option<f64>]>),
    Int(Arc<[Option<i32>]>),
    Long(Arc<[Option<i64>]>),
    Bool(Arc<[Option<bool>]>),
    Str(Arc<[Option<String>]>),
    Any(Arc<[Option<Object>]>),
}

/// Evaluate `$body` with `$values` bound to the typed slice, whatever the kind
macro_rules! dispatch {
    ($data:expr, $values:ident => $body:expr) => {
        match $data {
            ColumnData::Double($values) => $body,
            ColumnData::Int($values) => $body,
            ColumnData::Long($values) => $body,
            ColumnData::Bool($values) => $body,
            ColumnData::Str($values) => $body,
            ColumnData::Any($values) => $body,
        }
    };
}

/// Like `dispatch!` but wraps the result back into the same variant
macro_rules! remap {
    ($data:expr, $values:ident => $body:expr) => {
        match $data {
            ColumnData::Double($values) => ColumnData::Double($body),
            ColumnData::Int($values) => ColumnData::Int($body),
            ColumnData::Long($values) => ColumnData::Long($body),
            ColumnData::Bool($values) => ColumnData::Bool($body),
            ColumnData::Str($values) => ColumnData::Str($body),
            ColumnData::Any($values) => ColumnData::Any($body),
        }
    };
}

fn collect<T>(
    values: Vec<Value>,
    kind: ColumnKind,
    pick: impl Fn(Value) -> Option<T>,
) -> Result<Arc<[Option<T>]>> {
    values
        .into_iter()
        .map(|v| v.coerce(kind).map(&pick))
        .collect()
}

impl ColumnData {
    pub fn len(&self) -> usize {
        dispatch!(self, v => v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnData::Double(_) => ColumnKind::Double,
            ColumnData::Int(_) => ColumnKind::Int,
            ColumnData::Long(_) => ColumnKind::Long,
            ColumnData::Bool(_) => ColumnKind::Bool,
            ColumnData::Str(_) => ColumnKind::Str,
            ColumnData::Any(_) => ColumnKind::Any,
        }
    }

    /// Value at `row`, or `None` past the end
    pub fn get(&self, row: usize) -> Option<Value> {
        match self {
            ColumnData::Double(v) => v.get(row).map(|x| x.map_or(Value::Null, Value::Double)),
            ColumnData::Int(v) => v.get(row).map(|x| x.map_or(Value::Null, Value::Int)),
            ColumnData::Long(v) => v.get(row).map(|x| x.map_or(Value::Null, Value::Long)),
            ColumnData::Bool(v) => v.get(row).map(|x| x.map_or(Value::Null, Value::Bool)),
            ColumnData::Str(v) => v
                .get(row)
                .map(|x| x.clone().map_or(Value::Null, Value::Str)),
            ColumnData::Any(v) => v
                .get(row)
                .map(|x| x.clone().map_or(Value::Null, Value::Any)),
        }
    }

    pub fn is_null(&self, row: usize) -> bool {
        dispatch!(self, v => v.get(row).map_or(true, Option::is_none))
    }

    /// All-null storage of the given kind
    pub fn nulls(kind: ColumnKind, len: usize) -> Self {
        match kind {
            ColumnKind::Double => ColumnData::Double(vec![None; len].into()),
            ColumnKind::Int => ColumnData::Int(vec![None; len].into()),
            ColumnKind::Long => ColumnData::Long(vec![None; len].into()),
            ColumnKind::Bool => ColumnData::Bool(vec![None; len].into()),
            ColumnKind::Str => ColumnData::Str(vec![None; len].into()),
            ColumnKind::Any => ColumnData::Any(vec![None; len].into()),
        }
    }

    /// Build storage of `kind`, widening each value into it
    pub fn from_values(kind: ColumnKind, values: Vec<Value>) -> Result<Self> {
        Ok(match kind {
            ColumnKind::Double => ColumnData::Double(collect(values, kind, |v| v.as_f64())?),
            ColumnKind::Int => ColumnData::Int(collect(values, kind, |v| v.as_i32())?),
            ColumnKind::Long => ColumnData::Long(collect(values, kind, |v| v.as_i64())?),
            ColumnKind::Bool => ColumnData::Bool(collect(values, kind, |v| v.as_bool())?),
            ColumnKind::Str => ColumnData::Str(collect(values, kind, |v| match v {
                Value::Str(s) => Some(s),
                _ => None,
            })?),
            ColumnKind::Any => ColumnData::Any(collect(values, kind, |v| match v {
                Value::Any(o) => Some(o),
                _ => None,
            })?),
        })
    }

    fn take(&self, rows: &[usize]) -> Self {
        remap!(self, v => rows.iter().map(|&i| v[i].clone()).collect())
    }

    fn filter(&self, mask: &[bool]) -> Self {
        remap!(self, v => v
            .iter()
            .zip(mask)
            .filter(|(_, &keep)| keep)
            .map(|(x, _)| x.clone())
            .collect())
    }
}

/// A named sequence of same-kind, possibly-null values
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    /// Create a column from existing storage
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Create an `Int` column; accepts both plain and optional values
    pub fn ints<I, T>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Nullable<i32>,
    {
        let data: Arc<[Option<i32>]> = values.into_iter().map(Nullable::into_nullable).collect();
        Self::new(name, ColumnData::Int(data))
    }

    pub fn longs<I, T>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Nullable<i64>,
    {
        let data: Arc<[Option<i64>]> = values.into_iter().map(Nullable::into_nullable).collect();
        Self::new(name, ColumnData::Long(data))
    }

    pub fn doubles<I, T>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Nullable<f64>,
    {
        let data: Arc<[Option<f64>]> = values.into_iter().map(Nullable::into_nullable).collect();
        Self::new(name, ColumnData::Double(data))
    }

    pub fn bools<I, T>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Nullable<bool>,
    {
        let data: Arc<[Option<bool>]> = values.into_iter().map(Nullable::into_nullable).collect();
        Self::new(name, ColumnData::Bool(data))
    }

    pub fn strings<I, T>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Nullable<String>,
    {
        let data: Arc<[Option<String>]> = values.into_iter().map(Nullable::into_nullable).collect();
        Self::new(name, ColumnData::Str(data))
    }

    pub fn objects<I, T>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Nullable<Object>,
    {
        let data: Arc<[Option<Object>]> = values.into_iter().map(Nullable::into_nullable).collect();
        Self::new(name, ColumnData::Any(data))
    }

    /// Build a column whose kind is resolved from the values themselves.
    ///
    /// Values that fit no single kind are kept as opaque `Any` objects.
    pub fn infer(name: impl Into<String>, values: Vec<Value>) -> Self {
        let kind = resolve_kind(&values);
        let len = values.len();
        // resolve_kind only picks kinds every value coerces into
        let data = match ColumnData::from_values(kind, values) {
            Ok(data) => data,
            Err(e) => {
                debug_assert!(false, "inferred kind {kind} rejected a value: {e}");
                log::error!("inferred kind {kind} rejected a value: {e}");
                ColumnData::nulls(kind, len)
            }
        };
        Self::new(name, data)
    }

    /// Build a column of an explicit kind
    pub fn from_values(name: impl Into<String>, kind: ColumnKind, values: Vec<Value>) -> Result<Self> {
        Ok(Self::new(name, ColumnData::from_values(kind, values)?))
    }

    /// All-null column
    pub fn nulls(name: impl Into<String>, kind: ColumnKind, len: usize) -> Self {
        Self::new(name, ColumnData::nulls(kind, len))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ColumnKind {
        self.data.kind()
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Value at `row`, or `None` past the end
    pub fn get(&self, row: usize) -> Option<Value> {
        self.data.get(row)
    }

    /// Iterate the cells as values
    pub fn iter(&self) -> impl Iterator<Item = Value> + '_ {
        (0..self.len()).map(move |i| self.data.get(i).unwrap_or_default())
    }

    pub fn to_values(&self) -> Vec<Value> {
        self.iter().collect()
    }

    /// Same data under a new name
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self::new(name, self.data.clone())
    }

    /// Gather the given rows, in the given order
    pub fn take(&self, rows: &[usize]) -> Self {
        Self::new(self.name.clone(), self.data.take(rows))
    }

    /// Keep rows where `mask` is true
    pub fn filter(&self, mask: &[bool]) -> Result<Self> {
        if mask.len() != self.len() {
            return Err(FrameError::DimensionMismatch {
                expected: self.len(),
                actual: mask.len(),
            });
        }
        Ok(Self::new(self.name.clone(), self.data.filter(mask)))
    }

    /// Null indicator per row
    pub fn is_na(&self) -> Vec<bool> {
        (0..self.len()).map(|i| self.data.is_null(i)).collect()
    }

    pub fn null_count(&self) -> usize {
        self.is_na().into_iter().filter(|&na| na).count()
    }

    pub fn as_ints(&self) -> Option<&[Option<i32>]> {
        match &self.data {
            ColumnData::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_longs(&self) -> Option<&[Option<i64>]> {
        match &self.data {
            ColumnData::Long(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_doubles(&self) -> Option<&[Option<f64>]> {
        match &self.data {
            ColumnData::Double(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bools(&self) -> Option<&[Option<bool>]> {
        match &self.data {
            ColumnData::Bool(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_strs(&self) -> Option<&[Option<String>]> {
        match &self.data {
            ColumnData::Str(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_objects(&self) -> Option<&[Option<Object>]> {
        match &self.data {
            ColumnData::Any(v) => Some(v),
            _ => None,
        }
    }

    /// Render every non-null cell as text
    pub fn to_strings(&self) -> Column {
        let data = self
            .iter()
            .map(|v| (!v.is_null()).then(|| v.display().into_owned()))
            .collect();
        Self::new(self.name.clone(), ColumnData::Str(data))
    }

    /// Convert into another kind.
    ///
    /// Numeric kinds widen, every kind renders to `String` and wraps into
    /// `Any`; anything else is unsupported.
    pub fn cast(&self, kind: ColumnKind) -> Result<Column> {
        if kind == self.kind() {
            return Ok(self.clone());
        }
        if kind == ColumnKind::Str {
            return Ok(self.to_strings());
        }
        Self::from_values(self.name.clone(), kind, self.to_values())
    }

    /// Concatenate columns, widening to a common kind.
    ///
    /// Parts that hold only nulls do not constrain the resulting kind, and
    /// null-filled `Any` parts never do.
    pub fn concat(name: impl Into<String>, parts: &[&Column]) -> Result<Column> {
        let name = name.into();
        let widen_all = |keep: &dyn Fn(&Column) -> bool| {
            parts
                .iter()
                .filter(|c| keep(c))
                .map(|c| c.kind())
                .reduce(ColumnKind::widen)
        };
        let kind = widen_all(&|c: &Column| c.null_count() < c.len())
            .or_else(|| widen_all(&|c: &Column| c.kind() != ColumnKind::Any))
            .unwrap_or(ColumnKind::Any);

        if parts.iter().all(|c| c.kind() == kind) {
            let data = concat_same(kind, parts);
            return Ok(Self::new(name, data));
        }

        let values: Vec<Value> = parts.iter().flat_map(|c| c.iter()).collect();
        Self::from_values(name, kind, values)
    }
}

/// Concatenate same-kind parts without going through `Value`
fn concat_same(kind: ColumnKind, parts: &[&Column]) -> ColumnData {
    macro_rules! join {
        ($variant:ident) => {
            ColumnData::$variant(
                parts
                    .iter()
                    .flat_map(|c| match &c.data {
                        ColumnData::$variant(v) => &v[..],
                        _ => &[],
                    })
                    .cloned()
                    .collect(),
            )
        };
    }

    match kind {
        ColumnKind::Double => join!(Double),
        ColumnKind::Int => join!(Int),
        ColumnKind::Long => join!(Long),
        ColumnKind::Bool => join!(Bool),
        ColumnKind::Str => join!(Str),
        ColumnKind::Any => join!(Any),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_keeps_mixed_values() {
        let col = Column::infer("x", vec![1.into(), "a".into(), Value::Null]);
        assert_eq!(col.kind(), ColumnKind::Any);
        assert_eq!(col.len(), 3);
        assert_eq!(col.is_na(), vec![false, false, true]);
    }

    #[test]
    fn test_typed_constructors_accept_nulls() {
        let col = Column::ints("a", vec![Some(1), None, Some(3)]);
        assert_eq!(col.kind(), ColumnKind::Int);
        assert_eq!(col.len(), 3);
        assert_eq!(col.get(1), Some(Value::Null));
        assert_eq!(col.is_na(), vec![false, true, false]);

        let names = Column::strings("name", ["Max", "Franz"]);
        assert_eq!(names.get(0), Some(Value::from("Max")));
        assert_eq!(names.get(2), None);
    }

    #[test]
    fn test_infer_resolves_kind() {
        let col = Column::infer("x", vec![1.into(), 2i64.into(), Value::Null]);
        assert_eq!(col.kind(), ColumnKind::Long);
        assert_eq!(col.as_longs(), Some(&[Some(1), Some(2), None][..]));

        let mixed = Column::infer("x", vec![1.into(), "a".into()]);
        assert_eq!(mixed.kind(), ColumnKind::Any);
        assert_eq!(mixed.get(1).map(|v| v.to_string()), Some("a".to_string()));
    }

    #[test]
    fn test_take_and_filter() {
        let col = Column::doubles("d", [1.0, 2.0, 3.0]);
        assert_eq!(col.take(&[2, 0]).as_doubles(), Some(&[Some(3.0), Some(1.0)][..]));
        let kept = col.filter(&[true, false, true]).unwrap();
        assert_eq!(kept.to_values(), vec![Value::Double(1.0), Value::Double(3.0)]);
        assert!(matches!(
            col.filter(&[true]),
            Err(FrameError::DimensionMismatch { expected: 3, actual: 1 })
        ));
    }

    #[test]
    fn test_concat_widens_and_ignores_null_parts() {
        let a = Column::ints("v", [1, 2]);
        let b = Column::doubles("v", [0.5]);
        let c = Column::nulls("v", ColumnKind::Any, 2);
        let joined = Column::concat("v", &[&a, &b, &c]).unwrap();
        assert_eq!(joined.kind(), ColumnKind::Double);
        assert_eq!(joined.len(), 5);
        assert_eq!(joined.get(0), Some(Value::Double(1.0)));
        assert_eq!(joined.get(4), Some(Value::Null));
    }

    #[test]
    fn test_cast_to_strings() {
        let col = Column::ints("a", vec![Some(1), None]);
        let text = col.cast(ColumnKind::Str).unwrap();
        assert_eq!(text.as_strs(), Some(&[Some("1".to_string()), None][..]));
        assert!(Column::strings("s", ["x"]).cast(ColumnKind::Int).is_err());
    }
}
