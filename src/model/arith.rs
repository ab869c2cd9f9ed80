//! Element-wise arithmetic and comparisons on columns

use std::cmp::Ordering;

use super::column::{Column, ColumnData};
use super::kind::{common_kind, ColumnKind};
use super::value::Value;
use crate::error::{FrameError, Result};

/// Right-hand side of a column operation
#[derive(Debug, Clone)]
pub enum Operand<'a> {
    /// A single value broadcast to every row
    Scalar(Value),
    Column(&'a Column),
    Values(Vec<Value>),
}

impl<'a> From<&'a Column> for Operand<'a> {
    fn from(c: &'a Column) -> Self {
        Operand::Column(c)
    }
}

impl From<Vec<Value>> for Operand<'_> {
    fn from(v: Vec<Value>) -> Self {
        Operand::Values(v)
    }
}

macro_rules! scalar_operand {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Operand<'_> {
                fn from(v: $t) -> Self {
                    Operand::Scalar(v.into())
                }
            }
        )*
    };
}

scalar_operand!(Value, i32, i64, f64, bool, String, &str);

impl Operand<'_> {
    /// Kind of the operand, or `None` when it holds only nulls
    fn kind(&self) -> Option<ColumnKind> {
        match self {
            Operand::Scalar(v) => v.kind(),
            Operand::Column(c) if c.null_count() == c.len() => None,
            Operand::Column(c) => Some(c.kind()),
            Operand::Values(v) => common_kind(v),
        }
    }

    fn check_len(&self, len: usize) -> Result<()> {
        let actual = match self {
            Operand::Scalar(_) => return Ok(()),
            Operand::Column(c) => c.len(),
            Operand::Values(v) => v.len(),
        };
        if actual != len {
            return Err(FrameError::DimensionMismatch {
                expected: len,
                actual,
            });
        }
        Ok(())
    }

    fn value_at(&self, row: usize) -> Value {
        match self {
            Operand::Scalar(v) => v.clone(),
            Operand::Column(c) => c.get(row).unwrap_or_default(),
            Operand::Values(v) => v.get(row).cloned().unwrap_or_default(),
        }
    }
}

/// Binary arithmetic operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    fn symbol(self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
        }
    }

    fn apply_i32(self, a: i32, b: i32) -> i32 {
        match self {
            ArithOp::Add => a.wrapping_add(b),
            ArithOp::Sub => a.wrapping_sub(b),
            ArithOp::Mul => a.wrapping_mul(b),
            ArithOp::Div => a.wrapping_div(b),
        }
    }

    fn apply_i64(self, a: i64, b: i64) -> i64 {
        match self {
            ArithOp::Add => a.wrapping_add(b),
            ArithOp::Sub => a.wrapping_sub(b),
            ArithOp::Mul => a.wrapping_mul(b),
            ArithOp::Div => a.wrapping_div(b),
        }
    }

    fn apply_f64(self, a: f64, b: f64) -> f64 {
        match self {
            ArithOp::Add => a + b,
            ArithOp::Sub => a - b,
            ArithOp::Mul => a * b,
            ArithOp::Div => a / b,
        }
    }

    /// Result kind for numeric operands; division always yields `Double`
    fn result_kind(self, left: ColumnKind, right: ColumnKind) -> Option<ColumnKind> {
        if !left.is_numeric() || !right.is_numeric() {
            return None;
        }
        if self == ArithOp::Div {
            return Some(ColumnKind::Double);
        }
        Some(left.widen(right))
    }
}

impl Column {
    pub fn plus<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Column> {
        self.arith(rhs.into(), ArithOp::Add)
    }

    pub fn minus<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Column> {
        self.arith(rhs.into(), ArithOp::Sub)
    }

    pub fn times<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Column> {
        self.arith(rhs.into(), ArithOp::Mul)
    }

    pub fn div<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Column> {
        self.arith(rhs.into(), ArithOp::Div)
    }

    /// Apply `op` row by row; a null on either side yields null.
    ///
    /// `+` with a `String` on either side concatenates rendered values.
    pub fn arith(&self, rhs: Operand<'_>, op: ArithOp) -> Result<Column> {
        rhs.check_len(self.len())?;
        let left = self.kind();
        let right = rhs.kind().unwrap_or(left);

        if op == ArithOp::Add && (left == ColumnKind::Str || right == ColumnKind::Str) {
            return Ok(self.concat_text(&rhs));
        }

        let kind = op.result_kind(left, right).ok_or_else(|| {
            FrameError::UnsupportedOperation(format!(
                "cannot apply '{}' to {} and {} values",
                op.symbol(),
                left,
                right
            ))
        })?;

        let n = self.len();
        let pair = |i: usize| (self.get(i).unwrap_or_default(), rhs.value_at(i));
        let data = match kind {
            ColumnKind::Int => ColumnData::Int(
                (0..n)
                    .map(|i| {
                        let (a, b) = pair(i);
                        Some(op.apply_i32(a.as_i32()?, b.as_i32()?))
                    })
                    .collect(),
            ),
            ColumnKind::Long => ColumnData::Long(
                (0..n)
                    .map(|i| {
                        let (a, b) = pair(i);
                        Some(op.apply_i64(a.as_i64()?, b.as_i64()?))
                    })
                    .collect(),
            ),
            _ => ColumnData::Double(
                (0..n)
                    .map(|i| {
                        let (a, b) = pair(i);
                        Some(op.apply_f64(a.as_f64()?, b.as_f64()?))
                    })
                    .collect(),
            ),
        };
        Ok(Column::new(self.name(), data))
    }

    fn concat_text(&self, rhs: &Operand<'_>) -> Column {
        let data = (0..self.len())
            .map(|i| {
                let (a, b) = (self.get(i).unwrap_or_default(), rhs.value_at(i));
                if a.is_null() || b.is_null() {
                    None
                } else {
                    Some(format!("{}{}", a.display(), b.display()))
                }
            })
            .collect();
        Column::new(self.name(), ColumnData::Str(data))
    }

    /// Arithmetic negation
    pub fn neg(&self) -> Result<Column> {
        let data = match self.data() {
            ColumnData::Int(v) => ColumnData::Int(v.iter().map(|x| x.map(i32::wrapping_neg)).collect()),
            ColumnData::Long(v) => ColumnData::Long(v.iter().map(|x| x.map(i64::wrapping_neg)).collect()),
            ColumnData::Double(v) => ColumnData::Double(v.iter().map(|x| x.map(|f| -f)).collect()),
            other => {
                return Err(FrameError::UnsupportedOperation(format!(
                    "cannot negate a {} column",
                    other.kind()
                )))
            }
        };
        Ok(Column::new(self.name(), data))
    }

    /// Logical negation of a boolean column
    pub fn not(&self) -> Result<Column> {
        match self.as_bools() {
            Some(v) => Ok(Column::bools(self.name(), v.iter().map(|x| x.map(|b| !b)))),
            None => Err(FrameError::UnsupportedOperation(format!(
                "cannot invert a {} column",
                self.kind()
            ))),
        }
    }

    pub fn gt<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Vec<bool>> {
        self.compare(rhs.into(), Ordering::is_gt)
    }

    pub fn ge<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Vec<bool>> {
        self.compare(rhs.into(), Ordering::is_ge)
    }

    pub fn lt<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Vec<bool>> {
        self.compare(rhs.into(), Ordering::is_lt)
    }

    pub fn le<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Vec<bool>> {
        self.compare(rhs.into(), Ordering::is_le)
    }

    /// Row-wise equality; nulls never match
    pub fn eq<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Vec<bool>> {
        let rhs = rhs.into();
        rhs.check_len(self.len())?;
        Ok(self
            .rows_with(&rhs)
            .map(|(a, b)| !a.is_null() && !b.is_null() && compare_values(&a, &b) == Some(Ordering::Equal))
            .collect())
    }

    /// Row-wise inequality; nulls never match
    pub fn ne<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Vec<bool>> {
        let rhs = rhs.into();
        rhs.check_len(self.len())?;
        Ok(self
            .rows_with(&rhs)
            .map(|(a, b)| !a.is_null() && !b.is_null() && compare_values(&a, &b) != Some(Ordering::Equal))
            .collect())
    }

    fn rows_with<'s>(&'s self, rhs: &'s Operand<'_>) -> impl Iterator<Item = (Value, Value)> + 's {
        (0..self.len()).map(move |i| (self.get(i).unwrap_or_default(), rhs.value_at(i)))
    }

    fn compare(&self, rhs: Operand<'_>, pred: fn(Ordering) -> bool) -> Result<Vec<bool>> {
        rhs.check_len(self.len())?;
        let left = self.kind();
        if let Some(right) = rhs.kind() {
            let comparable = (left.is_numeric() && right.is_numeric()) || left == right;
            if !comparable {
                return Err(FrameError::UnsupportedOperation(format!(
                    "cannot compare {} with {} values",
                    left, right
                )));
            }
        }
        Ok(self
            .rows_with(&rhs)
            .map(|(a, b)| compare_values(&a, &b).is_some_and(pred))
            .collect())
    }
}

/// Order two non-null values; numbers compare across numeric kinds
fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    if a.is_null() || b.is_null() {
        return None;
    }
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return Some(x.cmp(&y));
    }
    if let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) {
        return x.partial_cmp(&y);
    }
    (a.kind() == b.kind()).then(|| a.cmp(b))
}

/// Element-wise AND of two masks
pub fn mask_and(a: &[bool], b: &[bool]) -> Vec<bool> {
    a.iter().zip(b).map(|(x, y)| *x && *y).collect()
}

/// Element-wise OR of two masks
pub fn mask_or(a: &[bool], b: &[bool]) -> Vec<bool> {
    a.iter().zip(b).map(|(x, y)| *x || *y).collect()
}

pub fn mask_not(a: &[bool]) -> Vec<bool> {
    a.iter().map(|x| !x).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_arithmetic_keeps_kind() {
        let a = Column::ints("a", vec![Some(1), None, Some(3)]);
        let sum = a.plus(&a).unwrap();
        assert_eq!(sum.kind(), ColumnKind::Int);
        assert_eq!(sum.as_ints(), Some(&[Some(2), None, Some(6)][..]));
    }

    #[test]
    fn test_division_yields_double() {
        let a = Column::ints("a", [3, 4]);
        let q = a.div(2).unwrap();
        assert_eq!(q.kind(), ColumnKind::Double);
        assert_eq!(q.as_doubles(), Some(&[Some(1.5), Some(2.0)][..]));
    }

    #[test]
    fn test_mixed_numeric_promotes() {
        let a = Column::ints("a", [1, 2]);
        let b = Column::longs("b", [10i64, 20]);
        assert_eq!(a.plus(&b).unwrap().kind(), ColumnKind::Long);
        assert_eq!(a.times(0.5).unwrap().kind(), ColumnKind::Double);
    }

    #[test]
    fn test_string_concatenation() {
        let s = Column::strings("s", vec![Some("a"), None]);
        let out = s.plus("_x").unwrap();
        assert_eq!(out.as_strs(), Some(&[Some("a_x".to_string()), None][..]));

        let n = Column::ints("n", [3]);
        assert_eq!(n.plus("foo").unwrap().get(0), Some(Value::from("3foo")));
    }

    #[test]
    fn test_length_mismatch() {
        let a = Column::ints("a", [1, 2]);
        let b = Column::ints("b", [1, 2, 3]);
        assert!(matches!(
            a.plus(&b),
            Err(FrameError::DimensionMismatch { expected: 2, actual: 3 })
        ));
    }

    #[test]
    fn test_non_numeric_arithmetic_fails() {
        let b = Column::bools("b", [true]);
        assert!(matches!(b.minus(1), Err(FrameError::UnsupportedOperation(_))));
        assert!(b.neg().is_err());
        assert_eq!(b.not().unwrap().get(0), Some(Value::Bool(false)));
    }

    #[test]
    fn test_comparisons_treat_null_as_false() {
        let a = Column::ints("a", vec![Some(1), None, Some(5)]);
        assert_eq!(a.gt(2).unwrap(), vec![false, false, true]);
        assert_eq!(a.le(5.0).unwrap(), vec![true, false, true]);
        assert_eq!(a.eq(1).unwrap(), vec![true, false, false]);
        assert_eq!(a.ne(1).unwrap(), vec![false, false, true]);
        assert!(a.gt("x").is_err());
    }

    #[test]
    fn test_masks() {
        let a = [true, false, true];
        let b = [true, true, false];
        assert_eq!(mask_and(&a, &b), vec![true, false, false]);
        assert_eq!(mask_or(&a, &b), vec![true, true, true]);
        assert_eq!(mask_not(&a), vec![false, true, false]);
    }
}
