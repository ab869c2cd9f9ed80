//! Cell values and opaque user objects

use std::any::Any;
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Serialize, Serializer};

use super::kind::ColumnKind;
use crate::error::{FrameError, Result};

/// Behaviour required from values stored in `Any` columns.
///
/// Implemented for every type that is comparable, hashable and printable, so
/// callers never implement it by hand.
pub trait Opaque: Any + fmt::Debug + fmt::Display + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn type_name(&self) -> &'static str;
    fn eq_opaque(&self, other: &dyn Opaque) -> bool;
    fn hash_opaque(&self, state: &mut dyn Hasher);
    fn cmp_opaque(&self, other: &dyn Opaque) -> Option<Ordering>;
}

impl<T> Opaque for T
where
    T: Any + fmt::Debug + fmt::Display + PartialEq + PartialOrd + Hash + Send + Sync,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn eq_opaque(&self, other: &dyn Opaque) -> bool {
        other.as_any().downcast_ref::<T>().is_some_and(|o| self == o)
    }

    fn hash_opaque(&self, mut state: &mut dyn Hasher) {
        self.type_name().hash(&mut state);
        self.hash(&mut state);
    }

    fn cmp_opaque(&self, other: &dyn Opaque) -> Option<Ordering> {
        other
            .as_any()
            .downcast_ref::<T>()
            .and_then(|o| self.partial_cmp(o))
    }
}

/// Shared handle to an arbitrary user value
#[derive(Clone)]
pub struct Object(Arc<dyn Opaque>);

impl Object {
    /// Wrap a value
    pub fn new<T: Opaque>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Borrow the wrapped value as `T` if it has that type
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    /// Name of the wrapped type
    pub fn type_name(&self) -> &'static str {
        self.0.type_name()
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Object({:?})", self.0)
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.eq_opaque(other.0.as_ref())
    }
}

impl Eq for Object {}

impl Hash for Object {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash_opaque(state);
    }
}

impl PartialOrd for Object {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Object {
    /// Falls back to type name, rendered text and finally allocation
    /// address when the wrapped types are not comparable.
    fn cmp(&self, other: &Self) -> Ordering {
        if self == other {
            return Ordering::Equal;
        }
        self.0
            .cmp_opaque(other.0.as_ref())
            .filter(|o| o.is_ne())
            .unwrap_or_else(|| {
                self.type_name()
                    .cmp(other.type_name())
                    .then_with(|| self.to_string().cmp(&other.to_string()))
                    .then_with(|| {
                        let a = Arc::as_ptr(&self.0) as *const () as usize;
                        let b = Arc::as_ptr(&other.0) as *const () as usize;
                        a.cmp(&b)
                    })
            })
    }
}

impl Serialize for Object {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A single cell value
#[derive(Debug, Clone, Default, Serialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Int(i32),
    Long(i64),
    Double(f64),
    Bool(bool),
    Str(String),
    Any(Object),
}

/// Bit pattern used for equality and hashing: all NaNs are one value and
/// `-0.0` equals `0.0`.
fn canonical_bits(f: f64) -> u64 {
    if f == 0.0 {
        0
    } else if f.is_nan() {
        f64::NAN.to_bits()
    } else {
        f.to_bits()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => canonical_bits(*a) == canonical_bits(*b),
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Any(a), Value::Any(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Int(i) => i.hash(state),
            Value::Long(l) => l.hash(state),
            Value::Double(f) => canonical_bits(*f).hash(state),
            Value::Bool(b) => b.hash(state),
            Value::Str(s) => s.hash(state),
            Value::Any(o) => o.hash(state),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    /// Total order: values of one kind in natural order, nulls last, and
    /// values of different kinds by kind.
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Null, _) => Ordering::Greater,
            (_, Value::Null) => Ordering::Less,
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Long(a), Value::Long(b)) => a.cmp(b),
            (Value::Double(a), Value::Double(b)) => {
                if canonical_bits(*a) == canonical_bits(*b) {
                    Ordering::Equal
                } else {
                    a.total_cmp(b)
                }
            }
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            (Value::Any(a), Value::Any(b)) => a.cmp(b),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }
}

impl Value {
    fn rank(&self) -> u8 {
        match self {
            Value::Int(_) => 0,
            Value::Long(_) => 1,
            Value::Double(_) => 2,
            Value::Bool(_) => 3,
            Value::Str(_) => 4,
            Value::Any(_) => 5,
            Value::Null => 6,
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Kind of a non-null value
    pub fn kind(&self) -> Option<ColumnKind> {
        match self {
            Value::Null => None,
            Value::Int(_) => Some(ColumnKind::Int),
            Value::Long(_) => Some(ColumnKind::Long),
            Value::Double(_) => Some(ColumnKind::Double),
            Value::Bool(_) => Some(ColumnKind::Bool),
            Value::Str(_) => Some(ColumnKind::Str),
            Value::Any(_) => Some(ColumnKind::Any),
        }
    }

    /// Convert to a display string, rendering null as `NA`
    pub fn display(&self) -> Cow<'_, str> {
        match self {
            Value::Null => Cow::Borrowed("NA"),
            Value::Int(i) => Cow::Owned(i.to_string()),
            Value::Long(l) => Cow::Owned(l.to_string()),
            Value::Double(f) => Cow::Owned(f.to_string()),
            Value::Bool(b) => Cow::Owned(b.to_string()),
            Value::Str(s) => Cow::Borrowed(s.as_str()),
            Value::Any(o) => Cow::Owned(o.to_string()),
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Integral value of an `Int` or `Long`
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(i64::from(*i)),
            Value::Long(l) => Some(*l),
            _ => None,
        }
    }

    /// Numeric value of any numeric kind
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(f64::from(*i)),
            Value::Long(l) => Some(*l as f64),
            Value::Double(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Any(o) => Some(o),
            _ => None,
        }
    }

    /// Convert into a value of `kind` without losing information.
    ///
    /// Nulls pass through, integers widen to `Long` or `Double` and every
    /// value can be wrapped as an opaque `Any`.
    pub fn coerce(self, kind: ColumnKind) -> Result<Value> {
        if self.kind().map_or(true, |k| k == kind) {
            return Ok(self);
        }
        match (self, kind) {
            (Value::Int(i), ColumnKind::Long) => Ok(Value::Long(i64::from(i))),
            (Value::Int(i), ColumnKind::Double) => Ok(Value::Double(f64::from(i))),
            (Value::Long(l), ColumnKind::Double) => Ok(Value::Double(l as f64)),
            (value, ColumnKind::Any) => Ok(Value::Any(Object::new(value))),
            (value, kind) => Err(FrameError::UnsupportedOperation(format!(
                "cannot store {} value '{}' in a {} column",
                value.kind().unwrap_or(ColumnKind::Any),
                value.display(),
                kind
            ))),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i)
    }
}

impl From<i64> for Value {
    fn from(l: i64) -> Self {
        Value::Long(l)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Double(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Value::Any(o)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

/// Conversion into an optional cell of type `T`, used by the typed column
/// constructors so that both `3` and `Some(3)` or `None` are accepted.
pub trait Nullable<T> {
    fn into_nullable(self) -> Option<T>;
}

impl<T> Nullable<T> for T {
    fn into_nullable(self) -> Option<T> {
        Some(self)
    }
}

impl<T> Nullable<T> for Option<T> {
    fn into_nullable(self) -> Option<T> {
        self
    }
}

impl Nullable<String> for &str {
    fn into_nullable(self) -> Option<String> {
        Some(self.to_string())
    }
}

impl Nullable<String> for Option<&str> {
    fn into_nullable(self) -> Option<String> {
        self.map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, PartialOrd, Hash)]
    struct Pet {
        name: String,
    }

    impl fmt::Display for Pet {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "pet:{}", self.name)
        }
    }

    fn pet(name: &str) -> Object {
        Object::new(Pet {
            name: name.to_string(),
        })
    }

    #[test]
    fn test_null_sorts_last() {
        let mut values = vec![Value::Null, Value::Int(3), Value::Int(1)];
        values.sort();
        assert_eq!(values, vec![Value::Int(1), Value::Int(3), Value::Null]);
    }

    #[test]
    fn test_double_equality_is_structural() {
        assert_eq!(Value::Double(f64::NAN), Value::Double(f64::NAN));
        assert_eq!(Value::Double(0.0), Value::Double(-0.0));
        assert_ne!(Value::Int(1), Value::Long(1));
    }

    #[test]
    fn test_object_equality_and_display() {
        let a = Value::Any(pet("rex"));
        let b = Value::Any(pet("rex"));
        assert_eq!(a, b);
        assert_eq!(a.display(), "pet:rex");
        assert_eq!(
            pet("rex").downcast_ref::<Pet>().map(|p| p.name.as_str()),
            Some("rex")
        );
        assert!(pet("a") < pet("b"));
    }

    #[test]
    fn test_coerce_widens_integers() {
        assert_eq!(Value::Int(2).coerce(ColumnKind::Long), Ok(Value::Long(2)));
        assert_eq!(
            Value::Long(2).coerce(ColumnKind::Double),
            Ok(Value::Double(2.0))
        );
        assert_eq!(Value::Null.coerce(ColumnKind::Str), Ok(Value::Null));
        assert!(Value::Str("a".into()).coerce(ColumnKind::Int).is_err());
    }

    #[test]
    fn test_display_null_as_na() {
        assert_eq!(Value::Null.to_string(), "NA");
        assert_eq!(Value::from(Some("x")).to_string(), "x");
    }
}
