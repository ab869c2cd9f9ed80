//! Data model for columnar tables

mod arith;
mod builder;
mod column;
mod key;
mod kind;
mod stats;
mod table;
mod value;

pub use arith::{mask_and, mask_not, mask_or, ArithOp, Operand};
pub use builder::TableBuilder;
pub use column::{Column, ColumnData};
pub use key::{GroupKey, KeyBuilder};
pub use kind::{common_kind, resolve_kind, ColumnKind};
pub use table::{Row, Table};
pub use value::{Nullable, Object, Opaque, Value};
