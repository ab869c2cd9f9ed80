//! Error type shared by every table operation

use thiserror::Error;

/// Errors raised when an operation violates a table or column contract.
///
/// All variants are reported at the call that caused them; nothing is retried
/// or silently recovered.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FrameError {
    /// Two columns of one table share a name.
    #[error("column names are not unique: '{0}' occurs more than once")]
    DuplicateColumnName(String),

    /// A column was requested by a name the table does not contain.
    #[error("could not find column '{0}' in table")]
    ColumnNotFound(String),

    /// A predicate, new column or operand has the wrong number of rows.
    #[error("dimension mismatch: expected length {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// An aggregate was requested on data with missing values.
    #[error("missing values in column '{0}'; consider to use remove_na")]
    MissingValue(String),

    /// A summarize rule did not evaluate into a scalar.
    #[error("summarize() rule for '{name}' did not evaluate into a scalar value but into a {found}")]
    NonScalarValue { name: String, found: &'static str },

    /// Positive and negative column selections were combined.
    #[error(
        "Mixing positive and negative selection does not have meaningful semantics and is not supported:\n{0}"
    )]
    InvalidColumnSelect(String),

    /// The operation is not defined for the involved column kinds or shapes.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// `spread` found the same key twice within one row group.
    #[error("key value mapping is not unique for key column '{0}'")]
    KeyNotUnique(String),

    /// A parameter is outside its valid range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type for table operations
pub type Result<T> = std::result::Result<T, FrameError>;
