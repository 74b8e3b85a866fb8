//! Error types for spanqb

use thiserror::Error;

/// Result type alias for spanqb operations
pub type QbResult<T> = Result<T, Error>;

/// Errors raised while converting values or assembling statements.
///
/// Every conversion is a pure function of its input, so an error returned for
/// a given statement will be returned again on every render of that statement.
#[derive(Debug, Error)]
pub enum Error {
    /// A value has no SQL literal form.
    #[error("can't convert {0} into SQL expr")]
    UnsupportedType(String),

    /// A row value is neither a sequence nor a keyed record.
    #[error("can't convert {0} into SQL row")]
    UnsupportedRowShape(String),

    /// A declared column has no matching field on the bound record.
    #[error("column '{column}' not found in {record}")]
    ColumnNotFound { record: String, column: String },

    /// An identifier was built from zero name segments.
    #[error("identifier must have at least one name")]
    EmptyIdentifier,

    /// AND/OR combinator without operands.
    #[error("{0} requires at least one condition")]
    EmptyConditionList(&'static str),

    /// A statement-level invariant failed (missing columns, rows, SET, WHERE).
    #[error("validation error: {0}")]
    Validation(String),

    /// An unsigned integer does not fit into INT64.
    #[error("integer {0} out of INT64 range")]
    IntegerOutOfRange(String),

    /// Conversion of an array element failed.
    #[error("at index {index}: {source}")]
    AtIndex {
        index: usize,
        #[source]
        source: Box<Error>,
    },

    /// Conversion of an INSERT row failed.
    #[error("row {index}: {source}")]
    InRow {
        index: usize,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an unsupported type error from a type name
    pub fn unsupported_type(type_name: impl Into<String>) -> Self {
        Self::UnsupportedType(type_name.into())
    }

    /// Create a column-not-found error
    pub fn column_not_found(record: impl Into<String>, column: impl Into<String>) -> Self {
        Self::ColumnNotFound {
            record: record.into(),
            column: column.into(),
        }
    }

    /// Wrap this error with the array position it occurred at.
    pub fn at_index(self, index: usize) -> Self {
        Self::AtIndex {
            index,
            source: Box::new(self),
        }
    }

    /// Wrap this error with the INSERT row it occurred in.
    pub fn in_row(self, index: usize) -> Self {
        Self::InRow {
            index,
            source: Box::new(self),
        }
    }

    /// Strip positional context and return the innermost error.
    pub fn root_cause(&self) -> &Error {
        match self {
            Self::AtIndex { source, .. } | Self::InRow { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Check if this is a statement validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this (or its root cause) is an unsupported type error
    pub fn is_unsupported_type(&self) -> bool {
        matches!(self.root_cause(), Self::UnsupportedType(_))
    }

    /// Check if this (or its root cause) is a column-not-found error
    pub fn is_column_not_found(&self) -> bool {
        matches!(self.root_cause(), Self::ColumnNotFound { .. })
    }
}
