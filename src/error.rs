//! Error types shared by table construction, queries and mixing.

use thiserror::Error;

use crate::field::FieldKind;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures of table construction, queries and composition mixing.
///
/// Out-of-domain queries are not errors; they come back as
/// [`DomainWarning`](crate::table::DomainWarning)s on the query result.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Rows do not form a complete rectangular pressure-temperature grid.
    #[error("Malformed table: {reason}")]
    MalformedTable { reason: String },

    /// Field name is not in the registry.
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Field is in the registry but this table was not built with it.
    #[error("Field {0} is not carried by this table")]
    MissingField(FieldKind),

    /// Index-paired inputs have mismatched lengths.
    #[error("Input shape mismatch: expected length {expected}, found {found}")]
    InputShape { expected: usize, found: usize },

    /// A zero value was passed to harmonic mixing.
    #[error("Division by zero: value at index {index} is zero")]
    DivisionByZero { index: usize },

    /// A mixing or interpolation result was NaN or infinite.
    #[error("Non-finite result")]
    NonFinite,

    /// A query coordinate was NaN or infinite and cannot be bracketed.
    #[error("Non-finite query coordinate")]
    NonFiniteQuery,

    /// A resampling grid was requested with zero nodes along an axis.
    #[error("Resampling grid needs at least one node per axis")]
    EmptyGrid,
}

impl Error {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedTable {
            reason: reason.into(),
        }
    }

    /// Check that two index-paired inputs have the same length.
    pub(crate) fn check_len(expected: usize, found: usize) -> Result<()> {
        if expected != found {
            return Err(Self::InputShape { expected, found });
        }
        Ok(())
    }
}
