use num_traits::Zero;
use thiserror::Error;
use wirecheck_core::constraint::{ConstraintError, NonNegative, StrictlyPositive};
use wirecheck_tables::TableError;

/// Errors raised by the compliance calculators.
///
/// Only structurally invalid input and missing table entries are errors.
/// A circuit that fails a check is reported through the result types.
#[derive(Debug, Error)]
pub enum DesignError {
    /// An input value violates its numeric invariant.
    #[error("invalid {field}: {source}")]
    InvalidInput {
        field: &'static str,
        #[source]
        source: ConstraintError,
    },

    /// A size, rating or combination is not on the standard tables.
    #[error(transparent)]
    Table(#[from] TableError),
}

/// Returns `value` if it is strictly positive.
pub(crate) fn positive<T: PartialOrd + Zero>(
    field: &'static str,
    value: T,
) -> Result<T, DesignError> {
    StrictlyPositive::new(value)
        .map(|value| value.into_inner())
        .map_err(|source| DesignError::InvalidInput { field, source })
}

/// Returns `value` if it is zero or greater.
pub(crate) fn non_negative<T: PartialOrd + Zero>(
    field: &'static str,
    value: T,
) -> Result<T, DesignError> {
    NonNegative::new(value)
        .map(|value| value.into_inner())
        .map_err(|source| DesignError::InvalidInput { field, source })
}

/// Returns `value` if it is neither NaN nor infinite.
pub(crate) fn finite(field: &'static str, value: f64) -> Result<f64, DesignError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(DesignError::InvalidInput {
            field,
            source: ConstraintError::NotANumber,
        })
    }
}
