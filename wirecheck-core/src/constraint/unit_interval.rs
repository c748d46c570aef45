use std::cmp::Ordering;

use crate::constraint::{Constrained, Constraint, ConstraintError};

/// Types with a zero and a one, used by the unit interval constraint.
pub trait UnitBounds: PartialOrd + Sized {
    fn zero() -> Self;
    fn one() -> Self;
}

impl UnitBounds for f64 {
    fn zero() -> Self {
        0.0
    }

    fn one() -> Self {
        1.0
    }
}

/// Marker type enforcing that a value lies in the left-open unit interval: `0 < x ≤ 1`.
///
/// Derating factors live here: a factor of one leaves the tabulated capacity
/// unchanged and a factor of zero would leave a cable with no capacity at all.
///
/// # Examples
///
/// ```
/// use wirecheck_core::constraint::UnitIntervalLeftOpen;
///
/// assert!(UnitIntervalLeftOpen::new(0.94).is_ok());
/// assert!(UnitIntervalLeftOpen::new(1.0).is_ok());
/// assert!(UnitIntervalLeftOpen::new(0.0).is_err());
/// assert!(UnitIntervalLeftOpen::new(1.01).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct UnitIntervalLeftOpen;

impl UnitIntervalLeftOpen {
    /// Constructs `Constrained<T, UnitIntervalLeftOpen>` if 0 < value ≤ 1.
    ///
    /// # Errors
    ///
    /// - [`ConstraintError::BelowMinimum`] if less than or equal to zero.
    /// - [`ConstraintError::AboveMaximum`] if greater than one.
    /// - [`ConstraintError::NotANumber`] if comparison is undefined (e.g., NaN).
    pub fn new<T: UnitBounds>(
        value: T,
    ) -> Result<Constrained<T, UnitIntervalLeftOpen>, ConstraintError> {
        Constrained::<T, UnitIntervalLeftOpen>::new(value)
    }
}

impl<T: UnitBounds> Constraint<T> for UnitIntervalLeftOpen {
    fn check(value: &T) -> Result<(), ConstraintError> {
        match (value.partial_cmp(&T::zero()), value.partial_cmp(&T::one())) {
            (None, _) | (_, None) => Err(ConstraintError::NotANumber),
            (Some(Ordering::Less | Ordering::Equal), _) => Err(ConstraintError::BelowMinimum),
            (_, Some(Ordering::Greater)) => Err(ConstraintError::AboveMaximum),
            _ => Ok(()),
        }
    }
}
