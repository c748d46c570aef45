use std::cmp::Ordering;

use num_traits::Zero;

use crate::constraint::{Constrained, Constraint, ConstraintError};

/// Marker type enforcing that a value is non-negative (zero or greater).
///
/// A cable run of zero metres is valid: the conductor then contributes no
/// voltage drop and no loop impedance.
///
/// # Examples
///
/// ```
/// use wirecheck_core::constraint::NonNegative;
///
/// assert!(NonNegative::new(0.0).is_ok());
/// assert!(NonNegative::new(20.0).is_ok());
/// assert!(NonNegative::new(-0.5).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct NonNegative;

impl NonNegative {
    /// Constructs `Constrained<T, NonNegative>` if the value is zero or greater.
    ///
    /// # Errors
    ///
    /// - [`ConstraintError::Negative`] if the value is less than zero.
    /// - [`ConstraintError::NotANumber`] if comparison is undefined (e.g., NaN).
    pub fn new<T: PartialOrd + Zero>(
        value: T,
    ) -> Result<Constrained<T, NonNegative>, ConstraintError> {
        Constrained::<T, NonNegative>::new(value)
    }
}

impl<T: PartialOrd + Zero> Constraint<T> for NonNegative {
    fn check(value: &T) -> Result<(), ConstraintError> {
        match value.partial_cmp(&T::zero()) {
            Some(Ordering::Greater | Ordering::Equal) => Ok(()),
            Some(Ordering::Less) => Err(ConstraintError::Negative),
            None => Err(ConstraintError::NotANumber),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use uom::si::{f64::Length, length::meter};

    #[test]
    fn lengths() {
        assert!(NonNegative::new(Length::new::<meter>(0.0)).is_ok());
        assert!(NonNegative::new(Length::new::<meter>(45.0)).is_ok());
        assert!(matches!(
            NonNegative::new(Length::new::<meter>(-1.0)),
            Err(ConstraintError::Negative)
        ));
    }

    #[test]
    fn nan_is_not_a_number() {
        assert_eq!(NonNegative::new(f64::NAN), Err(ConstraintError::NotANumber));
    }
}
