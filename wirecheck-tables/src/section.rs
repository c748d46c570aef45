use std::fmt;

use serde::{Deserialize, Serialize};
use wirecheck_core::constraint::{ConstraintResult, StrictlyPositive};

/// Nominal cross-sectional area of a conductor, in mm².
///
/// A `CrossSection` only guarantees a positive area. Whether the size is a
/// standard one is decided by the [`Standards`](crate::Standards) in use.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CrossSection(f64);

impl CrossSection {
    /// Creates a cross-section from an area in square millimetres.
    ///
    /// # Errors
    ///
    /// Returns an error if the area is not strictly positive.
    pub fn new(mm2: f64) -> ConstraintResult<Self> {
        Ok(Self(StrictlyPositive::new(mm2)?.into_inner()))
    }

    /// Creates a cross-section from a table entry already known to be valid.
    pub(crate) fn from_table(mm2: f64) -> Self {
        Self(mm2)
    }

    /// Returns the area in square millimetres.
    #[must_use]
    pub fn mm2(self) -> f64 {
        self.0
    }

    /// Returns `true` if both sections denote the same nominal size.
    #[must_use]
    pub fn matches(self, mm2: f64) -> bool {
        (self.0 - mm2).abs() < 1e-9
    }
}

impl fmt::Display for CrossSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} mm²", self.0)
    }
}
