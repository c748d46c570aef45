use serde::Serialize;
use uom::si::{
    electric_current::{ampere, kiloampere},
    f64::{ElectricCurrent, Time},
    time::second,
};
use wirecheck_core::constraint::ConstraintError;
use wirecheck_tables::{DeviceKind, Standards, TripCurve};

use crate::error::{DesignError, non_negative, positive};

/// A circuit protective device.
///
/// Breakers ([`DeviceKind::Mcb`] and [`DeviceKind::Rcbo`]) need a trip curve
/// unless a magnetic trip current is given explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProtectiveDevice {
    pub kind: DeviceKind,
    /// Rated current `In`.
    pub rating: ElectricCurrent,
    pub curve: Option<TripCurve>,
    /// Rated short-circuit breaking capacity `Icn`.
    pub breaking_capacity: ElectricCurrent,
    /// Overrides the magnetic trip current derived from the rating.
    pub magnetic_trip: Option<ElectricCurrent>,
    /// Intentional delay added to the operating time.
    ///
    /// Only an upstream device may carry a delay.
    pub time_delay: Option<Time>,
}

impl ProtectiveDevice {
    /// Creates a device with a 6 kA breaking capacity and no overrides.
    #[must_use]
    pub fn new(kind: DeviceKind, rating: ElectricCurrent, curve: Option<TripCurve>) -> Self {
        Self {
            kind,
            rating,
            curve,
            breaking_capacity: ElectricCurrent::new::<kiloampere>(6.0),
            magnetic_trip: None,
            time_delay: None,
        }
    }

    /// Creates a miniature circuit-breaker.
    #[must_use]
    pub fn mcb(rating: ElectricCurrent, curve: TripCurve) -> Self {
        Self::new(DeviceKind::Mcb, rating, Some(curve))
    }

    /// Returns `self` with the given breaking capacity, keeping other fields unchanged.
    #[must_use]
    pub fn with_breaking_capacity(self, breaking_capacity: ElectricCurrent) -> Self {
        Self {
            breaking_capacity,
            ..self
        }
    }

    /// Returns `self` with the given magnetic trip override, keeping other fields unchanged.
    #[must_use]
    pub fn with_magnetic_trip(self, magnetic_trip: ElectricCurrent) -> Self {
        Self {
            magnetic_trip: Some(magnetic_trip),
            ..self
        }
    }

    /// Returns `self` with the given intentional time delay, keeping other fields unchanged.
    #[must_use]
    pub fn with_time_delay(self, time_delay: Time) -> Self {
        Self {
            time_delay: Some(time_delay),
            ..self
        }
    }

    /// Current above which the device trips instantaneously.
    ///
    /// # Errors
    ///
    /// Returns a table error if a breaker has neither a curve nor an override.
    pub fn magnetic_trip_current(
        &self,
        standards: &Standards,
    ) -> Result<ElectricCurrent, DesignError> {
        if let Some(current) = self.magnetic_trip {
            return Ok(current);
        }
        let multiplier = standards.magnetic_multiplier(self.kind, self.curve)?;
        Ok(self.rating * multiplier)
    }

    /// Checks the device's numeric invariants and that its rating is on the
    /// standard ladder.
    pub(crate) fn validate(&self, standards: &Standards, role: Role) -> Result<(), DesignError> {
        positive(role.rating(), self.rating)?;
        standards.device_rating(self.rating)?;
        positive(role.breaking_capacity(), self.breaking_capacity)?;
        if let Some(current) = self.magnetic_trip {
            positive(role.magnetic_trip(), current)?;
        }
        if let Some(delay) = self.time_delay {
            let delay = non_negative(role.time_delay(), delay)?;
            if matches!(role, Role::Downstream) && delay > Time::new::<second>(0.0) {
                return Err(DesignError::InvalidInput {
                    field: role.time_delay(),
                    source: ConstraintError::AboveMaximum,
                });
            }
        }
        Ok(())
    }

    /// Intentional delay, zero when none is set.
    pub(crate) fn delay(&self) -> Time {
        self.time_delay.unwrap_or_else(|| Time::new::<second>(0.0))
    }

    pub(crate) fn rating_amps(&self) -> f64 {
        self.rating.get::<ampere>()
    }
}

/// Position of a device in a selectivity pair, used to name invalid fields.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Role {
    Upstream,
    Downstream,
}

impl Role {
    fn rating(self) -> &'static str {
        match self {
            Self::Upstream => "upstream rating",
            Self::Downstream => "downstream rating",
        }
    }

    fn breaking_capacity(self) -> &'static str {
        match self {
            Self::Upstream => "upstream breaking capacity",
            Self::Downstream => "downstream breaking capacity",
        }
    }

    fn magnetic_trip(self) -> &'static str {
        match self {
            Self::Upstream => "upstream magnetic trip",
            Self::Downstream => "downstream magnetic trip",
        }
    }

    fn time_delay(self) -> &'static str {
        match self {
            Self::Upstream => "upstream time delay",
            Self::Downstream => "downstream time delay",
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use wirecheck_tables::TableError;

    use super::*;

    fn amps(value: f64) -> ElectricCurrent {
        ElectricCurrent::new::<ampere>(value)
    }

    #[test]
    fn magnetic_trip_follows_the_curve() {
        let standards = Standards::bs7671();
        let trip = ProtectiveDevice::mcb(amps(32.0), TripCurve::C)
            .magnetic_trip_current(&standards)
            .unwrap();
        assert_relative_eq!(trip.get::<ampere>(), 320.0);
    }

    #[test]
    fn override_wins_over_the_curve() {
        let standards = Standards::bs7671();
        let trip = ProtectiveDevice::mcb(amps(32.0), TripCurve::B)
            .with_magnetic_trip(amps(250.0))
            .magnetic_trip_current(&standards)
            .unwrap();
        assert_relative_eq!(trip.get::<ampere>(), 250.0);
    }

    #[test]
    fn fuse_uses_its_family_multiplier() {
        let standards = Standards::bs7671();
        let trip = ProtectiveDevice::new(DeviceKind::Fuse, amps(63.0), None)
            .magnetic_trip_current(&standards)
            .unwrap();
        assert_relative_eq!(trip.get::<ampere>(), 504.0);
    }

    #[test]
    fn breaker_without_curve_is_an_error() {
        let standards = Standards::bs7671();
        let err = ProtectiveDevice::new(DeviceKind::Rcbo, amps(20.0), None)
            .magnetic_trip_current(&standards)
            .unwrap_err();
        assert!(matches!(
            err,
            DesignError::Table(TableError::MissingTripCurve {
                kind: DeviceKind::Rcbo
            })
        ));
    }

    #[test]
    fn negative_delay_is_rejected() {
        let device = ProtectiveDevice::mcb(amps(40.0), TripCurve::B)
            .with_time_delay(Time::new::<second>(-0.1));
        assert!(matches!(
            device.validate(&Standards::bs7671(), Role::Upstream),
            Err(DesignError::InvalidInput {
                field: "upstream time delay",
                ..
            })
        ));
    }

    #[test]
    fn downstream_delay_is_rejected() {
        let standards = Standards::bs7671();
        let delayed = ProtectiveDevice::mcb(amps(20.0), TripCurve::B)
            .with_time_delay(Time::new::<second>(0.1));
        assert!(delayed.validate(&standards, Role::Upstream).is_ok());
        assert!(matches!(
            delayed.validate(&standards, Role::Downstream),
            Err(DesignError::InvalidInput {
                field: "downstream time delay",
                source: ConstraintError::AboveMaximum,
            })
        ));

        let zero = ProtectiveDevice::mcb(amps(20.0), TripCurve::B)
            .with_time_delay(Time::new::<second>(0.0));
        assert!(zero.validate(&standards, Role::Downstream).is_ok());
    }

    #[test]
    fn off_ladder_rating_is_invalid() {
        let device = ProtectiveDevice::mcb(amps(47.0), TripCurve::B);
        assert!(matches!(
            device.validate(&Standards::bs7671(), Role::Upstream),
            Err(DesignError::Table(TableError::InvalidRating { .. }))
        ));
    }
}
