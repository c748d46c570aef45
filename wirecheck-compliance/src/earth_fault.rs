use serde::Serialize;
use uom::si::{
    electrical_resistance::ohm,
    f64::{ElectricCurrent, ElectricalResistance, Length},
    length::meter,
};
use wirecheck_core::Component;
use wirecheck_tables::{CrossSection, Standards, TripCurve, regulation};

use crate::error::{DesignError, non_negative, positive};

/// Maximum earth-fault loop impedance for a breaker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MaxZs {
    pub ohms: ElectricalResistance,
    pub regulation: &'static str,
}

/// A loop impedance compared against the ceiling for its breaker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EarthFaultReport {
    pub loop_impedance: ElectricalResistance,
    pub max_zs: ElectricalResistance,
    pub compliant: bool,
}

/// A measured or estimated loop impedance to check against a breaker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoopImpedanceInput {
    pub rating: ElectricCurrent,
    pub curve: TripCurve,
    pub loop_impedance: ElectricalResistance,
}

/// Looks up the maximum loop impedance for a breaker rating and curve.
///
/// # Errors
///
/// Returns [`TableError::InvalidRating`] if the rating is off the standard
/// ladder, or [`TableError::UnsupportedDeviceRating`] if the ladder rating
/// has no entry for the curve.
///
/// [`TableError::InvalidRating`]: wirecheck_tables::TableError::InvalidRating
/// [`TableError::UnsupportedDeviceRating`]: wirecheck_tables::TableError::UnsupportedDeviceRating
pub fn max_zs(
    standards: &Standards,
    rating: ElectricCurrent,
    curve: TripCurve,
) -> Result<MaxZs, DesignError> {
    positive("device rating", rating)?;
    let rating = standards.device_rating(rating)?;
    Ok(MaxZs {
        ohms: standards.max_zs(rating, curve)?,
        regulation: regulation::MAX_LOOP_IMPEDANCE,
    })
}

/// Compares a loop impedance against the ceiling for its breaker.
///
/// A loop impedance equal to the ceiling passes.
///
/// # Errors
///
/// Returns a table error if the combination is not tabulated, or
/// [`DesignError::InvalidInput`] for a negative impedance.
pub fn check_loop_impedance(
    standards: &Standards,
    input: &LoopImpedanceInput,
) -> Result<EarthFaultReport, DesignError> {
    let loop_impedance = non_negative("loop impedance", input.loop_impedance)?;
    let ceiling = max_zs(standards, input.rating, input.curve)?.ohms;
    Ok(EarthFaultReport {
        loop_impedance,
        max_zs: ceiling,
        compliant: loop_impedance <= ceiling,
    })
}

/// Estimates `Zs = Ze + (R1 + R2)` for a radial circuit.
///
/// The protective conductor is taken to be the same size as the line
/// conductor, and the 20 °C resistance is corrected to operating temperature.
///
/// # Errors
///
/// Returns a table error if the size has no tabulated resistance.
pub fn estimate_loop_impedance(
    standards: &Standards,
    external: ElectricalResistance,
    size: CrossSection,
    length: Length,
) -> Result<ElectricalResistance, DesignError> {
    let external = non_negative("external loop impedance", external)?;
    let length = non_negative("length", length)?.get::<meter>();
    let milliohms_per_metre = standards.resistance(size)?;
    let factor = standards.earth_fault.operating_temperature_factor;
    let r1_plus_r2 = 2.0 * milliohms_per_metre * length * factor / 1000.0;
    Ok(external + ElectricalResistance::new::<ohm>(r1_plus_r2))
}

/// The loop impedance check as a [`Component`].
#[derive(Debug, Clone, Default)]
pub struct EarthFaultCheck {
    standards: Standards,
}

impl EarthFaultCheck {
    #[must_use]
    pub fn new(standards: Standards) -> Self {
        Self { standards }
    }
}

impl Component for EarthFaultCheck {
    type Input = LoopImpedanceInput;
    type Output = EarthFaultReport;
    type Error = DesignError;

    fn call(&self, input: Self::Input) -> Result<Self::Output, Self::Error> {
        check_loop_impedance(&self.standards, &input)
    }
}
