use std::path::Path;

use serde::{Deserialize, Serialize};
use uom::si::{
    electric_current::ampere,
    electrical_resistance::ohm,
    f64::{ElectricCurrent, ElectricalResistance, ThermodynamicTemperature},
    thermodynamic_temperature::degree_celsius,
};
use wirecheck_core::constraint::{StrictlyPositive, UnitIntervalLeftOpen};

use crate::{
    CrossSection, DeviceKind, InstallationMethod, Insulation, LoadCategory, TableError,
    TripCurve, bs7671,
};

/// Tolerance used when matching a requested size or rating against a ladder.
const LADDER_TOLERANCE: f64 = 1e-9;

/// A complete set of wiring-regulation reference data.
///
/// A `Standards` value is read-only configuration shared by every
/// calculator. Swapping it swaps the national standard without touching any
/// algorithm.
///
/// Ladders are stored in ascending order. Missing table cells are `None`,
/// never zero, and surface as [`TableError`] when looked up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standards {
    /// Human-readable name, cited in reports.
    pub name: String,

    /// Standard conductor sizes with their tabulated data, ascending by size.
    pub conductors: Vec<ConductorData>,

    /// Standard protective device ratings in amperes, ascending.
    pub device_ratings: Vec<f64>,

    /// Ambient temperature rating factors, banded by °C.
    pub temperature_factors: BandTable,

    /// Grouping rating factors, banded by number of circuits.
    pub grouping_factors: BandTable,

    /// Maximum earth-fault loop impedance by device rating and curve.
    pub max_zs: Vec<MaxZsRow>,

    pub magnetic_multipliers: MagneticMultipliers,
    pub voltage_drop_limits: VoltageDropLimits,
    pub selectivity: SelectivityRules,
    pub earth_fault: EarthFaultRules,
}

/// Tabulated data for one standard conductor size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConductorData {
    /// Nominal cross-sectional area in mm².
    pub size: f64,
    /// Capacities (A) for 70 °C thermoplastic insulation.
    pub thermoplastic: MethodCapacities,
    /// Capacities (A) for 90 °C thermosetting insulation.
    pub thermosetting: MethodCapacities,
    /// Voltage drop in mV per ampere per metre.
    pub mv_per_amp_metre: Option<f64>,
    /// Conductor resistance at 20 °C in mΩ per metre.
    pub resistance: Option<f64>,
}

/// Tabulated current-carrying capacity (A) by reference installation method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MethodCapacities {
    pub a: Option<f64>,
    pub b: Option<f64>,
    pub c: Option<f64>,
}

impl MethodCapacities {
    fn get(&self, method: InstallationMethod) -> Option<f64> {
        match method {
            InstallationMethod::A => self.a,
            InstallationMethod::B => self.b,
            InstallationMethod::C => self.c,
        }
    }

    fn values(&self) -> [Option<f64>; 3] {
        [self.a, self.b, self.c]
    }
}

/// A banded factor lookup.
///
/// Bands are checked in order; the first band whose `up_to` bound is greater
/// than or equal to the key supplies the factor. Keys beyond the last band
/// take `otherwise`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandTable {
    pub bands: Vec<Band>,
    pub otherwise: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    /// Inclusive upper bound of the band.
    pub up_to: f64,
    pub factor: f64,
}

impl BandTable {
    fn lookup(&self, within: impl Fn(f64) -> bool) -> f64 {
        self.bands
            .iter()
            .find(|band| within(band.up_to))
            .map_or(self.otherwise, |band| band.factor)
    }
}

/// Maximum earth-fault loop impedance (Ω) for one device rating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaxZsRow {
    /// Device rating in amperes.
    pub rating: f64,
    pub b: Option<f64>,
    pub c: Option<f64>,
    pub d: Option<f64>,
}

impl MaxZsRow {
    fn get(&self, curve: TripCurve) -> Option<f64> {
        match curve {
            TripCurve::B => self.b,
            TripCurve::C => self.c,
            TripCurve::D => self.d,
        }
    }
}

/// Magnetic trip current as a multiple of the device rating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MagneticMultipliers {
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub fuse: f64,
    pub mccb: f64,
}

/// Voltage drop ceilings as a percentage of the supply voltage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoltageDropLimits {
    pub lighting: f64,
    pub other: f64,
}

/// Fixed thresholds used by the selectivity rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectivityRules {
    /// Minimum upstream-to-downstream rating ratio.
    pub min_ratio: f64,
    /// Upstream rating must exceed this multiple of the downstream rating.
    pub overload_factor: f64,
    /// Required operating-time margin in seconds.
    pub time_margin: f64,
    /// Operating time in seconds above the magnetic trip current.
    pub magnetic_time: f64,
    /// Operating time in seconds at or below the magnetic trip current.
    pub thermal_time: f64,
    /// Fraction of the upstream magnetic trip that bounds the selectivity limit.
    pub upstream_limit_factor: f64,
    /// Multiple of the downstream magnetic trip that bounds the selectivity limit.
    pub downstream_limit_factor: f64,
    /// Fault currents at or above this fraction of the limit are flagged as marginal.
    pub marginal_limit_fraction: f64,
}

/// Parameters of the earth-fault loop impedance estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EarthFaultRules {
    /// Required disconnection time for final circuits, in seconds.
    pub disconnection_time: f64,
    /// Multiplier correcting 20 °C resistance to conductor operating temperature.
    pub operating_temperature_factor: f64,
}

impl Default for Standards {
    fn default() -> Self {
        Self::bs7671()
    }
}

impl Standards {
    /// Returns the built-in BS 7671 data set.
    #[must_use]
    pub fn bs7671() -> Self {
        bs7671::standards()
    }

    /// Parses and validates a standards table from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Parse`] if the text does not match the schema and
    /// [`TableError::Invalid`] if the table breaks a structural invariant.
    pub fn from_toml_str(text: &str) -> Result<Self, TableError> {
        let standards: Self = toml::from_str(text)?;
        standards.validate()?;
        Ok(standards)
    }

    /// Reads, parses and validates a standards table from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Io`] if the file cannot be read, otherwise as
    /// [`Standards::from_toml_str`].
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Checks the structural invariants every calculator relies on.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Invalid`] describing the first violation found.
    pub fn validate(&self) -> Result<(), TableError> {
        if self.conductors.is_empty() {
            return Err(TableError::invalid("conductor ladder is empty"));
        }
        if self.device_ratings.is_empty() {
            return Err(TableError::invalid("device rating ladder is empty"));
        }
        ascending("conductor ladder", self.conductors.iter().map(|c| c.size))?;
        ascending("device rating ladder", self.device_ratings.iter().copied())?;
        ascending("max Zs table", self.max_zs.iter().map(|row| row.rating))?;

        for conductor in &self.conductors {
            let size = conductor.size;
            positive(&format!("size {size} mm²"), size)?;
            let cells = conductor
                .thermoplastic
                .values()
                .into_iter()
                .chain(conductor.thermosetting.values())
                .chain([conductor.mv_per_amp_metre, conductor.resistance]);
            for value in cells.flatten() {
                positive(&format!("table value for {size} mm²"), value)?;
            }
        }

        for &rating in &self.device_ratings {
            positive("device rating", rating)?;
        }

        for row in &self.max_zs {
            for value in [row.b, row.c, row.d].into_iter().flatten() {
                positive(&format!("max Zs for {} A", row.rating), value)?;
            }
        }

        for (label, table) in [
            ("temperature", &self.temperature_factors),
            ("grouping", &self.grouping_factors),
        ] {
            ascending(
                &format!("{label} bands"),
                table.bands.iter().map(|band| band.up_to),
            )?;
            let factors = table.bands.iter().map(|band| band.factor);
            for factor in factors.chain([table.otherwise]) {
                UnitIntervalLeftOpen::new(factor).map_err(|err| {
                    TableError::invalid(format!("{label} factor {factor}: {err}"))
                })?;
            }
        }

        let MagneticMultipliers {
            b,
            c,
            d,
            fuse,
            mccb,
        } = self.magnetic_multipliers;
        for multiplier in [b, c, d, fuse, mccb] {
            positive("magnetic multiplier", multiplier)?;
        }

        positive("lighting voltage drop limit", self.voltage_drop_limits.lighting)?;
        positive("other voltage drop limit", self.voltage_drop_limits.other)?;

        let rules = &self.selectivity;
        for (label, value) in [
            ("minimum selectivity ratio", rules.min_ratio),
            ("overload factor", rules.overload_factor),
            ("time margin", rules.time_margin),
            ("magnetic operating time", rules.magnetic_time),
            ("thermal operating time", rules.thermal_time),
            ("upstream limit factor", rules.upstream_limit_factor),
            ("downstream limit factor", rules.downstream_limit_factor),
            ("marginal limit fraction", rules.marginal_limit_fraction),
        ] {
            positive(label, value)?;
        }

        positive("disconnection time", self.earth_fault.disconnection_time)?;
        positive(
            "operating temperature factor",
            self.earth_fault.operating_temperature_factor,
        )?;

        Ok(())
    }

    /// Iterates the conductor ladder in ascending order.
    pub fn conductor_sizes(&self) -> impl DoubleEndedIterator<Item = CrossSection> + '_ {
        self.conductors
            .iter()
            .map(|conductor| CrossSection::from_table(conductor.size))
    }

    /// Returns the tabulated data for a standard conductor size.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidSize`] if the size is not on the ladder.
    pub fn conductor(&self, size: CrossSection) -> Result<&ConductorData, TableError> {
        self.conductors
            .iter()
            .find(|conductor| size.matches(conductor.size))
            .ok_or(TableError::InvalidSize { size: size.mm2() })
    }

    /// Returns the tabulated current-carrying capacity `It`.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidSize`] for a non-standard size and
    /// [`TableError::UnsupportedConfiguration`] if the cell is not tabulated.
    pub fn tabulated_capacity(
        &self,
        size: CrossSection,
        method: InstallationMethod,
        insulation: Insulation,
    ) -> Result<ElectricCurrent, TableError> {
        let conductor = self.conductor(size)?;
        let column = match insulation {
            Insulation::Thermoplastic => &conductor.thermoplastic,
            Insulation::Thermosetting => &conductor.thermosetting,
        };
        column
            .get(method)
            .map(ElectricCurrent::new::<ampere>)
            .ok_or(TableError::UnsupportedConfiguration {
                size: size.mm2(),
                method,
                insulation,
            })
    }

    /// Returns the voltage drop constant in mV/A/m.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidSize`] for a non-standard size and
    /// [`TableError::UnsupportedSize`] if no constant is tabulated.
    pub fn mv_per_amp_metre(&self, size: CrossSection) -> Result<f64, TableError> {
        self.conductor(size)?
            .mv_per_amp_metre
            .ok_or(TableError::UnsupportedSize {
                size: size.mm2(),
                quantity: "voltage drop constant",
            })
    }

    /// Returns the conductor resistance at 20 °C in mΩ/m.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidSize`] for a non-standard size and
    /// [`TableError::UnsupportedSize`] if no resistance is tabulated.
    pub fn resistance(&self, size: CrossSection) -> Result<f64, TableError> {
        self.conductor(size)?
            .resistance
            .ok_or(TableError::UnsupportedSize {
                size: size.mm2(),
                quantity: "conductor resistance",
            })
    }

    /// Returns the ambient temperature rating factor `Ca`.
    #[must_use]
    pub fn temperature_factor(&self, ambient: ThermodynamicTemperature) -> f64 {
        self.temperature_factors
            .lookup(|up_to| ambient <= ThermodynamicTemperature::new::<degree_celsius>(up_to))
    }

    /// Returns the grouping rating factor `Cg`.
    #[must_use]
    pub fn grouping_factor(&self, circuits: u32) -> f64 {
        self.grouping_factors
            .lookup(|up_to| f64::from(circuits) <= up_to)
    }

    /// Confirms a rating is on the standard device ladder.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidRating`] if it is not.
    pub fn device_rating(&self, rating: ElectricCurrent) -> Result<ElectricCurrent, TableError> {
        let amps = rating.get::<ampere>();
        self.device_ratings
            .iter()
            .find(|&&standard| (standard - amps).abs() < LADDER_TOLERANCE)
            .map(|&standard| ElectricCurrent::new::<ampere>(standard))
            .ok_or(TableError::InvalidRating { rating: amps })
    }

    /// Returns the smallest standard rating not less than `current`, if any.
    #[must_use]
    pub fn next_device_rating(&self, current: ElectricCurrent) -> Option<ElectricCurrent> {
        let amps = current.get::<ampere>();
        self.device_ratings
            .iter()
            .find(|&&rating| rating >= amps)
            .map(|&rating| ElectricCurrent::new::<ampere>(rating))
    }

    /// Returns the largest standard rating.
    #[must_use]
    pub fn largest_device_rating(&self) -> Option<ElectricCurrent> {
        self.device_ratings
            .last()
            .map(|&rating| ElectricCurrent::new::<ampere>(rating))
    }

    /// Returns the maximum earth-fault loop impedance for a breaker.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::UnsupportedDeviceRating`] if the combination is
    /// not tabulated.
    pub fn max_zs(
        &self,
        rating: ElectricCurrent,
        curve: TripCurve,
    ) -> Result<ElectricalResistance, TableError> {
        let amps = rating.get::<ampere>();
        self.max_zs
            .iter()
            .find(|row| (row.rating - amps).abs() < LADDER_TOLERANCE)
            .and_then(|row| row.get(curve))
            .map(ElectricalResistance::new::<ohm>)
            .ok_or(TableError::UnsupportedDeviceRating {
                rating: amps,
                curve,
            })
    }

    /// Returns the magnetic trip multiplier for a device.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::MissingTripCurve`] if a breaker has no curve.
    pub fn magnetic_multiplier(
        &self,
        kind: DeviceKind,
        curve: Option<TripCurve>,
    ) -> Result<f64, TableError> {
        let multipliers = &self.magnetic_multipliers;
        match kind {
            DeviceKind::Fuse => Ok(multipliers.fuse),
            DeviceKind::Mccb => Ok(multipliers.mccb),
            DeviceKind::Mcb | DeviceKind::Rcbo => match curve {
                Some(TripCurve::B) => Ok(multipliers.b),
                Some(TripCurve::C) => Ok(multipliers.c),
                Some(TripCurve::D) => Ok(multipliers.d),
                None => Err(TableError::MissingTripCurve { kind }),
            },
        }
    }

    /// Returns the voltage drop ceiling in percent.
    #[must_use]
    pub fn voltage_drop_limit(&self, category: LoadCategory) -> f64 {
        match category {
            LoadCategory::Lighting => self.voltage_drop_limits.lighting,
            LoadCategory::Other => self.voltage_drop_limits.other,
        }
    }
}

fn positive(label: &str, value: f64) -> Result<(), TableError> {
    StrictlyPositive::new(value)
        .map(|_| ())
        .map_err(|err| TableError::invalid(format!("{label} ({value}): {err}")))
}

fn ascending(label: &str, values: impl Iterator<Item = f64>) -> Result<(), TableError> {
    let mut previous: Option<f64> = None;
    for value in values {
        if !value.is_finite() {
            return Err(TableError::invalid(format!("{label} contains {value}")));
        }
        if let Some(prev) = previous {
            if value <= prev {
                return Err(TableError::invalid(format!(
                    "{label} must be strictly ascending ({value} follows {prev})"
                )));
            }
        }
        previous = Some(value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn size(mm2: f64) -> CrossSection {
        CrossSection::new(mm2).unwrap()
    }

    fn amps(value: f64) -> ElectricCurrent {
        ElectricCurrent::new::<ampere>(value)
    }

    fn celsius(value: f64) -> ThermodynamicTemperature {
        ThermodynamicTemperature::new::<degree_celsius>(value)
    }

    #[test]
    fn builtin_tables_are_valid() {
        Standards::bs7671().validate().unwrap();
    }

    #[test]
    fn capacity_is_keyed_by_method_and_insulation() {
        let standards = Standards::bs7671();
        let lookup = |method, insulation| {
            standards
                .tabulated_capacity(size(1.5), method, insulation)
                .unwrap()
                .get::<ampere>()
        };

        assert_relative_eq!(lookup(InstallationMethod::C, Insulation::Thermoplastic), 19.5);
        assert_relative_eq!(lookup(InstallationMethod::A, Insulation::Thermoplastic), 14.5);
        assert_relative_eq!(lookup(InstallationMethod::C, Insulation::Thermosetting), 27.0);
    }

    #[test]
    fn non_standard_size_is_invalid() {
        let err = Standards::bs7671()
            .tabulated_capacity(size(3.0), InstallationMethod::C, Insulation::Thermoplastic)
            .unwrap_err();
        assert!(matches!(err, TableError::InvalidSize { size } if size == 3.0));
    }

    #[test]
    fn missing_cell_is_unsupported_not_zero() {
        let mut standards = Standards::bs7671();
        standards.conductors[0].thermoplastic.a = None;
        standards.conductors[1].mv_per_amp_metre = None;

        assert!(matches!(
            standards.tabulated_capacity(size(1.5), InstallationMethod::A, Insulation::Thermoplastic),
            Err(TableError::UnsupportedConfiguration { .. })
        ));
        assert!(matches!(
            standards.mv_per_amp_metre(size(2.5)),
            Err(TableError::UnsupportedSize { .. })
        ));
    }

    #[test]
    fn temperature_bands_close_on_their_upper_bound() {
        let standards = Standards::bs7671();
        let cases = [
            (10.0, 1.0),
            (25.0, 1.0),
            (25.5, 0.94),
            (30.0, 0.94),
            (35.0, 0.87),
            (40.0, 0.79),
            (45.0, 0.71),
            (50.0, 0.61),
            (50.1, 0.5),
            (70.0, 0.5),
        ];
        for (ambient, expected) in cases {
            assert_relative_eq!(standards.temperature_factor(celsius(ambient)), expected);
        }
    }

    #[test]
    fn grouping_bands() {
        let standards = Standards::bs7671();
        let cases = [
            (1, 1.0),
            (2, 0.8),
            (3, 0.7),
            (4, 0.65),
            (6, 0.65),
            (7, 0.6),
            (9, 0.6),
            (10, 0.5),
            (40, 0.5),
        ];
        for (circuits, expected) in cases {
            assert_relative_eq!(standards.grouping_factor(circuits), expected);
        }
    }

    #[test]
    fn device_ladder() {
        let standards = Standards::bs7671();

        assert!(standards.device_rating(amps(32.0)).is_ok());
        assert!(matches!(
            standards.device_rating(amps(30.0)),
            Err(TableError::InvalidRating { .. })
        ));

        let next = |current| standards.next_device_rating(amps(current)).map(|r| r.get::<ampere>());
        assert_eq!(next(32.0), Some(32.0));
        assert_eq!(next(32.1), Some(40.0));
        assert_eq!(next(0.5), Some(6.0));
        assert_eq!(next(126.0), None);
        assert_eq!(
            standards.largest_device_rating().map(|r| r.get::<ampere>()),
            Some(125.0)
        );
    }

    #[test]
    fn max_zs_lookup() {
        let standards = Standards::bs7671();
        let zs = standards.max_zs(amps(32.0), TripCurve::B).unwrap();
        assert_relative_eq!(zs.get::<ohm>(), 1.44);

        assert!(matches!(
            standards.max_zs(amps(3.0), TripCurve::B),
            Err(TableError::UnsupportedDeviceRating { curve: TripCurve::B, .. })
        ));
    }

    #[test]
    fn magnetic_multipliers() {
        let standards = Standards::bs7671();
        let multiplier = |kind, curve| standards.magnetic_multiplier(kind, curve).unwrap();

        assert_relative_eq!(multiplier(DeviceKind::Mcb, Some(TripCurve::B)), 5.0);
        assert_relative_eq!(multiplier(DeviceKind::Rcbo, Some(TripCurve::C)), 10.0);
        assert_relative_eq!(multiplier(DeviceKind::Mcb, Some(TripCurve::D)), 20.0);
        assert_relative_eq!(multiplier(DeviceKind::Mccb, None), 10.0);
        assert!(matches!(
            standards.magnetic_multiplier(DeviceKind::Mcb, None),
            Err(TableError::MissingTripCurve { kind: DeviceKind::Mcb })
        ));
    }

    #[test]
    fn validation_rejects_broken_tables() {
        let mut unordered = Standards::bs7671();
        unordered.conductors.swap(0, 1);
        assert!(matches!(unordered.validate(), Err(TableError::Invalid { .. })));

        let mut zero_cell = Standards::bs7671();
        zero_cell.conductors[2].thermoplastic.b = Some(0.0);
        assert!(matches!(zero_cell.validate(), Err(TableError::Invalid { .. })));

        let mut bad_factor = Standards::bs7671();
        bad_factor.grouping_factors.otherwise = 1.2;
        assert!(matches!(bad_factor.validate(), Err(TableError::Invalid { .. })));
    }

    #[test]
    fn validation_rejects_non_finite_bounds() {
        let mut nan_rating = Standards::bs7671();
        nan_rating.max_zs[3].rating = f64::NAN;
        assert!(matches!(nan_rating.validate(), Err(TableError::Invalid { .. })));

        let mut nan_band = Standards::bs7671();
        nan_band.temperature_factors.bands[2].up_to = f64::NAN;
        assert!(matches!(nan_band.validate(), Err(TableError::Invalid { .. })));

        let mut open_band = Standards::bs7671();
        let last = open_band.grouping_factors.bands.len() - 1;
        open_band.grouping_factors.bands[last].up_to = f64::INFINITY;
        assert!(matches!(open_band.validate(), Err(TableError::Invalid { .. })));
    }

    #[test]
    fn toml_round_trip_preserves_tables() {
        let standards = Standards::bs7671();
        let text = toml::to_string(&standards).unwrap();
        assert_eq!(Standards::from_toml_str(&text).unwrap(), standards);
    }
}
