use serde::Serialize;
use uom::si::{
    electric_current::ampere,
    electric_potential::volt,
    f64::{ElectricCurrent, ElectricPotential, Length},
    length::meter,
};
use wirecheck_core::Component;
use wirecheck_tables::{CrossSection, LoadCategory, PhaseConfig, Standards, regulation};

use crate::error::{DesignError, non_negative, positive};

/// A run of cable carrying a steady current.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VoltageDropInput {
    pub current: ElectricCurrent,
    /// One-way route length.
    pub length: Length,
    pub size: CrossSection,
    pub voltage: ElectricPotential,
    pub phases: PhaseConfig,
    pub category: LoadCategory,
}

impl VoltageDropInput {
    /// Creates a single-phase lighting run at the given supply voltage.
    #[must_use]
    pub fn new(
        current: ElectricCurrent,
        length: Length,
        size: CrossSection,
        voltage: ElectricPotential,
    ) -> Self {
        Self {
            current,
            length,
            size,
            voltage,
            phases: PhaseConfig::Single,
            category: LoadCategory::Lighting,
        }
    }

    /// Returns `self` with the given phase configuration, keeping other fields unchanged.
    #[must_use]
    pub fn with_phases(self, phases: PhaseConfig) -> Self {
        Self { phases, ..self }
    }

    /// Returns `self` with the given load category, keeping other fields unchanged.
    #[must_use]
    pub fn with_category(self, category: LoadCategory) -> Self {
        Self { category, ..self }
    }
}

/// Voltage drop along a run and its verdict against the category ceiling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoltageDropReport {
    pub volts: ElectricPotential,
    /// Drop as a percentage of the supply voltage.
    pub percent: f64,
    /// Ceiling for the load category, in percent.
    pub max_allowed: f64,
    pub compliant: bool,
    pub equation: String,
    pub regulations: Vec<&'static str>,
}

/// Computes the voltage drop of a run from the tabulated mV/A/m constant.
///
/// Three-phase runs scale the constant by `√3`.
///
/// # Errors
///
/// Returns [`DesignError::InvalidInput`] for a non-positive current or
/// voltage or a negative length, and a table error if the size has no
/// tabulated constant.
pub fn voltage_drop(
    standards: &Standards,
    input: &VoltageDropInput,
) -> Result<VoltageDropReport, DesignError> {
    let current = positive("current", input.current)?.get::<ampere>();
    let length = non_negative("length", input.length)?.get::<meter>();
    let supply = positive("supply voltage", input.voltage)?.get::<volt>();

    let tabulated = standards.mv_per_amp_metre(input.size)?;
    let (mv_per_amp_metre, phase_note) = match input.phases {
        PhaseConfig::Single => (tabulated, String::new()),
        PhaseConfig::Three => (tabulated * 3_f64.sqrt(), " × √3".to_owned()),
    };

    let volts = mv_per_amp_metre * current * length / 1000.0;
    let percent = volts / supply * 100.0;
    let max_allowed = standards.voltage_drop_limit(input.category);

    let equation = format!(
        "Vd = {tabulated} mV/A/m{phase_note} × {current} A × {length} m / 1000 = {volts:.2} V \
         ({percent:.2}% of {supply} V, limit {max_allowed}%)"
    );

    Ok(VoltageDropReport {
        volts: ElectricPotential::new::<volt>(volts),
        percent,
        max_allowed,
        compliant: percent <= max_allowed,
        equation,
        regulations: vec![
            regulation::VOLTAGE_DROP_CONSTANTS,
            regulation::VOLTAGE_DROP_LIMITS,
        ],
    })
}

/// The voltage drop calculator as a [`Component`].
#[derive(Debug, Clone, Default)]
pub struct VoltageDrop {
    standards: Standards,
}

impl VoltageDrop {
    #[must_use]
    pub fn new(standards: Standards) -> Self {
        Self { standards }
    }
}

impl Component for VoltageDrop {
    type Input = VoltageDropInput;
    type Output = VoltageDropReport;
    type Error = DesignError;

    fn call(&self, input: Self::Input) -> Result<Self::Output, Self::Error> {
        voltage_drop(&self.standards, &input)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use wirecheck_tables::TableError;

    use super::*;

    fn run(current: f64, length: f64, size: f64) -> VoltageDropInput {
        VoltageDropInput::new(
            ElectricCurrent::new::<ampere>(current),
            Length::new::<meter>(length),
            CrossSection::new(size).unwrap(),
            ElectricPotential::new::<volt>(230.0),
        )
    }

    #[test]
    fn long_six_square_run_exceeds_lighting_limit() {
        let report = voltage_drop(&Standards::bs7671(), &run(32.0, 50.0, 6.0)).unwrap();

        assert_relative_eq!(report.volts.get::<volt>(), 11.68, epsilon = 1e-9);
        assert_relative_eq!(report.percent, 5.078_260_869_565_217, epsilon = 1e-9);
        assert_relative_eq!(report.max_allowed, 3.0);
        assert!(!report.compliant);
        assert!(report.equation.contains("11.68 V"));
    }

    #[test]
    fn other_loads_get_the_wider_limit() {
        let standards = Standards::bs7671();
        let input = run(32.0, 30.0, 6.0).with_category(LoadCategory::Other);
        let report = voltage_drop(&standards, &input).unwrap();

        assert_relative_eq!(report.max_allowed, 5.0);
        assert!(report.compliant);
    }

    #[test]
    fn three_phase_scales_the_constant() {
        let standards = Standards::bs7671();
        let single = voltage_drop(&standards, &run(20.0, 10.0, 4.0)).unwrap();
        let three = voltage_drop(
            &standards,
            &run(20.0, 10.0, 4.0).with_phases(PhaseConfig::Three),
        )
        .unwrap();

        assert_relative_eq!(
            three.volts.get::<volt>(),
            single.volts.get::<volt>() * 3_f64.sqrt(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn zero_length_has_no_drop() {
        let report = voltage_drop(&Standards::bs7671(), &run(10.0, 0.0, 1.5)).unwrap();
        assert_relative_eq!(report.percent, 0.0);
        assert!(report.compliant);
    }

    #[test]
    fn missing_constant_is_not_compliant() {
        let mut standards = Standards::bs7671();
        standards.conductors[3].mv_per_amp_metre = None;

        let err = voltage_drop(&standards, &run(32.0, 10.0, 6.0)).unwrap_err();
        assert!(matches!(
            err,
            DesignError::Table(TableError::UnsupportedSize { .. })
        ));
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        let standards = Standards::bs7671();
        assert!(matches!(
            voltage_drop(&standards, &run(0.0, 10.0, 6.0)),
            Err(DesignError::InvalidInput { field: "current", .. })
        ));
        assert!(matches!(
            voltage_drop(&standards, &run(10.0, -1.0, 6.0)),
            Err(DesignError::InvalidInput { field: "length", .. })
        ));
    }

    #[test]
    fn component_matches_function() {
        let component = VoltageDrop::default();
        let input = run(16.0, 25.0, 2.5);
        assert_eq!(
            component.call(input).unwrap(),
            voltage_drop(&Standards::bs7671(), &input).unwrap()
        );
    }
}
