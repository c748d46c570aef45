use serde::Serialize;
use uom::si::{
    electric_potential::volt,
    electrical_resistance::ohm,
    f64::{ElectricPotential, ElectricalResistance, ThermodynamicTemperature},
    thermodynamic_temperature::degree_celsius,
};
use wirecheck_tables::{InstallationMethod, Insulation, LoadCategory, PhaseConfig};

use crate::error::{DesignError, finite, non_negative, positive};

/// Conditions under which a cable is installed.
///
/// The [`Default`] context is a 230 V single-phase lighting circuit clipped
/// direct (method C) in 30 °C ambient, not grouped, with 70 °C
/// thermoplastic insulation and a 0.35 Ω external loop impedance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InstallationContext {
    pub ambient: ThermodynamicTemperature,
    /// Number of circuits grouped together, including this one.
    pub grouping: u32,
    pub method: InstallationMethod,
    pub insulation: Insulation,
    /// Supply voltage; line-to-line for three-phase circuits.
    pub voltage: ElectricPotential,
    pub phases: PhaseConfig,
    pub category: LoadCategory,
    /// External earth-fault loop impedance `Ze`.
    pub external_impedance: ElectricalResistance,
}

impl Default for InstallationContext {
    fn default() -> Self {
        Self {
            ambient: ThermodynamicTemperature::new::<degree_celsius>(30.0),
            grouping: 1,
            method: InstallationMethod::C,
            insulation: Insulation::Thermoplastic,
            voltage: ElectricPotential::new::<volt>(230.0),
            phases: PhaseConfig::Single,
            category: LoadCategory::Lighting,
            external_impedance: ElectricalResistance::new::<ohm>(0.35),
        }
    }
}

impl InstallationContext {
    /// Returns `self` with the given ambient temperature, keeping other fields unchanged.
    #[must_use]
    pub fn with_ambient(self, ambient: ThermodynamicTemperature) -> Self {
        Self { ambient, ..self }
    }

    /// Returns `self` with the given number of grouped circuits, keeping other fields unchanged.
    #[must_use]
    pub fn with_grouping(self, grouping: u32) -> Self {
        Self { grouping, ..self }
    }

    /// Returns `self` with the given installation method, keeping other fields unchanged.
    #[must_use]
    pub fn with_method(self, method: InstallationMethod) -> Self {
        Self { method, ..self }
    }

    /// Returns `self` with the given insulation class, keeping other fields unchanged.
    #[must_use]
    pub fn with_insulation(self, insulation: Insulation) -> Self {
        Self { insulation, ..self }
    }

    /// Returns `self` with the given supply voltage, keeping other fields unchanged.
    #[must_use]
    pub fn with_voltage(self, voltage: ElectricPotential) -> Self {
        Self { voltage, ..self }
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

    /// Returns `self` with the given external loop impedance, keeping other fields unchanged.
    #[must_use]
    pub fn with_external_impedance(self, external_impedance: ElectricalResistance) -> Self {
        Self {
            external_impedance,
            ..self
        }
    }

    /// Checks the context's numeric invariants.
    pub(crate) fn validate(&self) -> Result<(), DesignError> {
        finite("ambient temperature", self.ambient.get::<degree_celsius>())?;
        positive("supply voltage", self.voltage)?;
        positive("grouping circuit count", self.grouping)?;
        non_negative("external loop impedance", self.external_impedance)?;
        Ok(())
    }
}
