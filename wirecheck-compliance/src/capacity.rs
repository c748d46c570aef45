use serde::Serialize;
use uom::si::{
    electric_current::ampere,
    electrical_resistance::ohm,
    f64::{ElectricCurrent, Length},
    thermodynamic_temperature::degree_celsius,
};
use wirecheck_core::Component;
use wirecheck_tables::{CrossSection, Insulation, Standards, TripCurve, regulation};

use crate::{
    EarthFaultReport, InstallationContext, LoopImpedanceInput, VoltageDropInput,
    VoltageDropReport,
    citations::Citations,
    earth_fault::{check_loop_impedance, estimate_loop_impedance},
    error::{DesignError, non_negative, positive},
    voltage_drop::voltage_drop,
};

/// A candidate cable and breaker for a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CableCheck {
    pub size: CrossSection,
    /// Design current `Ib`.
    pub design_current: ElectricCurrent,
    /// Breaker rating `In`.
    pub device_rating: ElectricCurrent,
    pub curve: TripCurve,
    /// One-way route length.
    pub length: Length,
    pub context: InstallationContext,
}

impl CableCheck {
    /// Creates a check with a type B breaker in the default installation context.
    #[must_use]
    pub fn new(
        size: CrossSection,
        design_current: ElectricCurrent,
        device_rating: ElectricCurrent,
        length: Length,
    ) -> Self {
        Self {
            size,
            design_current,
            device_rating,
            curve: TripCurve::B,
            length,
            context: InstallationContext::default(),
        }
    }

    /// Returns `self` with the given trip curve, keeping other fields unchanged.
    #[must_use]
    pub fn with_curve(self, curve: TripCurve) -> Self {
        Self { curve, ..self }
    }

    /// Returns `self` with the given installation context, keeping other fields unchanged.
    #[must_use]
    pub fn with_context(self, context: InstallationContext) -> Self {
        Self { context, ..self }
    }
}

/// Full compliance verdict for one cable and breaker combination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceResult {
    pub size: CrossSection,
    pub design_current: ElectricCurrent,
    pub device_rating: ElectricCurrent,
    /// Tabulated capacity `It`.
    pub tabulated_capacity: ElectricCurrent,
    /// Derated capacity `Iz = It × Ca × Cg`, unrounded.
    pub derated_capacity: ElectricCurrent,
    /// Ambient temperature factor `Ca`.
    pub temperature_factor: f64,
    /// Grouping factor `Cg`.
    pub grouping_factor: f64,
    /// `Ib ≤ In`.
    pub design_within_rating: bool,
    /// `In ≤ Iz`.
    pub rating_within_capacity: bool,
    pub voltage_drop: VoltageDropReport,
    pub earth_fault: EarthFaultReport,
    /// Headroom of `Iz` over `In`, in percent of `In`.
    pub safety_margin: f64,
    pub overall_compliant: bool,
    pub equation: String,
    pub regulations: Vec<&'static str>,
}

impl ComplianceResult {
    /// Returns `true` if the cable is protected against overload (`Ib ≤ In ≤ Iz`).
    #[must_use]
    pub fn capacity_compliant(&self) -> bool {
        self.design_within_rating && self.rating_within_capacity
    }

    /// Derated capacity in amperes, rounded to one decimal place for display.
    #[must_use]
    pub fn iz_rounded(&self) -> f64 {
        (self.derated_capacity.get::<ampere>() * 10.0).round() / 10.0
    }
}

/// Checks a cable and breaker against overload, voltage drop and
/// earth-fault requirements.
///
/// The overload check uses the exact derated capacity. Voltage drop is
/// computed at the design current.
///
/// # Errors
///
/// Returns [`DesignError::InvalidInput`] for non-positive currents or
/// voltage, a negative length or an invalid installation context. Returns a
/// table error for a non-standard size or rating, or an untabulated cell.
pub fn capacity(standards: &Standards, check: &CableCheck) -> Result<ComplianceResult, DesignError> {
    let design_current = positive("design current", check.design_current)?;
    positive("device rating", check.device_rating)?;
    non_negative("length", check.length)?;
    check.context.validate()?;
    let device_rating = standards.device_rating(check.device_rating)?;

    let context = &check.context;
    let tabulated_capacity =
        standards.tabulated_capacity(check.size, context.method, context.insulation)?;
    let temperature_factor = standards.temperature_factor(context.ambient);
    let grouping_factor = standards.grouping_factor(context.grouping);
    let derated_capacity = tabulated_capacity * temperature_factor * grouping_factor;

    let design_within_rating = design_current <= device_rating;
    let rating_within_capacity = device_rating <= derated_capacity;

    let ib = design_current.get::<ampere>();
    let rating = device_rating.get::<ampere>();
    let it = tabulated_capacity.get::<ampere>();
    let iz = derated_capacity.get::<ampere>();
    let safety_margin = (iz - rating) / rating * 100.0;

    let voltage_drop = voltage_drop(
        standards,
        &VoltageDropInput::new(design_current, check.length, check.size, context.voltage)
            .with_phases(context.phases)
            .with_category(context.category),
    )?;

    let loop_impedance = estimate_loop_impedance(
        standards,
        context.external_impedance,
        check.size,
        check.length,
    )?;
    let earth_fault = check_loop_impedance(
        standards,
        &LoopImpedanceInput {
            rating: device_rating,
            curve: check.curve,
            loop_impedance,
        },
    )?;

    let overall_compliant = design_within_rating
        && rating_within_capacity
        && voltage_drop.compliant
        && earth_fault.compliant;

    let ambient = context.ambient.get::<degree_celsius>();
    let equation = [
        format!(
            "Iz = It × Ca × Cg = {it} × {temperature_factor} × {grouping_factor} = {iz:.1} A \
             ({} mm², method {}, {}, {ambient} °C, {} circuits)",
            check.size.mm2(),
            context.method,
            context.insulation,
            context.grouping,
        ),
        format!(
            "Ib ≤ In: {ib} A ≤ {rating} A {}",
            verdict(design_within_rating)
        ),
        format!(
            "In ≤ Iz: {rating} A ≤ {iz:.1} A {}",
            verdict(rating_within_capacity)
        ),
        format!("{} {}", voltage_drop.equation, verdict(voltage_drop.compliant)),
        format!(
            "Zs = {:.3} Ω ≤ {} Ω {}",
            earth_fault.loop_impedance.get::<ohm>(),
            earth_fault.max_zs.get::<ohm>(),
            verdict(earth_fault.compliant)
        ),
    ]
    .join("\n");

    let mut citations = Citations::default();
    citations.cite_all(&[
        match context.insulation {
            Insulation::Thermoplastic => regulation::CAPACITY_THERMOPLASTIC,
            Insulation::Thermosetting => regulation::CAPACITY_THERMOSETTING,
        },
        regulation::AMBIENT_TEMPERATURE_FACTOR,
        regulation::GROUPING_FACTOR,
        regulation::OVERLOAD_COORDINATION,
    ]);
    citations.cite_all(&voltage_drop.regulations);
    citations.cite_all(&[regulation::DISCONNECTION_TIME, regulation::MAX_LOOP_IMPEDANCE]);

    Ok(ComplianceResult {
        size: check.size,
        design_current,
        device_rating,
        tabulated_capacity,
        derated_capacity,
        temperature_factor,
        grouping_factor,
        design_within_rating,
        rating_within_capacity,
        voltage_drop,
        earth_fault,
        safety_margin,
        overall_compliant,
        equation,
        regulations: citations.into_vec(),
    })
}

fn verdict(pass: bool) -> &'static str {
    if pass { "PASS" } else { "FAIL" }
}

/// The cable capacity calculator as a [`Component`].
#[derive(Debug, Clone, Default)]
pub struct CableCapacity {
    standards: Standards,
}

impl CableCapacity {
    #[must_use]
    pub fn new(standards: Standards) -> Self {
        Self { standards }
    }
}

impl Component for CableCapacity {
    type Input = CableCheck;
    type Output = ComplianceResult;
    type Error = DesignError;

    fn call(&self, input: Self::Input) -> Result<Self::Output, Self::Error> {
        capacity(&self.standards, &input)
    }
}
