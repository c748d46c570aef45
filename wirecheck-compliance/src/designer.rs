use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};
use uom::si::{
    electric_current::ampere,
    electrical_resistance::ohm,
    f64::{ElectricCurrent, Length, Power},
    length::meter,
    power::watt,
};
use wirecheck_core::Component;
use wirecheck_tables::{CrossSection, PhaseConfig, Standards, TableError, TripCurve, regulation};

use crate::{
    CableCheck, ComplianceResult, InstallationContext,
    capacity::capacity,
    citations::Citations,
    error::{DesignError, positive},
};

/// A circuit to be sized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DesignRequest {
    /// Real power drawn by the load.
    pub power: Power,
    /// One-way route length.
    pub distance: Length,
    pub curve: TripCurve,
    pub context: InstallationContext,
}

impl DesignRequest {
    /// Creates a request with a type B breaker in the default installation context.
    #[must_use]
    pub fn new(power: Power, distance: Length) -> Self {
        Self {
            power,
            distance,
            curve: TripCurve::B,
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

    /// Returns the design current `Ib` drawn by the load.
    #[must_use]
    pub fn design_current(&self) -> ElectricCurrent {
        let voltage = self.context.voltage;
        match self.context.phases {
            PhaseConfig::Single => self.power / voltage,
            PhaseConfig::Three => self.power / (voltage * 3_f64.sqrt()),
        }
    }
}

/// The conductor and breaker chosen for a circuit.
///
/// When `success` is false no standard size satisfied both the overload and
/// voltage drop checks, and `size` is the largest size that could be
/// evaluated. `warnings` always explains why.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DesignResult {
    pub success: bool,
    pub design_current: ElectricCurrent,
    pub device_rating: ElectricCurrent,
    pub curve: TripCurve,
    pub size: CrossSection,
    /// Verdict for the chosen size.
    pub compliance: ComplianceResult,
    pub candidates_evaluated: usize,
    pub warnings: Vec<String>,
    pub regulations: Vec<&'static str>,
}

/// Finds the smallest standard conductor that satisfies the overload and
/// voltage drop checks for a load.
///
/// Sizes are tried in ascending order and the first passing size is chosen.
/// Sizes without table data for the requested method and insulation are
/// skipped with a warning.
///
/// # Errors
///
/// Returns [`DesignError::InvalidInput`] for non-positive power, distance or
/// voltage. Returns a table error if the device ladder is empty or no size
/// in the ladder can be evaluated.
pub fn design(standards: &Standards, request: &DesignRequest) -> Result<DesignResult, DesignError> {
    positive("power", request.power)?;
    positive("distance", request.distance)?;
    request.context.validate()?;

    let design_current = request.design_current();
    let ib = design_current.get::<ampere>();
    let mut warnings = Vec::new();

    let device_rating = match standards.next_device_rating(design_current) {
        Some(rating) => rating,
        None => {
            let largest = standards
                .largest_device_rating()
                .ok_or_else(|| TableError::Invalid {
                    reason: "device rating ladder is empty".to_owned(),
                })?;
            let message = format!(
                "design current {ib:.1} A exceeds largest standard device ({} A)",
                largest.get::<ampere>()
            );
            warn!("{message}");
            warnings.push(message);
            largest
        }
    };

    let mut citations = Citations::default();
    citations.cite(regulation::OVERLOAD_COORDINATION);

    let mut candidates_evaluated = 0;
    let mut chosen: Option<ComplianceResult> = None;
    let mut largest_evaluated: Option<ComplianceResult> = None;
    let mut last_skip: Option<DesignError> = None;

    for size in standards.conductor_sizes() {
        let check = CableCheck::new(size, design_current, device_rating, request.distance)
            .with_curve(request.curve)
            .with_context(request.context);

        let result = match capacity(standards, &check) {
            Ok(result) => result,
            Err(DesignError::Table(
                err @ (TableError::UnsupportedConfiguration { .. }
                | TableError::UnsupportedSize { .. }),
            )) => {
                warn!(%size, "skipping candidate: {err}");
                warnings.push(format!("skipped {size}: {err}"));
                last_skip = Some(err.into());
                continue;
            }
            Err(err) => return Err(err),
        };

        candidates_evaluated += 1;
        citations.cite_all(&result.regulations);
        debug!(
            %size,
            iz = result.derated_capacity.get::<ampere>(),
            voltage_drop_percent = result.voltage_drop.percent,
            capacity_compliant = result.capacity_compliant(),
            voltage_drop_compliant = result.voltage_drop.compliant,
            "evaluated candidate"
        );

        if result.capacity_compliant() && result.voltage_drop.compliant {
            chosen = Some(result);
            break;
        }
        largest_evaluated = Some(result);
    }

    let (success, compliance) = match (chosen, largest_evaluated) {
        (Some(result), _) => (true, result),
        (None, Some(result)) => {
            let message = format!(
                "no standard conductor satisfies both overload and voltage drop; \
                 largest evaluated size {} shown, consult a specialist",
                result.size
            );
            warn!("{message}");
            warnings.push(message);
            (false, result)
        }
        (None, None) => {
            return Err(last_skip.unwrap_or_else(|| {
                TableError::Invalid {
                    reason: "conductor ladder is empty".to_owned(),
                }
                .into()
            }));
        }
    };

    if !compliance.voltage_drop.compliant {
        warnings.push(format!(
            "voltage drop {:.2}% exceeds the {}% limit",
            compliance.voltage_drop.percent, compliance.voltage_drop.max_allowed
        ));
    }
    if !compliance.earth_fault.compliant {
        warnings.push(format!(
            "estimated loop impedance {:.3} Ω exceeds the maximum {} Ω",
            compliance.earth_fault.loop_impedance.get::<ohm>(),
            compliance.earth_fault.max_zs.get::<ohm>()
        ));
    }

    info!(
        success,
        size = %compliance.size,
        ib,
        rating = device_rating.get::<ampere>(),
        candidates_evaluated,
        "designed {} W circuit over {} m",
        request.power.get::<watt>(),
        request.distance.get::<meter>()
    );

    Ok(DesignResult {
        success,
        design_current,
        device_rating,
        curve: request.curve,
        size: compliance.size,
        compliance,
        candidates_evaluated,
        warnings,
        regulations: citations.into_vec(),
    })
}

/// Designs independent circuits in parallel.
///
/// Results are returned in request order.
pub fn design_batch(
    standards: &Standards,
    requests: &[DesignRequest],
) -> Vec<Result<DesignResult, DesignError>> {
    requests
        .par_iter()
        .map(|request| design(standards, request))
        .collect()
}

/// The circuit designer as a [`Component`].
#[derive(Debug, Clone, Default)]
pub struct CircuitDesigner {
    standards: Standards,
}

impl CircuitDesigner {
    #[must_use]
    pub fn new(standards: Standards) -> Self {
        Self { standards }
    }

    /// Designs many circuits in parallel; see [`design_batch`].
    #[must_use]
    pub fn call_batch(&self, requests: &[DesignRequest]) -> Vec<Result<DesignResult, DesignError>> {
        design_batch(&self.standards, requests)
    }
}

impl Component for CircuitDesigner {
    type Input = DesignRequest;
    type Output = DesignResult;
    type Error = DesignError;

    fn call(&self, input: Self::Input) -> Result<Self::Output, Self::Error> {
        design(&self.standards, &input)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use uom::si::{
        electric_potential::volt, f64::ElectricPotential, f64::ThermodynamicTemperature,
        power::kilowatt, thermodynamic_temperature::degree_celsius,
    };
    use wirecheck_tables::{InstallationMethod, LoadCategory};

    use super::*;

    fn request(watts: f64, metres: f64) -> DesignRequest {
        DesignRequest::new(Power::new::<watt>(watts), Length::new::<meter>(metres))
    }

    #[test]
    fn thirty_two_amp_radial_needs_six_square() {
        let standards = Standards::bs7671();
        let result = design(&standards, &request(7360.0, 20.0)).unwrap();

        assert!(result.success);
        assert_relative_eq!(result.design_current.get::<ampere>(), 32.0);
        assert_relative_eq!(result.device_rating.get::<ampere>(), 32.0);
        assert_relative_eq!(result.size.mm2(), 6.0);
        assert_eq!(result.candidates_evaluated, 4);
        assert_relative_eq!(result.compliance.iz_rounded(), 43.2);
        assert_relative_eq!(result.compliance.voltage_drop.percent, 4.672 / 230.0 * 100.0, epsilon = 1e-9);
        assert!(result.warnings.is_empty());
        assert_eq!(result.regulations[0], regulation::OVERLOAD_COORDINATION);
    }

    #[test]
    fn four_square_fails_only_on_voltage_drop() {
        let standards = Standards::bs7671();
        let check = CableCheck::new(
            CrossSection::new(4.0).unwrap(),
            ElectricCurrent::new::<ampere>(32.0),
            ElectricCurrent::new::<ampere>(32.0),
            Length::new::<meter>(20.0),
        );
        let result = capacity(&standards, &check).unwrap();

        assert!(result.capacity_compliant());
        assert!(!result.voltage_drop.compliant);
    }

    #[test]
    fn chosen_size_is_the_smallest_that_passes() {
        let standards = Standards::bs7671();
        let cases = [
            (1000.0, 5.0, InstallationMethod::C, 30.0, 1),
            (3000.0, 15.0, InstallationMethod::B, 35.0, 2),
            (7360.0, 20.0, InstallationMethod::C, 30.0, 1),
            (9200.0, 35.0, InstallationMethod::A, 40.0, 4),
            (4600.0, 60.0, InstallationMethod::C, 25.0, 1),
        ];

        for (watts, metres, method, ambient, grouping) in cases {
            let context = InstallationContext::default()
                .with_method(method)
                .with_ambient(ThermodynamicTemperature::new::<degree_celsius>(ambient))
                .with_grouping(grouping)
                .with_category(LoadCategory::Other);
            let request = request(watts, metres).with_context(context);
            let result = design(&standards, &request).unwrap();
            assert!(result.success, "{watts} W over {metres} m");

            let smaller = standards
                .conductor_sizes()
                .take_while(|size| size.mm2() < result.size.mm2());
            for size in smaller {
                let check = CableCheck::new(
                    size,
                    result.design_current,
                    result.device_rating,
                    request.distance,
                )
                .with_context(context);
                let candidate = capacity(&standards, &check).unwrap();
                assert!(!(candidate.capacity_compliant() && candidate.voltage_drop.compliant));
            }
        }
    }

    #[test]
    fn chosen_result_matches_standalone_capacity() {
        let standards = Standards::bs7671();
        let request = request(5750.0, 25.0).with_curve(TripCurve::C);
        let result = design(&standards, &request).unwrap();

        let check = CableCheck::new(
            result.size,
            result.design_current,
            result.device_rating,
            request.distance,
        )
        .with_curve(TripCurve::C)
        .with_context(request.context);
        assert_eq!(capacity(&standards, &check).unwrap(), result.compliance);
    }

    #[test]
    fn three_phase_current_divides_by_root_three() {
        let context = InstallationContext::default()
            .with_voltage(ElectricPotential::new::<volt>(400.0))
            .with_phases(PhaseConfig::Three)
            .with_category(LoadCategory::Other);
        let request = DesignRequest::new(Power::new::<kilowatt>(20.0), Length::new::<meter>(30.0))
            .with_context(context);
        let result = design(&Standards::bs7671(), &request).unwrap();

        assert_relative_eq!(
            result.design_current.get::<ampere>(),
            20_000.0 / (400.0 * 3_f64.sqrt()),
            epsilon = 1e-9
        );
        assert_relative_eq!(result.device_rating.get::<ampere>(), 32.0);
        assert!(result.success);
    }

    #[test]
    fn oversized_load_falls_back_to_largest_size() {
        let result = design(&Standards::bs7671(), &request(40_000.0, 10.0)).unwrap();

        assert!(!result.success);
        assert_relative_eq!(result.device_rating.get::<ampere>(), 125.0);
        assert_relative_eq!(result.size.mm2(), 120.0);
        assert_eq!(result.candidates_evaluated, 12);
        assert!(!result.compliance.overall_compliant);
        assert!(
            result
                .warnings
                .iter()
                .any(|warning| warning.contains("exceeds largest standard device"))
        );
        assert!(
            result
                .warnings
                .iter()
                .any(|warning| warning.contains("consult a specialist"))
        );
    }

    #[test]
    fn untabulated_sizes_are_skipped() {
        let mut standards = Standards::bs7671();
        standards.conductors[0].thermoplastic.c = None;
        standards.conductors[1].thermoplastic.c = None;

        let result = design(&standards, &request(2300.0, 10.0)).unwrap();

        assert!(result.success);
        assert_relative_eq!(result.size.mm2(), 4.0);
        assert_eq!(result.candidates_evaluated, 1);
        assert_eq!(result.warnings.len(), 2);
    }

    #[test]
    fn nothing_evaluable_is_an_error() {
        let mut standards = Standards::bs7671();
        for conductor in &mut standards.conductors {
            conductor.thermoplastic.a = None;
        }
        let context = InstallationContext::default().with_method(InstallationMethod::A);

        let err = design(&standards, &request(2300.0, 10.0).with_context(context)).unwrap_err();
        assert!(matches!(
            err,
            DesignError::Table(TableError::UnsupportedConfiguration {
                method: InstallationMethod::A,
                ..
            })
        ));
    }

    #[test]
    fn invalid_requests_are_rejected() {
        let standards = Standards::bs7671();
        assert!(matches!(
            design(&standards, &request(0.0, 10.0)),
            Err(DesignError::InvalidInput { field: "power", .. })
        ));
        assert!(matches!(
            design(&standards, &request(1000.0, 0.0)),
            Err(DesignError::InvalidInput { field: "distance", .. })
        ));
        let dead = request(1000.0, 10.0)
            .with_context(InstallationContext::default().with_voltage(ElectricPotential::new::<volt>(0.0)));
        assert!(matches!(
            design(&standards, &dead),
            Err(DesignError::InvalidInput {
                field: "supply voltage",
                ..
            })
        ));
    }

    #[test]
    fn batch_preserves_request_order() {
        let standards = Standards::bs7671();
        let requests: Vec<_> = [1000.0, 7360.0, 0.0, 3000.0]
            .into_iter()
            .map(|watts| request(watts, 15.0))
            .collect();

        let results = design_batch(&standards, &requests);

        assert_eq!(results.len(), requests.len());
        for (request, result) in requests.iter().zip(&results) {
            match result {
                Ok(result) => assert_eq!(result, &design(&standards, request).unwrap()),
                Err(_) => assert!(design(&standards, request).is_err()),
            }
        }
        assert!(results[2].is_err());
    }

    #[test]
    fn component_is_idempotent() {
        let designer = CircuitDesigner::default();
        let input = request(3680.0, 18.0);
        assert_eq!(designer.call(input).unwrap(), designer.call(input).unwrap());
    }

    #[test]
    fn loop_impedance_failure_is_a_warning_not_a_resize() {
        let context = InstallationContext::default().with_category(LoadCategory::Other);
        let input = request(1000.0, 60.0)
            .with_curve(TripCurve::D)
            .with_context(context);
        let result = design(&Standards::bs7671(), &input).unwrap();

        assert!(result.success);
        assert_relative_eq!(result.size.mm2(), 1.5);
        assert_relative_eq!(result.device_rating.get::<ampere>(), 6.0);
        assert!(result.compliance.capacity_compliant());
        assert!(result.compliance.voltage_drop.compliant);
        assert!(!result.compliance.earth_fault.compliant);
        assert!(!result.compliance.overall_compliant);

        // 0.35 + 2 × 12.1 × 60 × 1.2 / 1000 against 1.92
        assert_relative_eq!(
            result.compliance.earth_fault.loop_impedance.get::<ohm>(),
            2.0924,
            epsilon = 1e-9
        );
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].starts_with("estimated loop impedance"));
    }

    #[test]
    fn unknown_ambient_is_rejected() {
        let context = InstallationContext::default()
            .with_ambient(ThermodynamicTemperature::new::<degree_celsius>(f64::NAN));
        let err = design(&Standards::bs7671(), &request(2300.0, 10.0).with_context(context))
            .unwrap_err();
        assert!(matches!(
            err,
            DesignError::InvalidInput {
                field: "ambient temperature",
                ..
            }
        ));
    }
}
