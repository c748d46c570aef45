use serde::Serialize;
use tracing::debug;
use uom::si::{
    electric_current::{ampere, kiloampere},
    f64::{ElectricCurrent, Time},
    time::second,
};
use wirecheck_core::Component;
use wirecheck_tables::{Standards, regulation};

use crate::{
    ProtectiveDevice,
    device::Role,
    error::{DesignError, positive},
};

/// A pair of series protective devices and the fault they must discriminate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SelectivityInput {
    pub upstream: ProtectiveDevice,
    pub downstream: ProtectiveDevice,
    /// Fault current at the downstream device.
    pub fault_current: ElectricCurrent,
    /// Prospective short-circuit current for the breaking capacity check.
    /// Defaults to the fault current.
    pub short_circuit_current: Option<ElectricCurrent>,
    /// Steady load on the downstream circuit.
    pub load_current: Option<ElectricCurrent>,
}

impl SelectivityInput {
    #[must_use]
    pub fn new(
        upstream: ProtectiveDevice,
        downstream: ProtectiveDevice,
        fault_current: ElectricCurrent,
    ) -> Self {
        Self {
            upstream,
            downstream,
            fault_current,
            short_circuit_current: None,
            load_current: None,
        }
    }

    /// Returns `self` with the given prospective short-circuit current, keeping other fields unchanged.
    #[must_use]
    pub fn with_short_circuit_current(self, current: ElectricCurrent) -> Self {
        Self {
            short_circuit_current: Some(current),
            ..self
        }
    }

    /// Returns `self` with the given load current, keeping other fields unchanged.
    #[must_use]
    pub fn with_load_current(self, current: ElectricCurrent) -> Self {
        Self {
            load_current: Some(current),
            ..self
        }
    }
}

/// Part of the time-current characteristic a device operates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TripRegion {
    Magnetic,
    Thermal,
}

/// How one device responds to the fault current.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DeviceOperation {
    pub magnetic_trip: ElectricCurrent,
    pub operating_time: Time,
    pub region: TripRegion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComplianceStatus {
    Compliant,
    NonCompliant,
    RequiresVerification,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

/// Discrimination verdict for a pair of devices.
///
/// `concerns` lists failed checks before advisory findings, and
/// `recommendations` follows the same order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectivityResult {
    /// Upstream rating over downstream rating.
    pub ratio: f64,
    /// Highest fault current at which discrimination can be relied on.
    pub selectivity_limit: ElectricCurrent,
    pub overload_selective: bool,
    pub short_circuit_selective: bool,
    pub breaking_capacity_adequate: bool,
    pub upstream: DeviceOperation,
    pub downstream: DeviceOperation,
    /// Upstream operating time minus downstream operating time.
    pub time_margin: Time,
    pub is_selective: bool,
    pub concerns: Vec<String>,
    pub recommendations: Vec<String>,
    pub immediate_actions: Vec<String>,
    pub status: ComplianceStatus,
    pub risk: RiskLevel,
    pub regulations: Vec<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Severity {
    Fatal,
    Advisory,
}

#[derive(Debug)]
struct Finding {
    severity: Severity,
    concern: String,
    recommendation: String,
}

impl Finding {
    fn fatal(concern: String, recommendation: String) -> Self {
        Self {
            severity: Severity::Fatal,
            concern,
            recommendation,
        }
    }

    fn advisory(concern: String, recommendation: String) -> Self {
        Self {
            severity: Severity::Advisory,
            concern,
            recommendation,
        }
    }
}

/// Checks whether the downstream device clears a fault before the upstream one.
///
/// # Errors
///
/// Returns [`DesignError::InvalidInput`] for non-positive ratings or
/// currents or a delay on the downstream device, and a table error if a
/// rating is off the standard ladder or a breaker has no trip curve.
pub fn selectivity(
    standards: &Standards,
    input: &SelectivityInput,
) -> Result<SelectivityResult, DesignError> {
    let SelectivityInput {
        upstream,
        downstream,
        ..
    } = input;
    upstream.validate(standards, Role::Upstream)?;
    downstream.validate(standards, Role::Downstream)?;
    let fault = positive("fault current", input.fault_current)?;
    let short_circuit = match input.short_circuit_current {
        Some(current) => positive("short-circuit current", current)?,
        None => fault,
    };
    let load = input
        .load_current
        .map(|current| positive("load current", current))
        .transpose()?;

    let rules = &standards.selectivity;
    let up = operate(standards, upstream, fault, upstream.delay())?;
    let down = operate(standards, downstream, fault, Time::new::<second>(0.0))?;

    let ratio = upstream.rating_amps() / downstream.rating_amps();
    let selectivity_limit = (up.magnetic_trip * rules.upstream_limit_factor)
        .min(down.magnetic_trip * rules.downstream_limit_factor);
    let required_margin = Time::new::<second>(rules.time_margin);
    let time_margin = up.operating_time - down.operating_time;

    let overload_selective = ratio >= rules.min_ratio
        && upstream.rating_amps() > rules.overload_factor * downstream.rating_amps();
    let short_circuit_selective = time_margin > required_margin && fault < selectivity_limit;
    let breaking_capacity_adequate =
        upstream.breaking_capacity > short_circuit && downstream.breaking_capacity > short_circuit;
    let is_selective = overload_selective && short_circuit_selective && breaking_capacity_adequate;

    let amps = |current: ElectricCurrent| current.get::<ampere>();
    let mut findings = Vec::new();
    let mut immediate_actions = Vec::new();

    if ratio < rules.min_ratio {
        findings.push(Finding::fatal(
            format!(
                "selectivity ratio {ratio:.2} is below the minimum of {}",
                rules.min_ratio
            ),
            format!(
                "increase the upstream rating to at least {:.0} A",
                rules.min_ratio * downstream.rating_amps()
            ),
        ));
    }
    if !overload_selective {
        findings.push(Finding::fatal(
            format!(
                "overload selectivity not achieved: {} A upstream must exceed {} × {} A downstream",
                upstream.rating_amps(),
                rules.overload_factor,
                downstream.rating_amps()
            ),
            "select a larger upstream device or a smaller downstream device".to_owned(),
        ));
    }
    if !short_circuit_selective {
        let concern = if fault >= selectivity_limit {
            format!(
                "fault current {} A reaches the selectivity limit of {:.0} A",
                amps(fault),
                amps(selectivity_limit)
            )
        } else {
            format!(
                "operating time margin {:.3} s does not exceed the required {} s",
                time_margin.get::<second>(),
                rules.time_margin
            )
        };
        findings.push(Finding::fatal(
            concern,
            "use a time-delayed or higher-curve upstream device".to_owned(),
        ));
    }
    if !breaking_capacity_adequate {
        let weakest = upstream.breaking_capacity.min(downstream.breaking_capacity);
        findings.push(Finding::fatal(
            format!(
                "breaking capacity {} kA is below the prospective short-circuit current {:.2} kA",
                weakest.get::<kiloampere>(),
                short_circuit.get::<kiloampere>()
            ),
            "fit devices rated for the prospective short-circuit current".to_owned(),
        ));
        immediate_actions.push(
            "replace devices whose breaking capacity is below the prospective fault".to_owned(),
        );
    }

    if fault < selectivity_limit && fault >= selectivity_limit * rules.marginal_limit_fraction {
        findings.push(Finding::advisory(
            format!(
                "fault current {} A is within {:.0}% of the selectivity limit of {:.0} A",
                amps(fault),
                (1.0 - rules.marginal_limit_fraction) * 100.0,
                amps(selectivity_limit)
            ),
            "confirm discrimination against manufacturer selectivity tables".to_owned(),
        ));
    }
    if short_circuit_selective && time_margin < required_margin * 2.0 {
        findings.push(Finding::advisory(
            format!(
                "operating time margin {:.3} s is less than twice the required {} s",
                time_margin.get::<second>(),
                rules.time_margin
            ),
            "verify time-current curves from manufacturer data".to_owned(),
        ));
    }
    if let Some(load) = load {
        if load > downstream.rating {
            findings.push(Finding::advisory(
                format!(
                    "load current {} A exceeds the downstream rating of {} A",
                    amps(load),
                    downstream.rating_amps()
                ),
                "re-rate the downstream device or reduce the load".to_owned(),
            ));
        }
    }

    if !is_selective {
        immediate_actions.push("review coordination before energising".to_owned());
    }

    findings.sort_by_key(|finding| finding.severity);
    let advisories = findings
        .iter()
        .filter(|finding| finding.severity == Severity::Advisory)
        .count();

    let (status, risk) = if !is_selective {
        (ComplianceStatus::NonCompliant, RiskLevel::Critical)
    } else {
        match advisories {
            0 => (ComplianceStatus::Compliant, RiskLevel::Low),
            1 => (ComplianceStatus::RequiresVerification, RiskLevel::Medium),
            _ => (ComplianceStatus::RequiresVerification, RiskLevel::High),
        }
    };

    debug!(
        ratio,
        is_selective,
        ?status,
        ?risk,
        "evaluated {} A over {} A at {} A",
        upstream.rating_amps(),
        downstream.rating_amps(),
        amps(fault)
    );

    let (concerns, recommendations) = findings
        .into_iter()
        .map(|finding| (finding.concern, finding.recommendation))
        .unzip();

    Ok(SelectivityResult {
        ratio,
        selectivity_limit,
        overload_selective,
        short_circuit_selective,
        breaking_capacity_adequate,
        upstream: up,
        downstream: down,
        time_margin,
        is_selective,
        concerns,
        recommendations,
        immediate_actions,
        status,
        risk,
        regulations: vec![regulation::SELECTIVITY, regulation::BREAKING_CAPACITY],
    })
}

fn operate(
    standards: &Standards,
    device: &ProtectiveDevice,
    fault: ElectricCurrent,
    delay: Time,
) -> Result<DeviceOperation, DesignError> {
    let rules = &standards.selectivity;
    let magnetic_trip = device.magnetic_trip_current(standards)?;
    let (region, seconds) = if fault > magnetic_trip {
        (TripRegion::Magnetic, rules.magnetic_time)
    } else {
        (TripRegion::Thermal, rules.thermal_time)
    };
    Ok(DeviceOperation {
        magnetic_trip,
        operating_time: Time::new::<second>(seconds) + delay,
        region,
    })
}

/// The selectivity analyzer as a [`Component`].
#[derive(Debug, Clone, Default)]
pub struct Selectivity {
    standards: Standards,
}

impl Selectivity {
    #[must_use]
    pub fn new(standards: Standards) -> Self {
        Self { standards }
    }
}

impl Component for Selectivity {
    type Input = SelectivityInput;
    type Output = SelectivityResult;
    type Error = DesignError;

    fn call(&self, input: Self::Input) -> Result<Self::Output, Self::Error> {
        selectivity(&self.standards, &input)
    }
}
