//! Plain-text rendering of calculator results.

use std::fmt::Write;

use uom::si::{
    electric_current::ampere, electric_potential::volt, electrical_resistance::ohm, time::second,
};
use wirecheck_compliance::{
    ComplianceResult, DesignResult, DeviceOperation, EarthFaultReport, MaxZs, SelectivityResult,
    VoltageDropReport,
};

/// A result that can be rendered for a terminal.
pub trait Render {
    fn render(&self) -> String;

    /// Whether the result represents a passing design.
    fn passed(&self) -> bool;
}

fn verdict(pass: bool) -> &'static str {
    if pass { "COMPLIANT" } else { "NON-COMPLIANT" }
}

fn regulations(out: &mut String, regulations: &[&'static str]) {
    if !regulations.is_empty() {
        let _ = writeln!(out, "regulations: {}", regulations.join(", "));
    }
}

impl Render for ComplianceResult {
    fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} cable on {} A breaker: {}",
            self.size,
            self.device_rating.get::<ampere>(),
            verdict(self.overall_compliant)
        );
        let _ = writeln!(out, "{}", self.equation);
        let _ = writeln!(out, "safety margin: {:.1}%", self.safety_margin);
        regulations(&mut out, &self.regulations);
        out
    }

    fn passed(&self) -> bool {
        self.overall_compliant
    }
}

impl Render for DesignResult {
    fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{}: {} cable, {} A type {} breaker (Ib = {:.2} A, {} candidates evaluated)",
            if self.success { "DESIGNED" } else { "NO COMPLIANT SIZE" },
            self.size,
            self.device_rating.get::<ampere>(),
            self.curve,
            self.design_current.get::<ampere>(),
            self.candidates_evaluated
        );
        let _ = writeln!(out, "{}", self.compliance.equation);
        for warning in &self.warnings {
            let _ = writeln!(out, "warning: {warning}");
        }
        regulations(&mut out, &self.regulations);
        out
    }

    fn passed(&self) -> bool {
        self.success
    }
}

impl Render for VoltageDropReport {
    fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "voltage drop {:.2} V ({:.2}%, limit {}%): {}",
            self.volts.get::<volt>(),
            self.percent,
            self.max_allowed,
            verdict(self.compliant)
        );
        let _ = writeln!(out, "{}", self.equation);
        regulations(&mut out, &self.regulations);
        out
    }

    fn passed(&self) -> bool {
        self.compliant
    }
}

impl Render for MaxZs {
    fn render(&self) -> String {
        format!(
            "maximum Zs {} Ω\nregulations: {}\n",
            self.ohms.get::<ohm>(),
            self.regulation
        )
    }

    fn passed(&self) -> bool {
        true
    }
}

impl Render for EarthFaultReport {
    fn render(&self) -> String {
        format!(
            "Zs {} Ω against maximum {} Ω: {}\n",
            self.loop_impedance.get::<ohm>(),
            self.max_zs.get::<ohm>(),
            verdict(self.compliant)
        )
    }

    fn passed(&self) -> bool {
        self.compliant
    }
}

fn operation(out: &mut String, label: &str, operation: &DeviceOperation) {
    let _ = writeln!(
        out,
        "{label}: magnetic trip {} A, operates in {} s ({:?})",
        operation.magnetic_trip.get::<ampere>(),
        operation.operating_time.get::<second>(),
        operation.region
    );
}

impl Render for SelectivityResult {
    fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{}: {:?}, {:?} risk",
            if self.is_selective { "SELECTIVE" } else { "NOT SELECTIVE" },
            self.status,
            self.risk
        );
        let _ = writeln!(
            out,
            "ratio {:.2}, selectivity limit {:.0} A, time margin {:.3} s",
            self.ratio,
            self.selectivity_limit.get::<ampere>(),
            self.time_margin.get::<second>()
        );
        let _ = writeln!(
            out,
            "overload {}, short-circuit {}, breaking capacity {}",
            pass_fail(self.overload_selective),
            pass_fail(self.short_circuit_selective),
            pass_fail(self.breaking_capacity_adequate)
        );
        operation(&mut out, "upstream", &self.upstream);
        operation(&mut out, "downstream", &self.downstream);
        for (heading, lines) in [
            ("immediate action", &self.immediate_actions),
            ("concern", &self.concerns),
            ("recommendation", &self.recommendations),
        ] {
            for line in lines {
                let _ = writeln!(out, "{heading}: {line}");
            }
        }
        regulations(&mut out, &self.regulations);
        out
    }

    fn passed(&self) -> bool {
        self.is_selective
    }
}

fn pass_fail(pass: bool) -> &'static str {
    if pass { "pass" } else { "fail" }
}
