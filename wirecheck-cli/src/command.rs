use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use uom::si::{
    electric_current::{ampere, kiloampere},
    electric_potential::volt,
    electrical_resistance::ohm,
    f64::{
        ElectricCurrent, ElectricPotential, ElectricalResistance, Length, Power,
        ThermodynamicTemperature, Time,
    },
    length::meter,
    power::watt,
    thermodynamic_temperature::degree_celsius,
    time::second,
};
use wirecheck_compliance::{
    CableCheck, DesignRequest, InstallationContext, LoopImpedanceInput, ProtectiveDevice,
    SelectivityInput, VoltageDropInput,
};
use wirecheck_tables::{
    CrossSection, DeviceKind, InstallationMethod, Insulation, LoadCategory, PhaseConfig, TripCurve,
};

/// Electrical design-compliance checks for final circuits
#[derive(Debug, Parser)]
#[command(name = "wirecheck", version)]
pub struct Cli {
    /// TOML standards file replacing the built-in BS 7671 tables
    #[arg(long, global = true, value_name = "FILE")]
    pub standards: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Choose the smallest compliant cable and breaker for a load
    Design(DesignArgs),
    /// Check a cable and breaker against overload, voltage drop and loop impedance
    Capacity(CapacityArgs),
    /// Compute the voltage drop along a cable run
    VoltageDrop(VoltageDropArgs),
    /// Look up the maximum loop impedance for a breaker
    MaxZs(MaxZsArgs),
    /// Check discrimination between two series devices
    Selectivity(SelectivityArgs),
}

#[derive(Debug, Args)]
pub struct ContextArgs {
    /// Ambient temperature in °C
    #[arg(long, default_value_t = 30.0)]
    ambient: f64,

    /// Number of grouped circuits
    #[arg(long, default_value_t = 1)]
    grouping: u32,

    /// Reference installation method (A, B or C)
    #[arg(long, default_value = "C")]
    method: InstallationMethod,

    /// Insulation class (pvc or xlpe)
    #[arg(long, default_value = "pvc")]
    insulation: Insulation,

    /// Supply voltage in volts
    #[arg(long, default_value_t = 230.0)]
    voltage: f64,

    /// Phase configuration (single or three)
    #[arg(long, default_value = "single")]
    phases: PhaseConfig,

    /// Load category (lighting or other)
    #[arg(long, default_value = "lighting")]
    category: LoadCategory,

    /// External earth-fault loop impedance Ze in ohms
    #[arg(long, default_value_t = 0.35)]
    ze: f64,
}

impl ContextArgs {
    fn context(&self) -> InstallationContext {
        InstallationContext::default()
            .with_ambient(ThermodynamicTemperature::new::<degree_celsius>(self.ambient))
            .with_grouping(self.grouping)
            .with_method(self.method)
            .with_insulation(self.insulation)
            .with_voltage(ElectricPotential::new::<volt>(self.voltage))
            .with_phases(self.phases)
            .with_category(self.category)
            .with_external_impedance(ElectricalResistance::new::<ohm>(self.ze))
    }
}

#[derive(Debug, Args)]
pub struct DesignArgs {
    /// Load power in watts
    #[arg(long)]
    power: f64,

    /// One-way cable route length in metres
    #[arg(long)]
    distance: f64,

    /// Breaker trip curve
    #[arg(long, default_value = "B")]
    curve: TripCurve,

    #[command(flatten)]
    context: ContextArgs,
}

impl DesignArgs {
    pub fn request(&self) -> DesignRequest {
        DesignRequest::new(
            Power::new::<watt>(self.power),
            Length::new::<meter>(self.distance),
        )
        .with_curve(self.curve)
        .with_context(self.context.context())
    }
}

#[derive(Debug, Args)]
pub struct CapacityArgs {
    /// Conductor size in mm²
    #[arg(long)]
    size: f64,

    /// Design current Ib in amperes
    #[arg(long)]
    design_current: f64,

    /// Breaker rating In in amperes
    #[arg(long)]
    rating: f64,

    /// One-way cable route length in metres
    #[arg(long)]
    length: f64,

    /// Breaker trip curve
    #[arg(long, default_value = "B")]
    curve: TripCurve,

    #[command(flatten)]
    context: ContextArgs,
}

impl CapacityArgs {
    pub fn check(&self) -> Result<CableCheck> {
        Ok(CableCheck::new(
            cross_section(self.size)?,
            ElectricCurrent::new::<ampere>(self.design_current),
            ElectricCurrent::new::<ampere>(self.rating),
            Length::new::<meter>(self.length),
        )
        .with_curve(self.curve)
        .with_context(self.context.context()))
    }
}

#[derive(Debug, Args)]
pub struct VoltageDropArgs {
    /// Load current in amperes
    #[arg(long)]
    current: f64,

    /// One-way cable route length in metres
    #[arg(long)]
    length: f64,

    /// Conductor size in mm²
    #[arg(long)]
    size: f64,

    /// Supply voltage in volts
    #[arg(long, default_value_t = 230.0)]
    voltage: f64,

    /// Phase configuration (single or three)
    #[arg(long, default_value = "single")]
    phases: PhaseConfig,

    /// Load category (lighting or other)
    #[arg(long, default_value = "lighting")]
    category: LoadCategory,
}

impl VoltageDropArgs {
    pub fn input(&self) -> Result<VoltageDropInput> {
        Ok(VoltageDropInput::new(
            ElectricCurrent::new::<ampere>(self.current),
            Length::new::<meter>(self.length),
            cross_section(self.size)?,
            ElectricPotential::new::<volt>(self.voltage),
        )
        .with_phases(self.phases)
        .with_category(self.category))
    }
}

#[derive(Debug, Args)]
pub struct MaxZsArgs {
    /// Breaker rating in amperes
    #[arg(long)]
    pub rating: f64,

    /// Breaker trip curve
    #[arg(long, default_value = "B")]
    pub curve: TripCurve,

    /// Measured or estimated loop impedance Zs in ohms to check against the ceiling
    #[arg(long)]
    pub zs: Option<f64>,
}

impl MaxZsArgs {
    pub fn rating(&self) -> ElectricCurrent {
        ElectricCurrent::new::<ampere>(self.rating)
    }

    pub fn loop_input(&self) -> Option<LoopImpedanceInput> {
        self.zs.map(|zs| LoopImpedanceInput {
            rating: self.rating(),
            curve: self.curve,
            loop_impedance: ElectricalResistance::new::<ohm>(zs),
        })
    }
}

#[derive(Debug, Args)]
pub struct SelectivityArgs {
    /// Upstream device rating in amperes
    #[arg(long)]
    upstream_rating: f64,

    /// Upstream device kind (mcb, rcbo, fuse or mccb)
    #[arg(long, default_value = "mcb")]
    upstream_kind: DeviceKind,

    /// Upstream trip curve, for breakers
    #[arg(long)]
    upstream_curve: Option<TripCurve>,

    /// Upstream breaking capacity in kA
    #[arg(long, default_value_t = 6.0)]
    upstream_breaking_capacity: f64,

    /// Upstream magnetic trip current override in amperes
    #[arg(long)]
    upstream_magnetic_trip: Option<f64>,

    /// Upstream intentional time delay in seconds
    #[arg(long)]
    upstream_delay: Option<f64>,

    /// Downstream device rating in amperes
    #[arg(long)]
    downstream_rating: f64,

    /// Downstream device kind (mcb, rcbo, fuse or mccb)
    #[arg(long, default_value = "mcb")]
    downstream_kind: DeviceKind,

    /// Downstream trip curve, for breakers
    #[arg(long)]
    downstream_curve: Option<TripCurve>,

    /// Downstream breaking capacity in kA
    #[arg(long, default_value_t = 6.0)]
    downstream_breaking_capacity: f64,

    /// Downstream magnetic trip current override in amperes
    #[arg(long)]
    downstream_magnetic_trip: Option<f64>,

    /// Fault current at the downstream device in amperes
    #[arg(long)]
    fault_current: f64,

    /// Prospective short-circuit current in amperes, if different from the fault current
    #[arg(long)]
    short_circuit_current: Option<f64>,

    /// Steady load current on the downstream circuit in amperes
    #[arg(long)]
    load_current: Option<f64>,
}

impl SelectivityArgs {
    pub fn input(&self) -> SelectivityInput {
        let mut upstream = device(
            self.upstream_kind,
            self.upstream_rating,
            self.upstream_curve,
            self.upstream_breaking_capacity,
            self.upstream_magnetic_trip,
        );
        if let Some(delay) = self.upstream_delay {
            upstream = upstream.with_time_delay(Time::new::<second>(delay));
        }
        let downstream = device(
            self.downstream_kind,
            self.downstream_rating,
            self.downstream_curve,
            self.downstream_breaking_capacity,
            self.downstream_magnetic_trip,
        );

        let mut input = SelectivityInput::new(
            upstream,
            downstream,
            ElectricCurrent::new::<ampere>(self.fault_current),
        );
        if let Some(current) = self.short_circuit_current {
            input = input.with_short_circuit_current(ElectricCurrent::new::<ampere>(current));
        }
        if let Some(current) = self.load_current {
            input = input.with_load_current(ElectricCurrent::new::<ampere>(current));
        }
        input
    }
}

/// Breakers default to curve B when none is given.
fn device(
    kind: DeviceKind,
    rating: f64,
    curve: Option<TripCurve>,
    breaking_capacity: f64,
    magnetic_trip: Option<f64>,
) -> ProtectiveDevice {
    let curve = curve.or_else(|| kind.uses_trip_curve().then_some(TripCurve::B));
    let device = ProtectiveDevice::new(kind, ElectricCurrent::new::<ampere>(rating), curve)
        .with_breaking_capacity(ElectricCurrent::new::<kiloampere>(breaking_capacity));
    match magnetic_trip {
        Some(current) => device.with_magnetic_trip(ElectricCurrent::new::<ampere>(current)),
        None => device,
    }
}

fn cross_section(mm2: f64) -> Result<CrossSection> {
    CrossSection::new(mm2).with_context(|| format!("invalid conductor size {mm2} mm²"))
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn design_arguments_build_a_request() {
        let cli = Cli::parse_from([
            "wirecheck",
            "design",
            "--power",
            "7360",
            "--distance",
            "20",
            "--method",
            "b",
            "--insulation",
            "xlpe",
        ]);
        let Command::Design(args) = cli.command else {
            panic!("expected design command");
        };
        let request = args.request();

        assert_eq!(request.power.get::<watt>(), 7360.0);
        assert_eq!(request.context.method, InstallationMethod::B);
        assert_eq!(request.context.insulation, Insulation::Thermosetting);
        assert_eq!(request.context.grouping, 1);
    }

    #[test]
    fn breakers_default_to_curve_b() {
        let cli = Cli::parse_from([
            "wirecheck",
            "--json",
            "selectivity",
            "--upstream-rating",
            "40",
            "--downstream-rating",
            "20",
            "--downstream-kind",
            "fuse",
            "--fault-current",
            "150",
        ]);
        assert!(cli.json);
        let Command::Selectivity(args) = cli.command else {
            panic!("expected selectivity command");
        };
        let input = args.input();

        assert_eq!(input.upstream.curve, Some(TripCurve::B));
        assert_eq!(input.downstream.curve, None);
        assert_eq!(input.downstream.kind, DeviceKind::Fuse);
    }

    #[test]
    fn zero_size_is_rejected() {
        assert!(cross_section(0.0).is_err());
    }
}
