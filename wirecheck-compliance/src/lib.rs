//! Deterministic electrical design-compliance calculators.
//!
//! Each calculator is a pure function of its input and a borrowed
//! [`Standards`](wirecheck_tables::Standards) table, and is also available as
//! a [`Component`](wirecheck_core::Component):
//!
//! - [`capacity`] / [`CableCapacity`]: derated current-carrying capacity and
//!   the combined per-candidate compliance verdict
//! - [`voltage_drop`] / [`VoltageDrop`]: absolute and percentage voltage drop
//! - [`max_zs`], [`check_loop_impedance`] / [`EarthFaultCheck`]: earth-fault
//!   loop impedance ceilings
//! - [`selectivity`] / [`Selectivity`]: discrimination between an upstream
//!   and a downstream protective device
//! - [`design`], [`design_batch`] / [`CircuitDesigner`]: smallest compliant
//!   conductor for a load
//!
//! A non-compliant outcome is a normal result value. Errors are reserved for
//! malformed input and for table entries that do not exist.

mod capacity;
mod citations;
mod context;
mod designer;
mod device;
mod earth_fault;
mod error;
mod selectivity;
mod voltage_drop;

pub use capacity::{CableCapacity, CableCheck, ComplianceResult, capacity};
pub use context::InstallationContext;
pub use designer::{CircuitDesigner, DesignRequest, DesignResult, design, design_batch};
pub use device::ProtectiveDevice;
pub use earth_fault::{
    EarthFaultCheck, EarthFaultReport, LoopImpedanceInput, MaxZs, check_loop_impedance,
    estimate_loop_impedance, max_zs,
};
pub use error::DesignError;
pub use selectivity::{
    ComplianceStatus, DeviceOperation, RiskLevel, Selectivity, SelectivityInput,
    SelectivityResult, TripRegion, selectivity,
};
pub use voltage_drop::{VoltageDrop, VoltageDropInput, VoltageDropReport, voltage_drop};
