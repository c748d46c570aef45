//! Reference data for electrical design compliance.
//!
//! Everything a compliance calculator looks up lives in a [`Standards`]
//! value: the standard conductor and device ladders, tabulated current
//! capacities keyed by installation method and insulation, millivolt drop
//! constants, derating bands, maximum earth-fault loop impedances and the
//! thresholds used for selectivity analysis.
//!
//! [`Standards::bs7671()`] provides the built-in UK data set. Alternative
//! national standards can be loaded from TOML with
//! [`Standards::from_toml_str`] or [`Standards::from_toml_file`] and are
//! validated before use.
//!
//! Lookups never turn a missing table entry into zero. A size, rating or
//! combination that is not tabulated yields a [`TableError`].

mod bs7671;
mod error;
mod kind;
pub mod regulation;
mod section;
mod standards;

pub use error::TableError;
pub use kind::{DeviceKind, InstallationMethod, Insulation, LoadCategory, PhaseConfig, TripCurve};
pub use section::CrossSection;
pub use standards::{
    Band, BandTable, ConductorData, EarthFaultRules, MagneticMultipliers, MaxZsRow,
    MethodCapacities, SelectivityRules, Standards, VoltageDropLimits,
};
