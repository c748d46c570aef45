//! Regulation identifiers cited by the compliance calculators.
//!
//! Results collect these identifiers so that a report can show which clauses
//! and tables a verdict relied on.

/// Coordination between conductor and overload device: `Ib ≤ In ≤ Iz`.
pub const OVERLOAD_COORDINATION: &str = "BS 7671 433.1.1";
/// Current-carrying capacity, 70 °C thermoplastic copper cables.
pub const CAPACITY_THERMOPLASTIC: &str = "BS 7671 Appendix 4 Table 4D1A";
/// Current-carrying capacity, 90 °C thermosetting copper cables.
pub const CAPACITY_THERMOSETTING: &str = "BS 7671 Appendix 4 Table 4E1A";
/// Ambient temperature rating factor `Ca`.
pub const AMBIENT_TEMPERATURE_FACTOR: &str = "BS 7671 Appendix 4 Table 4B1";
/// Grouping rating factor `Cg`.
pub const GROUPING_FACTOR: &str = "BS 7671 Appendix 4 Table 4C1";
/// Voltage drop millivolt constants.
pub const VOLTAGE_DROP_CONSTANTS: &str = "BS 7671 Appendix 4 Table 4D1B";
/// Voltage drop limits for installations supplied from a public network.
pub const VOLTAGE_DROP_LIMITS: &str = "BS 7671 Appendix 12 Table 12A";
/// Maximum disconnection time for final circuits.
pub const DISCONNECTION_TIME: &str = "BS 7671 411.3.2.2";
/// Maximum earth-fault loop impedance for circuit-breakers.
pub const MAX_LOOP_IMPEDANCE: &str = "BS 7671 Table 41.3";
/// Selectivity between protective devices.
pub const SELECTIVITY: &str = "BS 7671 536.4.1.2";
/// Rated short-circuit breaking capacity.
pub const BREAKING_CAPACITY: &str = "BS 7671 434.5.1";
