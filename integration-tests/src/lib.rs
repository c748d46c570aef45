//! Shared fixtures for the cross-crate tests.

use std::path::PathBuf;

use uom::si::{
    electric_current::ampere,
    f64::{ElectricCurrent, Length, Power},
    length::meter,
    power::watt,
};
use wirecheck_compliance::DesignRequest;

/// Path to a standards file under `fixtures/`.
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
}

pub fn amps(value: f64) -> ElectricCurrent {
    ElectricCurrent::new::<ampere>(value)
}

pub fn metres(value: f64) -> Length {
    Length::new::<meter>(value)
}

/// A default-context request for a load of `watts` at `metres`.
pub fn load(watts: f64, metres: f64) -> DesignRequest {
    DesignRequest::new(Power::new::<watt>(watts), self::metres(metres))
}
