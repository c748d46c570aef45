use thiserror::Error;

use crate::{DeviceKind, InstallationMethod, Insulation, TripCurve};

/// Errors raised by table lookups and by loading a standards file.
///
/// A lookup miss is always an error, never a zero. Callers must be able to
/// tell "this conductor is not tabulated" apart from "this conductor has no
/// capacity".
#[derive(Debug, Error)]
pub enum TableError {
    /// The size is not on the standard conductor ladder.
    #[error("{size} mm² is not a standard conductor size")]
    InvalidSize { size: f64 },

    /// The rating is not on the standard device ladder.
    #[error("{rating} A is not a standard device rating")]
    InvalidRating { rating: f64 },

    /// The size is on the ladder but the requested quantity is not tabulated.
    #[error("no {quantity} is tabulated for {size} mm²")]
    UnsupportedSize { size: f64, quantity: &'static str },

    /// No current-carrying capacity is tabulated for this combination.
    #[error(
        "no current-carrying capacity is tabulated for {size} mm² ({insulation}, method {method})"
    )]
    UnsupportedConfiguration {
        size: f64,
        method: InstallationMethod,
        insulation: Insulation,
    },

    /// No maximum earth-fault loop impedance is tabulated for this device.
    #[error("no maximum earth-fault loop impedance is tabulated for a type {curve} {rating} A device")]
    UnsupportedDeviceRating { rating: f64, curve: TripCurve },

    /// A circuit-breaker was described without a trip curve.
    #[error("a {kind} requires a trip curve")]
    MissingTripCurve { kind: DeviceKind },

    /// A name could not be parsed into one of the table enumerations.
    #[error("unknown {kind} `{value}`")]
    UnknownVariant { kind: &'static str, value: String },

    /// A loaded table violates a structural invariant.
    #[error("invalid standards table: {reason}")]
    Invalid { reason: String },

    #[error("failed to parse standards file")]
    Parse(#[from] toml::de::Error),

    #[error("failed to read standards file")]
    Io(#[from] std::io::Error),
}

impl TableError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid {
            reason: reason.into(),
        }
    }
}
