//! Enumerations used as table keys.
//!
//! Each enum parses from the short names used in standards files and on the
//! command line, and displays the same way.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::TableError;

/// Reference installation method for tabulated current-carrying capacity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstallationMethod {
    /// Enclosed in conduit in a thermally insulating wall.
    A,
    /// Enclosed in conduit or trunking on a wall.
    B,
    /// Clipped direct.
    #[default]
    C,
}

/// Conductor insulation class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Insulation {
    /// 70 °C thermoplastic (PVC).
    #[default]
    Thermoplastic,
    /// 90 °C thermosetting (XLPE).
    Thermosetting,
}

/// Magnetic trip characteristic of a circuit-breaker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TripCurve {
    #[default]
    B,
    C,
    D,
}

/// Family of protective device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceKind {
    /// Thermal-magnetic miniature circuit-breaker.
    #[default]
    Mcb,
    /// Residual-current breaker with integral overcurrent protection.
    Rcbo,
    /// Cartridge fuse.
    Fuse,
    /// Moulded-case circuit-breaker.
    Mccb,
}

impl DeviceKind {
    /// Returns `true` for devices whose magnetic trip is set by a [`TripCurve`].
    #[must_use]
    pub fn uses_trip_curve(self) -> bool {
        matches!(self, Self::Mcb | Self::Rcbo)
    }
}

/// Supply phase configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PhaseConfig {
    #[default]
    Single,
    Three,
}

/// Kind of load, which selects the voltage-drop ceiling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoadCategory {
    /// Lighting circuits, held to the stricter ceiling.
    #[default]
    Lighting,
    /// Every other use.
    Other,
}

impl fmt::Display for InstallationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
        })
    }
}

impl fmt::Display for Insulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Thermoplastic => "70 °C thermoplastic",
            Self::Thermosetting => "90 °C thermosetting",
        })
    }
}

impl fmt::Display for TripCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        })
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Mcb => "MCB",
            Self::Rcbo => "RCBO",
            Self::Fuse => "fuse",
            Self::Mccb => "MCCB",
        })
    }
}

impl fmt::Display for PhaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Single => "single-phase",
            Self::Three => "three-phase",
        })
    }
}

impl fmt::Display for LoadCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Lighting => "lighting",
            Self::Other => "other",
        })
    }
}

fn unknown(kind: &'static str, value: &str) -> TableError {
    TableError::UnknownVariant {
        kind,
        value: value.to_owned(),
    }
}

impl FromStr for InstallationMethod {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            "C" => Ok(Self::C),
            _ => Err(unknown("installation method", s)),
        }
    }
}

impl FromStr for Insulation {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "thermoplastic" | "pvc" | "70" => Ok(Self::Thermoplastic),
            "thermosetting" | "xlpe" | "90" => Ok(Self::Thermosetting),
            _ => Err(unknown("insulation class", s)),
        }
    }
}

impl FromStr for TripCurve {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "B" => Ok(Self::B),
            "C" => Ok(Self::C),
            "D" => Ok(Self::D),
            _ => Err(unknown("trip curve", s)),
        }
    }
}

impl FromStr for DeviceKind {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mcb" => Ok(Self::Mcb),
            "rcbo" => Ok(Self::Rcbo),
            "fuse" => Ok(Self::Fuse),
            "mccb" => Ok(Self::Mccb),
            _ => Err(unknown("device kind", s)),
        }
    }
}

impl FromStr for PhaseConfig {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" | "1" => Ok(Self::Single),
            "three" | "3" => Ok(Self::Three),
            _ => Err(unknown("phase configuration", s)),
        }
    }
}

impl FromStr for LoadCategory {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lighting" => Ok(Self::Lighting),
            "other" => Ok(Self::Other),
            _ => Err(unknown("load category", s)),
        }
    }
}
