//! # Unit Types
//!
//! Type-safe wrappers for the metric quantities the estimator works with.
//! These are plain f64 newtypes: they serialize as bare numbers and cost
//! nothing at runtime, but keep lengths, areas and volumes from being mixed
//! up inside the formulas.
//!
//! All element dimensions are in meters. Products of dimensions promote
//! automatically: `Meters * Meters = SquareMeters`,
//! `SquareMeters * Meters = CubicMeters`.
//!
//! [`Unit`] is the reporting unit attached to each material quantity.
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::units::{CubicMeters, Meters, SquareMeters};
//!
//! let area: SquareMeters = Meters(3.0) * Meters(2.5);
//! assert_eq!(area.0, 7.5);
//!
//! let volume: CubicMeters = area * Meters(0.2);
//! assert!((volume.0 - 1.5).abs() < 1e-12);
//! ```

use std::fmt;
use std::ops::Mul;

use serde::{Deserialize, Serialize};

// ============================================================================
// Geometric Units
// ============================================================================

/// Length in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Area in square meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SquareMeters(pub f64);

/// Volume in cubic meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CubicMeters(pub f64);

impl Mul for Meters {
    type Output = SquareMeters;
    fn mul(self, rhs: Meters) -> SquareMeters {
        SquareMeters(self.0 * rhs.0)
    }
}

impl Mul<Meters> for SquareMeters {
    type Output = CubicMeters;
    fn mul(self, rhs: Meters) -> CubicMeters {
        CubicMeters(self.0 * rhs.0)
    }
}

// ============================================================================
// Reporting Unit
// ============================================================================

/// Unit a material quantity is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Unit {
    Kilogram,
    CubicMeter,
    Piece,
    Liter,
    Meter,
}

impl Unit {
    /// Short display symbol (kg, m³, pc, L, m)
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Kilogram => "kg",
            Unit::CubicMeter => "m³",
            Unit::Piece => "pc",
            Unit::Liter => "L",
            Unit::Meter => "m",
        }
    }

    /// Whether amounts in this unit are whole counts
    pub fn is_count(&self) -> bool {
        matches!(self, Unit::Piece)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }
        }
    };
}

impl_arithmetic!(Meters);
impl_arithmetic!(SquareMeters);
impl_arithmetic!(CubicMeters);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_products() {
        let area = Meters(4.0) * Meters(0.5);
        assert_eq!(area, SquareMeters(2.0));
        let volume = area * Meters(0.25);
        assert_eq!(volume, CubicMeters(0.5));
    }

    #[test]
    fn test_scaling() {
        let mortar = CubicMeters(1.125) * 0.25;
        assert_eq!(mortar, CubicMeters(0.28125));
        assert_eq!(mortar.value(), 0.28125);
    }

    #[test]
    fn test_unit_symbols() {
        assert_eq!(Unit::Kilogram.to_string(), "kg");
        assert_eq!(Unit::CubicMeter.to_string(), "m³");
        assert!(Unit::Piece.is_count());
        assert!(!Unit::Liter.is_count());
    }

    #[test]
    fn test_serialization() {
        let m = Meters(2.5);
        assert_eq!(serde_json::to_string(&m).unwrap(), "2.5");
        assert_eq!(serde_json::to_string(&Unit::CubicMeter).unwrap(), "\"cubic-meter\"");

        let roundtrip: Unit = serde_json::from_str("\"piece\"").unwrap();
        assert_eq!(roundtrip, Unit::Piece);
    }
}
