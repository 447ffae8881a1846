//! # Materials
//!
//! Material kinds the estimator can ask for and the quantity records the
//! yield engine produces.
//!
//! Each [`MaterialKind`] has an intrinsic base unit. A [`MaterialQuantity`]
//! uses that unit unless one is supplied explicitly.
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::materials::{MaterialKind, MaterialQuantity};
//! use takeoff_core::units::Unit;
//!
//! let cement = MaterialQuantity::new(MaterialKind::Cement, 94.5);
//! assert_eq!(cement.unit, Unit::Kilogram);
//! assert_eq!(cement.to_string(), "Cement: 94.500 kg");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::units::Unit;

/// Construction materials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MaterialKind {
    Cement,
    Sand,
    Gravel,
    Brick,
    Nail,
    Paint,
    Wood,
    Resin,
}

impl MaterialKind {
    /// All material kinds
    pub const ALL: [MaterialKind; 8] = [
        MaterialKind::Cement,
        MaterialKind::Sand,
        MaterialKind::Gravel,
        MaterialKind::Brick,
        MaterialKind::Nail,
        MaterialKind::Paint,
        MaterialKind::Wood,
        MaterialKind::Resin,
    ];

    /// Unit the material is normally counted in
    pub fn base_unit(&self) -> Unit {
        match self {
            MaterialKind::Cement => Unit::Kilogram,
            MaterialKind::Sand => Unit::CubicMeter,
            MaterialKind::Gravel => Unit::CubicMeter,
            MaterialKind::Brick => Unit::Piece,
            MaterialKind::Nail => Unit::Piece,
            MaterialKind::Paint => Unit::Liter,
            MaterialKind::Wood => Unit::Meter,
            MaterialKind::Resin => Unit::Liter,
        }
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            MaterialKind::Cement => "Cement",
            MaterialKind::Sand => "Sand",
            MaterialKind::Gravel => "Gravel",
            MaterialKind::Brick => "Brick",
            MaterialKind::Nail => "Nail",
            MaterialKind::Paint => "Paint",
            MaterialKind::Wood => "Wood",
            MaterialKind::Resin => "Resin",
        }
    }
}

impl fmt::Display for MaterialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An amount of one material.
///
/// ## JSON Example
///
/// ```json
/// { "kind": "sand", "unit": "cubic-meter", "amount": 0.162 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialQuantity {
    pub kind: MaterialKind,
    pub unit: Unit,
    pub amount: f64,
}

impl MaterialQuantity {
    /// Quantity in the kind's base unit.
    pub fn new(kind: MaterialKind, amount: f64) -> Self {
        MaterialQuantity {
            kind,
            unit: kind.base_unit(),
            amount,
        }
    }

    /// Quantity in an explicit unit.
    pub fn with_unit(kind: MaterialKind, unit: Unit, amount: f64) -> Self {
        MaterialQuantity { kind, unit, amount }
    }

    /// Amount formatted with the given number of decimals; counts are
    /// always whole.
    pub fn format_amount(&self, decimals: usize) -> String {
        if self.unit.is_count() {
            format!("{:.0}", self.amount)
        } else {
            format!("{:.*}", decimals, self.amount)
        }
    }
}

impl fmt::Display for MaterialQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} {}", self.kind, self.format_amount(3), self.unit)
    }
}

/// Sum quantities per (kind, unit), keeping first-seen order.
///
/// ```rust
/// use takeoff_core::materials::{summarize, MaterialKind, MaterialQuantity};
///
/// let total = summarize([
///     MaterialQuantity::new(MaterialKind::Cement, 10.0),
///     MaterialQuantity::new(MaterialKind::Sand, 0.5),
///     MaterialQuantity::new(MaterialKind::Cement, 5.0),
/// ]);
/// assert_eq!(total.len(), 2);
/// assert_eq!(total[0].amount, 15.0);
/// ```
pub fn summarize(quantities: impl IntoIterator<Item = MaterialQuantity>) -> Vec<MaterialQuantity> {
    let mut totals: Vec<MaterialQuantity> = Vec::new();
    for q in quantities {
        match totals
            .iter_mut()
            .find(|t| t.kind == q.kind && t.unit == q.unit)
        {
            Some(total) => total.amount += q.amount,
            None => totals.push(q),
        }
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_units() {
        assert_eq!(MaterialKind::Cement.base_unit(), Unit::Kilogram);
        assert_eq!(MaterialKind::Sand.base_unit(), Unit::CubicMeter);
        assert_eq!(MaterialKind::Gravel.base_unit(), Unit::CubicMeter);
        assert_eq!(MaterialKind::Brick.base_unit(), Unit::Piece);
        assert_eq!(MaterialKind::Paint.base_unit(), Unit::Liter);
        assert_eq!(MaterialKind::Wood.base_unit(), Unit::Meter);
        assert_eq!(MaterialKind::Resin.base_unit(), Unit::Liter);
    }

    #[test]
    fn test_unit_override() {
        let sand = MaterialQuantity::with_unit(MaterialKind::Sand, Unit::Kilogram, 1500.0);
        assert_eq!(sand.unit, Unit::Kilogram);
        assert_eq!(sand.kind, MaterialKind::Sand);
    }

    #[test]
    fn test_count_formatting() {
        let bricks = MaterialQuantity::new(MaterialKind::Brick, 375.0);
        assert_eq!(bricks.format_amount(3), "375");
        assert_eq!(bricks.to_string(), "Brick: 375 pc");
    }

    #[test]
    fn test_summarize_keeps_units_apart() {
        let total = summarize([
            MaterialQuantity::new(MaterialKind::Sand, 0.5),
            MaterialQuantity::with_unit(MaterialKind::Sand, Unit::Kilogram, 100.0),
            MaterialQuantity::new(MaterialKind::Sand, 0.25),
        ]);
        assert_eq!(total.len(), 2);
        assert_eq!(total[0].amount, 0.75);
        assert_eq!(total[1].unit, Unit::Kilogram);
    }

    #[test]
    fn test_serialization() {
        let q = MaterialQuantity::new(MaterialKind::Resin, 3.75);
        let json = serde_json::to_string(&q).unwrap();
        assert_eq!(json, r#"{"kind":"resin","unit":"liter","amount":3.75}"#);
        let roundtrip: MaterialQuantity = serde_json::from_str(&json).unwrap();
        assert_eq!(q, roundtrip);
    }
}
