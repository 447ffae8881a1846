//! # Material Yield
//!
//! Converts an element's volume into the materials needed to build it.
//! The list order is part of the contract (reports print it as is):
//!
//! | Type | Materials, in order |
//! |---|---|
//! | Square column, Beam | Cement 350 kg/m³, Sand 0.6 m³/m³, Gravel 0.6 m³/m³ |
//! | Slabs | Cement 300 kg/m³, Sand 0.5 m³/m³, Gravel 0.7 m³/m³ |
//! | Brick wall | Brick ⌈face × 50⌉, Cement 350 kg/m³ mortar, Sand 1.2 m³/m³ mortar |
//! | Leveling (walls) | Cement 400 kg/m³, Sand 0.9 m³/m³, Resin 0.5 L/m² |
//! | Leveling (floors) | Cement 450 kg/m³, Sand 0.95 m³/m³, Resin 0.4 L/m² |
//!
//! The volume argument drives the concrete rules only. Brick wall mortar is
//! face area × thickness × 0.25 and leveling mortar is face area × thickness,
//! both taken from the element's own dimensions. Only the brick count is
//! rounded (up, to whole bricks).
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::calculations::yields::compute_materials;
//! use takeoff_core::elements::Element;
//! use takeoff_core::materials::MaterialKind;
//!
//! let wall = Element::brick_wall(3.0, 2.5, 0.15);
//! let materials = compute_materials(&wall, 1.125).unwrap();
//!
//! assert_eq!(materials[0].kind, MaterialKind::Brick);
//! assert_eq!(materials[0].amount, 375.0);
//! ```

use crate::calculations::volume::{ensure_finite, face_area};
use crate::elements::{Dimension, Element, YieldRule};
use crate::errors::{CalcError, CalcResult};
use crate::materials::{MaterialKind, MaterialQuantity};

/// Materials for an element of the given volume (m³).
///
/// The volume is normally the output of
/// [`compute_volume`](crate::calculations::volume::compute_volume); a
/// negative or non-finite volume is rejected as a calculation error.
/// Masonry and leveling quantities are computed from the element's face
/// and thickness, so they do not depend on the volume passed in.
pub fn compute_materials(element: &Element, volume: f64) -> CalcResult<Vec<MaterialQuantity>> {
    if !volume.is_finite() || volume < 0.0 {
        return Err(CalcError::calculation_failed(
            element.element_type.code(),
            format!("volume must be a finite, non-negative number (got {})", volume),
        ));
    }

    let materials = match element.element_type.profile().yields {
        YieldRule::Concrete {
            cement_kg_per_m3,
            sand_m3_per_m3,
            gravel_m3_per_m3,
        } => vec![
            MaterialQuantity::new(MaterialKind::Cement, volume * cement_kg_per_m3),
            MaterialQuantity::new(MaterialKind::Sand, volume * sand_m3_per_m3),
            MaterialQuantity::new(MaterialKind::Gravel, volume * gravel_m3_per_m3),
        ],

        YieldRule::Masonry {
            face,
            bricks_per_m2,
            mortar_fraction,
            cement_kg_per_m3,
            sand_m3_per_m3,
        } => {
            let wall_area = face_area(element, face)?;
            let bricks = (wall_area.0 * bricks_per_m2).ceil();
            let mortar = (wall_area * element.meters(Dimension::Thickness)?) * mortar_fraction;
            ensure_finite(element, "mortar volume", mortar.value())?;
            vec![
                MaterialQuantity::new(MaterialKind::Brick, bricks),
                MaterialQuantity::new(MaterialKind::Cement, mortar.value() * cement_kg_per_m3),
                MaterialQuantity::new(MaterialKind::Sand, mortar.value() * sand_m3_per_m3),
            ]
        }

        YieldRule::Leveling {
            face,
            cement_kg_per_m3,
            sand_m3_per_m3,
            resin_l_per_m2,
        } => {
            let area = face_area(element, face)?;
            let layer = area * element.meters(Dimension::Thickness)?;
            ensure_finite(element, "layer volume", layer.value())?;
            vec![
                MaterialQuantity::new(MaterialKind::Cement, layer.value() * cement_kg_per_m3),
                MaterialQuantity::new(MaterialKind::Sand, layer.value() * sand_m3_per_m3),
                MaterialQuantity::new(MaterialKind::Resin, area.0 * resin_l_per_m2),
            ]
        }
    };

    Ok(materials)
}
