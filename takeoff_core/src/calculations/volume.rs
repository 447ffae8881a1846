//! # Volume Calculation
//!
//! Characteristic volume of an element, in m³. The formula is the product of
//! the three dimensions listed in the element's profile:
//!
//! | Type | Formula |
//! |---|---|
//! | Square column | height × width × width |
//! | Slab (subfloor / interfloor) | length × width × thickness |
//! | Beam | length × width × height |
//! | Brick wall | length × height × thickness |
//! | Leveling (walls, vertical) | length × height × thickness |
//! | Leveling (floors, horizontal) | length × width × thickness |
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::calculations::volume::compute_volume;
//! use takeoff_core::elements::Element;
//!
//! let volume = compute_volume(&Element::square_column(3.0, 0.3)).unwrap();
//! assert!((volume - 0.27).abs() < 1e-12);
//! ```

use crate::elements::{Dimension, Element};
use crate::errors::{CalcError, CalcResult};
use crate::units::{CubicMeters, SquareMeters};

/// Compute the volume of a validated element.
///
/// Fails with a calculation error if a formula dimension is absent (the
/// element was not validated) or the product is not finite.
pub fn compute_volume(element: &Element) -> CalcResult<f64> {
    volume_of(element).map(CubicMeters::value)
}

/// Typed form of [`compute_volume`].
pub fn volume_of(element: &Element) -> CalcResult<CubicMeters> {
    let [a, b, c] = element.element_type.profile().volume;
    let volume = element.meters(a)? * element.meters(b)? * element.meters(c)?;
    ensure_finite(element, "volume", volume.0)?;
    Ok(volume)
}

/// Area of the face spanned by two dimensions (wall face, floor surface).
pub fn face_area(element: &Element, face: [Dimension; 2]) -> CalcResult<SquareMeters> {
    let area = element.meters(face[0])? * element.meters(face[1])?;
    ensure_finite(element, "area", area.0)?;
    Ok(area)
}

pub(crate) fn ensure_finite(element: &Element, quantity: &str, value: f64) -> CalcResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CalcError::calculation_failed(
            element.element_type.code(),
            format!("{} is not finite ({})", quantity, value),
        ))
    }
}
