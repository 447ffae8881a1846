//! Element value objects.
//!
//! [`Element`] is the typed form the engine works on. [`ElementInput`] is the
//! loose form that arrives from JSON or the command line, where the type is
//! still an unchecked string.

use serde::{Deserialize, Serialize};

use crate::elements::{Dimension, ElementType};
use crate::errors::{CalcError, CalcResult};
use crate::units::Meters;

/// A construction element and its dimensions in meters.
///
/// Which dimensions matter depends on the type; the rest are carried along
/// but ignored.
///
/// ## JSON Example
///
/// ```json
/// {
///   "type": "brick-wall",
///   "length": 3.0,
///   "height": 2.5,
///   "thickness": 0.15
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    #[serde(rename = "type")]
    pub element_type: ElementType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thickness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<f64>,
}

impl Element {
    /// Create an element with no dimensions set.
    pub fn new(element_type: ElementType) -> Self {
        Element {
            element_type,
            height: None,
            width: None,
            length: None,
            thickness: None,
            depth: None,
        }
    }

    /// Square column of the given height and side width.
    ///
    /// ```rust
    /// use takeoff_core::elements::{Dimension, Element};
    ///
    /// let col = Element::square_column(3.0, 0.3);
    /// assert_eq!(col.get(Dimension::Width), Some(0.3));
    /// ```
    pub fn square_column(height: f64, width: f64) -> Self {
        Element::new(ElementType::SquareColumn)
            .with(Dimension::Height, height)
            .with(Dimension::Width, width)
    }

    /// Subfloor slab.
    pub fn slab_subfloor(length: f64, width: f64, thickness: f64) -> Self {
        Element::new(ElementType::SlabSubfloor)
            .with(Dimension::Length, length)
            .with(Dimension::Width, width)
            .with(Dimension::Thickness, thickness)
    }

    /// Interfloor slab.
    pub fn slab_interfloor(length: f64, width: f64, thickness: f64) -> Self {
        Element::new(ElementType::SlabInterfloor)
            .with(Dimension::Length, length)
            .with(Dimension::Width, width)
            .with(Dimension::Thickness, thickness)
    }

    /// Rectangular beam.
    pub fn beam(length: f64, width: f64, height: f64) -> Self {
        Element::new(ElementType::Beam)
            .with(Dimension::Length, length)
            .with(Dimension::Width, width)
            .with(Dimension::Height, height)
    }

    /// Brick wall.
    pub fn brick_wall(length: f64, height: f64, thickness: f64) -> Self {
        Element::new(ElementType::BrickWall)
            .with(Dimension::Length, length)
            .with(Dimension::Height, height)
            .with(Dimension::Thickness, thickness)
    }

    /// Leveling layer on a wall face.
    pub fn leveling_wall(length: f64, height: f64, thickness: f64) -> Self {
        Element::new(ElementType::LevelingWallsVertical)
            .with(Dimension::Length, length)
            .with(Dimension::Height, height)
            .with(Dimension::Thickness, thickness)
    }

    /// Leveling layer on a floor.
    pub fn leveling_floor(length: f64, width: f64, thickness: f64) -> Self {
        Element::new(ElementType::LevelingFloorsHorizontal)
            .with(Dimension::Length, length)
            .with(Dimension::Width, width)
            .with(Dimension::Thickness, thickness)
    }

    /// Return a copy with one dimension set.
    pub fn with(mut self, dimension: Dimension, value: f64) -> Self {
        *self.slot_mut(dimension) = Some(value);
        self
    }

    /// Return a copy with one dimension cleared.
    pub fn without(mut self, dimension: Dimension) -> Self {
        *self.slot_mut(dimension) = None;
        self
    }

    /// Raw value of a dimension.
    pub fn get(&self, dimension: Dimension) -> Option<f64> {
        match dimension {
            Dimension::Height => self.height,
            Dimension::Width => self.width,
            Dimension::Length => self.length,
            Dimension::Thickness => self.thickness,
            Dimension::Depth => self.depth,
        }
    }

    /// A dimension as a length, or a calculation error if absent.
    ///
    /// Formulas call this only after validation, so an absent value here
    /// means the caller skipped validation.
    pub fn meters(&self, dimension: Dimension) -> CalcResult<Meters> {
        self.get(dimension).map(Meters).ok_or_else(|| {
            CalcError::calculation_failed(
                self.element_type.code(),
                format!("{} is required but not set", dimension),
            )
        })
    }

    /// Dimensions that are set, canonical order.
    pub fn dimensions(&self) -> impl Iterator<Item = (Dimension, f64)> + '_ {
        Dimension::ALL
            .into_iter()
            .filter_map(|d| self.get(d).map(|v| (d, v)))
    }

    fn slot_mut(&mut self, dimension: Dimension) -> &mut Option<f64> {
        match dimension {
            Dimension::Height => &mut self.height,
            Dimension::Width => &mut self.width,
            Dimension::Length => &mut self.length,
            Dimension::Thickness => &mut self.thickness,
            Dimension::Depth => &mut self.depth,
        }
    }
}

/// Unchecked element as supplied by a user or another program.
///
/// Converting into [`Element`] resolves the type name:
/// a missing type is a configuration error, an unrecognized one an
/// unknown-type error. Dimensions are passed through untouched; judging
/// them is the validator's job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementInput {
    #[serde(rename = "type", default)]
    pub element_type: Option<String>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default)]
    pub thickness: Option<f64>,
    #[serde(default)]
    pub depth: Option<f64>,
}

impl TryFrom<ElementInput> for Element {
    type Error = CalcError;

    fn try_from(input: ElementInput) -> CalcResult<Self> {
        let name = match input.element_type.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => return Err(CalcError::configuration("element type is not set")),
        };
        let element_type: ElementType = name.parse()?;
        Ok(Element {
            element_type,
            height: input.height,
            width: input.width,
            length: input.length,
            thickness: input.thickness,
            depth: input.depth,
        })
    }
}
