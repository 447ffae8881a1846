//! Element type registry.
//!
//! Every supported construction element is described by one
//! [`ElementProfile`]: the dimensions it requires, the three dimensions
//! whose product is its characteristic volume, and the rule that turns that
//! volume into materials. Validation, volume and yield code all read this
//! table; none of them match on the element type themselves.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CalcError;

/// Geometric field of an element.
///
/// Declaration order is the canonical order for reporting failing fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dimension {
    Height,
    Width,
    Length,
    Thickness,
    Depth,
}

impl Dimension {
    /// All dimensions in canonical order
    pub const ALL: [Dimension; 5] = [
        Dimension::Height,
        Dimension::Width,
        Dimension::Length,
        Dimension::Thickness,
        Dimension::Depth,
    ];

    /// Field name as used in JSON and on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Dimension::Height => "height",
            Dimension::Width => "width",
            Dimension::Length => "length",
            Dimension::Thickness => "thickness",
            Dimension::Depth => "depth",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Supported construction elements.
///
/// # Example
/// ```
/// use takeoff_core::elements::{Dimension, ElementType};
///
/// let wall: ElementType = "brick-wall".parse().unwrap();
/// assert_eq!(wall, ElementType::BrickWall);
/// assert_eq!(
///     wall.required_dimensions(),
///     &[Dimension::Height, Dimension::Length, Dimension::Thickness]
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementType {
    SquareColumn,
    SlabSubfloor,
    SlabInterfloor,
    Beam,
    LevelingWallsVertical,
    LevelingFloorsHorizontal,
    BrickWall,
}

/// How an element's volume is converted into materials.
///
/// Coefficients are per m³ of volume (mortar volume for masonry and
/// leveling) or per m² of surface where the name says so.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum YieldRule {
    /// Cast concrete: cement, sand and gravel straight from the volume
    Concrete {
        cement_kg_per_m3: f64,
        sand_m3_per_m3: f64,
        gravel_m3_per_m3: f64,
    },
    /// Brick masonry: bricks by wall face, mortar as a fraction of wall volume
    Masonry {
        face: [Dimension; 2],
        bricks_per_m2: f64,
        mortar_fraction: f64,
        cement_kg_per_m3: f64,
        sand_m3_per_m3: f64,
    },
    /// Leveling layer: the whole volume is mortar, resin by surface
    Leveling {
        face: [Dimension; 2],
        cement_kg_per_m3: f64,
        sand_m3_per_m3: f64,
        resin_l_per_m2: f64,
    },
}

/// Static description of one element type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementProfile {
    /// Dimensions that must be present and positive, canonical order
    pub required: &'static [Dimension],
    /// Factors of the volume formula, multiplied left to right
    pub volume: [Dimension; 3],
    /// Material yield rule
    pub yields: YieldRule,
    /// Lenient validation accepts a thickness of exactly zero
    pub zero_thickness_allowed: bool,
}

const CONCRETE_STRUCTURAL: YieldRule = YieldRule::Concrete {
    cement_kg_per_m3: 350.0,
    sand_m3_per_m3: 0.6,
    gravel_m3_per_m3: 0.6,
};

const CONCRETE_SLAB: YieldRule = YieldRule::Concrete {
    cement_kg_per_m3: 300.0,
    sand_m3_per_m3: 0.5,
    gravel_m3_per_m3: 0.7,
};

use Dimension::{Height, Length, Thickness, Width};

const SQUARE_COLUMN: ElementProfile = ElementProfile {
    required: &[Height, Width],
    volume: [Height, Width, Width],
    yields: CONCRETE_STRUCTURAL,
    zero_thickness_allowed: false,
};

const SLAB_SUBFLOOR: ElementProfile = ElementProfile {
    required: &[Width, Length, Thickness],
    volume: [Length, Width, Thickness],
    yields: CONCRETE_SLAB,
    zero_thickness_allowed: false,
};

const SLAB_INTERFLOOR: ElementProfile = ElementProfile {
    required: &[Width, Length, Thickness],
    volume: [Length, Width, Thickness],
    yields: CONCRETE_SLAB,
    zero_thickness_allowed: false,
};

const BEAM: ElementProfile = ElementProfile {
    required: &[Height, Width, Length],
    volume: [Length, Width, Height],
    yields: CONCRETE_STRUCTURAL,
    zero_thickness_allowed: true,
};

const LEVELING_WALLS_VERTICAL: ElementProfile = ElementProfile {
    required: &[Height, Length, Thickness],
    volume: [Length, Height, Thickness],
    yields: YieldRule::Leveling {
        face: [Length, Height],
        cement_kg_per_m3: 400.0,
        sand_m3_per_m3: 0.9,
        resin_l_per_m2: 0.5,
    },
    zero_thickness_allowed: true,
};

const LEVELING_FLOORS_HORIZONTAL: ElementProfile = ElementProfile {
    required: &[Width, Length, Thickness],
    volume: [Length, Width, Thickness],
    yields: YieldRule::Leveling {
        face: [Length, Width],
        cement_kg_per_m3: 450.0,
        sand_m3_per_m3: 0.95,
        resin_l_per_m2: 0.4,
    },
    zero_thickness_allowed: true,
};

const BRICK_WALL: ElementProfile = ElementProfile {
    required: &[Height, Length, Thickness],
    volume: [Length, Height, Thickness],
    yields: YieldRule::Masonry {
        face: [Length, Height],
        bricks_per_m2: 50.0,
        mortar_fraction: 0.25,
        cement_kg_per_m3: 350.0,
        sand_m3_per_m3: 1.2,
    },
    zero_thickness_allowed: false,
};

impl ElementType {
    /// All element types in presentation order
    pub const ALL: [ElementType; 7] = [
        ElementType::SquareColumn,
        ElementType::SlabSubfloor,
        ElementType::SlabInterfloor,
        ElementType::Beam,
        ElementType::LevelingWallsVertical,
        ElementType::LevelingFloorsHorizontal,
        ElementType::BrickWall,
    ];

    /// The authoritative profile for this type
    pub fn profile(&self) -> &'static ElementProfile {
        match self {
            ElementType::SquareColumn => &SQUARE_COLUMN,
            ElementType::SlabSubfloor => &SLAB_SUBFLOOR,
            ElementType::SlabInterfloor => &SLAB_INTERFLOOR,
            ElementType::Beam => &BEAM,
            ElementType::LevelingWallsVertical => &LEVELING_WALLS_VERTICAL,
            ElementType::LevelingFloorsHorizontal => &LEVELING_FLOORS_HORIZONTAL,
            ElementType::BrickWall => &BRICK_WALL,
        }
    }

    /// Dimensions this type requires, in canonical order
    pub fn required_dimensions(&self) -> &'static [Dimension] {
        self.profile().required
    }

    /// Stable machine name (`square-column`, `brick-wall`, ...)
    pub fn code(&self) -> &'static str {
        match self {
            ElementType::SquareColumn => "square-column",
            ElementType::SlabSubfloor => "slab-subfloor",
            ElementType::SlabInterfloor => "slab-interfloor",
            ElementType::Beam => "beam",
            ElementType::LevelingWallsVertical => "leveling-walls-vertical",
            ElementType::LevelingFloorsHorizontal => "leveling-floors-horizontal",
            ElementType::BrickWall => "brick-wall",
        }
    }

    /// Human-readable label for reports
    pub fn label(&self) -> &'static str {
        match self {
            ElementType::SquareColumn => "Square column",
            ElementType::SlabSubfloor => "Slab (subfloor)",
            ElementType::SlabInterfloor => "Slab (interfloor)",
            ElementType::Beam => "Beam",
            ElementType::LevelingWallsVertical => "Leveling (walls, vertical)",
            ElementType::LevelingFloorsHorizontal => "Leveling (floors, horizontal)",
            ElementType::BrickWall => "Brick wall",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lowercase and drop separators so `BrickWall`, `brick_wall` and
/// `brick-wall` compare equal.
fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

impl FromStr for ElementType {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        ElementType::ALL
            .into_iter()
            .find(|t| normalize(t.code()) == wanted)
            .ok_or_else(|| CalcError::unknown_element_type(s.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_sets_are_canonically_ordered() {
        for t in ElementType::ALL {
            let req = t.required_dimensions();
            assert!(req.windows(2).all(|w| w[0] < w[1]), "{t:?} not sorted");
        }
    }

    #[test]
    fn test_volume_factors_are_required() {
        for t in ElementType::ALL {
            for d in t.profile().volume {
                assert!(t.required_dimensions().contains(&d), "{t:?} uses {d} unrequired");
            }
        }
    }

    #[test]
    fn test_zero_thickness_types() {
        let lenient: Vec<_> = ElementType::ALL
            .into_iter()
            .filter(|t| t.profile().zero_thickness_allowed)
            .collect();
        assert_eq!(
            lenient,
            vec![
                ElementType::Beam,
                ElementType::LevelingWallsVertical,
                ElementType::LevelingFloorsHorizontal,
            ]
        );
    }

    #[test]
    fn test_parse_variants() {
        assert_eq!("square-column".parse::<ElementType>().unwrap(), ElementType::SquareColumn);
        assert_eq!("SlabInterfloor".parse::<ElementType>().unwrap(), ElementType::SlabInterfloor);
        assert_eq!(
            "leveling_floors_horizontal".parse::<ElementType>().unwrap(),
            ElementType::LevelingFloorsHorizontal
        );
    }

    #[test]
    fn test_parse_unknown() {
        let err = "dome".parse::<ElementType>().unwrap_err();
        assert_eq!(err, CalcError::unknown_element_type("dome"));
    }

    #[test]
    fn test_serde_names_match_codes() {
        for t in ElementType::ALL {
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.code()));
        }
        assert_eq!(serde_json::to_string(&Dimension::Thickness).unwrap(), "\"thickness\"");
    }
}
