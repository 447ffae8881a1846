//! # Elements
//!
//! The seven construction elements the estimator understands and the
//! dimensions each of them needs.
//!
//! | Type | Required | Volume |
//! |---|---|---|
//! | Square column | height, width | height × width × width |
//! | Slab (subfloor / interfloor) | width, length, thickness | length × width × thickness |
//! | Beam | height, width, length | length × width × height |
//! | Leveling (walls, vertical) | height, length, thickness | length × height × thickness |
//! | Leveling (floors, horizontal) | width, length, thickness | length × width × thickness |
//! | Brick wall | height, length, thickness | length × height × thickness |
//!
//! All dimensions are in meters.

pub mod element;
pub mod element_type;

pub use element::{Element, ElementInput};
pub use element_type::{Dimension, ElementProfile, ElementType, YieldRule};
