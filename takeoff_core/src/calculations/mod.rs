//! # Material Estimation
//!
//! The estimation pipeline, one module per stage:
//!
//! - [`validation`] - required-dimension checks (`validate`)
//! - [`volume`] - characteristic volume (`compute_volume`)
//! - [`yields`] - volume to material quantities (`compute_materials`)
//! - [`record`] - the `Assembler` that chains the three into a `CalculationRecord`
//!
//! Every function here is pure: no I/O, no logging, no shared state. Each
//! stage reads the element's [`ElementProfile`](crate::elements::ElementProfile)
//! so the formulas exist in exactly one place.
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::calculations::{compute_materials, compute_volume, validate, Strictness};
//! use takeoff_core::elements::Element;
//!
//! let slab = Element::slab_subfloor(5.0, 4.0, 0.1);
//! assert!(validate(&slab, Strictness::Strict).ok);
//!
//! let volume = compute_volume(&slab).unwrap();
//! let materials = compute_materials(&slab, volume).unwrap();
//! for m in &materials {
//!     println!("{m}");
//! }
//! ```

pub mod record;
pub mod validation;
pub mod volume;
pub mod yields;

pub use record::{assemble, Assembler, CalculationRecord, Clock, FixedClock, RecordId, SystemClock};
pub use validation::{validate, Strictness, ValidationResult};
pub use volume::compute_volume;
pub use yields::compute_materials;
