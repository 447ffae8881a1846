//! # takeoff_core - Construction Material Estimation Engine
//!
//! `takeoff_core` turns a structural element (a column, slab, beam, brick
//! wall or leveling layer, with its dimensions in meters) into the raw
//! materials needed to build it. All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Pure engine**: validation, volume and yields are plain functions
//! - **One table**: every per-type rule lives in [`ElementType::profile`]
//! - **Explicit context**: stores and clocks are passed in, never global
//! - **Rich Errors**: Structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use takeoff_core::calculations::{assemble, Strictness, SystemClock};
//! use takeoff_core::elements::Element;
//! use takeoff_core::materials::MaterialKind;
//! use takeoff_core::project::ProjectId;
//!
//! let record = assemble(
//!     ProjectId::new_v4(),
//!     Element::square_column(3.0, 0.3),
//!     Strictness::Strict,
//!     &SystemClock,
//! )
//! .unwrap();
//!
//! assert!((record.computed_volume - 0.27).abs() < 1e-9);
//! assert_eq!(record.materials[0].kind, MaterialKind::Cement);
//!
//! let json = serde_json::to_string_pretty(&record).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`elements`] - Element types, dimensions and the per-type profile table
//! - [`calculations`] - Validation, volume, yields and record assembly
//! - [`materials`] - Material kinds and quantities
//! - [`units`] - Type-safe unit wrappers
//! - [`project`] - Projects and ledger-wide settings
//! - [`ledger`] - In-memory ledger of projects and records
//! - [`store`] - Store traits and the file-backed ledger store
//! - [`estimator`] - Estimation service over a store
//! - [`report`] / [`pdf`] - Text and PDF renderings of a record
//! - [`errors`] - Structured error types
//! - [`file_io`] - File operations with atomic saves and locking

pub mod calculations;
pub mod elements;
pub mod errors;
pub mod estimator;
pub mod file_io;
pub mod ledger;
pub mod materials;
pub mod pdf;
pub mod project;
pub mod report;
pub mod store;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{assemble, Assembler, CalculationRecord, Strictness};
pub use elements::{Dimension, Element, ElementType};
pub use errors::{CalcError, CalcResult};
pub use estimator::Estimator;
pub use file_io::{load_ledger, save_ledger, FileLock};
pub use ledger::Ledger;
pub use materials::{MaterialKind, MaterialQuantity};
pub use project::{GlobalSettings, Project, ProjectId, ProjectMetadata};
pub use store::{CalculationStore, LedgerStore, ProjectStore};
