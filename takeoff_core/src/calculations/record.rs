//! # Calculation Records
//!
//! The [`Assembler`] runs validation, volume and yield in sequence and
//! packages the outcome as an immutable [`CalculationRecord`]. It performs no
//! I/O; the timestamp comes from an injected [`Clock`] so the same inputs
//! always give the same record.
//!
//! ## Example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use takeoff_core::calculations::record::{Assembler, FixedClock};
//! use takeoff_core::calculations::validation::Strictness;
//! use takeoff_core::elements::Element;
//! use takeoff_core::project::ProjectId;
//!
//! let clock = FixedClock(Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap());
//! let assembler = Assembler::new(Strictness::Strict, clock);
//!
//! let record = assembler
//!     .assemble(ProjectId::new_v4(), Element::square_column(3.0, 0.3))
//!     .unwrap();
//!
//! assert!(record.id.is_none());
//! assert_eq!(record.materials.len(), 3);
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::validation::{validate, Strictness};
use crate::calculations::volume::compute_volume;
use crate::calculations::yields::compute_materials;
use crate::elements::Element;
use crate::errors::{CalcError, CalcResult};
use crate::materials::MaterialQuantity;
use crate::project::ProjectId;

/// Identifier a store assigns to a saved record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub Uuid);

impl RecordId {
    /// Generate a fresh random id
    pub fn new_v4() -> Self {
        RecordId(Uuid::new_v4())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for RecordId {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(RecordId)
            .map_err(|_| CalcError::record_not_found(s.trim()))
    }
}

/// Outcome of one estimate for one element.
///
/// ## JSON Example
///
/// ```json
/// {
///   "id": null,
///   "project_id": "6f0c5a4e-3d1b-4f63-9a43-1c2f3f9d8b11",
///   "date": "2025-03-01T09:00:00Z",
///   "element": { "type": "square-column", "height": 3.0, "width": 0.3 },
///   "computed_volume": 0.27,
///   "materials": [
///     { "kind": "cement", "unit": "kilogram", "amount": 94.5 },
///     { "kind": "sand", "unit": "cubic-meter", "amount": 0.162 },
///     { "kind": "gravel", "unit": "cubic-meter", "amount": 0.162 }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRecord {
    /// Assigned by the store on save; `None` before
    pub id: Option<RecordId>,
    pub project_id: ProjectId,
    pub date: DateTime<Utc>,
    pub element: Element,
    /// Characteristic volume in m³
    pub computed_volume: f64,
    /// Materials in yield order
    pub materials: Vec<MaterialQuantity>,
}

impl CalculationRecord {
    /// Copy of this record carrying a store-assigned id.
    pub fn with_id(self, id: RecordId) -> Self {
        CalculationRecord { id: Some(id), ..self }
    }
}

/// Source of "now" for record timestamps.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// Builds calculation records.
#[derive(Debug, Clone)]
pub struct Assembler<C: Clock = SystemClock> {
    strictness: Strictness,
    clock: C,
}

impl<C: Clock> Assembler<C> {
    pub fn new(strictness: Strictness, clock: C) -> Self {
        Assembler { strictness, clock }
    }

    /// Validate, compute and package one element.
    ///
    /// # Returns
    ///
    /// * `Ok(CalculationRecord)` - record without an id
    /// * `Err(CalcError::InvalidElement)` - required dimensions missing/invalid
    /// * `Err(CalcError::Calculation)` - a formula failed
    pub fn assemble(&self, project_id: ProjectId, element: Element) -> CalcResult<CalculationRecord> {
        self.assemble_at(project_id, element, self.clock.now())
    }

    /// Same as [`assemble`](Self::assemble) with an explicit timestamp.
    pub fn assemble_at(
        &self,
        project_id: ProjectId,
        element: Element,
        date: DateTime<Utc>,
    ) -> CalcResult<CalculationRecord> {
        validate(&element, self.strictness).into_result(&element)?;

        let computed_volume = compute_volume(&element).map_err(|e| as_calculation_error("volume", e))?;
        let materials = compute_materials(&element, computed_volume)
            .map_err(|e| as_calculation_error("yield", e))?;

        Ok(CalculationRecord {
            id: None,
            project_id,
            date,
            element,
            computed_volume,
            materials,
        })
    }
}

/// Anything the formulas raise past validation is a defect in the formulas.
fn as_calculation_error(stage: &str, error: CalcError) -> CalcError {
    match error {
        CalcError::Calculation { .. } => error,
        other => CalcError::calculation_failed(stage, other.to_string()),
    }
}

/// One-shot assembly without keeping an [`Assembler`] around.
pub fn assemble(
    project_id: ProjectId,
    element: Element,
    strictness: Strictness,
    clock: &impl Clock,
) -> CalcResult<CalculationRecord> {
    Assembler::new(strictness, clock).assemble(project_id, element)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Dimension, ElementType};
    use crate::materials::MaterialKind;
    use chrono::TimeZone;

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap())
    }

    #[test]
    fn test_assemble_square_column() {
        let project = ProjectId::new_v4();
        let record = assemble(project, Element::square_column(3.0, 0.3), Strictness::Strict, &clock()).unwrap();
        assert_eq!(record.project_id, project);
        assert_eq!(record.date, clock().0);
        assert!((record.computed_volume - 0.27).abs() < 1e-12);
        assert_eq!(record.materials[0].kind, MaterialKind::Cement);
        assert!((record.materials[0].amount - 94.5).abs() < 1e-9);
    }

    #[test]
    fn test_assemble_is_deterministic() {
        let assembler = Assembler::new(Strictness::Strict, clock());
        let project = ProjectId::new_v4();
        let element = Element::brick_wall(3.0, 2.5, 0.15);
        let a = assembler.assemble(project, element.clone()).unwrap();
        let b = assembler.assemble(project, element).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_invalid_element_short_circuits() {
        let assembler = Assembler::new(Strictness::Strict, clock());
        let err = assembler
            .assemble(ProjectId::new_v4(), Element::new(ElementType::SlabSubfloor).with(Dimension::Width, 4.0))
            .unwrap_err();
        assert_eq!(
            err,
            CalcError::invalid_element(
                ElementType::SlabSubfloor,
                vec![Dimension::Length, Dimension::Thickness]
            )
        );
    }

    #[test]
    fn test_strictness_controls_zero_thickness() {
        let floor = Element::leveling_floor(4.0, 3.0, 0.0);
        let strict = Assembler::new(Strictness::Strict, clock());
        assert!(strict.assemble(ProjectId::new_v4(), floor.clone()).is_err());

        let lenient = Assembler::new(Strictness::Lenient, clock());
        let record = lenient.assemble(ProjectId::new_v4(), floor).unwrap();
        assert_eq!(record.computed_volume, 0.0);
        assert_eq!(record.materials.len(), 3);
    }

    #[test]
    fn test_formula_failure_becomes_calculation_error() {
        let assembler = Assembler::new(Strictness::Strict, clock());
        let err = assembler
            .assemble(ProjectId::new_v4(), Element::slab_subfloor(1e200, 1e200, 1.0))
            .unwrap_err();
        assert_eq!(err.error_code(), "CALCULATION_ERROR");
    }

    #[test]
    fn test_with_id() {
        let record = assemble(ProjectId::new_v4(), Element::beam(4.0, 0.2, 0.4), Strictness::Strict, &clock()).unwrap();
        let id = RecordId::new_v4();
        let saved = record.clone().with_id(id);
        assert_eq!(saved.id, Some(id));
        assert_eq!(saved.materials, record.materials);
    }

    #[test]
    fn test_record_serialization() {
        let record = assemble(ProjectId::new_v4(), Element::leveling_wall(3.0, 2.7, 0.02), Strictness::Strict, &clock()).unwrap();
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"type\":\"leveling-walls-vertical\""));
        assert!(json.contains("2025-03-01T09:00:00Z"));
        let roundtrip: CalculationRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, record);
    }
}
