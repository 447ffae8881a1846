//! # Estimator Service
//!
//! Ties the pure [`Assembler`] to a store. The store and clock are handed in
//! at construction; the current project is an argument to every call.
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::calculations::{Strictness, SystemClock};
//! use takeoff_core::elements::Element;
//! use takeoff_core::estimator::Estimator;
//! use takeoff_core::ledger::Ledger;
//! use takeoff_core::project::Project;
//! use takeoff_core::store::ProjectStore;
//!
//! let mut ledger = Ledger::new();
//! let project = ledger.insert(Project::new("Casa Verde", "Acme", "12 Harbor Rd")).unwrap();
//!
//! let mut estimator = Estimator::new(ledger, Strictness::Strict, SystemClock);
//! let record = estimator.estimate(project, Element::brick_wall(3.0, 2.5, 0.15)).unwrap();
//! assert!(record.id.is_some());
//!
//! let bom = estimator.bill_of_materials(project).unwrap();
//! assert_eq!(bom.len(), 3);
//! ```

use tracing::{debug, info, instrument};

use crate::calculations::{Assembler, CalculationRecord, Clock, Strictness};
use crate::elements::Element;
use crate::errors::{CalcError, CalcResult};
use crate::materials::{summarize, MaterialQuantity};
use crate::project::ProjectId;
use crate::store::{CalculationStore, ProjectStore};

/// Estimates elements for projects held in a store.
pub struct Estimator<S, C: Clock> {
    store: S,
    assembler: Assembler<C>,
}

impl<S, C> Estimator<S, C>
where
    S: ProjectStore + CalculationStore,
    C: Clock,
{
    pub fn new(store: S, strictness: Strictness, clock: C) -> Self {
        Estimator {
            store,
            assembler: Assembler::new(strictness, clock),
        }
    }

    /// Estimate an element and save the record under the project.
    #[instrument(skip(self, element), fields(element_type = element.element_type.code()))]
    pub fn estimate(&mut self, project_id: ProjectId, element: Element) -> CalcResult<CalculationRecord> {
        let record = self.preview(project_id, element)?;
        let saved = self.store.save(record)?;
        info!(
            record = ?saved.id,
            volume = saved.computed_volume,
            materials = saved.materials.len(),
            "estimate recorded"
        );
        Ok(saved)
    }

    /// Estimate an element for a project without saving it.
    pub fn preview(&self, project_id: ProjectId, element: Element) -> CalcResult<CalculationRecord> {
        self.require_project(project_id)?;
        self.assembler.assemble(project_id, element)
    }

    /// Saved records of a project, oldest first.
    pub fn history(&self, project_id: ProjectId) -> CalcResult<Vec<CalculationRecord>> {
        self.require_project(project_id)?;
        let mut records = self.store.find_by_project(project_id)?;
        records.sort_by_key(|r| r.date);
        Ok(records)
    }

    /// Total of every material recorded for a project.
    ///
    /// Quantities are summed per material and unit, in the order each first
    /// appears in the history.
    pub fn bill_of_materials(&self, project_id: ProjectId) -> CalcResult<Vec<MaterialQuantity>> {
        let records = self.history(project_id)?;
        debug!(%project_id, records = records.len(), "summing bill of materials");
        Ok(summarize(
            records.into_iter().flat_map(|r| r.materials.into_iter()),
        ))
    }

    fn require_project(&self, project_id: ProjectId) -> CalcResult<()> {
        if self.store.exists(project_id) {
            Ok(())
        } else {
            Err(CalcError::project_not_found(project_id))
        }
    }
}
