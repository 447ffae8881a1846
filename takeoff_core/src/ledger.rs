//! # Ledger
//!
//! The `Ledger` is the root document of a `.tko` file: settings, projects
//! and every saved calculation record. In memory it is also the simplest
//! store, implementing both [`ProjectStore`] and [`CalculationStore`].
//!
//! ## Structure
//!
//! ```text
//! Ledger
//! ├── version: schema version (for migration compatibility)
//! ├── settings: GlobalSettings (strictness, report precision)
//! ├── projects: BTreeMap<ProjectId, Project>
//! └── calculations: Vec<CalculationRecord> (save order)
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::calculations::{CalculationRecord, RecordId};
use crate::errors::{CalcError, CalcResult};
use crate::project::{GlobalSettings, Project, ProjectId};
use crate::store::{CalculationStore, ProjectStore};

/// Current schema version for .tko files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root document of a ledger file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    /// Schema version
    pub version: String,

    /// Settings applied to new estimates
    #[serde(default)]
    pub settings: GlobalSettings,

    /// Projects keyed by id
    #[serde(default)]
    pub projects: BTreeMap<ProjectId, Project>,

    /// Saved calculation records, oldest first
    #[serde(default)]
    pub calculations: Vec<CalculationRecord>,
}

impl Ledger {
    /// Create an empty ledger with default settings.
    pub fn new() -> Self {
        Ledger {
            version: SCHEMA_VERSION.to_string(),
            settings: GlobalSettings::default(),
            projects: BTreeMap::new(),
            calculations: Vec::new(),
        }
    }

    /// Projects sorted by creation time.
    pub fn projects_by_creation(&self) -> Vec<&Project> {
        let mut projects: Vec<&Project> = self.projects.values().collect();
        projects.sort_by_key(|p| p.meta.created);
        projects
    }

    pub fn project_count(&self) -> usize {
        self.projects.len()
    }

    pub fn record_count(&self) -> usize {
        self.calculations.len()
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Ledger::new()
    }
}

impl ProjectStore for Ledger {
    fn exists(&self, id: ProjectId) -> bool {
        self.projects.contains_key(&id)
    }

    fn get(&self, id: ProjectId) -> CalcResult<Project> {
        self.projects
            .get(&id)
            .cloned()
            .ok_or_else(|| CalcError::project_not_found(id))
    }

    fn insert(&mut self, project: Project) -> CalcResult<ProjectId> {
        let id = project.id;
        self.projects.insert(id, project);
        Ok(id)
    }

    fn list(&self) -> CalcResult<Vec<Project>> {
        Ok(self.projects_by_creation().into_iter().cloned().collect())
    }
}

impl CalculationStore for Ledger {
    fn save(&mut self, record: CalculationRecord) -> CalcResult<CalculationRecord> {
        if !self.exists(record.project_id) {
            return Err(CalcError::project_not_found(record.project_id));
        }
        let saved = record.with_id(RecordId::new_v4());
        self.calculations.push(saved.clone());
        if let Some(project) = self.projects.get_mut(&saved.project_id) {
            project.touch();
        }
        Ok(saved)
    }

    fn find_by_project(&self, id: ProjectId) -> CalcResult<Vec<CalculationRecord>> {
        Ok(self
            .calculations
            .iter()
            .filter(|r| r.project_id == id)
            .cloned()
            .collect())
    }

    fn get_record(&self, id: RecordId) -> CalcResult<CalculationRecord> {
        self.calculations
            .iter()
            .find(|r| r.id == Some(id))
            .cloned()
            .ok_or_else(|| CalcError::record_not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::{assemble, FixedClock, Strictness};
    use crate::elements::Element;
    use chrono::{TimeZone, Utc};

    fn record_for(project: ProjectId, element: Element) -> CalculationRecord {
        let clock = FixedClock(Utc.with_ymd_and_hms(2025, 5, 2, 14, 30, 0).unwrap());
        assemble(project, element, Strictness::Strict, &clock).unwrap()
    }

    #[test]
    fn test_project_lookup() {
        let mut ledger = Ledger::new();
        let project = Project::new("Casa Verde", "Acme", "12 Harbor Rd");
        let id = ledger.insert(project).unwrap();

        assert!(ledger.exists(id));
        assert_eq!(ledger.resolve_address(id).unwrap(), "12 Harbor Rd");
        assert_eq!(ledger.get(id).unwrap().meta.name, "Casa Verde");

        let missing = ProjectId::new_v4();
        assert!(!ledger.exists(missing));
        assert_eq!(ledger.get(missing).unwrap_err().error_code(), "PROJECT_NOT_FOUND");
    }

    #[test]
    fn test_save_assigns_ids() {
        let mut ledger = Ledger::new();
        let id = ledger.insert(Project::new("P", "", "")).unwrap();

        let a = ledger.save(record_for(id, Element::square_column(3.0, 0.3))).unwrap();
        let b = ledger.save(record_for(id, Element::square_column(3.0, 0.3))).unwrap();

        assert!(a.id.is_some());
        assert_ne!(a.id, b.id);
        assert_eq!(ledger.record_count(), 2);
        assert_eq!(ledger.get_record(a.id.unwrap()).unwrap(), a);
    }

    #[test]
    fn test_save_for_unknown_project_rejected() {
        let mut ledger = Ledger::new();
        let orphan = record_for(ProjectId::new_v4(), Element::beam(4.0, 0.2, 0.4));
        assert!(ledger.save(orphan).is_err());
        assert_eq!(ledger.record_count(), 0);
    }

    #[test]
    fn test_find_by_project_keeps_save_order() {
        let mut ledger = Ledger::new();
        let house = ledger.insert(Project::new("House", "", "")).unwrap();
        let shed = ledger.insert(Project::new("Shed", "", "")).unwrap();

        ledger.save(record_for(house, Element::square_column(3.0, 0.3))).unwrap();
        ledger.save(record_for(shed, Element::beam(4.0, 0.2, 0.4))).unwrap();
        ledger.save(record_for(house, Element::brick_wall(3.0, 2.5, 0.15))).unwrap();

        let records = ledger.find_by_project(house).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].element, Element::square_column(3.0, 0.3));
        assert_eq!(records[1].element, Element::brick_wall(3.0, 2.5, 0.15));
    }

    #[test]
    fn test_ledger_serialization() {
        let mut ledger = Ledger::new();
        let id = ledger.insert(Project::new("Casa Verde", "Acme", "12 Harbor Rd")).unwrap();
        ledger.save(record_for(id, Element::leveling_floor(4.0, 3.0, 0.03))).unwrap();

        let json = serde_json::to_string_pretty(&ledger).unwrap();
        let roundtrip: Ledger = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, ledger);
    }
}
