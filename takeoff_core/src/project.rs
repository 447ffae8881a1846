//! # Project Data Structures
//!
//! A `Project` is the construction job that calculation records belong to.
//! It carries identity and descriptive metadata only; the records themselves
//! live in a [`CalculationStore`](crate::store::CalculationStore) keyed by
//! project id.
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::project::Project;
//!
//! let project = Project::new("Casa Verde", "Acme Builders", "12 Harbor Rd, Lisbon");
//!
//! let json = serde_json::to_string_pretty(&project).unwrap();
//! assert!(json.contains("Harbor Rd"));
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::validation::Strictness;
use crate::errors::CalcError;

/// Project identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub Uuid);

impl ProjectId {
    /// Generate a fresh random id
    pub fn new_v4() -> Self {
        ProjectId(Uuid::new_v4())
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ProjectId {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(ProjectId)
            .map_err(|_| CalcError::project_not_found(s.trim()))
    }
}

/// A construction project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub meta: ProjectMetadata,
}

impl Project {
    /// Create a new project with a fresh id.
    ///
    /// # Arguments
    ///
    /// * `name` - Project name shown on reports
    /// * `client` - Client name
    /// * `address` - Site address
    pub fn new(name: impl Into<String>, client: impl Into<String>, address: impl Into<String>) -> Self {
        let now = Utc::now();
        Project {
            id: ProjectId::new_v4(),
            meta: ProjectMetadata {
                name: name.into(),
                client: client.into(),
                address: address.into(),
                engineer: String::new(),
                created: now,
                modified: now,
            },
        }
    }

    /// Set the responsible engineer.
    pub fn with_engineer(mut self, engineer: impl Into<String>) -> Self {
        self.meta.engineer = engineer.into();
        self
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }
}

/// Descriptive project fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Project name
    pub name: String,

    /// Client name
    pub client: String,

    /// Site address
    pub address: String,

    /// Responsible engineer (may be empty)
    #[serde(default)]
    pub engineer: String,

    /// When the project was created
    pub created: DateTime<Utc>,

    /// When the project was last modified
    pub modified: DateTime<Utc>,
}

/// Settings shared by every project in a ledger.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlobalSettings {
    /// Dimension validation policy used for new estimates
    #[serde(default)]
    pub strictness: Strictness,

    /// Decimal places for non-count quantities in reports
    #[serde(default = "default_report_decimals")]
    pub report_decimals: usize,
}

fn default_report_decimals() -> usize {
    3
}

impl Default for GlobalSettings {
    fn default() -> Self {
        GlobalSettings {
            strictness: Strictness::Strict,
            report_decimals: default_report_decimals(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_creation() {
        let project = Project::new("Casa Verde", "Acme", "12 Harbor Rd").with_engineer("J. Doe");
        assert_eq!(project.meta.name, "Casa Verde");
        assert_eq!(project.meta.client, "Acme");
        assert_eq!(project.meta.address, "12 Harbor Rd");
        assert_eq!(project.meta.engineer, "J. Doe");
        assert_eq!(project.meta.created, project.meta.modified);
    }

    #[test]
    fn test_project_ids_are_unique() {
        let a = Project::new("A", "", "");
        let b = Project::new("A", "", "");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_project_id_parse() {
        let id = ProjectId::new_v4();
        let parsed: ProjectId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<ProjectId>().is_err());
    }

    #[test]
    fn test_project_serialization() {
        let project = Project::new("Casa Verde", "Acme", "12 Harbor Rd");
        let json = serde_json::to_string_pretty(&project).unwrap();
        assert!(json.contains(&project.id.to_string()));

        let roundtrip: Project = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, project);
    }

    #[test]
    fn test_settings_defaults_fill_missing_fields() {
        let settings: GlobalSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, GlobalSettings::default());

        let lenient: GlobalSettings = serde_json::from_str(r#"{"strictness":"lenient"}"#).unwrap();
        assert_eq!(lenient.strictness, Strictness::Lenient);
        assert_eq!(lenient.report_decimals, 3);
    }
}
