//! # Stores
//!
//! Persistence seams for projects and calculation records. The estimation
//! engine never touches a store; the [`Estimator`](crate::estimator::Estimator)
//! service receives one explicitly.
//!
//! Two implementations ship with the crate:
//!
//! - [`Ledger`] - in memory, nothing persisted
//! - [`LedgerStore`] - a [`Ledger`] backed by a locked `.tko` file, saved
//!   atomically after every mutation
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::ledger::Ledger;
//! use takeoff_core::project::Project;
//! use takeoff_core::store::ProjectStore;
//!
//! let mut store = Ledger::new();
//! let id = store.insert(Project::new("Casa Verde", "Acme", "12 Harbor Rd")).unwrap();
//! assert!(store.exists(id));
//! assert_eq!(store.resolve_address(id).unwrap(), "12 Harbor Rd");
//! ```

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::calculations::{CalculationRecord, RecordId};
use crate::errors::{CalcError, CalcResult};
use crate::file_io::{load_ledger, load_ledger_with_lock_check, save_ledger, FileLock, LockInfo};
use crate::ledger::Ledger;
use crate::project::{GlobalSettings, Project, ProjectId};

/// Lookup and registration of projects.
pub trait ProjectStore {
    /// Whether a project with this id exists
    fn exists(&self, id: ProjectId) -> bool;

    /// Fetch a project
    fn get(&self, id: ProjectId) -> CalcResult<Project>;

    /// Register a project, returning its id
    fn insert(&mut self, project: Project) -> CalcResult<ProjectId>;

    /// All projects, oldest first
    fn list(&self) -> CalcResult<Vec<Project>>;

    /// Site address of a project
    fn resolve_address(&self, id: ProjectId) -> CalcResult<String> {
        self.get(id).map(|p| p.meta.address)
    }
}

/// Persistence of calculation records.
pub trait CalculationStore {
    /// Persist a record, returning it with its assigned id
    fn save(&mut self, record: CalculationRecord) -> CalcResult<CalculationRecord>;

    /// Records of one project, in save order
    fn find_by_project(&self, id: ProjectId) -> CalcResult<Vec<CalculationRecord>>;

    /// Fetch one record by id
    fn get_record(&self, id: RecordId) -> CalcResult<CalculationRecord>;
}

/// A ledger file opened for reading and, when locked, writing.
pub struct LedgerStore {
    path: PathBuf,
    ledger: Ledger,
    lock: Option<FileLock>,
    /// Live lock of another writer, seen when opened read-only
    held_by: Option<LockInfo>,
}

impl LedgerStore {
    /// Open a ledger for writing, creating it if the file does not exist.
    ///
    /// Holds the file lock until the store is dropped.
    #[instrument(skip(path, user_id), fields(path = %path.display()))]
    pub fn open(path: &Path, user_id: impl Into<String>) -> CalcResult<Self> {
        let lock = FileLock::acquire(path, user_id)?;
        let ledger = if path.exists() {
            load_ledger(path)?
        } else {
            info!("creating new ledger");
            let ledger = Ledger::new();
            save_ledger(&ledger, path)?;
            ledger
        };
        Ok(LedgerStore {
            path: path.to_path_buf(),
            ledger,
            lock: Some(lock),
            held_by: None,
        })
    }

    /// Open an existing ledger without taking the lock. Mutations fail.
    ///
    /// If another writer holds the lock, the ledger is still loaded and the
    /// holder is reported by [`held_by`](Self::held_by).
    #[instrument(skip(path), fields(path = %path.display()))]
    pub fn open_read_only(path: &Path) -> CalcResult<Self> {
        let (ledger, held_by) = load_ledger_with_lock_check(path)?;
        if let Some(info) = &held_by {
            warn!(user = %info.user_id, machine = %info.machine, "ledger is open for writing elsewhere");
        }
        Ok(LedgerStore {
            path: path.to_path_buf(),
            ledger,
            lock: None,
            held_by,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn settings(&self) -> GlobalSettings {
        self.ledger.settings
    }

    pub fn is_read_only(&self) -> bool {
        self.lock.is_none()
    }

    /// Writer holding the lock when this store was opened read-only.
    pub fn held_by(&self) -> Option<&LockInfo> {
        self.held_by.as_ref()
    }

    /// Replace the ledger settings and save.
    pub fn set_settings(&mut self, settings: GlobalSettings) -> CalcResult<()> {
        self.commit(|ledger| {
            ledger.settings = settings;
            Ok(())
        })
    }

    /// Apply a change to a copy of the ledger, save it, then keep it.
    ///
    /// The in-memory ledger only changes if the save succeeded.
    fn commit<T>(&mut self, change: impl FnOnce(&mut Ledger) -> CalcResult<T>) -> CalcResult<T> {
        if self.is_read_only() {
            return Err(CalcError::file_error(
                "write",
                self.path.display().to_string(),
                "ledger was opened read-only",
            ));
        }
        let mut next = self.ledger.clone();
        let out = change(&mut next)?;
        save_ledger(&next, &self.path)?;
        self.ledger = next;
        Ok(out)
    }
}

impl ProjectStore for LedgerStore {
    fn exists(&self, id: ProjectId) -> bool {
        self.ledger.exists(id)
    }

    fn get(&self, id: ProjectId) -> CalcResult<Project> {
        debug!(%id, "project lookup");
        self.ledger.get(id)
    }

    fn insert(&mut self, project: Project) -> CalcResult<ProjectId> {
        let id = self.commit(|ledger| ledger.insert(project))?;
        info!(%id, "project added");
        Ok(id)
    }

    fn list(&self) -> CalcResult<Vec<Project>> {
        self.ledger.list()
    }
}

impl CalculationStore for LedgerStore {
    fn save(&mut self, record: CalculationRecord) -> CalcResult<CalculationRecord> {
        let saved = self.commit(|ledger| ledger.save(record))?;
        if let Some(id) = saved.id {
            info!(record = %id, project = %saved.project_id, "calculation saved");
        }
        Ok(saved)
    }

    fn find_by_project(&self, id: ProjectId) -> CalcResult<Vec<CalculationRecord>> {
        debug!(%id, "history lookup");
        self.ledger.find_by_project(id)
    }

    fn get_record(&self, id: RecordId) -> CalcResult<CalculationRecord> {
        self.ledger.get_record(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::{assemble, Strictness, SystemClock};
    use crate::elements::Element;
    use std::env::temp_dir;
    use std::fs;

    fn temp_ledger_path(name: &str) -> PathBuf {
        temp_dir().join(format!("takeoff_store_{}_{}.tko", name, std::process::id()))
    }

    #[test]
    fn test_open_creates_file() {
        let path = temp_ledger_path("create");
        let _ = fs::remove_file(&path);

        let store = LedgerStore::open(&path, "tester").unwrap();
        assert!(path.exists());
        assert!(!store.is_read_only());
        assert_eq!(store.ledger().project_count(), 0);

        drop(store);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_mutations_are_persisted() {
        let path = temp_ledger_path("persist");
        let _ = fs::remove_file(&path);

        let (project_id, record_id) = {
            let mut store = LedgerStore::open(&path, "tester").unwrap();
            let project_id = store.insert(Project::new("Shed", "Me", "Backyard")).unwrap();
            let record = assemble(
                project_id,
                Element::slab_subfloor(3.0, 2.0, 0.1),
                Strictness::Strict,
                &SystemClock,
            )
            .unwrap();
            let saved = store.save(record).unwrap();
            (project_id, saved.id.unwrap())
        };

        let reopened = LedgerStore::open_read_only(&path).unwrap();
        assert_eq!(reopened.resolve_address(project_id).unwrap(), "Backyard");
        assert_eq!(reopened.find_by_project(project_id).unwrap().len(), 1);
        assert_eq!(reopened.get_record(record_id).unwrap().project_id, project_id);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_read_only_rejects_writes() {
        let path = temp_ledger_path("readonly");
        save_ledger(&Ledger::new(), &path).unwrap();

        let mut store = LedgerStore::open_read_only(&path).unwrap();
        let err = store.insert(Project::new("X", "", "")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
        assert_eq!(store.ledger().project_count(), 0);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_read_only_reports_lock_holder() {
        let path = temp_ledger_path("holder");
        let _ = fs::remove_file(&path);

        let writer = LedgerStore::open(&path, "alice").unwrap();
        let reader = LedgerStore::open_read_only(&path).unwrap();
        assert_eq!(reader.held_by().map(|i| i.user_id.as_str()), Some("alice"));
        assert!(writer.held_by().is_none());

        drop(writer);
        let reader = LedgerStore::open_read_only(&path).unwrap();
        assert!(reader.held_by().is_none());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_failed_change_leaves_ledger_untouched() {
        let path = temp_ledger_path("rollback");
        let _ = fs::remove_file(&path);

        let mut store = LedgerStore::open(&path, "tester").unwrap();
        let orphan = assemble(
            ProjectId::new_v4(),
            Element::beam(4.0, 0.2, 0.4),
            Strictness::Strict,
            &SystemClock,
        )
        .unwrap();
        assert!(store.save(orphan).is_err());
        assert_eq!(store.ledger().record_count(), 0);

        drop(store);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_settings_update() {
        let path = temp_ledger_path("settings");
        let _ = fs::remove_file(&path);

        let mut store = LedgerStore::open(&path, "tester").unwrap();
        let settings = GlobalSettings {
            strictness: Strictness::Lenient,
            report_decimals: 2,
        };
        store.set_settings(settings).unwrap();
        drop(store);

        let reopened = LedgerStore::open_read_only(&path).unwrap();
        assert_eq!(reopened.settings(), settings);

        let _ = fs::remove_file(&path);
    }
}
