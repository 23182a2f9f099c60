//! In-memory application record store.
//!
//! The store is the single source of truth read by the summary, the list view
//! and the detail presenter. Every mutation bumps `version`, which callers use
//! to key memoized derivations.

use crate::entity::{Application, ApplicationStatus};
use crate::error::{AdmissionsError, Result};

#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<Application>,
    version: u64,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<Application>) -> Self {
        Self {
            records,
            version: 1,
        }
    }

    /// Replace the whole collection, e.g. after a (re)load.
    pub fn replace_all(&mut self, records: Vec<Application>) {
        self.records = records;
        self.version += 1;
    }

    pub fn records(&self) -> &[Application] {
        &self.records
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Application> {
        self.records.iter().find(|app| app.id == id)
    }

    /// Replace the record with `id` by a copy carrying `status`.
    ///
    /// Other records are untouched. Setting the status a record already has
    /// leaves the version unchanged.
    pub fn set_status(&mut self, id: &str, status: ApplicationStatus) -> Result<&Application> {
        let idx = self
            .records
            .iter()
            .position(|app| app.id == id)
            .ok_or_else(|| AdmissionsError::NotFound(id.to_string()))?;

        if self.records[idx].application_status != status {
            self.records[idx] = self.records[idx].with_status(status);
            self.version += 1;
        }

        Ok(&self.records[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture;

    #[test]
    fn test_empty_store() {
        let store = RecordStore::new();
        assert!(store.is_empty());
        assert_eq!(store.version(), 0);
        assert!(store.get("app-001").is_none());
    }

    #[test]
    fn test_set_status_replaces_only_target() {
        let mut store = RecordStore::from_records(fixture::applications().unwrap());
        let before = store.records().to_vec();

        let updated = store
            .set_status("app-004", ApplicationStatus::Approved)
            .unwrap();
        assert_eq!(updated.application_status, ApplicationStatus::Approved);

        for (old, new) in before.iter().zip(store.records()) {
            if old.id == "app-004" {
                assert_eq!(new, &old.with_status(ApplicationStatus::Approved));
            } else {
                assert_eq!(new, old);
            }
        }
    }

    #[test]
    fn test_set_status_is_idempotent() {
        let mut store = RecordStore::from_records(fixture::applications().unwrap());
        store
            .set_status("app-001", ApplicationStatus::Rejected)
            .unwrap();
        let version = store.version();
        let snapshot = store.records().to_vec();

        store
            .set_status("app-001", ApplicationStatus::Rejected)
            .unwrap();
        assert_eq!(store.version(), version);
        assert_eq!(store.records(), snapshot.as_slice());
    }

    #[test]
    fn test_set_status_unknown_id() {
        let mut store = RecordStore::from_records(fixture::applications().unwrap());
        let version = store.version();
        let err = store
            .set_status("app-999", ApplicationStatus::Approved)
            .unwrap_err();
        assert!(matches!(err, AdmissionsError::NotFound(id) if id == "app-999"));
        assert_eq!(store.version(), version);
    }

    #[test]
    fn test_replace_all_bumps_version() {
        let mut store = RecordStore::new();
        store.replace_all(fixture::applications().unwrap());
        assert_eq!(store.len(), 6);
        assert_eq!(store.version(), 1);
    }
}
