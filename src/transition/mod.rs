//! Status transitions: approve or reject one application.
//!
//! Ids the store does not hold are refused up front. Otherwise the backend is
//! told first; the local store only changes once the backend
//! accepted the decision, so a failed call leaves every record as it was.
//! There is no audit trail and no guard against two transitions racing on the
//! same record.

use std::sync::Arc;

use crate::backend::ApplicationBackend;
use crate::entity::{Application, ApplicationStatus};
use crate::error::{AdmissionsError, Result};
use crate::notify::Notification;
use crate::store::RecordStore;

#[derive(Clone)]
pub struct StatusTransitionHandler {
    backend: Arc<dyn ApplicationBackend>,
}

impl StatusTransitionHandler {
    pub fn new(backend: Arc<dyn ApplicationBackend>) -> Self {
        Self { backend }
    }

    /// Send the decision to the backend, then mirror it into `store`.
    ///
    /// An id the store does not hold is rejected before the backend is called.
    pub async fn apply(
        &self,
        store: &mut RecordStore,
        id: &str,
        status: ApplicationStatus,
    ) -> Result<Application> {
        if store.get(id).is_none() {
            return Err(AdmissionsError::NotFound(id.to_string()));
        }
        self.backend.update_application_status(id, status).await?;
        let updated = store.set_status(id, status)?.clone();
        tracing::info!(id, status = %status, "application status updated");
        Ok(updated)
    }

    /// [`apply`](Self::apply), with the outcome reported as a notification.
    pub async fn transition(
        &self,
        store: &mut RecordStore,
        id: &str,
        status: ApplicationStatus,
    ) -> Notification {
        let outcome = self.apply(store, id, status).await;
        Self::report(id, status, &outcome)
    }

    /// Notification for the outcome of [`apply`](Self::apply). Failures are logged.
    pub fn report(
        id: &str,
        status: ApplicationStatus,
        outcome: &Result<Application>,
    ) -> Notification {
        match outcome {
            Ok(_) => Notification::success(format!(
                "Application {} successfully",
                status.as_verb()
            )),
            Err(e) => {
                tracing::error!(id, status = %status, error = %e, "status update failed");
                Notification::error("Failed to update application status")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MockApplicationBackend, SimulatedBackend};
    use crate::config::DelayConfig;
    use crate::fixture;
    use crate::summary::{status_counts, StatusCounts};

    fn fixture_store() -> RecordStore {
        RecordStore::from_records(fixture::applications().unwrap())
    }

    fn simulated() -> StatusTransitionHandler {
        StatusTransitionHandler::new(Arc::new(SimulatedBackend::fixture(DelayConfig::instant())))
    }

    #[tokio::test]
    async fn test_approve_rejected_application() {
        let handler = simulated();
        let mut store = fixture_store();
        let before = store.records().to_vec();

        let notification = handler
            .transition(&mut store, "app-004", ApplicationStatus::Approved)
            .await;
        assert_eq!(notification, Notification::success("Application approved successfully"));

        assert_eq!(
            status_counts(store.records()),
            StatusCounts {
                pending: 3,
                approved: 3,
                rejected: 0,
                total: 6
            }
        );
        for (old, new) in before.iter().zip(store.records()) {
            if old.id != "app-004" {
                assert_eq!(old, new);
            }
        }
    }

    #[tokio::test]
    async fn test_transition_twice_is_idempotent() {
        let handler = simulated();
        let mut store = fixture_store();

        handler
            .transition(&mut store, "app-001", ApplicationStatus::Rejected)
            .await;
        let once = store.records().to_vec();
        let notification = handler
            .transition(&mut store, "app-001", ApplicationStatus::Rejected)
            .await;

        assert!(!notification.is_error());
        assert_eq!(store.records(), once.as_slice());
    }

    #[tokio::test]
    async fn test_unknown_id_reports_error() {
        let handler = simulated();
        let mut store = fixture_store();
        let version = store.version();

        let notification = handler
            .transition(&mut store, "app-999", ApplicationStatus::Approved)
            .await;
        assert!(notification.is_error());
        assert_eq!(notification.description, "Failed to update application status");
        assert_eq!(store.version(), version);
    }

    #[tokio::test]
    async fn test_backend_failure_leaves_store_unchanged() {
        let mut backend = MockApplicationBackend::new();
        backend
            .expect_update_application_status()
            .withf(|id, status| id == "app-003" && *status == ApplicationStatus::Approved)
            .times(1)
            .returning(|_, _| Err(AdmissionsError::Transport("connection reset".to_string())));

        let handler = StatusTransitionHandler::new(Arc::new(backend));
        let mut store = fixture_store();
        let before = store.records().to_vec();

        let err = handler
            .apply(&mut store, "app-003", ApplicationStatus::Approved)
            .await
            .unwrap_err();
        assert!(matches!(err, AdmissionsError::Transport(_)));
        assert_eq!(store.records(), before.as_slice());
    }

    #[tokio::test]
    async fn test_id_missing_from_store_never_reaches_backend() {
        let mut backend = MockApplicationBackend::new();
        backend.expect_update_application_status().times(0);

        let handler = StatusTransitionHandler::new(Arc::new(backend));
        let mut apps = fixture::applications().unwrap();
        apps.retain(|app| app.id != "app-006");
        let mut store = RecordStore::from_records(apps);
        let version = store.version();

        let err = handler
            .apply(&mut store, "app-006", ApplicationStatus::Approved)
            .await
            .unwrap_err();
        assert!(matches!(err, AdmissionsError::NotFound(ref id) if id == "app-006"));
        assert_eq!(store.version(), version);
    }

    #[tokio::test]
    async fn test_apply_returns_updated_copy() {
        let mut backend = MockApplicationBackend::new();
        backend
            .expect_update_application_status()
            .returning(|_, _| Ok(()));

        let handler = StatusTransitionHandler::new(Arc::new(backend));
        let mut store = fixture_store();
        let updated = handler
            .apply(&mut store, "app-006", ApplicationStatus::Rejected)
            .await
            .unwrap();
        assert_eq!(updated.id, "app-006");
        assert_eq!(updated.application_status, ApplicationStatus::Rejected);
        assert_eq!(updated.average_mark, 73.5);
    }
}
