//! The dashboard session.
//!
//! Owns the record store, the current [`ViewState`], the selected application
//! and the queue of pending notifications. All mutation goes through
//! `&mut self`, so there is exactly one writer at a time.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::backend::ApplicationBackend;
use crate::config::DashboardConfig;
use crate::detail::{decode_cv, CvDocument, DetailView};
use crate::entity::{Application, ApplicationStatus};
use crate::error::{AdmissionsError, Result};
use crate::notify::Notification;
use crate::store::RecordStore;
use crate::summary::{unique_courses, Summary};
use crate::transition::StatusTransitionHandler;
use crate::view::{CourseFilter, ListPage, SortField, SortSpec, ViewState};

pub struct Dashboard {
    backend: Arc<dyn ApplicationBackend>,
    transitions: StatusTransitionHandler,
    config: DashboardConfig,
    store: RecordStore,
    view: ViewState,
    selected: Option<String>,
    loading: bool,
    notifications: Vec<Notification>,
    summary_cache: Option<(u64, Summary)>,
}

impl Dashboard {
    pub fn new(backend: Arc<dyn ApplicationBackend>, config: DashboardConfig) -> Self {
        Self {
            transitions: StatusTransitionHandler::new(backend.clone()),
            view: ViewState::new(config.page_size),
            backend,
            config,
            store: RecordStore::new(),
            selected: None,
            loading: false,
            notifications: Vec::new(),
            summary_cache: None,
        }
    }

    /// Fetch applications from the backend.
    ///
    /// A failure is reported as a notification and leaves the store empty;
    /// there is no automatic retry.
    pub async fn load(&mut self) {
        self.loading = true;
        match self.backend.load_applications().await {
            Ok(records) => {
                tracing::info!(count = records.len(), "applications loaded");
                self.store.replace_all(records);
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load applications");
                self.store.replace_all(Vec::new());
                self.notifications
                    .push(Notification::error("Failed to load applications"));
            }
        }
        self.loading = false;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn records(&self) -> &[Application] {
        self.store.records()
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Summary of the whole collection, recomputed only after the store changed.
    pub fn summary(&mut self) -> &Summary {
        let version = self.store.version();
        if !matches!(&self.summary_cache, Some((v, _)) if *v == version) {
            self.summary_cache = None;
        }
        let records = self.store.records();
        &self
            .summary_cache
            .get_or_insert_with(|| {
                tracing::debug!(version, "recomputing summary");
                (version, Summary::from_records(records))
            })
            .1
    }

    /// Choices for the course filter.
    pub fn courses(&self) -> Vec<String> {
        unique_courses(self.store.records())
    }

    pub fn current_page(&self) -> ListPage<'_> {
        self.view.render(self.store.records())
    }

    fn total_pages(&self) -> usize {
        self.current_page().total_pages
    }

    pub fn set_view(&mut self, view: ViewState) {
        self.view = view;
    }

    pub fn set_tab(&mut self, tab: ApplicationStatus) {
        self.view = self.view.with_tab(tab);
    }

    pub fn set_search(&mut self, search: &str) {
        self.view = self.view.with_search(search);
    }

    pub fn set_course(&mut self, course: CourseFilter) {
        self.view = self.view.with_course(course);
    }

    pub fn set_sort(&mut self, sort: SortSpec) {
        self.view = self.view.with_sort(sort);
    }

    pub fn toggle_sort(&mut self, field: SortField) {
        self.view = self.view.toggle_sort(field);
    }

    pub fn next_page(&mut self) {
        let total = self.total_pages();
        self.view = self.view.next_page(total);
    }

    pub fn previous_page(&mut self) {
        self.view = self.view.previous_page();
    }

    pub fn go_to_page(&mut self, page: usize) {
        let total = self.total_pages();
        self.view = self.view.go_to_page(page, total);
    }

    /// Approve, reject, or reset one application.
    ///
    /// The outcome is queued as a notification either way; the error itself is
    /// returned for callers that need more than the notification text.
    pub async fn update_status(
        &mut self,
        id: &str,
        status: ApplicationStatus,
    ) -> Result<Application> {
        let outcome = self.transitions.apply(&mut self.store, id, status).await;
        self.notifications
            .push(StatusTransitionHandler::report(id, status, &outcome));
        outcome
    }

    pub fn select(&mut self, id: &str) -> Result<DetailView<'_>> {
        if self.store.get(id).is_none() {
            return Err(AdmissionsError::NotFound(id.to_string()));
        }
        self.selected = Some(id.to_string());
        self.detail().ok_or(AdmissionsError::NothingSelected)
    }

    pub fn close_detail(&mut self) {
        self.selected = None;
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Detail of the selected application, reflecting its current status.
    pub fn detail(&self) -> Option<DetailView<'_>> {
        let id = self.selected.as_deref()?;
        self.store
            .get(id)
            .map(|app| DetailView::new(app, &self.config.marks))
    }

    fn selected_cv(&mut self) -> Result<CvDocument> {
        let id = self
            .selected
            .as_deref()
            .ok_or(AdmissionsError::NothingSelected)?;
        let app = self
            .store
            .get(id)
            .ok_or_else(|| AdmissionsError::NotFound(id.to_string()))?;

        decode_cv(app).map_err(|e| {
            tracing::error!(id, error = %e, "error decoding CV");
            self.notifications
                .push(Notification::error(format!("Could not open {}", app.cv_file_name)));
            e
        })
    }

    /// Save the selected application's CV into `dir`. The detail stays open on failure.
    pub fn download_cv(&mut self, dir: &Path) -> Result<PathBuf> {
        self.selected_cv()?.save_to(dir)
    }

    /// Write the selected application's CV to the preview directory.
    pub fn preview_cv(&mut self) -> Result<PathBuf> {
        self.selected_cv()?.preview()
    }

    /// Drain notifications queued since the last call.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }
}
