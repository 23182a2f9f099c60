//! Backend seam for loading applications and recording decisions.
//!
//! The dashboard core only talks to [`ApplicationBackend`]. The shipped
//! implementation, [`SimulatedBackend`], serves the built-in fixture or a JSON
//! data file with a configurable round trip delay.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::config::DelayConfig;
use crate::entity::{validate_applications, Application, ApplicationStatus};
use crate::error::{AdmissionsError, Result};
use crate::fixture;

/// Source of application records and sink for status decisions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationBackend: Send + Sync {
    /// Fetch the full application collection.
    ///
    /// # Errors
    /// `Transport` when the data cannot be fetched or parsed, `Validation`
    /// when it parses but violates record invariants.
    async fn load_applications(&self) -> Result<Vec<Application>>;

    /// Record a new status for one application.
    ///
    /// # Errors
    /// `NotFound` for an unknown id, `Transport` on delivery failure.
    async fn update_application_status(&self, id: &str, status: ApplicationStatus) -> Result<()>;
}

/// Where a [`SimulatedBackend`] gets its records.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    /// The built-in six-record fixture.
    Fixture,
    /// A JSON array of applications in the fixture's camelCase format.
    File(PathBuf),
}

impl DataSource {
    fn read(&self) -> Result<Vec<Application>> {
        let records = match self {
            DataSource::Fixture => fixture::applications()?,
            DataSource::File(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    AdmissionsError::Transport(format!("reading {}: {}", path.display(), e))
                })?;
                serde_json::from_str(&raw).map_err(|e| {
                    AdmissionsError::Transport(format!("parsing {}: {}", path.display(), e))
                })?
            }
        };
        validate_applications(&records)?;
        Ok(records)
    }
}

/// Backend that stands in for a remote service.
///
/// Each call sleeps for the configured delay before touching its own copy of
/// the records, which is read from the data source on first use.
pub struct SimulatedBackend {
    source: DataSource,
    delays: DelayConfig,
    records: Mutex<Option<Vec<Application>>>,
}

impl SimulatedBackend {
    pub fn new(source: DataSource, delays: DelayConfig) -> Self {
        Self {
            source,
            delays,
            records: Mutex::new(None),
        }
    }

    pub fn fixture(delays: DelayConfig) -> Self {
        Self::new(DataSource::Fixture, delays)
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }
}

fn ensure_loaded<'a>(
    slot: &'a mut Option<Vec<Application>>,
    source: &DataSource,
) -> Result<&'a mut Vec<Application>> {
    if slot.is_none() {
        *slot = Some(source.read()?);
    }
    slot.as_mut()
        .ok_or_else(|| AdmissionsError::Transport("record source unavailable".to_string()))
}

#[async_trait]
impl ApplicationBackend for SimulatedBackend {
    async fn load_applications(&self) -> Result<Vec<Application>> {
        tokio::time::sleep(self.delays.load()).await;

        let mut guard = self.records.lock().await;
        let records = ensure_loaded(&mut guard, &self.source)?;
        tracing::debug!(count = records.len(), source = ?self.source, "loaded applications");
        Ok(records.clone())
    }

    async fn update_application_status(&self, id: &str, status: ApplicationStatus) -> Result<()> {
        tokio::time::sleep(self.delays.update()).await;

        let mut guard = self.records.lock().await;
        let records = ensure_loaded(&mut guard, &self.source)?;
        let record = records
            .iter_mut()
            .find(|app| app.id == id)
            .ok_or_else(|| AdmissionsError::NotFound(id.to_string()))?;
        record.application_status = status;
        Ok(())
    }
}
