use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AdmissionsError, Result};

/// Rows per table page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Configuration for the dashboard.
///
/// Every field has a default, so a config file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Rows per table page.
    pub page_size: usize,
    /// Mark tier thresholds shared by the table and the detail view.
    pub marks: MarkThresholds,
    /// Simulated backend round trip delays.
    pub delays: DelayConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            marks: MarkThresholds::default(),
            delays: DelayConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Load and validate a YAML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: DashboardConfig = serde_yaml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when given, otherwise use the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(AdmissionsError::InvalidConfig(
                "page_size must be at least 1".to_string(),
            ));
        }
        self.marks.validate()
    }
}

/// Threshold policy for colouring marks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkThresholds {
    /// Marks at or above this are "good".
    pub good: f64,
    /// Marks at or above this (and below `good`) are "borderline".
    pub borderline: f64,
}

impl Default for MarkThresholds {
    fn default() -> Self {
        Self {
            good: 80.0,
            borderline: 70.0,
        }
    }
}

impl MarkThresholds {
    pub fn validate(&self) -> Result<()> {
        if !self.good.is_finite() || !self.borderline.is_finite() {
            return Err(AdmissionsError::InvalidConfig(
                "mark thresholds must be finite numbers".to_string(),
            ));
        }
        if self.good < self.borderline {
            return Err(AdmissionsError::InvalidConfig(format!(
                "marks.good ({}) must not be below marks.borderline ({})",
                self.good, self.borderline
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelayConfig {
    pub load_ms: u64,
    pub update_ms: u64,
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            load_ms: 1000,
            update_ms: 500,
        }
    }
}

impl DelayConfig {
    /// No delays at all; used by tests and scripted sessions.
    pub fn instant() -> Self {
        Self {
            load_ms: 0,
            update_ms: 0,
        }
    }

    pub fn load(&self) -> Duration {
        Duration::from_millis(self.load_ms)
    }

    pub fn update(&self) -> Duration {
        Duration::from_millis(self.update_ms)
    }
}
