// src/entity/application.rs
use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AdmissionsError, Result};

/// Largest gap between the stored average and the module mean that is not reported.
pub const AVERAGE_MARK_TOLERANCE: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 3] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Approved,
        ApplicationStatus::Rejected,
    ];

    /// Past-tense verb used in notifications ("approved", "rejected").
    pub fn as_verb(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApplicationStatus::Pending => write!(f, "Pending"),
            ApplicationStatus::Approved => write!(f, "Approved"),
            ApplicationStatus::Rejected => write!(f, "Rejected"),
        }
    }
}

impl std::str::FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ApplicationStatus::Pending),
            "approved" | "approve" => Ok(ApplicationStatus::Approved),
            "rejected" | "reject" => Ok(ApplicationStatus::Rejected),
            _ => Err(format!("Invalid application status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalDetails {
    pub full_name: String,
    pub id_number: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalYearModule {
    pub module_code: String,
    pub module_name: String,
    pub mark: f64,
}

/// One admissions submission.
///
/// `average_mark` is stored at creation time and is the value every summary
/// and sort reads; it is never recomputed from `final_year_modules`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: String,
    pub personal_details: PersonalDetails,
    pub course_code: String,
    pub final_year_modules: Vec<FinalYearModule>,
    /// Base64 encoded PDF
    pub cv_file: String,
    pub cv_file_name: String,
    pub application_status: ApplicationStatus,
    pub submission_date: DateTime<Utc>,
    pub average_mark: f64,
}

impl Application {
    pub fn full_name(&self) -> &str {
        &self.personal_details.full_name
    }

    pub fn id_number(&self) -> &str {
        &self.personal_details.id_number
    }

    /// Copy of this application carrying a different status.
    pub fn with_status(&self, status: ApplicationStatus) -> Self {
        Self {
            application_status: status,
            ..self.clone()
        }
    }

    /// Mean of the module marks, or `None` when there are no modules.
    pub fn module_mean(&self) -> Option<f64> {
        if self.final_year_modules.is_empty() {
            return None;
        }
        let total: f64 = self.final_year_modules.iter().map(|m| m.mark).sum();
        Some(total / self.final_year_modules.len() as f64)
    }

    /// True when the stored average disagrees with the module marks.
    pub fn has_average_mismatch(&self) -> bool {
        self.module_mean()
            .map(|mean| (mean - self.average_mark).abs() > AVERAGE_MARK_TOLERANCE)
            .unwrap_or(false)
    }
}

/// Check a loaded collection for duplicate ids and out-of-range marks.
///
/// Mismatched stored averages are logged and trusted.
pub(crate) fn validate_applications(applications: &[Application]) -> Result<()> {
    let mut seen = HashSet::new();

    for app in applications {
        if !seen.insert(app.id.as_str()) {
            return Err(AdmissionsError::Validation(format!(
                "duplicate application id '{}'",
                app.id
            )));
        }

        for module in &app.final_year_modules {
            if !(0.0..=100.0).contains(&module.mark) {
                return Err(AdmissionsError::Validation(format!(
                    "{}: mark {} for {} is outside 0-100",
                    app.id, module.mark, module.module_code
                )));
            }
        }

        if !(0.0..=100.0).contains(&app.average_mark) {
            return Err(AdmissionsError::Validation(format!(
                "{}: average mark {} is outside 0-100",
                app.id, app.average_mark
            )));
        }

        if app.has_average_mismatch() {
            tracing::warn!(
                id = %app.id,
                stored = app.average_mark,
                computed = app.module_mean().unwrap_or_default(),
                "stored average mark does not match module marks"
            );
        }
    }

    Ok(())
}
