//! Summary derivations over the application collection.
//!
//! All functions are pure and read the stored `average_mark` of each record.

use serde::Serialize;

use crate::entity::{Application, ApplicationStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    pub total: usize,
}

impl StatusCounts {
    pub fn get(&self, status: ApplicationStatus) -> usize {
        match status {
            ApplicationStatus::Pending => self.pending,
            ApplicationStatus::Approved => self.approved,
            ApplicationStatus::Rejected => self.rejected,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseAverage {
    pub course: String,
    pub average_mark: f64,
}

/// Round to one decimal place, halves rounding up.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn status_counts(records: &[Application]) -> StatusCounts {
    let mut counts = StatusCounts {
        total: records.len(),
        ..Default::default()
    };
    for app in records {
        match app.application_status {
            ApplicationStatus::Pending => counts.pending += 1,
            ApplicationStatus::Approved => counts.approved += 1,
            ApplicationStatus::Rejected => counts.rejected += 1,
        }
    }
    counts
}

/// Mean stored average per course, in the order courses first appear.
pub fn average_mark_by_course(records: &[Application]) -> Vec<CourseAverage> {
    // (course, total, count)
    let mut groups: Vec<(&str, f64, usize)> = Vec::new();

    for app in records {
        match groups.iter_mut().find(|(course, _, _)| *course == app.course_code) {
            Some(group) => {
                group.1 += app.average_mark;
                group.2 += 1;
            }
            None => groups.push((app.course_code.as_str(), app.average_mark, 1)),
        }
    }

    groups
        .into_iter()
        .map(|(course, total, count)| CourseAverage {
            course: course.to_string(),
            average_mark: round_one_decimal(total / count as f64),
        })
        .collect()
}

/// Mean stored average across all records; 0 for an empty collection.
pub fn overall_average_mark(records: &[Application]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let total: f64 = records.iter().map(|app| app.average_mark).sum();
    round_one_decimal(total / records.len() as f64)
}

/// Approved share of all applications as a whole percentage.
pub fn approval_rate(counts: &StatusCounts) -> u32 {
    if counts.total == 0 {
        return 0;
    }
    (counts.approved as f64 / counts.total as f64 * 100.0).round() as u32
}

/// Pending share of all applications, 0-100.
pub fn pending_share(counts: &StatusCounts) -> f64 {
    if counts.total == 0 {
        return 0.0;
    }
    counts.pending as f64 / counts.total as f64 * 100.0
}

/// Non-empty status slices in Pending, Approved, Rejected order.
pub fn status_breakdown(counts: &StatusCounts) -> Vec<(ApplicationStatus, usize)> {
    ApplicationStatus::ALL
        .iter()
        .map(|status| (*status, counts.get(*status)))
        .filter(|(_, count)| *count > 0)
        .collect()
}

/// Distinct course codes in first-seen order.
pub fn unique_courses(records: &[Application]) -> Vec<String> {
    let mut courses: Vec<String> = Vec::new();
    for app in records {
        if !courses.iter().any(|c| *c == app.course_code) {
            courses.push(app.course_code.clone());
        }
    }
    courses
}

/// Everything the summary panel shows, derived in one pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub counts: StatusCounts,
    pub course_averages: Vec<CourseAverage>,
    pub overall_average: f64,
    pub approval_rate: u32,
    pub pending_share: f64,
    pub breakdown: Vec<(ApplicationStatus, usize)>,
}

impl Summary {
    pub fn from_records(records: &[Application]) -> Self {
        let counts = status_counts(records);
        Self {
            counts,
            course_averages: average_mark_by_course(records),
            overall_average: overall_average_mark(records),
            approval_rate: approval_rate(&counts),
            pending_share: pending_share(&counts),
            breakdown: status_breakdown(&counts),
        }
    }
}
