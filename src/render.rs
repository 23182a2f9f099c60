//! Plain-text rendering of the summary, table page, and detail view.

use crate::config::MarkThresholds;
use crate::detail::{DetailView, MarkTier};
use crate::entity::{Application, ApplicationStatus};
use crate::summary::Summary;
use crate::view::{ListPage, ViewState};

pub const EMPTY_LIST_MESSAGE: &str = "No applications found matching your criteria.";

const BAR_WIDTH: usize = 20;

fn format_mark(mark: f64, tier: MarkTier) -> String {
    format!("{:.1}% ({})", mark, tier)
}

/// Course label for charts, without the common "DS-" prefix.
pub fn short_course_label(course: &str) -> &str {
    course.strip_prefix("DS-").unwrap_or(course)
}

fn bar(mark: f64) -> String {
    let filled = ((mark.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    "#".repeat(filled)
}

pub fn format_summary(summary: &Summary) -> String {
    let counts = &summary.counts;
    let mut out = String::from("Data Science Academy Admin Dashboard\n\n");

    out.push_str(&format!("  Total applications  {}\n", counts.total));
    out.push_str(&format!(
        "  Pending review      {}  ({:.0}% of all)\n",
        counts.pending, summary.pending_share
    ));
    out.push_str(&format!(
        "  Approved            {}  ({}% approval rate)\n",
        counts.approved, summary.approval_rate
    ));
    out.push_str(&format!("  Rejected            {}\n", counts.rejected));
    out.push_str(&format!(
        "  Average mark        {}%\n",
        summary.overall_average
    ));

    if !summary.breakdown.is_empty() {
        out.push_str("\nStatus breakdown\n");
        for (status, count) in &summary.breakdown {
            out.push_str(&format!("  {:<10}{}\n", status.to_string(), count));
        }
    }

    if !summary.course_averages.is_empty() {
        out.push_str("\nAverage marks by course\n");
        for avg in &summary.course_averages {
            out.push_str(&format!(
                "  {:<14}{:>5.1}%  {}\n",
                short_course_label(&avg.course),
                avg.average_mark,
                bar(avg.average_mark)
            ));
        }
    }

    out
}

fn format_row(app: &Application, marks: &MarkThresholds) -> String {
    format!(
        "  {:<8} {:<20} {:<14} {:<16} {:<18} {:<13} {}",
        app.id,
        app.full_name(),
        app.id_number(),
        app.course_code,
        format_mark(app.average_mark, marks.classify(app.average_mark)),
        app.submission_date.format("%b %d, %Y").to_string(),
        app.application_status,
    )
}

pub fn format_page(page: &ListPage<'_>, view: &ViewState, marks: &MarkThresholds) -> String {
    let mut out = format!(
        "{} applications ({}), sorted by {} {}\n",
        view.tab, page.total_matching, view.sort.field, view.sort.direction
    );

    if page.is_empty() {
        out.push_str(&format!("\n  {}\n", EMPTY_LIST_MESSAGE));
        return out;
    }

    out.push_str(&format!(
        "\n  {:<8} {:<20} {:<14} {:<16} {:<18} {:<13} {}\n",
        "ID", "APPLICANT", "ID NUMBER", "COURSE", "AVERAGE", "SUBMITTED", "STATUS"
    ));
    for app in &page.rows {
        out.push_str(&format_row(app, marks));
        out.push('\n');
    }

    if page.total_pages > 1 {
        out.push_str(&format!(
            "\nShowing {} to {} of {} applications. Page {} of {}\n",
            page.first_index(),
            page.last_index(),
            page.total_matching,
            page.page,
            page.total_pages
        ));
    }

    out
}

pub fn format_detail(detail: &DetailView<'_>) -> String {
    let app = detail.application;
    let person = &app.personal_details;
    let mut out = format!("Application Details  [{}]\n", app.application_status);

    out.push_str("\nPersonal Information\n");
    out.push_str(&format!("  Full Name     {}\n", person.full_name));
    out.push_str(&format!("  ID Number     {}\n", person.id_number));
    out.push_str(&format!("  Email         {}\n", person.email));
    out.push_str(&format!("  Phone         {}\n", person.phone_number));
    out.push_str(&format!("  Address       {}\n", person.address));

    out.push_str("\nApplication\n");
    out.push_str(&format!("  Course        {}\n", app.course_code));
    out.push_str(&format!(
        "  Submitted     {}\n",
        app.submission_date.format("%A, %B %d, %Y at %-I:%M %p")
    ));
    out.push_str(&format!(
        "  Average Mark  {}\n",
        format_mark(app.average_mark, detail.average_tier)
    ));

    out.push_str("\nFinal Year Academic Record\n");
    for line in &detail.modules {
        out.push_str(&format!(
            "  {:<9} {:<32} {}% ({})\n",
            line.module.module_code, line.module.module_name, line.module.mark, line.tier
        ));
    }

    out.push_str("\nCurriculum Vitae\n");
    out.push_str(&format!("  {} (PDF)\n", app.cv_file_name));

    out
}

/// One line per tab with its count, marking the active one.
pub fn format_tabs(summary: &Summary, active: ApplicationStatus) -> String {
    ApplicationStatus::ALL
        .iter()
        .map(|status| {
            let marker = if *status == active { "*" } else { " " };
            format!("{}{} ({})", marker, status, summary.counts.get(*status))
        })
        .collect::<Vec<_>>()
        .join("  ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture;

    #[test]
    fn test_summary_text() {
        let summary = Summary::from_records(&fixture::applications().unwrap());
        let text = format_summary(&summary);
        assert!(text.contains("Total applications  6"));
        assert!(text.contains("33% approval rate"));
        assert!(text.contains("78.4%"));
        assert!(text.contains("ADVANCED"));
        assert!(!text.contains("DS-ADVANCED"));
    }

    #[test]
    fn test_empty_summary_skips_charts() {
        let summary = Summary::from_records(&[]);
        let text = format_summary(&summary);
        assert!(text.contains("Average mark        0%"));
        assert!(!text.contains("Status breakdown"));
        assert!(!text.contains("Average marks by course"));
    }

    #[test]
    fn test_page_text() {
        let apps = fixture::applications().unwrap();
        let view = ViewState::default();
        let page = view.render(&apps);
        let text = format_page(&page, &view, &MarkThresholds::default());

        assert!(text.starts_with("Pending applications (3)"));
        assert!(text.contains("Priya Patel"));
        assert!(text.contains("90.5% (good)"));
        assert!(text.contains("73.5% (borderline)"));
        assert!(text.contains("Jan 22, 2024"));
        // A single page has no pager line.
        assert!(!text.contains("Showing"));

        let david = text.find("David Kim").unwrap();
        let sarah = text.find("Sarah Johnson").unwrap();
        assert!(david < sarah);
    }

    #[test]
    fn test_empty_page_text() {
        let apps = fixture::applications().unwrap();
        let view = ViewState::default().with_search("nobody");
        let page = view.render(&apps);
        let text = format_page(&page, &view, &MarkThresholds::default());
        assert!(text.contains(EMPTY_LIST_MESSAGE));
        assert!(!text.contains("APPLICANT"));
    }

    #[test]
    fn test_detail_text() {
        let apps = fixture::applications().unwrap();
        let detail = DetailView::new(&apps[3], &MarkThresholds::default());
        let text = format_detail(&detail);
        assert!(text.contains("[Rejected]"));
        assert!(text.contains("James Robertson"));
        assert!(text.contains("Wednesday, January 10, 2024 at 4:15 PM"));
        assert!(text.contains("55.0% (low)"));
        assert!(text.contains("Calculus"));
        assert!(text.contains("james_robertson_cv.pdf"));
    }

    #[test]
    fn test_tabs_line() {
        let summary = Summary::from_records(&fixture::applications().unwrap());
        assert_eq!(
            format_tabs(&summary, ApplicationStatus::Approved),
            " Pending (3)  *Approved (2)   Rejected (1)"
        );
    }

    #[test]
    fn test_bar_width() {
        assert_eq!(bar(100.0), "#".repeat(BAR_WIDTH));
        assert_eq!(bar(50.0).len(), BAR_WIDTH / 2);
        assert_eq!(bar(-5.0), "");
    }
}
