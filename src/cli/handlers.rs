use std::path::Path;
use std::sync::Arc;

use tokio::io::BufReader;

use crate::backend::{DataSource, SimulatedBackend};
use crate::config::DashboardConfig;
use crate::dashboard::Dashboard;
use crate::entity::ApplicationStatus;
use crate::error::Result;
use crate::render::{format_detail, format_page, format_summary};
use crate::view::{SortDirection, SortSpec, ViewState};

use super::commands::{GlobalArgs, ListArgs};
use super::session::run_session;

/// Build an unloaded dashboard from the global flags.
fn build_dashboard(global: &GlobalArgs) -> Result<Dashboard> {
    let config = DashboardConfig::load_or_default(global.config.as_deref())?;
    let source = match &global.data {
        Some(path) => DataSource::File(path.clone()),
        None => DataSource::Fixture,
    };
    let backend = Arc::new(SimulatedBackend::new(source, config.delays));
    Ok(Dashboard::new(backend, config))
}

/// Build and load a dashboard.
///
/// A load failure is not fatal: the notification is printed and the
/// dashboard continues with no applications.
async fn open_dashboard(global: &GlobalArgs) -> Result<Dashboard> {
    let mut dashboard = build_dashboard(global)?;
    dashboard.load().await;
    print_notifications(&mut dashboard);
    Ok(dashboard)
}

fn print_notifications(dashboard: &mut Dashboard) {
    for notification in dashboard.take_notifications() {
        if notification.is_error() {
            eprintln!("{}", notification);
        } else {
            println!("{}", notification);
        }
    }
}

pub async fn handle_summary(global: &GlobalArgs, json: bool) -> Result<()> {
    let mut dashboard = open_dashboard(global).await?;
    let summary = dashboard.summary();

    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
    } else {
        print!("{}", format_summary(summary));
    }

    Ok(())
}

pub async fn handle_list(global: &GlobalArgs, args: ListArgs) -> Result<()> {
    let mut dashboard = open_dashboard(global).await?;

    let mut view = ViewState::new(dashboard.config().page_size)
        .with_tab(args.tab)
        .with_search(args.search.unwrap_or_default())
        .with_course(args.course);
    if let Some(field) = args.sort {
        view = view.with_sort(SortSpec {
            field,
            direction: args.order.unwrap_or(SortDirection::Asc),
        });
    } else if let Some(direction) = args.order {
        view = view.with_sort(SortSpec {
            direction,
            ..view.sort
        });
    }
    dashboard.set_view(view);
    dashboard.go_to_page(args.page);

    let page = dashboard.current_page();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&page)?);
    } else {
        print!(
            "{}",
            format_page(&page, dashboard.view(), &dashboard.config().marks)
        );
    }

    Ok(())
}

pub async fn handle_courses(global: &GlobalArgs, json: bool) -> Result<()> {
    let dashboard = open_dashboard(global).await?;
    let courses = dashboard.courses();

    if json {
        println!("{}", serde_json::to_string_pretty(&courses)?);
    } else if courses.is_empty() {
        println!("No courses found.");
    } else {
        for course in courses {
            println!("{}", course);
        }
    }

    Ok(())
}

pub async fn handle_show(global: &GlobalArgs, id: String, json: bool) -> Result<()> {
    let mut dashboard = open_dashboard(global).await?;
    let detail = dashboard.select(&id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&detail)?);
    } else {
        print!("{}", format_detail(&detail));
    }

    Ok(())
}

/// One-shot decision. The change lives only as long as this process.
pub async fn handle_decide(global: &GlobalArgs, id: String, status: ApplicationStatus) -> Result<()> {
    let mut dashboard = open_dashboard(global).await?;
    let outcome = dashboard.update_status(&id, status).await;
    print_notifications(&mut dashboard);
    outcome?;

    let counts = dashboard.summary().counts;
    println!(
        "Pending: {}  Approved: {}  Rejected: {}  Total: {}",
        counts.pending, counts.approved, counts.rejected, counts.total
    );
    Ok(())
}

pub async fn handle_cv_download(global: &GlobalArgs, id: String, out: &Path) -> Result<()> {
    let mut dashboard = open_dashboard(global).await?;
    dashboard.select(&id)?;
    let result = dashboard.download_cv(out);
    print_notifications(&mut dashboard);

    let path = result?;
    println!("Saved {}", path.display());
    Ok(())
}

pub async fn handle_cv_preview(global: &GlobalArgs, id: String) -> Result<()> {
    let mut dashboard = open_dashboard(global).await?;
    dashboard.select(&id)?;
    let result = dashboard.preview_cv();
    print_notifications(&mut dashboard);

    let path = result?;
    println!("Preview ready: {}", path.display());
    Ok(())
}

pub async fn handle_session(global: &GlobalArgs) -> Result<()> {
    let mut dashboard = build_dashboard(global)?;
    if dashboard.config().delays.load_ms > 0 {
        println!("Loading dashboard...");
    }
    // Load failures are reported in the session banner.
    dashboard.load().await;

    let prompt = atty::is(atty::Stream::Stdin);
    let stdin = BufReader::new(tokio::io::stdin());
    run_session(&mut dashboard, stdin, tokio::io::stdout(), prompt).await
}
