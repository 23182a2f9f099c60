//! Line-oriented interactive dashboard.
//!
//! Each input line is one UI event (switch tab, type a search, click a sort
//! header, approve a row, ...). Events are handled one at a time on the
//! current task, so a status update finishes before the next line is read.

use std::path::PathBuf;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::dashboard::Dashboard;
use crate::entity::ApplicationStatus;
use crate::error::Result;
use crate::render::{format_detail, format_page, format_summary, format_tabs};
use crate::view::{CourseFilter, SortField};

pub const HELP: &str = "\
Commands:
  list                     show the current page
  summary                  show counts and averages
  tab <status>             switch to pending, approved, or rejected
  search [text]            filter by name or ID number (no text clears)
  course <code|all>        filter by course
  courses                  list course codes
  sort <field>             sort by fullName, averageMark, submissionDate, courseCode
  next | prev | page <n>   move between pages
  view <id>                open an application's detail
  close                    close the detail
  download [dir]           save the open application's CV
  preview                  write the open application's CV to a preview file
  approve <id>             approve an application
  reject <id>              reject an application
  help                     show this help
  quit                     leave the session";

#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    List,
    Summary,
    Tab(ApplicationStatus),
    Search(String),
    Course(CourseFilter),
    Courses,
    Sort(SortField),
    Next,
    Prev,
    Page(usize),
    View(String),
    Close,
    Download(Option<PathBuf>),
    Preview,
    Decide(String, ApplicationStatus),
    Help,
    Quit,
}

impl std::str::FromStr for SessionCommand {
    type Err = String;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let required = |what: &str| -> std::result::Result<String, String> {
            if rest.is_empty() {
                Err(format!("'{}' needs {}", word, what))
            } else {
                Ok(rest.to_string())
            }
        };

        match word.to_lowercase().as_str() {
            "list" | "ls" => Ok(SessionCommand::List),
            "summary" => Ok(SessionCommand::Summary),
            "tab" => Ok(SessionCommand::Tab(required("a status")?.parse()?)),
            "search" => Ok(SessionCommand::Search(rest.to_string())),
            "course" => Ok(SessionCommand::Course(required("a course code")?.parse()?)),
            "courses" => Ok(SessionCommand::Courses),
            "sort" => Ok(SessionCommand::Sort(required("a field")?.parse()?)),
            "next" => Ok(SessionCommand::Next),
            "prev" | "previous" => Ok(SessionCommand::Prev),
            "page" => {
                let n = required("a page number")?;
                n.parse()
                    .map(SessionCommand::Page)
                    .map_err(|_| format!("Invalid page number: {}", n))
            }
            "view" | "show" => Ok(SessionCommand::View(required("an application id")?)),
            "close" => Ok(SessionCommand::Close),
            "download" => Ok(SessionCommand::Download(
                (!rest.is_empty()).then(|| PathBuf::from(rest)),
            )),
            "preview" => Ok(SessionCommand::Preview),
            "approve" => Ok(SessionCommand::Decide(
                required("an application id")?,
                ApplicationStatus::Approved,
            )),
            "reject" => Ok(SessionCommand::Decide(
                required("an application id")?,
                ApplicationStatus::Rejected,
            )),
            "help" | "?" => Ok(SessionCommand::Help),
            "quit" | "exit" | "q" => Ok(SessionCommand::Quit),
            _ => Err(format!("Unknown command: {} (try 'help')", word)),
        }
    }
}

/// Run commands from `input` until EOF or `quit`, writing output to `out`.
pub async fn run_session<R, W>(
    dashboard: &mut Dashboard,
    input: R,
    mut out: W,
    prompt: bool,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    let summary = dashboard.summary().clone();
    let mut banner = format_tabs(&summary, dashboard.view().tab);
    banner.push_str("\nType 'help' for commands.\n");
    flush_notifications(dashboard, &mut banner);
    out.write_all(banner.as_bytes()).await?;

    loop {
        if prompt {
            out.write_all(b"> ").await?;
            out.flush().await?;
        }

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<SessionCommand>() {
            Ok(SessionCommand::Quit) => break,
            Ok(command) => command,
            Err(e) => {
                out.write_all(format!("{}\n", e).as_bytes()).await?;
                continue;
            }
        };

        let mut text = execute(dashboard, command).await;
        flush_notifications(dashboard, &mut text);
        if !text.ends_with('\n') {
            text.push('\n');
        }
        out.write_all(text.as_bytes()).await?;
    }

    out.flush().await?;
    Ok(())
}

fn flush_notifications(dashboard: &mut Dashboard, text: &mut String) {
    for notification in dashboard.take_notifications() {
        text.push_str(&format!("{}\n", notification));
    }
}

async fn execute(dashboard: &mut Dashboard, command: SessionCommand) -> String {
    match command {
        SessionCommand::List => page_text(dashboard),
        SessionCommand::Summary => format_summary(dashboard.summary()),
        SessionCommand::Tab(tab) => {
            dashboard.set_tab(tab);
            let summary = dashboard.summary().clone();
            format!("{}\n{}", format_tabs(&summary, tab), page_text(dashboard))
        }
        SessionCommand::Search(text) => {
            dashboard.set_search(&text);
            page_text(dashboard)
        }
        SessionCommand::Course(course) => {
            dashboard.set_course(course);
            page_text(dashboard)
        }
        SessionCommand::Courses => {
            let mut courses = vec!["all".to_string()];
            courses.extend(dashboard.courses());
            courses.join("\n")
        }
        SessionCommand::Sort(field) => {
            dashboard.toggle_sort(field);
            page_text(dashboard)
        }
        SessionCommand::Next => {
            dashboard.next_page();
            page_text(dashboard)
        }
        SessionCommand::Prev => {
            dashboard.previous_page();
            page_text(dashboard)
        }
        SessionCommand::Page(n) => {
            dashboard.go_to_page(n);
            page_text(dashboard)
        }
        SessionCommand::View(id) => match dashboard.select(&id) {
            Ok(detail) => format_detail(&detail),
            Err(e) => e.to_string(),
        },
        SessionCommand::Close => {
            dashboard.close_detail();
            "Detail closed.".to_string()
        }
        SessionCommand::Download(dir) => {
            let dir = dir.unwrap_or_else(|| PathBuf::from("."));
            match dashboard.download_cv(&dir) {
                Ok(path) => format!("Saved {}", path.display()),
                Err(e) => e.to_string(),
            }
        }
        SessionCommand::Preview => match dashboard.preview_cv() {
            Ok(path) => format!("Preview ready: {}", path.display()),
            Err(e) => e.to_string(),
        },
        SessionCommand::Decide(id, status) => {
            // The outcome reaches the user as the queued notification.
            let _ = dashboard.update_status(&id, status).await;
            let summary = dashboard.summary().clone();
            format_tabs(&summary, dashboard.view().tab)
        }
        SessionCommand::Help => HELP.to_string(),
        SessionCommand::Quit => String::new(),
    }
}

fn page_text(dashboard: &Dashboard) -> String {
    format_page(
        &dashboard.current_page(),
        dashboard.view(),
        &dashboard.config().marks,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::SimulatedBackend;
    use crate::config::{DashboardConfig, DelayConfig};
    use std::sync::Arc;

    async fn run(script: &str) -> String {
        let config = DashboardConfig {
            delays: DelayConfig::instant(),
            ..Default::default()
        };
        let backend = Arc::new(SimulatedBackend::fixture(config.delays));
        let mut dashboard = Dashboard::new(backend, config);
        dashboard.load().await;

        let mut out = Vec::new();
        run_session(&mut dashboard, script.as_bytes(), &mut out, false)
            .await
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("list".parse(), Ok(SessionCommand::List));
        assert_eq!(
            "tab Approved".parse(),
            Ok(SessionCommand::Tab(ApplicationStatus::Approved))
        );
        assert_eq!(
            "search  Priya Patel ".parse(),
            Ok(SessionCommand::Search("Priya Patel".to_string()))
        );
        assert_eq!("search".parse(), Ok(SessionCommand::Search(String::new())));
        assert_eq!(
            "course all".parse(),
            Ok(SessionCommand::Course(CourseFilter::All))
        );
        assert_eq!(
            "sort averageMark".parse(),
            Ok(SessionCommand::Sort(SortField::AverageMark))
        );
        assert_eq!("page 2".parse(), Ok(SessionCommand::Page(2)));
        assert_eq!(
            "approve app-004".parse(),
            Ok(SessionCommand::Decide(
                "app-004".to_string(),
                ApplicationStatus::Approved
            ))
        );
        assert_eq!("download".parse(), Ok(SessionCommand::Download(None)));
        assert_eq!("QUIT".parse(), Ok(SessionCommand::Quit));
    }

    #[test]
    fn test_parse_errors() {
        assert!("tab".parse::<SessionCommand>().is_err());
        assert!("tab withdrawn".parse::<SessionCommand>().is_err());
        assert!("page two".parse::<SessionCommand>().is_err());
        assert!("approve".parse::<SessionCommand>().is_err());
        let err = "dance".parse::<SessionCommand>().unwrap_err();
        assert!(err.contains("Unknown command"));
    }

    #[tokio::test]
    async fn test_session_approve_flow() {
        let out = run("approve app-004\ntab approved\nquit\nlist\n").await;
        assert!(out.contains("[Success] Application approved successfully"));
        assert!(out.contains("*Approved (3)"));
        assert!(out.contains("Rejected (0)"));
        assert!(out.contains("James Robertson"));
        // Nothing after quit runs.
        assert_eq!(out.matches("Approved applications").count(), 1);
    }

    #[tokio::test]
    async fn test_session_search_and_course() {
        let out = run("search Priya\nsearch\ncourse DS-SPECIALIST\n").await;
        assert!(out.contains("Pending applications (1)"));
        assert!(out.contains("Priya Patel"));
        assert!(out.contains("David Kim"));
    }

    #[tokio::test]
    async fn test_session_unknown_and_failed_commands() {
        let out = run("dance\nview app-999\napprove app-999\npreview\n").await;
        assert!(out.contains("Unknown command: dance"));
        assert!(out.contains("Application not found: app-999"));
        assert!(out.contains("[Error] Failed to update application status"));
        assert!(out.contains("No application selected"));
    }

    #[tokio::test]
    async fn test_session_view_and_download() {
        let tmp = tempfile::TempDir::new().unwrap();
        let script = format!("view app-002\ndownload {}\nclose\n", tmp.path().display());
        let out = run(&script).await;
        assert!(out.contains("Michael Chen"));
        assert!(out.contains("Saved"));
        assert!(tmp.path().join("michael_chen_cv.pdf").exists());
        assert!(out.contains("Detail closed."));
    }
}
