use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::entity::ApplicationStatus;
use crate::view::{CourseFilter, SortDirection, SortField};

#[derive(Parser, Debug)]
#[command(name = "admissions")]
#[command(version, about = "Review, filter, and decide student applications")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// YAML config file (page size, mark thresholds, simulated delays)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// JSON file of applications to use instead of the built-in fixture
    #[arg(long, global = true, value_name = "PATH")]
    pub data: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show status counts and average marks
    Summary {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List one page of applications
    List(ListArgs),

    /// List the distinct course codes
    Courses {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one application in full
    Show {
        /// Application ID (e.g. "app-001")
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Approve an application
    Approve {
        /// Application ID
        id: String,
    },

    /// Reject an application
    Reject {
        /// Application ID
        id: String,
    },

    /// Download or preview an applicant's CV
    Cv(CvCommand),

    /// Start an interactive review session on stdin
    Session,
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Status tab (pending, approved, rejected)
    #[arg(long, default_value = "pending")]
    pub tab: ApplicationStatus,

    /// Match against full name (any case) or ID number
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Course code, or "all"
    #[arg(long, default_value = "all")]
    pub course: CourseFilter,

    /// Sort field (fullName, averageMark, submissionDate, courseCode)
    #[arg(long)]
    pub sort: Option<SortField>,

    /// Sort direction (asc, desc); defaults to asc when --sort is given
    #[arg(long)]
    pub order: Option<SortDirection>,

    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CvCommand {
    #[command(subcommand)]
    pub action: CvAction,
}

#[derive(Subcommand, Debug)]
pub enum CvAction {
    /// Save the CV under its original file name
    Download {
        /// Application ID
        id: String,

        /// Directory to save into
        #[arg(long, short = 'o', default_value = ".")]
        out: PathBuf,
    },

    /// Write the CV to a temporary preview file and print its path
    Preview {
        /// Application ID
        id: String,
    },
}
