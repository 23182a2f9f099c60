use clap::Parser;
use tracing_subscriber::EnvFilter;

use admissions::cli::{
    handle_courses, handle_cv_download, handle_cv_preview, handle_decide, handle_list,
    handle_session, handle_show, handle_summary, Cli, Commands, CvAction,
};
use admissions::entity::ApplicationStatus;

fn init_tracing(verbose: bool) {
    let default = if verbose { "admissions=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // stdout carries command output; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);
    let global = &cli.global;

    let result = match cli.command {
        Commands::Summary { json } => handle_summary(global, json).await,
        Commands::List(args) => handle_list(global, args).await,
        Commands::Courses { json } => handle_courses(global, json).await,
        Commands::Show { id, json } => handle_show(global, id, json).await,
        Commands::Approve { id } => handle_decide(global, id, ApplicationStatus::Approved).await,
        Commands::Reject { id } => handle_decide(global, id, ApplicationStatus::Rejected).await,
        Commands::Cv(cv) => match cv.action {
            CvAction::Download { id, out } => handle_cv_download(global, id, &out).await,
            CvAction::Preview { id } => handle_cv_preview(global, id).await,
        },
        Commands::Session => handle_session(global).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
