mod commands;
mod handlers;
mod session;

pub use commands::{Cli, Commands, CvAction, CvCommand, GlobalArgs, ListArgs};
pub use handlers::{
    handle_courses, handle_cv_download, handle_cv_preview, handle_decide, handle_list,
    handle_session, handle_show, handle_summary,
};
pub use session::{run_session, SessionCommand, HELP};
