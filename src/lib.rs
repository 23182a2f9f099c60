pub mod backend;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod detail;
pub mod entity;
pub mod error;
pub mod fixture;
pub mod notify;
pub mod render;
pub mod store;
pub mod summary;
pub mod transition;
pub mod view;

pub use backend::{ApplicationBackend, DataSource, SimulatedBackend};
pub use config::DashboardConfig;
pub use dashboard::Dashboard;
pub use error::{AdmissionsError, Result};
