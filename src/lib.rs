pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::{CliConfig, Command};

pub use adapters::{live_analyzer, GbifClient, IucnClient, LiveAnalyzer};
pub use config::Settings;
pub use core::analysis::BiodiversityAnalyzer;
pub use domain::report::BiodiversityReport;
pub use server::{create_router, AppState};
pub use utils::error::{BioverseError, Result};
