// Font Installer - batch font installation for desktop-customization skins
//
// This is the library crate containing the installation pipeline and its OS bindings.
// The binary crate (main.rs) provides the command-line entry point.

pub mod cli;
pub mod config;
pub mod logging;
pub mod models;
pub mod orchestrator;
pub mod platform;
pub mod services;

// Re-export commonly used types for convenience
pub use config::ConfigManager;
pub use models::{FontFile, FontInstallError, InstallationOutcome, InstallerSettings};
pub use orchestrator::{Orchestrator, PipelineDeps, RunOutcome, RunReport, RunRequest};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
