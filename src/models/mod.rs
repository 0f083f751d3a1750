//! Data models for the font installer.
//!
//! - [`FontFile`]: a discovered font, with its [`FontKind`] and derived names
//! - [`InstallationOutcome`] / [`FontResult`]: per-font results reported by the batch installer
//! - [`FontInstallError`]: the reasons a single font can fail
//! - [`InstallerSettings`]: settings loaded from `font-installer.yaml` and the environment

pub mod font;
pub mod settings;

pub use font::{FontFile, FontInstallError, FontKind, FontResult, InstallationOutcome};
pub use settings::InstallerSettings;
