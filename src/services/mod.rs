//! Services module - the installation pipeline's building blocks.
//!
//! Every service talks to the OS through a narrow trait, so the logic here can
//! be exercised against in-memory fakes. The real bindings live in
//! [`crate::platform`].
//!
//! # Components
//!
//! - [`PrivilegeGate`]: elevation check and self-relaunch ([`Handoff`] marks the terminal handoff)
//! - [`FontRegistrar`]: installs one font through [`FontRegistrationService`] and [`PersistentFontStore`]
//! - [`FontBatchInstaller`]: discovers fonts in a folder and installs each, collecting outcomes
//! - [`ConfigFlagWriter`]: sets the marker line in the variables file
//! - [`ProcessCoordinator`]: stops and restarts the dependent application via [`ProcessRegistry`]

pub mod batch_installer;
pub mod config_flag;
pub mod font_registrar;
pub mod privilege;
pub mod process_coordinator;

pub use batch_installer::{FontBatchInstaller, discover_fonts};
pub use config_flag::{ConfigDocument, ConfigFlagError, ConfigFlagWriter, TextEncoding};
pub use font_registrar::{
    FontDirectory, FontRegistrar, FontRegistrationService, PersistentFontStore,
};
pub use privilege::{Handoff, LaunchError, PrivilegeGate, build_parameters};
pub use process_coordinator::{ProcessCoordinator, ProcessError, ProcessRegistry, RestartReport};
