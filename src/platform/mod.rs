//! Native OS bindings behind the service traits.
//!
//! On Windows, [`native`] wires up the real OS adapters. Other platforms build
//! (so the pipeline and its tests run anywhere) but report themselves as unsupported.

pub mod process;

#[cfg(windows)]
pub mod win32;

pub use process::SystemProcessRegistry;

use crate::services::{FontRegistrationService, PersistentFontStore, PrivilegeGate};

/// The set of OS adapters one run needs.
pub struct NativePlatform {
    pub privilege: Box<dyn PrivilegeGate>,
    pub registration: Box<dyn FontRegistrationService>,
    pub store: Box<dyn PersistentFontStore>,
    pub processes: SystemProcessRegistry,
}

/// Build the adapters for the current OS.
#[cfg(windows)]
pub fn native() -> anyhow::Result<NativePlatform> {
    let fonts = win32::WindowsFontSystem::new()?;
    Ok(NativePlatform {
        privilege: Box::new(win32::WindowsPrivilegeGate),
        registration: Box::new(fonts.clone()),
        store: Box::new(fonts),
        processes: SystemProcessRegistry::new(),
    })
}

#[cfg(not(windows))]
pub fn native() -> anyhow::Result<NativePlatform> {
    anyhow::bail!("Font installation is only supported on Windows")
}

/// Start `executable` without waiting for it.
#[cfg(windows)]
pub(crate) fn launch_detached(executable: &str) -> Result<(), String> {
    win32::shell_open(executable)
}

#[cfg(not(windows))]
pub(crate) fn launch_detached(executable: &str) -> Result<(), String> {
    std::process::Command::new(executable)
        .spawn()
        .map(|_child| ())
        .map_err(|e| e.to_string())
}
