use crate::models::{FontFile, FontInstallError, InstallationOutcome};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// Session-level font table of the OS.
pub trait FontRegistrationService {
    /// Add the font to the current session's font table.
    ///
    /// Returns false when the OS reports that no font resources were added.
    fn register_transient(&self, path: &Utf8Path) -> bool;

    /// Tell every top-level window that the set of fonts changed. Best effort.
    fn broadcast_change(&self);
}

/// Standing font directory plus the OS font-name registry.
pub trait PersistentFontStore {
    /// Copy `source` into the font directory under the same file name, unless a
    /// file of that name already exists there. Returns the destination path.
    fn copy_if_absent(&self, source: &Utf8Path) -> Result<Utf8PathBuf, FontInstallError>;

    /// Map a registry display name to a file name in the font directory.
    fn set_mapping(&self, display_name: &str, file_name: &str) -> Result<(), FontInstallError>;
}

/// A destination directory fonts are copied into.
#[derive(Debug, Clone)]
pub struct FontDirectory {
    root: Utf8PathBuf,
}

impl FontDirectory {
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Copy `source` in unless a file with its name is already present.
    ///
    /// Existing files are never overwritten: a font in use by the system cannot
    /// be replaced anyway, and re-runs must not fail on this step.
    pub fn copy_if_absent(&self, source: &Utf8Path) -> Result<Utf8PathBuf, FontInstallError> {
        let file_name = source
            .file_name()
            .ok_or_else(|| FontInstallError::NotFound(source.to_path_buf()))?;
        let destination = self.root.join(file_name);

        if destination.exists() {
            tracing::debug!("{} already present, skipping copy", destination);
            return Ok(destination);
        }

        fs::copy(source, &destination).map_err(|e| FontInstallError::CopyFailed {
            destination: destination.clone(),
            reason: e.to_string(),
        })?;

        tracing::debug!("Copied {} to {}", source, destination);
        Ok(destination)
    }
}

/// Performs every OS registration step for a single font.
///
/// Steps run in order and any failure ends the attempt; earlier steps are not
/// rolled back. The outcome is always returned, never propagated as an error.
pub struct FontRegistrar<'a> {
    registration: &'a dyn FontRegistrationService,
    store: &'a dyn PersistentFontStore,
}

impl<'a> FontRegistrar<'a> {
    pub fn new(
        registration: &'a dyn FontRegistrationService,
        store: &'a dyn PersistentFontStore,
    ) -> Self {
        Self {
            registration,
            store,
        }
    }

    /// Install one font: transient registration, change broadcast, copy into the
    /// font directory, registry mapping.
    pub fn install_font(&self, font: &FontFile) -> InstallationOutcome {
        match self.try_install(font) {
            Ok(()) => {
                tracing::info!("Successfully installed font: {}", font.display_name());
                InstallationOutcome::Installed
            }
            Err(e) => {
                tracing::warn!("Failed to install font '{}': {}", font.file_name(), e);
                InstallationOutcome::Failed(e)
            }
        }
    }

    fn try_install(&self, font: &FontFile) -> Result<(), FontInstallError> {
        if !font.path().is_file() {
            return Err(FontInstallError::NotFound(font.path().to_path_buf()));
        }

        if !self.registration.register_transient(font.path()) {
            return Err(FontInstallError::RegistrationRejected(
                font.file_name().to_string(),
            ));
        }

        // The broadcast result does not decide success; the registration above does.
        self.registration.broadcast_change();

        let destination = self.store.copy_if_absent(font.path())?;
        let file_name = destination.file_name().unwrap_or(font.file_name());

        self.store.set_mapping(&font.registry_name(), file_name)
    }
}
