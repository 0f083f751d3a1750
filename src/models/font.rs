use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

/// Outline formats the installer recognizes, keyed by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontKind {
    /// `.ttf`
    TrueType,
    /// `.otf`
    OpenType,
}

impl FontKind {
    /// Match an extension (without the dot), ignoring ASCII case.
    pub fn from_extension(extension: &str) -> Option<Self> {
        if extension.eq_ignore_ascii_case("ttf") {
            Some(Self::TrueType)
        } else if extension.eq_ignore_ascii_case("otf") {
            Some(Self::OpenType)
        } else {
            None
        }
    }

    /// Annotation appended to the registry display name.
    pub fn registry_suffix(&self) -> &'static str {
        match self {
            Self::TrueType => "",
            Self::OpenType => " (OpenType)",
        }
    }
}

/// A font file discovered on disk.
///
/// Construction guarantees the path has a file name, a stem, and a recognized
/// extension, so the accessors below never have to deal with missing parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontFile {
    path: Utf8PathBuf,
    kind: FontKind,
}

impl FontFile {
    /// Returns `None` when the extension is not a recognized font kind.
    pub fn from_path(path: impl Into<Utf8PathBuf>) -> Option<Self> {
        let path = path.into();
        let kind = FontKind::from_extension(path.extension()?)?;
        path.file_stem()?;
        Some(Self { path, kind })
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub fn kind(&self) -> FontKind {
        self.kind
    }

    /// File name including extension, e.g. `Roboto.ttf`.
    pub fn file_name(&self) -> &str {
        self.path.file_name().unwrap_or(self.path.as_str())
    }

    /// Base name used as the font's display name, e.g. `Roboto`.
    pub fn display_name(&self) -> &str {
        self.path.file_stem().unwrap_or(self.file_name())
    }

    /// Name written into the persistent font registry.
    pub fn registry_name(&self) -> String {
        format!("{}{}", self.display_name(), self.kind.registry_suffix())
    }
}

/// Why a single font could not be installed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FontInstallError {
    #[error("Font file not found: {0}")]
    NotFound(Utf8PathBuf),

    #[error("The font table rejected {0} (no resources added)")]
    RegistrationRejected(String),

    #[error("Failed to copy font to {destination}: {reason}")]
    CopyFailed {
        destination: Utf8PathBuf,
        reason: String,
    },

    #[error("Font registry unavailable: {0}")]
    RegistryUnavailable(String),

    #[error("Failed to write registry value {name}: {reason}")]
    RegistryWriteFailed { name: String, reason: String },
}

/// Result of one installation attempt. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallationOutcome {
    Installed,
    Failed(FontInstallError),
}

impl InstallationOutcome {
    pub fn is_installed(&self) -> bool {
        matches!(self, Self::Installed)
    }
}

/// Outcome paired with the file it belongs to, as reported by the batch installer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontResult {
    pub path: Utf8PathBuf,
    pub outcome: InstallationOutcome,
}
