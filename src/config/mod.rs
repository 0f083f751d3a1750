use crate::models::InstallerSettings;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use config::{Config, Environment, File, FileFormat};
use std::fs;

/// Default settings file name, looked up next to the executable.
pub const SETTINGS_FILE_NAME: &str = "font-installer.yaml";

/// Prefix for environment overrides, e.g. `FONT_INSTALLER_PROCESS_NAME`.
pub const ENV_PREFIX: &str = "FONT_INSTALLER";

/// Loads and saves [`InstallerSettings`].
///
/// Settings are layered: built-in defaults, then the YAML file (optional),
/// then `FONT_INSTALLER_*` environment variables.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    settings_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a ConfigManager for the given settings file path.
    ///
    /// The file does not have to exist.
    pub fn new<P: AsRef<Utf8Path>>(settings_path: P) -> Self {
        Self {
            settings_path: settings_path.as_ref().to_path_buf(),
        }
    }

    /// ConfigManager pointing at `font-installer.yaml` in `dir`.
    pub fn in_dir<P: AsRef<Utf8Path>>(dir: P) -> Self {
        Self::new(dir.as_ref().join(SETTINGS_FILE_NAME))
    }

    /// Load the layered settings.
    ///
    /// # Returns
    /// The merged settings, or defaults if neither the file nor any variable is present
    pub fn load_settings(&self) -> Result<InstallerSettings> {
        if !self.settings_path.exists() {
            tracing::debug!(
                "Settings file not found at {}, using defaults",
                self.settings_path
            );
        }

        let merged = Config::builder()
            .add_source(
                File::new(self.settings_path.as_str(), FileFormat::Yaml).required(false),
            )
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .with_context(|| format!("Failed to read settings: {}", self.settings_path))?;

        let settings: InstallerSettings = merged
            .try_deserialize()
            .with_context(|| format!("Failed to parse settings: {}", self.settings_path))?;

        tracing::debug!("Loaded settings: {:?}", settings);
        Ok(settings)
    }

    /// Save settings as YAML, creating the parent directory if needed.
    pub fn save_settings(&self, settings: &InstallerSettings) -> Result<()> {
        if let Some(parent) = self.settings_path.parent() {
            if !parent.as_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create settings directory: {}", parent))?;
            }
        }

        let yaml_string =
            serde_yaml_ng::to_string(settings).context("Failed to serialize settings to YAML")?;

        fs::write(&self.settings_path, yaml_string)
            .with_context(|| format!("Failed to write settings: {}", self.settings_path))?;

        tracing::info!("Saved settings to {}", self.settings_path);
        Ok(())
    }

    /// Get the settings file path.
    pub fn settings_path(&self) -> &Utf8Path {
        &self.settings_path
    }
}
