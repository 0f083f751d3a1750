use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Installer settings from `font-installer.yaml` and `FONT_INSTALLER_*` variables.
///
/// Every field has a default, so a partial file (or no file at all) is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallerSettings {
    /// Exact name of the running dependent process to stop.
    pub process_name: String,

    /// Executable launched after the fonts are installed. Resolved by the OS,
    /// so a bare file name registered under App Paths works.
    pub executable: String,

    /// Key of the marker line in the variables file (without `=`).
    pub marker_key: String,

    /// Value written after the marker key.
    pub marker_value: String,

    /// How long to wait for the stopped process to exit before giving up.
    pub exit_timeout_secs: u64,

    /// Log directory; defaults to `logs` next to the executable.
    pub log_dir: Option<String>,

    pub debug: bool,
}

impl Default for InstallerSettings {
    fn default() -> Self {
        Self {
            process_name: default_process_name(),
            executable: default_executable(),
            marker_key: "Installed_Fonts".to_string(),
            marker_value: "1".to_string(),
            exit_timeout_secs: 10,
            log_dir: None,
            debug: false,
        }
    }
}

impl InstallerSettings {
    /// The full marker line, e.g. `Installed_Fonts=1`.
    pub fn marker_line(&self) -> String {
        format!("{}={}", self.marker_key, self.marker_value)
    }

    pub fn exit_timeout(&self) -> Duration {
        Duration::from_secs(self.exit_timeout_secs)
    }
}

fn default_process_name() -> String {
    if cfg!(windows) {
        "Rainmeter.exe".to_string()
    } else {
        "Rainmeter".to_string()
    }
}

fn default_executable() -> String {
    "Rainmeter.exe".to_string()
}
