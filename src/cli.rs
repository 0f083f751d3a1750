use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "font-installer")]
#[command(version)]
#[command(about = "Install a folder of fonts, mark them installed and restart the skin host", long_about = None)]
#[command(after_help = "\
ELEVATION:
    Installing fonts needs administrator rights. When started without them,
    the installer relaunches itself through UAC with the same arguments and
    the original process exits.

SETTINGS:
    font-installer.yaml next to the executable (or --settings) and
    FONT_INSTALLER_* environment variables override the process name,
    executable, marker key/value and exit timeout.")]
pub struct Cli {
    /// Folder containing .ttf/.otf files to install (not searched recursively)
    #[arg(required_unless_present = "write_settings")]
    pub font_folder: Option<Utf8PathBuf>,

    /// Variables file that receives the installed marker line
    #[arg(required_unless_present = "write_settings")]
    pub variables_file: Option<Utf8PathBuf>,

    /// Executable to start after installing, instead of the configured one
    pub restart_target: Option<String>,

    /// Settings file [default: font-installer.yaml next to the executable]
    #[arg(long, value_name = "PATH")]
    pub settings: Option<Utf8PathBuf>,

    /// Log directory [default: logs next to the executable]
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<Utf8PathBuf>,

    /// Verbose logging
    #[arg(long)]
    pub debug: bool,

    /// Write the effective settings to the settings file and exit
    #[arg(long)]
    pub write_settings: bool,
}

impl Cli {
    /// Arguments for an elevated relaunch.
    ///
    /// The elevated instance starts in the system directory, so every path is
    /// resolved against `cwd` first. The restart target is left alone: it may
    /// be a bare name resolved by the shell.
    pub fn forwarded_args(&self, cwd: &Utf8Path) -> Vec<String> {
        let mut args = Vec::new();

        if let Some(settings) = &self.settings {
            args.push("--settings".to_string());
            args.push(absolute(cwd, settings));
        }
        if let Some(log_dir) = &self.log_dir {
            args.push("--log-dir".to_string());
            args.push(absolute(cwd, log_dir));
        }
        if self.debug {
            args.push("--debug".to_string());
        }

        args.extend(self.font_folder.iter().map(|p| absolute(cwd, p)));
        args.extend(self.variables_file.iter().map(|p| absolute(cwd, p)));
        args.extend(self.restart_target.iter().cloned());
        args
    }
}

fn absolute(cwd: &Utf8Path, path: &Utf8Path) -> String {
    if path.is_absolute() {
        path.to_string()
    } else {
        cwd.join(path).to_string()
    }
}
