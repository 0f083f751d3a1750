//! Font Installer - batch font installation for desktop-customization skins
//!
//! Main entry point for the command-line tool.
//!
//! # Execution Flow
//!
//! 1. Parse arguments, load settings (`font-installer.yaml` + `FONT_INSTALLER_*`)
//! 2. Initialize logging → `logs/font-installer.<date>` next to the executable
//! 3. Validate the font folder and variables file
//! 4. Relaunch elevated through UAC if needed; the unelevated process exits here
//! 5. Install every `.ttf`/`.otf` in the folder (failures are isolated per font)
//! 6. Set `Installed_Fonts=1` in the variables file
//! 7. Stop the dependent application if running, then start it again
//!
//! # Platform
//!
//! Windows 10/11 only. Other platforms exit with an error.

use anyhow::Result;
use clap::Parser;
use font_installer::cli::Cli;
use font_installer::config::ConfigManager;
use font_installer::orchestrator::{Orchestrator, PipelineDeps, RunOutcome, RunRequest};
use font_installer::{APP_NAME, VERSION, logging, platform};
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    // Absolute paths, so the elevated instance (started in the system directory) finds them
    let original_args = cli.forwarded_args(&current_dir());

    let config_manager = match &cli.settings {
        Some(path) => ConfigManager::new(path),
        None => ConfigManager::in_dir(exe_dir()),
    };
    let mut settings = config_manager.load_settings()?;
    settings.debug |= cli.debug;

    if cli.write_settings {
        config_manager.save_settings(&settings)?;
        println!("Settings written to {}", config_manager.settings_path());
        return Ok(ExitCode::SUCCESS);
    }

    let log_dir = cli
        .log_dir
        .clone()
        .or_else(|| settings.log_dir.clone().map(Into::into))
        .unwrap_or_else(logging::default_log_dir);
    // An unelevated run may not be able to write next to the executable; it
    // must still reach the elevation step.
    let _guard = match logging::setup_logging(&log_dir, logging::LOG_PREFIX, settings.debug, true)
    {
        Ok(guard) => Some(guard),
        Err(e) => {
            logging::setup_console_logging(settings.debug)?;
            tracing::warn!("File logging disabled: {:#}", e);
            None
        }
    };

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let (Some(font_folder), Some(variables_file)) = (cli.font_folder, cli.variables_file) else {
        // clap enforces both unless --write-settings was given
        tracing::error!("Usage: font-installer <font-folder> <variables-file> [restart-target]");
        return Ok(ExitCode::FAILURE);
    };

    let native = platform::native()?;
    let deps = PipelineDeps {
        privilege: native.privilege.as_ref(),
        registration: native.registration.as_ref(),
        store: native.store.as_ref(),
        processes: &native.processes,
    };

    let request = RunRequest {
        font_folder,
        variables_file,
        restart_target: cli.restart_target,
        original_args,
    };

    match Orchestrator::new(deps, &settings).run(&request) {
        RunOutcome::HandedOff => {
            tracing::info!("Handed off to elevated instance, exiting");
            Ok(ExitCode::SUCCESS)
        }
        RunOutcome::Aborted(reason) => {
            tracing::error!("Aborted: {}", reason);
            Ok(ExitCode::FAILURE)
        }
        RunOutcome::Completed(report) => {
            for line in report.summary() {
                tracing::info!("{}", line);
            }
            if report.is_clean() {
                tracing::info!("Process completed successfully.");
            } else {
                tracing::warn!("Process completed with errors.");
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Working directory of this invocation, empty if it cannot be determined.
fn current_dir() -> camino::Utf8PathBuf {
    std::env::current_dir()
        .ok()
        .and_then(|dir| camino::Utf8PathBuf::from_path_buf(dir).ok())
        .unwrap_or_default()
}

/// Directory of the running executable; the elevated instance starts in the
/// system directory, so relative defaults cannot use the working directory.
fn exe_dir() -> camino::Utf8PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| camino::Utf8PathBuf::from_path_buf(exe).ok())
        .and_then(|exe| exe.parent().map(|dir| dir.to_path_buf()))
        .unwrap_or_default()
}
