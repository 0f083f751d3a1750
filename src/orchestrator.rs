//! The installation pipeline.
//!
//! `Start → Elevating → Installing → UpdatingConfig → Restarting → Done`
//!
//! Only invalid input and a failed elevation abort the run. Every later step
//! is attempted even if an earlier one failed, and its failure is reported in
//! the [`RunReport`].

use crate::models::{FontResult, InstallationOutcome, InstallerSettings};
use crate::services::{
    ConfigFlagError, ConfigFlagWriter, FontBatchInstaller, FontRegistrar, FontRegistrationService,
    LaunchError, PersistentFontStore, PrivilegeGate, ProcessCoordinator, ProcessError,
    ProcessRegistry, RestartReport,
};
use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

/// Pipeline states, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Start,
    Elevating,
    Installing,
    UpdatingConfig,
    Restarting,
    Done,
    Aborted,
}

/// Invalid command-line input. Checked before elevation is attempted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Directory '{0}' does not exist")]
    FolderMissing(Utf8PathBuf),

    #[error("'{0}' is not a directory")]
    NotADirectory(Utf8PathBuf),

    #[error("File '{0}' does not exist")]
    VariablesFileMissing(Utf8PathBuf),
}

/// Why a run stopped before installing anything.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Elevation(#[from] LaunchError),
}

/// One invocation's inputs.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub font_folder: Utf8PathBuf,
    pub variables_file: Utf8PathBuf,
    /// Overrides the configured executable for the restart step.
    pub restart_target: Option<String>,
    /// Arguments for the elevated instance if the run has to relaunch.
    pub original_args: Vec<String>,
}

/// Everything a completed run did.
#[derive(Debug)]
pub struct RunReport {
    pub fonts: Vec<FontResult>,
    /// Set when the font folder could not be listed at all.
    pub folder_error: Option<String>,
    pub config: Result<(), ConfigFlagError>,
    pub restart: Result<RestartReport, ProcessError>,
}

impl RunReport {
    pub fn installed_count(&self) -> usize {
        self.fonts.iter().filter(|f| f.outcome.is_installed()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &FontResult> {
        self.fonts.iter().filter(|f| !f.outcome.is_installed())
    }

    /// True if every step succeeded.
    pub fn is_clean(&self) -> bool {
        self.folder_error.is_none()
            && self.failures().next().is_none()
            && self.config.is_ok()
            && self.restart.is_ok()
    }

    /// Human-readable summary, one line per item.
    pub fn summary(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "Fonts: {} installed, {} failed",
            self.installed_count(),
            self.failures().count()
        )];

        if let Some(err) = &self.folder_error {
            lines.push(format!("Font folder could not be read: {}", err));
        }

        for failure in self.failures() {
            if let InstallationOutcome::Failed(reason) = &failure.outcome {
                let name = failure.path.file_name().unwrap_or(failure.path.as_str());
                lines.push(format!("  {}: {}", name, reason));
            }
        }

        lines.push(match &self.config {
            Ok(()) => "Variables file updated".to_string(),
            Err(e) => format!("Variables file not updated: {}", e),
        });

        lines.push(match &self.restart {
            Ok(_) => "Dependent application restarted".to_string(),
            Err(e) => format!("Failed to restart dependent application: {}", e),
        });

        lines
    }
}

/// How a run ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// An elevated instance was started; this process must exit now.
    HandedOff,
    Aborted(AbortReason),
    Completed(RunReport),
}

/// The OS capabilities the pipeline runs against.
pub struct PipelineDeps<'a> {
    pub privilege: &'a dyn PrivilegeGate,
    pub registration: &'a dyn FontRegistrationService,
    pub store: &'a dyn PersistentFontStore,
    pub processes: &'a dyn ProcessRegistry,
}

/// Sequences the pipeline steps for one run.
pub struct Orchestrator<'a> {
    deps: PipelineDeps<'a>,
    settings: &'a InstallerSettings,
}

impl<'a> Orchestrator<'a> {
    pub fn new(deps: PipelineDeps<'a>, settings: &'a InstallerSettings) -> Self {
        Self { deps, settings }
    }

    pub fn run(&self, request: &RunRequest) -> RunOutcome {
        let mut state = PipelineState::Start;

        if let Err(e) = validate_inputs(&request.font_folder, &request.variables_file) {
            tracing::error!("Error: {}", e);
            transition(&mut state, PipelineState::Aborted);
            return RunOutcome::Aborted(e.into());
        }

        transition(&mut state, PipelineState::Elevating);
        if !self.deps.privilege.is_elevated() {
            tracing::warn!(
                "Program is not running as administrator. Relaunching with elevated privileges..."
            );
            return match self.deps.privilege.relaunch_elevated(&request.original_args) {
                Ok(_handoff) => RunOutcome::HandedOff,
                Err(e) => {
                    tracing::warn!("Failed to relaunch as administrator: {}", e);
                    transition(&mut state, PipelineState::Aborted);
                    RunOutcome::Aborted(e.into())
                }
            };
        }

        transition(&mut state, PipelineState::Installing);
        tracing::info!("Installing fonts...");
        let registrar = FontRegistrar::new(self.deps.registration, self.deps.store);
        let (fonts, folder_error) =
            match FontBatchInstaller::new(registrar).install_all(&request.font_folder) {
                Ok(fonts) => (fonts, None),
                Err(e) => {
                    tracing::error!("Failed to list {}: {}", request.font_folder, e);
                    (Vec::new(), Some(e.to_string()))
                }
            };
        tracing::info!("All fonts processed.");

        transition(&mut state, PipelineState::UpdatingConfig);
        tracing::info!(
            "Setting {} in {}",
            self.settings.marker_line(),
            request.variables_file
        );
        let config = ConfigFlagWriter::new(&self.settings.marker_key, &self.settings.marker_value)
            .set_installed_flag(&request.variables_file);
        if let Err(e) = &config {
            tracing::error!("Failed to update variables file: {}", e);
        }

        transition(&mut state, PipelineState::Restarting);
        let executable = request
            .restart_target
            .as_deref()
            .unwrap_or(&self.settings.executable);
        let restart = ProcessCoordinator::new(self.deps.processes, self.settings.exit_timeout())
            .restart(&self.settings.process_name, executable);
        if let Err(e) = &restart {
            tracing::error!("Failed to restart {}: {}", self.settings.process_name, e);
        }

        transition(&mut state, PipelineState::Done);
        RunOutcome::Completed(RunReport {
            fonts,
            folder_error,
            config,
            restart,
        })
    }
}

/// The font folder must be an existing directory and the variables file must exist.
pub fn validate_inputs(font_folder: &Utf8Path, variables_file: &Utf8Path) -> Result<(), InputError> {
    if !font_folder.exists() {
        return Err(InputError::FolderMissing(font_folder.to_path_buf()));
    }
    if !font_folder.is_dir() {
        return Err(InputError::NotADirectory(font_folder.to_path_buf()));
    }
    if !variables_file.is_file() {
        return Err(InputError::VariablesFileMissing(variables_file.to_path_buf()));
    }
    Ok(())
}

fn transition(state: &mut PipelineState, next: PipelineState) {
    tracing::debug!("Pipeline: {:?} -> {:?}", state, next);
    *state = next;
}
