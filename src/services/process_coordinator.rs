use std::time::Duration;
use thiserror::Error;

/// Errors from stopping or starting the dependent process.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcessError {
    #[error("Process {pid} refused to terminate")]
    TerminationRefused { pid: u32 },

    #[error("Process {pid} did not exit within {timeout:?}")]
    ExitTimeout { pid: u32, timeout: Duration },

    #[error("Failed to launch {executable}: {reason}")]
    LaunchFailed { executable: String, reason: String },
}

/// OS process table access.
#[cfg_attr(test, mockall::automock)]
pub trait ProcessRegistry {
    /// Pid of a running process whose name matches exactly, if any.
    fn find_by_name(&self, name: &str) -> Option<u32>;

    /// Ask the process to terminate, then block until it is gone or `timeout` passes.
    fn terminate_and_wait(&self, pid: u32, timeout: Duration) -> Result<(), ProcessError>;

    /// Start `executable` through the OS's default launch mechanism.
    fn launch(&self, executable: &str) -> Result<(), ProcessError>;
}

/// What a successful restart did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestartReport {
    /// Pid of the instance that was stopped, if one was running.
    pub stopped: Option<u32>,
}

/// Stops a named process and starts a fresh instance.
pub struct ProcessCoordinator<'a> {
    registry: &'a dyn ProcessRegistry,
    exit_timeout: Duration,
}

impl<'a> ProcessCoordinator<'a> {
    pub fn new(registry: &'a dyn ProcessRegistry, exit_timeout: Duration) -> Self {
        Self {
            registry,
            exit_timeout,
        }
    }

    /// Restart the dependent application.
    ///
    /// No running instance is not an error. A failed termination aborts the
    /// restart so two instances never run side by side.
    pub fn restart(
        &self,
        process_name: &str,
        executable_path: &str,
    ) -> Result<RestartReport, ProcessError> {
        let stopped = match self.registry.find_by_name(process_name) {
            Some(pid) => {
                tracing::info!("Closing {} (pid {})...", process_name, pid);
                self.registry.terminate_and_wait(pid, self.exit_timeout)?;
                Some(pid)
            }
            None => {
                tracing::info!("{} is not running", process_name);
                None
            }
        };

        tracing::info!("Starting {}...", executable_path);
        self.registry.launch(executable_path)?;

        Ok(RestartReport { stopped })
    }
}
