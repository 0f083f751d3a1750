//! Process table access backed by `sysinfo`.

use crate::services::{ProcessError, ProcessRegistry};
use std::ffi::OsStr;
use std::thread;
use std::time::{Duration, Instant};
use sysinfo::{Pid, ProcessesToUpdate, System};

/// [`ProcessRegistry`] over the live OS process table.
#[derive(Debug, Clone)]
pub struct SystemProcessRegistry {
    poll_interval: Duration,
}

impl SystemProcessRegistry {
    pub fn new() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
        }
    }
}

impl Default for SystemProcessRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessRegistry for SystemProcessRegistry {
    fn find_by_name(&self, name: &str) -> Option<u32> {
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::All, true);

        sys.processes_by_exact_name(OsStr::new(name))
            .next()
            .map(|process| process.pid().as_u32())
    }

    fn terminate_and_wait(&self, pid: u32, timeout: Duration) -> Result<(), ProcessError> {
        let target = Pid::from_u32(pid);
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[target]), true);

        let Some(process) = sys.process(target) else {
            tracing::debug!("Process {} already exited", pid);
            return Ok(());
        };

        if !process.kill() {
            return Err(ProcessError::TerminationRefused { pid });
        }

        let deadline = Instant::now() + timeout;
        loop {
            sys.refresh_processes(ProcessesToUpdate::Some(&[target]), true);
            if sys.process(target).is_none() {
                tracing::debug!("Process {} exited", pid);
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(ProcessError::ExitTimeout { pid, timeout });
            }
            thread::sleep(self.poll_interval);
        }
    }

    fn launch(&self, executable: &str) -> Result<(), ProcessError> {
        super::launch_detached(executable).map_err(|reason| ProcessError::LaunchFailed {
            executable: executable.to_string(),
            reason,
        })
    }
}
