//! In-memory stand-ins for the OS adapters, shared by the integration tests.

#![allow(dead_code)]

use camino::{Utf8Path, Utf8PathBuf};
use font_installer::FontInstallError;
use font_installer::services::{
    FontDirectory, FontRegistrationService, Handoff, LaunchError, PersistentFontStore,
    PrivilegeGate, ProcessError, ProcessRegistry,
};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

/// Temp directory as a UTF-8 path.
pub fn temp_dir() -> (TempDir, Utf8PathBuf) {
    let temp = TempDir::new().unwrap();
    let path = Utf8PathBuf::try_from(temp.path().to_path_buf()).unwrap();
    (temp, path)
}

/// Font table + Fonts folder + registry, all in memory except the copied files.
pub struct FakeFontSystem {
    pub directory: FontDirectory,
    pub registered: RefCell<Vec<Utf8PathBuf>>,
    pub broadcasts: Cell<usize>,
    pub mappings: RefCell<BTreeMap<String, String>>,
    /// File names the font table refuses.
    pub rejected: HashSet<String>,
    pub registry_available: bool,
}

impl FakeFontSystem {
    pub fn new(fonts_dir: &Utf8Path) -> Self {
        fs::create_dir_all(fonts_dir).unwrap();
        Self {
            directory: FontDirectory::new(fonts_dir),
            registered: RefCell::new(Vec::new()),
            broadcasts: Cell::new(0),
            mappings: RefCell::new(BTreeMap::new()),
            rejected: HashSet::new(),
            registry_available: true,
        }
    }

    pub fn rejecting(mut self, file_name: &str) -> Self {
        self.rejected.insert(file_name.to_string());
        self
    }

    pub fn mapping(&self, name: &str) -> Option<String> {
        self.mappings.borrow().get(name).cloned()
    }
}

impl FontRegistrationService for FakeFontSystem {
    fn register_transient(&self, path: &Utf8Path) -> bool {
        self.registered.borrow_mut().push(path.to_path_buf());
        !self
            .rejected
            .contains(path.file_name().unwrap_or_default())
    }

    fn broadcast_change(&self) {
        self.broadcasts.set(self.broadcasts.get() + 1);
    }
}

impl PersistentFontStore for FakeFontSystem {
    fn copy_if_absent(&self, source: &Utf8Path) -> Result<Utf8PathBuf, FontInstallError> {
        self.directory.copy_if_absent(source)
    }

    fn set_mapping(&self, display_name: &str, file_name: &str) -> Result<(), FontInstallError> {
        if !self.registry_available {
            return Err(FontInstallError::RegistryUnavailable("access denied".into()));
        }
        self.mappings
            .borrow_mut()
            .insert(display_name.to_string(), file_name.to_string());
        Ok(())
    }
}

/// Privilege gate with a fixed answer that records relaunch requests.
pub struct FakePrivilegeGate {
    pub elevated: bool,
    pub relaunch_result: Result<(), LaunchError>,
    pub checks: Cell<usize>,
    pub relaunches: RefCell<Vec<Vec<String>>>,
}

impl FakePrivilegeGate {
    pub fn elevated() -> Self {
        Self::with(true, Ok(()))
    }

    pub fn not_elevated() -> Self {
        Self::with(false, Ok(()))
    }

    pub fn declining() -> Self {
        Self::with(false, Err(LaunchError::Declined))
    }

    fn with(elevated: bool, relaunch_result: Result<(), LaunchError>) -> Self {
        Self {
            elevated,
            relaunch_result,
            checks: Cell::new(0),
            relaunches: RefCell::new(Vec::new()),
        }
    }
}

impl PrivilegeGate for FakePrivilegeGate {
    fn is_elevated(&self) -> bool {
        self.checks.set(self.checks.get() + 1);
        self.elevated
    }

    fn relaunch_elevated(&self, args: &[String]) -> Result<Handoff, LaunchError> {
        self.relaunches.borrow_mut().push(args.to_vec());
        self.relaunch_result.clone().map(|()| Handoff::new())
    }
}

/// Process table with at most one named process.
pub struct FakeProcessRegistry {
    pub running: RefCell<Option<(String, u32)>>,
    pub terminated: RefCell<Vec<u32>>,
    pub launched: RefCell<Vec<String>>,
    pub launch_fails: bool,
}

impl FakeProcessRegistry {
    pub fn empty() -> Self {
        Self {
            running: RefCell::new(None),
            terminated: RefCell::new(Vec::new()),
            launched: RefCell::new(Vec::new()),
            launch_fails: false,
        }
    }

    pub fn running(name: &str, pid: u32) -> Self {
        let registry = Self::empty();
        *registry.running.borrow_mut() = Some((name.to_string(), pid));
        registry
    }
}

impl ProcessRegistry for FakeProcessRegistry {
    fn find_by_name(&self, name: &str) -> Option<u32> {
        self.running
            .borrow()
            .as_ref()
            .filter(|(running, _)| running == name)
            .map(|(_, pid)| *pid)
    }

    fn terminate_and_wait(&self, pid: u32, _timeout: Duration) -> Result<(), ProcessError> {
        self.terminated.borrow_mut().push(pid);
        *self.running.borrow_mut() = None;
        Ok(())
    }

    fn launch(&self, executable: &str) -> Result<(), ProcessError> {
        if self.launch_fails {
            return Err(ProcessError::LaunchFailed {
                executable: executable.to_string(),
                reason: "The system cannot find the file specified.".to_string(),
            });
        }
        self.launched.borrow_mut().push(executable.to_string());
        Ok(())
    }
}
