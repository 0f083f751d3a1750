//! Privilege verification and self-elevation.
//!
//! Elevation is a control transfer, not a fork: once [`PrivilegeGate::relaunch_elevated`]
//! returns a [`Handoff`], the caller must stop and exit without doing further work.
//! The elevated instance is an independent process that runs the whole pipeline again.

use thiserror::Error;

/// Errors from relaunching with elevated privileges.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LaunchError {
    #[error("Elevation was declined by the user")]
    Declined,

    #[error("Failed to relaunch with elevated privileges: {0}")]
    Failed(String),
}

/// Proof that an elevated instance was started.
///
/// Only obtainable from a successful relaunch. The holder must return straight
/// to `main` and exit; the child is neither awaited nor supervised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "the current process must exit after handing off to the elevated instance"]
pub struct Handoff {
    _private: (),
}

impl Handoff {
    /// Only privilege gate implementations should construct this.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl Default for Handoff {
    fn default() -> Self {
        Self::new()
    }
}

/// Capability to inspect and escalate the current process's privileges.
pub trait PrivilegeGate {
    /// Whether the current process holds administrative rights. No side effects.
    fn is_elevated(&self) -> bool;

    /// Start a new elevated instance of the current executable with `args` forwarded.
    fn relaunch_elevated(&self, args: &[String]) -> Result<Handoff, LaunchError>;
}

/// Build a Windows command-line parameter string where every argument is its
/// own quoted token.
///
/// Follows the `CommandLineToArgvW` rules: backslashes are literal unless they
/// precede a quote, so runs of backslashes before an embedded quote or the
/// closing quote are doubled.
pub fn build_parameters(args: &[String]) -> String {
    args.iter()
        .map(|arg| quote_argument(arg))
        .collect::<Vec<_>>()
        .join(" ")
}

fn quote_argument(arg: &str) -> String {
    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');

    let mut backslashes = 0usize;
    for ch in arg.chars() {
        match ch {
            '\\' => backslashes += 1,
            '"' => {
                quoted.extend(std::iter::repeat_n('\\', backslashes * 2 + 1));
                quoted.push('"');
                backslashes = 0;
            }
            _ => {
                quoted.extend(std::iter::repeat_n('\\', backslashes));
                quoted.push(ch);
                backslashes = 0;
            }
        }
    }

    quoted.extend(std::iter::repeat_n('\\', backslashes * 2));
    quoted.push('"');
    quoted
}
