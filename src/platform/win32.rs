//! Win32 bindings behind the service traits.

use crate::models::FontInstallError;
use crate::services::{
    FontDirectory, FontRegistrationService, Handoff, LaunchError, PersistentFontStore,
    PrivilegeGate, build_parameters,
};
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::ffi::OsStr;
use std::os::windows::ffi::OsStrExt;
use windows::Win32::Foundation::{CloseHandle, ERROR_CANCELLED, ERROR_SUCCESS, HANDLE};
use windows::Win32::Graphics::Gdi::AddFontResourceW;
use windows::Win32::Security::{GetTokenInformation, TOKEN_ELEVATION, TOKEN_QUERY, TokenElevation};
use windows::Win32::System::Com::CoTaskMemFree;
use windows::Win32::System::Registry::{
    HKEY, HKEY_LOCAL_MACHINE, KEY_SET_VALUE, REG_SZ, RegCloseKey, RegOpenKeyExW, RegSetValueExW,
};
use windows::Win32::System::Threading::{GetCurrentProcess, OpenProcessToken};
use windows::Win32::UI::Shell::{
    FOLDERID_Fonts, KF_FLAG_DEFAULT, SEE_MASK_FLAG_NO_UI, SHELLEXECUTEINFOW, SHGetKnownFolderPath,
    ShellExecuteExW,
};
use windows::Win32::UI::WindowsAndMessaging::{
    HWND_BROADCAST, SW_SHOWNORMAL, SendMessageW, WM_FONTCHANGE,
};
use windows::core::PCWSTR;

/// HKLM subkey mapping font display names to files in the Fonts folder.
pub const FONTS_REG_PATH: &str = r"SOFTWARE\Microsoft\Windows NT\CurrentVersion\Fonts";

fn wstr(s: &OsStr) -> Vec<u16> {
    s.encode_wide().chain(std::iter::once(0)).collect()
}

/// Elevation via the process token and the `runas` shell verb.
#[derive(Debug, Default, Clone)]
pub struct WindowsPrivilegeGate;

impl PrivilegeGate for WindowsPrivilegeGate {
    fn is_elevated(&self) -> bool {
        unsafe {
            let mut token = HANDLE::default();
            if OpenProcessToken(GetCurrentProcess(), TOKEN_QUERY, &mut token).is_err() {
                return false;
            }

            let mut elevation = TOKEN_ELEVATION::default();
            let mut return_length = 0u32;
            let result = GetTokenInformation(
                token,
                TokenElevation,
                Some(&mut elevation as *mut _ as *mut _),
                std::mem::size_of::<TOKEN_ELEVATION>() as u32,
                &mut return_length,
            );

            let _ = CloseHandle(token);
            result.is_ok() && elevation.TokenIsElevated != 0
        }
    }

    fn relaunch_elevated(&self, args: &[String]) -> Result<Handoff, LaunchError> {
        let exe = std::env::current_exe().map_err(|e| LaunchError::Failed(e.to_string()))?;
        let parameters = build_parameters(args);

        tracing::debug!("Relaunching {} elevated with: {}", exe.display(), parameters);

        shell_execute("runas", exe.as_os_str(), Some(&parameters), 0).map_err(|e| {
            if e.code() == ERROR_CANCELLED.to_hresult() {
                LaunchError::Declined
            } else {
                LaunchError::Failed(e.to_string())
            }
        })?;

        Ok(Handoff::new())
    }
}

/// GDI font table, the Fonts known folder and the HKLM font registry.
#[derive(Debug, Clone)]
pub struct WindowsFontSystem {
    directory: FontDirectory,
}

impl WindowsFontSystem {
    /// Resolve the system Fonts folder.
    pub fn new() -> Result<Self> {
        let fonts_dir = known_fonts_folder()
            .or_else(|| {
                std::env::var("WINDIR")
                    .ok()
                    .map(|windir| Utf8PathBuf::from(windir).join("Fonts"))
            })
            .context("Failed to get Windows Fonts folder path")?;

        tracing::debug!("System Fonts folder: {}", fonts_dir);
        Ok(Self {
            directory: FontDirectory::new(fonts_dir),
        })
    }
}

impl FontRegistrationService for WindowsFontSystem {
    fn register_transient(&self, path: &Utf8Path) -> bool {
        let wide = wstr(path.as_os_str());
        let added = unsafe { AddFontResourceW(PCWSTR(wide.as_ptr())) };
        tracing::debug!("AddFontResourceW({}) added {} resource(s)", path, added);
        added > 0
    }

    fn broadcast_change(&self) {
        unsafe {
            SendMessageW(HWND_BROADCAST, WM_FONTCHANGE, None, None);
        }
    }
}

impl PersistentFontStore for WindowsFontSystem {
    fn copy_if_absent(&self, source: &Utf8Path) -> Result<Utf8PathBuf, FontInstallError> {
        self.directory.copy_if_absent(source)
    }

    fn set_mapping(&self, display_name: &str, file_name: &str) -> Result<(), FontInstallError> {
        let subkey = wstr(OsStr::new(FONTS_REG_PATH));
        let mut key = HKEY::default();
        let status = unsafe {
            RegOpenKeyExW(
                HKEY_LOCAL_MACHINE,
                PCWSTR(subkey.as_ptr()),
                Some(0),
                KEY_SET_VALUE,
                &mut key,
            )
        };
        if status != ERROR_SUCCESS {
            return Err(FontInstallError::RegistryUnavailable(format!(
                "RegOpenKeyExW failed with error {}",
                status.0
            )));
        }

        let name = wstr(OsStr::new(display_name));
        let data = wstr(OsStr::new(file_name));
        let status = unsafe {
            RegSetValueExW(
                key,
                PCWSTR(name.as_ptr()),
                Some(0),
                REG_SZ,
                Some(std::slice::from_raw_parts(
                    data.as_ptr() as *const u8,
                    data.len() * 2,
                )),
            )
        };
        let _ = unsafe { RegCloseKey(key) };

        if status != ERROR_SUCCESS {
            return Err(FontInstallError::RegistryWriteFailed {
                name: display_name.to_string(),
                reason: format!("RegSetValueExW failed with error {}", status.0),
            });
        }

        tracing::debug!("Registry: {} -> {}", display_name, file_name);
        Ok(())
    }
}

/// Launch through the shell so App Paths and the search path resolve bare names.
pub fn shell_open(executable: &str) -> Result<(), String> {
    shell_execute("open", OsStr::new(executable), None, SEE_MASK_FLAG_NO_UI)
        .map_err(|e| e.to_string())
}

fn shell_execute(
    verb: &str,
    file: &OsStr,
    parameters: Option<&str>,
    mask: u32,
) -> windows::core::Result<()> {
    let verb_w = wstr(OsStr::new(verb));
    let file_w = wstr(file);
    let params_w = parameters.map(|p| wstr(OsStr::new(p)));

    let mut exec = SHELLEXECUTEINFOW::default();
    exec.cbSize = std::mem::size_of::<SHELLEXECUTEINFOW>() as u32;
    exec.fMask = mask;
    exec.lpVerb = PCWSTR(verb_w.as_ptr());
    exec.lpFile = PCWSTR(file_w.as_ptr());
    exec.lpParameters = params_w
        .as_ref()
        .map_or(PCWSTR::null(), |p| PCWSTR(p.as_ptr()));
    exec.nShow = SW_SHOWNORMAL.0 as i32;

    unsafe { ShellExecuteExW(&mut exec) }
}

fn known_fonts_folder() -> Option<Utf8PathBuf> {
    unsafe {
        let raw = SHGetKnownFolderPath(&FOLDERID_Fonts, KF_FLAG_DEFAULT, None).ok()?;
        let path = raw.to_string().ok();
        CoTaskMemFree(Some(raw.0 as _));
        path.filter(|p| !p.is_empty()).map(Utf8PathBuf::from)
    }
}
