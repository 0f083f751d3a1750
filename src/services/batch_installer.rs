use crate::models::{FontFile, FontResult};
use crate::services::font_registrar::FontRegistrar;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::io;

/// List the font files directly inside `directory`.
///
/// Non-recursive. Only regular files with a recognized extension (any case)
/// are returned, in directory enumeration order. Entries that cannot be read
/// are logged and skipped.
pub fn discover_fonts(directory: &Utf8Path) -> io::Result<Vec<FontFile>> {
    let mut fonts = Vec::new();

    for entry in fs::read_dir(directory)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry in {}: {}", directory, e);
                continue;
            }
        };

        // Follows symlinks, so a linked font counts as a file
        let is_file = fs::metadata(entry.path()).map(|m| m.is_file()).unwrap_or(false);
        if !is_file {
            tracing::debug!("Skipping non-file entry: {:?}", entry.file_name());
            continue;
        }

        let path = match Utf8PathBuf::from_path_buf(entry.path()) {
            Ok(path) => path,
            Err(path) => {
                tracing::warn!("Skipping non UTF-8 path: {}", path.display());
                continue;
            }
        };

        match FontFile::from_path(path) {
            Some(font) => fonts.push(font),
            None => tracing::debug!("Ignoring non-font file: {:?}", entry.file_name()),
        }
    }

    Ok(fonts)
}

/// Installs every font in a folder, one at a time.
///
/// Each font's result is collected; a failed font never stops the rest of the batch.
pub struct FontBatchInstaller<'a> {
    registrar: FontRegistrar<'a>,
}

impl<'a> FontBatchInstaller<'a> {
    pub fn new(registrar: FontRegistrar<'a>) -> Self {
        Self { registrar }
    }

    /// Install all fonts found directly inside `directory`.
    ///
    /// # Errors
    /// Only when the directory itself cannot be listed. An empty folder is a
    /// valid, empty result.
    pub fn install_all(&self, directory: &Utf8Path) -> io::Result<Vec<FontResult>> {
        let fonts = discover_fonts(directory)?;
        tracing::info!("Installing {} font(s) from {}", fonts.len(), directory);
        Ok(self.install_fonts(&fonts))
    }

    /// Install an already discovered set of fonts.
    pub fn install_fonts(&self, fonts: &[FontFile]) -> Vec<FontResult> {
        fonts
            .iter()
            .map(|font| FontResult {
                path: font.path().to_path_buf(),
                outcome: self.registrar.install_font(font),
            })
            .collect()
    }
}
