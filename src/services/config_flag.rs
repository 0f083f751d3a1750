//! Marker line maintenance for the key/value variables file.
//!
//! The variables file is plain `Key=Value` lines (a Rainmeter `.inc` file in
//! practice). Only the marker line is managed; every other line is passed
//! through untouched and in order.
//!
//! The file is rewritten in place, not via a temporary file and rename, so an
//! interrupted write can leave it truncated.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use thiserror::Error;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16LE_BOM: &[u8] = &[0xFF, 0xFE];

/// Errors while updating the variables file.
#[derive(Error, Debug)]
pub enum ConfigFlagError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not valid {encoding:?} text")]
    Decode {
        path: Utf8PathBuf,
        encoding: TextEncoding,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// On-disk text encoding, detected from the byte order mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Utf8Bom,
    Utf16Le,
}

/// The variables file held in memory for one update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDocument {
    lines: Vec<String>,
    encoding: TextEncoding,
    crlf: bool,
}

impl ConfigDocument {
    /// Decode raw file bytes. Fails with the detected encoding if the bytes are
    /// not valid text in the encoding the BOM announces.
    pub fn decode(bytes: &[u8]) -> Result<Self, TextEncoding> {
        let (text, encoding) = if let Some(rest) = bytes.strip_prefix(UTF16LE_BOM) {
            let pairs = rest.chunks_exact(2);
            if !pairs.remainder().is_empty() {
                return Err(TextEncoding::Utf16Le);
            }
            let units: Vec<u16> = pairs
                .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                .collect();
            let text = String::from_utf16(&units).map_err(|_| TextEncoding::Utf16Le)?;
            (text, TextEncoding::Utf16Le)
        } else if let Some(rest) = bytes.strip_prefix(UTF8_BOM) {
            let text = String::from_utf8(rest.to_vec()).map_err(|_| TextEncoding::Utf8Bom)?;
            (text, TextEncoding::Utf8Bom)
        } else {
            let text = String::from_utf8(bytes.to_vec()).map_err(|_| TextEncoding::Utf8)?;
            (text, TextEncoding::Utf8)
        };

        Ok(Self::parse(&text, encoding))
    }

    /// Split text into lines, remembering whether it used CRLF.
    pub fn parse(text: &str, encoding: TextEncoding) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
            encoding,
            crlf: text.contains("\r\n"),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// Set the marker line.
    ///
    /// The first line starting with `key=` is replaced with `key=value` and no
    /// later line is examined. If none matches, the marker is appended.
    /// Returns true if an existing line was rewritten.
    pub fn set_marker(&mut self, key: &str, value: &str) -> bool {
        let prefix = format!("{key}=");
        let marker = format!("{prefix}{value}");

        match self.lines.iter_mut().find(|line| line.starts_with(&prefix)) {
            Some(line) => {
                *line = marker;
                true
            }
            None => {
                self.lines.push(marker);
                false
            }
        }
    }

    /// Serialize back to bytes in the original encoding. Every line, including
    /// the last, is terminated.
    pub fn encode(&self) -> Vec<u8> {
        let newline = if self.crlf { "\r\n" } else { "\n" };
        let mut text = String::new();
        for line in &self.lines {
            text.push_str(line);
            text.push_str(newline);
        }

        match self.encoding {
            TextEncoding::Utf8 => text.into_bytes(),
            TextEncoding::Utf8Bom => {
                let mut bytes = UTF8_BOM.to_vec();
                bytes.extend_from_slice(text.as_bytes());
                bytes
            }
            TextEncoding::Utf16Le => {
                let mut bytes = UTF16LE_BOM.to_vec();
                for unit in text.encode_utf16() {
                    bytes.extend_from_slice(&unit.to_le_bytes());
                }
                bytes
            }
        }
    }
}

/// Writes the "fonts installed" marker into a variables file.
#[derive(Debug, Clone)]
pub struct ConfigFlagWriter {
    key: String,
    value: String,
}

impl ConfigFlagWriter {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Read `file_path`, set the marker line and write the whole file back.
    ///
    /// Idempotent: a second run leaves the same single marker line.
    pub fn set_installed_flag(&self, file_path: &Utf8Path) -> Result<(), ConfigFlagError> {
        let bytes = fs::read(file_path).map_err(|source| ConfigFlagError::Read {
            path: file_path.to_path_buf(),
            source,
        })?;

        let mut document =
            ConfigDocument::decode(&bytes).map_err(|encoding| ConfigFlagError::Decode {
                path: file_path.to_path_buf(),
                encoding,
            })?;

        let rewritten = document.set_marker(&self.key, &self.value);

        fs::write(file_path, document.encode()).map_err(|source| ConfigFlagError::Write {
            path: file_path.to_path_buf(),
            source,
        })?;

        tracing::info!(
            "Updated variables file {}: {}={} ({})",
            file_path,
            self.key,
            self.value,
            if rewritten { "rewritten" } else { "appended" }
        );
        Ok(())
    }
}
