//! Diagnostic batch stored in a single file.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::model::DiagnosticData;

use super::{DiagnosticProvider, ProviderError};

/// Reads a batch from a `.json` file, or from zstd-compressed JSON when the
/// file name ends in `.zst`.
pub struct FileProvider {
    path: PathBuf,
}

impl FileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_compressed(&self) -> bool {
        self.path.extension().is_some_and(|ext| ext == "zst")
    }
}

impl DiagnosticProvider for FileProvider {
    fn load(&mut self) -> Result<DiagnosticData, ProviderError> {
        let raw = std::fs::read(&self.path).map_err(|e| {
            ProviderError::Io(format!("Failed to read {}: {}", self.path.display(), e))
        })?;

        let json = if self.is_compressed() {
            zstd::decode_all(&raw[..]).map_err(|e| {
                ProviderError::Decompress(format!("{}: {}", self.path.display(), e))
            })?
        } else {
            raw
        };

        let data: DiagnosticData = serde_json::from_slice(&json)
            .map_err(|e| ProviderError::Parse(format!("{}: {}", self.path.display(), e)))?;

        debug!(
            path = %self.path.display(),
            bytes = json.len(),
            readings = data.len(),
            "diagnostic batch loaded"
        );
        Ok(data)
    }
}
