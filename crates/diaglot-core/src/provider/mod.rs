//! Diagnostic data sources.
//!
//! A provider hands out one batch of readings per [`DiagnosticProvider::load`]
//! call; the caller feeds the batch to
//! [`TimeSeriesStore::rebuild_from`](crate::store::TimeSeriesStore::rebuild_from).

mod file;

pub use file::FileProvider;

use crate::model::DiagnosticData;

/// Error type for provider failures. Each message names the source path.
#[derive(Debug)]
pub enum ProviderError {
    /// The source could not be read.
    Io(String),
    /// The source is compressed and failed to decompress.
    Decompress(String),
    /// The source is not a valid diagnostic document.
    Parse(String),
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderError::Io(msg) => write!(f, "I/O error: {}", msg),
            ProviderError::Decompress(msg) => write!(f, "decompression error: {}", msg),
            ProviderError::Parse(msg) => write!(f, "parse error: {}", msg),
        }
    }
}

impl std::error::Error for ProviderError {}

/// Source of diagnostic reading batches.
pub trait DiagnosticProvider {
    /// Loads the current batch of readings.
    fn load(&mut self) -> Result<DiagnosticData, ProviderError>;
}
