//! Export error types.

use thiserror::Error;

/// Errors that can occur while exporting evaluations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// There are no saved evaluations; no file is written.
    #[error("No evaluations to export.")]
    NothingToExport,

    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to write YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to write export file: {0}")]
    Io(#[from] std::io::Error),
}
