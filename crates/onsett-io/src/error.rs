// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use onsett_core::OnsetError;
use std::path::{Path, PathBuf};

/// Failures while reading sensor logs or writing result artifacts.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error(transparent)]
    Onset(#[from] OnsetError),

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to render plot {}: {message}", path.display())]
    Plot { path: PathBuf, message: String },

    #[error("failed to write archive {}: {source}", path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StorageError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn csv(path: &Path, source: csv::Error) -> Self {
        Self::Csv {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn plot(path: &Path, message: impl Into<String>) -> Self {
        Self::Plot {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    pub fn archive(path: &Path, source: zip::result::ZipError) -> Self {
        Self::Archive {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Stable machine-readable code; domain errors keep their own code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Onset(err) => err.code(),
            Self::Io { .. } => "io_error",
            Self::Csv { .. } => "csv_error",
            Self::Plot { .. } => "plot_error",
            Self::Archive { .. } => "archive_error",
            Self::Json(_) => "json_error",
        }
    }
}
