// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::config::RunConfig;
use onsett_core::OnsetError;
use onsett_io::StorageError;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Onset(#[from] OnsetError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// A failure while processing one input file.
    #[error("{}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: StorageError,
    },
    #[error("invalid run configuration {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{failed} of {total} files failed")]
    BatchFailed { failed: usize, total: usize },
}

impl CliError {
    pub fn file(path: &Path, source: StorageError) -> Self {
        Self::File {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Onset(err) => err.code(),
            Self::Storage(err) | Self::File { source: err, .. } => err.code(),
            Self::Config { .. } => "invalid_input",
            Self::Io { .. } => "io_error",
            Self::BatchFailed { .. } => "batch_failed",
        }
    }

    /// The input file the error belongs to, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File { path, .. } | Self::Config { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Machine-readable failure record written to stderr.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope<'a> {
    pub error: ErrorPayload<'a>,
}

#[derive(Debug, Serialize)]
pub struct ErrorPayload<'a> {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<&'a RunConfig>,
}

impl<'a> ErrorEnvelope<'a> {
    pub fn new(err: &CliError, parameters: Option<&'a RunConfig>) -> Self {
        Self {
            error: ErrorPayload {
                code: err.code(),
                message: err.to_string(),
                file: err.path().map(|path| path.display().to_string()),
                parameters,
            },
        }
    }

    /// Pretty JSON; falls back to a hand-built object with code and message.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| {
            format!(
                "{{\"error\":{{\"code\":\"{}\",\"message\":\"{}\"}}}}",
                self.error.code,
                self.error.message.replace('"', "'")
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{CliError, ErrorEnvelope};
    use crate::config::RunConfig;
    use onsett_core::OnsetError;
    use onsett_io::StorageError;
    use serde_json::Value;
    use std::path::Path;

    #[test]
    fn file_errors_carry_path_and_inner_code() {
        let inner = StorageError::from(OnsetError::window_too_small("window [0, 1) too small"));
        let err = CliError::file(Path::new("run_3.csv"), inner);
        assert_eq!(err.code(), "window_too_small");
        assert_eq!(err.path(), Some(Path::new("run_3.csv")));
        assert!(err.to_string().starts_with("run_3.csv: "));
    }

    #[test]
    fn batch_failure_has_own_code() {
        let err = CliError::BatchFailed {
            failed: 2,
            total: 5,
        };
        assert_eq!(err.code(), "batch_failed");
        assert_eq!(err.to_string(), "2 of 5 files failed");
        assert!(err.path().is_none());
    }

    #[test]
    fn envelope_names_file_and_parameters() {
        let inner = StorageError::from(OnsetError::schema_mismatch("line 5: row has 3 columns"));
        let err = CliError::file(Path::new("data/run_7.csv"), inner);
        let config = RunConfig::default();

        let json: Value =
            serde_json::from_str(&ErrorEnvelope::new(&err, Some(&config)).to_json()).expect("json");
        let error = &json["error"];
        assert_eq!(error["code"], "schema_mismatch");
        assert_eq!(error["file"], "data/run_7.csv");
        assert!(error["message"].as_str().expect("message").contains("row has 3 columns"));
        assert_eq!(error["parameters"]["pipeline"]["window"]["half_width"], 50);
    }

    #[test]
    fn envelope_omits_absent_fields() {
        let err = CliError::BatchFailed {
            failed: 1,
            total: 2,
        };
        let json: Value =
            serde_json::from_str(&ErrorEnvelope::new(&err, None).to_json()).expect("json");
        let error = json["error"].as_object().expect("object");
        assert_eq!(error["code"], "batch_failed");
        assert_eq!(error["message"], "1 of 2 files failed");
        assert!(!error.contains_key("file"));
        assert!(!error.contains_key("parameters"));
    }
}
