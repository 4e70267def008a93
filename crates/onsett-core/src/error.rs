// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

/// Error kinds shared by every stage of onset extraction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OnsetError {
    /// A parameter or input value violates its contract.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// A computation produced a non-finite or otherwise unusable value.
    #[error("numerical issue: {0}")]
    NumericalIssue(String),
    /// The series is too short for the requested detection.
    #[error("insufficient data: {0}")]
    DataInsufficient(String),
    /// The onset search window cannot produce a first difference.
    #[error("onset window too small: {0}")]
    WindowTooSmall(String),
    /// The input layout does not match the configured column schema.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),
    /// No input file matched the configured location.
    #[error("no input files: {0}")]
    NoInputFiles(String),
}

impl OnsetError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn numerical_issue(msg: impl Into<String>) -> Self {
        Self::NumericalIssue(msg.into())
    }

    pub fn data_insufficient(msg: impl Into<String>) -> Self {
        Self::DataInsufficient(msg.into())
    }

    pub fn window_too_small(msg: impl Into<String>) -> Self {
        Self::WindowTooSmall(msg.into())
    }

    pub fn schema_mismatch(msg: impl Into<String>) -> Self {
        Self::SchemaMismatch(msg.into())
    }

    pub fn no_input_files(msg: impl Into<String>) -> Self {
        Self::NoInputFiles(msg.into())
    }

    /// Stable machine-readable code for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::NumericalIssue(_) => "numerical_issue",
            Self::DataInsufficient(_) => "data_insufficient",
            Self::WindowTooSmall(_) => "window_too_small",
            Self::SchemaMismatch(_) => "schema_mismatch",
            Self::NoInputFiles(_) => "no_input_files",
        }
    }
}
