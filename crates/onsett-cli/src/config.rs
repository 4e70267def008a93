// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::error::CliError;
use onsett_core::OnsetError;
use onsett_io::ColumnSchema;
use onsett_pipeline::PipelineSpec;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Run configuration: how to read the sensor log and how to process it.
///
/// Every field is optional in JSON; missing ones fall back to defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub schema: ColumnSchema,
    pub pipeline: PipelineSpec,
}

impl RunConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn load(path: &Path) -> Result<Self, CliError> {
        let raw = fs::read_to_string(path)
            .map_err(|err| CliError::io(format!("failed to read {}", path.display()), err))?;
        Self::from_json_str(&raw).map_err(|source| CliError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), OnsetError> {
        self.schema.validate()?;
        self.pipeline.validate()
    }
}
