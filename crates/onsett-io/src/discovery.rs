// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::error::StorageError;
use log::debug;
use onsett_core::OnsetError;
use std::fs;
use std::path::{Path, PathBuf};

/// Lists regular files in `dir` whose extension matches, sorted by path.
///
/// The extension is compared case-insensitively and may be given with or
/// without a leading dot.
pub fn discover_inputs(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, StorageError> {
    let wanted = extension.trim_start_matches('.');
    let mut files = Vec::new();

    for entry in fs::read_dir(dir).map_err(|err| StorageError::io(dir, err))? {
        let entry = entry.map_err(|err| StorageError::io(dir, err))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted));
        if matches {
            files.push(path);
        }
    }

    if files.is_empty() {
        return Err(OnsetError::no_input_files(format!(
            "no '*.{wanted}' files in {}",
            dir.display()
        ))
        .into());
    }

    files.sort();
    debug!("discovered {} input files in {}", files.len(), dir.display());
    Ok(files)
}
