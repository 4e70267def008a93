// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::error::StorageError;
use log::debug;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

fn entry_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Zips exactly `files` into `archive_path`, entries named by file name and
/// sorted. Returns the entry names.
pub fn zip_files(files: &[PathBuf], archive_path: &Path) -> Result<Vec<String>, StorageError> {
    let mut files: Vec<&PathBuf> = files.iter().collect();
    files.sort_by_key(|path| entry_name(path));

    let archive_file =
        File::create(archive_path).map_err(|err| StorageError::io(archive_path, err))?;
    let mut writer = ZipWriter::new(archive_file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut names = Vec::with_capacity(files.len());
    for path in files {
        let name = entry_name(path);
        writer
            .start_file(name.as_str(), options)
            .map_err(|err| StorageError::archive(archive_path, err))?;
        let mut source = File::open(path).map_err(|err| StorageError::io(path, err))?;
        io::copy(&mut source, &mut writer).map_err(|err| StorageError::io(archive_path, err))?;
        names.push(name);
    }

    writer
        .finish()
        .map_err(|err| StorageError::archive(archive_path, err))?;
    debug!("archived {} files into {}", names.len(), archive_path.display());
    Ok(names)
}
