// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

//! Interactive file selection on any line-oriented reader and writer.

use onsett_io::render_table;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Table of candidate files numbered from 0.
pub fn file_table(files: &[PathBuf]) -> String {
    let rows: Vec<Vec<String>> = files
        .iter()
        .enumerate()
        .map(|(idx, path)| vec![idx.to_string(), display_name(path)])
        .collect();
    render_table(&["File number", "File name"], &rows)
}

fn read_trimmed<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Shows the numbered files and asks for a number until a valid one is
/// entered. Returns `None` when the input ends first.
pub fn select_file<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    files: &[PathBuf],
) -> io::Result<Option<PathBuf>> {
    writeln!(output, "{}", file_table(files))?;
    loop {
        write!(output, "Select a file number: ")?;
        output.flush()?;
        let Some(answer) = read_trimmed(input)? else {
            return Ok(None);
        };
        match answer.parse::<usize>() {
            Ok(idx) if idx < files.len() => return Ok(Some(files[idx].clone())),
            _ => writeln!(
                output,
                "'{answer}' is not a file number; expected 0..={}",
                files.len().saturating_sub(1)
            )?,
        }
    }
}

/// Asks a yes/no question; only `y` (any case) confirms.
pub fn confirm<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
) -> io::Result<bool> {
    write!(output, "{question} (y/n): ")?;
    output.flush()?;
    Ok(read_trimmed(input)?.is_some_and(|answer| answer.eq_ignore_ascii_case("y")))
}
