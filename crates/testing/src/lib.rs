//! Testing utilities for the `orgsnap` ecosystem.

// formatting args are used for error messages
#![allow(clippy::literal_string_with_formatting_args)]

/// Resource clients to be used solely for testing.
pub mod client;
/// Builders for resources and record files.
pub mod fixtures;

use std::{fs, path::Path};

/// Write a value as pretty JSON into `dir/name`.
///
/// # Errors
///
/// If the value could not be serialized or the file could not be written.
pub fn write_json(dir: &Path, name: &str, value: &serde_json::Value) -> anyhow::Result<()> {
    fs::write(dir.join(name), serde_json::to_vec_pretty(value)?)?;
    Ok(())
}

/// Count the files with the given extension in a directory.
///
/// # Errors
///
/// If the directory could not be read.
pub fn count_files(dir: &Path, extension: &str) -> anyhow::Result<usize> {
    let mut count = 0;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == extension) {
            count += 1;
        }
    }
    Ok(count)
}
