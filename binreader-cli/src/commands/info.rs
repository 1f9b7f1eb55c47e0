//! Implementation of `binreader info`

use crate::utils::{format_bytes, hex_dump};
use anyhow::{Context, Result};
use binreader::BinaryCursor;
use std::path::Path;

/// Print the size and a hex preview of `path`
pub fn execute(path: &Path, length: usize) -> Result<()> {
    let mut cursor = BinaryCursor::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let preview = cursor
        .read(length)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    println!("File: {}", path.display());
    println!("Size: {} ({} bytes)", format_bytes(cursor.size()), cursor.size());
    if !preview.is_empty() {
        println!();
        for line in hex_dump(&preview, 0) {
            println!("{line}");
        }
    }

    cursor.close();
    Ok(())
}
