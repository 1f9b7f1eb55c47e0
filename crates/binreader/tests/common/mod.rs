//! Common test utilities and fixtures

#![allow(dead_code)]

use std::io::Write;
use tempfile::NamedTempFile;

/// Generate test data of a specific size
pub fn generate_test_data(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i % 256) as u8).collect()
}

/// Write `content` to a fresh temporary file
pub fn create_test_file(content: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content).expect("Failed to write test file");
    file.flush().expect("Failed to flush test file");
    file
}

/// A record laid out the way the cursor tests read it back
///
/// `u32 magic (BE) | u16 count (LE) | i8 | f32 (LE) | f64 (BE) | "name\0" | 3 raw bytes`
pub fn sample_record() -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(&0x4249_4E52u32.to_be_bytes());
    data.extend_from_slice(&7u16.to_le_bytes());
    data.push(0xFE);
    data.extend_from_slice(&1.25f32.to_le_bytes());
    data.extend_from_slice(&(-2.5f64).to_be_bytes());
    data.extend_from_slice(b"name\0");
    data.extend_from_slice(&[9, 8, 7]);
    data
}
