//! Formatting utilities

use humansize::{BINARY, format_size};
use std::fmt::Write;

const DUMP_WIDTH: usize = 16;

/// Format a byte count with a binary unit
pub fn format_bytes(bytes: u64) -> String {
    format_size(bytes, BINARY)
}

/// Space-separated lowercase hex
pub fn format_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// Classic hex dump: offset, hex columns, printable ASCII
pub fn hex_dump(bytes: &[u8], base: u64) -> Vec<String> {
    bytes
        .chunks(DUMP_WIDTH)
        .enumerate()
        .map(|(row, chunk)| {
            let ascii: String = chunk
                .iter()
                .map(|&b| {
                    if b.is_ascii_graphic() || b == b' ' {
                        b as char
                    } else {
                        '.'
                    }
                })
                .collect();
            format!(
                "{:08x}  {:<width$}  |{}|",
                base + (row * DUMP_WIDTH) as u64,
                format_hex(chunk),
                ascii,
                width = DUMP_WIDTH * 3 - 1
            )
        })
        .collect()
}
