//! Utility functions for the CLI

pub mod format;

pub use format::{format_bytes, format_hex, hex_dump};
