//! Text decoding for string reads

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Text encoding applied to the raw bytes of a string read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Encoding {
    /// 7-bit ASCII; the high bit of every byte is cleared before decoding
    #[default]
    Ascii,
    /// UTF-8; invalid sequences are replaced with U+FFFD
    Utf8,
}

impl Encoding {
    /// Decode `bytes` into a string
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            Self::Ascii => bytes.iter().map(|&b| char::from(b & 0x7F)).collect(),
            Self::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascii => f.write_str("ascii"),
            Self::Utf8 => f.write_str("utf8"),
        }
    }
}

impl FromStr for Encoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ascii" | "us-ascii" => Ok(Self::Ascii),
            "utf8" | "utf-8" => Ok(Self::Utf8),
            _ => Err(Error::invalid_configuration(format!(
                "unsupported text encoding '{s}'"
            ))),
        }
    }
}
