//! Byte order selection

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Byte order used to interpret multi-byte primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Endian {
    /// Most significant byte first
    #[default]
    Big,
    /// Least significant byte first
    Little,
}

impl Endian {
    /// Byte order of the host, fixed at compile time
    pub const NATIVE: Self = if cfg!(target_endian = "big") {
        Self::Big
    } else {
        Self::Little
    };

    /// Check whether this order matches the host's
    pub fn is_native(self) -> bool {
        self == Self::NATIVE
    }

    /// The opposite byte order
    pub fn swapped(self) -> Self {
        match self {
            Self::Big => Self::Little,
            Self::Little => Self::Big,
        }
    }
}

impl fmt::Display for Endian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Big => f.write_str("big"),
            Self::Little => f.write_str("little"),
        }
    }
}

impl FromStr for Endian {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "big" | "be" | "big-endian" | "bigendian" => Ok(Self::Big),
            "little" | "le" | "little-endian" | "littleendian" => Ok(Self::Little),
            "native" => Ok(Self::NATIVE),
            _ => Err(Error::invalid_configuration(format!(
                "unknown byte order '{s}'"
            ))),
        }
    }
}
