//! Read position tracking and range checking
//!
//! Both cursor variants keep their offset in a [`Position`], so the clamping
//! and rejection rules live in exactly one place:
//!
//! - [`RangeChecking::Lenient`] clamps any out-of-range target to `0` or
//!   `size` and logs a warning.
//! - [`RangeChecking::Strict`] rejects the target with
//!   [`Error::InvalidPosition`] and leaves the position untouched.

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Policy applied when a seek or read would leave `[0, size]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RangeChecking {
    /// Clamp to the nearest bound and warn
    #[default]
    Lenient,
    /// Fail with [`Error::InvalidPosition`]
    Strict,
}

impl RangeChecking {
    /// Check if this is the strict policy
    pub fn is_strict(self) -> bool {
        self == Self::Strict
    }
}

impl fmt::Display for RangeChecking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lenient => f.write_str("lenient"),
            Self::Strict => f.write_str("strict"),
        }
    }
}

impl FromStr for RangeChecking {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "lenient" | "clamp" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            _ => Err(Error::invalid_configuration(format!(
                "unknown range checking mode '{s}'"
            ))),
        }
    }
}

/// Current offset into a source of fixed size
#[derive(Debug, Clone)]
pub(crate) struct Position {
    pos: u64,
    size: u64,
    mode: RangeChecking,
}

impl Position {
    pub(crate) fn new(size: u64, mode: RangeChecking) -> Self {
        Self { pos: 0, size, mode }
    }

    pub(crate) fn get(&self) -> u64 {
        self.pos
    }

    pub(crate) fn size(&self) -> u64 {
        self.size
    }

    pub(crate) fn remaining(&self) -> u64 {
        self.size - self.pos
    }

    pub(crate) fn mode(&self) -> RangeChecking {
        self.mode
    }

    pub(crate) fn set_mode(&mut self, mode: RangeChecking) {
        self.mode = mode;
    }

    /// Move to an absolute target, applying the range policy
    pub(crate) fn set(&mut self, target: i128) -> Result<u64> {
        if target < 0 {
            self.out_of_range(target, 0)?;
        } else if target > self.size as i128 {
            self.out_of_range(target, self.size)?;
        } else {
            self.pos = target as u64;
        }
        Ok(self.pos)
    }

    /// Move relative to the current offset
    pub(crate) fn skip(&mut self, delta: i64) -> Result<u64> {
        self.set(self.pos as i128 + delta as i128)
    }

    fn out_of_range(&mut self, target: i128, bound: u64) -> Result<()> {
        if self.mode.is_strict() {
            return Err(Error::InvalidPosition {
                position: target,
                size: self.size,
            });
        }
        log::warn!(
            "Position out of range: {} (size {}), set position to {}",
            target,
            self.size,
            bound
        );
        self.pos = bound;
        Ok(())
    }

    /// Number of bytes a byte-range read of `len` may consume
    pub(crate) fn clamp(&self, len: usize) -> usize {
        (len as u64).min(self.remaining()) as usize
    }

    /// Number of bytes a fixed-width read of `width` may consume.
    ///
    /// Strict mode refuses a read that would run past the end; lenient mode
    /// allows the short read and warns.
    pub(crate) fn reserve(&self, width: usize) -> Result<usize> {
        let available = self.clamp(width);
        if available < width {
            if self.mode.is_strict() {
                return Err(Error::InvalidPosition {
                    position: self.pos as i128 + width as i128,
                    size: self.size,
                });
            }
            log::warn!(
                "Read of {} bytes at {} runs past end of source (size {}), {} bytes available",
                width,
                self.pos,
                self.size,
                available
            );
        }
        Ok(available)
    }

    /// Record `n` bytes as consumed
    pub(crate) fn advance(&mut self, n: usize) {
        self.pos = self.pos.saturating_add(n as u64).min(self.size);
    }
}
