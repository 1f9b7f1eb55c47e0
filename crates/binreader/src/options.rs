//! Cursor configuration

use crate::io::FileHandle;
use crate::{BinaryCursor, Endian, RangeChecking, Result};
use bytes::Bytes;
use std::path::Path;

/// Options applied when a cursor is created
///
/// ```no_run
/// use binreader::{CursorOptions, Endian, RangeChecking};
///
/// # fn main() -> Result<(), binreader::Error> {
/// let mut cursor = CursorOptions::new()
///     .endian(Endian::Little)
///     .range_checking(RangeChecking::Strict)
///     .open("data.bin")?;
/// let magic = cursor.read_u32()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CursorOptions {
    /// Byte order for the unsuffixed typed reads. Defaults to big-endian.
    pub endian: Endian,

    /// Policy for out-of-range seeks and reads. Defaults to lenient.
    pub range_checking: RangeChecking,
}

impl CursorOptions {
    /// Create new default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial byte order
    pub fn endian(mut self, endian: Endian) -> Self {
        self.endian = endian;
        self
    }

    /// Set the range checking policy
    pub fn range_checking(mut self, range_checking: RangeChecking) -> Self {
        self.range_checking = range_checking;
        self
    }

    /// Shorthand for `range_checking(RangeChecking::Strict)`
    pub fn strict(self) -> Self {
        self.range_checking(RangeChecking::Strict)
    }

    /// Open a file with these options
    pub fn open<P: AsRef<Path>>(self, path: P) -> Result<BinaryCursor> {
        BinaryCursor::open_with_options(path, self)
    }

    /// Wrap an in-memory buffer with these options
    pub fn from_buffer(self, buffer: impl Into<Bytes>) -> BinaryCursor {
        BinaryCursor::from_buffer_with_options(buffer, self)
    }

    /// Adopt a pre-opened file handle with these options
    pub fn from_handle(self, handle: FileHandle) -> BinaryCursor {
        BinaryCursor::from_handle_with_options(handle, self)
    }

    /// Open a file for asynchronous reading with these options
    #[cfg(feature = "async")]
    pub async fn open_async<P: AsRef<Path>>(self, path: P) -> Result<crate::AsyncBinaryCursor> {
        crate::AsyncBinaryCursor::open_with_options(path, self).await
    }
}
