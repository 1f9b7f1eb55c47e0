//! Blocking binary cursor

use crate::codec::Primitive;
use crate::io::{ByteSource, FileHandle};
use crate::position::Position;
use crate::{CursorOptions, Encoding, Endian, Error, RangeChecking, Result};
use bytes::Bytes;
use std::io;
use std::path::{Path, PathBuf};

/// Chunk size used when scanning for a string terminator
const SCAN_CHUNK: usize = 256;

macro_rules! typed_reads {
    ($($ty:ident: $name:ident, $le:ident, $be:ident;)*) => {
        $(
            #[doc = concat!("Read a `", stringify!($ty), "` in the cursor's current byte order")]
            pub fn $name(&mut self) -> Result<$ty> {
                self.read_primitive(self.endian)
            }

            #[doc = concat!("Read a little-endian `", stringify!($ty), "`")]
            pub fn $le(&mut self) -> Result<$ty> {
                self.read_primitive(Endian::Little)
            }

            #[doc = concat!("Read a big-endian `", stringify!($ty), "`")]
            pub fn $be(&mut self) -> Result<$ty> {
                self.read_primitive(Endian::Big)
            }
        )*
    };
}

/// Cursor over a buffer or file that reads primitives and strings
///
/// Every read runs to completion before returning and advances the position
/// by exactly the number of bytes it consumed.
///
/// Byte-range reads ([`read`](Self::read), [`read_to_buffer`](Self::read_to_buffer)
/// and fixed-length [`read_string`](Self::read_string)) are clamped to the end
/// of the source in either range checking mode; a result shorter than
/// requested means the source ran out. Fixed-width reads such as
/// [`read_u32`](Self::read_u32) need their full width: strict mode rejects a
/// read that would run past the end, lenient mode zero-fills the missing
/// bytes and logs a warning.
///
/// ```
/// use binreader::{BinaryCursor, Encoding};
///
/// # fn main() -> Result<(), binreader::Error> {
/// let mut cursor = BinaryCursor::from_buffer(&b"\x00\x2Aabc\0"[..]);
/// assert_eq!(cursor.read_u16()?, 42);
/// assert_eq!(cursor.read_cstring(Encoding::Ascii)?, "abc");
/// assert!(cursor.is_eof());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct BinaryCursor {
    source: Option<ByteSource>,
    position: Position,
    endian: Endian,
    path: PathBuf,
}

impl BinaryCursor {
    /// Open a file with default options
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, CursorOptions::default())
    }

    /// Open a file with custom options
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: CursorOptions) -> Result<Self> {
        let handle = FileHandle::open(path)?;
        Ok(Self::from_handle_with_options(handle, options))
    }

    /// Wrap an in-memory buffer with default options
    pub fn from_buffer(buffer: impl Into<Bytes>) -> Self {
        Self::from_buffer_with_options(buffer, CursorOptions::default())
    }

    /// Wrap an in-memory buffer with custom options
    pub fn from_buffer_with_options(buffer: impl Into<Bytes>, options: CursorOptions) -> Self {
        Self::with_source(ByteSource::Buffer(buffer.into()), options)
    }

    /// Adopt a pre-opened file handle with default options
    pub fn from_handle(handle: FileHandle) -> Self {
        Self::from_handle_with_options(handle, CursorOptions::default())
    }

    /// Adopt a pre-opened file handle with custom options
    pub fn from_handle_with_options(handle: FileHandle, options: CursorOptions) -> Self {
        Self::with_source(ByteSource::File(handle), options)
    }

    fn with_source(source: ByteSource, options: CursorOptions) -> Self {
        let path = source.path().to_path_buf();
        Self {
            position: Position::new(source.size(), options.range_checking),
            source: Some(source),
            endian: options.endian,
            path,
        }
    }

    /// Release the underlying source. Calling this more than once is a no-op.
    pub fn close(&mut self) {
        if self.source.take().is_some() {
            log::debug!("Closed cursor over {}", self.describe());
        }
    }

    fn describe(&self) -> String {
        if self.path.as_os_str().is_empty() {
            format!("{}-byte buffer", self.position.size())
        } else {
            self.path.display().to_string()
        }
    }

    /// Check whether the cursor still accepts reads
    pub fn is_open(&self) -> bool {
        self.source.is_some()
    }

    /// Size of the source in bytes
    pub fn size(&self) -> u64 {
        self.position.size()
    }

    /// Current position
    pub fn tell(&self) -> u64 {
        self.position.get()
    }

    /// Bytes left between the position and the end of the source
    pub fn remaining(&self) -> u64 {
        self.position.remaining()
    }

    /// Check whether the position is at the end of the source
    pub fn is_eof(&self) -> bool {
        self.position.remaining() == 0
    }

    /// Byte order used by the unsuffixed typed reads
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Change the byte order used by the unsuffixed typed reads
    pub fn set_endian(&mut self, endian: Endian) {
        self.endian = endian;
    }

    /// Current range checking policy
    pub fn range_checking(&self) -> RangeChecking {
        self.position.mode()
    }

    /// Change the range checking policy
    pub fn set_range_checking(&mut self, range_checking: RangeChecking) {
        self.position.set_mode(range_checking);
    }

    /// Path the cursor was opened from, empty for buffers
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_open(&self) -> Result<()> {
        if self.source.is_some() {
            Ok(())
        } else {
            Err(Error::Closed)
        }
    }

    /// Move to an absolute position and return it
    pub fn seek(&mut self, pos: i64) -> Result<u64> {
        self.ensure_open()?;
        self.position.set(pos as i128)
    }

    /// Move relative to the current position and return the new position
    pub fn skip(&mut self, delta: i64) -> Result<u64> {
        self.ensure_open()?;
        self.position.skip(delta)
    }

    /// Read up to `len` bytes.
    ///
    /// The result is shorter than `len` when the source ends first.
    pub fn read(&mut self, len: usize) -> Result<Vec<u8>> {
        let source = self.source.as_ref().ok_or(Error::Closed)?;
        if len == 0 {
            return Ok(Vec::new());
        }
        let len = self.position.clamp(len);
        let mut buf = vec![0u8; len];
        let copied = source.copy(&mut buf, self.position.get())?;
        buf.truncate(copied);
        self.position.advance(copied);
        Ok(buf)
    }

    /// Read up to `dest.len()` bytes into caller storage, returning the count.
    pub fn read_to_buffer(&mut self, dest: &mut [u8]) -> Result<usize> {
        let source = self.source.as_ref().ok_or(Error::Closed)?;
        let len = self.position.clamp(dest.len());
        if len == 0 {
            return Ok(0);
        }
        let copied = source.copy(&mut dest[..len], self.position.get())?;
        self.position.advance(copied);
        Ok(copied)
    }

    /// Read a string.
    ///
    /// `Some(n)` reads `n` bytes (clamped to the end of the source). `None`
    /// reads up to the next zero byte, see [`read_cstring`](Self::read_cstring).
    pub fn read_string(&mut self, encoding: Encoding, length: Option<usize>) -> Result<String> {
        match length {
            Some(0) => {
                self.ensure_open()?;
                Ok(String::new())
            }
            Some(len) => Ok(encoding.decode(&self.read(len)?)),
            None => self.read_cstring(encoding),
        }
    }

    /// Read a zero-terminated string.
    ///
    /// The terminator is consumed but not returned. When the source ends
    /// before a terminator, everything up to the end is returned.
    pub fn read_cstring(&mut self, encoding: Encoding) -> Result<String> {
        let source = self.source.as_ref().ok_or(Error::Closed)?;
        let start = self.position.get();
        let mut bytes = Vec::new();
        let mut consumed = 0u64;
        let mut chunk = [0u8; SCAN_CHUNK];

        loop {
            let want = (self.position.remaining() - consumed).min(SCAN_CHUNK as u64) as usize;
            if want == 0 {
                break;
            }
            let copied = source.copy(&mut chunk[..want], start + consumed)?;
            if copied == 0 {
                break;
            }
            if let Some(nul) = memchr::memchr(0, &chunk[..copied]) {
                bytes.extend_from_slice(&chunk[..nul]);
                consumed += nul as u64 + 1;
                break;
            }
            bytes.extend_from_slice(&chunk[..copied]);
            consumed += copied as u64;
        }

        self.position.advance(consumed as usize);
        Ok(encoding.decode(&bytes))
    }

    /// Read one byte and interpret any nonzero value as `true`
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    /// Read any [`Primitive`] in the given byte order
    pub fn read_primitive<T: Primitive>(&mut self, endian: Endian) -> Result<T> {
        let source = self.source.as_ref().ok_or(Error::Closed)?;
        let available = self.position.reserve(T::SIZE)?;
        let mut buf = [0u8; 8];
        let pos = self.position.get();
        let copied = source.copy(&mut buf[..available], pos)?;
        if copied < T::SIZE && self.position.mode().is_strict() {
            return Err(Error::short_read(copied, T::SIZE, pos));
        }
        self.position.advance(copied);
        log::trace!("Read {} bytes at {}", copied, pos);
        T::decode(&buf[..T::SIZE], 0, endian)
    }

    /// Read a signed byte
    pub fn read_i8(&mut self) -> Result<i8> {
        self.read_primitive(Endian::Big)
    }

    /// Read an unsigned byte
    pub fn read_u8(&mut self) -> Result<u8> {
        self.read_primitive(Endian::Big)
    }

    typed_reads! {
        i16: read_i16, read_i16_le, read_i16_be;
        u16: read_u16, read_u16_le, read_u16_be;
        i32: read_i32, read_i32_le, read_i32_be;
        u32: read_u32, read_u32_le, read_u32_be;
        i64: read_i64, read_i64_le, read_i64_be;
        u64: read_u64, read_u64_le, read_u64_be;
        f32: read_f32, read_f32_le, read_f32_be;
        f64: read_f64, read_f64_le, read_f64_be;
    }
}

impl io::Read for BinaryCursor {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.read_to_buffer(buf)?)
    }
}

impl io::Seek for BinaryCursor {
    fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
        self.ensure_open()?;
        let target = match pos {
            io::SeekFrom::Start(offset) => offset as i128,
            io::SeekFrom::End(delta) => self.size() as i128 + delta as i128,
            io::SeekFrom::Current(delta) => self.tell() as i128 + delta as i128,
        };
        Ok(self.position.set(target)?)
    }
}
