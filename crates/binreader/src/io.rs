//! Byte sources that cursors read from
//!
//! A [`ByteSource`] answers one question: copy up to `dest.len()` bytes
//! starting at an absolute offset, and report how many were copied. The copy
//! is clipped at the end of the source, so a short count means end of data.

#[cfg(feature = "async")]
pub mod async_source;
#[cfg(feature = "async")]
pub(crate) mod queue;

use crate::Result;
use bytes::Bytes;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

/// Copy from an in-memory region, clipped to both source and destination
pub(crate) fn copy_from_slice(src: &[u8], dest: &mut [u8], pos: u64) -> usize {
    let Ok(start) = usize::try_from(pos) else {
        return 0;
    };
    if start >= src.len() || dest.is_empty() {
        return 0;
    }
    let n = dest.len().min(src.len() - start);
    dest[..n].copy_from_slice(&src[start..start + n]);
    n
}

/// An open file together with the size it had when it was opened
#[derive(Debug)]
pub struct FileHandle {
    file: File,
    size: u64,
    path: PathBuf,
}

impl FileHandle {
    /// Open `path` for reading and snapshot its size
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let size = file.metadata()?.len();
        log::debug!("Opened {} ({} bytes)", path.display(), size);
        Ok(Self::new(file, size, path))
    }

    /// Adopt an already opened file.
    ///
    /// `size` is trusted as the logical size of the source; reads past the
    /// real end of the file simply come back short.
    pub fn new<P: Into<PathBuf>>(file: File, size: u64, path: P) -> Self {
        Self {
            file,
            size,
            path: path.into(),
        }
    }

    /// Logical size recorded for this handle
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Path the handle was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Borrow the underlying file
    pub fn file(&self) -> &File {
        &self.file
    }

    /// Give up the wrapper and return the file
    pub fn into_file(self) -> File {
        self.file
    }

    /// Positioned read that does not depend on the file's own cursor.
    ///
    /// Retries on `Interrupted` and keeps reading until `dest` is full or the
    /// file reports end of data.
    pub fn read_at(&self, dest: &mut [u8], pos: u64) -> Result<usize> {
        let mut total = 0;
        while total < dest.len() {
            match read_at_once(&self.file, &mut dest[total..], pos + total as u64) {
                Ok(0) => break,
                Ok(n) => total += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(total)
    }
}

#[cfg(unix)]
fn read_at_once(file: &File, buf: &mut [u8], pos: u64) -> io::Result<usize> {
    use std::os::unix::fs::FileExt;
    file.read_at(buf, pos)
}

#[cfg(windows)]
fn read_at_once(file: &File, buf: &mut [u8], pos: u64) -> io::Result<usize> {
    use std::os::windows::fs::FileExt;
    file.seek_read(buf, pos)
}

#[cfg(not(any(unix, windows)))]
fn read_at_once(file: &File, buf: &mut [u8], pos: u64) -> io::Result<usize> {
    use std::io::{Read, Seek, SeekFrom};
    let mut file = file;
    file.seek(SeekFrom::Start(pos))?;
    file.read(buf)
}

/// Storage behind a blocking cursor
#[derive(Debug)]
pub enum ByteSource {
    /// Contiguous bytes in memory
    Buffer(Bytes),
    /// A file read with positioned reads
    File(FileHandle),
}

impl ByteSource {
    /// Logical size of the source in bytes
    pub fn size(&self) -> u64 {
        match self {
            Self::Buffer(bytes) => bytes.len() as u64,
            Self::File(handle) => handle.size(),
        }
    }

    /// Copy bytes starting at `pos` into `dest`, returning the count copied
    pub fn copy(&self, dest: &mut [u8], pos: u64) -> Result<usize> {
        match self {
            Self::Buffer(bytes) => Ok(copy_from_slice(bytes, dest, pos)),
            Self::File(handle) => handle.read_at(dest, pos),
        }
    }

    /// Path of the file behind this source, empty for buffers
    pub fn path(&self) -> &Path {
        match self {
            Self::Buffer(_) => Path::new(""),
            Self::File(handle) => handle.path(),
        }
    }
}
