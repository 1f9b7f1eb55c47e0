//! Byte sources for the async cursor
//!
//! Besides buffers and tokio files, an async cursor can read from a
//! [`Blob`]: any object that knows its size and can hand back a byte range
//! asynchronously, in the manner of a browser `File`.

use super::{FileHandle, copy_from_slice};
use crate::Result;
use bytes::Bytes;
use std::fmt;
use std::future::Future;
use std::io::{self, SeekFrom};
use std::path::{Path, PathBuf};
use std::pin::Pin;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio::sync::Mutex;

/// Boxed future returned by [`Blob::read_slice`]
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A sized, sliceable object whose bytes are fetched asynchronously
pub trait Blob: Send + Sync + fmt::Debug {
    /// Total size in bytes
    fn size(&self) -> u64;

    /// Display name, used as the cursor's path
    fn name(&self) -> &str {
        ""
    }

    /// Fetch the bytes in `start..end`.
    ///
    /// May return fewer bytes than requested when `end` lies past the end
    /// of the blob.
    fn read_slice(&self, start: u64, end: u64) -> BoxFuture<'_, io::Result<Vec<u8>>>;
}

impl Blob for Bytes {
    fn size(&self) -> u64 {
        self.len() as u64
    }

    fn read_slice(&self, start: u64, end: u64) -> BoxFuture<'_, io::Result<Vec<u8>>> {
        let len = self.len() as u64;
        let start = start.min(len) as usize;
        let end = end.clamp(start as u64, len) as usize;
        let slice = self.slice(start..end);
        Box::pin(async move { Ok(slice.to_vec()) })
    }
}

/// Storage behind an async cursor
#[derive(Debug)]
pub enum AsyncByteSource {
    /// Contiguous bytes in memory
    Buffer(Bytes),
    /// A tokio file with its size snapshotted at open time
    File {
        /// Open file; only one operation touches it at a time
        file: Mutex<tokio::fs::File>,
        /// Logical size
        size: u64,
        /// Path the file was opened from
        path: PathBuf,
    },
    /// A user supplied blob
    Blob(Box<dyn Blob>),
}

impl AsyncByteSource {
    /// Open `path` for reading and snapshot its size
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = tokio::fs::File::open(path).await?;
        let size = file.metadata().await?.len();
        log::debug!("Opened {} ({} bytes) for async reads", path.display(), size);
        Ok(Self::File {
            file: Mutex::new(file),
            size,
            path: path.to_path_buf(),
        })
    }

    /// Adopt a pre-opened blocking file handle
    pub fn from_handle(handle: FileHandle) -> Self {
        let size = handle.size();
        let path = handle.path().to_path_buf();
        Self::File {
            file: Mutex::new(tokio::fs::File::from_std(handle.into_file())),
            size,
            path,
        }
    }

    /// Logical size of the source in bytes
    pub fn size(&self) -> u64 {
        match self {
            Self::Buffer(bytes) => bytes.len() as u64,
            Self::File { size, .. } => *size,
            Self::Blob(blob) => blob.size(),
        }
    }

    /// Path or blob name, empty for buffers
    pub fn path(&self) -> &Path {
        match self {
            Self::Buffer(_) => Path::new(""),
            Self::File { path, .. } => path.as_path(),
            Self::Blob(blob) => Path::new(blob.name()),
        }
    }

    /// Copy bytes starting at `pos` into `dest`, returning the count copied
    pub async fn copy(&self, dest: &mut [u8], pos: u64) -> Result<usize> {
        if dest.is_empty() {
            return Ok(0);
        }
        match self {
            Self::Buffer(bytes) => Ok(copy_from_slice(bytes, dest, pos)),
            Self::File { file, .. } => {
                let mut file = file.lock().await;
                file.seek(SeekFrom::Start(pos)).await?;
                let mut total = 0;
                while total < dest.len() {
                    match file.read(&mut dest[total..]).await {
                        Ok(0) => break,
                        Ok(n) => total += n,
                        Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                        Err(e) => return Err(e.into()),
                    }
                }
                Ok(total)
            }
            Self::Blob(blob) => {
                let end = pos.saturating_add(dest.len() as u64);
                let bytes = blob.read_slice(pos, end).await?;
                Ok(copy_from_slice(&bytes, dest, 0))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[derive(Debug)]
    struct FailingBlob;

    impl Blob for FailingBlob {
        fn size(&self) -> u64 {
            16
        }

        fn read_slice(&self, _start: u64, _end: u64) -> BoxFuture<'_, io::Result<Vec<u8>>> {
            Box::pin(async { Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied")) })
        }
    }

    #[tokio::test]
    async fn test_buffer_copy() {
        let source = AsyncByteSource::Buffer(Bytes::from_static(b"0123456789"));
        let mut dest = [0u8; 4];
        assert_eq!(source.copy(&mut dest, 8).await.unwrap(), 2);
        assert_eq!(&dest[..2], b"89");
    }

    #[tokio::test]
    async fn test_file_copy_matches_buffer() {
        let data: Vec<u8> = (0..200).map(|i| (i * 7 % 256) as u8).collect();
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(&data).unwrap();
        tmp.flush().unwrap();

        let file = AsyncByteSource::open(tmp.path()).await.unwrap();
        assert_eq!(file.size(), 200);
        assert_eq!(file.path(), tmp.path());

        let handle = FileHandle::open(tmp.path()).unwrap();
        let adopted = AsyncByteSource::from_handle(handle);
        let buffer = AsyncByteSource::Buffer(Bytes::from(data));

        for (pos, len) in [(0u64, 10usize), (150, 60), (199, 1), (200, 5)] {
            let mut a = vec![0u8; len];
            let mut b = vec![0u8; len];
            let mut c = vec![0u8; len];
            let na = file.copy(&mut a, pos).await.unwrap();
            let nb = adopted.copy(&mut b, pos).await.unwrap();
            let nc = buffer.copy(&mut c, pos).await.unwrap();
            assert_eq!(na, nc);
            assert_eq!(nb, nc);
            assert_eq!(a, c);
            assert_eq!(b, c);
        }
    }

    #[tokio::test]
    async fn test_blob_copy() {
        let source = AsyncByteSource::Blob(Box::new(Bytes::from_static(b"blob data")));
        assert_eq!(source.size(), 9);

        let mut dest = [0u8; 16];
        assert_eq!(source.copy(&mut dest, 5).await.unwrap(), 4);
        assert_eq!(&dest[..4], b"data");
        assert_eq!(source.copy(&mut dest, 9).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_blob_error_propagates() {
        let source = AsyncByteSource::Blob(Box::new(FailingBlob));
        let mut dest = [0u8; 4];
        let err = source.copy(&mut dest, 0).await.unwrap_err();
        match err {
            crate::Error::Io(e) => assert_eq!(e.kind(), io::ErrorKind::PermissionDenied),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
