//! Async binary cursor with submission-ordered operations
//!
//! Every read (and every seek) takes its place in the cursor's operation
//! queue at the moment the method is called, not when the returned future is
//! first polled. The queued operation starts only after the one submitted
//! before it has finished and moved the position, so several reads issued
//! without awaiting in between see the same byte ranges as the same reads
//! awaited one by one.
//!
//! ```no_run
//! use binreader::AsyncBinaryCursor;
//!
//! # async fn demo() -> Result<(), binreader::Error> {
//! let cursor = AsyncBinaryCursor::open("data.bin").await?;
//! let header = cursor.read(4);
//! let count = cursor.read_u32_le();
//! let (header, count) = tokio::join!(header, count);
//! assert_eq!(header?.len(), 4);
//! println!("{} entries", count?);
//! # Ok(())
//! # }
//! ```
//!
//! Like any future, an operation only makes progress while it is polled.
//! Awaiting a later operation while an earlier one is held unpolled waits
//! forever; drive them together (`join!`, `tokio::spawn`) or await them in
//! submission order. Dropping an operation's future gives up its turn.
//!
//! [`close`](AsyncBinaryCursor::close) takes effect immediately and does not
//! wait for the queue. Operations that have not started yet fail with
//! [`Error::Closed`]. An operation already waiting on its source finishes
//! against the handle it holds, and the handle is released once it is done.

use crate::codec::Primitive;
use crate::io::FileHandle;
use crate::io::async_source::{AsyncByteSource, Blob};
use crate::io::queue::OpQueue;
use crate::position::Position;
use crate::{CursorOptions, Encoding, Endian, Error, RangeChecking, Result};
use bytes::Bytes;
use parking_lot::Mutex;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

macro_rules! typed_reads {
    ($($ty:ident: $name:ident, $le:ident, $be:ident;)*) => {
        $(
            #[doc = concat!(
                "Read a `", stringify!($ty),
                "` in the byte order the cursor has when this is called"
            )]
            pub fn $name(&self) -> impl Future<Output = Result<$ty>> + Send + use<> {
                self.read_primitive(self.endian())
            }

            #[doc = concat!("Read a little-endian `", stringify!($ty), "`")]
            pub fn $le(&self) -> impl Future<Output = Result<$ty>> + Send + use<> {
                self.read_primitive(Endian::Little)
            }

            #[doc = concat!("Read a big-endian `", stringify!($ty), "`")]
            pub fn $be(&self) -> impl Future<Output = Result<$ty>> + Send + use<> {
                self.read_primitive(Endian::Big)
            }
        )*
    };
}

#[derive(Debug)]
struct State {
    source: Option<Arc<AsyncByteSource>>,
    position: Position,
    endian: Endian,
}

impl State {
    fn source(&self) -> Result<Arc<AsyncByteSource>> {
        self.source.clone().ok_or(Error::Closed)
    }
}

#[derive(Debug)]
struct Shared {
    state: Mutex<State>,
    queue: OpQueue,
    path: PathBuf,
}

impl Shared {
    fn ensure_open(&self) -> Result<()> {
        self.state.lock().source().map(|_| ())
    }

    fn advance(&self, n: usize) {
        self.state.lock().position.advance(n);
    }

    async fn read_bytes(&self, len: usize) -> Result<Vec<u8>> {
        let (source, pos, len) = {
            let state = self.state.lock();
            let source = state.source()?;
            (source, state.position.get(), state.position.clamp(len))
        };
        if len == 0 {
            return Ok(Vec::new());
        }
        let mut buf = vec![0u8; len];
        let copied = source.copy(&mut buf, pos).await?;
        buf.truncate(copied);
        self.advance(copied);
        Ok(buf)
    }

    async fn read_into(&self, dest: &mut [u8]) -> Result<usize> {
        let (source, pos, len) = {
            let state = self.state.lock();
            let source = state.source()?;
            (source, state.position.get(), state.position.clamp(dest.len()))
        };
        if len == 0 {
            return Ok(0);
        }
        let copied = source.copy(&mut dest[..len], pos).await?;
        self.advance(copied);
        Ok(copied)
    }

    async fn read_cstring(&self, encoding: Encoding) -> Result<String> {
        let (source, start, remaining) = {
            let state = self.state.lock();
            let source = state.source()?;
            (source, state.position.get(), state.position.remaining())
        };
        let mut bytes = Vec::new();
        let mut byte = [0u8; 1];
        let mut consumed = 0u64;
        while consumed < remaining {
            if source.copy(&mut byte, start + consumed).await? == 0 {
                break;
            }
            consumed += 1;
            if byte[0] == 0 {
                break;
            }
            bytes.push(byte[0]);
        }
        self.advance(consumed as usize);
        Ok(encoding.decode(&bytes))
    }

    async fn read_primitive<T: Primitive>(&self, endian: Endian) -> Result<T> {
        let (source, pos, available, strict) = {
            let state = self.state.lock();
            let source = state.source()?;
            let available = state.position.reserve(T::SIZE)?;
            (
                source,
                state.position.get(),
                available,
                state.position.mode().is_strict(),
            )
        };
        let mut buf = [0u8; 8];
        let copied = source.copy(&mut buf[..available], pos).await?;
        if copied < T::SIZE && strict {
            return Err(Error::short_read(copied, T::SIZE, pos));
        }
        self.advance(copied);
        log::trace!("Read {} bytes at {}", copied, pos);
        T::decode(&buf[..T::SIZE], 0, endian)
    }
}

/// Async cursor over a buffer, file, or [`Blob`]
///
/// Methods take `&self` and return futures that are ordered by call order,
/// see the [module documentation](self). The returned futures do not borrow
/// the cursor (except [`read_to_buffer`](Self::read_to_buffer), which borrows
/// its destination), so they can be moved into spawned tasks.
#[derive(Debug)]
pub struct AsyncBinaryCursor {
    shared: Arc<Shared>,
}

impl AsyncBinaryCursor {
    /// Open a file with default options
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, CursorOptions::default()).await
    }

    /// Open a file with custom options
    pub async fn open_with_options<P: AsRef<Path>>(path: P, options: CursorOptions) -> Result<Self> {
        let source = AsyncByteSource::open(path).await?;
        Ok(Self::with_source(source, options))
    }

    /// Wrap an in-memory buffer with default options
    pub fn from_buffer(buffer: impl Into<Bytes>) -> Self {
        Self::from_buffer_with_options(buffer, CursorOptions::default())
    }

    /// Wrap an in-memory buffer with custom options
    pub fn from_buffer_with_options(buffer: impl Into<Bytes>, options: CursorOptions) -> Self {
        Self::with_source(AsyncByteSource::Buffer(buffer.into()), options)
    }

    /// Adopt a pre-opened file handle with default options
    pub fn from_handle(handle: FileHandle) -> Self {
        Self::from_handle_with_options(handle, CursorOptions::default())
    }

    /// Adopt a pre-opened file handle with custom options
    pub fn from_handle_with_options(handle: FileHandle, options: CursorOptions) -> Self {
        Self::with_source(AsyncByteSource::from_handle(handle), options)
    }

    /// Read from a blob with default options
    pub fn from_blob(blob: impl Blob + 'static) -> Self {
        Self::from_blob_with_options(blob, CursorOptions::default())
    }

    /// Read from a blob with custom options
    pub fn from_blob_with_options(blob: impl Blob + 'static, options: CursorOptions) -> Self {
        Self::with_source(AsyncByteSource::Blob(Box::new(blob)), options)
    }

    fn with_source(source: AsyncByteSource, options: CursorOptions) -> Self {
        let path = source.path().to_path_buf();
        let state = State {
            position: Position::new(source.size(), options.range_checking),
            source: Some(Arc::new(source)),
            endian: options.endian,
        };
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(state),
                queue: OpQueue::default(),
                path,
            }),
        }
    }

    /// Queue `op` behind every previously submitted operation
    fn schedule<T, F, Fut>(&self, op: F) -> impl Future<Output = Result<T>> + Send + use<T, F, Fut>
    where
        T: Send,
        F: FnOnce(Arc<Shared>) -> Fut + Send,
        Fut: Future<Output = Result<T>> + Send,
    {
        let mut ticket = self.shared.queue.enqueue();
        let shared = Arc::clone(&self.shared);
        async move {
            ticket.wait().await;
            let result = op(shared).await;
            drop(ticket);
            result
        }
    }

    /// Release the underlying source without waiting for queued operations.
    ///
    /// Calling this more than once is a no-op.
    pub fn close(&self) {
        let source = self.shared.state.lock().source.take();
        if source.is_some() {
            log::debug!("Closed async cursor over {}", self.shared.path.display());
        }
    }

    /// Check whether the cursor still accepts operations
    pub fn is_open(&self) -> bool {
        self.shared.state.lock().source.is_some()
    }

    /// Size of the source in bytes
    pub fn size(&self) -> u64 {
        self.shared.state.lock().position.size()
    }

    /// Position left by the most recently completed operation
    pub fn tell(&self) -> u64 {
        self.shared.state.lock().position.get()
    }

    /// Byte order used by unsuffixed reads submitted from now on
    pub fn endian(&self) -> Endian {
        self.shared.state.lock().endian
    }

    /// Change the byte order for unsuffixed reads submitted from now on
    pub fn set_endian(&self, endian: Endian) {
        self.shared.state.lock().endian = endian;
    }

    /// Current range checking policy
    pub fn range_checking(&self) -> RangeChecking {
        self.shared.state.lock().position.mode()
    }

    /// Change the range checking policy
    pub fn set_range_checking(&self, range_checking: RangeChecking) {
        self.shared.state.lock().position.set_mode(range_checking);
    }

    /// Path or blob name the cursor reads from, empty for buffers
    pub fn path(&self) -> &Path {
        &self.shared.path
    }

    /// Move to an absolute position once earlier operations are done
    pub fn seek(&self, pos: i64) -> impl Future<Output = Result<u64>> + Send + use<> {
        self.schedule(move |shared| async move {
            let mut state = shared.state.lock();
            state.source()?;
            state.position.set(pos as i128)
        })
    }

    /// Move relative to the position left by earlier operations
    pub fn skip(&self, delta: i64) -> impl Future<Output = Result<u64>> + Send + use<> {
        self.schedule(move |shared| async move {
            let mut state = shared.state.lock();
            state.source()?;
            state.position.skip(delta)
        })
    }

    /// Read up to `len` bytes; a shorter result means the source ended
    pub fn read(&self, len: usize) -> impl Future<Output = Result<Vec<u8>>> + Send + use<> {
        self.schedule(move |shared| async move { shared.read_bytes(len).await })
    }

    /// Read up to `dest.len()` bytes into caller storage, returning the count
    pub fn read_to_buffer<'a>(
        &self,
        dest: &'a mut [u8],
    ) -> impl Future<Output = Result<usize>> + Send + use<'a> {
        self.schedule(move |shared| async move { shared.read_into(dest).await })
    }

    /// Read a string.
    ///
    /// `Some(n)` reads `n` bytes (clamped to the end of the source). `None`
    /// reads up to the next zero byte, see [`read_cstring`](Self::read_cstring).
    pub fn read_string(
        &self,
        encoding: Encoding,
        length: Option<usize>,
    ) -> impl Future<Output = Result<String>> + Send + use<> {
        self.schedule(move |shared| async move {
            match length {
                Some(0) => shared.ensure_open().map(|()| String::new()),
                Some(len) => Ok(encoding.decode(&shared.read_bytes(len).await?)),
                None => shared.read_cstring(encoding).await,
            }
        })
    }

    /// Read a zero-terminated string.
    ///
    /// Bytes are fetched one at a time. The terminator is consumed but not
    /// returned; when the source ends first, everything up to the end is
    /// returned.
    pub fn read_cstring(
        &self,
        encoding: Encoding,
    ) -> impl Future<Output = Result<String>> + Send + use<> {
        self.read_string(encoding, None)
    }

    /// Read one byte and interpret any nonzero value as `true`
    pub fn read_bool(&self) -> impl Future<Output = Result<bool>> + Send + use<> {
        self.schedule(move |shared| async move {
            Ok(shared.read_primitive::<u8>(Endian::Big).await? != 0)
        })
    }

    /// Read any [`Primitive`] in the given byte order
    pub fn read_primitive<T: Primitive>(
        &self,
        endian: Endian,
    ) -> impl Future<Output = Result<T>> + Send + use<T> {
        self.schedule(move |shared| async move { shared.read_primitive::<T>(endian).await })
    }

    /// Read a signed byte
    pub fn read_i8(&self) -> impl Future<Output = Result<i8>> + Send + use<> {
        self.read_primitive(Endian::Big)
    }

    /// Read an unsigned byte
    pub fn read_u8(&self) -> impl Future<Output = Result<u8>> + Send + use<> {
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
