//! # binreader - Binary Cursor Library
//!
//! Sequential readers for binary data held in memory or on disk. A cursor
//! tracks a position, decodes fixed-width integers and floats in either byte
//! order, and reads strings and raw byte ranges.
//!
//! ## Features
//!
//! - Blocking [`BinaryCursor`] over buffers, paths and pre-opened handles
//! - [`AsyncBinaryCursor`] whose operations run in the order they were
//!   issued, over tokio files, buffers and [`Blob`] sources (`async` feature)
//! - Per-cursor default byte order plus explicit `_le`/`_be` variants
//! - Lenient or strict range checking
//!
//! ## Examples
//!
//! ```no_run
//! use binreader::{BinaryCursor, CursorOptions, Encoding, Endian};
//!
//! # fn main() -> Result<(), binreader::Error> {
//! let mut cursor = CursorOptions::new()
//!     .endian(Endian::Little)
//!     .strict()
//!     .open("model.bin")?;
//!
//! let magic = cursor.read_string(Encoding::Ascii, Some(4))?;
//! let version = cursor.read_u32()?;
//! let name = cursor.read_cstring(Encoding::Utf8)?;
//! println!("{magic} v{version}: {name}");
//! # Ok(())
//! # }
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

#[cfg(feature = "async")]
#[cfg_attr(docsrs, doc(cfg(feature = "async")))]
pub mod async_cursor;
pub mod codec;
pub mod cursor;
pub mod endian;
pub mod error;
pub mod io;
pub mod options;
pub mod position;
pub mod text;

pub use codec::Primitive;
pub use cursor::BinaryCursor;
pub use endian::Endian;
pub use error::{Error, Result};
pub use io::{ByteSource, FileHandle};
pub use options::CursorOptions;
pub use position::RangeChecking;
pub use text::Encoding;

#[cfg(feature = "async")]
pub use async_cursor::AsyncBinaryCursor;
#[cfg(feature = "async")]
pub use io::async_source::{AsyncByteSource, Blob, BoxFuture};
