//! Fixed-width primitive decoding
//!
//! Every function here is a pure decode of a byte window at an offset. The
//! window must hold at least `offset + N` bytes for an `N`-byte primitive,
//! otherwise [`Error::Bounds`] is returned naming the offset and width.
//!
//! Signed values are the two's-complement interpretation of the bytes and
//! floats are rebuilt from their IEEE-754 bit pattern, so NaN payloads,
//! infinities and subnormals come back unchanged regardless of host order.

use crate::{Endian, Error, Result};
use byteorder::{BigEndian, ByteOrder, LittleEndian};

/// Borrow `required` bytes of `buf` starting at `offset`
fn window(buf: &[u8], offset: usize, required: usize) -> Result<&[u8]> {
    match offset.checked_add(required) {
        Some(end) if end <= buf.len() => Ok(&buf[offset..end]),
        _ => Err(Error::Bounds {
            offset,
            required,
            available: buf.len(),
        }),
    }
}

/// Decode an unsigned byte
pub fn read_u8(buf: &[u8], offset: usize) -> Result<u8> {
    Ok(window(buf, offset, 1)?[0])
}

/// Decode a signed byte
pub fn read_i8(buf: &[u8], offset: usize) -> Result<i8> {
    Ok(read_u8(buf, offset)? as i8)
}

macro_rules! endian_decoder {
    ($(#[$doc:meta])* $name:ident, $ty:ty, $width:expr) => {
        $(#[$doc])*
        pub fn $name(buf: &[u8], offset: usize, endian: Endian) -> Result<$ty> {
            let bytes = window(buf, offset, $width)?;
            Ok(match endian {
                Endian::Big => BigEndian::$name(bytes),
                Endian::Little => LittleEndian::$name(bytes),
            })
        }
    };
}

endian_decoder!(
    /// Decode an unsigned 16-bit integer
    read_u16, u16, 2
);
endian_decoder!(
    /// Decode a signed 16-bit integer
    read_i16, i16, 2
);
endian_decoder!(
    /// Decode an unsigned 32-bit integer
    read_u32, u32, 4
);
endian_decoder!(
    /// Decode a signed 32-bit integer
    read_i32, i32, 4
);
endian_decoder!(
    /// Decode an unsigned 64-bit integer
    read_u64, u64, 8
);
endian_decoder!(
    /// Decode a signed 64-bit integer
    read_i64, i64, 8
);
endian_decoder!(
    /// Decode an IEEE-754 single precision float
    read_f32, f32, 4
);
endian_decoder!(
    /// Decode an IEEE-754 double precision float
    read_f64, f64, 8
);

/// A fixed-width value that cursors can decode
pub trait Primitive: Sized + Copy + Send + 'static {
    /// Width in bytes
    const SIZE: usize;

    /// Decode from `buf` at `offset`; single-byte types ignore `endian`
    fn decode(buf: &[u8], offset: usize, endian: Endian) -> Result<Self>;
}

impl Primitive for u8 {
    const SIZE: usize = 1;

    fn decode(buf: &[u8], offset: usize, _endian: Endian) -> Result<Self> {
        read_u8(buf, offset)
    }
}

impl Primitive for i8 {
    const SIZE: usize = 1;

    fn decode(buf: &[u8], offset: usize, _endian: Endian) -> Result<Self> {
        read_i8(buf, offset)
    }
}

macro_rules! impl_primitive {
    ($($ty:ty => $decoder:ident),* $(,)?) => {
        $(
            impl Primitive for $ty {
                const SIZE: usize = std::mem::size_of::<$ty>();

                fn decode(buf: &[u8], offset: usize, endian: Endian) -> Result<Self> {
                    $decoder(buf, offset, endian)
                }
            }
        )*
    };
}

impl_primitive! {
    u16 => read_u16,
    i16 => read_i16,
    u32 => read_u32,
    i32 => read_i32,
    u64 => read_u64,
    i64 => read_i64,
    f32 => read_f32,
    f64 => read_f64,
}
