//! Root CLI structure for binreader

use crate::field::Field;
use binreader::{Encoding, Endian};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "binreader")]
#[command(about = "Decode typed fields from binary files", long_about = None)]
#[command(version)]
#[command(author)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Read a sequence of fields and print one line per field
    Read(ReadArgs),

    /// Show the size of a file and a hex preview of its first bytes
    Info {
        /// File to inspect
        file: PathBuf,

        /// Number of bytes to preview
        #[arg(short = 'n', long, default_value_t = 64)]
        length: usize,
    },
}

#[derive(Args)]
pub struct ReadArgs {
    /// File to read from
    pub file: PathBuf,

    /// Fields to read, in order.
    ///
    /// Primitives: u8 i8 u16 i16 u32 i32 u64 i64 f32 f64 bool, optionally
    /// suffixed with `le` or `be` (e.g. `u32le`). Strings and ranges:
    /// `cstr`, `str:N`, `bytes:N`. Moves: `skip:N` (N may be negative).
    #[arg(required = true, value_name = "FIELD")]
    pub fields: Vec<Field>,

    /// Byte offset to start reading at
    #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
    pub offset: i64,

    /// Default byte order for unsuffixed fields (big, little, native)
    #[arg(short, long, default_value = "big")]
    pub endian: Endian,

    /// Shorthand for `--endian little`
    #[arg(short = 'l', long, conflicts_with = "endian")]
    pub little_endian: bool,

    /// Text encoding for string fields (ascii, utf8)
    #[arg(long, default_value = "ascii")]
    pub encoding: Encoding,

    /// Fail on out-of-range positions instead of clamping
    #[arg(long)]
    pub strict: bool,

    /// Issue every field through the async cursor before awaiting any
    #[arg(long = "async")]
    pub use_async: bool,
}

impl ReadArgs {
    /// Byte order selected by `--endian` or `--little-endian`
    pub fn byte_order(&self) -> Endian {
        if self.little_endian {
            Endian::Little
        } else {
            self.endian
        }
    }
}
