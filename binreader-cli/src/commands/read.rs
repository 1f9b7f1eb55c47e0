//! Implementation of `binreader read`

use crate::cli::ReadArgs;
use crate::field::{Field, Scalar};
use crate::utils::format_hex;
use anyhow::{Context, Result};
use binreader::{
    AsyncBinaryCursor, BinaryCursor, BoxFuture, CursorOptions, Encoding, Endian, RangeChecking,
};
use std::fmt;

/// A decoded field value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Bytes(Vec<u8>),
    Position(u64),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsigned(v) => write!(f, "{v}"),
            Self::Signed(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Bytes(b) => write!(f, "[{}]", format_hex(b)),
            Self::Position(p) => write!(f, "-> {p}"),
        }
    }
}

fn options(args: &ReadArgs) -> CursorOptions {
    let range_checking = if args.strict {
        RangeChecking::Strict
    } else {
        RangeChecking::Lenient
    };
    CursorOptions::new()
        .endian(args.byte_order())
        .range_checking(range_checking)
}

pub async fn execute(args: ReadArgs) -> Result<()> {
    let rows = if args.use_async {
        read_async(&args).await?
    } else {
        read_sync(&args)?
    };
    for (offset, field, value) in rows {
        println!("{offset} {field} {value}");
    }
    Ok(())
}

fn read_sync(args: &ReadArgs) -> Result<Vec<(u64, Field, Value)>> {
    let mut cursor = options(args)
        .open(&args.file)
        .with_context(|| format!("Failed to open {}", args.file.display()))?;
    cursor
        .seek(args.offset)
        .with_context(|| format!("Failed to seek to {}", args.offset))?;
    log::debug!(
        "Reading {} fields from {} at {}",
        args.fields.len(),
        args.file.display(),
        cursor.tell()
    );

    let mut rows = Vec::with_capacity(args.fields.len());
    for field in &args.fields {
        let offset = cursor.tell();
        let value = read_field(&mut cursor, field, args.encoding)
            .with_context(|| format!("Failed to read {field} at offset {offset}"))?;
        rows.push((offset, field.clone(), value));
    }
    cursor.close();
    Ok(rows)
}

fn read_field(cursor: &mut BinaryCursor, field: &Field, encoding: Encoding) -> binreader::Result<Value> {
    Ok(match *field {
        Field::Scalar(scalar, endian) => {
            let endian = endian.unwrap_or(cursor.endian());
            match scalar {
                Scalar::U8 => Value::Unsigned(cursor.read_u8()?.into()),
                Scalar::I8 => Value::Signed(cursor.read_i8()?.into()),
                Scalar::Bool => Value::Bool(cursor.read_bool()?),
                Scalar::U16 => Value::Unsigned(cursor.read_primitive::<u16>(endian)?.into()),
                Scalar::I16 => Value::Signed(cursor.read_primitive::<i16>(endian)?.into()),
                Scalar::U32 => Value::Unsigned(cursor.read_primitive::<u32>(endian)?.into()),
                Scalar::I32 => Value::Signed(cursor.read_primitive::<i32>(endian)?.into()),
                Scalar::U64 => Value::Unsigned(cursor.read_primitive::<u64>(endian)?),
                Scalar::I64 => Value::Signed(cursor.read_primitive::<i64>(endian)?),
                Scalar::F32 => Value::Float(cursor.read_primitive::<f32>(endian)?.into()),
                Scalar::F64 => Value::Float(cursor.read_primitive::<f64>(endian)?),
            }
        }
        Field::CString => Value::Text(cursor.read_cstring(encoding)?),
        Field::String(len) => Value::Text(cursor.read_string(encoding, Some(len))?),
        Field::Bytes(len) => Value::Bytes(cursor.read(len)?),
        Field::Skip(delta) => Value::Position(cursor.skip(delta)?),
    })
}

async fn read_async(args: &ReadArgs) -> Result<Vec<(u64, Field, Value)>> {
    let cursor = AsyncBinaryCursor::open_with_options(&args.file, options(args))
        .await
        .with_context(|| format!("Failed to open {}", args.file.display()))?;
    let start = cursor.seek(args.offset);

    // Every operation is queued here, before anything is awaited. Each
    // field is preceded by a zero skip that reports where it starts.
    let pending: Vec<_> = args
        .fields
        .iter()
        .map(|field| {
            let offset = tokio::spawn(cursor.skip(0));
            let value = tokio::spawn(submit(&cursor, field, args.encoding));
            (offset, field.clone(), value)
        })
        .collect();

    start
        .await
        .with_context(|| format!("Failed to seek to {}", args.offset))?;

    let mut rows = Vec::with_capacity(pending.len());
    for (offset, field, value) in pending {
        let offset = offset.await??;
        let value = value
            .await?
            .with_context(|| format!("Failed to read {field} at offset {offset}"))?;
        rows.push((offset, field, value));
    }
    cursor.close();
    Ok(rows)
}

fn submit(
    cursor: &AsyncBinaryCursor,
    field: &Field,
    encoding: Encoding,
) -> BoxFuture<'static, binreader::Result<Value>> {
    match *field {
        Field::Scalar(scalar, endian) => {
            let endian = endian.unwrap_or(cursor.endian());
            submit_scalar(cursor, scalar, endian)
        }
        Field::CString => {
            let read = cursor.read_cstring(encoding);
            Box::pin(async move { Ok::<_, binreader::Error>(Value::Text(read.await?)) })
        }
        Field::String(len) => {
            let read = cursor.read_string(encoding, Some(len));
            Box::pin(async move { Ok::<_, binreader::Error>(Value::Text(read.await?)) })
        }
        Field::Bytes(len) => {
            let read = cursor.read(len);
            Box::pin(async move { Ok::<_, binreader::Error>(Value::Bytes(read.await?)) })
        }
        Field::Skip(delta) => {
            let skip = cursor.skip(delta);
            Box::pin(async move { Ok::<_, binreader::Error>(Value::Position(skip.await?)) })
        }
    }
}

fn submit_scalar(
    cursor: &AsyncBinaryCursor,
    scalar: Scalar,
    endian: Endian,
) -> BoxFuture<'static, binreader::Result<Value>> {
    macro_rules! queued {
        ($read:expr, $wrap:expr) => {{
            let read = $read;
            Box::pin(async move { Ok::<_, binreader::Error>($wrap(read.await?)) })
        }};
    }

    match scalar {
        Scalar::U8 => queued!(cursor.read_u8(), |v: u8| Value::Unsigned(v.into())),
        Scalar::I8 => queued!(cursor.read_i8(), |v: i8| Value::Signed(v.into())),
        Scalar::Bool => queued!(cursor.read_bool(), Value::Bool),
        Scalar::U16 => queued!(cursor.read_primitive::<u16>(endian), |v: u16| Value::Unsigned(
            v.into()
        )),
        Scalar::I16 => queued!(cursor.read_primitive::<i16>(endian), |v: i16| Value::Signed(
            v.into()
        )),
        Scalar::U32 => queued!(cursor.read_primitive::<u32>(endian), |v: u32| Value::Unsigned(
            v.into()
        )),
        Scalar::I32 => queued!(cursor.read_primitive::<i32>(endian), |v: i32| Value::Signed(
            v.into()
        )),
        Scalar::U64 => queued!(cursor.read_primitive::<u64>(endian), Value::Unsigned),
        Scalar::I64 => queued!(cursor.read_primitive::<i64>(endian), Value::Signed),
        Scalar::F32 => queued!(cursor.read_primitive::<f32>(endian), |v: f32| Value::Float(
            v.into()
        )),
        Scalar::F64 => queued!(cursor.read_primitive::<f64>(endian), Value::Float),
    }
}
