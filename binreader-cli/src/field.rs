//! Field specifications accepted by `binreader read`

use binreader::Endian;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Reasons a field specification is rejected
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("unknown field type '{0}'")]
    UnknownType(String),

    #[error("'{0}' needs a length, e.g. {0}:16")]
    MissingLength(String),

    #[error("invalid length '{1}' for '{0}'")]
    InvalidLength(String, String),

    #[error("'{0}' does not take a byte order suffix")]
    UnexpectedSuffix(String),
}

/// Fixed-width primitive types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scalar {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    F32,
    F64,
    Bool,
}

impl Scalar {
    const ALL: [(&'static str, Self); 11] = [
        ("u8", Self::U8),
        ("i8", Self::I8),
        ("u16", Self::U16),
        ("i16", Self::I16),
        ("u32", Self::U32),
        ("i32", Self::I32),
        ("u64", Self::U64),
        ("i64", Self::I64),
        ("f32", Self::F32),
        ("f64", Self::F64),
        ("bool", Self::Bool),
    ];

    /// Single-byte types have no byte order
    fn is_byte(self) -> bool {
        matches!(self, Self::U8 | Self::I8 | Self::Bool)
    }
}

/// One unit of work for `binreader read`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    /// A primitive, with an explicit byte order if one was given
    Scalar(Scalar, Option<Endian>),
    /// Zero-terminated string
    CString,
    /// Fixed-length string
    String(usize),
    /// Raw bytes
    Bytes(usize),
    /// Relative move
    Skip(i64),
}

fn parse_length<T: FromStr>(name: &str, arg: Option<&str>) -> Result<T, FieldError> {
    let arg = arg.ok_or_else(|| FieldError::MissingLength(name.to_string()))?;
    arg.parse()
        .map_err(|_| FieldError::InvalidLength(name.to_string(), arg.to_string()))
}

fn parse_scalar(spec: &str) -> Result<Field, FieldError> {
    let (base, endian) = if let Some(base) = spec.strip_suffix("le") {
        (base, Some(Endian::Little))
    } else if let Some(base) = spec.strip_suffix("be") {
        (base, Some(Endian::Big))
    } else {
        (spec, None)
    };
    let scalar = Scalar::ALL
        .iter()
        .find(|(name, _)| *name == base)
        .map(|(_, scalar)| *scalar)
        .ok_or_else(|| FieldError::UnknownType(spec.to_string()))?;
    if endian.is_some() && scalar.is_byte() {
        return Err(FieldError::UnexpectedSuffix(base.to_string()));
    }
    Ok(Field::Scalar(scalar, endian))
}

impl FromStr for Field {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let spec = s.trim().to_ascii_lowercase();
        let (name, arg) = match spec.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (spec.as_str(), None),
        };
        match name {
            "cstr" => Ok(Self::CString),
            "str" => Ok(Self::String(parse_length(name, arg)?)),
            "bytes" => Ok(Self::Bytes(parse_length(name, arg)?)),
            "skip" => Ok(Self::Skip(parse_length(name, arg)?)),
            _ if arg.is_none() => parse_scalar(name),
            _ => Err(FieldError::UnknownType(spec.clone())),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(scalar, endian) => {
                let (name, _) = Scalar::ALL
                    .iter()
                    .find(|(_, s)| s == scalar)
                    .ok_or(fmt::Error)?;
                match endian {
                    Some(Endian::Little) => write!(f, "{name}le"),
                    Some(Endian::Big) => write!(f, "{name}be"),
                    None => f.write_str(name),
                }
            }
            Self::CString => f.write_str("cstr"),
            Self::String(len) => write!(f, "str:{len}"),
            Self::Bytes(len) => write!(f, "bytes:{len}"),
            Self::Skip(delta) => write!(f, "skip:{delta}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scalars() {
        assert_eq!("u32".parse::<Field>(), Ok(Field::Scalar(Scalar::U32, None)));
        assert_eq!(
            "U16LE".parse::<Field>(),
            Ok(Field::Scalar(Scalar::U16, Some(Endian::Little)))
        );
        assert_eq!(
            "f64be".parse::<Field>(),
            Ok(Field::Scalar(Scalar::F64, Some(Endian::Big)))
        );
        assert_eq!("bool".parse::<Field>(), Ok(Field::Scalar(Scalar::Bool, None)));
    }

    #[test]
    fn test_parse_sized() {
        assert_eq!("cstr".parse::<Field>(), Ok(Field::CString));
        assert_eq!("str:12".parse::<Field>(), Ok(Field::String(12)));
        assert_eq!("bytes:4".parse::<Field>(), Ok(Field::Bytes(4)));
        assert_eq!("skip:-8".parse::<Field>(), Ok(Field::Skip(-8)));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "u24".parse::<Field>(),
            Err(FieldError::UnknownType("u24".to_string()))
        );
        assert_eq!(
            "str".parse::<Field>(),
            Err(FieldError::MissingLength("str".to_string()))
        );
        assert_eq!(
            "bytes:x".parse::<Field>(),
            Err(FieldError::InvalidLength("bytes".to_string(), "x".to_string()))
        );
        assert_eq!(
            "u8le".parse::<Field>(),
            Err(FieldError::UnexpectedSuffix("u8".to_string()))
        );
        assert!("u32:4".parse::<Field>().is_err());
    }

    #[test]
    fn test_display_matches_input() {
        for spec in ["u8", "i16le", "u64be", "cstr", "str:3", "bytes:9", "skip:-2"] {
            assert_eq!(spec.parse::<Field>().unwrap().to_string(), spec);
        }
    }
}
