//! Flat string encoding primitives
//!
//! Shared constants and helpers for the delimited string formats used to
//! persist food values, sizes and nutrients. Decoding failures here are
//! treated as data corruption and always surface as a [`CodecError`].

use thiserror::Error;

/// Sentinel written in place of an absent raw value.
///
/// Never a valid raw value for any unit or nutrient enum (they all start at 1).
pub const NIL_INT: i64 = -1;

/// Field delimiter for food value and food nutrient strings
pub const FOOD_VALUE_DELIMITER: char = '_';

/// Field delimiter for food size strings
pub const FOOD_SIZE_DELIMITER: char = '¦';

/// Characters a size name may never contain
pub const RESERVED_NAME_CHARACTERS: [char; 2] = [FOOD_VALUE_DELIMITER, FOOD_SIZE_DELIMITER];

/// Decoding errors for the flat string formats
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    #[error("{kind} string has {found} fields, expected {expected}: {input:?}")]
    FieldCount {
        kind: &'static str,
        expected: usize,
        found: usize,
        input: String,
    },

    #[error("invalid number for {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("unknown {field} raw value: {value}")]
    UnknownRawValue { field: &'static str, value: i64 },

    #[error("missing required {field}")]
    MissingField { field: &'static str },
}

/// Result type for decoding operations
pub type CodecResult<T> = Result<T, CodecError>;

/// An enum persisted by its integer raw value
pub trait RawValue: Sized + Copy {
    /// Field name used in error messages
    const FIELD: &'static str;

    fn raw_value(self) -> i64;

    fn from_raw_value(raw: i64) -> Option<Self>;

    /// Decode a required raw value, failing on unknown values
    fn decode_raw(raw: i64) -> CodecResult<Self> {
        Self::from_raw_value(raw).ok_or(CodecError::UnknownRawValue {
            field: Self::FIELD,
            value: raw,
        })
    }
}

/// Format a float so that parsing it back yields the identical bits
pub fn format_f64(value: f64) -> String {
    format!("{:?}", value)
}

/// Split `input` into exactly `expected` fields.
///
/// At most `expected` pieces are produced, so the last field may itself
/// contain the delimiter.
pub fn split_fields<'a>(
    kind: &'static str,
    input: &'a str,
    delimiter: char,
    expected: usize,
) -> CodecResult<Vec<&'a str>> {
    let fields: Vec<&str> = input.splitn(expected, delimiter).collect();
    if fields.len() != expected {
        return Err(CodecError::FieldCount {
            kind,
            expected,
            found: fields.len(),
            input: input.to_string(),
        });
    }
    Ok(fields)
}

/// Split `input` on every delimiter, requiring exactly `expected` fields
pub fn split_exact<'a>(
    kind: &'static str,
    input: &'a str,
    delimiter: char,
    expected: usize,
) -> CodecResult<Vec<&'a str>> {
    let fields: Vec<&str> = input.split(delimiter).collect();
    if fields.len() != expected {
        return Err(CodecError::FieldCount {
            kind,
            expected,
            found: fields.len(),
            input: input.to_string(),
        });
    }
    Ok(fields)
}

pub fn parse_f64(field: &'static str, s: &str) -> CodecResult<f64> {
    s.parse::<f64>().map_err(|_| CodecError::InvalidNumber {
        field,
        value: s.to_string(),
    })
}

pub fn parse_int(field: &'static str, s: &str) -> CodecResult<i64> {
    s.parse::<i64>().map_err(|_| CodecError::InvalidNumber {
        field,
        value: s.to_string(),
    })
}

/// Parse a raw value field where [`NIL_INT`] means absent
pub fn parse_optional<T: RawValue>(s: &str) -> CodecResult<Option<T>> {
    let raw = parse_int(T::FIELD, s)?;
    if raw == NIL_INT {
        return Ok(None);
    }
    T::decode_raw(raw).map(Some)
}

/// Encode an optional raw value, writing [`NIL_INT`] when absent
pub fn encode_optional<T: RawValue>(value: Option<T>) -> String {
    value.map(RawValue::raw_value).unwrap_or(NIL_INT).to_string()
}
