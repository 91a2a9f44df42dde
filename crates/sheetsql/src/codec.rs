//! Conversion between single cell values and single SQL values
//!
//! Encoding takes the destination column's affinity when it is known; only
//! a date/time destination changes how numbers and date-like text are
//! stored. Decoding is driven by [`ColumnKind`], which already folds the
//! declared affinity into the storage class.

use rusqlite::types::{Value, ValueRef};
use sheetsql_core::datetime::{from_julian, to_serial, to_time};
use sheetsql_core::{try_parse_datetime, Affinity, CellError, CellValue};

use crate::error::{Error, Result};
use crate::statement::{ColumnKind, StorageKind};

const BIND_TYPE_MESSAGE: &str = "value to bind must be number, string, or null";

/// Encode a cell for binding into a column of the given affinity.
///
/// `None` means the destination is unknown (a query parameter); values are
/// then stored as they are, and date-like text stays text.
pub fn encode(value: &CellValue, affinity: Option<Affinity>) -> Result<Value> {
    let datetime = affinity.map_or(false, |a| a.is_datetime());

    match value {
        CellValue::Empty => Ok(Value::Null),
        CellValue::String(s) => {
            if datetime {
                if let Some(v) = encode_datetime_text(s.as_str()) {
                    return Ok(v);
                }
            }
            Ok(encode_text(s.as_str()))
        }
        CellValue::Number(n) if datetime => Ok(Value::Integer(to_time(*n))),
        CellValue::Number(n) => Ok(Value::Real(*n)),
        CellValue::Boolean(b) => Ok(Value::Integer(i64::from(*b))),
        CellValue::Error(_) | CellValue::Array(_) => Err(Error::InvalidValue(BIND_TYPE_MESSAGE)),
    }
}

/// Text stored verbatim; a zero-length string is NULL
pub fn encode_text(text: &str) -> Value {
    if text.is_empty() {
        Value::Null
    } else {
        Value::Text(text.to_owned())
    }
}

/// Date-like text as unix seconds, or `None` when it does not parse
pub fn encode_datetime_text(text: &str) -> Option<Value> {
    try_parse_datetime(text).map(|t| Value::Integer(t.unix_seconds()))
}

/// Decode one result value into a cell.
///
/// Failures to interpret a stored date/time and unsupported blobs come
/// back as `#VALUE!` cells rather than errors, so one bad value does not
/// abort the rest of the result.
pub fn decode(kind: ColumnKind, value: ValueRef<'_>) -> CellValue {
    match (kind, value) {
        (ColumnKind::Null, _) => CellValue::Empty,
        (ColumnKind::Integer, ValueRef::Integer(i)) => CellValue::Number(i as f64),
        (ColumnKind::Float, ValueRef::Real(f)) => CellValue::Number(f),
        (ColumnKind::Text, ValueRef::Text(bytes)) => match std::str::from_utf8(bytes) {
            Ok(text) => CellValue::string(text),
            Err(e) => {
                log::error!("cannot decode text: {e}");
                CellValue::Error(CellError::Value)
            }
        },
        (ColumnKind::Boolean, ValueRef::Integer(i)) => CellValue::Boolean(i != 0),
        (ColumnKind::Datetime(StorageKind::Text), ValueRef::Text(bytes)) => {
            match std::str::from_utf8(bytes) {
                Ok(text) => decode_datetime_text(text),
                Err(e) => {
                    log::error!("cannot decode date/time text: {e}");
                    CellValue::Error(CellError::Value)
                }
            }
        }
        (ColumnKind::Datetime(StorageKind::Integer), ValueRef::Integer(seconds)) => {
            // The unix epoch itself is never a meaningful date here
            if seconds == 0 {
                CellValue::Empty
            } else {
                CellValue::Number(to_serial(seconds))
            }
        }
        (ColumnKind::Datetime(StorageKind::Float), ValueRef::Real(julian)) => {
            CellValue::Number(from_julian(julian))
        }
        (ColumnKind::Blob, _) => CellValue::Error(CellError::Value),
        (kind, value) => {
            log::error!(
                "cannot decode {:?} storage as {:?}",
                StorageKind::of(value),
                kind
            );
            CellValue::Error(CellError::Value)
        }
    }
}

fn decode_datetime_text(text: &str) -> CellValue {
    if text.is_empty() {
        return CellValue::Empty;
    }
    match try_parse_datetime(text) {
        Some(t) => CellValue::Number(t.to_serial()),
        None => CellValue::Error(CellError::Value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetsql_core::{CalendarTime, Grid};

    fn decode_value(kind: ColumnKind, value: &Value) -> CellValue {
        decode(kind, ValueRef::from(value))
    }

    #[test]
    fn test_encode_scalars() {
        assert_eq!(encode(&CellValue::Empty, None).unwrap(), Value::Null);
        assert_eq!(encode(&CellValue::from(""), None).unwrap(), Value::Null);
        assert_eq!(encode(&CellValue::from(2.5), None).unwrap(), Value::Real(2.5));
        assert_eq!(
            encode(&CellValue::from("Alice"), Some(Affinity::Text)).unwrap(),
            Value::Text("Alice".into())
        );
        assert_eq!(encode(&CellValue::from(true), None).unwrap(), Value::Integer(1));
        assert_eq!(encode(&CellValue::from(false), None).unwrap(), Value::Integer(0));
    }

    #[test]
    fn test_encode_dates_only_for_date_columns() {
        let dob = CellValue::from("1990-05-02");
        let seconds = CalendarTime::new(1990, 5, 2, 0, 0, 0).unwrap().unix_seconds();

        assert_eq!(
            encode(&dob, Some(Affinity::Datetime)).unwrap(),
            Value::Integer(seconds)
        );
        assert_eq!(encode(&dob, None).unwrap(), Value::Text("1990-05-02".into()));
        assert_eq!(
            encode(&dob, Some(Affinity::Text)).unwrap(),
            Value::Text("1990-05-02".into())
        );

        assert_eq!(
            encode(&CellValue::from(32995.0), Some(Affinity::Datetime)).unwrap(),
            Value::Integer(seconds)
        );
        assert_eq!(
            encode(&CellValue::from(32995.0), Some(Affinity::Float)).unwrap(),
            Value::Real(32995.0)
        );
    }

    #[test]
    fn test_encode_unparsable_text_in_date_column() {
        assert_eq!(
            encode(&CellValue::from("someday"), Some(Affinity::Datetime)).unwrap(),
            Value::Text("someday".into())
        );
    }

    #[test]
    fn test_encode_rejects_errors_and_arrays() {
        let err = encode(&CellValue::Error(CellError::Na), None).unwrap_err();
        assert_eq!(err.to_string(), BIND_TYPE_MESSAGE);

        let grid = Grid::from_row(vec![CellValue::from(1)]).unwrap();
        assert!(matches!(
            encode(&CellValue::Array(grid), None),
            Err(Error::InvalidValue(_))
        ));
    }

    #[test]
    fn test_decode_storage_kinds() {
        assert_eq!(decode(ColumnKind::Null, ValueRef::Null), CellValue::Empty);
        assert_eq!(
            decode(ColumnKind::Integer, ValueRef::Integer(7)),
            CellValue::Number(7.0)
        );
        assert_eq!(
            decode(ColumnKind::Float, ValueRef::Real(0.25)),
            CellValue::Number(0.25)
        );
        assert_eq!(
            decode(ColumnKind::Text, ValueRef::Text(b"a\0b")),
            CellValue::from("a\0b")
        );
        assert_eq!(
            decode(ColumnKind::Boolean, ValueRef::Integer(2)),
            CellValue::Boolean(true)
        );
        assert_eq!(
            decode(ColumnKind::Blob, ValueRef::Blob(b"\x01\x02")),
            CellValue::Error(CellError::Value)
        );
    }

    #[test]
    fn test_decode_invalid_utf8_is_error() {
        assert_eq!(
            decode(ColumnKind::Text, ValueRef::Text(b"a\xffb")),
            CellValue::Error(CellError::Value)
        );
        assert_eq!(
            decode(ColumnKind::Datetime(StorageKind::Text), ValueRef::Text(b"\xff")),
            CellValue::Error(CellError::Value)
        );
    }

    #[test]
    fn test_decode_datetime_text() {
        let kind = ColumnKind::Datetime(StorageKind::Text);
        assert_eq!(decode(kind, ValueRef::Text(b"")), CellValue::Empty);
        assert_eq!(
            decode(kind, ValueRef::Text(b"1990-05-02")),
            CellValue::Number(32995.0)
        );
        assert_eq!(
            decode(kind, ValueRef::Text(b"not a date")),
            CellValue::Error(CellError::Value)
        );
    }

    #[test]
    fn test_decode_datetime_integer_zero_is_empty() {
        let kind = ColumnKind::Datetime(StorageKind::Integer);
        assert_eq!(decode(kind, ValueRef::Integer(0)), CellValue::Empty);
        assert_eq!(
            decode(kind, ValueRef::Integer(86400)),
            CellValue::Number(25570.0)
        );
    }

    #[test]
    fn test_decode_datetime_julian() {
        let kind = ColumnKind::Datetime(StorageKind::Float);
        assert_eq!(
            decode(kind, ValueRef::Real(2440588.5)),
            CellValue::Number(1.0)
        );
    }

    #[test]
    fn test_decode_datetime_blob_is_error() {
        let kind = ColumnKind::Datetime(StorageKind::Blob);
        assert_eq!(
            decode(kind, ValueRef::Blob(b"x")),
            CellValue::Error(CellError::Value)
        );
    }

    #[test]
    fn test_value_round_trip() {
        let cases = [
            (CellValue::from(3.5), ColumnKind::Float),
            (CellValue::from("hello"), ColumnKind::Text),
            (CellValue::from("1990-05-02"), ColumnKind::Text),
            (CellValue::Boolean(true), ColumnKind::Boolean),
            (CellValue::Empty, ColumnKind::Null),
        ];
        for (cell, kind) in cases {
            let stored = encode(&cell, Some(Affinity::Text)).unwrap();
            assert_eq!(decode_value(kind, &stored), cell);
        }
    }
}
