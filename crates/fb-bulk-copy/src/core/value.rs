//! Cell values read from a source cursor.
//!
//! [`SqlValue`] is what a [`RowSource`](super::RowSource) hands over for each
//! cell. It carries enough type information for the serializer to pick a
//! literal form, and borrows text and bytes where the driver allows it.

use std::borrow::Cow;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use uuid::Uuid;

/// One row from a source cursor, positionally aligned with
/// [`RowSource::columns`](super::RowSource::columns).
pub type SourceRow = Vec<SqlValue<'static>>;

/// SQL value enum for type-safe row handling.
///
/// Uses `Cow` for string and byte data so drivers can hand out borrowed
/// buffers.
///
/// # Example
///
/// ```rust
/// use fb_bulk_copy::SqlValue;
///
/// let blob = SqlValue::bytes_owned(vec![0x50, 0x4B]);
/// assert_eq!(blob.to_text().as_deref(), Some("504B"));
/// assert!(SqlValue::text_borrowed("").is_null_or_empty());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue<'a> {
    /// SQL NULL.
    Null,

    /// Boolean value.
    Bool(bool),

    /// 16-bit signed integer (smallint).
    I16(i16),

    /// 32-bit signed integer (integer).
    I32(i32),

    /// 64-bit signed integer (bigint).
    I64(i64),

    /// 32-bit floating point (float).
    F32(f32),

    /// 64-bit floating point (double precision).
    F64(f64),

    /// Exact numeric (numeric/decimal).
    Decimal(Decimal),

    /// Text/string data.
    Text(Cow<'a, str>),

    /// Binary data.
    Bytes(Cow<'a, [u8]>),

    /// UUID/GUID value.
    Uuid(Uuid),

    /// Date without time component.
    Date(NaiveDate),

    /// Time without date component.
    Time(NaiveTime),

    /// Timestamp without timezone.
    DateTime(NaiveDateTime),

    /// Timestamp with timezone offset.
    DateTimeOffset(DateTime<FixedOffset>),
}

impl<'a> SqlValue<'a> {
    /// NULL, empty text and empty byte sequences all load as SQL NULL.
    #[must_use]
    pub fn is_null_or_empty(&self) -> bool {
        match self {
            SqlValue::Null => true,
            SqlValue::Text(s) => s.is_empty(),
            SqlValue::Bytes(b) => b.is_empty(),
            _ => false,
        }
    }

    /// Textual form of the value, `None` for NULL.
    ///
    /// Bytes render as uppercase hex without separators.
    #[must_use]
    pub fn to_text(&self) -> Option<Cow<'_, str>> {
        let text = match self {
            SqlValue::Null => return None,
            SqlValue::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
            SqlValue::I16(n) => Cow::Owned(n.to_string()),
            SqlValue::I32(n) => Cow::Owned(n.to_string()),
            SqlValue::I64(n) => Cow::Owned(n.to_string()),
            SqlValue::F32(n) => Cow::Owned(n.to_string()),
            SqlValue::F64(n) => Cow::Owned(n.to_string()),
            SqlValue::Decimal(d) => Cow::Owned(d.to_string()),
            SqlValue::Text(s) => Cow::Borrowed(s.as_ref()),
            SqlValue::Bytes(b) => Cow::Owned(hex::encode_upper(b)),
            SqlValue::Uuid(u) => Cow::Owned(u.to_string()),
            SqlValue::Date(d) => Cow::Owned(d.format("%Y-%m-%d").to_string()),
            SqlValue::Time(t) => Cow::Owned(t.format("%H:%M:%S%.f").to_string()),
            SqlValue::DateTime(dt) => Cow::Owned(dt.format("%Y-%m-%d %H:%M:%S%.f").to_string()),
            SqlValue::DateTimeOffset(dt) => Cow::Owned(dt.to_rfc3339()),
        };
        Some(text)
    }

    /// Short type label used in diagnostics.
    #[must_use]
    pub fn type_label(&self) -> &'static str {
        match self {
            SqlValue::Null => "null",
            SqlValue::Bool(_) => "bool",
            SqlValue::I16(_) => "i16",
            SqlValue::I32(_) => "i32",
            SqlValue::I64(_) => "i64",
            SqlValue::F32(_) => "f32",
            SqlValue::F64(_) => "f64",
            SqlValue::Decimal(_) => "decimal",
            SqlValue::Text(_) => "text",
            SqlValue::Bytes(_) => "bytes",
            SqlValue::Uuid(_) => "uuid",
            SqlValue::Date(_) => "date",
            SqlValue::Time(_) => "time",
            SqlValue::DateTime(_) => "timestamp",
            SqlValue::DateTimeOffset(_) => "timestamptz",
        }
    }
}

// Convenience constructors for common cases
impl<'a> SqlValue<'a> {
    /// Create a text value from a borrowed string slice.
    #[must_use]
    pub fn text_borrowed(s: &'a str) -> Self {
        SqlValue::Text(Cow::Borrowed(s))
    }

    /// Create a text value from an owned String.
    #[must_use]
    pub fn text_owned(s: String) -> SqlValue<'static> {
        SqlValue::Text(Cow::Owned(s))
    }

    /// Create a bytes value from an owned Vec<u8>.
    #[must_use]
    pub fn bytes_owned(b: Vec<u8>) -> SqlValue<'static> {
        SqlValue::Bytes(Cow::Owned(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_or_empty() {
        assert!(SqlValue::Null.is_null_or_empty());
        assert!(SqlValue::text_borrowed("").is_null_or_empty());
        assert!(SqlValue::bytes_owned(Vec::new()).is_null_or_empty());
        assert!(!SqlValue::I32(0).is_null_or_empty());
        assert!(!SqlValue::text_borrowed(" ").is_null_or_empty());
    }

    #[test]
    fn test_to_text_bytes_are_upper_hex() {
        let v = SqlValue::bytes_owned(vec![0x50, 0x4b, 0x03, 0x04, 0xff]);
        assert_eq!(v.to_text().as_deref(), Some("504B0304FF"));
    }

    #[test]
    fn test_to_text_temporal() {
        let dt = NaiveDate::from_ymd_opt(2018, 8, 12)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        assert_eq!(
            SqlValue::DateTime(dt).to_text().as_deref(),
            Some("2018-08-12 09:30:00")
        );
        assert_eq!(
            SqlValue::Date(dt.date()).to_text().as_deref(),
            Some("2018-08-12")
        );
        assert!(SqlValue::Null.to_text().is_none());
    }
}
