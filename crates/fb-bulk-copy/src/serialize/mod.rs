//! Cell value to SQL literal conversion.
//!
//! This is the only place where source data turns into statement text, so
//! every quoting and escaping rule lives here. Values that cannot be made
//! safe for their column kind are rejected instead of being passed through.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::warn;

use crate::core::schema::ColumnKind;
use crate::core::traits::Dialect;
use crate::core::value::SqlValue;
use crate::error::{BulkCopyError, Result};

/// Timestamp layouts accepted for text values of Date columns.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M",
    "%d.%m.%Y %H:%M:%S%.f",
    "%d.%m.%Y %H:%M",
];

/// Date-only layouts; these load as midnight.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];

/// Location of a cell, for diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct CellRef<'a> {
    pub table: &'a str,
    pub column: &'a str,
}

/// Renders cell values as engine literals.
pub struct ValueSerializer<'d> {
    dialect: &'d dyn Dialect,
}

impl<'d> ValueSerializer<'d> {
    pub fn new(dialect: &'d dyn Dialect) -> Self {
        Self { dialect }
    }

    /// Render one value as a standalone literal.
    pub fn serialize(&self, value: &SqlValue<'_>, kind: ColumnKind, cell: CellRef<'_>) -> Result<String> {
        let mut out = String::new();
        self.write_literal(&mut out, value, kind, cell)?;
        Ok(out)
    }

    /// Append the literal for `value` to `out`.
    ///
    /// NULL, empty text and empty bytes become the NULL token for every
    /// kind. On error nothing is appended.
    pub fn write_literal(
        &self,
        out: &mut String,
        value: &SqlValue<'_>,
        kind: ColumnKind,
        cell: CellRef<'_>,
    ) -> Result<()> {
        if value.is_null_or_empty() {
            out.push_str(self.dialect.null_literal());
            return Ok(());
        }

        match kind {
            ColumnKind::Integer | ColumnKind::Real => self.write_number(out, value, cell),
            ColumnKind::Date => self.write_timestamp(out, value, cell),
            ColumnKind::Blob => self.write_blob(out, value, cell),
            ColumnKind::Text => {
                self.write_text(out, value);
                Ok(())
            }
        }
    }

    fn write_number(&self, out: &mut String, value: &SqlValue<'_>, cell: CellRef<'_>) -> Result<()> {
        match value {
            SqlValue::Bool(b) => out.push(if *b { '1' } else { '0' }),
            SqlValue::I16(n) => out.push_str(&n.to_string()),
            SqlValue::I32(n) => out.push_str(&n.to_string()),
            SqlValue::I64(n) => out.push_str(&n.to_string()),
            SqlValue::Decimal(d) => out.push_str(&d.to_string()),
            SqlValue::F32(f) if !f.is_finite() => self.write_non_finite(out, cell),
            SqlValue::F64(f) if !f.is_finite() => self.write_non_finite(out, cell),
            SqlValue::F32(f) => out.push_str(&f.to_string()),
            SqlValue::F64(f) => out.push_str(&f.to_string()),
            SqlValue::Text(s) if is_numeric_literal(s) => out.push_str(s),
            SqlValue::Text(s) => {
                return Err(BulkCopyError::value_format(
                    cell.table,
                    cell.column,
                    s.to_string(),
                    "not a numeric literal",
                ))
            }
            other => return Err(mismatch(cell, other, "a number")),
        }
        Ok(())
    }

    fn write_non_finite(&self, out: &mut String, cell: CellRef<'_>) {
        warn!(
            "Converting NaN/Infinity to NULL for column {} in table {}",
            cell.column, cell.table
        );
        out.push_str(self.dialect.null_literal());
    }

    fn write_timestamp(&self, out: &mut String, value: &SqlValue<'_>, cell: CellRef<'_>) -> Result<()> {
        let timestamp = match value {
            SqlValue::DateTime(dt) => *dt,
            SqlValue::DateTimeOffset(dt) => dt.naive_local(),
            SqlValue::Date(d) => d.and_time(chrono::NaiveTime::MIN),
            SqlValue::Text(s) => parse_datetime(s).ok_or_else(|| {
                BulkCopyError::value_format(
                    cell.table,
                    cell.column,
                    s.to_string(),
                    "unrecognized date/time format",
                )
            })?,
            other => return Err(mismatch(cell, other, "a date or timestamp")),
        };

        let formatted = timestamp.format(self.dialect.timestamp_format()).to_string();
        self.dialect.write_string_literal(out, &formatted);
        Ok(())
    }

    fn write_blob(&self, out: &mut String, value: &SqlValue<'_>, cell: CellRef<'_>) -> Result<()> {
        match value {
            SqlValue::Bytes(b) => {
                self.dialect.write_binary_literal(out, &hex::encode_upper(b));
                Ok(())
            }
            // Text is taken to be hex already
            SqlValue::Text(s) => {
                if s.len() % 2 != 0 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
                    return Err(BulkCopyError::value_format(
                        cell.table,
                        cell.column,
                        s.to_string(),
                        "not an even-length hex string",
                    ));
                }
                self.dialect
                    .write_binary_literal(out, &s.to_ascii_uppercase());
                Ok(())
            }
            other => Err(mismatch(cell, other, "bytes or hex text")),
        }
    }

    fn write_text(&self, out: &mut String, value: &SqlValue<'_>) {
        match value.to_text() {
            Some(text) => self.dialect.write_string_literal(out, &text),
            None => out.push_str(self.dialect.null_literal()),
        }
    }
}

fn mismatch(cell: CellRef<'_>, value: &SqlValue<'_>, expected: &str) -> BulkCopyError {
    BulkCopyError::value_format(
        cell.table,
        cell.column,
        value.to_text().unwrap_or_default(),
        format!("{} value where {} was expected", value.type_label(), expected),
    )
}

/// Optional sign, digits with an optional fraction, optional exponent.
pub fn is_numeric_literal(s: &str) -> bool {
    let bytes = s.trim().as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;

    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        digits += i - frac_start;
    }

    if digits == 0 {
        return false;
    }

    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        i += 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }

    i == bytes.len()
}

/// Parse a date or timestamp in any of the common textual layouts.
pub fn parse_datetime(input: &str) -> Option<NaiveDateTime> {
    let s = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f %:z") {
        return Some(dt.naive_local());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .map(|d| d.and_time(chrono::NaiveTime::MIN))
        })
}
