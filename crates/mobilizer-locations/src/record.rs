//! Raw delimitation records and their parsing.
//!
//! Reference data arrives either as SQL-style positional tuples, one per line:
//!
//! ```text
//! (1, 25, 3, 7, 'Kofar Yamma Pri. Sch.'),
//! ```
//!
//! or as a CSV file with the columns in [`RECORD_FIELDS`]. Both readers
//! produce [`RawRecord`]s; turning one into a [`DelimitationRecord`] is where
//! a row is either accepted or skipped with a [`SkipReason`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{LocationError, Result};

/// Positional field names, in dataset order.
pub const RECORD_FIELDS: [&str; 5] = [
    "country_code",
    "state_code",
    "lga_code",
    "ward_code",
    "delimitation",
];

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// One record as handed over by the ingestion side, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// 1-based line number in the source.
    pub line_number: usize,
    /// Positional field values.
    pub fields: Vec<String>,
    /// Set when the line itself could not be split into fields.
    pub syntax_error: Option<String>,
}

impl RawRecord {
    pub fn new(line_number: usize, fields: Vec<String>) -> Self {
        Self {
            line_number,
            fields,
            syntax_error: None,
        }
    }

    pub fn malformed(line_number: usize, detail: impl Into<String>) -> Self {
        Self {
            line_number,
            fields: Vec::new(),
            syntax_error: Some(detail.into()),
        }
    }
}

/// Why a raw record was not counted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("missing field '{0}'")]
    MissingField(&'static str),

    #[error("field '{field}' is not numeric: '{value}'")]
    NonNumericCode { field: &'static str, value: String },

    #[error("delimitation is empty")]
    EmptyDelimitation,

    #[error("expected 5 fields, found {0}")]
    TooManyFields(usize),

    #[error("malformed record: {0}")]
    Malformed(String),
}

/// A parsed polling-unit delimitation row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DelimitationRecord {
    pub country_code: u32,
    pub state_code: u32,
    pub lga_code: u32,
    pub ward_code: u32,
    pub delimitation: String,
}

impl DelimitationRecord {
    /// Parse a raw record, or explain why it must be skipped.
    pub fn parse(raw: &RawRecord) -> std::result::Result<Self, SkipReason> {
        if let Some(detail) = &raw.syntax_error {
            return Err(SkipReason::Malformed(detail.clone()));
        }
        if raw.fields.len() > RECORD_FIELDS.len() {
            return Err(SkipReason::TooManyFields(raw.fields.len()));
        }

        let mut codes = [0u32; 4];
        for (slot, field) in codes.iter_mut().zip(RECORD_FIELDS) {
            *slot = parse_code(raw, field)?;
        }

        let delimitation = match field_value(raw, "delimitation") {
            None => return Err(SkipReason::MissingField("delimitation")),
            Some(value) if value.trim().is_empty() => return Err(SkipReason::EmptyDelimitation),
            Some(value) => value.trim().to_string(),
        };

        let [country_code, state_code, lga_code, ward_code] = codes;
        Ok(Self {
            country_code,
            state_code,
            lga_code,
            ward_code,
            delimitation,
        })
    }
}

fn field_value<'a>(raw: &'a RawRecord, name: &str) -> Option<&'a str> {
    let idx = RECORD_FIELDS.iter().position(|f| *f == name)?;
    raw.fields.get(idx).map(String::as_str)
}

fn parse_code(raw: &RawRecord, field: &'static str) -> std::result::Result<u32, SkipReason> {
    match field_value(raw, field).map(str::trim) {
        None | Some("") => Err(SkipReason::MissingField(field)),
        Some(value) => value.parse::<u32>().map_err(|_| SkipReason::NonNumericCode {
            field,
            value: value.to_string(),
        }),
    }
}

// ============================================================================
// Tuple reader
// ============================================================================

/// Split one `( ... )` tuple line into a raw record.
///
/// Returns `None` for lines that carry no record (blank lines, `--` comments).
pub fn parse_tuple_line(line_number: usize, line: &str) -> Option<RawRecord> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with("--") {
        return None;
    }

    let body = trimmed.trim_end_matches([',', ';']).trim_end();
    let Some(inner) = body
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
    else {
        return Some(RawRecord::malformed(
            line_number,
            "expected a parenthesized tuple",
        ));
    };

    Some(match split_tuple(inner) {
        Ok(fields) => RawRecord::new(line_number, fields),
        Err(detail) => RawRecord::malformed(line_number, detail),
    })
}

/// Read every tuple line of a dump.
pub fn read_tuple_lines(text: &str) -> Vec<RawRecord> {
    text.lines()
        .enumerate()
        .filter_map(|(idx, line)| parse_tuple_line(idx + 1, line))
        .collect()
}

/// Read a tuple dump straight from bytes.
///
/// Lines are decoded one at a time, so a line that is not valid UTF-8 becomes
/// a malformed record and the rest of the dump is still read.
pub fn read_tuple_bytes(data: &[u8]) -> Vec<RawRecord> {
    let data = strip_utf8_bom(data);
    if data.is_empty() {
        return Vec::new();
    }
    let data = data.strip_suffix(b"\n").unwrap_or(data);

    data.split(|b| *b == b'\n')
        .enumerate()
        .filter_map(|(idx, line)| {
            let line_number = idx + 1;
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            match std::str::from_utf8(line) {
                Ok(text) => parse_tuple_line(line_number, text),
                Err(_) => Some(RawRecord::malformed(line_number, "invalid UTF-8")),
            }
        })
        .collect()
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum TupleState {
    Unquoted,
    Quoted,
    AfterQuote,
}

fn split_tuple(inner: &str) -> std::result::Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut state = TupleState::Unquoted;
    let mut chars = inner.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            TupleState::Quoted => {
                if c == '\'' {
                    if chars.peek() == Some(&'\'') {
                        current.push('\'');
                        chars.next();
                    } else {
                        state = TupleState::AfterQuote;
                    }
                } else {
                    current.push(c);
                }
            }
            TupleState::AfterQuote => match c {
                ',' => {
                    fields.push(std::mem::take(&mut current));
                    state = TupleState::Unquoted;
                }
                c if c.is_whitespace() => {}
                c => return Err(format!("unexpected '{c}' after quoted value")),
            },
            TupleState::Unquoted => match c {
                '\'' if current.trim().is_empty() => {
                    current.clear();
                    state = TupleState::Quoted;
                }
                '\'' => return Err("quote inside unquoted value".to_string()),
                ',' => {
                    fields.push(unquoted_value(&current));
                    current.clear();
                }
                c => current.push(c),
            },
        }
    }

    match state {
        TupleState::Quoted => Err("unterminated quoted value".to_string()),
        TupleState::AfterQuote => {
            fields.push(current);
            Ok(fields)
        }
        TupleState::Unquoted => {
            fields.push(unquoted_value(&current));
            Ok(fields)
        }
    }
}

fn unquoted_value(raw: &str) -> String {
    let value = raw.trim();
    if value.eq_ignore_ascii_case("null") {
        String::new()
    } else {
        value.to_string()
    }
}

// ============================================================================
// CSV reader
// ============================================================================

fn strip_utf8_bom(data: &[u8]) -> &[u8] {
    data.strip_prefix(UTF8_BOM).unwrap_or(data)
}

/// Read a CSV export whose header names the columns in [`RECORD_FIELDS`].
///
/// Header matching is case-insensitive and column order is free. Rows the
/// CSV reader rejects become malformed raw records instead of failing the
/// batch. Cells past the last header column are kept as extra fields, so such
/// a row is skipped the same way an over-long tuple is. Line numbers are the
/// physical line a row starts on.
pub fn read_csv_records(data: &[u8]) -> Result<Vec<RawRecord>> {
    let data = strip_utf8_bom(data);
    if data.is_empty() {
        return Err(LocationError::Empty);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    let headers: HashMap<String, usize> = reader
        .headers()
        .map_err(|e| LocationError::InvalidCsv(format!("Failed to read CSV headers: {e}")))?
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.to_ascii_lowercase(), idx))
        .collect();

    let missing: Vec<&str> = RECORD_FIELDS
        .iter()
        .copied()
        .filter(|f| !headers.contains_key(*f))
        .collect();
    if !missing.is_empty() {
        return Err(LocationError::MissingHeaders(missing.join(", ")));
    }
    let columns: Vec<usize> = RECORD_FIELDS.iter().map(|f| headers[*f]).collect();
    let width = headers.len();

    let mut records = Vec::new();
    // header is line 1
    let mut last_line = 1;
    for row in reader.records() {
        match row {
            Ok(row) => {
                let line_number = row
                    .position()
                    .map_or(last_line + 1, |p| p.line() as usize);
                last_line = line_number;

                let mut fields: Vec<String> = columns
                    .iter()
                    .map(|col| row.get(*col).unwrap_or_default().to_string())
                    .collect();
                fields.extend(row.iter().skip(width).map(str::to_string));
                records.push(RawRecord::new(line_number, fields));
            }
            Err(e) => {
                let line_number = e.position().map_or(last_line + 1, |p| p.line() as usize);
                last_line = line_number;
                records.push(RawRecord::malformed(line_number, e.to_string()));
            }
        }
    }
    Ok(records)
}
