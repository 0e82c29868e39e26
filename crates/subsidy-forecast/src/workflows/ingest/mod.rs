mod approvals;
mod attendance;
mod normalizer;

pub use normalizer::child_key;

use crate::workflows::forecast::domain::{ApprovalRecord, AttendanceRecord};
use approvals::ApprovalRow;
use attendance::AttendanceRow;
use serde::{Deserialize, Deserializer};
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use thiserror::Error;
use tracing::warn;

/// A CSV row that could not be turned into a typed record.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("line {line}{}: {kind}", child_suffix(.child))]
pub struct ParseError {
    pub line: u64,
    pub child: Option<String>,
    #[source]
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(line: u64, child: Option<String>, kind: ParseErrorKind) -> Self {
        Self { line, child, kind }
    }
}

fn child_suffix(child: &Option<String>) -> String {
    child
        .as_deref()
        .map(|child| format!(" (child {child})"))
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseErrorKind {
    #[error("row has neither a child name nor a child ID")]
    MissingChildIdentity,
    #[error("missing required column value `{field}`")]
    MissingField { field: &'static str },
    #[error("`{field}` is not a valid date: {value:?}")]
    InvalidDate { field: &'static str, value: String },
    #[error("`{field}` is not a valid time: {value:?}")]
    InvalidTime { field: &'static str, value: String },
    #[error("`{field}` is not a valid number: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
    #[error("`{field}` is not a yes/no value: {value:?}")]
    InvalidFlag { field: &'static str, value: String },
    #[error("`{field}` must not be negative: {value:?}")]
    NegativeAmount { field: &'static str, value: String },
    #[error("check-out is earlier than check-in")]
    NegativeDuration,
    #[error("row carries neither hours in care nor check-in/check-out times")]
    MissingDuration,
}

#[derive(Debug)]
pub enum ImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Parse(ParseError),
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Io(err) => write!(f, "failed to read export: {}", err),
            ImportError::Csv(err) => write!(f, "invalid CSV data: {}", err),
            ImportError::Parse(err) => write!(f, "malformed row at {}", err),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Io(err) => Some(err),
            ImportError::Csv(err) => Some(err),
            ImportError::Parse(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<ParseError> for ImportError {
    fn from(err: ParseError) -> Self {
        Self::Parse(err)
    }
}

/// Reads the daily check-in export.
pub struct AttendanceImporter;

impl AttendanceImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<AttendanceRecord>, ImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<AttendanceRecord>, ImportError> {
        read_rows(reader, 0, AttendanceRow::into_record)
    }
}

/// Reads the state payment export. `skip_rows` drops banner lines above the header.
pub struct ApprovalImporter;

impl ApprovalImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        skip_rows: usize,
    ) -> Result<Vec<ApprovalRecord>, ImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, skip_rows)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        skip_rows: usize,
    ) -> Result<Vec<ApprovalRecord>, ImportError> {
        let mut buffered = BufReader::new(reader);
        let mut discarded = String::new();
        for _ in 0..skip_rows {
            discarded.clear();
            if buffered.read_line(&mut discarded)? == 0 {
                break;
            }
        }

        read_rows(buffered, skip_rows as u64, ApprovalRow::into_record)
    }
}

fn read_rows<R, Row, Record>(
    reader: R,
    line_offset: u64,
    convert: fn(Row, u64) -> Result<Record, ParseError>,
) -> Result<Vec<Record>, ImportError>
where
    R: Read,
    Row: for<'de> Deserialize<'de>,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut records = Vec::new();

    for result in csv_reader.records() {
        let raw = result?;
        if raw.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        let line = raw.position().map_or(0, |position| position.line()) + line_offset;
        let row: Row = raw.deserialize(Some(&headers))?;
        records.push(convert(row, line)?);
    }

    Ok(records)
}

/// Resolves a row's child key, warning when the explicit ID column disagrees
/// with the names it is overridden by.
pub(crate) fn identify_child(
    line: u64,
    first_name: Option<&str>,
    last_name: Option<&str>,
    explicit_id: Option<&str>,
) -> Result<String, ParseError> {
    let child_id = normalizer::resolve_child_id(first_name, last_name, explicit_id)
        .ok_or_else(|| ParseError::new(line, None, ParseErrorKind::MissingChildIdentity))?;
    if let Some(explicit) = normalizer::conflicting_explicit_id(first_name, last_name, explicit_id)
    {
        warn!(
            line,
            child_id = %child_id,
            explicit_id = %explicit,
            "child ID column disagrees with the child's name; using the name"
        );
    }
    Ok(child_id)
}

pub(crate) fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

pub(crate) fn parse_number(field: &'static str, value: &str) -> Result<f64, ParseErrorKind> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
        .ok_or_else(|| ParseErrorKind::InvalidNumber {
            field,
            value: value.to_string(),
        })
}
