//! Flat tabular format for bulk import and export.
//!
//! One header line, then one comma-separated line per student. A field is
//! quoted only when it holds a comma or a quote; embedded quotes are doubled.
//! Records never span lines when read back.

use crate::domain::model::{RowError, Student, StudentStatus};
use crate::utils::error::{RosterError, Result};
use chrono::NaiveDate;
use csv::{QuoteStyle, ReaderBuilder, StringRecord, Terminator, Trim, WriterBuilder};
use thiserror::Error;

pub const HEADER: [&str; 9] = [
    "StudentID",
    "FullName",
    "Programme",
    "Level",
    "GPA",
    "Email",
    "PhoneNumber",
    "DateAdded",
    "Status",
];

pub const ERROR_REPORT_HEADER: &str = "Row,Error";

/// Status is the only optional column.
pub const MIN_COLUMNS: usize = 8;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowParseError {
    #[error("Not enough columns (expected at least 8, found {found})")]
    MissingColumns { found: usize },
    #[error("Invalid level '{0}'")]
    InvalidLevel(String),
    #[error("Invalid GPA '{0}'")]
    InvalidGpa(String),
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("Invalid status '{0}', expected ACTIVE or INACTIVE")]
    InvalidStatus(String),
    #[error("Row is not valid UTF-8")]
    InvalidEncoding,
    #[error("Malformed row: {0}")]
    Malformed(String),
}

pub type RowResult<T> = std::result::Result<T, RowParseError>;

fn into_bytes(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| RosterError::IoError(e.into_error()))
}

pub fn encode_students(students: &[Student]) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(HEADER)?;
    for s in students {
        let level = s.level.to_string();
        let gpa = format!("{:.2}", s.gpa);
        let date = s.date_added.format(DATE_FORMAT).to_string();
        writer.write_record([
            s.id.as_str(),
            s.full_name.as_str(),
            s.programme.as_str(),
            level.as_str(),
            gpa.as_str(),
            s.email.as_str(),
            s.phone.as_str(),
            date.as_str(),
            s.status.as_str(),
        ])?;
    }

    into_bytes(writer)
}

/// Splits `data` into trimmed rows, one per non-blank line after the header.
///
/// Each line is parsed on its own, so an unbalanced quote or bytes that are
/// not UTF-8 only spoil their own row. Short rows are returned as-is for
/// [`parse_student`] to judge.
pub fn decode_rows(data: &[u8]) -> Vec<RowResult<Vec<String>>> {
    data.split(|&b| b == b'\n')
        .skip(1)
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .filter(|line| !line.iter().all(u8::is_ascii_whitespace))
        .map(split_line)
        .collect()
}

fn split_line(line: &[u8]) -> RowResult<Vec<String>> {
    let text = std::str::from_utf8(line).map_err(|_| RowParseError::InvalidEncoding)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut record = StringRecord::new();
    reader
        .read_record(&mut record)
        .map_err(|e| RowParseError::Malformed(e.to_string()))?;
    Ok(record.iter().map(str::to_string).collect())
}

/// Builds a candidate record from one decoded row. A blank date column
/// becomes `today`; a missing or blank status column becomes Active.
pub fn parse_student(fields: &[String], today: NaiveDate) -> RowResult<Student> {
    if fields.len() < MIN_COLUMNS {
        return Err(RowParseError::MissingColumns {
            found: fields.len(),
        });
    }

    let level = fields[3]
        .parse::<u16>()
        .map_err(|_| RowParseError::InvalidLevel(fields[3].clone()))?;
    let gpa = fields[4]
        .parse::<f64>()
        .map_err(|_| RowParseError::InvalidGpa(fields[4].clone()))?;
    let date_added = if fields[7].is_empty() {
        today
    } else {
        NaiveDate::parse_from_str(&fields[7], DATE_FORMAT)
            .map_err(|_| RowParseError::InvalidDate(fields[7].clone()))?
    };
    let status = match fields.get(8).map(String::as_str) {
        None | Some("") => StudentStatus::Active,
        Some(raw) => raw
            .parse()
            .map_err(|_| RowParseError::InvalidStatus(raw.to_string()))?,
    };

    Ok(Student {
        id: fields[0].clone(),
        full_name: fields[1].clone(),
        programme: fields[2].clone(),
        level,
        gpa,
        email: fields[5].clone(),
        phone: fields[6].clone(),
        date_added,
        status,
    })
}

/// `Row,Error` report; the message column is always quoted.
pub fn encode_error_report(errors: &[RowError]) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    buffer.extend_from_slice(ERROR_REPORT_HEADER.as_bytes());
    buffer.push(b'\n');

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::NonNumeric)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(buffer);
    for error in errors {
        let row = error.row.map(|r| r.to_string()).unwrap_or_default();
        writer.write_record([row.as_str(), error.message.as_str()])?;
    }

    into_bytes(writer)
}
