use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StudentStatus {
    #[default]
    Active,
    Inactive,
}

impl StudentStatus {
    /// Stored and exported form.
    pub fn as_str(&self) -> &'static str {
        match self {
            StudentStatus::Active => "ACTIVE",
            StudentStatus::Inactive => "INACTIVE",
        }
    }
}

impl fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StudentStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(StudentStatus::Active),
            "INACTIVE" => Ok(StudentStatus::Inactive),
            other => Err(format!("Unknown status '{}'", other)),
        }
    }
}

/// One roster entry, keyed by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub full_name: String,
    pub programme: String,
    pub level: u16,
    pub gpa: f64,
    pub email: String,
    pub phone: String,
    pub date_added: NaiveDate,
    pub status: StudentStatus,
}

impl Student {
    /// An active record dated today.
    pub fn new(
        id: impl Into<String>,
        full_name: impl Into<String>,
        programme: impl Into<String>,
        level: u16,
        gpa: f64,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            full_name: full_name.into(),
            programme: programme.into(),
            level,
            gpa,
            email: email.into(),
            phone: phone.into(),
            date_added: today(),
            status: StudentStatus::Active,
        }
    }

    pub fn with_status(mut self, status: StudentStatus) -> Self {
        self.status = status;
        self
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// A failure attached to the import row it came from. `row` is `None` when
/// the source could not be read at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowError {
    pub row: Option<usize>,
    pub message: String,
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.row {
            Some(row) => write!(f, "Row {}: {}", row, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Outcome of one bulk import. Built fresh per call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportResult {
    pub success_count: usize,
    pub error_count: usize,
    pub errors: Vec<RowError>,
}

impl ImportResult {
    pub fn record_success(&mut self) {
        self.success_count += 1;
    }

    pub fn record_error(&mut self, row: Option<usize>, message: impl Into<String>) {
        self.errors.push(RowError {
            row,
            message: message.into(),
        });
        self.error_count += 1;
    }

    /// Human-readable, row-tagged messages in the order they occurred.
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}
