//! Entry point for every roster operation.
//!
//! Each mutation goes through validation first. Bulk import never aborts on
//! a bad row: every failure is collected into the [`ImportResult`].

use crate::core::codec::{self, RowResult};
use crate::domain::model::{today, ImportResult, RowError, Student};
use crate::domain::ports::{Storage, StudentFilter, StudentRepository};
use crate::domain::validation;
use crate::utils::error::Result;
use chrono::NaiveDate;

pub const DEFAULT_ERROR_REPORT: &str = "import_errors.csv";

const SAVE_FAILED: &str = "Failed to save. Please try again.";
const UPDATE_FAILED: &str = "Failed to update. Record may not exist.";

pub struct StudentService<R: StudentRepository, S: Storage> {
    repository: R,
    storage: S,
    error_report_path: String,
}

impl<R: StudentRepository, S: Storage> StudentService<R, S> {
    pub fn new(repository: R, storage: S) -> Self {
        Self {
            repository,
            storage,
            error_report_path: DEFAULT_ERROR_REPORT.to_string(),
        }
    }

    /// Where the import error report is written, relative to the storage root.
    pub fn with_error_report_path(mut self, path: impl Into<String>) -> Self {
        self.error_report_path = path.into();
        self
    }

    pub fn error_report_path(&self) -> &str {
        &self.error_report_path
    }

    /// Returns the problems that stopped the insert; empty means saved.
    pub async fn add_student(&self, student: &Student) -> Vec<String> {
        let violations = validation::validate(student);
        if !violations.is_empty() {
            tracing::warn!("Add rejected for ID={}: {} violation(s)", student.id, violations.len());
            return validation::messages(&violations);
        }

        if self.repository.exists_by_id(&student.id).await {
            tracing::warn!("Add rejected: duplicate ID={}", student.id);
            return vec![format!("Student ID '{}' already exists.", student.id)];
        }

        let mut record = student.clone();
        record.date_added = today();
        if !self.repository.add(&record).await {
            tracing::error!("Add failed at the backend: ID={}", record.id);
            return vec![SAVE_FAILED.to_string()];
        }

        tracing::info!("Student added: ID={}", record.id);
        Vec::new()
    }

    pub async fn update_student(&self, student: &Student) -> Vec<String> {
        let violations = validation::validate(student);
        if !violations.is_empty() {
            tracing::warn!("Update rejected for ID={}: {} violation(s)", student.id, violations.len());
            return validation::messages(&violations);
        }

        if !self.repository.update(student).await {
            tracing::warn!("Update failed: ID={}", student.id);
            return vec![UPDATE_FAILED.to_string()];
        }

        tracing::info!("Student updated: ID={}", student.id);
        Vec::new()
    }

    pub async fn delete_student(&self, id: &str) -> bool {
        let deleted = self.repository.delete(id).await;
        if deleted {
            tracing::info!("Student deleted: ID={}", id);
        } else {
            tracing::error!("Delete failed: ID={}", id);
        }
        deleted
    }

    pub async fn find_by_id(&self, id: &str) -> Option<Student> {
        self.repository.find_by_id(id).await
    }

    pub async fn get_all_students(&self) -> Vec<Student> {
        self.repository.find_all().await
    }

    pub async fn search(&self, query: &str) -> Vec<Student> {
        self.repository.search(query).await
    }

    pub async fn filter(&self, criteria: &StudentFilter) -> Vec<Student> {
        self.repository.filter(criteria).await
    }

    pub async fn list_distinct_programmes(&self) -> Vec<String> {
        self.repository.list_distinct_programmes().await
    }

    /// Loads every row of `source`, keeping going past bad rows.
    ///
    /// Rows are numbered from 1, counting the data rows after the header.
    /// When any row fails, the errors are also written as a `Row,Error`
    /// report to [`Self::error_report_path`].
    pub async fn import_from_file(&self, source: &str) -> ImportResult {
        let mut result = ImportResult::default();

        let rows = match self.read_rows(source).await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!("Import of {} failed: {}", source, e);
                result.record_error(None, format!("Cannot read file: {}", e));
                return result;
            }
        };

        let today = today();
        for (index, fields) in rows.into_iter().enumerate() {
            let row = index + 1;
            match self.import_row(fields, today).await {
                Ok(()) => result.record_success(),
                Err(message) => {
                    tracing::debug!("Import row {} rejected: {}", row, message);
                    result.record_error(Some(row), message);
                }
            }
        }

        tracing::info!(
            "Import done: {} Success={} Errors={}",
            source,
            result.success_count,
            result.error_count
        );

        if result.error_count > 0 {
            self.write_error_report(&result.errors).await;
        }

        result
    }

    async fn read_rows(&self, source: &str) -> Result<Vec<RowResult<Vec<String>>>> {
        let data = self.storage.read_file(source).await?;
        Ok(codec::decode_rows(&data))
    }

    async fn import_row(
        &self,
        fields: RowResult<Vec<String>>,
        today: NaiveDate,
    ) -> std::result::Result<(), String> {
        let student = fields
            .and_then(|fields| codec::parse_student(&fields, today))
            .map_err(|e| e.to_string())?;

        let violations = validation::validate(&student);
        if !violations.is_empty() {
            return Err(validation::messages(&violations).join("; "));
        }

        if self.repository.exists_by_id(&student.id).await {
            return Err(format!("Duplicate ID '{}'", student.id));
        }

        if !self.repository.add(&student).await {
            return Err(format!("Failed to save ID '{}'", student.id));
        }

        Ok(())
    }

    async fn write_error_report(&self, errors: &[RowError]) {
        let written = match codec::encode_error_report(errors) {
            Ok(bytes) => self.storage.write_file(&self.error_report_path, &bytes).await,
            Err(e) => Err(e),
        };
        match written {
            Ok(()) => tracing::info!("Import error report written to {}", self.error_report_path),
            Err(e) => tracing::error!("Cannot write error report: {}", e),
        }
    }

    /// Writes every stored record to `destination`; returns the count written.
    pub async fn export_all(&self, destination: &str) -> Result<usize> {
        let students = self.repository.find_all().await;
        self.export_subset(destination, &students).await
    }

    pub async fn export_subset(&self, destination: &str, students: &[Student]) -> Result<usize> {
        let bytes = codec::encode_students(students)?;
        self.storage.write_file(destination, &bytes).await?;
        tracing::info!("Export: {} ({} records)", destination, students.len());
        Ok(students.len())
    }
}

/// New list ordered by GPA; equal GPAs keep their relative order.
pub fn sort_by_gpa(students: &[Student], ascending: bool) -> Vec<Student> {
    let mut sorted = students.to_vec();
    if ascending {
        sorted.sort_by(|a, b| a.gpa.total_cmp(&b.gpa));
    } else {
        sorted.sort_by(|a, b| b.gpa.total_cmp(&a.gpa));
    }
    sorted
}

/// New list ordered by full name, ignoring case.
pub fn sort_by_name(students: &[Student]) -> Vec<Student> {
    let mut sorted = students.to_vec();
    sorted.sort_by_cached_key(|s| s.full_name.to_lowercase());
    sorted
}
