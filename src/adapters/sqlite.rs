use crate::domain::model::{Student, StudentStatus};
use crate::domain::ports::{StudentFilter, StudentRepository};
use crate::utils::error::{RosterError, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite};
use std::path::Path;
use std::str::FromStr;

// One shared handle; the core assumes a single writer.
const MAX_CONNECTIONS: u32 = 1;

const SELECT_STUDENTS: &str = "SELECT student_id, full_name, programme, level, gpa, email, \
     phone_number, date_added, status FROM students";

#[derive(sqlx::FromRow, Debug)]
struct StudentRow {
    student_id: String,
    full_name: String,
    programme: String,
    level: i64,
    gpa: f64,
    email: String,
    phone_number: String,
    date_added: String,
    status: String,
}

impl TryFrom<StudentRow> for Student {
    type Error = RosterError;

    fn try_from(row: StudentRow) -> Result<Self> {
        let corrupt = |what: &str, value: &str| RosterError::StorageError {
            message: format!("stored {} '{}' for {} is invalid", what, value, row.student_id),
        };
        let level = u16::try_from(row.level).map_err(|_| corrupt("level", &row.level.to_string()))?;
        let date_added = NaiveDate::parse_from_str(&row.date_added, "%Y-%m-%d")
            .map_err(|_| corrupt("date_added", &row.date_added))?;
        let status = row
            .status
            .parse::<StudentStatus>()
            .map_err(|_| corrupt("status", &row.status))?;

        Ok(Student {
            id: row.student_id,
            full_name: row.full_name,
            programme: row.programme,
            level,
            gpa: row.gpa,
            email: row.email,
            phone: row.phone_number,
            date_added,
            status,
        })
    }
}

fn into_students(rows: Vec<StudentRow>) -> Vec<Student> {
    rows.into_iter()
        .filter_map(|row| match Student::try_from(row) {
            Ok(student) => Some(student),
            Err(e) => {
                tracing::error!("Skipping unreadable row: {}", e);
                None
            }
        })
        .collect()
}

/// Logs a backend failure and substitutes the contract's failure value.
fn or_logged<T>(operation: &str, result: Result<T>, fallback: T) -> T {
    result.unwrap_or_else(|e| {
        tracing::error!("{} error: {}", operation, e);
        fallback
    })
}

#[derive(Debug, Clone)]
pub struct SqliteStudentRepository {
    pool: SqlitePool,
}

impl SqliteStudentRepository {
    /// Opens (creating if needed) the database file and applies the schema.
    pub async fn connect(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);
        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?;

        tracing::debug!("Connected to database at {}", path.display());
        Self::from_pool(pool).await
    }

    /// Private database living as long as the pool's single connection.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn try_add(&self, s: &Student) -> Result<bool> {
        let result = sqlx::query(
            "INSERT INTO students (student_id, full_name, programme, level, gpa, email, \
             phone_number, date_added, status) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )
        .bind(&s.id)
        .bind(&s.full_name)
        .bind(&s.programme)
        .bind(i64::from(s.level))
        .bind(s.gpa)
        .bind(&s.email)
        .bind(&s.phone)
        .bind(s.date_added.to_string())
        .bind(s.status.as_str())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn try_find_by_id(&self, id: &str) -> Result<Option<Student>> {
        let row: Option<StudentRow> =
            sqlx::query_as(&format!("{} WHERE student_id = ?1", SELECT_STUDENTS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(Student::try_from).transpose()
    }

    async fn try_find_all(&self) -> Result<Vec<Student>> {
        let rows: Vec<StudentRow> = sqlx::query_as(&format!(
            "{} ORDER BY full_name ASC, student_id ASC",
            SELECT_STUDENTS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(into_students(rows))
    }

    async fn try_update(&self, s: &Student) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE students SET full_name = ?1, programme = ?2, level = ?3, gpa = ?4, \
             email = ?5, phone_number = ?6, status = ?7 WHERE student_id = ?8",
        )
        .bind(&s.full_name)
        .bind(&s.programme)
        .bind(i64::from(s.level))
        .bind(s.gpa)
        .bind(&s.email)
        .bind(&s.phone)
        .bind(s.status.as_str())
        .bind(&s.id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn try_delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM students WHERE student_id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn try_search(&self, query: &str) -> Result<Vec<Student>> {
        // instr() instead of LIKE so '%' and '_' in the query stay literal
        let rows: Vec<StudentRow> = sqlx::query_as(&format!(
            "{} WHERE instr(lower(student_id), lower(?1)) > 0 \
             OR instr(lower(full_name), lower(?1)) > 0 \
             ORDER BY full_name ASC, student_id ASC",
            SELECT_STUDENTS
        ))
        .bind(query)
        .fetch_all(&self.pool)
        .await?;
        Ok(into_students(rows))
    }

    async fn try_filter(&self, criteria: &StudentFilter) -> Result<Vec<Student>> {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("{} WHERE 1 = 1", SELECT_STUDENTS));
        if let Some(programme) = criteria.programme() {
            builder.push(" AND programme = ").push_bind(programme.to_string());
        }
        if let Some(level) = criteria.level {
            builder.push(" AND level = ").push_bind(i64::from(level));
        }
        if let Some(status) = criteria.status {
            builder.push(" AND status = ").push_bind(status.as_str());
        }
        builder.push(" ORDER BY full_name ASC, student_id ASC");

        let rows: Vec<StudentRow> = builder.build_query_as().fetch_all(&self.pool).await?;
        Ok(into_students(rows))
    }

    async fn try_exists_by_id(&self, id: &str) -> Result<bool> {
        let row = sqlx::query("SELECT 1 FROM students WHERE student_id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn try_list_distinct_programmes(&self) -> Result<Vec<String>> {
        let programmes: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT programme FROM students ORDER BY programme ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(programmes)
    }
}

#[async_trait]
impl StudentRepository for SqliteStudentRepository {
    async fn add(&self, student: &Student) -> bool {
        or_logged("Add", self.try_add(student).await, false)
    }

    async fn find_by_id(&self, id: &str) -> Option<Student> {
        or_logged("FindById", self.try_find_by_id(id).await, None)
    }

    async fn find_all(&self) -> Vec<Student> {
        or_logged("FindAll", self.try_find_all().await, Vec::new())
    }

    async fn update(&self, student: &Student) -> bool {
        or_logged("Update", self.try_update(student).await, false)
    }

    async fn delete(&self, id: &str) -> bool {
        or_logged("Delete", self.try_delete(id).await, false)
    }

    async fn search(&self, query: &str) -> Vec<Student> {
        or_logged("Search", self.try_search(query).await, Vec::new())
    }

    async fn filter(&self, criteria: &StudentFilter) -> Vec<Student> {
        or_logged("Filter", self.try_filter(criteria).await, Vec::new())
    }

    async fn exists_by_id(&self, id: &str) -> bool {
        or_logged("Exists", self.try_exists_by_id(id).await, false)
    }

    async fn list_distinct_programmes(&self) -> Vec<String> {
        or_logged(
            "ListProgrammes",
            self.try_list_distinct_programmes().await,
            Vec::new(),
        )
    }
}
