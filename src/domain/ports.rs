use crate::domain::model::{Student, StudentStatus};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Conjunction of optional criteria; `None` (or a blank programme) matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentFilter {
    pub programme: Option<String>,
    pub level: Option<u16>,
    pub status: Option<StudentStatus>,
}

impl StudentFilter {
    pub fn programme(&self) -> Option<&str> {
        self.programme
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.programme().is_none() && self.level.is_none() && self.status.is_none()
    }

    pub fn matches(&self, student: &Student) -> bool {
        self.programme().map_or(true, |p| student.programme == p)
            && self.level.map_or(true, |l| student.level == l)
            && self.status.map_or(true, |s| student.status == s)
    }
}

/// Persisted roster state.
///
/// Backend failures never surface as errors here: they are logged by the
/// implementation and reported as `false`, `None` or an empty list. The
/// backend itself must reject a second record with an existing `id`.
#[async_trait]
pub trait StudentRepository: Send + Sync {
    async fn add(&self, student: &Student) -> bool;
    async fn find_by_id(&self, id: &str) -> Option<Student>;
    /// Ordered by full name (case-sensitive), then id.
    async fn find_all(&self) -> Vec<Student>;
    /// Overwrites everything except `id` and `date_added`.
    async fn update(&self, student: &Student) -> bool;
    async fn delete(&self, id: &str) -> bool;
    /// Case-insensitive substring match on id or full name.
    async fn search(&self, query: &str) -> Vec<Student>;
    async fn filter(&self, criteria: &StudentFilter) -> Vec<Student>;
    async fn exists_by_id(&self, id: &str) -> bool;
    /// Ascending, deduplicated.
    async fn list_distinct_programmes(&self) -> Vec<String>;
}

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}
