use crate::domain::model::Student;
use crate::domain::ports::{StudentFilter, StudentRepository};
use crate::domain::validation::{MAX_GPA, MIN_GPA, VALID_LEVELS};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Volatile backend. Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStudentRepository {
    students: Arc<RwLock<BTreeMap<String, Student>>>,
}

impl InMemoryStudentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.students.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.students.read().await.is_empty()
    }
}

// Same constraints the SQLite schema enforces.
fn satisfies_schema(student: &Student) -> bool {
    VALID_LEVELS.contains(&student.level) && (MIN_GPA..=MAX_GPA).contains(&student.gpa)
}

fn sorted<'a>(students: impl Iterator<Item = &'a Student>) -> Vec<Student> {
    let mut list: Vec<Student> = students.cloned().collect();
    list.sort_by(|a, b| {
        a.full_name
            .cmp(&b.full_name)
            .then_with(|| a.id.cmp(&b.id))
    });
    list
}

#[async_trait]
impl StudentRepository for InMemoryStudentRepository {
    async fn add(&self, student: &Student) -> bool {
        if !satisfies_schema(student) {
            tracing::error!("Add error: record {} violates schema constraints", student.id);
            return false;
        }
        let mut students = self.students.write().await;
        if students.contains_key(&student.id) {
            tracing::error!("Add error: student_id {} already exists", student.id);
            return false;
        }
        students.insert(student.id.clone(), student.clone());
        true
    }

    async fn find_by_id(&self, id: &str) -> Option<Student> {
        self.students.read().await.get(id).cloned()
    }

    async fn find_all(&self) -> Vec<Student> {
        sorted(self.students.read().await.values())
    }

    async fn update(&self, student: &Student) -> bool {
        if !satisfies_schema(student) {
            tracing::error!("Update error: record {} violates schema constraints", student.id);
            return false;
        }
        let mut students = self.students.write().await;
        match students.get_mut(&student.id) {
            Some(stored) => {
                let date_added = stored.date_added;
                *stored = student.clone();
                stored.date_added = date_added;
                true
            }
            None => false,
        }
    }

    async fn delete(&self, id: &str) -> bool {
        self.students.write().await.remove(id).is_some()
    }

    async fn search(&self, query: &str) -> Vec<Student> {
        let needle = query.to_ascii_lowercase();
        let students = self.students.read().await;
        sorted(students.values().filter(|s| {
            s.id.to_ascii_lowercase().contains(&needle)
                || s.full_name.to_ascii_lowercase().contains(&needle)
        }))
    }

    async fn filter(&self, criteria: &StudentFilter) -> Vec<Student> {
        let students = self.students.read().await;
        sorted(students.values().filter(|s| criteria.matches(s)))
    }

    async fn exists_by_id(&self, id: &str) -> bool {
        self.students.read().await.contains_key(id)
    }

    async fn list_distinct_programmes(&self) -> Vec<String> {
        let students = self.students.read().await;
        let mut programmes: Vec<String> = students.values().map(|s| s.programme.clone()).collect();
        programmes.sort();
        programmes.dedup();
        programmes
    }
}
