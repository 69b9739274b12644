pub mod codec;
pub mod reports;
pub mod service;

pub use crate::domain::model::{ImportResult, RowError, Student, StudentStatus};
pub use crate::domain::ports::{Storage, StudentFilter, StudentRepository};
pub use crate::utils::error::Result;
pub use service::StudentService;
