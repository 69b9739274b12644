pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::Cli;

pub use adapters::{InMemoryStudentRepository, LocalStorage, SqliteStudentRepository};
pub use config::AppConfig;
pub use core::{codec, reports, service::StudentService};
pub use domain::model::{ImportResult, RowError, Student, StudentStatus};
pub use domain::ports::{Storage, StudentFilter, StudentRepository};
pub use utils::error::{Result, RosterError};
