// Adapters layer: concrete implementations of the domain ports
// (repository backends and file storage).

pub mod memory;
pub mod sqlite;
pub mod storage;

pub use memory::InMemoryStudentRepository;
pub use sqlite::SqliteStudentRepository;
pub use storage::LocalStorage;
