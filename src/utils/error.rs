use thiserror::Error;

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Database migration failed: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Storage error: {message}")]
    StorageError { message: String },
}

impl RosterError {
    /// Short description safe to show to an end user; hides backend detail.
    pub fn user_friendly_message(&self) -> String {
        match self {
            RosterError::DatabaseError(_) | RosterError::MigrationError(_) => {
                "The student database could not be accessed.".to_string()
            }
            RosterError::CsvError(_) => "The file is not valid CSV.".to_string(),
            RosterError::IoError(e) => format!("File operation failed: {}", e.kind()),
            RosterError::SerializationError(_) => "Could not format the output.".to_string(),
            RosterError::ConfigError { .. } | RosterError::InvalidConfigValueError { .. } => {
                self.to_string()
            }
            RosterError::StorageError { message } => message.clone(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RosterError>;
