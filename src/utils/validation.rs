use crate::utils::error::{RosterError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(RosterError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(RosterError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_file_name(field_name: &str, name: &str) -> Result<()> {
    validate_path(field_name, name)?;
    if name.contains('/') || name.contains('\\') {
        return Err(RosterError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: name.to_string(),
            reason: "Expected a bare file name, not a path".to_string(),
        });
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(RosterError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    // written as a negated containment so NaN is rejected too
    if !(value >= min && value <= max) {
        return Err(RosterError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("database.path", "data/students.db").is_ok());
        assert!(validate_path("database.path", "").is_err());
        assert!(validate_path("database.path", "   ").is_err());
        assert!(validate_path("database.path", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_file_name() {
        assert!(validate_file_name("import.error_report", "import_errors.csv").is_ok());
        assert!(validate_file_name("import.error_report", "out/import_errors.csv").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("reports.top_n", 5, 1).is_ok());
        assert!(validate_positive_number("reports.top_n", 0, 1).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("reports.at_risk_threshold", 2.0, 0.0, 4.0).is_ok());
        assert!(validate_range("reports.at_risk_threshold", 4.5, 0.0, 4.0).is_err());
        assert!(validate_range("reports.at_risk_threshold", f64::NAN, 0.0, 4.0).is_err());
    }
}
