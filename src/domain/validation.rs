//! Field rules for a [`Student`] record.
//!
//! Every field is checked independently and violations come back in a fixed
//! order (id, name, programme, level, gpa, email, phone). A blank required
//! field reports only the "required" violation for that field.

use crate::domain::model::Student;
use thiserror::Error;

pub const VALID_LEVELS: [u16; 7] = [100, 200, 300, 400, 500, 600, 700];
pub const MIN_GPA: f64 = 0.0;
pub const MAX_GPA: f64 = 4.0;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    #[error("Student ID is required.")]
    IdRequired,
    #[error("Student ID must be 4-20 characters.")]
    IdLength,
    #[error("Student ID must contain only letters and digits.")]
    IdCharset,
    #[error("Full name is required.")]
    NameRequired,
    #[error("Full name must be 2-60 characters.")]
    NameLength,
    #[error("Full name must not contain digits.")]
    NameContainsDigits,
    #[error("Programme is required.")]
    ProgrammeRequired,
    #[error("Level must be one of: 100,200,300,400,500,600,700.")]
    InvalidLevel,
    #[error("GPA must be between 0.0 and 4.0.")]
    GpaOutOfRange,
    #[error("Email is required.")]
    EmailRequired,
    #[error("Email must contain '@' and '.'.")]
    EmailFormat,
    #[error("Phone number is required.")]
    PhoneRequired,
    #[error("Phone number must contain digits only.")]
    PhoneDigitsOnly,
    #[error("Phone number must be 10-15 digits.")]
    PhoneLength,
}

pub fn validate(student: &Student) -> Vec<Violation> {
    let mut violations = Vec::new();
    violations.extend(check_id(&student.id));
    violations.extend(check_full_name(&student.full_name));
    violations.extend(check_programme(&student.programme));
    violations.extend(check_level(student.level));
    violations.extend(check_gpa(student.gpa));
    violations.extend(check_email(&student.email));
    violations.extend(check_phone(&student.phone));
    violations
}

pub fn is_valid(student: &Student) -> bool {
    validate(student).is_empty()
}

/// Whether `threshold` is usable as an at-risk GPA cut-off.
pub fn is_valid_threshold(threshold: f64) -> bool {
    (MIN_GPA..=MAX_GPA).contains(&threshold)
}

/// Messages in rule order, as shown to a user.
pub fn messages(violations: &[Violation]) -> Vec<String> {
    violations.iter().map(ToString::to_string).collect()
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn length_between(value: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&value.chars().count())
}

fn check_id(id: &str) -> Vec<Violation> {
    if is_blank(id) {
        return vec![Violation::IdRequired];
    }
    let mut found = Vec::new();
    if !length_between(id, 4, 20) {
        found.push(Violation::IdLength);
    }
    if !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        found.push(Violation::IdCharset);
    }
    found
}

fn check_full_name(name: &str) -> Vec<Violation> {
    if is_blank(name) {
        return vec![Violation::NameRequired];
    }
    let mut found = Vec::new();
    if !length_between(name, 2, 60) {
        found.push(Violation::NameLength);
    }
    if name.chars().any(|c| c.is_ascii_digit()) {
        found.push(Violation::NameContainsDigits);
    }
    found
}

fn check_programme(programme: &str) -> Option<Violation> {
    is_blank(programme).then_some(Violation::ProgrammeRequired)
}

fn check_level(level: u16) -> Option<Violation> {
    (!VALID_LEVELS.contains(&level)).then_some(Violation::InvalidLevel)
}

fn check_gpa(gpa: f64) -> Option<Violation> {
    (!(MIN_GPA..=MAX_GPA).contains(&gpa)).then_some(Violation::GpaOutOfRange)
}

fn check_email(email: &str) -> Vec<Violation> {
    if is_blank(email) {
        return vec![Violation::EmailRequired];
    }
    if !email.contains('@') || !email.contains('.') {
        return vec![Violation::EmailFormat];
    }
    Vec::new()
}

fn check_phone(phone: &str) -> Vec<Violation> {
    if is_blank(phone) {
        return vec![Violation::PhoneRequired];
    }
    let mut found = Vec::new();
    if !phone.chars().all(|c| c.is_ascii_digit()) {
        found.push(Violation::PhoneDigitsOnly);
    }
    if !length_between(phone, 10, 15) {
        found.push(Violation::PhoneLength);
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_student() -> Student {
        Student::new("STU0001", "Alice Mensah", "CS", 300, 3.5, "a@b.com", "0241234567")
    }

    #[test]
    fn test_valid_student_has_no_violations() {
        assert!(validate(&valid_student()).is_empty());
        assert!(is_valid(&valid_student()));
    }

    #[test]
    fn test_blank_id_reports_only_required() {
        let mut s = valid_student();
        s.id = "   ".to_string();
        assert_eq!(validate(&s), vec![Violation::IdRequired]);
    }

    #[test]
    fn test_short_id_with_symbols_reports_both() {
        let mut s = valid_student();
        s.id = "A-1".to_string();
        assert_eq!(validate(&s), vec![Violation::IdLength, Violation::IdCharset]);
    }

    #[test]
    fn test_id_length_bounds() {
        let mut s = valid_student();
        s.id = "ABCD".to_string();
        assert!(is_valid(&s));
        s.id = "A".repeat(20);
        assert!(is_valid(&s));
        s.id = "A".repeat(21);
        assert_eq!(validate(&s), vec![Violation::IdLength]);
    }

    #[test]
    fn test_name_rules() {
        let mut s = valid_student();
        s.full_name = "R2D2".to_string();
        assert_eq!(validate(&s), vec![Violation::NameContainsDigits]);

        s.full_name = "A".to_string();
        assert_eq!(validate(&s), vec![Violation::NameLength]);

        s.full_name = String::new();
        assert_eq!(validate(&s), vec![Violation::NameRequired]);
    }

    #[test]
    fn test_level_and_gpa() {
        let mut s = valid_student();
        s.level = 350;
        s.gpa = 4.01;
        assert_eq!(validate(&s), vec![Violation::InvalidLevel, Violation::GpaOutOfRange]);

        s.level = 700;
        s.gpa = 4.0;
        assert!(is_valid(&s));

        s.gpa = f64::NAN;
        assert_eq!(validate(&s), vec![Violation::GpaOutOfRange]);
    }

    #[test]
    fn test_email_rules() {
        let mut s = valid_student();
        s.email = "alice.example.com".to_string();
        assert_eq!(validate(&s), vec![Violation::EmailFormat]);

        s.email = " ".to_string();
        assert_eq!(validate(&s), vec![Violation::EmailRequired]);
    }

    #[test]
    fn test_phone_rules() {
        let mut s = valid_student();
        s.phone = "024-123".to_string();
        assert_eq!(
            validate(&s),
            vec![Violation::PhoneDigitsOnly, Violation::PhoneLength]
        );

        s.phone = "1".repeat(16);
        assert_eq!(validate(&s), vec![Violation::PhoneLength]);
    }

    #[test]
    fn test_violations_keep_field_order() {
        let s = Student::new("", "", "", 0, -1.0, "", "");
        assert_eq!(
            validate(&s),
            vec![
                Violation::IdRequired,
                Violation::NameRequired,
                Violation::ProgrammeRequired,
                Violation::InvalidLevel,
                Violation::GpaOutOfRange,
                Violation::EmailRequired,
                Violation::PhoneRequired,
            ]
        );
    }

    #[test]
    fn test_threshold_range() {
        assert!(is_valid_threshold(0.0));
        assert!(is_valid_threshold(4.0));
        assert!(!is_valid_threshold(-0.1));
        assert!(!is_valid_threshold(4.1));
    }

    #[test]
    fn test_messages_render_in_order() {
        let rendered = messages(&[Violation::IdRequired, Violation::GpaOutOfRange]);
        assert_eq!(
            rendered,
            vec!["Student ID is required.", "GPA must be between 0.0 and 4.0."]
        );
    }
}
