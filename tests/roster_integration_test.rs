use student_roster::{
    reports, LocalStorage, SqliteStudentRepository, Storage, Student, StudentFilter,
    StudentService, StudentStatus,
};
use tempfile::TempDir;

const HEADER: &str = "StudentID,FullName,Programme,Level,GPA,Email,PhoneNumber,DateAdded,Status";

async fn file_backed_service(
    temp_dir: &TempDir,
) -> StudentService<SqliteStudentRepository, LocalStorage> {
    let repository = SqliteStudentRepository::connect(temp_dir.path().join("db/students.db"))
        .await
        .unwrap();
    let storage = LocalStorage::new(temp_dir.path());
    StudentService::new(repository, storage).with_error_report_path("reports/import_errors.csv")
}

#[tokio::test]
async fn test_import_with_bad_rows_writes_error_report() {
    let temp_dir = TempDir::new().unwrap();
    let service = file_backed_service(&temp_dir).await;

    let source = format!(
        "{}\n\
         STU0001,Alice Mensah,Computer Science,300,3.50,alice@uni.edu,0241234567,2024-01-10,ACTIVE\n\
         STU0002,Kofi Boateng,Mathematics,200,5.10,kofi@uni.edu,0247654321,2024-01-11,ACTIVE\n\
         STU0001,Alice Again,Computer Science,300,3.10,again@uni.edu,0241111111,,\n",
        HEADER
    );
    std::fs::write(temp_dir.path().join("incoming.csv"), source).unwrap();

    let result = service.import_from_file("incoming.csv").await;

    assert_eq!(result.success_count, 1);
    assert_eq!(result.error_count, 2);
    assert_eq!(result.errors[0].row, Some(2));
    assert!(result.errors[0].message.contains("GPA"));
    assert_eq!(result.errors[1].row, Some(3));
    assert!(result.errors[1].message.contains("Duplicate ID 'STU0001'"));

    let report =
        std::fs::read_to_string(temp_dir.path().join("reports/import_errors.csv")).unwrap();
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines[0], "Row,Error");
    assert!(lines[1].starts_with("2,\""));
    assert!(lines[2].starts_with("3,\"Duplicate ID"));

    let stored = service.find_by_id("STU0001").await.unwrap();
    assert_eq!(stored.full_name, "Alice Mensah");
}

#[tokio::test]
async fn test_clean_import_leaves_no_error_report() {
    let temp_dir = TempDir::new().unwrap();
    let service = file_backed_service(&temp_dir).await;

    let source = format!(
        "{}\n\nSTU0100,Ama Owusu,Biology,100,2.75,ama@uni.edu,0501234567,2024-02-01,INACTIVE\n",
        HEADER
    );
    std::fs::write(temp_dir.path().join("clean.csv"), source).unwrap();

    let result = service.import_from_file("clean.csv").await;

    assert_eq!(result.success_count, 1);
    assert_eq!(result.error_count, 0);
    assert!(!temp_dir.path().join("reports/import_errors.csv").exists());

    let stored = service.find_by_id("STU0100").await.unwrap();
    assert_eq!(stored.status, StudentStatus::Inactive);
}

#[tokio::test]
async fn test_export_then_import_into_fresh_database() {
    let temp_dir = TempDir::new().unwrap();
    let service = file_backed_service(&temp_dir).await;

    let students = [
        Student::new("STU0001", "Alice Mensah", "Computer Science", 300, 3.5, "a@uni.edu", "0241234567"),
        Student::new("STU0002", "Kofi Boateng", "Mathematics", 200, 1.8, "k@uni.edu", "0247654321")
            .with_status(StudentStatus::Inactive),
        Student::new("STU0003", "Esi Asante", "Computer Science", 400, 2.9, "e@uni.edu", "0209876543"),
    ];
    for student in &students {
        assert!(service.add_student(student).await.is_empty());
    }

    let written = service.export_all("exports/all.csv").await.unwrap();
    assert_eq!(written, 3);

    let other_dir = TempDir::new().unwrap();
    let repository = SqliteStudentRepository::connect(other_dir.path().join("copy.db"))
        .await
        .unwrap();
    let copy = StudentService::new(repository, LocalStorage::new(temp_dir.path()));

    let result = copy.import_from_file("exports/all.csv").await;
    assert_eq!(result.success_count, 3);
    assert_eq!(result.error_count, 0);

    let mut original = service.get_all_students().await;
    let mut imported = copy.get_all_students().await;
    original.sort_by(|a, b| a.id.cmp(&b.id));
    imported.sort_by(|a, b| a.id.cmp(&b.id));
    assert_eq!(original, imported);
}

#[tokio::test]
async fn test_filtered_export_and_reports() {
    let temp_dir = TempDir::new().unwrap();
    let service = file_backed_service(&temp_dir).await;

    for student in [
        Student::new("STU0001", "Alice Mensah", "Computer Science", 300, 3.9, "a@uni.edu", "0241234567"),
        Student::new("STU0002", "Kofi Boateng", "Mathematics", 300, 1.2, "k@uni.edu", "0247654321"),
        Student::new("STU0003", "Esi Asante", "Computer Science", 100, 2.4, "e@uni.edu", "0209876543"),
    ] {
        assert!(service.add_student(&student).await.is_empty());
    }

    let criteria = StudentFilter {
        programme: Some("Computer Science".to_string()),
        ..StudentFilter::default()
    };
    let subset = service.filter(&criteria).await;
    let written = service.export_subset("exports/cs.csv", &subset).await.unwrap();
    assert_eq!(written, 2);

    let storage = LocalStorage::new(temp_dir.path());
    let exported = String::from_utf8(storage.read_file("exports/cs.csv").await.unwrap()).unwrap();
    assert_eq!(exported.lines().count(), 3);
    assert!(!exported.contains("STU0002"));

    let snapshot = service.get_all_students().await;
    let top = reports::top_performers(&snapshot, 1, None, None);
    assert_eq!(top[0].id, "STU0001");

    let at_risk = reports::at_risk_students(&snapshot, 2.0);
    assert_eq!(at_risk.len(), 1);
    assert_eq!(at_risk[0].id, "STU0002");

    let summary = reports::programme_summary(&snapshot);
    assert_eq!(summary["Computer Science"].count, 2);
    assert!((summary["Computer Science"].average_gpa - 3.15).abs() < 1e-9);

    assert_eq!(
        service.list_distinct_programmes().await,
        vec!["Computer Science".to_string(), "Mathematics".to_string()]
    );
}

#[tokio::test]
async fn test_records_survive_reconnect() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("persist.db");

    {
        let repository = SqliteStudentRepository::connect(&path).await.unwrap();
        let service = StudentService::new(repository, LocalStorage::new(temp_dir.path()));
        let student =
            Student::new("STU0042", "Yaw Darko", "Physics", 500, 3.0, "y@uni.edu", "0551234567");
        assert!(service.add_student(&student).await.is_empty());

        let errors = service.add_student(&student).await;
        assert_eq!(errors, vec!["Student ID 'STU0042' already exists.".to_string()]);
    }

    let repository = SqliteStudentRepository::connect(&path).await.unwrap();
    let service = StudentService::new(repository, LocalStorage::new(temp_dir.path()));
    let all = service.get_all_students().await;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].programme, "Physics");
    assert!(service.delete_student("STU0042").await);
    assert!(service.find_by_id("STU0042").await.is_none());
}
