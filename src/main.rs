use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use student_roster::config::cli::{Command, ReportCommand, SortOrder};
use student_roster::core::service::{sort_by_gpa, sort_by_name};
use student_roster::domain::validation::is_valid_threshold;
use student_roster::utils::{logger, validation::Validate};
use student_roster::{
    reports, AppConfig, Cli, LocalStorage, SqliteStudentRepository, Student, StudentService,
};

type Service = StudentService<SqliteStudentRepository, LocalStorage>;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config))?;
    if let Some(database) = &cli.database {
        config.database.path = database.clone();
    }
    if let Some(data_dir) = &cli.data_dir {
        config.storage.data_dir = data_dir.clone();
    }

    if let Err(e) = config.validate() {
        eprintln!("❌ {}", e.user_friendly_message());
        return Ok(ExitCode::from(1));
    }

    if config.logging.json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose, config.log_file_path().as_deref());
    }
    tracing::debug!("Effective config: {:?}", config);

    let repository = SqliteStudentRepository::connect(&config.database.path)
        .await
        .with_context(|| format!("opening student database {}", config.database.path))?;
    let storage = LocalStorage::new(&config.storage.data_dir);
    let service = StudentService::new(repository, storage)
        .with_error_report_path(config.import.error_report.clone());

    let code = run(cli.command, &service, &config, cli.json).await?;
    Ok(code)
}

async fn run(
    command: Command,
    service: &Service,
    config: &AppConfig,
    json: bool,
) -> anyhow::Result<ExitCode> {
    match command {
        Command::Add(args) => {
            let errors = service.add_student(&args.into_student()).await;
            Ok(report_errors(errors, "Student added."))
        }
        Command::Update(args) => {
            let errors = service.update_student(&args.into_student()).await;
            Ok(report_errors(errors, "Student updated."))
        }
        Command::Delete { id } => {
            if service.delete_student(&id).await {
                println!("✅ Deleted {}", id);
                Ok(ExitCode::SUCCESS)
            } else {
                eprintln!("❌ No student with ID '{}'", id);
                Ok(ExitCode::from(2))
            }
        }
        Command::Show { id } => match service.find_by_id(&id).await {
            Some(student) => {
                print_students(&[student], json)?;
                Ok(ExitCode::SUCCESS)
            }
            None => {
                eprintln!("❌ No student with ID '{}'", id);
                Ok(ExitCode::from(2))
            }
        },
        Command::List { sort } => {
            let all = service.get_all_students().await;
            let ordered = match sort {
                None => all,
                Some(SortOrder::Name) => sort_by_name(&all),
                Some(SortOrder::GpaAsc) => sort_by_gpa(&all, true),
                Some(SortOrder::GpaDesc) => sort_by_gpa(&all, false),
            };
            print_students(&ordered, json)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Search { query } => {
            print_students(&service.search(&query).await, json)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Filter(filter) => {
            print_students(&service.filter(&filter.to_filter()).await, json)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Programmes => {
            let programmes = service.list_distinct_programmes().await;
            if json {
                print_json(&programmes)?;
            } else {
                programmes.iter().for_each(|p| println!("{}", p));
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Import { file } => {
            let source = absolute(&file)?;
            let result = service.import_from_file(&source).await;
            if json {
                print_json(&result)?;
            } else {
                println!("✅ Imported: {}", result.success_count);
                println!("❌ Failed:   {}", result.error_count);
                for message in result.error_messages() {
                    println!("   {}", message);
                }
                if result.error_count > 0 && result.errors.iter().any(|e| e.row.is_some()) {
                    println!(
                        "📁 Error report: {}",
                        Path::new(&config.storage.data_dir)
                            .join(service.error_report_path())
                            .display()
                    );
                }
            }
            if result.error_count == 0 {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::from(2))
            }
        }
        Command::Export { file, filter } => {
            let destination = absolute(&file)?;
            let criteria = filter.to_filter();
            let written = if criteria.is_empty() {
                service.export_all(&destination).await
            } else {
                let subset = service.filter(&criteria).await;
                service.export_subset(&destination, &subset).await
            };
            match written {
                Ok(count) => {
                    println!("✅ Exported {} record(s) to {}", count, destination);
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    tracing::error!("Export failed: {}", e);
                    eprintln!("❌ {}", e.user_friendly_message());
                    Ok(ExitCode::from(1))
                }
            }
        }
        Command::Report { report } => run_report(report, service, config, json).await,
    }
}

async fn run_report(
    report: ReportCommand,
    service: &Service,
    config: &AppConfig,
    json: bool,
) -> anyhow::Result<ExitCode> {
    let snapshot = service.get_all_students().await;
    match report {
        ReportCommand::Top { n, programme, level } => {
            let n = n.unwrap_or(config.reports.top_n);
            let top = reports::top_performers(&snapshot, n, programme.as_deref(), level);
            print_students(&top, json)?;
        }
        ReportCommand::AtRisk { threshold } => {
            let threshold = threshold.unwrap_or(config.reports.at_risk_threshold);
            if !is_valid_threshold(threshold) {
                eprintln!("❌ Threshold must be between 0.0 and 4.0");
                return Ok(ExitCode::from(1));
            }
            print_students(&reports::at_risk_students(&snapshot, threshold), json)?;
        }
        ReportCommand::Distribution => {
            let distribution = reports::gpa_distribution(&snapshot);
            if json {
                let labelled: Vec<(&str, usize)> =
                    distribution.iter().map(|(band, count)| (band.label(), *count)).collect();
                print_json(&labelled)?;
            } else {
                for (band, count) in &distribution {
                    println!("{:<10} {}", band.label(), count);
                }
            }
        }
        ReportCommand::Programmes => {
            let summary = reports::programme_summary(&snapshot);
            if json {
                print_json(&summary)?;
            } else {
                for (programme, entry) in &summary {
                    println!("{:<24} {:>5} {:>6.2}", programme, entry.count, entry.average_gpa);
                }
            }
        }
        ReportCommand::Summary => {
            #[derive(Serialize)]
            struct Summary {
                total: usize,
                average_gpa: f64,
                active: usize,
                inactive: usize,
            }
            let summary = Summary {
                total: snapshot.len(),
                average_gpa: reports::average_gpa(&snapshot),
                active: reports::count_active(&snapshot),
                inactive: reports::count_inactive(&snapshot),
            };
            if json {
                print_json(&summary)?;
            } else {
                println!("Students:    {}", summary.total);
                println!("Average GPA: {:.2}", summary.average_gpa);
                println!("Active:      {}", summary.active);
                println!("Inactive:    {}", summary.inactive);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn report_errors(errors: Vec<String>, success: &str) -> ExitCode {
    if errors.is_empty() {
        println!("✅ {}", success);
        return ExitCode::SUCCESS;
    }
    for error in errors {
        eprintln!("❌ {}", error);
    }
    ExitCode::from(2)
}

fn absolute(file: &str) -> anyhow::Result<String> {
    let path = PathBuf::from(file);
    let path = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()
            .context("resolving the current directory")?
            .join(path)
    };
    Ok(path.to_string_lossy().into_owned())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_students(students: &[Student], json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(students);
    }
    if students.is_empty() {
        println!("(no students)");
        return Ok(());
    }
    println!(
        "{:<12} {:<28} {:<16} {:>5} {:>5} {:<8}",
        "ID", "Name", "Programme", "Level", "GPA", "Status"
    );
    for s in students {
        println!(
            "{:<12} {:<28} {:<16} {:>5} {:>5.2} {:<8}",
            s.id,
            s.full_name,
            s.programme,
            s.level,
            s.gpa,
            s.status.as_str()
        );
    }
    Ok(())
}
