use crate::domain::model::{today, Student, StudentStatus};
use crate::domain::ports::StudentFilter;
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "roster")]
#[command(about = "Manage a roster of student records")]
pub struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "roster.toml")]
    pub config: String,

    /// Override the database file from the config
    #[arg(long)]
    pub database: Option<String>,

    /// Override the data directory from the config
    #[arg(long)]
    pub data_dir: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a new student
    Add(StudentArgs),
    /// Replace an existing student's details
    Update(StudentArgs),
    /// Remove a student by ID
    Delete { id: String },
    /// Show one student
    Show { id: String },
    /// List every student
    List {
        #[arg(long, value_enum)]
        sort: Option<SortOrder>,
    },
    /// Find students whose ID or name contains the query
    Search { query: String },
    /// List students matching all given criteria
    Filter(FilterArgs),
    /// List distinct programmes
    Programmes,
    /// Bulk-load students from a CSV file
    Import { file: String },
    /// Write students to a CSV file (all, or those matching the filter)
    Export {
        file: String,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Aggregate reports
    Report {
        #[command(subcommand)]
        report: ReportCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum ReportCommand {
    /// Highest GPAs, optionally within a programme and level
    Top {
        #[arg(short, long)]
        n: Option<usize>,
        #[arg(long)]
        programme: Option<String>,
        #[arg(long)]
        level: Option<u16>,
    },
    /// Students below a GPA threshold
    AtRisk {
        #[arg(long)]
        threshold: Option<f64>,
    },
    /// Student count per GPA band
    Distribution,
    /// Count and average GPA per programme
    Programmes,
    /// Totals, average GPA and status counts
    Summary,
}

#[derive(Debug, Args)]
pub struct StudentArgs {
    #[arg(long)]
    pub id: String,
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub programme: String,
    #[arg(long)]
    pub level: u16,
    #[arg(long)]
    pub gpa: f64,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub phone: String,
    #[arg(long, value_enum, default_value = "active")]
    pub status: StatusArg,
}

impl StudentArgs {
    pub fn into_student(self) -> Student {
        Student {
            id: self.id,
            full_name: self.name,
            programme: self.programme,
            level: self.level,
            gpa: self.gpa,
            email: self.email,
            phone: self.phone,
            date_added: today(),
            status: self.status.into(),
        }
    }
}

#[derive(Debug, Args, Default)]
pub struct FilterArgs {
    #[arg(long)]
    pub programme: Option<String>,
    #[arg(long)]
    pub level: Option<u16>,
    #[arg(long, value_enum)]
    pub status: Option<StatusArg>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> StudentFilter {
        StudentFilter {
            programme: self.programme.clone(),
            level: self.level,
            status: self.status.map(Into::into),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    Active,
    Inactive,
}

impl From<StatusArg> for StudentStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Active => StudentStatus::Active,
            StatusArg::Inactive => StudentStatus::Inactive,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortOrder {
    Name,
    GpaAsc,
    GpaDesc,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add_command() {
        let cli = Cli::try_parse_from([
            "roster", "add", "--id", "STU0001", "--name", "Alice Mensah", "--programme", "CS",
            "--level", "300", "--gpa", "3.5", "--email", "a@b.com", "--phone", "0241234567",
        ])
        .unwrap();

        match cli.command {
            Command::Add(args) => {
                let student = args.into_student();
                assert_eq!(student.id, "STU0001");
                assert_eq!(student.status, StudentStatus::Active);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_export_with_filter() {
        let cli = Cli::try_parse_from([
            "roster", "--json", "export", "cs.csv", "--programme", "CS", "--status", "inactive",
        ])
        .unwrap();

        assert!(cli.json);
        match cli.command {
            Command::Export { file, filter } => {
                assert_eq!(file, "cs.csv");
                let criteria = filter.to_filter();
                assert_eq!(criteria.programme.as_deref(), Some("CS"));
                assert_eq!(criteria.status, Some(StudentStatus::Inactive));
                assert_eq!(criteria.level, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_report_at_risk() {
        let cli = Cli::try_parse_from(["roster", "report", "at-risk", "--threshold", "1.5"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Report {
                report: ReportCommand::AtRisk { threshold: Some(t) }
            } if t == 1.5
        ));
    }
}
