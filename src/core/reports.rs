//! Aggregate reports over a snapshot of records. Nothing here touches storage.

use crate::domain::model::{Student, StudentStatus};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Fixed GPA ranges; the top band is closed so 4.0 belongs to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum GpaBand {
    Below1,
    From1To2,
    From2To3,
    From3To4,
}

impl GpaBand {
    pub const ALL: [GpaBand; 4] = [
        GpaBand::Below1,
        GpaBand::From1To2,
        GpaBand::From2To3,
        GpaBand::From3To4,
    ];

    pub fn of(gpa: f64) -> Self {
        if gpa < 1.0 {
            GpaBand::Below1
        } else if gpa < 2.0 {
            GpaBand::From1To2
        } else if gpa < 3.0 {
            GpaBand::From2To3
        } else {
            GpaBand::From3To4
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GpaBand::Below1 => "0.0 - 1.0",
            GpaBand::From1To2 => "1.0 - 2.0",
            GpaBand::From2To3 => "2.0 - 3.0",
            GpaBand::From3To4 => "3.0 - 4.0",
        }
    }
}

impl fmt::Display for GpaBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProgrammeSummary {
    pub count: usize,
    pub average_gpa: f64,
}

/// At most `n` records, best GPA first. Equal GPAs keep their input order.
pub fn top_performers(
    records: &[Student],
    n: usize,
    programme: Option<&str>,
    level: Option<u16>,
) -> Vec<Student> {
    let programme = programme
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_lowercase);

    let mut selected: Vec<Student> = records
        .iter()
        .filter(|s| {
            programme
                .as_deref()
                .map_or(true, |p| s.programme.to_lowercase() == p)
        })
        .filter(|s| level.map_or(true, |l| s.level == l))
        .cloned()
        .collect();

    selected.sort_by(|a, b| b.gpa.total_cmp(&a.gpa));
    selected.truncate(n);
    selected
}

/// Records strictly below `threshold`, lowest GPA first.
pub fn at_risk_students(records: &[Student], threshold: f64) -> Vec<Student> {
    let mut selected: Vec<Student> = records
        .iter()
        .filter(|s| s.gpa < threshold)
        .cloned()
        .collect();
    selected.sort_by(|a, b| a.gpa.total_cmp(&b.gpa));
    selected
}

/// Count per band; all four bands are always present.
pub fn gpa_distribution(records: &[Student]) -> BTreeMap<GpaBand, usize> {
    let mut distribution: BTreeMap<GpaBand, usize> =
        GpaBand::ALL.iter().map(|band| (*band, 0)).collect();
    for s in records {
        *distribution.entry(GpaBand::of(s.gpa)).or_insert(0) += 1;
    }
    distribution
}

pub fn programme_summary(records: &[Student]) -> BTreeMap<String, ProgrammeSummary> {
    let mut totals: BTreeMap<String, (usize, f64)> = BTreeMap::new();
    for s in records {
        let entry = totals.entry(s.programme.clone()).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += s.gpa;
    }

    totals
        .into_iter()
        .map(|(programme, (count, sum))| {
            (
                programme,
                ProgrammeSummary {
                    count,
                    average_gpa: sum / count as f64,
                },
            )
        })
        .collect()
}

/// Mean GPA, or 0.0 for an empty snapshot.
pub fn average_gpa(records: &[Student]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    records.iter().map(|s| s.gpa).sum::<f64>() / records.len() as f64
}

pub fn count_by_status(records: &[Student], status: StudentStatus) -> usize {
    records.iter().filter(|s| s.status == status).count()
}

pub fn count_active(records: &[Student]) -> usize {
    count_by_status(records, StudentStatus::Active)
}

pub fn count_inactive(records: &[Student]) -> usize {
    count_by_status(records, StudentStatus::Inactive)
}
