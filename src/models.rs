//! Data models for the gradebook.
//!
//! This module contains the record types loaded from the data files, the
//! immutable tables that hold them, and the outcome types returned by
//! queries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// An enrolled student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Short roster identifier (e.g. `S01`).
    pub id: String,
    /// Full display name.
    pub name: String,
}

/// A graded unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Assignment identifier (e.g. `A01`).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Maximum points, always positive.
    pub points: u32,
}

/// One student's percent score on one assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub student_id: String,
    pub assignment_id: String,
    /// Percent score. Usually 0-100 but not bounded by the parser.
    pub percent: f64,
}

/// A record that can be looked up by identifier or by name.
pub trait Record {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
}

impl Record for Student {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Record for Assignment {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Records in file order with a unique-identifier index.
#[derive(Debug, Clone)]
pub struct Table<T> {
    records: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: Record> Table<T> {
    /// Insert a record. Returns the record back if its identifier is taken.
    pub fn insert(&mut self, record: T) -> Result<(), T> {
        if self.index.contains_key(record.id()) {
            return Err(record);
        }
        self.index.insert(record.id().to_string(), self.records.len());
        self.records.push(record);
        Ok(())
    }

    /// Look up a record by identifier.
    pub fn get(&self, id: &str) -> Option<&T> {
        self.index.get(id).map(|&i| &self.records[i])
    }

    /// Case-insensitive exact name match; first in file order wins.
    pub fn find_by_name(&self, query: &str) -> Option<&T> {
        let query = query.trim().to_lowercase();
        self.records
            .iter()
            .find(|r| r.name().to_lowercase() == query)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Test fixtures only. Later duplicates are dropped and the first record
/// with an identifier is kept; loaders go through [`Table::insert`] and
/// reject duplicates instead.
#[cfg(test)]
impl<T: Record> FromIterator<T> for Table<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut table = Table::default();
        for record in iter {
            let _ = table.insert(record);
        }
        table
    }
}

/// The three loaded tables. Built once, never mutated.
#[derive(Debug, Clone, Default)]
pub struct Gradebook {
    pub students: Table<Student>,
    pub assignments: Table<Assignment>,
    pub submissions: Vec<Submission>,
    /// Number of submission files read.
    pub submission_files: usize,
    /// Submission lines skipped for having the wrong field count.
    pub skipped_lines: usize,
}

/// What to do with a submission whose assignment is not in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownAssignmentPolicy {
    /// The submission contributes zero points.
    #[default]
    Skip,
    /// The grade query fails.
    Fail,
}

/// Which table a failed lookup was against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Student,
    Assignment,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Student => write!(f, "Student"),
            RecordKind::Assignment => write!(f, "Assignment"),
        }
    }
}

/// Min / average / max of an assignment's scores, truncated to integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentStats {
    pub min: i64,
    pub average: i64,
    pub max: i64,
    /// Number of submissions the statistics cover.
    pub count: usize,
}

/// One submission's contribution to a student's grade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeLine {
    pub assignment_id: String,
    /// `None` when the assignment is not in the table.
    pub assignment_name: Option<String>,
    pub percent: f64,
    pub earned: f64,
    pub possible: Option<u32>,
}

/// A student's weighted grade with the per-submission breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeReport {
    pub student_id: String,
    pub student_name: String,
    /// Final integer percentage.
    pub grade: i64,
    /// Sum of earned points before scaling.
    pub raw_points: f64,
    /// The fixed course-total denominator.
    pub total_points: u32,
    pub breakdown: Vec<GradeLine>,
}

/// A histogram bucket. The last bucket includes its upper edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBucket {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// The result of a single query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryOutcome {
    Grade(GradeReport),
    ClassGrades {
        grades: Vec<GradeReport>,
    },
    Statistics {
        assignment_id: String,
        assignment_name: String,
        stats: AssignmentStats,
    },
    Histogram {
        assignment_id: String,
        assignment_name: String,
        scores: Vec<f64>,
        buckets: Vec<HistogramBucket>,
    },
    NotFound {
        record: RecordKind,
        query: String,
    },
    NoSubmissions {
        assignment_id: String,
        assignment_name: String,
    },
}

/// Metadata attached to JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Directory the data was loaded from.
    pub data_dir: String,
    pub generated_at: DateTime<Utc>,
    pub students: usize,
    pub assignments: usize,
    pub submissions: usize,
    pub submission_files: usize,
    pub skipped_lines: usize,
}

impl ReportMetadata {
    pub fn from_gradebook(data_dir: impl Into<String>, book: &Gradebook) -> Self {
        Self {
            data_dir: data_dir.into(),
            generated_at: Utc::now(),
            students: book.students.len(),
            assignments: book.assignments.len(),
            submissions: book.submissions.len(),
            submission_files: book.submission_files,
            skipped_lines: book.skipped_lines,
        }
    }
}

/// A query outcome together with its metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryReport {
    pub metadata: ReportMetadata,
    pub outcome: QueryOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(id: &str, name: &str) -> Student {
        Student {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_table_rejects_duplicate_id() {
        let mut table = Table::default();
        assert!(table.insert(student("S01", "Alice Smith")).is_ok());
        let rejected = table.insert(student("S01", "Bob Jones")).unwrap_err();
        assert_eq!(rejected.name, "Bob Jones");
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("S01").map(|s| s.name.as_str()), Some("Alice Smith"));
    }

    #[test]
    fn test_collect_keeps_first_duplicate() {
        let table: Table<Student> = vec![student("S01", "Alice Smith"), student("S01", "Bob Jones")]
            .into_iter()
            .collect();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("S01").map(|s| s.name.as_str()), Some("Alice Smith"));
    }

    #[test]
    fn test_find_by_name_is_case_insensitive() {
        let table: Table<Student> = vec![student("S01", "Alice Smith"), student("S02", "Bob Jones")]
            .into_iter()
            .collect();

        assert_eq!(table.find_by_name("alice smith").map(|s| s.id.as_str()), Some("S01"));
        assert_eq!(table.find_by_name("  BOB JONES ").map(|s| s.id.as_str()), Some("S02"));
        assert!(table.find_by_name("Bob").is_none());
    }

    #[test]
    fn test_find_by_name_prefers_file_order() {
        let table: Table<Student> = vec![student("S07", "Sam Lee"), student("S03", "Sam Lee")]
            .into_iter()
            .collect();
        assert_eq!(table.find_by_name("sam lee").map(|s| s.id.as_str()), Some("S07"));
    }

    #[test]
    fn test_policy_serde() {
        #[derive(Deserialize)]
        struct Wrapper {
            policy: UnknownAssignmentPolicy,
        }
        let w: Wrapper = toml::from_str("policy = \"fail\"").unwrap();
        assert_eq!(w.policy, UnknownAssignmentPolicy::Fail);
        assert_eq!(UnknownAssignmentPolicy::default(), UnknownAssignmentPolicy::Skip);
    }

    #[test]
    fn test_outcome_json_tag() {
        let outcome = QueryOutcome::NotFound {
            record: RecordKind::Student,
            query: "Bob".to_string(),
        };
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("\"kind\":\"not_found\""));
        assert!(json.contains("\"record\":\"student\""));
    }
}
