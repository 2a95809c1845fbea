//! Record loaders for the roster, assignment and submission files.
//!
//! Every loader has a pure `parse_*` function over text plus a `load_*`
//! wrapper that reads the file in one go. The path is only carried along
//! for error messages.

use crate::error::{GradebookError, Result};
use crate::models::{Assignment, Gradebook, Student, Submission, Table};
use crate::scanner::{ScanConfig, SubmissionScanner};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Locations of the three data sources.
#[derive(Debug, Clone)]
pub struct DataPaths {
    pub students: PathBuf,
    pub assignments: PathBuf,
    pub submissions: PathBuf,
}

/// Submissions read from a directory.
#[derive(Debug, Clone, Default)]
pub struct SubmissionSet {
    pub submissions: Vec<Submission>,
    /// Number of files read.
    pub files: usize,
    /// Lines dropped for not having exactly three fields.
    pub skipped_lines: usize,
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| GradebookError::io(path, e))
}

/// Load all three tables. Fails on the first parse or IO error.
pub fn load_gradebook(paths: &DataPaths, scan_config: &ScanConfig) -> Result<Gradebook> {
    let students = load_students(&paths.students)?;
    let assignments = load_assignments(&paths.assignments)?;
    let set = load_submissions(&paths.submissions, scan_config)?;

    info!(
        "Loaded {} students, {} assignments, {} submissions from {} files",
        students.len(),
        assignments.len(),
        set.submissions.len(),
        set.files
    );
    if students.is_empty() {
        warn!("Roster {} has no students", paths.students.display());
    }
    if set.skipped_lines > 0 {
        warn!("Skipped {} malformed submission lines", set.skipped_lines);
    }

    Ok(Gradebook {
        students,
        assignments,
        submissions: set.submissions,
        submission_files: set.files,
        skipped_lines: set.skipped_lines,
    })
}

/// Load the roster file.
pub fn load_students(path: &Path) -> Result<Table<Student>> {
    let content = read_file(path)?;
    parse_students(path, &content)
}

/// Parse a roster listing.
///
/// Each non-blank line is `<full name> <identifier>`: the line is split on
/// its last run of whitespace, so names may contain spaces but identifiers
/// may not.
pub fn parse_students(path: &Path, content: &str) -> Result<Table<Student>> {
    let mut table = Table::default();

    for (idx, raw) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let (name, id) = line
            .rsplit_once(char::is_whitespace)
            .map(|(name, id)| (name.trim_end(), id))
            .filter(|(name, id)| !name.is_empty() && !id.is_empty())
            .ok_or_else(|| {
                GradebookError::parse(
                    path,
                    line_no,
                    format!("expected '<name> <identifier>', got '{}'", line),
                )
            })?;

        let student = Student {
            id: id.to_string(),
            name: name.to_string(),
        };
        table.insert(student).map_err(|s| GradebookError::DuplicateId {
            path: path.to_path_buf(),
            line: line_no,
            kind: "student",
            id: s.id,
        })?;
    }

    debug!("Parsed {} students from {}", table.len(), path.display());
    Ok(table)
}

/// Load the assignments file.
pub fn load_assignments(path: &Path) -> Result<Table<Assignment>> {
    let content = read_file(path)?;
    parse_assignments(path, &content)
}

/// Parse assignment records given as triplets of non-empty lines:
/// display name, identifier, maximum points.
pub fn parse_assignments(path: &Path, content: &str) -> Result<Table<Assignment>> {
    let lines: Vec<(usize, &str)> = content
        .lines()
        .enumerate()
        .map(|(idx, l)| (idx + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty())
        .collect();

    if lines.len() % 3 != 0 {
        let last_line = lines.last().map(|(n, _)| *n).unwrap_or(0);
        return Err(GradebookError::parse(
            path,
            last_line,
            format!(
                "expected records of 3 lines (name, identifier, points), found {} non-empty lines",
                lines.len()
            ),
        ));
    }

    let mut table = Table::default();
    for record in lines.chunks_exact(3) {
        let (_, name) = record[0];
        let (id_line, id) = record[1];
        let (points_line, points_text) = record[2];

        let points: i64 = points_text.parse().map_err(|_| {
            GradebookError::parse(
                path,
                points_line,
                format!("points must be an integer, got '{}'", points_text),
            )
        })?;
        let points = u32::try_from(points)
            .ok()
            .filter(|p| *p > 0)
            .ok_or_else(|| {
                GradebookError::parse(
                    path,
                    points_line,
                    format!("points must be a positive integer, got {}", points),
                )
            })?;

        let assignment = Assignment {
            id: id.to_string(),
            name: name.to_string(),
            points,
        };
        table.insert(assignment).map_err(|a| GradebookError::DuplicateId {
            path: path.to_path_buf(),
            line: id_line,
            kind: "assignment",
            id: a.id,
        })?;
    }

    debug!("Parsed {} assignments from {}", table.len(), path.display());
    Ok(table)
}

/// Load every regular file in the submissions directory.
pub fn load_submissions(dir: &Path, scan_config: &ScanConfig) -> Result<SubmissionSet> {
    let scanner = SubmissionScanner::new(dir.to_path_buf(), scan_config.clone());
    let mut set = SubmissionSet::default();

    for file in scanner.scan()? {
        let content = read_file(&file.path)?;
        let parsed = parse_submissions(&file.path, &content)?;
        debug!(
            "Read {} submissions from {} ({} bytes)",
            parsed.submissions.len(),
            file.path.display(),
            file.size
        );
        set.submissions.extend(parsed.submissions);
        set.skipped_lines += parsed.skipped_lines;
        set.files += 1;
    }

    Ok(set)
}

/// Parse `student_id|assignment_id|percent` lines.
///
/// Lines without exactly three fields are skipped and counted; a percent
/// that is not a number is an error.
pub fn parse_submissions(path: &Path, content: &str) -> Result<SubmissionSet> {
    let mut set = SubmissionSet {
        files: 1,
        ..Default::default()
    };

    for (idx, raw) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('|').map(str::trim).collect();
        let [student_id, assignment_id, percent] = fields.as_slice() else {
            warn!(
                "{}:{}: skipping line with {} fields (expected 3)",
                path.display(),
                line_no,
                fields.len()
            );
            set.skipped_lines += 1;
            continue;
        };

        let percent: f64 = percent.parse().map_err(|_| {
            GradebookError::parse(
                path,
                line_no,
                format!("percent must be a number, got '{}'", percent),
            )
        })?;
        if !percent.is_finite() {
            return Err(GradebookError::parse(
                path,
                line_no,
                "percent must be a finite number",
            ));
        }

        set.submissions.push(Submission {
            student_id: student_id.to_string(),
            assignment_id: assignment_id.to_string(),
            percent,
        });
    }

    Ok(set)
}
