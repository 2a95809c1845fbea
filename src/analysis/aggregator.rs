//! Join and aggregation over the loaded tables.
//!
//! Every function here is pure: it takes shared references to the
//! immutable tables and returns a value. Aggregates are order-independent
//! so the filesystem order of submission files never matters.

use crate::error::{GradebookError, Result};
use crate::models::{
    Assignment, AssignmentStats, GradeLine, GradeReport, HistogramBucket, Student, Submission,
    Table, UnknownAssignmentPolicy,
};
use tracing::debug;

/// Default course-wide point pool used as the grade denominator.
pub const DEFAULT_TOTAL_POINTS: u32 = 1000;

/// Default histogram bucket edges.
pub const DEFAULT_BUCKET_EDGES: [f64; 5] = [0.0, 25.0, 50.0, 75.0, 100.0];

/// Grading parameters that come from configuration.
#[derive(Debug, Clone, Copy)]
pub struct GradingRules {
    /// Fixed denominator; not derived from the assignment table.
    pub total_points: u32,
    pub unknown_assignment: UnknownAssignmentPolicy,
}

impl Default for GradingRules {
    fn default() -> Self {
        Self {
            total_points: DEFAULT_TOTAL_POINTS,
            unknown_assignment: UnknownAssignmentPolicy::Skip,
        }
    }
}

/// Resolve a student name (case-insensitive) to an identifier.
pub fn resolve_student_by_name<'a>(query: &str, students: &'a Table<Student>) -> Option<&'a str> {
    students.find_by_name(query).map(|s| s.id.as_str())
}

/// Resolve an assignment display name (case-insensitive) to an identifier.
pub fn resolve_assignment_by_name<'a>(
    query: &str,
    assignments: &'a Table<Assignment>,
) -> Option<&'a str> {
    assignments.find_by_name(query).map(|a| a.id.as_str())
}

/// Compute a student's weighted grade as an integer percentage.
pub fn compute_grade(
    student_id: &str,
    assignments: &Table<Assignment>,
    submissions: &[Submission],
    rules: &GradingRules,
) -> Result<i64> {
    let lines = grade_lines(student_id, assignments, submissions, rules)?;
    Ok(scale_grade(earned_points(&lines), rules.total_points))
}

/// [`compute_grade`] plus the per-submission breakdown.
pub fn grade_report(
    student: &Student,
    assignments: &Table<Assignment>,
    submissions: &[Submission],
    rules: &GradingRules,
) -> Result<GradeReport> {
    let grade = compute_grade(&student.id, assignments, submissions, rules)?;
    let breakdown = grade_lines(&student.id, assignments, submissions, rules)?;

    Ok(GradeReport {
        student_id: student.id.clone(),
        student_name: student.name.clone(),
        grade,
        raw_points: earned_points(&breakdown),
        total_points: rules.total_points,
        breakdown,
    })
}

/// Grade every rostered student, in roster order.
pub fn class_grades(
    students: &Table<Student>,
    assignments: &Table<Assignment>,
    submissions: &[Submission],
    rules: &GradingRules,
) -> Result<Vec<GradeReport>> {
    students
        .iter()
        .map(|s| grade_report(s, assignments, submissions, rules))
        .collect()
}

fn grade_lines(
    student_id: &str,
    assignments: &Table<Assignment>,
    submissions: &[Submission],
    rules: &GradingRules,
) -> Result<Vec<GradeLine>> {
    let mut lines = Vec::new();

    for sub in submissions.iter().filter(|s| s.student_id == student_id) {
        let line = match assignments.get(&sub.assignment_id) {
            Some(assignment) => GradeLine {
                assignment_id: assignment.id.clone(),
                assignment_name: Some(assignment.name.clone()),
                percent: sub.percent,
                earned: (sub.percent / 100.0) * f64::from(assignment.points),
                possible: Some(assignment.points),
            },
            None => match rules.unknown_assignment {
                UnknownAssignmentPolicy::Fail => {
                    return Err(GradebookError::UnknownAssignment {
                        student_id: student_id.to_string(),
                        assignment_id: sub.assignment_id.clone(),
                    });
                }
                UnknownAssignmentPolicy::Skip => {
                    debug!(
                        "Ignoring submission by {} for unknown assignment {}",
                        student_id, sub.assignment_id
                    );
                    GradeLine {
                        assignment_id: sub.assignment_id.clone(),
                        assignment_name: None,
                        percent: sub.percent,
                        earned: 0.0,
                        possible: None,
                    }
                }
            },
        };
        lines.push(line);
    }

    Ok(lines)
}

fn earned_points(lines: &[GradeLine]) -> f64 {
    order_independent_sum(lines.iter().map(|l| l.earned))
}

/// Sum in ascending order so the result depends only on the values, not
/// on the order the submission lines were read in.
fn order_independent_sum(values: impl Iterator<Item = f64>) -> f64 {
    let mut values: Vec<f64> = values.collect();
    values.sort_by(f64::total_cmp);
    values.into_iter().sum()
}

/// `round(raw / total * 100)`, ties to even.
fn scale_grade(raw_points: f64, total_points: u32) -> i64 {
    ((raw_points / f64::from(total_points)) * 100.0).round_ties_even() as i64
}

/// All percent scores recorded for an assignment.
pub fn collect_assignment_scores(assignment_id: &str, submissions: &[Submission]) -> Vec<f64> {
    submissions
        .iter()
        .filter(|s| s.assignment_id == assignment_id)
        .map(|s| s.percent)
        .collect()
}

/// Min, average and max of an assignment's scores, each truncated toward
/// zero. `None` when the assignment has no submissions.
pub fn compute_assignment_statistics(
    assignment_id: &str,
    submissions: &[Submission],
) -> Option<AssignmentStats> {
    let scores = collect_assignment_scores(assignment_id, submissions);
    if scores.is_empty() {
        return None;
    }

    let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let average = order_independent_sum(scores.iter().copied()) / scores.len() as f64;

    Some(AssignmentStats {
        min: min.trunc() as i64,
        average: average.trunc() as i64,
        max: max.trunc() as i64,
        count: scores.len(),
    })
}

/// Count scores per bucket. Buckets are `[lo, hi)` except the last, which
/// is `[lo, hi]`. Scores outside the outer edges are not counted.
pub fn bucket_counts(scores: &[f64], edges: &[f64]) -> Vec<HistogramBucket> {
    let mut buckets: Vec<HistogramBucket> = edges
        .windows(2)
        .map(|w| HistogramBucket {
            lower: w[0],
            upper: w[1],
            count: 0,
        })
        .collect();

    let last = buckets.len().saturating_sub(1);
    for &score in scores {
        let slot = buckets.iter().enumerate().position(|(i, b)| {
            score >= b.lower && (score < b.upper || (i == last && score <= b.upper))
        });
        if let Some(i) = slot {
            buckets[i].count += 1;
        }
    }

    buckets
}
