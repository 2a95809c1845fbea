//! Name-based queries over a loaded gradebook.
//!
//! Each query resolves a free-text name first and stops with
//! [`QueryOutcome::NotFound`] when nothing matches.

use super::aggregator::{
    bucket_counts, class_grades, collect_assignment_scores, compute_assignment_statistics,
    grade_report, resolve_assignment_by_name, resolve_student_by_name, GradingRules,
};
use crate::error::Result;
use crate::models::{Assignment, Gradebook, QueryOutcome, RecordKind, Student};

/// Overall grade of the student with the given name.
pub fn student_grade(book: &Gradebook, name: &str, rules: &GradingRules) -> Result<QueryOutcome> {
    let Some(student) = find_student(book, name) else {
        return Ok(not_found(RecordKind::Student, name));
    };

    let report = grade_report(student, &book.assignments, &book.submissions, rules)?;
    Ok(QueryOutcome::Grade(report))
}

/// Grades of every student on the roster.
pub fn all_grades(book: &Gradebook, rules: &GradingRules) -> Result<QueryOutcome> {
    let grades = class_grades(&book.students, &book.assignments, &book.submissions, rules)?;
    Ok(QueryOutcome::ClassGrades { grades })
}

/// Min / average / max for the assignment with the given name.
pub fn assignment_statistics(book: &Gradebook, name: &str) -> QueryOutcome {
    let Some(assignment) = find_assignment(book, name) else {
        return not_found(RecordKind::Assignment, name);
    };

    match compute_assignment_statistics(&assignment.id, &book.submissions) {
        Some(stats) => QueryOutcome::Statistics {
            assignment_id: assignment.id.clone(),
            assignment_name: assignment.name.clone(),
            stats,
        },
        None => no_submissions(assignment),
    }
}

/// Scores and bucket counts for the assignment with the given name.
pub fn assignment_histogram(book: &Gradebook, name: &str, edges: &[f64]) -> QueryOutcome {
    let Some(assignment) = find_assignment(book, name) else {
        return not_found(RecordKind::Assignment, name);
    };

    let scores = collect_assignment_scores(&assignment.id, &book.submissions);
    if scores.is_empty() {
        return no_submissions(assignment);
    }

    QueryOutcome::Histogram {
        assignment_id: assignment.id.clone(),
        assignment_name: assignment.name.clone(),
        buckets: bucket_counts(&scores, edges),
        scores,
    }
}

fn find_student<'a>(book: &'a Gradebook, name: &str) -> Option<&'a Student> {
    resolve_student_by_name(name, &book.students).and_then(|id| book.students.get(id))
}

fn find_assignment<'a>(book: &'a Gradebook, name: &str) -> Option<&'a Assignment> {
    resolve_assignment_by_name(name, &book.assignments).and_then(|id| book.assignments.get(id))
}

fn not_found(record: RecordKind, query: &str) -> QueryOutcome {
    QueryOutcome::NotFound {
        record,
        query: query.trim().to_string(),
    }
}

fn no_submissions(assignment: &Assignment) -> QueryOutcome {
    QueryOutcome::NoSubmissions {
        assignment_id: assignment.id.clone(),
        assignment_name: assignment.name.clone(),
    }
}
