//! Text and JSON formatting of query outcomes.

use crate::models::{AssignmentStats, GradeReport, QueryOutcome, QueryReport, ReportMetadata};
use anyhow::Result;

/// `"{grade}%"`.
pub fn format_grade(grade: i64) -> String {
    format!("{}%", grade)
}

/// Three labeled percent lines.
pub fn format_statistics(stats: &AssignmentStats) -> String {
    format!(
        "Min: {}%\nAvg: {}%\nMax: {}%",
        stats.min, stats.average, stats.max
    )
}

/// One roster line per student: identifier, name, grade.
fn format_class_grades(grades: &[GradeReport]) -> String {
    let name_width = grades
        .iter()
        .map(|g| g.student_name.chars().count())
        .max()
        .unwrap_or(0);

    grades
        .iter()
        .map(|g| {
            format!(
                "{}  {:<width$}  {:>4}",
                g.student_id,
                g.student_name,
                format_grade(g.grade),
                width = name_width
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Plain-text rendering of an outcome.
///
/// Histograms come out as a bucket table here; the interactive path draws
/// them through a [`super::HistogramRenderer`] instead.
pub fn generate_text_report(outcome: &QueryOutcome) -> String {
    match outcome {
        QueryOutcome::Grade(report) => format_grade(report.grade),
        QueryOutcome::ClassGrades { grades } => {
            if grades.is_empty() {
                "No students on the roster.".to_string()
            } else {
                format_class_grades(grades)
            }
        }
        QueryOutcome::Statistics { stats, .. } => format_statistics(stats),
        QueryOutcome::Histogram {
            assignment_name,
            buckets,
            ..
        } => {
            let mut lines = vec![format!("Score Distribution for {}", assignment_name)];
            lines.extend(
                buckets
                    .iter()
                    .map(|b| format!("{}-{}: {}", b.lower, b.upper, b.count)),
            );
            lines.join("\n")
        }
        QueryOutcome::NotFound { record, .. } => format!("{} not found", record),
        QueryOutcome::NoSubmissions { .. } => {
            "No submissions found for this assignment.".to_string()
        }
    }
}

/// Per-submission breakdown of a grade, shown in verbose mode.
pub fn generate_grade_breakdown(report: &GradeReport) -> String {
    let mut lines = vec![format!(
        "{} ({}): {:.2} / {} points",
        report.student_name, report.student_id, report.raw_points, report.total_points
    )];

    for line in &report.breakdown {
        match (&line.assignment_name, line.possible) {
            (Some(name), Some(possible)) => lines.push(format!(
                "  {} {}: {}% of {} = {:.2}",
                line.assignment_id, name, line.percent, possible, line.earned
            )),
            _ => lines.push(format!(
                "  {}: {}% (unknown assignment, not counted)",
                line.assignment_id, line.percent
            )),
        }
    }

    lines.join("\n")
}

/// Summary printed by `--check`.
pub fn generate_check_summary(metadata: &ReportMetadata) -> String {
    let mut lines = vec![
        format!("Data directory: {}", metadata.data_dir),
        format!("Students: {}", metadata.students),
        format!("Assignments: {}", metadata.assignments),
        format!(
            "Submissions: {} (from {} files)",
            metadata.submissions, metadata.submission_files
        ),
    ];
    if metadata.skipped_lines > 0 {
        lines.push(format!("Skipped lines: {}", metadata.skipped_lines));
    }
    lines.join("\n")
}

/// Generate a JSON report.
pub fn generate_json_report(report: &QueryReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GradeLine, HistogramBucket, RecordKind};
    use chrono::Utc;

    fn grade_report() -> GradeReport {
        GradeReport {
            student_id: "S01".to_string(),
            student_name: "Alice Smith".to_string(),
            grade: 44,
            raw_points: 440.0,
            total_points: 1000,
            breakdown: vec![
                GradeLine {
                    assignment_id: "A01".to_string(),
                    assignment_name: Some("HW1".to_string()),
                    percent: 80.0,
                    earned: 80.0,
                    possible: Some(100),
                },
                GradeLine {
                    assignment_id: "A99".to_string(),
                    assignment_name: None,
                    percent: 100.0,
                    earned: 0.0,
                    possible: None,
                },
            ],
        }
    }

    #[test]
    fn test_format_grade() {
        assert_eq!(format_grade(87), "87%");
        assert_eq!(format_grade(0), "0%");
    }

    #[test]
    fn test_format_statistics() {
        let stats = AssignmentStats {
            min: 65,
            average: 79,
            max: 91,
            count: 3,
        };
        assert_eq!(format_statistics(&stats), "Min: 65%\nAvg: 79%\nMax: 91%");
    }

    #[test]
    fn test_text_report_messages() {
        let not_found = QueryOutcome::NotFound {
            record: RecordKind::Student,
            query: "Bob".to_string(),
        };
        assert_eq!(generate_text_report(&not_found), "Student not found");

        let empty = QueryOutcome::NoSubmissions {
            assignment_id: "A02".to_string(),
            assignment_name: "HW2".to_string(),
        };
        assert_eq!(
            generate_text_report(&empty),
            "No submissions found for this assignment."
        );

        assert_eq!(generate_text_report(&QueryOutcome::Grade(grade_report())), "44%");
    }

    #[test]
    fn test_text_report_histogram_table() {
        let outcome = QueryOutcome::Histogram {
            assignment_id: "A01".to_string(),
            assignment_name: "HW1".to_string(),
            scores: vec![80.0],
            buckets: vec![
                HistogramBucket {
                    lower: 0.0,
                    upper: 50.0,
                    count: 0,
                },
                HistogramBucket {
                    lower: 50.0,
                    upper: 100.0,
                    count: 1,
                },
            ],
        };
        assert_eq!(
            generate_text_report(&outcome),
            "Score Distribution for HW1\n0-50: 0\n50-100: 1"
        );
    }

    #[test]
    fn test_class_grades_alignment() {
        let mut bob = grade_report();
        bob.student_id = "S02".to_string();
        bob.student_name = "Bob".to_string();
        bob.grade = 5;

        let text = generate_text_report(&QueryOutcome::ClassGrades {
            grades: vec![grade_report(), bob],
        });
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "S01  Alice Smith   44%");
        assert_eq!(lines[1], "S02  Bob            5%");
    }

    #[test]
    fn test_grade_breakdown() {
        let text = generate_grade_breakdown(&grade_report());
        assert!(text.starts_with("Alice Smith (S01): 440.00 / 1000 points"));
        assert!(text.contains("A01 HW1: 80% of 100 = 80.00"));
        assert!(text.contains("A99: 100% (unknown assignment, not counted)"));
    }

    #[test]
    fn test_generate_json_report() {
        let report = QueryReport {
            metadata: ReportMetadata {
                data_dir: "data".to_string(),
                generated_at: Utc::now(),
                students: 1,
                assignments: 1,
                submissions: 1,
                submission_files: 1,
                skipped_lines: 0,
            },
            outcome: QueryOutcome::Grade(grade_report()),
        };
        let json = generate_json_report(&report).unwrap();

        assert!(json.contains("\"data_dir\""));
        assert!(json.contains("\"kind\": \"grade\""));
        assert!(json.contains("\"student_id\": \"S01\""));
    }
}
