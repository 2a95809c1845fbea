//! Presentation of query outcomes.

pub mod generator;
pub mod histogram;

pub use generator::*;
pub use histogram::{HistogramChart, HistogramRenderer, TerminalHistogram};

use crate::models::QueryOutcome;
use anyhow::Result;
use std::io::Write;

/// Write an outcome as text, drawing histograms with `renderer`.
pub fn write_text_outcome<W: Write>(
    out: &mut W,
    outcome: &QueryOutcome,
    renderer: &mut dyn HistogramRenderer,
    bucket_edges: &[f64],
) -> Result<()> {
    if let QueryOutcome::Histogram {
        assignment_name,
        scores,
        ..
    } = outcome
    {
        let chart = HistogramChart::for_assignment(assignment_name, scores, bucket_edges);
        return renderer.render_histogram(&chart);
    }

    writeln!(out, "{}", generate_text_report(outcome))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::DEFAULT_BUCKET_EDGES;
    use crate::models::RecordKind;

    /// Records the charts it was asked to draw.
    #[derive(Default)]
    struct RecordingRenderer {
        titles: Vec<String>,
        scores: Vec<Vec<f64>>,
    }

    impl HistogramRenderer for RecordingRenderer {
        fn render_histogram(&mut self, chart: &HistogramChart<'_>) -> Result<()> {
            self.titles.push(chart.title.clone());
            self.scores.push(chart.scores.to_vec());
            Ok(())
        }
    }

    #[test]
    fn test_histogram_goes_to_renderer() {
        let outcome = QueryOutcome::Histogram {
            assignment_id: "A01".to_string(),
            assignment_name: "HW1".to_string(),
            scores: vec![80.0, 40.0],
            buckets: Vec::new(),
        };
        let mut out = Vec::new();
        let mut renderer = RecordingRenderer::default();

        write_text_outcome(&mut out, &outcome, &mut renderer, &DEFAULT_BUCKET_EDGES).unwrap();

        assert!(out.is_empty());
        assert_eq!(renderer.titles, vec!["Score Distribution for HW1"]);
        assert_eq!(renderer.scores, vec![vec![80.0, 40.0]]);
    }

    #[test]
    fn test_other_outcomes_are_printed() {
        let outcome = QueryOutcome::NotFound {
            record: RecordKind::Assignment,
            query: "Final".to_string(),
        };
        let mut out = Vec::new();
        let mut renderer = RecordingRenderer::default();

        write_text_outcome(&mut out, &outcome, &mut renderer, &DEFAULT_BUCKET_EDGES).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "Assignment not found\n");
        assert!(renderer.titles.is_empty());
    }
}
