//! Histogram rendering.
//!
//! Drawing a chart is a side effect, so it sits behind the
//! [`HistogramRenderer`] trait and the aggregation code never touches a
//! display surface.

use crate::analysis::bucket_counts;
use anyhow::Result;
use std::io::Write;

/// Everything needed to draw a score histogram.
#[derive(Debug, Clone)]
pub struct HistogramChart<'a> {
    pub scores: &'a [f64],
    pub bucket_edges: &'a [f64],
    pub title: String,
    pub x_label: &'a str,
    pub y_label: &'a str,
}

impl<'a> HistogramChart<'a> {
    /// Chart of one assignment's scores with the standard axis labels.
    pub fn for_assignment(
        assignment_name: &str,
        scores: &'a [f64],
        bucket_edges: &'a [f64],
    ) -> Self {
        Self {
            scores,
            bucket_edges,
            title: format!("Score Distribution for {}", assignment_name),
            x_label: "Percentage",
            y_label: "Number of Students",
        }
    }
}

/// A surface a histogram can be drawn on.
pub trait HistogramRenderer {
    fn render_histogram(&mut self, chart: &HistogramChart<'_>) -> Result<()>;
}

/// Horizontal bar chart written to a terminal or any other writer.
pub struct TerminalHistogram<W: Write> {
    out: W,
    bar_width: usize,
}

impl<W: Write> TerminalHistogram<W> {
    pub fn new(out: W, bar_width: usize) -> Self {
        Self {
            out,
            bar_width: bar_width.max(1),
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn bar_len(&self, count: usize, max_count: usize) -> usize {
        if count == 0 || max_count == 0 {
            return 0;
        }
        (count * self.bar_width).div_ceil(max_count)
    }
}

impl<W: Write> HistogramRenderer for TerminalHistogram<W> {
    fn render_histogram(&mut self, chart: &HistogramChart<'_>) -> Result<()> {
        let buckets = bucket_counts(chart.scores, chart.bucket_edges);
        let max_count = buckets.iter().map(|b| b.count).max().unwrap_or(0);

        let labels: Vec<String> = buckets
            .iter()
            .map(|b| format!("{}-{}", b.lower, b.upper))
            .collect();
        let label_width = labels
            .iter()
            .map(String::len)
            .chain(std::iter::once(chart.x_label.len()))
            .max()
            .unwrap_or(0);

        writeln!(self.out, "{}", chart.title)?;
        writeln!(self.out)?;
        writeln!(self.out, "{:>width$} | {}", chart.x_label, chart.y_label, width = label_width)?;

        for (bucket, label) in buckets.iter().zip(&labels) {
            let bar = "█".repeat(self.bar_len(bucket.count, max_count));
            writeln!(
                self.out,
                "{:>width$} | {}{}{}",
                label,
                bar,
                if bar.is_empty() { "" } else { " " },
                bucket.count,
                width = label_width
            )?;
        }

        self.out.flush()?;
        Ok(())
    }
}
