//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.gradebook.toml` files.

use crate::analysis::{GradingRules, DEFAULT_BUCKET_EDGES, DEFAULT_TOTAL_POINTS};
use crate::error::GradebookError;
use crate::loader::DataPaths;
use crate::models::UnknownAssignmentPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file name.
pub const CONFIG_FILE: &str = ".gradebook.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Data file locations.
    #[serde(default)]
    pub data: DataConfig,

    /// Grading rules.
    #[serde(default)]
    pub grading: GradingConfig,

    /// Histogram settings.
    #[serde(default)]
    pub chart: ChartConfig,
}

/// Where the data files live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Base directory; relative file paths below are resolved against it.
    #[serde(default = "default_data_dir")]
    pub dir: PathBuf,

    #[serde(default = "default_students")]
    pub students: PathBuf,

    #[serde(default = "default_assignments")]
    pub assignments: PathBuf,

    /// Directory of submission files.
    #[serde(default = "default_submissions")]
    pub submissions: PathBuf,

    /// Submission file names to ignore.
    #[serde(default)]
    pub excludes: Vec<String>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: default_data_dir(),
            students: default_students(),
            assignments: default_assignments(),
            submissions: default_submissions(),
            excludes: Vec::new(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_students() -> PathBuf {
    PathBuf::from("students.txt")
}

fn default_assignments() -> PathBuf {
    PathBuf::from("assignments.txt")
}

fn default_submissions() -> PathBuf {
    PathBuf::from("submissions")
}

impl DataConfig {
    /// Resolve the three data paths against the base directory.
    /// Absolute paths are kept as they are.
    pub fn paths(&self) -> DataPaths {
        DataPaths {
            students: self.dir.join(&self.students),
            assignments: self.dir.join(&self.assignments),
            submissions: self.dir.join(&self.submissions),
        }
    }
}

/// Grading settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradingConfig {
    /// Course-wide point pool used as the grade denominator.
    #[serde(default = "default_total_points")]
    pub total_points: u32,

    /// `skip` counts unknown assignments as zero, `fail` aborts the query.
    #[serde(default)]
    pub unknown_assignment: UnknownAssignmentPolicy,
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            total_points: default_total_points(),
            unknown_assignment: UnknownAssignmentPolicy::default(),
        }
    }
}

fn default_total_points() -> u32 {
    DEFAULT_TOTAL_POINTS
}

impl GradingConfig {
    pub fn rules(&self) -> GradingRules {
        GradingRules {
            total_points: self.total_points,
            unknown_assignment: self.unknown_assignment,
        }
    }
}

/// Histogram settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Bucket boundaries, strictly increasing.
    #[serde(default = "default_bucket_edges")]
    pub bucket_edges: Vec<f64>,

    /// Width in characters of the longest bar.
    #[serde(default = "default_bar_width")]
    pub bar_width: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            bucket_edges: default_bucket_edges(),
            bar_width: default_bar_width(),
        }
    }
}

fn default_bucket_edges() -> Vec<f64> {
    DEFAULT_BUCKET_EDGES.to_vec()
}

fn default_bar_width() -> usize {
    40
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were actually given.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref dir) = args.data_dir {
            self.data.dir = dir.clone();
        }
        if let Some(ref students) = args.students {
            self.data.students = students.clone();
        }
        if let Some(ref assignments) = args.assignments {
            self.data.assignments = assignments.clone();
        }
        if let Some(ref submissions) = args.submissions {
            self.data.submissions = submissions.clone();
        }

        if let Some(total) = args.total_points {
            self.grading.total_points = total;
        }
        if args.strict {
            self.grading.unknown_assignment = UnknownAssignmentPolicy::Fail;
        }
    }

    /// Check values the type system cannot.
    pub fn validate(&self) -> std::result::Result<(), GradebookError> {
        if self.grading.total_points == 0 {
            return Err(GradebookError::Config {
                message: "grading.total_points must be greater than 0".to_string(),
            });
        }

        let edges = &self.chart.bucket_edges;
        if edges.len() < 2 {
            return Err(GradebookError::Config {
                message: "chart.bucket_edges needs at least two values".to_string(),
            });
        }
        if edges.windows(2).any(|w| !(w[0] < w[1])) {
            return Err(GradebookError::Config {
                message: "chart.bucket_edges must be strictly increasing".to_string(),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
