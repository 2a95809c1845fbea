//! Command-line interface argument parsing.
//!
//! This module handles CLI argument parsing using clap and the small
//! interactive menu shown when no query is given on the command line.

use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Gradebook - student grades, assignment statistics and score histograms
///
/// Loads a roster, an assignment list and a directory of submission files,
/// then answers one query. Without --query or --all an interactive menu is
/// shown.
///
/// Examples:
///   gradebook
///   gradebook --data-dir ./course --query grade --name "Alice Smith"
///   gradebook --query stats --name HW1 --format json
///   gradebook --all --strict
///   gradebook --check
///   gradebook --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Directory holding students.txt, assignments.txt and submissions/
    ///
    /// Default: from config or ./data. Can also be set via GRADEBOOK_DATA_DIR.
    #[arg(short, long, value_name = "DIR", env = "GRADEBOOK_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Roster file (relative to the data directory unless absolute)
    #[arg(long, value_name = "FILE")]
    pub students: Option<PathBuf>,

    /// Assignments file (relative to the data directory unless absolute)
    #[arg(long, value_name = "FILE")]
    pub assignments: Option<PathBuf>,

    /// Submissions directory (relative to the data directory unless absolute)
    #[arg(long, value_name = "DIR")]
    pub submissions: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .gradebook.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Run one query without the interactive menu
    #[arg(long, value_name = "QUERY", requires = "name", conflicts_with = "all")]
    pub query: Option<QueryKind>,

    /// Student or assignment name for --query (case-insensitive)
    #[arg(short, long, value_name = "NAME")]
    pub name: Option<String>,

    /// Print the grade of every student on the roster
    #[arg(long)]
    pub all: bool,

    /// Fail grade queries that hit submissions for unknown assignments
    #[arg(long)]
    pub strict: bool,

    /// Course-wide point pool used as the grade denominator
    #[arg(long, value_name = "POINTS")]
    pub total_points: Option<u32>,

    /// Output format (text, json)
    #[arg(long, default_value = "text", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Load and validate the data files, print a summary and exit
    #[arg(long, conflicts_with_all = ["query", "all"])]
    pub check: bool,

    /// Generate a default .gradebook.toml configuration file
    #[arg(long)]
    pub init_config: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,
}

/// Output format for query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain text (default)
    #[default]
    Text,
    /// JSON with metadata
    Json,
}

/// The three supported queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum QueryKind {
    /// A student's overall grade
    Grade,
    /// Min / average / max for an assignment
    Stats,
    /// Score histogram for an assignment
    Graph,
}

impl QueryKind {
    /// Map a menu selection (`1`, `2`, `3`) to a query.
    pub fn from_menu_choice(choice: &str) -> Option<Self> {
        match choice.trim() {
            "1" => Some(QueryKind::Grade),
            "2" => Some(QueryKind::Stats),
            "3" => Some(QueryKind::Graph),
            _ => None,
        }
    }

    /// Prompt used to ask for the name this query needs.
    pub fn name_prompt(&self) -> &'static str {
        match self {
            QueryKind::Grade => "What is the student's name: ",
            QueryKind::Stats | QueryKind::Graph => "What is the assignment name: ",
        }
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.total_points == Some(0) {
            return Err("Total points must be at least 1".to_string());
        }

        if let Some(ref name) = self.name {
            if name.trim().is_empty() {
                return Err("Name must not be empty".to_string());
            }
        }

        if let Some(ref dir) = self.data_dir {
            if !dir.is_dir() {
                return Err(format!("Data directory does not exist: {}", dir.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

/// Print the selection menu.
pub fn print_menu<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "1. Student grade")?;
    writeln!(out, "2. Assignment statistics")?;
    writeln!(out, "3. Assignment graph")?;
    writeln!(out)?;
    out.flush()
}

/// Print `message` and read one line of input, without the line ending.
pub fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    message: &str,
) -> io::Result<String> {
    write!(out, "{}", message)?;
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Show the menu and ask for a selection and a name.
///
/// Returns `None` when the selection is not one of the menu entries.
pub fn run_menu<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
) -> io::Result<Option<(QueryKind, String)>> {
    print_menu(out)?;
    let selection = prompt(input, out, "Enter your selection: ")?;

    let Some(kind) = QueryKind::from_menu_choice(&selection) else {
        return Ok(None);
    };

    let name = prompt(input, out, kind.name_prompt())?;
    Ok(Some((kind, name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn make_args() -> Args {
        Args::parse_from(["gradebook"])
    }

    #[test]
    fn test_defaults() {
        let args = make_args();
        assert!(args.data_dir.is_none());
        assert_eq!(args.format, OutputFormat::Text);
        assert!(args.query.is_none());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_query_requires_name() {
        assert!(Args::try_parse_from(["gradebook", "--query", "grade"]).is_err());

        let args =
            Args::try_parse_from(["gradebook", "--query", "stats", "--name", "HW1"]).unwrap();
        assert_eq!(args.query, Some(QueryKind::Stats));
        assert_eq!(args.name.as_deref(), Some("HW1"));
    }

    #[test]
    fn test_query_conflicts_with_all() {
        assert!(
            Args::try_parse_from(["gradebook", "--query", "grade", "-n", "Al", "--all"]).is_err()
        );
        assert!(Args::try_parse_from(["gradebook", "--check", "--all"]).is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_zero_total_points() {
        let mut args = make_args();
        args.total_points = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_missing_data_dir() {
        let mut args = make_args();
        args.data_dir = Some(PathBuf::from("/definitely/not/here"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_menu_choice() {
        assert_eq!(QueryKind::from_menu_choice("1"), Some(QueryKind::Grade));
        assert_eq!(QueryKind::from_menu_choice(" 3\n"), Some(QueryKind::Graph));
        assert_eq!(QueryKind::from_menu_choice("4"), None);
        assert_eq!(QueryKind::from_menu_choice(""), None);
    }

    #[test]
    fn test_run_menu_reads_selection_and_name() {
        let mut input = Cursor::new("2\nHW1\n");
        let mut out = Vec::new();

        let result = run_menu(&mut input, &mut out).unwrap();
        assert_eq!(result, Some((QueryKind::Stats, "HW1".to_string())));

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.starts_with(
            "1. Student grade\n2. Assignment statistics\n3. Assignment graph\n\n"
        ));
        assert!(printed.contains("Enter your selection: "));
        assert!(printed.ends_with("What is the assignment name: "));
    }

    #[test]
    fn test_run_menu_invalid_selection() {
        let mut input = Cursor::new("9\n");
        let mut out = Vec::new();
        assert_eq!(run_menu(&mut input, &mut out).unwrap(), None);
    }

    #[test]
    fn test_prompt_strips_crlf() {
        let mut input = Cursor::new("Alice Smith\r\n");
        let mut out = Vec::new();
        assert_eq!(prompt(&mut input, &mut out, "> ").unwrap(), "Alice Smith");
    }
}
