//! Gradebook - flat-file grade queries
//!
//! Loads a student roster, an assignment list and a directory of
//! submission files, then answers one query: a student's grade, an
//! assignment's score statistics, or a score histogram.
//!
//! Exit codes:
//!   0 - Success (including "not found" and "no submissions" answers)
//!   1 - Invalid arguments, unreadable or malformed data, strict-mode failure

mod analysis;
mod cli;
mod config;
mod error;
mod loader;
mod models;
mod report;
mod scanner;

use analysis::{query, GradingRules};
use anyhow::{Context, Result};
use cli::{Args, OutputFormat, QueryKind};
use config::{Config, CONFIG_FILE};
use models::{Gradebook, QueryOutcome, QueryReport, ReportMetadata};
use report::TerminalHistogram;
use std::io::{self, Write};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args)?;

    info!("Gradebook v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            error!("Run failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .gradebook.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", CONFIG_FILE);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to change data paths, the grading denominator and chart buckets.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so query answers on stdout stay clean.
fn init_logging(args: &Args) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level())
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

/// Load the data, answer one query, and return the exit code.
fn run(args: Args) -> Result<i32> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);
    config.validate()?;

    let paths = config.data.paths();
    let scan_config = scanner::ScanConfig::from(&config.data);
    debug!("Data paths: {:?}", paths);

    let book = loader::load_gradebook(&paths, &scan_config)
        .with_context(|| format!("Failed to load data from {}", config.data.dir.display()))?;
    let metadata = ReportMetadata::from_gradebook(config.data.dir.display().to_string(), &book);

    if args.check {
        return handle_check(&metadata, args.format);
    }

    let rules = config.grading.rules();
    let edges = &config.chart.bucket_edges;

    let outcome = if args.all {
        query::all_grades(&book, &rules)?
    } else {
        let (kind, name) = match (args.query, args.name.clone()) {
            (Some(kind), Some(name)) => (kind, name),
            _ => {
                let stdin = io::stdin();
                let mut input = stdin.lock();
                let mut out = io::stdout();
                match cli::run_menu(&mut input, &mut out).context("Failed to read selection")? {
                    Some(selection) => selection,
                    None => {
                        println!("Invalid selection");
                        return Ok(0);
                    }
                }
            }
        };
        execute_query(kind, &name, &book, &rules, edges)?
    };

    if let QueryOutcome::NotFound { record, query: name } = &outcome {
        warn!("{} '{}' not found", record, name);
    }

    match args.format {
        OutputFormat::Json => {
            let report = QueryReport { metadata, outcome };
            println!("{}", report::generate_json_report(&report)?);
        }
        OutputFormat::Text => {
            let mut out = io::stdout();
            if args.verbose {
                if let QueryOutcome::Grade(grade) = &outcome {
                    writeln!(out, "{}", report::generate_grade_breakdown(grade))?;
                }
            }
            let mut renderer = TerminalHistogram::new(io::stdout(), config.chart.bar_width);
            report::write_text_outcome(&mut out, &outcome, &mut renderer, edges)?;
        }
    }

    Ok(0)
}

/// Dispatch one named query.
fn execute_query(
    kind: QueryKind,
    name: &str,
    book: &Gradebook,
    rules: &GradingRules,
    edges: &[f64],
) -> Result<QueryOutcome> {
    debug!("Running {:?} query for '{}'", kind, name.trim());

    let outcome = match kind {
        QueryKind::Grade => query::student_grade(book, name, rules)?,
        QueryKind::Stats => query::assignment_statistics(book, name),
        QueryKind::Graph => query::assignment_histogram(book, name, edges),
    };
    Ok(outcome)
}

/// Handle --check: the data loaded cleanly, report what was found.
fn handle_check(metadata: &ReportMetadata, format: OutputFormat) -> Result<i32> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(metadata)?),
        OutputFormat::Text => {
            println!("{}", report::generate_check_summary(metadata));
            println!("\n✅ Data files are valid.");
        }
    }
    Ok(0)
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {:#}", e);
            Ok(Config::default())
        }
    }
}
