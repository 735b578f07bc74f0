//! duckscan - CLI

use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use duckscan::{Action, Outcome, Request, Session, DEFAULT_SAMPLE_LIMIT};

/// Group-by output is capped at this many rows on the terminal.
const GROUP_DISPLAY_ROWS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human-readable grid on stdout.
    Table,
    /// Machine-readable JSON on stdout.
    Json,
}

/// Analyze CSV datasets with the DuckDB embedded engine.
#[derive(Parser, Debug)]
#[command(name = "duckscan", version, about)]
struct Cli {
    /// Action to perform: count, sample, import, stats, schema,
    /// compression, group or query
    #[arg(long)]
    action: String,

    /// Path to the CSV file
    #[arg(long)]
    file: Option<PathBuf>,

    /// Path to a persistent database file (default: in-memory)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Table name (for import, schema, compression)
    #[arg(long)]
    table: Option<String>,

    /// Column name (for stats, group)
    #[arg(long)]
    column: Option<String>,

    /// Number of rows to sample
    #[arg(long, default_value_t = DEFAULT_SAMPLE_LIMIT)]
    limit: usize,

    /// Sample rows at random instead of taking the first N
    #[arg(long)]
    random: bool,

    /// Replace the target table if it already exists
    #[arg(long)]
    overwrite: bool,

    /// SQL text (for query)
    #[arg(long)]
    sql: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

impl Cli {
    fn into_request(self) -> anyhow::Result<(Request, Option<PathBuf>, OutputFormat)> {
        let action: Action = self.action.parse()?;
        let mut request = Request::new(action);
        request.file = self.file;
        request.table = self.table;
        request.column = self.column;
        request.limit = self.limit;
        request.random = self.random;
        request.overwrite = self.overwrite;
        request.sql = self.sql;
        Ok((request, self.db, self.format))
    }
}

fn file_size_mb(path: &std::path::Path) -> std::io::Result<f64> {
    Ok(std::fs::metadata(path)?.len() as f64 / (1024.0 * 1024.0))
}

/// Print an outcome the way a person wants to read it.
fn print_human(request: &Request, outcome: &Outcome) {
    match outcome {
        Outcome::Count { rows } => {
            println!("File contains {} rows", rows);
            if let Some(file) = &request.file {
                if let Ok(mb) = file_size_mb(file) {
                    println!("File size: {:.2} MB", mb);
                }
            }
        }
        Outcome::Imported { table, rows } => {
            println!("Imported {} rows into table '{}'", rows, table);
        }
        Outcome::Table(table) => match request.action {
            Action::Sample => {
                println!("Sample of {} rows:", table.len());
                print!("{}", table);
            }
            Action::Stats => {
                println!(
                    "Statistics for column '{}':",
                    request.column.as_deref().unwrap_or_default()
                );
                print!("{}", table);
            }
            Action::Schema => {
                println!(
                    "Schema for table '{}':",
                    request.table.as_deref().unwrap_or_default()
                );
                print!("{}", table);
            }
            Action::Compression => {
                println!(
                    "Compression info for table '{}':",
                    request.table.as_deref().unwrap_or_default()
                );
                print!("{}", table);
            }
            Action::Group => {
                println!(
                    "Group by analysis of column '{}':",
                    request.column.as_deref().unwrap_or_default()
                );
                print!("{}", table.render_limited(GROUP_DISPLAY_ROWS));
            }
            _ => print!("{}", table),
        },
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let (request, db, format) = cli.into_request()?;

    // Reject bad parameters before the engine is touched at all.
    request.validate()?;

    let session = Session::open(db.as_deref()).context("failed to open session")?;
    let outcome = session.run(&request)?;

    match format {
        OutputFormat::Table => print_human(&request, &outcome),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
