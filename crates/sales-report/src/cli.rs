use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use sales_import::read_sales_path;
use sales_storage::{DedupStrategy, LoadOptions, QueryParams, Store};

use crate::catalog::ReportCatalog;
use crate::driver::run_reports;
use crate::render::{render_json, render_text};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DedupArg {
    /// One existence query per incoming row.
    PointQuery,
    /// Single anti-join against a staged copy of the batch.
    AntiJoin,
}

impl From<DedupArg> for DedupStrategy {
    fn from(value: DedupArg) -> Self {
        match value {
            DedupArg::PointQuery => DedupStrategy::PointQuery,
            DedupArg::AntiJoin => DedupStrategy::AntiJoin,
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Load sales records from a spreadsheet into SQLite and print the report catalog.")]
pub struct Args {
    /// Source spreadsheet (.xlsx/.xlsm/.xlsb/.xls/.ods or .csv). Without it the load step is skipped.
    #[arg(long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// SQLite database holding the `sales_data` table (created if missing).
    #[arg(long, value_name = "PATH", default_value = "sales_data.db")]
    db: PathBuf,

    /// JSON report catalog (`{"reports": [{"name": ..., "sql": ...}]}`). Defaults to the built-in catalog.
    #[arg(long, value_name = "PATH")]
    catalog: Option<PathBuf>,

    /// Reference date (YYYY-MM-DD) for relative windows such as "last 6 months". Defaults to today.
    #[arg(long, value_name = "DATE", value_parser = parse_date)]
    as_of: Option<NaiveDate>,

    /// How incoming rows are checked against the store.
    #[arg(long, value_enum, default_value_t = DedupArg::PointQuery)]
    dedup: DedupArg,

    /// Output format for report results.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Print the catalog's report names and exit.
    #[arg(long)]
    list_reports: bool,

    /// Print the catalog as JSON and exit (a starting point for `--catalog`).
    #[arg(long, conflicts_with = "list_reports")]
    print_catalog: bool,
}

fn parse_date(input: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|err| format!("invalid date '{input}' (expected YYYY-MM-DD): {err}"))
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    run_with_args(args)
}

pub fn run_with_args(args: Args) -> Result<()> {
    let catalog = match &args.catalog {
        Some(path) => ReportCatalog::from_json_path(path)
            .with_context(|| format!("load report catalog {}", path.display()))?,
        None => ReportCatalog::builtin(),
    };

    if args.list_reports {
        let names: Vec<&str> = catalog.reports().iter().map(|r| r.name.as_str()).collect();
        return ignore_broken_pipe(write_lines(&names));
    }
    if args.print_catalog {
        let json = catalog.to_json_string().context("serialize report catalog")?;
        return ignore_broken_pipe(write_lines(&[json.as_str()]));
    }

    let mut store = Store::open_path(&args.db)
        .with_context(|| format!("open sales store {}", args.db.display()))?;

    if let Some(input) = &args.input {
        load_input(&mut store, input, args.dedup.into());
    } else {
        log::info!("no --input given; reporting on existing store contents");
    }

    let params = QueryParams { as_of: args.as_of };
    let outcomes = run_reports(&store, &catalog, &params);

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let rendered = match args.format {
        OutputFormat::Text => render_text(&mut handle, &outcomes),
        OutputFormat::Json => render_json(&mut handle, &outcomes),
    };
    ignore_broken_pipe(rendered)
}

/// Read and load the source file. Failures are logged; reporting continues either way.
fn load_input(store: &mut Store, input: &std::path::Path, dedup: DedupStrategy) {
    let import = match read_sales_path(input) {
        Ok(import) => import,
        Err(err) => {
            log::error!(
                "error reading `{}`: {err}; skipping data load",
                input.display()
            );
            return;
        }
    };

    if let Err(err) = store.load(&import.records, &LoadOptions { dedup }) {
        log::error!("data load from `{}` failed: {err}", input.display());
    }
}

fn write_lines(lines: &[&str]) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    for line in lines {
        writeln!(handle, "{line}")?;
    }
    handle.flush()
}

/// A closed stdout (e.g. `sales_report | head`) ends output quietly.
fn ignore_broken_pipe(result: io::Result<()>) -> Result<()> {
    match result {
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => Ok(other?),
    }
}
