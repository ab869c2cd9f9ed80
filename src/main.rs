//! colframe - Summarize CSV files from the command line

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;

use colframe::config::{Config, OutputFormat};
use colframe::io::read_csv;
use colframe::output::render_to_stdout;
use colframe::{Frame, SortKey, Table};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Table,
    Csv,
    Json,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> Self {
        match f {
            CliOutputFormat::Table => OutputFormat::Table,
            CliOutputFormat::Csv => OutputFormat::Csv,
            CliOutputFormat::Json => OutputFormat::Json,
        }
    }
}

/// Select, group, count and sort the rows of a CSV file
#[derive(Parser, Debug)]
#[command(name = "colframe")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// CSV file to read
    file: PathBuf,

    /// Column(s) to keep (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    select: Vec<String>,

    /// Column(s) to group by (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    group_by: Vec<String>,

    /// Count rows per group into a column named `n`
    #[arg(short, long)]
    count: bool,

    /// Column(s) to sort by (comma-separated)
    #[arg(long, value_delimiter = ',')]
    sort_by: Vec<String>,

    /// Sort in descending order
    #[arg(long)]
    desc: bool,

    /// Keep only the first N rows (per group when grouped)
    #[arg(long)]
    head: Option<usize>,

    /// Field delimiter of the input
    #[arg(short, long, default_value = ",")]
    delimiter: char,

    /// Cell value read as missing, may be repeated [default: empty and NA]
    #[arg(long = "na")]
    na_values: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    format: CliOutputFormat,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let delimiter = u8::try_from(cli.delimiter)
        .ok()
        .filter(u8::is_ascii)
        .with_context(|| format!("Delimiter must be a single ASCII character: {:?}", cli.delimiter))?;

    let mut config = Config::new(cli.file)
        .with_delimiter(delimiter)
        .with_select(cli.select)
        .with_group_by(cli.group_by)
        .with_count(cli.count)
        .with_sort_by(cli.sort_by, cli.desc)
        .with_output_format(cli.format.into());
    if !cli.na_values.is_empty() {
        config = config.with_na_values(cli.na_values);
    }
    if let Some(n) = cli.head {
        config = config.with_head(n);
    }

    let table = read_csv(&config.input, &config.csv_options())?;
    info!(
        "read {} rows and {} columns from {}",
        table.nrow(),
        table.ncol(),
        config.input.display()
    );

    let result = apply(&table, &config)?;
    render_to_stdout(&result, config.output_format)
}

/// select, then group and count, then sort, then head
fn apply(table: &Table, config: &Config) -> Result<Table> {
    let table = if config.select.is_empty() {
        table.clone()
    } else {
        table.select(&config.select).context("Failed to select columns")?
    };

    let sort_keys: Vec<SortKey> = config
        .sort_by
        .iter()
        .map(|c| SortKey {
            column: c.clone(),
            descending: config.descending,
        })
        .collect();

    if config.group_by.is_empty() {
        let table = if config.count {
            table.count::<&str>(&[], "n")?
        } else {
            table
        };
        let table = if sort_keys.is_empty() { table } else { table.sort_by(sort_keys)? };
        return Ok(match config.head {
            Some(n) => table.head(n)?,
            None => table,
        });
    }

    let grouped = table.group_by(&config.group_by).context("Failed to group rows")?;
    if config.count {
        let counted = grouped.count::<&str>(&[], "n")?;
        let counted = if sort_keys.is_empty() { counted } else { counted.sort_by(sort_keys)? };
        return Ok(match config.head {
            Some(n) => counted.head(n)?,
            None => counted,
        });
    }

    let grouped = if sort_keys.is_empty() { grouped } else { grouped.sort_by(sort_keys)? };
    let grouped = match config.head {
        Some(n) => grouped.head(n)?,
        None => grouped,
    };
    Ok(grouped.ungroup())
}
