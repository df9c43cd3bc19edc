//! jsonstat-table: flatten a JSON-stat dataset into a table
//!
//! Usage:
//!   # First dataset of a file, CSV on stdout
//!   jsonstat-table oecd-canada.json
//!
//!   # Select a dataset by name and write it to a file
//!   jsonstat-table oecd-canada.json --dataset canada -o canada.csv
//!
//!   # Category codes, year varying slowest, one area only
//!   jsonstat-table oecd.json --content id --order year,area,concept --block area=IT
//!
//!   # Read from stdin, JSON Lines out
//!   curl -s https://json-stat.org/samples/oecd.json | jsonstat-table --format jsonl

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use jsonstat::logging::setup_logging;
use jsonstat::table::{parse_assignment, Content};
use jsonstat::{
    convert_file, write_dataset, write_dataset_file, DatasetSelector, OutputFormat, TableConfig,
};
use std::io::Read;

#[derive(Parser, Debug)]
#[command(name = "jsonstat-table")]
#[command(about = "Flatten a JSON-stat dataset into a table", long_about = None)]
struct Args {
    /// Input file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Dataset to convert: a position or a name (default: the first one)
    #[arg(long, short = 'd', default_value = "0")]
    dataset: String,

    /// Output file (use stdout if omitted)
    #[arg(long, short = 'o')]
    output: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = FormatArg::Csv)]
    format: FormatArg,

    /// Write labels or ids in header and cells
    #[arg(long, value_enum, default_value_t = ContentArg::Label)]
    content: ContentArg,

    /// Comma-separated dimensions, slowest varying first
    #[arg(long)]
    order: Option<String>,

    /// Hold a dimension at one category, as dimension=category (repeatable)
    #[arg(long, value_name = "DIM=CAT")]
    block: Vec<String>,

    /// Header of the value column (default: "Value")
    #[arg(long)]
    value_column: Option<String>,

    /// Leave out dimensions with a single category
    #[arg(long)]
    drop_single_category: bool,

    /// Add a status column with this header
    #[arg(long)]
    status_column: Option<String>,

    /// Don't write the header row
    #[arg(long)]
    no_header: bool,

    /// Log level (overrides RUST_LOG; default: info)
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Csv,
    Jsonl,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ContentArg {
    Label,
    Id,
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.log_level.as_deref())?;

    let config = build_config(&args)?;
    let selector: DatasetSelector = args.dataset.parse()?;
    let format = match args.format {
        FormatArg::Csv => OutputFormat::Csv,
        FormatArg::Jsonl => OutputFormat::JsonLines,
    };

    if let (Some(input), Some(output)) = (&args.input, &args.output) {
        log::info!("converting '{}' to '{}'", input, output);
        convert_file(input, output, &selector, &config, format)?;
        return Ok(());
    }

    let document = read_document(args.input.as_deref())?;
    let dataset = document.dataset(&selector)?;
    log::info!(
        "converting dataset '{}' ({} values)",
        dataset.display_name(),
        dataset.len()
    );

    match &args.output {
        Some(output) => {
            write_dataset_file(dataset, output, &config, format)?;
        }
        None => {
            let count = write_dataset(dataset, std::io::stdout().lock(), &config, format)?;
            log::info!("wrote {} rows", count);
        }
    }
    Ok(())
}

/// Build the table configuration from the command line flags
fn build_config(args: &Args) -> Result<TableConfig> {
    let mut config = TableConfig::default();
    config.content = match args.content {
        ContentArg::Label => Content::Label,
        ContentArg::Id => Content::Id,
    };
    if let Some(value_column) = &args.value_column {
        config.value_column = value_column.clone();
    }
    if let Some(order) = &args.order {
        config.order = Some(order.split(',').map(|s| s.trim().to_string()).collect());
    }
    for block in &args.block {
        let Some((dimension, category)) = parse_assignment(block) else {
            bail!("--block expects dimension=category, got '{}'", block);
        };
        config.blocked.push((dimension, category));
    }
    config.drop_single_category = args.drop_single_category;
    config.status_column = args.status_column.clone();
    config.header = !args.no_header;
    Ok(config)
}

fn read_document(input: Option<&str>) -> Result<jsonstat::Document> {
    match input {
        Some(path) => {
            log::info!("reading '{}'", path);
            jsonstat::parse::from_file(path).with_context(|| format!("Failed to read '{}'", path))
        }
        None => {
            let mut content = Vec::new();
            std::io::stdin()
                .read_to_end(&mut content)
                .context("Failed to read stdin")?;
            jsonstat::parse::from_slice(&mut content).context("Failed to parse stdin")
        }
    }
}
