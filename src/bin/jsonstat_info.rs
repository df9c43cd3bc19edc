//! jsonstat-info: print what a JSON-stat file contains
//!
//! Usage:
//!   # Datasets of a collection
//!   jsonstat-info oecd-canada.json
//!
//!   # Dimensions and categories of one dataset
//!   jsonstat-info oecd-canada.json --dataset canada

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::Parser;
use jsonstat::info::{describe_dataset, describe_dimension, describe_document};
use jsonstat::logging::setup_logging;
use jsonstat::DatasetSelector;

#[derive(Parser, Debug)]
#[command(name = "jsonstat-info")]
#[command(about = "Describe the datasets and dimensions of JSON-stat files", long_about = None)]
struct Args {
    /// Input files
    #[arg(value_name = "FILE", required = true)]
    inputs: Vec<String>,

    /// Describe one dataset in detail: a position or a name
    #[arg(long, short = 'd')]
    dataset: Option<String>,

    /// Log level (overrides RUST_LOG; default: info)
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.log_level.as_deref())?;

    let selector = args
        .dataset
        .as_deref()
        .map(str::parse::<DatasetSelector>)
        .transpose()?;

    for (i, input) in args.inputs.iter().enumerate() {
        if args.inputs.len() > 1 {
            if i > 0 {
                println!();
            }
            println!("==> {} <==", input);
        }

        let document = jsonstat::parse::from_file(input)
            .with_context(|| format!("Failed to read '{}'", input))?;

        let Some(selector) = &selector else {
            print!("{}", describe_document(&document));
            continue;
        };

        let dataset = document
            .dataset(selector)
            .with_context(|| format!("Failed to select dataset {} in '{}'", selector, input))?;
        print!("{}", describe_dataset(dataset));
        for dimension in dataset.dimensions() {
            println!();
            println!("dimension '{}' ({} categories)", dimension.id(), dimension.len());
            print!("{}", describe_dimension(dimension));
        }
    }

    Ok(())
}
