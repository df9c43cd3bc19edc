//! # jsonstat - JSON-stat to table toolkit
//!
//! Reads statistical datasets in the JSON-stat format and flattens them
//! into tables: one row per combination of dimension categories, the
//! value in the last column.
//!
//! ## Modules
//!
//! - **parse**: JSON-stat 1.x / 2.x reader
//! - **model**: datasets, dimensions, categories, collections
//! - **table**: flattening, table options, CSV and JSON Lines writers
//! - **info**: printable summaries
//! - **logging**: logger setup shared by the binaries
//!
//! ## Quick Start
//!
//! ```rust
//! use jsonstat::model::DatasetSelector;
//! use jsonstat::table::flatten;
//! use serde_json::json;
//!
//! # fn main() -> anyhow::Result<()> {
//! let document = jsonstat::parse::from_value(&json!({
//!     "oecd": {
//!         "value": [5.9, 6.1, 4.3, 4.8],
//!         "dimension": {
//!             "id": ["area", "year"],
//!             "size": [2, 2],
//!             "area": {"category": {"label": {"AU": "Australia", "AT": "Austria"}}},
//!             "year": {"category": {"index": ["2003", "2004"]}}
//!         }
//!     }
//! }))?;
//!
//! let dataset = document.dataset(&DatasetSelector::Name("oecd".into()))?;
//! let rows = flatten(dataset)?;
//!
//! // rows[2] = ("Austria", "2003", 4.3)
//! assert_eq!(rows[2].labels, vec!["Austria", "2003"]);
//! assert_eq!(rows[2].value, Some(4.3));
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub mod error;
pub mod info;
pub mod logging;
pub mod model;
pub mod parse;
pub mod table;

// Re-export commonly used types for convenience
pub use error::JsonStatError;
pub use model::{Category, Collection, Dataset, DatasetSelector, Dimension, Document, Role, Status};
pub use table::{flatten, to_table, OutputFormat, Row, Table, TableConfig};

/// Main entry point: read a JSON-stat file, build the table of one dataset
/// and write it to `output`. Returns the number of data rows written.
pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    selector: &DatasetSelector,
    config: &TableConfig,
    format: OutputFormat,
) -> Result<usize> {
    let input = input.as_ref();
    let output = output.as_ref();

    let document = parse::from_file(input)
        .with_context(|| format!("Failed to read JSON-stat file '{}'", input.display()))?;
    let dataset = document.dataset(selector).with_context(|| {
        format!("Failed to select dataset {} in '{}'", selector, input.display())
    })?;

    write_dataset_file(dataset, output, config, format)
}

/// Write the table of `dataset` to the file at `output`, creating its
/// parent directory if needed
pub fn write_dataset_file<P: AsRef<Path>>(
    dataset: &Dataset,
    output: P,
    config: &TableConfig,
    format: OutputFormat,
) -> Result<usize> {
    let output = output.as_ref();
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).context("Failed to create output directory")?;
        }
    }
    let file = File::create(output)
        .with_context(|| format!("Failed to create '{}'", output.display()))?;

    let count = write_dataset(dataset, BufWriter::new(file), config, format)?;
    log::info!(
        "wrote {} rows of dataset '{}' to '{}'",
        count,
        dataset.display_name(),
        output.display()
    );
    Ok(count)
}

/// Build the table of `dataset` and write it to `writer`
pub fn write_dataset<W: Write>(
    dataset: &Dataset,
    writer: W,
    config: &TableConfig,
    format: OutputFormat,
) -> Result<usize> {
    let table = to_table(dataset, config).with_context(|| {
        format!("Failed to build table for dataset '{}'", dataset.display_name())
    })?;
    table::write_table(&table, writer, format, config.header).context("Failed to write table")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn oecd_canada() -> serde_json::Value {
        json!({
            "oecd": {
                "label": "Unemployment rate in the OECD countries",
                "value": [5.9, 6.1, 4.3, 4.8],
                "dimension": {
                    "id": ["area", "year"],
                    "size": [2, 2],
                    "area": {
                        "label": "OECD countries",
                        "category": {"label": {"AU": "Australia", "AT": "Austria"}}
                    },
                    "year": {"label": "year", "category": {"index": ["2003", "2004"]}}
                }
            },
            "canada": {
                "value": [100],
                "dimension": {
                    "id": ["country"],
                    "size": [1],
                    "country": {"category": {"label": {"CA": "Canada"}}}
                }
            }
        })
    }

    #[test]
    fn test_convert_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("oecd-canada.json");
        let output = dir.path().join("out").join("oecd-to_table.csv");
        std::fs::write(&input, oecd_canada().to_string()).unwrap();

        let count = convert_file(
            &input,
            &output,
            &DatasetSelector::Position(0),
            &TableConfig::default(),
            OutputFormat::Csv,
        )
        .unwrap();

        assert_eq!(count, 4);
        let csv = std::fs::read_to_string(&output).unwrap();
        assert_eq!(
            csv,
            concat!(
                "OECD countries,year,Value\n",
                "Australia,2003,5.9\nAustralia,2004,6.1\n",
                "Austria,2003,4.3\nAustria,2004,4.8\n"
            )
        );
    }

    #[test]
    fn test_convert_file_unknown_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("oecd-canada.json");
        std::fs::write(&input, oecd_canada().to_string()).unwrap();

        let err = convert_file(
            &input,
            dir.path().join("out.csv"),
            &DatasetSelector::Name("japan".into()),
            &TableConfig::default(),
            OutputFormat::Csv,
        )
        .unwrap_err();
        assert!(format!("{:#}", err).contains("unknown dataset 'japan'"));
    }

    #[test]
    fn test_write_dataset_file_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("a").join("b").join("canada.jsonl");
        let document = parse::from_value(&oecd_canada()).unwrap();
        let dataset = document.dataset(&DatasetSelector::Position(1)).unwrap();

        let count = write_dataset_file(
            dataset,
            &output,
            &TableConfig::default(),
            OutputFormat::JsonLines,
        )
        .unwrap();
        assert_eq!(count, 1);
        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "{\"country\":\"Canada\",\"Value\":100.0}\n"
        );
    }

    #[test]
    fn test_write_dataset_by_name() {
        let document = parse::from_value(&oecd_canada()).unwrap();
        let dataset = document.dataset(&DatasetSelector::Name("canada".into())).unwrap();

        let mut buffer = Vec::new();
        let config = TableConfig {
            header: false,
            ..TableConfig::default()
        };
        write_dataset(dataset, &mut buffer, &config, OutputFormat::Csv).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "Canada,100\n");
    }
}
