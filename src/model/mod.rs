//! In-memory JSON-stat model
//!
//! A parsed document is a [`Document`]: a collection of datasets, a single
//! dataset, or a standalone dimension.

pub mod collection;
pub mod dataset;
pub mod dimension;

pub use collection::{Collection, DatasetSelector};
pub use dataset::{Dataset, Status};
pub use dimension::{Category, Dimension, Role};

use crate::error::{JsonStatError, Result};

/// Top-level object of a JSON-stat document
#[derive(Debug, Clone)]
pub enum Document {
    Collection(Collection),
    Dataset(Dataset),
    Dimension(Dimension),
}

impl Document {
    /// Select a dataset. A single-dataset document answers to position 0
    /// and to its own name or label.
    pub fn dataset(&self, selector: &DatasetSelector) -> Result<&Dataset> {
        match self {
            Document::Collection(collection) => collection.dataset(selector),
            Document::Dataset(dataset) if single_matches(dataset, selector) => Ok(dataset),
            _ => Err(JsonStatError::UnknownDataset(selector.to_string())),
        }
    }

    pub fn into_dataset(self, selector: &DatasetSelector) -> Result<Dataset> {
        match self {
            Document::Collection(collection) => collection.into_dataset(selector),
            Document::Dataset(dataset) if single_matches(&dataset, selector) => Ok(dataset),
            _ => Err(JsonStatError::UnknownDataset(selector.to_string())),
        }
    }
}

fn single_matches(dataset: &Dataset, selector: &DatasetSelector) -> bool {
    match selector {
        DatasetSelector::Position(pos) => *pos == 0,
        DatasetSelector::Name(name) => {
            dataset.name() == Some(name.as_str()) || dataset.label() == Some(name.as_str())
        }
    }
}
