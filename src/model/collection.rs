use crate::error::{JsonStatError, Result};
use crate::model::dataset::Dataset;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Picks one dataset out of a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSelector {
    Position(usize),
    Name(String),
}

impl Default for DatasetSelector {
    fn default() -> Self {
        DatasetSelector::Position(0)
    }
}

impl FromStr for DatasetSelector {
    type Err = Infallible;

    /// A number selects by position, anything else by name
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.trim().parse::<usize>() {
            Ok(pos) => DatasetSelector::Position(pos),
            Err(_) => DatasetSelector::Name(s.to_string()),
        })
    }
}

impl fmt::Display for DatasetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetSelector::Position(pos) => write!(f, "#{}", pos),
            DatasetSelector::Name(name) => f.write_str(name),
        }
    }
}

/// An ordered group of datasets
#[derive(Debug, Clone, Default)]
pub struct Collection {
    pub label: Option<String>,
    pub href: Option<String>,
    pub updated: Option<String>,
    datasets: Vec<Dataset>,
}

impl Collection {
    pub fn new() -> Self {
        Collection::default()
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn push(&mut self, dataset: Dataset) {
        self.datasets.push(dataset);
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    pub fn datasets(&self) -> &[Dataset] {
        &self.datasets
    }

    /// Select a dataset by position, or by name falling back to label
    pub fn dataset(&self, selector: &DatasetSelector) -> Result<&Dataset> {
        self.find(selector)
            .map(|pos| &self.datasets[pos])
            .ok_or_else(|| JsonStatError::UnknownDataset(selector.to_string()))
    }

    pub fn into_dataset(mut self, selector: &DatasetSelector) -> Result<Dataset> {
        match self.find(selector) {
            Some(pos) => Ok(self.datasets.swap_remove(pos)),
            None => Err(JsonStatError::UnknownDataset(selector.to_string())),
        }
    }

    fn find(&self, selector: &DatasetSelector) -> Option<usize> {
        match selector {
            DatasetSelector::Position(pos) => (*pos < self.datasets.len()).then_some(*pos),
            DatasetSelector::Name(name) => self
                .datasets
                .iter()
                .position(|d| d.name() == Some(name.as_str()))
                .or_else(|| self.datasets.iter().position(|d| d.label() == Some(name.as_str()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::dimension::Dimension;

    fn dataset(name: &str, label: &str) -> Dataset {
        Dataset::named(name, vec![Dimension::from_codes("one", ["a"])], vec![Some(1.0)])
            .unwrap()
            .with_label(label)
    }

    fn collection() -> Collection {
        let mut collection = Collection::new().with_label("samples");
        collection.push(dataset("oecd", "Unemployment rate"));
        collection.push(dataset("canada", "Population"));
        collection
    }

    #[test]
    fn test_selector_parsing() {
        assert_eq!("1".parse::<DatasetSelector>().unwrap(), DatasetSelector::Position(1));
        assert_eq!(
            "canada".parse::<DatasetSelector>().unwrap(),
            DatasetSelector::Name("canada".into())
        );
    }

    #[test]
    fn test_select_by_position_name_and_label() {
        let collection = collection();
        let second = collection.dataset(&DatasetSelector::Position(1)).unwrap();
        assert_eq!(second.name(), Some("canada"));
        assert_eq!(
            collection.dataset(&DatasetSelector::Name("oecd".into())).unwrap().name(),
            Some("oecd")
        );
        assert_eq!(
            collection.dataset(&DatasetSelector::Name("Population".into())).unwrap().name(),
            Some("canada")
        );
    }

    #[test]
    fn test_unknown_dataset() {
        let collection = collection();
        assert!(matches!(
            collection.dataset(&DatasetSelector::Position(5)),
            Err(JsonStatError::UnknownDataset(_))
        ));
        let owned = collection.into_dataset(&DatasetSelector::Name("canada".into())).unwrap();
        assert_eq!(owned.label(), Some("Population"));
    }
}
