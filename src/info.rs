//! Human readable summaries of documents, datasets and dimensions.

use crate::model::{Collection, Dataset, Dimension, Document};
use prettytable::{row, Table as AsciiTable};
use std::fmt::Write;

pub fn describe_document(document: &Document) -> String {
    match document {
        Document::Collection(collection) => describe_collection(collection),
        Document::Dataset(dataset) => describe_dataset(dataset),
        Document::Dimension(dimension) => describe_dimension(dimension),
    }
}

/// One line per dataset: position, name, label
pub fn describe_collection(collection: &Collection) -> String {
    let mut out = String::new();
    if let Some(label) = &collection.label {
        let _ = writeln!(out, "label:   '{}'", label);
    }
    if let Some(updated) = &collection.updated {
        let _ = writeln!(out, "updated: '{}'", updated);
    }
    let _ = writeln!(
        out,
        "collection contains the following {} dataset(s):",
        collection.len()
    );

    let mut table = AsciiTable::new();
    table.set_titles(row!["pos", "dataset", "label"]);
    for (pos, dataset) in collection.datasets().iter().enumerate() {
        table.add_row(row![
            pos,
            quoted(dataset.name()),
            quoted(dataset.label())
        ]);
    }
    out.push_str(&table.to_string());
    out
}

/// Dataset metadata followed by its dimensions
pub fn describe_dataset(dataset: &Dataset) -> String {
    let mut out = String::new();
    if let Some(name) = dataset.name() {
        let _ = writeln!(out, "name:    '{}'", name);
    }
    if let Some(label) = dataset.label() {
        let _ = writeln!(out, "label:   '{}'", label);
    }
    if let Some(source) = dataset.source() {
        let _ = writeln!(out, "source:  '{}'", source);
    }
    if let Some(updated) = dataset.updated() {
        let _ = writeln!(out, "updated: '{}'", updated);
    }
    let _ = writeln!(out, "size: {}", dataset.len());
    let _ = writeln!(out, "{} dimensions:", dataset.dimensions().len());

    let mut table = AsciiTable::new();
    table.set_titles(row!["pos", "id", "label", "size", "role"]);
    for (pos, dim) in dataset.dimensions().iter().enumerate() {
        let role = dim.role().map(|r| r.as_str()).unwrap_or("");
        table.add_row(row![
            pos,
            quoted(Some(dim.id())),
            quoted(dim.label()),
            dim.len(),
            role
        ]);
    }
    out.push_str(&table.to_string());
    out
}

/// Category table of a dimension
pub fn describe_dimension(dimension: &Dimension) -> String {
    let mut table = AsciiTable::new();
    table.set_titles(row!["pos", "idx", "label"]);
    for (pos, category) in dimension.categories().iter().enumerate() {
        table.add_row(row![
            pos,
            quoted(Some(category.index.as_str())),
            quoted(category.label.as_deref())
        ]);
    }
    table.to_string()
}

fn quoted(text: Option<&str>) -> String {
    text.map(|t| format!("'{}'", t)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, Role};

    fn concept() -> Dimension {
        Dimension::new(
            "concept",
            vec![
                Category::new("POP").with_label("population"),
                Category::new("PERCENT").with_label("weight of age group in the population"),
            ],
        )
        .with_role(Role::Metric)
    }

    #[test]
    fn test_describe_dimension() {
        let out = describe_dimension(&concept());
        assert!(out.contains("'POP'"));
        assert!(out.contains("'weight of age group in the population'"));
        assert!(out.contains("idx"));
    }

    #[test]
    fn test_describe_dataset_and_collection() {
        let dataset = Dataset::named("canada", vec![concept()], vec![Some(34.9), Some(100.0)])
            .unwrap()
            .with_label("Population by sex and age group. Canada. 2012");
        let text = describe_dataset(&dataset);
        assert!(text.contains("name:    'canada'"));
        assert!(text.contains("size: 2"));
        assert!(text.contains("1 dimensions:"));
        assert!(text.contains("metric"));

        let mut collection = Collection::new();
        collection.push(dataset);
        let text = describe_document(&Document::Collection(collection));
        assert!(text.contains("following 1 dataset(s)"));
        assert!(text.contains("'Population by sex and age group. Canada. 2012'"));
    }
}
