//! JSON-stat reader
//!
//! Turns JSON-stat text into a [`Document`]. Both format generations are
//! understood:
//!
//! - **1.x**: no `version` key; the root maps dataset names to datasets.
//! - **2.x**: a `version` key, and a `class` of `collection`, `dataset` or
//!   `dimension`.
//!
//! This is a reader, not a validator: it checks what it needs to build a
//! consistent [`Dataset`](crate::model::Dataset) and ignores the rest.

mod dataset;
mod dimension;

use crate::error::{JsonStatError, Result};
use crate::model::{Collection, Document};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use dataset::{parse_dataset_v1, parse_dataset_v2};
use dimension::parse_dimension;

/// Parse JSON-stat text
pub fn from_str(text: &str) -> Result<Document> {
    let json: Value = serde_json::from_str(text)?;
    from_value(&json)
}

/// Parse JSON-stat bytes with the SIMD parser. The buffer is used as
/// scratch space and is left modified.
pub fn from_slice(bytes: &mut [u8]) -> Result<Document> {
    let json: Value = simd_json::serde::from_slice(bytes)?;
    from_value(&json)
}

/// Read a whole document from `reader`
pub fn from_reader<R: Read>(reader: R) -> Result<Document> {
    let mut content = Vec::new();
    BufReader::new(reader).read_to_end(&mut content)?;
    from_slice(&mut content)
}

pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    let file = File::open(path.as_ref())?;
    log::debug!("reading '{}'", path.as_ref().display());
    from_reader(file)
}

/// Interpret an already parsed JSON value
pub fn from_value(json: &Value) -> Result<Document> {
    let Some(obj) = json.as_object() else {
        return Err(JsonStatError::malformed_json("document root must be an object"));
    };

    if !obj.contains_key("version") {
        return from_v1(obj);
    }

    match obj.get("class").and_then(|c| c.as_str()) {
        Some("collection") => parse_collection_v2(obj).map(Document::Collection),
        Some("dataset") => match parse_dataset_v2(json)? {
            Some(dataset) => Ok(Document::Dataset(dataset)),
            None => Err(JsonStatError::malformed_json(
                "dataset has no 'id': it only links to its data",
            )),
        },
        Some("dimension") => {
            let id = obj
                .get("label")
                .and_then(|l| l.as_str())
                .unwrap_or("dimension");
            parse_dimension(id, None, None, json).map(Document::Dimension)
        }
        Some(other) => Err(JsonStatError::malformed_json(format!("unknown class '{}'", other))),
        None => Err(JsonStatError::malformed_json("missing 'class' key")),
    }
}

/// A 1.x root is a map of named datasets. A bare dataset (with `value`
/// and `dimension` at the root) is accepted as well.
fn from_v1(obj: &Map<String, Value>) -> Result<Document> {
    if obj.contains_key("value") && obj.contains_key("dimension") {
        let json = Value::Object(obj.clone());
        return parse_dataset_v1(None, &json).map(Document::Dataset);
    }

    let mut collection = Collection::new();
    for (name, dataset) in obj {
        collection.push(parse_dataset_v1(Some(name.as_str()), dataset)?);
    }
    Ok(Document::Collection(collection))
}

fn parse_collection_v2(obj: &Map<String, Value>) -> Result<Collection> {
    let mut collection = Collection::new();
    collection.label = obj.get("label").and_then(|v| v.as_str()).map(str::to_string);
    collection.href = obj.get("href").and_then(|v| v.as_str()).map(str::to_string);
    collection.updated = obj.get("updated").and_then(|v| v.as_str()).map(str::to_string);

    let Some(items) = obj
        .get("link")
        .and_then(|l| l.get("item"))
        .and_then(|i| i.as_array())
    else {
        return Err(JsonStatError::malformed_json("collection: missing 'link.item' list"));
    };

    for (pos, item) in items.iter().enumerate() {
        let class = item.get("class").and_then(|c| c.as_str()).unwrap_or("dataset");
        if class != "dataset" {
            log::warn!("collection item {}: skipping item of class '{}'", pos, class);
            continue;
        }
        match parse_dataset_v2(item)? {
            Some(dataset) => collection.push(dataset),
            None => log::warn!(
                "collection item {}: skipping dataset that only links to {}",
                pos,
                item.get("href").and_then(|h| h.as_str()).unwrap_or("its data")
            ),
        }
    }

    Ok(collection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DatasetSelector;
    use serde_json::json;

    fn one_dimension(value: Value) -> Value {
        json!({
            "value": value,
            "dimension": {
                "id": ["one"],
                "size": [1],
                "one": {"category": {"index": {"2010": 0}}}
            }
        })
    }

    #[test]
    fn test_v1_collection() {
        let json = json!({
            "oecd": one_dimension(json!([1])),
            "canada": one_dimension(json!([2]))
        });
        let Document::Collection(collection) = from_value(&json).unwrap() else {
            panic!("expected a collection");
        };

        assert_eq!(collection.len(), 2);
        assert_eq!(collection.datasets()[0].name(), Some("oecd"));
        let canada = collection.dataset(&DatasetSelector::Name("canada".into())).unwrap();
        assert_eq!(canada.values(), &[Some(2.0)]);
    }

    #[test]
    fn test_v1_bare_dataset() {
        let document = from_value(&one_dimension(json!([7]))).unwrap();
        let dataset = document.dataset(&DatasetSelector::Position(0)).unwrap();
        assert_eq!(dataset.values(), &[Some(7.0)]);
    }

    #[test]
    fn test_v2_collection_skips_links() {
        let json = json!({
            "version": "2.0",
            "class": "collection",
            "label": "JSON-stat Dataset Sample Collection",
            "updated": "2015-07-02",
            "link": {
                "item": [
                    {"class": "dataset", "href": "https://json-stat.org/samples/oecd.json"},
                    {
                        "class": "dataset",
                        "label": "inline",
                        "id": ["one"],
                        "size": [1],
                        "value": [3],
                        "dimension": {"one": {"category": {"index": ["a"]}}}
                    }
                ]
            }
        });
        let Document::Collection(collection) = from_value(&json).unwrap() else {
            panic!("expected a collection");
        };

        assert_eq!(collection.label.as_deref(), Some("JSON-stat Dataset Sample Collection"));
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.datasets()[0].label(), Some("inline"));
    }

    #[test]
    fn test_v2_dimension_document() {
        let json = json!({
            "version": "2.0",
            "class": "dimension",
            "label": "sex",
            "category": {"index": ["T", "M", "F"]}
        });
        let Document::Dimension(dimension) = from_value(&json).unwrap() else {
            panic!("expected a dimension");
        };
        assert_eq!(dimension.len(), 3);
        assert_eq!(dimension.id(), "sex");
    }

    #[test]
    fn test_unknown_class() {
        let json = json!({"version": "2.0", "class": "cube"});
        let err = from_value(&json).unwrap_err();
        assert!(err.to_string().contains("unknown class 'cube'"));
    }

    #[test]
    fn test_from_str_and_slice_agree() {
        let text = one_dimension(json!([1.5])).to_string();
        let mut bytes = text.clone().into_bytes();

        let a = from_str(&text).unwrap();
        let b = from_slice(&mut bytes).unwrap();
        let selector = DatasetSelector::default();
        assert_eq!(
            a.dataset(&selector).unwrap().values(),
            b.dataset(&selector).unwrap().values()
        );
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(from_str("{"), Err(JsonStatError::Json(_))));
        assert!(from_value(&json!([1, 2])).is_err());
    }
}
