//! Dataset parsing for JSON-stat 1.x and 2.x.
//!
//! The two versions differ only in where the dimension ids, sizes and
//! roles live: inside `dimension` for 1.x, at the dataset's top level for
//! 2.x. Both are reduced to a [`Layout`] before the dataset is assembled.

use crate::error::{JsonStatError, Result};
use crate::model::{Dataset, Role, Status};
use crate::parse::dimension::parse_dimension;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

/// Where a dataset keeps its dimension description
struct Layout<'a> {
    ids: &'a Value,
    sizes: &'a Value,
    roles: Option<&'a Value>,
    dimensions: &'a Map<String, Value>,
}

/// Parse a 1.x dataset. `name` is the key under which it appears in the
/// document; the label is used when there is none.
pub(crate) fn parse_dataset_v1(name: Option<&str>, json: &Value) -> Result<Dataset> {
    let obj = expect_object(name.unwrap_or("unnamed"), json)?;
    let name = name
        .map(str::to_string)
        .or_else(|| string_field(obj, "label"));
    let display = name.clone().unwrap_or_else(|| "unnamed".to_string());

    let Some(dimension) = obj.get("dimension") else {
        return Err(JsonStatError::malformed_json(format!(
            "dataset '{}': missing 'dimension' key",
            display
        )));
    };
    let Some(dimension) = dimension.as_object() else {
        return Err(JsonStatError::malformed_json(format!(
            "dataset '{}': 'dimension' must be an object",
            display
        )));
    };

    let layout = Layout {
        ids: required(&display, dimension, "id", "dimension.id")?,
        sizes: required(&display, dimension, "size", "dimension.size")?,
        roles: dimension.get("role"),
        dimensions: dimension,
    };

    assemble(name, &display, obj, layout)
}

/// Parse a 2.x dataset.
///
/// Returns `None` for a dataset that is only a link (`href` without `id`),
/// as collections list them.
pub(crate) fn parse_dataset_v2(json: &Value) -> Result<Option<Dataset>> {
    let obj = expect_object("unnamed", json)?;
    let name = string_field(obj, "label");
    let display = name.clone().unwrap_or_else(|| "unnamed".to_string());

    if !obj.contains_key("id") && obj.contains_key("href") {
        return Ok(None);
    }

    let Some(dimension) = obj.get("dimension").and_then(|d| d.as_object()) else {
        return Err(JsonStatError::malformed_json(format!(
            "dataset '{}': missing 'dimension' key",
            display
        )));
    };

    let layout = Layout {
        ids: required(&display, obj, "id", "id")?,
        sizes: required(&display, obj, "size", "size")?,
        roles: obj.get("role"),
        dimensions: dimension,
    };

    assemble(name, &display, obj, layout).map(Some)
}

fn assemble(
    name: Option<String>,
    display: &str,
    obj: &Map<String, Value>,
    layout: Layout<'_>,
) -> Result<Dataset> {
    let ids = string_list(display, layout.ids, "id")?;
    let sizes = size_list(display, layout.sizes)?;
    if ids.len() != sizes.len() {
        return Err(JsonStatError::malformed_json(format!(
            "dataset '{}': {} dimension ids but {} sizes",
            display,
            ids.len(),
            sizes.len()
        )));
    }

    let roles = parse_roles(layout.roles);
    let mut dimensions = Vec::with_capacity(ids.len());
    for (id, size) in ids.iter().zip(&sizes) {
        let Some(json) = layout.dimensions.get(id) else {
            return Err(JsonStatError::malformed_json(format!(
                "dataset '{}': missing key '{}' in dimension",
                display, id
            )));
        };
        dimensions.push(parse_dimension(id, Some(*size), roles.get(id).copied(), json)?);
    }

    let Some(value) = obj.get("value") else {
        return Err(JsonStatError::malformed_json(format!(
            "dataset '{}': missing 'value' key",
            display
        )));
    };
    let expected = sizes.iter().try_fold(1usize, |acc, s| acc.checked_mul(*s));
    let values = parse_values(display, value, expected)?;

    log::debug!(
        "parsed dataset '{}': {} dimensions, {} values",
        display,
        dimensions.len(),
        values.len()
    );

    let mut dataset = match name {
        Some(name) => Dataset::named(name, dimensions, values)?,
        None => Dataset::new(dimensions, values)?,
    };
    if let Some(label) = string_field(obj, "label") {
        dataset = dataset.with_label(label);
    }
    if let Some(source) = string_field(obj, "source") {
        dataset = dataset.with_source(source);
    }
    if let Some(updated) = string_field(obj, "updated") {
        dataset = dataset.with_updated(updated);
    }
    if let Some(status) = obj.get("status") {
        dataset = dataset.with_status(parse_status(display, status)?)?;
    }

    Ok(dataset)
}

/// `value` is either a dense array or an object keyed by flat offset
fn parse_values(dataset: &str, json: &Value, expected: Option<usize>) -> Result<Vec<Option<f64>>> {
    match json {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| cell(dataset, &i.to_string(), item))
            .collect(),
        Value::Object(items) => {
            let Some(expected) = expected else {
                return Err(JsonStatError::malformed_dataset(
                    dataset,
                    "dimension sizes overflow the value index",
                ));
            };
            let mut values = vec![None; expected];
            for (key, item) in items {
                let offset = key
                    .parse::<usize>()
                    .ok()
                    .filter(|offset| *offset < expected)
                    .ok_or_else(|| {
                        JsonStatError::malformed_json(format!(
                            "dataset '{}': value key '{}' is not an offset below {}",
                            dataset, key, expected
                        ))
                    })?;
                values[offset] = cell(dataset, key, item)?;
            }
            Ok(values)
        }
        _ => Err(JsonStatError::malformed_json(format!(
            "dataset '{}': 'value' must be an array or an object",
            dataset
        ))),
    }
}

fn cell(dataset: &str, key: &str, item: &Value) -> Result<Option<f64>> {
    match item {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(n.as_f64()),
        other => Err(JsonStatError::malformed_json(format!(
            "dataset '{}': value {} at '{}' is not a number",
            dataset, other, key
        ))),
    }
}

/// Statuses come as a string, a list (one entry, or one per value) or an
/// object keyed by flat offset.
fn parse_status(dataset: &str, json: &Value) -> Result<Status> {
    match json {
        Value::Null => Ok(Status::Absent),
        Value::String(status) => Ok(Status::Uniform(status.clone())),
        Value::Array(items) if items.len() == 1 => {
            Ok(status_text(&items[0]).map_or(Status::Absent, Status::Uniform))
        }
        Value::Array(items) => Ok(Status::Dense(items.iter().map(status_text).collect())),
        Value::Object(items) => {
            let mut statuses = BTreeMap::new();
            for (key, item) in items {
                // Eurostat emits `{"": ""}` here
                let Ok(offset) = key.parse::<usize>() else {
                    log::warn!("dataset '{}': skipping status key '{}'", dataset, key);
                    continue;
                };
                if let Some(text) = status_text(item) {
                    statuses.insert(offset, text);
                }
            }
            Ok(Status::Sparse(statuses))
        }
        other => Err(JsonStatError::malformed_json(format!(
            "dataset '{}': unsupported status {}",
            dataset, other
        ))),
    }
}

fn status_text(item: &Value) -> Option<String> {
    match item {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// `{"time": ["year"], "geo": ["area"]}` -> dimension id -> role
fn parse_roles(json: Option<&Value>) -> HashMap<String, Role> {
    let mut roles = HashMap::new();
    let Some(obj) = json.and_then(|r| r.as_object()) else {
        return roles;
    };
    for (name, ids) in obj {
        let Some(role) = Role::from_name(name) else {
            log::debug!("ignoring unknown role '{}'", name);
            continue;
        };
        for id in ids.as_array().into_iter().flatten().filter_map(|id| id.as_str()) {
            roles.insert(id.to_string(), role);
        }
    }
    roles
}

fn expect_object<'a>(dataset: &str, json: &'a Value) -> Result<&'a Map<String, Value>> {
    json.as_object().ok_or_else(|| {
        JsonStatError::malformed_json(format!("dataset '{}': expected an object", dataset))
    })
}

fn required<'a>(
    dataset: &str,
    obj: &'a Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<&'a Value> {
    obj.get(key).ok_or_else(|| {
        JsonStatError::malformed_json(format!("dataset '{}': missing '{}' key", dataset, path))
    })
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(|v| v.as_str()).map(str::to_string)
}

fn string_list(dataset: &str, json: &Value, key: &str) -> Result<Vec<String>> {
    json.as_array()
        .and_then(|items| {
            items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
        })
        .ok_or_else(|| {
            JsonStatError::malformed_json(format!(
                "dataset '{}': '{}' must be a list of strings",
                dataset, key
            ))
        })
}

fn size_list(dataset: &str, json: &Value) -> Result<Vec<usize>> {
    json.as_array()
        .and_then(|items| {
            items
                .iter()
                .map(|item| item.as_u64().map(|n| n as usize))
                .collect::<Option<Vec<_>>>()
        })
        .ok_or_else(|| {
            JsonStatError::malformed_json(format!(
                "dataset '{}': 'size' must be a list of non-negative integers",
                dataset
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn oecd_v1() -> Value {
        json!({
            "label": "Unemployment rate in the OECD countries 2003-2014",
            "source": "Economic Outlook No 92 - December 2012 - OECD Annual Projections",
            "updated": "2012-11-27",
            "value": [5.9, 6.1, null, 4.3, 4.8, 4.4],
            "status": {"2": "e"},
            "dimension": {
                "id": ["area", "year"],
                "size": [2, 3],
                "role": {"geo": ["area"], "time": ["year"]},
                "area": {
                    "label": "OECD countries, EU15 and total",
                    "category": {
                        "index": {"AU": 0, "AT": 1},
                        "label": {"AU": "Australia", "AT": "Austria"}
                    }
                },
                "year": {
                    "label": "2003-2014",
                    "category": {"index": {"2003": 0, "2004": 1, "2005": 2}}
                }
            }
        })
    }

    #[test]
    fn test_parse_v1_dataset() {
        let dataset = parse_dataset_v1(Some("oecd"), &oecd_v1()).unwrap();

        assert_eq!(dataset.name(), Some("oecd"));
        assert_eq!(dataset.len(), 6);
        assert_eq!(dataset.updated(), Some("2012-11-27"));
        assert_eq!(dataset.dimension("area").unwrap().role(), Some(Role::Geo));
        assert_eq!(dataset.value(&[("area", "AT"), ("year", "2003")]).unwrap(), Some(4.3));
        assert_eq!(dataset.value(&[("area", "AU"), ("year", "2005")]).unwrap(), None);
        assert_eq!(dataset.status_at(2), Some("e"));
    }

    #[test]
    fn test_v1_name_falls_back_to_label() {
        let dataset = parse_dataset_v1(None, &oecd_v1()).unwrap();
        assert_eq!(dataset.name(), Some("Unemployment rate in the OECD countries 2003-2014"));
    }

    #[test]
    fn test_incorrect_data_size() {
        let mut json = oecd_v1();
        json["value"] = json!([1, 2, 3, 4]);
        json["status"] = Value::Null;
        let err = parse_dataset_v1(Some("oecd"), &json).unwrap_err();
        assert!(matches!(err, JsonStatError::MalformedDataset { .. }));
        assert!(err.to_string().contains("size 4"));
    }

    #[test]
    fn test_missing_keys() {
        let err = parse_dataset_v1(Some("x"), &json!({"label": "three dimensions"})).unwrap_err();
        assert!(err.to_string().contains("missing 'dimension' key"));

        let mut json = oecd_v1();
        json.as_object_mut().unwrap().remove("value");
        let err = parse_dataset_v1(Some("x"), &json).unwrap_err();
        assert!(err.to_string().contains("missing 'value' key"));

        let mut json = oecd_v1();
        json["dimension"].as_object_mut().unwrap().remove("size");
        let err = parse_dataset_v1(Some("x"), &json).unwrap_err();
        assert!(err.to_string().contains("dimension.size"));
    }

    #[test]
    fn test_parse_v2_sparse_values() {
        let json = json!({
            "version": "2.0",
            "class": "dataset",
            "label": "Population by sex",
            "id": ["sex", "year"],
            "size": [2, 2],
            "role": {"time": ["year"]},
            "value": {"0": 10, "3": 13},
            "status": ["p"],
            "dimension": {
                "sex": {"category": {"index": ["M", "F"], "label": {"M": "male", "F": "female"}}},
                "year": {"category": {"index": ["2011", "2012"]}}
            }
        });
        let dataset = parse_dataset_v2(&json).unwrap().unwrap();

        assert_eq!(dataset.values(), &[Some(10.0), None, None, Some(13.0)]);
        assert_eq!(dataset.status_at(1), Some("p"));
        assert_eq!(dataset.dimension("year").unwrap().role(), Some(Role::Time));
        assert_eq!(dataset.display_name(), "Population by sex");
    }

    #[test]
    fn test_v2_link_only_dataset() {
        let json = json!({"class": "dataset", "href": "https://json-stat.org/samples/oecd.json"});
        assert!(parse_dataset_v2(&json).unwrap().is_none());
    }

    #[test]
    fn test_non_numeric_value() {
        let mut json = oecd_v1();
        json["value"] = json!([1, 2, "..", 4, 5, 6]);
        let err = parse_dataset_v1(Some("oecd"), &json).unwrap_err();
        assert!(err.to_string().contains("is not a number"));
    }

    #[test]
    fn test_dense_status_size() {
        let mut json = oecd_v1();
        json["status"] = json!(["a", "b"]);
        let err = parse_dataset_v1(Some("oecd"), &json).unwrap_err();
        assert!(err.to_string().contains("status"));
    }
}
