//! Dimension and category parsing, shared by both format versions.

use crate::error::{JsonStatError, Result};
use crate::model::{Category, Dimension, Role};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Parse one entry of a `dimension` object.
///
/// `size` is the size announced by the dataset, when there is one; a
/// standalone dimension takes its size from the category list.
pub(crate) fn parse_dimension(
    id: &str,
    size: Option<usize>,
    role: Option<Role>,
    json: &Value,
) -> Result<Dimension> {
    let Some(obj) = json.as_object() else {
        return Err(JsonStatError::malformed_json(format!(
            "dimension '{}': expected an object",
            id
        )));
    };

    if let Some(class) = obj.get("class").and_then(|c| c.as_str()) {
        if class != "dimension" {
            return Err(JsonStatError::malformed_json(format!(
                "dimension '{}': class must be 'dimension', found '{}'",
                id, class
            )));
        }
    }

    let Some(category) = obj.get("category").and_then(|c| c.as_object()) else {
        return Err(JsonStatError::malformed_json(format!(
            "dimension '{}': missing category key",
            id
        )));
    };

    let categories = parse_categories(id, size, category)?;
    let mut dimension = Dimension::new(id, categories);

    if let Some(label) = obj.get("label").and_then(|l| l.as_str()) {
        dimension = dimension.with_label(label);
    }
    if let Some(role) = role {
        dimension = dimension.with_role(role);
    }

    Ok(dimension)
}

/// Build the ordered category list from `category.index` and `category.label`
fn parse_categories(
    id: &str,
    size: Option<usize>,
    category: &Map<String, Value>,
) -> Result<Vec<Category>> {
    let index = category.get("index");
    let labels = match category.get("label") {
        Some(Value::Object(labels)) => Some(labels),
        Some(_) => {
            return Err(JsonStatError::malformed_json(format!(
                "dimension '{}': category label must be an object",
                id
            )))
        }
        None => None,
    };

    let count = match (index, labels) {
        (Some(Value::Array(codes)), _) => codes.len(),
        (Some(Value::Object(codes)), _) => codes.len(),
        (Some(_), _) => {
            return Err(JsonStatError::malformed_json(format!(
                "dimension '{}': category index must be an array or an object",
                id
            )))
        }
        (None, Some(labels)) => labels.len(),
        (None, None) => {
            return Err(JsonStatError::malformed_json(format!(
                "dimension '{}': one of keys 'label' or 'index' must be present",
                id
            )))
        }
    };
    if let Some(size) = size.filter(|&size| size != count) {
        return Err(JsonStatError::malformed_json(format!(
            "dimension '{}': number of indexes {} does not match size {}",
            id, count, size
        )));
    }

    let mut slots: Vec<Option<Category>> = vec![None; count];
    let mut code_to_pos: HashMap<String, usize> = HashMap::new();

    match (index, labels) {
        (Some(Value::Array(codes)), _) => {
            for (pos, code) in codes.iter().enumerate() {
                let Some(code) = code.as_str() else {
                    return Err(JsonStatError::malformed_json(format!(
                        "dimension '{}': index entry {} is not a string",
                        id, pos
                    )));
                };
                place(id, &mut slots, &mut code_to_pos, code, pos)?;
            }
        }
        (Some(Value::Object(codes)), _) => {
            for (code, pos) in codes {
                let Some(pos) = pos.as_u64() else {
                    return Err(JsonStatError::malformed_json(format!(
                        "dimension '{}': index of '{}' is not a position",
                        id, code
                    )));
                };
                place(id, &mut slots, &mut code_to_pos, code, pos as usize)?;
            }
        }
        (None, Some(labels)) => {
            // label-only categories are ordered as written
            for (pos, code) in labels.keys().enumerate() {
                place(id, &mut slots, &mut code_to_pos, code, pos)?;
            }
        }
        _ => {}
    }

    if let Some(labels) = labels {
        if labels.len() > code_to_pos.len() {
            return Err(JsonStatError::malformed_json(format!(
                "dimension '{}': more labels ({}) than indexes ({})",
                id,
                labels.len(),
                code_to_pos.len()
            )));
        }
        for (code, label) in labels {
            let Some(&pos) = code_to_pos.get(code) else {
                return Err(JsonStatError::malformed_json(format!(
                    "dimension '{}': label {} is associated with index '{}' that does not exist",
                    id, label, code
                )));
            };
            let Some(label) = label.as_str() else {
                return Err(JsonStatError::malformed_json(format!(
                    "dimension '{}': label of '{}' is not a string",
                    id, code
                )));
            };
            if let Some(category) = slots[pos].as_mut() {
                category.label = Some(label.to_string());
            }
        }
    }

    if code_to_pos.len() != count {
        return Err(JsonStatError::malformed_json(format!(
            "dimension '{}': {} distinct indexes for {} categories",
            id,
            code_to_pos.len(),
            count
        )));
    }

    slots
        .into_iter()
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| JsonStatError::malformed_json(format!("dimension '{}': hole in index", id)))
}

fn place(
    id: &str,
    slots: &mut [Option<Category>],
    code_to_pos: &mut HashMap<String, usize>,
    code: &str,
    pos: usize,
) -> Result<()> {
    if pos >= slots.len() {
        return Err(JsonStatError::malformed_json(format!(
            "dimension '{}': index {} of '{}' is greater than size {}",
            id,
            pos,
            code,
            slots.len()
        )));
    }
    slots[pos] = Some(Category::new(code));
    code_to_pos.insert(code.to_string(), pos);
    Ok(())
}
