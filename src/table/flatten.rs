//! The table flattener: one row per cell of a dataset.

use crate::error::Result;
use crate::model::Dataset;
use serde::Serialize;

/// One cell of a dataset: a category label per dimension, then the value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row<'a> {
    /// Category labels, in dataset dimension order
    pub labels: Vec<&'a str>,
    pub value: Option<f64>,
}

/// Flatten a dataset into rows, in row-major order.
///
/// Row `k` describes value `k`: the offset is split into one position per
/// dimension by mixed-radix division, with the last dimension as the
/// least significant digit. The result has exactly `dataset.len()` rows,
/// so a dimension without categories gives an empty table.
///
/// # Example
/// ```rust
/// use jsonstat::model::{Dataset, Dimension};
/// use jsonstat::table::flatten;
///
/// let a = Dimension::from_codes("A", ["a1", "a2"]);
/// let b = Dimension::from_codes("B", ["b1", "b2", "b3"]);
/// let values = (0..6).map(|v| Some(v as f64)).collect();
/// let dataset = Dataset::new(vec![a, b], values).unwrap();
///
/// let rows = flatten(&dataset).unwrap();
/// assert_eq!(rows[4].labels, vec!["a2", "b2"]);
/// assert_eq!(rows[4].value, Some(4.0));
/// ```
pub fn flatten(dataset: &Dataset) -> Result<Vec<Row<'_>>> {
    dataset.validate()?;

    let dimensions = dataset.dimensions();
    let mut rows = Vec::with_capacity(dataset.len());

    for (offset, value) in dataset.values().iter().enumerate() {
        let labels = dataset
            .coordinates(offset)
            .into_iter()
            .zip(dimensions)
            .map(|(pos, dim)| dim.categories()[pos].display_label())
            .collect();
        rows.push(Row {
            labels,
            value: *value,
        });
    }

    log::debug!("flattened '{}' into {} rows", dataset.display_name(), rows.len());
    Ok(rows)
}
