//! Dataset to table conversion
//!
//! [`flatten`] is the plain transformation: one [`Row`] per value, in
//! row-major order, category labels first and the value last.
//!
//! [`to_table`] builds a [`Table`] with a header and the options of
//! [`TableConfig`]: category codes instead of labels, a different
//! iteration order, fixed (blocked) dimensions, single-category columns
//! dropped, and a status column. With the default configuration its rows
//! are the rows of [`flatten`].

pub mod config;
pub mod flatten;
pub mod walk;
pub mod writer;

pub use config::{parse_assignment, Content, TableConfig};
pub use flatten::{flatten, Row};
pub use walk::Walk;
pub use writer::{write_table, JsonLinesWriter, OutputFormat, TableWriter};

use crate::error::{JsonStatError, Result};
use crate::model::{Dataset, Dimension};
use serde::Serialize;

/// A table built from a dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<TableRow>,
    /// Whether the last header field names a status column
    pub with_status: bool,
}

impl Table {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    /// One cell per kept dimension, in dataset dimension order
    pub fields: Vec<String>,
    pub value: Option<f64>,
    pub status: Option<String>,
}

impl TableRow {
    /// The row as text fields: dimension cells, value, optional status.
    /// A missing value or status is an empty field.
    pub fn record(&self, with_status: bool) -> Vec<String> {
        let mut record = self.fields.clone();
        record.push(self.value.map(format_value).unwrap_or_default());
        if with_status {
            record.push(self.status.clone().unwrap_or_default());
        }
        record
    }
}

/// Build a table out of `dataset` as `config` describes
pub fn to_table(dataset: &Dataset, config: &TableConfig) -> Result<Table> {
    dataset.validate()?;
    let dimensions = dataset.dimensions();

    let order = resolve_order(dataset, config.order.as_deref())?;
    let mut fixed = Vec::with_capacity(config.blocked.len());
    for (dim_spec, cat_spec) in &config.blocked {
        let dim = dataset.dimension_position(dim_spec)?;
        fixed.push((dim, dimensions[dim].position(cat_spec)?));
    }

    let kept: Vec<usize> = (0..dimensions.len())
        .filter(|&i| !(config.drop_single_category && dimensions[i].len() == 1))
        .collect();

    let mut header: Vec<String> = kept
        .iter()
        .map(|&i| dimension_header(&dimensions[i], config.content).to_string())
        .collect();
    header.push(config.value_column.clone());
    if let Some(status_column) = &config.status_column {
        header.push(status_column.clone());
    }

    let sizes = dimensions.iter().map(Dimension::len).collect();
    let mut rows = Vec::new();
    for coords in Walk::new(sizes, &order, &fixed) {
        let offset = dataset.offset(&coords);
        let fields = kept
            .iter()
            .map(|&i| category_cell(&dimensions[i], coords[i], config.content).to_string())
            .collect();
        let status = config
            .status_column
            .as_ref()
            .and_then(|_| dataset.status_at(offset))
            .map(str::to_string);
        rows.push(TableRow {
            fields,
            value: dataset.values()[offset],
            status,
        });
    }

    log::debug!(
        "built table for '{}': {} columns, {} rows",
        dataset.display_name(),
        header.len(),
        rows.len()
    );

    Ok(Table {
        header,
        rows,
        with_status: config.status_column.is_some(),
    })
}

/// Render a value the way JavaScript's `Number#toString` does: shortest
/// round-trip digits, exponent notation below 1e-6 and from 1e21 up.
pub fn format_value(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if !(1e-6..1e21).contains(&magnitude) && magnitude.is_finite() {
        let text = format!("{:e}", value);
        return match text.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => text,
        };
    }
    value.to_string()
}

/// Dimension positions from slowest to fastest varying
fn resolve_order(dataset: &Dataset, order: Option<&[String]>) -> Result<Vec<usize>> {
    let count = dataset.dimensions().len();
    let Some(order) = order else {
        return Ok((0..count).collect());
    };

    if order.len() != count {
        return Err(JsonStatError::InvalidOrder(format!(
            "{} dimensions given, the dataset has {}",
            order.len(),
            count
        )));
    }

    let mut seen = vec![false; count];
    let mut positions = Vec::with_capacity(count);
    for spec in order {
        let pos = dataset.dimension_position(spec)?;
        if seen[pos] {
            return Err(JsonStatError::InvalidOrder(format!(
                "dimension '{}' is listed twice",
                spec
            )));
        }
        seen[pos] = true;
        positions.push(pos);
    }
    Ok(positions)
}

fn dimension_header(dimension: &Dimension, content: Content) -> &str {
    match content {
        Content::Label => dimension.display_label(),
        Content::Id => dimension.id(),
    }
}

fn category_cell(dimension: &Dimension, pos: usize, content: Content) -> &str {
    let category = &dimension.categories()[pos];
    match content {
        Content::Label => category.display_label(),
        Content::Id => &category.index,
    }
}
