use crate::error::{JsonStatError, Result};
use crate::model::dimension::Dimension;
use std::collections::BTreeMap;

/// Per-cell status annotations, in the shapes JSON-stat allows
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Status {
    #[default]
    Absent,
    /// One status shared by every cell
    Uniform(String),
    /// One entry per cell
    Dense(Vec<Option<String>>),
    /// Flat offset -> status, missing offsets have no status
    Sparse(BTreeMap<usize, String>),
}

impl Status {
    pub fn get(&self, offset: usize) -> Option<&str> {
        match self {
            Status::Absent => None,
            Status::Uniform(status) => Some(status),
            Status::Dense(statuses) => statuses.get(offset).and_then(|s| s.as_deref()),
            Status::Sparse(statuses) => statuses.get(&offset).map(String::as_str),
        }
    }
}

/// A statistical table: ordered dimensions plus a flat value array.
///
/// Values are addressed in row-major order: the last dimension varies
/// fastest. A `Dataset` can only be built with a value count equal to the
/// product of the dimension sizes, and never changes afterwards.
#[derive(Debug, Clone)]
pub struct Dataset {
    name: Option<String>,
    label: Option<String>,
    source: Option<String>,
    updated: Option<String>,
    dimensions: Vec<Dimension>,
    values: Vec<Option<f64>>,
    status: Status,
    strides: Vec<usize>,
}

impl Dataset {
    pub fn new(dimensions: Vec<Dimension>, values: Vec<Option<f64>>) -> Result<Self> {
        Self::build(None, dimensions, values)
    }

    /// Like [`Dataset::new`], with the name used by collections and errors
    pub fn named(
        name: impl Into<String>,
        dimensions: Vec<Dimension>,
        values: Vec<Option<f64>>,
    ) -> Result<Self> {
        Self::build(Some(name.into()), dimensions, values)
    }

    fn build(
        name: Option<String>,
        dimensions: Vec<Dimension>,
        values: Vec<Option<f64>>,
    ) -> Result<Self> {
        let display = name.as_deref().unwrap_or("unnamed");
        let expected = expected_len(display, &dimensions)?;
        if values.len() != expected {
            return Err(JsonStatError::malformed_dataset(
                display,
                format!(
                    "size {} is different from size {} computed from dimensions",
                    values.len(),
                    expected
                ),
            ));
        }

        let strides = compute_strides(&dimensions);
        Ok(Dataset {
            name,
            label: None,
            source: None,
            updated: None,
            dimensions,
            values,
            status: Status::Absent,
            strides,
        })
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_updated(mut self, updated: impl Into<String>) -> Self {
        self.updated = Some(updated.into());
        self
    }

    /// Attach statuses; a dense list must have one entry per value
    pub fn with_status(mut self, status: Status) -> Result<Self> {
        if let Status::Dense(statuses) = &status {
            if statuses.len() != self.values.len() {
                return Err(JsonStatError::malformed_dataset(
                    self.display_name(),
                    format!(
                        "incorrect size of status field: {} statuses for {} values",
                        statuses.len(),
                        self.values.len()
                    ),
                ));
            }
        }
        self.status = status;
        Ok(self)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn updated(&self) -> Option<&str> {
        self.updated.as_deref()
    }

    /// Name, else label, else "unnamed"
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.label.as_deref())
            .unwrap_or("unnamed")
    }

    /// Number of values (cells)
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Offset multiplier of each dimension position
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Re-check the size invariant
    pub fn validate(&self) -> Result<()> {
        let expected = expected_len(self.display_name(), &self.dimensions)?;
        if self.values.len() != expected {
            return Err(JsonStatError::malformed_dataset(
                self.display_name(),
                format!(
                    "size {} is different from size {} computed from dimensions",
                    self.values.len(),
                    expected
                ),
            ));
        }
        Ok(())
    }

    /// Position of the dimension whose id or label is `spec`
    pub fn dimension_position(&self, spec: &str) -> Result<usize> {
        self.dimensions
            .iter()
            .position(|d| d.id() == spec)
            .or_else(|| self.dimensions.iter().position(|d| d.matches(spec)))
            .ok_or_else(|| JsonStatError::UnknownDimension {
                dataset: self.display_name().to_string(),
                dimension: spec.to_string(),
                known: self
                    .dimensions
                    .iter()
                    .map(Dimension::id)
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    pub fn dimension(&self, spec: &str) -> Result<&Dimension> {
        let pos = self.dimension_position(spec)?;
        Ok(&self.dimensions[pos])
    }

    /// Flat offset of a coordinate tuple
    pub fn offset(&self, coords: &[usize]) -> usize {
        coords
            .iter()
            .zip(&self.strides)
            .map(|(pos, stride)| pos * stride)
            .sum()
    }

    /// Decompose a flat offset into one position per dimension
    pub fn coordinates(&self, offset: usize) -> Vec<usize> {
        let mut coords = vec![0; self.dimensions.len()];
        let mut rest = offset;
        for (i, dim) in self.dimensions.iter().enumerate().rev() {
            let radix = dim.len();
            if radix == 0 {
                break;
            }
            coords[i] = rest % radix;
            rest /= radix;
        }
        coords
    }

    pub fn value_at(&self, coords: &[usize]) -> Option<f64> {
        self.values.get(self.offset(coords)).copied().flatten()
    }

    pub fn status_at(&self, offset: usize) -> Option<&str> {
        self.status.get(offset)
    }

    /// Look a value up by `(dimension, category)` pairs.
    ///
    /// Dimensions are matched by id or label, categories by code, label or
    /// position. Dimensions that are not named stay at their first category.
    pub fn value(&self, selection: &[(&str, &str)]) -> Result<Option<f64>> {
        let coords = self.resolve(selection)?;
        Ok(self.value_at(&coords))
    }

    pub(crate) fn resolve(&self, selection: &[(&str, &str)]) -> Result<Vec<usize>> {
        let mut coords = vec![0; self.dimensions.len()];
        for (dim_spec, cat_spec) in selection {
            let pos = self.dimension_position(dim_spec)?;
            coords[pos] = self.dimensions[pos].position(cat_spec)?;
        }
        Ok(coords)
    }
}

fn expected_len(dataset: &str, dimensions: &[Dimension]) -> Result<usize> {
    if dimensions.is_empty() {
        return Err(JsonStatError::malformed_dataset(dataset, "dataset has no dimensions"));
    }
    dimensions.iter().try_fold(1usize, |acc, dim| {
        acc.checked_mul(dim.len()).ok_or_else(|| {
            JsonStatError::malformed_dataset(dataset, "dimension sizes overflow the value index")
        })
    })
}

fn compute_strides(dimensions: &[Dimension]) -> Vec<usize> {
    let mut strides = vec![1; dimensions.len()];
    for i in (0..dimensions.len().saturating_sub(1)).rev() {
        strides[i] = strides[i + 1] * dimensions[i + 1].len();
    }
    strides
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::dimension::Category;

    fn area_year() -> Dataset {
        let area = Dimension::new(
            "area",
            vec![
                Category::new("AU").with_label("Australia"),
                Category::new("AT").with_label("Austria"),
            ],
        );
        let year = Dimension::from_codes("year", ["2012", "2013", "2014"]);
        let values = (0..6).map(|v| Some(v as f64)).collect();
        Dataset::named("oecd", vec![area, year], values).unwrap()
    }

    #[test]
    fn test_strides_are_row_major() {
        let dataset = area_year();
        assert_eq!(dataset.strides(), &[3, 1]);
        assert_eq!(dataset.offset(&[1, 2]), 5);
        assert_eq!(dataset.coordinates(4), vec![1, 1]);
    }

    #[test]
    fn test_value_lookup_by_code_and_label() {
        let dataset = area_year();
        assert_eq!(dataset.value(&[("area", "AT"), ("year", "2013")]).unwrap(), Some(4.0));
        assert_eq!(dataset.value(&[("area", "Australia"), ("year", "2014")]).unwrap(), Some(2.0));
        assert_eq!(dataset.value(&[("year", "2013")]).unwrap(), Some(1.0));
    }

    #[test]
    fn test_unknown_dimension() {
        let dataset = area_year();
        let err = dataset.value(&[("sex", "F")]).unwrap_err();
        match err {
            JsonStatError::UnknownDimension { known, .. } => assert_eq!(known, "area, year"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_size_mismatch_is_malformed() {
        let area = Dimension::from_codes("area", ["AU", "AT"]);
        let year = Dimension::from_codes("year", ["2012", "2013", "2014"]);
        let err = Dataset::new(vec![area, year], vec![Some(1.0), Some(2.0)]).unwrap_err();
        assert!(matches!(err, JsonStatError::MalformedDataset { .. }));
    }

    #[test]
    fn test_no_dimensions_is_malformed() {
        let err = Dataset::new(vec![], vec![Some(1.0)]).unwrap_err();
        assert!(matches!(err, JsonStatError::MalformedDataset { .. }));
    }

    #[test]
    fn test_status_shapes() {
        let dataset = area_year()
            .with_status(Status::Sparse(BTreeMap::from([(2, "e".to_string())])))
            .unwrap();
        assert_eq!(dataset.status_at(2), Some("e"));
        assert_eq!(dataset.status_at(3), None);

        let uniform = area_year().with_status(Status::Uniform("p".into())).unwrap();
        assert_eq!(uniform.status_at(5), Some("p"));

        let err = area_year()
            .with_status(Status::Dense(vec![Some("a".into())]))
            .unwrap_err();
        assert!(matches!(err, JsonStatError::MalformedDataset { .. }));
    }
}
