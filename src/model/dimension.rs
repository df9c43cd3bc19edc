use crate::error::{JsonStatError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Role a dimension plays in its dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Time,
    Geo,
    Metric,
}

impl Role {
    pub fn from_name(name: &str) -> Option<Role> {
        match name {
            "time" => Some(Role::Time),
            "geo" => Some(Role::Geo),
            "metric" => Some(Role::Metric),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Time => "time",
            Role::Geo => "geo",
            Role::Metric => "metric",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value along a dimension: a code plus an optional display label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// The category code, the key used in the JSON-stat `index` object
    pub index: String,

    /// Human readable label, if the document provides one
    pub label: Option<String>,
}

impl Category {
    pub fn new(index: impl Into<String>) -> Self {
        Category {
            index: index.into(),
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The label when present, otherwise the code
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.index)
    }
}

/// One axis of a dataset.
///
/// Category order is the order of the mixed-radix digit this dimension
/// contributes to a flat value offset.
#[derive(Debug, Clone)]
pub struct Dimension {
    id: String,
    label: Option<String>,
    role: Option<Role>,
    categories: Vec<Category>,
    by_index: HashMap<String, usize>,
    by_label: HashMap<String, usize>,
}

impl Dimension {
    pub fn new(id: impl Into<String>, categories: Vec<Category>) -> Self {
        let mut by_index = HashMap::with_capacity(categories.len());
        let mut by_label = HashMap::new();
        for (pos, category) in categories.iter().enumerate() {
            by_index.insert(category.index.clone(), pos);
            if let Some(label) = &category.label {
                by_label.insert(label.clone(), pos);
            }
        }

        Dimension {
            id: id.into(),
            label: None,
            role: None,
            categories,
            by_index,
            by_label,
        }
    }

    /// Build a dimension whose categories have codes only
    pub fn from_codes<I, S>(id: impl Into<String>, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let categories = codes.into_iter().map(Category::new).collect();
        Self::new(id, categories)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// The label when present, otherwise the id
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    /// Number of categories
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, pos: usize) -> Option<&Category> {
        self.categories.get(pos)
    }

    /// Resolve a category code, a category label, or a numeric position
    /// (tried in that order) to a position.
    pub fn position(&self, spec: &str) -> Result<usize> {
        if let Some(&pos) = self.by_index.get(spec) {
            return Ok(pos);
        }
        if let Some(&pos) = self.by_label.get(spec) {
            return Ok(pos);
        }
        match spec.parse::<usize>() {
            Ok(pos) if pos < self.categories.len() => Ok(pos),
            _ => Err(JsonStatError::UnknownCategory {
                dimension: self.id.clone(),
                category: spec.to_string(),
            }),
        }
    }

    /// True when `spec` is this dimension's id or label
    pub fn matches(&self, spec: &str) -> bool {
        self.id == spec || self.label.as_deref() == Some(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn year() -> Dimension {
        Dimension::new(
            "year",
            vec![
                Category::new("2013").with_label("Year 2013"),
                Category::new("2014"),
            ],
        )
        .with_label("Year")
        .with_role(Role::Time)
    }

    #[test]
    fn test_display_label_falls_back() {
        let dim = year();
        assert_eq!(dim.category(0).unwrap().display_label(), "Year 2013");
        assert_eq!(dim.category(1).unwrap().display_label(), "2014");
        assert_eq!(dim.display_label(), "Year");
        assert_eq!(Dimension::from_codes("area", ["AU"]).display_label(), "area");
    }

    #[test]
    fn test_position_lookup() {
        let dim = year();
        assert_eq!(dim.position("2014").unwrap(), 1);
        assert_eq!(dim.position("Year 2013").unwrap(), 0);
        assert_eq!(dim.position("1").unwrap(), 1);

        let err = dim.position("1999").unwrap_err();
        assert!(matches!(err, JsonStatError::UnknownCategory { .. }));
    }

    #[test]
    fn test_role_names() {
        assert_eq!(Role::from_name("geo"), Some(Role::Geo));
        assert_eq!(Role::from_name("classification"), None);
        assert_eq!(Role::Metric.to_string(), "metric");
    }

    #[test]
    fn test_matches_id_or_label() {
        let dim = year();
        assert!(dim.matches("year"));
        assert!(dim.matches("Year"));
        assert!(!dim.matches("area"));
    }
}
