use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static ASSIGNMENT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([^=]*[^=\s])\s*=\s*(\S(?:.*\S)?)\s*$").unwrap()
});

/// What the dimension cells of a table hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Content {
    /// Dimension labels in the header, category labels in the cells
    #[default]
    Label,
    /// Dimension ids in the header, category codes in the cells
    Id,
}

/// Configuration for building a table out of a dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableConfig {
    /// Labels or ids in header and cells
    pub content: Content,

    /// Header of the value column
    pub value_column: String,

    /// Dimension ids or labels from slowest to fastest varying; every
    /// dimension must appear exactly once
    pub order: Option<Vec<String>>,

    /// `(dimension, category)` pairs held fixed while the table is built
    pub blocked: Vec<(String, String)>,

    /// Leave out dimensions that have a single category
    pub drop_single_category: bool,

    /// Header of a trailing status column; no status column when unset
    pub status_column: Option<String>,

    /// Whether writers emit the header row
    pub header: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        TableConfig {
            content: Content::Label,
            value_column: String::from("Value"),
            order: None,
            blocked: vec![],
            drop_single_category: false,
            status_column: None,
            header: true,
        }
    }
}

impl TableConfig {
    pub fn with_blocked(
        mut self,
        dimension: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        self.blocked.push((dimension.into(), category.into()));
        self
    }
}

/// Split `dimension=category` into its two trimmed halves
pub fn parse_assignment(text: &str) -> Option<(String, String)> {
    let captures = ASSIGNMENT_REGEX.captures(text)?;
    Some((captures[1].to_string(), captures[2].to_string()))
}
