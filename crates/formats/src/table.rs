//! Tabular dataset model handed over by the host.
//!
//! Columns carry a display name, an optional format string and a list of
//! role tags; cells stay raw JSON values until ingestion. The engine never
//! sees the host's own dataset types, only this shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnSource {
    pub display_name: String,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl ColumnSource {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Identity column: market keys and location codes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryColumn {
    pub source: ColumnSource,
    #[serde(default)]
    pub values: Vec<Value>,
}

/// Measure column: coordinates, progress, state/thickness bands, tooltips.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueColumn {
    pub source: ColumnSource,
    #[serde(default)]
    pub values: Vec<Value>,
}

impl ValueColumn {
    pub fn number_at(&self, row: usize) -> Option<f64> {
        self.values.get(row).and_then(|v| v.as_f64())
    }

    pub fn value_at(&self, row: usize) -> Option<&Value> {
        self.values.get(row)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataTable {
    #[serde(default)]
    pub categories: Vec<CategoryColumn>,
    #[serde(default)]
    pub values: Vec<ValueColumn>,
}

#[derive(Debug)]
pub enum TableError {
    Parse(String),
}

impl std::fmt::Display for TableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableError::Parse(reason) => write!(f, "dataset parse error: {reason}"),
        }
    }
}

impl std::error::Error for TableError {}

impl DataTable {
    pub fn from_json_str(payload: &str) -> Result<Self, TableError> {
        serde_json::from_str(payload).map_err(|e| TableError::Parse(e.to_string()))
    }

    pub fn from_json_value(value: Value) -> Result<Self, TableError> {
        serde_json::from_value(value).map_err(|e| TableError::Parse(e.to_string()))
    }

    /// Row count, taken from the first category column.
    pub fn row_count(&self) -> usize {
        self.categories.first().map_or(0, |c| c.values.len())
    }

    /// Text of an identity cell. Numbers render as text; anything else
    /// (including a missing cell) is the empty string, which downstream
    /// drops the row.
    pub fn category_text(&self, column: usize, row: usize) -> String {
        match self.categories.get(column).and_then(|c| c.values.get(row)) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        }
    }
}
