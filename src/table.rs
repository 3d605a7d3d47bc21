//! Attribute tables.
//!
//! A `StatTable` is the flat, ordered view of a Table-shaped document.
//! Rows keep the declaration order of the source file; nested values are
//! flattened into one row per leaf with a composite label.

use crate::document::{self, as_number, StatFile};
use crate::error::StatError;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Field holding the value of a row in Unreal balance tables.
pub const ROW_VALUE_FIELD: &str = "AttributePercentageValues";

/// Value of a table row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RowValue {
    Number(f64),
    Text(String),
}

impl RowValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RowValue::Number(n) => Some(*n),
            RowValue::Text(_) => None,
        }
    }
}

impl fmt::Display for RowValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowValue::Number(n) => write!(f, "{}", n),
            RowValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// One labelled table row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub label: String,
    pub value: RowValue,
}

/// A normalized table file.
///
/// # Examples
///
/// ```rust
/// use curvestat::{CatalogConfig, SpeciesId, StatFile};
/// use curvestat::table::{extract_table, RowValue};
/// use serde_json::json;
/// use std::path::Path;
///
/// let file = StatFile::from_document(
///     Path::new("DT_AllosaurusBalanceAttributes.json"),
///     &SpeciesId::new("Allosaurus"),
///     json!({ "Health": 900, "Diet": "Carnivore", "Speeds": [400, "650"] }),
///     &CatalogConfig::default(),
/// );
/// let table = extract_table(&file).unwrap();
///
/// let labels: Vec<&str> = table.rows.iter().map(|r| r.label.as_str()).collect();
/// assert_eq!(labels, ["Health", "Diet", "Speeds.0", "Speeds.1"]);
/// assert_eq!(table.get("Speeds.1"), Some(&RowValue::Number(650.0)));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatTable {
    pub name: String,
    pub rows: Vec<TableRow>,
}

impl StatTable {
    /// Value of the first row with this label.
    pub fn get(&self, label: &str) -> Option<&RowValue> {
        self.rows
            .iter()
            .find(|r| r.label == label)
            .map(|r| &r.value)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Extract the rows of a Table-shaped file.
///
/// Unreal `Rows` tables use each row's `AttributePercentageValues` as the
/// row value; every other shape is flattened field by field.
pub fn extract_table(file: &StatFile) -> Result<StatTable, StatError> {
    let body = document::body(&file.document);
    let mut rows = Vec::new();

    if let Some(table_rows) = body.get("Rows").and_then(Value::as_object) {
        for (key, row) in table_rows {
            match row.get(ROW_VALUE_FIELD) {
                Some(value) => flatten(key, value, &mut rows),
                None => flatten(key, row, &mut rows),
            }
        }
    } else if let Some(fields) = body.as_object() {
        for (key, value) in fields {
            flatten(key, value, &mut rows);
        }
    } else {
        return Err(StatError::malformed(&file.path, "table is not a record"));
    }

    Ok(StatTable {
        name: file.name.clone(),
        rows,
    })
}

fn flatten(label: &str, value: &Value, rows: &mut Vec<TableRow>) {
    match value {
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                flatten(&format!("{}.{}", label, i), item, rows);
            }
        }
        Value::Object(fields) => {
            for (key, item) in fields {
                flatten(&format!("{}.{}", label, key), item, rows);
            }
        }
        scalar => {
            let value = match as_number(scalar) {
                Some(n) => RowValue::Number(n),
                None => RowValue::Text(match scalar {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                }),
            };
            rows.push(TableRow {
                label: label.to_string(),
                value,
            });
        }
    }
}
