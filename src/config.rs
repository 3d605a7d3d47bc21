//! Catalog configuration.
//!
//! File-naming conventions of the exported data and a few presentation
//! options. Every field has a default matching the game's export layout,
//! so a config file only needs the fields it overrides.

use crate::error::StatError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the data folder looked up next to the executable.
pub const DEFAULT_ROOT_DIR: &str = "JSONs";

/// Configuration for loading and presenting a stat catalog.
///
/// # Examples
///
/// ```rust
/// use curvestat::CatalogConfig;
///
/// let config: CatalogConfig =
///     serde_json::from_str(r#"{ "hide_linear_curves": true }"#).unwrap();
/// assert!(config.hide_linear_curves);
/// assert_eq!(config.attributes_dir, "Attributes");
/// assert_eq!(config.elder_split, 0.75);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Sub-folder of a species folder holding the curve files.
    pub attributes_dir: String,
    /// Prefix of curve file names, followed by `<Species>_`.
    pub curve_prefix: String,
    /// Prefix of table file names, followed by `<Species>`.
    pub table_prefix: String,
    /// Suffix identifying the balance-attributes table.
    pub balance_suffix: String,
    /// Growth coordinates this close to `[0, 1]` are clamped instead of dropped.
    pub growth_tolerance: f64,
    /// Growth at which the elder life stage starts; drawn as a plot marker.
    pub elder_split: f64,
    /// Leave flat and straight-line curves out of `list`.
    pub hide_linear_curves: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            attributes_dir: "Attributes".to_string(),
            curve_prefix: "ATT_".to_string(),
            table_prefix: "DT_".to_string(),
            balance_suffix: "BalanceAttributes".to_string(),
            growth_tolerance: 1e-6,
            elder_split: 0.75,
            hide_linear_curves: false,
        }
    }
}

impl CatalogConfig {
    /// Read a configuration from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self, StatError> {
        let text = std::fs::read_to_string(path).map_err(|e| StatError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&text).map_err(|e| StatError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// The `JSONs` folder next to the running executable.
    ///
    /// Returns `None` when the executable path cannot be determined.
    pub fn default_root() -> Option<PathBuf> {
        let exe = std::env::current_exe().ok()?;
        Some(exe.parent()?.join(DEFAULT_ROOT_DIR))
    }
}
