//! Stat file classification.
//!
//! A `StatFile` is one parsed JSON export. The classifier decides once,
//! from the document's structure, whether it is a `Table` of static
//! attributes or a `Curve` of growth-indexed samples. Downstream code
//! only sees the normalized forms built from that decision.
//!
//! Two document families are understood:
//!
//! ```text
//! Unreal export   [ { "FloatCurves": [ { "Keys": [ { "Time": 0.0, "Value": 1.0 } ] } ] } ]
//!                 [ { "Properties": { "FloatCurve": { "Keys": [ ... ] } } } ]
//!                 [ { "Rows": { "Damage.Bite": { "AttributePercentageValues": 120 } } } ]
//! generic         [ { "Growth": 0.0, "Min": 1, "Max": 2 }, ... ]
//!                 { "samples": [ { "Time": 0.0, "Value": 1 } ] }
//!                 { "Health": 900, "Speeds": [400, 650] }
//! ```

use crate::config::CatalogConfig;
use crate::error::StatError;
use crate::species::SpeciesId;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Field names accepted as the growth coordinate of a sample object.
pub const GROWTH_KEYS: [&str; 3] = ["time", "growth", "age"];

/// Structural kind of a stat file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StatKind {
    /// Flat record of named scalar attributes.
    Table,
    /// Growth-indexed samples.
    Curve,
    /// Neither; the file is skipped.
    Unknown,
}

/// One parsed JSON document belonging to a species.
#[derive(Debug, Clone, PartialEq)]
pub struct StatFile {
    pub species: SpeciesId,
    pub kind: StatKind,
    /// File stem with the export prefixes removed.
    pub name: String,
    pub path: PathBuf,
    pub document: Value,
}

impl StatFile {
    /// Read, parse and classify a file.
    ///
    /// The file is read fully in one call; no handle outlives it.
    pub fn read(path: &Path, species: &SpeciesId, config: &CatalogConfig) -> Result<Self, StatError> {
        let text = std::fs::read_to_string(path).map_err(|e| StatError::io(path, &e))?;
        let document: Value =
            serde_json::from_str(&text).map_err(|e| StatError::malformed(path, e.to_string()))?;
        Ok(Self::from_document(path, species, document, config))
    }

    /// Classify an already parsed document.
    pub fn from_document(
        path: &Path,
        species: &SpeciesId,
        document: Value,
        config: &CatalogConfig,
    ) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let kind = classify_with(&document, &file_name, config);
        Self {
            species: species.clone(),
            kind,
            name: stat_name(&file_name, species.as_str(), config),
            path: path.to_path_buf(),
            document,
        }
    }
}

/// Classify a document using the default naming conventions.
///
/// # Examples
///
/// ```rust
/// use curvestat::{classify, StatKind};
/// use serde_json::json;
///
/// let curve = json!([{ "FloatCurves": [{ "Keys": [
///     { "Time": 0.0, "Value": 0.5 },
///     { "Time": 1.0, "Value": 1.0 }
/// ] }] }]);
/// assert_eq!(classify(&curve, "ATT_Allosaurus_AttackPower.json"), StatKind::Curve);
///
/// let table = json!({ "Health": 900, "Diet": "Carnivore" });
/// assert_eq!(classify(&table, "stats.json"), StatKind::Table);
///
/// assert_eq!(classify(&json!(42), "odd.json"), StatKind::Unknown);
/// ```
pub fn classify(document: &Value, file_name: &str) -> StatKind {
    classify_with(document, file_name, &CatalogConfig::default())
}

/// Classify a document, taking the file name conventions from `config`.
///
/// The name hint is only a fast path: it is taken when the content has
/// the hinted shape, otherwise structure decides.
pub fn classify_with(document: &Value, file_name: &str, config: &CatalogConfig) -> StatKind {
    if let Some(hint) = name_hint(file_name, config) {
        let satisfied = match hint {
            StatKind::Curve => looks_like_curve(document),
            StatKind::Table => looks_like_table(document),
            StatKind::Unknown => false,
        };
        if satisfied {
            return hint;
        }
        debug!(file_name, ?hint, "name hint contradicted by content");
    }

    if looks_like_curve(document) {
        StatKind::Curve
    } else if looks_like_table(document) {
        StatKind::Table
    } else {
        StatKind::Unknown
    }
}

fn name_hint(file_name: &str, config: &CatalogConfig) -> Option<StatKind> {
    if file_name.contains(config.balance_suffix.as_str())
        || file_name.starts_with(config.table_prefix.as_str())
    {
        Some(StatKind::Table)
    } else if file_name.starts_with(config.curve_prefix.as_str()) || file_name.contains("AttackPower")
    {
        Some(StatKind::Curve)
    } else {
        None
    }
}

fn looks_like_curve(document: &Value) -> bool {
    let body = body(document);
    if let Some(curves) = unreal_curves(body) {
        return !curves.is_empty() && curves.iter().all(|c| c.get("Keys").is_some_and(Value::is_array));
    }
    sample_rows(body).is_some()
}

fn looks_like_table(document: &Value) -> bool {
    let body = body(document);
    if let Some(rows) = body.get("Rows").and_then(Value::as_object) {
        return rows.values().all(is_scalar_tree);
    }
    match body {
        Value::Object(fields) => !fields.is_empty() && fields.values().all(is_scalar_tree),
        _ => false,
    }
}

/// Scalars, and arrays/records of scalars that are not sample arrays.
fn is_scalar_tree(value: &Value) -> bool {
    match value {
        Value::Array(items) => !is_sample_array(value) && items.iter().all(is_scalar_tree),
        Value::Object(fields) => fields.values().all(is_scalar_tree),
        _ => true,
    }
}

/// The object carrying the payload of an Unreal export, or the document itself.
///
/// Unreal exports wrap their single asset in a one-element array.
pub(crate) fn body(document: &Value) -> &Value {
    if let Some(first) = document.as_array().and_then(|items| items.first()) {
        if let Some(obj) = first.as_object() {
            if ["FloatCurves", "Properties", "Rows"].iter().any(|k| obj.contains_key(*k)) {
                return first;
            }
        }
    }
    document
}

/// The `FloatCurves` of an Unreal curve asset, if the body is one.
pub(crate) fn unreal_curves(body: &Value) -> Option<Vec<&Value>> {
    if let Some(curves) = body.get("FloatCurves").and_then(Value::as_array) {
        return Some(curves.iter().collect());
    }
    body.get("Properties")
        .and_then(|p| p.get("FloatCurve"))
        .filter(|c| c.is_object())
        .map(|c| vec![c])
}

/// The array of sample objects in a generic curve document.
pub(crate) fn sample_rows(body: &Value) -> Option<&Vec<Value>> {
    match body {
        Value::Array(items) if is_sample_array(body) => Some(items),
        Value::Object(fields) => fields
            .values()
            .find(|v| is_sample_array(v))
            .and_then(Value::as_array),
        _ => None,
    }
}

fn is_sample_array(value: &Value) -> bool {
    match value.as_array() {
        Some(items) if !items.is_empty() => items.iter().all(|item| {
            item.as_object()
                .is_some_and(|obj| growth_key(obj).is_some() && obj.len() >= 2)
        }),
        _ => false,
    }
}

/// The growth field of a sample object (`Time`, `Growth` or `Age`, any case).
pub(crate) fn growth_key(obj: &Map<String, Value>) -> Option<&str> {
    obj.keys()
        .find(|k| GROWTH_KEYS.iter().any(|g| k.eq_ignore_ascii_case(g)))
        .map(String::as_str)
}

/// Read a JSON number or numeric string as `f64`.
///
/// # Examples
///
/// ```rust
/// use curvestat::document::as_number;
/// use serde_json::json;
///
/// assert_eq!(as_number(&json!(1.5)), Some(1.5));
/// assert_eq!(as_number(&json!(" 120 ")), Some(120.0));
/// assert_eq!(as_number(&json!("Bite")), None);
/// ```
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Derive the catalog name of a file.
///
/// `ATT_<Species>_AttackPower.json` becomes `AttackPower` and
/// `DT_<Species>BalanceAttributes.json` becomes `BalanceAttributes`.
/// Names without a known prefix keep their stem.
pub fn stat_name(file_name: &str, species: &str, config: &CatalogConfig) -> String {
    let stem = file_name
        .strip_suffix(".json")
        .or_else(|| file_name.strip_suffix(".JSON"))
        .unwrap_or(file_name);

    let curve_prefix = format!("{}{}_", config.curve_prefix, species);
    let table_prefix = format!("{}{}", config.table_prefix, species);

    let name = if let Some(rest) = stem.strip_prefix(curve_prefix.as_str()) {
        rest
    } else if let Some(rest) = stem.strip_prefix(table_prefix.as_str()) {
        rest.trim_start_matches('_')
    } else if let Some(rest) = stem.strip_prefix(config.curve_prefix.as_str()) {
        rest
    } else {
        stem
    };

    if name.is_empty() {
        stem.to_string()
    } else {
        name.to_string()
    }
}

/// Human-readable form of a catalog name.
///
/// Underscores and dots become spaces and CamelCase words are split.
///
/// # Examples
///
/// ```rust
/// use curvestat::document::display_name;
///
/// assert_eq!(display_name("BalanceAttributes"), "Balance Attributes");
/// assert_eq!(display_name("Bite_AttackPower"), "Bite Attack Power");
/// assert_eq!(display_name("HP"), "HP");
/// ```
pub fn display_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev: Option<char> = None;
    for c in name.chars() {
        let c = if c == '_' || c == '.' { ' ' } else { c };
        if c.is_uppercase() && prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit()) {
            out.push(' ');
        }
        if !(c == ' ' && (out.is_empty() || out.ends_with(' '))) {
            out.push(c);
        }
        prev = Some(c);
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn unreal_curve() -> Value {
        json!([{
            "Type": "CurveFloat",
            "Properties": { "FloatCurve": { "Keys": [
                { "Time": 0.0, "Value": 10.0 },
                { "Time": 1.0, "Value": 20.0 }
            ] } }
        }])
    }

    #[test]
    fn test_classify_unreal_shapes() {
        assert_eq!(classify(&unreal_curve(), "ATT_Allosaurus_Stamina.json"), StatKind::Curve);

        let table = json!([{ "Rows": {
            "Damage.Bite": { "AttributePercentageValues": 120.0 },
            "Health": { "AttributePercentageValues": 900 }
        } }]);
        assert_eq!(
            classify(&table, "DT_AllosaurusBalanceAttributes.json"),
            StatKind::Table
        );
    }

    #[test]
    fn test_classify_generic_samples() {
        let rows = json!([
            { "Growth": 0.0, "Min": 1, "Max": 2 },
            { "Growth": 1.0, "Min": 3, "Max": 4 }
        ]);
        assert_eq!(classify(&rows, "speed.json"), StatKind::Curve);

        let nested = json!({ "unit": "cm/s", "samples": [ { "time": "0.5", "value": "3" } ] });
        assert_eq!(classify(&nested, "speed.json"), StatKind::Curve);
    }

    #[test]
    fn test_hint_contradicted_by_content() {
        // Named like a table, shaped like a curve.
        assert_eq!(
            classify(&unreal_curve(), "DT_AllosaurusBalanceAttributes.json"),
            StatKind::Curve
        );
        // Named like a curve, shaped like a table.
        let table = json!({ "Health": 900, "Weight": "3500" });
        assert_eq!(classify(&table, "ATT_Allosaurus_Weight.json"), StatKind::Table);
    }

    #[test]
    fn test_classify_unknown() {
        assert_eq!(classify(&json!([]), "a.json"), StatKind::Unknown);
        assert_eq!(classify(&json!({}), "a.json"), StatKind::Unknown);
        assert_eq!(classify(&json!("text"), "a.json"), StatKind::Unknown);
        assert_eq!(classify(&json!([1, 2, 3]), "a.json"), StatKind::Unknown);
    }

    #[test]
    fn test_stat_name() {
        let config = CatalogConfig::default();
        assert_eq!(
            stat_name("ATT_Allosaurus_AttackPower.json", "Allosaurus", &config),
            "AttackPower"
        );
        assert_eq!(
            stat_name("DT_AllosaurusBalanceAttributes.json", "Allosaurus", &config),
            "BalanceAttributes"
        );
        assert_eq!(
            stat_name("ATT_Stegosaurus_RunSpeed.json", "Allosaurus", &config),
            "Stegosaurus_RunSpeed"
        );
        assert_eq!(stat_name("Weight.json", "Allosaurus", &config), "Weight");
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("RunSpeed"), "Run Speed");
        assert_eq!(display_name("Damage.Bite"), "Damage Bite");
        assert_eq!(display_name("Stage2Weight"), "Stage2 Weight");
        assert_eq!(display_name("__odd__Name"), "odd Name");
    }

    #[test]
    fn test_as_number() {
        assert_eq!(as_number(&json!(3)), Some(3.0));
        assert_eq!(as_number(&json!("-0.25")), Some(-0.25));
        assert_eq!(as_number(&json!("NaN")), None);
        assert_eq!(as_number(&json!(true)), None);
        assert_eq!(as_number(&json!(null)), None);
    }
}
