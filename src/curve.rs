//! Growth curves.
//!
//! A `Curve` is an ordered list of `(growth, value)` samples over the
//! growth domain `[0, 1]`. Normalization clamps, de-duplicates and sorts
//! the raw samples of a file; queries interpolate linearly between
//! samples and clamp to the boundary values outside the stored domain.

use crate::document::{self, as_number, growth_key, sample_rows, unreal_curves, StatFile};
use crate::error::StatError;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::warn;

/// Default labels of the sub-curves of a multi-curve Unreal asset, in file order.
pub const LIFE_STAGES: [&str; 2] = ["Senior", "Elder"];

const SLOPE_EPSILON: f64 = 1e-9;

/// A single curve sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    pub growth: f64,
    pub value: f64,
}

/// Counters describing what normalization discarded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    /// Samples whose growth was outside `[0, 1]` beyond the tolerance.
    pub out_of_range: usize,
    /// Samples with a missing or non-numeric growth or value.
    pub invalid: usize,
    /// Samples replaced by a later sample at the same growth.
    pub duplicates: usize,
}

impl NormalizeReport {
    fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

/// Ordered, de-duplicated samples over `[0, 1]`.
///
/// # Examples
///
/// ```rust
/// use curvestat::Curve;
///
/// let curve = Curve::from_samples([(0.0, 10.0), (0.3, 10.0), (1.0, 20.0), (0.3, 15.0)]);
/// assert_eq!(curve.len(), 3);
/// assert_eq!(curve.value_at(0.3).unwrap(), 15.0);
/// assert!((curve.value_at(0.65).unwrap() - 17.5).abs() < 1e-9);
/// assert_eq!(curve.value_at(2.0).unwrap(), 20.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Curve {
    samples: Vec<Sample>,
}

impl Curve {
    /// Build a curve from raw `(growth, value)` pairs in source order.
    ///
    /// Growth values within `tolerance` of `[0, 1]` are clamped into it,
    /// the rest are dropped. When two samples share a growth value the
    /// later one wins. The result is sorted by growth.
    pub fn normalize<I>(raw: I, tolerance: f64) -> (Self, NormalizeReport)
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut report = NormalizeReport::default();
        let mut samples: Vec<Sample> = Vec::new();
        let mut index: HashMap<u64, usize> = HashMap::new();

        for (growth, value) in raw {
            if !growth.is_finite() || !value.is_finite() {
                report.invalid += 1;
                continue;
            }
            if growth < -tolerance || growth > 1.0 + tolerance {
                warn!(growth, "{}", StatError::OutOfRangeSample { growth });
                report.out_of_range += 1;
                continue;
            }
            // clamp, and fold -0.0 into 0.0 so both share one key
            let growth = growth.clamp(0.0, 1.0) + 0.0;

            match index.get(&growth.to_bits()) {
                Some(&i) => {
                    samples[i].value = value;
                    report.duplicates += 1;
                }
                None => {
                    index.insert(growth.to_bits(), samples.len());
                    samples.push(Sample { growth, value });
                }
            }
        }

        samples.sort_by(|a, b| a.growth.total_cmp(&b.growth));
        (Self { samples }, report)
    }

    /// Build a curve with the default clamping tolerance, discarding the report.
    pub fn from_samples<I>(raw: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        Self::normalize(raw, 1e-6).0
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// At least two samples.
    pub fn is_plottable(&self) -> bool {
        self.samples.len() >= 2
    }

    /// First and last growth coordinate.
    pub fn domain(&self) -> Option<(f64, f64)> {
        Some((self.samples.first()?.growth, self.samples.last()?.growth))
    }

    /// Value at `growth`.
    ///
    /// Exact sample hits return the stored value; between samples the
    /// value is interpolated linearly; outside the stored domain the
    /// nearest boundary value is returned.
    ///
    /// # Errors
    ///
    /// `InsufficientSamples` if the curve is not plottable, and
    /// `OutOfRangeSample` for a NaN query.
    pub fn value_at(&self, growth: f64) -> Result<f64, StatError> {
        let samples = &self.samples;
        if samples.len() < 2 {
            return Err(StatError::InsufficientSamples {
                count: samples.len(),
            });
        }
        if growth.is_nan() {
            return Err(StatError::OutOfRangeSample { growth });
        }

        let first = samples[0];
        let last = samples[samples.len() - 1];
        if growth <= first.growth {
            return Ok(first.value);
        }
        if growth >= last.growth {
            return Ok(last.value);
        }

        match samples.binary_search_by(|s| s.growth.total_cmp(&growth)) {
            Ok(i) => Ok(samples[i].value),
            Err(i) => {
                let (a, b) = (samples[i - 1], samples[i]);
                let t = (growth - a.growth) / (b.growth - a.growth);
                Ok(a.value + t * (b.value - a.value))
            }
        }
    }

    /// Whether the curve is flat or a single straight line.
    ///
    /// Curves with two samples or fewer are always linear.
    pub fn is_linear(&self) -> bool {
        let s = &self.samples;
        if s.len() <= 2 {
            return true;
        }
        let slope = |i: usize| (s[i].value - s[i - 1].value) / (s[i].growth - s[i - 1].growth);
        let first = slope(1);
        (2..s.len()).all(|i| (slope(i) - first).abs() <= SLOPE_EPSILON)
    }

    /// A curve on the same growth coordinates with each value mapped.
    pub fn map_values(&self, f: impl Fn(f64) -> f64) -> Curve {
        Curve {
            samples: self
                .samples
                .iter()
                .map(|s| Sample {
                    growth: s.growth,
                    value: f(s.value),
                })
                .collect(),
        }
    }
}

/// A labelled sub-curve of a curve file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedCurve {
    pub label: String,
    pub curve: Curve,
}

/// A normalized curve file: one or more named sub-curves.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatCurve {
    pub name: String,
    pub series: Vec<NamedCurve>,
}

impl StatCurve {
    /// Look up a sub-curve by label.
    pub fn series(&self, label: &str) -> Option<&Curve> {
        self.series
            .iter()
            .find(|s| s.label == label)
            .map(|s| &s.curve)
    }

    /// The first sub-curve.
    pub fn primary(&self) -> Option<&Curve> {
        self.series.first().map(|s| &s.curve)
    }

    /// At least one sub-curve can be plotted.
    pub fn is_plottable(&self) -> bool {
        self.series.iter().any(|s| s.curve.is_plottable())
    }

    /// Every sub-curve is flat or a straight line.
    pub fn is_linear(&self) -> bool {
        self.series.iter().all(|s| s.curve.is_linear())
    }
}

fn life_stage_label(index: usize) -> String {
    LIFE_STAGES
        .get(index)
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("Series {}", index + 1))
}

/// Normalize a Curve-shaped file into a `StatCurve`.
///
/// # Errors
///
/// `MalformedDocument` if the document has no growth-indexed samples.
pub fn normalize_curve(file: &StatFile, tolerance: f64) -> Result<StatCurve, StatError> {
    let body = document::body(&file.document);
    let mut raw_series: Vec<(String, Vec<(f64, f64)>)> = Vec::new();
    let mut invalid = 0usize;

    if let Some(curves) = unreal_curves(body) {
        for (i, curve) in curves.iter().enumerate() {
            let keys = curve
                .get("Keys")
                .and_then(Value::as_array)
                .ok_or_else(|| StatError::malformed(&file.path, "float curve without Keys"))?;
            let label = curve
                .get("Name")
                .or_else(|| curve.get("CurveName"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| life_stage_label(i));

            let mut raw = Vec::with_capacity(keys.len());
            for key in keys {
                match (
                    key.get("Time").and_then(as_number),
                    key.get("Value").and_then(as_number),
                ) {
                    (Some(g), Some(v)) => raw.push((g, v)),
                    _ => invalid += 1,
                }
            }
            raw_series.push((label, raw));
        }
    } else if let Some(rows) = sample_rows(body) {
        for row in rows.iter().filter_map(Value::as_object) {
            let Some(key) = growth_key(row) else {
                invalid += 1;
                continue;
            };
            let Some(growth) = row.get(key).and_then(as_number) else {
                invalid += 1;
                continue;
            };
            for (field, value) in row.iter().filter(|(k, _)| k.as_str() != key) {
                let Some(value) = as_number(value) else {
                    invalid += 1;
                    continue;
                };
                match raw_series.iter_mut().find(|(label, _)| label == field) {
                    Some((_, raw)) => raw.push((growth, value)),
                    None => raw_series.push((field.clone(), vec![(growth, value)])),
                }
            }
        }
    } else {
        return Err(StatError::malformed(&file.path, "no growth-indexed samples"));
    }

    if raw_series.is_empty() {
        return Err(StatError::malformed(&file.path, "curve has no series"));
    }
    if invalid > 0 {
        warn!(path = %file.path.display(), invalid, "dropped non-numeric samples");
    }

    let series = raw_series
        .into_iter()
        .map(|(label, raw)| {
            let (curve, report) = Curve::normalize(raw, tolerance);
            if !report.is_clean() {
                warn!(
                    path = %file.path.display(),
                    series = %label,
                    out_of_range = report.out_of_range,
                    duplicates = report.duplicates,
                    "normalized curve samples"
                );
            }
            if !curve.is_plottable() {
                warn!(path = %file.path.display(), series = %label, "curve is not plottable");
            }
            NamedCurve { label, curve }
        })
        .collect();

    Ok(StatCurve {
        name: file.name.clone(),
        series,
    })
}
