//! Plot and table views for the UI layer.
//!
//! Turns normalized entries into what the UI draws: display titles, axis
//! labels with unit conversion, one point series per sub-curve and the
//! life-stage split marker. Rendering itself happens elsewhere.

use crate::config::CatalogConfig;
use crate::curve::{Sample, StatCurve};
use crate::document::display_name;
use crate::error::StatError;
use crate::synth::{Provenance, VirtualCurve};
use crate::table::StatTable;
use serde::Serialize;

/// Raw speeds are exported in cm/s.
pub const CM_PER_S_TO_KM_PER_H: f64 = 0.036;

/// Display unit of a stat, inferred from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Unit {
    Plain,
    KilometersPerHour,
    Kilograms,
    Damage,
}

impl Unit {
    pub fn infer(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.contains("speed") {
            Unit::KilometersPerHour
        } else if lower.contains("weight") {
            Unit::Kilograms
        } else {
            Unit::Plain
        }
    }

    /// Multiplier from exported values to display values.
    pub fn factor(self) -> f64 {
        match self {
            Unit::KilometersPerHour => CM_PER_S_TO_KM_PER_H,
            Unit::Plain | Unit::Kilograms | Unit::Damage => 1.0,
        }
    }

    pub fn axis_label(self) -> &'static str {
        match self {
            Unit::Plain => "Value",
            Unit::KilometersPerHour => "Value (km/h)",
            Unit::Kilograms => "Value (kg)",
            Unit::Damage => "Damage",
        }
    }
}

/// One line of a plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotSeries {
    pub label: String,
    pub points: Vec<Sample>,
}

impl PlotSeries {
    /// The point closest in growth to `growth`, for tooltips.
    pub fn nearest(&self, growth: f64) -> Option<Sample> {
        self.points
            .iter()
            .copied()
            .min_by(|a, b| (a.growth - growth).abs().total_cmp(&(b.growth - growth).abs()))
    }
}

/// Everything needed to draw one growth plot.
///
/// # Examples
///
/// ```rust
/// use curvestat::curve::{Curve, NamedCurve, StatCurve};
/// use curvestat::plot::PlotView;
/// use curvestat::CatalogConfig;
///
/// let speed = StatCurve {
///     name: "RunSpeed".into(),
///     series: vec![NamedCurve {
///         label: "Senior".into(),
///         curve: Curve::from_samples([(0.0, 500.0), (1.0, 1000.0)]),
///     }],
/// };
/// let view = PlotView::from_curve(&speed, &CatalogConfig::default()).unwrap();
///
/// assert_eq!(view.title, "Run Speed");
/// assert_eq!(view.y_label, "Value (km/h)");
/// assert!((view.series[0].points[1].value - 36.0).abs() < 1e-9);
/// assert_eq!(view.markers, [0.75]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotView {
    pub title: String,
    pub y_label: String,
    pub series: Vec<PlotSeries>,
    /// Vertical marker lines, as growth coordinates.
    pub markers: Vec<f64>,
    /// Set for virtual curves.
    pub provenance: Option<Provenance>,
}

impl PlotView {
    /// Plot of a curve file, one series per plottable sub-curve.
    ///
    /// `Weight` and `Scale` curves ending before growth 1.0 hold their
    /// last value up to 1.0.
    ///
    /// # Errors
    ///
    /// `InsufficientSamples` when no sub-curve is plottable.
    pub fn from_curve(curve: &StatCurve, config: &CatalogConfig) -> Result<Self, StatError> {
        let unit = Unit::infer(&curve.name);
        let hold_to_end = matches!(curve.name.to_lowercase().as_str(), "weight" | "scale");

        let series: Vec<PlotSeries> = curve
            .series
            .iter()
            .filter(|s| s.curve.is_plottable())
            .map(|s| {
                let mut points: Vec<Sample> = s
                    .curve
                    .map_values(|v| v * unit.factor())
                    .samples()
                    .to_vec();
                let last = points.last().copied();
                if hold_to_end {
                    if let Some(last) = last.filter(|p| p.growth < 1.0) {
                        points.push(Sample {
                            growth: 1.0,
                            value: last.value,
                        });
                    }
                }
                PlotSeries {
                    label: s.label.clone(),
                    points,
                }
            })
            .collect();

        if series.is_empty() {
            let count = curve.series.iter().map(|s| s.curve.len()).max().unwrap_or(0);
            return Err(StatError::InsufficientSamples { count });
        }

        Ok(Self {
            title: display_name(&curve.name),
            y_label: unit.axis_label().to_string(),
            series,
            markers: vec![config.elder_split],
            provenance: None,
        })
    }

    /// Plot of a virtual curve, labelled with its provenance.
    pub fn from_virtual(curve: &VirtualCurve, config: &CatalogConfig) -> Self {
        let unit = if curve.provenance.is_attack() {
            Unit::Damage
        } else {
            Unit::Plain
        };
        Self {
            title: curve.display_name.clone(),
            y_label: unit.axis_label().to_string(),
            series: curve
                .series
                .iter()
                .map(|s| PlotSeries {
                    label: s.label.clone(),
                    points: s.curve.samples().to_vec(),
                })
                .collect(),
            markers: vec![config.elder_split],
            provenance: Some(curve.provenance.clone()),
        }
    }

    /// Tooltip body for a hovered point.
    pub fn tooltip_text(&self, point: Sample) -> String {
        format!("Time: {:.2}\n{}: {:.2}", point.growth, self.y_label, point.value)
    }
}

/// Rows of a table, formatted for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    pub title: String,
    pub rows: Vec<(String, String)>,
}

impl TableView {
    pub fn from_table(table: &StatTable) -> Self {
        Self {
            title: display_name(&table.name),
            rows: table
                .rows
                .iter()
                .map(|r| (r.label.clone(), r.value.to_string()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{Curve, NamedCurve};
    use crate::synth::synthesize;
    use crate::table::{RowValue, TableRow};

    fn stat_curve(name: &str, series: &[&[(f64, f64)]]) -> StatCurve {
        StatCurve {
            name: name.into(),
            series: series
                .iter()
                .enumerate()
                .map(|(i, samples)| NamedCurve {
                    label: format!("S{}", i),
                    curve: Curve::from_samples(samples.iter().copied()),
                })
                .collect(),
        }
    }

    #[test]
    fn test_unit_inference() {
        assert_eq!(Unit::infer("RunSpeed"), Unit::KilometersPerHour);
        assert_eq!(Unit::infer("Weight"), Unit::Kilograms);
        assert_eq!(Unit::infer("Stamina"), Unit::Plain);
        assert_eq!(Unit::Kilograms.factor(), 1.0);
    }

    #[test]
    fn test_weight_held_to_end() {
        let weight = stat_curve("Weight", &[&[(0.0, 100.0), (0.6, 3500.0)]]);
        let view = PlotView::from_curve(&weight, &CatalogConfig::default()).unwrap();
        let last = view.series[0].points.last().copied().unwrap();
        assert_eq!(last, Sample { growth: 1.0, value: 3500.0 });
        assert_eq!(view.y_label, "Value (kg)");

        let stamina = stat_curve("Stamina", &[&[(0.0, 100.0), (0.6, 200.0)]]);
        let view = PlotView::from_curve(&stamina, &CatalogConfig::default()).unwrap();
        assert_eq!(view.series[0].points.len(), 2);
    }

    #[test]
    fn test_unplottable_curve_rejected() {
        let scale = stat_curve("Scale", &[&[(0.2, 1.0)], &[]]);
        let err = PlotView::from_curve(&scale, &CatalogConfig::default()).unwrap_err();
        assert_eq!(err, StatError::InsufficientSamples { count: 1 });
    }

    #[test]
    fn test_virtual_view_and_tooltip() {
        let table = StatTable {
            name: "BalanceAttributes".into(),
            rows: vec![TableRow {
                label: "Damage.Bite".into(),
                value: RowValue::Number(120.0),
            }],
        };
        let curve = stat_curve("AttackPower", &[&[(0.0, 0.5), (0.5, 0.8), (1.0, 1.0)]]);
        let derived = synthesize(&table, &curve).unwrap();

        let view = PlotView::from_virtual(&derived, &CatalogConfig::default());
        assert_eq!(view.y_label, "Damage");
        assert_eq!(view.title, "Bite Attack");
        assert!(view.provenance.is_some());

        let point = view.series[0].nearest(0.45).unwrap();
        assert_eq!(point.growth, 0.5);
        assert_eq!(view.tooltip_text(point), "Time: 0.50\nDamage: 96.00");
    }

    #[test]
    fn test_table_view() {
        let table = StatTable {
            name: "BalanceAttributes".into(),
            rows: vec![
                TableRow {
                    label: "Health".into(),
                    value: RowValue::Number(900.0),
                },
                TableRow {
                    label: "Diet".into(),
                    value: RowValue::Text("Carnivore".into()),
                },
            ],
        };
        let view = TableView::from_table(&table);
        assert_eq!(view.title, "Balance Attributes");
        assert_eq!(
            view.rows,
            [
                ("Health".to_string(), "900".to_string()),
                ("Diet".to_string(), "Carnivore".to_string())
            ]
        );
    }
}
