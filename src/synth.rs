//! Virtual curve synthesis.
//!
//! The game splits some derived quantities across two files: a static
//! base magnitude in the balance table and a growth-indexed multiplier in
//! a curve file. Synthesis recombines them into one curve in the units of
//! the derived quantity:
//!
//! ```text
//! derived(g) = base * curve.value_at(g)    for every native sample g
//! ```
//!
//! # Key extraction
//!
//! Labels and names are split into words on `.`, `_`, `-`, whitespace and
//! CamelCase boundaries (a lower-case letter or digit followed by an
//! upper-case letter), then lower-cased. `AttackPower` is `attack power`.
//! In table labels `damage` stands for `attack power` and the marker
//! `base` is dropped. A row is a base field when its label carries a
//! `base` or `damage` marker and its value is a finite non-zero number.
//!
//! A base field matches a curve when one token set contains the other.
//! A generic base damage therefore feeds every attack-specific curve, and
//! an attack-specific damage feeds the generic curve:
//!
//! | table label        | curve name         | rank        |
//! |--------------------|--------------------|-------------|
//! | `Damage.Bite`      | `Bite_AttackPower` | `Exact`     |
//! | `AttackPower_Base` | `Bite_AttackPower` | `Shared(1)` |
//! | `AttackPower_Base` | `TailAttackPower`  | `Shared(1)` |
//! | `Damage.Bite`      | `AttackPower`      | `Partial(1)`|
//! | `Damage.Tail`      | `Bite_AttackPower` | none        |

use crate::curve::{Curve, NamedCurve, StatCurve};
use crate::document::display_name;
use crate::error::StatError;
use crate::table::StatTable;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

const BASE_MARKER: &str = "base";
const DAMAGE_MARKER: &str = "damage";
const ATTACK_FAMILY: [&str; 2] = ["attack", "power"];

/// Words of a label or name, in order, with their original case.
pub(crate) fn words(label: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let segments = label
        .split(|c: char| c == '.' || c == '_' || c == '-' || c.is_whitespace())
        .filter(|s| !s.is_empty());
    for segment in segments {
        let mut start = 0;
        let mut prev: Option<char> = None;
        for (i, c) in segment.char_indices() {
            if c.is_uppercase() && prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit()) {
                words.push(&segment[start..i]);
                start = i;
            }
            prev = Some(c);
        }
        words.push(&segment[start..]);
    }
    words
}

fn is_marker(word: &str) -> bool {
    word.eq_ignore_ascii_case(BASE_MARKER) || word.eq_ignore_ascii_case(DAMAGE_MARKER)
}

/// Token set identifying the stat family a name or label refers to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SemanticKey(BTreeSet<String>);

impl SemanticKey {
    /// Key of a curve name: all of its tokens.
    pub fn of_curve(name: &str) -> Self {
        Self(words(name).into_iter().map(str::to_lowercase).collect())
    }

    /// Key of a table label, or `None` if the label is not a base field label.
    pub fn of_base_label(label: &str) -> Option<Self> {
        let mut is_base = false;
        let mut tokens = BTreeSet::new();
        for token in words(label).into_iter().map(str::to_lowercase) {
            match token.as_str() {
                BASE_MARKER => is_base = true,
                DAMAGE_MARKER => {
                    is_base = true;
                    tokens.extend(ATTACK_FAMILY.iter().map(|t| t.to_string()));
                }
                _ => {
                    tokens.insert(token);
                }
            }
        }
        is_base.then_some(Self(tokens))
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.0.contains(token)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Carries every token of the attack power family.
    pub fn is_attack(&self) -> bool {
        ATTACK_FAMILY.iter().all(|t| self.contains(t))
    }
}

/// How closely a base field matches a curve. Lower is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum MatchRank {
    /// Same token set.
    Exact,
    /// The curve carries this many tokens beyond the field's: a shared
    /// base value feeding a more specific curve.
    Shared(usize),
    /// The field carries this many tokens beyond the curve's.
    Partial(usize),
}

/// Rank of a (base field, curve) pair, or `None` when they do not match.
pub fn match_rank(field: &SemanticKey, curve: &SemanticKey) -> Option<MatchRank> {
    if field.is_empty() || curve.is_empty() {
        return None;
    }
    if field.0 == curve.0 {
        Some(MatchRank::Exact)
    } else if field.0.is_subset(&curve.0) {
        Some(MatchRank::Shared(curve.len() - field.len()))
    } else if curve.0.is_subset(&field.0) {
        Some(MatchRank::Partial(field.len() - curve.len()))
    } else {
        None
    }
}

/// A table row usable as the base value of a virtual curve.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseField {
    pub label: String,
    pub value: f64,
    pub key: SemanticKey,
}

/// All base fields of a table, in declaration order.
pub fn base_fields(table: &StatTable) -> Vec<BaseField> {
    table
        .rows
        .iter()
        .filter_map(|row| {
            let value = row.value.as_number().filter(|v| v.is_finite() && *v != 0.0)?;
            let key = SemanticKey::of_base_label(&row.label)?;
            Some(BaseField {
                label: row.label.clone(),
                value,
                key,
            })
        })
        .collect()
}

/// Base fields of `table` matching `curve_name`, best first.
///
/// Fields of equal rank keep table declaration order.
pub fn matching_fields(table: &StatTable, curve_name: &str) -> Vec<(BaseField, MatchRank)> {
    let curve_key = SemanticKey::of_curve(curve_name);
    let mut matches: Vec<(BaseField, MatchRank)> = base_fields(table)
        .into_iter()
        .filter_map(|field| {
            let rank = match_rank(&field.key, &curve_key)?;
            Some((field, rank))
        })
        .collect();
    matches.sort_by_key(|(_, rank)| *rank);
    matches
}

/// Combination applied to the base value and the curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Formula {
    /// `base * curve(growth)`
    Scale,
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::Scale => write!(f, "base × curve(growth)"),
        }
    }
}

/// Where a virtual curve came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Provenance {
    pub table: String,
    pub field: String,
    pub base: f64,
    pub curve: String,
    pub formula: Formula,
}

impl Provenance {
    /// The base field is an attack damage value.
    pub fn is_attack(&self) -> bool {
        SemanticKey::of_base_label(&self.field).is_some_and(|k| k.is_attack())
    }
}

/// A derived curve computed from a base value and a multiplier curve.
///
/// Has the same growth coordinates as the source curve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VirtualCurve {
    pub name: String,
    pub display_name: String,
    pub series: Vec<NamedCurve>,
    pub provenance: Provenance,
}

/// Synthesize from the best matching base field of `table`.
///
/// # Examples
///
/// ```rust
/// use curvestat::curve::{Curve, NamedCurve, StatCurve};
/// use curvestat::table::{RowValue, StatTable, TableRow};
/// use curvestat::synth::synthesize;
///
/// let table = StatTable {
///     name: "BalanceAttributes".into(),
///     rows: vec![TableRow {
///         label: "AttackPower_Base".into(),
///         value: RowValue::Number(120.0),
///     }],
/// };
/// let curve = StatCurve {
///     name: "Bite_AttackPower".into(),
///     series: vec![NamedCurve {
///         label: "Senior".into(),
///         curve: Curve::from_samples([(0.0, 0.5), (0.5, 0.8), (1.0, 1.0)]),
///     }],
/// };
///
/// let derived = synthesize(&table, &curve).unwrap();
/// let values: Vec<f64> = derived.series[0].curve.samples().iter().map(|s| s.value).collect();
/// assert_eq!(values, [60.0, 96.0, 120.0]);
/// assert_eq!(derived.display_name, "Bite Attack");
/// ```
pub fn synthesize(table: &StatTable, curve: &StatCurve) -> Result<VirtualCurve, StatError> {
    let (field, _) = matching_fields(table, &curve.name)
        .into_iter()
        .next()
        .ok_or_else(|| unavailable(table, curve, "no matching base field"))?;
    synthesize_with(table, &field, curve)
}

/// Synthesize from the named base field of `table`.
pub fn synthesize_field(
    table: &StatTable,
    field: &str,
    curve: &StatCurve,
) -> Result<VirtualCurve, StatError> {
    let (field, _) = matching_fields(table, &curve.name)
        .into_iter()
        .find(|(f, _)| f.label == field)
        .ok_or_else(|| unavailable(table, curve, &format!("{} does not match", field)))?;
    synthesize_with(table, &field, curve)
}

fn synthesize_with(
    table: &StatTable,
    field: &BaseField,
    curve: &StatCurve,
) -> Result<VirtualCurve, StatError> {
    let mut series = Vec::with_capacity(curve.series.len());
    for source in curve.series.iter().filter(|s| s.curve.is_plottable()) {
        let mut derived = Vec::with_capacity(source.curve.len());
        for sample in source.curve.samples() {
            let value = field.value * source.curve.value_at(sample.growth)?;
            if !value.is_finite() {
                return Err(unavailable(table, curve, "derived value is not finite"));
            }
            derived.push((sample.growth, value));
        }
        series.push(NamedCurve {
            label: source.label.clone(),
            curve: Curve::from_samples(derived),
        });
    }
    if series.is_empty() {
        return Err(unavailable(table, curve, "curve is not plottable"));
    }

    let name = virtual_name(&field.label, &curve.name);
    let provenance = Provenance {
        table: table.name.clone(),
        field: field.label.clone(),
        base: field.value,
        curve: curve.name.clone(),
        formula: Formula::Scale,
    };
    Ok(VirtualCurve {
        display_name: if provenance.is_attack() {
            attack_label(&name)
        } else {
            display_name(&name)
        },
        name,
        series,
        provenance,
    })
}

/// `<qualifier>_<curve>`: the field's own words not already named by the curve.
fn virtual_name(field: &str, curve: &str) -> String {
    let curve_key = SemanticKey::of_curve(curve);
    let mut parts: Vec<&str> = words(field)
        .into_iter()
        .filter(|w| !is_marker(w) && !curve_key.contains(&w.to_lowercase()))
        .collect();
    parts.push(curve);
    parts.join("_")
}

/// `Bite_AttackPower` reads `Bite Attack`; an unqualified name keeps its display form.
fn attack_label(name: &str) -> String {
    let qualifiers: Vec<&str> = words(name)
        .into_iter()
        .filter(|w| !ATTACK_FAMILY.contains(&w.to_lowercase().as_str()))
        .collect();
    if qualifiers.is_empty() {
        display_name(name)
    } else {
        format!("{} Attack", qualifiers.join(" "))
    }
}

fn unavailable(table: &StatTable, curve: &StatCurve, reason: &str) -> StatError {
    StatError::SynthesisUnavailable {
        table: table.name.clone(),
        curve: curve.name.clone(),
        reason: reason.to_string(),
    }
}
