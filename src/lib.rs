//! # curvestat - Creature Stat Catalog & Virtual Curve Engine
//!
//! Reads the per-species JSON exports of a game's data tables and turns
//! them into something a stat browser can show:
//! - **Tables** of static attributes, in source declaration order
//! - **Curves** of growth-indexed samples, with linear interpolation
//! - **Virtual curves** that combine a base value from a table with a
//!   multiplier curve (e.g. bite damage across the growth cycle)
//!
//! ## Pipeline
//!
//! ```text
//! JSON file → [classify] → Curve → [normalize_curve] ─┐
//!                        → Table → [extract_table]  ──┼→ [StatCatalog] → [synthesize] → VirtualCurve
//!                        → Unknown (skipped)          │
//! ```
//!
//! ## Data layout
//!
//! ```text
//! <root>/
//!   Allosaurus/
//!     DT_AllosaurusBalanceAttributes.json
//!     Attributes/
//!       ATT_Allosaurus_AttackPower.json
//!       ATT_Allosaurus_RunSpeed.json
//! ```
//!
//! ## Example
//!
//! ```rust
//! use curvestat::*;
//! use std::fs;
//!
//! let root = tempfile::tempdir().unwrap();
//! let species = root.path().join("Allosaurus");
//! fs::create_dir_all(species.join("Attributes")).unwrap();
//! fs::write(
//!     species.join("DT_AllosaurusBalanceAttributes.json"),
//!     r#"[{ "Rows": { "Damage.Bite": { "AttributePercentageValues": 120 } } }]"#,
//! ).unwrap();
//! fs::write(
//!     species.join("Attributes/ATT_Allosaurus_AttackPower.json"),
//!     r#"[{ "FloatCurves": [{ "Keys": [
//!         { "Time": 0.0, "Value": 0.5 },
//!         { "Time": 0.5, "Value": 0.8 },
//!         { "Time": 1.0, "Value": 1.0 }
//!     ] }] }]"#,
//! ).unwrap();
//!
//! let mut catalog = StatCatalog::new(root.path());
//! let allo = SpeciesId::new("Allosaurus");
//!
//! assert_eq!(catalog.list(&allo).unwrap().len(), 2);
//!
//! let bite = catalog.synthesize(&allo, "BalanceAttributes", "AttackPower").unwrap();
//! assert_eq!(bite.display_name, "Bite Attack");
//! assert_eq!(bite.series[0].curve.value_at(0.0).unwrap(), 60.0);
//! ```
//!
//! ## Modules
//!
//! - [`catalog`] - Per-species catalog, the main entry point
//! - [`document`] - Stat files and classification
//! - [`curve`] - Curves and curve normalization
//! - [`table`] - Attribute tables
//! - [`synth`] - Virtual curve synthesis and base-field matching
//! - [`derivation`] - Graph of synthesizable (base field, curve) pairs
//! - [`plot`] - Plot and table views for the UI
//! - [`config`] - Naming conventions and presentation options
//! - [`species`] - Species identifier type
//! - [`error`] - Error types

pub mod catalog;
pub mod config;
pub mod curve;
pub mod derivation;
pub mod document;
pub mod error;
pub mod plot;
pub mod species;
pub mod synth;
pub mod table;

// Re-export main types for convenience
pub use catalog::{CatalogEntry, SpeciesCatalog, StatCatalog, StatEntry};
pub use config::CatalogConfig;
pub use document::{classify, StatFile, StatKind};
pub use error::StatError;
pub use species::SpeciesId;

// Re-export the normalized model
pub use curve::{normalize_curve, Curve, NamedCurve, Sample, StatCurve};
pub use table::{extract_table, RowValue, StatTable, TableRow};

// Re-export synthesis and views
pub use derivation::{DerivationGraph, VirtualCandidate};
pub use plot::{PlotSeries, PlotView, TableView, Unit};
pub use synth::{synthesize, synthesize_field, Formula, MatchRank, Provenance, VirtualCurve};
