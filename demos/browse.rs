//! Catalog Browser Example
//!
//! Walks a data root the way the stat browser does:
//! - List species folders
//! - Load each species once and list its tables and curves
//! - Print table rows and a sampled view of every plottable curve
//!
//! Usage: `cargo run --example browse -- [--root ROOT] [SPECIES]`
//!
//! Without `--root` the `JSONs` folder next to the executable is used.
//! Set `RUST_LOG=curvestat=debug` to see classification and cache logs.

use clap::Parser;
use curvestat::*;
use std::path::PathBuf;

/// Print every table and curve of one or all species
#[derive(Parser, Debug)]
#[command(name = "browse", about = "Browse a creature stat export", long_about = None)]
struct Args {
    /// Data root holding one folder per species
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Only show this species
    species: Option<String>,
}

fn main() -> Result<(), StatError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let root = args
        .root
        .or_else(CatalogConfig::default_root)
        .unwrap_or_else(|| PathBuf::from("JSONs"));

    let mut catalog = StatCatalog::new(&root);
    let species = match args.species {
        Some(species) => vec![SpeciesId::from(species)],
        None => catalog.species()?,
    };
    println!("Data root: {}", root.display());

    for sp in &species {
        println!();
        println!("=== {} ===", sp);
        let config = catalog.config().clone();
        let entries: Vec<CatalogEntry> = catalog.list(sp)?.into_iter().cloned().collect();

        for entry in &entries {
            match &entry.stat {
                StatEntry::Table(table) => print_table(table),
                StatEntry::Curve(curve) => print_curve(curve, &config),
            }
        }

        let loaded = catalog.load(sp)?;
        for skipped in loaded.skipped() {
            println!("  skipped {}: {}", skipped.path.display(), skipped.error);
        }
    }

    Ok(())
}

fn print_table(table: &StatTable) {
    let view = TableView::from_table(table);
    println!("  [table] {}", view.title);
    for (label, value) in &view.rows {
        println!("    {:<32} {}", label, value);
    }
}

fn print_curve(curve: &StatCurve, config: &CatalogConfig) {
    let view = match PlotView::from_curve(curve, config) {
        Ok(view) => view,
        Err(e) => {
            println!("  [curve] {} (not plottable: {})", curve.name, e);
            return;
        }
    };
    println!("  [curve] {} ({})", view.title, view.y_label);
    for series in &view.series {
        let points: Vec<String> = series
            .points
            .iter()
            .map(|p| format!("{:.2}:{:.2}", p.growth, p.value))
            .collect();
        println!("    {:<8} {}", series.label, points.join("  "));
    }
}
