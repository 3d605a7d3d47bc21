//! Attack Curves Example
//!
//! Builds every virtual damage curve of one species:
//! - Find the (base field, curve) pairs the species supports
//! - Synthesize each pair into a damage-over-growth curve
//! - Print the provenance and the damage at a few growth points,
//!   interpolated between the exported samples
//!
//! Usage: `cargo run --example attack_curves -- [--root ROOT] SPECIES`

use clap::Parser;
use curvestat::*;
use std::path::PathBuf;

const GROWTH_POINTS: [f64; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];

/// Print the virtual attack curves of a species
#[derive(Parser, Debug)]
#[command(name = "attack_curves", about = "List derived damage curves", long_about = None)]
struct Args {
    /// Data root holding one folder per species
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Species folder name, e.g. Allosaurus
    species: String,
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
    let species = SpeciesId::from(args.species);

    let mut catalog = StatCatalog::new(root);
    let candidates = catalog.virtual_candidates(&species)?;
    if candidates.is_empty() {
        println!("{}: no virtual curves available", species);
        return Ok(());
    }

    for candidate in candidates {
        let derived = match catalog.synthesize_field(
            &species,
            &candidate.table,
            &candidate.field,
            &candidate.curve,
        ) {
            Ok(derived) => derived,
            Err(e) if e.is_unavailable() => {
                println!("{} x {}: {}", candidate.field, candidate.curve, e);
                continue;
            }
            Err(e) => return Err(e),
        };

        let view = PlotView::from_virtual(&derived, catalog.config());
        let provenance = &derived.provenance;
        println!();
        println!("{} ({:?})", view.title, candidate.rank);
        println!(
            "  {}.{} = {} with {}: {}",
            provenance.table, provenance.field, provenance.base, provenance.curve, provenance.formula
        );

        for series in &derived.series {
            let mut line = format!("  {:<8}", series.label);
            for growth in GROWTH_POINTS {
                let value = series.curve.value_at(growth)?;
                line.push_str(&format!("  {:.2}:{:.1}", growth, value));
            }
            println!("{}", line);
        }
    }

    Ok(())
}
