//! Stat catalog module.
//!
//! Provides the `StatCatalog` type, the main entry point of the crate. It
//! reads a species' folder once, classifies and normalizes every file,
//! and serves lookups, listings and virtual curves from the cached
//! result. Cache entries are keyed by `(root, species)` so switching the
//! data root never serves entries read from another root.

use crate::config::CatalogConfig;
use crate::curve::{normalize_curve, StatCurve};
use crate::derivation::{DerivationGraph, VirtualCandidate};
use crate::document::{display_name, StatFile, StatKind};
use crate::error::StatError;
use crate::species::SpeciesId;
use crate::synth::{self, VirtualCurve};
use crate::table::{extract_table, StatTable};
use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Normalized content of a stat file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StatEntry {
    Curve(StatCurve),
    Table(StatTable),
}

impl StatEntry {
    pub fn kind(&self) -> StatKind {
        match self {
            StatEntry::Curve(_) => StatKind::Curve,
            StatEntry::Table(_) => StatKind::Table,
        }
    }

    pub fn as_curve(&self) -> Option<&StatCurve> {
        match self {
            StatEntry::Curve(c) => Some(c),
            StatEntry::Table(_) => None,
        }
    }

    pub fn as_table(&self) -> Option<&StatTable> {
        match self {
            StatEntry::Table(t) => Some(t),
            StatEntry::Curve(_) => None,
        }
    }
}

/// One selectable stat of a species.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry {
    /// Catalog name, the file stem without export prefixes.
    pub name: String,
    pub display_name: String,
    pub path: PathBuf,
    pub stat: StatEntry,
}

impl CatalogEntry {
    pub fn kind(&self) -> StatKind {
        self.stat.kind()
    }

    /// Flat or straight-line curve. Tables are never linear.
    pub fn is_linear(&self) -> bool {
        self.stat.as_curve().is_some_and(StatCurve::is_linear)
    }
}

/// A file left out of a species catalog, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    #[serde(serialize_with = "serialize_error")]
    pub error: StatError,
}

fn serialize_error<S: serde::Serializer>(error: &StatError, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(error)
}

/// Everything loaded for one species under one root.
#[derive(Debug, Clone)]
pub struct SpeciesCatalog {
    species: SpeciesId,
    root: PathBuf,
    entries: Vec<CatalogEntry>,
    index: HashMap<String, usize>,
    skipped: Vec<SkippedFile>,
    derivations: DerivationGraph,
}

impl PartialEq for SpeciesCatalog {
    fn eq(&self, other: &Self) -> bool {
        self.species == other.species
            && self.root == other.root
            && self.entries == other.entries
            && self.skipped == other.skipped
    }
}

impl SpeciesCatalog {
    /// Read every stat file of `species` under `root`.
    ///
    /// Files directly inside the species folder come first, then the
    /// attributes folder; each group is sorted by file name. A file that
    /// fails to read, parse or classify is recorded in `skipped` and the
    /// load continues.
    ///
    /// # Errors
    ///
    /// `SpeciesNotFound` if the species folder does not exist, `Io` if a
    /// folder cannot be listed.
    pub fn load(root: &Path, species: &SpeciesId, config: &CatalogConfig) -> Result<Self, StatError> {
        let species_dir = species.folder(root);
        if !species_dir.is_dir() {
            return Err(StatError::SpeciesNotFound {
                species: species.to_string(),
                root: root.to_path_buf(),
            });
        }

        let mut paths = json_files(&species_dir)?;
        let attributes_dir = species_dir.join(&config.attributes_dir);
        if attributes_dir.is_dir() {
            paths.extend(json_files(&attributes_dir)?);
        } else {
            warn!(species = %species, dir = %attributes_dir.display(), "attributes folder not found");
        }

        let mut files = Vec::with_capacity(paths.len());
        let mut skipped = Vec::new();
        for path in paths {
            match StatFile::read(&path, species, config) {
                Ok(file) => files.push(file),
                Err(error) => {
                    warn!(species = %species, %error, "skipping file");
                    skipped.push(SkippedFile { path, error });
                }
            }
        }

        let mut catalog = Self::from_files(root, species, files, config);
        skipped.append(&mut catalog.skipped);
        catalog.skipped = skipped;
        debug!(
            species = %species,
            entries = catalog.entries.len(),
            skipped = catalog.skipped.len(),
            "species catalog loaded"
        );
        Ok(catalog)
    }

    /// Build a catalog from already classified files, in the given order.
    pub fn from_files(
        root: &Path,
        species: &SpeciesId,
        files: Vec<StatFile>,
        config: &CatalogConfig,
    ) -> Self {
        let mut entries: Vec<CatalogEntry> = Vec::with_capacity(files.len());
        let mut index = HashMap::new();
        let mut skipped = Vec::new();

        for file in files {
            if index.contains_key(&file.name) {
                let error =
                    StatError::malformed(&file.path, format!("duplicate stat name {}", file.name));
                warn!(species = %species, %error, "skipping file");
                skipped.push(SkippedFile {
                    path: file.path,
                    error,
                });
                continue;
            }

            let stat = match file.kind {
                StatKind::Curve => normalize_curve(&file, config.growth_tolerance).map(StatEntry::Curve),
                StatKind::Table => extract_table(&file).map(StatEntry::Table),
                StatKind::Unknown => Err(StatError::UnknownShape {
                    path: file.path.clone(),
                }),
            };
            match stat {
                Ok(stat) => {
                    index.insert(file.name.clone(), entries.len());
                    entries.push(CatalogEntry {
                        display_name: display_name(&file.name),
                        name: file.name,
                        path: file.path,
                        stat,
                    });
                }
                Err(error) => {
                    warn!(species = %species, %error, "skipping file");
                    skipped.push(SkippedFile {
                        path: file.path,
                        error,
                    });
                }
            }
        }

        let derivations = DerivationGraph::build(
            entries.iter().filter_map(|e| e.stat.as_table()),
            entries.iter().filter_map(|e| e.stat.as_curve()),
        );

        Self {
            species: species.clone(),
            root: root.to_path_buf(),
            entries,
            index,
            skipped,
            derivations,
        }
    }

    pub fn species(&self) -> &SpeciesId {
        &self.species
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All entries in folder order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn skipped(&self) -> &[SkippedFile] {
        &self.skipped
    }

    pub fn derivations(&self) -> &DerivationGraph {
        &self.derivations
    }

    /// Look up an entry by catalog name.
    pub fn entry(&self, name: &str) -> Result<&CatalogEntry, StatError> {
        self.index
            .get(name)
            .map(|&i| &self.entries[i])
            .ok_or_else(|| StatError::NotFound {
                species: self.species.to_string(),
                name: name.to_string(),
            })
    }

    pub fn get(&self, name: &str) -> Result<&StatEntry, StatError> {
        self.entry(name).map(|e| &e.stat)
    }

    /// Derive a curve from the best matching base field of `table`.
    ///
    /// The result is not stored in the catalog.
    pub fn synthesize(&self, table: &str, curve: &str) -> Result<VirtualCurve, StatError> {
        let (t, c) = self.synthesis_pair(table, curve)?;
        synth::synthesize(t, c)
    }

    /// Derive a curve from a specific base field of `table`.
    pub fn synthesize_field(
        &self,
        table: &str,
        field: &str,
        curve: &str,
    ) -> Result<VirtualCurve, StatError> {
        let (t, c) = self.synthesis_pair(table, curve)?;
        synth::synthesize_field(t, field, c)
    }

    fn synthesis_pair(&self, table: &str, curve: &str) -> Result<(&StatTable, &StatCurve), StatError> {
        let wrong_kind = |reason: &str| StatError::SynthesisUnavailable {
            table: table.to_string(),
            curve: curve.to_string(),
            reason: reason.to_string(),
        };
        let t = self
            .get(table)?
            .as_table()
            .ok_or_else(|| wrong_kind("first entry is not a table"))?;
        let c = self
            .get(curve)?
            .as_curve()
            .ok_or_else(|| wrong_kind("second entry is not a curve"))?;
        Ok((t, c))
    }
}

fn json_files(dir: &Path) -> Result<Vec<PathBuf>, StatError> {
    let read_dir = std::fs::read_dir(dir).map_err(|e| StatError::io(dir, &e))?;
    let mut paths: Vec<PathBuf> = read_dir
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        })
        .collect();
    paths.sort();
    Ok(paths)
}

/// Cache key of a species catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CatalogKey {
    pub root: PathBuf,
    pub species: SpeciesId,
}

/// Lazily populated catalog of every species under a data root.
///
/// # Examples
///
/// ```rust,no_run
/// use curvestat::{SpeciesId, StatCatalog};
///
/// let mut catalog = StatCatalog::new("JSONs");
/// let allo = SpeciesId::new("Allosaurus");
///
/// for entry in catalog.list(&allo)? {
///     println!("{} ({:?})", entry.display_name, entry.kind());
/// }
///
/// match catalog.synthesize(&allo, "BalanceAttributes", "AttackPower") {
///     Ok(derived) => println!("{}: {} series", derived.display_name, derived.series.len()),
///     Err(e) if e.is_unavailable() => println!("no damage curve"),
///     Err(e) => return Err(e),
/// }
/// # Ok::<(), curvestat::StatError>(())
/// ```
#[derive(Debug, Clone)]
pub struct StatCatalog {
    config: CatalogConfig,
    root: PathBuf,
    cache: HashMap<CatalogKey, SpeciesCatalog>,
}

impl StatCatalog {
    /// Create an empty catalog over `root` with the default configuration.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_config(root, CatalogConfig::default())
    }

    pub fn with_config(root: impl Into<PathBuf>, config: CatalogConfig) -> Self {
        Self {
            config,
            root: root.into(),
            cache: HashMap::new(),
        }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// The active data root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Switch the active data root.
    ///
    /// Catalogs loaded under other roots stay cached under their own key.
    pub fn set_root(&mut self, root: impl Into<PathBuf>) {
        self.root = root.into();
        debug!(root = %self.root.display(), "active root changed");
    }

    /// Species folders under the active root, sorted by name.
    pub fn species(&self) -> Result<Vec<SpeciesId>, StatError> {
        let read_dir = std::fs::read_dir(&self.root).map_err(|e| StatError::io(&self.root, &e))?;
        let mut species: Vec<SpeciesId> = read_dir
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .filter_map(|path| SpeciesId::from_folder(&path))
            .collect();
        species.sort();
        Ok(species)
    }

    /// Whether `species` is already cached for the active root.
    pub fn is_loaded(&self, species: &SpeciesId) -> bool {
        self.cache.contains_key(&self.key(species))
    }

    /// Load `species` under the active root, or return the cached catalog.
    pub fn load(&mut self, species: &SpeciesId) -> Result<&SpeciesCatalog, StatError> {
        let key = self.key(species);
        match self.cache.entry(key) {
            Entry::Occupied(cached) => {
                debug!(species = %species, "species catalog cache hit");
                Ok(cached.into_mut())
            }
            Entry::Vacant(slot) => {
                let catalog = SpeciesCatalog::load(&self.root, species, &self.config)?;
                Ok(slot.insert(catalog))
            }
        }
    }

    /// Selectable entries of `species`, in folder order.
    ///
    /// With `hide_linear_curves` set, flat and straight-line curves are
    /// left out.
    pub fn list(&mut self, species: &SpeciesId) -> Result<Vec<&CatalogEntry>, StatError> {
        let hide_linear = self.config.hide_linear_curves;
        let catalog = self.load(species)?;
        Ok(catalog
            .entries()
            .iter()
            .filter(|e| !(hide_linear && e.is_linear()))
            .collect())
    }

    pub fn get(&mut self, species: &SpeciesId, name: &str) -> Result<&StatEntry, StatError> {
        self.load(species)?.get(name)
    }

    /// Derive a curve for `(species, table, curve)`; never stored.
    pub fn synthesize(
        &mut self,
        species: &SpeciesId,
        table: &str,
        curve: &str,
    ) -> Result<VirtualCurve, StatError> {
        self.load(species)?.synthesize(table, curve)
    }

    pub fn synthesize_field(
        &mut self,
        species: &SpeciesId,
        table: &str,
        field: &str,
        curve: &str,
    ) -> Result<VirtualCurve, StatError> {
        self.load(species)?.synthesize_field(table, field, curve)
    }

    /// Every (table, base field, curve) combination that can be synthesized.
    pub fn virtual_candidates(
        &mut self,
        species: &SpeciesId,
    ) -> Result<Vec<VirtualCandidate>, StatError> {
        Ok(self.load(species)?.derivations().candidates())
    }

    fn key(&self, species: &SpeciesId) -> CatalogKey {
        CatalogKey {
            root: self.root.clone(),
            species: species.clone(),
        }
    }
}
