//! Species keys.
//!
//! A species is one folder under the data root; its folder name is the
//! key every catalog lookup starts from.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Name of a species folder, e.g. `Allosaurus`.
///
/// # Examples
///
/// ```rust
/// use curvestat::SpeciesId;
/// use std::path::Path;
///
/// let allo: SpeciesId = "Allosaurus".into();
/// assert_eq!(allo.folder(Path::new("JSONs")), Path::new("JSONs/Allosaurus"));
/// assert_eq!(SpeciesId::from_folder(Path::new("JSONs/Allosaurus")), Some(allo));
/// ```
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct SpeciesId(Arc<str>);

impl SpeciesId {
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }

    /// Species named by the last component of a folder path.
    pub fn from_folder(dir: &Path) -> Option<Self> {
        let name = dir.file_name()?.to_string_lossy();
        Some(Self::new(&name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The species folder under `root`.
    pub fn folder(&self, root: &Path) -> PathBuf {
        root.join(&*self.0)
    }
}

impl From<&str> for SpeciesId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for SpeciesId {
    fn from(name: String) -> Self {
        Self(name.into())
    }
}

impl From<SpeciesId> for String {
    fn from(id: SpeciesId) -> Self {
        id.0.to_string()
    }
}

impl fmt::Display for SpeciesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
