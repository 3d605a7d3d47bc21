//! Error types for stat loading and curve synthesis.
//!
//! Every failure in this crate is represented by the `StatError` enum.
//! Per-file failures are contained at the file boundary by the catalog;
//! the remaining variants are signals the UI maps to a disabled action.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, normalizing or synthesizing stats.
///
/// # Examples
///
/// ```rust
/// use curvestat::StatError;
///
/// let err = StatError::NotFound {
///     species: "Allosaurus".into(),
///     name: "Stamina".into(),
/// };
/// assert!(err.is_unavailable());
/// assert_eq!(err.to_string(), "No stat named Stamina for species Allosaurus");
/// ```
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StatError {
    /// A file could not be read from disk.
    #[error("Failed to read {}: {message}", .path.display())]
    Io { path: PathBuf, message: String },

    /// The JSON failed to parse, or a required structural field is absent.
    #[error("Malformed document {}: {reason}", .path.display())]
    MalformedDocument { path: PathBuf, reason: String },

    /// The document is neither a Table nor a Curve.
    #[error("Unrecognized document shape: {}", .path.display())]
    UnknownShape { path: PathBuf },

    /// A growth coordinate lies outside `[0, 1]`.
    #[error("Growth coordinate {growth} is outside [0, 1]")]
    OutOfRangeSample { growth: f64 },

    /// A curve has fewer than two valid samples and cannot be plotted.
    #[error("Curve has {count} valid sample(s), at least 2 are required")]
    InsufficientSamples { count: usize },

    /// No virtual curve can be built for the requested table/curve pair.
    #[error("No virtual curve for {table} x {curve}: {reason}")]
    SynthesisUnavailable {
        table: String,
        curve: String,
        reason: String,
    },

    /// The species catalog has no entry with this name.
    #[error("No stat named {name} for species {species}")]
    NotFound { species: String, name: String },

    /// The species folder does not exist under the active root.
    #[error("Species {species} not found under {}", .root.display())]
    SpeciesNotFound { species: String, root: PathBuf },

    /// A configuration file could not be read or parsed.
    #[error("Invalid configuration {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },
}

impl StatError {
    /// Whether this error means "the option is not available".
    ///
    /// The UI disables or hides the corresponding action for these
    /// instead of reporting a failure.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            StatError::NotFound { .. }
                | StatError::SynthesisUnavailable { .. }
                | StatError::InsufficientSamples { .. }
        )
    }

    pub(crate) fn io(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        StatError::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        StatError::MalformedDocument {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
