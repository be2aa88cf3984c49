//! Error types raised while resolving assets.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the resolver.
pub type AssetResult<T> = Result<T, AssetError>;

/// Failures surfaced by the resolver and its collaborators.
#[derive(Error, Debug)]
pub enum AssetError {
  /// Site layout, build config or dev marker is unusable.
  #[error("configuration error: {message}")]
  Config {
    /// Human readable description of the problem.
    message: String,
  },

  /// No manifest exists in the output directory.
  #[error("`manifest.json` not found in {dir}")]
  ManifestMissing {
    /// Output directory that was searched.
    dir: PathBuf,
  },

  /// The manifest exists but could not be parsed.
  #[error("failed to parse manifest at {path}: {source}")]
  ManifestCorrupt {
    /// Manifest file that failed to parse.
    path: PathBuf,
    /// Underlying JSON error.
    source: serde_json::Error,
  },

  /// The entry is not listed in the manifest.
  #[error("`{entry}` is not a manifest entry")]
  MissingManifestEntry {
    /// Requested entry identifier.
    entry: String,
  },

  /// The entry exists but lacks the requested property.
  #[error("`{key}` not found in manifest entry `{entry}`")]
  MissingManifestProperty {
    /// Requested entry identifier.
    entry: String,
    /// Property that was missing or empty.
    key: &'static str,
  },

  /// Reading a file failed for a reason other than absence.
  #[error("failed to read {path}: {source}")]
  Io {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    source: std::io::Error,
  },
}

impl AssetError {
  pub(crate) fn config(message: impl Into<String>) -> Self {
    Self::Config {
      message: message.into(),
    }
  }

  /// Whether the error may be silenced by `allow_missing` or a lenient policy.
  pub fn is_suppressible(&self) -> bool {
    matches!(
      self,
      Self::ManifestMissing { .. }
        | Self::MissingManifestEntry { .. }
        | Self::MissingManifestProperty { .. }
    )
  }
}
