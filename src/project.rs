//! Host-provided description of where the site lives on disk.

use std::path::{Path, PathBuf};

/// Directory (relative to the effective root) holding the host's config files.
pub const DEFAULT_CONFIG_DIR: &str = "site/config";

/// Roots of the embedding site.
///
/// `index_root` is the public web root. `base_root` is only set for split
/// deployments where the project root sits above a separate public folder
/// (e.g. `/var/www` with `/var/www/public` as index).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLayout {
  /// Public web root served by the HTTP server.
  pub index_root: PathBuf,
  /// Optional project root for split base/public deployments.
  pub base_root: Option<PathBuf>,
  /// Directory holding `vite.config.json`.
  pub config_root: PathBuf,
}

impl SiteLayout {
  /// Layout where the index root is also the project root.
  pub fn new(index_root: impl Into<PathBuf>) -> Self {
    let index_root = index_root.into();
    let config_root = index_root.join(DEFAULT_CONFIG_DIR);
    Self {
      index_root,
      base_root: None,
      config_root,
    }
  }

  /// Layout for a public folder setup with a distinct project root.
  pub fn split(index_root: impl Into<PathBuf>, base_root: impl Into<PathBuf>) -> Self {
    let base_root = base_root.into();
    let config_root = base_root.join(DEFAULT_CONFIG_DIR);
    Self {
      index_root: index_root.into(),
      base_root: Some(base_root),
      config_root,
    }
  }

  /// Override the config directory.
  pub fn with_config_root(mut self, config_root: impl Into<PathBuf>) -> Self {
    self.config_root = config_root.into();
    self
  }

  /// Root that holds the dev marker: the base root when present, else the index root.
  pub fn effective_root(&self) -> &Path {
    self.base_root.as_deref().unwrap_or(&self.index_root)
  }
}
