//! Loading the manifest from the output directory and memoising it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::StrictnessPolicy;
use crate::error::{AssetError, AssetResult};
use crate::fs::SiteFs;

use super::model::Manifest;

/// Manifest location used by Vite 5 and later, relative to the output directory.
pub const MANIFEST_PATH: &str = ".vite/manifest.json";
/// Manifest location used by earlier Vite releases.
pub const LEGACY_MANIFEST_PATH: &str = "manifest.json";

/// Read and parse the manifest found in `output_dir`.
///
/// A missing manifest is an error under a strict policy and an empty manifest otherwise.
/// Unparsable JSON is always an error: a broken build must not fail invisibly.
pub fn load_manifest<F: SiteFs>(
  fs: &F,
  output_dir: &Path,
  policy: StrictnessPolicy,
) -> AssetResult<Manifest> {
  let Some(path) = find_manifest(fs, output_dir) else {
    if policy.is_strict() {
      return Err(AssetError::ManifestMissing {
        dir: output_dir.to_path_buf(),
      });
    }
    tracing::warn!(
      "no manifest in {}, assets will not be resolved",
      output_dir.display()
    );
    return Ok(Manifest::default());
  };

  let content = fs.read_to_string(&path).map_err(|source| AssetError::Io {
    path: path.clone(),
    source,
  })?;
  let manifest: Manifest = serde_json::from_str(&content)
    .map_err(|source| AssetError::ManifestCorrupt { path: path.clone(), source })?;

  tracing::debug!(entries = manifest.len(), "loaded manifest from {}", path.display());
  Ok(manifest)
}

fn find_manifest<F: SiteFs>(fs: &F, output_dir: &Path) -> Option<PathBuf> {
  [MANIFEST_PATH, LEGACY_MANIFEST_PATH]
    .into_iter()
    .map(|relative| output_dir.join(relative))
    .find(|candidate| fs.exists(candidate))
}

/// Lazily loaded manifest shared between resolvers of the same process.
///
/// Once a manifest (including the empty fallback) is stored it is never re-read.
#[derive(Debug, Clone, Default)]
pub struct ManifestStore {
  cached: Option<Arc<Manifest>>,
}

impl ManifestStore {
  /// Store pre-seeded with an already parsed manifest.
  pub fn preloaded(manifest: Manifest) -> Self {
    Self {
      cached: Some(Arc::new(manifest)),
    }
  }

  /// Returns `true` once a manifest has been cached.
  pub fn is_loaded(&self) -> bool {
    self.cached.is_some()
  }

  /// The cached manifest, if any.
  pub fn cached(&self) -> Option<Arc<Manifest>> {
    self.cached.clone()
  }

  /// Return the cached manifest, loading it from `output_dir` on first use.
  pub fn get<F: SiteFs>(
    &mut self,
    fs: &F,
    output_dir: &Path,
    policy: StrictnessPolicy,
  ) -> AssetResult<Arc<Manifest>> {
    if let Some(manifest) = &self.cached {
      return Ok(Arc::clone(manifest));
    }

    let manifest = Arc::new(load_manifest(fs, output_dir, policy)?);
    self.cached = Some(Arc::clone(&manifest));
    Ok(manifest)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::fs::LocalFs;
  use std::fs;
  use tempfile::tempdir;

  fn write_manifest(dir: &Path, relative: &str, content: &str) {
    let path = dir.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
  }

  #[test]
  fn prefers_dot_vite_layout_over_legacy() {
    let dir = tempdir().unwrap();
    write_manifest(dir.path(), LEGACY_MANIFEST_PATH, r#"{"old.js": {"file": "old.js"}}"#);
    write_manifest(dir.path(), MANIFEST_PATH, r#"{"new.js": {"file": "new.js"}}"#);

    let manifest = load_manifest(&LocalFs, dir.path(), StrictnessPolicy::Strict).unwrap();
    assert!(manifest.get("new.js").is_some());
    assert!(manifest.get("old.js").is_none());
  }

  #[test]
  fn falls_back_to_legacy_layout() {
    let dir = tempdir().unwrap();
    write_manifest(dir.path(), LEGACY_MANIFEST_PATH, r#"{"old.js": {"file": "old.js"}}"#);

    let manifest = load_manifest(&LocalFs, dir.path(), StrictnessPolicy::Strict).unwrap();
    assert_eq!(manifest.len(), 1);
  }

  #[test]
  fn missing_manifest_depends_on_policy() {
    let dir = tempdir().unwrap();

    let strict = load_manifest(&LocalFs, dir.path(), StrictnessPolicy::Strict);
    assert!(matches!(strict, Err(AssetError::ManifestMissing { .. })));

    let lenient = load_manifest(&LocalFs, dir.path(), StrictnessPolicy::Lenient).unwrap();
    assert!(lenient.is_empty());
  }

  #[test]
  fn corrupt_manifest_fails_in_every_mode() {
    let dir = tempdir().unwrap();
    write_manifest(dir.path(), MANIFEST_PATH, r#"{"src/main.js": {"file": "#);

    for policy in [StrictnessPolicy::Strict, StrictnessPolicy::Lenient] {
      let result = load_manifest(&LocalFs, dir.path(), policy);
      assert!(matches!(result, Err(AssetError::ManifestCorrupt { .. })));
    }
  }

  #[test]
  fn wrong_shape_is_corrupt() {
    let dir = tempdir().unwrap();
    write_manifest(dir.path(), MANIFEST_PATH, r#"["src/main.js"]"#);

    let result = load_manifest(&LocalFs, dir.path(), StrictnessPolicy::Lenient);
    assert!(matches!(result, Err(AssetError::ManifestCorrupt { .. })));
  }

  #[test]
  fn store_never_rereads_once_cached() {
    let dir = tempdir().unwrap();
    let mut store = ManifestStore::default();

    let first = store.get(&LocalFs, dir.path(), StrictnessPolicy::Lenient).unwrap();
    assert!(first.is_empty());
    assert!(store.is_loaded());

    write_manifest(dir.path(), MANIFEST_PATH, r#"{"src/main.js": {"file": "main.js"}}"#);
    let second = store.get(&LocalFs, dir.path(), StrictnessPolicy::Lenient).unwrap();
    assert!(second.is_empty());
  }
}
