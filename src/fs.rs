//! File primitives the resolver reads through.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Minimal file access needed to probe the marker, config and manifest.
pub trait SiteFs {
  /// Returns `true` when a regular file exists at `path`.
  fn exists(&self, path: &Path) -> bool;

  /// Read the whole file as UTF-8.
  fn read_to_string(&self, path: &Path) -> io::Result<String>;

  /// Resolve symlinks and `..` segments into an absolute path.
  fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;
}

/// [`SiteFs`] backed by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl SiteFs for LocalFs {
  fn exists(&self, path: &Path) -> bool {
    path.is_file()
  }

  fn read_to_string(&self, path: &Path) -> io::Result<String> {
    fs::read_to_string(path)
  }

  fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
    fs::canonicalize(path)
  }
}

impl<T: SiteFs + ?Sized> SiteFs for &T {
  fn exists(&self, path: &Path) -> bool {
    (**self).exists(path)
  }

  fn read_to_string(&self, path: &Path) -> io::Result<String> {
    (**self).read_to_string(path)
  }

  fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
    (**self).canonicalize(path)
  }
}
