//! Detection of a running Vite dev server through the `.dev` marker file.

use std::path::PathBuf;

use crate::config::StrictnessPolicy;
use crate::error::{AssetError, AssetResult};
use crate::fs::SiteFs;
use crate::project::SiteLayout;

/// Marker file written by the Vite plugin while the dev server runs.
pub const DEV_MARKER_FILE: &str = ".dev";
/// Key expected on the marker's first line.
pub const DEV_SERVER_KEY: &str = "VITE_SERVER";

/// Mode the site is rendered in for a single resolution call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildMode {
  /// Assets are served unbundled by the dev server at `origin`.
  Dev {
    /// Dev server origin, e.g. `http://localhost:5173`.
    origin: String,
  },
  /// Assets come from the compiled manifest.
  Production,
}

impl BuildMode {
  /// Returns `true` for [`BuildMode::Dev`].
  pub fn is_dev(&self) -> bool {
    matches!(self, Self::Dev { .. })
  }

  /// URL of `path` on the dev server, `None` in production.
  pub fn dev_url(&self, path: &str) -> Option<String> {
    match self {
      Self::Dev { origin } => Some(format!("{origin}/{path}")),
      Self::Production => None,
    }
  }
}

/// Probes the effective site root for the dev marker.
#[derive(Debug)]
pub struct DevModeProbe<'a, F> {
  fs: &'a F,
  marker: PathBuf,
  policy: StrictnessPolicy,
}

impl<'a, F: SiteFs> DevModeProbe<'a, F> {
  /// Create a probe for the layout's effective root.
  pub fn new(fs: &'a F, layout: &SiteLayout, policy: StrictnessPolicy) -> Self {
    Self {
      fs,
      marker: layout.effective_root().join(DEV_MARKER_FILE),
      policy,
    }
  }

  /// Returns `true` when the marker file exists.
  pub fn is_dev(&self) -> bool {
    self.fs.exists(&self.marker)
  }

  /// Read the dev server origin from the marker.
  pub fn dev_server_origin(&self) -> AssetResult<String> {
    let content = self
      .fs
      .read_to_string(&self.marker)
      .map_err(|source| AssetError::Io {
        path: self.marker.clone(),
        source,
      })?;
    parse_marker(&content, self.policy)
  }

  /// Determine the current mode. Never cached, so every call reflects the marker on disk.
  pub fn probe(&self) -> AssetResult<BuildMode> {
    if !self.is_dev() {
      return Ok(BuildMode::Production);
    }
    Ok(BuildMode::Dev {
      origin: self.dev_server_origin()?,
    })
  }
}

/// Parse `KEY=VALUE` from the marker's first line.
///
/// Only the first `=` separates key and value. An unexpected key is fatal under a strict
/// policy; a lenient policy keeps whatever value was parsed.
fn parse_marker(content: &str, policy: StrictnessPolicy) -> AssetResult<String> {
  let line = content.trim().lines().next().unwrap_or_default().trim_end();
  let (key, value) = line.split_once('=').unwrap_or((line, ""));

  if key != DEV_SERVER_KEY {
    if policy.is_strict() {
      return Err(AssetError::config(format!(
        "{DEV_SERVER_KEY} not found in `{DEV_MARKER_FILE}` file"
      )));
    }
    tracing::warn!("unexpected key `{key}` in `{DEV_MARKER_FILE}` file");
  }

  Ok(value.to_string())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::fs::LocalFs;
  use std::fs;
  use tempfile::tempdir;

  #[test]
  fn parses_origin_and_keeps_extra_separators() {
    let origin = parse_marker(
      "VITE_SERVER=http://localhost:5173/?token=a=b\n",
      StrictnessPolicy::Strict,
    )
    .unwrap();
    assert_eq!(origin, "http://localhost:5173/?token=a=b");
  }

  #[test]
  fn only_first_line_is_meaningful() {
    let origin = parse_marker(
      "  VITE_SERVER=http://[::1]:3000  \nOTHER=ignored\n",
      StrictnessPolicy::Strict,
    )
    .unwrap();
    assert_eq!(origin, "http://[::1]:3000");
  }

  #[test]
  fn unexpected_key_depends_on_policy() {
    let strict = parse_marker("SERVER=http://localhost", StrictnessPolicy::Strict);
    assert!(matches!(strict, Err(AssetError::Config { .. })));

    let lenient = parse_marker("SERVER=http://localhost", StrictnessPolicy::Lenient).unwrap();
    assert_eq!(lenient, "http://localhost");

    let no_separator = parse_marker("garbage", StrictnessPolicy::Lenient).unwrap();
    assert_eq!(no_separator, "");
  }

  #[test]
  fn probes_base_root_in_split_layouts() {
    let dir = tempdir().unwrap();
    let public = dir.path().join("public");
    fs::create_dir_all(&public).unwrap();
    let layout = SiteLayout::split(&public, dir.path());

    let probe = DevModeProbe::new(&LocalFs, &layout, StrictnessPolicy::Strict);
    assert_eq!(probe.probe().unwrap(), BuildMode::Production);

    fs::write(public.join(DEV_MARKER_FILE), "VITE_SERVER=http://wrong").unwrap();
    assert!(!probe.is_dev());

    fs::write(dir.path().join(DEV_MARKER_FILE), "VITE_SERVER=http://localhost:5173").unwrap();
    let mode = probe.probe().unwrap();
    assert_eq!(mode.dev_url("src/main.js").unwrap(), "http://localhost:5173/src/main.js");
  }
}
