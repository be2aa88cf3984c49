//! Build configuration written by the Vite plugin, plus the strictness policy.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{AssetError, AssetResult};
use crate::fs::SiteFs;

/// JSON config file searched for first in the config root.
pub const CONFIG_FILE_JSON: &str = "vite.config.json";
/// YAML alternatives, searched in order when the JSON file is absent.
pub const CONFIG_FILES_YAML: [&str; 2] = ["vite.config.yaml", "vite.config.yml"];

/// Settings shared between the Vite build and the server-side resolver.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BuildConfig {
    /// Vite's `outDir`, relative to the project (base) root.
    pub out_dir: String,
    /// Whether `@vitejs/plugin-legacy` bundles are emitted.
    pub legacy: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            out_dir: "dist".into(),
            legacy: false,
        }
    }
}

impl BuildConfig {
    /// Load the config from `config_root`.
    ///
    /// A missing file is an error under [`StrictnessPolicy::Strict`] and falls back to
    /// defaults otherwise. A file that exists but does not parse is always an error.
    pub fn discover<F: SiteFs>(
        fs: &F,
        config_root: &Path,
        policy: StrictnessPolicy,
    ) -> AssetResult<Self> {
        match Self::find(fs, config_root) {
            Some(path) => Self::from_path(fs, &path),
            None if policy.is_strict() => Err(AssetError::config(format!(
                "{CONFIG_FILE_JSON} not found in {}",
                config_root.display()
            ))),
            None => {
                tracing::warn!(
                    "no build config in {}, using defaults",
                    config_root.display()
                );
                Ok(Self::default())
            }
        }
    }

    /// Read configuration from a specific JSON or YAML file.
    pub fn from_path<F: SiteFs>(fs: &F, path: &Path) -> AssetResult<Self> {
        let content = fs.read_to_string(path).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == "yaml" || ext == "yml");
        let parsed = if is_yaml {
            serde_yaml::from_str(&content).map_err(|err| err.to_string())
        } else {
            serde_json::from_str(&content).map_err(|err| err.to_string())
        };

        let config: Self = parsed.map_err(|err| {
            AssetError::config(format!("failed to parse {}: {err}", path.display()))
        })?;
        tracing::debug!(out_dir = %config.out_dir, legacy = config.legacy, "loaded build config");
        Ok(config)
    }

    fn find<F: SiteFs>(fs: &F, config_root: &Path) -> Option<PathBuf> {
        std::iter::once(CONFIG_FILE_JSON)
            .chain(CONFIG_FILES_YAML)
            .map(|name| config_root.join(name))
            .find(|candidate| fs.exists(candidate))
    }
}

/// How lookup failures are reported when the caller did not opt into silence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StrictnessPolicy {
    /// Raise typed errors; the equivalent of a host running in debug mode.
    Strict,
    /// Degrade to absent results so production pages keep rendering.
    #[default]
    Lenient,
}

impl StrictnessPolicy {
    /// Map a debug flag onto a policy.
    pub fn from_debug(debug: bool) -> Self {
        if debug { Self::Strict } else { Self::Lenient }
    }

    /// Returns `true` for [`StrictnessPolicy::Strict`].
    pub fn is_strict(self) -> bool {
        self == Self::Strict
    }

    /// Decide whether a suppressible failure is raised or turned into `None`.
    pub fn gate<T>(self, allow_missing: bool, error: AssetError) -> AssetResult<Option<T>> {
        if !error.is_suppressible() {
            return Err(error);
        }
        if allow_missing {
            return Ok(None);
        }
        if self.is_strict() {
            return Err(error);
        }
        tracing::debug!("suppressed: {error}");
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::LocalFs;
    use std::fs;
    use tempfile::tempdir;

    fn missing_entry() -> AssetError {
        AssetError::MissingManifestEntry {
            entry: "src/main.js".into(),
        }
    }

    #[test]
    fn reads_json_config() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_JSON),
            r#"{"outDir": "public/dist", "legacy": true, "rootDir": "src"}"#,
        )
        .unwrap();

        let config = BuildConfig::discover(&LocalFs, dir.path(), StrictnessPolicy::Strict).unwrap();
        assert_eq!(
            config,
            BuildConfig {
                out_dir: "public/dist".into(),
                legacy: true,
            }
        );
    }

    #[test]
    fn reads_yaml_config_when_json_is_absent() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("vite.config.yml"), "outDir: build\n").unwrap();

        let config = BuildConfig::discover(&LocalFs, dir.path(), StrictnessPolicy::Strict).unwrap();
        assert_eq!(config.out_dir, "build");
        assert!(!config.legacy);
    }

    #[test]
    fn missing_config_depends_on_policy() {
        let dir = tempdir().unwrap();

        let lenient = BuildConfig::discover(&LocalFs, dir.path(), StrictnessPolicy::Lenient).unwrap();
        assert_eq!(lenient, BuildConfig::default());

        let strict = BuildConfig::discover(&LocalFs, dir.path(), StrictnessPolicy::Strict);
        assert!(matches!(strict, Err(AssetError::Config { .. })));
    }

    #[test]
    fn unparsable_config_is_always_an_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_JSON), "{ outDir: ").unwrap();

        let result = BuildConfig::discover(&LocalFs, dir.path(), StrictnessPolicy::Lenient);
        assert!(matches!(result, Err(AssetError::Config { .. })));
    }

    #[test]
    fn allow_missing_silences_both_policies() {
        for policy in [StrictnessPolicy::Strict, StrictnessPolicy::Lenient] {
            let gated: Option<()> = policy.gate(true, missing_entry()).unwrap();
            assert!(gated.is_none());
        }
    }

    #[test]
    fn strict_policy_raises_without_allow_missing() {
        let gated = StrictnessPolicy::Strict.gate::<()>(false, missing_entry());
        assert!(matches!(gated, Err(AssetError::MissingManifestEntry { .. })));

        let lenient = StrictnessPolicy::Lenient.gate::<()>(false, missing_entry()).unwrap();
        assert!(lenient.is_none());
    }

    #[test]
    fn gate_never_silences_config_errors() {
        let gated = StrictnessPolicy::Lenient.gate::<()>(true, AssetError::config("broken"));
        assert!(matches!(gated, Err(AssetError::Config { .. })));
    }

    #[test]
    fn debug_flag_maps_to_policy() {
        assert_eq!(StrictnessPolicy::from_debug(true), StrictnessPolicy::Strict);
        assert_eq!(StrictnessPolicy::from_debug(false), StrictnessPolicy::Lenient);
    }
}
