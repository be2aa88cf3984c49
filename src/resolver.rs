//! Resolve entries into asset URLs and tags for a single page render.

use std::path::PathBuf;
use std::sync::Arc;

use crate::asset_paths::{
  find_legacy_polyfills, is_stylesheet_entry, legacy_entry, production_url, relative_out_dir,
};
use crate::config::{BuildConfig, StrictnessPolicy};
use crate::dev::{BuildMode, DevModeProbe};
use crate::error::AssetResult;
use crate::fs::{LocalFs, SiteFs};
use crate::html::{Attributes, HtmlTags, TagRenderer};
use crate::manifest::{Manifest, ManifestProperty, ManifestStore};
use crate::project::SiteLayout;

/// Path of the Vite client on the dev server.
pub const DEV_CLIENT_PATH: &str = "@vite/client";

/// Resolves manifest entries into URLs and markup.
///
/// Config, output directory and manifest are loaded lazily and cached for the lifetime of
/// the resolver. The dev client and the legacy polyfills are emitted by the first
/// [`AssetResolver::script`] call only; use [`AssetResolver::begin_page`] to get a resolver
/// for the next page that shares the caches but starts over with that flag.
#[derive(Debug)]
pub struct AssetResolver<F = LocalFs, R = HtmlTags> {
  layout: SiteLayout,
  fs: F,
  tags: R,
  policy: StrictnessPolicy,
  config: Option<Arc<BuildConfig>>,
  out_dir: Option<Arc<str>>,
  manifest: ManifestStore,
  is_first_script: bool,
}

impl AssetResolver {
  /// Resolver for `layout` reading from the local filesystem with a lenient policy.
  pub fn new(layout: SiteLayout) -> Self {
    Self {
      layout,
      fs: LocalFs,
      tags: HtmlTags,
      policy: StrictnessPolicy::default(),
      config: None,
      out_dir: None,
      manifest: ManifestStore::default(),
      is_first_script: true,
    }
  }
}

impl<F: SiteFs, R: TagRenderer> AssetResolver<F, R> {
  /// Set how lookup failures are reported.
  pub fn with_policy(mut self, policy: StrictnessPolicy) -> Self {
    self.policy = policy;
    self
  }

  /// Use an already loaded build config instead of reading it from the config root.
  pub fn with_config(mut self, config: BuildConfig) -> Self {
    self.config = Some(Arc::new(config));
    self
  }

  /// Use an already parsed manifest instead of reading it from the output directory.
  pub fn with_manifest(mut self, manifest: Manifest) -> Self {
    self.manifest = ManifestStore::preloaded(manifest);
    self
  }

  /// Read files through `fs`.
  pub fn with_fs<G: SiteFs>(self, fs: G) -> AssetResolver<G, R> {
    AssetResolver {
      layout: self.layout,
      fs,
      tags: self.tags,
      policy: self.policy,
      config: self.config,
      out_dir: self.out_dir,
      manifest: self.manifest,
      is_first_script: self.is_first_script,
    }
  }

  /// Render tags through `tags`.
  pub fn with_tags<S: TagRenderer>(self, tags: S) -> AssetResolver<F, S> {
    AssetResolver {
      layout: self.layout,
      fs: self.fs,
      tags,
      policy: self.policy,
      config: self.config,
      out_dir: self.out_dir,
      manifest: self.manifest,
      is_first_script: self.is_first_script,
    }
  }

  /// Fresh resolver for the next page, sharing everything already loaded.
  pub fn begin_page(&self) -> Self
  where
    F: Clone,
    R: Clone,
  {
    Self {
      layout: self.layout.clone(),
      fs: self.fs.clone(),
      tags: self.tags.clone(),
      policy: self.policy,
      config: self.config.clone(),
      out_dir: self.out_dir.clone(),
      manifest: self.manifest.clone(),
      is_first_script: true,
    }
  }

  /// Site layout the resolver works on.
  pub fn layout(&self) -> &SiteLayout {
    &self.layout
  }

  /// Policy in effect.
  pub fn policy(&self) -> StrictnessPolicy {
    self.policy
  }

  /// Whether the next [`AssetResolver::script`] call is the first one.
  pub fn is_first_script(&self) -> bool {
    self.is_first_script
  }

  /// Current mode, probed from the marker file on every call.
  pub fn mode(&self) -> AssetResult<BuildMode> {
    DevModeProbe::new(&self.fs, &self.layout, self.policy).probe()
  }

  /// Build config, loaded on first use.
  pub fn config(&mut self) -> AssetResult<Arc<BuildConfig>> {
    if let Some(config) = &self.config {
      return Ok(Arc::clone(config));
    }

    let config = Arc::new(BuildConfig::discover(
      &self.fs,
      &self.layout.config_root,
      self.policy,
    )?);
    self.config = Some(Arc::clone(&config));
    Ok(config)
  }

  /// Output directory relative to the index root, computed on first use.
  pub fn relative_out_dir(&mut self) -> AssetResult<Arc<str>> {
    if let Some(out_dir) = &self.out_dir {
      return Ok(Arc::clone(out_dir));
    }

    let config = self.config()?;
    let out_dir: Arc<str> = relative_out_dir(&self.fs, &self.layout, &config.out_dir)?.into();
    tracing::debug!(out_dir = %out_dir, "resolved output directory");
    self.out_dir = Some(Arc::clone(&out_dir));
    Ok(out_dir)
  }

  /// Absolute output directory inside the index root.
  pub fn output_dir(&mut self) -> AssetResult<PathBuf> {
    let relative = self.relative_out_dir()?;
    Ok(self.layout.index_root.join(&*relative))
  }

  /// Parsed manifest, loaded on first use.
  pub fn manifest(&mut self) -> AssetResult<Arc<Manifest>> {
    if let Some(manifest) = self.manifest.cached() {
      return Ok(manifest);
    }
    let output_dir = self.output_dir()?;
    self.manifest.get(&self.fs, &output_dir, self.policy)
  }

  /// URL of `entry` without any markup.
  ///
  /// In dev mode this is the entry on the dev server, no manifest required. In production
  /// it is the compiled file inside the output directory.
  pub fn file(&mut self, entry: &str, allow_missing: bool) -> AssetResult<Option<String>> {
    let mode = self.mode()?;
    self.resolve_file_url(&mode, entry, allow_missing)
  }

  /// Script markup for `entry`, preceded on the first call by the dev client or the
  /// legacy polyfills, and by the legacy variant of the entry when legacy builds are on.
  ///
  /// `type="module"` is merged under the caller's attributes. The first-call flag is
  /// cleared whatever the outcome of this call.
  pub fn script(
    &mut self,
    entry: &str,
    attributes: &Attributes,
    allow_missing: bool,
  ) -> AssetResult<Option<String>> {
    let is_first = std::mem::replace(&mut self.is_first_script, false);

    let mode = self.mode()?;
    let file = self.resolve_file_url(&mode, entry, allow_missing)?;
    if file.is_none() && allow_missing {
      return Ok(None);
    }

    let legacy = self.config()?.legacy;
    let mut fragments = Vec::with_capacity(4);
    if is_first {
      fragments.push(self.dev_client(&mode));
    }
    if is_first && legacy {
      fragments.push(self.legacy_polyfills(&mode)?);
    }
    if legacy {
      fragments.push(self.legacy_script(&mode, entry, allow_missing)?);
    }
    let module_attributes = Attributes::new().with("type", "module").merge(attributes);
    fragments.push(file.map(|url| self.tags.script_tag(&url, &module_attributes)));

    Ok(join_fragments(fragments))
  }

  /// Stylesheet markup for `entry`.
  ///
  /// A stylesheet entry resolves to its own file. A script entry resolves to the first
  /// stylesheet it imports; in dev mode script entries yield nothing because the dev server
  /// injects their styles at runtime.
  pub fn style(
    &mut self,
    entry: &str,
    attributes: &Attributes,
    allow_missing: bool,
  ) -> AssetResult<Option<String>> {
    let is_stylesheet = is_stylesheet_entry(entry);

    let url = match self.mode()? {
      BuildMode::Dev { origin } => is_stylesheet.then(|| format!("{origin}/{entry}")),
      BuildMode::Production => {
        let property = if is_stylesheet {
          ManifestProperty::File
        } else {
          ManifestProperty::Css
        };
        self.manifest_url(entry, property, allow_missing)?
      }
    };

    Ok(url.map(|url| self.tags.style_tag(&url, attributes)))
  }

  /// Manifest entry identifiers in manifest order.
  pub fn entries(&mut self) -> AssetResult<Vec<String>> {
    Ok(self.manifest()?.keys().map(str::to_string).collect())
  }

  fn resolve_file_url(
    &mut self,
    mode: &BuildMode,
    entry: &str,
    allow_missing: bool,
  ) -> AssetResult<Option<String>> {
    match mode.dev_url(entry) {
      Some(url) => Ok(Some(url)),
      None => self.manifest_url(entry, ManifestProperty::File, allow_missing),
    }
  }

  fn manifest_url(
    &mut self,
    entry: &str,
    property: ManifestProperty,
    allow_missing: bool,
  ) -> AssetResult<Option<String>> {
    let manifest = match self.manifest() {
      Ok(manifest) => manifest,
      Err(err) => return self.policy.gate(allow_missing, err),
    };
    let file = manifest
      .property(entry, property, allow_missing, self.policy)?
      .and_then(|value| value.first())
      .map(str::to_string);

    match file {
      Some(file) => {
        let out_dir = self.relative_out_dir()?;
        Ok(Some(production_url(&out_dir, &file)))
      }
      None => Ok(None),
    }
  }

  fn dev_client(&self, mode: &BuildMode) -> Option<String> {
    let url = mode.dev_url(DEV_CLIENT_PATH)?;
    Some(
      self
        .tags
        .script_tag(&url, &Attributes::new().with("type", "module")),
    )
  }

  fn legacy_polyfills(&mut self, mode: &BuildMode) -> AssetResult<Option<String>> {
    if mode.is_dev() {
      return Ok(None);
    }

    let manifest = self.manifest()?;
    // Only emitted by the build when some polyfill is actually needed.
    let Some(entry) = find_legacy_polyfills(manifest.keys()) else {
      return Ok(None);
    };

    let url = self.manifest_url(entry, ManifestProperty::File, true)?;
    Ok(url.map(|url| {
      self
        .tags
        .script_tag(&url, &Attributes::new().with_flag("nomodule"))
    }))
  }

  fn legacy_script(
    &mut self,
    mode: &BuildMode,
    entry: &str,
    allow_missing: bool,
  ) -> AssetResult<Option<String>> {
    if mode.is_dev() {
      return Ok(None);
    }
    let Some(legacy_entry) = legacy_entry(entry) else {
      return Ok(None);
    };

    let url = self.manifest_url(&legacy_entry, ManifestProperty::File, allow_missing)?;
    Ok(url.map(|url| {
      self
        .tags
        .script_tag(&url, &Attributes::new().with_flag("nomodule"))
    }))
  }
}

fn join_fragments(fragments: Vec<Option<String>>) -> Option<String> {
  let fragments: Vec<String> = fragments
    .into_iter()
    .flatten()
    .filter(|fragment| !fragment.is_empty())
    .collect();
  (!fragments.is_empty()).then(|| fragments.join("\n"))
}
