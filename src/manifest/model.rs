//! Deserialised representation of `.vite/manifest.json`.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

use crate::config::StrictnessPolicy;
use crate::error::{AssetError, AssetResult};

/// Mapping from entry identifier to its compiled chunk, in manifest order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
  entries: IndexMap<String, ManifestChunk>,
}

/// A single chunk emitted by the build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ManifestChunk {
  /// Hashed output filename, relative to the output directory.
  pub file: Option<String>,
  /// Source path the chunk was built from.
  pub src: Option<String>,
  /// Chunk name as assigned by Rollup.
  pub name: Option<String>,
  /// Whether the chunk is a build entry point.
  pub is_entry: bool,
  /// Whether the chunk is a dynamic import target.
  pub is_dynamic_entry: bool,
  /// Stylesheets imported by the chunk, in emission order.
  #[serde(deserialize_with = "null_as_default")]
  pub css: Vec<String>,
  /// Static assets referenced by the chunk.
  #[serde(deserialize_with = "null_as_default")]
  pub assets: Vec<String>,
  /// Manifest keys statically imported by the chunk.
  #[serde(deserialize_with = "null_as_default")]
  pub imports: Vec<String>,
  /// Manifest keys dynamically imported by the chunk.
  #[serde(deserialize_with = "null_as_default")]
  pub dynamic_imports: Vec<String>,
}

/// Vite never writes `null` lists, but hand-edited manifests do; treat them as empty.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Default + Deserialize<'de>,
{
  Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Chunk properties the resolver reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestProperty {
  /// The compiled file.
  File,
  /// The list of stylesheets.
  Css,
}

impl ManifestProperty {
  /// Manifest key of the property.
  pub fn key(self) -> &'static str {
    match self {
      Self::File => "file",
      Self::Css => "css",
    }
  }
}

/// Borrowed value of a [`ManifestProperty`]; both shapes are possible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyValue<'a> {
  /// Value of `file`.
  File(&'a str),
  /// Value of `css`, never empty.
  Css(&'a [String]),
}

impl<'a> PropertyValue<'a> {
  /// The single file name, or the first stylesheet of a list.
  pub fn first(self) -> Option<&'a str> {
    match self {
      Self::File(file) => Some(file),
      Self::Css(files) => files.first().map(String::as_str),
    }
  }
}

impl ManifestChunk {
  fn property(&self, property: ManifestProperty) -> Option<PropertyValue<'_>> {
    match property {
      ManifestProperty::File => self
        .file
        .as_deref()
        .filter(|file| !file.is_empty())
        .map(PropertyValue::File),
      ManifestProperty::Css => {
        (!self.css.is_empty()).then_some(PropertyValue::Css(self.css.as_slice()))
      }
    }
  }
}

impl Manifest {
  /// Build a manifest from chunks, keeping their order.
  pub fn from_entries<I, K>(entries: I) -> Self
  where
    I: IntoIterator<Item = (K, ManifestChunk)>,
    K: Into<String>,
  {
    Self {
      entries: entries
        .into_iter()
        .map(|(key, chunk)| (key.into(), chunk))
        .collect(),
    }
  }

  /// Returns `true` when the manifest holds no entries.
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Number of entries.
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// Look up a chunk by entry identifier.
  pub fn get(&self, entry: &str) -> Option<&ManifestChunk> {
    self.entries.get(entry)
  }

  /// Entry identifiers in manifest order.
  pub fn keys(&self) -> impl Iterator<Item = &str> {
    self.entries.keys().map(String::as_str)
  }

  /// Look up `property` of `entry`.
  ///
  /// A missing entry or a missing/empty property is gated by `allow_missing` and `policy`.
  pub fn property(
    &self,
    entry: &str,
    property: ManifestProperty,
    allow_missing: bool,
    policy: StrictnessPolicy,
  ) -> AssetResult<Option<PropertyValue<'_>>> {
    let Some(chunk) = self.entries.get(entry) else {
      return policy.gate(
        allow_missing,
        AssetError::MissingManifestEntry {
          entry: entry.to_string(),
        },
      );
    };

    match chunk.property(property) {
      Some(value) => Ok(Some(value)),
      None => policy.gate(
        allow_missing,
        AssetError::MissingManifestProperty {
          entry: entry.to_string(),
          key: property.key(),
        },
      ),
    }
  }
}
