//! Vite manifest model, loading and memoisation.

mod model;
mod store;

pub use model::{Manifest, ManifestChunk, ManifestProperty, PropertyValue};
pub use store::{LEGACY_MANIFEST_PATH, MANIFEST_PATH, ManifestStore, load_manifest};
