#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod asset_paths;
pub mod config;
pub mod dev;
pub mod error;
pub mod fs;
pub mod html;
pub mod manifest;
pub mod project;
pub mod resolver;

pub use config::{BuildConfig, StrictnessPolicy};
pub use dev::BuildMode;
pub use error::{AssetError, AssetResult};
pub use fs::{LocalFs, SiteFs};
pub use html::{AttrValue, Attributes, HtmlTags, TagRenderer};
pub use manifest::{Manifest, ManifestChunk};
pub use project::SiteLayout;
pub use resolver::AssetResolver;
