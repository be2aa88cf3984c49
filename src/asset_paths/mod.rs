//! Helpers for turning build output locations into public URLs.
//!
//! The responsibilities are split into focused submodules so the path arithmetic, the
//! legacy naming convention and the stylesheet detection can be tested independently of
//! the resolver that composes them.

mod bundle;
mod filters;
mod legacy;
mod relative;

pub use bundle::production_url;
pub use filters::is_stylesheet_entry;
pub use legacy::{LEGACY_POLYFILLS_SUFFIX, find_legacy_polyfills, legacy_entry};
pub use relative::relative_out_dir;
