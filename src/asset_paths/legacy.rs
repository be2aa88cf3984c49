//! Naming conventions of `@vitejs/plugin-legacy` output.

/// Suffix of the manifest key holding the legacy polyfill chunk.
///
/// The key is relative to Vite's root (e.g. `../vite/legacy-polyfills-legacy`), so only
/// the ending is stable.
pub const LEGACY_POLYFILLS_SUFFIX: &str = "vite/legacy-polyfills-legacy";

const LEGACY_SUFFIX: &str = "-legacy";

/// Compute the manifest key of the legacy counterpart of `entry`.
///
/// The suffix attaches to the second-to-last dot-separated segment:
/// `src/main.js` becomes `src/main-legacy.js` and `src/main.module.js` becomes
/// `src/main.module-legacy.js`. Entries without a dot have no counterpart.
pub fn legacy_entry(entry: &str) -> Option<String> {
    let mut parts: Vec<String> = entry.split('.').map(str::to_string).collect();
    if parts.len() < 2 {
        return None;
    }

    let index = parts.len() - 2;
    parts[index].push_str(LEGACY_SUFFIX);
    Some(parts.join("."))
}

/// Find the polyfill entry among manifest keys, honouring manifest order.
pub fn find_legacy_polyfills<'a, I>(keys: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    keys.into_iter()
        .find(|key| key.ends_with(LEGACY_POLYFILLS_SUFFIX))
}
