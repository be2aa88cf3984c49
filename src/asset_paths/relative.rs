//! Express Vite's `outDir` relative to the public index root.

use std::path::{Component, Path, PathBuf};

use crate::error::{AssetError, AssetResult};
use crate::fs::SiteFs;
use crate::project::SiteLayout;

/// Compute the output directory relative to the index root.
///
/// Without a distinct base root the configured directory already is relative to the index
/// and is returned verbatim. In public folder setups (`/var/www` as base, `/var/www/public`
/// as index) `public/dist` becomes `dist`. An output directory outside the index root
/// cannot be served and is reported as a configuration error.
pub fn relative_out_dir<F: SiteFs>(
    fs: &F,
    layout: &SiteLayout,
    configured: &str,
) -> AssetResult<String> {
    let Some(base_root) = layout.base_root.as_deref() else {
        return Ok(configured.to_string());
    };

    let index_root = resolve(fs, &layout.index_root);
    let absolute = resolve(fs, &base_root.join(configured));

    let relative = absolute.strip_prefix(&index_root).map_err(|_| {
        AssetError::config(format!(
            "output directory {} is not inside the index root {}",
            absolute.display(),
            index_root.display()
        ))
    })?;

    Ok(relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/"))
}

/// Canonicalize the path, or its deepest existing ancestor when the path itself does not
/// exist yet (e.g. an output directory before the first build).
fn resolve<F: SiteFs>(fs: &F, path: &Path) -> PathBuf {
    if let Ok(canonical) = fs.canonicalize(path) {
        return canonical;
    }

    let normalized = normalize_lexically(path);
    let mut existing = normalized.as_path();
    let mut missing = Vec::new();
    loop {
        if let Ok(canonical) = fs.canonicalize(existing) {
            return missing
                .iter()
                .rev()
                .fold(canonical, |resolved, name| resolved.join(name));
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name);
                existing = parent;
            }
            _ => return normalized.clone(),
        }
    }
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::LocalFs;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn strips_public_index_from_split_layouts() {
        let layout = SiteLayout::split("/var/www/public", "/var/www");
        let relative = relative_out_dir(&LocalFs, &layout, "public/dist").unwrap();
        assert_eq!(relative, "dist");
    }

    #[test]
    fn keeps_configured_dir_without_base_root() {
        let layout = SiteLayout::new("/var/www");
        let relative = relative_out_dir(&LocalFs, &layout, "build/assets").unwrap();
        assert_eq!(relative, "build/assets");
    }

    #[test]
    fn normalises_dot_segments_and_trailing_slashes() {
        let layout = SiteLayout::split("/var/www/public/", "/var/www//");
        let relative = relative_out_dir(&LocalFs, &layout, "./public/../public/dist/").unwrap();
        assert_eq!(relative, "dist");
    }

    #[test]
    fn out_dir_matching_index_root_is_empty() {
        let layout = SiteLayout::split("/var/www/public", "/var/www");
        let relative = relative_out_dir(&LocalFs, &layout, "public").unwrap();
        assert_eq!(relative, "");
    }

    #[test]
    fn rejects_out_dir_outside_index_root() {
        let layout = SiteLayout::split("/var/www/public", "/var/www");
        let result = relative_out_dir(&LocalFs, &layout, "dist");
        assert!(matches!(result, Err(AssetError::Config { .. })));

        let sibling = relative_out_dir(&LocalFs, &layout, "public2/dist");
        assert!(matches!(sibling, Err(AssetError::Config { .. })));
    }

    #[test]
    fn resolves_out_dir_that_does_not_exist_yet() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("public")).unwrap();

        let layout = SiteLayout::split(dir.path().join("public"), dir.path());
        let relative = relative_out_dir(&LocalFs, &layout, "public/build/assets").unwrap();
        assert_eq!(relative, "build/assets");
    }

    #[cfg(unix)]
    #[test]
    fn follows_symlinked_index_root() {
        let dir = tempdir().unwrap();
        let base = dir.path().join("project");
        let real_public = base.join("public");
        fs::create_dir_all(real_public.join("dist")).unwrap();
        let linked_public = dir.path().join("htdocs");
        std::os::unix::fs::symlink(&real_public, &linked_public).unwrap();

        let layout = SiteLayout::split(&linked_public, &base);
        let relative = relative_out_dir(&LocalFs, &layout, "public/dist").unwrap();
        assert_eq!(relative, "dist");
    }
}
