/// Produce the public URL of a compiled file inside the output directory.
///
/// The generated URL always uses forward slashes, regardless of the native directory
/// separator the output directory was resolved with. An empty output directory means the
/// build writes straight into the index root.
pub fn production_url(out_dir: &str, file: &str) -> String {
    let out_dir = out_dir.replace('\\', "/");
    let out_dir = out_dir.trim_matches('/');
    if out_dir.is_empty() {
        format!("/{file}")
    } else {
        format!("/{out_dir}/{file}")
    }
}
