use regex::Regex;

fn stylesheet_extension() -> &'static Regex {
    use std::sync::OnceLock;

    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\.(?:css|scss|sass|less|styl|stylus)$").expect("invalid stylesheet regex")
    })
}

/// Determine whether an entry is itself a stylesheet rather than a script importing styles.
///
/// Only the final extension counts, so `styles/app.css.js` is a script entry.
pub fn is_stylesheet_entry(entry: &str) -> bool {
    stylesheet_extension().is_match(entry)
}
