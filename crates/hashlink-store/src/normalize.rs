const DEFAULT_SCHEME: &str = "https://";

/// Ensures `long_url` carries an `http://` or `https://` scheme, prefixing
/// `https://` otherwise. Nothing else about the URL is checked.
pub fn normalize_url(long_url: &str) -> String {
    if has_http_scheme(long_url) {
        long_url.to_string()
    } else {
        format!("{DEFAULT_SCHEME}{long_url}")
    }
}

fn has_http_scheme(url: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        url.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}
