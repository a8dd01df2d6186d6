//! Small URL helpers for manifest rewriting.
//!
//! Origin playlists reference renditions and segments relative to the
//! manifest's own directory; these helpers resolve those references and
//! re-root segment paths onto a CDN base when one is configured.

/// The directory portion of a URL, including the trailing slash.
pub fn directory_of(url: &str) -> &str {
    match url.rfind('/') {
        Some(i) => &url[..=i],
        None => url,
    }
}

/// Join a possibly-relative reference against a base directory.
/// Absolute references pass through unchanged.
pub fn join_url(base_dir: &str, reference: &str) -> String {
    if reference.starts_with("http://") || reference.starts_with("https://") {
        return reference.to_string();
    }
    let base = base_dir.trim_end_matches('/');
    let rel = reference.trim_start_matches('/');
    format!("{base}/{rel}")
}

/// The path portion of an absolute URL (everything after scheme and host),
/// with a leading slash.
pub fn path_of(url: &str) -> &str {
    let after_scheme = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    match after_scheme.find('/') {
        Some(i) => &after_scheme[i..],
        None => "/",
    }
}

/// Base URL that segment file names are resolved against: the CDN base plus
/// the origin path when a CDN is configured, the child manifest's own
/// directory otherwise.
pub fn segment_base(child_url: &str, cdn_base: Option<&str>) -> String {
    let child_dir = directory_of(child_url);
    match cdn_base {
        Some(cdn) => format!("{}{}", cdn.trim_end_matches('/'), path_of(child_dir)),
        None => child_dir.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_of_strips_file() {
        assert_eq!(
            directory_of("https://origin.example/out/v1/index.m3u8"),
            "https://origin.example/out/v1/"
        );
    }

    #[test]
    fn join_relative_and_absolute() {
        assert_eq!(
            join_url("https://origin.example/out/", "index_1.m3u8"),
            "https://origin.example/out/index_1.m3u8"
        );
        assert_eq!(
            join_url("https://origin.example/out/", "https://elsewhere.example/a.m3u8"),
            "https://elsewhere.example/a.m3u8"
        );
    }

    #[test]
    fn path_of_drops_scheme_and_host() {
        assert_eq!(path_of("https://origin.example/out/v1/"), "/out/v1/");
        assert_eq!(path_of("https://origin.example"), "/");
    }

    #[test]
    fn segment_base_prefers_cdn() {
        let child = "https://origin.example/out/v1/index_1.m3u8";
        assert_eq!(
            segment_base(child, Some("https://cdn.example.com")),
            "https://cdn.example.com/out/v1/"
        );
        assert_eq!(segment_base(child, None), "https://origin.example/out/v1/");
    }
}
