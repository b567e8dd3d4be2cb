//! Last path segment of a URL.

/// Extracts the last non-empty path segment of `url`.
///
/// Inputs that do not parse as a URL are split on `/` as plain paths, so
/// `host/dir/file.bin` still yields `file.bin`. Returns `None` for empty paths
/// and `.`/`..` segments.
pub fn filename_from_url_path(url: &str) -> Option<String> {
    let segment = match url::Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()?
            .filter(|s| !s.is_empty())
            .last()?
            .to_string(),
        Err(_) => {
            let path = url.split(['?', '#']).next().unwrap_or_default();
            path.rsplit('/').find(|s| !s.is_empty())?.to_string()
        }
    };
    if segment == "." || segment == ".." {
        return None;
    }
    Some(segment)
}
