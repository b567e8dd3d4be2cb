//! Local filename derivation from download URLs.

mod path;
mod sanitize;

pub use path::filename_from_url_path;
pub use sanitize::sanitize_filename;

/// Used when the URL path yields nothing usable.
pub const DEFAULT_FILENAME: &str = "download.bin";

/// Derives a safe filename from the last path segment of `url`.
///
/// `http://host/dir/file.bin?x=1` → `file.bin`. Root paths, `.`/`..` segments and
/// names that sanitize to nothing fall back to [`DEFAULT_FILENAME`].
pub fn derive_filename(url: &str) -> String {
    let Some(raw) = filename_from_url_path(url) else {
        return DEFAULT_FILENAME.to_string();
    };
    let sanitized = sanitize_filename(&raw);
    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        DEFAULT_FILENAME.to_string()
    } else {
        sanitized
    }
}
