//! Filename sanitization for the local filesystem.

/// Linux NAME_MAX.
const NAME_MAX: usize = 255;

/// Makes a URL-derived name safe to create in the current directory.
///
/// Separators, NUL, control characters and whitespace become `_` (runs collapse
/// to one), leading/trailing dots and underscores are trimmed, and the result
/// is cut to 255 bytes on a char boundary.
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        let c = if c == '/' || c == '\\' || c.is_control() || c.is_whitespace() {
            '_'
        } else {
            c
        };
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }

    let trimmed = out.trim_matches(|c| c == '.' || c == '_');
    let mut take = trimmed.len().min(NAME_MAX);
    while !trimmed.is_char_boundary(take) {
        take -= 1;
    }
    trimmed[..take].to_string()
}
