//! Metalink descriptor records: `metalink` → `file` → `url` / `hash`.

use serde::Deserialize;

use crate::error::MetalinkError;
use crate::url_model::derive_filename;

/// Root `<metalink>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Metalink {
    #[serde(rename = "file", default)]
    pub files: Vec<MetalinkFile>,
}

/// One `<file>` entry with its mirrors in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MetalinkFile {
    #[serde(rename = "@name", default)]
    pub name: Option<String>,
    #[serde(rename = "url", default)]
    pub urls: Vec<MetalinkUrl>,
    #[serde(rename = "hash", default)]
    pub hashes: Vec<MetalinkHash>,
}

/// A `<url>` mirror; the text content is the URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MetalinkUrl {
    #[serde(rename = "@priority", default)]
    pub priority: Option<u32>,
    #[serde(rename = "@location", default)]
    pub location: Option<String>,
    #[serde(rename = "$text", default)]
    pub url: String,
}

/// A `<hash type="...">` digest in hex.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MetalinkHash {
    #[serde(rename = "@type", default)]
    pub kind: String,
    #[serde(rename = "$text", default)]
    pub value: String,
}

/// What the metalink strategy actually downloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetalinkSource {
    pub url: String,
    /// Last path segment of `url`.
    pub filename: String,
    /// Expected SHA-256 (hex) when the file entry carries one.
    pub sha256: Option<String>,
}

impl MetalinkFile {
    pub fn sha256(&self) -> Option<&str> {
        self.hashes
            .iter()
            .find(|h| h.kind.eq_ignore_ascii_case("sha-256") && !h.value.trim().is_empty())
            .map(|h| h.value.trim())
    }
}

impl Metalink {
    /// First URL of the first file entry; later files and mirrors are ignored.
    pub fn select_source(&self) -> Result<MetalinkSource, MetalinkError> {
        let file = self.files.first().ok_or(MetalinkError::NoUrl)?;
        let url = file
            .urls
            .first()
            .map(|u| u.url.trim())
            .filter(|u| !u.is_empty())
            .ok_or(MetalinkError::NoUrl)?;
        Ok(MetalinkSource {
            url: url.to_string(),
            filename: derive_filename(url),
            sha256: file.sha256().map(str::to_string),
        })
    }
}
