//! HTTP HEAD / metadata probing.
//!
//! Uses the curl crate (libcurl) to fetch response headers of the final
//! response after redirects and extract the announced body size.

mod parse;

use crate::config::HttpConfig;
use crate::error::FetchError;
use std::str;

use parse::parse_headers;

/// Result of a HEAD request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadResult {
    /// Raw `Content-Length` value, if the header was present.
    pub content_length: Option<String>,
    /// `Content-Type` value if present; logged only.
    pub content_type: Option<String>,
}

impl HeadResult {
    /// Total body size announced by the server.
    ///
    /// Fails when the header is absent or is not a decimal byte count.
    pub fn total_size(&self) -> Result<u64, FetchError> {
        let raw = self
            .content_length
            .as_deref()
            .ok_or(FetchError::MissingContentLength)?;
        raw.parse::<u64>()
            .map_err(|_| FetchError::InvalidContentLength(raw.to_string()))
    }
}

/// Performs a HEAD request and returns parsed metadata.
///
/// Follows redirects. Runs in the current thread; call from `spawn_blocking`
/// if used from async code.
pub fn probe(url: &str, http: &HttpConfig) -> Result<HeadResult, FetchError> {
    let mut headers: Vec<String> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.nobody(true)?; // HEAD request
    easy.follow_location(true)?;
    easy.max_redirections(http.max_redirections)?;
    easy.useragent(&http.user_agent)?;
    easy.connect_timeout(http.connect_timeout())?;
    easy.timeout(http.connect_timeout() * 2)?;

    {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                headers.push(s.trim_end().to_string());
            }
            true
        })?;
        transfer.perform()?;
    }

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(FetchError::Http {
            method: "HEAD",
            url: url.to_string(),
            status: code,
        });
    }

    let head = parse_headers(&headers);
    tracing::debug!(
        url,
        content_length = ?head.content_length,
        content_type = ?head.content_type,
        "probe complete"
    );
    Ok(head)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn head(len: Option<&str>) -> HeadResult {
        HeadResult {
            content_length: len.map(str::to_string),
            ..HeadResult::default()
        }
    }

    #[test]
    fn total_size_numeric() {
        assert_eq!(head(Some("1048576")).total_size().unwrap(), 1_048_576);
    }

    #[test]
    fn total_size_missing() {
        assert!(matches!(
            head(None).total_size(),
            Err(FetchError::MissingContentLength)
        ));
    }

    #[test]
    fn total_size_not_a_number() {
        match head(Some("12ab")).total_size() {
            Err(FetchError::InvalidContentLength(v)) => assert_eq!(v, "12ab"),
            other => panic!("expected InvalidContentLength, got {other:?}"),
        }
        assert!(head(Some("-5")).total_size().is_err());
    }
}
