//! URL normalization utilities.
//!
//! Guarantees that every stored URL is absolute and carries an explicit
//! HTTP(S) scheme, defaulting to `https://` when the scheme is missing.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Matches inputs that already carry a scheme (`https://`, `ftp://`, ...).
static SCHEME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*://").unwrap());

/// Errors that can occur during URL normalization.
#[derive(Debug, thiserror::Error)]
pub enum UrlNormalizationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,
}

/// Prefixes `https://` when the input has no scheme.
///
/// Inputs that already name a scheme are returned unchanged, whatever the
/// scheme is; rejection of non-HTTP(S) schemes happens in [`normalize_url`].
pub fn ensure_scheme(url: &str) -> String {
    if SCHEME_REGEX.is_match(url) {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

/// Normalizes a URL for storage.
///
/// Trims surrounding whitespace, defaults the scheme to `https://`, and
/// validates that the result parses as an absolute HTTP(S) URL with a host.
/// The returned string is the (possibly scheme-prefixed) input, not a
/// re-serialized URL, so `example.com` normalizes to exactly
/// `https://example.com`.
///
/// # Errors
///
/// Returns [`UrlNormalizationError::InvalidFormat`] for malformed URLs.
/// Returns [`UrlNormalizationError::UnsupportedProtocol`] for non-HTTP(S)
/// schemes.
pub fn normalize_url(input: &str) -> Result<String, UrlNormalizationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlNormalizationError::InvalidFormat("empty URL".to_string()));
    }

    let candidate = ensure_scheme(trimmed);

    let parsed =
        Url::parse(&candidate).map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlNormalizationError::UnsupportedProtocol),
    }

    if parsed.host_str().is_none() {
        return Err(UrlNormalizationError::InvalidFormat(
            "URL has no host".to_string(),
        ));
    }

    Ok(candidate)
}
