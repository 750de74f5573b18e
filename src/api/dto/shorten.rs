//! DTOs for the link creation endpoint.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::Validate;

/// Compiled regex for custom code validation.
static CUSTOM_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]{3,8}$").unwrap());

/// Request body for `POST /api/shorten`.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The original URL to shorten. A missing scheme defaults to `https://`.
    #[validate(length(min = 1, max = 2048, message = "URL must be 1-2048 characters"))]
    pub url: String,

    /// Optional custom short code.
    #[validate(regex(
        path = "*CUSTOM_CODE_REGEX",
        message = "Code must be 3-8 characters (letters and numbers only)"
    ))]
    pub code: Option<String>,
}

/// Response body for a created link.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    pub code: String,
    pub url: String,
    pub short_url: String,
}
