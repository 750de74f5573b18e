//! DTO for the link deletion endpoints.

use serde::Serialize;

/// Response body for both delete flavors.
#[derive(Debug, Serialize)]
pub struct DeleteLinkResponse {
    pub message: String,
    pub code: String,
}
