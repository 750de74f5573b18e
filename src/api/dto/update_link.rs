//! DTO for the link update endpoint.

use serde::Deserialize;

/// Request body for `PATCH /api/links/{code}`.
///
/// Flips redirect eligibility only: `false` soft-deletes the link, `true`
/// restores it. Clicks and the target URL are never touched here.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLinkRequest {
    pub is_active: bool,
}
