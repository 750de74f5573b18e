//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// A shortened URL link with click metadata.
///
/// Maps a short code to its target URL. `is_active = false` marks a
/// soft-deleted link: it stays queryable through the administration API but
/// is never served as a redirect target.
#[derive(Debug, Clone)]
pub struct Link {
    pub id: i64,
    pub code: String,
    pub url: String,
    pub clicks: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_clicked_at: Option<DateTime<Utc>>,
}

impl Link {
    /// Creates a new Link instance.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: i64,
        code: String,
        url: String,
        clicks: i64,
        is_active: bool,
        created_at: DateTime<Utc>,
        last_clicked_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            code,
            url,
            clicks,
            is_active,
            created_at,
            last_clicked_at,
        }
    }
}

/// Input data for creating a new link.
///
/// `code` has already passed allocation (validation + availability check) and
/// `url` is scheme-normalized by the time this struct is built.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub code: String,
    pub url: String,
}

/// Deletion behavior, selected by route.
///
/// `DELETE /api/links/{code}` always maps to [`DeleteMode::Soft`];
/// the `/permanent` variant is the only path to [`DeleteMode::Hard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteMode {
    /// Marks the link inactive. Reversible via `PATCH`, keeps click stats.
    Soft,
    /// Removes the record and retires the code permanently.
    Hard,
}
