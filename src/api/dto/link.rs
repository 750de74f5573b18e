//! JSON representation of a link record.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::Link;

/// Full link record as returned by the administration endpoints.
///
/// Field names are the service's wire contract (camelCase), independent of
/// the storage column names.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkResponse {
    pub id: i64,
    pub code: String,
    pub url: String,
    pub clicks: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_clicked_at: Option<DateTime<Utc>>,
}

impl From<Link> for LinkResponse {
    fn from(link: Link) -> Self {
        Self {
            id: link.id,
            code: link.code,
            url: link.url,
            clicks: link.clicks,
            is_active: link.is_active,
            created_at: link.created_at,
            last_clicked_at: link.last_clicked_at,
        }
    }
}
