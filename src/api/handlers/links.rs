//! Handlers for link administration (list, get, update, delete).

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::warn;

use crate::api::dto::delete_link::DeleteLinkResponse;
use crate::api::dto::link::LinkResponse;
use crate::api::dto::update_link::UpdateLinkRequest;
use crate::domain::entities::DeleteMode;
use crate::error::AppError;
use crate::state::AppState;

/// Lists all links, newest first.
///
/// # Endpoint
///
/// `GET /api/links`
///
/// No pagination; acceptable at this service's scale.
pub async fn list_links_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<LinkResponse>>, AppError> {
    let links = state.link_service.list_links().await?;

    Ok(Json(links.into_iter().map(LinkResponse::from).collect()))
}

/// Fetches a single link by code.
///
/// # Endpoint
///
/// `GET /api/links/{code}`
///
/// Soft-deleted links are returned too, so administrators can always
/// inspect a deactivated record.
///
/// # Errors
///
/// Returns 404 if no link owns the code.
pub async fn get_link_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state.link_service.get_link(&code).await?;

    Ok(Json(link.into()))
}

/// Updates a link's visibility flag.
///
/// # Endpoint
///
/// `PATCH /api/links/{code}`
///
/// # Request Body
///
/// ```json
/// { "isActive": false }
/// ```
///
/// # Cache
///
/// The cache entry for this code is invalidated so the next redirect sees
/// the new visibility without waiting for TTL expiry.
///
/// # Errors
///
/// Returns 404 if no link owns the code.
pub async fn update_link_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateLinkRequest>,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state
        .link_service
        .set_active(&code, payload.is_active)
        .await?;

    if let Err(e) = state.cache.invalidate(&code).await {
        warn!(error = ?e, code, "Failed to invalidate cache after update");
    }

    Ok(Json(link.into()))
}

/// Soft-deletes a link.
///
/// # Endpoint
///
/// `DELETE /api/links/{code}`
///
/// # Behavior
///
/// Equivalent to `PATCH` with `{"isActive": false}`: the record stays in the
/// store with its click history and can be restored later. Redirects for the
/// code return 404 immediately (the cache entry is invalidated).
///
/// # Errors
///
/// Returns 404 if no link owns the code.
pub async fn delete_link_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<DeleteLinkResponse>, AppError> {
    state
        .link_service
        .delete_link(&code, DeleteMode::Soft)
        .await?;

    if let Err(e) = state.cache.invalidate(&code).await {
        warn!(error = ?e, code, "Failed to invalidate cache after delete");
    }

    Ok(Json(DeleteLinkResponse {
        message: "Link deactivated".to_string(),
        code,
    }))
}

/// Permanently deletes a link.
///
/// # Endpoint
///
/// `DELETE /api/links/{code}/permanent`
///
/// # Behavior
///
/// Removes the record and retires its code: the code is never handed out
/// again, so stale short links can't silently point at unrelated content.
///
/// # Errors
///
/// Returns 404 if no link owns the code.
pub async fn permanent_delete_link_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<DeleteLinkResponse>, AppError> {
    state
        .link_service
        .delete_link(&code, DeleteMode::Hard)
        .await?;

    if let Err(e) = state.cache.invalidate(&code).await {
        warn!(error = ?e, code, "Failed to invalidate cache after permanent delete");
    }

    Ok(Json(DeleteLinkResponse {
        message: "Link permanently deleted".to_string(),
        code,
    }))
}
