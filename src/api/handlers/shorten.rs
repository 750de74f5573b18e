//! Handler for link creation.

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a shortened URL.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "example.com/some/page",
///   "code": "promo1"   // optional
/// }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "code": "promo1",
///   "url": "https://example.com/some/page",
///   "shortUrl": "https://sho.rt/promo1"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 for an invalid URL or malformed custom code, and 409 when the
/// requested code is already taken or retired. The 409 can also surface when
/// two concurrent requests race for the same code; the store's unique
/// constraint decides the winner.
pub async fn shorten_handler(
    State(state): State<AppState>,
    Json(payload): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .create_short_link(payload.url, payload.code)
        .await?;

    let short_url = state.link_service.short_url(&link.code);

    Ok((
        StatusCode::CREATED,
        Json(ShortenResponse {
            code: link.code,
            url: link.url,
            short_url,
        }),
    ))
}
