//! Handler for short URL redirect.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use metrics::counter;
use tracing::{debug, error, warn};

use crate::domain::click_event::ClickEvent;
use crate::state::AppState;

/// HTML body served when a code is missing or soft-deleted.
#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
struct NotFoundPage;

/// HTML body served on an unexpected store failure.
#[derive(Template, WebTemplate)]
#[template(path = "server_error.html")]
struct ServerErrorPage;

/// Redirects a short code to its target URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Check cache for the target URL
/// 2. On cache miss, resolve through the service (active links only)
/// 3. Asynchronously populate the cache
/// 4. Enqueue a click event for the background worker
/// 5. Return 302 Found with a `Location` header
///
/// # Click Tracking
///
/// Click events go to a bounded channel, fire-and-forget: the redirect is
/// never delayed by the click write, and a full queue drops the event. A
/// failed increment never turns a successful redirect into an error.
///
/// # Errors
///
/// A missing or deactivated code renders a 404 HTML page with no mutation.
/// A store failure renders a 500 HTML page rather than exposing internals.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Response {
    let cached = match state.cache.get_url(&code).await {
        Ok(hit) => hit,
        Err(e) => {
            error!("Cache error: {}", e);
            None
        }
    };

    let target = match cached {
        Some(url) => {
            debug!("Cache HIT for {}", code);
            Some(url)
        }
        None => match state.link_service.resolve_redirect(&code).await {
            Ok(Some(url)) => {
                // Asynchronously update cache (fire-and-forget)
                let cache = state.cache.clone();
                let cache_code = code.clone();
                let cache_url = url.clone();
                tokio::spawn(async move {
                    if let Err(e) = cache.set_url(&cache_code, &cache_url, None).await {
                        error!("Failed to cache URL: {}", e);
                    }
                });

                Some(url)
            }
            Ok(None) => None,
            Err(e) => {
                counter!("redirect_errors_total").increment(1);
                error!(code, error = %e, "Redirect lookup failed");
                return (StatusCode::INTERNAL_SERVER_ERROR, ServerErrorPage).into_response();
            }
        },
    };

    match target {
        Some(url) => {
            if state.click_sender.try_send(ClickEvent::new(code.clone())).is_err() {
                counter!("clicks_dropped_total").increment(1);
                warn!(code, "Click queue full, dropping click event");
            }

            counter!("redirects_total").increment(1);
            debug!(code, url, "Redirecting");

            (StatusCode::FOUND, [(header::LOCATION, url)]).into_response()
        }
        None => {
            counter!("redirects_not_found_total").increment(1);
            (StatusCode::NOT_FOUND, NotFoundPage).into_response()
        }
    }
}
