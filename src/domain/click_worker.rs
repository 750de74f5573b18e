//! Background worker draining the click-event queue.

use std::sync::Arc;

use metrics::counter;
use tokio::sync::mpsc;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, info, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::LinkRepository;

/// Receives click events and applies the atomic click increment.
///
/// Each event is retried a few times with exponential backoff and jitter;
/// a click that still cannot be recorded is logged and dropped. Failures
/// never propagate back to the request that produced the event.
///
/// Runs until the sending side of the channel is dropped.
pub async fn run_click_worker(
    mut rx: mpsc::Receiver<ClickEvent>,
    links: Arc<dyn LinkRepository>,
) {
    info!("Click worker started");

    while let Some(event) = rx.recv().await {
        let strategy = ExponentialBackoff::from_millis(50).map(jitter).take(3);

        match Retry::spawn(strategy, || links.increment_clicks(&event.code)).await {
            Ok(()) => {
                counter!("clicks_recorded_total").increment(1);
                debug!(code = %event.code, "Recorded click");
            }
            Err(e) => {
                counter!("clicks_failed_total").increment(1);
                warn!(code = %event.code, error = %e, "Failed to record click");
            }
        }
    }

    info!("Click worker stopped: channel closed");
}
