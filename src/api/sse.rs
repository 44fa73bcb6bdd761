//! Server-Sent Events feed for a session

use crate::runtime::SseEvent;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};
use tokio_stream::StreamExt;

const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(15);

/// Snapshot first, then every update the session runtime broadcasts
pub fn sse_stream(
    init_event: SseEvent,
    broadcast_rx: broadcast::Receiver<SseEvent>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let init = futures::stream::once(async move { Ok(to_frame(&init_event)) });

    let updates = BroadcastStream::new(broadcast_rx).filter_map(|result| match result {
        Ok(event) => Some(Ok(to_frame(&event))),
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            // The client resyncs from a fresh init on reconnect
            tracing::warn!(skipped, "SSE subscriber lagged");
            None
        }
    });

    Sse::new(init.chain(updates)).keep_alive(
        KeepAlive::new()
            .interval(KEEP_ALIVE_INTERVAL)
            .text("ping"),
    )
}

fn to_frame(event: &SseEvent) -> Event {
    let frame = Event::default().event(event.name());
    match serde_json::to_string(event) {
        Ok(data) => frame.data(data),
        Err(e) => {
            tracing::error!(error = %e, event = event.name(), "Failed to encode SSE event");
            frame.data("{}")
        }
    }
}
