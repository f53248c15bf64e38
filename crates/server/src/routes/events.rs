use std::convert::Infallible;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures_util::Stream;
use service::changes::ChangeTable;
use tokio_stream::{wrappers::{errors::BroadcastStreamRecvError, BroadcastStream}, StreamExt};
use tracing::warn;

use crate::state::AppState;

/// Server-sent change notifications. The event name is the table
/// (`service` or `tool`); the data is the JSON change event.
pub async fn events(State(state): State<AppState>) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.catalog.changes().subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|msg| match msg {
        Ok(change) => {
            let name = match change.table {
                ChangeTable::Service => "service",
                ChangeTable::Tool => "tool",
            };
            Event::default().event(name).json_data(&change).ok().map(Ok)
        }
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            warn!(skipped, "change stream lagged");
            None
        }
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}
