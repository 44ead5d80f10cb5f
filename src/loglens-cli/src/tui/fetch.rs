//! Background query fetches.
//!
//! Each fetch runs on its own task and reports back over a channel with
//! the sequence number it was started under. The app loop compares that
//! number against the latest one it handed out and drops stale outcomes,
//! so a slow old fetch can never overwrite a newer result.

use loglens_sdk::{QueryClient, QueryRequest, QueryResponse};
use tokio::sync::mpsc::UnboundedSender;

/// Result of one background fetch, tagged with its sequence number.
#[derive(Debug)]
pub struct FetchOutcome {
    pub seq: u64,
    pub result: Result<QueryResponse, String>,
}

/// Run `request` on a background task and send the outcome to `tx`.
pub fn spawn(
    client: QueryClient,
    request: QueryRequest,
    seq: u64,
    tx: UnboundedSender<FetchOutcome>,
) {
    tokio::spawn(async move {
        let result = client.query(&request).await.map_err(|e| {
            tracing::warn!(seq, error = %e, "query fetch failed");
            e.to_string()
        });
        // The receiver is gone when the app is shutting down.
        let _ = tx.send(FetchOutcome { seq, result });
    });
}
