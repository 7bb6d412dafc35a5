// Copyright (c) 2026 YES INDIA Foundation
// SPDX-License-Identifier: AGPL-3.0

//! # Live Directory Feeds
//!
//! [`DirectoryFeed`] implementations: the Firebase Realtime Database
//! event stream for production and an in-memory feed for tests and
//! offline development.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Push-based collection subscription
//!
//! The Realtime Database streams `put`/`patch` events over SSE. The
//! registry treats every change event as an invalidation and refetches
//! the whole collection, preserving the snapshot (not delta) contract of
//! [`DirectoryFeed`]. Dropped connections reconnect with capped backoff;
//! dropping the subscription aborts the producer task.

use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::domain::feed::{DirectoryFeed, DirectorySnapshot, FeedError, FeedSubscription};
use crate::infrastructure::firebase::RealtimeDbClient;

const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// SSE-driven feed over the Realtime Database `alumni` collection.
pub struct FirebaseLiveFeed {
    database: RealtimeDbClient,
    /// Streaming client without a total-request timeout; a healthy SSE
    /// connection stays open indefinitely.
    stream_client: Client,
}

impl FirebaseLiveFeed {
    pub fn new(database: RealtimeDbClient) -> Self {
        let stream_client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");
        Self {
            database,
            stream_client,
        }
    }
}

#[async_trait]
impl DirectoryFeed for FirebaseLiveFeed {
    async fn subscribe(&self) -> Result<FeedSubscription, FeedError> {
        let initial = self
            .database
            .fetch_snapshot()
            .await
            .map_err(|e| FeedError::Connection(e.to_string()))?;
        let (tx, rx) = watch::channel(initial);
        let producer = tokio::spawn(stream_changes(
            self.stream_client.clone(),
            self.database.clone(),
            tx,
        ));
        Ok(FeedSubscription::new(rx, producer))
    }
}

async fn stream_changes(
    client: Client,
    database: RealtimeDbClient,
    tx: watch::Sender<DirectorySnapshot>,
) {
    let url = database.collection_url();
    let mut backoff = INITIAL_BACKOFF;

    loop {
        match open_event_stream(&client, &url).await {
            Ok(response) => {
                backoff = INITIAL_BACKOFF;
                if consume_event_stream(response, &database, &tx).await.is_err() {
                    // All receivers are gone; stop streaming.
                    return;
                }
                debug!("directory event stream ended, reconnecting");
            }
            Err(err) => {
                warn!(error = %err, "directory event stream connect failed");
            }
        }
        if tx.is_closed() {
            return;
        }
        tokio::time::sleep(backoff).await;
        backoff = (backoff * 2).min(MAX_BACKOFF);
    }
}

async fn open_event_stream(client: &Client, url: &str) -> Result<reqwest::Response, FeedError> {
    let response = client
        .get(url)
        .header("Accept", "text/event-stream")
        .send()
        .await
        .map_err(|e| FeedError::Connection(e.to_string()))?;
    if !response.status().is_success() {
        return Err(FeedError::Connection(format!(
            "event stream answered status {}",
            response.status().as_u16()
        )));
    }
    Ok(response)
}

/// Read SSE events until the connection drops. `Err(())` means every
/// subscriber is gone and the producer should stop for good.
async fn consume_event_stream(
    response: reqwest::Response,
    database: &RealtimeDbClient,
    tx: &watch::Sender<DirectorySnapshot>,
) -> Result<(), ()> {
    let mut body = response.bytes_stream();
    let mut buffer = String::new();
    let mut current_event = String::new();

    while let Some(chunk) = body.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(err) => {
                debug!(error = %err, "directory event stream read failed");
                return Ok(());
            }
        };
        buffer.push_str(&String::from_utf8_lossy(&chunk));

        while let Some(newline) = buffer.find('\n') {
            let line = buffer[..newline].trim_end_matches('\r').to_string();
            buffer.drain(..=newline);

            if let Some(event) = line.strip_prefix("event:") {
                current_event = event.trim().to_string();
            } else if line.starts_with("data:") && is_change_event(&current_event) {
                match database.fetch_snapshot().await {
                    Ok(snapshot) => {
                        if tx.send(snapshot).is_err() {
                            return Err(());
                        }
                    }
                    Err(err) => {
                        warn!(error = %err, "snapshot refetch after change event failed");
                    }
                }
            }
        }
    }
    Ok(())
}

fn is_change_event(event: &str) -> bool {
    matches!(event, "put" | "patch")
}

/// Watch-channel feed for tests and the offline development backend.
pub struct InMemoryFeed {
    tx: watch::Sender<DirectorySnapshot>,
}

impl InMemoryFeed {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(DirectorySnapshot::default());
        Self { tx }
    }

    /// Replace the collection, waking every subscriber.
    pub fn push(&self, snapshot: DirectorySnapshot) {
        // send_replace never fails even with no subscribers.
        self.tx.send_replace(snapshot);
    }
}

impl Default for InMemoryFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DirectoryFeed for InMemoryFeed {
    async fn subscribe(&self) -> Result<FeedSubscription, FeedError> {
        Ok(FeedSubscription::detached(self.tx.subscribe()))
    }
}
