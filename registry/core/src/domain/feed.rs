// Copyright (c) 2026 YES INDIA Foundation
// SPDX-License-Identifier: AGPL-3.0

//! # Directory Feed Contract
//!
//! Push-based subscription to the live alumni collection. The backend
//! delivers whole-collection snapshots, not deltas; every push replaces
//! the subscriber's view entirely.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Boundary trait for the live-feed collaborator
//!
//! Implementations live in `infrastructure`; the dashboard consumes the
//! subscription and must drop it (or call [`FeedSubscription::shutdown`])
//! when the view goes away so the producer task is torn down.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::domain::record::AlumniWithId;

/// One full-collection snapshot as delivered by the feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectorySnapshot {
    pub alumni: Vec<AlumniWithId>,
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed connection failed: {0}")]
    Connection(String),
    #[error("feed delivered a malformed snapshot: {0}")]
    Malformed(String),
}

/// A live subscription: snapshot receiver plus producer-task guard.
///
/// Dropping the subscription aborts the producer, making teardown the
/// default rather than something a caller can forget.
pub struct FeedSubscription {
    pub snapshots: watch::Receiver<DirectorySnapshot>,
    producer: Option<JoinHandle<()>>,
}

impl FeedSubscription {
    pub fn new(snapshots: watch::Receiver<DirectorySnapshot>, producer: JoinHandle<()>) -> Self {
        Self {
            snapshots,
            producer: Some(producer),
        }
    }

    /// Subscription without a producer task (in-memory feeds).
    pub fn detached(snapshots: watch::Receiver<DirectorySnapshot>) -> Self {
        Self {
            snapshots,
            producer: None,
        }
    }

    /// Explicit teardown; equivalent to dropping the subscription.
    pub fn shutdown(mut self) {
        self.abort_producer();
    }

    fn abort_producer(&mut self) {
        if let Some(handle) = self.producer.take() {
            handle.abort();
        }
    }
}

impl Drop for FeedSubscription {
    fn drop(&mut self) {
        self.abort_producer();
    }
}

/// External live-feed collaborator over the alumni collection.
#[async_trait]
pub trait DirectoryFeed: Send + Sync {
    /// Open a subscription delivering the current snapshot immediately
    /// and a new snapshot on every upstream change.
    async fn subscribe(&self) -> Result<FeedSubscription, FeedError>;
}
