// Copyright (c) 2026 YES INDIA Foundation
// SPDX-License-Identifier: AGPL-3.0

//! # Dashboard Query/Filter Layer
//!
//! Maintains a local mirror of the live alumni feed and derives the
//! views the dashboard renders: summary statistics, the filtered and
//! searched directory, and the rows handed to the CSV exporter.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Feed consumer task + derived read models
//!
//! Every feed push replaces the mirror wholesale (the backend sends
//! whole-collection snapshots, not deltas). The mirror itself is kept
//! newest-registration-first; records with a missing or unparseable
//! timestamp sort as oldest. Filtering recomputes synchronously from the
//! full mirror on every call and is idempotent.
//!
//! The service owns its consumer task; [`DashboardService::shutdown`]
//! (or dropping the service) tears down the task and with it the feed
//! subscription, so nothing keeps streaming for a dashboard nobody looks
//! at.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::domain::feed::{DirectoryFeed, DirectorySnapshot, FeedError, FeedSubscription};
use crate::domain::record::AlumniWithId;

/// Headline numbers shown on the dashboard cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryStats {
    pub total_alumni: usize,
    pub total_schools: usize,
    pub total_companies: usize,
    /// Registrations whose timestamp falls within the last 30 days
    /// (inclusive lower bound).
    pub recent_registrations: usize,
}

/// Discrete filter plus free-text search over the mirror.
#[derive(Debug, Clone, Default)]
pub struct DirectoryFilter {
    /// Exact graduation-year match, applied before the search term.
    pub batch: Option<String>,
    /// Case-insensitive substring, OR-combined across name, school, job
    /// title, company, place, qualification, and mobile number.
    pub search: Option<String>,
}

impl DirectoryFilter {
    pub fn is_empty(&self) -> bool {
        self.batch.is_none() && self.search.as_deref().is_none_or(|s| s.trim().is_empty())
    }
}

#[derive(Debug, Default)]
struct Mirror {
    alumni: Vec<AlumniWithId>,
    stats: DirectoryStats,
    ready: bool,
}

/// Live view over the alumni directory.
pub struct DashboardService {
    mirror: Arc<RwLock<Mirror>>,
    consumer: Mutex<Option<JoinHandle<()>>>,
}

impl DashboardService {
    /// Subscribe to the feed and start mirroring it.
    pub async fn spawn(feed: Arc<dyn DirectoryFeed>) -> Result<Self, FeedError> {
        let subscription = feed.subscribe().await?;
        let mirror = Arc::new(RwLock::new(Mirror::default()));
        let consumer = tokio::spawn(consume(subscription, Arc::clone(&mirror)));
        Ok(Self {
            mirror,
            consumer: Mutex::new(Some(consumer)),
        })
    }

    /// Whether at least one snapshot has been applied.
    pub fn is_ready(&self) -> bool {
        self.mirror.read().ready
    }

    pub fn stats(&self) -> DirectoryStats {
        self.mirror.read().stats
    }

    /// The filtered directory view, derived from the full mirror.
    pub fn alumni(&self, filter: &DirectoryFilter) -> Vec<AlumniWithId> {
        let mirror = self.mirror.read();
        filter_alumni(&mirror.alumni, filter)
    }

    /// Tear down the consumer task (and with it the feed subscription).
    pub fn shutdown(&self) {
        if let Some(handle) = self.consumer.lock().take() {
            handle.abort();
            debug!("dashboard feed consumer stopped");
        }
    }
}

impl Drop for DashboardService {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn consume(mut subscription: FeedSubscription, mirror: Arc<RwLock<Mirror>>) {
    loop {
        let snapshot = subscription.snapshots.borrow_and_update().clone();
        apply_snapshot(&mirror, snapshot);
        if subscription.snapshots.changed().await.is_err() {
            debug!("directory feed closed");
            return;
        }
    }
}

fn apply_snapshot(mirror: &RwLock<Mirror>, snapshot: DirectorySnapshot) {
    let mut alumni = snapshot.alumni;
    sort_newest_first(&mut alumni);
    let stats = compute_stats(&alumni, Utc::now());
    debug!(total = stats.total_alumni, "directory mirror replaced");

    let mut guard = mirror.write();
    guard.alumni = alumni;
    guard.stats = stats;
    guard.ready = true;
}

/// Newest registration first; missing/unparseable timestamps last.
pub fn sort_newest_first(alumni: &mut [AlumniWithId]) {
    alumni.sort_by(|a, b| b.record.registered_at().cmp(&a.record.registered_at()));
}

/// Derive the dashboard statistics from a full mirror.
pub fn compute_stats(alumni: &[AlumniWithId], now: DateTime<Utc>) -> DirectoryStats {
    let schools: HashSet<&str> = alumni
        .iter()
        .map(|a| a.record.school_attended.as_str())
        .collect();
    let companies: HashSet<&str> = alumni
        .iter()
        .map(|a| a.record.company_name.as_str())
        .collect();
    let window_start = now - Duration::days(30);
    let recent = alumni
        .iter()
        .filter(|a| {
            a.record
                .registered_at()
                .is_some_and(|at| at >= window_start)
        })
        .count();

    DirectoryStats {
        total_alumni: alumni.len(),
        total_schools: schools.len(),
        total_companies: companies.len(),
        recent_registrations: recent,
    }
}

/// Apply the discrete filter, then the free-text search.
pub fn filter_alumni(alumni: &[AlumniWithId], filter: &DirectoryFilter) -> Vec<AlumniWithId> {
    if filter.is_empty() {
        return alumni.to_vec();
    }

    let needle = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    alumni
        .iter()
        .filter(|a| match &filter.batch {
            Some(batch) => a.record.year_of_graduation == *batch,
            None => true,
        })
        .filter(|a| match &needle {
            Some(needle) => matches_search(a, needle),
            None => true,
        })
        .cloned()
        .collect()
}

fn matches_search(alumni: &AlumniWithId, needle: &str) -> bool {
    let record = &alumni.record;
    [
        &record.full_name,
        &record.school_attended,
        &record.current_job_title,
        &record.company_name,
        &record.place,
        &record.qualification,
        &record.mobile_number,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}
