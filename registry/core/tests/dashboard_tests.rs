// Copyright (c) 2026 YES INDIA Foundation
// SPDX-License-Identifier: AGPL-3.0

//! Live-mirror tests: feed snapshots flowing into the dashboard read
//! models, teardown of the consumer task, and the CSV export path over
//! filtered rows.

use std::sync::Arc;
use std::time::Duration;

use alumni_connect_core::application::dashboard::{DashboardService, DirectoryFilter};
use alumni_connect_core::application::export::{export_csv, export_filename, EXPORT_HEADERS};
use alumni_connect_core::application::registration::SubmissionGateway;
use alumni_connect_core::domain::feed::{DirectoryFeed, DirectorySnapshot};
use alumni_connect_core::domain::record::{AlumniId, AlumniRecord, AlumniWithId};
use alumni_connect_core::infrastructure::live_feed::InMemoryFeed;
use alumni_connect_core::infrastructure::InMemoryStore;
use chrono::NaiveDate;

fn row(id: &str, f: impl FnOnce(&mut AlumniRecord)) -> AlumniWithId {
    let mut record = AlumniRecord::default();
    f(&mut record);
    AlumniWithId {
        id: AlumniId(id.into()),
        record,
    }
}

/// Poll until the condition holds; feed application is asynchronous.
async fn eventually(mut condition: impl FnMut() -> bool) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached in time");
}

#[tokio::test]
async fn mirror_tracks_whole_snapshots() {
    let feed = Arc::new(InMemoryFeed::default());
    let dashboard = DashboardService::spawn(feed.clone()).await.unwrap();
    eventually(|| dashboard.is_ready()).await;
    assert_eq!(dashboard.stats().total_alumni, 0);

    feed.push(DirectorySnapshot {
        alumni: vec![
            row("a", |r| r.school_attended = "Green Valley".into()),
            row("b", |r| r.school_attended = "Green Valley".into()),
            row("c", |r| r.school_attended = "Hill Top".into()),
        ],
    });
    eventually(|| dashboard.stats().total_alumni == 3).await;
    assert_eq!(dashboard.stats().total_schools, 2);

    // A later snapshot replaces the mirror, never merges into it.
    feed.push(DirectorySnapshot {
        alumni: vec![row("c", |r| r.school_attended = "Hill Top".into())],
    });
    eventually(|| dashboard.stats().total_alumni == 1).await;
    assert_eq!(dashboard.stats().total_schools, 1);
}

#[tokio::test]
async fn submissions_appear_on_the_dashboard() {
    let store = Arc::new(InMemoryStore::default());
    let feed: Arc<dyn DirectoryFeed> = store.clone();
    let dashboard = DashboardService::spawn(feed).await.unwrap();
    eventually(|| dashboard.is_ready()).await;

    let mut record = AlumniRecord::default();
    record.full_name = "Asha Verma".into();
    record.year_of_graduation = "2019".into();
    store.submit(&record, None).await.unwrap();

    eventually(|| dashboard.stats().total_alumni == 1).await;
    // Stamped at submit time, so it lands inside the 30-day window.
    assert_eq!(dashboard.stats().recent_registrations, 1);

    let hits = dashboard.alumni(&DirectoryFilter {
        batch: Some("2019".into()),
        search: Some("asha".into()),
    });
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].record.full_name, "Asha Verma");
}

#[tokio::test]
async fn shutdown_stops_the_consumer() {
    let feed = Arc::new(InMemoryFeed::default());
    let dashboard = DashboardService::spawn(feed.clone()).await.unwrap();
    eventually(|| dashboard.is_ready()).await;

    dashboard.shutdown();
    feed.push(DirectorySnapshot {
        alumni: vec![row("a", |_| {})],
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(dashboard.stats().total_alumni, 0);

    // Shutdown twice is fine.
    dashboard.shutdown();
}

#[tokio::test]
async fn filtered_rows_export_as_csv() {
    let feed = Arc::new(InMemoryFeed::default());
    let dashboard = DashboardService::spawn(feed.clone()).await.unwrap();

    feed.push(DirectorySnapshot {
        alumni: vec![
            row("a", |r| {
                r.full_name = "Asha, Verma".into();
                r.mobile_number = "9876543210".into();
                r.year_of_graduation = "2019".into();
                r.company_name = "Infosys".into();
            }),
            row("b", |r| {
                r.full_name = "Bilal Mir".into();
                r.year_of_graduation = "2021".into();
            }),
        ],
    });
    eventually(|| dashboard.stats().total_alumni == 2).await;

    let rows = dashboard.alumni(&DirectoryFilter {
        batch: Some("2019".into()),
        ..Default::default()
    });
    let csv = export_csv(&rows);
    let mut lines = csv.lines();
    assert_eq!(lines.next().unwrap(), EXPORT_HEADERS.join(","));
    let data = lines.next().unwrap();
    assert!(data.starts_with("\"Asha, Verma\",9876543210"));
    assert!(data.contains("Infosys"));
    assert!(lines.next().is_none());

    let date = NaiveDate::from_ymd_opt(2026, 8, 26).unwrap();
    assert_eq!(
        export_filename("yes-india-alumni", date),
        "yes-india-alumni-2026-08-26.csv"
    );
}
