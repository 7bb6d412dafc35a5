// Copyright (c) 2026 YES INDIA Foundation
// SPDX-License-Identifier: AGPL-3.0

//! # Realtime Database Client
//!
//! REST adapter for the `alumni` collection in the Firebase Realtime
//! Database.
//!
//! # API Endpoints
//!
//! - `POST   /alumni.json` - push a record, returns the generated key
//! - `GET    /alumni.json` - full collection snapshot (`null` when empty)

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::feed::DirectorySnapshot;
use crate::domain::record::{AlumniId, AlumniRecord, AlumniWithId};

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("database returned status {0}")]
    Status(u16),
    #[error("database returned a malformed response: {0}")]
    Malformed(String),
}

/// Thin client over the Realtime Database REST surface.
#[derive(Debug, Clone)]
pub struct RealtimeDbClient {
    client: Client,
    base_url: String,
    collection: String,
}

#[derive(Deserialize)]
struct PushResponse {
    name: String,
}

impl RealtimeDbClient {
    pub const DEFAULT_COLLECTION: &'static str = "alumni";

    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_collection(base_url, Self::DEFAULT_COLLECTION)
    }

    pub fn with_collection(base_url: impl Into<String>, collection: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            base_url: trim_trailing_slash(base_url.into()),
            collection: collection.into(),
        }
    }

    /// URL of the whole collection (also the SSE stream endpoint).
    pub fn collection_url(&self) -> String {
        format!("{}/{}.json", self.base_url, self.collection)
    }

    /// Append a record; the backend assigns and returns the key.
    pub async fn push(&self, record: &AlumniRecord) -> Result<AlumniId, DbError> {
        let response = self
            .client
            .post(self.collection_url())
            .json(record)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(DbError::Status(response.status().as_u16()));
        }
        let push: PushResponse = response.json().await?;
        if push.name.is_empty() {
            return Err(DbError::Malformed("push returned an empty key".into()));
        }
        Ok(AlumniId(push.name))
    }

    /// Fetch the whole collection; an empty collection comes back `null`.
    pub async fn fetch_all(&self) -> Result<BTreeMap<String, AlumniRecord>, DbError> {
        let response = self.client.get(self.collection_url()).send().await?;
        if !response.status().is_success() {
            return Err(DbError::Status(response.status().as_u16()));
        }
        let map: Option<BTreeMap<String, AlumniRecord>> = response.json().await?;
        Ok(map.unwrap_or_default())
    }

    /// Fetch the collection as a feed snapshot.
    pub async fn fetch_snapshot(&self) -> Result<DirectorySnapshot, DbError> {
        let map = self.fetch_all().await?;
        Ok(DirectorySnapshot {
            alumni: map
                .into_iter()
                .map(|(id, record)| AlumniWithId {
                    id: AlumniId(id),
                    record,
                })
                .collect(),
        })
    }

}

fn trim_trailing_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}
