// Copyright (c) 2026 YES INDIA Foundation
// SPDX-License-Identifier: AGPL-3.0

//! # Infrastructure Module
//!
//! Concrete implementations of the gateway, feed, and verification
//! traits, plus the factory that wires a backend set from configuration.

pub mod firebase;
pub mod live_feed;
pub mod recaptcha;
pub mod submission_gateway;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use parking_lot::Mutex;
use tracing::warn;
use uuid::Uuid;

use crate::application::auth::{AuthError, AuthenticatedUser, CaptchaVerifier, CredentialVerifier};
use crate::application::registration::{GatewayError, PhotoUpload, SubmissionGateway};
use crate::domain::feed::{DirectoryFeed, DirectorySnapshot};
use crate::domain::record::{AlumniId, AlumniRecord, AlumniStatus, AlumniWithId};
use crate::infrastructure::firebase::{
    FirebaseConfig, IdentityClient, RealtimeDbClient, StorageClient,
};
use crate::infrastructure::live_feed::{FirebaseLiveFeed, InMemoryFeed};
use crate::infrastructure::recaptcha::RecaptchaClient;
use crate::infrastructure::submission_gateway::FirebaseSubmissionGateway;

/// Backend selection for a registry process.
pub enum RegistryBackend {
    /// The production Firebase project.
    Firebase(FirebaseConfig),
    /// Process-local stores for tests and offline development.
    InMemory,
}

/// The collaborator set the services are wired from.
pub struct BackendHandles {
    pub gateway: Arc<dyn SubmissionGateway>,
    pub feed: Arc<dyn DirectoryFeed>,
    pub captcha: Arc<dyn CaptchaVerifier>,
    pub credentials: Arc<dyn CredentialVerifier>,
}

/// Factory wiring the collaborator set for the chosen backend.
pub fn create_backend(backend: RegistryBackend) -> BackendHandles {
    match backend {
        RegistryBackend::Firebase(config) => {
            let database = RealtimeDbClient::new(&config.database_url);
            let storage = StorageClient::new(&config.storage_endpoint, &config.storage_bucket);
            BackendHandles {
                gateway: Arc::new(FirebaseSubmissionGateway::new(database.clone(), storage)),
                feed: Arc::new(FirebaseLiveFeed::new(database)),
                captcha: Arc::new(RecaptchaClient::new(
                    &config.recaptcha_endpoint,
                    &config.recaptcha_secret,
                )),
                credentials: Arc::new(IdentityClient::new(
                    &config.identity_endpoint,
                    &config.api_key,
                )),
            }
        }
        RegistryBackend::InMemory => {
            warn!("running against the in-memory backend; nothing is persisted");
            let store = Arc::new(InMemoryStore::default());
            BackendHandles {
                gateway: store.clone(),
                feed: store,
                captcha: Arc::new(AllowAllCaptcha),
                credentials: Arc::new(StaticCredentials::dev_default()),
            }
        }
    }
}

/// Gateway + feed in one: submissions land in a process-local map and
/// are immediately pushed to feed subscribers.
#[derive(Default)]
pub struct InMemoryStore {
    records: Mutex<BTreeMap<String, AlumniRecord>>,
    feed: InMemoryFeed,
}

impl InMemoryStore {
    fn snapshot(&self) -> DirectorySnapshot {
        DirectorySnapshot {
            alumni: self
                .records
                .lock()
                .iter()
                .map(|(id, record)| AlumniWithId {
                    id: AlumniId(id.clone()),
                    record: record.clone(),
                })
                .collect(),
        }
    }
}

#[async_trait]
impl SubmissionGateway for InMemoryStore {
    async fn submit(
        &self,
        record: &AlumniRecord,
        photo: Option<&PhotoUpload>,
    ) -> Result<AlumniId, GatewayError> {
        let now = Utc::now();
        let mut record = record.clone();
        record.status = AlumniStatus::Pending;
        record.registration_date = now.to_rfc3339_opts(SecondsFormat::Millis, true);
        record.created_at = now.timestamp_millis();
        if let Some(photo) = photo {
            record.photo_url = format!("memory://alumni-photos/{}", photo.file_name);
        }

        let id = format!("mem-{}", Uuid::new_v4().simple());
        self.records.lock().insert(id.clone(), record);
        self.feed.push(self.snapshot());
        Ok(AlumniId(id))
    }
}

#[async_trait]
impl DirectoryFeed for InMemoryStore {
    async fn subscribe(
        &self,
    ) -> Result<crate::domain::feed::FeedSubscription, crate::domain::feed::FeedError> {
        // Late subscribers start from the current contents.
        self.feed.push(self.snapshot());
        self.feed.subscribe().await
    }
}

/// Captcha stand-in for the in-memory backend.
pub struct AllowAllCaptcha;

#[async_trait]
impl CaptchaVerifier for AllowAllCaptcha {
    async fn verify(&self, _token: &str) -> Result<bool, AuthError> {
        Ok(true)
    }
}

/// Single fixed login for the in-memory backend.
pub struct StaticCredentials {
    email: String,
    password: String,
}

impl StaticCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn dev_default() -> Self {
        Self::new("admin@yesindia.org", "admin")
    }
}

#[async_trait]
impl CredentialVerifier for StaticCredentials {
    async fn verify(&self, email: &str, password: &str) -> Result<AuthenticatedUser, AuthError> {
        if email == self.email && password == self.password {
            Ok(AuthenticatedUser {
                uid: "dev-admin".into(),
                email: email.into(),
                display_name: "Registry Admin".into(),
                id_token: format!("dev-{}", Uuid::new_v4().simple()),
            })
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError> {
        if email != self.email {
            return Err(AuthError::UnknownEmail);
        }
        warn!(%email, "in-memory backend cannot send email; reset request dropped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_submission_reaches_subscribers() {
        let store = Arc::new(InMemoryStore::default());
        let mut sub = store.subscribe().await.unwrap();

        let id = store
            .submit(&AlumniRecord::default(), None)
            .await
            .unwrap();
        sub.snapshots.changed().await.unwrap();
        let snapshot = sub.snapshots.borrow_and_update().clone();
        assert_eq!(snapshot.alumni.len(), 1);
        assert_eq!(snapshot.alumni[0].id, id);
        assert_eq!(snapshot.alumni[0].record.status, AlumniStatus::Pending);
        assert!(!snapshot.alumni[0].record.registration_date.is_empty());
    }
}
