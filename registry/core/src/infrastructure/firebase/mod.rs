// Copyright (c) 2026 YES INDIA Foundation
// SPDX-License-Identifier: AGPL-3.0

//! # Firebase REST Adapters
//!
//! Thin clients over the Firebase REST surfaces the registry delegates
//! to: the Realtime Database (records), Cloud Storage (photos), and the
//! Identity Toolkit (dashboard credentials).
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Vendor adapters behind the domain/application traits
//!
//! Every endpoint is overridable so the clients can be pointed at a
//! local mock server in tests.

pub mod database;
pub mod identity;
pub mod storage;

pub use database::RealtimeDbClient;
pub use identity::IdentityClient;
pub use storage::StorageClient;

/// Connection settings for the Firebase project backing the registry.
#[derive(Debug, Clone)]
pub struct FirebaseConfig {
    /// Realtime Database root, e.g. `https://<project>.firebasedatabase.app`.
    pub database_url: String,
    /// Storage bucket name, e.g. `<project>.appspot.com`.
    pub storage_bucket: String,
    /// Web API key used by the Identity Toolkit.
    pub api_key: String,
    /// Server-side reCAPTCHA secret.
    pub recaptcha_secret: String,
    /// Cloud Storage API endpoint (override in tests).
    pub storage_endpoint: String,
    /// Identity Toolkit API endpoint (override in tests).
    pub identity_endpoint: String,
    /// reCAPTCHA siteverify endpoint (override in tests).
    pub recaptcha_endpoint: String,
}

impl FirebaseConfig {
    pub fn new(
        database_url: impl Into<String>,
        storage_bucket: impl Into<String>,
        api_key: impl Into<String>,
        recaptcha_secret: impl Into<String>,
    ) -> Self {
        Self {
            database_url: database_url.into(),
            storage_bucket: storage_bucket.into(),
            api_key: api_key.into(),
            recaptcha_secret: recaptcha_secret.into(),
            storage_endpoint: "https://firebasestorage.googleapis.com".into(),
            identity_endpoint: "https://identitytoolkit.googleapis.com".into(),
            recaptcha_endpoint: "https://www.google.com/recaptcha/api/siteverify".into(),
        }
    }
}
