// Copyright (c) 2026 YES INDIA Foundation
// SPDX-License-Identifier: AGPL-3.0

//! # Firebase Submission Gateway
//!
//! The two-step persistence saga behind the registration workflow:
//! upload the photo (when present), then write the record carrying the
//! resulting download URL. A record-write failure after a successful
//! upload triggers the compensating delete of the orphaned object, so a
//! partial submission leaves nothing behind.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** [`SubmissionGateway`] implementation over Firebase

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::registration::{GatewayError, PhotoUpload, SubmissionGateway};
use crate::domain::record::{AlumniId, AlumniRecord, AlumniStatus};
use crate::infrastructure::firebase::{RealtimeDbClient, StorageClient};

pub struct FirebaseSubmissionGateway {
    database: RealtimeDbClient,
    storage: StorageClient,
}

impl FirebaseSubmissionGateway {
    pub fn new(database: RealtimeDbClient, storage: StorageClient) -> Self {
        Self { database, storage }
    }

    fn object_name(photo: &PhotoUpload) -> String {
        format!("alumni-photos/{}_{}", Uuid::new_v4(), photo.file_name)
    }
}

#[async_trait]
impl SubmissionGateway for FirebaseSubmissionGateway {
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
        record.photo_url = String::new();

        // Step 1: photo upload, remembered for compensation.
        let mut uploaded_object = None;
        if let Some(photo) = photo {
            let object = Self::object_name(photo);
            let url = self
                .storage
                .upload(&object, &photo.content_type, photo.bytes.clone())
                .await
                .map_err(|e| GatewayError::Upload(e.to_string()))?;
            record.photo_url = url;
            uploaded_object = Some(object);
        }

        // Step 2: record write; compensate the upload on failure.
        match self.database.push(&record).await {
            Ok(id) => {
                info!(alumni = %id, "registration persisted");
                Ok(id)
            }
            Err(persist_err) => {
                if let Some(object) = uploaded_object {
                    match self.storage.delete_object(&object).await {
                        Ok(()) => info!(%object, "orphaned photo upload compensated"),
                        Err(cleanup_err) => warn!(
                            %object,
                            error = %cleanup_err,
                            "failed to delete orphaned photo upload"
                        ),
                    }
                }
                Err(GatewayError::Persist(persist_err.to_string()))
            }
        }
    }
}
