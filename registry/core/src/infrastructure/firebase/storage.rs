// Copyright (c) 2026 YES INDIA Foundation
// SPDX-License-Identifier: AGPL-3.0

//! # Cloud Storage Client
//!
//! REST adapter for photo uploads into the project's storage bucket.
//!
//! # API Endpoints
//!
//! - `POST   /v0/b/{bucket}/o?uploadType=media&name={object}` - upload
//! - `DELETE /v0/b/{bucket}/o/{object}` - remove (saga compensation)
//!
//! Uploads answer with a `downloadTokens` field from which the public
//! download URL is derived, matching what the registration form stores
//! in `photoURL`.

use std::time::Duration;

use bytes::Bytes;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("storage returned status {0}")]
    Status(u16),
    #[error("upload answered without a download token")]
    MissingToken,
}

/// Thin client over the Cloud Storage object REST surface.
#[derive(Debug, Clone)]
pub struct StorageClient {
    client: Client,
    endpoint: String,
    bucket: String,
}

#[derive(Deserialize)]
struct UploadResponse {
    #[serde(rename = "downloadTokens")]
    download_tokens: Option<String>,
}

impl StorageClient {
    pub fn new(endpoint: impl Into<String>, bucket: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");
        let mut endpoint = endpoint.into();
        while endpoint.ends_with('/') {
            endpoint.pop();
        }
        Self {
            client,
            endpoint,
            bucket: bucket.into(),
        }
    }

    fn object_path(&self, object: &str) -> String {
        format!(
            "{}/v0/b/{}/o/{}",
            self.endpoint,
            self.bucket,
            utf8_percent_encode(object, NON_ALPHANUMERIC)
        )
    }

    /// Upload an object and return its public download URL.
    pub async fn upload(
        &self,
        object: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> Result<String, StorageError> {
        let url = format!("{}/v0/b/{}/o", self.endpoint, self.bucket);
        let response = self
            .client
            .post(&url)
            .query(&[("uploadType", "media"), ("name", object)])
            .header("Content-Type", content_type)
            .body(bytes)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(StorageError::Status(response.status().as_u16()));
        }
        let upload: UploadResponse = response.json().await?;
        let token = upload
            .download_tokens
            .filter(|t| !t.is_empty())
            .ok_or(StorageError::MissingToken)?;
        Ok(format!(
            "{}?alt=media&token={}",
            self.object_path(object),
            token
        ))
    }

    /// Remove an object (compensating action for a failed record write).
    pub async fn delete_object(&self, object: &str) -> Result<(), StorageError> {
        let response = self.client.delete(self.object_path(object)).send().await?;
        if !response.status().is_success() {
            return Err(StorageError::Status(response.status().as_u16()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upload_derives_the_download_url() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v0/b/demo.appspot.com/o")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("uploadType".into(), "media".into()),
                mockito::Matcher::UrlEncoded("name".into(), "alumni-photos/p.png".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"name":"alumni-photos/p.png","downloadTokens":"tok-1"}"#)
            .create_async()
            .await;

        let client = StorageClient::new(server.url(), "demo.appspot.com");
        let url = client
            .upload("alumni-photos/p.png", "image/png", Bytes::from_static(b"png"))
            .await
            .unwrap();
        assert!(url.contains("alumni%2Dphotos%2Fp%2Epng"));
        assert!(url.ends_with("?alt=media&token=tok-1"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn upload_without_token_is_rejected() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v0/b/demo.appspot.com/o")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"name":"alumni-photos/p.png"}"#)
            .create_async()
            .await;

        let client = StorageClient::new(server.url(), "demo.appspot.com");
        let err = client
            .upload("alumni-photos/p.png", "image/png", Bytes::from_static(b"png"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::MissingToken));
    }
}
