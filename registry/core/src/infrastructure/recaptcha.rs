// Copyright (c) 2026 YES INDIA Foundation
// SPDX-License-Identifier: AGPL-3.0

//! # reCAPTCHA Verification Client
//!
//! Server-side bot check against the `siteverify` endpoint, used by the
//! dashboard login flow before any credential is looked at.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::application::auth::{AuthError, CaptchaVerifier};

#[derive(Debug, Clone)]
pub struct RecaptchaClient {
    client: Client,
    endpoint: String,
    secret: String,
}

#[derive(Deserialize)]
struct SiteVerifyResponse {
    success: bool,
    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}

impl RecaptchaClient {
    pub fn new(endpoint: impl Into<String>, secret: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            endpoint: endpoint.into(),
            secret: secret.into(),
        }
    }
}

#[async_trait]
impl CaptchaVerifier for RecaptchaClient {
    async fn verify(&self, token: &str) -> Result<bool, AuthError> {
        let response = self
            .client
            .post(&self.endpoint)
            .form(&[("secret", self.secret.as_str()), ("response", token)])
            .send()
            .await
            .map_err(|e| AuthError::Unavailable(e.into()))?;

        let verdict: SiteVerifyResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Unavailable(e.into()))?;
        if !verdict.success {
            debug!(codes = ?verdict.error_codes, "recaptcha refused the token");
        }
        Ok(verdict.success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn passes_through_the_verdict() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/siteverify")
            .with_status(200)
            .with_body(r#"{"success":true,"score":0.9}"#)
            .create_async()
            .await;

        let client = RecaptchaClient::new(format!("{}/siteverify", server.url()), "sec");
        assert!(client.verify("tok").await.unwrap());
    }

    #[tokio::test]
    async fn refusal_is_not_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/siteverify")
            .with_status(200)
            .with_body(r#"{"success":false,"error-codes":["invalid-input-response"]}"#)
            .create_async()
            .await;

        let client = RecaptchaClient::new(format!("{}/siteverify", server.url()), "sec");
        assert!(!client.verify("tok").await.unwrap());
    }
}
