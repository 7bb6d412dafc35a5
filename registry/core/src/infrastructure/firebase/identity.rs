// Copyright (c) 2026 YES INDIA Foundation
// SPDX-License-Identifier: AGPL-3.0

//! # Identity Toolkit Client
//!
//! Credential verification (`accounts:signInWithPassword`) and
//! password-reset emails (`accounts:sendOobCode`) against the Firebase
//! Identity Toolkit, mapped onto the typed [`AuthError`] taxonomy the
//! login flow surfaces.

use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::application::auth::{AuthError, AuthenticatedUser, CredentialVerifier};

/// Thin client over `accounts:signInWithPassword`.
#[derive(Debug, Clone)]
pub struct IdentityClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    id_token: String,
    local_id: String,
    email: String,
    #[serde(default)]
    display_name: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

impl IdentityClient {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .expect("Failed to create HTTP client");
        let mut endpoint = endpoint.into();
        while endpoint.ends_with('/') {
            endpoint.pop();
        }
        Self {
            client,
            endpoint,
            api_key: api_key.into(),
        }
    }

    fn sign_in_url(&self) -> String {
        format!(
            "{}/v1/accounts:signInWithPassword?key={}",
            self.endpoint, self.api_key
        )
    }

    fn send_oob_code_url(&self) -> String {
        format!(
            "{}/v1/accounts:sendOobCode?key={}",
            self.endpoint, self.api_key
        )
    }
}

/// Extract the toolkit's error code from a refusal body.
async fn refusal_code(response: reqwest::Response) -> String {
    response
        .json::<ErrorResponse>()
        .await
        .map(|body| body.error.message)
        .unwrap_or_default()
        .split(' ')
        .next()
        .unwrap_or_default()
        .to_string()
}

#[async_trait]
impl CredentialVerifier for IdentityClient {
    async fn verify(&self, email: &str, password: &str) -> Result<AuthenticatedUser, AuthError> {
        let response = self
            .client
            .post(self.sign_in_url())
            .json(&json!({
                "email": email,
                "password": password,
                "returnSecureToken": true,
            }))
            .send()
            .await
            .map_err(|e| AuthError::Unavailable(e.into()))?;

        if response.status().is_success() {
            let user: SignInResponse = response
                .json()
                .await
                .map_err(|e| AuthError::Unavailable(e.into()))?;
            return Ok(AuthenticatedUser {
                uid: user.local_id,
                email: user.email,
                display_name: user.display_name,
                id_token: user.id_token,
            });
        }

        let status = response.status().as_u16();
        let code = refusal_code(response).await;
        debug!(status, code, "identity toolkit refused sign-in");

        // The toolkit signals the cause in the error message code.
        match code.as_str() {
            "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS"
            | "USER_DISABLED" => Err(AuthError::InvalidCredentials),
            "TOO_MANY_ATTEMPTS_TRY_LATER" => Err(AuthError::RateLimited),
            other => Err(AuthError::Unavailable(anyhow!(
                "identity toolkit answered {status}: {other}"
            ))),
        }
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError> {
        let response = self
            .client
            .post(self.send_oob_code_url())
            .json(&json!({
                "requestType": "PASSWORD_RESET",
                "email": email,
            }))
            .send()
            .await
            .map_err(|e| AuthError::ResetFailed(e.into()))?;

        if response.status().is_success() {
            return Ok(());
        }

        let status = response.status().as_u16();
        let code = refusal_code(response).await;
        debug!(status, code, "identity toolkit refused reset request");

        match code.as_str() {
            "EMAIL_NOT_FOUND" => Err(AuthError::UnknownEmail),
            other => Err(AuthError::ResetFailed(anyhow!(
                "identity toolkit answered {status}: {other}"
            ))),
        }
    }
}
