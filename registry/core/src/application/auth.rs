// Copyright (c) 2026 YES INDIA Foundation
// SPDX-License-Identifier: AGPL-3.0

//! # Dashboard Login
//!
//! Orchestrates the dashboard sign-in: bot check first, then credential
//! verification, both behind traits so the HTTP collaborators stay out
//! of the application layer. Also carries the password-reset request,
//! which is not captcha-gated.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Captcha-then-credentials login flow + reset requests

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub recaptcha_token: String,
}

/// Minimal identity handed back to the dashboard on success.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    pub uid: String,
    pub email: String,
    pub display_name: String,
    /// Session token for subsequent authenticated calls.
    pub id_token: String,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing required fields")]
    MissingFields,
    #[error("Email is required")]
    MissingEmail,
    #[error("reCAPTCHA verification failed. Please try again.")]
    CaptchaFailed,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("No account found with this email address")]
    UnknownEmail,
    #[error("Too many attempts. Please try again later.")]
    RateLimited,
    #[error("Failed to send reset email. Please try again.")]
    ResetFailed(#[source] anyhow::Error),
    #[error("An error occurred. Please try again.")]
    Unavailable(#[source] anyhow::Error),
}

/// Bot-check collaborator (reCAPTCHA siteverify).
#[async_trait]
pub trait CaptchaVerifier: Send + Sync {
    /// `Ok(true)` when the token passes, `Ok(false)` when it is refused.
    async fn verify(&self, token: &str) -> Result<bool, AuthError>;
}

/// Credential-verification collaborator (identity provider).
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, email: &str, password: &str) -> Result<AuthenticatedUser, AuthError>;

    /// Ask the provider to email a password-reset link to `email`.
    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError>;
}

pub struct AuthService {
    captcha: Arc<dyn CaptchaVerifier>,
    credentials: Arc<dyn CredentialVerifier>,
}

impl AuthService {
    pub fn new(captcha: Arc<dyn CaptchaVerifier>, credentials: Arc<dyn CredentialVerifier>) -> Self {
        Self { captcha, credentials }
    }

    pub async fn login(&self, request: LoginRequest) -> Result<AuthenticatedUser, AuthError> {
        if request.email.is_empty()
            || request.password.is_empty()
            || request.recaptcha_token.is_empty()
        {
            return Err(AuthError::MissingFields);
        }

        if !self.captcha.verify(&request.recaptcha_token).await? {
            return Err(AuthError::CaptchaFailed);
        }

        let user = self
            .credentials
            .verify(&request.email, &request.password)
            .await?;
        info!(uid = %user.uid, "dashboard login succeeded");
        Ok(user)
    }

    /// Request a password-reset email. Not captcha-gated.
    pub async fn request_password_reset(&self, email: &str) -> Result<(), AuthError> {
        if email.trim().is_empty() {
            return Err(AuthError::MissingEmail);
        }
        self.credentials.send_password_reset(email).await?;
        info!(%email, "password reset email requested");
        Ok(())
    }
}
