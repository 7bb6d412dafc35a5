// Copyright (c) 2026 YES INDIA Foundation
// SPDX-License-Identifier: AGPL-3.0

//! # HTTP API
//!
//! The axum surface over the registration workflow, the dashboard
//! directory, and the login flow.
//!
//! # Architecture
//!
//! - **Layer:** Presentation
//! - **Purpose:** REST endpoints + error-to-status mapping
//!
//! Every failure is converted to a JSON `{ "message": ... }` body at
//! this boundary; nothing propagates as a panic. Gateway failures are
//! deliberately answered with a generic message, the detailed cause
//! stays in the logs.

use std::sync::Arc;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::application::auth::{AuthError, AuthService, LoginRequest};
use crate::application::dashboard::{DashboardService, DirectoryFilter};
use crate::application::export::{export_csv, export_filename};
use crate::application::registration::{PhotoUpload, RegistrationService, WorkflowError};
use crate::domain::record::AlumniUpdate;

/// Default prefix of the CSV download name.
pub const EXPORT_PREFIX: &str = "yes-india-alumni";

#[derive(Clone)]
pub struct AppState {
    pub registration: Arc<RegistrationService>,
    pub dashboard: Arc<DashboardService>,
    pub auth: Arc<AuthService>,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/registrations", post(create_session))
        .route(
            "/api/registrations/{id}",
            get(session_view).patch(update_session).delete(discard_session),
        )
        .route("/api/registrations/{id}/advance", post(advance))
        .route("/api/registrations/{id}/retreat", post(retreat))
        .route("/api/registrations/{id}/step/{n}", post(jump_to))
        .route(
            "/api/registrations/{id}/photo",
            post(upload_photo).delete(remove_photo),
        )
        .route("/api/registrations/{id}/involvement", post(toggle_involvement))
        .route("/api/registrations/{id}/submit", post(submit))
        .route("/api/registrations/{id}/reset", post(reset))
        .route("/api/auth/login", post(login))
        .route("/api/auth/forgot-password", post(forgot_password))
        .route("/api/alumni", get(list_alumni))
        .route("/api/alumni/stats", get(stats))
        .route("/api/alumni/export.csv", get(export))
        .with_state(state)
}

// ============================================================================
// Error mapping
// ============================================================================

struct ApiError {
    status: StatusCode,
    message: String,
    field: Option<&'static str>,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            field: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({ "message": self.message });
        if let Some(field) = self.field {
            body["field"] = json!(field);
        }
        (self.status, Json(body)).into_response()
    }
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::Validation(violation) => Self {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                message: violation.message.to_string(),
                field: Some(violation.field),
            },
            WorkflowError::UnknownSession => Self::new(StatusCode::NOT_FOUND, err.to_string()),
            WorkflowError::InvalidStep(_) => Self::new(StatusCode::BAD_REQUEST, err.to_string()),
            WorkflowError::NotOnReview
            | WorkflowError::SubmissionInFlight
            | WorkflowError::AlreadySubmitted => Self::new(StatusCode::CONFLICT, err.to_string()),
            WorkflowError::NotAnImage => {
                Self::new(StatusCode::UNSUPPORTED_MEDIA_TYPE, err.to_string())
            }
            WorkflowError::Gateway(_) => Self::new(
                StatusCode::BAD_GATEWAY,
                "Failed to submit registration. Please try again.",
            ),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let status = match err {
            AuthError::MissingFields | AuthError::MissingEmail | AuthError::CaptchaFailed => {
                StatusCode::BAD_REQUEST
            }
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::UnknownEmail => StatusCode::NOT_FOUND,
            AuthError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AuthError::ResetFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        Self::new(status, err.to_string())
    }
}

// ============================================================================
// Handlers
// ============================================================================

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "directoryReady": state.dashboard.is_ready(),
    }))
}

async fn create_session(State(state): State<AppState>) -> Result<Response, ApiError> {
    let session_id = state.registration.create_session();
    let view = state.registration.view(session_id).await?;
    Ok((StatusCode::CREATED, Json(view)).into_response())
}

async fn session_view(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    Ok(Json(state.registration.view(id).await?).into_response())
}

async fn discard_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    state.registration.discard(id)?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

async fn update_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<AlumniUpdate>,
) -> Result<Response, ApiError> {
    Ok(Json(state.registration.update(id, update).await?).into_response())
}

async fn advance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    Ok(Json(state.registration.advance(id).await?).into_response())
}

async fn retreat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    Ok(Json(state.registration.retreat(id).await?).into_response())
}

async fn jump_to(
    State(state): State<AppState>,
    Path((id, n)): Path<(Uuid, u8)>,
) -> Result<Response, ApiError> {
    Ok(Json(state.registration.jump_to(id, n).await?).into_response())
}

async fn upload_photo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError::new(StatusCode::BAD_REQUEST, format!("malformed upload: {e}"))
    })? {
        if field.name() != Some("photo") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("photo").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field.bytes().await.map_err(|e| {
            ApiError::new(StatusCode::BAD_REQUEST, format!("malformed upload: {e}"))
        })?;
        let photo = PhotoUpload {
            file_name,
            content_type,
            bytes,
        };
        return Ok(Json(state.registration.attach_photo(id, photo).await?).into_response());
    }
    Err(ApiError::new(
        StatusCode::BAD_REQUEST,
        "missing multipart field \"photo\"",
    ))
}

async fn remove_photo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    Ok(Json(state.registration.clear_photo(id).await?).into_response())
}

#[derive(Deserialize)]
struct InvolvementToggle {
    option: String,
}

async fn toggle_involvement(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<InvolvementToggle>,
) -> Result<Response, ApiError> {
    Ok(Json(state.registration.toggle_involvement(id, &body.option).await?).into_response())
}

async fn submit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    Ok(Json(state.registration.submit(id).await?).into_response())
}

async fn reset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    Ok(Json(state.registration.reset(id).await?).into_response())
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let user = state.auth.login(request).await?;
    Ok(Json(json!({
        "message": "Login successful",
        "idToken": user.id_token,
        "user": {
            "uid": user.uid,
            "email": user.email,
            "displayName": user.display_name,
        },
    }))
    .into_response())
}

#[derive(Deserialize)]
struct ForgotPasswordRequest {
    #[serde(default)]
    email: String,
}

async fn forgot_password(
    State(state): State<AppState>,
    Json(request): Json<ForgotPasswordRequest>,
) -> Result<Response, ApiError> {
    state.auth.request_password_reset(&request.email).await?;
    Ok(Json(json!({ "message": "Password reset email sent successfully" })).into_response())
}

#[derive(Deserialize)]
struct DirectoryQuery {
    search: Option<String>,
    batch: Option<String>,
}

impl From<DirectoryQuery> for DirectoryFilter {
    fn from(query: DirectoryQuery) -> Self {
        Self {
            batch: query.batch.filter(|b| !b.is_empty()),
            search: query.search,
        }
    }
}

async fn list_alumni(
    State(state): State<AppState>,
    Query(query): Query<DirectoryQuery>,
) -> impl IntoResponse {
    Json(state.dashboard.alumni(&query.into()))
}

async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.dashboard.stats())
}

async fn export(
    State(state): State<AppState>,
    Query(query): Query<DirectoryQuery>,
) -> impl IntoResponse {
    let rows = state.dashboard.alumni(&query.into());
    let csv = export_csv(&rows);
    let filename = export_filename(EXPORT_PREFIX, Utc::now().date_naive());
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        csv,
    )
}
