// Copyright (c) 2026 YES INDIA Foundation
// SPDX-License-Identifier: AGPL-3.0

//! # Registration Workflow Service
//!
//! Owns the multi-step registration sessions: step progression gated by
//! the domain validation rules, field merges with their cascade side
//! effects, the optional photo, and the final hand-off to the
//! [`SubmissionGateway`].
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Workflow controller + session table
//!
//! ## Submission mutual exclusion
//!
//! At most one submission per session is in flight. `submit` snapshots
//! the record and photo under the session lock, flips `is_submitting`,
//! releases the lock across the gateway await, then records the outcome.
//! A second click while the first is in flight observes the flag and is
//! refused; a gateway failure clears the flag and leaves the record
//! intact so the user can retry without re-entering anything.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::record::{AlumniId, AlumniRecord, AlumniUpdate};
use crate::domain::validation::{validate_step, ValidationError};
use crate::domain::workflow::RegistrationStep;

/// Photo attached to a registration before submission.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl PhotoUpload {
    /// Content-based check that the bytes are actually an image.
    pub fn is_image(&self) -> bool {
        infer::is_image(&self.bytes)
    }
}

/// Failure surfaced by the submission collaborator.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("photo upload failed: {0}")]
    Upload(String),
    #[error("saving the registration failed: {0}")]
    Persist(String),
    #[error("registration rejected by the backend: {0}")]
    Rejected(String),
}

/// External persistence boundary: stores the record (and photo, when
/// present) and returns the backend-assigned identifier.
#[async_trait]
pub trait SubmissionGateway: Send + Sync {
    async fn submit(
        &self,
        record: &AlumniRecord,
        photo: Option<&PhotoUpload>,
    ) -> Result<AlumniId, GatewayError>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionReceipt {
    pub alumni_id: AlumniId,
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("unknown registration session")]
    UnknownSession,
    #[error("there is no step {0}")]
    InvalidStep(u8),
    #[error("submission is only possible from the review step")]
    NotOnReview,
    #[error("a submission is already in flight")]
    SubmissionInFlight,
    #[error("this registration was already submitted; submissions are final")]
    AlreadySubmitted,
    #[error("the uploaded file is not an image")]
    NotAnImage,
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// One registration session's state.
///
/// The record starts empty and is mutated in place by panel updates; the
/// only terminal state is a successful submission, whose only exit is
/// [`RegistrationWorkflow::reset`].
#[derive(Debug, Default)]
pub struct RegistrationWorkflow {
    current_step: RegistrationStep,
    record: AlumniRecord,
    photo: Option<PhotoUpload>,
    is_submitting: bool,
    outcome: Option<SubmissionReceipt>,
}

impl RegistrationWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_step(&self) -> RegistrationStep {
        self.current_step
    }

    pub fn record(&self) -> &AlumniRecord {
        &self.record
    }

    pub fn has_photo(&self) -> bool {
        self.photo.is_some()
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn outcome(&self) -> Option<&SubmissionReceipt> {
        self.outcome.as_ref()
    }

    /// Shallow-merge a panel update into the record (cascades included).
    pub fn apply_update(&mut self, update: AlumniUpdate) -> Result<(), WorkflowError> {
        self.ensure_open()?;
        self.record.apply(update);
        Ok(())
    }

    /// Toggle one stay-involved option (selecting twice removes it).
    pub fn toggle_involvement(&mut self, option: &str) -> Result<(), WorkflowError> {
        self.ensure_open()?;
        self.record.toggle_involvement(option);
        Ok(())
    }

    /// Run the current step's rule; on pass move one step forward.
    ///
    /// On failure the step pointer and record are untouched and the first
    /// violated constraint is surfaced.
    pub fn advance(&mut self) -> Result<RegistrationStep, WorkflowError> {
        self.ensure_open()?;
        validate_step(self.current_step, &self.record)?;
        self.current_step = self.current_step.next();
        Ok(self.current_step)
    }

    /// Move one step back without validation, floored at step 1.
    pub fn retreat(&mut self) -> Result<RegistrationStep, WorkflowError> {
        self.ensure_open()?;
        self.current_step = self.current_step.prev();
        Ok(self.current_step)
    }

    /// Jump directly to an earlier step; forward jumps are a no-op.
    pub fn jump_to(&mut self, step: RegistrationStep) -> Result<RegistrationStep, WorkflowError> {
        self.ensure_open()?;
        if step < self.current_step {
            self.current_step = step;
        }
        Ok(self.current_step)
    }

    /// Attach (or replace) the photo after a content sniff.
    pub fn attach_photo(&mut self, photo: PhotoUpload) -> Result<(), WorkflowError> {
        self.ensure_open()?;
        if !photo.is_image() {
            return Err(WorkflowError::NotAnImage);
        }
        self.photo = Some(photo);
        Ok(())
    }

    pub fn clear_photo(&mut self) -> Result<(), WorkflowError> {
        self.ensure_open()?;
        self.photo = None;
        Ok(())
    }

    /// Claim the session for submission and snapshot what will be sent.
    fn begin_submission(&mut self) -> Result<(AlumniRecord, Option<PhotoUpload>), WorkflowError> {
        if self.outcome.is_some() {
            return Err(WorkflowError::AlreadySubmitted);
        }
        if !self.current_step.is_review() {
            return Err(WorkflowError::NotOnReview);
        }
        if self.is_submitting {
            return Err(WorkflowError::SubmissionInFlight);
        }
        self.is_submitting = true;
        Ok((self.record.clone(), self.photo.clone()))
    }

    fn submission_succeeded(&mut self, alumni_id: AlumniId) {
        self.outcome = Some(SubmissionReceipt { alumni_id });
        self.is_submitting = false;
    }

    fn submission_failed(&mut self) {
        self.is_submitting = false;
    }

    /// Back to step 1 with an emptied record; the only exit from success.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn ensure_open(&self) -> Result<(), WorkflowError> {
        if self.outcome.is_some() {
            return Err(WorkflowError::AlreadySubmitted);
        }
        Ok(())
    }
}

/// Serializable view of a session, as returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowView {
    pub session_id: Uuid,
    pub step: u8,
    pub step_title: &'static str,
    pub record: AlumniRecord,
    pub has_photo: bool,
    pub is_submitting: bool,
    pub show_success: bool,
    pub alumni_id: Option<AlumniId>,
}

impl WorkflowView {
    fn of(session_id: Uuid, workflow: &RegistrationWorkflow) -> Self {
        Self {
            session_id,
            step: workflow.current_step.number(),
            step_title: workflow.current_step.title(),
            record: workflow.record.clone(),
            has_photo: workflow.photo.is_some(),
            is_submitting: workflow.is_submitting,
            show_success: workflow.outcome.is_some(),
            alumni_id: workflow.outcome.as_ref().map(|o| o.alumni_id.clone()),
        }
    }
}

type SessionHandle = Arc<Mutex<RegistrationWorkflow>>;

/// Session table plus the gateway hand-off.
pub struct RegistrationService {
    gateway: Arc<dyn SubmissionGateway>,
    sessions: DashMap<Uuid, SessionHandle>,
}

impl RegistrationService {
    pub fn new(gateway: Arc<dyn SubmissionGateway>) -> Self {
        Self {
            gateway,
            sessions: DashMap::new(),
        }
    }

    pub fn create_session(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions
            .insert(id, Arc::new(Mutex::new(RegistrationWorkflow::new())));
        info!(session = %id, "registration session opened");
        id
    }

    pub fn discard(&self, session_id: Uuid) -> Result<(), WorkflowError> {
        self.sessions
            .remove(&session_id)
            .map(|_| ())
            .ok_or(WorkflowError::UnknownSession)
    }

    fn session(&self, session_id: Uuid) -> Result<SessionHandle, WorkflowError> {
        self.sessions
            .get(&session_id)
            .map(|entry| entry.value().clone())
            .ok_or(WorkflowError::UnknownSession)
    }

    pub async fn view(&self, session_id: Uuid) -> Result<WorkflowView, WorkflowError> {
        let session = self.session(session_id)?;
        let workflow = session.lock().await;
        Ok(WorkflowView::of(session_id, &workflow))
    }

    pub async fn update(
        &self,
        session_id: Uuid,
        update: AlumniUpdate,
    ) -> Result<WorkflowView, WorkflowError> {
        let session = self.session(session_id)?;
        let mut workflow = session.lock().await;
        workflow.apply_update(update)?;
        Ok(WorkflowView::of(session_id, &workflow))
    }

    pub async fn toggle_involvement(
        &self,
        session_id: Uuid,
        option: &str,
    ) -> Result<WorkflowView, WorkflowError> {
        let session = self.session(session_id)?;
        let mut workflow = session.lock().await;
        workflow.toggle_involvement(option)?;
        Ok(WorkflowView::of(session_id, &workflow))
    }

    pub async fn advance(&self, session_id: Uuid) -> Result<WorkflowView, WorkflowError> {
        let session = self.session(session_id)?;
        let mut workflow = session.lock().await;
        workflow.advance()?;
        Ok(WorkflowView::of(session_id, &workflow))
    }

    pub async fn retreat(&self, session_id: Uuid) -> Result<WorkflowView, WorkflowError> {
        let session = self.session(session_id)?;
        let mut workflow = session.lock().await;
        workflow.retreat()?;
        Ok(WorkflowView::of(session_id, &workflow))
    }

    pub async fn jump_to(
        &self,
        session_id: Uuid,
        step_number: u8,
    ) -> Result<WorkflowView, WorkflowError> {
        let step = RegistrationStep::from_number(step_number)
            .ok_or(WorkflowError::InvalidStep(step_number))?;
        let session = self.session(session_id)?;
        let mut workflow = session.lock().await;
        workflow.jump_to(step)?;
        Ok(WorkflowView::of(session_id, &workflow))
    }

    pub async fn attach_photo(
        &self,
        session_id: Uuid,
        photo: PhotoUpload,
    ) -> Result<WorkflowView, WorkflowError> {
        let session = self.session(session_id)?;
        let mut workflow = session.lock().await;
        workflow.attach_photo(photo)?;
        Ok(WorkflowView::of(session_id, &workflow))
    }

    pub async fn clear_photo(&self, session_id: Uuid) -> Result<WorkflowView, WorkflowError> {
        let session = self.session(session_id)?;
        let mut workflow = session.lock().await;
        workflow.clear_photo()?;
        Ok(WorkflowView::of(session_id, &workflow))
    }

    /// Hand the finished record to the gateway.
    ///
    /// The session lock is not held across the gateway await; the
    /// `is_submitting` flag carries the mutual exclusion instead.
    pub async fn submit(&self, session_id: Uuid) -> Result<WorkflowView, WorkflowError> {
        let session = self.session(session_id)?;
        let (record, photo) = {
            let mut workflow = session.lock().await;
            workflow.begin_submission()?
        };

        let result = self.gateway.submit(&record, photo.as_ref()).await;

        let mut workflow = session.lock().await;
        match result {
            Ok(alumni_id) => {
                info!(session = %session_id, alumni = %alumni_id, "registration submitted");
                workflow.submission_succeeded(alumni_id);
                Ok(WorkflowView::of(session_id, &workflow))
            }
            Err(err) => {
                warn!(session = %session_id, error = %err, "registration submission failed");
                workflow.submission_failed();
                Err(err.into())
            }
        }
    }

    pub async fn reset(&self, session_id: Uuid) -> Result<WorkflowView, WorkflowError> {
        let session = self.session(session_id)?;
        let mut workflow = session.lock().await;
        workflow.reset();
        Ok(WorkflowView::of(session_id, &workflow))
    }
}
