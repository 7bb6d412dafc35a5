// Copyright (c) 2026 YES INDIA Foundation
// SPDX-License-Identifier: AGPL-3.0

//! End-to-end tests of the registration workflow: step gating, backward
//! navigation, the complete-shape guarantee, and submission semantics
//! against a scripted gateway.

use std::sync::Arc;

use alumni_connect_core::application::registration::{
    GatewayError, PhotoUpload, RegistrationService, SubmissionGateway, WorkflowError,
};
use alumni_connect_core::domain::record::{AlumniId, AlumniRecord, AlumniUpdate};
use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

/// Gateway scripted per test: canned outcome, captured submissions, and
/// an optional gate to hold a submission in flight.
#[derive(Default)]
struct ScriptedGateway {
    outcome: Mutex<Option<Result<String, String>>>,
    submissions: Mutex<Vec<(AlumniRecord, bool)>>,
    hold: Option<Arc<Notify>>,
}

impl ScriptedGateway {
    fn succeeding(id: &str) -> Self {
        Self {
            outcome: Mutex::new(Some(Ok(id.into()))),
            ..Default::default()
        }
    }

    fn failing(reason: &str) -> Self {
        Self {
            outcome: Mutex::new(Some(Err(reason.into()))),
            ..Default::default()
        }
    }

    fn held(id: &str, hold: Arc<Notify>) -> Self {
        Self {
            outcome: Mutex::new(Some(Ok(id.into()))),
            submissions: Mutex::new(Vec::new()),
            hold: Some(hold),
        }
    }

    fn last_submission(&self) -> (AlumniRecord, bool) {
        self.submissions.lock().last().cloned().expect("no submission captured")
    }
}

#[async_trait]
impl SubmissionGateway for ScriptedGateway {
    async fn submit(
        &self,
        record: &AlumniRecord,
        photo: Option<&PhotoUpload>,
    ) -> Result<AlumniId, GatewayError> {
        if let Some(hold) = &self.hold {
            hold.notified().await;
        }
        self.submissions.lock().push((record.clone(), photo.is_some()));
        match self.outcome.lock().clone().expect("gateway not scripted") {
            Ok(id) => Ok(AlumniId(id)),
            Err(reason) => Err(GatewayError::Persist(reason)),
        }
    }
}

fn step_one_update() -> AlumniUpdate {
    AlumniUpdate {
        full_name: Some("Asha Verma".into()),
        mobile_number: Some("9876543210".into()),
        whatsapp_number: Some("9876543210".into()),
        address: Some("12 Lake Road".into()),
        place: Some("Kochi".into()),
        state: Some("Kerala".into()),
        pin_code: Some("682001".into()),
        ..Default::default()
    }
}

async fn service_with(gateway: Arc<ScriptedGateway>) -> (Arc<RegistrationService>, uuid::Uuid) {
    let service = Arc::new(RegistrationService::new(gateway));
    let session = service.create_session();
    (service, session)
}

/// Walk a valid session from step 1 to the review step.
async fn reach_review(service: &RegistrationService, session: uuid::Uuid) {
    service.update(session, step_one_update()).await.unwrap();
    for expected in 2..=6u8 {
        let view = service.advance(session).await.unwrap();
        assert_eq!(view.step, expected);
    }
}

// ── Step gating ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn five_digit_mobile_blocks_step_one() {
    let (service, session) = service_with(Arc::new(ScriptedGateway::default())).await;
    let mut update = step_one_update();
    update.mobile_number = Some("12345".into());
    service.update(session, update).await.unwrap();

    let err = service.advance(session).await.unwrap_err();
    match err {
        WorkflowError::Validation(violation) => {
            assert_eq!(violation.field, "mobileNumber");
            assert!(violation.message.contains("mobile number"));
        }
        other => panic!("expected a validation error, got {other:?}"),
    }
    assert_eq!(service.view(session).await.unwrap().step, 1);
}

#[tokio::test]
async fn jk_without_district_blocks_step_one() {
    let (service, session) = service_with(Arc::new(ScriptedGateway::default())).await;
    let mut update = step_one_update();
    update.state = Some("Jammu and Kashmir".into());
    service.update(session, update).await.unwrap();

    let err = service.advance(session).await.unwrap_err();
    assert!(matches!(
        err,
        WorkflowError::Validation(v) if v.field == "district"
    ));
    assert_eq!(service.view(session).await.unwrap().step, 1);
}

#[tokio::test]
async fn satisfied_step_one_always_advances() {
    let (service, session) = service_with(Arc::new(ScriptedGateway::default())).await;
    service.update(session, step_one_update()).await.unwrap();
    assert_eq!(service.advance(session).await.unwrap().step, 2);
}

// ── Navigation ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn jump_is_backward_only_and_idempotent() {
    let (service, session) = service_with(Arc::new(ScriptedGateway::default())).await;
    service.update(session, step_one_update()).await.unwrap();
    service.advance(session).await.unwrap();
    service.advance(session).await.unwrap(); // now on step 3

    assert_eq!(service.jump_to(session, 5).await.unwrap().step, 3);
    assert_eq!(service.jump_to(session, 3).await.unwrap().step, 3);
    assert_eq!(service.jump_to(session, 1).await.unwrap().step, 1);
    assert_eq!(service.jump_to(session, 1).await.unwrap().step, 1);

    let err = service.jump_to(session, 9).await.unwrap_err();
    assert!(matches!(err, WorkflowError::InvalidStep(9)));
}

#[tokio::test]
async fn retreat_needs_no_validation_and_floors_at_one() {
    let (service, session) = service_with(Arc::new(ScriptedGateway::default())).await;
    service.update(session, step_one_update()).await.unwrap();
    service.advance(session).await.unwrap();

    // Break step 1's data, then walk back; retreat never validates.
    service
        .update(
            session,
            AlumniUpdate {
                mobile_number: Some("bad".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(service.retreat(session).await.unwrap().step, 1);
    assert_eq!(service.retreat(session).await.unwrap().step, 1);
}

// ── Photo ────────────────────────────────────────────────────────────────────

// A 1x1 transparent PNG, enough for the content sniff.
const PNG_BYTES: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

#[tokio::test]
async fn attached_photo_can_be_removed_before_submission() {
    let gateway = Arc::new(ScriptedGateway::succeeding("abc123"));
    let (service, session) = service_with(gateway.clone()).await;

    let photo = PhotoUpload {
        file_name: "me.png".into(),
        content_type: "image/png".into(),
        bytes: bytes::Bytes::from_static(PNG_BYTES),
    };
    let view = service.attach_photo(session, photo).await.unwrap();
    assert!(view.has_photo);

    let view = service.clear_photo(session).await.unwrap();
    assert!(!view.has_photo);

    reach_review(&service, session).await;
    service.submit(session).await.unwrap();
    let (_, had_photo) = gateway.last_submission();
    assert!(!had_photo);
}

// ── Submission ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn untouched_optionals_submit_with_complete_shape() {
    let gateway = Arc::new(ScriptedGateway::succeeding("abc123"));
    let (service, session) = service_with(gateway.clone()).await;
    reach_review(&service, session).await;

    let view = service.submit(session).await.unwrap();
    assert!(view.show_success);
    assert!(!view.is_submitting);
    assert_eq!(view.alumni_id.unwrap().as_str(), "abc123");

    let (record, had_photo) = gateway.last_submission();
    assert!(!had_photo);
    let json = serde_json::to_value(&record).unwrap();
    for field in [
        "schoolAttended",
        "yearOfGraduation",
        "lastClassAttended",
        "otherClass",
        "qualification",
        "currentJobTitle",
        "companyName",
        "industry",
        "messageToTeacher",
        "photoURL",
    ] {
        assert_eq!(json[field], "", "{field} should default to empty");
    }
    assert_eq!(json["stayInvolved"], serde_json::json!([]));
}

#[tokio::test]
async fn gateway_failure_keeps_the_record_for_retry() {
    let gateway = Arc::new(ScriptedGateway::failing("backend down"));
    let (service, session) = service_with(gateway.clone()).await;
    reach_review(&service, session).await;

    let err = service.submit(session).await.unwrap_err();
    assert!(matches!(err, WorkflowError::Gateway(_)));

    let view = service.view(session).await.unwrap();
    assert!(!view.show_success);
    assert!(!view.is_submitting);
    assert_eq!(view.record.full_name, "Asha Verma");
    assert_eq!(view.step, 6);

    // Flip the gateway to success; the retry goes through unchanged.
    *gateway.outcome.lock() = Some(Ok("retry-1".into()));
    let view = service.submit(session).await.unwrap();
    assert_eq!(view.alumni_id.unwrap().as_str(), "retry-1");
}

#[tokio::test]
async fn submit_is_refused_before_the_review_step() {
    let (service, session) = service_with(Arc::new(ScriptedGateway::succeeding("x"))).await;
    service.update(session, step_one_update()).await.unwrap();
    let err = service.submit(session).await.unwrap_err();
    assert!(matches!(err, WorkflowError::NotOnReview));
}

#[tokio::test]
async fn concurrent_submit_is_refused_while_in_flight() {
    let hold = Arc::new(Notify::new());
    let gateway = Arc::new(ScriptedGateway::held("abc123", hold.clone()));
    let (service, session) = service_with(gateway).await;
    reach_review(&service, session).await;

    let first = {
        let service = Arc::clone(&service);
        tokio::spawn(async move { service.submit(session).await })
    };
    // Wait until the first submission has claimed the flag.
    loop {
        if service.view(session).await.unwrap().is_submitting {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let err = service.submit(session).await.unwrap_err();
    assert!(matches!(err, WorkflowError::SubmissionInFlight));

    hold.notify_one();
    let view = first.await.unwrap().unwrap();
    assert!(view.show_success);
}

#[tokio::test]
async fn success_is_terminal_until_reset() {
    let (service, session) = service_with(Arc::new(ScriptedGateway::succeeding("abc123"))).await;
    reach_review(&service, session).await;
    service.submit(session).await.unwrap();

    let err = service.submit(session).await.unwrap_err();
    assert!(matches!(err, WorkflowError::AlreadySubmitted));
    let err = service
        .update(session, AlumniUpdate::default())
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::AlreadySubmitted));

    // Navigation is frozen too; the step pointer stays on review.
    let err = service.retreat(session).await.unwrap_err();
    assert!(matches!(err, WorkflowError::AlreadySubmitted));
    let err = service.jump_to(session, 1).await.unwrap_err();
    assert!(matches!(err, WorkflowError::AlreadySubmitted));
    assert_eq!(service.view(session).await.unwrap().step, 6);

    let view = service.reset(session).await.unwrap();
    assert_eq!(view.step, 1);
    assert!(!view.show_success);
    assert_eq!(view.record, AlumniRecord::default());
}
