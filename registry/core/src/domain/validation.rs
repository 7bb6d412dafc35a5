// Copyright (c) 2026 YES INDIA Foundation
// SPDX-License-Identifier: AGPL-3.0

//! # Step Validation Rules
//!
//! Pure per-step validation over the in-progress [`AlumniRecord`]. Each
//! rule reports the first violated constraint with the user-facing
//! wording the form surfaces as a toast.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Gate step advancement in the registration workflow
//!
//! ## Validation policy
//!
//! The registry runs the permissive policy: step 1 (personal details) is
//! the only mandatory gate. Education, professional, photo, and
//! involvement fields are optional; the education step still enforces the
//! structural rule that the `"Other"` last-class sentinel carries a
//! non-empty free-text override. The review step has no rule of its own.

use thiserror::Error;

use crate::domain::directory::{self, OTHER_CLASS_SENTINEL};
use crate::domain::record::AlumniRecord;
use crate::domain::workflow::RegistrationStep;

/// First violated constraint of a step, with the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Wire name of the offending field (e.g. `mobileNumber`).
    pub field: &'static str,
    pub message: &'static str,
}

impl ValidationError {
    fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

/// Validate the record against the rule bound to `step`.
pub fn validate_step(step: RegistrationStep, record: &AlumniRecord) -> Result<(), ValidationError> {
    match step {
        RegistrationStep::PersonalDetails => validate_personal_details(record),
        RegistrationStep::Education => validate_education(record),
        // Optional under the permissive policy; review has no gate.
        RegistrationStep::Professional
        | RegistrationStep::Photo
        | RegistrationStep::Involvement
        | RegistrationStep::Review => Ok(()),
    }
}

fn validate_personal_details(record: &AlumniRecord) -> Result<(), ValidationError> {
    if record.full_name.trim().is_empty() {
        return Err(ValidationError::new("fullName", "Please enter your full name"));
    }
    if !exactly_digits(&record.mobile_number, 10) {
        return Err(ValidationError::new(
            "mobileNumber",
            "Please enter a valid 10-digit mobile number",
        ));
    }
    if !exactly_digits(&record.whatsapp_number, 10) {
        return Err(ValidationError::new(
            "whatsappNumber",
            "Please enter a valid 10-digit WhatsApp number",
        ));
    }
    if record.address.trim().is_empty() {
        return Err(ValidationError::new("address", "Please enter your address"));
    }
    if record.place.trim().is_empty() {
        return Err(ValidationError::new("place", "Please enter your city"));
    }
    if record.state.is_empty() {
        return Err(ValidationError::new("state", "Please select your state"));
    }
    if directory::district_required(&record.state) && record.district.is_empty() {
        return Err(ValidationError::new("district", "Please select your district"));
    }
    if !exactly_digits(&record.pin_code, 6) {
        return Err(ValidationError::new(
            "pinCode",
            "Please enter a valid 6-digit pin code",
        ));
    }
    Ok(())
}

fn validate_education(record: &AlumniRecord) -> Result<(), ValidationError> {
    // Structural completeness, not a mandatory-field rule: the sentinel
    // only makes sense together with its override.
    if record.last_class_attended == OTHER_CLASS_SENTINEL && record.other_class.trim().is_empty() {
        return Err(ValidationError::new("otherClass", "Please specify the class name"));
    }
    Ok(())
}

fn exactly_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::AlumniUpdate;

    fn valid_personal_record() -> AlumniRecord {
        let mut record = AlumniRecord::default();
        record.apply(AlumniUpdate {
            full_name: Some("Asha Verma".into()),
            mobile_number: Some("9876543210".into()),
            whatsapp_number: Some("9876543210".into()),
            address: Some("12 Lake Road".into()),
            place: Some("Kochi".into()),
            state: Some("Kerala".into()),
            pin_code: Some("682001".into()),
            ..Default::default()
        });
        record
    }

    // ── Step 1 ───────────────────────────────────────────────────────────────

    #[test]
    fn complete_personal_details_pass() {
        assert!(validate_step(RegistrationStep::PersonalDetails, &valid_personal_record()).is_ok());
    }

    #[test]
    fn short_mobile_number_is_first_cited() {
        let mut record = valid_personal_record();
        record.mobile_number = "12345".into();
        let err = validate_step(RegistrationStep::PersonalDetails, &record).unwrap_err();
        assert_eq!(err.field, "mobileNumber");
        assert!(err.message.contains("10-digit mobile"));
    }

    #[test]
    fn mobile_number_must_be_numeric() {
        let mut record = valid_personal_record();
        record.mobile_number = "987654321x".into();
        assert!(validate_step(RegistrationStep::PersonalDetails, &record).is_err());
    }

    #[test]
    fn whitespace_name_fails() {
        let mut record = valid_personal_record();
        record.full_name = "   ".into();
        let err = validate_step(RegistrationStep::PersonalDetails, &record).unwrap_err();
        assert_eq!(err.field, "fullName");
    }

    #[test]
    fn district_required_only_for_jk() {
        let mut record = valid_personal_record();
        record.apply(AlumniUpdate {
            state: Some("Jammu and Kashmir".into()),
            ..Default::default()
        });
        let err = validate_step(RegistrationStep::PersonalDetails, &record).unwrap_err();
        assert_eq!(err.field, "district");

        record.apply(AlumniUpdate {
            district: Some("Budgam".into()),
            ..Default::default()
        });
        assert!(validate_step(RegistrationStep::PersonalDetails, &record).is_ok());
    }

    #[test]
    fn pin_code_must_be_six_digits() {
        let mut record = valid_personal_record();
        record.pin_code = "68200".into();
        let err = validate_step(RegistrationStep::PersonalDetails, &record).unwrap_err();
        assert_eq!(err.field, "pinCode");
    }

    // ── Steps 2-6 ────────────────────────────────────────────────────────────

    #[test]
    fn education_is_optional_except_other_override() {
        let record = AlumniRecord::default();
        assert!(validate_step(RegistrationStep::Education, &record).is_ok());

        let mut record = AlumniRecord::default();
        record.apply(AlumniUpdate {
            last_class_attended: Some("Other".into()),
            ..Default::default()
        });
        let err = validate_step(RegistrationStep::Education, &record).unwrap_err();
        assert_eq!(err.field, "otherClass");

        record.apply(AlumniUpdate {
            other_class: Some("8th Class".into()),
            ..Default::default()
        });
        assert!(validate_step(RegistrationStep::Education, &record).is_ok());
    }

    #[test]
    fn later_steps_always_pass() {
        let record = AlumniRecord::default();
        for step in [
            RegistrationStep::Professional,
            RegistrationStep::Photo,
            RegistrationStep::Involvement,
            RegistrationStep::Review,
        ] {
            assert!(validate_step(step, &record).is_ok(), "{step:?} should have no gate");
        }
    }
}
