// Copyright (c) 2026 YES INDIA Foundation
// SPDX-License-Identifier: AGPL-3.0

//! # Alumni Record Domain
//!
//! The registration entity built up by the multi-step workflow and stored
//! in the `alumni` collection, plus the shallow-merge patch type used by
//! the form panels.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Record shape, field-merge semantics, cascade rules
//!
//! ## Invariants
//!
//! | Rule | Enforced by |
//! |------|-------------|
//! | `district` non-empty iff state is district-scoped | [`AlumniRecord::apply`] |
//! | `school_attended` belongs to the `(state, district)` catalog | [`AlumniRecord::apply`] |
//! | `other_class` non-empty only when last class is `"Other"` | [`AlumniRecord::apply`] |
//! | `stay_involved` holds no duplicates | [`AlumniRecord::apply`], [`AlumniRecord::toggle_involvement`] |
//! | `id` is never client-generated | [`AlumniId`] comes only from the gateway |
//!
//! Every optional field defaults to an empty string/array so the persisted
//! shape is always complete regardless of which optional steps were touched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::directory::{self, OTHER_CLASS_SENTINEL};

/// Opaque identifier assigned by the persistence backend (a push key).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlumniId(pub String);

impl AlumniId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AlumniId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Review status of a registration, `pending` until an admin acts on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlumniStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// The full alumni registration record.
///
/// Field names on the wire are camelCase to match the stored collection
/// shape. `#[serde(default)]` keeps deserialization tolerant of records
/// written before a field existed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlumniRecord {
    // Personal
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub place: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub pin_code: String,
    #[serde(default)]
    pub mobile_number: String,
    #[serde(default)]
    pub whatsapp_number: String,
    #[serde(default)]
    pub facebook_link: String,
    #[serde(default)]
    pub instagram_link: String,
    #[serde(default)]
    pub twitter_link: String,
    #[serde(default)]
    pub linkedin_link: String,
    #[serde(default)]
    pub other_social_link: String,

    // Education
    #[serde(default)]
    pub school_attended: String,
    #[serde(default)]
    pub year_of_graduation: String,
    #[serde(default)]
    pub last_class_attended: String,
    #[serde(default)]
    pub other_class: String,
    #[serde(default)]
    pub qualification: String,
    #[serde(default)]
    pub additional_qualification: String,

    // Professional
    #[serde(default)]
    pub current_job_title: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub years_of_experience: String,
    #[serde(default)]
    pub professional_interests: String,
    #[serde(default)]
    pub areas_of_expertise: String,

    // Involvement
    #[serde(default)]
    pub stay_involved: Vec<String>,
    #[serde(default)]
    pub message_to_teacher: String,

    // System
    #[serde(default)]
    pub status: AlumniStatus,
    /// ISO-8601 submission timestamp, set by the gateway at persist time.
    #[serde(default)]
    pub registration_date: String,
    /// Epoch milliseconds, set by the gateway at persist time.
    #[serde(default)]
    pub created_at: i64,
    /// Download URL of the uploaded photo, empty until the upload lands.
    #[serde(default, rename = "photoURL")]
    pub photo_url: String,
}

/// Shallow-merge patch pushed by a form panel.
///
/// Only the fields present in the patch are assigned; the cascade rules
/// in [`AlumniRecord::apply`] then restore the record invariants.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AlumniUpdate {
    pub full_name: Option<String>,
    pub address: Option<String>,
    pub place: Option<String>,
    pub state: Option<String>,
    pub district: Option<String>,
    pub pin_code: Option<String>,
    pub mobile_number: Option<String>,
    pub whatsapp_number: Option<String>,
    pub facebook_link: Option<String>,
    pub instagram_link: Option<String>,
    pub twitter_link: Option<String>,
    pub linkedin_link: Option<String>,
    pub other_social_link: Option<String>,
    pub school_attended: Option<String>,
    pub year_of_graduation: Option<String>,
    pub last_class_attended: Option<String>,
    pub other_class: Option<String>,
    pub qualification: Option<String>,
    pub additional_qualification: Option<String>,
    pub current_job_title: Option<String>,
    pub company_name: Option<String>,
    pub industry: Option<String>,
    pub years_of_experience: Option<String>,
    pub professional_interests: Option<String>,
    pub areas_of_expertise: Option<String>,
    pub stay_involved: Option<Vec<String>>,
    pub message_to_teacher: Option<String>,
}

impl AlumniRecord {
    /// Shallow-merge a patch into the record, then enforce the cascades:
    /// a non-scoped state clears `district`, an out-of-catalog school is
    /// cleared, and a non-`"Other"` last class clears `other_class`.
    pub fn apply(&mut self, update: AlumniUpdate) {
        macro_rules! merge {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = update.$field {
                    self.$field = value;
                })*
            };
        }
        merge!(
            full_name,
            address,
            place,
            state,
            district,
            pin_code,
            mobile_number,
            whatsapp_number,
            facebook_link,
            instagram_link,
            twitter_link,
            linkedin_link,
            other_social_link,
            school_attended,
            year_of_graduation,
            last_class_attended,
            other_class,
            qualification,
            additional_qualification,
            current_job_title,
            company_name,
            industry,
            years_of_experience,
            professional_interests,
            areas_of_expertise,
            message_to_teacher,
        );
        if let Some(selected) = update.stay_involved {
            self.stay_involved = dedup_preserving_order(selected);
        }

        self.enforce_cascades();
    }

    /// Toggle one involvement option: selecting twice removes it.
    pub fn toggle_involvement(&mut self, option: &str) {
        if let Some(pos) = self.stay_involved.iter().position(|o| o == option) {
            self.stay_involved.remove(pos);
        } else {
            self.stay_involved.push(option.to_string());
        }
    }

    /// The last class attended, substituting the free-text override when
    /// the `"Other"` sentinel is selected.
    pub fn resolved_last_class(&self) -> &str {
        if self.last_class_attended == OTHER_CLASS_SENTINEL {
            &self.other_class
        } else {
            &self.last_class_attended
        }
    }

    /// Parse the registration timestamp, if present and well-formed.
    pub fn registered_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.registration_date)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    fn enforce_cascades(&mut self) {
        if !directory::district_required(&self.state) {
            self.district.clear();
        }
        if !directory::school_in_scope(&self.state, &self.district, &self.school_attended) {
            self.school_attended.clear();
        }
        if self.last_class_attended != OTHER_CLASS_SENTINEL {
            self.other_class.clear();
        }
    }
}

fn dedup_preserving_order(values: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

/// A record paired with its backend-assigned id, as seen by the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlumniWithId {
    pub id: AlumniId,
    #[serde(flatten)]
    pub record: AlumniRecord,
}
