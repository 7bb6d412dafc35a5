// Copyright (c) 2026 YES INDIA Foundation
// SPDX-License-Identifier: AGPL-3.0

//! # Registration Steps
//!
//! The ordered six-step sequence of the public registration form.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Step identity and ordered navigation

use serde::{Deserialize, Serialize};

/// The six steps of the registration workflow, in order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStep {
    #[default]
    PersonalDetails,
    Education,
    Professional,
    Photo,
    Involvement,
    Review,
}

impl RegistrationStep {
    pub const ALL: [RegistrationStep; 6] = [
        RegistrationStep::PersonalDetails,
        RegistrationStep::Education,
        RegistrationStep::Professional,
        RegistrationStep::Photo,
        RegistrationStep::Involvement,
        RegistrationStep::Review,
    ];

    pub const FIRST: RegistrationStep = RegistrationStep::PersonalDetails;

    /// 1-based step number shown to the user.
    pub fn number(self) -> u8 {
        self as u8 + 1
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.get(number.checked_sub(1)? as usize).copied()
    }

    /// The following step, saturating at the review step.
    pub fn next(self) -> Self {
        Self::from_number(self.number() + 1).unwrap_or(self)
    }

    /// The preceding step, saturating at the first step.
    pub fn prev(self) -> Self {
        match self.number().checked_sub(1).and_then(Self::from_number) {
            Some(step) => step,
            None => Self::FIRST,
        }
    }

    pub fn is_review(self) -> bool {
        self == RegistrationStep::Review
    }

    pub fn title(self) -> &'static str {
        match self {
            RegistrationStep::PersonalDetails => "Personal Details",
            RegistrationStep::Education => "Education",
            RegistrationStep::Professional => "Professional",
            RegistrationStep::Photo => "Photo",
            RegistrationStep::Involvement => "Involvement",
            RegistrationStep::Review => "Preview",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            RegistrationStep::PersonalDetails => "Basic details & address",
            RegistrationStep::Education => "Educational background",
            RegistrationStep::Professional => "Career details",
            RegistrationStep::Photo => "Upload photo",
            RegistrationStep::Involvement => "Stay connected options",
            RegistrationStep::Review => "Review & submit",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbering_is_one_based_and_round_trips() {
        for (i, step) in RegistrationStep::ALL.iter().enumerate() {
            assert_eq!(step.number() as usize, i + 1);
            assert_eq!(RegistrationStep::from_number(step.number()), Some(*step));
        }
        assert_eq!(RegistrationStep::from_number(0), None);
        assert_eq!(RegistrationStep::from_number(7), None);
    }

    #[test]
    fn navigation_saturates_at_both_ends() {
        assert_eq!(RegistrationStep::FIRST.prev(), RegistrationStep::PersonalDetails);
        assert_eq!(RegistrationStep::Review.next(), RegistrationStep::Review);
        assert_eq!(RegistrationStep::PersonalDetails.next(), RegistrationStep::Education);
        assert_eq!(RegistrationStep::Review.prev(), RegistrationStep::Involvement);
    }

    #[test]
    fn only_the_last_step_is_review() {
        assert!(RegistrationStep::Review.is_review());
        assert!(RegistrationStep::ALL[..5].iter().all(|s| !s.is_review()));
    }
}
