// Copyright (c) 2026 YES INDIA Foundation
// SPDX-License-Identifier: AGPL-3.0

//! # School & Region Catalog
//!
//! Static catalog of the states, districts, and schools an alumnus can
//! register against, plus the pure lookup rules that scope the school
//! list to a `(state, district)` selection.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Region/school reference data and scoping rules
//!
//! Jammu and Kashmir is the only state subdivided by district; every
//! other supported state carries a flat school list. The clearing side
//! effects for out-of-scope selections live in
//! [`crate::domain::record::AlumniRecord::apply`], not here.

use chrono::{Datelike, Utc};

/// States a registrant can select, J&K first (matches the public form).
pub const SUPPORTED_STATES: &[&str] = &[
    "Jammu and Kashmir",
    "Delhi",
    "Rajasthan",
    "Bihar",
    "West Bengal",
    "Maharashtra",
    "Andhra Pradesh",
    "Karnataka",
    "Kerala",
];

/// The one state whose school catalog is subdivided by district.
pub const DISTRICT_SCOPED_STATE: &str = "Jammu and Kashmir";

/// Districts of Jammu and Kashmir with at least one partner school.
pub const JK_DISTRICTS: &[&str] = &[
    "Anantnag",
    "Budgam",
    "Jammu",
    "Poonch",
    "Rajouri",
    "Srinagar",
];

/// J&K partner schools keyed by district.
const JK_SCHOOLS_BY_DISTRICT: &[(&str, &[&str])] = &[
    ("Srinagar", &["Yaseen English School - Maloora"]),
    (
        "Jammu",
        &[
            "New Taj Public High School - Bathindi",
            "Yaseen College of Integrated Studies - Sujuma",
        ],
    ),
    ("Anantnag", &["Darul Uloom Jamia Zainul Islam - Pahalgham"]),
    ("Budgam", &["Solah Idarathul Aloom School - Narbal"]),
    (
        "Rajouri",
        &[
            "DS Educational Institute - Rajouri",
            "New Yaseen English School - Rajouri",
            "Yaseen English School - Shahdara Shareif",
        ],
    ),
    (
        "Poonch",
        &[
            "Raza Ul Uloom Islamia Higher Secondary - Poonch",
            "Yaseen English School - Terwan",
            "Yaseen English School - Maldiyalan",
            "Jameel Public Academy - Daradullian",
            "Yaseen English School - Chandak",
        ],
    ),
];

/// YES INDIA schools keyed by state (states without district scoping).
const SCHOOLS_BY_STATE: &[(&str, &[&str])] = &[
    (
        "Delhi",
        &[
            "YES INDIA School - Delhi Main Campus",
            "YES INDIA School - Delhi West",
            "YES INDIA School - Delhi South",
        ],
    ),
    (
        "Rajasthan",
        &[
            "YES INDIA School - Jaipur",
            "YES INDIA School - Jodhpur",
            "YES INDIA School - Udaipur",
        ],
    ),
    (
        "Bihar",
        &[
            "YES INDIA School - Patna",
            "YES INDIA School - Gaya",
            "YES INDIA School - Muzaffarpur",
        ],
    ),
    (
        "West Bengal",
        &[
            "YES INDIA School - Kolkata Main",
            "YES INDIA School - Kolkata South",
            "YES INDIA School - Howrah",
        ],
    ),
    (
        "Maharashtra",
        &[
            "YES INDIA School - Mumbai Main",
            "YES INDIA School - Mumbai West",
            "YES INDIA School - Pune",
            "YES INDIA School - Nagpur",
        ],
    ),
    (
        "Andhra Pradesh",
        &[
            "YES INDIA School - Visakhapatnam",
            "YES INDIA School - Vijayawada",
            "YES INDIA School - Tirupati",
        ],
    ),
    (
        "Karnataka",
        &[
            "YES INDIA School - Bangalore Main",
            "YES INDIA School - Bangalore North",
            "YES INDIA School - Mysore",
        ],
    ),
    (
        "Kerala",
        &[
            "YES INDIA School - Kochi",
            "YES INDIA School - Thiruvananthapuram",
            "YES INDIA School - Kozhikode",
        ],
    ),
];

/// Last-class options offered by the education step.
pub const LAST_CLASS_OPTIONS: &[&str] = &["10th Class", "12th Class", "Other"];

/// Sentinel last-class value that requires a free-text override.
pub const OTHER_CLASS_SENTINEL: &str = "Other";

/// Ways an alumnus can stay involved with the foundation.
pub const INVOLVEMENT_OPTIONS: &[&str] = &[
    "Mentoring Current Students",
    "Guest Lectures & Workshops",
    "Fundraising & Donations",
    "Alumni Network Events",
];

/// Selectable graduation years: the current year back 19 years, newest first.
pub fn graduation_years() -> Vec<String> {
    let current = Utc::now().year();
    (0..19).map(|i| (current - i).to_string()).collect()
}

/// Whether `district` is a mandatory selection for the given state.
pub fn district_required(state: &str) -> bool {
    state == DISTRICT_SCOPED_STATE
}

/// Pure lookup of the schools valid for a `(state, district)` selection.
///
/// For Jammu and Kashmir the list is scoped by district; before a
/// district is picked the whole J&K catalog is offered. Unknown states
/// and unknown districts yield an empty list.
pub fn schools_for(state: &str, district: &str) -> Vec<&'static str> {
    if state == DISTRICT_SCOPED_STATE {
        if district.is_empty() {
            return JK_SCHOOLS_BY_DISTRICT
                .iter()
                .flat_map(|(_, schools)| schools.iter().copied())
                .collect();
        }
        return JK_SCHOOLS_BY_DISTRICT
            .iter()
            .find(|(d, _)| *d == district)
            .map(|(_, schools)| schools.to_vec())
            .unwrap_or_default();
    }

    SCHOOLS_BY_STATE
        .iter()
        .find(|(s, _)| *s == state)
        .map(|(_, schools)| schools.to_vec())
        .unwrap_or_default()
}

/// Whether a school selection is still valid under `(state, district)`.
///
/// An empty school is always in scope (nothing selected yet).
pub fn school_in_scope(state: &str, district: &str, school: &str) -> bool {
    if school.is_empty() {
        return true;
    }
    schools_for(state, district).contains(&school)
}
