// Copyright (c) 2026 YES INDIA Foundation
// SPDX-License-Identifier: AGPL-3.0

//! # Directory CSV Export
//!
//! Renders the currently filtered directory view as a UTF-8 CSV
//! document with a fixed column set.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Delimited export of the filtered directory
//!
//! Every field is treated as untrusted text: values containing the
//! delimiter, quotes, or line breaks are quoted and embedded quotes are
//! doubled (RFC 4180), so a company name like `Acme, Inc.` cannot shear
//! a row apart.

use chrono::NaiveDate;

use crate::domain::record::AlumniWithId;

/// Column headers, in export order.
pub const EXPORT_HEADERS: [&str; 11] = [
    "Full Name",
    "Mobile",
    "WhatsApp",
    "Place",
    "State",
    "School",
    "Batch",
    "Last Class",
    "Current Job",
    "Company",
    "Qualification",
];

/// Render the given (already filtered) rows as a CSV document.
pub fn export_csv(alumni: &[AlumniWithId]) -> String {
    let mut out = String::new();
    write_row(&mut out, EXPORT_HEADERS.iter().copied());
    for entry in alumni {
        let record = &entry.record;
        write_row(
            &mut out,
            [
                record.full_name.as_str(),
                record.mobile_number.as_str(),
                record.whatsapp_number.as_str(),
                record.place.as_str(),
                record.state.as_str(),
                record.school_attended.as_str(),
                record.year_of_graduation.as_str(),
                record.resolved_last_class(),
                record.current_job_title.as_str(),
                record.company_name.as_str(),
                record.qualification.as_str(),
            ]
            .into_iter(),
        );
    }
    out
}

/// Download name for an export taken on `date`: `<prefix>-<ISO date>.csv`.
pub fn export_filename(prefix: &str, date: NaiveDate) -> String {
    format!("{prefix}-{}.csv", date.format("%Y-%m-%d"))
}

fn write_row<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    let mut first = true;
    for field in fields {
        if !first {
            out.push(',');
        }
        first = false;
        push_field(out, field);
    }
    out.push('\n');
}

fn push_field(out: &mut String, field: &str) {
    let needs_quoting = field.contains([',', '"', '\n', '\r']);
    if !needs_quoting {
        out.push_str(field);
        return;
    }
    out.push('"');
    for ch in field.chars() {
        if ch == '"' {
            out.push('"');
        }
        out.push(ch);
    }
    out.push('"');
}
