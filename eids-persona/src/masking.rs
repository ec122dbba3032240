// SPDX-License-Identifier: MIT OR Apache-2.0

//! Display masking for patient PII.
//!
//! Every rule is a pure function of the raw value. Whether a rule is applied at all is decided by
//! the caller through [`present`], usually with `Persona::can_view_unmasked_pii`.
use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Replaces the leading part of a masked address.
pub const ADDRESS_PLACEHOLDER: &str = "***";

const MASK: char = '*';

/// Kinds of maskable patient fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    Ssn,
    DateOfBirth,
    Phone,
    Email,
    Address,
    ServiceNumber,
    InsuranceId,
}

/// Masks a raw field value for display.
pub fn mask_field(kind: FieldKind, raw: &str) -> String {
    match kind {
        FieldKind::Ssn => mask_ssn(raw),
        FieldKind::DateOfBirth => mask_date_of_birth(raw),
        FieldKind::Phone => mask_phone(raw),
        FieldKind::Email => mask_email(raw),
        FieldKind::Address => mask_address(raw),
        FieldKind::ServiceNumber => mask_service_number(raw),
        FieldKind::InsuranceId => mask_insurance_id(raw),
    }
}

/// Last `n` characters of a string, or all of it when shorter.
fn tail(raw: &str, n: usize) -> &str {
    let skip = raw.chars().count().saturating_sub(n);
    match raw.char_indices().nth(skip) {
        Some((index, _)) => &raw[index..],
        None => "",
    }
}

fn mask_ssn(raw: &str) -> String {
    format!("***-**-{}", tail(raw.trim(), 4))
}

fn mask_date_of_birth(raw: &str) -> String {
    let raw = raw.trim();
    let is_year = |segment: &str| segment.len() == 4 && segment.chars().all(|c| c.is_ascii_digit());

    let mut masked = String::with_capacity(raw.len());
    let mut segment = String::new();
    let flush = |segment: &mut String, masked: &mut String| {
        if is_year(segment.as_str()) {
            masked.push_str(segment);
        } else {
            masked.extend(segment.chars().map(|_| MASK));
        }
        segment.clear();
    };

    for c in raw.chars() {
        if c.is_alphanumeric() {
            segment.push(c);
        } else {
            flush(&mut segment, &mut masked);
            masked.push(c);
        }
    }
    flush(&mut segment, &mut masked);

    masked
}

fn mask_phone(raw: &str) -> String {
    let digits = raw.chars().filter(char::is_ascii_digit).count();
    let keep_from = digits.saturating_sub(4);

    let mut seen = 0;
    raw.chars()
        .map(|c| {
            if c.is_ascii_digit() {
                seen += 1;
                if seen > keep_from { c } else { MASK }
            } else {
                c
            }
        })
        .collect()
}

fn mask_email(raw: &str) -> String {
    match raw.trim().rsplit_once('@') {
        Some((local, domain)) => {
            let prefix: String = local.chars().take(2).collect();
            format!("{prefix}***@{domain}")
        }
        None => "***".to_string(),
    }
}

fn mask_address(raw: &str) -> String {
    let segments: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect();

    // The first segment is the street line and is always masked.
    let kept = segments.len().saturating_sub(1).min(2);
    let mut parts = vec![ADDRESS_PLACEHOLDER];
    parts.extend_from_slice(&segments[segments.len() - kept..]);
    parts.join(", ")
}

fn mask_service_number(raw: &str) -> String {
    let raw = raw.trim();
    let len = raw.chars().count();
    if len <= 6 {
        return raw.chars().map(|_| MASK).collect();
    }

    raw.chars()
        .enumerate()
        .map(|(index, c)| {
            if index < 2 || index >= len - 4 || !c.is_alphanumeric() {
                c
            } else {
                MASK
            }
        })
        .collect()
}

fn mask_insurance_id(raw: &str) -> String {
    let raw = raw.trim();
    let len = raw.chars().count();
    if len <= 4 {
        return raw.chars().map(|_| MASK).collect();
    }

    let mut masked: String = std::iter::repeat_n(MASK, len - 4).collect();
    masked.push_str(tail(raw, 4));
    masked
}

/// A patient as bundled in the records demo.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    pub id: String,
    pub name: String,
    pub ssn: String,
    pub date_of_birth: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub service_number: String,
    pub insurance_id: String,
    pub branch: String,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub medications: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
    pub primary_provider: String,
    pub last_visit: String,
}

/// Returns a copy of `record` with every maskable field redacted.
pub fn mask_record(record: &PatientRecord) -> PatientRecord {
    PatientRecord {
        ssn: mask_field(FieldKind::Ssn, &record.ssn),
        date_of_birth: mask_field(FieldKind::DateOfBirth, &record.date_of_birth),
        phone: mask_field(FieldKind::Phone, &record.phone),
        email: mask_field(FieldKind::Email, &record.email),
        address: mask_field(FieldKind::Address, &record.address),
        service_number: mask_field(FieldKind::ServiceNumber, &record.service_number),
        insurance_id: mask_field(FieldKind::InsuranceId, &record.insurance_id),
        ..record.clone()
    }
}

/// Chooses between the record itself and its masked copy.
pub fn present(record: &PatientRecord, can_view_unmasked: bool) -> Cow<'_, PatientRecord> {
    if can_view_unmasked {
        Cow::Borrowed(record)
    } else {
        Cow::Owned(mask_record(record))
    }
}
