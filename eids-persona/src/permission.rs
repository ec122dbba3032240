// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::persona::{DEFAULT_PERSONA, PersonaId, persona};

/// Capabilities which can be granted to a persona.
///
/// Permissions are flat: holding one never implies another.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Browse the applications table and application details.
    ViewApplications,

    /// Start a new application draft.
    CreateApplications,

    /// Change fields of an existing application.
    EditApplications,

    /// Approve or reject applications under review.
    ApproveApplications,

    /// Open the analytics charts.
    ViewAnalytics,

    /// Open the AI insights panel.
    ViewAiInsights,

    /// Download reports as CSV or PDF.
    ExportReports,

    /// Open the patient records demo.
    ViewPatientRecords,

    /// Administer demo users.
    ManageUsers,

    /// Read the audit log.
    ViewAuditLog,
}

impl Permission {
    pub const ALL: [Permission; 10] = [
        Permission::ViewApplications,
        Permission::CreateApplications,
        Permission::EditApplications,
        Permission::ApproveApplications,
        Permission::ViewAnalytics,
        Permission::ViewAiInsights,
        Permission::ExportReports,
        Permission::ViewPatientRecords,
        Permission::ManageUsers,
        Permission::ViewAuditLog,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::ViewApplications => "view_applications",
            Permission::CreateApplications => "create_applications",
            Permission::EditApplications => "edit_applications",
            Permission::ApproveApplications => "approve_applications",
            Permission::ViewAnalytics => "view_analytics",
            Permission::ViewAiInsights => "view_ai_insights",
            Permission::ExportReports => "export_reports",
            Permission::ViewPatientRecords => "view_patient_records",
            Permission::ManageUsers => "manage_users",
            Permission::ViewAuditLog => "view_audit_log",
        }
    }
}

impl Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown permission '{0}'")]
pub struct UnknownPermissionError(pub String);

impl FromStr for Permission {
    type Err = UnknownPermissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|permission| permission.as_str() == s)
            .ok_or_else(|| UnknownPermissionError(s.to_string()))
    }
}

/// Checks a permission for an optional persona.
///
/// `None` stands for "no persona could be resolved" and is evaluated against
/// [`DEFAULT_PERSONA`], the same persona every other fallback path uses.
pub fn evaluate(persona_id: Option<PersonaId>, permission: Permission) -> bool {
    persona(persona_id.unwrap_or(DEFAULT_PERSONA)).has_permission(permission)
}

/// Checks a permission given as strings, as received from the front-end.
///
/// An unknown persona id is evaluated as [`DEFAULT_PERSONA`] and never gains more than that
/// persona holds. An unknown permission string is never granted.
pub fn has_permission(persona_id: &str, permission: &str) -> bool {
    let persona_id = match persona_id.parse::<PersonaId>() {
        Ok(id) => Some(id),
        Err(err) => {
            debug!("{err}, evaluating as {DEFAULT_PERSONA}");
            None
        }
    };

    match permission.parse::<Permission>() {
        Ok(permission) => evaluate(persona_id, permission),
        Err(err) => {
            debug!("{err}, denying");
            false
        }
    }
}
