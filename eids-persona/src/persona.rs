// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::permission::Permission;

/// Identifier of one of the demo personas.
///
/// The set is closed: every lookup keyed by `PersonaId` is an exhaustive `match`, so adding a
/// persona without its record or view configuration does not compile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PersonaId {
    MariaThompson,
    DrEmilyCarter,
    DavidKim,
    SarahJohnson,
    JamesRodriguez,
}

impl PersonaId {
    pub const ALL: [PersonaId; 5] = [
        PersonaId::MariaThompson,
        PersonaId::DrEmilyCarter,
        PersonaId::DavidKim,
        PersonaId::SarahJohnson,
        PersonaId::JamesRodriguez,
    ];

    /// Stable string key used in storage, cookies and the application fixtures.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PersonaId::MariaThompson => "maria-thompson",
            PersonaId::DrEmilyCarter => "dr-emily-carter",
            PersonaId::DavidKim => "david-kim",
            PersonaId::SarahJohnson => "sarah-johnson",
            PersonaId::JamesRodriguez => "james-rodriguez",
        }
    }
}

impl Display for PersonaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown persona '{0}'")]
pub struct UnknownPersonaError(pub String);

impl FromStr for PersonaId {
    type Err = UnknownPersonaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PersonaId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownPersonaError(s.to_string()))
    }
}

impl Serialize for PersonaId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PersonaId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let id: String = Deserialize::deserialize(deserializer)?;
        id.parse().map_err(serde::de::Error::custom)
    }
}

/// A demo stand-in for a logged-in user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Persona {
    pub id: PersonaId,
    pub name: &'static str,
    pub initials: &'static str,
    pub role: &'static str,
    pub department: &'static str,
    #[serde(rename = "canViewUnmaskedPII")]
    pub can_view_unmasked_pii: bool,
    pub permissions: &'static [Permission],
}

impl Persona {
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }
}

/// Persona used whenever no other persona can be determined.
///
/// This is the least privileged persona so that a fallback never widens access.
pub const DEFAULT_PERSONA: PersonaId = PersonaId::DavidKim;

static MARIA_THOMPSON: Persona = Persona {
    id: PersonaId::MariaThompson,
    name: "Maria Thompson",
    initials: "MT",
    role: "Program Director",
    department: "Office of Grants Management",
    can_view_unmasked_pii: false,
    permissions: &[
        Permission::ViewApplications,
        Permission::CreateApplications,
        Permission::EditApplications,
        Permission::ApproveApplications,
        Permission::ViewAnalytics,
        Permission::ViewAiInsights,
        Permission::ExportReports,
    ],
};

static DR_EMILY_CARTER: Persona = Persona {
    id: PersonaId::DrEmilyCarter,
    name: "Dr. Emily Carter",
    initials: "EC",
    role: "Chief Medical Officer",
    department: "Veterans Health Administration",
    can_view_unmasked_pii: true,
    permissions: &[
        Permission::ViewApplications,
        Permission::ViewAnalytics,
        Permission::ViewAiInsights,
        Permission::ExportReports,
        Permission::ViewPatientRecords,
    ],
};

static DAVID_KIM: Persona = Persona {
    id: PersonaId::DavidKim,
    name: "David Kim",
    initials: "DK",
    role: "Grants Analyst",
    department: "Office of Grants Management",
    can_view_unmasked_pii: false,
    permissions: &[
        Permission::ViewApplications,
        Permission::CreateApplications,
        Permission::EditApplications,
        Permission::ViewAiInsights,
        Permission::ViewPatientRecords,
    ],
};

static SARAH_JOHNSON: Persona = Persona {
    id: PersonaId::SarahJohnson,
    name: "Sarah Johnson",
    initials: "SJ",
    role: "Compliance Officer",
    department: "Office of Inspector General",
    can_view_unmasked_pii: false,
    permissions: &[
        Permission::ViewApplications,
        Permission::ViewAnalytics,
        Permission::ExportReports,
        Permission::ViewPatientRecords,
        Permission::ViewAuditLog,
    ],
};

static JAMES_RODRIGUEZ: Persona = Persona {
    id: PersonaId::JamesRodriguez,
    name: "James Rodriguez",
    initials: "JR",
    role: "System Administrator",
    department: "IT Operations",
    can_view_unmasked_pii: true,
    permissions: &Permission::ALL,
};

/// All personas in the order the persona picker lists them.
pub static PERSONAS: [&Persona; 5] = [
    &MARIA_THOMPSON,
    &DR_EMILY_CARTER,
    &DAVID_KIM,
    &SARAH_JOHNSON,
    &JAMES_RODRIGUEZ,
];

/// Returns the persona record for an id.
pub fn persona(id: PersonaId) -> &'static Persona {
    match id {
        PersonaId::MariaThompson => &MARIA_THOMPSON,
        PersonaId::DrEmilyCarter => &DR_EMILY_CARTER,
        PersonaId::DavidKim => &DAVID_KIM,
        PersonaId::SarahJohnson => &SARAH_JOHNSON,
        PersonaId::JamesRodriguez => &JAMES_RODRIGUEZ,
    }
}
