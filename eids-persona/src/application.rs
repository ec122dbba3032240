// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Lifecycle stage of a grant application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Draft,
    Active,
    Review,
    Completed,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 4] = [
        ApplicationStatus::Draft,
        ApplicationStatus::Active,
        ApplicationStatus::Review,
        ApplicationStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Draft => "draft",
            ApplicationStatus::Active => "active",
            ApplicationStatus::Review => "review",
            ApplicationStatus::Completed => "completed",
        }
    }
}

impl Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Priority of an application. Ordered from least to most urgent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    InProgress,
    Completed,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationStep {
    pub name: String,
    pub status: StepStatus,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationDocument {
    pub name: String,
    pub kind: String,
    pub uploaded: bool,
}

/// Pre-computed AI annotation attached to an application.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AiInsight {
    pub kind: String,
    pub message: String,
    pub confidence: f32,
}

/// A grant application as bundled in the demo fixtures.
///
/// Applications are reference data. Filters and sorts borrow them and never change them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: String,
    pub name: String,
    pub status: ApplicationStatus,
    pub department: String,

    /// Requested funding in whole dollars.
    pub requested_amount: u64,

    pub assignee: Assignee,
    pub priority: Priority,

    /// Completion in percent, `0..=100`.
    pub progress: u8,

    /// ISO date (`YYYY-MM-DD`), so lexical order is chronological order.
    pub submitted_date: String,

    #[serde(default)]
    pub steps: Vec<ApplicationStep>,

    #[serde(default)]
    pub documents: Vec<ApplicationDocument>,

    #[serde(default)]
    pub ai_insights: Vec<AiInsight>,

    #[serde(default)]
    pub risk_score: Option<u8>,
}

impl Application {
    /// Number of steps marked completed.
    pub fn completed_steps(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| step.status == StepStatus::Completed)
            .count()
    }

    /// Documents which still need to be uploaded.
    pub fn missing_documents(&self) -> impl Iterator<Item = &ApplicationDocument> {
        self.documents.iter().filter(|document| !document.uploaded)
    }
}

#[cfg(test)]
mod tests {
    use super::{Application, ApplicationStatus, Priority, StepStatus};

    const RECORD: &str = r#"{
        "id": "APP-2024-900",
        "name": "Rural Telehealth Expansion",
        "status": "review",
        "department": "Veterans Health Administration",
        "requestedAmount": 250000,
        "assignee": { "id": "maria-thompson", "name": "Maria Thompson" },
        "priority": "high",
        "progress": 60,
        "submittedDate": "2024-02-10",
        "steps": [
            { "name": "Eligibility", "status": "completed" },
            { "name": "Budget review", "status": "in_progress" }
        ],
        "documents": [
            { "name": "Budget.pdf", "kind": "budget", "uploaded": true },
            { "name": "Letters.pdf", "kind": "support", "uploaded": false }
        ]
    }"#;

    #[test]
    fn deserializes_fixture_record() {
        let application: Application = serde_json::from_str(RECORD).unwrap();
        assert_eq!(application.status, ApplicationStatus::Review);
        assert_eq!(application.priority, Priority::High);
        assert_eq!(application.requested_amount, 250_000);
        assert_eq!(application.steps[1].status, StepStatus::InProgress);
        assert_eq!(application.completed_steps(), 1);
        assert_eq!(application.missing_documents().count(), 1);
        assert!(application.ai_insights.is_empty());
        assert_eq!(application.risk_score, None);
    }

    #[test]
    fn rejects_unknown_status() {
        let record = RECORD.replace("\"review\"", "\"archived\"");
        assert!(serde_json::from_str::<Application>(&record).is_err());
    }

    #[test]
    fn priority_orders_by_urgency() {
        assert!(Priority::Low < Priority::Medium);
        assert!(Priority::High < Priority::Critical);
    }
}
