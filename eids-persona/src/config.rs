// SPDX-License-Identifier: MIT OR Apache-2.0

//! Static view configuration bound to each persona.
//!
//! A `PersonaConfig` decides what the dashboard shows for a persona: which KPI tiles, which quick
//! actions, which applications (via [`ApplicationFilter`]), which navigation sections and where
//! the persona lands after picking it.
use serde::Serialize;

use crate::application::ApplicationStatus;
use crate::filter::ApplicationFilter;
use crate::persona::{DEFAULT_PERSONA, PersonaId};

/// Value a KPI tile is computed from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum KpiMetric {
    TotalApplications,
    ActiveApplications,
    InReview,
    Completed,
    Drafts,
    TotalRequested,
    AverageRequested,
    AverageProgress,
    HighPriority,
    AssignedToPersona,
    CompletionRate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum KpiStyle {
    Number,
    Currency,
    Percent,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct KpiDescriptor {
    pub label: &'static str,
    pub metric: KpiMetric,
    pub style: KpiStyle,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QuickAction {
    pub label: &'static str,
    pub route: &'static str,
    pub icon: &'static str,
}

/// Navigation sections of the dashboard shell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NavSection {
    Dashboard,
    Applications,
    Analytics,
    AiInsights,
    PatientRecords,
    Reports,
    Settings,
    Admin,
}

impl NavSection {
    pub const ALL: [NavSection; 8] = [
        NavSection::Dashboard,
        NavSection::Applications,
        NavSection::Analytics,
        NavSection::AiInsights,
        NavSection::PatientRecords,
        NavSection::Reports,
        NavSection::Settings,
        NavSection::Admin,
    ];

    /// Route prefix of the section.
    pub fn route(&self) -> &'static str {
        match self {
            NavSection::Dashboard => "/dashboard",
            NavSection::Applications => "/applications",
            NavSection::Analytics => "/analytics",
            NavSection::AiInsights => "/ai-insights",
            NavSection::PatientRecords => "/patients",
            NavSection::Reports => "/reports",
            NavSection::Settings => "/settings",
            NavSection::Admin => "/admin",
        }
    }

    /// Section owning a request path, if any.
    pub fn from_path(path: &str) -> Option<NavSection> {
        NavSection::ALL.into_iter().find(|section| {
            let route = section.route();
            path == route
                || path
                    .strip_prefix(route)
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavVisibility {
    pub dashboard: bool,
    pub applications: bool,
    pub analytics: bool,
    pub ai_insights: bool,
    pub patient_records: bool,
    pub reports: bool,
    pub settings: bool,
    pub admin: bool,
}

impl NavVisibility {
    pub fn is_visible(&self, section: NavSection) -> bool {
        match section {
            NavSection::Dashboard => self.dashboard,
            NavSection::Applications => self.applications,
            NavSection::Analytics => self.analytics,
            NavSection::AiInsights => self.ai_insights,
            NavSection::PatientRecords => self.patient_records,
            NavSection::Reports => self.reports,
            NavSection::Settings => self.settings,
            NavSection::Admin => self.admin,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaConfig {
    /// `None` only for the fallback configuration.
    pub persona_id: Option<PersonaId>,
    pub kpis: &'static [KpiDescriptor],
    pub quick_actions: &'static [QuickAction],
    pub application_filter: ApplicationFilter,
    pub nav: NavVisibility,
    pub home_redirect: Option<&'static str>,
    pub welcome_subtitle: &'static str,
}

impl PersonaConfig {
    /// Configuration used when no persona is active.
    ///
    /// Its data scope is the one of [`DEFAULT_PERSONA`], the persona permission checks and
    /// masking fall back to.
    pub fn fallback() -> &'static PersonaConfig {
        &FALLBACK
    }

    /// Route the persona lands on after selection.
    pub fn home_route(&self) -> &'static str {
        self.home_redirect.unwrap_or(NavSection::Dashboard.route())
    }
}

const fn kpi(label: &'static str, metric: KpiMetric, style: KpiStyle) -> KpiDescriptor {
    KpiDescriptor {
        label,
        metric,
        style,
    }
}

const fn action(label: &'static str, route: &'static str, icon: &'static str) -> QuickAction {
    QuickAction { label, route, icon }
}

const BASE_NAV: NavVisibility = NavVisibility {
    dashboard: true,
    applications: true,
    analytics: false,
    ai_insights: false,
    patient_records: false,
    reports: false,
    settings: true,
    admin: false,
};

static FALLBACK: PersonaConfig = PersonaConfig {
    persona_id: None,
    kpis: &[
        kpi("Total Applications", KpiMetric::TotalApplications, KpiStyle::Number),
        kpi("Active", KpiMetric::ActiveApplications, KpiStyle::Number),
        kpi("In Review", KpiMetric::InReview, KpiStyle::Number),
        kpi("Completed", KpiMetric::Completed, KpiStyle::Number),
    ],
    quick_actions: &[action("Browse Applications", "/applications", "folder")],
    application_filter: ApplicationFilter::assigned_to(DEFAULT_PERSONA.as_str()),
    nav: BASE_NAV,
    home_redirect: None,
    welcome_subtitle: "Pick a persona to see the applications and tools of their role.",
};

static MARIA_THOMPSON: PersonaConfig = PersonaConfig {
    persona_id: Some(PersonaId::MariaThompson),
    kpis: &[
        kpi("High-Value Applications", KpiMetric::TotalApplications, KpiStyle::Number),
        kpi("Total Requested", KpiMetric::TotalRequested, KpiStyle::Currency),
        kpi("Awaiting Approval", KpiMetric::InReview, KpiStyle::Number),
        kpi("Completion Rate", KpiMetric::CompletionRate, KpiStyle::Percent),
    ],
    quick_actions: &[
        action("Review Pending Approvals", "/applications?status=review", "check-circle"),
        action("Portfolio Analytics", "/analytics", "bar-chart"),
        action("Export Report", "/reports", "download"),
    ],
    application_filter: ApplicationFilter::min_budget(100_000),
    nav: NavVisibility {
        analytics: true,
        ai_insights: true,
        reports: true,
        ..BASE_NAV
    },
    home_redirect: None,
    welcome_subtitle: "Applications requesting $100,000 or more need your sign-off.",
};

static DR_EMILY_CARTER: PersonaConfig = PersonaConfig {
    persona_id: Some(PersonaId::DrEmilyCarter),
    kpis: &[
        kpi("Clinical Applications", KpiMetric::TotalApplications, KpiStyle::Number),
        kpi("In Review", KpiMetric::InReview, KpiStyle::Number),
        kpi("Average Progress", KpiMetric::AverageProgress, KpiStyle::Percent),
        kpi("High Priority", KpiMetric::HighPriority, KpiStyle::Number),
    ],
    quick_actions: &[
        action("Patient Records", "/patients", "heart-pulse"),
        action("AI Insights", "/ai-insights", "sparkles"),
    ],
    application_filter: ApplicationFilter::statuses(&[
        ApplicationStatus::Active,
        ApplicationStatus::Review,
    ]),
    nav: NavVisibility {
        analytics: true,
        ai_insights: true,
        patient_records: true,
        reports: true,
        ..BASE_NAV
    },
    home_redirect: Some("/patients"),
    welcome_subtitle: "Clinical programs and patient records are ready for review.",
};

static DAVID_KIM: PersonaConfig = PersonaConfig {
    persona_id: Some(PersonaId::DavidKim),
    kpis: &[
        kpi("My Applications", KpiMetric::AssignedToPersona, KpiStyle::Number),
        kpi("Drafts", KpiMetric::Drafts, KpiStyle::Number),
        kpi("Average Progress", KpiMetric::AverageProgress, KpiStyle::Percent),
        kpi("Average Request", KpiMetric::AverageRequested, KpiStyle::Currency),
    ],
    quick_actions: &[
        action("New Application", "/applications/new", "plus"),
        action("My Drafts", "/applications?status=draft", "file-text"),
    ],
    application_filter: ApplicationFilter::assigned_to("david-kim"),
    nav: NavVisibility {
        ai_insights: true,
        patient_records: true,
        ..BASE_NAV
    },
    home_redirect: Some("/applications"),
    welcome_subtitle: "Pick up where you left off on your assigned applications.",
};

static SARAH_JOHNSON: PersonaConfig = PersonaConfig {
    persona_id: Some(PersonaId::SarahJohnson),
    kpis: &[
        kpi("Under Audit", KpiMetric::TotalApplications, KpiStyle::Number),
        kpi("In Review", KpiMetric::InReview, KpiStyle::Number),
        kpi("Completed", KpiMetric::Completed, KpiStyle::Number),
        kpi("Funds Under Review", KpiMetric::TotalRequested, KpiStyle::Currency),
    ],
    quick_actions: &[
        action("Compliance Reports", "/reports", "shield"),
        action("Audit Log", "/settings/audit", "list"),
    ],
    application_filter: ApplicationFilter::statuses(&[
        ApplicationStatus::Review,
        ApplicationStatus::Completed,
    ]),
    nav: NavVisibility {
        analytics: true,
        patient_records: true,
        reports: true,
        ..BASE_NAV
    },
    home_redirect: None,
    welcome_subtitle: "Applications in review and recently completed are queued for audit.",
};

static JAMES_RODRIGUEZ: PersonaConfig = PersonaConfig {
    persona_id: Some(PersonaId::JamesRodriguez),
    kpis: &[
        kpi("Total Applications", KpiMetric::TotalApplications, KpiStyle::Number),
        kpi("Active", KpiMetric::ActiveApplications, KpiStyle::Number),
        kpi("Total Requested", KpiMetric::TotalRequested, KpiStyle::Currency),
        kpi("Completion Rate", KpiMetric::CompletionRate, KpiStyle::Percent),
    ],
    quick_actions: &[
        action("Manage Users", "/admin/users", "users"),
        action("System Analytics", "/analytics", "activity"),
        action("Export Report", "/reports", "download"),
    ],
    application_filter: ApplicationFilter::show_all(),
    nav: NavVisibility {
        dashboard: true,
        applications: true,
        analytics: true,
        ai_insights: true,
        patient_records: true,
        reports: true,
        settings: true,
        admin: true,
    },
    home_redirect: None,
    welcome_subtitle: "All applications and system settings are available to you.",
};

/// Returns the view configuration of a persona.
pub fn persona_config(id: PersonaId) -> &'static PersonaConfig {
    match id {
        PersonaId::MariaThompson => &MARIA_THOMPSON,
        PersonaId::DrEmilyCarter => &DR_EMILY_CARTER,
        PersonaId::DavidKim => &DAVID_KIM,
        PersonaId::SarahJohnson => &SARAH_JOHNSON,
        PersonaId::JamesRodriguez => &JAMES_RODRIGUEZ,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::filter::filter_applications;
    use crate::fixtures;
    use crate::permission::Permission;
    use crate::persona::{DEFAULT_PERSONA, PersonaId, persona};

    use super::{NavSection, PersonaConfig, persona_config};

    #[test]
    fn every_persona_has_its_own_config() {
        for id in PersonaId::ALL {
            let config = persona_config(id);
            assert_eq!(config.persona_id, Some(id));
            assert!(!config.kpis.is_empty());
            assert!(!config.quick_actions.is_empty());
            assert!(!config.welcome_subtitle.is_empty());
        }
        assert_eq!(PersonaConfig::fallback().persona_id, None);
    }

    #[test]
    fn nav_matches_permissions() {
        for id in PersonaId::ALL {
            let nav = persona_config(id).nav;
            let persona = persona(id);
            if nav.patient_records {
                assert!(persona.has_permission(Permission::ViewPatientRecords));
            }
            if nav.analytics {
                assert!(persona.has_permission(Permission::ViewAnalytics));
            }
            if nav.admin {
                assert!(persona.has_permission(Permission::ManageUsers));
            }
        }
    }

    #[test]
    fn fallback_is_no_wider_than_default_persona() {
        let applications = fixtures::applications().unwrap();
        let default_rows =
            filter_applications(&applications, &persona_config(DEFAULT_PERSONA).application_filter);
        let fallback = PersonaConfig::fallback();
        let fallback_rows = filter_applications(&applications, &fallback.application_filter);

        assert!(fallback_rows.len() < applications.len());
        for row in &fallback_rows {
            assert!(default_rows.iter().any(|other| other.id == row.id), "{}", row.id);
        }

        let default_nav = persona_config(DEFAULT_PERSONA).nav;
        for section in NavSection::ALL {
            if fallback.nav.is_visible(section) {
                assert!(default_nav.is_visible(section), "{section:?}");
            }
        }
    }

    #[test]
    fn home_route_defaults_to_dashboard() {
        assert_eq!(persona_config(PersonaId::MariaThompson).home_route(), "/dashboard");
        assert_eq!(persona_config(PersonaId::DrEmilyCarter).home_route(), "/patients");
    }

    #[rstest]
    #[case("/dashboard", Some(NavSection::Dashboard))]
    #[case("/applications/APP-2024-001", Some(NavSection::Applications))]
    #[case("/patients", Some(NavSection::PatientRecords))]
    #[case("/admin/users", Some(NavSection::Admin))]
    #[case("/administrator", None)]
    #[case("/login", None)]
    fn maps_paths_to_sections(#[case] path: &str, #[case] expected: Option<NavSection>) {
        assert_eq!(NavSection::from_path(path), expected);
    }
}
