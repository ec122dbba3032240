// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::BTreeMap;

use serde::Serialize;

use crate::application::{Application, ApplicationStatus, Priority};
use crate::config::{KpiDescriptor, KpiMetric, KpiStyle};
use crate::persona::PersonaId;

/// Aggregates over a set of applications, as shown on dashboard tiles and charts.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSummary {
    pub total: usize,
    pub by_status: BTreeMap<ApplicationStatus, usize>,
    pub requested_by_department: BTreeMap<String, u64>,
    pub total_requested: u64,
    pub high_priority: usize,
    pub progress_sum: u64,
}

impl ApplicationSummary {
    pub fn from_applications<'a>(rows: impl IntoIterator<Item = &'a Application>) -> Self {
        rows.into_iter()
            .fold(ApplicationSummary::default(), |mut summary, application| {
                summary.total += 1;
                *summary.by_status.entry(application.status).or_default() += 1;
                *summary
                    .requested_by_department
                    .entry(application.department.clone())
                    .or_default() += application.requested_amount;
                summary.total_requested += application.requested_amount;
                if application.priority >= Priority::High {
                    summary.high_priority += 1;
                }
                summary.progress_sum += u64::from(application.progress);
                summary
            })
    }

    pub fn count(&self, status: ApplicationStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or_default()
    }

    fn ratio(numerator: f64, denominator: usize) -> f64 {
        if denominator == 0 {
            0.0
        } else {
            numerator / denominator as f64
        }
    }

    pub fn average_requested(&self) -> f64 {
        Self::ratio(self.total_requested as f64, self.total)
    }

    pub fn average_progress(&self) -> f64 {
        Self::ratio(self.progress_sum as f64, self.total)
    }

    /// Share of completed applications in percent.
    pub fn completion_rate(&self) -> f64 {
        Self::ratio(
            self.count(ApplicationStatus::Completed) as f64 * 100.0,
            self.total,
        )
    }
}

/// A KPI tile after its value has been computed.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct KpiValue {
    pub label: &'static str,
    pub value: f64,
    pub formatted: String,
}

/// Formats whole dollars with thousands separators, e.g. `$1,250,000`.
pub fn format_currency(amount: u64) -> String {
    let digits = amount.to_string();
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    formatted.push('$');
    for (index, c) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(c);
    }
    formatted
}

fn format_value(value: f64, style: KpiStyle) -> String {
    match style {
        KpiStyle::Number => format!("{}", value.round() as u64),
        KpiStyle::Currency => format_currency(value.round() as u64),
        KpiStyle::Percent => format!("{}%", value.round() as u64),
    }
}

/// Computes the KPI tiles of a persona over the rows visible to it.
///
/// `persona` is only needed by [`KpiMetric::AssignedToPersona`] and counts zero without one.
pub fn evaluate_kpis(
    descriptors: &[KpiDescriptor],
    rows: &[&Application],
    persona: Option<PersonaId>,
) -> Vec<KpiValue> {
    let summary = ApplicationSummary::from_applications(rows.iter().copied());

    descriptors
        .iter()
        .map(|descriptor| {
            let value = match descriptor.metric {
                KpiMetric::TotalApplications => summary.total as f64,
                KpiMetric::ActiveApplications => summary.count(ApplicationStatus::Active) as f64,
                KpiMetric::InReview => summary.count(ApplicationStatus::Review) as f64,
                KpiMetric::Completed => summary.count(ApplicationStatus::Completed) as f64,
                KpiMetric::Drafts => summary.count(ApplicationStatus::Draft) as f64,
                KpiMetric::TotalRequested => summary.total_requested as f64,
                KpiMetric::AverageRequested => summary.average_requested(),
                KpiMetric::AverageProgress => summary.average_progress(),
                KpiMetric::HighPriority => summary.high_priority as f64,
                KpiMetric::AssignedToPersona => match persona {
                    Some(id) => rows
                        .iter()
                        .filter(|application| application.assignee.id == id.as_str())
                        .count() as f64,
                    None => 0.0,
                },
                KpiMetric::CompletionRate => summary.completion_rate(),
            };

            KpiValue {
                label: descriptor.label,
                value,
                formatted: format_value(value, descriptor.style),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::application::{Application, ApplicationStatus};
    use crate::config::{KpiMetric, KpiStyle, persona_config};
    use crate::filter::filter_applications;
    use crate::fixtures;
    use crate::persona::PersonaId;

    use super::{ApplicationSummary, evaluate_kpis, format_currency};

    #[rstest]
    #[case(0, "$0")]
    #[case(999, "$999")]
    #[case(1_000, "$1,000")]
    #[case(100_000, "$100,000")]
    #[case(1_250_000, "$1,250,000")]
    fn formats_currency(#[case] amount: u64, #[case] expected: &str) {
        assert_eq!(format_currency(amount), expected);
    }

    #[test]
    fn summarizes_fixture() {
        let applications = fixtures::applications().unwrap();
        let summary = ApplicationSummary::from_applications(&applications);

        assert_eq!(summary.total, applications.len());
        assert_eq!(
            summary.by_status.values().sum::<usize>(),
            applications.len()
        );
        assert_eq!(
            summary.requested_by_department.values().sum::<u64>(),
            summary.total_requested
        );
    }

    #[test]
    fn empty_rows_do_not_divide_by_zero() {
        let summary = ApplicationSummary::from_applications(std::iter::empty::<&Application>());
        assert_eq!(summary.average_progress(), 0.0);
        assert_eq!(summary.average_requested(), 0.0);
        assert_eq!(summary.completion_rate(), 0.0);
    }

    #[test]
    fn evaluates_persona_tiles() {
        let applications = fixtures::applications().unwrap();
        let config = persona_config(PersonaId::MariaThompson);
        let rows = filter_applications(&applications, &config.application_filter);
        let tiles = evaluate_kpis(config.kpis, &rows, Some(PersonaId::MariaThompson));

        assert_eq!(tiles.len(), config.kpis.len());
        assert_eq!(tiles[0].value, 3.0);
        assert_eq!(tiles[0].formatted, "3");

        let total: u64 = rows.iter().map(|row| row.requested_amount).sum();
        assert_eq!(tiles[1].formatted, format_currency(total));
        assert!(tiles[3].formatted.ends_with('%'));
    }

    #[test]
    fn counts_assigned_rows() {
        let applications = fixtures::applications().unwrap();
        let rows: Vec<&Application> = applications.iter().collect();
        let descriptors = [crate::config::KpiDescriptor {
            label: "Mine",
            metric: KpiMetric::AssignedToPersona,
            style: KpiStyle::Number,
        }];

        let expected = applications
            .iter()
            .filter(|row| row.assignee.id == "david-kim")
            .count() as f64;
        let tiles = evaluate_kpis(&descriptors, &rows, Some(PersonaId::DavidKim));
        assert_eq!(tiles[0].value, expected);
        assert!(expected > 0.0);

        let tiles = evaluate_kpis(&descriptors, &rows, None);
        assert_eq!(tiles[0].value, 0.0);
    }

    #[test]
    fn counts_drafts_of_visible_rows() {
        let applications = fixtures::applications().unwrap();
        let descriptors = [crate::config::KpiDescriptor {
            label: "Drafts",
            metric: KpiMetric::Drafts,
            style: KpiStyle::Number,
        }];

        let rows: Vec<&Application> = applications.iter().collect();
        let expected = rows
            .iter()
            .filter(|row| row.status == ApplicationStatus::Draft)
            .count();
        let tiles = evaluate_kpis(&descriptors, &rows, None);
        assert_eq!(tiles[0].value, expected as f64);
        assert_eq!(tiles[0].formatted, expected.to_string());

        let without_drafts: Vec<&Application> = rows
            .iter()
            .copied()
            .filter(|row| row.status != ApplicationStatus::Draft)
            .collect();
        let tiles = evaluate_kpis(&descriptors, &without_drafts, None);
        assert_eq!(tiles[0].value, 0.0);
        assert_eq!(tiles[0].formatted, "0");
    }
}
