// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bundled demo datasets.
//!
//! The JSON files are compiled into the binary, so loading only fails if a fixture was edited into
//! an invalid shape.
use thiserror::Error;

use crate::application::Application;
use crate::masking::PatientRecord;

const APPLICATIONS: &str = include_str!("../fixtures/applications.json");

const PATIENTS: &str = include_str!("../fixtures/patients.json");

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("invalid {name} fixture: {source}")]
    Invalid {
        name: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

fn load<T: serde::de::DeserializeOwned>(name: &'static str, raw: &str) -> Result<T, FixtureError> {
    serde_json::from_str(raw).map_err(|source| FixtureError::Invalid { name, source })
}

/// Grant applications shown in the applications table and dashboards.
pub fn applications() -> Result<Vec<Application>, FixtureError> {
    load("applications", APPLICATIONS)
}

/// Patient records shown in the records demo. All values are synthetic.
pub fn patients() -> Result<Vec<PatientRecord>, FixtureError> {
    load("patients", PATIENTS)
}
