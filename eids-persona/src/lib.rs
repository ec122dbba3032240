// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persona-scoped views for the EIDS data applications demo.
//!
//! The demo dashboard lets a visitor act as one of five fixed personas. Everything a persona may
//! see or do is derived from static data bundled with this crate:
//!
//! 1. [`PersonaResolver`] reads which persona is active from client-side storage.
//! 2. [`has_permission`] gates actions by membership in the persona's permission set.
//! 3. [`filter_applications`] scopes the application dataset with the persona's
//!    [`ApplicationFilter`].
//! 4. [`mask_record`] redacts patient PII unless the persona may view it unmasked.
//!
//! [`PersonaView`] strings these steps together for a single render.
//!
//! ```rust
//! use eids_persona::{PersonaId, PersonaView, Permission, fixtures};
//!
//! let applications = fixtures::applications().unwrap();
//! let view = PersonaView::for_persona(PersonaId::MariaThompson);
//!
//! assert!(view.can(Permission::ApproveApplications));
//! assert_eq!(view.visible_applications(&applications).len(), 3);
//! ```
//!
//! Masking happens in the same process that holds the unmasked values. It is a display
//! convenience for the demo and not a security control.

mod application;
mod config;
mod filter;
pub mod fixtures;
mod guard;
mod kpi;
mod masking;
mod permission;
mod persona;
mod resolver;
mod sort;
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
mod view;

pub use application::{
    AiInsight, Application, ApplicationDocument, ApplicationStatus, ApplicationStep, Assignee,
    Priority, StepStatus,
};
pub use config::{
    KpiDescriptor, KpiMetric, KpiStyle, NavSection, NavVisibility, PersonaConfig, QuickAction,
    persona_config,
};
pub use filter::{ApplicationFilter, ApplicationQuery, filter_applications};
pub use fixtures::FixtureError;
pub use guard::{GuardDecision, LOGIN_ROUTE, RouteGuard, RouteRequest};
pub use kpi::{ApplicationSummary, KpiValue, evaluate_kpis, format_currency};
pub use masking::{
    ADDRESS_PLACEHOLDER, FieldKind, PatientRecord, mask_field, mask_record, present,
};
pub use permission::{Permission, UnknownPermissionError, evaluate, has_permission};
pub use persona::{DEFAULT_PERSONA, PERSONAS, Persona, PersonaId, UnknownPersonaError, persona};
pub use resolver::{
    Cookie, CookieError, CookieJar, DEFAULT_COOKIE_MAX_AGE, DEFAULT_PERSONA_KEY,
    DISCLAIMER_ACCEPTED_KEY, DisclaimerGate, KeyValueStore, PersonaResolver, ResolverConfig,
    ResolverError, SameSite, StorageError, UnknownPersonaPolicy, parse_cookie_header,
};
pub use sort::{SortDirection, SortField, SortSpec, sort_applications};
pub use view::PersonaView;
