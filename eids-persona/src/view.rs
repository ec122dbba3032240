// SPDX-License-Identifier: MIT OR Apache-2.0

use std::borrow::Cow;

use crate::application::Application;
use crate::config::{NavSection, PersonaConfig, persona_config};
use crate::filter::{ApplicationQuery, filter_applications};
use crate::kpi::{KpiValue, evaluate_kpis};
use crate::masking::{PatientRecord, present};
use crate::permission::{Permission, evaluate};
use crate::persona::{DEFAULT_PERSONA, Persona, PersonaId, persona};
use crate::resolver::{CookieJar, KeyValueStore, PersonaResolver};

/// Everything one render of the dashboard needs to know about the active persona.
///
/// Without an active persona the view uses [`PersonaConfig::fallback`], which never shows more
/// than [`DEFAULT_PERSONA`] sees. Permission checks and PII masking fall back to the same persona.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PersonaView {
    persona_id: Option<PersonaId>,
}

impl PersonaView {
    pub fn for_persona(id: PersonaId) -> Self {
        Self {
            persona_id: Some(id),
        }
    }

    pub fn logged_out() -> Self {
        Self { persona_id: None }
    }

    pub fn from_resolver<S, C>(resolver: &PersonaResolver<S, C>) -> Self
    where
        S: KeyValueStore,
        C: CookieJar,
    {
        Self {
            persona_id: resolver.active_persona_id(),
        }
    }

    pub fn persona_id(&self) -> Option<PersonaId> {
        self.persona_id
    }

    /// Active persona, or [`DEFAULT_PERSONA`] when logged out.
    pub fn persona(&self) -> &'static Persona {
        persona(self.persona_id.unwrap_or(DEFAULT_PERSONA))
    }

    pub fn config(&self) -> &'static PersonaConfig {
        match self.persona_id {
            Some(id) => persona_config(id),
            None => PersonaConfig::fallback(),
        }
    }

    pub fn can(&self, permission: Permission) -> bool {
        evaluate(self.persona_id, permission)
    }

    pub fn visible_applications<'a>(&self, all: &'a [Application]) -> Vec<&'a Application> {
        filter_applications(all, &self.config().application_filter)
    }

    /// Applies the table controls on top of the persona's own filter.
    pub fn query_applications<'a>(
        &self,
        all: &'a [Application],
        query: &ApplicationQuery,
    ) -> Vec<&'a Application> {
        query.apply(self.visible_applications(all))
    }

    /// Dashboard tiles computed over the applications visible to this persona.
    pub fn kpis(&self, all: &[Application]) -> Vec<KpiValue> {
        let rows = self.visible_applications(all);
        evaluate_kpis(self.config().kpis, &rows, self.persona_id)
    }

    pub fn present_patient<'r>(&self, record: &'r PatientRecord) -> Cow<'r, PatientRecord> {
        present(record, self.persona().can_view_unmasked_pii)
    }

    pub fn is_section_visible(&self, section: NavSection) -> bool {
        self.config().nav.is_visible(section)
    }

    pub fn home_route(&self) -> &'static str {
        self.config().home_route()
    }
}

impl From<Option<PersonaId>> for PersonaView {
    fn from(persona_id: Option<PersonaId>) -> Self {
        Self { persona_id }
    }
}
