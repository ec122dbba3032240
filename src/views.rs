// SPDX-License-Identifier: MIT OR Apache-2.0

use eids_persona::{
    ApplicationQuery, FieldKind, PERSONAS, PatientRecord, PersonaView, ResolverConfig, fixtures,
};
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::wasm_bindgen;

use crate::serde::{deserialize_or_default, serialize_to_js};

/// Resolves a raw id the same way the persona resolver treats stored values.
fn view_for(persona_id: Option<String>) -> PersonaView {
    let config = ResolverConfig::default();
    PersonaView::from(persona_id.and_then(|raw| config.resolve(&raw)))
}

/// Checks a permission. Unknown personas are evaluated as the least privileged persona, unknown
/// permissions are never granted.
#[wasm_bindgen(js_name = hasPermission)]
pub fn has_permission(persona_id: String, permission: String) -> bool {
    eids_persona::has_permission(&persona_id, &permission)
}

/// Returns all personas in picker order.
#[wasm_bindgen(js_name = listPersonas)]
pub fn list_personas() -> Result<JsValue, JsValue> {
    Ok(jserr!(serialize_to_js(&PERSONAS)))
}

/// Returns the view configuration of a persona, or the fallback configuration for `undefined`
/// and unknown ids.
#[wasm_bindgen(js_name = personaConfig)]
pub fn persona_config(persona_id: Option<String>) -> Result<JsValue, JsValue> {
    Ok(jserr!(serialize_to_js(view_for(persona_id).config())))
}

/// Returns the bundled applications visible to a persona, narrowed by optional table controls
/// (`{ search, status, sort: { field, direction } }`).
#[wasm_bindgen(js_name = filterApplications)]
pub fn filter_applications(persona_id: Option<String>, query: JsValue) -> Result<JsValue, JsValue> {
    let query: ApplicationQuery = jserr!(deserialize_or_default(query));
    let applications = jserr!(fixtures::applications());
    let rows = view_for(persona_id).query_applications(&applications, &query);
    Ok(jserr!(serialize_to_js(&rows)))
}

/// Masks a single value. `kind` is one of `ssn`, `dateOfBirth`, `phone`, `email`, `address`,
/// `serviceNumber` or `insuranceId`.
#[wasm_bindgen(js_name = maskField)]
pub fn mask_field(kind: String, raw: String) -> Result<String, JsValue> {
    let kind: FieldKind = jserr!(serde_wasm_bindgen::from_value(JsValue::from_str(&kind)));
    Ok(eids_persona::mask_field(kind, &raw))
}

#[wasm_bindgen(js_name = maskPatientRecord)]
pub fn mask_patient_record(record: JsValue) -> Result<JsValue, JsValue> {
    let record: PatientRecord = jserr!(serde_wasm_bindgen::from_value(record));
    Ok(jserr!(serialize_to_js(&eids_persona::mask_record(&record))))
}

/// Returns the record as the given persona may see it.
#[wasm_bindgen(js_name = presentPatientRecord)]
pub fn present_patient_record(
    persona_id: Option<String>,
    record: JsValue,
) -> Result<JsValue, JsValue> {
    let record: PatientRecord = jserr!(serde_wasm_bindgen::from_value(record));
    let view = view_for(persona_id);
    Ok(jserr!(serialize_to_js(view.present_patient(&record).as_ref())))
}
