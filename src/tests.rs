// SPDX-License-Identifier: MIT OR Apache-2.0

use eids_persona::{Application, PatientRecord, PersonaId, fixtures};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

use crate::serde::serialize_to_js;
use crate::{
    clear_active_persona, filter_applications, get_active_persona_id, has_permission,
    mask_field, present_patient_record, set_active_persona,
};

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn persona_round_trips_through_local_storage() {
    assert!(set_active_persona("sarah-johnson".to_string()).unwrap());
    assert_eq!(get_active_persona_id().as_deref(), Some("sarah-johnson"));

    assert!(set_active_persona("eve".to_string()).is_err());
    assert_eq!(get_active_persona_id().as_deref(), Some("sarah-johnson"));

    assert!(clear_active_persona());
    assert_eq!(get_active_persona_id(), None);
}

#[wasm_bindgen_test]
fn checks_permissions() {
    assert!(has_permission(
        PersonaId::MariaThompson.to_string(),
        "approve_applications".to_string()
    ));
    assert!(!has_permission(
        "eve".to_string(),
        "approve_applications".to_string()
    ));
}

#[wasm_bindgen_test]
fn filters_bundled_applications() {
    let rows = filter_applications(Some("maria-thompson".to_string()), JsValue::UNDEFINED).unwrap();
    let rows: Vec<Application> = serde_wasm_bindgen::from_value(rows).unwrap();
    assert_eq!(rows.len(), 3);

    let unknown = filter_applications(Some("eve".to_string()), JsValue::UNDEFINED).unwrap();
    let unknown: Vec<Application> = serde_wasm_bindgen::from_value(unknown).unwrap();
    assert!(!unknown.is_empty());
    assert!(unknown.iter().all(|row| row.assignee.id == "david-kim"));
}

#[wasm_bindgen_test]
fn masks_values_and_records() {
    assert_eq!(
        mask_field("ssn".to_string(), "123-45-6789".to_string()).unwrap(),
        "***-**-6789"
    );
    assert!(mask_field("password".to_string(), "secret".to_string()).is_err());

    let record = fixtures::patients().unwrap().remove(0);
    let shown = present_patient_record(
        Some("david-kim".to_string()),
        serialize_to_js(&record).unwrap(),
    )
    .unwrap();
    let shown: PatientRecord = serde_wasm_bindgen::from_value(shown).unwrap();
    assert_eq!(shown.email, "j.***@veteranmail.gov");
}
