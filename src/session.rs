// SPDX-License-Identifier: MIT OR Apache-2.0

use eids_persona::{DisclaimerGate, PersonaResolver, ResolverError};
use tracing::warn;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::wasm_bindgen;

use crate::browser::{BrowserCookies, BrowserStorage};

fn resolver() -> PersonaResolver<BrowserStorage, BrowserCookies> {
    PersonaResolver::new(BrowserStorage::local(), BrowserCookies::new())
}

/// Returns the id of the active persona, or `undefined` when none is selected.
#[wasm_bindgen(js_name = getActivePersonaId)]
pub fn get_active_persona_id() -> Option<String> {
    resolver()
        .active_persona_id()
        .map(|id| id.as_str().to_string())
}

/// Activates a persona and mirrors it into the persona cookie.
///
/// Throws on an unknown persona id. Returns `false` when browser storage refused the write, in
/// which case nothing was changed.
#[wasm_bindgen(js_name = setActivePersona)]
pub fn set_active_persona(persona_id: String) -> Result<bool, JsValue> {
    match resolver().set_active_persona(&persona_id) {
        Ok(_) => Ok(true),
        Err(err @ ResolverError::UnknownPersona(_)) => {
            Err(js_sys::Error::new(&err.to_string()).into())
        }
        Err(err) => {
            warn!("activating persona {persona_id} failed: {err}");
            Ok(false)
        }
    }
}

/// Forgets the active persona. Returns `false` if storage or cookie could not be cleared.
#[wasm_bindgen(js_name = clearActivePersona)]
pub fn clear_active_persona() -> bool {
    match resolver().clear_active_persona() {
        Ok(()) => true,
        Err(err) => {
            warn!("clearing active persona failed: {err}");
            false
        }
    }
}

#[wasm_bindgen(js_name = isDisclaimerAccepted)]
pub fn is_disclaimer_accepted() -> bool {
    DisclaimerGate::new(BrowserStorage::session()).is_accepted()
}

#[wasm_bindgen(js_name = acceptDisclaimer)]
pub fn accept_disclaimer() -> Result<(), JsValue> {
    jserr!(DisclaimerGate::new(BrowserStorage::session()).accept());
    Ok(())
}
