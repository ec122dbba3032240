// SPDX-License-Identifier: MIT OR Apache-2.0

//! WebAssembly bindings for persona-scoped views in the EIDS data applications demo.
//!
//! The dashboard front-end calls into these functions to resolve the active persona from
//! `localStorage`, gate actions, scope the bundled datasets and mask patient PII. All logic lives
//! in [`eids_persona`], this crate only moves values across the JavaScript boundary.
//!
//! Everything is compiled for `wasm32` targets only.

#[cfg(target_arch = "wasm32")]
macro_rules! jserr {
    ($l:expr) => {
        $l.map_err::<wasm_bindgen::JsValue, _>(|err| js_sys::Error::new(&format!("{}", err)).into())?
    };
}

#[cfg(target_arch = "wasm32")]
mod browser;
#[cfg(target_arch = "wasm32")]
mod serde;
#[cfg(target_arch = "wasm32")]
mod session;
#[cfg(all(test, target_arch = "wasm32"))]
mod tests;
#[cfg(target_arch = "wasm32")]
mod views;

#[cfg(target_arch = "wasm32")]
pub use browser::{BrowserCookies, BrowserStorage};
#[cfg(target_arch = "wasm32")]
pub use session::{
    accept_disclaimer, clear_active_persona, get_active_persona_id, is_disclaimer_accepted,
    set_active_persona,
};
#[cfg(target_arch = "wasm32")]
pub use views::{
    filter_applications, has_permission, list_personas, mask_field, mask_patient_record,
    persona_config, present_patient_record,
};

/// Sets a [`panic hook`] for better error messages in the browser console.
///
/// [`panic hook`]: https://crates.io/crates/console_error_panic_hook
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(js_name = setWasmPanicHook)]
pub fn set_wasm_panic_hook() {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
}
