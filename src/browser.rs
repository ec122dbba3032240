// SPDX-License-Identifier: MIT OR Apache-2.0

//! Browser-backed implementations of the persona storage traits.
use eids_persona::{Cookie, CookieJar, KeyValueStore, StorageError, parse_cookie_header};
use tracing::warn;
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen::{JsCast, JsValue};

#[wasm_bindgen]
extern "C" {
    type Storage;

    #[wasm_bindgen(method, catch, js_name = getItem)]
    fn get_item(this: &Storage, key: &str) -> Result<Option<String>, JsValue>;

    #[wasm_bindgen(method, catch, js_name = setItem)]
    fn set_item(this: &Storage, key: &str, value: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = removeItem)]
    fn remove_item(this: &Storage, key: &str) -> Result<(), JsValue>;

    type Document;

    #[wasm_bindgen(method, catch, getter)]
    fn cookie(this: &Document) -> Result<String, JsValue>;

    #[wasm_bindgen(method, catch, setter)]
    fn set_cookie(this: &Document, value: &str) -> Result<(), JsValue>;
}

fn describe(err: JsValue) -> String {
    match err.dyn_into::<js_sys::Error>() {
        Ok(err) => String::from(err.message()),
        Err(err) => err.as_string().unwrap_or_else(|| format!("{:?}", err)),
    }
}

/// Looks up a global such as `localStorage`. Accessing storage throws in some privacy modes, so
/// any failure is reported as `None`.
fn global<T: JsCast>(name: &str) -> Option<T> {
    match js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str(name)) {
        Ok(value) if !value.is_undefined() && !value.is_null() => Some(value.unchecked_into()),
        Ok(_) => {
            warn!("{name} is not available in this environment");
            None
        }
        Err(err) => {
            warn!("accessing {name} failed: {}", describe(err));
            None
        }
    }
}

/// `localStorage` or `sessionStorage`. Unavailable storage fails every operation.
pub struct BrowserStorage {
    name: &'static str,
    storage: Option<Storage>,
}

impl BrowserStorage {
    pub fn local() -> Self {
        Self::named("localStorage")
    }

    pub fn session() -> Self {
        Self::named("sessionStorage")
    }

    fn named(name: &'static str) -> Self {
        Self {
            name,
            storage: global(name),
        }
    }

    fn storage(&self) -> Result<&Storage, StorageError> {
        self.storage
            .as_ref()
            .ok_or_else(|| StorageError::Unavailable(self.name.to_string()))
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage()?
            .get_item(key)
            .map_err(|err| StorageError::Unavailable(describe(err)))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|err| StorageError::WriteFailed {
                key: key.to_string(),
                reason: describe(err),
            })
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.storage()?
            .remove_item(key)
            .map_err(|err| StorageError::WriteFailed {
                key: key.to_string(),
                reason: describe(err),
            })
    }
}

/// Cookies of the current `document`.
pub struct BrowserCookies {
    document: Option<Document>,
}

impl BrowserCookies {
    pub fn new() -> Self {
        Self {
            document: global("document"),
        }
    }

    fn document(&self) -> Result<&Document, StorageError> {
        self.document
            .as_ref()
            .ok_or_else(|| StorageError::Unavailable("document".to_string()))
    }
}

impl Default for BrowserCookies {
    fn default() -> Self {
        Self::new()
    }
}

impl CookieJar for BrowserCookies {
    fn get(&self, name: &str) -> Result<Option<String>, StorageError> {
        let header = self
            .document()?
            .cookie()
            .map_err(|err| StorageError::Unavailable(describe(err)))?;
        Ok(parse_cookie_header(&header, name).map(str::to_string))
    }

    fn set(&mut self, cookie: &Cookie) -> Result<(), StorageError> {
        self.document()?
            .set_cookie(&cookie.to_string())
            .map_err(|err| StorageError::WriteFailed {
                key: cookie.name.clone(),
                reason: describe(err),
            })
    }
}
