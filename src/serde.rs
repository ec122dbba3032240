// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::de::DeserializeOwned;
use serde::ser::Serialize;
use serde_wasm_bindgen::{Error, Serializer};
use wasm_bindgen::JsValue;

/// Serialize any value into a plain JavaScript object.
///
/// Maps become objects and integers stay `number`, so the result can be handed to React state as
/// is. Requested amounts are far below `Number.MAX_SAFE_INTEGER`.
pub fn serialize_to_js<T>(value: &T) -> Result<JsValue, Error>
where
    T: Serialize + ?Sized,
{
    let serializer = Serializer::json_compatible();
    value.serialize(&serializer)
}

/// Deserialize a JavaScript value, treating `undefined` and `null` as the type's default.
pub fn deserialize_or_default<T>(value: JsValue) -> Result<T, Error>
where
    T: DeserializeOwned + Default,
{
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    serde_wasm_bindgen::from_value(value)
}
