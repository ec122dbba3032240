// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities.
use std::collections::HashMap;

use crate::resolver::{Cookie, CookieJar, KeyValueStore, StorageError};

pub fn setup_logging() {
    if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    }
}

/// In-memory stand-in for `localStorage` and `sessionStorage`.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// In-memory cookie jar which drops cookies set with `Max-Age=0`.
#[derive(Clone, Debug, Default)]
pub struct MemoryCookieJar {
    cookies: HashMap<String, Cookie>,
}

impl MemoryCookieJar {
    pub fn cookie(&self, name: &str) -> Option<&Cookie> {
        self.cookies.get(name)
    }
}

impl CookieJar for MemoryCookieJar {
    fn get(&self, name: &str) -> Result<Option<String>, StorageError> {
        Ok(self.cookies.get(name).map(|cookie| cookie.value.clone()))
    }

    fn set(&mut self, cookie: &Cookie) -> Result<(), StorageError> {
        if cookie.is_expired() {
            self.cookies.remove(&cookie.name);
        } else {
            self.cookies.insert(cookie.name.clone(), cookie.clone());
        }
        Ok(())
    }
}

/// Storage which behaves like disabled browser storage.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnavailableStore;

impl KeyValueStore for UnavailableStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable("storage disabled".to_string()))
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("storage disabled".to_string()))
    }

    fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("storage disabled".to_string()))
    }
}

/// Cookie jar which rejects every write.
#[derive(Clone, Copy, Debug, Default)]
pub struct FailingCookieJar;

impl CookieJar for FailingCookieJar {
    fn get(&self, _name: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    fn set(&mut self, cookie: &Cookie) -> Result<(), StorageError> {
        Err(StorageError::WriteFailed {
            key: cookie.name.clone(),
            reason: "cookies disabled".to_string(),
        })
    }
}
