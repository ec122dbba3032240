// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resolution of the active persona from client-side storage.
//!
//! The active persona id lives under one storage key and is mirrored into a cookie so that a
//! route guard can read it without access to client storage. Both are written together by
//! [`PersonaResolver::set_active_persona`] and removed together by
//! [`PersonaResolver::clear_active_persona`].
//!
//! The cookie is client-writable and must never be treated as proof of identity.
use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::persona::{DEFAULT_PERSONA, Persona, PersonaId, UnknownPersonaError, persona};

/// Storage key and cookie name holding the active persona id.
pub const DEFAULT_PERSONA_KEY: &str = "eids-demo-persona";

/// Session storage key set once the legal disclaimer was dismissed.
pub const DISCLAIMER_ACCEPTED_KEY: &str = "eids-disclaimer-accepted";

/// Lifetime of the persona cookie in seconds (24 hours).
pub const DEFAULT_COOKIE_MAX_AGE: u64 = 86_400;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("storage is unavailable: {0}")]
    Unavailable(String),

    #[error("failed writing '{key}' to storage: {reason}")]
    WriteFailed { key: String, reason: String },
}

/// String key-value storage, for example the browser's `localStorage` or `sessionStorage`.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Cookies visible to the current document.
///
/// Removing a cookie is done by setting an expired one, see [`Cookie::expired`].
pub trait CookieJar {
    fn get(&self, name: &str) -> Result<Option<String>, StorageError>;

    fn set(&mut self, cookie: &Cookie) -> Result<(), StorageError>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl Display for SameSite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        };

        write!(f, "{}", s)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CookieError {
    #[error("cookie string is missing a name")]
    MissingName,

    #[error("invalid character in cookie {0}")]
    InvalidCharacter(&'static str),

    #[error("invalid cookie attribute '{0}'")]
    InvalidAttribute(String),
}

/// A cookie as written by `document.cookie` or a `Set-Cookie` header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub path: String,

    /// Lifetime in seconds. `None` is a session cookie, `Some(0)` deletes the cookie.
    pub max_age: Option<u64>,

    pub same_site: SameSite,
}

fn is_cookie_value_safe(s: &str) -> bool {
    s.chars()
        .all(|c| c.is_ascii_graphic() && !matches!(c, ';' | ',' | '"' | '\\'))
}

fn is_cookie_name_safe(s: &str) -> bool {
    is_cookie_value_safe(s) && !s.contains('=')
}

impl Cookie {
    /// Creates a session cookie with `Path=/` and `SameSite=Lax`.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Result<Self, CookieError> {
        let name = name.into();
        let value = value.into();

        if name.is_empty() {
            return Err(CookieError::MissingName);
        }
        if !is_cookie_name_safe(&name) {
            return Err(CookieError::InvalidCharacter("name"));
        }
        if !is_cookie_value_safe(&value) {
            return Err(CookieError::InvalidCharacter("value"));
        }

        Ok(Self {
            name,
            value,
            path: "/".to_string(),
            max_age: None,
            same_site: SameSite::default(),
        })
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_max_age(mut self, max_age: u64) -> Self {
        self.max_age = Some(max_age);
        self
    }

    pub fn with_same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = same_site;
        self
    }

    /// Empty cookie which makes the client drop any cookie with the same name and path.
    pub fn expired(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: String::new(),
            path: path.into(),
            max_age: Some(0),
            same_site: SameSite::default(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.max_age == Some(0)
    }
}

impl Display for Cookie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}; Path={}", self.name, self.value, self.path)?;
        if let Some(max_age) = self.max_age {
            write!(f, "; Max-Age={}", max_age)?;
        }
        write!(f, "; SameSite={}", self.same_site)
    }
}

impl FromStr for Cookie {
    type Err = CookieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(';').map(str::trim);
        let (name, value) = parts
            .next()
            .and_then(|pair| pair.split_once('='))
            .ok_or(CookieError::MissingName)?;

        let mut cookie = Cookie::new(name, value)?;

        for attribute in parts.filter(|part| !part.is_empty()) {
            let (key, value) = attribute.split_once('=').unwrap_or((attribute, ""));
            match key.to_ascii_lowercase().as_str() {
                "path" => cookie.path = value.to_string(),
                "max-age" => {
                    let max_age = value
                        .parse()
                        .map_err(|_| CookieError::InvalidAttribute(attribute.to_string()))?;
                    cookie.max_age = Some(max_age);
                }
                "samesite" => {
                    cookie.same_site = match value.to_ascii_lowercase().as_str() {
                        "strict" => SameSite::Strict,
                        "lax" => SameSite::Lax,
                        "none" => SameSite::None,
                        _ => return Err(CookieError::InvalidAttribute(attribute.to_string())),
                    }
                }
                _ => return Err(CookieError::InvalidAttribute(attribute.to_string())),
            }
        }

        Ok(cookie)
    }
}

/// Extracts a cookie value from a `Cookie` request header (`a=1; b=2`).
pub fn parse_cookie_header<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

/// What a stored id which is not in the persona registry resolves to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnknownPersonaPolicy {
    /// Treat the session as having no persona.
    #[default]
    LoggedOut,

    /// Treat the session as [`DEFAULT_PERSONA`].
    DefaultPersona,
}

/// Configuration parameters of a [`PersonaResolver`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResolverConfig {
    /// Storage key holding the active persona id.
    pub storage_key: String,

    /// Name of the cookie mirroring the storage key.
    pub cookie_name: String,

    pub cookie_path: String,

    /// Cookie lifetime in seconds.
    pub cookie_max_age: u64,

    pub same_site: SameSite,

    pub unknown_persona: UnknownPersonaPolicy,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_PERSONA_KEY.to_string(),
            cookie_name: DEFAULT_PERSONA_KEY.to_string(),
            cookie_path: "/".to_string(),
            cookie_max_age: DEFAULT_COOKIE_MAX_AGE,
            same_site: SameSite::Lax,
            unknown_persona: UnknownPersonaPolicy::default(),
        }
    }
}

impl ResolverConfig {
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }

    pub fn with_cookie_max_age(mut self, max_age: u64) -> Self {
        self.cookie_max_age = max_age;
        self
    }

    pub fn with_unknown_persona(mut self, policy: UnknownPersonaPolicy) -> Self {
        self.unknown_persona = policy;
        self
    }

    /// Interprets a raw stored id according to the unknown-persona policy.
    pub fn resolve(&self, raw: &str) -> Option<PersonaId> {
        match raw.parse::<PersonaId>() {
            Ok(id) => Some(id),
            Err(err) => match self.unknown_persona {
                UnknownPersonaPolicy::LoggedOut => {
                    warn!("{err}, treating session as logged out");
                    None
                }
                UnknownPersonaPolicy::DefaultPersona => {
                    warn!("{err}, treating session as {DEFAULT_PERSONA}");
                    Some(DEFAULT_PERSONA)
                }
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum ResolverError {
    #[error(transparent)]
    UnknownPersona(#[from] UnknownPersonaError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Cookie(#[from] CookieError),
}

/// Reads and writes the active persona pointer.
#[derive(Debug)]
pub struct PersonaResolver<S, C> {
    storage: S,
    cookies: C,
    config: ResolverConfig,
}

impl<S, C> PersonaResolver<S, C>
where
    S: KeyValueStore,
    C: CookieJar,
{
    pub fn new(storage: S, cookies: C) -> Self {
        Self::with_config(storage, cookies, ResolverConfig::default())
    }

    pub fn with_config(storage: S, cookies: C, config: ResolverConfig) -> Self {
        Self {
            storage,
            cookies,
            config,
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Returns the active persona, or `None` if none is selected or storage can not be read.
    pub fn active_persona_id(&self) -> Option<PersonaId> {
        match self.storage.get(&self.config.storage_key) {
            Ok(Some(raw)) => self.config.resolve(&raw),
            Ok(None) => None,
            Err(err) => {
                warn!("reading active persona failed: {err}");
                None
            }
        }
    }

    pub fn active_persona(&self) -> Option<&'static Persona> {
        self.active_persona_id().map(persona)
    }

    /// Returns the active persona or [`DEFAULT_PERSONA`] when there is none.
    pub fn persona_or_default(&self) -> &'static Persona {
        persona(self.active_persona_id().unwrap_or(DEFAULT_PERSONA))
    }

    /// Persona id as seen through the mirrored cookie.
    pub fn cookie_persona_id(&self) -> Option<PersonaId> {
        match self.cookies.get(&self.config.cookie_name) {
            Ok(Some(raw)) => self.config.resolve(&raw),
            Ok(None) => None,
            Err(err) => {
                warn!("reading persona cookie failed: {err}");
                None
            }
        }
    }

    fn cookie_for(&self, id: PersonaId) -> Result<Cookie, CookieError> {
        Ok(Cookie::new(&self.config.cookie_name, id.as_str())?
            .with_path(&self.config.cookie_path)
            .with_max_age(self.config.cookie_max_age)
            .with_same_site(self.config.same_site))
    }

    /// Activates a persona. Unknown ids are rejected and nothing is written.
    pub fn set_active_persona(&mut self, id: &str) -> Result<PersonaId, ResolverError> {
        let id: PersonaId = id.parse()?;
        let cookie = self.cookie_for(id)?;

        self.storage.set(&self.config.storage_key, id.as_str())?;

        if let Err(err) = self.cookies.set(&cookie) {
            // Keep storage and cookie in agreement.
            if let Err(rollback) = self.storage.remove(&self.config.storage_key) {
                warn!("rolling back persona storage failed: {rollback}");
            }
            return Err(err.into());
        }

        debug!("activated persona {id}");
        Ok(id)
    }

    /// Removes the persona from storage and cookies. Both removals are attempted even if the
    /// first one fails.
    pub fn clear_active_persona(&mut self) -> Result<(), ResolverError> {
        let storage = self.storage.remove(&self.config.storage_key);
        let cookie = self.cookies.set(&Cookie::expired(
            &self.config.cookie_name,
            &self.config.cookie_path,
        ));

        storage?;
        cookie?;

        debug!("cleared active persona");
        Ok(())
    }

    pub fn into_parts(self) -> (S, C) {
        (self.storage, self.cookies)
    }
}

/// Tracks whether the legal disclaimer was dismissed in this session.
#[derive(Debug)]
pub struct DisclaimerGate<S> {
    storage: S,
}

impl<S> DisclaimerGate<S>
where
    S: KeyValueStore,
{
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Unreadable storage counts as not accepted so the disclaimer is shown again.
    pub fn is_accepted(&self) -> bool {
        match self.storage.get(DISCLAIMER_ACCEPTED_KEY) {
            Ok(value) => value.is_some(),
            Err(err) => {
                warn!("reading disclaimer state failed: {err}");
                false
            }
        }
    }

    pub fn accept(&mut self) -> Result<(), StorageError> {
        self.storage.set(DISCLAIMER_ACCEPTED_KEY, "true")
    }

    pub fn reset(&mut self) -> Result<(), StorageError> {
        self.storage.remove(DISCLAIMER_ACCEPTED_KEY)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::persona::{DEFAULT_PERSONA, PersonaId};
    use crate::test_utils::{
        FailingCookieJar, MemoryCookieJar, MemoryStore, UnavailableStore, setup_logging,
    };

    use super::{
        Cookie, CookieError, CookieJar, DEFAULT_PERSONA_KEY, DisclaimerGate, KeyValueStore,
        PersonaResolver, ResolverConfig, ResolverError, SameSite, UnknownPersonaPolicy,
        parse_cookie_header,
    };

    fn resolver() -> PersonaResolver<MemoryStore, MemoryCookieJar> {
        setup_logging();
        PersonaResolver::new(MemoryStore::default(), MemoryCookieJar::default())
    }

    #[test]
    fn round_trips_every_persona() {
        let mut resolver = resolver();
        assert_eq!(resolver.active_persona_id(), None);

        for id in PersonaId::ALL {
            assert_eq!(resolver.set_active_persona(id.as_str()).unwrap(), id);
            assert_eq!(resolver.active_persona_id(), Some(id));
            assert_eq!(resolver.cookie_persona_id(), Some(id));
            assert_eq!(resolver.active_persona().map(|persona| persona.id), Some(id));
        }
    }

    #[test]
    fn writes_storage_key_and_cookie() {
        let mut resolver = resolver();
        resolver.set_active_persona("maria-thompson").unwrap();

        let (storage, cookies) = resolver.into_parts();
        assert_eq!(
            storage.get(DEFAULT_PERSONA_KEY).unwrap().as_deref(),
            Some("maria-thompson")
        );

        let cookie = cookies.cookie(DEFAULT_PERSONA_KEY).unwrap();
        assert_eq!(
            cookie.to_string(),
            "eids-demo-persona=maria-thompson; Path=/; Max-Age=86400; SameSite=Lax"
        );
    }

    #[test]
    fn rejects_unknown_persona_without_writing() {
        let mut resolver = resolver();
        resolver.set_active_persona("david-kim").unwrap();

        let result = resolver.set_active_persona("mallory");
        assert!(matches!(result, Err(ResolverError::UnknownPersona(_))));
        assert_eq!(resolver.active_persona_id(), Some(PersonaId::DavidKim));
        assert_eq!(resolver.cookie_persona_id(), Some(PersonaId::DavidKim));
    }

    #[test]
    fn clears_storage_and_cookie() {
        let mut resolver = resolver();
        resolver.set_active_persona("sarah-johnson").unwrap();
        resolver.clear_active_persona().unwrap();

        assert_eq!(resolver.active_persona_id(), None);
        assert_eq!(resolver.cookie_persona_id(), None);
        assert_eq!(resolver.persona_or_default().id, DEFAULT_PERSONA);
    }

    #[rstest]
    #[case(UnknownPersonaPolicy::LoggedOut, None)]
    #[case(UnknownPersonaPolicy::DefaultPersona, Some(DEFAULT_PERSONA))]
    fn tampered_storage_follows_policy(
        #[case] policy: UnknownPersonaPolicy,
        #[case] expected: Option<PersonaId>,
    ) {
        let mut storage = MemoryStore::default();
        storage.set(DEFAULT_PERSONA_KEY, "root").unwrap();

        let config = ResolverConfig::default().with_unknown_persona(policy);
        let resolver =
            PersonaResolver::with_config(storage, MemoryCookieJar::default(), config);
        assert_eq!(resolver.active_persona_id(), expected);
    }

    #[test]
    fn unavailable_storage_degrades_to_no_persona() {
        setup_logging();
        let mut resolver = PersonaResolver::new(UnavailableStore, MemoryCookieJar::default());

        assert_eq!(resolver.active_persona_id(), None);
        assert_eq!(resolver.persona_or_default().id, DEFAULT_PERSONA);
        assert!(matches!(
            resolver.set_active_persona("david-kim"),
            Err(ResolverError::Storage(_))
        ));
        assert!(resolver.clear_active_persona().is_err());
    }

    #[test]
    fn cookie_failure_rolls_back_storage() {
        setup_logging();
        let mut resolver = PersonaResolver::new(MemoryStore::default(), FailingCookieJar);

        assert!(matches!(
            resolver.set_active_persona("james-rodriguez"),
            Err(ResolverError::Storage(_))
        ));
        assert_eq!(resolver.active_persona_id(), None);
    }

    #[test]
    fn honours_custom_config() {
        let config = ResolverConfig::default()
            .with_storage_key("persona")
            .with_cookie_name("persona_cookie")
            .with_cookie_max_age(60);
        let mut resolver =
            PersonaResolver::with_config(MemoryStore::default(), MemoryCookieJar::default(), config);
        resolver.set_active_persona("dr-emily-carter").unwrap();

        let (storage, cookies) = resolver.into_parts();
        assert!(storage.get(DEFAULT_PERSONA_KEY).unwrap().is_none());
        assert_eq!(
            storage.get("persona").unwrap().as_deref(),
            Some("dr-emily-carter")
        );
        assert_eq!(cookies.cookie("persona_cookie").unwrap().max_age, Some(60));
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: ResolverConfig =
            serde_json::from_str(r#"{ "unknownPersona": "defaultPersona" }"#).unwrap();
        assert_eq!(config.storage_key, DEFAULT_PERSONA_KEY);
        assert_eq!(config.cookie_max_age, 86_400);
        assert_eq!(config.unknown_persona, UnknownPersonaPolicy::DefaultPersona);
    }

    #[test]
    fn parses_cookie_strings() {
        let cookie: Cookie = "eids-demo-persona=david-kim; Path=/; Max-Age=86400; SameSite=Lax"
            .parse()
            .unwrap();
        assert_eq!(cookie.name, "eids-demo-persona");
        assert_eq!(cookie.value, "david-kim");
        assert_eq!(cookie.max_age, Some(86_400));
        assert_eq!(cookie.same_site, SameSite::Lax);

        let expired: Cookie = "eids-demo-persona=; Path=/; Max-Age=0".parse().unwrap();
        assert!(expired.is_expired());

        assert_eq!("=value".parse::<Cookie>(), Err(CookieError::MissingName));
        assert!(matches!(
            "a=b; Domain=example.org".parse::<Cookie>(),
            Err(CookieError::InvalidAttribute(_))
        ));
        assert!(matches!(
            Cookie::new("a", "b;c"),
            Err(CookieError::InvalidCharacter("value"))
        ));
    }

    #[test]
    fn allows_padding_in_cookie_values() {
        let cookie: Cookie = "session=dGVzdA==; Path=/".parse().unwrap();
        assert_eq!(cookie.name, "session");
        assert_eq!(cookie.value, "dGVzdA==");
        assert_eq!(cookie.to_string(), "session=dGVzdA==; Path=/; SameSite=Lax");

        assert_eq!(
            parse_cookie_header("theme=dark; session=dGVzdA==", "session"),
            Some("dGVzdA==")
        );
        assert!(matches!(
            Cookie::new("a=b", "c"),
            Err(CookieError::InvalidCharacter("name"))
        ));
    }

    #[test]
    fn reads_cookie_header() {
        let header = "theme=dark; eids-demo-persona=maria-thompson; other=1";
        assert_eq!(
            parse_cookie_header(header, "eids-demo-persona"),
            Some("maria-thompson")
        );
        assert_eq!(parse_cookie_header(header, "eids-demo"), None);
        assert_eq!(parse_cookie_header("", "eids-demo-persona"), None);
    }

    #[test]
    fn disclaimer_gate() {
        let mut gate = DisclaimerGate::new(MemoryStore::default());
        assert!(!gate.is_accepted());
        gate.accept().unwrap();
        assert!(gate.is_accepted());
        gate.reset().unwrap();
        assert!(!gate.is_accepted());

        let gate = DisclaimerGate::new(UnavailableStore);
        assert!(!gate.is_accepted());
    }

    #[test]
    fn memory_jar_drops_expired_cookies() {
        let mut jar = MemoryCookieJar::default();
        jar.set(&Cookie::new("a", "1").unwrap().with_max_age(10))
            .unwrap();
        assert_eq!(jar.get("a").unwrap().as_deref(), Some("1"));
        jar.set(&Cookie::expired("a", "/")).unwrap();
        assert_eq!(jar.get("a").unwrap(), None);
    }
}
