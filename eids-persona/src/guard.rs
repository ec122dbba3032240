// SPDX-License-Identifier: MIT OR Apache-2.0

//! Route gating for the dashboard shell.
//!
//! The guard only looks at the request path, the `Cookie` header and whether the external auth
//! provider reported a signed-in user. The persona cookie is client-writable, so passing the guard
//! says nothing about who the visitor is. It only decides which page the demo should render.
use tracing::debug;

use crate::config::{NavSection, persona_config};
use crate::resolver::{ResolverConfig, parse_cookie_header};

/// Route anonymous visitors are sent to.
pub const LOGIN_ROUTE: &str = "/login";

const PUBLIC_ROUTES: [&str; 3] = ["/", LOGIN_ROUTE, "/select-persona"];

const PUBLIC_PREFIXES: [&str; 4] = ["/auth/", "/_next/", "/static/", "/api/auth/"];

/// Extensions of files served from the site root, such as `/favicon.ico` or `/robots.txt`.
const ROOT_ASSET_EXTENSIONS: [&str; 9] = [
    "ico",
    "png",
    "svg",
    "jpg",
    "jpeg",
    "webp",
    "txt",
    "xml",
    "webmanifest",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RouteRequest<'a> {
    /// Request path, optionally with query string or fragment.
    pub path: &'a str,

    /// Raw `Cookie` request header.
    pub cookie_header: Option<&'a str>,

    /// Whether the auth provider has a signed-in user for this request.
    pub has_auth_user: bool,
}

impl<'a> RouteRequest<'a> {
    pub fn new(path: &'a str) -> Self {
        Self {
            path,
            cookie_header: None,
            has_auth_user: false,
        }
    }

    pub fn with_cookie_header(mut self, header: &'a str) -> Self {
        self.cookie_header = Some(header);
        self
    }

    pub fn with_auth_user(mut self, has_auth_user: bool) -> Self {
        self.has_auth_user = has_auth_user;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(String),
}

/// Decides whether a request may render or must be redirected.
#[derive(Clone, Debug, Default)]
pub struct RouteGuard {
    config: ResolverConfig,
}

impl RouteGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the persona cookie name and unknown-id policy from `config`.
    pub fn with_config(config: ResolverConfig) -> Self {
        Self { config }
    }

    fn is_public(path: &str) -> bool {
        if NavSection::from_path(path).is_some() {
            return false;
        }
        if PUBLIC_ROUTES.contains(&path) {
            return true;
        }
        if PUBLIC_PREFIXES.iter().any(|prefix| path.starts_with(prefix)) {
            return true;
        }

        // Only single-segment files at the root.
        path.strip_prefix('/')
            .filter(|file| !file.contains('/'))
            .and_then(|file| file.rsplit_once('.'))
            .is_some_and(|(stem, extension)| {
                !stem.is_empty()
                    && ROOT_ASSET_EXTENSIONS
                        .iter()
                        .any(|allowed| extension.eq_ignore_ascii_case(allowed))
            })
    }

    pub fn check(&self, request: &RouteRequest<'_>) -> GuardDecision {
        let path = request
            .path
            .split(['?', '#'])
            .next()
            .unwrap_or_default();

        if Self::is_public(path) {
            return GuardDecision::Allow;
        }

        let persona_id = request
            .cookie_header
            .and_then(|header| parse_cookie_header(header, &self.config.cookie_name))
            .and_then(|raw| self.config.resolve(raw));

        let Some(persona_id) = persona_id else {
            if request.has_auth_user {
                return GuardDecision::Allow;
            }
            debug!("no persona or auth user for {path}, redirecting to login");
            return GuardDecision::Redirect(LOGIN_ROUTE.to_string());
        };

        let config = persona_config(persona_id);
        let home = config.home_route();
        match NavSection::from_path(path) {
            Some(section) if !config.nav.is_visible(section) && path != home => {
                debug!("{section:?} is hidden for {persona_id}, redirecting to {home}");
                GuardDecision::Redirect(home.to_string())
            }
            _ => GuardDecision::Allow,
        }
    }
}
