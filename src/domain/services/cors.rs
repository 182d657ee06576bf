//! CORS Policy
//!
//! Pure rule table deciding which CORS headers a response carries and
//! whether a preflight request is answered immediately.

use crate::domain::value_objects::{AllowedOrigins, WILDCARD_ORIGIN};

pub const ALLOW_ORIGIN: &str = "access-control-allow-origin";
pub const ALLOW_METHODS: &str = "access-control-allow-methods";
pub const ALLOW_HEADERS: &str = "access-control-allow-headers";
pub const ALLOW_CREDENTIALS: &str = "access-control-allow-credentials";
pub const MAX_AGE: &str = "access-control-max-age";
pub const VARY: &str = "vary";

const ALLOWED_METHODS: &str = "GET, POST, OPTIONS, PUT, DELETE";
const ALLOWED_HEADERS: &str = "Content-Type, Authorization, X-Requested-With";
/// Preflight cache lifetime in seconds (one day).
const PREFLIGHT_MAX_AGE: &str = "86400";

/// Headers to attach and whether to answer the request right away.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorsDecision {
    pub headers: Vec<(&'static str, String)>,
    /// Set only for allowed preflight requests; the caller must reply
    /// 204 with an empty body and skip downstream handlers.
    pub terminate: bool,
}

impl CorsDecision {
    fn push(&mut self, name: &'static str, value: impl Into<String>) {
        self.headers.push((name, value.into()));
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }
}

/// How an origin was let through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Grant {
    Wildcard,
    Exact,
}

/// CORS authorization against a fixed allow-list.
#[derive(Debug, Clone, Default)]
pub struct CorsPolicy {
    origins: AllowedOrigins,
}

impl CorsPolicy {
    pub fn new(origins: AllowedOrigins) -> Self {
        Self { origins }
    }

    /// Decide the CORS outcome for a request.
    ///
    /// Disallowed origins get no headers but are never rejected; the
    /// browser enforces the block client-side.
    pub fn decide(&self, origin: Option<&str>, is_preflight: bool) -> CorsDecision {
        let mut decision = CorsDecision::default();

        let origin = match origin {
            Some(o) if !o.is_empty() && !self.origins.is_empty() => o,
            _ => return decision,
        };

        let grant = if self.origins.has_wildcard() {
            decision.push(ALLOW_ORIGIN, WILDCARD_ORIGIN);
            Grant::Wildcard
        } else if self.origins.contains(origin) {
            decision.push(ALLOW_ORIGIN, origin);
            decision.push(VARY, "Origin");
            Grant::Exact
        } else {
            tracing::debug!("origin {} not in CORS allow-list", origin);
            return decision;
        };

        decision.push(ALLOW_METHODS, ALLOWED_METHODS);
        decision.push(ALLOW_HEADERS, ALLOWED_HEADERS);
        // Browsers refuse credentials alongside a wildcard origin.
        if grant == Grant::Exact {
            decision.push(ALLOW_CREDENTIALS, "true");
        }

        if is_preflight {
            decision.push(MAX_AGE, PREFLIGHT_MAX_AGE);
            decision.terminate = true;
        }

        decision
    }
}
