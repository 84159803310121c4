//! Shared API-key verification

use subtle::ConstantTimeEq;

/// Outcome of an API-key check.
///
/// `Misconfigured` is a distinct signal so operators can tell "client
/// sent no key" apart from "server never configured a key"; the HTTP
/// layer maps it to 500 instead of 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeyOutcome {
    Authorized,
    Unauthorized,
    Misconfigured,
}

/// Three-way API-key check.
///
/// The key is a capability token carried over TLS, but the comparison
/// still runs in constant time.
pub fn check_api_key(submitted: &str, configured: &str) -> ApiKeyOutcome {
    if submitted.is_empty() {
        return ApiKeyOutcome::Unauthorized;
    }

    if configured.is_empty() {
        return ApiKeyOutcome::Misconfigured;
    }

    if submitted.as_bytes().ct_eq(configured.as_bytes()).into() {
        ApiKeyOutcome::Authorized
    } else {
        ApiKeyOutcome::Unauthorized
    }
}
