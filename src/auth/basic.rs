//! Basic-auth credential verification against configured secrets

use subtle::ConstantTimeEq;

/// Compare submitted basic-auth credentials against the configured
/// pair. Both comparisons run in constant time and both must match.
///
/// An empty configured username or password never matches anything,
/// including an empty submission: missing configuration must not turn
/// into an open gate.
pub fn check_basic_credentials(
    username: &str,
    password: &str,
    configured_username: &str,
    configured_password: &str,
) -> bool {
    if configured_username.is_empty() || configured_password.is_empty() {
        return false;
    }

    // Combine the two Choice values before collapsing to bool so the
    // username comparison result cannot short-circuit the password one.
    let username_match = username.as_bytes().ct_eq(configured_username.as_bytes());
    let password_match = password.as_bytes().ct_eq(configured_password.as_bytes());

    (username_match & password_match).into()
}
