//! Authentication module

pub mod api_key;
pub mod basic;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use api_key::{check_api_key, ApiKeyOutcome};
pub use basic::check_basic_credentials;
pub use jwt::{AccessClaims, JwtService, TokenError};
pub use middleware::{
    api_key_auth_middleware, basic_auth_middleware, extract_bearer, jwt_auth_middleware,
    AuthContext,
};
pub use password::PasswordHasher;
