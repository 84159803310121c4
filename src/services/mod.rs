//! Business logic services layer

pub mod token_service;
pub mod user_service;

pub use token_service::{MintedToken, RefreshError, TokenService};
pub use user_service::{IssuedTokens, UserService};
