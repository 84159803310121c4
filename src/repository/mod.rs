//! Database repository layer

pub mod token_repo;
pub mod user_repo;

pub use token_repo::{PgRefreshTokenStore, RefreshTokenStore};
pub use user_repo::UserRepository;
