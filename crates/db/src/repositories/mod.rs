//! Repository layer.
//!
//! Each store is an `async_trait` so services can be composed over either the
//! Postgres repositories here or the in-memory implementations used in tests.
//! The Postgres repositories own a cheap clone of the pool.

pub mod auth_token_repo;
pub mod product_repo;
pub mod user_repo;

pub use auth_token_repo::{AuthTokenRepo, AuthTokenStore};
pub use product_repo::{ProductRepo, ProductStore};
pub use user_repo::{UserRepo, UserStore};
