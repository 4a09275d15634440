//! Row models and input DTOs, one module per table.

pub mod auth_token;
pub mod product;
pub mod user;
