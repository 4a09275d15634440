pub mod auth;
pub mod timeout;
