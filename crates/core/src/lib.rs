//! Domain logic shared by the persistence and HTTP layers.
//!
//! Everything in this crate is pure: no I/O, no async, no global mutable state.

pub mod chosung;
pub mod credentials;
pub mod error;
pub mod product;
pub mod types;
