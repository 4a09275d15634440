//! Business logic shared by the HTTP handlers.
//!
//! Services own the store trait objects and translate storage failures into
//! [`payhere_core::error::CoreError`], so handlers only deal with domain errors.

pub mod product;
pub mod session;

pub use product::ProductService;
pub use session::SessionService;
