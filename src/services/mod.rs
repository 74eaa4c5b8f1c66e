//! Backend resource wrappers
//!
//! One module per REST resource. Each function is a thin, typed call through
//! [`ApiClient`](crate::client::ApiClient); the only logic here is what the
//! backend contract needs on the client side (required-field checks, stock
//! checks, status-specific error messages).

pub mod assessments;
pub mod auth;
pub mod common;
pub mod infirmary;
pub mod inventory;
pub mod media;
pub mod members;
pub mod nurses;
pub mod schools;

pub use auth::LoginOutcome;
