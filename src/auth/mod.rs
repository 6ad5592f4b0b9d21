//! # Auth Module
//!
//! Authentication passthrough to the hosted identity provider:
//! - sign-in / sign-up with email and password
//! - sign-out of the session carried by the request
//! - session cookie handling

pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod validators;


pub use routes::auth_routes;
