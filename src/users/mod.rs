//! # Users Module
//!
//! The user collection endpoint and the store it reads from and writes to.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod store;
pub mod validators;


pub use routes::users_routes;
pub use store::{MockUserStore, SqlUserStore, UserStore};
