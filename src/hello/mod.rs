//! # Hello Module
//!
//! Generic echo endpoint: a fixed greeting on GET, the request body echoed
//! back on POST.

pub mod handlers;
pub mod models;
pub mod routes;


pub use routes::hello_routes;
