//! rusty-blog/crates/domains/src/lib.rs
//!
//! Entities, errors, and port definitions for Rusty-Blog.
//! Nothing in this crate performs I/O.

pub mod errors;
pub mod models;
pub mod ports;

// Re-exporting for easier access in other crates
pub use errors::*;
pub use models::*;
pub use ports::*;
