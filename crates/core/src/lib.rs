//! Domain logic shared by every playcircle crate.
//!
//! This crate has no internal dependencies so the database layer, the API
//! server, and any future CLI tooling can all use it.

pub mod error;
pub mod geo;
pub mod types;
pub mod venue;
