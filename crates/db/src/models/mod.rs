//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` (+ `Validate` where input bounds matter) create DTO

pub mod admin;
pub mod child;
pub mod circle;
pub mod message;
pub mod playdate;
pub mod profile;
pub mod venue;
