//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod admin_repo;
pub mod child_repo;
pub mod circle_repo;
pub mod message_repo;
pub mod playdate_repo;
pub mod profile_repo;
pub mod venue_repo;

pub use admin_repo::AdminRepo;
pub use child_repo::ChildRepo;
pub use circle_repo::CircleRepo;
pub use message_repo::MessageRepo;
pub use playdate_repo::PlaydateRepo;
pub use profile_repo::ProfileRepo;
pub use venue_repo::VenueRepo;
