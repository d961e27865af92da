pub mod admin;
pub mod children;
pub mod circles;
pub mod playdates;
pub mod venues;
