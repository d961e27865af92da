//! Client for the external place-lookup service (Google Places API).
//!
//! The API layer talks to [`PlaceLookup`], a trait seam, so handlers and the
//! venue search aggregator can be tested against a mock without network
//! access. [`GooglePlacesClient`] is the production implementation.

pub mod client;
pub mod types;

pub use client::{GooglePlacesClient, PlaceLookup, PlacesError};
pub use types::{PlaceDetails, PlaceResult};
