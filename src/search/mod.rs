//! Turning a user query into a point on the map
//!
//! Queries that look like `lat, lon` are parsed directly; anything else is
//! sent to a [`Geocoder`].

pub mod coordinates;
pub mod geocoder;
pub mod resolver;

pub use coordinates::parse_coordinates;
pub use geocoder::{Geocoder, NominatimGeocoder};
pub use resolver::{LocationResolver, ResolutionError, ResolvedPoint};
