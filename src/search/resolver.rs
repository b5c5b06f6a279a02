use lru::LruCache;
use std::num::NonZeroUsize;

use crate::core::geo::LatLng;
use crate::search::coordinates::parse_coordinates;
use crate::search::geocoder::Geocoder;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResolutionError {
    #[error("Query is empty")]
    EmptyQuery,

    /// Transport or HTTP failure; the detail is for logs only
    #[error("Geocoding failed")]
    GeocodingFailed(String),

    #[error("Location not found")]
    NotFound,

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),
}

/// A resolved search location
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPoint {
    pub lat: f64,
    pub lon: f64,
    /// Raw coordinate text or the geocoder's display name
    pub label: String,
}

impl ResolvedPoint {
    pub fn to_lat_lng(&self) -> LatLng {
        LatLng::new(self.lat, self.lon)
    }
}

/// Resolves queries to points, remembering recent geocoder answers
pub struct LocationResolver<G> {
    geocoder: G,
    cache: Option<LruCache<String, ResolvedPoint>>,
}

impl<G: Geocoder> LocationResolver<G> {
    /// `cache_capacity` of 0 disables caching
    pub fn new(geocoder: G, cache_capacity: usize) -> Self {
        Self {
            geocoder,
            cache: NonZeroUsize::new(cache_capacity).map(LruCache::new),
        }
    }

    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }

    pub async fn resolve(&mut self, query: &str) -> Result<ResolvedPoint, ResolutionError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ResolutionError::EmptyQuery);
        }

        if let Some(point) = parse_coordinates(query) {
            log::debug!("'{}' parsed as coordinates", query);
            return Ok(point);
        }

        if let Some(point) = self.cache.as_mut().and_then(|cache| cache.get(query)) {
            log::debug!("geocode cache hit for '{}'", query);
            return Ok(point.clone());
        }

        let point = match self.geocoder.geocode(query).await {
            Ok(Some(point)) => point,
            Ok(None) => return Err(ResolutionError::NotFound),
            Err(e) => {
                log::warn!("geocoding '{}' failed: {:?}", query, e);
                return Err(e);
            }
        };

        if let Some(cache) = self.cache.as_mut() {
            cache.put(query.to_string(), point.clone());
        }
        Ok(point)
    }
}
