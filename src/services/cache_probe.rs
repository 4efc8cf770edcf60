use log::{debug, error};

use crate::config::{CacheConfig, DEFAULT_CACHE_RADIUS_MILES, DEFAULT_CACHE_SHARE};
use crate::error::PlannerError;
use crate::models::destination::Destination;
use crate::models::trip::{CacheResult, CandidateStage, TripRequest};
use crate::services::destination_store::DestinationStore;
use crate::services::geocoding_service::Geocoder;

pub const METERS_PER_MILE: f64 = 1609.34;

/// How much of a trip may be served from cache, and from how far away.
///
/// Coverage stays below the whole grid so every itinerary still gets some
/// freshly generated stages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapacityPolicy {
    pub cache_share: f64,
    pub search_radius_miles: f64,
}

impl Default for CapacityPolicy {
    fn default() -> Self {
        Self {
            cache_share: DEFAULT_CACHE_SHARE,
            search_radius_miles: DEFAULT_CACHE_RADIUS_MILES,
        }
    }
}

impl From<&CacheConfig> for CapacityPolicy {
    fn from(config: &CacheConfig) -> Self {
        Self {
            cache_share: config.cache_share,
            search_radius_miles: config.radius_miles,
        }
    }
}

impl CapacityPolicy {
    /// `floor(numberOfDays * stagesPerDay * cache_share)`
    pub fn max_stages_to_fetch(&self, request: &TripRequest) -> u32 {
        let slots = f64::from(request.number_of_days) * f64::from(request.stages_per_day);
        (slots * self.cache_share).floor() as u32
    }

    pub fn radius_meters(&self) -> f64 {
        self.search_radius_miles * METERS_PER_MILE
    }
}

/// Look up cached stages near the trip location.
///
/// Geocoding failures are fatal. Returns `Ok(None)` without touching the
/// store when the policy allows no cached stages for this request.
pub async fn probe<S, C>(
    store: &S,
    geocoder: &C,
    policy: &CapacityPolicy,
    request: &TripRequest,
) -> Result<Option<CacheResult>, PlannerError>
where
    S: DestinationStore,
    C: Geocoder,
{
    let origin = geocoder
        .resolve(&request.trip_location)
        .await
        .map_err(|e| {
            error!("Could not geocode '{}': {}", request.trip_location, e);
            PlannerError::Geocode(e)
        })?;

    let max_stages = policy.max_stages_to_fetch(request);
    if max_stages == 0 {
        debug!("No cache capacity for '{}'", request.trip_location);
        return Ok(None);
    }

    let mut destinations = store
        .find_nearest(origin, policy.radius_meters(), max_stages)
        .await
        .map_err(|e| {
            error!("Nearest destination query failed: {}", e);
            PlannerError::Store(e)
        })?;
    destinations.truncate(max_stages as usize);

    debug!(
        "Using {} of at most {} cached stages for '{}'",
        destinations.len(),
        max_stages,
        request.trip_location
    );
    Ok(Some(CacheResult {
        stages: stages_from_destinations(&destinations),
    }))
}

pub fn stages_from_destinations(destinations: &[Destination]) -> Vec<CandidateStage> {
    destinations
        .iter()
        .zip(1..)
        .map(|(destination, index)| CandidateStage {
            index,
            location: destination.label().to_string(),
            description: destination.description.clone(),
            emoji: destination.emoji.clone(),
        })
        .collect()
}

/// The request handed to the generator once `cached_count` stages are
/// covered by cache: `stagesPerDay` drops by `floor(cached_count / days)`,
/// never below zero.
pub fn adjust_for_cache(request: &TripRequest, cached_count: usize) -> TripRequest {
    let days = request.number_of_days.max(1) as usize;
    let cached_per_day = u32::try_from(cached_count / days).unwrap_or(u32::MAX);

    TripRequest {
        stages_per_day: request.stages_per_day.saturating_sub(cached_per_day),
        ..request.clone()
    }
}
