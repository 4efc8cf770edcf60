use log::{error, info, warn};
use serde::Serialize;

use crate::error::{PlannerError, StoreError};
use crate::models::destination::MergeOutcome;
use crate::models::itinerary::Itinerary;
use crate::models::trip::{CacheResult, FinalizedStage, GeneratedResult, TripRequest};
use crate::services::cache_probe::{self, CapacityPolicy};
use crate::services::cache_writer;
use crate::services::destination_store::DestinationStore;
use crate::services::geocoding_service::Geocoder;
use crate::services::itinerary_combiner;
use crate::services::stage_generation_service::StageGenerator;
use crate::services::tag_extraction::{HeuristicNounExtractor, NounExtractor};

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct CacheReport {
    pub created: usize,
    pub merged: usize,
    pub failed: usize,
}

/// Builds itineraries from cached destinations plus freshly generated
/// stages, and feeds accepted stages back into the cache.
pub struct DestinationService<S, C, G, E = HeuristicNounExtractor> {
    store: S,
    geocoder: C,
    generator: G,
    extractor: E,
    policy: CapacityPolicy,
}

impl<S, C, G> DestinationService<S, C, G>
where
    S: DestinationStore,
    C: Geocoder,
    G: StageGenerator,
{
    pub fn new(store: S, geocoder: C, generator: G) -> Self {
        Self::with_extractor(store, geocoder, generator, HeuristicNounExtractor)
    }
}

impl<S, C, G, E> DestinationService<S, C, G, E>
where
    S: DestinationStore,
    C: Geocoder,
    G: StageGenerator,
    E: NounExtractor,
{
    pub fn with_extractor(store: S, geocoder: C, generator: G, extractor: E) -> Self {
        Self {
            store,
            geocoder,
            generator,
            extractor,
            policy: CapacityPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: CapacityPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn policy(&self) -> &CapacityPolicy {
        &self.policy
    }

    /// Probe the cache, generate the remainder while avoiding cached
    /// locations, and lay both onto the day grid with cached stages first.
    pub async fn generate_trip_with_cache(
        &self,
        request: &TripRequest,
    ) -> Result<Itinerary, PlannerError> {
        request.validate()?;

        let cached = cache_probe::probe(&self.store, &self.geocoder, &self.policy, request)
            .await?;

        let (left_to_fetch, avoid) = match &cached {
            Some(result) => (
                cache_probe::adjust_for_cache(request, result.stages.len()),
                result.avoid_list(),
            ),
            None => (request.clone(), Vec::new()),
        };

        let generated = if left_to_fetch.capacity() == 0 {
            GeneratedResult::default()
        } else {
            self.generator
                .generate(&left_to_fetch, &avoid)
                .await
                .map_err(|e| {
                    error!("Stage generation for '{}' failed: {}", request.trip_location, e);
                    PlannerError::Generation(e)
                })?
        };

        let cached_stages = cached.map(|result| result.stages).unwrap_or_default();
        info!(
            "Planned '{}' with {} cached and {} generated stages",
            request.trip_location,
            cached_stages.len(),
            generated.stages.len()
        );

        Ok(itinerary_combiner::combine(
            cached_stages,
            generated.stages,
            request.number_of_days,
            request.stages_per_day,
        ))
    }

    /// Cached stages for `request` without generating anything.
    pub async fn probe(&self, request: &TripRequest) -> Result<Option<CacheResult>, PlannerError> {
        request.validate()?;
        cache_probe::probe(&self.store, &self.geocoder, &self.policy, request).await
    }

    pub async fn cache_stage(
        &self,
        stage: &FinalizedStage,
        display_name: &str,
        notes: &str,
    ) -> Result<MergeOutcome, PlannerError> {
        cache_writer::cache_stage(&self.store, &self.extractor, stage, display_name, notes).await
    }

    /// Cache every stage of an accepted itinerary. A failing stage is logged
    /// and counted; it does not stop the rest of the batch.
    pub async fn cache_itinerary(
        &self,
        stages: &[FinalizedStage],
        display_name: &str,
        notes: &str,
    ) -> CacheReport {
        let mut report = CacheReport::default();
        for stage in stages {
            match self.cache_stage(stage, display_name, notes).await {
                Ok(MergeOutcome::Created) => report.created += 1,
                Ok(MergeOutcome::Merged) => report.merged += 1,
                Err(e) => {
                    warn!("Skipping stage '{}': {}", stage.stage_location, e);
                    report.failed += 1;
                }
            }
        }
        report
    }

    pub async fn store_status(&self) -> Result<(), StoreError> {
        self.store.ping().await
    }
}
