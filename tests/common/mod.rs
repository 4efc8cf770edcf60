#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use mongodb::bson::oid::ObjectId;

use trip_planner_api::error::{GenerationError, GeocodeError, StoreError};
use trip_planner_api::models::destination::{Coordinates, Destination, MergeOutcome};
use trip_planner_api::models::trip::{CandidateStage, FinalizedStage, GeneratedResult, TripRequest};
use trip_planner_api::services::destination_service::DestinationService;
use trip_planner_api::services::destination_store::DestinationStore;
use trip_planner_api::services::geocoding_service::Geocoder;
use trip_planner_api::services::memory_store::InMemoryDestinationStore;
use trip_planner_api::services::stage_generation_service::StageGenerator;

pub const LISBON: Coordinates = Coordinates {
    longitude: -9.1393,
    latitude: 38.7223,
};

/// Resolves a fixed set of place names.
pub struct FakeGeocoder {
    places: HashMap<String, Coordinates>,
    calls: AtomicUsize,
}

impl FakeGeocoder {
    pub fn new() -> Self {
        let mut places = HashMap::new();
        places.insert("Lisbon".to_string(), LISBON);
        Self {
            places,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Geocoder for FakeGeocoder {
    async fn resolve(&self, place: &str) -> Result<Coordinates, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.places
            .get(place)
            .copied()
            .ok_or_else(|| GeocodeError::NotFound(place.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct GenerationCall {
    pub request: TripRequest,
    pub avoid: Vec<String>,
}

/// Returns one stage per requested slot, named `gen1`, `gen2`, ...
pub struct FakeGenerator {
    calls: Mutex<Vec<GenerationCall>>,
    fail_with: Option<String>,
}

impl FakeGenerator {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_with: None,
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_with: Some(reason.to_string()),
        }
    }

    pub fn calls(&self) -> Vec<GenerationCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl StageGenerator for FakeGenerator {
    async fn generate(
        &self,
        request: &TripRequest,
        avoid: &[String],
    ) -> Result<GeneratedResult, GenerationError> {
        self.calls.lock().unwrap().push(GenerationCall {
            request: request.clone(),
            avoid: avoid.to_vec(),
        });

        if let Some(reason) = &self.fail_with {
            return Err(GenerationError::Rejected(reason.clone()));
        }

        let stages = (1..=request.capacity())
            .map(|i| CandidateStage {
                index: i,
                location: format!("gen{}", i),
                description: format!("generated stage {}", i),
                emoji: "✨".to_string(),
            })
            .collect();
        Ok(GeneratedResult { stages })
    }
}

/// Wraps the in-memory store, counting queries and optionally failing them.
pub struct CountingStore {
    pub inner: InMemoryDestinationStore,
    nearest_queries: AtomicUsize,
    fail: bool,
}

impl CountingStore {
    pub fn new(inner: InMemoryDestinationStore) -> Self {
        Self {
            inner,
            nearest_queries: AtomicUsize::new(0),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            inner: InMemoryDestinationStore::new(),
            nearest_queries: AtomicUsize::new(0),
            fail: true,
        }
    }

    pub fn nearest_queries(&self) -> usize {
        self.nearest_queries.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.fail {
            Err(StoreError::NotFound(ObjectId::new()))
        } else {
            Ok(())
        }
    }
}

impl DestinationStore for CountingStore {
    async fn find_nearest(
        &self,
        origin: Coordinates,
        radius_meters: f64,
        limit: u32,
    ) -> Result<Vec<Destination>, StoreError> {
        self.nearest_queries.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.find_nearest(origin, radius_meters, limit).await
    }

    async fn find_by_coordinate(
        &self,
        coordinates: Coordinates,
    ) -> Result<Option<Destination>, StoreError> {
        self.check()?;
        self.inner.find_by_coordinate(coordinates).await
    }

    async fn add_alias_and_tags(
        &self,
        id: ObjectId,
        alias: &str,
        tags: &[String],
    ) -> Result<(), StoreError> {
        self.check()?;
        self.inner.add_alias_and_tags(id, alias, tags).await
    }

    async fn create(&self, destination: Destination) -> Result<Destination, StoreError> {
        self.check()?;
        self.inner.create(destination).await
    }

    async fn merge_or_create(&self, destination: Destination) -> Result<MergeOutcome, StoreError> {
        self.check()?;
        self.inner.merge_or_create(destination).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check()
    }
}

pub type TestService = DestinationService<CountingStore, FakeGeocoder, FakeGenerator>;

pub fn service(store: CountingStore, generator: FakeGenerator) -> TestService {
    DestinationService::new(store, FakeGeocoder::new(), generator)
}

/// A destination `offset` thousandths of a degree north of Lisbon.
pub fn nearby_destination(label: &str, offset: u32) -> Destination {
    Destination {
        id: None,
        location: Coordinates::new(LISBON.longitude, LISBON.latitude + f64::from(offset) * 0.001)
            .into(),
        name: "Lisbon".to_string(),
        aliases: vec![label.to_string()],
        description: format!("{} description", label),
        emoji: "📍".to_string(),
        tags: vec![],
        rating: Some(4.5),
        created_at: None,
        updated_at: None,
    }
}

pub fn store_with(labels: &[&str]) -> CountingStore {
    let destinations = labels
        .iter()
        .zip(1..)
        .map(|(label, offset)| nearby_destination(label, offset))
        .collect();
    CountingStore::new(InMemoryDestinationStore::with_destinations(destinations))
}

pub fn trip(days: u32, per_day: u32) -> TripRequest {
    TripRequest {
        trip_location: "Lisbon".to_string(),
        number_of_days: days,
        stages_per_day: per_day,
        trip_notes: "pastries and viewpoints".to_string(),
    }
}

pub fn finalized(label: &str, offset: u32) -> FinalizedStage {
    let location = nearby_destination(label, offset).coordinates();
    FinalizedStage {
        stage_location: label.to_string(),
        stage_latitude: location.latitude,
        stage_longitude: location.longitude,
        description: format!("{} description", label),
        emoji: "📍".to_string(),
        stage_rating: Some(4.0),
    }
}
