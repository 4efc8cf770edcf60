use mongodb::bson::{oid::ObjectId, DateTime};
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::models::destination::{Coordinates, Destination, MergeOutcome};
use crate::services::destination_store::DestinationStore;

const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// Great-circle distance between two coordinates using the Haversine formula.
pub fn haversine_meters(from: Coordinates, to: Coordinates) -> f64 {
    let lat1_rad = from.latitude.to_radians();
    let lat2_rad = to.latitude.to_radians();
    let delta_lat = (to.latitude - from.latitude).to_radians();
    let delta_lon = (to.longitude - from.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

fn push_unique(values: &mut Vec<String>, value: &str) {
    if !values.iter().any(|existing| existing == value) {
        values.push(value.to_string());
    }
}

/// Process-local destination store used when no MongoDB URI is configured.
/// Contents are lost on restart.
#[derive(Default)]
pub struct InMemoryDestinationStore {
    records: RwLock<Vec<Destination>>,
}

impl InMemoryDestinationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_destinations(destinations: Vec<Destination>) -> Self {
        let records = destinations
            .into_iter()
            .map(|mut destination| {
                destination.id.get_or_insert_with(ObjectId::new);
                destination
            })
            .collect();
        Self {
            records: RwLock::new(records),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    pub async fn snapshot(&self) -> Vec<Destination> {
        self.records.read().await.clone()
    }
}

impl DestinationStore for InMemoryDestinationStore {
    async fn find_nearest(
        &self,
        origin: Coordinates,
        radius_meters: f64,
        limit: u32,
    ) -> Result<Vec<Destination>, StoreError> {
        let records = self.records.read().await;
        let mut within: Vec<(f64, &Destination)> = records
            .iter()
            .map(|record| (haversine_meters(origin, record.coordinates()), record))
            .filter(|(distance, _)| *distance <= radius_meters)
            .collect();
        within.sort_by(|a, b| a.0.total_cmp(&b.0));

        Ok(within
            .into_iter()
            .take(limit as usize)
            .map(|(_, record)| record.clone())
            .collect())
    }

    async fn find_by_coordinate(
        &self,
        coordinates: Coordinates,
    ) -> Result<Option<Destination>, StoreError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .find(|record| record.coordinates() == coordinates)
            .cloned())
    }

    async fn add_alias_and_tags(
        &self,
        id: ObjectId,
        alias: &str,
        tags: &[String],
    ) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|record| record.id == Some(id))
            .ok_or(StoreError::NotFound(id))?;

        push_unique(&mut record.aliases, alias);
        for tag in tags {
            push_unique(&mut record.tags, tag);
        }
        record.updated_at = Some(DateTime::now());
        Ok(())
    }

    async fn create(&self, mut destination: Destination) -> Result<Destination, StoreError> {
        let now = DateTime::now();
        destination.id = Some(ObjectId::new());
        destination.created_at = Some(now);
        destination.updated_at = Some(now);

        self.records.write().await.push(destination.clone());
        Ok(destination)
    }

    async fn merge_or_create(&self, mut destination: Destination) -> Result<MergeOutcome, StoreError> {
        let now = DateTime::now();
        let mut records = self.records.write().await;

        let coordinates = destination.coordinates();
        if let Some(record) = records
            .iter_mut()
            .find(|record| record.coordinates() == coordinates)
        {
            for alias in &destination.aliases {
                push_unique(&mut record.aliases, alias);
            }
            for tag in &destination.tags {
                push_unique(&mut record.tags, tag);
            }
            record.updated_at = Some(now);
            return Ok(MergeOutcome::Merged);
        }

        destination.id = Some(ObjectId::new());
        destination.created_at = Some(now);
        destination.updated_at = Some(now);
        records.push(destination);
        Ok(MergeOutcome::Created)
    }
}
