use futures::TryStreamExt;
use log::debug;
use mongodb::{
    bson::{doc, oid::ObjectId, DateTime, Document},
    Client, Collection, Database, IndexModel,
};
use std::sync::Arc;

use crate::error::StoreError;
use crate::models::destination::{Coordinates, Destination, MergeOutcome};

const DESTINATION_COLLECTION: &str = "Destinations";

/// Persistence boundary for cached destinations.
///
/// Implementations must return `find_nearest` results ordered by distance
/// from `origin`, nearest first.
pub trait DestinationStore {
    async fn find_nearest(
        &self,
        origin: Coordinates,
        radius_meters: f64,
        limit: u32,
    ) -> Result<Vec<Destination>, StoreError>;

    /// Exact `[longitude, latitude]` match.
    async fn find_by_coordinate(
        &self,
        coordinates: Coordinates,
    ) -> Result<Option<Destination>, StoreError>;

    /// Set-union `alias` into the aliases and `tags` into the tags of an
    /// existing record. Other fields are left untouched.
    async fn add_alias_and_tags(
        &self,
        id: ObjectId,
        alias: &str,
        tags: &[String],
    ) -> Result<(), StoreError>;

    async fn create(&self, destination: Destination) -> Result<Destination, StoreError>;

    /// Merge `destination` into the record at the same coordinate, or insert
    /// it when there is none.
    ///
    /// The default is a read followed by a conditional write, which is not
    /// atomic: two concurrent first writes for one coordinate can produce two
    /// records. Stores with an upsert-by-key primitive should override it.
    async fn merge_or_create(&self, destination: Destination) -> Result<MergeOutcome, StoreError> {
        match self.find_by_coordinate(destination.coordinates()).await? {
            Some(existing) => {
                let id = existing.id.ok_or(StoreError::MissingId)?;
                self.add_alias_and_tags(id, destination.label(), &destination.tags)
                    .await?;
                Ok(MergeOutcome::Merged)
            }
            None => {
                self.create(destination).await?;
                Ok(MergeOutcome::Created)
            }
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

pub struct MongoDestinationStore {
    database: Database,
    collection: Collection<Destination>,
}

impl MongoDestinationStore {
    pub fn new(client: Arc<Client>, database: &str) -> Self {
        let database = client.database(database);
        let collection = database.collection(DESTINATION_COLLECTION);
        Self {
            database,
            collection,
        }
    }

    /// `$near` queries require a geospatial index on `location`.
    pub async fn ensure_indexes(&self) -> Result<(), StoreError> {
        let index = IndexModel::builder()
            .keys(doc! { "location": "2dsphere" })
            .build();
        self.collection.create_index(index).await?;
        Ok(())
    }
}

fn coordinate_filter(coordinates: Coordinates) -> Document {
    doc! { "location.coordinates": [coordinates.longitude, coordinates.latitude] }
}

fn nearest_filter(origin: Coordinates, radius_meters: f64) -> Document {
    doc! {
        "location": {
            "$near": {
                "$geometry": {
                    "type": "Point",
                    "coordinates": [origin.longitude, origin.latitude],
                },
                "$maxDistance": radius_meters,
            }
        }
    }
}

fn alias_tags_update(alias: &str, tags: &[String], now: DateTime) -> Document {
    doc! {
        "$addToSet": {
            "alias": alias,
            "tag": { "$each": tags.to_vec() },
        },
        "$set": { "updated_at": now },
    }
}

/// Fields other than aliases and tags are only written when the upsert
/// inserts. The coordinates are seeded from the equality filter.
fn merge_update(destination: &Destination, now: DateTime) -> Document {
    doc! {
        "$setOnInsert": {
            "location.type": "Point",
            "name": destination.name.as_str(),
            "description": destination.description.as_str(),
            "emoji": destination.emoji.as_str(),
            "rating": destination.rating,
            "created_at": now,
        },
        "$addToSet": {
            "alias": { "$each": destination.aliases.clone() },
            "tag": { "$each": destination.tags.clone() },
        },
        "$set": { "updated_at": now },
    }
}

impl DestinationStore for MongoDestinationStore {
    async fn find_nearest(
        &self,
        origin: Coordinates,
        radius_meters: f64,
        limit: u32,
    ) -> Result<Vec<Destination>, StoreError> {
        let cursor = self
            .collection
            .find(nearest_filter(origin, radius_meters))
            .limit(i64::from(limit))
            .await?;
        let destinations: Vec<Destination> = cursor.try_collect().await?;
        debug!(
            "Found {} cached destinations within {:.0}m of ({:.4}, {:.4})",
            destinations.len(),
            radius_meters,
            origin.latitude,
            origin.longitude
        );
        Ok(destinations)
    }

    async fn find_by_coordinate(
        &self,
        coordinates: Coordinates,
    ) -> Result<Option<Destination>, StoreError> {
        Ok(self
            .collection
            .find_one(coordinate_filter(coordinates))
            .await?)
    }

    async fn add_alias_and_tags(
        &self,
        id: ObjectId,
        alias: &str,
        tags: &[String],
    ) -> Result<(), StoreError> {
        let update = alias_tags_update(alias, tags, DateTime::now());
        let result = self.collection.update_one(doc! { "_id": id }, update).await?;
        if result.matched_count == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn create(&self, mut destination: Destination) -> Result<Destination, StoreError> {
        let now = DateTime::now();
        destination.created_at = Some(now);
        destination.updated_at = Some(now);

        let result = self.collection.insert_one(&destination).await?;
        destination.id = Some(result.inserted_id.as_object_id().ok_or(StoreError::MissingId)?);
        Ok(destination)
    }

    /// A single upsert keyed on the coordinate. This closes the gap between
    /// the read and the write of the default, but it is not an atomic
    /// guarantee: without a unique index two racing upserts can both insert.
    /// A unique index on `location.coordinates` would index each array
    /// element separately, so none is created and the rare duplicate is an
    /// accepted weak-consistency tradeoff.
    async fn merge_or_create(&self, destination: Destination) -> Result<MergeOutcome, StoreError> {
        let update = merge_update(&destination, DateTime::now());
        let result = self
            .collection
            .update_one(coordinate_filter(destination.coordinates()), update)
            .upsert(true)
            .await?;

        Ok(if result.upserted_id.is_some() {
            MergeOutcome::Created
        } else {
            MergeOutcome::Merged
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lisbon_viewpoint() -> Destination {
        Destination {
            id: None,
            location: Coordinates::new(-9.1323, 38.7139).into(),
            name: "Lisbon".to_string(),
            aliases: vec!["Miradouro de Santa Luzia".to_string()],
            description: "Tiled terrace over Alfama".to_string(),
            emoji: "🌅".to_string(),
            tags: vec!["viewpoints".to_string(), "sunsets".to_string()],
            rating: Some(4.7),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_coordinate_filter_matches_lon_lat_pair() {
        let filter = coordinate_filter(Coordinates::new(-9.1323, 38.7139));
        let pair = filter.get_array("location.coordinates").unwrap();
        assert_eq!(pair[0].as_f64(), Some(-9.1323));
        assert_eq!(pair[1].as_f64(), Some(38.7139));
    }

    #[test]
    fn test_nearest_filter_shape() {
        let filter = nearest_filter(Coordinates::new(-9.1393, 38.7223), 48_280.2);
        let near = filter
            .get_document("location")
            .unwrap()
            .get_document("$near")
            .unwrap();
        let geometry = near.get_document("$geometry").unwrap();
        assert_eq!(geometry.get_str("type").unwrap(), "Point");
        let coordinates = geometry.get_array("coordinates").unwrap();
        assert_eq!(coordinates[0].as_f64(), Some(-9.1393));
        assert_eq!(coordinates[1].as_f64(), Some(38.7223));
        assert_eq!(near.get_f64("$maxDistance").unwrap(), 48_280.2);
    }

    #[test]
    fn test_alias_tags_update_is_a_set_union() {
        let tags = vec!["trams".to_string(), "hills".to_string()];
        let update = alias_tags_update("Tram 28", &tags, DateTime::now());

        let add = update.get_document("$addToSet").unwrap();
        assert_eq!(add.get_str("alias").unwrap(), "Tram 28");
        let each = add.get_document("tag").unwrap().get_array("$each").unwrap();
        let each: Vec<&str> = each.iter().filter_map(|t| t.as_str()).collect();
        assert_eq!(each, vec!["trams", "hills"]);

        let set = update.get_document("$set").unwrap();
        assert_eq!(set.keys().collect::<Vec<_>>(), vec!["updated_at"]);
        assert!(!update.contains_key("$setOnInsert"));
    }

    #[test]
    fn test_merge_update_only_seeds_fields_on_insert() {
        let update = merge_update(&lisbon_viewpoint(), DateTime::now());

        let on_insert = update.get_document("$setOnInsert").unwrap();
        assert_eq!(on_insert.get_str("location.type").unwrap(), "Point");
        assert_eq!(on_insert.get_str("name").unwrap(), "Lisbon");
        assert_eq!(on_insert.get_f64("rating").unwrap(), 4.7);
        assert!(on_insert.contains_key("created_at"));

        let add = update.get_document("$addToSet").unwrap();
        let aliases = add.get_document("alias").unwrap().get_array("$each").unwrap();
        assert_eq!(aliases[0].as_str(), Some("Miradouro de Santa Luzia"));
        let tags = add.get_document("tag").unwrap().get_array("$each").unwrap();
        assert_eq!(tags.len(), 2);

        let set = update.get_document("$set").unwrap();
        assert_eq!(set.keys().collect::<Vec<_>>(), vec!["updated_at"]);
        for key in ["name", "rating", "description", "emoji"] {
            assert!(!set.contains_key(key), "{} overwritten on merge", key);
            assert!(!add.contains_key(key));
        }
    }

    #[test]
    fn test_merge_update_without_rating_stores_null() {
        let mut destination = lisbon_viewpoint();
        destination.rating = None;
        let update = merge_update(&destination, DateTime::now());
        let on_insert = update.get_document("$setOnInsert").unwrap();
        assert!(on_insert.is_null("rating"));
    }
}
