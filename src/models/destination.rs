use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// A longitude/latitude pair in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinates {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GeoJsonType {
    Point,
}

/// GeoJSON point as stored in the `location` field, `[longitude, latitude]` order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "type")]
    pub kind: GeoJsonType,
    pub coordinates: [f64; 2],
}

impl GeoPoint {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.coordinates[0], self.coordinates[1])
    }
}

impl From<Coordinates> for GeoPoint {
    fn from(value: Coordinates) -> Self {
        Self {
            kind: GeoJsonType::Point,
            coordinates: [value.longitude, value.latitude],
        }
    }
}

/// A cached place. One record per distinct coordinate pair; `aliases` and
/// `tags` only ever grow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub location: GeoPoint,
    pub name: String,
    #[serde(rename = "alias", default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub emoji: String,
    #[serde(rename = "tag", default)]
    pub tags: Vec<String>,
    pub rating: Option<f64>,
    pub created_at: Option<DateTime>,
    pub updated_at: Option<DateTime>,
}

impl Destination {
    /// Label shown for this destination: the first alias when there is one,
    /// otherwise the canonical name.
    pub fn label(&self) -> &str {
        self.aliases
            .first()
            .map(String::as_str)
            .unwrap_or(&self.name)
    }

    pub fn coordinates(&self) -> Coordinates {
        self.location.coordinates()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeOutcome {
    Created,
    Merged,
}
