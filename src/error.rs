use mongodb::bson::oid::ObjectId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("no coordinates found for '{0}'")]
    NotFound(String),
    #[error("geocoding service returned {0}")]
    Service(String),
    #[error("geocoding request failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
    #[error("destination {0} not found")]
    NotFound(ObjectId),
    #[error("store returned a destination without an id")]
    MissingId,
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("generation service returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("malformed generation output: {0}")]
    Malformed(String),
    #[error("{0}")]
    Rejected(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Request-level failure. The `Display` output carries a prefix naming the
/// pipeline step that failed.
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("Invalid trip request | {0}")]
    InvalidRequest(String),
    #[error("Could not geocode trip location | {0}")]
    Geocode(#[from] GeocodeError),
    #[error("Could not find closest destinations | {0}")]
    Store(#[source] StoreError),
    #[error("Error while generating trip | {0}")]
    Generation(#[source] GenerationError),
    #[error("Could not cache stage | {0}")]
    CacheWrite(#[source] StoreError),
    #[error("Unable to generate a travel metadata | {0}")]
    Metadata(#[source] GenerationError),
}
