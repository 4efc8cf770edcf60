use serde::{Deserialize, Serialize};

use crate::error::PlannerError;

use super::destination::Coordinates;

pub const MAX_DAYS: u32 = 30;
pub const MAX_STAGES_PER_DAY: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRequest {
    pub trip_location: String,
    pub number_of_days: u32,
    pub stages_per_day: u32,
    #[serde(default)]
    pub trip_notes: String,
}

impl TripRequest {
    pub fn validate(&self) -> Result<(), PlannerError> {
        if self.trip_location.trim().is_empty() {
            return Err(PlannerError::InvalidRequest(
                "tripLocation must not be empty".to_string(),
            ));
        }
        if self.number_of_days == 0 {
            return Err(PlannerError::InvalidRequest(
                "numberOfDays must be at least 1".to_string(),
            ));
        }
        if self.number_of_days > MAX_DAYS {
            return Err(PlannerError::InvalidRequest(format!(
                "numberOfDays must be at most {}",
                MAX_DAYS
            )));
        }
        if self.stages_per_day > MAX_STAGES_PER_DAY {
            return Err(PlannerError::InvalidRequest(format!(
                "stagesPerDay must be at most {}",
                MAX_STAGES_PER_DAY
            )));
        }
        Ok(())
    }

    /// Total number of stage slots in the day grid, or `None` on overflow.
    pub fn checked_capacity(&self) -> Option<u32> {
        self.number_of_days.checked_mul(self.stages_per_day)
    }

    /// Total number of stage slots in a validated request. An overflowing
    /// grid has no usable slots.
    pub fn capacity(&self) -> u32 {
        self.checked_capacity().unwrap_or(0)
    }
}

/// A stage not yet assigned to a day. Short keys are what the generator is
/// asked to produce; the long forms are accepted too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateStage {
    #[serde(rename = "i", alias = "index", default)]
    pub index: u32,
    #[serde(rename = "l", alias = "location")]
    pub location: String,
    #[serde(rename = "d", alias = "description", default)]
    pub description: String,
    #[serde(rename = "e", alias = "emoji", default)]
    pub emoji: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheResult {
    #[serde(rename = "s")]
    pub stages: Vec<CandidateStage>,
}

impl CacheResult {
    pub fn avoid_list(&self) -> Vec<String> {
        self.stages.iter().map(|s| s.location.clone()).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratedResult {
    #[serde(rename = "s", alias = "stages", default)]
    pub stages: Vec<CandidateStage>,
}

/// A stage the user has accepted, as submitted back for caching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizedStage {
    pub stage_location: String,
    pub stage_latitude: f64,
    pub stage_longitude: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub emoji: String,
    pub stage_rating: Option<f64>,
}

impl FinalizedStage {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.stage_longitude, self.stage_latitude)
    }
}

/// Structured trip parameters inferred from a free-form prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripMetadata {
    pub trip_name: String,
    pub trip_location: String,
    pub stages_per_day: u32,
    pub budget: f64,
    pub number_of_days: u32,
    #[serde(default)]
    pub trip_notes: String,
}

impl TripMetadata {
    pub fn into_trip_request(self) -> TripRequest {
        TripRequest {
            trip_location: self.trip_location,
            number_of_days: self.number_of_days,
            stages_per_day: self.stages_per_day,
            trip_notes: self.trip_notes,
        }
    }
}
