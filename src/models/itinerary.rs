use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageSource {
    Cache,
    Generated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryStage {
    /// 1-based position within the day.
    pub stage_index: u32,
    pub stage_location_name: String,
    pub stage_description: String,
    pub stage_emoji: String,
    pub source: StageSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    pub day: u32,
    pub stages: Vec<ItineraryStage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    pub days: Vec<DayPlan>,
}

impl Itinerary {
    pub fn stage_count(&self) -> usize {
        self.days.iter().map(|day| day.stages.len()).sum()
    }

    /// Stages in placement order, day by day.
    pub fn stages(&self) -> impl Iterator<Item = &ItineraryStage> {
        self.days.iter().flat_map(|day| day.stages.iter())
    }
}
