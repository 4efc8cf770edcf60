use crate::models::itinerary::{DayPlan, Itinerary, ItineraryStage, StageSource};
use crate::models::trip::CandidateStage;

/// Lay cached stages, then generated stages, onto a `number_of_days` grid of
/// at most `stages_per_day` stages each.
///
/// Days are filled in order from the front of the pool. When the pool runs
/// out the remaining days are left short or empty; stages beyond the grid
/// are dropped. The result always has exactly `number_of_days` days.
pub fn combine(
    cached: Vec<CandidateStage>,
    generated: Vec<CandidateStage>,
    number_of_days: u32,
    stages_per_day: u32,
) -> Itinerary {
    let mut pool = cached
        .into_iter()
        .map(|stage| (stage, StageSource::Cache))
        .chain(generated.into_iter().map(|stage| (stage, StageSource::Generated)));

    let days = (1..=number_of_days)
        .map(|day| {
            let stages = pool
                .by_ref()
                .take(stages_per_day as usize)
                .zip(1..)
                .map(|((stage, source), stage_index)| ItineraryStage {
                    stage_index,
                    stage_location_name: stage.location,
                    stage_description: stage.description,
                    stage_emoji: stage.emoji,
                    source,
                })
                .collect();
            DayPlan { day, stages }
        })
        .collect();

    Itinerary { days }
}
