use log::{debug, error};

use crate::error::PlannerError;
use crate::models::destination::{Destination, MergeOutcome};
use crate::models::trip::FinalizedStage;
use crate::services::destination_store::DestinationStore;
use crate::services::tag_extraction::{extract_tags, NounExtractor};

/// Record built from a finalized stage: `display_name` becomes the canonical
/// name, the stage label the only alias, and the notes' nouns the tags.
pub fn destination_from_stage<E: NounExtractor + ?Sized>(
    extractor: &E,
    stage: &FinalizedStage,
    display_name: &str,
    notes: &str,
) -> Destination {
    Destination {
        id: None,
        location: stage.coordinates().into(),
        name: display_name.to_string(),
        aliases: vec![stage.stage_location.clone()],
        description: stage.description.clone(),
        emoji: stage.emoji.clone(),
        tags: extract_tags(extractor, notes),
        rating: stage.stage_rating,
        created_at: None,
        updated_at: None,
    }
}

/// Write one finalized stage back into the destination cache, merging it
/// into the record at the same coordinate when there is one.
///
/// Repeating a call with the same stage, name and notes leaves the record's
/// aliases and tags unchanged.
pub async fn cache_stage<S, E>(
    store: &S,
    extractor: &E,
    stage: &FinalizedStage,
    display_name: &str,
    notes: &str,
) -> Result<MergeOutcome, PlannerError>
where
    S: DestinationStore,
    E: NounExtractor + ?Sized,
{
    let destination = destination_from_stage(extractor, stage, display_name, notes);
    let outcome = store.merge_or_create(destination).await.map_err(|e| {
        error!("Could not cache stage '{}': {}", stage.stage_location, e);
        PlannerError::CacheWrite(e)
    })?;

    debug!(
        "Cached stage '{}' at ({}, {}): {:?}",
        stage.stage_location, stage.stage_longitude, stage.stage_latitude, outcome
    );
    Ok(outcome)
}
