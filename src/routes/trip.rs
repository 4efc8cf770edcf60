use actix_web::{web, HttpResponse, Responder};
use log::error;
use serde::Deserialize;

use crate::models::trip::{FinalizedStage, TripRequest};
use crate::routes::error_response;
use crate::services::destination_service::DestinationService;
use crate::services::destination_store::DestinationStore;
use crate::services::geocoding_service::Geocoder;
use crate::services::stage_generation_service::StageGenerator;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStagesRequest {
    /// Whatever the user asked for as the trip destination.
    pub name: String,
    #[serde(default)]
    pub notes: String,
    pub stages: Vec<FinalizedStage>,
}

/*
    /api/trips/generate
*/
pub async fn generate<S, C, G>(
    service: web::Data<DestinationService<S, C, G>>,
    input: web::Json<TripRequest>,
) -> impl Responder
where
    S: DestinationStore + 'static,
    C: Geocoder + 'static,
    G: StageGenerator + 'static,
{
    let request = input.into_inner();
    match service.generate_trip_with_cache(&request).await {
        Ok(itinerary) => HttpResponse::Ok().json(itinerary),
        Err(err) => {
            error!("Failed to generate trip to '{}': {}", request.trip_location, err);
            error_response(&err)
        }
    }
}

/*
    /api/trips/cache
*/
pub async fn cache_stages<S, C, G>(
    service: web::Data<DestinationService<S, C, G>>,
    input: web::Json<CacheStagesRequest>,
) -> impl Responder
where
    S: DestinationStore + 'static,
    C: Geocoder + 'static,
    G: StageGenerator + 'static,
{
    let input = input.into_inner();
    let report = service
        .cache_itinerary(&input.stages, &input.name, &input.notes)
        .await;
    HttpResponse::Ok().json(report)
}
