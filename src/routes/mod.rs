use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::error::PlannerError;
use crate::services::destination_store::DestinationStore;
use crate::services::geocoding_service::Geocoder;
use crate::services::stage_generation_service::StageGenerator;

pub mod health;
pub mod trip;
pub mod trip_metadata;

/// Routes backed by a `DestinationService<S, C, G>` registered as app data.
pub fn configure<S, C, G>(cfg: &mut web::ServiceConfig)
where
    S: DestinationStore + 'static,
    C: Geocoder + 'static,
    G: StageGenerator + 'static,
{
    cfg.route("/health", web::get().to(health::health_check::<S, C, G>))
        .service(
            web::scope("/api/trips")
                .route("/generate", web::post().to(trip::generate::<S, C, G>))
                .route("/cache", web::post().to(trip::cache_stages::<S, C, G>)),
        );
}

/// Routes backed by a `TripMetadataService` registered as app data.
pub fn configure_metadata(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/api/trips/metadata",
        web::post().to(trip_metadata::describe),
    );
}

pub fn error_response(err: &PlannerError) -> HttpResponse {
    let body = json!({ "error": err.to_string() });
    match err {
        PlannerError::InvalidRequest(_) => HttpResponse::BadRequest().json(body),
        PlannerError::Geocode(_) => HttpResponse::UnprocessableEntity().json(body),
        PlannerError::Store(_) | PlannerError::CacheWrite(_) => {
            HttpResponse::InternalServerError().json(body)
        }
        PlannerError::Generation(_) | PlannerError::Metadata(_) => {
            HttpResponse::BadGateway().json(body)
        }
    }
}
