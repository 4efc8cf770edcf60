use actix_web::{web, HttpResponse, Responder};
use log::error;
use serde::Deserialize;
use serde_json::json;

use crate::routes::error_response;
use crate::services::trip_metadata_service::TripMetadataService;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataRequest {
    pub colloquial_prompt: String,
}

/*
    /api/trips/metadata
*/
pub async fn describe(
    service: web::Data<TripMetadataService>,
    input: web::Json<MetadataRequest>,
) -> impl Responder {
    let prompt = input.into_inner().colloquial_prompt;
    if prompt.trim().is_empty() {
        return HttpResponse::BadRequest()
            .json(json!({ "error": "colloquialPrompt must not be empty" }));
    }

    match service.describe(&prompt).await {
        Ok(metadata) => HttpResponse::Ok().json(metadata),
        Err(err) => {
            error!("Failed to describe trip: {}", err);
            error_response(&err)
        }
    }
}
