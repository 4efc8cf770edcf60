use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use std::collections::HashMap;
use std::env;

use crate::services::destination_service::DestinationService;
use crate::services::destination_store::DestinationStore;
use crate::services::geocoding_service::Geocoder;
use crate::services::stage_generation_service::StageGenerator;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

pub async fn health_check<S, C, G>(
    service: web::Data<DestinationService<S, C, G>>,
) -> impl Responder
where
    S: DestinationStore + 'static,
    C: Geocoder + 'static,
    G: StageGenerator + 'static,
{
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        environment: env::var("RUST_ENV").unwrap_or("development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let store_result = match service.store_status().await {
        Ok(()) => ServiceStatus {
            status: "ok".to_string(),
            details: None,
        },
        Err(e) => ServiceStatus {
            status: "error".to_string(),
            details: Some(e.to_string()),
        },
    };
    health
        .services
        .insert("destination_store".to_string(), store_result.clone());

    let policy = service.policy();
    health.services.insert(
        "cache_policy".to_string(),
        ServiceStatus {
            status: "ok".to_string(),
            details: Some(format!(
                "share {:.2}, radius {} miles",
                policy.cache_share, policy.search_radius_miles
            )),
        },
    );

    if store_result.status != "ok" {
        health.status = "degraded".to_string();
    }

    HttpResponse::Ok().json(health)
}
