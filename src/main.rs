use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::{info, warn};

use trip_planner_api::config::AppConfig;
use trip_planner_api::db::mongo::create_mongo_client;
use trip_planner_api::routes;
use trip_planner_api::services::cache_probe::CapacityPolicy;
use trip_planner_api::services::destination_service::DestinationService;
use trip_planner_api::services::destination_store::{DestinationStore, MongoDestinationStore};
use trip_planner_api::services::geocoding_service::GoogleGeocoder;
use trip_planner_api::services::memory_store::InMemoryDestinationStore;
use trip_planner_api::services::openai_service::OpenAiClient;
use trip_planner_api::services::stage_generation_service::OpenAiStageGenerator;
use trip_planner_api::services::trip_metadata_service::TripMetadataService;

fn startup_error(err: impl std::fmt::Display) -> io::Error {
    io::Error::other(err.to_string())
}

async fn run_server<S>(config: AppConfig, store: S) -> io::Result<()>
where
    S: DestinationStore + Send + Sync + 'static,
{
    let geocoder = GoogleGeocoder::new(config.google_maps_api_key.as_str()).map_err(startup_error)?;
    let stage_client = OpenAiClient::new(config.openai_api_key.as_str(), config.openai_model.as_str())
        .map_err(startup_error)?;
    let metadata_client = OpenAiClient::new(config.openai_api_key.as_str(), config.openai_model.as_str())
        .map_err(startup_error)?;

    let planner = web::Data::new(
        DestinationService::new(store, geocoder, OpenAiStageGenerator::new(stage_client))
            .with_policy(CapacityPolicy::from(&config.cache)),
    );
    let metadata = web::Data::new(TripMetadataService::new(metadata_client));

    info!("Starting HTTP server on {}:{}", config.host, config.port);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .app_data(planner.clone())
            .app_data(metadata.clone())
            .configure(routes::configure_metadata)
            .configure(
                routes::configure::<S, GoogleGeocoder, OpenAiStageGenerator>,
            )
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(startup_error)?;

    match config.mongo_uri.clone() {
        Some(uri) => {
            let client = create_mongo_client(&uri, &config.mongo_database)
                .await
                .map_err(startup_error)?;
            let store = MongoDestinationStore::new(Arc::clone(&client), &config.mongo_database);
            if let Err(e) = store.ensure_indexes().await {
                warn!("Could not ensure destination indexes: {}", e);
            }
            run_server(config, store).await
        }
        None => {
            warn!("MONGODB_URI not set; destinations are cached in memory only");
            run_server(config, InMemoryDestinationStore::new()).await
        }
    }
}
