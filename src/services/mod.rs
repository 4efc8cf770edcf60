pub mod cache_probe;
pub mod cache_writer;
pub mod destination_service;
pub mod destination_store;
pub mod geocoding_service;
pub mod itinerary_combiner;
pub mod memory_store;
pub mod openai_service;
pub mod stage_generation_service;
pub mod tag_extraction;
pub mod trip_metadata_service;
