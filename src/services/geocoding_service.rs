//! Place name resolution through the Google Geocoding API.
//!
//! Requires `GOOGLE_MAPS_API_KEY` with the Geocoding API enabled.

use log::debug;
use serde::Deserialize;
use std::time::Duration;

use crate::error::GeocodeError;
use crate::models::destination::Coordinates;

const GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

pub trait Geocoder {
    async fn resolve(&self, place: &str) -> Result<Coordinates, GeocodeError>;
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

pub struct GoogleGeocoder {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GoogleGeocoder {
    pub fn new(api_key: impl Into<String>) -> Result<Self, GeocodeError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http_client,
            api_key: api_key.into(),
            base_url: GEOCODE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Geocoder for GoogleGeocoder {
    async fn resolve(&self, place: &str) -> Result<Coordinates, GeocodeError> {
        let place = place.trim();
        if place.is_empty() {
            return Err(GeocodeError::NotFound(place.to_string()));
        }

        debug!("Geocoding '{}'", place);
        let response: GeocodeResponse = self
            .http_client
            .get(&self.base_url)
            .query(&[("address", place), ("key", self.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        coordinates_from_response(place, response)
    }
}

fn coordinates_from_response(
    place: &str,
    response: GeocodeResponse,
) -> Result<Coordinates, GeocodeError> {
    match response.status.as_str() {
        "OK" => response
            .results
            .first()
            .map(|result| {
                Coordinates::new(result.geometry.location.lng, result.geometry.location.lat)
            })
            .ok_or_else(|| GeocodeError::NotFound(place.to_string())),
        "ZERO_RESULTS" => Err(GeocodeError::NotFound(place.to_string())),
        status => Err(GeocodeError::Service(match response.error_message {
            Some(message) => format!("{}: {}", status, message),
            None => status.to_string(),
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> GeocodeResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_first_result_wins() {
        let response = parse(
            r#"{
                "status": "OK",
                "results": [
                    {"geometry": {"location": {"lat": 35.0116, "lng": 135.7681}}},
                    {"geometry": {"location": {"lat": 1.0, "lng": 2.0}}}
                ]
            }"#,
        );
        let coordinates = coordinates_from_response("Kyoto", response).unwrap();
        assert_eq!(coordinates, Coordinates::new(135.7681, 35.0116));
    }

    #[test]
    fn test_zero_results_is_not_found() {
        let response = parse(r#"{"status": "ZERO_RESULTS", "results": []}"#);
        assert!(matches!(
            coordinates_from_response("Atlantis", response),
            Err(GeocodeError::NotFound(place)) if place == "Atlantis"
        ));
    }

    #[test]
    fn test_service_status_is_reported() {
        let response = parse(
            r#"{"status": "REQUEST_DENIED", "results": [], "error_message": "The provided API key is invalid."}"#,
        );
        match coordinates_from_response("Kyoto", response) {
            Err(GeocodeError::Service(message)) => {
                assert_eq!(message, "REQUEST_DENIED: The provided API key is invalid.")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[actix_rt::test]
    async fn test_blank_place_skips_request() {
        let geocoder = GoogleGeocoder::new("unused")
            .unwrap()
            .with_base_url("http://127.0.0.1:9");
        assert!(matches!(
            geocoder.resolve("   ").await,
            Err(GeocodeError::NotFound(_))
        ));
    }
}
