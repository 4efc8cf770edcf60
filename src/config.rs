use std::env;

use crate::error::ConfigError;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;
const MONGODB_DATABASE: &str = "Trips";
const OPENAI_MODEL: &str = "gpt-4o-mini";

/// Share of the requested day/stage grid that may be served from cache.
pub const DEFAULT_CACHE_SHARE: f64 = 0.8;
pub const DEFAULT_CACHE_RADIUS_MILES: f64 = 30.0;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` runs the planner against the in-memory destination store.
    pub mongo_uri: Option<String>,
    pub mongo_database: String,
    pub google_maps_api_key: String,
    pub openai_api_key: String,
    pub openai_model: String,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CacheConfig {
    pub cache_share: f64,
    pub radius_miles: f64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_share: DEFAULT_CACHE_SHARE,
            radius_miles: DEFAULT_CACHE_RADIUS_MILES,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("HOST").unwrap_or_else(|_| HOST.to_string());
        let port = match env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                reason: format!("'{}' is not a port number", raw),
            })?,
            Err(_) => PORT,
        };

        let mongo_uri = env::var("MONGODB_URI").ok().filter(|uri| !uri.is_empty());
        let mongo_database =
            env::var("MONGODB_DATABASE").unwrap_or_else(|_| MONGODB_DATABASE.to_string());

        let google_maps_api_key = required("GOOGLE_MAPS_API_KEY")?;
        let openai_api_key = required("OPENAI_API_KEY")?;
        let openai_model = env::var("OPENAI_MODEL").unwrap_or_else(|_| OPENAI_MODEL.to_string());

        let cache = CacheConfig {
            cache_share: parse_f64("CACHE_SHARE", DEFAULT_CACHE_SHARE)?,
            radius_miles: parse_f64("CACHE_RADIUS_MILES", DEFAULT_CACHE_RADIUS_MILES)?,
        };
        cache.validate()?;

        Ok(Self {
            host,
            port,
            mongo_uri,
            mongo_database,
            google_maps_api_key,
            openai_api_key,
            openai_model,
            cache,
        })
    }
}

impl CacheConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.cache_share) {
            return Err(ConfigError::Invalid {
                name: "CACHE_SHARE",
                reason: format!("{} is outside [0, 1]", self.cache_share),
            });
        }
        if !(self.radius_miles > 0.0) {
            return Err(ConfigError::Invalid {
                name: "CACHE_RADIUS_MILES",
                reason: format!("{} must be positive", self.radius_miles),
            });
        }
        Ok(())
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::Missing(name))
}

fn parse_f64(name: &'static str, default: f64) -> Result<f64, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            reason: format!("'{}' is not a number", raw),
        }),
        Err(_) => Ok(default),
    }
}
