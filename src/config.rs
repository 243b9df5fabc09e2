use std::net::SocketAddr;
use std::str::FromStr;

pub const DEFAULT_DATABASE_URL: &str = "sqlite:data/placelog.db";
pub const DEFAULT_TILE_URL: &str = "https://tile.openstreetmap.fr/hot/{z}/{x}/{y}.png";
pub const DEFAULT_ATTRIBUTION: &str =
    "&copy; <a href=\"http://www.openstreetmap.org/copyright\">OpenStreetMap</a>";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub map: MapConfig,
}

/// Settings for the map widget and its tile layer.
#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    pub zoom: u8,
    pub tile_url: String,
    pub attribution: String,
    pub max_zoom: u8,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            zoom: 13,
            tile_url: DEFAULT_TILE_URL.to_string(),
            attribution: DEFAULT_ATTRIBUTION.to_string(),
            max_zoom: 19,
        }
    }
}

impl Config {
    /// Read settings from the process environment. Call `dotenvy::dotenv()`
    /// first to pick up a `.env` file.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = MapConfig::default();

        let map = MapConfig {
            zoom: parse_or("MAP_ZOOM", lookup("MAP_ZOOM"), defaults.zoom),
            tile_url: lookup("TILE_URL").unwrap_or(defaults.tile_url),
            attribution: lookup("TILE_ATTRIBUTION").unwrap_or(defaults.attribution),
            max_zoom: parse_or("TILE_MAX_ZOOM", lookup("TILE_MAX_ZOOM"), defaults.max_zoom),
        };

        Self {
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            bind_addr: parse_or(
                "BIND_ADDR",
                lookup("BIND_ADDR"),
                SocketAddr::from(([0, 0, 0, 0], 3000)),
            ),
            map,
        }
    }
}

fn parse_or<T: FromStr>(key: &str, value: Option<String>, default: T) -> T {
    let Some(value) = value else {
        return default;
    };

    match value.trim().parse() {
        Ok(parsed) => parsed,
        Err(_) => {
            tracing::warn!("invalid {key}={value:?}, using default");
            default
        }
    }
}
