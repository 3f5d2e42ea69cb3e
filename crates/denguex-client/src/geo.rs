//! Best-effort geographic lookups: forward/reverse geocoding through the
//! public Nominatim service, and the country topology used by the map.
//!
//! Geo data is decorative. Every lookup degrades to `None` on failure so a
//! flaky third-party service can never block a screen; failures surface only
//! at debug level. Successful lookups are cached for the process lifetime,
//! since city coordinates do not move between renders.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::ApiError;

const NOMINATIM_BASE: &str = "https://nominatim.openstreetmap.org";
const TOPOLOGY_URL: &str = "https://code.highcharts.com/mapdata/countries/pk/pk-all.topo.json";

#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
}

#[derive(Debug, Deserialize, Default)]
struct ReverseAddress {
    #[serde(default)]
    suburb: Option<String>,
    #[serde(default)]
    neighbourhood: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    town: Option<String>,
    #[serde(default)]
    village: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReverseHit {
    #[serde(default)]
    address: ReverseAddress,
}

pub struct GeoClient {
    http: reqwest::Client,
    forward_cache: Mutex<HashMap<String, Option<(f64, f64)>>>,
    topology_cache: Mutex<Option<Value>>,
}

impl GeoClient {
    pub fn new() -> Result<Self, ApiError> {
        // Nominatim rejects requests without an identifying user agent.
        let http = reqwest::Client::builder()
            .user_agent(concat!("denguex-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(Self {
            http,
            forward_cache: Mutex::new(HashMap::new()),
            topology_cache: Mutex::new(None),
        })
    }

    /// Coordinates for a Pakistani city by name, or `None` when the service
    /// is unreachable or has never heard of it. Negative results are cached
    /// too, so an unknown city is asked about once per run.
    pub async fn geocode_city(&self, city: &str) -> Option<(f64, f64)> {
        let key = city.trim().to_lowercase();
        if let Some(cached) = self.forward_cache.lock().expect("geo cache lock poisoned").get(&key)
        {
            return *cached;
        }

        let result = self.forward_lookup(city).await;
        self.forward_cache.lock().expect("geo cache lock poisoned").insert(key, result);
        result
    }

    async fn forward_lookup(&self, city: &str) -> Option<(f64, f64)> {
        let request = self
            .http
            .get(format!("{NOMINATIM_BASE}/search"))
            .query(&[("q", format!("{city}, Pakistan").as_str()), ("format", "json"), ("limit", "1")]);

        let hits: Vec<SearchHit> = match request.send().await {
            Ok(resp) => match resp.json().await {
                Ok(hits) => hits,
                Err(e) => {
                    debug!(city, error = %e, "geocode decode failed");
                    return None;
                }
            },
            Err(e) => {
                debug!(city, error = %e, "geocode request failed");
                return None;
            }
        };

        let hit = hits.into_iter().next()?;
        match (hit.lat.parse::<f64>(), hit.lon.parse::<f64>()) {
            (Ok(lat), Ok(lon)) => Some((lat, lon)),
            _ => None,
        }
    }

    /// Human-readable locality for a coordinate, rendered as
    /// "{suburb}, {city}" with the most specific fields available.
    pub async fn reverse_geocode(&self, lat: f64, lon: f64) -> Option<String> {
        let request = self.http.get(format!("{NOMINATIM_BASE}/reverse")).query(&[
            ("lat", lat.to_string().as_str()),
            ("lon", lon.to_string().as_str()),
            ("format", "json"),
        ]);

        let hit: ReverseHit = match request.send().await {
            Ok(resp) => match resp.json().await {
                Ok(hit) => hit,
                Err(e) => {
                    debug!(lat, lon, error = %e, "reverse geocode decode failed");
                    return None;
                }
            },
            Err(e) => {
                debug!(lat, lon, error = %e, "reverse geocode request failed");
                return None;
            }
        };

        Some(Self::format_locality(&hit.address))
    }

    fn format_locality(addr: &ReverseAddress) -> String {
        let local = addr
            .suburb
            .as_deref()
            .or(addr.neighbourhood.as_deref())
            .unwrap_or("Unknown area");
        let city = addr
            .city
            .as_deref()
            .or(addr.town.as_deref())
            .or(addr.village.as_deref())
            .unwrap_or("Unknown city");
        format!("{local}, {city}")
    }

    /// The Pakistan TopoJSON used to draw the outbreak map. Fetched once
    /// and held for the process lifetime.
    pub async fn topology(&self) -> Option<Value> {
        if let Some(topo) = self.topology_cache.lock().expect("geo cache lock poisoned").clone() {
            return Some(topo);
        }

        let topo: Value = match self.http.get(TOPOLOGY_URL).send().await {
            Ok(resp) => match resp.json().await {
                Ok(topo) => topo,
                Err(e) => {
                    debug!(error = %e, "topology decode failed");
                    return None;
                }
            },
            Err(e) => {
                debug!(error = %e, "topology fetch failed");
                return None;
            }
        };

        *self.topology_cache.lock().expect("geo cache lock poisoned") = Some(topo.clone());
        Some(topo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locality_prefers_specific_fields() {
        let addr = ReverseAddress {
            suburb: Some("Gulberg".into()),
            neighbourhood: Some("Block C".into()),
            city: Some("Lahore".into()),
            ..ReverseAddress::default()
        };
        assert_eq!(GeoClient::format_locality(&addr), "Gulberg, Lahore");
    }

    #[test]
    fn locality_falls_through_alternates() {
        let addr = ReverseAddress {
            neighbourhood: Some("Saddar".into()),
            village: Some("Khushab".into()),
            ..ReverseAddress::default()
        };
        assert_eq!(GeoClient::format_locality(&addr), "Saddar, Khushab");
    }

    #[test]
    fn locality_handles_empty_address() {
        let addr = ReverseAddress::default();
        assert_eq!(GeoClient::format_locality(&addr), "Unknown area, Unknown city");
    }
}
