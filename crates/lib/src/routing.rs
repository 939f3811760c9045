//! # Travel Time
//!
//! A thin client over OpenRouteService geocoding and directions. Without an
//! API key it answers with a fixed demo estimate and makes no network call.

use crate::errors::RoutingError;
use futures::future::join_all;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_OPENROUTE_API_URL: &str = "https://api.openrouteservice.org";
/// The key shipped in `.env.example`; treated as absent.
pub const PLACEHOLDER_API_KEY: &str = "your_openroute_api_key_here";
pub const ROUTING_TIMEOUT: Duration = Duration::from_secs(10);

const DEMO_SERVICE: &str = "Demo Mode - Add OPENROUTE_API_KEY to .env";
const ESTIMATED_SERVICE: &str = "OpenRouteService (Demo Mode - Add API key to .env)";
const LIVE_SERVICE: &str = "OpenRouteService";
const DEFAULT_MODES: [&str; 3] = ["foot-walking", "cycling-regular", "driving-car"];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Coordinates as sent by the frontend, where either half may be missing.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PartialCoordinates {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl PartialCoordinates {
    fn complete(self) -> Option<Coordinates> {
        Some(Coordinates {
            lat: self.lat?,
            lng: self.lng?,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TravelTimeRequest {
    #[serde(default)]
    pub from: Option<PartialCoordinates>,
    #[serde(default)]
    pub to: Option<PartialCoordinates>,
    #[serde(default)]
    pub from_address: Option<String>,
    #[serde(default)]
    pub to_address: Option<String>,
    #[serde(default)]
    pub modes: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelMode {
    pub mode: String,
    /// Whole minutes.
    pub duration: i64,
    /// Whole metres.
    pub distance: i64,
}

impl TravelMode {
    fn new(mode: &str, duration: i64, distance: i64) -> Self {
        Self {
            mode: mode.to_string(),
            duration,
            distance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelTimeReport {
    pub modes: Vec<TravelMode>,
    pub service: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub from: Option<Coordinates>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub to: Option<Coordinates>,
}

impl TravelTimeReport {
    fn estimated_modes() -> Vec<TravelMode> {
        vec![
            TravelMode::new("walking", 15, 1200),
            TravelMode::new("cycling", 8, 1500),
            TravelMode::new("driving", 5, 2100),
        ]
    }

    /// The fixed payload returned when no routing key is configured.
    pub fn demo() -> Self {
        Self {
            modes: Self::estimated_modes(),
            service: DEMO_SERVICE.to_string(),
            from: None,
            to: None,
        }
    }

    fn estimated(from: Coordinates, to: Coordinates) -> Self {
        Self {
            modes: Self::estimated_modes(),
            service: ESTIMATED_SERVICE.to_string(),
            from: Some(from),
            to: Some(to),
        }
    }
}

/// Maps a requested mode to an OpenRouteService profile. Unknown modes are
/// passed through unchanged.
pub fn profile_for(mode: &str) -> &str {
    match mode {
        "walking" => "foot-walking",
        "cycling" => "cycling-regular",
        "driving" => "driving-car",
        other => other,
    }
}

/// The name a mode is reported under.
pub fn display_mode(mode: &str) -> String {
    mode.replace("foot-walking", "walking")
        .replace("cycling-regular", "cycling")
        .replace("driving-car", "driving")
}

/// The address variants tried in order: the full address, then its last two
/// comma-separated parts, then its last three.
pub fn geocode_candidates(address: &str) -> Vec<String> {
    let mut candidates = vec![address.to_string()];
    if address.contains(',') {
        let parts: Vec<&str> = address.split(',').map(str::trim).collect();
        let n = parts.len();
        if n >= 2 {
            candidates.push(parts[n - 2..].join(", "));
        }
        if n >= 3 {
            candidates.push(parts[n - 3..].join(", "));
        }
    }
    candidates
}

// --- OpenRouteService response structures ---

#[derive(Deserialize, Debug)]
struct GeocodeResponse {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Deserialize, Debug)]
struct Feature {
    geometry: Geometry,
}

#[derive(Deserialize, Debug)]
struct Geometry {
    coordinates: Vec<f64>,
}

#[derive(Serialize)]
struct DirectionsRequest {
    coordinates: [[f64; 2]; 2],
}

#[derive(Deserialize, Debug)]
struct DirectionsResponse {
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Deserialize, Debug)]
struct Route {
    #[serde(default)]
    summary: RouteSummary,
}

#[derive(Deserialize, Debug, Default)]
struct RouteSummary {
    #[serde(default)]
    duration: f64,
    #[serde(default)]
    distance: f64,
}

/// A client for the routing and geocoding service.
#[derive(Clone, Debug)]
pub struct RoutingClient {
    client: ReqwestClient,
    api_url: String,
    api_key: Option<String>,
}

impl RoutingClient {
    pub fn new(api_url: String, api_key: Option<String>) -> Result<Self, RoutingError> {
        let client = ReqwestClient::builder()
            .timeout(ROUTING_TIMEOUT)
            .build()
            .map_err(RoutingError::ReqwestClientBuild)?;
        let api_key = api_key.filter(|k| !k.trim().is_empty() && k != PLACEHOLDER_API_KEY);
        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Estimates travel time for every requested mode.
    pub async fn estimate(&self, request: &TravelTimeRequest) -> Result<TravelTimeReport, RoutingError> {
        let Some(api_key) = self.api_key.as_deref() else {
            info!("Routing key not configured. Returning demo travel times.");
            return Ok(TravelTimeReport::demo());
        };

        let from_address = request.from_address.as_deref().filter(|a| !a.trim().is_empty());
        let to_address = request.to_address.as_deref().filter(|a| !a.trim().is_empty());
        let (from, to) = match (from_address, to_address) {
            (Some(from_address), Some(to_address)) => {
                let from = self
                    .geocode(api_key, from_address)
                    .await
                    .ok_or_else(|| RoutingError::CouldNotLocate(from_address.to_string()))?;
                let to = self
                    .geocode(api_key, to_address)
                    .await
                    .ok_or_else(|| RoutingError::CouldNotLocate(to_address.to_string()))?;
                (from, to)
            }
            _ => {
                let from = request
                    .from
                    .and_then(PartialCoordinates::complete)
                    .ok_or(RoutingError::MissingCoordinates("from"))?;
                let to = request
                    .to
                    .and_then(PartialCoordinates::complete)
                    .ok_or(RoutingError::MissingCoordinates("to"))?;
                (from, to)
            }
        };

        let modes: Vec<String> = match &request.modes {
            Some(modes) => modes.clone(),
            None => DEFAULT_MODES.iter().map(|m| m.to_string()).collect(),
        };
        let lookups = modes
            .iter()
            .map(|mode| self.route(api_key, mode, from, to));
        let results: Vec<TravelMode> = join_all(lookups).await.into_iter().flatten().collect();

        if results.is_empty() {
            warn!("No travel mode could be routed. Returning estimated travel times.");
            return Ok(TravelTimeReport::estimated(from, to));
        }
        Ok(TravelTimeReport {
            modes: results,
            service: LIVE_SERVICE.to_string(),
            from: Some(from),
            to: Some(to),
        })
    }

    async fn geocode(&self, api_key: &str, address: &str) -> Option<Coordinates> {
        let url = format!("{}/geocode/search", self.api_url);
        for candidate in geocode_candidates(address) {
            debug!(address = %candidate, "Geocoding address");
            let response = self
                .client
                .get(&url)
                .query(&[("text", candidate.as_str()), ("size", "1")])
                .header("Authorization", api_key)
                .send()
                .await;
            let response = match response {
                Ok(r) if r.status().is_success() => r,
                Ok(r) => {
                    warn!(address = %candidate, status = %r.status(), "Geocoding failed");
                    continue;
                }
                Err(e) => {
                    warn!(address = %candidate, "Geocoding request failed: {e}");
                    continue;
                }
            };
            match response.json::<GeocodeResponse>().await {
                Ok(body) => {
                    let point = body
                        .features
                        .into_iter()
                        .next()
                        .and_then(|f| match f.geometry.coordinates[..] {
                            [lng, lat, ..] => Some(Coordinates { lat, lng }),
                            _ => None,
                        });
                    if point.is_some() {
                        return point;
                    }
                }
                Err(e) => warn!(address = %candidate, "Unreadable geocoding response: {e}"),
            }
        }
        None
    }

    async fn route(
        &self,
        api_key: &str,
        mode: &str,
        from: Coordinates,
        to: Coordinates,
    ) -> Option<TravelMode> {
        let url = format!("{}/v2/directions/{}", self.api_url, profile_for(mode));
        let body = DirectionsRequest {
            coordinates: [[from.lng, from.lat], [to.lng, to.lat]],
        };
        let response = match self
            .client
            .post(&url)
            .header("Authorization", api_key)
            .json(&body)
            .send()
            .await
        {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                warn!(mode, status = %r.status(), "Directions request failed");
                return None;
            }
            Err(e) => {
                warn!(mode, "Directions request failed: {e}");
                return None;
            }
        };
        let directions = match response.json::<DirectionsResponse>().await {
            Ok(d) => d,
            Err(e) => {
                warn!(mode, "Unreadable directions response: {e}");
                return None;
            }
        };
        let summary = directions.routes.into_iter().next()?.summary;
        Some(TravelMode {
            mode: display_mode(mode),
            duration: (summary.duration / 60.0).round() as i64,
            distance: summary.distance.round() as i64,
        })
    }
}
