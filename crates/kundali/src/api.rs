//! Transport-agnostic handlers for the `ping`, `calculate` and `now`
//! endpoints.
//!
//! Every handler answers with an [`ApiResponse`]: a status code and a JSON
//! body. Client mistakes get a 400 with details; every other failure is
//! logged and answered with an opaque 500.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use chrono::{DateTime, Timelike, Utc};
use serde_json::{json, Value};

use crate::chart::assembler::{assemble, assemble_at};
use crate::chart::request::{parse_vargas, validate_locality, ChartRequest};
use crate::chart::response::ChartResponse;
use crate::chart::settings::ChartSettings;
use crate::ephemeris::Ephemeris;
use crate::error::{ChartError, RequestError};
use crate::timezone::{resolve_zone_at, DstCorrection, Moment, ZoneLookup};

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.status == 200
    }

    fn client_error(err: &RequestError) -> Self {
        let body = match err {
            RequestError::MissingParameters(missing) => json!({
                "error": "Missing required parameters",
                "details": { "missing": missing },
            }),
            RequestError::InvalidParameter { name, reason } => json!({
                "error": "Invalid parameter",
                "details": { "parameter": name, "reason": reason },
            }),
        };
        Self { status: 400, body }
    }

    fn internal_error() -> Self {
        Self {
            status: 500,
            body: json!({ "error": "An internal error occurred" }),
        }
    }
}

/// Owns the external collaborators and the chart defaults.
pub struct ChartService {
    ephemeris: Box<dyn Ephemeris + Send + Sync>,
    zones: Box<dyn ZoneLookup + Send + Sync>,
    settings: ChartSettings,
}

impl ChartService {
    pub fn new(
        ephemeris: Box<dyn Ephemeris + Send + Sync>,
        zones: Box<dyn ZoneLookup + Send + Sync>,
        settings: ChartSettings,
    ) -> Self {
        Self {
            ephemeris,
            zones,
            settings,
        }
    }

    pub fn settings(&self) -> &ChartSettings {
        &self.settings
    }

    pub fn ping(&self) -> ApiResponse {
        ApiResponse {
            status: 200,
            body: json!({ "pong": "success" }),
        }
    }

    /// Chart for a decoded query map.
    pub fn calculate(&self, query: &BTreeMap<String, String>) -> ApiResponse {
        log::info!("Calculate chart requested");
        let started = Instant::now();
        let result = ChartRequest::from_query(query, &self.settings)
            .map_err(ChartError::from)
            .and_then(|request| assemble(self.ephemeris.as_ref(), self.zones.as_ref(), &request));
        respond(result, started)
    }

    /// Chart for a raw `key=value&...` query string.
    pub fn calculate_query(&self, raw: &str) -> ApiResponse {
        self.calculate(&parse_query(raw))
    }

    /// Chart for the current wall clock.
    pub fn now(&self, latitude: Option<&str>, longitude: Option<&str>, time_zone: Option<&str>) -> ApiResponse {
        self.now_at(Utc::now(), latitude, longitude, time_zone)
    }

    /// Chart for `instant` with the configured current-moment defaults.
    pub fn now_at(
        &self,
        instant: DateTime<Utc>,
        latitude: Option<&str>,
        longitude: Option<&str>,
        time_zone: Option<&str>,
    ) -> ApiResponse {
        log::info!("Current chart requested");
        let started = Instant::now();
        let result = self
            .now_request(instant, latitude, longitude, time_zone)
            .map_err(ChartError::from)
            .and_then(|(request, moment)| assemble_at(self.ephemeris.as_ref(), moment, &request));
        respond(result, started)
    }

    fn now_request(
        &self,
        instant: DateTime<Utc>,
        latitude: Option<&str>,
        longitude: Option<&str>,
        time_zone: Option<&str>,
    ) -> Result<(ChartRequest, Moment), RequestError> {
        let defaults = &self.settings.now;
        let latitude = coordinate("latitude", latitude, defaults.latitude)?;
        let longitude = coordinate("longitude", longitude, defaults.longitude)?;
        let locality = validate_locality(latitude, longitude)?;

        let explicit = time_zone
            .map(str::trim)
            .filter(|zone| !zone.is_empty())
            .map(str::to_string)
            .or_else(|| defaults.time_zone.clone());
        let instant = instant.with_nanosecond(0).unwrap_or(instant);
        let zone = resolve_zone_at(self.zones.as_ref(), explicit.as_deref(), latitude, longitude, instant);
        let civil = instant.with_timezone(&zone.offset).naive_local();

        let request = ChartRequest {
            locality,
            civil,
            time_zone: Some(zone.id.clone()),
            dst: DstCorrection::default(),
            vargas: parse_vargas(defaults.vargas.iter().map(String::as_str))?,
            nesting: defaults.nesting.min(self.settings.nesting_limit()),
            info: BTreeSet::new(),
        };
        Ok((request, Moment::from_utc(instant, zone)))
    }
}

fn coordinate(name: &str, raw: Option<&str>, default: f64) -> Result<f64, RequestError> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => value
            .parse()
            .map_err(|_| RequestError::invalid(name, format!("'{}' is not a valid number", value))),
        None => Ok(default),
    }
}

fn respond(result: Result<ChartResponse, ChartError>, started: Instant) -> ApiResponse {
    let chart = result.and_then(|chart| serde_json::to_value(&chart).map_err(ChartError::from));
    match chart {
        Ok(chart) => {
            let elapsed = (started.elapsed().as_secs_f64() * 1000.0).round() / 1000.0;
            log::info!("Returning chart after {:.3}s", elapsed);
            ApiResponse {
                status: 200,
                body: json!({
                    "chart": chart,
                    "duration_of_response": elapsed,
                    "created_at": Utc::now().to_rfc3339(),
                }),
            }
        }
        Err(ChartError::Request(e)) => {
            log::warn!("Rejected request: {}", e);
            ApiResponse::client_error(&e)
        }
        Err(e) => {
            log::error!("An error occurred: {}", e);
            ApiResponse::internal_error()
        }
    }
}

/// Decode a `key=value&...` query string. `+` decodes to a space and the
/// last occurrence of a key wins.
pub fn parse_query(raw: &str) -> BTreeMap<String, String> {
    raw.trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(key), decode_component(value))
        })
        .collect()
}

fn decode_component(component: &str) -> String {
    let spaced = component.replace('+', " ");
    let decoded = urlencoding::decode(&spaced).map(|text| text.into_owned());
    decoded.unwrap_or(spaced)
}
