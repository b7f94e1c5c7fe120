use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Geographic location of the native.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Locality {
    pub latitude: f64,
    pub longitude: f64,
    /// Metres above sea level
    #[serde(default)]
    pub altitude: f64,
}

impl Locality {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude: 0.0,
        }
    }
}

/// Raw sidereal position of one body as supplied by an ephemeris
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawPosition {
    /// Sidereal longitude in degrees (0-360)
    pub longitude: f64,
    /// Speed in longitude (degrees per day)
    #[serde(default)]
    pub speed: f64,
    /// Declination in degrees
    #[serde(default)]
    pub declination: f64,
}

/// Sunrise and sunset bounding the Vedic day that contains an instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RisingTimes {
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
    #[serde(rename = "nextSunrise")]
    pub next_sunrise: DateTime<Utc>,
}

impl RisingTimes {
    pub fn is_day(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.sunrise && instant < self.sunset
    }
}
