//! A precomputed position table used as an ephemeris.
//!
//! Useful offline and in tests: the same positions are returned for every
//! instant and locality.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ephemeris::adapter::Ephemeris;
use crate::ephemeris::types::{Locality, RawPosition, RisingTimes};
use crate::error::EphemerisError;
use crate::vedic::graha::{normalize_degrees, Graha};

/// On-disk layout, positions keyed by graha key (`Sy`, `Ch`, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
struct FixedTable {
    ascendant: f64,
    #[serde(default)]
    ayanamsa: Option<f64>,
    #[serde(default)]
    positions: BTreeMap<String, RawPosition>,
    #[serde(default)]
    rising: Option<RisingTimes>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FixedEphemeris {
    ascendant: f64,
    ayanamsa: Option<f64>,
    positions: [Option<RawPosition>; 9],
    rising: Option<RisingTimes>,
}

impl FixedEphemeris {
    pub fn new(ascendant: f64) -> Self {
        Self {
            ascendant: normalize_degrees(ascendant),
            ayanamsa: None,
            positions: [None; 9],
            rising: None,
        }
    }

    pub fn with_position(mut self, graha: Graha, longitude: f64, speed: f64, declination: f64) -> Self {
        self.positions[graha.index()] = Some(RawPosition {
            longitude: normalize_degrees(longitude),
            speed,
            declination,
        });
        self
    }

    pub fn with_ayanamsa(mut self, ayanamsa: f64) -> Self {
        self.ayanamsa = Some(ayanamsa);
        self
    }

    pub fn with_rising(mut self, rising: RisingTimes) -> Self {
        self.rising = Some(rising);
        self
    }

    pub fn from_toml_str(text: &str) -> Result<Self, EphemerisError> {
        let table: FixedTable = toml::from_str(text).map_err(|e| EphemerisError::Parse {
            message: e.to_string(),
        })?;
        Self::from_table(table)
    }

    pub fn from_json_str(text: &str) -> Result<Self, EphemerisError> {
        let table: FixedTable = serde_json::from_str(text).map_err(|e| EphemerisError::Parse {
            message: e.to_string(),
        })?;
        Self::from_table(table)
    }

    /// Load a `.json` or `.toml` table from disk.
    pub fn load(path: &Path) -> Result<Self, EphemerisError> {
        let text = fs::read_to_string(path).map_err(|e| EphemerisError::FileNotFound {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&text),
            _ => Self::from_toml_str(&text),
        }
    }

    fn from_table(table: FixedTable) -> Result<Self, EphemerisError> {
        let mut ephemeris = Self::new(table.ascendant);
        ephemeris.ayanamsa = table.ayanamsa;
        ephemeris.rising = table.rising;
        for (key, position) in table.positions {
            let graha = Graha::from_key(&key).ok_or_else(|| EphemerisError::Parse {
                message: format!("unknown graha key '{}'", key),
            })?;
            ephemeris = ephemeris.with_position(graha, position.longitude, position.speed, position.declination);
        }
        Ok(ephemeris)
    }
}

impl Ephemeris for FixedEphemeris {
    fn position(
        &self,
        graha: Graha,
        _instant: DateTime<Utc>,
        _locality: &Locality,
    ) -> Result<RawPosition, EphemerisError> {
        self.positions[graha.index()].ok_or(EphemerisError::MissingBody { graha })
    }

    fn ascendant(&self, _instant: DateTime<Utc>, _locality: &Locality) -> Result<f64, EphemerisError> {
        Ok(self.ascendant)
    }

    fn ayanamsa(&self, _instant: DateTime<Utc>) -> Result<f64, EphemerisError> {
        self.ayanamsa.ok_or(EphemerisError::Unsupported { what: "ayanamsa" })
    }

    fn rising(&self, _instant: DateTime<Utc>, _locality: &Locality) -> Result<RisingTimes, EphemerisError> {
        self.rising.ok_or(EphemerisError::Unsupported { what: "sunrise and sunset" })
    }
}
