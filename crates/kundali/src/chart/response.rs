use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;

use crate::timezone::Moment;
use crate::vedic::ashtakavarga::Ashtakavarga;
use crate::vedic::bala::{GrahaBala, RashiBala};
use crate::vedic::dashas::Vimshottari;
use crate::vedic::graha::{Graha, LAGNA_KEY};
use crate::vedic::nakshatra::NakshatraPlacement;
use crate::vedic::panchanga::Panchanga;
use crate::vedic::state::GrahaState;
use crate::vedic::vargas::{Placement, VargaCode};
use crate::vedic::yogas::YogaMatch;

/// Time reference the chart was computed for.
#[derive(Debug, Clone, Serialize)]
pub struct MomentInfo {
    pub zone: String,
    pub offset: String,
    pub local: DateTime<FixedOffset>,
    pub utc: DateTime<Utc>,
}

impl From<&Moment> for MomentInfo {
    fn from(moment: &Moment) -> Self {
        Self {
            zone: moment.zone().to_string(),
            offset: moment.offset().to_string(),
            local: moment.local(),
            utc: moment.utc(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GrahaEntry {
    pub longitude: f64,
    pub speed: f64,
    pub declination: f64,
    pub retrograde: bool,
    pub rashi: u8,
    pub degree: f64,
    pub bhava: u8,
    pub varga: BTreeMap<VargaCode, Placement>,
    pub nakshatra: NakshatraPlacement,
    /// Attributes switched on by the info level; absent ones are omitted.
    #[serde(flatten)]
    pub state: GrahaState,
}

#[derive(Debug, Clone, Serialize)]
pub struct LagnaEntry {
    pub longitude: f64,
    pub rashi: u8,
    pub degree: f64,
    pub varga: BTreeMap<VargaCode, Placement>,
    pub nakshatra: NakshatraPlacement,
    /// Ascendant in the mrityu bhaga of its sign.
    pub mrityu: bool,
}

/// One whole-sign house of the rashi chart.
#[derive(Debug, Clone, Serialize)]
pub struct BhavaEntry {
    pub rashi: u8,
    pub lord: Graha,
    pub grahas: Vec<Graha>,
}

/// Merged output of one chart computation.
///
/// Optional sections are present only when their info level was requested.
#[derive(Debug, Clone, Serialize)]
pub struct ChartResponse {
    pub moment: MomentInfo,
    pub graha: BTreeMap<Graha, GrahaEntry>,
    pub lagna: BTreeMap<&'static str, LagnaEntry>,
    pub bhava: BTreeMap<u8, BhavaEntry>,
    pub dasha: Vimshottari,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub panchanga: Option<Panchanga>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ashtakavarga: Option<Ashtakavarga>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grahabala: Option<BTreeMap<Graha, GrahaBala>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rashibala: Option<Vec<RashiBala>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yogas: Option<Vec<YogaMatch>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ayanamsa: Option<f64>,
}

impl ChartResponse {
    pub fn graha(&self, graha: Graha) -> Option<&GrahaEntry> {
        self.graha.get(&graha)
    }

    pub fn lagna(&self) -> Option<&LagnaEntry> {
        self.lagna.get(LAGNA_KEY)
    }
}
