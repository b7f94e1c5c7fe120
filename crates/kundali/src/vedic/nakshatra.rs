//! Nakshatra utilities.
//!
//! Nakshatras are 27 lunar mansions, each spanning 13°20' (360/27 degrees).
//! Each nakshatra is divided into 4 padas (quarters).

use serde::{Deserialize, Serialize};

use crate::vedic::graha::{normalize_degrees, Graha};

pub const NAKSHATRA_COUNT: usize = 27;
pub const NAKSHATRA_SEGMENT_SIZE: f64 = 360.0 / 27.0;
pub const PADA_SIZE: f64 = NAKSHATRA_SEGMENT_SIZE / 4.0;

// (slug, display_name, dasha lord)
pub const NAKSHATRA_ORDER: &[(&str, &str, Graha)] = &[
    ("ashwini", "Ashwini", Graha::Ketu),
    ("bharani", "Bharani", Graha::Venus),
    ("krittika", "Krittika", Graha::Sun),
    ("rohini", "Rohini", Graha::Moon),
    ("mrigashira", "Mrigashira", Graha::Mars),
    ("ardra", "Ardra", Graha::Rahu),
    ("punarvasu", "Punarvasu", Graha::Jupiter),
    ("pushya", "Pushya", Graha::Saturn),
    ("ashlesha", "Ashlesha", Graha::Mercury),
    ("magha", "Magha", Graha::Ketu),
    ("purva_phalguni", "Purva Phalguni", Graha::Venus),
    ("uttara_phalguni", "Uttara Phalguni", Graha::Sun),
    ("hasta", "Hasta", Graha::Moon),
    ("chitra", "Chitra", Graha::Mars),
    ("swati", "Swati", Graha::Rahu),
    ("vishakha", "Vishakha", Graha::Jupiter),
    ("anuradha", "Anuradha", Graha::Saturn),
    ("jyeshtha", "Jyeshtha", Graha::Mercury),
    ("mula", "Mula", Graha::Ketu),
    ("purva_ashadha", "Purva Ashadha", Graha::Venus),
    ("uttara_ashadha", "Uttara Ashadha", Graha::Sun),
    ("shravana", "Shravana", Graha::Moon),
    ("dhanishta", "Dhanishta", Graha::Mars),
    ("shatabhisha", "Shatabhisha", Graha::Rahu),
    ("purva_bhadrapada", "Purva Bhadrapada", Graha::Jupiter),
    ("uttara_bhadrapada", "Uttara Bhadrapada", Graha::Saturn),
    ("revati", "Revati", Graha::Mercury),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseNakshatraRecord {
    pub id: String,
    pub name: String,
    pub lord: Graha,
    pub start: f64,
    pub end: f64,
    /// 1-based position in the zodiac, Ashwini = 1.
    pub number: usize,
}

/// Nakshatra placement of a single longitude.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NakshatraPlacement {
    #[serde(flatten)]
    pub base: BaseNakshatraRecord,
    /// Degrees travelled inside the nakshatra.
    pub offset: f64,
    /// Fraction of the nakshatra already travelled, 0..1.
    pub progress: f64,
    pub pada: u8,
    #[serde(rename = "padaFraction")]
    pub pada_fraction: f64,
}

fn build_nakshatra_table() -> Vec<BaseNakshatraRecord> {
    NAKSHATRA_ORDER
        .iter()
        .enumerate()
        .map(|(idx, (slug, display_name, lord))| {
            let start = idx as f64 * NAKSHATRA_SEGMENT_SIZE;
            BaseNakshatraRecord {
                id: slug.to_string(),
                name: display_name.to_string(),
                lord: *lord,
                start,
                end: start + NAKSHATRA_SEGMENT_SIZE,
                number: idx + 1,
            }
        })
        .collect()
}

lazy_static::lazy_static! {
    static ref NAKSHATRA_TABLE: Vec<BaseNakshatraRecord> = build_nakshatra_table();
}

/// Return the nakshatra containing the given sidereal longitude.
pub fn nakshatra_for_longitude(longitude: f64) -> NakshatraPlacement {
    let lon = normalize_degrees(longitude);
    let index = ((lon / NAKSHATRA_SEGMENT_SIZE) as usize).min(NAKSHATRA_COUNT - 1);
    let entry = &NAKSHATRA_TABLE[index];

    let offset = (lon - entry.start).max(0.0);
    let pada = ((offset / PADA_SIZE) as u8).min(3) + 1;
    let pada_offset = offset - (pada - 1) as f64 * PADA_SIZE;

    NakshatraPlacement {
        base: entry.clone(),
        offset,
        progress: (offset / NAKSHATRA_SEGMENT_SIZE).min(1.0),
        pada,
        pada_fraction: pada_offset / PADA_SIZE,
    }
}

/// Dasha lord of the nakshatra with the given 1-based number.
pub fn lord_of_number(number: usize) -> Graha {
    NAKSHATRA_ORDER[(number.max(1) - 1) % NAKSHATRA_COUNT].2
}
