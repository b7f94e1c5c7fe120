#![allow(dead_code)]

use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};
use kundali::ephemeris::{Locality, RawPosition, RisingTimes};
use kundali::timezone::{Moment, ResolvedZone};
use kundali::vedic::{ChartData, Graha};
use kundali::{ChartService, ChartSettings, FixedEphemeris, FixedZoneLookup};

/// Sidereal positions for New Delhi, 2023-12-25 12:00 IST.
pub const DELHI_POSITIONS: [(Graha, f64, f64); 8] = [
    (Graha::Sun, 249.2, 1.02),
    (Graha::Moon, 44.2, 13.2),
    (Graha::Mars, 235.0, 0.7),
    (Graha::Mercury, 244.0, -0.5),
    (Graha::Jupiter, 11.4, -0.03),
    (Graha::Venus, 208.0, 1.2),
    (Graha::Saturn, 310.0, 0.1),
    (Graha::Rahu, 355.0, -0.053),
];

pub const DELHI_ASCENDANT: f64 = 328.0;

pub fn delhi_rising() -> RisingTimes {
    RisingTimes {
        sunrise: Utc.with_ymd_and_hms(2023, 12, 25, 1, 40, 0).unwrap(),
        sunset: Utc.with_ymd_and_hms(2023, 12, 25, 11, 59, 0).unwrap(),
        next_sunrise: Utc.with_ymd_and_hms(2023, 12, 26, 1, 40, 0).unwrap(),
    }
}

pub fn delhi_ephemeris() -> FixedEphemeris {
    DELHI_POSITIONS
        .iter()
        .fold(FixedEphemeris::new(DELHI_ASCENDANT), |eph, (graha, lon, speed)| {
            eph.with_position(*graha, *lon, *speed, 0.0)
        })
        .with_ayanamsa(24.19)
        .with_rising(delhi_rising())
}

pub fn delhi_query(extra: &[(&str, &str)]) -> BTreeMap<String, String> {
    let base = [
        ("latitude", "28.6139"),
        ("longitude", "77.2090"),
        ("year", "2023"),
        ("month", "12"),
        ("day", "25"),
        ("hour", "12"),
        ("min", "0"),
        ("sec", "0"),
    ];
    base.iter()
        .chain(extra.iter())
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn delhi_service() -> ChartService {
    ChartService::new(
        Box::new(delhi_ephemeris()),
        Box::new(FixedZoneLookup::new("Asia/Kolkata")),
        ChartSettings::default(),
    )
}

/// Chart snapshot at the Delhi moment with the given longitudes (Sun..Ketu).
pub fn chart_with(ascendant: f64, longitudes: [f64; 9]) -> ChartData {
    let instant = Utc.with_ymd_and_hms(2023, 12, 25, 6, 30, 0).unwrap();
    let moment = Moment::from_utc(instant, ResolvedZone::utc());
    let positions = longitudes.map(|longitude| RawPosition {
        longitude,
        speed: 1.0,
        declination: 0.0,
    });
    ChartData::from_positions(moment, Locality::new(28.6139, 77.2090), ascendant, positions)
}
