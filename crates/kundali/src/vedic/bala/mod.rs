//! Composite strength scoring in virupas (1/60 rupa).

pub mod graha_bala;
pub mod rashi_bala;

pub use graha_bala::{compute_graha_bala, GrahaBala, KalaBala, SthanaBala};
pub use rashi_bala::{compute_rashi_bala, RashiBala};

use crate::vedic::graha::{normalize_degrees, Graha};
use crate::vedic::types::ChartData;

/// Elongation beyond which the Moon counts as a benefic.
const BRIGHT_MOON_PHASE: f64 = 72.0;

/// Aspect strength of a full-sight graha at the given forward distance
/// (target minus source, 0..360).
pub fn base_virupa(distance: f64) -> f64 {
    let a = normalize_degrees(distance);
    if a < 30.0 {
        0.0
    } else if a < 90.0 {
        (a - 30.0) * 0.75
    } else if a < 150.0 {
        45.0 - (a - 90.0) * 0.75
    } else if a < 180.0 {
        (a - 150.0) * 2.0
    } else if a < 300.0 {
        60.0 - (a - 180.0) * 0.5
    } else {
        0.0
    }
}

/// Extra strength of the special aspects of Mars, Jupiter and Saturn.
pub fn special_virupa(graha: Graha, distance: f64) -> f64 {
    let a = normalize_degrees(distance);
    let within = |ranges: [(f64, f64); 2]| ranges.iter().any(|(lo, hi)| a >= *lo && a < *hi);
    match graha {
        Graha::Mars if within([(90.0, 120.0), (210.0, 240.0)]) => 15.0,
        Graha::Jupiter if within([(120.0, 150.0), (240.0, 270.0)]) => 30.0,
        Graha::Saturn if within([(60.0, 90.0), (270.0, 300.0)]) => 45.0,
        _ => 0.0,
    }
}

pub fn drishti_virupa(source: Graha, source_longitude: f64, target_longitude: f64) -> f64 {
    let distance = normalize_degrees(target_longitude - source_longitude);
    base_virupa(distance) + special_virupa(source, distance)
}

/// Directional strength: 60 in the strong house, falling by 10 per house of
/// distance to 0 in the opposite house.
pub(crate) fn dig_strength(house: u8, strong_house: u8) -> f64 {
    let diff = (house as i16 - strong_house as i16).unsigned_abs();
    let distance = diff.min(12 - diff).min(6);
    60.0 * (1.0 - distance as f64 / 6.0)
}

/// Benefic nature for the chart: the Moon (and Mercury with it) is benefic
/// only when bright; the nodes are malefic.
pub(crate) fn acts_as_benefic(chart: &ChartData, graha: Graha) -> bool {
    match graha {
        Graha::Moon | Graha::Mercury => {
            let elongation = chart.lunar_elongation();
            let phase = if elongation <= 180.0 { elongation } else { 360.0 - elongation };
            phase >= BRIGHT_MOON_PHASE
        }
        other => other.is_natural_benefic(),
    }
}

/// Net aspect virupas received at a longitude from the seven visible grahas
/// other than `exclude`, divided by four. The nodes cast no aspect here.
pub(crate) fn net_drishti(chart: &ChartData, target_longitude: f64, exclude: Option<Graha>) -> f64 {
    let (benefic, malefic) = Graha::SAPTA
        .iter()
        .copied()
        .filter(|g| Some(*g) != exclude)
        .fold((0.0, 0.0), |(benefic, malefic), source| {
            let virupa = drishti_virupa(source, chart.longitude(source), target_longitude);
            if acts_as_benefic(chart, source) {
                (benefic + virupa, malefic)
            } else {
                (benefic, malefic + virupa)
            }
        });
    (benefic - malefic) / 4.0
}
