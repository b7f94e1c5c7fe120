//! Vimshottari dasha calculation.
//!
//! Dashas are time periods ruled by grahas, fixed by the Moon's nakshatra at
//! birth. The root sequence covers exactly 120 years: the unexpired part of
//! the birth lord's period, the eight following lords in full, and the expired
//! part of the birth lord's period to close the cycle.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::vedic::graha::Graha;
use crate::vedic::nakshatra::nakshatra_for_longitude;
use crate::vedic::types::ChartData;

pub const VIMSHOTTARI_TOTAL_YEARS: f64 = 120.0;
pub const VIMSHOTTARI_YEAR_DAYS: f64 = 365.25;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DashaLevel {
    Mahadasha,
    Antardasha,
    Pratyantardasha,
    Sookshmadasha,
    Pranadasha,
}

const DEPTH_LEVELS: [DashaLevel; 5] = [
    DashaLevel::Mahadasha,
    DashaLevel::Antardasha,
    DashaLevel::Pratyantardasha,
    DashaLevel::Sookshmadasha,
    DashaLevel::Pranadasha,
];

/// Deepest supported nesting below the root sequence.
pub const MAX_NESTING: u8 = (DEPTH_LEVELS.len() - 1) as u8;

type GrahaYears = (Graha, f64);

const VIMSHOTTARI_SEQUENCE: [GrahaYears; 9] = [
    (Graha::Ketu, 7.0),
    (Graha::Venus, 20.0),
    (Graha::Sun, 6.0),
    (Graha::Moon, 10.0),
    (Graha::Mars, 7.0),
    (Graha::Rahu, 18.0),
    (Graha::Jupiter, 16.0),
    (Graha::Saturn, 19.0),
    (Graha::Mercury, 17.0),
];

#[derive(Debug, Clone, Serialize)]
pub struct PeriodNode {
    pub graha: Graha,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(rename = "durationDays")]
    pub duration_days: f64,
    pub level: DashaLevel,
    pub children: Vec<PeriodNode>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Vimshottari {
    pub system: &'static str,
    #[serde(rename = "birthLord")]
    pub birth_lord: Graha,
    /// Years of the birth lord's period still to run at birth.
    #[serde(rename = "balanceYears")]
    pub balance_years: f64,
    pub nesting: u8,
    pub periods: Vec<PeriodNode>,
}

fn sequence_index(graha: Graha) -> usize {
    VIMSHOTTARI_SEQUENCE
        .iter()
        .position(|(g, _)| *g == graha)
        .unwrap_or_default()
}

fn offset_from(start: DateTime<Utc>, days: f64) -> DateTime<Utc> {
    start + Duration::milliseconds((days * MILLIS_PER_DAY).round() as i64)
}

/// Compute the Vimshottari tree from the Moon's longitude at the chart
/// moment. `nesting` levels of sub-periods are built below the root
/// sequence, capped at [`MAX_NESTING`].
pub fn compute_vimshottari(chart: &ChartData, nesting: u8) -> Vimshottari {
    let nesting = nesting.min(MAX_NESTING);
    let moon = nakshatra_for_longitude(chart.longitude(Graha::Moon));
    let birth_lord = moon.base.lord;
    let elapsed = moon.progress;
    let start_index = sequence_index(birth_lord);
    let birth = chart.moment.utc();

    // Year boundaries of the ten root periods, cumulative from birth.
    let (_, birth_years) = VIMSHOTTARI_SEQUENCE[start_index];
    let mut spans: Vec<GrahaYears> = Vec::with_capacity(10);
    spans.push((birth_lord, birth_years * (1.0 - elapsed)));
    for offset in 1..VIMSHOTTARI_SEQUENCE.len() {
        spans.push(VIMSHOTTARI_SEQUENCE[(start_index + offset) % VIMSHOTTARI_SEQUENCE.len()]);
    }
    spans.push((birth_lord, birth_years * elapsed));

    let mut periods = Vec::with_capacity(spans.len());
    let mut cumulative_years = 0.0;
    let mut current_start = birth;
    for (i, (graha, years)) in spans.iter().enumerate() {
        cumulative_years += years;
        let end = if i + 1 == spans.len() {
            offset_from(birth, VIMSHOTTARI_TOTAL_YEARS * VIMSHOTTARI_YEAR_DAYS)
        } else {
            offset_from(birth, cumulative_years * VIMSHOTTARI_YEAR_DAYS)
        };
        periods.push(build_period(*graha, current_start, end, 0, nesting as usize));
        current_start = end;
    }

    log::debug!(
        "Vimshottari: birth lord {:?}, {:.4} years remaining, nesting {}",
        birth_lord,
        birth_years * (1.0 - elapsed),
        nesting
    );

    Vimshottari {
        system: "vimshottari",
        birth_lord,
        balance_years: birth_years * (1.0 - elapsed),
        nesting,
        periods,
    }
}

fn build_period(
    graha: Graha,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    level_index: usize,
    nesting: usize,
) -> PeriodNode {
    let mut period = PeriodNode {
        graha,
        start,
        end,
        duration_days: (end - start).num_milliseconds() as f64 / MILLIS_PER_DAY,
        level: DEPTH_LEVELS[level_index.min(DEPTH_LEVELS.len() - 1)],
        children: Vec::new(),
    };

    if level_index >= nesting {
        return period;
    }

    let span_days = period.duration_days;
    let first = sequence_index(graha);
    let mut cumulative_years = 0.0;
    let mut child_start = start;
    for offset in 0..VIMSHOTTARI_SEQUENCE.len() {
        let (child_graha, child_years) = VIMSHOTTARI_SEQUENCE[(first + offset) % VIMSHOTTARI_SEQUENCE.len()];
        cumulative_years += child_years;
        // The last child closes exactly on the parent's end.
        let child_end = if offset + 1 == VIMSHOTTARI_SEQUENCE.len() {
            end
        } else {
            offset_from(start, span_days * cumulative_years / VIMSHOTTARI_TOTAL_YEARS)
        };
        let child = build_period(child_graha, child_start, child_end, level_index + 1, nesting);
        period.children.push(child);
        child_start = child_end;
    }

    period
}
