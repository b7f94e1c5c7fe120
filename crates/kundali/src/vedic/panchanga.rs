//! Panchanga: the five limbs of the Hindu almanac (tithi, vara, nakshatra,
//! yoga, karana) plus the hora and yama divisions of the day.
//!
//! Vara, hora and yama depend on sunrise. When the ephemeris cannot supply
//! rising times, vara falls back to the civil weekday and the hora and yama
//! sequences are left out.

use chrono::{DateTime, Datelike, Duration, Timelike, Utc};
use serde::Serialize;

use crate::ephemeris::RisingTimes;
use crate::vedic::graha::{normalize_degrees, Graha};
use crate::vedic::nakshatra::{nakshatra_for_longitude, NakshatraPlacement, NAKSHATRA_SEGMENT_SIZE};
use crate::vedic::types::ChartData;

pub const TITHI_SPAN: f64 = 12.0;
pub const KARANA_SPAN: f64 = 6.0;

/// Weekday lords, Sunday first.
pub const WEEKDAY_LORDS: [Graha; 7] = [
    Graha::Sun,
    Graha::Moon,
    Graha::Mars,
    Graha::Mercury,
    Graha::Jupiter,
    Graha::Venus,
    Graha::Saturn,
];

/// Descending order of orbital period; successive horas follow it.
pub const CHALDEAN_ORDER: [Graha; 7] = [
    Graha::Saturn,
    Graha::Jupiter,
    Graha::Mars,
    Graha::Sun,
    Graha::Venus,
    Graha::Mercury,
    Graha::Moon,
];

const VARA_NAMES: [&str; 7] = [
    "Ravivara",
    "Somavara",
    "Mangalavara",
    "Budhavara",
    "Guruvara",
    "Shukravara",
    "Shanivara",
];

const TITHI_NAMES: [&str; 15] = [
    "Pratipada",
    "Dvitiya",
    "Tritiya",
    "Chaturthi",
    "Panchami",
    "Shashthi",
    "Saptami",
    "Ashtami",
    "Navami",
    "Dashami",
    "Ekadashi",
    "Dvadashi",
    "Trayodashi",
    "Chaturdashi",
    "Purnima",
];

const YOGA_NAMES: [&str; 27] = [
    "Vishkambha",
    "Priti",
    "Ayushman",
    "Saubhagya",
    "Shobhana",
    "Atiganda",
    "Sukarma",
    "Dhriti",
    "Shula",
    "Ganda",
    "Vriddhi",
    "Dhruva",
    "Vyaghata",
    "Harshana",
    "Vajra",
    "Siddhi",
    "Vyatipata",
    "Variyan",
    "Parigha",
    "Shiva",
    "Siddha",
    "Sadhya",
    "Shubha",
    "Shukla",
    "Brahma",
    "Indra",
    "Vaidhriti",
];

const MOVABLE_KARANAS: [&str; 7] = ["Bava", "Balava", "Kaulava", "Taitila", "Gara", "Vanija", "Vishti"];

/// Assumed civil hour of sunrise when no rising times are known.
const MEAN_SUNRISE_HOUR: f64 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Paksha {
    Shukla,
    Krishna,
}

#[derive(Debug, Clone, Serialize)]
pub struct Tithi {
    pub number: u8,
    pub name: &'static str,
    pub paksha: Paksha,
    /// Fraction of the tithi still to run, 0..=1.
    pub remaining: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Vara {
    /// 1 = Sunday .. 7 = Saturday.
    pub number: u8,
    pub name: &'static str,
    pub lord: Graha,
}

#[derive(Debug, Clone, Serialize)]
pub struct PanchangaYoga {
    pub number: u8,
    pub name: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Karana {
    /// Half-tithi index, 1..=60.
    pub number: u8,
    pub name: &'static str,
}

/// One hora or yama.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSlot {
    pub lord: Graha,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Panchanga {
    pub tithi: Tithi,
    pub vara: Vara,
    pub nakshatra: NakshatraPlacement,
    pub yoga: PanchangaYoga,
    pub karana: Karana,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rising: Option<RisingTimes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hora: Option<Vec<TimeSlot>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yama: Option<Vec<TimeSlot>>,
}

/// Whether the chart moment is in daytime, and how far through the day or
/// night it is (0..1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayDivision {
    pub is_day: bool,
    pub fraction: f64,
}

pub fn tithi(chart: &ChartData) -> Tithi {
    let elongation = chart.lunar_elongation();
    let number = ((elongation / TITHI_SPAN).floor() as u8).min(29) + 1;
    let remaining = 1.0 - (elongation - (number - 1) as f64 * TITHI_SPAN) / TITHI_SPAN;
    let (paksha, name) = match number {
        1..=15 => (Paksha::Shukla, TITHI_NAMES[number as usize - 1]),
        30 => (Paksha::Krishna, "Amavasya"),
        _ => (Paksha::Krishna, TITHI_NAMES[number as usize - 16]),
    };
    Tithi {
        number,
        name,
        paksha,
        remaining: remaining.clamp(0.0, 1.0),
    }
}

/// Civil weekday of the chart moment, 0 = Sunday.
fn civil_weekday(chart: &ChartData) -> usize {
    chart.moment.local().weekday().num_days_from_sunday() as usize
}

/// Weekday of the Vedic day: a moment before sunrise belongs to the
/// previous day.
pub fn vara(chart: &ChartData) -> Vara {
    let mut weekday = civil_weekday(chart);
    if let Some(rising) = &chart.rising {
        if chart.moment.utc() < rising.sunrise {
            weekday = (weekday + 6) % 7;
        }
    }
    Vara {
        number: weekday as u8 + 1,
        name: VARA_NAMES[weekday],
        lord: WEEKDAY_LORDS[weekday],
    }
}

pub fn yoga(chart: &ChartData) -> PanchangaYoga {
    let sum = normalize_degrees(chart.longitude(Graha::Sun) + chart.longitude(Graha::Moon));
    let index = ((sum / NAKSHATRA_SEGMENT_SIZE).floor() as usize).min(26);
    PanchangaYoga {
        number: index as u8 + 1,
        name: YOGA_NAMES[index],
    }
}

pub fn karana(chart: &ChartData) -> Karana {
    let number = ((chart.lunar_elongation() / KARANA_SPAN).floor() as u8).min(59) + 1;
    let name = match number {
        1 => "Kimstughna",
        58 => "Shakuni",
        59 => "Chatushpada",
        60 => "Naga",
        n => MOVABLE_KARANAS[(n as usize - 2) % 7],
    };
    Karana { number, name }
}

fn chaldean_index(graha: Graha) -> usize {
    CHALDEAN_ORDER
        .iter()
        .position(|g| *g == graha)
        .unwrap_or_default()
}

/// Lord of the hora `offset` horas after the sunrise of a day ruled by
/// `day_lord`. Negative offsets reach back into the previous night.
pub fn hora_lord(day_lord: Graha, offset: i64) -> Graha {
    CHALDEAN_ORDER[(chaldean_index(day_lord) as i64 + offset).rem_euclid(7) as usize]
}

fn split(start: DateTime<Utc>, end: DateTime<Utc>, parts: i64, lords: impl Fn(i64) -> Graha) -> Vec<TimeSlot> {
    let span = (end - start).num_milliseconds();
    (0..parts)
        .map(|k| TimeSlot {
            lord: lords(k),
            start: start + Duration::milliseconds(span * k / parts),
            end: start + Duration::milliseconds(span * (k + 1) / parts),
        })
        .collect()
}

/// Twelve day horas from sunrise and twelve night horas from sunset.
pub fn hora_sequence(rising: &RisingTimes, day_lord: Graha) -> Vec<TimeSlot> {
    let mut slots = split(rising.sunrise, rising.sunset, 12, |k| hora_lord(day_lord, k));
    slots.extend(split(rising.sunset, rising.next_sunrise, 12, |k| {
        hora_lord(day_lord, 12 + k)
    }));
    slots
}

/// Eight day yamas starting at the day lord in weekday order, and eight
/// night yamas starting at the lord of the fifth weekday.
pub fn yama_sequence(rising: &RisingTimes, day_lord: Graha) -> Vec<TimeSlot> {
    let first = day_lord.index() as i64;
    let weekday_lord = |k: i64| WEEKDAY_LORDS[(first + k).rem_euclid(7) as usize];
    let mut slots = split(rising.sunrise, rising.sunset, 8, weekday_lord);
    slots.extend(split(rising.sunset, rising.next_sunrise, 8, |k| weekday_lord(4 + k)));
    slots
}

/// Hora lord at the chart moment.
///
/// Horas before sunrise are counted backwards with the night length. Without
/// rising times, horas are taken as clock hours from a 06:00 sunrise.
pub fn current_hora_lord(chart: &ChartData) -> Graha {
    let day_lord = WEEKDAY_LORDS[civil_weekday(chart)];
    let instant = chart.moment.utc();
    let offset = match &chart.rising {
        Some(rising) => {
            let day = (rising.sunset - rising.sunrise).num_milliseconds().max(1) as f64 / 12.0;
            let night = (rising.next_sunrise - rising.sunset).num_milliseconds().max(1) as f64 / 12.0;
            if instant < rising.sunrise {
                let before = (rising.sunrise - instant).num_milliseconds() as f64;
                -((before / night).ceil() as i64)
            } else if instant < rising.sunset {
                ((instant - rising.sunrise).num_milliseconds() as f64 / day).floor() as i64
            } else {
                12 + ((instant - rising.sunset).num_milliseconds() as f64 / night).floor() as i64
            }
        }
        None => {
            let local = chart.moment.local();
            let hours = local.hour() as f64 + local.minute() as f64 / 60.0 + local.second() as f64 / 3600.0;
            (hours - MEAN_SUNRISE_HOUR).floor() as i64
        }
    };
    hora_lord(day_lord, offset)
}

/// Day or night at the chart moment.
///
/// Uses rising times when present; otherwise the Sun is above the horizon
/// when it lies within the half of the zodiac that has risen past the
/// ascendant.
pub fn day_division(chart: &ChartData) -> DayDivision {
    let instant = chart.moment.utc();
    if let Some(rising) = &chart.rising {
        let fraction = |from: DateTime<Utc>, to: DateTime<Utc>, at: DateTime<Utc>| {
            let span = (to - from).num_milliseconds().max(1) as f64;
            ((at - from).num_milliseconds() as f64 / span).clamp(0.0, 1.0)
        };
        let night = rising.next_sunrise - rising.sunset;
        return if instant < rising.sunrise {
            DayDivision {
                is_day: false,
                fraction: fraction(rising.sunrise - night, rising.sunrise, instant),
            }
        } else if instant < rising.sunset {
            DayDivision {
                is_day: true,
                fraction: fraction(rising.sunrise, rising.sunset, instant),
            }
        } else {
            DayDivision {
                is_day: false,
                fraction: fraction(rising.sunset, rising.next_sunrise, instant),
            }
        };
    }

    let behind = normalize_degrees(chart.ascendant - chart.longitude(Graha::Sun));
    if behind < 180.0 {
        DayDivision {
            is_day: true,
            fraction: behind / 180.0,
        }
    } else {
        DayDivision {
            is_day: false,
            fraction: (behind - 180.0) / 180.0,
        }
    }
}

pub fn compute_panchanga(chart: &ChartData) -> Panchanga {
    let civil_lord = WEEKDAY_LORDS[civil_weekday(chart)];
    let hora = chart.rising.as_ref().map(|r| hora_sequence(r, civil_lord));
    let yama = chart.rising.as_ref().map(|r| yama_sequence(r, civil_lord));
    if hora.is_none() {
        log::debug!("No rising times; panchanga without hora and yama");
    }
    Panchanga {
        tithi: tithi(chart),
        vara: vara(chart),
        nakshatra: nakshatra_for_longitude(chart.longitude(Graha::Moon)),
        yoga: yoga(chart),
        karana: karana(chart),
        rising: chart.rising,
        hora,
        yama,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vedic::types::fixtures::chart_with;
    use chrono::TimeZone;

    fn rising() -> RisingTimes {
        RisingTimes {
            sunrise: Utc.with_ymd_and_hms(2023, 12, 25, 1, 40, 0).unwrap(),
            sunset: Utc.with_ymd_and_hms(2023, 12, 25, 11, 59, 0).unwrap(),
            next_sunrise: Utc.with_ymd_and_hms(2023, 12, 26, 1, 40, 0).unwrap(),
        }
    }

    #[test]
    fn test_tithi_and_paksha() {
        // Elongation 155 degrees: 13th tithi of the bright half.
        let chart = chart_with(0.0, [249.2, 44.2, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 180.0]);
        let t = tithi(&chart);
        assert_eq!(t.number, 13);
        assert_eq!(t.paksha, Paksha::Shukla);
        assert_eq!(t.name, "Trayodashi");
        assert!((t.remaining - (1.0 - 11.0 / 12.0)).abs() < 1e-6);

        let new_moon = chart_with(0.0, [100.0, 95.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 180.0]);
        let t = tithi(&new_moon);
        assert_eq!(t.number, 30);
        assert_eq!(t.name, "Amavasya");
        assert_eq!(t.paksha, Paksha::Krishna);
    }

    #[test]
    fn test_karana_fixed_names() {
        let first = chart_with(0.0, [100.0, 103.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 180.0]);
        assert_eq!(karana(&first).name, "Kimstughna");
        let second = chart_with(0.0, [100.0, 107.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 180.0]);
        assert_eq!(karana(&second).name, "Bava");
        let last = chart_with(0.0, [100.0, 98.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 180.0]);
        assert_eq!(karana(&last).number, 60);
        assert_eq!(karana(&last).name, "Naga");
    }

    #[test]
    fn test_yoga_index() {
        // Sun + Moon = 293.4 degrees, just past the start of the 23rd yoga.
        let chart = chart_with(0.0, [249.2, 44.2, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 180.0]);
        let y = yoga(&chart);
        assert_eq!(y.number, 23);
        assert_eq!(y.name, "Shubha");
    }

    #[test]
    fn test_vara_uses_sunrise() {
        // 2023-12-25 is a Monday; 06:30 UTC is after sunrise.
        let chart = chart_with(0.0, [249.2, 44.2, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 180.0]);
        assert_eq!(vara(&chart).lord, Graha::Moon);
        let with_rising = chart.clone().with_rising(RisingTimes {
            sunrise: Utc.with_ymd_and_hms(2023, 12, 25, 7, 0, 0).unwrap(),
            ..rising()
        });
        let v = vara(&with_rising);
        assert_eq!(v.lord, Graha::Sun);
        assert_eq!(v.name, "Ravivara");
    }

    #[test]
    fn test_hora_sequence() {
        let slots = hora_sequence(&rising(), Graha::Moon);
        assert_eq!(slots.len(), 24);
        assert_eq!(slots[0].lord, Graha::Moon);
        assert_eq!(slots[1].lord, Graha::Saturn);
        assert_eq!(slots[2].lord, Graha::Jupiter);
        assert_eq!(slots[0].start, rising().sunrise);
        assert_eq!(slots[11].end, rising().sunset);
        assert_eq!(slots[23].end, rising().next_sunrise);
        // The hora after the last one is the next day's lord.
        assert_eq!(hora_lord(Graha::Moon, 24), Graha::Mars);
    }

    #[test]
    fn test_yama_sequence() {
        let slots = yama_sequence(&rising(), Graha::Moon);
        assert_eq!(slots.len(), 16);
        assert_eq!(slots[0].lord, Graha::Moon);
        assert_eq!(slots[1].lord, Graha::Mars);
        assert_eq!(slots[7].lord, Graha::Moon);
        assert_eq!(slots[8].lord, Graha::Venus);
    }

    #[test]
    fn test_current_hora_and_day_division() {
        let chart = chart_with(328.0, [249.2, 44.2, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 180.0]).with_rising(rising());
        // 06:30 is 4h50m after a 10h19m day started: the 6th hora (index 5).
        assert_eq!(current_hora_lord(&chart), hora_lord(Graha::Moon, 5));
        let division = day_division(&chart);
        assert!(division.is_day);
        assert!(division.fraction > 0.4 && division.fraction < 0.5);
    }

    #[test]
    fn test_panchanga_without_rising() {
        let chart = chart_with(0.0, [249.2, 44.2, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 180.0]);
        let p = compute_panchanga(&chart);
        assert!(p.hora.is_none());
        assert!(p.yama.is_none());
        assert_eq!(p.nakshatra.base.lord, Graha::Moon);
        let json = serde_json::to_value(&p).unwrap();
        assert!(json.get("hora").is_none());
        assert_eq!(json["tithi"]["paksha"], "shukla");
    }
}
