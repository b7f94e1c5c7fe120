use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kundali::chart::{assemble, ChartRequest, ChartSettings};
use kundali::ephemeris::RisingTimes;
use kundali::vedic::Graha;
use kundali::{FixedEphemeris, FixedZoneLookup};

fn delhi_ephemeris() -> FixedEphemeris {
    let positions = [
        (Graha::Sun, 249.2, 1.02),
        (Graha::Moon, 44.2, 13.2),
        (Graha::Mars, 235.0, 0.7),
        (Graha::Mercury, 244.0, -0.5),
        (Graha::Jupiter, 11.4, -0.03),
        (Graha::Venus, 208.0, 1.2),
        (Graha::Saturn, 310.0, 0.1),
        (Graha::Rahu, 355.0, -0.053),
    ];
    let rising = RisingTimes {
        sunrise: Utc.with_ymd_and_hms(2023, 12, 25, 1, 40, 0).unwrap(),
        sunset: Utc.with_ymd_and_hms(2023, 12, 25, 11, 59, 0).unwrap(),
        next_sunrise: Utc.with_ymd_and_hms(2023, 12, 26, 1, 40, 0).unwrap(),
    };
    positions
        .iter()
        .fold(FixedEphemeris::new(328.0), |eph, (graha, lon, speed)| {
            eph.with_position(*graha, *lon, *speed, 0.0)
        })
        .with_ayanamsa(24.19)
        .with_rising(rising)
}

fn request(infolevel: &str, varga: &str, nesting: &str) -> ChartRequest {
    let query: BTreeMap<String, String> = [
        ("latitude", "28.6139"),
        ("longitude", "77.2090"),
        ("year", "2023"),
        ("month", "12"),
        ("day", "25"),
        ("hour", "12"),
        ("min", "0"),
        ("sec", "0"),
        ("infolevel", infolevel),
        ("varga", varga),
        ("nesting", nesting),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    ChartRequest::from_query(&query, &ChartSettings::default()).unwrap()
}

fn bench_assemble(c: &mut Criterion) {
    let ephemeris = delhi_ephemeris();
    let zones = FixedZoneLookup::new("Asia/Kolkata");

    let minimal = request("", "D1", "0");
    c.bench_function("assemble_minimal", |b| {
        b.iter(|| assemble(black_box(&ephemeris), black_box(&zones), black_box(&minimal)))
    });

    let full = request(
        "basic,panchanga,sarvashtakavarga,grahabala,rashibala,yogas,ayanamsa",
        "D1,D2,D3,D4,D7,D9,D10,D12,D16,D20,D24,D27,D30,D40,D45,D60",
        "3",
    );
    c.bench_function("assemble_all_sections", |b| {
        b.iter(|| assemble(black_box(&ephemeris), black_box(&zones), black_box(&full)))
    });
}

criterion_group!(benches, bench_assemble);
criterion_main!(benches);
