mod common;

use common::chart_with;
use kundali::vedic::graha::Graha;
use kundali::vedic::vargas::{build_varga, varga_position, VargaCode};

fn code(label: &str) -> VargaCode {
    label.parse().unwrap()
}

fn sign(label: &str, longitude: f64) -> u8 {
    varga_position(code(label), longitude).0
}

#[test]
fn test_navamsha_segment_boundaries() {
    let pada = 30.0 / 9.0;
    // Aries: segments run Aries, Taurus, Gemini...
    assert_eq!(sign("D9", pada - 1e-6), 1);
    assert_eq!(sign("D9", pada), 2);
    assert_eq!(sign("D9", 2.0 * pada), 3);
    assert_eq!(sign("D9", 30.0 - 1e-6), 9);
    // Leo is fixed: starts from the 9th, Aries.
    assert_eq!(sign("D9", 120.0), 1);
    // Sagittarius is dual: starts from the 5th, Aries.
    assert_eq!(sign("D9", 240.0), 1);
    assert_eq!(sign("D9", 240.0 + 8.0 * pada), 9);
}

#[test]
fn test_drekkana_boundaries() {
    assert_eq!(sign("D3", 9.999), 1);
    assert_eq!(sign("D3", 10.0), 5);
    assert_eq!(sign("D3", 20.0), 9);
    // Pisces: Pisces, Cancer, Scorpio.
    assert_eq!(sign("D3", 355.0), 8);
}

#[test]
fn test_trimshamsha_boundaries() {
    // Odd sign (Aries).
    assert_eq!(sign("D30", 4.999), 1);
    assert_eq!(sign("D30", 5.0), 11);
    assert_eq!(sign("D30", 10.0), 9);
    assert_eq!(sign("D30", 18.0), 3);
    assert_eq!(sign("D30", 25.0), 7);
    // Even sign (Taurus).
    assert_eq!(sign("D30", 34.0), 2);
    assert_eq!(sign("D30", 35.0), 6);
    assert_eq!(sign("D30", 42.0), 12);
    assert_eq!(sign("D30", 50.0), 10);
    assert_eq!(sign("D30", 55.0), 8);
}

#[test]
fn test_varga_degree_rescaled() {
    let (rashi, degree) = varga_position(code("D9"), 5.0);
    assert_eq!(rashi, 2);
    assert!((degree - 15.0).abs() < 1e-9);
}

#[test]
fn test_fixed_start_vargas() {
    // Cancer is movable, Leo fixed, Virgo dual.
    assert_eq!(sign("D16", 90.0), 1);
    assert_eq!(sign("D16", 120.0), 5);
    assert_eq!(sign("D16", 150.0), 9);
    assert_eq!(sign("D20", 120.0), 9);
    assert_eq!(sign("D24", 0.0), 5);
    assert_eq!(sign("D24", 30.0), 4);
    // Leo is fire, Virgo earth, Libra air, Scorpio water.
    assert_eq!(sign("D27", 120.0), 1);
    assert_eq!(sign("D27", 150.0), 4);
    assert_eq!(sign("D27", 180.0), 7);
    assert_eq!(sign("D27", 210.0), 10);
    assert_eq!(sign("D40", 30.0), 7);
    assert_eq!(sign("D60", 0.5), 2);
}

#[test]
fn test_every_body_has_one_placement() {
    let chart = chart_with(328.0, [249.2, 44.2, 235.0, 244.0, 11.4, 208.0, 310.0, 355.0, 175.0]);
    for code in VargaCode::supported() {
        let varga = build_varga(&chart, code);
        assert_eq!(varga.lagna.bhava, 1);
        for graha in Graha::ALL {
            let placement = varga.placement(graha);
            assert!((1..=12).contains(&placement.rashi));
            assert!((1..=12).contains(&placement.bhava));
        }
    }
}

#[test]
fn test_houses_count_from_varga_lagna() {
    // Ascendant 1 degree Aries: navamsha lagna Aries. Sun at 5 Aries: navamsha Taurus.
    let chart = chart_with(1.0, [5.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 180.0]);
    let d9 = build_varga(&chart, VargaCode::D9);
    assert_eq!(d9.lagna.rashi, 1);
    assert_eq!(d9.placement(Graha::Sun).bhava, 2);
    // Ketu at 0 Libra: movable, navamsha Libra, 7th house.
    assert_eq!(d9.placement(Graha::Ketu).bhava, 7);
}
