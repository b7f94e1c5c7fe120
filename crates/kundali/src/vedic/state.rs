//! Planetary state analysis.
//!
//! Every attribute is a pure function of the chart snapshot and one graha.
//! [`analyze_basic`] and [`analyze_extended`] bundle them for the assembler.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::vedic::graha::{
    angular_separation, combine_relation, element, house_from, is_odd_rashi, natural_relation,
    rashi_lord, temporary_relation, Element, Graha, Relation, TempRelation,
};
use crate::vedic::types::ChartData;
use crate::vedic::vargas::{varga_position, VargaCode};

/// Grahas that take part in planetary war.
pub const WARRING_GRAHAS: [Graha; 5] = [
    Graha::Mars,
    Graha::Mercury,
    Graha::Jupiter,
    Graha::Venus,
    Graha::Saturn,
];

/// Maximum separation, in degrees, for two grahas to be at war.
pub const WAR_ORB: f64 = 1.0;

const YOGAKARAKA_PAIRS: [(u8, u8); 4] = [(4, 5), (4, 9), (5, 10), (9, 10)];

// Favourable transit houses counted from the natal Moon's sign.
const GOCHARA_HOUSES: [&[u8]; 9] = [
    &[3, 6, 10, 11],
    &[1, 3, 6, 7, 10, 11],
    &[3, 6, 11],
    &[2, 4, 6, 8, 10, 11],
    &[2, 5, 7, 9, 11],
    &[1, 2, 3, 4, 5, 8, 9, 11, 12],
    &[3, 6, 11],
    &[3, 6, 11],
    &[3, 6, 11],
];

// Mrityu bhaga degree per rashi, Aries first.
const MRITYU_BHAGA: [[u8; 12]; 9] = [
    [20, 9, 12, 6, 8, 24, 16, 17, 22, 2, 3, 23],
    [26, 12, 13, 25, 24, 11, 26, 14, 13, 25, 5, 12],
    [19, 28, 25, 23, 29, 28, 14, 21, 2, 15, 11, 6],
    [15, 14, 13, 12, 8, 18, 20, 10, 21, 22, 7, 5],
    [19, 29, 12, 27, 6, 4, 13, 10, 17, 11, 15, 28],
    [28, 15, 11, 17, 10, 13, 4, 6, 27, 12, 29, 19],
    [10, 4, 7, 9, 12, 16, 3, 18, 28, 14, 13, 15],
    [14, 13, 12, 11, 24, 23, 22, 21, 10, 20, 18, 8],
    [8, 18, 20, 10, 21, 22, 23, 24, 11, 12, 13, 14],
];

const LAGNA_MRITYU_BHAGA: [u8; 12] = [1, 9, 22, 22, 25, 2, 4, 23, 18, 20, 24, 10];

const PUSHKARA_BHAGA: [u8; 12] = [21, 14, 18, 8, 19, 9, 24, 11, 23, 14, 19, 9];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RashiAvastha {
    Uchcha,
    Mula,
    Sva,
    AdhiMitra,
    Mitra,
    Sama,
    Shatru,
    AdhiShatru,
    Neecha,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BhavaCharacter {
    Benefic,
    Malefic,
    Neutral,
}

/// Baladi avastha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Avastha {
    Bala,
    Kumara,
    Yuva,
    Vriddha,
    Mrita,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlanetaryWar {
    pub opponent: Graha,
    pub winner: Graha,
    pub separation: f64,
}

/// Combustion orb for the graha; `None` for grahas that never combust.
pub fn combustion_threshold(graha: Graha, retrograde: bool) -> Option<f64> {
    match graha {
        Graha::Moon => Some(12.0),
        Graha::Mars => Some(17.0),
        Graha::Mercury => Some(if retrograde { 12.0 } else { 14.0 }),
        Graha::Jupiter => Some(11.0),
        Graha::Venus => Some(if retrograde { 8.0 } else { 10.0 }),
        Graha::Saturn => Some(15.0),
        Graha::Sun | Graha::Rahu | Graha::Ketu => None,
    }
}

/// Combust when strictly closer to the Sun than the threshold.
pub fn is_astangata(chart: &ChartData, graha: Graha) -> bool {
    let position = chart.position(graha);
    combustion_threshold(graha, position.retrograde).map_or(false, |orb| {
        angular_separation(position.longitude, chart.longitude(Graha::Sun)) < orb
    })
}

pub fn rashi_avastha(chart: &ChartData, graha: Graha) -> RashiAvastha {
    let rashi = chart.rashi(graha);
    let degree = chart.degree(graha);

    if let Some((mt_rashi, start, end)) = graha.moolatrikona() {
        if rashi == mt_rashi && degree >= start && degree < end {
            return RashiAvastha::Mula;
        }
    }
    if rashi == graha.exaltation_rashi() {
        return RashiAvastha::Uchcha;
    }
    if rashi == graha.debilitation_rashi() {
        return RashiAvastha::Neecha;
    }
    if graha.own_rashis().contains(&rashi) {
        return RashiAvastha::Sva;
    }
    match relation(chart, graha, rashi_lord(rashi)) {
        Relation::AdhiMitra => RashiAvastha::AdhiMitra,
        Relation::Mitra => RashiAvastha::Mitra,
        Relation::Sama => RashiAvastha::Sama,
        Relation::Shatru => RashiAvastha::Shatru,
        Relation::AdhiShatru => RashiAvastha::AdhiShatru,
    }
}

/// Same sign in D1 and in the given varga.
pub fn is_vargottama(chart: &ChartData, graha: Graha, code: VargaCode) -> bool {
    chart.rashi(graha) == varga_position(code, chart.longitude(graha)).0
}

/// The closest war the graha is involved in, if any. The graha with the
/// greater longitude wins.
pub fn planetary_war(chart: &ChartData, graha: Graha) -> Option<PlanetaryWar> {
    if !WARRING_GRAHAS.contains(&graha) {
        return None;
    }
    let own = chart.longitude(graha);
    WARRING_GRAHAS
        .iter()
        .copied()
        .filter(|other| *other != graha && chart.rashi(*other) == chart.rashi(graha))
        .map(|other| (other, angular_separation(own, chart.longitude(other))))
        .filter(|(_, separation)| *separation < WAR_ORB)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(opponent, separation)| PlanetaryWar {
            opponent,
            winner: if own >= chart.longitude(opponent) { graha } else { opponent },
            separation,
        })
}

pub fn is_yuddha(chart: &ChartData, graha: Graha) -> bool {
    planetary_war(chart, graha).is_some()
}

/// Occupies a favourable transit house counted from the natal Moon.
pub fn is_gocharastha(chart: &ChartData, graha: Graha) -> bool {
    let house = house_from(chart.rashi(Graha::Moon), chart.rashi(graha));
    GOCHARA_HOUSES[graha.index()].contains(&house)
}

/// Functional nature from the houses the graha rules for this lagna.
///
/// Trikona lordship scores +2, lordship of 3/6/8/11 scores -1, kendra
/// lordship scores -1 for natural benefics and +1 for natural malefics.
pub fn bhava_character(chart: &ChartData, graha: Graha) -> BhavaCharacter {
    let score: i32 = chart
        .houses_owned(graha)
        .into_iter()
        .map(|house| match house {
            1 | 5 | 9 => 2,
            3 | 6 | 8 | 11 => -1,
            4 | 7 | 10 if graha.is_natural_benefic() => -1,
            4 | 7 | 10 => 1,
            _ => 0,
        })
        .sum();
    match score {
        s if s > 0 => BhavaCharacter::Benefic,
        s if s < 0 => BhavaCharacter::Malefic,
        _ => BhavaCharacter::Neutral,
    }
}

pub fn temp_relation(chart: &ChartData, from: Graha, to: Graha) -> TempRelation {
    temporary_relation(chart.rashi(from), chart.rashi(to))
}

pub fn relation(chart: &ChartData, from: Graha, to: Graha) -> Relation {
    combine_relation(natural_relation(from, to), temp_relation(chart, from, to))
}

pub fn temp_relations(chart: &ChartData, graha: Graha) -> BTreeMap<Graha, TempRelation> {
    others(graha).map(|o| (o, temp_relation(chart, graha, o))).collect()
}

pub fn relations(chart: &ChartData, graha: Graha) -> BTreeMap<Graha, Relation> {
    others(graha).map(|o| (o, relation(chart, graha, o))).collect()
}

fn others(graha: Graha) -> impl Iterator<Item = Graha> {
    Graha::ALL.into_iter().filter(move |o| *o != graha)
}

pub fn is_yogakaraka(chart: &ChartData, graha: Graha) -> bool {
    let owned = chart.houses_owned(graha);
    YOGAKARAKA_PAIRS
        .iter()
        .any(|(a, b)| owned.contains(a) && owned.contains(b))
}

fn in_degree_band(degree: f64, mark: u8) -> bool {
    let mark = mark as f64;
    degree >= mark - 1.0 && degree < mark
}

pub fn is_mrityu(chart: &ChartData, graha: Graha) -> bool {
    let rashi = chart.rashi(graha) as usize;
    in_degree_band(chart.degree(graha), MRITYU_BHAGA[graha.index()][rashi - 1])
}

pub fn is_lagna_mrityu(chart: &ChartData) -> bool {
    let degree = crate::vedic::graha::degree_in_rashi(chart.ascendant);
    in_degree_band(degree, LAGNA_MRITYU_BHAGA[chart.lagna_rashi() as usize - 1])
}

/// Navamsha number (1..=9) of a degree within its sign.
fn navamsha_number(degree: f64) -> u8 {
    ((degree * 9.0 / 30.0 + 1e-9).floor() as u8).min(8) + 1
}

pub fn is_pushkara_navamsha(chart: &ChartData, graha: Graha) -> bool {
    let pushkara: [u8; 2] = match element(chart.rashi(graha)) {
        Element::Fire => [7, 9],
        Element::Earth => [3, 5],
        Element::Air => [6, 8],
        Element::Water => [1, 3],
    };
    pushkara.contains(&navamsha_number(chart.degree(graha)))
}

pub fn is_pushkara_bhaga(chart: &ChartData, graha: Graha) -> bool {
    let rashi = chart.rashi(graha) as usize;
    in_degree_band(chart.degree(graha), PUSHKARA_BHAGA[rashi - 1])
}

/// Baladi avastha from 6° bands, reversed in even signs.
pub fn avastha(chart: &ChartData, graha: Graha) -> Avastha {
    const ORDER: [Avastha; 5] = [
        Avastha::Bala,
        Avastha::Kumara,
        Avastha::Yuva,
        Avastha::Vriddha,
        Avastha::Mrita,
    ];
    let band = ((chart.degree(graha) / 6.0).floor() as usize).min(4);
    if is_odd_rashi(chart.rashi(graha)) {
        ORDER[band]
    } else {
        ORDER[4 - band]
    }
}

pub fn dispositor(chart: &ChartData, graha: Graha) -> Graha {
    rashi_lord(chart.rashi(graha))
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrahaState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub astangata: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rashi_avastha: Option<RashiAvastha>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vargottama: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yuddha: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gocharastha: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bhava_character: Option<BhavaCharacter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_relation: Option<BTreeMap<Graha, TempRelation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relation: Option<BTreeMap<Graha, Relation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yogakaraka: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mrityu: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pushkara_navamsha: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pushkara_bhaga: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avastha: Option<Avastha>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dispositor: Option<Graha>,
}

/// Combustion, dignity, vargottama (against the navamsha) and war.
pub fn analyze_basic(chart: &ChartData, graha: Graha) -> GrahaState {
    GrahaState {
        astangata: Some(is_astangata(chart, graha)),
        rashi_avastha: Some(rashi_avastha(chart, graha)),
        vargottama: Some(is_vargottama(chart, graha, VargaCode::D9)),
        yuddha: Some(is_yuddha(chart, graha)),
        ..GrahaState::default()
    }
}

/// The basic attributes plus transit, lordship, relation and degree flags.
pub fn analyze_extended(chart: &ChartData, graha: Graha) -> GrahaState {
    GrahaState {
        gocharastha: Some(is_gocharastha(chart, graha)),
        bhava_character: Some(bhava_character(chart, graha)),
        temp_relation: Some(temp_relations(chart, graha)),
        relation: Some(relations(chart, graha)),
        yogakaraka: Some(is_yogakaraka(chart, graha)),
        mrityu: Some(is_mrityu(chart, graha)),
        pushkara_navamsha: Some(is_pushkara_navamsha(chart, graha)),
        pushkara_bhaga: Some(is_pushkara_bhaga(chart, graha)),
        avastha: Some(avastha(chart, graha)),
        dispositor: Some(dispositor(chart, graha)),
        ..analyze_basic(chart, graha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vedic::types::fixtures::{chart_with, chart_with_speeds};

    // Sun, Moon, Mars, Mercury, Jupiter, Venus, Saturn, Rahu, Ketu
    const DELHI: [f64; 9] = [249.2, 44.2, 235.0, 244.0, 11.4, 208.0, 310.0, 355.0, 175.0];

    #[test]
    fn test_dignity_tiers() {
        let chart = chart_with(328.0, DELHI);
        // Moon at Taurus 14°: moolatrikona range.
        assert_eq!(rashi_avastha(&chart, Graha::Moon), RashiAvastha::Mula);
        // Saturn at Aquarius 10°: moolatrikona.
        assert_eq!(rashi_avastha(&chart, Graha::Saturn), RashiAvastha::Mula);
        // Mars in Scorpio: own sign.
        assert_eq!(rashi_avastha(&chart, Graha::Mars), RashiAvastha::Sva);
        // Jupiter in Aries (Mars' sign).
        assert_eq!(rashi_avastha(&chart, Graha::Jupiter), RashiAvastha::Sama);

        let exalted = chart_with(0.0, [10.0, 44.2, 298.0, 170.0, 95.0, 357.0, 200.0, 50.0, 230.0]);
        assert_eq!(rashi_avastha(&exalted, Graha::Sun), RashiAvastha::Uchcha);
        assert_eq!(rashi_avastha(&exalted, Graha::Mars), RashiAvastha::Uchcha);
        let debilitated = chart_with(0.0, [190.0, 220.0, 100.0, 340.0, 280.0, 170.0, 10.0, 230.0, 50.0]);
        assert_eq!(rashi_avastha(&debilitated, Graha::Sun), RashiAvastha::Neecha);
        assert_eq!(rashi_avastha(&debilitated, Graha::Saturn), RashiAvastha::Neecha);
    }

    #[test]
    fn test_combustion_with_retrograde_orb() {
        // Mercury 13° from the Sun: combust when direct (14°), not when retrograde (12°).
        let longitudes = [100.0, 200.0, 300.0, 113.0, 10.0, 20.0, 30.0, 40.0, 220.0];
        let direct = chart_with(0.0, longitudes);
        assert!(is_astangata(&direct, Graha::Mercury));
        let mut speeds = [1.0; 9];
        speeds[Graha::Mercury.index()] = -0.5;
        let retro = chart_with_speeds(0.0, longitudes, speeds);
        assert!(!is_astangata(&retro, Graha::Mercury));
        assert!(!is_astangata(&direct, Graha::Sun));
        assert!(!is_astangata(&direct, Graha::Rahu));
    }

    #[test]
    fn test_planetary_war() {
        let chart = chart_with(0.0, [100.0, 200.0, 150.2, 150.9, 10.0, 20.0, 30.0, 40.0, 220.0]);
        let war = planetary_war(&chart, Graha::Mars).unwrap();
        assert_eq!(war.opponent, Graha::Mercury);
        assert_eq!(war.winner, Graha::Mercury);
        assert!(is_yuddha(&chart, Graha::Mercury));
        assert!(!is_yuddha(&chart, Graha::Sun));

        // Within 1° but across a sign boundary.
        let apart = chart_with(0.0, [100.0, 200.0, 149.8, 150.3, 10.0, 20.0, 30.0, 40.0, 220.0]);
        assert!(!is_yuddha(&apart, Graha::Mars));
    }

    #[test]
    fn test_relations_and_lordship() {
        let chart = chart_with(328.0, DELHI);
        // Mercury sits with the Sun: same sign is a temporary enemy.
        assert_eq!(temp_relation(&chart, Graha::Sun, Graha::Mercury), TempRelation::Enemy);
        // Saturn is the 3rd from the Sun.
        assert_eq!(temp_relation(&chart, Graha::Sun, Graha::Saturn), TempRelation::Friend);
        assert_eq!(relation(&chart, Graha::Sun, Graha::Saturn), Relation::Sama);
        assert_eq!(relations(&chart, Graha::Sun).len(), 8);

        // Aquarius lagna: Venus rules the 4th and 9th.
        assert!(is_yogakaraka(&chart, Graha::Venus));
        assert!(!is_yogakaraka(&chart, Graha::Mars));
        assert_eq!(bhava_character(&chart, Graha::Venus), BhavaCharacter::Benefic);
        assert_eq!(dispositor(&chart, Graha::Sun), Graha::Jupiter);
    }

    #[test]
    fn test_degree_flags() {
        // Sun at Aries 19.5°: mrityu band [19, 20); Moon at Aries 20.5°: pushkara navamsha and bhaga.
        let chart = chart_with(0.5, [19.5, 20.5, 300.0, 60.0, 90.0, 120.0, 150.0, 40.0, 220.0]);
        assert!(is_mrityu(&chart, Graha::Sun));
        assert!(!is_mrityu(&chart, Graha::Moon));
        assert!(is_pushkara_navamsha(&chart, Graha::Moon));
        assert!(is_pushkara_bhaga(&chart, Graha::Moon));
        assert!(!is_pushkara_navamsha(&chart, Graha::Sun));
        assert!(is_lagna_mrityu(&chart));
    }

    #[test]
    fn test_avastha_direction() {
        let chart = chart_with(0.0, [2.0, 32.0, 300.0, 60.0, 90.0, 120.0, 150.0, 40.0, 220.0]);
        assert_eq!(avastha(&chart, Graha::Sun), Avastha::Bala);
        assert_eq!(avastha(&chart, Graha::Moon), Avastha::Mrita);
    }

    #[test]
    fn test_bundles() {
        let chart = chart_with(328.0, DELHI);
        let basic = serde_json::to_value(analyze_basic(&chart, Graha::Sun)).unwrap();
        assert_eq!(basic.as_object().unwrap().len(), 4);
        let extended = serde_json::to_value(analyze_extended(&chart, Graha::Sun)).unwrap();
        assert_eq!(extended.as_object().unwrap().len(), 14);
        assert!(extended.get("rashiAvastha").is_some());
        assert!(extended["relation"].get("Ch").is_some());
    }
}
