//! Graha Bala: the six-fold strength of the seven classical grahas.
//!
//! total = sthana + dig + kala + cheshta + naisargika + drik, in virupas.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::vedic::bala::{acts_as_benefic, dig_strength, net_drishti};
use crate::vedic::graha::{
    angular_separation, combine_relation, is_odd_rashi, natural_relation, rashi_lord,
    temporary_relation, Graha, Relation,
};
use crate::vedic::panchanga::{current_hora_lord, day_division, vara, DayDivision};
use crate::vedic::state::{planetary_war, rashi_avastha, RashiAvastha};
use crate::vedic::types::ChartData;
use crate::vedic::vargas::{build_varga, varga_position, VargaChart, VargaCode};

/// Natural strength, Sun..Saturn.
pub const NAISARGIKA: [f64; 7] = [60.0, 51.43, 17.14, 25.71, 34.29, 42.86, 8.57];

/// House of greatest directional strength, Sun..Saturn.
const DIG_STRONG_HOUSE: [u8; 7] = [10, 4, 10, 1, 1, 4, 7];

/// Mean daily motion used to scale cheshta bala, Sun..Saturn.
const MAX_SPEED: [f64; 7] = [1.0, 15.0, 0.8, 2.2, 0.25, 1.6, 0.13];

const SAPTAVARGAS: [VargaCode; 7] = [
    VargaCode::D1,
    VargaCode::D2,
    VargaCode::D3,
    VargaCode::D7,
    VargaCode::D9,
    VargaCode::D12,
    VargaCode::D30,
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SthanaBala {
    pub uchcha: f64,
    pub saptavargaja: f64,
    pub ojhayugma: f64,
    pub kendradi: f64,
    pub drekkana: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KalaBala {
    pub nathonnatha: f64,
    pub paksha: f64,
    pub tribhaga: f64,
    pub vara: f64,
    pub hora: f64,
    pub ayana: f64,
    pub yuddha: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GrahaBala {
    pub sthana: SthanaBala,
    pub dig: f64,
    pub kala: KalaBala,
    pub cheshta: f64,
    pub naisargika: f64,
    pub drik: f64,
    pub total: f64,
    pub rupa: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gender {
    Male,
    Female,
    Neuter,
}

fn gender(graha: Graha) -> Gender {
    match graha {
        Graha::Moon | Graha::Venus => Gender::Female,
        Graha::Mercury | Graha::Saturn => Gender::Neuter,
        _ => Gender::Male,
    }
}

/// Time-of-day inputs shared by every graha's kala bala.
#[derive(Debug, Clone, Copy)]
struct KalaContext {
    division: DayDivision,
    vara_lord: Graha,
    hora_lord: Graha,
    phase: f64,
}

impl KalaContext {
    fn new(chart: &ChartData) -> Self {
        let elongation = chart.lunar_elongation();
        Self {
            division: day_division(chart),
            vara_lord: vara(chart).lord,
            hora_lord: current_hora_lord(chart),
            phase: if elongation <= 180.0 { elongation } else { 360.0 - elongation },
        }
    }
}

pub fn uchcha_bala(chart: &ChartData, graha: Graha) -> f64 {
    let distance = angular_separation(chart.longitude(graha), graha.exaltation_degree());
    60.0 * (1.0 - distance / 180.0)
}

fn dignity_points(avastha: RashiAvastha) -> f64 {
    match avastha {
        RashiAvastha::Uchcha => 30.0,
        RashiAvastha::Mula => 22.5,
        RashiAvastha::Sva => 20.0,
        RashiAvastha::AdhiMitra => 15.0,
        RashiAvastha::Mitra => 10.0,
        RashiAvastha::Sama => 7.5,
        RashiAvastha::Shatru => 5.0,
        RashiAvastha::AdhiShatru => 2.5,
        RashiAvastha::Neecha => 1.25,
    }
}

/// Dignity inside a divisional chart; friendship is judged from the
/// positions in that same chart.
fn varga_dignity(varga: &VargaChart, graha: Graha) -> RashiAvastha {
    let rashi = varga.rashi(graha);
    if rashi == graha.exaltation_rashi() {
        return RashiAvastha::Uchcha;
    }
    if rashi == graha.debilitation_rashi() {
        return RashiAvastha::Neecha;
    }
    if graha.own_rashis().contains(&rashi) {
        return RashiAvastha::Sva;
    }
    let lord = rashi_lord(rashi);
    let temporary = temporary_relation(rashi, varga.rashi(lord));
    match combine_relation(natural_relation(graha, lord), temporary) {
        Relation::AdhiMitra => RashiAvastha::AdhiMitra,
        Relation::Mitra => RashiAvastha::Mitra,
        Relation::Sama => RashiAvastha::Sama,
        Relation::Shatru => RashiAvastha::Shatru,
        Relation::AdhiShatru => RashiAvastha::AdhiShatru,
    }
}

fn saptavargaja_bala(chart: &ChartData, vargas: &[VargaChart], graha: Graha) -> f64 {
    vargas
        .iter()
        .map(|varga| {
            if varga.code == VargaCode::D1 {
                dignity_points(rashi_avastha(chart, graha))
            } else {
                dignity_points(varga_dignity(varga, graha))
            }
        })
        .sum()
}

fn ojhayugma_bala(chart: &ChartData, graha: Graha) -> f64 {
    let wants_odd = gender(graha) != Gender::Female;
    let rashi_odd = is_odd_rashi(chart.rashi(graha));
    let navamsha_odd = is_odd_rashi(varga_position(VargaCode::D9, chart.longitude(graha)).0);
    [rashi_odd, navamsha_odd]
        .iter()
        .filter(|odd| **odd == wants_odd)
        .count() as f64
        * 15.0
}

pub fn kendradi_bala(house: u8) -> f64 {
    match house {
        1 | 4 | 7 | 10 => 60.0,
        2 | 5 | 8 | 11 => 30.0,
        _ => 15.0,
    }
}

fn drekkana_bala(chart: &ChartData, graha: Graha) -> f64 {
    let decanate = ((chart.degree(graha) / 10.0).floor() as u8).min(2);
    match (gender(graha), decanate) {
        (Gender::Male, 0) | (Gender::Female, 1) | (Gender::Neuter, 2) => 15.0,
        _ => 0.0,
    }
}

pub fn sthana_bala(chart: &ChartData, vargas: &[VargaChart], graha: Graha) -> SthanaBala {
    let uchcha = uchcha_bala(chart, graha);
    let saptavargaja = saptavargaja_bala(chart, vargas, graha);
    let ojhayugma = ojhayugma_bala(chart, graha);
    let kendradi = kendradi_bala(chart.bhava(graha));
    let drekkana = drekkana_bala(chart, graha);
    SthanaBala {
        uchcha,
        saptavargaja,
        ojhayugma,
        kendradi,
        drekkana,
        total: uchcha + saptavargaja + ojhayugma + kendradi + drekkana,
    }
}

pub fn dig_bala(chart: &ChartData, graha: Graha) -> f64 {
    dig_strength(chart.bhava(graha), DIG_STRONG_HOUSE[graha.index()])
}

fn paksha_bala(chart: &ChartData, ctx: &KalaContext, graha: Graha) -> f64 {
    let benefic_score = ctx.phase / 3.0;
    if graha == Graha::Moon || acts_as_benefic(chart, graha) {
        benefic_score
    } else {
        60.0 - benefic_score
    }
}

fn ayana_bala(chart: &ChartData, graha: Graha) -> f64 {
    let kranti = chart.position(graha).declination.clamp(-24.0, 24.0);
    let score = if acts_as_benefic(chart, graha) {
        (24.0 + kranti) / 48.0 * 60.0
    } else {
        (24.0 - kranti) / 48.0 * 60.0
    };
    score.max(0.0)
}

fn tribhaga_bala(ctx: &KalaContext, graha: Graha) -> f64 {
    if graha == Graha::Sun {
        return 60.0;
    }
    let third = ((ctx.division.fraction * 3.0).floor() as usize).min(2);
    let strong = if ctx.division.is_day {
        [Graha::Jupiter, Graha::Mercury, Graha::Saturn][third]
    } else {
        [Graha::Moon, Graha::Venus, Graha::Mars][third]
    };
    if graha == strong {
        60.0
    } else {
        0.0
    }
}

fn kala_bala(chart: &ChartData, ctx: &KalaContext, graha: Graha) -> KalaBala {
    let benefic = acts_as_benefic(chart, graha);
    let nathonnatha = if benefic != ctx.division.is_day { 60.0 } else { 0.0 };
    let paksha = paksha_bala(chart, ctx, graha);
    let tribhaga = tribhaga_bala(ctx, graha);
    let vara = if graha == ctx.vara_lord { 45.0 } else { 0.0 };
    let hora = if graha == ctx.hora_lord { 60.0 } else { 0.0 };
    let ayana = ayana_bala(chart, graha);
    let yuddha = match planetary_war(chart, graha) {
        Some(war) if war.winner == graha => 60.0,
        Some(_) => -60.0,
        None => 0.0,
    };
    KalaBala {
        nathonnatha,
        paksha,
        tribhaga,
        vara,
        hora,
        ayana,
        yuddha,
        total: nathonnatha + paksha + tribhaga + vara + hora + ayana + yuddha,
    }
}

/// Motional strength. The Sun takes its ayana bala and the Moon its paksha
/// bala; the others score by speed, with retrograde motion at full strength.
fn cheshta_bala(chart: &ChartData, kala: &KalaBala, graha: Graha) -> f64 {
    match graha {
        Graha::Sun => kala.ayana,
        Graha::Moon => kala.paksha,
        _ => {
            let position = chart.position(graha);
            if position.retrograde {
                60.0
            } else {
                (position.speed / MAX_SPEED[graha.index()] * 60.0).clamp(0.0, 60.0)
            }
        }
    }
}

fn drik_bala(chart: &ChartData, graha: Graha) -> f64 {
    net_drishti(chart, chart.longitude(graha), Some(graha))
}

fn graha_bala(chart: &ChartData, vargas: &[VargaChart], ctx: &KalaContext, graha: Graha) -> GrahaBala {
    let sthana = sthana_bala(chart, vargas, graha);
    let dig = dig_bala(chart, graha);
    let kala = kala_bala(chart, ctx, graha);
    let cheshta = cheshta_bala(chart, &kala, graha);
    let naisargika = NAISARGIKA[graha.index()];
    let drik = drik_bala(chart, graha);
    let total = sthana.total + dig + kala.total + cheshta + naisargika + drik;
    GrahaBala {
        sthana,
        dig,
        kala,
        cheshta,
        naisargika,
        drik,
        total,
        rupa: total / 60.0,
    }
}

/// Graha Bala for Sun..Saturn.
pub fn compute_graha_bala(chart: &ChartData) -> BTreeMap<Graha, GrahaBala> {
    let vargas: Vec<VargaChart> = SAPTAVARGAS.iter().map(|code| build_varga(chart, *code)).collect();
    let ctx = KalaContext::new(chart);
    log::debug!(
        "Graha bala: day={} vara lord={:?} hora lord={:?}",
        ctx.division.is_day,
        ctx.vara_lord,
        ctx.hora_lord
    );
    Graha::SAPTA
        .iter()
        .map(|graha| (*graha, graha_bala(chart, &vargas, &ctx, *graha)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vedic::types::fixtures::{chart_with, chart_with_speeds};

    const DELHI: [f64; 9] = [249.2, 44.2, 235.0, 244.0, 11.4, 208.0, 310.0, 355.0, 175.0];

    #[test]
    fn test_uchcha_extremes() {
        let chart = chart_with(0.0, [10.0, 33.0, 118.0, 165.0, 95.0, 357.0, 200.0, 0.0, 180.0]);
        assert!((uchcha_bala(&chart, Graha::Sun) - 60.0).abs() < 1e-9);
        assert!(uchcha_bala(&chart, Graha::Mars).abs() < 1e-9);
        assert!((uchcha_bala(&chart, Graha::Saturn) - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_kendradi_and_dig() {
        assert_eq!(kendradi_bala(7), 60.0);
        assert_eq!(kendradi_bala(11), 30.0);
        assert_eq!(kendradi_bala(12), 15.0);
        // Lagna Aries, Sun in Capricorn (10th house).
        let chart = chart_with(5.0, [280.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 180.0]);
        assert_eq!(dig_bala(&chart, Graha::Sun), 60.0);
        assert_eq!(dig_bala(&chart, Graha::Moon), 30.0);
        assert_eq!(dig_bala(&chart, Graha::Mercury), 60.0);
    }

    #[test]
    fn test_saptavargaja_all_exalted_in_rashi() {
        // Jupiter at 2 degrees Cancer is exalted in D1 and, in the first
        // navamsha of a movable sign, sits in Cancer in D9 too.
        let chart = chart_with(0.0, [0.0, 0.0, 0.0, 0.0, 92.0, 0.0, 0.0, 0.0, 180.0]);
        let vargas: Vec<VargaChart> = SAPTAVARGAS.iter().map(|c| build_varga(&chart, *c)).collect();
        assert_eq!(dignity_points(rashi_avastha(&chart, Graha::Jupiter)), 30.0);
        assert_eq!(varga_dignity(&vargas[4], Graha::Jupiter), RashiAvastha::Uchcha);
        assert!(saptavargaja_bala(&chart, &vargas, Graha::Jupiter) >= 60.0);
    }

    #[test]
    fn test_cheshta_retrograde_is_full() {
        let mut speeds = [1.0; 9];
        speeds[Graha::Mars.index()] = -0.2;
        speeds[Graha::Saturn.index()] = 0.065;
        let chart = chart_with_speeds(328.0, DELHI, speeds);
        let bala = compute_graha_bala(&chart);
        assert_eq!(bala[&Graha::Mars].cheshta, 60.0);
        assert!((bala[&Graha::Saturn].cheshta - 30.0).abs() < 1e-9);
        assert_eq!(bala[&Graha::Sun].cheshta, bala[&Graha::Sun].kala.ayana);
        assert_eq!(bala[&Graha::Moon].cheshta, bala[&Graha::Moon].kala.paksha);
    }

    #[test]
    fn test_totals_are_simple_sums() {
        let chart = chart_with(328.0, DELHI);
        let bala = compute_graha_bala(&chart);
        assert_eq!(bala.len(), 7);
        assert!(!bala.contains_key(&Graha::Rahu));
        for (graha, b) in &bala {
            let sum = b.sthana.total + b.dig + b.kala.total + b.cheshta + b.naisargika + b.drik;
            assert!((b.total - sum).abs() < 1e-9, "{:?}", graha);
            assert!((b.rupa - b.total / 60.0).abs() < 1e-12);
            assert_eq!(b.naisargika, NAISARGIKA[graha.index()]);
        }
        // Exactly one graha holds the vara and one the hora.
        assert_eq!(bala.values().filter(|b| b.kala.vara == 45.0).count(), 1);
        assert_eq!(bala.values().filter(|b| b.kala.hora == 60.0).count(), 1);
        assert_eq!(bala[&Graha::Sun].kala.tribhaga, 60.0);
    }
}
