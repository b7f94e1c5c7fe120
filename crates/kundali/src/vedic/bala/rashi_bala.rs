//! Rashi Bala: strength of each of the twelve signs.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::vedic::bala::{dig_strength, net_drishti, GrahaBala};
use crate::vedic::graha::{house_from, quality, rashi_lord, rashi_name, Graha, Quality};
use crate::vedic::types::ChartData;

/// House of greatest directional strength by sign class: human signs in the
/// 1st, quadrupeds in the 10th, watery signs in the 4th, Scorpio in the 7th.
const RASHI_DIG_HOUSE: [u8; 12] = [10, 10, 1, 4, 10, 1, 1, 7, 10, 4, 1, 4];

#[derive(Debug, Clone, Serialize)]
pub struct RashiBala {
    pub rashi: u8,
    pub name: &'static str,
    pub structural: f64,
    pub dig: f64,
    pub drishti: f64,
    pub lord: f64,
    pub total: f64,
}

pub fn structural_bala(rashi: u8) -> f64 {
    match quality(rashi) {
        Quality::Movable => 20.0,
        Quality::Fixed => 40.0,
        Quality::Dual => 60.0,
    }
}

/// Rashi Bala for Aries..Pisces. The lord component is the sign lord's
/// Graha Bala total.
pub fn compute_rashi_bala(chart: &ChartData, graha_bala: &BTreeMap<Graha, GrahaBala>) -> Vec<RashiBala> {
    let lagna = chart.lagna_rashi();
    (1..=12u8)
        .map(|rashi| {
            let structural = structural_bala(rashi);
            let dig = dig_strength(house_from(lagna, rashi), RASHI_DIG_HOUSE[rashi as usize - 1]);
            let midpoint = (rashi - 1) as f64 * 30.0 + 15.0;
            let drishti = net_drishti(chart, midpoint, None);
            let lord = graha_bala
                .get(&rashi_lord(rashi))
                .map(|bala| bala.total)
                .unwrap_or(0.0);
            RashiBala {
                rashi,
                name: rashi_name(rashi),
                structural,
                dig,
                drishti,
                lord,
                total: structural + dig + drishti + lord,
            }
        })
        .collect()
}
