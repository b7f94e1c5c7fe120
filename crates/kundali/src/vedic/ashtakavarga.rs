//! Ashtakavarga bindu scoring.
//!
//! Each of the seven classical grahas receives a Bhinnashtakavarga: eight
//! contributors (the seven grahas and the lagna) each give one bindu to the
//! signs at fixed distances from themselves. Per-graha totals are constant for
//! every chart (Sun 48, Moon 49, Mars 39, Mercury 54, Jupiter 56, Venus 52,
//! Saturn 39), and the Sarvashtakavarga always sums to 337.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::vedic::graha::{house_from, Graha, LAGNA_KEY};
use crate::vedic::types::ChartData;

pub const SARVA_TOTAL: u16 = 337;

/// Benefic places, counted from the contributor (1 = its own sign).
/// Rows are targets Sun..Saturn; columns are contributors Sun..Saturn, Lagna.
const BENEFIC_PLACES: [[&[u8]; 8]; 7] = [
    [
        &[1, 2, 4, 7, 8, 9, 10, 11],
        &[3, 6, 10, 11],
        &[1, 2, 4, 7, 8, 9, 10, 11],
        &[3, 5, 6, 9, 10, 11, 12],
        &[5, 6, 9, 11],
        &[6, 7, 12],
        &[1, 2, 4, 7, 8, 9, 10, 11],
        &[3, 4, 6, 10, 11, 12],
    ],
    [
        &[3, 6, 7, 8, 10, 11],
        &[1, 3, 6, 7, 10, 11],
        &[2, 3, 5, 6, 9, 10, 11],
        &[1, 3, 4, 5, 7, 8, 10, 11],
        &[1, 4, 7, 8, 10, 11, 12],
        &[3, 4, 5, 7, 9, 10, 11],
        &[3, 5, 6, 11],
        &[3, 6, 10, 11],
    ],
    [
        &[3, 5, 6, 10, 11],
        &[3, 6, 11],
        &[1, 2, 4, 7, 8, 10, 11],
        &[3, 5, 6, 11],
        &[6, 10, 11, 12],
        &[6, 8, 11, 12],
        &[1, 4, 7, 8, 9, 10, 11],
        &[1, 3, 6, 10, 11],
    ],
    [
        &[5, 6, 9, 11, 12],
        &[2, 4, 6, 8, 10, 11],
        &[1, 2, 4, 7, 8, 9, 10, 11],
        &[1, 3, 5, 6, 9, 10, 11, 12],
        &[6, 8, 11, 12],
        &[1, 2, 3, 4, 5, 8, 9, 11],
        &[1, 2, 4, 7, 8, 9, 10, 11],
        &[1, 2, 4, 6, 8, 10, 11],
    ],
    [
        &[1, 2, 3, 4, 7, 8, 9, 10, 11],
        &[2, 5, 7, 9, 11],
        &[1, 2, 4, 7, 8, 10, 11],
        &[1, 2, 4, 5, 6, 9, 10, 11],
        &[1, 2, 3, 4, 7, 8, 10, 11],
        &[2, 5, 6, 9, 10, 11],
        &[3, 5, 6, 12],
        &[1, 2, 4, 5, 6, 7, 9, 10, 11],
    ],
    [
        &[8, 11, 12],
        &[1, 2, 3, 4, 5, 8, 9, 11, 12],
        &[3, 4, 6, 9, 11, 12],
        &[3, 5, 6, 9, 11],
        &[5, 8, 9, 10, 11],
        &[1, 2, 3, 4, 5, 8, 9, 10, 11],
        &[3, 4, 5, 8, 9, 10, 11],
        &[1, 2, 3, 4, 5, 8, 9, 11],
    ],
    [
        &[1, 2, 4, 7, 8, 10, 11],
        &[3, 6, 11],
        &[3, 5, 6, 10, 11, 12],
        &[6, 8, 9, 10, 11, 12],
        &[5, 6, 11, 12],
        &[6, 11, 12],
        &[3, 5, 6, 11],
        &[1, 3, 4, 6, 10, 11],
    ],
];

/// One graha's Bhinnashtakavarga.
#[derive(Debug, Clone, Serialize)]
pub struct BhinnaGrid {
    /// Bindus given by each contributor, per rashi (Aries first).
    pub contributions: BTreeMap<&'static str, [u8; 12]>,
    /// Bindus per rashi, 0..=8.
    pub bindus: [u8; 12],
    pub total: u16,
}

#[derive(Debug, Clone, Serialize)]
pub struct SarvaGrid {
    /// Bindus per rashi, 0..=56.
    pub bindus: [u16; 12],
    pub total: u16,
}

#[derive(Debug, Clone, Serialize)]
pub struct Ashtakavarga {
    pub bhinna: BTreeMap<Graha, BhinnaGrid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sarva: Option<SarvaGrid>,
}

/// Bhinnashtakavarga of one of the seven classical grahas; `None` for the nodes.
pub fn bhinna_ashtakavarga(chart: &ChartData, target: Graha) -> Option<BhinnaGrid> {
    let rules = BENEFIC_PLACES.get(target.index())?;

    let contributor_rashis = Graha::SAPTA
        .iter()
        .map(|g| (g.key(), chart.rashi(*g)))
        .chain(std::iter::once((LAGNA_KEY, chart.lagna_rashi())));

    let mut contributions = BTreeMap::new();
    let mut bindus = [0u8; 12];
    for ((key, from), places) in contributor_rashis.zip(rules.iter()) {
        let mut row = [0u8; 12];
        for (i, cell) in row.iter_mut().enumerate() {
            let place = house_from(from, i as u8 + 1);
            if places.contains(&place) {
                *cell = 1;
                bindus[i] += 1;
            }
        }
        contributions.insert(key, row);
    }

    Some(BhinnaGrid {
        contributions,
        total: bindus.iter().map(|b| *b as u16).sum(),
        bindus,
    })
}

pub fn sarva_ashtakavarga(bhinna: &BTreeMap<Graha, BhinnaGrid>) -> SarvaGrid {
    let mut bindus = [0u16; 12];
    for grid in bhinna.values() {
        for (total, b) in bindus.iter_mut().zip(grid.bindus.iter()) {
            *total += *b as u16;
        }
    }
    SarvaGrid {
        total: bindus.iter().sum(),
        bindus,
    }
}

pub fn compute_ashtakavarga(chart: &ChartData, include_sarva: bool) -> Ashtakavarga {
    let bhinna: BTreeMap<Graha, BhinnaGrid> = Graha::SAPTA
        .iter()
        .filter_map(|g| bhinna_ashtakavarga(chart, *g).map(|grid| (*g, grid)))
        .collect();
    let sarva = include_sarva.then(|| sarva_ashtakavarga(&bhinna));
    Ashtakavarga { bhinna, sarva }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vedic::types::fixtures::chart_with;

    #[test]
    fn test_table_totals() {
        let expected: [usize; 7] = [48, 49, 39, 54, 56, 52, 39];
        for (rules, total) in BENEFIC_PLACES.iter().zip(expected) {
            let count: usize = rules.iter().map(|places| places.len()).sum();
            assert_eq!(count, total);
        }
    }

    #[test]
    fn test_nodes_have_no_grid() {
        let chart = chart_with(0.0, [0.0, 30.0, 60.0, 90.0, 120.0, 150.0, 180.0, 210.0, 30.0]);
        assert!(bhinna_ashtakavarga(&chart, Graha::Rahu).is_none());
        assert!(bhinna_ashtakavarga(&chart, Graha::Sun).is_some());
    }

    #[test]
    fn test_all_in_one_sign() {
        // Everything in Aries: every contributor counts from Aries, so the
        // Sun's grid in Aries equals the number of rows containing place 1.
        let chart = chart_with(5.0, [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 188.0]);
        let sun = bhinna_ashtakavarga(&chart, Graha::Sun).unwrap();
        assert_eq!(sun.bindus[0], 3);
        assert_eq!(sun.total, 48);
        assert_eq!(sun.contributions.len(), 8);
    }
}
