//! Yoga detection for Vedic astrology.
//!
//! Yogas are planetary combinations judged from whole-sign houses counted
//! from the lagna. Each detector returns every match it finds; the catalogue
//! is applied in a fixed order so the output is deterministic.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::vedic::graha::{
    house_from, quality, rashi_lord, Graha, Quality, DUSTHANA_HOUSES, KENDRA_HOUSES, TRIKONA_HOUSES,
};
use crate::vedic::types::ChartData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum YogaType {
    Dhana,
    Mahapurusha,
    Nabhasha,
    Parivarthana,
    Raja,
    Sannyasa,
}

#[derive(Debug, Clone, Serialize)]
pub struct YogaMatch {
    pub name: String,
    #[serde(rename = "type")]
    pub yoga_type: YogaType,
    pub grahas: Vec<Graha>,
    pub houses: Vec<u8>,
    pub description: String,
}

const MAHAPURUSHA: [(Graha, &str); 5] = [
    (Graha::Mars, "Ruchaka"),
    (Graha::Mercury, "Bhadra"),
    (Graha::Jupiter, "Hamsa"),
    (Graha::Venus, "Malavya"),
    (Graha::Saturn, "Shasha"),
];

const WEALTH_HOUSES: [u8; 5] = [1, 2, 5, 9, 11];

/// Sankhya yoga names by the number of occupied signs (1..=7).
const SANKHYA_NAMES: [&str; 7] = ["Gola", "Yuga", "Shula", "Kedara", "Pasha", "Dama", "Vallaki"];

const NATURAL_MALEFICS: [Graha; 3] = [Graha::Sun, Graha::Mars, Graha::Saturn];

/// How two grahas are linked: in the same sign, or each aspecting the other's
/// sign.
fn connection(chart: &ChartData, a: Graha, b: Graha) -> Option<&'static str> {
    if chart.rashi(a) == chart.rashi(b) {
        Some("conjunct")
    } else if chart.aspects_rashi(a, chart.rashi(b)) && chart.aspects_rashi(b, chart.rashi(a)) {
        Some("in mutual aspect")
    } else {
        None
    }
}

fn ordered(a: Graha, b: Graha) -> (Graha, Graha) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Pancha Mahapurusha: Mars, Mercury, Jupiter, Venus or Saturn in a kendra
/// in its own or exaltation sign.
pub fn mahapurusha_yogas(chart: &ChartData) -> Vec<YogaMatch> {
    MAHAPURUSHA
        .iter()
        .filter_map(|(graha, name)| {
            let house = chart.bhava(*graha);
            let rashi = chart.rashi(*graha);
            let dignified = graha.own_rashis().contains(&rashi) || graha.exaltation_rashi() == rashi;
            (KENDRA_HOUSES.contains(&house) && dignified).then(|| YogaMatch {
                name: format!("{} Yoga", name),
                yoga_type: YogaType::Mahapurusha,
                grahas: vec![*graha],
                houses: vec![house],
                description: format!(
                    "{} in house {} in its own or exaltation sign",
                    graha.name(),
                    house
                ),
            })
        })
        .collect()
}

/// Lords of two house groups linked by conjunction or mutual aspect,
/// grouped by the pair of grahas.
fn lord_links(chart: &ChartData, first: &[u8], second: &[u8]) -> BTreeMap<(Graha, Graha), (BTreeSet<u8>, &'static str)> {
    let mut links: BTreeMap<(Graha, Graha), (BTreeSet<u8>, &'static str)> = BTreeMap::new();
    for &h1 in first {
        for &h2 in second {
            if h1 == h2 {
                continue;
            }
            let (l1, l2) = (chart.house_lord(h1), chart.house_lord(h2));
            if l1 == l2 {
                continue;
            }
            if let Some(how) = connection(chart, l1, l2) {
                let entry = links.entry(ordered(l1, l2)).or_insert_with(|| (BTreeSet::new(), how));
                entry.0.insert(h1);
                entry.0.insert(h2);
            }
        }
    }
    links
}

/// A kendra lord and a trikona lord joined by conjunction or mutual aspect.
pub fn raja_yogas(chart: &ChartData) -> Vec<YogaMatch> {
    lord_links(chart, &KENDRA_HOUSES, &TRIKONA_HOUSES)
        .into_iter()
        .map(|((a, b), (houses, how))| YogaMatch {
            name: "Raja Yoga".to_string(),
            yoga_type: YogaType::Raja,
            grahas: vec![a, b],
            houses: houses.iter().copied().collect(),
            description: format!(
                "Kendra and trikona lords {} and {} are {}",
                a.name(),
                b.name(),
                how
            ),
        })
        .collect()
}

/// Lords of two wealth houses (1, 2, 5, 9, 11) joined by conjunction or
/// mutual aspect.
pub fn dhana_yogas(chart: &ChartData) -> Vec<YogaMatch> {
    lord_links(chart, &WEALTH_HOUSES, &WEALTH_HOUSES)
        .into_iter()
        .map(|((a, b), (houses, how))| YogaMatch {
            name: "Dhana Yoga".to_string(),
            yoga_type: YogaType::Dhana,
            grahas: vec![a, b],
            houses: houses.iter().copied().collect(),
            description: format!("Wealth lords {} and {} are {}", a.name(), b.name(), how),
        })
        .collect()
}

/// Two grahas in each other's signs. Dainya when a dusthana is involved,
/// Khala when the 3rd is, otherwise Maha.
pub fn parivarthana_yogas(chart: &ChartData) -> Vec<YogaMatch> {
    let mut found = Vec::new();
    for (i, &a) in Graha::SAPTA.iter().enumerate() {
        for &b in &Graha::SAPTA[i + 1..] {
            if rashi_lord(chart.rashi(a)) != b || rashi_lord(chart.rashi(b)) != a {
                continue;
            }
            let mut houses = vec![chart.bhava(a), chart.bhava(b)];
            houses.sort_unstable();
            let kind = if houses.iter().any(|h| DUSTHANA_HOUSES.contains(h)) {
                "Dainya"
            } else if houses.contains(&3) {
                "Khala"
            } else {
                "Maha"
            };
            found.push(YogaMatch {
                name: format!("{} Parivarthana Yoga", kind),
                yoga_type: YogaType::Parivarthana,
                grahas: vec![a, b],
                description: format!(
                    "{} and {} exchange signs between houses {} and {}",
                    a.name(),
                    b.name(),
                    houses[0],
                    houses[1]
                ),
                houses,
            });
        }
    }
    found
}

/// Four or more of the seven classical grahas in one sign.
pub fn sannyasa_yogas(chart: &ChartData) -> Vec<YogaMatch> {
    (1..=12u8)
        .filter_map(|rashi| {
            let grahas: Vec<Graha> = chart
                .occupants(rashi)
                .into_iter()
                .filter(|g| !g.is_node())
                .collect();
            let house = house_from(chart.lagna_rashi(), rashi);
            (grahas.len() >= 4).then(|| YogaMatch {
                name: "Pravrajya Yoga".to_string(),
                yoga_type: YogaType::Sannyasa,
                description: format!("{} grahas gathered in house {}", grahas.len(), house),
                grahas,
                houses: vec![house],
            })
        })
        .collect()
}

/// Nabhasha yogas of the Sankhya, Ashraya and Dala groups.
pub fn nabhasha_yogas(chart: &ChartData) -> Vec<YogaMatch> {
    let mut found = Vec::new();
    let grahas: Vec<Graha> = Graha::SAPTA.to_vec();
    let occupied: BTreeSet<u8> = grahas.iter().map(|g| chart.bhava(*g)).collect();

    let count = occupied.len();
    found.push(YogaMatch {
        name: format!("{} Yoga", SANKHYA_NAMES[count - 1]),
        yoga_type: YogaType::Nabhasha,
        grahas: grahas.clone(),
        houses: occupied.iter().copied().collect(),
        description: format!("The seven grahas occupy {} signs", count),
    });

    let qualities: BTreeSet<_> = grahas
        .iter()
        .map(|g| match quality(chart.rashi(*g)) {
            Quality::Movable => 0,
            Quality::Fixed => 1,
            Quality::Dual => 2,
        })
        .collect();
    if qualities.len() == 1 {
        let (name, kind) = match quality(chart.rashi(Graha::Sun)) {
            Quality::Movable => ("Rajju", "movable"),
            Quality::Fixed => ("Musala", "fixed"),
            Quality::Dual => ("Nala", "dual"),
        };
        found.push(YogaMatch {
            name: format!("{} Yoga", name),
            yoga_type: YogaType::Nabhasha,
            grahas: grahas.clone(),
            houses: occupied.iter().copied().collect(),
            description: format!("All seven grahas in {} signs", kind),
        });
    }

    let in_kendras = |set: &[Graha]| -> BTreeSet<u8> {
        set.iter()
            .map(|g| chart.bhava(*g))
            .filter(|h| KENDRA_HOUSES.contains(h))
            .collect()
    };
    let benefics: Vec<Graha> = grahas.iter().copied().filter(|g| g.is_natural_benefic()).collect();
    let benefic_kendras = in_kendras(&benefics);
    let malefic_kendras = in_kendras(&NATURAL_MALEFICS);
    let dala = if benefic_kendras.len() >= 3 && malefic_kendras.is_empty() {
        Some(("Mala", benefics, benefic_kendras, "benefics"))
    } else if malefic_kendras.len() >= 3 && benefic_kendras.is_empty() {
        Some(("Sarpa", NATURAL_MALEFICS.to_vec(), malefic_kendras, "malefics"))
    } else {
        None
    };
    if let Some((name, members, houses, kind)) = dala {
        let grahas = members
            .into_iter()
            .filter(|g| KENDRA_HOUSES.contains(&chart.bhava(*g)))
            .collect();
        found.push(YogaMatch {
            name: format!("{} Yoga", name),
            yoga_type: YogaType::Nabhasha,
            grahas,
            description: format!("Natural {} hold {} kendras", kind, houses.len()),
            houses: houses.into_iter().collect(),
        });
    }

    found
}

/// Run the whole catalogue.
pub fn detect_yogas(chart: &ChartData) -> Vec<YogaMatch> {
    let mut yogas = Vec::new();
    yogas.extend(mahapurusha_yogas(chart));
    yogas.extend(raja_yogas(chart));
    yogas.extend(dhana_yogas(chart));
    yogas.extend(parivarthana_yogas(chart));
    yogas.extend(sannyasa_yogas(chart));
    yogas.extend(nabhasha_yogas(chart));
    log::debug!("Detected {} yogas", yogas.len());
    yogas
}
