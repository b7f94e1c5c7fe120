//! Grahas, rashis and the fixed classical tables indexed by them.
//!
//! Rashis are 1-based (1 = Aries .. 12 = Pisces). Graha tables are indexed by
//! [`Graha::index`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Graha {
    #[serde(rename = "Sy")]
    Sun,
    #[serde(rename = "Ch")]
    Moon,
    #[serde(rename = "Ma")]
    Mars,
    #[serde(rename = "Bu")]
    Mercury,
    #[serde(rename = "Gu")]
    Jupiter,
    #[serde(rename = "Sk")]
    Venus,
    #[serde(rename = "Sa")]
    Saturn,
    #[serde(rename = "Ra")]
    Rahu,
    #[serde(rename = "Ke")]
    Ketu,
}

/// Serialisation key of the ascendant, alongside the graha keys.
pub const LAGNA_KEY: &str = "Lg";

impl Graha {
    pub const ALL: [Graha; 9] = [
        Graha::Sun,
        Graha::Moon,
        Graha::Mars,
        Graha::Mercury,
        Graha::Jupiter,
        Graha::Venus,
        Graha::Saturn,
        Graha::Rahu,
        Graha::Ketu,
    ];

    /// The seven classical grahas (no lunar nodes).
    pub const SAPTA: [Graha; 7] = [
        Graha::Sun,
        Graha::Moon,
        Graha::Mars,
        Graha::Mercury,
        Graha::Jupiter,
        Graha::Venus,
        Graha::Saturn,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn key(self) -> &'static str {
        match self {
            Graha::Sun => "Sy",
            Graha::Moon => "Ch",
            Graha::Mars => "Ma",
            Graha::Mercury => "Bu",
            Graha::Jupiter => "Gu",
            Graha::Venus => "Sk",
            Graha::Saturn => "Sa",
            Graha::Rahu => "Ra",
            Graha::Ketu => "Ke",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Graha::Sun => "Surya",
            Graha::Moon => "Chandra",
            Graha::Mars => "Mangala",
            Graha::Mercury => "Budha",
            Graha::Jupiter => "Guru",
            Graha::Venus => "Shukra",
            Graha::Saturn => "Shani",
            Graha::Rahu => "Rahu",
            Graha::Ketu => "Ketu",
        }
    }

    pub fn from_key(key: &str) -> Option<Graha> {
        Graha::ALL.iter().copied().find(|g| g.key() == key)
    }

    pub fn is_node(self) -> bool {
        matches!(self, Graha::Rahu | Graha::Ketu)
    }

    /// Natural benefics: Moon, Mercury, Jupiter, Venus.
    pub fn is_natural_benefic(self) -> bool {
        matches!(
            self,
            Graha::Moon | Graha::Mercury | Graha::Jupiter | Graha::Venus
        )
    }

    /// Rashis owned by the graha. Nodes co-rule with Saturn and Mars.
    pub fn own_rashis(self) -> &'static [u8] {
        OWN_RASHIS[self.index()]
    }

    pub fn exaltation_rashi(self) -> u8 {
        EXALTATION_RASHI[self.index()]
    }

    pub fn debilitation_rashi(self) -> u8 {
        rashi_nth(self.exaltation_rashi(), 7)
    }

    /// Deep exaltation point in absolute sidereal degrees.
    pub fn exaltation_degree(self) -> f64 {
        EXALTATION_DEGREE[self.index()]
    }

    /// Moolatrikona sign and degree range `[start, end)` within it.
    pub fn moolatrikona(self) -> Option<(u8, f64, f64)> {
        MOOLATRIKONA[self.index()]
    }

    /// Houses aspected with full strength, counted from the graha's own sign.
    pub fn aspected_houses(self) -> &'static [u8] {
        match self {
            Graha::Mars => &[4, 7, 8],
            Graha::Jupiter => &[5, 7, 9],
            Graha::Saturn => &[3, 7, 10],
            Graha::Rahu | Graha::Ketu => &[5, 7, 9],
            _ => &[7],
        }
    }
}

pub const RASHI_NAMES: [&str; 12] = [
    "Mesha",
    "Vrishabha",
    "Mithuna",
    "Karka",
    "Simha",
    "Kanya",
    "Tula",
    "Vrishchika",
    "Dhanu",
    "Makara",
    "Kumbha",
    "Meena",
];

const OWN_RASHIS: [&[u8]; 9] = [
    &[5],
    &[4],
    &[1, 8],
    &[3, 6],
    &[9, 12],
    &[2, 7],
    &[10, 11],
    &[11],
    &[8],
];

const EXALTATION_RASHI: [u8; 9] = [1, 2, 10, 6, 4, 12, 7, 2, 8];

const EXALTATION_DEGREE: [f64; 9] = [10.0, 33.0, 298.0, 165.0, 95.0, 357.0, 200.0, 50.0, 230.0];

const MOOLATRIKONA: [Option<(u8, f64, f64)>; 9] = [
    Some((5, 0.0, 20.0)),
    Some((2, 4.0, 30.0)),
    Some((1, 0.0, 12.0)),
    Some((6, 16.0, 20.0)),
    Some((9, 0.0, 10.0)),
    Some((7, 0.0, 15.0)),
    Some((11, 0.0, 20.0)),
    None,
    None,
];

/// Lord of each rashi, Aries first.
const RASHI_LORDS: [Graha; 12] = [
    Graha::Mars,
    Graha::Venus,
    Graha::Mercury,
    Graha::Moon,
    Graha::Sun,
    Graha::Mercury,
    Graha::Venus,
    Graha::Mars,
    Graha::Jupiter,
    Graha::Saturn,
    Graha::Saturn,
    Graha::Jupiter,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Movable,
    Fixed,
    Dual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Fire,
    Earth,
    Air,
    Water,
}

/// Normalize degrees to [0, 360).
pub fn normalize_degrees(value: f64) -> f64 {
    let normalized = value.rem_euclid(360.0);
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

/// Shortest arc between two longitudes, 0..=180.
pub fn angular_separation(a: f64, b: f64) -> f64 {
    let d = normalize_degrees(a - b);
    if d > 180.0 {
        360.0 - d
    } else {
        d
    }
}

pub fn rashi_of(longitude: f64) -> u8 {
    ((normalize_degrees(longitude) / 30.0).floor() as u8).min(11) + 1
}

pub fn degree_in_rashi(longitude: f64) -> f64 {
    normalize_degrees(longitude) - (rashi_of(longitude) - 1) as f64 * 30.0
}

pub fn rashi_lord(rashi: u8) -> Graha {
    RASHI_LORDS[rashi_index(rashi)]
}

pub fn rashi_name(rashi: u8) -> &'static str {
    RASHI_NAMES[rashi_index(rashi)]
}

/// The rashi that is `nth` from `rashi`, counting `rashi` itself as the 1st.
pub fn rashi_nth(rashi: u8, nth: u8) -> u8 {
    ((rashi_index(rashi) + (nth as usize + 11) % 12) % 12) as u8 + 1
}

/// House number (1..=12) of `rashi` counted from `from`.
pub fn house_from(from: u8, rashi: u8) -> u8 {
    ((rashi_index(rashi) + 12 - rashi_index(from)) % 12) as u8 + 1
}

pub fn is_odd_rashi(rashi: u8) -> bool {
    rashi % 2 == 1
}

pub fn quality(rashi: u8) -> Quality {
    match rashi_index(rashi) % 3 {
        0 => Quality::Movable,
        1 => Quality::Fixed,
        _ => Quality::Dual,
    }
}

pub fn element(rashi: u8) -> Element {
    match rashi_index(rashi) % 4 {
        0 => Element::Fire,
        1 => Element::Earth,
        2 => Element::Air,
        _ => Element::Water,
    }
}

fn rashi_index(rashi: u8) -> usize {
    (rashi.max(1) as usize - 1) % 12
}

pub const KENDRA_HOUSES: [u8; 4] = [1, 4, 7, 10];
pub const TRIKONA_HOUSES: [u8; 3] = [1, 5, 9];
pub const DUSTHANA_HOUSES: [u8; 3] = [6, 8, 12];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NaturalRelation {
    Friend,
    Neutral,
    Enemy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TempRelation {
    Friend,
    Enemy,
}

/// Five-fold compound relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relation {
    AdhiMitra,
    Mitra,
    Sama,
    Shatru,
    AdhiShatru,
}

// (friends, enemies); anything else is neutral.
const NATURAL_RELATIONS: [(&[Graha], &[Graha]); 9] = [
    (&[Graha::Moon, Graha::Mars, Graha::Jupiter], &[Graha::Venus, Graha::Saturn]),
    (&[Graha::Sun, Graha::Mercury], &[]),
    (&[Graha::Sun, Graha::Moon, Graha::Jupiter], &[Graha::Mercury]),
    (&[Graha::Sun, Graha::Venus], &[Graha::Moon]),
    (&[Graha::Sun, Graha::Moon, Graha::Mars], &[Graha::Mercury, Graha::Venus]),
    (&[Graha::Mercury, Graha::Saturn], &[Graha::Sun, Graha::Moon]),
    (&[Graha::Mercury, Graha::Venus], &[Graha::Sun, Graha::Moon, Graha::Mars]),
    (&[Graha::Mercury, Graha::Venus, Graha::Saturn], &[Graha::Sun, Graha::Moon, Graha::Mars]),
    (&[Graha::Mercury, Graha::Venus, Graha::Saturn], &[Graha::Sun, Graha::Moon, Graha::Mars]),
];

pub fn natural_relation(from: Graha, to: Graha) -> NaturalRelation {
    let (friends, enemies) = NATURAL_RELATIONS[from.index()];
    if friends.contains(&to) {
        NaturalRelation::Friend
    } else if enemies.contains(&to) {
        NaturalRelation::Enemy
    } else {
        NaturalRelation::Neutral
    }
}

/// Friend when `to_rashi` is the 2nd, 3rd, 4th, 10th, 11th or 12th from `from_rashi`.
pub fn temporary_relation(from_rashi: u8, to_rashi: u8) -> TempRelation {
    match house_from(from_rashi, to_rashi) {
        2 | 3 | 4 | 10 | 11 | 12 => TempRelation::Friend,
        _ => TempRelation::Enemy,
    }
}

pub fn combine_relation(natural: NaturalRelation, temporary: TempRelation) -> Relation {
    match (natural, temporary) {
        (NaturalRelation::Friend, TempRelation::Friend) => Relation::AdhiMitra,
        (NaturalRelation::Neutral, TempRelation::Friend) => Relation::Mitra,
        (NaturalRelation::Friend, TempRelation::Enemy)
        | (NaturalRelation::Enemy, TempRelation::Friend) => Relation::Sama,
        (NaturalRelation::Neutral, TempRelation::Enemy) => Relation::Shatru,
        (NaturalRelation::Enemy, TempRelation::Enemy) => Relation::AdhiShatru,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rashi_of_boundaries() {
        assert_eq!(rashi_of(0.0), 1);
        assert_eq!(rashi_of(29.999), 1);
        assert_eq!(rashi_of(30.0), 2);
        assert_eq!(rashi_of(359.99), 12);
        assert_eq!(rashi_of(360.0), 1);
        assert_eq!(rashi_of(-15.0), 12);
    }

    #[test]
    fn test_rashi_counting() {
        assert_eq!(rashi_nth(1, 1), 1);
        assert_eq!(rashi_nth(1, 7), 7);
        assert_eq!(rashi_nth(11, 5), 3);
        assert_eq!(house_from(11, 3), 5);
        assert_eq!(house_from(5, 5), 1);
        assert_eq!(Graha::Sun.debilitation_rashi(), 7);
        assert_eq!(Graha::Saturn.debilitation_rashi(), 1);
    }

    #[test]
    fn test_quality_and_element() {
        assert_eq!(quality(1), Quality::Movable);
        assert_eq!(quality(2), Quality::Fixed);
        assert_eq!(quality(12), Quality::Dual);
        assert_eq!(element(9), Element::Fire);
        assert_eq!(element(10), Element::Earth);
        assert_eq!(element(11), Element::Air);
        assert_eq!(element(8), Element::Water);
    }

    #[test]
    fn test_lordship() {
        assert_eq!(rashi_lord(1), Graha::Mars);
        assert_eq!(rashi_lord(12), Graha::Jupiter);
        for graha in Graha::SAPTA {
            for &rashi in graha.own_rashis() {
                assert_eq!(rashi_lord(rashi), graha);
            }
        }
    }

    #[test]
    fn test_combined_relation() {
        assert_eq!(
            combine_relation(natural_relation(Graha::Sun, Graha::Moon), TempRelation::Friend),
            Relation::AdhiMitra
        );
        assert_eq!(
            combine_relation(natural_relation(Graha::Sun, Graha::Saturn), TempRelation::Friend),
            Relation::Sama
        );
        assert_eq!(
            combine_relation(natural_relation(Graha::Moon, Graha::Saturn), TempRelation::Enemy),
            Relation::Shatru
        );
    }

    #[test]
    fn test_graha_keys_round_trip() {
        for graha in Graha::ALL {
            assert_eq!(Graha::from_key(graha.key()), Some(graha));
            let json = serde_json::to_string(&graha).unwrap();
            assert_eq!(json, format!("\"{}\"", graha.key()));
        }
    }
}
