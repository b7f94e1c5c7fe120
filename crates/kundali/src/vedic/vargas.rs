//! Divisional chart (varga) engine.
//!
//! Each varga divides a sign into `n` segments and maps every segment to a
//! sign. The mapping for each supported code is a fixed table: the sign that
//! receives the first segment of every rashi, and the step (in signs) between
//! consecutive segments. Hora (D2) and Trimshamsha (D30) use unequal or
//! two-sign schemes and have their own tables.
//!
//! Exact segment boundaries belong to the following segment.

use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde::{Serialize, Serializer};

use crate::error::RequestError;
use crate::vedic::graha::{degree_in_rashi, house_from, is_odd_rashi, rashi_nth, rashi_of, Graha};
use crate::vedic::types::ChartData;

/// Absorbs float representation error at segment boundaries.
const BOUNDARY_EPSILON: f64 = 1e-9;

lazy_static::lazy_static! {
    static ref VARGA_CODE_RE: Regex = Regex::new(r"^[Dd](\d{1,2})$").expect("Invalid regex");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VargaCode(u8);

impl VargaCode {
    pub const D1: VargaCode = VargaCode(1);
    pub const D2: VargaCode = VargaCode(2);
    pub const D3: VargaCode = VargaCode(3);
    pub const D7: VargaCode = VargaCode(7);
    pub const D9: VargaCode = VargaCode(9);
    pub const D12: VargaCode = VargaCode(12);
    pub const D30: VargaCode = VargaCode(30);

    pub fn division(self) -> u8 {
        self.0
    }

    pub fn label(self) -> &'static str {
        spec_for(self).label
    }

    pub fn supported() -> impl Iterator<Item = VargaCode> {
        VARGAS.iter().map(|spec| VargaCode(spec.division))
    }
}

impl fmt::Display for VargaCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "D{}", self.0)
    }
}

impl FromStr for VargaCode {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unsupported = || RequestError::invalid("varga", format!("unsupported varga code '{}'", s));
        let caps = VARGA_CODE_RE.captures(s.trim()).ok_or_else(unsupported)?;
        let division: u8 = caps[1].parse().map_err(|_| unsupported())?;
        VARGAS
            .iter()
            .find(|spec| spec.division == division)
            .map(|spec| VargaCode(spec.division))
            .ok_or_else(unsupported)
    }
}

impl Serialize for VargaCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

enum Rule {
    /// Segment `k` of rashi `r` falls in the `(1 + k * step)`th sign from `start[r]`.
    Cyclic { start: [u8; 12], step: u8 },
    Hora,
    Trimshamsha,
}

struct VargaSpec {
    division: u8,
    label: &'static str,
    rule: Rule,
}

const FROM_SELF: [u8; 12] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];

const VARGAS: &[VargaSpec] = &[
    VargaSpec { division: 1, label: "Rashi", rule: Rule::Cyclic { start: FROM_SELF, step: 1 } },
    VargaSpec { division: 2, label: "Hora", rule: Rule::Hora },
    VargaSpec { division: 3, label: "Drekkana", rule: Rule::Cyclic { start: FROM_SELF, step: 4 } },
    VargaSpec { division: 4, label: "Chaturthamsha", rule: Rule::Cyclic { start: FROM_SELF, step: 3 } },
    VargaSpec {
        division: 7,
        label: "Saptamsha",
        rule: Rule::Cyclic { start: [1, 8, 3, 10, 5, 12, 7, 2, 9, 4, 11, 6], step: 1 },
    },
    VargaSpec {
        division: 9,
        label: "Navamsha",
        rule: Rule::Cyclic { start: [1, 10, 7, 4, 1, 10, 7, 4, 1, 10, 7, 4], step: 1 },
    },
    VargaSpec {
        division: 10,
        label: "Dashamsha",
        rule: Rule::Cyclic { start: [1, 10, 3, 12, 5, 2, 7, 4, 9, 6, 11, 8], step: 1 },
    },
    VargaSpec { division: 12, label: "Dvadashamsha", rule: Rule::Cyclic { start: FROM_SELF, step: 1 } },
    VargaSpec {
        division: 16,
        label: "Shodashamsha",
        rule: Rule::Cyclic { start: [1, 5, 9, 1, 5, 9, 1, 5, 9, 1, 5, 9], step: 1 },
    },
    VargaSpec {
        division: 20,
        label: "Vimshamsha",
        rule: Rule::Cyclic { start: [1, 9, 5, 1, 9, 5, 1, 9, 5, 1, 9, 5], step: 1 },
    },
    VargaSpec {
        division: 24,
        label: "Chaturvimshamsha",
        rule: Rule::Cyclic { start: [5, 4, 5, 4, 5, 4, 5, 4, 5, 4, 5, 4], step: 1 },
    },
    VargaSpec {
        division: 27,
        label: "Bhamsha",
        rule: Rule::Cyclic { start: [1, 4, 7, 10, 1, 4, 7, 10, 1, 4, 7, 10], step: 1 },
    },
    VargaSpec { division: 30, label: "Trimshamsha", rule: Rule::Trimshamsha },
    VargaSpec {
        division: 40,
        label: "Khavedamsha",
        rule: Rule::Cyclic { start: [1, 7, 1, 7, 1, 7, 1, 7, 1, 7, 1, 7], step: 1 },
    },
    VargaSpec {
        division: 45,
        label: "Akshavedamsha",
        rule: Rule::Cyclic { start: [1, 5, 9, 1, 5, 9, 1, 5, 9, 1, 5, 9], step: 1 },
    },
    VargaSpec { division: 60, label: "Shashtiamsha", rule: Rule::Cyclic { start: FROM_SELF, step: 1 } },
];

// (upper bound in degrees, rashi) for odd and even signs.
const TRIMSHAMSHA_ODD: [(f64, u8); 5] = [(5.0, 1), (10.0, 11), (18.0, 9), (25.0, 3), (30.0, 7)];
const TRIMSHAMSHA_EVEN: [(f64, u8); 5] = [(5.0, 2), (12.0, 6), (20.0, 12), (25.0, 10), (30.0, 8)];

/// `VargaCode` values are only built from `VARGAS` entries, so the lookup
/// always succeeds.
fn spec_for(code: VargaCode) -> &'static VargaSpec {
    let found = VARGAS.iter().find(|spec| spec.division == code.0);
    debug_assert!(found.is_some(), "no varga rule for {}", code);
    found.unwrap_or(&VARGAS[0])
}

/// Sign and degree within that sign of a longitude in the given varga.
pub fn varga_position(code: VargaCode, longitude: f64) -> (u8, f64) {
    let rashi = rashi_of(longitude);
    let degree = degree_in_rashi(longitude);
    let spec = spec_for(code);

    match &spec.rule {
        Rule::Cyclic { start, step } => {
            let n = spec.division as f64;
            let scaled = degree * n / 30.0;
            let segment = ((scaled + BOUNDARY_EPSILON).floor() as u8).min(spec.division - 1);
            let varga_degree = ((scaled - segment as f64) * 30.0).clamp(0.0, 30.0);
            let start_rashi = start[(rashi - 1) as usize];
            (rashi_nth(start_rashi, 1 + segment * step), varga_degree)
        }
        Rule::Hora => {
            let second_half = degree + BOUNDARY_EPSILON >= 15.0;
            let target = match (is_odd_rashi(rashi), second_half) {
                (true, false) | (false, true) => 5,
                _ => 4,
            };
            let within = if second_half { degree - 15.0 } else { degree };
            (target, (within * 2.0).clamp(0.0, 30.0))
        }
        Rule::Trimshamsha => {
            let table = if is_odd_rashi(rashi) { &TRIMSHAMSHA_ODD } else { &TRIMSHAMSHA_EVEN };
            let mut lower = 0.0;
            for &(upper, target) in table.iter() {
                if degree + BOUNDARY_EPSILON < upper || upper >= 30.0 {
                    let span = upper - lower;
                    return (target, ((degree - lower) / span * 30.0).clamp(0.0, 30.0));
                }
                lower = upper;
            }
            (table[4].1, 0.0)
        }
    }
}

/// Sign and whole-sign house of one body in a varga.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub rashi: u8,
    pub degree: f64,
    pub bhava: u8,
}

/// Placements of the ascendant and every graha in one divisional chart.
#[derive(Debug, Clone)]
pub struct VargaChart {
    pub code: VargaCode,
    pub lagna: Placement,
    grahas: [Placement; 9],
}

impl VargaChart {
    pub fn placement(&self, graha: Graha) -> &Placement {
        &self.grahas[graha.index()]
    }

    pub fn rashi(&self, graha: Graha) -> u8 {
        self.grahas[graha.index()].rashi
    }
}

/// Build the divisional chart for `code`; houses count from the varga lagna.
pub fn build_varga(chart: &ChartData, code: VargaCode) -> VargaChart {
    let (lagna_rashi, lagna_degree) = varga_position(code, chart.ascendant);
    let grahas = Graha::ALL.map(|graha| {
        let (rashi, degree) = varga_position(code, chart.longitude(graha));
        Placement {
            rashi,
            degree,
            bhava: house_from(lagna_rashi, rashi),
        }
    });
    VargaChart {
        code,
        lagna: Placement {
            rashi: lagna_rashi,
            degree: lagna_degree,
            bhava: 1,
        },
        grahas,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vedic::types::fixtures::chart_with;

    fn sign(code: VargaCode, longitude: f64) -> u8 {
        varga_position(code, longitude).0
    }

    #[test]
    fn test_parse_codes() {
        assert_eq!("D9".parse::<VargaCode>().unwrap(), VargaCode::D9);
        assert_eq!("d30".parse::<VargaCode>().unwrap(), VargaCode::D30);
        assert!("D5".parse::<VargaCode>().is_err());
        assert!("X9".parse::<VargaCode>().is_err());
        assert_eq!(VargaCode::D9.to_string(), "D9");
        assert_eq!(VargaCode::supported().count(), 16);
    }

    #[test]
    fn test_every_code_has_its_own_rule() {
        let named = [
            VargaCode::D1,
            VargaCode::D2,
            VargaCode::D3,
            VargaCode::D7,
            VargaCode::D9,
            VargaCode::D12,
            VargaCode::D30,
        ];
        for code in named.into_iter().chain(VargaCode::supported()) {
            assert_eq!(spec_for(code).division, code.division());
        }
        assert_eq!(VargaCode::D9.label(), "Navamsha");
    }

    #[test]
    fn test_navamsha_starting_signs() {
        // Aries from Aries, Taurus from Capricorn, Gemini from Libra, Cancer from Cancer.
        assert_eq!(sign(VargaCode::D9, 0.0), 1);
        assert_eq!(sign(VargaCode::D9, 30.0), 10);
        assert_eq!(sign(VargaCode::D9, 60.0), 7);
        assert_eq!(sign(VargaCode::D9, 90.0), 4);
        assert_eq!(sign(VargaCode::D9, 359.9), 12);
    }

    #[test]
    fn test_hora_halves() {
        assert_eq!(sign(VargaCode::D2, 14.99), 5);
        assert_eq!(sign(VargaCode::D2, 15.0), 4);
        // Taurus is even: Cancer first, Leo second.
        assert_eq!(sign(VargaCode::D2, 44.0), 4);
        assert_eq!(sign(VargaCode::D2, 46.0), 5);
    }

    #[test]
    fn test_every_code_places_in_range() {
        let chart = chart_with(328.0, [249.2, 44.2, 235.0, 244.0, 11.4, 208.0, 310.0, 355.0, 175.0]);
        for code in VargaCode::supported() {
            let varga = build_varga(&chart, code);
            for graha in Graha::ALL {
                let p = varga.placement(graha);
                assert!((1..=12).contains(&p.rashi), "{} {:?}", code, graha);
                assert!((1..=12).contains(&p.bhava), "{} {:?}", code, graha);
                assert!(p.degree >= 0.0 && p.degree <= 30.0);
            }
            assert_eq!(varga.lagna.bhava, 1);
        }
    }

    #[test]
    fn test_d1_matches_rashi() {
        let chart = chart_with(328.0, [249.2, 44.2, 235.0, 244.0, 11.4, 208.0, 310.0, 355.0, 175.0]);
        let d1 = build_varga(&chart, VargaCode::D1);
        for graha in Graha::ALL {
            assert_eq!(d1.rashi(graha), chart.rashi(graha));
            assert_eq!(d1.placement(graha).bhava, chart.bhava(graha));
            assert!((d1.placement(graha).degree - chart.degree(graha)).abs() < 1e-9);
        }
    }
}
