use serde::Serialize;

use crate::ephemeris::{Ephemeris, Locality, RawPosition, RisingTimes};
use crate::error::EphemerisError;
use crate::timezone::Moment;
use crate::vedic::graha::{
    degree_in_rashi, house_from, normalize_degrees, rashi_lord, rashi_nth, rashi_of, Graha,
};

/// Position of one graha at the chart moment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GrahaPosition {
    pub longitude: f64,
    pub speed: f64,
    pub declination: f64,
    pub retrograde: bool,
}

impl From<RawPosition> for GrahaPosition {
    fn from(raw: RawPosition) -> Self {
        Self {
            longitude: normalize_degrees(raw.longitude),
            speed: raw.speed,
            declination: raw.declination,
            retrograde: raw.speed < 0.0,
        }
    }
}

/// Immutable snapshot of every graha and the ascendant at one moment.
///
/// All derivations (vargas, state, bala, dasha, yogas, panchanga) are pure
/// functions over this snapshot.
#[derive(Debug, Clone)]
pub struct ChartData {
    pub moment: Moment,
    pub locality: Locality,
    pub ascendant: f64,
    pub ayanamsa: Option<f64>,
    pub rising: Option<RisingTimes>,
    grahas: [GrahaPosition; 9],
}

impl ChartData {
    /// Build a snapshot from explicit positions, indexed by [`Graha::index`].
    pub fn from_positions(
        moment: Moment,
        locality: Locality,
        ascendant: f64,
        positions: [RawPosition; 9],
    ) -> Self {
        Self {
            moment,
            locality,
            ascendant: normalize_degrees(ascendant),
            ayanamsa: None,
            rising: None,
            grahas: positions.map(GrahaPosition::from),
        }
    }

    /// Query the ephemeris for every graha and the ascendant.
    ///
    /// Ketu is placed opposite Rahu. Ayanamsa and rising times are optional
    /// extras and are left empty when the ephemeris cannot supply them.
    pub fn observe(
        ephemeris: &dyn Ephemeris,
        moment: Moment,
        locality: Locality,
    ) -> Result<Self, EphemerisError> {
        let instant = moment.utc();
        let mut positions = [RawPosition {
            longitude: 0.0,
            speed: 0.0,
            declination: 0.0,
        }; 9];
        for graha in Graha::ALL.iter().copied().filter(|g| *g != Graha::Ketu) {
            positions[graha.index()] = ephemeris.position(graha, instant, &locality)?;
        }
        let rahu = positions[Graha::Rahu.index()];
        positions[Graha::Ketu.index()] = RawPosition {
            longitude: normalize_degrees(rahu.longitude + 180.0),
            speed: rahu.speed,
            declination: -rahu.declination,
        };

        let ascendant = ephemeris.ascendant(instant, &locality)?;
        let mut chart = Self::from_positions(moment, locality, ascendant, positions);

        chart.ayanamsa = match ephemeris.ayanamsa(instant) {
            Ok(value) => Some(value),
            Err(e) => {
                log::debug!("Ayanamsa unavailable: {}", e);
                None
            }
        };
        chart.rising = match ephemeris.rising(instant, &locality) {
            Ok(times) => Some(times),
            Err(e) => {
                log::debug!("Rising times unavailable: {}", e);
                None
            }
        };
        Ok(chart)
    }

    pub fn with_rising(mut self, rising: RisingTimes) -> Self {
        self.rising = Some(rising);
        self
    }

    pub fn position(&self, graha: Graha) -> &GrahaPosition {
        &self.grahas[graha.index()]
    }

    pub fn longitude(&self, graha: Graha) -> f64 {
        self.grahas[graha.index()].longitude
    }

    pub fn rashi(&self, graha: Graha) -> u8 {
        rashi_of(self.longitude(graha))
    }

    pub fn degree(&self, graha: Graha) -> f64 {
        degree_in_rashi(self.longitude(graha))
    }

    pub fn lagna_rashi(&self) -> u8 {
        rashi_of(self.ascendant)
    }

    /// Whole-sign house of the graha counted from the lagna.
    pub fn bhava(&self, graha: Graha) -> u8 {
        house_from(self.lagna_rashi(), self.rashi(graha))
    }

    pub fn house_rashi(&self, house: u8) -> u8 {
        rashi_nth(self.lagna_rashi(), house)
    }

    pub fn house_lord(&self, house: u8) -> Graha {
        rashi_lord(self.house_rashi(house))
    }

    /// Houses (from the lagna) whose sign the graha rules.
    pub fn houses_owned(&self, graha: Graha) -> Vec<u8> {
        (1..=12).filter(|&h| self.house_lord(h) == graha).collect()
    }

    pub fn occupants(&self, rashi: u8) -> Vec<Graha> {
        Graha::ALL
            .iter()
            .copied()
            .filter(|g| self.rashi(*g) == rashi)
            .collect()
    }

    /// Moon minus Sun, 0..360.
    pub fn lunar_elongation(&self) -> f64 {
        normalize_degrees(self.longitude(Graha::Moon) - self.longitude(Graha::Sun))
    }

    /// True when the graha casts a full aspect on the given rashi.
    pub fn aspects_rashi(&self, graha: Graha, rashi: u8) -> bool {
        graha
            .aspected_houses()
            .contains(&house_from(self.rashi(graha), rashi))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::timezone::{Moment, ResolvedZone};
    use chrono::{TimeZone, Utc};

    /// Chart with the given ascendant and longitudes (Sun..Ketu), all direct.
    pub(crate) fn chart_with(ascendant: f64, longitudes: [f64; 9]) -> ChartData {
        chart_with_speeds(ascendant, longitudes, [1.0; 9])
    }

    pub(crate) fn chart_with_speeds(ascendant: f64, longitudes: [f64; 9], speeds: [f64; 9]) -> ChartData {
        let instant = Utc.with_ymd_and_hms(2023, 12, 25, 6, 30, 0).unwrap();
        let moment = Moment::from_utc(instant, ResolvedZone::utc());
        let mut positions = [RawPosition {
            longitude: 0.0,
            speed: 0.0,
            declination: 0.0,
        }; 9];
        for i in 0..9 {
            positions[i] = RawPosition {
                longitude: longitudes[i],
                speed: speeds[i],
                declination: 0.0,
            };
        }
        ChartData::from_positions(moment, Locality::new(28.6139, 77.2090), ascendant, positions)
    }
}
