use chrono::{DateTime, Utc};

use crate::ephemeris::types::{Locality, RawPosition, RisingTimes};
use crate::error::EphemerisError;
use crate::vedic::graha::Graha;

/// Source of sidereal positions.
///
/// Implementations report sidereal longitudes for the configured ayanamsa.
/// Ketu is derived from Rahu by the caller and is never requested.
pub trait Ephemeris {
    fn position(
        &self,
        graha: Graha,
        instant: DateTime<Utc>,
        locality: &Locality,
    ) -> Result<RawPosition, EphemerisError>;

    /// Sidereal longitude of the ascendant.
    fn ascendant(&self, instant: DateTime<Utc>, locality: &Locality) -> Result<f64, EphemerisError>;

    /// Ayanamsa in degrees at the instant.
    fn ayanamsa(&self, instant: DateTime<Utc>) -> Result<f64, EphemerisError>;

    /// Sunrise, sunset and next sunrise around the instant.
    fn rising(&self, instant: DateTime<Utc>, locality: &Locality) -> Result<RisingTimes, EphemerisError>;
}

#[cfg(feature = "swisseph")]
pub use swiss::SwissEphemerisAdapter;

#[cfg(feature = "swisseph")]
mod swiss {
    use super::*;
    use chrono::{Datelike, Timelike};
    use std::env;
    use std::path::PathBuf;
    use swisseph::swe::{calc_ut, houses_ex, julday};
    use swisseph::AscMc;

    // FLG_SWIEPH | FLG_SPEED
    const BASE_FLAGS: u32 = 2 | 256;
    const FLG_EQUATORIAL: u32 = 2048;

    const PLANET_IDS: &[(Graha, u32)] = &[
        (Graha::Sun, 0),
        (Graha::Moon, 1),
        (Graha::Mercury, 2),
        (Graha::Venus, 3),
        (Graha::Mars, 4),
        (Graha::Jupiter, 5),
        (Graha::Saturn, 6),
        (Graha::Rahu, 11), // TRUE_NODE
    ];

    /// Ayanamsa value at J2000 in degrees.
    const AYANAMSAS: &[(&str, f64)] = &[
        ("lahiri", 23.853_05),
        ("chitrapaksha", 23.853_05),
        ("raman", 22.410_79),
        ("krishnamurti", 23.757_12),
        ("yukteshwar", 22.478_39),
    ];

    /// General precession in longitude, degrees per Julian century.
    const PRECESSION_PER_CENTURY: f64 = 1.396_971;

    /// Swiss Ephemeris backed adapter. Tropical positions are shifted by a
    /// linear ayanamsa model.
    pub struct SwissEphemerisAdapter {
        _ephemeris_path: PathBuf,
        ayanamsa_j2000: f64,
    }

    impl SwissEphemerisAdapter {
        pub fn new(ephemeris_path: Option<PathBuf>, ayanamsa: &str) -> Result<Self, EphemerisError> {
            let path = ephemeris_path.unwrap_or_else(|| {
                env::var("SWISS_EPHEMERIS_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("/usr/local/share/swisseph"))
            });

            if !path.exists() {
                return Err(EphemerisError::FileNotFound {
                    path: path.display().to_string(),
                    message: "Ephemeris path does not exist. Please ensure Swiss Ephemeris data files are installed.".to_string(),
                });
            }

            let ayanamsa_j2000 = AYANAMSAS
                .iter()
                .find(|(name, _)| *name == ayanamsa.to_lowercase())
                .map(|(_, value)| *value)
                .ok_or_else(|| EphemerisError::Parse {
                    message: format!(
                        "Unknown ayanamsa '{}'. Valid ayanamsas: {:?}",
                        ayanamsa,
                        AYANAMSAS.iter().map(|(name, _)| *name).collect::<Vec<_>>()
                    ),
                })?;

            Ok(Self {
                _ephemeris_path: path,
                ayanamsa_j2000,
            })
        }

        fn ayanamsa_at(&self, jd: f64) -> f64 {
            self.ayanamsa_j2000 + (jd - 2_451_545.0) / 36_525.0 * PRECESSION_PER_CENTURY
        }
    }

    impl Ephemeris for SwissEphemerisAdapter {
        fn position(
            &self,
            graha: Graha,
            instant: DateTime<Utc>,
            _locality: &Locality,
        ) -> Result<RawPosition, EphemerisError> {
            let code = PLANET_IDS
                .iter()
                .find(|(g, _)| *g == graha)
                .map(|(_, code)| *code)
                .ok_or(EphemerisError::MissingBody { graha })?;
            let jd = datetime_to_julian_day(instant);
            let failed = |e: String| EphemerisError::CalculationFailed {
                graha,
                instant,
                message: format!("Swiss Ephemeris error: {}", e),
            };

            let ecliptic = calc_ut(jd, code, BASE_FLAGS).map_err(|e| failed(e.to_string()))?;
            let equatorial =
                calc_ut(jd, code, BASE_FLAGS | FLG_EQUATORIAL).map_err(|e| failed(e.to_string()))?;

            Ok(RawPosition {
                longitude: crate::vedic::graha::normalize_degrees(ecliptic.out[0] - self.ayanamsa_at(jd)),
                speed: ecliptic.out[3],
                declination: equatorial.out[1],
            })
        }

        fn ascendant(&self, instant: DateTime<Utc>, locality: &Locality) -> Result<f64, EphemerisError> {
            let jd = datetime_to_julian_day(instant);
            let (_, a) = houses_ex(jd, BASE_FLAGS as i32, locality.latitude, locality.longitude, b'W' as i32);
            let ascmc = AscMc::from_array(a);
            if !ascmc.ascendant.is_finite() {
                return Err(EphemerisError::AscendantFailed {
                    message: format!("non-finite ascendant at {}", instant),
                });
            }
            Ok(crate::vedic::graha::normalize_degrees(ascmc.ascendant - self.ayanamsa_at(jd)))
        }

        fn ayanamsa(&self, instant: DateTime<Utc>) -> Result<f64, EphemerisError> {
            Ok(self.ayanamsa_at(datetime_to_julian_day(instant)))
        }

        fn rising(&self, _instant: DateTime<Utc>, _locality: &Locality) -> Result<RisingTimes, EphemerisError> {
            Err(EphemerisError::Unsupported { what: "sunrise and sunset" })
        }
    }

    /// Convert UTC datetime to Julian Day
    fn datetime_to_julian_day(dt: DateTime<Utc>) -> f64 {
        let hour_decimal =
            dt.hour() as f64 + dt.minute() as f64 / 60.0 + dt.second() as f64 / 3600.0;
        // GREG_CAL = 1
        julday(dt.year(), dt.month() as i32, dt.day() as i32, hour_decimal, 1)
    }
}
