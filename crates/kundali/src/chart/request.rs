//! Validated chart request.
//!
//! Query values arrive as strings. Every check happens here, before any
//! computation, and a failure is always a [`RequestError`].

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::chart::settings::ChartSettings;
use crate::ephemeris::Locality;
use crate::error::RequestError;
use crate::timezone::DstCorrection;
use crate::vedic::vargas::VargaCode;

pub const REQUIRED_PARAMETERS: [&str; 8] =
    ["latitude", "longitude", "year", "month", "day", "hour", "min", "sec"];

/// Named sections a caller can switch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InfoLevel {
    Basic,
    Panchanga,
    Ashtakavarga,
    Sarvashtakavarga,
    Grahabala,
    Rashibala,
    Yogas,
    Ayanamsa,
    /// Accepted for compatibility; produces no output.
    Transit,
}

impl FromStr for InfoLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(InfoLevel::Basic),
            "panchanga" => Ok(InfoLevel::Panchanga),
            "ashtakavarga" => Ok(InfoLevel::Ashtakavarga),
            "sarvashtakavarga" => Ok(InfoLevel::Sarvashtakavarga),
            "grahabala" => Ok(InfoLevel::Grahabala),
            "rashibala" => Ok(InfoLevel::Rashibala),
            "yogas" => Ok(InfoLevel::Yogas),
            "ayanamsa" => Ok(InfoLevel::Ayanamsa),
            "transit" => Ok(InfoLevel::Transit),
            other => Err(format!("unknown info level '{}'", other)),
        }
    }
}

impl fmt::Display for InfoLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InfoLevel::Basic => "basic",
            InfoLevel::Panchanga => "panchanga",
            InfoLevel::Ashtakavarga => "ashtakavarga",
            InfoLevel::Sarvashtakavarga => "sarvashtakavarga",
            InfoLevel::Grahabala => "grahabala",
            InfoLevel::Rashibala => "rashibala",
            InfoLevel::Yogas => "yogas",
            InfoLevel::Ayanamsa => "ayanamsa",
            InfoLevel::Transit => "transit",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartRequest {
    pub locality: Locality,
    /// Wall-clock reading before the DST correction.
    pub civil: NaiveDateTime,
    pub time_zone: Option<String>,
    pub dst: DstCorrection,
    /// Requested vargas in request order, D1 excluded.
    pub vargas: Vec<VargaCode>,
    pub nesting: u8,
    pub info: BTreeSet<InfoLevel>,
}

impl ChartRequest {
    pub fn has(&self, level: InfoLevel) -> bool {
        self.info.contains(&level)
    }

    /// Validate a decoded query map, filling optional values from `settings`.
    pub fn from_query(
        query: &BTreeMap<String, String>,
        settings: &ChartSettings,
    ) -> Result<Self, RequestError> {
        let value = |name: &str| query.get(name).map(|v| v.trim()).filter(|v| !v.is_empty());

        let missing: Vec<String> = REQUIRED_PARAMETERS
            .iter()
            .filter(|&&name| value(name).is_none())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(RequestError::MissingParameters(missing));
        }

        let latitude: f64 = parse_required(query, "latitude")?;
        let longitude: f64 = parse_required(query, "longitude")?;
        let locality = validate_locality(latitude, longitude)?;

        let civil = civil_datetime(
            parse_required(query, "year")?,
            parse_required(query, "month")?,
            parse_required(query, "day")?,
            parse_required(query, "hour")?,
            parse_required(query, "min")?,
            parse_required(query, "sec")?,
        )?;

        let dst = DstCorrection {
            hours: parse_optional(query, "dst_hour")?.unwrap_or(0),
            minutes: parse_optional(query, "dst_min")?.unwrap_or(0),
        };
        if !(0..=23).contains(&dst.hours) {
            return Err(RequestError::invalid("dst_hour", "must be between 0 and 23"));
        }
        if !(0..=59).contains(&dst.minutes) {
            return Err(RequestError::invalid("dst_min", "must be between 0 and 59"));
        }

        let nesting = match parse_optional::<u8>(query, "nesting")? {
            Some(n) => n,
            None => settings.default_nesting,
        };
        let limit = settings.nesting_limit();
        if nesting > limit {
            return Err(RequestError::invalid(
                "nesting",
                format!("must be between 0 and {}", limit),
            ));
        }

        let vargas = match value("varga") {
            Some(list) => parse_vargas(split_list(list))?,
            None => parse_vargas(settings.default_vargas.iter().map(String::as_str))?,
        };

        let info = value("infolevel")
            .map(|list| parse_info_levels(split_list(list)))
            .unwrap_or_default();

        Ok(Self {
            locality,
            civil,
            time_zone: value("time_zone").map(str::to_string),
            dst,
            vargas,
            nesting,
            info,
        })
    }
}

fn split_list(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|item| !item.is_empty())
}

fn parse_required<T: FromStr>(query: &BTreeMap<String, String>, name: &str) -> Result<T, RequestError> {
    parse_optional(query, name)?.ok_or_else(|| RequestError::MissingParameters(vec![name.to_string()]))
}

fn parse_optional<T: FromStr>(query: &BTreeMap<String, String>, name: &str) -> Result<Option<T>, RequestError> {
    match query.get(name).map(|v| v.trim()).filter(|v| !v.is_empty()) {
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| RequestError::invalid(name, format!("'{}' is not a valid number", raw))),
        None => Ok(None),
    }
}

pub(crate) fn validate_locality(latitude: f64, longitude: f64) -> Result<Locality, RequestError> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(RequestError::invalid("latitude", "must be between -90 and 90"));
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(RequestError::invalid("longitude", "must be between -180 and 180"));
    }
    Ok(Locality::new(latitude, longitude))
}

fn civil_datetime(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Result<NaiveDateTime, RequestError> {
    if !(1..=12).contains(&month) {
        return Err(RequestError::invalid("month", "must be between 1 and 12"));
    }
    if hour > 23 {
        return Err(RequestError::invalid("hour", "must be between 0 and 23"));
    }
    if min > 59 {
        return Err(RequestError::invalid("min", "must be between 0 and 59"));
    }
    if sec > 59 {
        return Err(RequestError::invalid("sec", "must be between 0 and 59"));
    }
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, min, sec))
        .ok_or_else(|| {
            RequestError::invalid("day", format!("{}-{:02}-{:02} is not a calendar date", year, month, day))
        })
}

/// Parse varga codes, dropping D1 (always computed) and duplicates.
pub(crate) fn parse_vargas<'a>(codes: impl Iterator<Item = &'a str>) -> Result<Vec<VargaCode>, RequestError> {
    let mut vargas = Vec::new();
    for code in codes {
        let code: VargaCode = code.parse()?;
        if code != VargaCode::D1 && !vargas.contains(&code) {
            vargas.push(code);
        }
    }
    Ok(vargas)
}

fn parse_info_levels<'a>(levels: impl Iterator<Item = &'a str>) -> BTreeSet<InfoLevel> {
    levels
        .filter_map(|level| match level.parse() {
            Ok(level) => Some(level),
            Err(e) => {
                log::debug!("Ignoring info level: {}", e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delhi_query() -> BTreeMap<String, String> {
        [
            ("latitude", "28.6139"),
            ("longitude", "77.2090"),
            ("year", "2023"),
            ("month", "12"),
            ("day", "25"),
            ("hour", "12"),
            ("min", "0"),
            ("sec", "0"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn test_defaults_fill_optional_values() {
        let request = ChartRequest::from_query(&delhi_query(), &ChartSettings::default()).unwrap();
        assert_eq!(request.civil.to_string(), "2023-12-25 12:00:00");
        assert_eq!(request.nesting, 0);
        assert!(request.vargas.is_empty());
        assert!(request.info.is_empty());
        assert_eq!(request.dst, DstCorrection::default());
        assert_eq!(request.time_zone, None);
    }

    #[test]
    fn test_missing_parameters_are_listed_in_order() {
        let mut query = delhi_query();
        query.remove("year");
        query.remove("sec");
        query.insert("min".to_string(), "  ".to_string());
        let err = ChartRequest::from_query(&query, &ChartSettings::default()).unwrap_err();
        assert_eq!(
            err,
            RequestError::MissingParameters(vec!["year".into(), "min".into(), "sec".into()])
        );
    }

    #[test]
    fn test_out_of_range_values() {
        let settings = ChartSettings::default();
        let check = |key: &str, value: &str, name: &str| {
            let mut query = delhi_query();
            query.insert(key.to_string(), value.to_string());
            match ChartRequest::from_query(&query, &settings) {
                Err(RequestError::InvalidParameter { name: got, .. }) => assert_eq!(got, name),
                other => panic!("expected invalid {}, got {:?}", name, other),
            }
        };
        check("latitude", "91", "latitude");
        check("longitude", "abc", "longitude");
        check("month", "13", "month");
        check("day", "32", "day");
        check("hour", "24", "hour");
        check("nesting", "5", "nesting");
        check("dst_min", "60", "dst_min");
        check("varga", "D1,D5", "varga");
    }

    #[test]
    fn test_vargas_and_levels() {
        let mut query = delhi_query();
        query.insert("varga".into(), "d9, D1,D9,D60".into());
        query.insert("infolevel".into(), "basic, Yogas,unknown,transit".into());
        query.insert("nesting".into(), "3".into());
        let request = ChartRequest::from_query(&query, &ChartSettings::default()).unwrap();
        assert_eq!(request.vargas, vec![VargaCode::D9, "D60".parse().unwrap()]);
        assert!(request.has(InfoLevel::Basic));
        assert!(request.has(InfoLevel::Yogas));
        assert!(request.has(InfoLevel::Transit));
        assert_eq!(request.info.len(), 3);
        assert_eq!(request.nesting, 3);
    }
}
