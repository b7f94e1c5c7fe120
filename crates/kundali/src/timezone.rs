//! Time zone resolution and the chart [`Moment`].
//!
//! Zone ids come from a [`ZoneLookup`]; the offset in force at the civil date is
//! taken from the IANA database so historical rule changes are honoured.
//! Lookup failures never abort a chart: they degrade to UTC.

use std::process::Command;

use chrono::{DateTime, Duration, FixedOffset, LocalResult, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, TimezoneError};

pub const FALLBACK_ZONE: &str = "UTC";

lazy_static::lazy_static! {
    static ref FIXED_OFFSET_RE: Regex =
        Regex::new(r"^(?:UTC|GMT)?([+-])(\d{1,2})(?::?(\d{2}))?$").expect("valid offset pattern");
}

/// Maps coordinates to an IANA zone id.
pub trait ZoneLookup {
    fn zone_id(&self, latitude: f64, longitude: f64) -> Result<String, TimezoneError>;
}

/// Runs an external program (`<program> <args..> <lat> <lon>`) that prints a zone id.
#[derive(Debug, Clone)]
pub struct CommandZoneLookup {
    program: String,
    args: Vec<String>,
}

impl CommandZoneLookup {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl ZoneLookup for CommandZoneLookup {
    fn zone_id(&self, latitude: f64, longitude: f64) -> Result<String, TimezoneError> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(latitude.to_string())
            .arg(longitude.to_string())
            .output()
            .map_err(|source| TimezoneError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(TimezoneError::Failed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let id = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if id.is_empty() || id == "None" {
            return Err(TimezoneError::NotFound {
                latitude,
                longitude,
            });
        }
        Ok(id)
    }
}

/// Always answers the same zone id.
#[derive(Debug, Clone)]
pub struct FixedZoneLookup(pub String);

impl FixedZoneLookup {
    pub fn new(zone: impl Into<String>) -> Self {
        Self(zone.into())
    }
}

impl ZoneLookup for FixedZoneLookup {
    fn zone_id(&self, _latitude: f64, _longitude: f64) -> Result<String, TimezoneError> {
        Ok(self.0.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedZone {
    pub id: String,
    #[serde(serialize_with = "serialize_offset")]
    pub offset: FixedOffset,
}

impl ResolvedZone {
    pub fn utc() -> Self {
        Self {
            id: FALLBACK_ZONE.to_string(),
            offset: Utc.fix(),
        }
    }
}

fn serialize_offset<S: serde::Serializer>(offset: &FixedOffset, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&offset.to_string())
}

/// Resolve the zone and its historical offset for a civil date/time.
///
/// An explicit zone (IANA id or `+05:30` style offset) wins over the lookup.
pub fn resolve_zone(
    lookup: &dyn ZoneLookup,
    explicit: Option<&str>,
    latitude: f64,
    longitude: f64,
    civil: NaiveDateTime,
) -> ResolvedZone {
    resolve_with(lookup, explicit, latitude, longitude, |id| offset_at(id, civil))
}

/// Resolve the zone and the offset in force at a UTC instant.
pub fn resolve_zone_at(
    lookup: &dyn ZoneLookup,
    explicit: Option<&str>,
    latitude: f64,
    longitude: f64,
    instant: DateTime<Utc>,
) -> ResolvedZone {
    resolve_with(lookup, explicit, latitude, longitude, |id| offset_at_instant(id, instant))
}

fn resolve_with(
    lookup: &dyn ZoneLookup,
    explicit: Option<&str>,
    latitude: f64,
    longitude: f64,
    offset: impl FnOnce(&str) -> Option<FixedOffset>,
) -> ResolvedZone {
    let id = match explicit.map(str::trim).filter(|z| !z.is_empty()) {
        Some(zone) => zone.to_string(),
        None => match lookup.zone_id(latitude, longitude) {
            Ok(id) => id,
            Err(e) => {
                log::warn!("Time zone lookup failed, falling back to UTC: {}", e);
                return ResolvedZone::utc();
            }
        },
    };

    match offset(&id) {
        Some(offset) => ResolvedZone { id, offset },
        None => {
            log::warn!("Unknown time zone '{}', falling back to UTC", id);
            ResolvedZone::utc()
        }
    }
}

/// Offset of `zone` in force at the given wall-clock reading.
///
/// Ambiguous readings take the earlier offset; readings inside a gap take the
/// offset in force at the same reading interpreted as UTC.
pub fn offset_at(zone: &str, civil: NaiveDateTime) -> Option<FixedOffset> {
    if let Some(fixed) = parse_fixed_offset(zone) {
        return Some(fixed);
    }
    let tz: Tz = zone.parse().ok()?;
    let offset = match tz.offset_from_local_datetime(&civil) {
        LocalResult::Single(offset) => offset.fix(),
        LocalResult::Ambiguous(earliest, _) => earliest.fix(),
        LocalResult::None => tz.offset_from_utc_datetime(&civil).fix(),
    };
    Some(offset)
}

/// Offset of `zone` in force at a UTC instant.
pub fn offset_at_instant(zone: &str, instant: DateTime<Utc>) -> Option<FixedOffset> {
    if let Some(fixed) = parse_fixed_offset(zone) {
        return Some(fixed);
    }
    let tz: Tz = zone.parse().ok()?;
    Some(tz.offset_from_utc_datetime(&instant.naive_utc()).fix())
}

fn parse_fixed_offset(zone: &str) -> Option<FixedOffset> {
    let caps = FIXED_OFFSET_RE.captures(zone)?;
    let hours: i32 = caps.get(2)?.as_str().parse().ok()?;
    let minutes: i32 = caps.get(3).map_or(Ok(0), |m| m.as_str().parse()).ok()?;
    if hours > 14 || minutes > 59 {
        return None;
    }
    let seconds = hours * 3600 + minutes * 60;
    if caps.get(1)?.as_str() == "-" {
        FixedOffset::west_opt(seconds)
    } else {
        FixedOffset::east_opt(seconds)
    }
}

/// Manual correction subtracted from the civil time before it is used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DstCorrection {
    pub hours: i64,
    pub minutes: i64,
}

/// The single time reference of a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Moment {
    zone: String,
    local: DateTime<FixedOffset>,
}

impl Moment {
    pub fn new(civil: NaiveDateTime, zone: ResolvedZone, dst: DstCorrection) -> Result<Self, ChartError> {
        let shift = Duration::try_hours(dst.hours)
            .zip(Duration::try_minutes(dst.minutes))
            .map(|(h, m)| h + m)
            .ok_or_else(|| ChartError::InvalidMoment(format!("DST correction out of range: {:?}", dst)))?;
        let corrected = civil
            .checked_sub_signed(shift)
            .ok_or_else(|| ChartError::InvalidMoment(format!("{} minus {:?} overflows", civil, dst)))?;
        let local = zone
            .offset
            .from_local_datetime(&corrected)
            .single()
            .ok_or_else(|| ChartError::InvalidMoment(format!("{} has no single instant", corrected)))?;
        Ok(Self { zone: zone.id, local })
    }

    /// Moment at a UTC instant, expressed in the given zone.
    pub fn from_utc(instant: DateTime<Utc>, zone: ResolvedZone) -> Self {
        Self {
            local: instant.with_timezone(&zone.offset),
            zone: zone.id,
        }
    }

    pub fn utc(&self) -> DateTime<Utc> {
        self.local.with_timezone(&Utc)
    }

    pub fn local(&self) -> DateTime<FixedOffset> {
        self.local
    }

    pub fn zone(&self) -> &str {
        &self.zone
    }

    pub fn offset(&self) -> FixedOffset {
        *self.local.offset()
    }
}
