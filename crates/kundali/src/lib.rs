pub mod api;
pub mod chart;
pub mod ephemeris;
pub mod error;
pub mod timezone;
pub mod vedic;

pub use api::{parse_query, ApiResponse, ChartService};
pub use chart::{assemble, ChartRequest, ChartResponse, ChartSettings, InfoLevel, NowSettings};
pub use ephemeris::{Ephemeris, FixedEphemeris, Locality};
pub use error::{ChartError, EphemerisError, RequestError, TimezoneError};
pub use timezone::{CommandZoneLookup, FixedZoneLookup, ZoneLookup};
