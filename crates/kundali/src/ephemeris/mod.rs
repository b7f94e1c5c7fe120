pub mod adapter;
pub mod fixed;
pub mod types;

pub use adapter::Ephemeris;
#[cfg(feature = "swisseph")]
pub use adapter::SwissEphemerisAdapter;
pub use fixed::FixedEphemeris;
pub use types::{Locality, RawPosition, RisingTimes};
