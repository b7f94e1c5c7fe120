use serde::{Deserialize, Serialize};

use crate::vedic::dashas::MAX_NESTING;

/// Request defaults and limits applied by the chart layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSettings {
    /// Varga codes used when a request names none.
    pub default_vargas: Vec<String>,
    pub default_nesting: u8,
    /// Deepest dasha nesting a request may ask for.
    pub max_nesting: u8,
    pub now: NowSettings,
}

/// Defaults of the current-moment chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NowSettings {
    pub latitude: f64,
    pub longitude: f64,
    pub nesting: u8,
    pub vargas: Vec<String>,
    pub time_zone: Option<String>,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            default_vargas: vec!["D1".to_string()],
            default_nesting: 0,
            max_nesting: MAX_NESTING,
            now: NowSettings::default(),
        }
    }
}

impl Default for NowSettings {
    fn default() -> Self {
        // Tehran
        Self {
            latitude: 35.7219,
            longitude: 51.3347,
            nesting: 2,
            vargas: vec!["D1".to_string(), "D9".to_string()],
            time_zone: None,
        }
    }
}

impl ChartSettings {
    /// Nesting limit, never above what the dasha builder supports.
    pub fn nesting_limit(&self) -> u8 {
        self.max_nesting.min(MAX_NESTING)
    }
}
