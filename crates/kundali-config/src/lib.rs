use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Root of `configs/kundali.toml`. Every section and key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct KundaliSettings {
    pub timezone: TimezoneSettings,
    pub ephemeris: EphemerisSettings,
    pub chart: ChartDefaults,
    pub now: NowDefaults,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimezoneSettings {
    /// Program printing a zone id for `<args..> <lat> <lon>`. Without it the
    /// fallback zone is used for every location.
    pub command: Option<String>,
    pub args: Vec<String>,
    pub fallback: String,
}

impl Default for TimezoneSettings {
    fn default() -> Self {
        Self {
            command: None,
            args: Vec::new(),
            fallback: "UTC".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EphemerisSettings {
    /// Precomputed position table, relative to the config file.
    pub positions: Option<PathBuf>,
    pub ayanamsa: String,
    /// Swiss Ephemeris data directory.
    pub path: Option<PathBuf>,
}

impl Default for EphemerisSettings {
    fn default() -> Self {
        Self {
            positions: None,
            ayanamsa: "lahiri".to_string(),
            path: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChartDefaults {
    pub default_vargas: Vec<String>,
    pub default_nesting: u8,
    pub max_nesting: u8,
}

impl Default for ChartDefaults {
    fn default() -> Self {
        Self {
            default_vargas: vec!["D1".to_string()],
            default_nesting: 0,
            max_nesting: 4,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NowDefaults {
    pub latitude: f64,
    pub longitude: f64,
    pub nesting: u8,
    pub vargas: Vec<String>,
    pub time_zone: Option<String>,
}

impl Default for NowDefaults {
    fn default() -> Self {
        Self {
            latitude: 35.7219,
            longitude: 51.3347,
            nesting: 2,
            vargas: vec!["D1".to_string(), "D9".to_string()],
            time_zone: None,
        }
    }
}

/// Loaded settings plus the file they came from, if any.
#[derive(Debug, Clone, Default)]
pub struct LoadedSettings {
    pub settings: KundaliSettings,
    pub source: Option<PathBuf>,
}

impl LoadedSettings {
    /// Resolve a path from the config against the config file's directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            return path.to_path_buf();
        }
        match self.source.as_deref().and_then(Path::parent) {
            Some(dir) => dir.join(path),
            None => path.to_path_buf(),
        }
    }

    pub fn positions_path(&self) -> Option<PathBuf> {
        self.settings.ephemeris.positions.as_deref().map(|p| self.resolve(p))
    }
}

pub fn parse_settings(text: &str) -> anyhow::Result<KundaliSettings> {
    toml::from_str(text).map_err(|e| anyhow::anyhow!("Failed to parse kundali.toml: {e}"))
}

/// Load settings from `explicit`, or try the common relative paths for
/// `configs/kundali.toml`. An explicit path must exist; otherwise a missing
/// file yields defaults.
pub fn load(explicit: Option<&Path>) -> anyhow::Result<LoadedSettings> {
    if let Some(path) = explicit {
        let text = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Could not read {}: {e}", path.display()))?;
        return Ok(LoadedSettings {
            settings: parse_settings(&text)?,
            source: Some(path.to_path_buf()),
        });
    }

    let paths = ["configs/kundali.toml", "../../configs/kundali.toml"];
    for p in &paths {
        if let Ok(text) = fs::read_to_string(p) {
            return Ok(LoadedSettings {
                settings: parse_settings(&text)?,
                source: Some(PathBuf::from(p)),
            });
        }
    }
    Ok(LoadedSettings::default())
}
