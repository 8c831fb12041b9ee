use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::snapshot::SnapshotSource;

pub(crate) const CONFIG_ENV: &str = "BUDGETDASH_CONFIG";
const CONFIG_FILE_NAME: &str = "config.toml";
const MAX_ZOOM: u8 = 20;

#[derive(Debug, thiserror::Error)]
pub(crate) enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Config {
    /// Display label only; it does not change which snapshot is loaded.
    pub(crate) fiscal_year: String,
    /// Labels offered by `:year`.
    pub(crate) fiscal_years: Vec<String>,
    pub(crate) currency_symbol: String,
    pub(crate) page_size: usize,
    pub(crate) top_projects: usize,
    /// Category whose largest projects the overview lists.
    pub(crate) featured_category: String,
    pub(crate) sources: Sources,
    pub(crate) map: MapSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Sources {
    /// Path or `http(s)` URL of the budget ledger snapshot.
    pub(crate) ledger: String,
    /// Path or `http(s)` URL of the public-works snapshot.
    pub(crate) public_works: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct MapSettings {
    pub(crate) center_lat: f64,
    pub(crate) center_lng: f64,
    pub(crate) zoom: u8,
    /// Zoom used when jumping to a single project.
    pub(crate) focus_zoom: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fiscal_year: "2568".into(),
            fiscal_years: vec!["2568".into()],
            currency_symbol: "฿".into(),
            page_size: 10,
            top_projects: 5,
            featured_category: "ค่าที่ดินและสิ่งก่อสร้าง".into(),
            sources: Sources::default(),
            map: MapSettings::default(),
        }
    }
}

impl Default for Sources {
    fn default() -> Self {
        Self {
            ledger: "data/20250121-lpao-budgeting.json".into(),
            public_works: "data/20250519-eplan.json".into(),
        }
    }
}

impl Default for MapSettings {
    // Lamphun province
    fn default() -> Self {
        Self {
            center_lat: 18.09850631134027,
            center_lng: 98.93273443954536,
            zoom: 8,
            focus_zoom: 14,
        }
    }
}

impl Config {
    /// Clamp values into their usable ranges.
    pub(crate) fn normalized(mut self) -> Self {
        let defaults = Self::default();
        self.page_size = self.page_size.max(1);
        self.top_projects = self.top_projects.max(1);
        self.map.zoom = self.map.zoom.min(MAX_ZOOM);
        self.map.focus_zoom = self.map.focus_zoom.min(MAX_ZOOM);
        if !self.map.center_lat.is_finite() || !(-90.0..=90.0).contains(&self.map.center_lat) {
            self.map.center_lat = defaults.map.center_lat;
        }
        if !self.map.center_lng.is_finite() || !(-180.0..=180.0).contains(&self.map.center_lng) {
            self.map.center_lng = defaults.map.center_lng;
        }
        if self.fiscal_year.trim().is_empty() {
            self.fiscal_year = defaults.fiscal_year;
        }
        if !self.fiscal_years.contains(&self.fiscal_year) {
            self.fiscal_years.push(self.fiscal_year.clone());
        }
        self
    }

    pub(crate) fn ledger_source(&self) -> SnapshotSource {
        SnapshotSource::parse(&self.sources.ledger)
    }

    pub(crate) fn public_works_source(&self) -> SnapshotSource {
        SnapshotSource::parse(&self.sources.public_works)
    }

    pub(crate) fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }
}

/// `$BUDGETDASH_CONFIG` if set, otherwise `config.toml` in the platform
/// config directory.
pub(crate) fn config_path() -> Result<PathBuf, ConfigError> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }
    let dirs = project_dirs().ok_or(ConfigError::NoConfigDir)?;
    Ok(dirs.config_dir().join(CONFIG_FILE_NAME))
}

pub(crate) fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "budgetdash", "BudgetDash")
}

pub(crate) fn load_from(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str::<Config>(&text)
        .map(Config::normalized)
        .map_err(|source| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source,
        })
}

/// Load settings, falling back to defaults on any error.
pub(crate) fn load_or_default() -> Config {
    let loaded = config_path().and_then(|path| load_from(&path));
    match loaded {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("{e}; using default settings");
            Config::default()
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
