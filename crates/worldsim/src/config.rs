//! Tunable simulation constants, persisted as JSON.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Hard ceiling on actors held by one large-map controller.
pub const MONSTER_CAP: usize = 32;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LargeMapConfig {
    /// Daytime plain-terrain spawn chance is one in this many turns.
    pub base_spawn_one_in: u32,
    /// Actors farther than this (wrapped heuristic distance) from the avatar are dropped.
    pub cleanup_distance: u32,
    pub enemy_move_chance_percent: u32,
    pub path_window_radius: i32,
    pub spawn_attempts: u32,
    pub spawn_min_offset: i32,
    pub spawn_max_offset: i32,
}

impl Default for LargeMapConfig {
    fn default() -> Self {
        Self {
            base_spawn_one_in: 32,
            cleanup_distance: 24,
            enemy_move_chance_percent: 50,
            path_window_radius: 16,
            spawn_attempts: 10,
            spawn_min_offset: 6,
            spawn_max_offset: 9,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilityConfig {
    /// Half-width of the square window tested for visibility around the avatar.
    pub window_radius: i32,
    /// Light radius that remains at the darkest hour.
    pub baseline_light_radius: u8,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self { window_radius: 11, baseline_light_radius: 2 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub large_map: LargeMapConfig,
    pub visibility: VisibilityConfig,
    pub minutes_per_turn: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            large_map: LargeMapConfig::default(),
            visibility: VisibilityConfig::default(),
            minutes_per_turn: 2,
        }
    }
}

#[derive(Debug)]
pub enum ConfigLoadError {
    Io(io::Error),
    InvalidJson(serde_json::Error),
    InvalidValue(String),
}

impl fmt::Display for ConfigLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "config I/O error: {e}"),
            Self::InvalidJson(e) => write!(f, "invalid config JSON: {e}"),
            Self::InvalidValue(message) => write!(f, "invalid config value: {message}"),
        }
    }
}

impl std::error::Error for ConfigLoadError {}

impl SimConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path).map_err(ConfigLoadError::Io)?;
        let config: Self = serde_json::from_str(&content).map_err(ConfigLoadError::InvalidJson)?;
        config.validate()?;
        Ok(config)
    }

    pub fn write(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(path, json)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        let large = &self.large_map;
        if large.base_spawn_one_in == 0 {
            return Err(ConfigLoadError::InvalidValue("base_spawn_one_in must be positive".into()));
        }
        if large.enemy_move_chance_percent > 100 {
            return Err(ConfigLoadError::InvalidValue(
                "enemy_move_chance_percent must be at most 100".into(),
            ));
        }
        if large.spawn_min_offset > large.spawn_max_offset || large.spawn_min_offset < 1 {
            return Err(ConfigLoadError::InvalidValue(format!(
                "spawn offsets {}..={} are not a positive range",
                large.spawn_min_offset, large.spawn_max_offset
            )));
        }
        if self.visibility.window_radius < 1 {
            return Err(ConfigLoadError::InvalidValue("window_radius must be positive".into()));
        }
        Ok(())
    }
}
