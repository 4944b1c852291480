//! Game tuning loaded from `assets/config/arcade.json`.
//!
//! Every field has a default, so the file only needs the values it changes
//! and a missing file runs the stock games. The file is polled for changes
//! each frame; a reloaded config applies to scenes built afterwards.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use glam::Vec2;

use crate::spawner::{column_rows, SpawnerConfig};

pub const CONFIG_PATH: &str = "assets/config/arcade.json";

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct GameConfig {
    pub field: FieldConfig,
    pub flappy: FlappyConfig,
    pub space: SpaceConfig,
    pub town: TownConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct FieldConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

impl FieldConfig {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct FlappyConfig {
    pub gravity: f32,
    pub initial_velocity: f32,
    pub jump_velocity: f32,
    pub obstacle_velocity: f32,
    pub spawn_interval: f32,
    pub block_size: u32,
    pub gap_blocks: u32,
    pub gap_min_row: u32,
    pub gap_max_row: u32,
    /// Removal margin as a fraction of the field width.
    pub offscreen_margin_ratio: f32,
}

impl Default for FlappyConfig {
    fn default() -> Self {
        Self {
            gravity: 1700.0,
            initial_velocity: 200.0,
            jump_velocity: -450.0,
            obstacle_velocity: -200.0,
            spawn_interval: 2.0,
            block_size: 48,
            gap_blocks: 2,
            gap_min_row: 2,
            gap_max_row: 10,
            offscreen_margin_ratio: 0.15625,
        }
    }
}

impl FlappyConfig {
    pub fn spawner(&self, field: &FieldConfig) -> SpawnerConfig {
        SpawnerConfig {
            field: field.size(),
            block_size: self.block_size as f32,
            velocity: self.obstacle_velocity,
            interval: self.spawn_interval,
            gap_blocks: self.gap_blocks,
            gap_rows: self.gap_min_row..=self.gap_max_row,
            offscreen_margin: field.width as f32 * self.offscreen_margin_ratio,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SpaceConfig {
    pub ship_size: u32,
    pub ship_speed: f32,
    pub speed_bonus: f32,
    /// Distance kept between a respawned collectible and the field edge.
    pub collectible_margin: u32,
    pub music_volume: f32,
    pub collect_volume: f32,
}

impl Default for SpaceConfig {
    fn default() -> Self {
        Self {
            ship_size: 48,
            ship_speed: 200.0,
            speed_bonus: 100.0,
            collectible_margin: 50,
            music_volume: 0.25,
            collect_volume: 0.5,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct TownConfig {
    pub tile_size: u32,
    pub scale: u32,
    pub hero_speed: f32,
    pub enemy_frame_time: f32,
    pub walk_frame_time: f32,
    pub idle_frame_time: f32,
    pub attack_frame_time: f32,
}

impl Default for TownConfig {
    fn default() -> Self {
        Self {
            tile_size: 16,
            scale: 4,
            hero_speed: 240.0,
            enemy_frame_time: 0.1,
            walk_frame_time: 0.15,
            idle_frame_time: 0.5,
            attack_frame_time: 0.08,
        }
    }
}

pub struct ConfigWatcher {
    config_path: PathBuf,
    last_seen_modified: Option<SystemTime>,
}

impl ConfigWatcher {
    pub fn new(config_path: PathBuf) -> Self {
        let last_seen_modified = modified_time(&config_path);
        Self {
            config_path,
            last_seen_modified,
        }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    pub fn should_reload(&mut self) -> bool {
        let current = modified_time(&self.config_path);
        match (self.last_seen_modified, current) {
            (Some(old), Some(now)) if now > old => {
                self.last_seen_modified = Some(now);
                true
            }
            (None, Some(now)) => {
                self.last_seen_modified = Some(now);
                true
            }
            _ => false,
        }
    }
}

pub fn load_config_from_path(config_path: &Path) -> Result<GameConfig, String> {
    let config = parse_config_file(config_path)?;
    validate_config(&config)?;
    Ok(config)
}

/// Load a changed config file while the game is running.
///
/// The field size is fixed once the window is open, so `running_field`
/// replaces whatever the file says before validation. Every other check runs
/// against the field the scenes will actually be built with.
pub fn reload_config_from_path(
    config_path: &Path,
    running_field: &FieldConfig,
) -> Result<GameConfig, String> {
    let mut config = parse_config_file(config_path)?;
    if config.field != *running_field {
        log::warn!(
            "Config reload ({}): field size change to {}x{} needs a restart",
            config_path.display(),
            config.field.width,
            config.field.height
        );
        config.field = running_field.clone();
    }
    validate_config(&config)?;
    Ok(config)
}

fn parse_config_file(config_path: &Path) -> Result<GameConfig, String> {
    let raw = fs::read_to_string(config_path)
        .map_err(|e| format!("Failed to read config file {}: {e}", config_path.display()))?;
    serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse config JSON {}: {e}", config_path.display()))
}

/// Load the config, falling back to defaults when the file does not exist.
/// A file that exists but is malformed or invalid is still an error.
pub fn load_config_or_default(config_path: &Path) -> Result<GameConfig, String> {
    if !config_path.exists() {
        log::warn!(
            "Config file {} not found, using defaults",
            config_path.display()
        );
        return Ok(GameConfig::default());
    }
    load_config_from_path(config_path)
}

pub fn validate_config(config: &GameConfig) -> Result<(), String> {
    let field = &config.field;
    if field.width == 0 || field.height == 0 {
        return Err("Config validation failed: field width/height must be > 0".to_string());
    }

    let flappy = &config.flappy;
    if !(flappy.spawn_interval > 0.0) {
        return Err("Config validation failed: flappy.spawn_interval must be > 0".to_string());
    }
    if flappy.block_size == 0 {
        return Err("Config validation failed: flappy.block_size must be > 0".to_string());
    }
    if flappy.gap_blocks == 0 {
        return Err("Config validation failed: flappy.gap_blocks must be > 0".to_string());
    }
    if flappy.gap_min_row > flappy.gap_max_row {
        return Err(format!(
            "Config validation failed: flappy gap rows {}..={} are inverted",
            flappy.gap_min_row, flappy.gap_max_row
        ));
    }
    let rows = column_rows(field.height as f32, flappy.block_size as f32);
    if flappy.gap_max_row + flappy.gap_blocks > rows {
        return Err(format!(
            "Config validation failed: gap at row {} with {} blocks does not fit a {}-block column",
            flappy.gap_max_row, flappy.gap_blocks, rows
        ));
    }
    if flappy.offscreen_margin_ratio < 0.0 {
        return Err(
            "Config validation failed: flappy.offscreen_margin_ratio must be >= 0".to_string(),
        );
    }

    let space = &config.space;
    if space.ship_size == 0 {
        return Err("Config validation failed: space.ship_size must be > 0".to_string());
    }
    if space.collectible_margin * 2 >= field.width.min(field.height) {
        return Err(
            "Config validation failed: space.collectible_margin leaves no room on the field"
                .to_string(),
        );
    }
    for (name, volume) in [
        ("space.music_volume", space.music_volume),
        ("space.collect_volume", space.collect_volume),
    ] {
        if !(0.0..=1.0).contains(&volume) {
            return Err(format!(
                "Config validation failed: {name} must be within [0, 1]"
            ));
        }
    }

    let town = &config.town;
    if town.tile_size == 0 || town.scale == 0 {
        return Err("Config validation failed: town tile_size/scale must be > 0".to_string());
    }
    for (name, seconds) in [
        ("town.enemy_frame_time", town.enemy_frame_time),
        ("town.walk_frame_time", town.walk_frame_time),
        ("town.idle_frame_time", town.idle_frame_time),
        ("town.attack_frame_time", town.attack_frame_time),
    ] {
        if !(seconds > 0.0) {
            return Err(format!("Config validation failed: {name} must be > 0"));
        }
    }

    Ok(())
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).ok()?.modified().ok()
}
