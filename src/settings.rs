//! Game configuration
//!
//! Defaults reproduce the classic game. On the web, overrides are read from
//! LocalStorage as JSON; any missing field keeps its default.

use glam::IVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::{Board, Direction, Snake};

/// Rejected configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("board size {0} is too small")]
    BoardTooSmall(i32),
    #[error("initial snake must have at least one body segment")]
    EmptySnake,
    #[error("initial snake does not fit on the board")]
    SnakeOutOfBounds,
    #[error("initial length {length} leaves no free cell on a {cells}-cell board")]
    SnakeTooLong { length: usize, cells: usize },
    #[error("speed must be positive, got {0}")]
    NonPositiveSpeed(f64),
    #[error("scene thresholds must increase (rush {rush}, fever {fever})")]
    SceneThresholds { rush: u32, fever: u32 },
}

/// Scripted scene progression settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioSettings {
    /// Run the Classic → Rush → Fever progression
    pub enabled: bool,
    /// Score at which Rush starts
    pub rush_score: u32,
    /// Score at which Fever starts
    pub fever_score: u32,
    /// Speed multiplier applied per fruit during Rush and Fever
    pub rush_speed_step: f64,
    /// Speed ceiling (ticks per second)
    pub max_speed: f64,
    /// Ambient playback-rate increase per fruit during Fever
    pub fever_playback_step: f32,
    /// Media request URL; `{query}` is replaced by `media_query`
    pub media_url: Option<String>,
    pub media_query: String,
    /// JSON pointer to the media reference inside the response
    pub media_pointer: String,
}

impl Default for ScenarioSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            rush_score: 5,
            fever_score: 15,
            rush_speed_step: 1.08,
            max_speed: 15.0,
            fever_playback_step: 0.05,
            media_url: None,
            media_query: "snake".to_string(),
            media_pointer: "/data/images/original/url".to_string(),
        }
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub board_size: i32,
    /// Body segments behind the head at start
    pub initial_length: usize,
    pub initial_head: IVec2,
    pub initial_direction: Direction,
    /// Ticks per second at start
    pub base_speed: f64,

    // === Display ===
    /// Pixels per cell
    pub scale_factor: f64,
    /// Gap around each cell, as a fraction of a cell
    pub cell_padding: f64,

    // === Audio ===
    pub master_volume: f32,
    pub sfx_volume: f32,
    pub muted: bool,

    pub scenario: ScenarioSettings,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: BOARD_SIZE,
            initial_length: INIT_SNAKE_LENGTH,
            initial_head: INIT_SNAKE_POSITION,
            initial_direction: Direction::Right,
            base_speed: 1000.0 / FRAME_WAIT_MS,

            scale_factor: SCALE_FACTOR,
            cell_padding: CELL_PADDING,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            scenario: ScenarioSettings::default(),
        }
    }
}

impl GameConfig {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "snake_scenes_settings";

    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Check that a session can be built from these settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_size < MIN_BOARD_SIZE {
            return Err(ConfigError::BoardTooSmall(self.board_size));
        }
        if self.initial_length == 0 {
            return Err(ConfigError::EmptySnake);
        }
        if self.base_speed.is_nan() || self.base_speed <= 0.0 {
            return Err(ConfigError::NonPositiveSpeed(self.base_speed));
        }
        let board = Board::new(self.board_size);
        // Head plus body must leave a cell for the fruit
        if self.initial_length >= board.cell_count() {
            return Err(ConfigError::SnakeTooLong {
                length: self.initial_length,
                cells: board.cell_count(),
            });
        }
        let snake = Snake::new(
            self.initial_head,
            self.initial_length,
            self.initial_direction,
            self.base_speed,
        );
        if !snake.segments().all(|p| board.contains(p)) {
            return Err(ConfigError::SnakeOutOfBounds);
        }
        let scenario = &self.scenario;
        if scenario.enabled && scenario.fever_score <= scenario.rush_score {
            return Err(ConfigError::SceneThresholds {
                rush: scenario.rush_score,
                fever: scenario.fever_score,
            });
        }
        Ok(())
    }

    /// Effective one-shot sound volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded settings from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {e}"),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
