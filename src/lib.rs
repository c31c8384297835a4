//! Snake Scenes - a grid snake arcade game with scripted scene progression
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, tick, events, scenes)
//! - `game_loop`: Frame-driven tick throttling
//! - `session`: One game session wired to its collaborators
//! - `campaign`: The built-in scene progression
//! - `renderer`: Paint contract and canvas implementation
//! - `audio`: Sound contract and Web Audio implementation
//! - `platform`: Input mapping and external media
//! - `settings`: Configuration

pub mod audio;
pub mod campaign;
pub mod game_loop;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use game_loop::FrameClock;
pub use session::{FrameStatus, GameReport, Session};
pub use settings::{ConfigError, GameConfig, ScenarioSettings};

/// Game configuration constants
pub mod consts {
    use glam::IVec2;

    /// Cells per board side
    pub const BOARD_SIZE: i32 = 25;
    /// Smallest playable board
    pub const MIN_BOARD_SIZE: i32 = 2;
    /// Body segments behind the head at start
    pub const INIT_SNAKE_LENGTH: usize = 5;
    pub const INIT_SNAKE_POSITION: IVec2 = IVec2::new(5, 0);
    /// Milliseconds between ticks at the starting speed
    pub const FRAME_WAIT_MS: f64 = 200.0;

    /// Pixels per cell
    pub const SCALE_FACTOR: f64 = 20.0;
    /// Gap around each painted cell, as a fraction of a cell
    pub const CELL_PADDING: f64 = 0.1;
}
