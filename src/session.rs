//! One game session
//!
//! Owns the game state, the scenario, the frame clock and the renderer. The
//! host creates one per game, feeds it direction commands and frame
//! timestamps, and drops it when the game ends. Restarting means building a
//! new session.
//!
//! Per frame: tick gate, then (if due) the simulation step and the scene
//! transition check, then painting, then the terminal check.

use crate::game_loop::FrameClock;
use crate::renderer::{Renderer, paint_state};
use crate::settings::{ConfigError, GameConfig};
use crate::sim::{Direction, GameEvent, GameState, Outcome, Scenario, Scene, tick};

/// Final result of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameReport {
    pub outcome: Outcome,
    pub score: u32,
    pub ticks: u64,
}

/// What the host should do after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// Request another frame
    Continue,
    /// Stop requesting frames
    Finished(GameReport),
}

pub struct Session {
    state: GameState,
    scenario: Scenario,
    clock: FrameClock,
    renderer: Box<dyn Renderer>,
    report: Option<GameReport>,
}

impl Session {
    /// Validate `config`, build the state and enter the first scene
    pub fn new(
        config: &GameConfig,
        seed: u64,
        renderer: Box<dyn Renderer>,
        scenes: Vec<Box<dyn Scene>>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let session = Self::start(GameState::new(config, seed), renderer, scenes);
        log::info!(
            "Session started (seed {seed}, board {}x{}, {} scenes)",
            config.board_size,
            config.board_size,
            session.scenario.len()
        );
        Ok(session)
    }

    /// Enter the first scene. A state that is already over is announced
    /// to the scene's subscribers so it ends like any other game.
    fn start(
        mut state: GameState,
        renderer: Box<dyn Renderer>,
        scenes: Vec<Box<dyn Scene>>,
    ) -> Self {
        let scenario = Scenario::new(scenes, &mut state);
        if let Some(outcome) = state.outcome() {
            state.emit(GameEvent::GameOver { outcome });
        }
        Self {
            state,
            scenario,
            clock: FrameClock::new(),
            renderer,
            report: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn report(&self) -> Option<GameReport> {
        self.report
    }

    /// Apply a direction command. An accepted turn ticks on the next frame.
    pub fn steer(&mut self, direction: Direction) -> bool {
        if self.report.is_some() {
            return false;
        }
        let accepted = self.state.snake.set_direction(direction);
        if accepted {
            self.clock.request_update();
        }
        accepted
    }

    /// Run one frame at `timestamp` (milliseconds)
    pub fn on_frame(&mut self, timestamp: f64) -> FrameStatus {
        if let Some(report) = self.report {
            return FrameStatus::Finished(report);
        }

        let interval = self.state.snake.frame_interval_ms();
        if self.clock.should_tick(timestamp, interval) {
            tick(&mut self.state);
            if !self.state.is_game_over() {
                self.scenario.check_transition(&mut self.state);
            }
        }

        paint_state(self.renderer.as_mut(), &self.state);

        match self.state.outcome() {
            Some(outcome) => {
                let report = GameReport {
                    outcome,
                    score: self.state.score(),
                    ticks: self.state.time_ticks,
                };
                self.renderer.show_outcome(outcome, report.score);
                self.report = Some(report);
                FrameStatus::Finished(report)
            }
            None => FrameStatus::Continue,
        }
    }
}
