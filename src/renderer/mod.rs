//! Rendering contract
//!
//! The simulation never draws. Each frame the session hands the current
//! entities to a `Renderer`; implementations must not mutate them.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod shapes;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
pub use shapes::{CellRect, Palette, cell_rect};

use crate::sim::{Fruit, GameState, Outcome, Snake, Theme};

/// Something the renderer can paint
#[derive(Debug, Clone, Copy)]
pub enum Entity<'a> {
    Fruit(&'a Fruit),
    Snake(&'a Snake),
}

/// Paints game state onto a surface owned by the implementation
pub trait Renderer {
    /// Clear the surface before painting a frame
    fn begin_frame(&mut self) {}

    fn paint(&mut self, entity: Entity<'_>, theme: &Theme);

    /// Current score display
    fn show_score(&mut self, _score: u32) {}

    /// Final result, reported once when the session ends
    fn show_outcome(&mut self, outcome: Outcome, score: u32);
}

/// Paint one frame: fruit first, then the snake on top
pub fn paint_state(renderer: &mut dyn Renderer, state: &GameState) {
    renderer.begin_frame();
    renderer.paint(Entity::Fruit(&state.fruit), &state.theme);
    renderer.paint(Entity::Snake(&state.snake), &state.theme);
    renderer.show_score(state.score());
}

/// Renderer that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogRenderer {
    last_score: Option<u32>,
}

impl Renderer for LogRenderer {
    fn paint(&mut self, _entity: Entity<'_>, _theme: &Theme) {}

    fn show_score(&mut self, score: u32) {
        if self.last_score != Some(score) {
            log::info!("Score: {score}");
            self.last_score = Some(score);
        }
    }

    fn show_outcome(&mut self, outcome: Outcome, score: u32) {
        log::info!("Game over ({}). Your score was: {score}", outcome.as_str());
    }
}
