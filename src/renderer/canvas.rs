//! Canvas 2D renderer

use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use super::shapes::{Palette, cell_rect};
use super::{Entity, Renderer};
use crate::sim::{Outcome, Point, Theme};

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
    scale: f64,
    padding: f64,
    document: Document,
    score_label_id: String,
}

impl CanvasRenderer {
    /// Size the canvas to the board and grab its 2D context
    pub fn new(
        document: Document,
        canvas: &HtmlCanvasElement,
        board_size: i32,
        scale: f64,
        padding: f64,
        score_label_id: &str,
    ) -> Option<Self> {
        use wasm_bindgen::JsCast;

        let side = (board_size as f64 * scale) as u32;
        canvas.set_width(side);
        canvas.set_height(side);
        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;

        Some(Self {
            ctx,
            width: side as f64,
            height: side as f64,
            scale,
            padding,
            document,
            score_label_id: score_label_id.to_string(),
        })
    }

    fn fill_cell(&self, cell: Point, color: &str) {
        let rect = cell_rect(cell, self.scale, self.padding);
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(rect.x, rect.y, rect.width, rect.height);
    }
}

impl Renderer for CanvasRenderer {
    fn begin_frame(&mut self) {
        self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
    }

    fn paint(&mut self, entity: Entity<'_>, theme: &Theme) {
        let palette = Palette::for_skins(theme.snake, theme.fruit);
        match entity {
            Entity::Fruit(fruit) => self.fill_cell(fruit.position, palette.fruit),
            Entity::Snake(snake) => {
                self.fill_cell(snake.head, palette.head);
                for &segment in &snake.body {
                    self.fill_cell(segment, palette.body);
                }
            }
        }
    }

    fn show_score(&mut self, score: u32) {
        if let Some(label) = self.document.get_element_by_id(&self.score_label_id) {
            label.set_text_content(Some(&format!("Score: {score}")));
        }
    }

    fn show_outcome(&mut self, outcome: Outcome, score: u32) {
        let message = if outcome.is_win() {
            format!("You filled the board! Your score was: {score}")
        } else {
            format!("Game over! Your score was: {score}")
        };
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(&message);
        }
    }
}
