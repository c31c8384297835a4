//! Classic fruit rules
//!
//! Installed as the first `fruit_eaten` subscribers of every session:
//! score a point, grow at the eaten fruit's cell, then place a new fruit.
//! When no cell is left the session ends as a win.

use super::events::{EventKind, GameEvent, Subscription};
use super::state::{GameState, Outcome};

/// Points per fruit
pub const FRUIT_POINTS: u32 = 1;

pub fn install(state: &mut GameState) -> [Subscription; 3] {
    let score = state
        .events
        .subscribe(EventKind::FruitEaten, |state, _| state.award(FRUIT_POINTS));

    let grow = state.events.subscribe(EventKind::FruitEaten, |state, event| {
        if let GameEvent::FruitEaten { position } = *event {
            state.snake.grow(position);
        }
    });

    let respawn = state
        .events
        .subscribe(EventKind::FruitEaten, |state, _| match state.respawn_fruit() {
            Some(position) => log::debug!("Fruit respawned at {position}"),
            None => {
                state.finish(Outcome::BoardFilled);
            }
        });

    [score, grow, respawn]
}
