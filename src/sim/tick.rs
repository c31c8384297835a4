//! Simulation step
//!
//! One tick runs four phases in a fixed order:
//! 1. consumption: head on fruit raises `fruit_eaten` (before moving, so the
//!    growth lands on the fruit's cell)
//! 2. movement: the snake advances one cell
//! 3. `position_updated` with the new head
//! 4. termination: self collision or leaving the board raises `game_over`

use super::events::GameEvent;
use super::grid::Board;
use super::state::{GameState, Outcome, Snake};

/// Advance the game state by one tick. Does nothing once the game is over.
pub fn tick(state: &mut GameState) {
    if state.is_game_over() {
        return;
    }
    state.time_ticks += 1;

    if state.snake.head == state.fruit.position {
        let position = state.fruit.position;
        log::debug!("Fruit eaten at {position} (tick {})", state.time_ticks);
        state.emit(GameEvent::FruitEaten { position });

        // Nowhere left to put a fruit
        if let Some(outcome) = state.outcome() {
            state.emit(GameEvent::GameOver { outcome });
            return;
        }
    }

    state.snake.advance();
    let head = state.snake.head;
    state.emit(GameEvent::PositionUpdated { head });

    if let Some(outcome) = detect_termination(&state.snake, &state.board) {
        if state.finish(outcome) {
            state.emit(GameEvent::GameOver { outcome });
        }
    }
}

/// Collision check for the snake's current head
pub fn detect_termination(snake: &Snake, board: &Board) -> Option<Outcome> {
    if snake.bites_itself() {
        Some(Outcome::SelfCollision)
    } else if !board.contains(snake.head) {
        Some(Outcome::HitWall)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    use glam::IVec2;
    use proptest::prelude::*;

    use super::*;
    use crate::settings::GameConfig;
    use crate::sim::events::EventKind;
    use crate::sim::grid::{Direction, Point};
    use crate::sim::state::Fruit;

    fn state_with_fruit_at(fruit: Point) -> GameState {
        let mut state = GameState::new(&GameConfig::default(), 11);
        state.fruit = Fruit::new(fruit);
        state
    }

    #[test]
    fn test_plain_tick_moves_snake() {
        let mut state = state_with_fruit_at(IVec2::new(20, 20));
        tick(&mut state);
        assert_eq!(state.snake.head, IVec2::new(6, 0));
        assert_eq!(state.snake.body.len(), 5);
        assert_eq!(state.time_ticks, 1);
        assert!(!state.is_game_over());
    }

    #[test]
    fn test_fruit_consumption() {
        let mut state = state_with_fruit_at(IVec2::new(6, 0));
        let seen: Rc<RefCell<Vec<(Point, Option<Point>)>>> = Rc::new(RefCell::new(Vec::new()));
        let probe = seen.clone();
        // Runs after the classic rules have grown the snake
        state.events.subscribe(EventKind::FruitEaten, move |state, event| {
            if let GameEvent::FruitEaten { position } = *event {
                assert!(!state.snake.occupies(state.fruit.position));
                probe
                    .borrow_mut()
                    .push((position, state.snake.body.back().copied()));
            }
        });

        // Head moves onto the fruit; consumption is detected before moving
        tick(&mut state);
        assert_eq!(state.snake.head, IVec2::new(6, 0));
        assert!(seen.borrow().is_empty());
        assert_eq!(state.score(), 0);

        tick(&mut state);
        assert_eq!(
            *seen.borrow(),
            vec![(IVec2::new(6, 0), Some(IVec2::new(6, 0)))]
        );
        assert_eq!(state.score(), 1);
        assert_eq!(state.snake.body.len(), 6);
        assert_eq!(state.snake.head, IVec2::new(7, 0));
        assert_ne!(state.fruit.position, IVec2::new(6, 0));
        assert!(state.board.contains(state.fruit.position));
    }

    #[test]
    fn test_wall_ends_game_once() {
        let mut state = state_with_fruit_at(IVec2::new(20, 20));
        state.snake.head = IVec2::new(0, 0);
        state.snake.body = VecDeque::from(vec![IVec2::new(0, 1), IVec2::new(0, 2)]);
        state.snake.face(Direction::Up);
        assert!(state.snake.set_direction(Direction::Left));

        let fired = Rc::new(RefCell::new(0));
        let counter = fired.clone();
        state.events.subscribe(EventKind::GameOver, move |_, event| {
            assert_eq!(
                *event,
                GameEvent::GameOver {
                    outcome: Outcome::HitWall
                }
            );
            *counter.borrow_mut() += 1;
        });

        tick(&mut state);
        assert!(state.is_game_over());
        assert_eq!(state.outcome(), Some(Outcome::HitWall));
        assert_eq!(state.snake.head, IVec2::new(-1, 0));

        tick(&mut state);
        tick(&mut state);
        assert_eq!(*fired.borrow(), 1);
    }

    #[test]
    fn test_self_collision() {
        let mut state = state_with_fruit_at(IVec2::new(20, 20));
        // Head at (5,5) heading down into its own body loop
        state.snake.head = IVec2::new(5, 5);
        state.snake.body = VecDeque::from(vec![
            IVec2::new(4, 5),
            IVec2::new(4, 6),
            IVec2::new(5, 6),
            IVec2::new(6, 6),
        ]);
        state.snake.face(Direction::Down);
        tick(&mut state);
        assert_eq!(state.outcome(), Some(Outcome::SelfCollision));
    }

    #[test]
    fn test_terminal_state_is_frozen() {
        let mut state = state_with_fruit_at(IVec2::new(20, 20));
        state.finish(Outcome::HitWall);
        let snake = state.snake.clone();
        let fruit = state.fruit;
        tick(&mut state);
        assert_eq!(state.snake, snake);
        assert_eq!(state.fruit, fruit);
        assert_eq!(state.score(), 0);
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_board_filled_wins() {
        let config = GameConfig {
            board_size: 3,
            initial_head: IVec2::new(2, 0),
            initial_length: 2,
            ..GameConfig::default()
        };
        let mut state = GameState::new(&config, 5);
        // Lay the snake along the board leaving only (0,2) free, head on the fruit
        state.snake.head = IVec2::new(1, 2);
        state.snake.body = VecDeque::from(vec![
            IVec2::new(2, 2),
            IVec2::new(2, 1),
            IVec2::new(1, 1),
            IVec2::new(0, 1),
            IVec2::new(0, 0),
            IVec2::new(1, 0),
            IVec2::new(2, 0),
        ]);
        state.snake.face(Direction::Left);
        state.fruit = Fruit::new(IVec2::new(1, 2));

        let outcomes = Rc::new(RefCell::new(Vec::new()));
        let sink = outcomes.clone();
        state.events.subscribe(EventKind::GameOver, move |_, event| {
            sink.borrow_mut().push(*event);
        });

        tick(&mut state);
        assert_eq!(state.outcome(), Some(Outcome::BoardFilled));
        assert!(state.outcome().is_some_and(Outcome::is_win));
        assert_eq!(
            *outcomes.borrow(),
            vec![GameEvent::GameOver {
                outcome: Outcome::BoardFilled
            }]
        );
        // No movement after the win
        assert_eq!(state.snake.head, IVec2::new(1, 2));
    }

    #[test]
    fn test_event_order_within_tick() {
        let mut state = state_with_fruit_at(IVec2::new(5, 0));
        state.snake.head = IVec2::new(5, 0);
        state.snake.face(Direction::Up);
        let log = Rc::new(RefCell::new(Vec::new()));
        for kind in EventKind::ALL {
            let l = log.clone();
            state
                .events
                .subscribe(kind, move |_, event| l.borrow_mut().push(event.kind()));
        }

        tick(&mut state);
        assert_eq!(
            *log.borrow(),
            vec![
                EventKind::FruitEaten,
                EventKind::PositionUpdated,
                EventKind::GameOver
            ]
        );
    }

    #[test]
    fn test_determinism() {
        let config = GameConfig::default();
        let mut a = GameState::new(&config, 99);
        let mut b = GameState::new(&config, 99);
        let turns = [Direction::Down, Direction::Right, Direction::Down, Direction::Left];
        for turn in turns.iter().cycle().take(40) {
            a.snake.set_direction(*turn);
            b.snake.set_direction(*turn);
            tick(&mut a);
            tick(&mut b);
        }
        assert_eq!(a.snake, b.snake);
        assert_eq!(a.fruit, b.fruit);
        assert_eq!(a.score(), b.score());
        assert_eq!(a.outcome(), b.outcome());
    }

    proptest! {
        #[test]
        fn prop_game_over_freezes_everything(
            seed in any::<u64>(),
            turns in prop::collection::vec(prop::sample::select(Direction::ALL.to_vec()), 1..200),
        ) {
            let mut state = GameState::new(&GameConfig::default(), seed);
            let mut frozen = None;
            for turn in turns {
                state.snake.set_direction(turn);
                tick(&mut state);
                if state.is_game_over() {
                    let snapshot = (state.snake.clone(), state.fruit, state.score());
                    if let Some(previous) = &frozen {
                        prop_assert_eq!(previous, &snapshot);
                    }
                    frozen = Some(snapshot);
                }
            }
        }
    }
}
