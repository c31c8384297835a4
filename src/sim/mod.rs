//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per call, no wall-clock time
//! - Seeded RNG only
//! - Subscribers run synchronously in subscription order
//! - No rendering or platform dependencies

pub mod events;
pub mod grid;
pub mod rules;
pub mod scenario;
pub mod spawn;
pub mod state;
pub mod tick;

pub use events::{Callback, EventBus, EventKind, GameEvent, Subscription, SubscriptionId};
pub use grid::{Board, Direction, Point, euclidean_distance, manhattan_distance};
pub use scenario::{FnScene, Scenario, Scene, SceneHandles};
pub use spawn::spawn_fruit;
pub use state::{Fruit, FruitSkin, GameState, Outcome, Snake, SnakeSkin, Theme};
pub use tick::{detect_termination, tick};
