//! Scene progression
//!
//! A scenario is an ordered list of scenes with a forward-only cursor. The
//! first scene is entered on construction. After each tick the next scene's
//! readiness is checked; when it holds, the current scene exits, the cursor
//! moves by one and the new scene enters. Scenes install their side effects
//! as event subscriptions and hand the handles back so exit can remove them.

use super::events::{EventKind, GameEvent, Subscription};
use super::state::GameState;

/// Subscriptions installed by a scene while it is active
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SceneHandles {
    subscriptions: Vec<Subscription>,
}

impl SceneHandles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe and remember the handle
    pub fn subscribe(
        &mut self,
        state: &mut GameState,
        kind: EventKind,
        callback: impl FnMut(&mut GameState, &GameEvent) + 'static,
    ) {
        let subscription = state.events.subscribe(kind, callback);
        self.subscriptions.push(subscription);
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Remove every subscription this set holds
    pub fn release(self, state: &mut GameState) {
        for subscription in self.subscriptions {
            state.events.unsubscribe(subscription);
        }
    }
}

/// One phase of scripted behavior
pub trait Scene {
    fn name(&self) -> &str;

    /// Whether this scene should take over from the one before it
    fn is_ready(&self, state: &GameState) -> bool;

    /// Install the scene's effects
    fn enter(&mut self, state: &mut GameState) -> SceneHandles;

    /// Tear down the scene's effects
    fn exit(&mut self, state: &mut GameState, handles: SceneHandles) {
        handles.release(state);
    }
}

type Predicate = Box<dyn Fn(&GameState) -> bool>;
type EnterAction = Box<dyn FnMut(&mut GameState, &mut SceneHandles)>;
type ExitAction = Box<dyn FnMut(&mut GameState)>;

/// Scene assembled from closures
pub struct FnScene {
    name: String,
    ready: Predicate,
    on_enter: EnterAction,
    on_exit: Option<ExitAction>,
}

impl FnScene {
    pub fn new(
        name: impl Into<String>,
        ready: impl Fn(&GameState) -> bool + 'static,
        on_enter: impl FnMut(&mut GameState, &mut SceneHandles) + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            ready: Box::new(ready),
            on_enter: Box::new(on_enter),
            on_exit: None,
        }
    }

    /// Extra teardown run after the scene's subscriptions are released
    pub fn on_exit(mut self, on_exit: impl FnMut(&mut GameState) + 'static) -> Self {
        self.on_exit = Some(Box::new(on_exit));
        self
    }
}

impl Scene for FnScene {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_ready(&self, state: &GameState) -> bool {
        (self.ready)(state)
    }

    fn enter(&mut self, state: &mut GameState) -> SceneHandles {
        let mut handles = SceneHandles::new();
        (self.on_enter)(state, &mut handles);
        handles
    }

    fn exit(&mut self, state: &mut GameState, handles: SceneHandles) {
        handles.release(state);
        if let Some(on_exit) = self.on_exit.as_mut() {
            on_exit(state);
        }
    }
}

/// Ordered scenes with a forward-only cursor
pub struct Scenario {
    scenes: Vec<Box<dyn Scene>>,
    active: usize,
    handles: SceneHandles,
}

impl Scenario {
    /// Build the scenario and enter its first scene
    pub fn new(mut scenes: Vec<Box<dyn Scene>>, state: &mut GameState) -> Self {
        let handles = match scenes.first_mut() {
            Some(first) => {
                log::info!("Entering scene '{}'", first.name());
                first.enter(state)
            }
            None => SceneHandles::new(),
        };
        Self {
            scenes,
            active: 0,
            handles,
        }
    }

    /// Scenario with no scenes; transitions never happen
    pub fn empty() -> Self {
        Self {
            scenes: Vec::new(),
            active: 0,
            handles: SceneHandles::new(),
        }
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_name(&self) -> Option<&str> {
        self.scenes.get(self.active).map(|scene| scene.name())
    }

    /// Whether the cursor sits on the last scene
    pub fn is_final(&self) -> bool {
        self.active + 1 >= self.scenes.len()
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Move to the next scene if it is ready. Returns whether a transition
    /// happened; at most one step per call.
    pub fn check_transition(&mut self, state: &mut GameState) -> bool {
        if self.is_final() || !self.scenes[self.active + 1].is_ready(state) {
            return false;
        }

        let handles = std::mem::take(&mut self.handles);
        self.scenes[self.active].exit(state, handles);
        self.active += 1;

        let next = &mut self.scenes[self.active];
        log::info!(
            "Entering scene '{}' at score {} (tick {})",
            next.name(),
            state.score(),
            state.time_ticks
        );
        self.handles = next.enter(state);
        true
    }
}
