//! Synchronous event dispatch
//!
//! The set of event kinds is closed. Each kind has its own subscriber list;
//! subscribers run in subscription order with mutable access to the game
//! state. A panicking subscriber is not caught.

use super::grid::Point;
use super::state::{GameState, Outcome};

/// Kinds of events raised by the simulation step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    FruitEaten,
    PositionUpdated,
    GameOver,
}

impl EventKind {
    pub const ALL: [EventKind; 3] = [
        EventKind::FruitEaten,
        EventKind::PositionUpdated,
        EventKind::GameOver,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::FruitEaten => "fruit_eaten",
            EventKind::PositionUpdated => "position_updated",
            EventKind::GameOver => "game_over",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == s)
    }
}

/// An event together with its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// The head reached the fruit; carries the fruit's position
    FruitEaten { position: Point },
    /// The snake moved; carries the new head position
    PositionUpdated { head: Point },
    /// The session ended
    GameOver { outcome: Outcome },
}

impl GameEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::FruitEaten { .. } => EventKind::FruitEaten,
            GameEvent::PositionUpdated { .. } => EventKind::PositionUpdated,
            GameEvent::GameOver { .. } => EventKind::GameOver,
        }
    }
}

/// Subscriber callback
pub type Callback = Box<dyn FnMut(&mut GameState, &GameEvent)>;

/// Identity of one subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Handle returned by `subscribe`, used to unsubscribe later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription {
    pub kind: EventKind,
    pub id: SubscriptionId,
}

struct Subscriber {
    id: SubscriptionId,
    callback: Callback,
}

/// Subscriber registry, one list per event kind
#[derive(Default)]
pub struct EventBus {
    fruit_eaten: Vec<Subscriber>,
    position_updated: Vec<Subscriber>,
    game_over: Vec<Subscriber>,
    next_id: u64,
    /// Kinds whose list is checked out for dispatch (innermost last)
    dispatching: Vec<EventKind>,
    /// Unsubscribes aimed at a checked-out list
    deferred_removals: Vec<SubscriptionId>,
}

impl EventBus {
    fn list(&self, kind: EventKind) -> &Vec<Subscriber> {
        match kind {
            EventKind::FruitEaten => &self.fruit_eaten,
            EventKind::PositionUpdated => &self.position_updated,
            EventKind::GameOver => &self.game_over,
        }
    }

    fn list_mut(&mut self, kind: EventKind) -> &mut Vec<Subscriber> {
        match kind {
            EventKind::FruitEaten => &mut self.fruit_eaten,
            EventKind::PositionUpdated => &mut self.position_updated,
            EventKind::GameOver => &mut self.game_over,
        }
    }

    /// Append a subscriber to the end of `kind`'s list
    pub fn subscribe(
        &mut self,
        kind: EventKind,
        callback: impl FnMut(&mut GameState, &GameEvent) + 'static,
    ) -> Subscription {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.list_mut(kind).push(Subscriber {
            id,
            callback: Box::new(callback),
        });
        Subscription { kind, id }
    }

    /// Subscribe by event name. Unknown names are logged and ignored.
    pub fn subscribe_named(
        &mut self,
        name: &str,
        callback: impl FnMut(&mut GameState, &GameEvent) + 'static,
    ) -> Option<Subscription> {
        let Some(kind) = EventKind::from_str(name) else {
            log::warn!("Unknown event kind: {name}");
            return None;
        };
        Some(self.subscribe(kind, callback))
    }

    /// Remove a subscriber. Returns whether it was registered.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let list = self.list_mut(subscription.kind);
        if let Some(index) = list.iter().position(|s| s.id == subscription.id) {
            list.remove(index);
            return true;
        }
        if self.dispatching.contains(&subscription.kind)
            && !self.deferred_removals.contains(&subscription.id)
        {
            self.deferred_removals.push(subscription.id);
            return true;
        }
        false
    }

    /// Unsubscribe by event name. Unknown names are logged and ignored.
    pub fn unsubscribe_named(&mut self, name: &str, id: SubscriptionId) -> bool {
        let Some(kind) = EventKind::from_str(name) else {
            log::warn!("Unknown event kind: {name}");
            return false;
        };
        self.unsubscribe(Subscription { kind, id })
    }

    /// Number of subscribers currently registered for `kind`
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.list(kind).len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("fruit_eaten", &self.fruit_eaten.len())
            .field("position_updated", &self.position_updated.len())
            .field("game_over", &self.game_over.len())
            .finish()
    }
}

impl GameState {
    /// Notify every subscriber of `event`'s kind, in subscription order
    pub fn emit(&mut self, event: GameEvent) {
        let kind = event.kind();
        let mut subscribers = std::mem::take(self.events.list_mut(kind));
        self.events.dispatching.push(kind);

        for subscriber in subscribers.iter_mut() {
            if self.events.deferred_removals.contains(&subscriber.id) {
                continue;
            }
            (subscriber.callback)(self, &event);
        }

        self.events.dispatching.pop();
        // Subscribers added during dispatch go after the existing ones
        let added = std::mem::take(self.events.list_mut(kind));
        subscribers.extend(added);

        let removed = std::mem::take(&mut self.events.deferred_removals);
        let (applied, pending): (Vec<_>, Vec<_>) = removed
            .into_iter()
            .partition(|id| subscribers.iter().any(|s| s.id == *id));
        subscribers.retain(|s| !applied.contains(&s.id));
        // Outer dispatches may still hold the rest
        if !self.events.dispatching.is_empty() {
            self.events.deferred_removals = pending;
        }

        *self.events.list_mut(kind) = subscribers;
    }
}
