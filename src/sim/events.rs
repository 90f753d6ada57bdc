//! State-change notifications
//!
//! The presentation layer subscribes per event kind. Listeners run
//! synchronously in registration order. A panicking listener is caught and
//! logged so it cannot block the other listeners or the state mutation that
//! raised the event.

use std::panic::{AssertUnwindSafe, catch_unwind};

use serde::{Deserialize, Serialize};

use super::state::Obstacle;

/// Something the presentation layer may want to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Wheel target diameter changed
    SizeChanged { size: f32 },
    /// Session ended
    GameOver,
    ObstacleAdded(Obstacle),
    ObstacleRemoved(Obstacle),
    /// Haptic/audio cue for a wheel hit
    CollisionFeedback,
    /// Attempts counter changed (reset or hit)
    AttemptsChanged { remaining: u32 },
}

/// Discriminant used for subscriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    SizeChanged,
    GameOver,
    ObstacleAdded,
    ObstacleRemoved,
    CollisionFeedback,
    AttemptsChanged,
}

impl EventKind {
    const COUNT: usize = 6;

    fn index(self) -> usize {
        self as usize
    }
}

impl GameEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::SizeChanged { .. } => EventKind::SizeChanged,
            GameEvent::GameOver => EventKind::GameOver,
            GameEvent::ObstacleAdded(_) => EventKind::ObstacleAdded,
            GameEvent::ObstacleRemoved(_) => EventKind::ObstacleRemoved,
            GameEvent::CollisionFeedback => EventKind::CollisionFeedback,
            GameEvent::AttemptsChanged { .. } => EventKind::AttemptsChanged,
        }
    }
}

/// Boxed event callback
pub type Listener = Box<dyn FnMut(&GameEvent)>;

/// Per-kind listener registry
pub struct EventBus {
    listeners: [Vec<Listener>; EventKind::COUNT],
}

impl Default for EventBus {
    fn default() -> Self {
        Self {
            listeners: std::array::from_fn(|_| Vec::new()),
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for one event kind
    pub fn subscribe(&mut self, kind: EventKind, listener: impl FnMut(&GameEvent) + 'static) {
        self.listeners[kind.index()].push(Box::new(listener));
    }

    /// Register a listener for every event kind
    pub fn subscribe_all(&mut self, listener: impl FnMut(&GameEvent) + 'static) {
        let shared = std::rc::Rc::new(std::cell::RefCell::new(listener));
        for list in &mut self.listeners {
            let shared = shared.clone();
            list.push(Box::new(move |event| (&mut *shared.borrow_mut())(event)));
        }
    }

    pub fn on_size_changed(&mut self, mut f: impl FnMut(f32) + 'static) {
        self.subscribe(EventKind::SizeChanged, move |event| {
            if let GameEvent::SizeChanged { size } = event {
                f(*size);
            }
        });
    }

    pub fn on_game_over(&mut self, mut f: impl FnMut() + 'static) {
        self.subscribe(EventKind::GameOver, move |_| f());
    }

    pub fn on_obstacle_added(&mut self, mut f: impl FnMut(&Obstacle) + 'static) {
        self.subscribe(EventKind::ObstacleAdded, move |event| {
            if let GameEvent::ObstacleAdded(obstacle) = event {
                f(obstacle);
            }
        });
    }

    pub fn on_obstacle_removed(&mut self, mut f: impl FnMut(&Obstacle) + 'static) {
        self.subscribe(EventKind::ObstacleRemoved, move |event| {
            if let GameEvent::ObstacleRemoved(obstacle) = event {
                f(obstacle);
            }
        });
    }

    pub fn on_collision_feedback(&mut self, mut f: impl FnMut() + 'static) {
        self.subscribe(EventKind::CollisionFeedback, move |_| f());
    }

    pub fn on_attempts_changed(&mut self, mut f: impl FnMut(u32) + 'static) {
        self.subscribe(EventKind::AttemptsChanged, move |event| {
            if let GameEvent::AttemptsChanged { remaining } = event {
                f(*remaining);
            }
        });
    }

    /// Deliver an event to every listener of its kind
    pub fn emit(&mut self, event: &GameEvent) {
        let kind = event.kind();
        for (i, listener) in self.listeners[kind.index()].iter_mut().enumerate() {
            if catch_unwind(AssertUnwindSafe(|| listener(event))).is_err() {
                log::error!("{:?} listener #{} panicked; continuing", kind, i);
            }
        }
    }

    /// Total registered listeners across all kinds
    pub fn listener_count(&self) -> usize {
        self.listeners.iter().map(Vec::len).sum()
    }

    pub fn clear(&mut self) {
        for list in &mut self.listeners {
            list.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_listeners_run_in_registration_order() {
        let mut bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for tag in ["first", "second", "third"] {
            let log = log.clone();
            bus.on_game_over(move || log.borrow_mut().push(tag));
        }
        bus.emit(&GameEvent::GameOver);
        assert_eq!(*log.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_only_matching_kind_is_delivered() {
        let mut bus = EventBus::new();
        let sizes = Rc::new(RefCell::new(Vec::new()));
        let sink = sizes.clone();
        bus.on_size_changed(move |size| sink.borrow_mut().push(size));

        bus.emit(&GameEvent::GameOver);
        bus.emit(&GameEvent::SizeChanged { size: 115.0 });
        bus.emit(&GameEvent::CollisionFeedback);
        assert_eq!(*sizes.borrow(), vec![115.0]);
    }

    #[test]
    fn test_panicking_listener_is_isolated() {
        let mut bus = EventBus::new();
        let hits = Rc::new(RefCell::new(0));
        bus.on_collision_feedback(|| panic!("haptics unavailable"));
        let sink = hits.clone();
        bus.on_collision_feedback(move || *sink.borrow_mut() += 1);

        bus.emit(&GameEvent::CollisionFeedback);
        bus.emit(&GameEvent::CollisionFeedback);
        assert_eq!(*hits.borrow(), 2);
    }

    #[test]
    fn test_subscribe_all_sees_every_kind() {
        let mut bus = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        bus.subscribe_all(move |event| sink.borrow_mut().push(event.kind()));
        assert_eq!(bus.listener_count(), EventKind::COUNT);

        bus.emit(&GameEvent::AttemptsChanged { remaining: 4 });
        bus.emit(&GameEvent::GameOver);
        assert_eq!(
            *seen.borrow(),
            vec![EventKind::AttemptsChanged, EventKind::GameOver]
        );

        bus.clear();
        assert_eq!(bus.listener_count(), 0);
    }
}
