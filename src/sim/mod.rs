//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Injected logical clock only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod events;
pub mod state;
pub mod tick;
pub mod tween;

pub use clock::{Due, Scheduler, TimerId};
pub use collision::Rect;
pub use events::{EventBus, EventKind, GameEvent, Listener};
pub use state::{
    GamePhase, GameState, Obstacle, ObstacleId, Process, ResizeDirection, SpawnBand, Viewport,
    WheelState,
};
pub use tick::{FrameReport, frame};
pub use tween::{Easing, Tween};
