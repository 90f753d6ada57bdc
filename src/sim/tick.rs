//! Per-frame collision and motion pass
//!
//! Runs at the host's display cadence. Positions are sampled from the
//! interpolated wheel size and obstacle motion at the current logical time,
//! never from stored per-frame state, so the frame rate does not matter.

use super::events::GameEvent;
use super::state::{GamePhase, GameState, ObstacleId};
use crate::consts::Millis;

/// What happened during one frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Obstacles consumed by hitting the wheel
    pub collisions: Vec<ObstacleId>,
    /// Obstacles removed after leaving the left edge
    pub completed: Vec<ObstacleId>,
    /// The session ended during this frame
    pub game_over: bool,
}

/// Advance the clock to `now`, then check collisions and retire finished
/// obstacles
pub fn frame(state: &mut GameState, now: Millis) -> FrameReport {
    state.advance(now);

    let mut report = FrameReport::default();
    if state.phase() == GamePhase::Running {
        detect_collisions(state, &mut report);
    }
    sweep_completed(state, &mut report);
    report
}

/// Consume every obstacle overlapping the wheel.
///
/// Stops at the hit that ends the session. Obstacles that would also have
/// hit in that frame are left alone and drift off via the completion sweep.
fn detect_collisions(state: &mut GameState, report: &mut FrameReport) {
    let now = state.now();
    let wheel = state.wheel().rect_at(now);

    // Snapshot ids: removals below mutate the set
    let ids: Vec<ObstacleId> = state.obstacles().map(|o| o.id).collect();
    for id in ids {
        let Some(obstacle) = state.obstacle(id) else {
            continue;
        };
        if !obstacle.rect_at(now).intersects(&wheel) {
            continue;
        }

        log::debug!("Obstacle {} hit the wheel at {}ms", id.get(), now);
        state.emit(GameEvent::CollisionFeedback);
        state.record_collision();
        state.remove_obstacle(id);
        report.collisions.push(id);

        if state.is_over() {
            report.game_over = true;
            break;
        }
    }
}

/// Remove obstacles whose travel has finished. Runs in every phase so
/// stripes still in flight at game over get cleaned up.
fn sweep_completed(state: &mut GameState, report: &mut FrameReport) {
    let now = state.now();
    let finished: Vec<ObstacleId> = state
        .obstacles()
        .filter(|o| o.is_finished(now))
        .map(|o| o.id)
        .collect();

    for id in finished {
        if state.remove_obstacle(id).is_some() {
            report.completed.push(id);
        }
    }
}
