//! Game state and core simulation types
//!
//! `GameState` is the sole owner of the wheel, the attempt counter and the
//! obstacle set. Everything else reads it through notifications and asks for
//! changes through the operations below.

use std::collections::BTreeMap;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::{Scheduler, TimerId};
use super::collision::Rect;
use super::events::{EventBus, GameEvent};
use super::tick::{FrameReport, frame};
use super::tween::{Easing, Tween};
use crate::consts::Millis;
use crate::error::SpawnBandError;
use crate::settings::Settings;

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Constructed, `start()` not called yet
    #[default]
    NotStarted,
    /// Active gameplay
    Running,
    /// Attempts exhausted or stopped; only `start()` leaves this phase
    Over,
}

/// Which way a resize control pushes the wheel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResizeDirection {
    Grow,
    Shrink,
}

impl ResizeDirection {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            ResizeDirection::Grow => 1.0,
            ResizeDirection::Shrink => -1.0,
        }
    }
}

/// Visible area in presentation units (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Vertical interval for obstacle top edges. Always `top < bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnBand {
    top: f32,
    bottom: f32,
}

impl SpawnBand {
    pub fn new(top: f32, bottom: f32) -> Result<Self, SpawnBandError> {
        if !(top.is_finite() && bottom.is_finite()) {
            return Err(SpawnBandError::NonFinite { top, bottom });
        }
        if top >= bottom {
            return Err(SpawnBandError::Inverted { top, bottom });
        }
        // Uniform sampling needs a finite span
        if !(bottom - top).is_finite() {
            return Err(SpawnBandError::SpanOverflow { top, bottom });
        }
        Ok(Self { top, bottom })
    }

    /// Band covering the viewport minus `margin` (a fraction) at each end
    pub fn from_viewport(viewport: Viewport, margin: f32) -> Result<Self, SpawnBandError> {
        Self::new(viewport.height * margin, viewport.height * (1.0 - margin))
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.top
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.bottom
    }

    pub fn contains(&self, y: f32) -> bool {
        y >= self.top && y <= self.bottom
    }
}

impl Default for SpawnBand {
    fn default() -> Self {
        Self {
            top: 0.0,
            bottom: 1.0,
        }
    }
}

/// Stable obstacle identity. Never reused within one `GameState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObstacleId(u32);

impl ObstacleId {
    pub fn get(self) -> u32 {
        self.0
    }
}

/// A stripe sliding right-to-left across the viewport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: ObstacleId,
    /// Top edge
    pub y: f32,
    pub size: Vec2,
    /// Horizontal motion of the left edge
    pub motion: Tween,
}

impl Obstacle {
    /// Interpolated top-left corner
    pub fn position_at(&self, now: Millis) -> Vec2 {
        Vec2::new(self.motion.value_at(now), self.y)
    }

    pub fn rect_at(&self, now: Millis) -> Rect {
        Rect::new(self.position_at(now), self.size)
    }

    /// Travel finished (the stripe is off the left edge)
    pub fn is_finished(&self, now: Millis) -> bool {
        self.motion.is_finished(now)
    }

    pub fn spawned_at(&self) -> Millis {
        self.motion.start
    }
}

/// The player's wheel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WheelState {
    pub center: Vec2,
    /// Target diameter (what the game logic considers the size)
    pub size: f32,
    /// Displayed diameter animation toward `size`
    pub animation: Tween,
    pub rotation_period_ms: Millis,
}

impl WheelState {
    pub fn new(center: Vec2, size: f32, rotation_period_ms: Millis) -> Self {
        Self {
            center,
            size,
            animation: Tween {
                easing: Easing::EaseInOut,
                ..Tween::fixed(size, 0)
            },
            rotation_period_ms,
        }
    }

    /// Diameter as currently drawn (mid-animation values included)
    pub fn displayed_size(&self, now: Millis) -> f32 {
        self.animation.value_at(now)
    }

    /// Bounding square at the displayed size
    pub fn rect_at(&self, now: Millis) -> Rect {
        Rect::centered_square(self.center, self.displayed_size(now))
    }

    /// Rotation angle in radians, [0, TAU)
    pub fn rotation_at(&self, now: Millis) -> f32 {
        if self.rotation_period_ms == 0 {
            return 0.0;
        }
        let phase = (now % self.rotation_period_ms) as f32 / self.rotation_period_ms as f32;
        phase * std::f32::consts::TAU
    }
}

/// Periodic processes multiplexed on the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Process {
    Spawn,
    Resize(ResizeDirection),
}

/// Complete game state
#[derive(Debug)]
pub struct GameState {
    settings: Settings,
    /// Subscribe here; listeners receive values and cannot touch the state
    pub events: EventBus,
    viewport: Viewport,
    phase: GamePhase,
    wheel: WheelState,
    attempts_remaining: u32,
    obstacles: BTreeMap<ObstacleId, Obstacle>,
    spawn_band: SpawnBand,
    seed: u64,
    rng: Pcg32,
    scheduler: Scheduler<Process>,
    spawn_timer: Option<TimerId>,
    resize_timer: Option<TimerId>,
    /// Direction of the control currently held, if any
    held_resize: Option<ResizeDirection>,
    /// Logical clock
    now: Millis,
    next_id: u32,
}

impl GameState {
    /// Create a game in `NotStarted`. `settings` should already be validated.
    pub fn new(settings: Settings, viewport: Viewport, seed: u64) -> Self {
        let spawn_band = match SpawnBand::from_viewport(viewport, settings.spawn_band_margin) {
            Ok(band) => band,
            Err(err) => {
                log::warn!("{}; using default spawn band until one is set", err);
                SpawnBand::default()
            }
        };
        let wheel = WheelState::new(
            viewport.center(),
            settings.initial_wheel_size,
            settings.rotation_period_ms,
        );

        Self {
            attempts_remaining: settings.starting_attempts,
            events: EventBus::new(),
            viewport,
            phase: GamePhase::NotStarted,
            wheel,
            obstacles: BTreeMap::new(),
            spawn_band,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            scheduler: Scheduler::new(),
            spawn_timer: None,
            resize_timer: None,
            held_resize: None,
            now: 0,
            next_id: 1,
            settings,
        }
    }

    // === Accessors ===

    /// Balance values this state was built with (fixed for its lifetime)
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::Over
    }

    pub fn now(&self) -> Millis {
        self.now
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn wheel(&self) -> &WheelState {
        &self.wheel
    }

    pub fn wheel_size(&self) -> f32 {
        self.wheel.size
    }

    pub fn attempts_remaining(&self) -> u32 {
        self.attempts_remaining
    }

    pub fn spawn_band(&self) -> SpawnBand {
        self.spawn_band
    }

    /// Live obstacles in id order
    pub fn obstacles(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.values()
    }

    pub fn obstacle(&self, id: ObstacleId) -> Option<&Obstacle> {
        self.obstacles.get(&id)
    }

    pub fn obstacle_count(&self) -> usize {
        self.obstacles.len()
    }

    pub fn held_resize(&self) -> Option<ResizeDirection> {
        self.held_resize
    }

    /// A resize process is currently scheduled
    pub fn is_resizing(&self) -> bool {
        self.resize_timer
            .is_some_and(|id| self.scheduler.is_active(id))
    }

    /// The spawner process is currently scheduled
    pub fn is_spawning(&self) -> bool {
        self.spawn_timer.is_some_and(|id| self.scheduler.is_active(id))
    }

    // === Session control ===

    /// Enter `Running` from any phase, resetting wheel, attempts and obstacles
    pub fn start(&mut self) {
        self.cancel_processes();
        self.phase = GamePhase::Running;

        let cleared = std::mem::take(&mut self.obstacles);
        for obstacle in cleared.into_values() {
            self.emit(GameEvent::ObstacleRemoved(obstacle));
        }

        self.attempts_remaining = self.settings.starting_attempts;
        self.emit(GameEvent::AttemptsChanged {
            remaining: self.attempts_remaining,
        });

        self.apply_wheel_size(self.settings.initial_wheel_size);

        self.spawn_timer = Some(self.scheduler.schedule_repeating(
            Process::Spawn,
            self.settings.spawn_interval_ms,
            self.now,
        ));
        if let Some(direction) = self.held_resize {
            self.schedule_resize(direction);
        }

        log::info!(
            "Session started at {}ms: wheel={}, attempts={}",
            self.now,
            self.wheel.size,
            self.attempts_remaining
        );
    }

    /// Enter `Over` and halt all processes. Does nothing if already over.
    pub fn stop(&mut self) {
        if self.phase == GamePhase::Over {
            log::debug!("stop() while already over; ignoring");
            return;
        }
        self.phase = GamePhase::Over;
        self.cancel_processes();
        log::info!("Game over at {}ms", self.now);
        self.emit(GameEvent::GameOver);
    }

    // === Wheel ===

    /// Apply one resize step. Returns true if the size changed.
    pub fn change_wheel_size(&mut self, direction: ResizeDirection) -> bool {
        let target = (self.wheel.size + direction.sign() * self.settings.resize_step)
            .max(self.settings.min_wheel_size);
        if target == self.wheel.size {
            return false;
        }
        self.apply_wheel_size(target);
        true
    }

    /// Start the press-and-hold process, replacing any active one
    pub fn begin_continuous_resize(&mut self, direction: ResizeDirection) {
        if let Some(id) = self.resize_timer.take() {
            self.scheduler.cancel(id);
        }
        self.held_resize = Some(direction);
        if self.phase == GamePhase::Running {
            self.schedule_resize(direction);
        }
    }

    /// Release the control. Safe to call when nothing is held.
    pub fn end_continuous_resize(&mut self) {
        if let Some(id) = self.resize_timer.take() {
            self.scheduler.cancel(id);
        }
        self.held_resize = None;
    }

    // === Obstacles ===

    /// Reconfigure the spawn band. On rejection the previous band is kept.
    pub fn set_spawn_band(&mut self, top: f32, bottom: f32) -> Result<(), SpawnBandError> {
        match SpawnBand::new(top, bottom) {
            Ok(band) => {
                self.spawn_band = band;
                Ok(())
            }
            Err(err) => {
                log::warn!("{}; keeping {:?}", err, self.spawn_band);
                Err(err)
            }
        }
    }

    /// Build an obstacle entering at the right edge at the current time
    pub fn create_obstacle(&mut self, y: f32) -> Obstacle {
        let id = ObstacleId(self.next_id);
        self.next_id += 1;
        let width = self.settings.obstacle_width;
        Obstacle {
            id,
            y,
            size: Vec2::new(width, self.settings.obstacle_height),
            motion: Tween::new(
                self.viewport.width,
                -width,
                self.now,
                self.settings.obstacle_travel_duration_ms,
                Easing::Linear,
            ),
        }
    }

    pub fn add_obstacle(&mut self, obstacle: Obstacle) {
        self.obstacles.insert(obstacle.id, obstacle.clone());
        self.emit(GameEvent::ObstacleAdded(obstacle));
    }

    /// Remove by identity. Absent ids are ignored (the collision pass and
    /// the completion sweep may both try to remove the same obstacle).
    pub fn remove_obstacle(&mut self, id: ObstacleId) -> Option<Obstacle> {
        let removed = self.obstacles.remove(&id)?;
        self.emit(GameEvent::ObstacleRemoved(removed.clone()));
        Some(removed)
    }

    /// Spawner tick: new obstacle at a random height inside the live band
    pub fn spawn_obstacle(&mut self) -> ObstacleId {
        let band = self.spawn_band;
        let y = self.rng.random_range(band.top..=band.bottom);
        let obstacle = self.create_obstacle(y);
        let id = obstacle.id;
        log::debug!("Spawned obstacle {} at y={:.1} ({}ms)", id.0, y, self.now);
        self.add_obstacle(obstacle);
        id
    }

    // === Attempts ===

    /// Consume one attempt; ends the session at zero. Ignored unless running.
    pub fn record_collision(&mut self) {
        if self.phase != GamePhase::Running {
            log::debug!("Collision recorded outside a running session; ignoring");
            return;
        }
        self.attempts_remaining = self.attempts_remaining.saturating_sub(1);
        self.emit(GameEvent::AttemptsChanged {
            remaining: self.attempts_remaining,
        });
        if self.attempts_remaining == 0 {
            self.stop();
        }
    }

    // === Clock ===

    /// Advance the logical clock, running every process tick due by `now`
    /// in chronological order
    pub fn advance(&mut self, now: Millis) {
        if now < self.now {
            log::warn!("Clock moved backwards ({} -> {}); ignoring", self.now, now);
            return;
        }
        while let Some(due) = self.scheduler.pop_due(now) {
            self.now = due.at;
            match due.kind {
                Process::Spawn => {
                    self.spawn_obstacle();
                }
                Process::Resize(direction) => {
                    self.change_wheel_size(direction);
                }
            }
        }
        self.now = now;
    }

    /// Advance to `now` and run the collision/motion pass
    pub fn frame(&mut self, now: Millis) -> FrameReport {
        frame(self, now)
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.emit(&event);
    }

    fn apply_wheel_size(&mut self, size: f32) {
        self.wheel.size = size;
        self.wheel
            .animation
            .retarget(size, self.now, self.settings.resize_animation_ms);
        self.emit(GameEvent::SizeChanged { size });
    }

    fn schedule_resize(&mut self, direction: ResizeDirection) {
        self.resize_timer = Some(self.scheduler.schedule_repeating(
            Process::Resize(direction),
            self.settings.resize_interval_ms,
            self.now,
        ));
    }

    fn cancel_processes(&mut self) {
        self.scheduler.cancel_all();
        self.spawn_timer = None;
        self.resize_timer = None;
    }
}
