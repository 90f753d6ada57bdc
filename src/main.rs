//! Wheel Dodge headless driver
//!
//! Runs one seeded session at display cadence with a simple autopilot on the
//! resize controls and prints a JSON summary.
//!
//! Usage: `wheel-dodge [seed] [settings.json]`

use std::cell::RefCell;
use std::rc::Rc;

use wheel_dodge::Settings;
use wheel_dodge::consts::*;
use wheel_dodge::sim::{GameState, ResizeDirection, Viewport};

/// Stop the demo after this much logical time even if attempts remain
const MAX_SESSION_MS: Millis = 120_000;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0x5EED);
    let settings = match args.next() {
        Some(path) => match Settings::from_file(&path) {
            Ok(settings) => settings,
            Err(err) => {
                log::error!("{}: {}", path, err);
                std::process::exit(1);
            }
        },
        None => Settings::default(),
    };

    log::info!("Wheel Dodge (headless) starting with seed {}", seed);
    let summary = run_session(settings, seed);
    println!("{:#}", summary);
}

fn run_session(settings: Settings, seed: u64) -> serde_json::Value {
    let viewport = Viewport::new(DEFAULT_VIEWPORT_WIDTH, DEFAULT_VIEWPORT_HEIGHT);
    let mut state = GameState::new(settings, viewport, seed);

    let spawned = Rc::new(RefCell::new(0u32));
    let sink = spawned.clone();
    state.events.on_obstacle_added(move |_| *sink.borrow_mut() += 1);
    let hits = Rc::new(RefCell::new(0u32));
    let sink = hits.clone();
    state.events.on_collision_feedback(move || *sink.borrow_mut() += 1);
    state.events.on_attempts_changed(|remaining| log::info!("Attempts: {}", remaining));
    state.events.on_game_over(|| log::info!("Game Over - try again!"));

    state.start();

    let mut now: Millis = 0;
    while !state.is_over() && now < MAX_SESSION_MS {
        now += FRAME_MS;
        steer(&mut state);
        state.frame(now);
    }

    serde_json::json!({
        "seed": state.seed(),
        "duration_ms": now,
        "game_over": state.is_over(),
        "obstacles_spawned": *spawned.borrow(),
        "collisions": *hits.borrow(),
        "attempts_remaining": state.attempts_remaining(),
        "final_wheel_size": state.wheel_size(),
    })
}

/// Shrink while a stripe is lined up with the wheel, grow back otherwise
fn steer(state: &mut GameState) {
    let now = state.now();
    let wheel = state.wheel().rect_at(now);
    let threatened = state.obstacles().any(|o| {
        let rect = o.rect_at(now);
        let lined_up = rect.max.y >= wheel.min.y && rect.min.y <= wheel.max.y;
        let approaching = rect.min.x > wheel.max.x - 1.0;
        lined_up && approaching
    });

    let wanted = if threatened {
        Some(ResizeDirection::Shrink)
    } else if state.wheel_size() < state.settings().initial_wheel_size {
        Some(ResizeDirection::Grow)
    } else {
        None
    };

    if wanted != state.held_resize() {
        match wanted {
            Some(direction) => state.begin_continuous_resize(direction),
            None => state.end_continuous_resize(),
        }
    }
}
