//! Nebula Drift - simulation core for a top-down arcade shooter
//!
//! Core modules:
//! - `sim`: Streamed obstacles, projectiles, pickups and particles
//! - `input`: Keyboard/mouse/touch fusion into one per-tick command snapshot
//! - `renderer`: 2D drawing surface abstraction
//! - `platform`: Browser event wiring and clocks
//! - `tuning`: Data-driven game balance (the BASE tunables)

pub mod input;
pub mod math;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use input::{InputManager, InputState, ListenerGuard};
pub use settings::InputSettings;
pub use tuning::Tunables;

/// Game configuration constants
pub mod consts {
    /// Reference tick length in milliseconds. Entity motion is tuned per tick
    /// and scaled by `dt / TICK_MS`.
    pub const TICK_MS: f32 = 16.67;

    /// Obstacles further than `view_radius(CULL_FACTOR)` are recycled
    pub const CULL_FACTOR: f32 = 1.8;
    /// Recycle annulus, as view radius factors
    pub const RECYCLE_INNER_FACTOR: f32 = 0.45;
    pub const RECYCLE_OUTER_FACTOR: f32 = 1.4;
    /// Initial population annulus, as view radius factors
    pub const SPAWN_INNER_FACTOR: f32 = 0.35;
    pub const SPAWN_OUTER_FACTOR: f32 = 1.2;

    /// Per-axis obstacle drift speed bound (units per tick)
    pub const OBSTACLE_DRIFT: f32 = 0.45;

    /// Bullet lifetime in milliseconds
    pub const BULLET_MAX_LIFE: f32 = 2200.0;

    /// Fraction of coin life during which it blinks
    pub const COIN_BLINK_FRACTION: f32 = 0.3;
    /// Blink window length in milliseconds
    pub const COIN_BLINK_WINDOW_MS: f64 = 100.0;

    /// Particle alpha fades against this window regardless of actual lifetime
    pub const PARTICLE_FADE_MS: f32 = 320.0;

    /// Default secondary-fire pulse in milliseconds
    pub const ALT_FIRE_PULSE_MS: f64 = 150.0;
}

/// Convert a frame delta to reference ticks
#[inline]
pub fn tick_scale(dt: f32) -> f32 {
    dt / consts::TICK_MS
}
