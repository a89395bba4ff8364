//! Murkpond - a tile-maze swimming game core
//!
//! The player swims through a dark maze, eating shrimp to keep the light
//! around them from shrinking away, and has to reach the exit tile without
//! touching a wall.
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, tile collisions, world state)
//! - `scheduler`: Fixed-timestep loop driving update/render callbacks
//! - `level`: Level data schema and validation
//! - `levelgen`: Seeded maze/level generator
//! - `platform`: Host abstraction (clock, frame callbacks, storage)
//! - `game`: Driver wiring input, world, and persistence together

pub mod game;
pub mod level;
pub mod levelgen;
pub mod platform;
pub mod scheduler;
pub mod settings;
pub mod sim;

pub use level::LevelData;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Simulation updates per second (the fixed logic rate)
    pub const UPDATES_PER_SEC: u32 = 30;

    /// Velocity added per held direction key per tick
    pub const STEER_IMPULSE: f32 = 0.55;
    /// Per-axis velocity cap; keeps the swept collision checks honest
    pub const VEL_MAX: f32 = 15.0;
    /// Multiplicative velocity decay per tick when keys are released
    pub const FRICTION: f32 = 0.9;
    /// Velocity magnitude below which the player counts as idle
    pub const IDLE_THRESHOLD: f32 = 0.1;

    /// Light radius cap as a fraction of the smaller world dimension
    pub const LIGHT_MAX_FRACTION: f32 = 0.4;
    /// Light radius floor as a multiple of the larger player dimension
    pub const LIGHT_MIN_FACTOR: f32 = 1.3;
    /// Multiplicative light radius decay per tick
    pub const LIGHT_DECAY: f32 = 0.999;

    /// Ticks per animation frame while swimming
    pub const SWIM_FRAME_DELAY: f32 = 5.0;
    /// Ticks per animation frame for squirming shrimp
    pub const SQUIRM_FRAME_DELAY: f32 = 15.0;

    /// Last level of the campaign
    pub const FINAL_LEVEL: u32 = 5;
}
