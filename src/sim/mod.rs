//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - No wall-clock reads, no RNG
//! - Stable shrimp iteration order (by index, removals in reverse)
//! - No rendering or platform dependencies

pub mod animator;
pub mod collision;
pub mod rect;
pub mod state;
pub mod tick;

pub use animator::{AnimMode, Animator, Frame, FrameSet, DEFAULT_FRAME_DELAY};
pub use collision::{
    clamp_to_world, resolve, resolve_tiles, CollisionMap, WALL_ALL, WALL_BOTTOM, WALL_LEFT,
    WALL_RIGHT, WALL_TOP,
};
pub use rect::{Kinematics, Rect};
pub use state::{EntityKind, Exit, Facing, Player, Shrimp, Sprite, WallRule, World};
pub use tick::{tick, TickInput};
