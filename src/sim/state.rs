//! World state and entity types
//!
//! The `World` owns every entity, the collision map, and the light radius
//! for one run of a level. It is built once from validated level data when
//! the level loads and discarded on reload; nothing outside the world holds
//! game state.
//!
//! Entities are plain composition: a `Rect`, a `Kinematics` component where
//! the entity moves, and an `Animator` where it is drawn animated.

use glam::Vec2;

use crate::consts::*;
use crate::level::{LevelData, LevelError};

use super::animator::{AnimMode, Animator, DEFAULT_FRAME_DELAY, Frame, FrameSet};
use super::collision::CollisionMap;
use super::rect::{Kinematics, Rect};

/// What an entity is, with its capability flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Player,
    Shrimp,
    Exit,
}

impl EntityKind {
    pub fn movable(self) -> bool {
        matches!(self, EntityKind::Player)
    }

    pub fn animated(self) -> bool {
        matches!(self, EntityKind::Player | EntityKind::Shrimp)
    }

    pub fn collidable(self) -> bool {
        true
    }
}

/// Last horizontal direction the player steered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

/// How tile-wall contact affects the run. The world-boundary clamp is not
/// governed by this; it always applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WallRule {
    /// Touching a wall ends the run
    #[default]
    Fatal,
    /// Walls push the player back but the run continues (tutorial mercy)
    Harmless,
    /// Tile walls are ignored entirely
    Ghost,
}

/// The player's frame sets, one per behavior/direction combination.
#[derive(Debug, Clone)]
pub struct PlayerFrameSets {
    pub idle_left: FrameSet,
    pub swim_left: FrameSet,
    pub idle_right: FrameSet,
    pub swim_right: FrameSet,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub rect: Rect,
    pub kin: Kinematics,
    pub facing: Facing,
    pub frame_sets: PlayerFrameSets,
    pub animator: Animator,
}

impl Player {
    pub fn new(rect: Rect, frame_sets: PlayerFrameSets) -> Self {
        let animator = Animator::new(
            frame_sets.idle_right.clone(),
            DEFAULT_FRAME_DELAY,
            AnimMode::Hold,
        );
        Self {
            rect,
            kin: Kinematics::new(rect.pos, VEL_MAX, FRICTION),
            facing: Facing::Right,
            frame_sets,
            animator,
        }
    }

    /// Steering impulses, applied by the caller once per held direction
    /// before the world ticks. Horizontal steering also turns the sprite.
    pub fn swim_left(&mut self) {
        self.kin.vel.x -= STEER_IMPULSE;
        self.facing = Facing::Left;
    }

    pub fn swim_up(&mut self) {
        self.kin.vel.y -= STEER_IMPULSE;
    }

    pub fn swim_right(&mut self) {
        self.kin.vel.x += STEER_IMPULSE;
        self.facing = Facing::Right;
    }

    pub fn swim_down(&mut self) {
        self.kin.vel.y += STEER_IMPULSE;
    }

    /// Whether either velocity axis is above the idle threshold.
    pub fn is_moving(&self) -> bool {
        self.kin.vel.x.abs() > IDLE_THRESHOLD || self.kin.vel.y.abs() > IDLE_THRESHOLD
    }

    /// Pick the frame set matching the current behavior and advance it one
    /// tick. Re-selecting the active set is a no-op inside the animator, so
    /// a held key does not restart the swim cycle.
    pub fn update_animation(&mut self) {
        if self.is_moving() {
            let set = match self.facing {
                Facing::Left => &self.frame_sets.swim_left,
                Facing::Right => &self.frame_sets.swim_right,
            };
            self.animator
                .change_frame_set(set, AnimMode::Loop, SWIM_FRAME_DELAY, 0);
        } else {
            let set = match self.facing {
                Facing::Left => &self.frame_sets.idle_left,
                Facing::Right => &self.frame_sets.idle_right,
            };
            self.animator
                .change_frame_set(set, AnimMode::Hold, DEFAULT_FRAME_DELAY, 0);
        }

        self.animator.advance();
    }
}

#[derive(Debug, Clone)]
pub struct Shrimp {
    pub rect: Rect,
    pub animator: Animator,
}

impl Shrimp {
    pub fn new(rect: Rect, squirm: FrameSet) -> Self {
        Self {
            rect,
            animator: Animator::new(squirm, SQUIRM_FRAME_DELAY, AnimMode::Loop),
        }
    }
}

/// Static collidable marker; overlapping it finishes the level.
#[derive(Debug, Clone, Copy)]
pub struct Exit {
    pub rect: Rect,
}

/// One renderable entity for the (external) drawing layer.
#[derive(Debug, Clone, Copy)]
pub struct Sprite {
    pub kind: EntityKind,
    pub rect: Rect,
    pub frame: Frame,
}

/// The simulation world for one level run.
#[derive(Debug, Clone)]
pub struct World {
    pub tile_size: f32,
    pub width: f32,
    pub height: f32,
    pub collision: CollisionMap,
    /// Tileset indices per tile, passed through to the drawing layer
    pub graphical: Vec<Vec<[u16; 2]>>,

    pub player: Player,
    pub shrimp: Vec<Shrimp>,
    pub exit: Exit,

    pub light_radius: f32,
    pub light_radius_max: f32,
    pub light_radius_min: f32,
    pub light_decay: f32,

    /// Terminal: the player reached the exit. Never unset.
    pub finished: bool,
    /// Terminal: the player touched a wall under `WallRule::Fatal`.
    pub game_over: bool,
    /// One-shot pickup signal; the world only ever sets it, the caller
    /// tracks what it has already handled.
    pub shrimp_eaten: bool,

    pub wall_rule: WallRule,
}

impl World {
    /// Build a world from level data. Validation failures are construction
    /// errors; nothing inside the tick path can fail after this.
    pub fn new(level: &LevelData) -> Result<Self, LevelError> {
        level.validate()?;

        let tile_size = level.tile_size();
        let width = level.world_width();
        let height = level.world_height();

        let player_size = level.tileset.size.player;
        let shrimp_size = level.tileset.size.shrimp;

        let frame_sets = PlayerFrameSets {
            idle_left: level.player_frames("idle-left")?,
            swim_left: level.player_frames("swim-left")?,
            idle_right: level.player_frames("idle-right")?,
            swim_right: level.player_frames("swim-right")?,
        };

        let start = level.tilemap.start_tile;
        let player_rect = rect_centered_in_tile(
            start.row,
            start.col,
            player_size.width as f32,
            player_size.height as f32,
            tile_size,
        );
        let player = Player::new(player_rect, frame_sets);

        let squirm = level.shrimp_frames("squirm")?;
        let shrimp = level
            .tilemap
            .shrimp_pos
            .iter()
            .map(|&[row, col]| {
                let rect = rect_centered_in_tile(
                    row,
                    col,
                    shrimp_size.width as f32,
                    shrimp_size.height as f32,
                    tile_size,
                );
                Shrimp::new(rect, squirm.clone())
            })
            .collect();

        let exit_tile = level.tilemap.exit_tile;
        let exit = Exit {
            rect: Rect::new(
                exit_tile.col as f32 * tile_size,
                exit_tile.row as f32 * tile_size,
                tile_size,
                tile_size,
            ),
        };

        let light_radius_max = width.min(height) * LIGHT_MAX_FRACTION;
        let light_radius_min =
            (player_size.width as f32).max(player_size.height as f32) * LIGHT_MIN_FACTOR;

        log::info!(
            "world ready: {}x{} tiles, {} shrimp, light {:.1}..{:.1}",
            level.tilemap.size.cols,
            level.tilemap.size.rows,
            level.tilemap.shrimp_pos.len(),
            light_radius_min,
            light_radius_max,
        );

        Ok(Self {
            tile_size,
            width,
            height,
            collision: CollisionMap::from_rows(&level.tilemap.collision),
            graphical: level.tilemap.graphical.clone(),
            player,
            shrimp,
            exit,
            light_radius: light_radius_max,
            light_radius_max,
            light_radius_min,
            light_decay: LIGHT_DECAY,
            finished: false,
            game_over: false,
            shrimp_eaten: false,
            wall_rule: WallRule::Fatal,
        })
    }

    /// Whether the run has ended; callers stop ticking once true.
    pub fn is_over(&self) -> bool {
        self.finished || self.game_over
    }

    /// Shrink the light, never below the floor. The pickup path resets it
    /// to the cap.
    pub(crate) fn decay_light(&mut self) {
        self.light_radius = (self.light_radius * self.light_decay).max(self.light_radius_min);
    }

    /// Light mask parameters for the drawing layer: center and radius.
    pub fn light(&self) -> (Vec2, f32) {
        (self.player.rect.center(), self.light_radius)
    }

    /// Renderable entities in draw order (player above shrimp).
    pub fn sprites(&self) -> Vec<Sprite> {
        let mut sprites: Vec<Sprite> = self
            .shrimp
            .iter()
            .map(|s| Sprite {
                kind: EntityKind::Shrimp,
                rect: s.rect,
                frame: *s.animator.frame(),
            })
            .collect();
        sprites.push(Sprite {
            kind: EntityKind::Player,
            rect: self.player.rect,
            frame: *self.player.animator.frame(),
        });
        sprites
    }
}

/// Origin that centers a `width` x `height` box inside the given tile.
fn rect_centered_in_tile(row: usize, col: usize, width: f32, height: f32, tile_size: f32) -> Rect {
    let center_x = tile_size * (col as f32 + 0.5);
    let center_y = tile_size * (row as f32 + 0.5);
    Rect::new(center_x - width * 0.5, center_y - height * 0.5, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::sample_level;

    #[test]
    fn test_world_construction_places_entities() {
        let world = World::new(&sample_level()).unwrap();

        // Player centered in start tile (0, 0): tile center (8, 8), sprite 12x8
        assert_eq!(world.player.rect.pos, Vec2::new(2.0, 4.0));
        assert_eq!(world.player.facing, Facing::Right);

        // One shrimp centered in tile (0, 1)
        assert_eq!(world.shrimp.len(), 1);
        assert_eq!(world.shrimp[0].rect.center(), Vec2::new(24.0, 8.0));

        // Exit fills tile (1, 2), flush outside the right edge
        assert_eq!(world.exit.rect.pos, Vec2::new(32.0, 16.0));
        assert_eq!(world.exit.rect.size, Vec2::new(16.0, 16.0));
    }

    #[test]
    fn test_ragged_collision_grid_rejected() {
        let mut level = sample_level();
        level.tilemap.collision[1].pop();
        assert!(matches!(
            World::new(&level),
            Err(LevelError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_light_configuration() {
        let world = World::new(&sample_level()).unwrap();

        // World is 32x32; max = 32 * 0.4, min = 12 * 1.3
        assert!((world.light_radius_max - 12.8).abs() < 1e-5);
        assert!((world.light_radius_min - 15.6).abs() < 1e-5);
        assert_eq!(world.light_radius, world.light_radius_max);
    }

    #[test]
    fn test_decay_light_clamps_to_floor() {
        let mut world = World::new(&sample_level()).unwrap();
        world.light_radius_min = 5.0;
        world.light_radius = 5.0005;

        world.decay_light();
        assert!(world.light_radius >= 5.0);

        world.decay_light();
        assert_eq!(world.light_radius, 5.0);
    }

    #[test]
    fn test_invalid_level_rejected_at_construction() {
        let mut level = sample_level();
        level.tileset.frame_sets.shrimp.clear();
        assert!(World::new(&level).is_err());
    }

    #[test]
    fn test_entity_kind_capabilities() {
        assert!(EntityKind::Player.movable());
        assert!(!EntityKind::Shrimp.movable());
        assert!(EntityKind::Shrimp.animated());
        assert!(!EntityKind::Exit.animated());
        assert!(EntityKind::Exit.collidable());
    }

    #[test]
    fn test_sprites_expose_player_and_shrimp() {
        let world = World::new(&sample_level()).unwrap();
        let sprites = world.sprites();
        assert_eq!(sprites.len(), 2);
        assert_eq!(sprites.last().unwrap().kind, EntityKind::Player);
    }
}
