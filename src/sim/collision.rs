//! Tile-grid collision map and resolver
//!
//! Walls live on tile edges: each tile carries a 4-bit code saying which of
//! its edges are solid. The resolver works per corner of the moving
//! rectangle with swept plane tests - a wall only fires when the matching
//! edge crossed its plane between the previous tick and this one, so a
//! rectangle resting exactly on a plane does not re-trigger and a fast
//! entity cannot slip to the far side of a thin wall unnoticed.
//!
//! Evaluation order is fixed and observable: corners top-left, top-right,
//! bottom-left, bottom-right; within a tile, walls in bit order top, right,
//! bottom, left. Every active check runs (no short-circuiting) and the
//! result is the OR-reduction of all of them; each corner's tile lookup is
//! recomputed from the rectangle as corrected by the checks before it.

use super::rect::{Kinematics, Rect};

/// Wall-mask bits, one per tile edge.
pub const WALL_TOP: u8 = 1;
pub const WALL_RIGHT: u8 = 2;
pub const WALL_BOTTOM: u8 = 4;
pub const WALL_LEFT: u8 = 8;

/// Highest meaningful tile code (all four edges solid).
pub const WALL_ALL: u8 = 15;

/// Pulled-back snap distance for top/left-facing planes. Snapping exactly
/// onto the plane would satisfy the strict `>` penetration test again on
/// the very next identical check.
const SNAP_EPSILON: f32 = 0.01;

/// Immutable per-level grid of tile wall codes.
#[derive(Debug, Clone)]
pub struct CollisionMap {
    codes: Vec<u8>,
    rows: usize,
    cols: usize,
}

impl CollisionMap {
    /// Build from row-major nested rows. Rows must be equally sized and
    /// non-empty; `World::new` runs level validation before construction.
    pub(crate) fn from_rows(grid: &[Vec<u8>]) -> Self {
        let rows = grid.len();
        let cols = grid.first().map_or(0, Vec::len);
        debug_assert!(rows > 0 && cols > 0);
        debug_assert!(grid.iter().all(|r| r.len() == cols));

        let codes = grid.iter().flatten().copied().collect();
        Self { codes, rows, cols }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Tile code at (row, col); `None` outside the grid. Out-of-grid and
    /// out-of-range codes both resolve as "no walls" downstream.
    #[inline]
    pub fn code(&self, row: usize, col: usize) -> Option<u8> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(self.codes[row * self.cols + col])
    }
}

/// Resolve a moving rectangle against the world boundary and the tile grid.
///
/// Mutates position and velocity in place. Returns whether any tile wall
/// fired; the boundary clamp does not count as a collision.
pub fn resolve(
    rect: &mut Rect,
    kin: &mut Kinematics,
    map: &CollisionMap,
    tile_size: f32,
    world_width: f32,
    world_height: f32,
) -> bool {
    clamp_to_world(rect, kin, world_width, world_height);
    resolve_tiles(rect, kin, map, tile_size)
}

/// Keep the rectangle inside `[0, width] x [0, height]`, zeroing the
/// velocity axis that pushed it out. Always applied, independent of any
/// wall-leniency policy.
pub fn clamp_to_world(rect: &mut Rect, kin: &mut Kinematics, width: f32, height: f32) {
    if rect.left() < 0.0 {
        rect.pos.x = 0.0;
        kin.vel.x = 0.0;
    } else if rect.right() > width {
        rect.pos.x = width - rect.size.x;
        kin.vel.x = 0.0;
    }

    if rect.top() < 0.0 {
        rect.pos.y = 0.0;
        kin.vel.y = 0.0;
    } else if rect.bottom() > height {
        rect.pos.y = height - rect.size.y;
        kin.vel.y = 0.0;
    }
}

/// Run the per-corner tile wall checks. See the module docs for the
/// evaluation order contract.
pub fn resolve_tiles(
    rect: &mut Rect,
    kin: &mut Kinematics,
    map: &CollisionMap,
    tile_size: f32,
) -> bool {
    let mut collided = false;

    // Corner coordinates are recomputed before each check because an
    // earlier correction shifts the later corners.
    collided |= resolve_corner(rect, kin, map, tile_size, rect.top(), rect.left());
    collided |= resolve_corner(rect, kin, map, tile_size, rect.top(), rect.right());
    collided |= resolve_corner(rect, kin, map, tile_size, rect.bottom(), rect.left());
    collided |= resolve_corner(rect, kin, map, tile_size, rect.bottom(), rect.right());

    collided
}

fn resolve_corner(
    rect: &mut Rect,
    kin: &mut Kinematics,
    map: &CollisionMap,
    tile_size: f32,
    y: f32,
    x: f32,
) -> bool {
    if x < 0.0 || y < 0.0 {
        return false;
    }
    let row = (y / tile_size).floor() as usize;
    let col = (x / tile_size).floor() as usize;

    let Some(code) = map.code(row, col) else {
        return false;
    };
    // Fail-safe: unknown codes behave like open water. The level loader has
    // already warned about them.
    if code == 0 || code > WALL_ALL {
        return false;
    }

    let tile_x = col as f32 * tile_size;
    let tile_y = row as f32 * tile_size;

    let mut hit = false;
    if code & WALL_TOP != 0 {
        hit |= check_top(rect, kin, tile_y);
    }
    if code & WALL_RIGHT != 0 {
        hit |= check_right(rect, kin, tile_x + tile_size);
    }
    if code & WALL_BOTTOM != 0 {
        hit |= check_bottom(rect, kin, tile_y + tile_size);
    }
    if code & WALL_LEFT != 0 {
        hit |= check_left(rect, kin, tile_x);
    }
    hit
}

/// Solid top edge: stops a rectangle whose bottom crossed the plane from
/// above since last tick.
fn check_top(rect: &mut Rect, kin: &mut Kinematics, plane: f32) -> bool {
    if rect.bottom() > plane && kin.bottom_old(rect) <= plane {
        rect.pos.y = plane - SNAP_EPSILON - rect.size.y;
        kin.vel.y = 0.0;
        return true;
    }
    false
}

/// Solid right edge: stops a rectangle whose left crossed the plane from
/// the right since last tick.
fn check_right(rect: &mut Rect, kin: &mut Kinematics, plane: f32) -> bool {
    if rect.left() < plane && kin.left_old() >= plane {
        rect.pos.x = plane;
        kin.vel.x = 0.0;
        return true;
    }
    false
}

/// Solid bottom edge: stops a rectangle whose top crossed the plane from
/// below since last tick.
fn check_bottom(rect: &mut Rect, kin: &mut Kinematics, plane: f32) -> bool {
    if rect.top() < plane && kin.top_old() >= plane {
        rect.pos.y = plane;
        kin.vel.y = 0.0;
        return true;
    }
    false
}

/// Solid left edge: stops a rectangle whose right crossed the plane from
/// the left since last tick.
fn check_left(rect: &mut Rect, kin: &mut Kinematics, plane: f32) -> bool {
    if rect.right() > plane && kin.right_old(rect) <= plane {
        rect.pos.x = plane - SNAP_EPSILON - rect.size.x;
        kin.vel.x = 0.0;
        return true;
    }
    false
}
