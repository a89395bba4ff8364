//! Axis-aligned rectangle and kinematics primitives
//!
//! Every spatial decision in the simulation is made in terms of `Rect`
//! edges, so the accessors here are the single source of truth for what
//! "left" or "bottom" means. Edges are pure derived values; callers that
//! need to move a rectangle mutate its origin directly.

use glam::Vec2;

/// An axis-aligned rectangle with a mutable origin and a fixed size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Top-left corner
    pub pos: Vec2,
    /// Width/height; positive and fixed for the entity's lifetime
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        debug_assert!(width > 0.0 && height > 0.0);
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Rectangle overlap test. Touching edges count as overlap: an exit
    /// rect may sit flush against the right world edge, where the boundary
    /// clamp holds the player at exactly `right == world_width`.
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(other.left() > self.right()
            || other.top() > self.bottom()
            || other.right() < self.left()
            || other.bottom() < self.top())
    }
}

/// Kinematic state for movable entities.
///
/// The previous-tick position is recorded at the start of every integration
/// step; the collision resolver compares it against the current position to
/// tell which side of a wall plane the entity came from.
#[derive(Debug, Clone, Copy)]
pub struct Kinematics {
    pub vel: Vec2,
    /// Origin at the start of the current tick
    pub pos_old: Vec2,
    /// Per-axis cap on |vel|
    pub vel_max: f32,
    /// Multiplicative velocity decay per tick
    pub friction: f32,
}

impl Kinematics {
    pub fn new(pos: Vec2, vel_max: f32, friction: f32) -> Self {
        Self {
            vel: Vec2::ZERO,
            pos_old: pos,
            vel_max,
            friction,
        }
    }

    /// Advance the rectangle one tick: decay velocity, clamp it per axis,
    /// integrate the origin. Records the previous origin for the swept
    /// collision checks.
    pub fn integrate(&mut self, rect: &mut Rect) {
        self.pos_old = rect.pos;

        self.vel *= self.friction;
        self.vel = self.vel.clamp(
            Vec2::splat(-self.vel_max),
            Vec2::splat(self.vel_max),
        );

        rect.pos += self.vel;
    }

    /// Edges of the rectangle as of the previous tick.
    #[inline]
    pub fn left_old(&self) -> f32 {
        self.pos_old.x
    }

    #[inline]
    pub fn top_old(&self) -> f32 {
        self.pos_old.y
    }

    #[inline]
    pub fn right_old(&self, rect: &Rect) -> f32 {
        self.pos_old.x + rect.size.x
    }

    #[inline]
    pub fn bottom_old(&self, rect: &Rect) -> f32 {
        self.pos_old.y + rect.size.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_edges() {
        let r = Rect::new(10.0, 20.0, 4.0, 6.0);
        assert_eq!(r.left(), 10.0);
        assert_eq!(r.top(), 20.0);
        assert_eq!(r.right(), 14.0);
        assert_eq!(r.bottom(), 26.0);
        assert_eq!(r.center(), Vec2::new(12.0, 23.0));
    }

    #[test]
    fn test_overlap_touching_counts() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));

        let c = Rect::new(10.01, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_overlap_disjoint_vertical() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(0.0, 11.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_integrate_applies_friction_and_clamp() {
        let mut rect = Rect::new(0.0, 0.0, 4.0, 4.0);
        let mut kin = Kinematics::new(rect.pos, 15.0, 0.9);
        kin.vel = Vec2::new(100.0, -100.0);

        kin.integrate(&mut rect);

        // 100 * 0.9 = 90, clamped to ±15
        assert_eq!(kin.vel, Vec2::new(15.0, -15.0));
        assert_eq!(rect.pos, Vec2::new(15.0, -15.0));
        assert_eq!(kin.pos_old, Vec2::ZERO);
    }

    #[test]
    fn test_old_edges_track_previous_tick() {
        let mut rect = Rect::new(8.0, 8.0, 4.0, 4.0);
        let mut kin = Kinematics::new(rect.pos, 15.0, 1.0);
        kin.vel = Vec2::new(2.0, 0.0);

        kin.integrate(&mut rect);

        assert_eq!(kin.left_old(), 8.0);
        assert_eq!(kin.right_old(&rect), 12.0);
        assert_eq!(rect.right(), 14.0);
    }
}
