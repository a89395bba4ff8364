//! One fixed simulation step
//!
//! The controller layer snapshots its held keys into a `TickInput`, the
//! driver applies it and ticks the world. Everything in here is
//! deterministic and synchronous; a tick never blocks and never fails.

use super::collision;
use super::state::{WallRule, World};

/// Held-direction snapshot for one tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub left: bool,
    pub up: bool,
    pub right: bool,
    pub down: bool,
}

impl World {
    /// Turn held directions into steering impulses. Called once per tick,
    /// before `update`.
    pub fn apply_input(&mut self, input: &TickInput) {
        if input.left {
            self.player.swim_left();
        }
        if input.up {
            self.player.swim_up();
        }
        if input.right {
            self.player.swim_right();
        }
        if input.down {
            self.player.swim_down();
        }
    }

    /// Advance the simulation by exactly one fixed tick.
    ///
    /// Order matters and is part of the contract: integrate, exit check,
    /// wall resolution, player animation, shrimp pickup/animation in
    /// reverse index order, light decay.
    pub fn update(&mut self) {
        // 1. Integrate the player; the previous position recorded here
        //    feeds the resolver's swept checks.
        self.player.kin.integrate(&mut self.player.rect);

        // 2. Exit overlap. The exit is static, so a plain AABB test is
        //    enough. Terminal once set.
        if self.exit.rect.overlaps(&self.player.rect) {
            self.finished = true;
        }

        // 3. Walls. The boundary clamp always applies; what a tile-wall
        //    hit means depends on the policy.
        match self.wall_rule {
            WallRule::Fatal | WallRule::Harmless => {
                let hit = collision::resolve(
                    &mut self.player.rect,
                    &mut self.player.kin,
                    &self.collision,
                    self.tile_size,
                    self.width,
                    self.height,
                );
                if hit && self.wall_rule == WallRule::Fatal {
                    self.game_over = true;
                }
            }
            WallRule::Ghost => {
                collision::clamp_to_world(
                    &mut self.player.rect,
                    &mut self.player.kin,
                    self.width,
                    self.height,
                );
            }
        }

        // 4. Player animation follows the post-collision velocity.
        self.player.update_animation();

        // 5. Shrimp. Reverse index order makes in-place removal safe.
        let mut ate = false;
        for i in (0..self.shrimp.len()).rev() {
            if self.shrimp[i].rect.overlaps(&self.player.rect) {
                self.light_radius = self.light_radius_max;
                self.shrimp.remove(i);
                self.shrimp_eaten = true;
                ate = true;
            } else {
                self.shrimp[i].animator.advance();
            }
        }

        // 6. Light decay, skipped on a pickup tick so the reset lands at
        //    exactly the cap.
        if !ate {
            self.decay_light();
        }
    }
}

/// Apply input and advance one tick.
pub fn tick(world: &mut World, input: &TickInput) {
    world.apply_input(input);
    world.update();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::VEL_MAX;
    use crate::level::sample_level;
    use glam::Vec2;
    use proptest::prelude::*;

    fn world() -> World {
        World::new(&sample_level()).unwrap()
    }

    #[test]
    fn test_pickup_removes_shrimp_and_resets_light() {
        let mut w = world();
        // Shrimp occupies (21, 5)..(27, 11); park the player on top of it
        w.player.rect.pos = Vec2::new(18.0, 4.0);
        w.light_radius = 1.0;
        w.light_radius_min = 0.5;

        w.update();

        assert!(w.shrimp.is_empty());
        assert!(w.shrimp_eaten);
        assert_eq!(w.light_radius, w.light_radius_max);
    }

    #[test]
    fn test_shrimp_eaten_is_one_shot_not_auto_reset() {
        let mut w = world();
        w.player.rect.pos = Vec2::new(18.0, 4.0);
        w.update();
        assert!(w.shrimp_eaten);

        // The world never clears it; that is the caller's job
        w.update();
        assert!(w.shrimp_eaten);
    }

    #[test]
    fn test_light_decays_without_pickup() {
        let mut w = world();
        w.shrimp.clear();
        w.light_radius = 100.0;
        w.light_radius_max = 100.0;
        w.light_radius_min = 10.0;

        w.update();
        assert!((w.light_radius - 99.9).abs() < 1e-3);
    }

    #[test]
    fn test_finish_is_sticky() {
        let mut w = world();
        // Flush contact with the exit at x = 32 counts as overlap
        w.player.rect.pos = Vec2::new(20.0, 18.0);

        w.update();
        assert!(w.finished);

        // Even after swimming away the run stays finished
        w.player.rect.pos = Vec2::new(2.0, 4.0);
        w.update();
        assert!(w.finished);
    }

    #[test]
    fn test_fatal_wall_sets_game_over() {
        let mut w = world();
        // Tile (1, 1) has a left wall at x = 16; cross it in one tick
        w.player.rect.pos = Vec2::new(1.0, 20.0);
        w.player.kin.vel = Vec2::new(10.0, 0.0);

        w.update();

        assert!(w.game_over);
        assert!((w.player.rect.right() - 15.99).abs() < 1e-3);
        assert_eq!(w.player.kin.vel.x, 0.0);
    }

    #[test]
    fn test_harmless_wall_corrects_without_game_over() {
        let mut w = world();
        w.wall_rule = WallRule::Harmless;
        w.player.rect.pos = Vec2::new(1.0, 20.0);
        w.player.kin.vel = Vec2::new(10.0, 0.0);

        w.update();

        assert!(!w.game_over);
        assert!((w.player.rect.right() - 15.99).abs() < 1e-3);
        assert_eq!(w.player.kin.vel.x, 0.0);
    }

    #[test]
    fn test_ghost_skips_tile_correction_but_still_clamps() {
        let mut w = world();
        w.wall_rule = WallRule::Ghost;
        w.player.rect.pos = Vec2::new(1.0, 20.0);
        w.player.kin.vel = Vec2::new(10.0, 0.0);

        w.update();

        assert!(!w.game_over);
        // Sailed straight through the wall plane at 16
        assert!(w.player.rect.right() > 16.0);

        // The boundary clamp still applies in ghost mode
        w.player.rect.pos = Vec2::new(-5.0, 20.0);
        w.update();
        assert!(w.player.rect.left() >= 0.0);
    }

    #[test]
    fn test_input_steers_and_turns() {
        let mut w = world();
        let input = TickInput {
            left: true,
            ..Default::default()
        };
        tick(&mut w, &input);
        assert!(w.player.kin.vel.x < 0.0);
        assert_eq!(w.player.facing, crate::sim::state::Facing::Left);
    }

    proptest! {
        #[test]
        fn prop_player_stays_inside_world(
            inputs in proptest::collection::vec(
                (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()),
                1..200,
            )
        ) {
            let mut w = world();
            for (left, up, right, down) in inputs {
                tick(&mut w, &TickInput { left, up, right, down });
                prop_assert!(w.player.rect.left() >= 0.0);
                prop_assert!(w.player.rect.top() >= 0.0);
                prop_assert!(w.player.rect.right() <= w.width);
                prop_assert!(w.player.rect.bottom() <= w.height);
                prop_assert!(w.player.kin.vel.x.abs() <= VEL_MAX);
                prop_assert!(w.player.kin.vel.y.abs() <= VEL_MAX);
            }
        }

        #[test]
        fn prop_light_monotone_without_pickups(ticks in 1usize..500) {
            let mut w = world();
            w.shrimp.clear();
            w.light_radius = 200.0;
            w.light_radius_max = 200.0;
            w.light_radius_min = 10.0;

            let mut prev = w.light_radius;
            for _ in 0..ticks {
                w.update();
                prop_assert!(w.light_radius <= prev);
                prop_assert!(w.light_radius >= w.light_radius_min);
                prev = w.light_radius;
            }
        }
    }
}
