//! Game driver
//!
//! Wires the pieces together: holds the world, feeds it held-key input
//! from the host, watches for win/loss/pickup after every frame, and
//! persists campaign progress. Outcomes are reported through an injected
//! [`EventSink`] so the host decides what a finished level looks like
//! (modal, log line, next scene).

use thiserror::Error;

use crate::consts::FINAL_LEVEL;
use crate::level::{LevelData, LevelError};
use crate::platform::Storage;
use crate::scheduler::TickHooks;
use crate::settings::Settings;
use crate::sim::{tick, TickInput, World};

/// Outcomes the driver reports to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Level cleared; progress has been persisted
    Finished,
    /// Last level of the campaign cleared
    FinalFinished,
    /// Player touched a wall
    GameOver,
    /// Player ate a shrimp this tick
    ShrimpEaten,
}

/// Receiver for [`GameEvent`]s.
pub trait EventSink {
    fn on_event(&mut self, event: GameEvent);
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error("level rejected: {0}")]
    Level(#[from] LevelError),
}

/// Owns the world and the run's progress for one level attempt.
pub struct Game<S: Storage, E: EventSink> {
    world: World,
    input: TickInput,
    settings: Settings,
    storage: S,
    events: E,
    over_reported: bool,
}

impl<S: Storage, E: EventSink> Game<S, E> {
    /// Build a game for one level. Settings are loaded from `storage`;
    /// the level data is validated before the world is built.
    pub fn new(level: &LevelData, storage: S, events: E) -> Result<Self, GameError> {
        let settings = Settings::load(&storage);
        let world = World::new(level)?;
        log::info!("Starting level {}", settings.level);
        Ok(Self {
            world,
            input: TickInput::default(),
            settings,
            storage,
            events,
            over_reported: false,
        })
    }

    /// Replace the held-direction snapshot used by subsequent ticks.
    pub fn set_input(&mut self, input: TickInput) {
        self.input = input;
    }

    /// True once a terminal outcome has been reported.
    pub fn is_over(&self) -> bool {
        self.over_reported
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn events(&self) -> &E {
        &self.events
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

impl<S: Storage, E: EventSink> TickHooks for Game<S, E> {
    type Error = GameError;

    fn update(&mut self) -> Result<(), GameError> {
        tick(&mut self.world, &self.input);
        Ok(())
    }

    fn render(&mut self) -> Result<(), GameError> {
        let (center, radius) = self.world.light();
        log::trace!(
            "frame: {} sprites, light {:.1} @ ({:.1}, {:.1})",
            self.world.sprites().len(),
            radius,
            center.x,
            center.y,
        );
        Ok(())
    }

    fn after_tick(&mut self) -> Result<(), GameError> {
        // Pickup flag is sticky in the world; clearing it here makes the
        // event edge-triggered.
        if self.world.shrimp_eaten {
            self.world.shrimp_eaten = false;
            self.events.on_event(GameEvent::ShrimpEaten);
        }

        if self.over_reported {
            return Ok(());
        }

        // Finish wins over game over when both land on the same tick
        if self.world.finished {
            self.over_reported = true;
            if self.settings.level >= FINAL_LEVEL {
                log::info!("Campaign finished");
                self.events.on_event(GameEvent::FinalFinished);
            } else {
                self.settings.level += 1;
                self.settings.save(&mut self.storage);
                log::info!("Level finished, advancing to {}", self.settings.level);
                self.events.on_event(GameEvent::Finished);
            }
        } else if self.world.game_over {
            self.over_reported = true;
            log::info!("Game over");
            self.events.on_event(GameEvent::GameOver);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::sample_level;
    use crate::platform::MemoryStorage;

    #[derive(Default)]
    struct RecordingSink {
        events: Vec<GameEvent>,
    }

    impl EventSink for RecordingSink {
        fn on_event(&mut self, event: GameEvent) {
            self.events.push(event);
        }
    }

    fn game_at_level(level: u32) -> Game<MemoryStorage, RecordingSink> {
        let mut storage = MemoryStorage::new();
        Settings {
            level,
            muted: false,
        }
        .save(&mut storage);
        Game::new(&sample_level(), storage, RecordingSink::default()).unwrap()
    }

    #[test]
    fn test_finish_persists_next_level() {
        let mut game = game_at_level(2);
        game.world_mut().finished = true;

        game.after_tick().unwrap();

        assert!(game.is_over());
        assert_eq!(game.events().events, vec![GameEvent::Finished]);
        assert_eq!(Settings::load(game.storage()).level, 3);
    }

    #[test]
    fn test_final_level_reports_campaign_finished() {
        let mut game = game_at_level(FINAL_LEVEL);
        game.world_mut().finished = true;

        game.after_tick().unwrap();

        assert_eq!(game.events().events, vec![GameEvent::FinalFinished]);
        // No advancement past the last level
        assert_eq!(Settings::load(game.storage()).level, FINAL_LEVEL);
    }

    #[test]
    fn test_game_over_reported_once() {
        let mut game = game_at_level(1);
        game.world_mut().game_over = true;

        game.after_tick().unwrap();
        game.after_tick().unwrap();

        assert_eq!(game.events().events, vec![GameEvent::GameOver]);
    }

    #[test]
    fn test_shrimp_eaten_is_edge_triggered() {
        let mut game = game_at_level(1);
        game.world_mut().shrimp_eaten = true;

        game.after_tick().unwrap();
        game.after_tick().unwrap();

        assert_eq!(game.events().events, vec![GameEvent::ShrimpEaten]);
        assert!(!game.world().shrimp_eaten);
    }

    #[test]
    fn test_update_applies_held_input() {
        let mut game = game_at_level(1);
        game.set_input(TickInput {
            right: true,
            ..Default::default()
        });

        game.update().unwrap();

        assert!(game.world().player.kin.vel.x > 0.0);
    }

    #[test]
    fn test_finish_beats_game_over_on_same_tick() {
        let mut game = game_at_level(1);
        game.world_mut().finished = true;
        game.world_mut().game_over = true;

        game.after_tick().unwrap();

        assert_eq!(game.events().events, vec![GameEvent::Finished]);
    }
}
