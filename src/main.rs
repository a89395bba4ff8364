//! Murkpond entry point
//!
//! Headless demo run: generates a level from a seed, then drives the
//! fixed-timestep loop against the wall clock until the run ends or the
//! time budget is spent. A host with a real view would swap in its own
//! frame source, storage, and event sink.

use std::error::Error;
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use murkpond::consts::UPDATES_PER_SEC;
use murkpond::game::{EventSink, Game, GameEvent};
use murkpond::levelgen;
use murkpond::platform::{Clock, MemoryStorage, SystemClock};
use murkpond::scheduler::{FrameHandle, FrameSource, Scheduler};
use murkpond::sim::TickInput;

/// Demo run length in seconds.
const TIME_BUDGET: f64 = 30.0;

/// Frame "requests" are satisfied by the sleep in the main loop; the
/// source only hands out tokens.
#[derive(Default)]
struct SleepFrames {
    next: u64,
}

impl FrameSource for SleepFrames {
    fn request(&mut self) -> FrameHandle {
        self.next += 1;
        FrameHandle(self.next)
    }

    fn cancel(&mut self, handle: FrameHandle) {
        log::debug!("frame {} cancelled", handle.0);
    }
}

struct LoggingSink;

impl EventSink for LoggingSink {
    fn on_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::Finished => log::info!("event: level finished"),
            GameEvent::FinalFinished => log::info!("event: campaign finished"),
            GameEvent::GameOver => log::info!("event: game over"),
            GameEvent::ShrimpEaten => log::info!("event: shrimp eaten"),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0)
        });
    log::info!("Murkpond starting with seed {seed}");

    let level = levelgen::generate(15, 21, seed, "level.mp3")?;
    let mut game = Game::new(&level, MemoryStorage::new(), LoggingSink)?;

    let clock = SystemClock::new();
    let timestep = 1.0 / f64::from(UPDATES_PER_SEC);
    let mut sched = Scheduler::new(SleepFrames::default(), timestep);

    sched.start(clock.now());
    let deadline = clock.now() + TIME_BUDGET;

    // Hold right so the demo actually swims somewhere
    game.set_input(TickInput {
        right: true,
        ..Default::default()
    });

    while sched.is_running() {
        thread::sleep(Duration::from_millis(16));
        sched.on_frame(clock.now(), &mut game)?;

        if game.is_over() {
            sched.stop();
        } else if clock.now() >= deadline {
            log::info!("Time budget spent, stopping");
            sched.stop();
        }
    }

    let world = game.world();
    log::info!(
        "Run ended: finished={}, game_over={}, shrimp left={}",
        world.finished,
        world.game_over,
        world.shrimp.len()
    );
    Ok(())
}
