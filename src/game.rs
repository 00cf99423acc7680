//! Fixed-cadence game loop
//!
//! Drives the road one tick at a time from wall-clock time, feeds it the
//! latest input and hands composed frames to a sink.

use std::io;
use std::thread;
use std::time::Instant;

use crate::platform::{InputReceiver, InputSignal};
use crate::renderer::{Frame, Hud, compose};
use crate::sim::{Road, TickInput, tick};

/// Where frames and the final message go
pub trait FrameSink {
    fn present(&mut self, frame: &Frame) -> io::Result<()>;

    /// Leave game mode and print a closing message
    fn announce(&mut self, message: &str) -> io::Result<()>;
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEnd {
    Quit { score: u64, level: u32 },
    GameOver { score: u64, level: u32 },
}

impl GameEnd {
    pub fn score(&self) -> u64 {
        match self {
            GameEnd::Quit { score, .. } | GameEnd::GameOver { score, .. } => *score,
        }
    }

    pub fn level(&self) -> u32 {
        match self {
            GameEnd::Quit { level, .. } | GameEnd::GameOver { level, .. } => *level,
        }
    }

    /// Closing message shown after the terminal is restored
    pub fn message(&self) -> String {
        let headline = match self {
            GameEnd::Quit { .. } => "***EXITING GAME***",
            GameEnd::GameOver { .. } => "GAME OVER",
        };
        format!(
            "{headline}\nSCORE: {}    LEVEL: {}",
            self.score(),
            self.level()
        )
    }
}

/// A running game
pub struct Game<S: FrameSink> {
    road: Road,
    sink: S,
    input: InputReceiver,
    started: Instant,
}

impl<S: FrameSink> Game<S> {
    pub fn new(road: Road, sink: S, input: InputReceiver) -> Self {
        Self {
            road,
            sink,
            input,
            started: Instant::now(),
        }
    }

    pub fn road(&self) -> &Road {
        &self.road
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn hud(&self, now: f64) -> Hud {
        Hud {
            score: self.road.score(now),
            level: self.road.level(),
        }
    }

    /// Run one tick at `now` seconds since start
    ///
    /// Returns how the run ended, or `None` while it continues.
    pub fn step(&mut self, now: f64, signal: Option<InputSignal>) -> Option<GameEnd> {
        let hud = self.hud(now);
        if signal == Some(InputSignal::Quit) {
            return Some(GameEnd::Quit {
                score: hud.score,
                level: hud.level,
            });
        }

        let input = TickInput {
            direction: signal.and_then(InputSignal::direction),
        };
        let outcome = tick(&mut self.road, &input, now);
        let hud = self.hud(now);
        if outcome.is_game_over() {
            return Some(GameEnd::GameOver {
                score: hud.score,
                level: hud.level,
            });
        }

        let frame = compose(&self.road, &hud);
        if let Err(e) = self.sink.present(&frame) {
            log::warn!("Failed to draw frame: {e}");
        }
        None
    }

    /// Tick until the player quits or crashes
    pub fn run(mut self) -> GameEnd {
        log::info!("Run started with seed {}", self.road.seed());
        let end = loop {
            let now = self.started.elapsed().as_secs_f64();
            let signal = self.input.take_latest();
            if let Some(end) = self.step(now, signal) {
                break end;
            }
            thread::sleep(self.road.rules().frame_time());
        };

        log::info!(
            "Run ended: {:?} (score {}, level {})",
            end,
            end.score(),
            end.level()
        );
        if let Err(e) = self.sink.announce(&end.message()) {
            log::warn!("Failed to print closing message: {e}");
        }
        end
    }
}
