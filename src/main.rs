//! Lane Runner entry point
//!
//! Loads settings, takes over the terminal and runs the game loop.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;

use lane_runner::platform::{TerminalScreen, input_channel, spawn_key_listener};
use lane_runner::sim::Road;
use lane_runner::{Game, GameEnd, Settings};

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(GameEnd::Quit { .. }) => ExitCode::SUCCESS,
        Ok(GameEnd::GameOver { .. }) => ExitCode::from(1),
        Err(e) => {
            eprintln!("lane-runner: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn run() -> anyhow::Result<GameEnd> {
    let config = std::env::args_os().nth(1).map(PathBuf::from);
    let settings = Settings::load(config.as_deref()).context("Failed to load settings")?;

    let seed = settings.seed.unwrap_or_else(rand::random);
    log::info!("Lane Runner starting (seed {seed})");
    let road = Road::new(&settings, seed, 0.0).context("Invalid settings")?;

    let (sender, receiver) = input_channel();
    let screen = TerminalScreen::enter().context("Failed to set up terminal")?;
    spawn_key_listener(sender).context("Failed to start key listener")?;

    Ok(Game::new(road, screen, receiver).run())
}
