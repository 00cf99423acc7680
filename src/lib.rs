//! Lane Runner - A terminal lane-dodging arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (rules, lanes, assets, collisions)
//! - `renderer`: Text frame composition
//! - `platform`: Terminal screen and keyboard input
//! - `settings`: Defaults surface and startup validation
//! - `game`: Fixed-cadence game loop

pub mod game;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use game::{Game, GameEnd};
pub use settings::{ConfigError, Settings};

/// Game configuration constants
pub mod consts {
    /// Span an asset traverses before it has passed the player
    pub const TRACK_LENGTH: usize = 100;
    /// Seconds between difficulty level changes
    pub const SECONDS_PER_LEVEL: f64 = 10.0;

    /// Distance an asset travels per tick
    pub const ASSET_VELOCITY: usize = 1;

    /// Bullet columns advanced per tick while armed
    pub const BULLET_SPEED: usize = 2;
    /// Bullet offset wraps back to the car after this many columns
    pub const BULLET_CYCLE: usize = 20;
    /// Width of the bullet glyph
    pub const BULLET_WIDTH: usize = 1;

    /// Track boundary character
    pub const EDGE_CHAR: char = '_';
    /// Mid-lane divider pattern (cycled across the track)
    pub const DIVIDER_PATTERN: &str = "- ";

    pub const PLAYER_CAR: &str = ".-'--`-._\n'-O---O--'";
    pub const BULLET: char = '>';
}

/// Measure a sprite as (widest line in chars, line count)
#[inline]
pub fn measure_sprite(glyph: &str) -> (usize, usize) {
    let width = glyph.lines().map(|l| l.chars().count()).max().unwrap_or(0);
    let height = glyph.lines().count().max(1);
    (width, height)
}

/// Wrap a signed lane index into [0, width)
#[inline]
pub fn wrap_lane(lane: isize, width: usize) -> usize {
    debug_assert!(width > 0);
    lane.rem_euclid(width as isize) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_player_car() {
        assert_eq!(measure_sprite(consts::PLAYER_CAR), (10, 2));
        assert_eq!(measure_sprite("<o##o`"), (6, 1));
    }

    #[test]
    fn test_wrap_lane() {
        assert_eq!(wrap_lane(-1, 4), 3);
        assert_eq!(wrap_lane(4, 4), 0);
        assert_eq!(wrap_lane(2, 4), 2);
    }
}
