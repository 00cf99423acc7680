//! Game settings and difficulty defaults
//!
//! Built-in defaults, optionally overridden by a JSON file at startup.
//! Validated once before the game loop starts and never reloaded mid-run.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::measure_sprite;
use crate::sim::RuleKind;

/// Upper bounds accepted from a config file
const MAX_LANE_COUNT: f64 = 256.0;
const MAX_ASSETS: f64 = 512.0;
const MAX_TRACK_LENGTH: usize = 10_000;
const MAX_FRAME_TIME: f64 = 5.0;
const MAX_INTERVAL: f64 = 3600.0;

/// Startup configuration failures (all fatal)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("rule {rule} has a non-finite value")]
    NonFiniteRule { rule: &'static str },
    #[error("rule {rule} moves from {initial} to {target} but its increment is {increment}")]
    BadIncrement {
        rule: &'static str,
        initial: f64,
        target: f64,
        increment: f64,
    },
    #[error("rule {rule} must stay within {min}..={max} (got {value})")]
    RuleOutOfRange {
        rule: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("lane count must be at least 1")]
    ZeroLaneCount,
    #[error("track length must be at least 1")]
    ZeroTrackLength,
    #[error("bullet cycle must be at least 1")]
    ZeroBulletCycle,
    #[error("seconds per level must be positive (got {0})")]
    BadLevelDuration(f64),
    #[error("obstacle catalog is empty")]
    EmptyCatalog,
    #[error("sprite {0:?} has no visible glyph")]
    EmptySprite(String),
}

/// One rule slot: value starts at `initial` and steps by `increment` toward `target`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuleTriple {
    pub initial: f64,
    pub target: f64,
    pub increment: f64,
}

impl RuleTriple {
    pub const fn new(initial: f64, target: f64, increment: f64) -> Self {
        Self {
            initial,
            target,
            increment,
        }
    }
}

/// The six difficulty slots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleTable {
    pub lane_count: RuleTriple,
    /// Seconds between spawn batches
    pub spawn_interval: RuleTriple,
    pub max_assets: RuleTriple,
    /// Chance of a power-up per spawn batch (0.0 - 1.0)
    pub powerup_probability: RuleTriple,
    /// Seconds per tick
    pub frame_time: RuleTriple,
    /// Seconds between an asset's lane jumps
    pub lane_jump_interval: RuleTriple,
}

impl Default for RuleTable {
    fn default() -> Self {
        Self {
            lane_count: RuleTriple::new(2.0, 8.0, 1.0),
            spawn_interval: RuleTriple::new(2.0, 0.1, 0.1),
            max_assets: RuleTriple::new(2.0, 8.0, 1.0),
            powerup_probability: RuleTriple::new(0.01, 0.0001, 0.0001),
            frame_time: RuleTriple::new(0.060, 0.005, 0.005),
            lane_jump_interval: RuleTriple::new(5.0, 0.5, 0.5),
        }
    }
}

impl RuleTable {
    /// Triple for a slot
    pub fn get(&self, kind: RuleKind) -> RuleTriple {
        match kind {
            RuleKind::LaneCount => self.lane_count,
            RuleKind::SpawnInterval => self.spawn_interval,
            RuleKind::MaxAssets => self.max_assets,
            RuleKind::PowerUpProbability => self.powerup_probability,
            RuleKind::FrameTime => self.frame_time,
            RuleKind::LaneJumpInterval => self.lane_jump_interval,
        }
    }
}

/// A named obstacle glyph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteDef {
    pub name: String,
    pub glyph: String,
}

impl SpriteDef {
    pub fn new(name: &str, glyph: &str) -> Self {
        Self {
            name: name.to_string(),
            glyph: glyph.to_string(),
        }
    }
}

fn default_obstacles() -> Vec<SpriteDef> {
    vec![
        SpriteDef::new("suv", "[O-- O ----]"),
        SpriteDef::new("officer", "<o--o/-"),
        SpriteDef::new("sedan", "<o##o`"),
        SpriteDef::new("motorcycle", "O='`o"),
        SpriteDef::new("roadblock", "X+X+X+X+X"),
        SpriteDef::new("truck", ",_( \\_|"),
    ]
}

/// Game settings (defaults surface)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Run seed (random when absent)
    pub seed: Option<u64>,

    // === Track ===
    pub track_length: usize,
    pub seconds_per_level: f64,
    pub edge_char: char,
    pub divider_pattern: String,

    // === Difficulty ===
    pub rules: RuleTable,

    // === Sprites ===
    pub player_sprite: String,
    pub bullet: char,
    pub bullet_speed: usize,
    pub bullet_cycle: usize,
    pub obstacles: Vec<SpriteDef>,
    pub shield_sprite: String,
    pub weapon_sprite: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,

            track_length: TRACK_LENGTH,
            seconds_per_level: SECONDS_PER_LEVEL,
            edge_char: EDGE_CHAR,
            divider_pattern: DIVIDER_PATTERN.to_string(),

            rules: RuleTable::default(),

            player_sprite: PLAYER_CAR.to_string(),
            bullet: BULLET,
            bullet_speed: BULLET_SPEED,
            bullet_cycle: BULLET_CYCLE,
            obstacles: default_obstacles(),
            shield_sprite: "⍟".to_string(),
            weapon_sprite: "︻╦╤─".to_string(),
        }
    }
}

impl Settings {
    /// Load settings, overlaying an optional JSON file on the defaults
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let settings = match path {
            Some(path) => {
                let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                let settings: Settings =
                    serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
                        path: path.to_path_buf(),
                        source,
                    })?;
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Reject configurations the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        for kind in RuleKind::ALL {
            validate_triple(kind, self.rules.get(kind))?;
        }

        let lanes = self.rules.lane_count;
        if lanes.initial.round() < 1.0 || lanes.target.round() < 1.0 {
            return Err(ConfigError::ZeroLaneCount);
        }
        check_range(RuleKind::LaneCount, lanes, 0.0, MAX_LANE_COUNT)?;
        check_range(RuleKind::MaxAssets, self.rules.max_assets, 1.0, MAX_ASSETS)?;
        check_range(RuleKind::PowerUpProbability, self.rules.powerup_probability, 0.0, 1.0)?;
        check_range(RuleKind::SpawnInterval, self.rules.spawn_interval, 0.0, MAX_INTERVAL)?;
        check_range(RuleKind::LaneJumpInterval, self.rules.lane_jump_interval, 0.0, MAX_INTERVAL)?;
        let frame = self.rules.frame_time;
        if frame.initial <= 0.0 || frame.target <= 0.0 {
            return Err(ConfigError::RuleOutOfRange {
                rule: RuleKind::FrameTime.as_str(),
                min: f64::MIN_POSITIVE,
                max: MAX_FRAME_TIME,
                value: frame.initial.min(frame.target),
            });
        }
        check_range(RuleKind::FrameTime, frame, 0.0, MAX_FRAME_TIME)?;

        if self.track_length == 0 {
            return Err(ConfigError::ZeroTrackLength);
        }
        if self.track_length > MAX_TRACK_LENGTH {
            return Err(ConfigError::RuleOutOfRange {
                rule: "track_length",
                min: 1.0,
                max: MAX_TRACK_LENGTH as f64,
                value: self.track_length as f64,
            });
        }
        if self.bullet_cycle == 0 {
            return Err(ConfigError::ZeroBulletCycle);
        }
        if !(self.seconds_per_level.is_finite() && self.seconds_per_level > 0.0) {
            return Err(ConfigError::BadLevelDuration(self.seconds_per_level));
        }

        if self.obstacles.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        let named = self
            .obstacles
            .iter()
            .map(|s| (s.name.as_str(), s.glyph.as_str()))
            .chain([
                ("player", self.player_sprite.as_str()),
                ("shield", self.shield_sprite.as_str()),
                ("weapon", self.weapon_sprite.as_str()),
                ("divider", self.divider_pattern.as_str()),
            ]);
        for (name, glyph) in named {
            if measure_sprite(glyph).0 == 0 {
                return Err(ConfigError::EmptySprite(name.to_string()));
            }
        }

        Ok(())
    }
}

fn validate_triple(kind: RuleKind, triple: RuleTriple) -> Result<(), ConfigError> {
    let rule = kind.as_str();
    if !(triple.initial.is_finite() && triple.target.is_finite() && triple.increment.is_finite())
    {
        return Err(ConfigError::NonFiniteRule { rule });
    }
    let moves = triple.initial != triple.target;
    if triple.increment < 0.0 || (moves && triple.increment == 0.0) {
        return Err(ConfigError::BadIncrement {
            rule,
            initial: triple.initial,
            target: triple.target,
            increment: triple.increment,
        });
    }
    Ok(())
}

fn check_range(kind: RuleKind, triple: RuleTriple, min: f64, max: f64) -> Result<(), ConfigError> {
    for value in [triple.initial, triple.target] {
        if value < min || value > max {
            return Err(ConfigError::RuleOutOfRange {
                rule: kind.as_str(),
                min,
                max,
                value,
            });
        }
    }
    Ok(())
}
