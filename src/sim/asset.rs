//! Moving entities: obstacles and power-ups

use serde::{Deserialize, Serialize};

use crate::measure_sprite;
use crate::settings::Settings;
use crate::wrap_lane;

/// Stable entity identifier (allocation order, so larger is newer)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssetId(pub u32);

/// Index into the obstacle catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpriteId(pub usize);

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerKind {
    /// Absorbs one obstacle hit
    Shield,
    /// Fires a bullet that destroys the first obstacle it reaches
    Weapon,
}

impl PowerKind {
    pub const ALL: [PowerKind; 2] = [PowerKind::Shield, PowerKind::Weapon];

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerKind::Shield => "shield",
            PowerKind::Weapon => "weapon",
        }
    }
}

/// What an asset is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetKind {
    Obstacle(SpriteId),
    PowerUp(PowerKind),
}

impl AssetKind {
    pub fn is_obstacle(&self) -> bool {
        matches!(self, AssetKind::Obstacle(_))
    }
}

/// A glyph with its measured footprint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub name: String,
    pub glyph: String,
    pub width: usize,
    pub height: usize,
}

impl Sprite {
    pub fn new(name: &str, glyph: &str) -> Self {
        let (width, height) = measure_sprite(glyph);
        Self {
            name: name.to_string(),
            glyph: glyph.to_string(),
            width,
            height,
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.glyph.lines()
    }
}

/// All asset sprites known to a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpriteCatalog {
    obstacles: Vec<Sprite>,
    shield: Sprite,
    weapon: Sprite,
    car: Sprite,
    bullet: char,
}

impl SpriteCatalog {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            obstacles: settings
                .obstacles
                .iter()
                .map(|def| Sprite::new(&def.name, &def.glyph))
                .collect(),
            shield: Sprite::new("shield", &settings.shield_sprite),
            weapon: Sprite::new("weapon", &settings.weapon_sprite),
            car: Sprite::new("car", &settings.player_sprite),
            bullet: settings.bullet,
        }
    }

    /// The player's car
    pub fn car(&self) -> &Sprite {
        &self.car
    }

    pub fn bullet(&self) -> char {
        self.bullet
    }

    pub fn obstacle_count(&self) -> usize {
        self.obstacles.len()
    }

    /// Sprite for an asset kind
    pub fn sprite(&self, kind: AssetKind) -> &Sprite {
        match kind {
            AssetKind::Obstacle(SpriteId(index)) => {
                &self.obstacles[index.min(self.obstacles.len() - 1)]
            }
            AssetKind::PowerUp(PowerKind::Shield) => &self.shield,
            AssetKind::PowerUp(PowerKind::Weapon) => &self.weapon,
        }
    }
}

/// An obstacle or power-up approaching the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    pub kind: AssetKind,
    /// Lane index in [0, track width)
    pub lane: usize,
    /// Distance travelled toward the player (0 = just entered)
    pub distance: usize,
    /// Rendered width, used when closing gaps and shifting neighbours
    pub footprint: usize,
    /// Sim time (seconds) of the last lane jump
    pub last_jump: f64,
}

impl Asset {
    pub fn new(id: AssetId, kind: AssetKind, lane: usize, footprint: usize, now: f64) -> Self {
        Self {
            id,
            kind,
            lane,
            distance: 0,
            footprint,
            last_jump: now,
        }
    }

    /// Move toward the player by `velocity`
    #[inline]
    pub fn advance(&mut self, velocity: usize) {
        self.distance += velocity;
    }

    /// Shift along the lane, saturating at the far end
    #[inline]
    pub fn shift(&mut self, delta: isize) {
        self.distance = self.distance.saturating_add_signed(delta);
    }

    /// True once the jump interval has elapsed
    pub fn jump_due(&self, now: f64, interval: f64) -> bool {
        now - self.last_jump > interval
    }

    /// Jump one lane up (`step < 0`) or down, wrapping at the edges
    pub fn lane_jump(&mut self, step: isize, width: usize, now: f64) {
        self.lane = wrap_lane(self.lane as isize + step.signum(), width);
        self.last_jump = now;
    }

    /// True once the asset has travelled past `bound`
    #[inline]
    pub fn passed(&self, bound: usize) -> bool {
        self.distance > bound
    }
}
