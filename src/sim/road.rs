//! The road: owner of every asset and the player
//!
//! All state that changes tick to tick lives here. Times are sim seconds since
//! the run started.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::asset::{Asset, AssetId, AssetKind, PowerKind, SpriteCatalog, SpriteId};
use super::collision::{CollisionOutcome, contact_threshold, find_contact};
use super::player::{Direction, Player};
use super::rules::DifficultyRules;
use super::track::TrackGeometry;
use crate::consts::ASSET_VELOCITY;
use crate::measure_sprite;
use crate::settings::{ConfigError, Settings};

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Running,
    /// Unprotected obstacle hit; no further ticks are processed
    GameOver,
}

/// Complete simulation state (deterministic for a given seed and input script)
#[derive(Debug, Clone)]
pub struct Road {
    seed: u64,
    rng: Pcg32,
    rules: DifficultyRules,
    track: TrackGeometry,
    catalog: SpriteCatalog,
    player: Player,
    /// Live assets, most advanced first after each spawn cycle
    assets: Vec<Asset>,
    phase: Phase,
    seconds_per_level: f64,
    bullet_speed: usize,
    bullet_cycle: usize,
    last_level_change: f64,
    last_spawn: Option<f64>,
    next_id: u32,
}

impl Road {
    /// Create a road at level 1, validating the settings first
    pub fn new(settings: &Settings, seed: u64, now: f64) -> Result<Self, ConfigError> {
        settings.validate()?;

        let rules = DifficultyRules::new(&settings.rules);
        let track = TrackGeometry::new(&rules, settings);
        let (car_width, _) = measure_sprite(&settings.player_sprite);

        Ok(Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            rules,
            track,
            catalog: SpriteCatalog::from_settings(settings),
            player: Player::new(car_width),
            assets: Vec::new(),
            phase: Phase::Running,
            seconds_per_level: settings.seconds_per_level,
            bullet_speed: settings.bullet_speed,
            bullet_cycle: settings.bullet_cycle,
            last_level_change: now,
            last_spawn: None,
            next_id: 1,
        })
    }

    // === Accessors ===

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn rules(&self) -> &DifficultyRules {
        &self.rules
    }

    pub fn track(&self) -> &TrackGeometry {
        &self.track
    }

    pub fn catalog(&self) -> &SpriteCatalog {
        &self.catalog
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn assets_in_lane(&self, lane: usize) -> impl Iterator<Item = &Asset> {
        self.assets.iter().filter(move |a| a.lane == lane)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn level(&self) -> u32 {
        self.rules.level()
    }

    /// Distance at which the nearest asset in the player's lane makes contact
    pub fn adjacency_threshold(&self) -> usize {
        contact_threshold(self.track.length(), self.player.reach())
    }

    /// Presentational score: elapsed seconds times lane count
    pub fn score(&self, elapsed: f64) -> u64 {
        (elapsed.max(0.0) * self.track.lane_count() as f64).round() as u64
    }

    /// (id, lane, distance) of every asset, for debugging
    pub fn asset_positions(&self) -> Vec<(AssetId, usize, usize)> {
        self.assets
            .iter()
            .map(|a| (a.id, a.lane, a.distance))
            .collect()
    }

    // === Level progression ===

    /// Advance difficulty once the level duration has elapsed
    pub fn try_level_up(&mut self, now: f64) -> bool {
        if now - self.last_level_change <= self.seconds_per_level {
            return false;
        }
        self.rules.advance();
        self.recompute_geometry();
        self.last_level_change = now;
        self.limit_assets();

        log::info!(
            "Level {}: lanes={}, max_assets={}, spawn every {:.2}s, frame {:.3}s",
            self.rules.level(),
            self.track.lane_count(),
            self.rules.max_assets(),
            self.rules.spawn_interval(),
            self.rules.frame_time().as_secs_f64(),
        );
        true
    }

    /// Re-derive the track from the current rules and pull entities onto it
    pub fn recompute_geometry(&mut self) {
        self.track.recompute(&self.rules);

        let last_lane = self.track.width() - 1;
        self.player.clamp_lane(self.track.width());
        for asset in &mut self.assets {
            asset.lane = asset.lane.min(last_lane);
        }
        self.cleanup_colliding_frames();
    }

    // === Spawning ===

    /// Spawn a batch of obstacles (and maybe a power-up) when due
    ///
    /// Returns the number of assets placed before cleanup.
    pub fn try_spawn(&mut self, now: f64) -> usize {
        let interval = self.rules.spawn_interval();
        let due = self.last_spawn.is_none_or(|last| now - last > interval);
        if !due || self.assets.len() >= self.rules.max_assets() {
            return 0;
        }

        let mut placed = self.spawn_obstacles(now);
        if self.spawn_power_up(now) {
            placed += 1;
        }
        self.cleanup_spawn_cycle();
        self.last_spawn = Some(now);

        log::debug!(
            "Spawned {} assets at {:.2}s ({} on track)",
            placed,
            now,
            self.assets.len()
        );
        placed
    }

    /// Place an asset directly (the spawn primitive)
    pub fn place_asset(&mut self, kind: AssetKind, lane: usize, distance: usize, now: f64) -> AssetId {
        let id = AssetId(self.next_id);
        self.next_id += 1;

        let footprint = self.catalog.sprite(kind).width;
        let lane = lane.min(self.track.width() - 1);
        let mut asset = Asset::new(id, kind, lane, footprint, now);
        asset.distance = distance;
        self.assets.push(asset);
        id
    }

    fn spawn_obstacles(&mut self, now: f64) -> usize {
        let width = self.track.width();
        let count = self.rng.random_range(0..width - 1);
        for _ in 0..count {
            let lane = self.rng.random_range(0..width);
            let sprite = SpriteId(self.rng.random_range(0..self.catalog.obstacle_count()));
            self.place_asset(AssetKind::Obstacle(sprite), lane, 0, now);
        }
        count
    }

    /// At most one power-up on the field at a time
    fn spawn_power_up(&mut self, now: f64) -> bool {
        if self.assets.iter().any(|a| !a.kind.is_obstacle()) {
            return false;
        }
        if !self.rng.random_bool(self.rules.powerup_probability()) {
            return false;
        }
        let power = PowerKind::ALL[self.rng.random_range(0..PowerKind::ALL.len())];
        let lane = self.rng.random_range(0..self.track.width());
        self.place_asset(AssetKind::PowerUp(power), lane, 0, now);
        log::debug!("Spawned {} power-up in lane {}", power.as_str(), lane);
        true
    }

    fn cleanup_spawn_cycle(&mut self) {
        self.order_assets();
        self.cleanup_colliding_frames();
        self.limit_assets();
    }

    /// Most advanced first
    fn order_assets(&mut self) {
        self.assets.sort_by(|a, b| b.distance.cmp(&a.distance));
    }

    /// Drop the most advanced assets beyond the cap
    fn limit_assets(&mut self) {
        let max = self.rules.max_assets();
        if self.assets.len() > max {
            self.order_assets();
            let excess = self.assets.len() - max;
            self.assets.drain(..excess);
        }
    }

    /// Within a lane, keep only the newest asset at any given distance
    fn cleanup_colliding_frames(&mut self) {
        let mut newest = std::collections::HashMap::new();
        for asset in &self.assets {
            newest
                .entry((asset.lane, asset.distance))
                .and_modify(|id: &mut AssetId| *id = (*id).max(asset.id))
                .or_insert(asset.id);
        }
        if newest.len() == self.assets.len() {
            return;
        }
        self.assets
            .retain(|a| newest.get(&(a.lane, a.distance)) == Some(&a.id));
    }

    // === Movement ===

    /// Move every asset one step, performing any due lane jumps first
    pub fn advance_all(&mut self, now: f64) {
        let interval = self.rules.lane_jump_interval();
        let width = self.track.width();

        for index in 0..self.assets.len() {
            if self.assets[index].jump_due(now, interval) {
                let step = if self.rng.random_bool(0.5) { -1 } else { 1 };
                let asset = &mut self.assets[index];
                let from = asset.lane;
                asset.lane_jump(step, width, now);
                let (to, id, footprint) = (asset.lane, asset.id, asset.footprint as isize);

                self.shift_lane(from, -footprint, Some(id));
                self.shift_lane(to, footprint, Some(id));
            }
            self.assets[index].advance(ASSET_VELOCITY);
        }

        self.cleanup_colliding_frames();
    }

    /// Remove assets that have passed the player and close the gaps they leave
    pub fn try_destroy(&mut self) -> usize {
        let bound = self.track.length();
        let (passed, kept): (Vec<Asset>, Vec<Asset>) = std::mem::take(&mut self.assets)
            .into_iter()
            .partition(|a| a.passed(bound));
        self.assets = kept;

        for asset in &passed {
            log::trace!("Asset {:?} left the track in lane {}", asset.id, asset.lane);
            self.shift_lane(asset.lane, -(asset.footprint as isize), None);
        }
        if !passed.is_empty() {
            self.cleanup_colliding_frames();
        }
        passed.len()
    }

    /// Move the player one lane; assets shift so their screen columns stay put
    pub fn apply_lane_change(&mut self, direction: Direction) -> bool {
        if self.is_over() {
            return false;
        }
        let previous = self.player.lane();
        self.player.move_lane(direction, self.track.width());
        let current = self.player.lane();
        if current == previous {
            return false;
        }

        let footprint = self.player.footprint() as isize;
        self.shift_lane(previous, -footprint, None);
        self.shift_lane(current, footprint, None);
        self.cleanup_colliding_frames();
        true
    }

    fn shift_lane(&mut self, lane: usize, delta: isize, except: Option<AssetId>) {
        for asset in self
            .assets
            .iter_mut()
            .filter(|a| a.lane == lane && Some(a.id) != except)
        {
            asset.shift(delta);
        }
    }

    // === Presentation state ===

    pub fn flip_divider(&mut self) {
        self.track.flip_divider();
    }

    pub fn update_player_sprite(&mut self) {
        self.player.update_sprite(self.bullet_speed, self.bullet_cycle);
    }

    // === Collisions ===

    /// Resolve contact between the player and the nearest asset in its lane
    pub fn check_collision(&mut self) -> CollisionOutcome {
        if self.is_over() {
            return CollisionOutcome::Clear;
        }
        let Some(index) = find_contact(&self.assets, self.player.lane(), self.adjacency_threshold())
        else {
            return CollisionOutcome::Clear;
        };
        let (id, kind) = (self.assets[index].id, self.assets[index].kind);

        match (kind, self.player.power()) {
            (AssetKind::Obstacle(_), None) => {
                self.phase = Phase::GameOver;
                log::info!(
                    "Hit {} in lane {} at level {}",
                    self.catalog.sprite(kind).name,
                    self.player.lane(),
                    self.rules.level()
                );
                CollisionOutcome::GameOver { obstacle: id }
            }
            (AssetKind::Obstacle(_), Some(power)) => {
                self.assets.remove(index);
                self.player.lose_power();
                log::info!("{} destroyed {}", power.as_str(), self.catalog.sprite(kind).name);
                CollisionOutcome::Absorbed {
                    obstacle: id,
                    power,
                }
            }
            (AssetKind::PowerUp(power), _) => {
                self.assets.remove(index);
                self.player.gain_power(power);
                log::info!("Picked up {}", power.as_str());
                CollisionOutcome::PowerGained {
                    power_up: id,
                    power,
                }
            }
        }
    }
}
