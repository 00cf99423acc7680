//! The player's car

use serde::{Deserialize, Serialize};

use super::asset::PowerKind;
use crate::consts::BULLET_WIDTH;
use crate::wrap_lane;

/// Lane change request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    #[inline]
    pub fn step(self) -> isize {
        match self {
            Direction::Up => -1,
            Direction::Down => 1,
        }
    }
}

/// What the car looks like this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpriteState {
    Plain,
    /// Shield flashes: highlighted on alternate ticks
    Shielded { lit: bool },
    /// Bullet drawn `weapon_offset` columns ahead of the car
    Armed,
}

/// Player state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    lane: usize,
    power: Option<PowerKind>,
    weapon_offset: usize,
    sprite: SpriteState,
    /// Rendered car width
    footprint: usize,
}

impl Player {
    pub fn new(footprint: usize) -> Self {
        Self {
            lane: 0,
            power: None,
            weapon_offset: 0,
            sprite: SpriteState::Plain,
            footprint,
        }
    }

    pub fn lane(&self) -> usize {
        self.lane
    }

    pub fn power(&self) -> Option<PowerKind> {
        self.power
    }

    pub fn weapon_offset(&self) -> usize {
        self.weapon_offset
    }

    pub fn sprite(&self) -> SpriteState {
        self.sprite
    }

    pub fn footprint(&self) -> usize {
        self.footprint
    }

    /// How far ahead of the car a hit registers (the bullet tip when armed)
    pub fn reach(&self) -> usize {
        match self.power {
            Some(PowerKind::Weapon) => self.weapon_offset + BULLET_WIDTH,
            _ => 0,
        }
    }

    /// Move one lane, wrapping at the track edges
    pub fn move_lane(&mut self, direction: Direction, width: usize) {
        self.lane = wrap_lane(self.lane as isize + direction.step(), width);
    }

    /// Pull the car back onto the track after it narrows
    pub fn clamp_lane(&mut self, width: usize) {
        self.lane = self.lane.min(width.saturating_sub(1));
    }

    /// Advance the per-tick sprite animation
    pub fn update_sprite(&mut self, bullet_speed: usize, bullet_cycle: usize) {
        self.sprite = match (self.power, self.sprite) {
            (None, _) => SpriteState::Plain,
            (Some(PowerKind::Shield), SpriteState::Shielded { lit }) => {
                SpriteState::Shielded { lit: !lit }
            }
            (Some(PowerKind::Shield), _) => SpriteState::Shielded { lit: true },
            (Some(PowerKind::Weapon), SpriteState::Armed) => {
                self.weapon_offset = (self.weapon_offset + bullet_speed) % bullet_cycle.max(1);
                SpriteState::Armed
            }
            // First armed tick: bullet appears at the car's nose
            (Some(PowerKind::Weapon), _) => SpriteState::Armed,
        };
    }

    pub fn gain_power(&mut self, kind: PowerKind) {
        self.power = Some(kind);
        self.weapon_offset = 0;
    }

    pub fn lose_power(&mut self) {
        self.power = None;
        self.weapon_offset = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_lane_wraps() {
        let mut player = Player::new(10);
        player.move_lane(Direction::Up, 4);
        assert_eq!(player.lane(), 3);
        player.move_lane(Direction::Down, 4);
        assert_eq!(player.lane(), 0);
        player.move_lane(Direction::Down, 4);
        assert_eq!(player.lane(), 1);
    }

    #[test]
    fn test_shield_flashes() {
        let mut player = Player::new(10);
        player.gain_power(PowerKind::Shield);

        player.update_sprite(2, 20);
        assert_eq!(player.sprite(), SpriteState::Shielded { lit: true });
        player.update_sprite(2, 20);
        assert_eq!(player.sprite(), SpriteState::Shielded { lit: false });
        player.update_sprite(2, 20);
        assert_eq!(player.sprite(), SpriteState::Shielded { lit: true });
        assert_eq!(player.reach(), 0);
    }

    #[test]
    fn test_bullet_cycles() {
        let mut player = Player::new(10);
        player.gain_power(PowerKind::Weapon);

        player.update_sprite(2, 20);
        assert_eq!(player.sprite(), SpriteState::Armed);
        assert_eq!(player.weapon_offset(), 0);
        assert_eq!(player.reach(), 1);

        let offsets: Vec<usize> = (0..11)
            .map(|_| {
                player.update_sprite(2, 20);
                player.weapon_offset()
            })
            .collect();
        assert_eq!(offsets, vec![2, 4, 6, 8, 10, 12, 14, 16, 18, 0, 2]);
    }

    #[test]
    fn test_losing_power_resets_sprite() {
        let mut player = Player::new(10);
        player.gain_power(PowerKind::Weapon);
        player.update_sprite(2, 20);
        player.update_sprite(2, 20);
        assert_eq!(player.weapon_offset(), 2);

        player.lose_power();
        assert_eq!(player.power(), None);
        assert_eq!(player.weapon_offset(), 0);
        player.update_sprite(2, 20);
        assert_eq!(player.sprite(), SpriteState::Plain);
    }
}
