//! Lane-based contact detection
//!
//! A hit is purely numeric: the nearest asset in the player's lane touches the
//! car (or the bullet tip) once its approach distance reaches the contact
//! threshold.

use serde::{Deserialize, Serialize};

use super::asset::{Asset, AssetId, PowerKind};

/// Result of a collision check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionOutcome {
    /// Nothing touching the player
    Clear,
    /// Obstacle destroyed, active power spent
    Absorbed { obstacle: AssetId, power: PowerKind },
    /// Power-up picked up
    PowerGained { power_up: AssetId, power: PowerKind },
    /// Unprotected obstacle hit (terminal)
    GameOver { obstacle: AssetId },
}

impl CollisionOutcome {
    pub fn is_game_over(&self) -> bool {
        matches!(self, CollisionOutcome::GameOver { .. })
    }
}

/// Distance at which an asset touches something `reach` columns ahead of the car
#[inline]
pub fn contact_threshold(track_length: usize, reach: usize) -> usize {
    track_length.saturating_sub(reach)
}

/// Index of the asset closest to the player in `lane`
pub fn nearest_in_lane(assets: &[Asset], lane: usize) -> Option<usize> {
    assets
        .iter()
        .enumerate()
        .filter(|(_, a)| a.lane == lane)
        .max_by_key(|(_, a)| (a.distance, a.id))
        .map(|(index, _)| index)
}

/// Index of the asset in contact with the player, if any
pub fn find_contact(assets: &[Asset], lane: usize, threshold: usize) -> Option<usize> {
    nearest_in_lane(assets, lane).filter(|&index| assets[index].distance >= threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::asset::{AssetKind, SpriteId};

    fn obstacle(id: u32, lane: usize, distance: usize) -> Asset {
        let mut asset = Asset::new(AssetId(id), AssetKind::Obstacle(SpriteId(0)), lane, 6, 0.0);
        asset.distance = distance;
        asset
    }

    #[test]
    fn test_threshold() {
        assert_eq!(contact_threshold(100, 0), 100);
        assert_eq!(contact_threshold(100, 9), 91);
        assert_eq!(contact_threshold(5, 9), 0);
    }

    #[test]
    fn test_nearest_ignores_other_lanes() {
        let assets = vec![obstacle(1, 0, 90), obstacle(2, 1, 40), obstacle(3, 1, 70)];
        assert_eq!(nearest_in_lane(&assets, 1), Some(2));
        assert_eq!(nearest_in_lane(&assets, 0), Some(0));
        assert_eq!(nearest_in_lane(&assets, 3), None);
    }

    #[test]
    fn test_contact_requires_threshold() {
        let assets = vec![obstacle(1, 2, 99), obstacle(2, 0, 100)];
        assert_eq!(find_contact(&assets, 2, 100), None);
        assert_eq!(find_contact(&assets, 2, 99), Some(0));
        assert_eq!(find_contact(&assets, 0, 100), Some(1));
    }

    #[test]
    fn test_overshoot_still_counts() {
        let assets = vec![obstacle(1, 0, 108)];
        assert_eq!(find_contact(&assets, 0, 100), Some(0));
    }
}
