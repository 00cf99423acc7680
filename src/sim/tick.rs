//! Single simulation tick
//!
//! Applies one input and runs the per-tick phases in a fixed order.

use super::collision::CollisionOutcome;
use super::player::Direction;
use super::road::Road;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// At most one lane change per tick
    pub direction: Option<Direction>,
}

/// Advance the road by one tick at sim time `now`
pub fn tick(road: &mut Road, input: &TickInput, now: f64) -> CollisionOutcome {
    if road.is_over() {
        return CollisionOutcome::Clear;
    }

    if let Some(direction) = input.direction {
        road.apply_lane_change(direction);
    }

    // Field bookkeeping
    road.try_level_up(now);
    road.try_spawn(now);
    road.try_destroy();

    // Motion and contact
    road.flip_divider();
    road.advance_all(now);
    road.update_player_sprite();
    road.check_collision()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::*;
    use crate::settings::{RuleTriple, Settings};
    use crate::sim::{AssetKind, Phase, SpriteId};

    const FRAME: f64 = 0.06;

    fn input_for(code: u8) -> TickInput {
        let direction = match code {
            1 => Some(Direction::Up),
            2 => Some(Direction::Down),
            _ => None,
        };
        TickInput { direction }
    }

    fn assert_invariants(road: &Road) -> Result<(), TestCaseError> {
        let mut frames = HashSet::new();
        for asset in road.assets() {
            prop_assert!(
                frames.insert((asset.lane, asset.distance)),
                "duplicate frame {:?}",
                (asset.lane, asset.distance)
            );
            prop_assert!(asset.lane < road.track().width());
        }
        prop_assert!(road.assets().len() <= road.rules().max_assets());
        prop_assert!(road.player().lane() < road.track().width());
        Ok(())
    }

    /// Settings whose spawner stays idle once one asset is on the track
    fn quiet_settings() -> Settings {
        let mut settings = Settings::default();
        settings.rules.max_assets = RuleTriple::new(1.0, 1.0, 0.0);
        settings
    }

    #[test]
    fn test_tick_advances_assets() {
        let mut road = Road::new(&quiet_settings(), 7, 0.0).unwrap();
        let id = road.place_asset(AssetKind::Obstacle(SpriteId(0)), 1, 0, 0.0);

        tick(&mut road, &TickInput::default(), 0.0);
        tick(&mut road, &TickInput::default(), FRAME);
        assert_eq!(road.assets().len(), 1);
        assert_eq!(road.assets()[0].id, id);
        assert_eq!(road.assets()[0].distance, 2);
    }

    #[test]
    fn test_tick_applies_one_lane_change() {
        let mut road = Road::new(&quiet_settings(), 7, 0.0).unwrap();
        tick(&mut road, &input_for(2), 0.0);
        assert_eq!(road.player().lane(), 1);
        tick(&mut road, &input_for(1), FRAME);
        tick(&mut road, &input_for(1), 2.0 * FRAME);
        assert_eq!(road.player().lane(), 3);
    }

    #[test]
    fn test_tick_stops_after_game_over() {
        let mut road = Road::new(&quiet_settings(), 7, 0.0).unwrap();
        let threshold = road.adjacency_threshold();
        road.place_asset(AssetKind::Obstacle(SpriteId(0)), 0, threshold - 1, 0.0);

        let outcome = tick(&mut road, &TickInput::default(), 0.0);
        assert!(outcome.is_game_over());
        assert_eq!(road.phase(), Phase::GameOver);

        let before = road.asset_positions();
        tick(&mut road, &input_for(2), FRAME);
        assert_eq!(road.asset_positions(), before);
        assert_eq!(road.player().lane(), 0);
    }

    #[test]
    fn test_determinism() {
        // Two roads with the same seed and inputs produce identical results
        let mut road1 = Road::new(&Settings::default(), 99999, 0.0).unwrap();
        let mut road2 = Road::new(&Settings::default(), 99999, 0.0).unwrap();

        for i in 0..2000u32 {
            let input = input_for((i % 7) as u8);
            let now = i as f64 * FRAME;
            let a = tick(&mut road1, &input, now);
            let b = tick(&mut road2, &input, now);
            assert_eq!(a, b);
        }

        assert_eq!(road1.asset_positions(), road2.asset_positions());
        assert_eq!(road1.player().lane(), road2.player().lane());
        assert_eq!(road1.level(), road2.level());
        assert_eq!(road1.phase(), road2.phase());
    }

    proptest! {
        #[test]
        fn prop_invariants_hold_every_tick(
            seed in any::<u64>(),
            script in prop::collection::vec(0u8..3, 1..600),
        ) {
            let mut road = Road::new(&Settings::default(), seed, 0.0).unwrap();
            for (i, code) in script.iter().enumerate() {
                // Compressed clock so levels and lane jumps both happen
                let now = i as f64 * 0.25;
                tick(&mut road, &input_for(*code), now);
                assert_invariants(&road)?;
                if road.is_over() {
                    break;
                }
            }
        }

        #[test]
        fn prop_lane_changes_stay_on_track(
            moves in prop::collection::vec(prop_oneof![Just(Direction::Up), Just(Direction::Down)], 0..100),
        ) {
            let mut road = Road::new(&Settings::default(), 1, 0.0).unwrap();
            for direction in moves {
                road.apply_lane_change(direction);
                prop_assert!(road.player().lane() < road.track().width());
            }
        }

        #[test]
        fn prop_level_up_at_most_once_per_window(
            start in 10.01f64..1000.0,
            gap in 0.0f64..9.9,
        ) {
            let mut road = Road::new(&Settings::default(), 1, 0.0).unwrap();
            let first = road.try_level_up(start);
            let second = road.try_level_up(start + gap);
            prop_assert!(first);
            prop_assert!(!second);
            prop_assert_eq!(road.level(), 2);
        }
    }
}
