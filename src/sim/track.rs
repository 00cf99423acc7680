//! Track geometry derived from the current rules

use serde::{Deserialize, Serialize};

use super::rules::DifficultyRules;
use crate::settings::Settings;

/// Lane layout and boundary markers
///
/// Each logical lane is split in two so a divider can be drawn between the
/// halves, hence `width = 2 * lane_count`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackGeometry {
    lane_count: usize,
    width: usize,
    length: usize,
    edge_char: char,
    divider_pattern: String,
    /// Divider orientation, flipped every tick for a scrolling effect
    divider_flipped: bool,
}

impl TrackGeometry {
    pub fn new(rules: &DifficultyRules, settings: &Settings) -> Self {
        let mut track = Self {
            lane_count: 0,
            width: 0,
            length: settings.track_length,
            edge_char: settings.edge_char,
            divider_pattern: settings.divider_pattern.clone(),
            divider_flipped: false,
        };
        track.recompute(rules);
        track
    }

    /// Re-derive lane-dependent values after the rules advance
    pub fn recompute(&mut self, rules: &DifficultyRules) {
        self.lane_count = rules.lane_count();
        self.width = self.lane_count * 2;
    }

    pub fn lane_count(&self) -> usize {
        self.lane_count
    }

    /// Number of lanes an entity can occupy
    pub fn width(&self) -> usize {
        self.width
    }

    /// Distance an asset covers before it has passed the player
    pub fn length(&self) -> usize {
        self.length
    }

    pub fn flip_divider(&mut self) {
        self.divider_flipped = !self.divider_flipped;
    }

    /// Top/bottom boundary line
    pub fn barrier(&self) -> String {
        std::iter::repeat_n(self.edge_char, self.length).collect()
    }

    /// Mid-lane divider in its current orientation
    pub fn divider(&self) -> String {
        let line: String = self.divider_pattern.chars().cycle().take(self.length).collect();
        if self.divider_flipped {
            line.chars().rev().collect()
        } else {
            line
        }
    }
}
