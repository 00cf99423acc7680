//! Difficulty progression
//!
//! Six rule slots, each stepping from `initial` toward `target` once per level.
//! A slot's direction is fixed by comparing `initial` and `target`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::settings::{RuleTable, RuleTriple};

/// The tunable difficulty parameters, in table order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleKind {
    LaneCount,
    SpawnInterval,
    MaxAssets,
    PowerUpProbability,
    FrameTime,
    LaneJumpInterval,
}

impl RuleKind {
    pub const ALL: [RuleKind; 6] = [
        RuleKind::LaneCount,
        RuleKind::SpawnInterval,
        RuleKind::MaxAssets,
        RuleKind::PowerUpProbability,
        RuleKind::FrameTime,
        RuleKind::LaneJumpInterval,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::LaneCount => "lane_count",
            RuleKind::SpawnInterval => "spawn_interval",
            RuleKind::MaxAssets => "max_assets",
            RuleKind::PowerUpProbability => "powerup_probability",
            RuleKind::FrameTime => "frame_time",
            RuleKind::LaneJumpInterval => "lane_jump_interval",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// A rule triple plus its current value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuleSlot {
    pub triple: RuleTriple,
    pub current: f64,
}

impl RuleSlot {
    pub fn new(triple: RuleTriple) -> Self {
        Self {
            triple,
            current: triple.initial,
        }
    }

    /// True when the slot grows toward its target
    #[inline]
    pub fn rising(&self) -> bool {
        self.triple.initial < self.triple.target
    }

    pub fn at_target(&self) -> bool {
        if self.rising() {
            self.current >= self.triple.target
        } else {
            self.current <= self.triple.target
        }
    }

    /// Step one increment toward the target, clamped at the target
    pub fn advance(&mut self) {
        if self.at_target() {
            return;
        }
        let RuleTriple {
            target, increment, ..
        } = self.triple;
        self.current = if self.rising() {
            (self.current + increment).min(target)
        } else {
            (self.current - increment).max(target)
        };
    }
}

/// Level-scoped difficulty values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DifficultyRules {
    slots: [RuleSlot; 6],
    level: u32,
}

impl DifficultyRules {
    /// Rules at level 1 (every slot at its initial value)
    pub fn new(table: &RuleTable) -> Self {
        Self {
            slots: RuleKind::ALL.map(|kind| RuleSlot::new(table.get(kind))),
            level: 1,
        }
    }

    /// Move every slot one step toward its target and bump the level
    pub fn advance(&mut self) {
        for slot in &mut self.slots {
            slot.advance();
        }
        self.level += 1;
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn slot(&self, kind: RuleKind) -> &RuleSlot {
        &self.slots[kind.index()]
    }

    pub fn value(&self, kind: RuleKind) -> f64 {
        self.slot(kind).current
    }

    pub fn lane_count(&self) -> usize {
        (self.value(RuleKind::LaneCount).round() as usize).max(1)
    }

    /// Seconds between spawn batches
    pub fn spawn_interval(&self) -> f64 {
        self.value(RuleKind::SpawnInterval)
    }

    pub fn max_assets(&self) -> usize {
        (self.value(RuleKind::MaxAssets).round() as usize).max(1)
    }

    pub fn powerup_probability(&self) -> f64 {
        self.value(RuleKind::PowerUpProbability).clamp(0.0, 1.0)
    }

    pub fn frame_time(&self) -> Duration {
        Duration::from_secs_f64(self.value(RuleKind::FrameTime).max(0.0))
    }

    /// Seconds between an asset's lane jumps
    pub fn lane_jump_interval(&self) -> f64 {
        self.value(RuleKind::LaneJumpInterval)
    }
}
