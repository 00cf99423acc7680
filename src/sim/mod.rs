//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Sim time is passed in, never read from a clock
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod asset;
pub mod collision;
pub mod player;
pub mod road;
pub mod rules;
pub mod tick;
pub mod track;

pub use asset::{Asset, AssetId, AssetKind, PowerKind, Sprite, SpriteCatalog, SpriteId};
pub use collision::{CollisionOutcome, contact_threshold, find_contact, nearest_in_lane};
pub use player::{Direction, Player, SpriteState};
pub use road::{Phase, Road};
pub use rules::{DifficultyRules, RuleKind, RuleSlot};
pub use tick::{TickInput, tick};
pub use track::TrackGeometry;
