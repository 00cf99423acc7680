//! Text rendering module
//!
//! Composes the screen as tinted text lines. Terminal output lives in
//! `platform`.

pub mod frame;

pub use frame::{Frame, Hud, Line, Span, Tint, compose};
