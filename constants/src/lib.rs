//! Shared tuning values for the graveyard arcade game.
//!
//! Everything here is read-only configuration; runtime state lives in the
//! game crate.

pub mod assets;
pub mod debug;
pub mod gameplay;
pub mod light;
pub mod scene;
pub mod sound;
