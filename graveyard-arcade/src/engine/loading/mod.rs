//! Asset loading for the level catalog and sound effects.
//!
//! Tracks each asset's load state, validates the level catalog before the
//! game sees it, and announces completion with a one-shot event.

/// Keyed asset registry and load-state polling.
pub mod asset_loader;

/// Loading progress tracking resource for state transitions.
pub mod progress;
