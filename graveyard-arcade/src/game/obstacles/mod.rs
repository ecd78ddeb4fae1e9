//! Graves scattered over the field.
//!
//! Obstacles are plain data; the scene adapter attaches meshes to them.
//! Placement is either taken verbatim from the level or sampled at random
//! with a bounded number of attempts.

/// Obstacle lifecycle: staggered reveal, landing sounds, reset.
pub mod controller;

/// Grave variants and per-obstacle intro animation state.
pub mod obstacle;

/// Capped rejection sampling of free grid cells.
pub mod placement;
