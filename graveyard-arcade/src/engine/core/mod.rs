//! Core application setup and state management.
//!
//! Handles application lifecycle, window configuration, state transitions,
//! and the clamped per-frame clock for both native and WASM targets.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Creates the main app with scene, UI, debug and host bridge plugins.
pub mod app_setup;

/// Application state machine: loading, running, or failed.
pub mod app_state;

/// Clamped frame delta shared by every simulation system.
pub mod frame;

/// Platform-specific window configuration for native and WASM builds.
///
/// Configures canvas integration for web targets and vsync settings.
pub mod window_config;
