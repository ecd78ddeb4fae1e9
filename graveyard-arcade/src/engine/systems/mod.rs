//! Runtime diagnostics systems.

/// FPS tracking for the debug overlay and the host page.
///
/// Sends frame rate updates to the host via RPC and updates the on-screen meter.
pub mod fps_tracking;
