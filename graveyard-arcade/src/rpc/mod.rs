//! JSON-RPC 2.0 bridge to an embedding web page.
//!
//! When the game runs inside an iframe, the host page can drive it and listen
//! to it via `postMessage`:
//!
//! ```text
//! Host page (parent window)  <──postMessage──>  Game (iframe)
//!        │                                        │
//!        ├─ Request (with ID) ──────────────────> │
//!        │ <───────────────── Response (with ID) ─┤
//!        │ <────────── Notification (no ID) ──────┤
//! ```
//!
//! ## Requests
//! - `start_game`, `restart_game`: same as pressing the UI buttons
//! - `set_sound_enabled { enabled }`: toggle all sound
//! - `get_state`: phase, level, score, lives, round
//! - `get_fps`: smoothed frame rate
//!
//! ## Notifications
//! `score_changed`, `lives_changed`, `round_changed`, `consumable_collected`,
//! `gameplay_started`, `game_over`, `fps_update`.
//!
//! Errors use the standard codes: `-32600` invalid request, `-32601` method
//! not found, `-32602` invalid params, `-32603` internal error.

/// Message queueing, request handling and `postMessage` plumbing.
pub mod web_rpc;
