//! Typed event surfaces between the UI layer and the game field.
//!
//! The UI only produces [`UiEvent`]s and the field only produces
//! [`GameEvent`]s; `main_scene` is the single place that routes one to the other.

use bevy::prelude::*;

use crate::game::consumables::ConsumableType;
use crate::game::grid::{Direction, GridPosition};

/// Semantic input raised by buttons, keyboard and the pointer overlay.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum UiEvent {
    StartGame,
    RestartGame,
    Direction(Direction),
    /// Pointer position in stage units.
    PointerMove { x: f32, y: f32 },
    PointerDown,
    PointerUp,
    /// Sound settings were changed from the UI.
    SoundChanged,
}

/// Notifications raised by the game field.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// A level was (re)built and is waiting for its intro.
    LevelReady { level: usize },
    FpsMeterChanged,
    SoundsEnabledChanged,
    GameOver,
    ScoreChanged(u32),
    ConsumableCollected {
        kind: ConsumableType,
        position: GridPosition,
    },
    GameplayStarted,
    RoundChanged(u32),
    ButtonPressed,
    StopBooster,
    StartInvulnerabilityBooster { duration: f32 },
    LivesChanged(u32),
}
