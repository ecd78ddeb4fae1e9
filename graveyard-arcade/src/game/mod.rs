//! The game itself: grid world, level data and the scene adapter around it.
//!
//! Everything below `field` is plain Rust and runs without a renderer. The
//! bevy side is limited to `main_scene` (event relays and frame stepping),
//! `render` (meshes attached to field entities) and `audio`.

/// Positional sound playback and global sound settings.
pub mod audio;

/// Candies and shields collected by the player.
pub mod consumables;

/// Typed UI and game event enums.
pub mod events;

/// Grid world state and per-frame simulation.
pub mod field;

/// Grid coordinates, directions and map layers.
pub mod grid;

/// Level catalog format and validation.
pub mod level;

/// Event relays between UI, field and the rest of the app.
pub mod main_scene;

pub mod obstacles;

/// Meshes and materials mirroring the field state.
pub mod render;

pub mod session;

use bevy::prelude::*;

use crate::engine::core::app_state::AppState;
use crate::engine::core::frame::{FrameClock, advance_frame_clock};
use crate::engine::loading::asset_loader::AssetsLoaded;
use audio::{PositionalSound, SoundSettings, play_positional_sounds};
use events::{GameEvent, UiEvent};
use field::GameField;
use main_scene::{after_assets_load, publish_field_events, relay_ui_events, update_field};
use render::{
    init_scene_palette, sync_consumable_views, sync_ground, sync_obstacle_views, sync_player_view,
};

/// Per-frame ordering of the running game.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameSet {
    /// Keyboard, pointer, buttons and debug keys raise events.
    Input,
    /// UI events reach the field.
    Relay,
    Simulate,
    /// Field events go out to the UI, debug menu, audio and host.
    Publish,
    Present,
}

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        add_simulation(app);

        app.add_systems(Startup, init_scene_palette).add_systems(
            Update,
            (
                sync_ground,
                sync_obstacle_views,
                sync_consumable_views,
                sync_player_view,
                play_positional_sounds,
            )
                .in_set(GameSet::Present),
        );
    }
}

/// Everything the field needs to run headless: events, set ordering and the relays.
pub fn add_simulation(app: &mut App) {
    app.add_event::<UiEvent>()
        .add_event::<GameEvent>()
        .add_event::<PositionalSound>()
        .add_event::<AssetsLoaded>()
        .init_resource::<SoundSettings>()
        .init_resource::<FrameClock>()
        .configure_sets(
            Update,
            (
                GameSet::Input,
                GameSet::Relay,
                GameSet::Simulate,
                GameSet::Publish,
                GameSet::Present,
            )
                .chain()
                .run_if(in_state(AppState::Running).and(resource_exists::<GameField>)),
        )
        .add_systems(OnEnter(AppState::Running), after_assets_load)
        .add_systems(
            Update,
            (
                relay_ui_events.in_set(GameSet::Relay),
                (advance_frame_clock, update_field)
                    .chain()
                    .in_set(GameSet::Simulate),
                publish_field_events.in_set(GameSet::Publish),
            ),
        );
}
