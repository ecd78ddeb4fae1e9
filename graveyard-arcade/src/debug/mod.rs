//! Developer overlay: FPS meter, obstacle position helpers and an axes helper.
//!
//! Toggled from the keyboard (`F`, `H`, `M`); start-up defaults come from
//! `constants::debug`.

pub mod debug_menu;

use bevy::prelude::*;

use crate::engine::core::app_state::AppState;
use crate::engine::systems::fps_tracking::{fps_notification_system, fps_text_update_system};
use crate::game::GameSet;
use debug_menu::{DebugMenu, apply_debug_events, handle_debug_keys, sync_position_helpers};

pub struct DebugPlugin;

impl Plugin for DebugPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DebugMenu>()
            .add_systems(Update, (fps_text_update_system, fps_notification_system))
            .add_systems(
                Update,
                (
                    handle_debug_keys.in_set(GameSet::Input),
                    (apply_debug_events, sync_position_helpers).in_set(GameSet::Present),
                )
                    .run_if(in_state(AppState::Running)),
            );
    }
}
