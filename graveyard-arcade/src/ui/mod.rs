//! 2D overlay: buttons, HUD, loading screen and pointer/keyboard input.
//!
//! The UI never touches the field directly. It raises [`UiEvent`]s and redraws
//! itself from [`GameEvent`]s and the field's phase.
//!
//! [`UiEvent`]: crate::game::events::UiEvent
//! [`GameEvent`]: crate::game::events::GameEvent

pub mod buttons;
pub mod hud;
pub mod input;
pub mod loading;

/// Full-viewport pointer target and cursor affordance.
pub mod overlay;

use bevy::prelude::*;

use crate::engine::core::app_state::AppState;
use crate::game::GameSet;
use buttons::{handle_button_presses, update_button_visibility, update_sound_label};
use hud::{HudState, apply_hud_events, render_hud};
use input::keyboard_input;
use loading::{hide_loading_overlay, show_loading_overlay, update_loading_text};
use overlay::{CursorAffordance, apply_cursor_icon, cursor_from_game_events, overlay_pointer_input};

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HudState>()
            .init_resource::<CursorAffordance>()
            .add_systems(Update, (update_loading_text, hide_loading_overlay))
            .add_systems(OnEnter(AppState::LoadFailed), show_loading_overlay)
            .add_systems(
                Update,
                (
                    (keyboard_input, overlay_pointer_input, handle_button_presses)
                        .in_set(GameSet::Input),
                    (
                        apply_hud_events,
                        render_hud,
                        cursor_from_game_events,
                        apply_cursor_icon,
                        update_button_visibility,
                        update_sound_label,
                    )
                        .chain()
                        .in_set(GameSet::Present),
                ),
            );
    }
}

/// Spawn every UI node; visibility is driven by the systems above.
pub fn spawn_ui(commands: &mut Commands) {
    overlay::spawn_input_overlay(commands);
    hud::spawn_hud(commands);
    buttons::spawn_buttons(commands);
    loading::spawn_loading_overlay(commands);
}
