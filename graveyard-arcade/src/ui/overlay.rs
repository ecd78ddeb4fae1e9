use bevy::input::touch::{TouchInput, TouchPhase};
use bevy::prelude::*;
use bevy::window::{CursorMoved, PrimaryWindow, SystemCursorIcon};
use bevy::winit::cursor::CursorIcon;
use constants::scene::{STAGE_HEIGHT, STAGE_WIDTH};

use crate::game::events::{GameEvent, UiEvent};

/// Invisible full-viewport hit target behind the buttons.
#[derive(Component)]
pub struct InputOverlay;

/// Cursor shape advertised over the play area.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CursorAffordance {
    #[default]
    Default,
    Grab,
    Grabbing,
}

impl CursorAffordance {
    pub fn pressed(self) -> Self {
        match self {
            Self::Grab => Self::Grabbing,
            other => other,
        }
    }

    pub fn released(self) -> Self {
        match self {
            Self::Grabbing => Self::Grab,
            other => other,
        }
    }

    fn icon(self) -> CursorIcon {
        let system = match self {
            Self::Default => SystemCursorIcon::Default,
            Self::Grab => SystemCursorIcon::Grab,
            Self::Grabbing => SystemCursorIcon::Grabbing,
        };
        CursorIcon::System(system)
    }
}

/// Map a window point (logical pixels) to the letterboxed stage.
///
/// The stage keeps its aspect ratio and is centred; points in the bars map
/// outside `0..STAGE_WIDTH` / `0..STAGE_HEIGHT`.
pub fn to_stage(point: Vec2, window: Vec2) -> Vec2 {
    let stage = Vec2::new(STAGE_WIDTH, STAGE_HEIGHT);
    let scale = (window.x / stage.x).min(window.y / stage.y);
    if scale <= 0.0 {
        return Vec2::ZERO;
    }

    let offset = (window - stage * scale) * 0.5;
    (point - offset) / scale
}

pub fn spawn_input_overlay(commands: &mut Commands) {
    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        },
        BackgroundColor(Color::NONE),
        Interaction::default(),
        GlobalZIndex(-1),
        InputOverlay,
    ));
}

pub fn overlay_pointer_input(
    mut cursor_moved: EventReader<CursorMoved>,
    mut touches: EventReader<TouchInput>,
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    overlay: Query<&Interaction, With<InputOverlay>>,
    mut affordance: ResMut<CursorAffordance>,
    mut ui_events: EventWriter<UiEvent>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let size = Vec2::new(window.width(), window.height());

    for moved in cursor_moved.read() {
        let stage = to_stage(moved.position, size);
        ui_events.write(UiEvent::PointerMove {
            x: stage.x,
            y: stage.y,
        });
    }

    let on_overlay = overlay
        .single()
        .is_ok_and(|interaction| *interaction == Interaction::Pressed);
    if mouse.just_pressed(MouseButton::Left) && on_overlay {
        ui_events.write(UiEvent::PointerDown);
        let next = affordance.pressed();
        affordance.set_if_neq(next);
    }
    if mouse.just_released(MouseButton::Left) {
        ui_events.write(UiEvent::PointerUp);
        let next = affordance.released();
        affordance.set_if_neq(next);
    }

    for touch in touches.read() {
        let stage = to_stage(touch.position, size);
        let moved = UiEvent::PointerMove {
            x: stage.x,
            y: stage.y,
        };
        match touch.phase {
            TouchPhase::Started => {
                ui_events.write(moved);
                ui_events.write(UiEvent::PointerDown);
            }
            TouchPhase::Moved => {
                ui_events.write(moved);
            }
            TouchPhase::Ended | TouchPhase::Canceled => {
                ui_events.write(UiEvent::PointerUp);
            }
        }
    }
}

/// Offer the grab cursor only while the player can actually be steered.
pub fn cursor_from_game_events(
    mut events: EventReader<GameEvent>,
    mut affordance: ResMut<CursorAffordance>,
) {
    for event in events.read() {
        let next = match event {
            GameEvent::GameplayStarted => CursorAffordance::Grab,
            GameEvent::GameOver => CursorAffordance::Default,
            _ => continue,
        };
        affordance.set_if_neq(next);
    }
}

pub fn apply_cursor_icon(
    mut commands: Commands,
    affordance: Res<CursorAffordance>,
    windows: Query<Entity, With<PrimaryWindow>>,
) {
    if !affordance.is_changed() {
        return;
    }
    let Ok(window) = windows.single() else {
        return;
    };
    commands.entity(window).insert(affordance.icon());
}
