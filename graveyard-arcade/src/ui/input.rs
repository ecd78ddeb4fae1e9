use bevy::prelude::*;

use crate::game::events::UiEvent;
use crate::game::grid::Direction;

/// Arrow keys and WASD steer the player.
pub fn key_direction(key: KeyCode) -> Option<Direction> {
    match key {
        KeyCode::ArrowLeft | KeyCode::KeyA => Some(Direction::Left),
        KeyCode::ArrowRight | KeyCode::KeyD => Some(Direction::Right),
        KeyCode::ArrowUp | KeyCode::KeyW => Some(Direction::Up),
        KeyCode::ArrowDown | KeyCode::KeyS => Some(Direction::Down),
        _ => None,
    }
}

pub fn keyboard_input(keyboard: Res<ButtonInput<KeyCode>>, mut ui_events: EventWriter<UiEvent>) {
    for key in keyboard.get_just_pressed() {
        if let Some(direction) = key_direction(*key) {
            ui_events.write(UiEvent::Direction(direction));
        }
    }

    if keyboard.just_pressed(KeyCode::Enter) || keyboard.just_pressed(KeyCode::Space) {
        ui_events.write(UiEvent::StartGame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_arrows_and_wasd() {
        assert_eq!(key_direction(KeyCode::ArrowUp), Some(Direction::Up));
        assert_eq!(key_direction(KeyCode::KeyA), Some(Direction::Left));
        assert_eq!(key_direction(KeyCode::KeyF), None);
    }
}
