use bevy::prelude::*;

use crate::game::audio::SoundSettings;
use crate::game::events::UiEvent;
use crate::game::field::GameField;
use crate::game::session::GamePhase;

const BUTTON_IDLE: Color = Color::srgba(0.12, 0.1, 0.16, 0.85);
const BUTTON_HOVERED: Color = Color::srgba(0.25, 0.2, 0.32, 0.9);
const BUTTON_PRESSED: Color = Color::srgba(0.45, 0.3, 0.55, 0.95);

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiButton {
    Start,
    Restart,
    Sound,
}

impl UiButton {
    fn label(self) -> &'static str {
        match self {
            Self::Start => "Start",
            Self::Restart => "Play again",
            Self::Sound => "Sound: on",
        }
    }

    /// Whether the button belongs on screen in the given phase.
    pub fn is_shown_in(self, phase: GamePhase) -> bool {
        match self {
            Self::Start => phase == GamePhase::Ready,
            Self::Restart => phase == GamePhase::GameOver,
            Self::Sound => true,
        }
    }
}

#[derive(Component)]
pub struct SoundButtonLabel;

pub fn sound_label(enabled: bool) -> &'static str {
    if enabled { "Sound: on" } else { "Sound: off" }
}

pub fn spawn_buttons(commands: &mut Commands) {
    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            width: Val::Percent(100.0),
            bottom: Val::Px(48.0),
            justify_content: JustifyContent::Center,
            column_gap: Val::Px(16.0),
            ..default()
        })
        .with_children(|parent| {
            for button in [UiButton::Start, UiButton::Restart] {
                spawn_button(parent, button);
            }
        });

    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            top: Val::Px(12.0),
            right: Val::Px(12.0),
            ..default()
        })
        .with_children(|parent| spawn_button(parent, UiButton::Sound));
}

fn spawn_button(parent: &mut ChildSpawnerCommands, button: UiButton) {
    let mut entity = parent.spawn((
        Button,
        Node {
            padding: UiRect::axes(Val::Px(24.0), Val::Px(12.0)),
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            ..default()
        },
        BackgroundColor(BUTTON_IDLE),
        BorderRadius::all(Val::Px(8.0)),
        Visibility::Hidden,
        button,
    ));

    entity.with_children(|label| {
        let mut text = label.spawn((
            Text::new(button.label()),
            TextFont {
                font_size: 22.0,
                ..default()
            },
            TextColor(Color::WHITE),
        ));
        if button == UiButton::Sound {
            text.insert(SoundButtonLabel);
        }
    });
}

pub fn handle_button_presses(
    mut buttons: Query<(&Interaction, &UiButton, &mut BackgroundColor), Changed<Interaction>>,
    mut sound: ResMut<SoundSettings>,
    mut ui_events: EventWriter<UiEvent>,
) {
    for (interaction, button, mut background) in &mut buttons {
        background.0 = match interaction {
            Interaction::Pressed => BUTTON_PRESSED,
            Interaction::Hovered => BUTTON_HOVERED,
            Interaction::None => BUTTON_IDLE,
        };

        if *interaction != Interaction::Pressed {
            continue;
        }

        match button {
            UiButton::Start => {
                ui_events.write(UiEvent::StartGame);
            }
            UiButton::Restart => {
                ui_events.write(UiEvent::RestartGame);
            }
            UiButton::Sound => {
                sound.toggle();
                ui_events.write(UiEvent::SoundChanged);
            }
        }
    }
}

pub fn update_button_visibility(
    field: Res<GameField>,
    mut buttons: Query<(&UiButton, &mut Visibility)>,
) {
    let phase = field.session().phase;
    for (button, mut visibility) in &mut buttons {
        visibility.set_if_neq(if button.is_shown_in(phase) {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        });
    }
}

/// Mirror sound settings on the button, whichever path changed them.
pub fn update_sound_label(
    sound: Res<SoundSettings>,
    mut labels: Query<&mut Text, With<SoundButtonLabel>>,
) {
    if !sound.is_changed() {
        return;
    }
    for mut text in &mut labels {
        text.0 = sound_label(sound.enabled).to_string();
    }
}
