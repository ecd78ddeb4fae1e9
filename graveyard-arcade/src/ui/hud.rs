use bevy::prelude::*;

use crate::game::events::GameEvent;

/// Text the HUD currently shows, folded from game events.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct HudState {
    pub score: u32,
    pub lives: u32,
    pub round: u32,
    pub booster: Option<f32>,
    pub tutorial_visible: bool,
    pub game_over: bool,
}

impl Default for HudState {
    fn default() -> Self {
        Self {
            score: 0,
            lives: 0,
            round: 1,
            booster: None,
            tutorial_visible: false,
            game_over: false,
        }
    }
}

impl HudState {
    pub fn apply(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::LevelReady { .. } => {
                self.game_over = false;
                self.tutorial_visible = false;
                self.booster = None;
            }
            GameEvent::ScoreChanged(score) => self.score = score,
            GameEvent::LivesChanged(lives) => self.lives = lives,
            GameEvent::RoundChanged(round) => self.round = round,
            GameEvent::GameplayStarted => self.tutorial_visible = true,
            GameEvent::ButtonPressed => self.tutorial_visible = false,
            GameEvent::StartInvulnerabilityBooster { duration } => self.booster = Some(duration),
            GameEvent::StopBooster => self.booster = None,
            GameEvent::GameOver => {
                self.game_over = true;
                self.tutorial_visible = false;
                self.booster = None;
            }
            _ => {}
        }
    }

    /// Count the booster down locally; the field sends `StopBooster` when it really ends.
    pub fn tick(&mut self, delta: f32) {
        if let Some(remaining) = self.booster.as_mut() {
            *remaining = (*remaining - delta).max(0.0);
        }
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HudText {
    Score,
    Lives,
    Round,
    Booster,
    Tutorial,
    GameOver,
}

impl HudText {
    /// Rendered text, or `None` while the element is hidden.
    pub fn render(self, state: &HudState) -> Option<String> {
        match self {
            Self::Score => Some(format!("Score: {}", state.score)),
            Self::Lives => Some(format!("Lives: {}", state.lives)),
            Self::Round => Some(format!("Round {}", state.round)),
            Self::Booster => state
                .booster
                .map(|remaining| format!("Shield {:.1}s", remaining)),
            Self::Tutorial => state
                .tutorial_visible
                .then(|| "Swipe or use the arrow keys".to_string()),
            Self::GameOver => state.game_over.then(|| "Game over".to_string()),
        }
    }
}

pub fn spawn_hud(commands: &mut Commands) {
    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            top: Val::Px(12.0),
            left: Val::Px(12.0),
            flex_direction: FlexDirection::Column,
            row_gap: Val::Px(4.0),
            ..default()
        })
        .with_children(|parent| {
            for element in [HudText::Score, HudText::Lives, HudText::Round, HudText::Booster] {
                parent.spawn((
                    Text::default(),
                    TextFont {
                        font_size: 20.0,
                        ..default()
                    },
                    TextColor(Color::srgb(0.95, 0.9, 0.8)),
                    Visibility::Hidden,
                    element,
                ));
            }
        });

    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            width: Val::Percent(100.0),
            top: Val::Percent(40.0),
            flex_direction: FlexDirection::Column,
            align_items: AlignItems::Center,
            row_gap: Val::Px(12.0),
            ..default()
        })
        .with_children(|parent| {
            for (element, size) in [(HudText::GameOver, 48.0), (HudText::Tutorial, 22.0)] {
                parent.spawn((
                    Text::default(),
                    TextFont {
                        font_size: size,
                        ..default()
                    },
                    TextColor(Color::WHITE),
                    Visibility::Hidden,
                    element,
                ));
            }
        });
}

pub fn apply_hud_events(
    mut events: EventReader<GameEvent>,
    time: Res<Time>,
    mut state: ResMut<HudState>,
) {
    for event in events.read() {
        state.apply(event);
    }
    if state.booster.is_some() {
        state.tick(time.delta_secs());
    }
}

pub fn render_hud(state: Res<HudState>, mut texts: Query<(&HudText, &mut Text, &mut Visibility)>) {
    if !state.is_changed() {
        return;
    }

    for (element, mut text, mut visibility) in &mut texts {
        match element.render(&state) {
            Some(content) => {
                if text.0 != content {
                    text.0 = content;
                }
                visibility.set_if_neq(Visibility::Inherited);
            }
            None => {
                visibility.set_if_neq(Visibility::Hidden);
            }
        }
    }
}
