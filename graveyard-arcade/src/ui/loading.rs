use bevy::prelude::*;

use crate::engine::loading::asset_loader::AssetsLoaded;
use crate::engine::loading::progress::LoadingProgress;

#[derive(Component)]
pub struct LoadingOverlay;

#[derive(Component)]
pub struct LoadingText;

pub fn loading_message(progress: &LoadingProgress) -> String {
    match &progress.error {
        Some(error) => format!("Could not start the game\n{error}"),
        None => format!("Loading {:.0}%", progress.fraction() * 100.0),
    }
}

pub fn spawn_loading_overlay(commands: &mut Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(Color::srgb(0.04, 0.03, 0.06)),
            GlobalZIndex(10),
            LoadingOverlay,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Loading 0%"),
                TextFont {
                    font_size: 26.0,
                    ..default()
                },
                TextColor(Color::srgb(0.9, 0.85, 0.75)),
                TextLayout::new_with_justify(JustifyText::Center),
                LoadingText,
            ));
        });
}

pub fn update_loading_text(
    progress: Res<LoadingProgress>,
    mut texts: Query<&mut Text, With<LoadingText>>,
) {
    if !progress.is_changed() {
        return;
    }
    let message = loading_message(&progress);
    for mut text in &mut texts {
        text.0 = message.clone();
    }
}

pub fn hide_loading_overlay(
    mut loaded: EventReader<AssetsLoaded>,
    mut overlays: Query<&mut Visibility, With<LoadingOverlay>>,
) {
    if loaded.read().count() == 0 {
        return;
    }
    for mut visibility in &mut overlays {
        *visibility = Visibility::Hidden;
    }
}

pub fn show_loading_overlay(mut overlays: Query<&mut Visibility, With<LoadingOverlay>>) {
    for mut visibility in &mut overlays {
        *visibility = Visibility::Inherited;
    }
}
