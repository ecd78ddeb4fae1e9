use bevy::prelude::*;
use constants::debug::{AXES_HELPER, AXES_HELPER_LENGTH, FPS_METER};

use crate::game::audio::SoundSettings;
use crate::game::events::GameEvent;
use crate::game::field::GameField;
use crate::game::grid::{EntityId, GridPosition};

/// Runtime debug toggles.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebugMenu {
    pub fps_visible: bool,
}

impl Default for DebugMenu {
    fn default() -> Self {
        Self {
            fps_visible: FPS_METER,
        }
    }
}

impl DebugMenu {
    pub fn toggle_fps(&mut self) -> bool {
        self.fps_visible = !self.fps_visible;
        self.fps_visible
    }
}

#[derive(Component)]
pub struct FpsText;

/// Marker drawn over the cell of one obstacle.
#[derive(Component)]
pub struct PositionHelperView {
    obstacle: EntityId,
    position: GridPosition,
}

#[derive(Component)]
pub struct AxesHelper;

fn visibility_of(visible: bool) -> Visibility {
    if visible {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    }
}

pub fn spawn_fps_text(commands: &mut Commands, menu: DebugMenu) {
    commands.spawn((
        Text::new("FPS: "),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(Color::srgb(1., 0., 0.)),
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(12.0),
            right: Val::Px(12.0),
            ..default()
        },
        visibility_of(menu.fps_visible),
        FpsText,
    ));
}

/// Red, green and blue bars along +X, +Y and +Z from the field origin.
pub fn spawn_axes_helper(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    if !AXES_HELPER {
        return;
    }

    let thickness = 0.03;
    let half = AXES_HELPER_LENGTH * 0.5;
    let axes = [
        (
            Vec3::new(AXES_HELPER_LENGTH, thickness, thickness),
            Vec3::new(half, 0.0, 0.0),
            Color::srgb(1.0, 0.0, 0.0),
        ),
        (
            Vec3::new(thickness, AXES_HELPER_LENGTH, thickness),
            Vec3::new(0.0, half, 0.0),
            Color::srgb(0.0, 1.0, 0.0),
        ),
        (
            Vec3::new(thickness, thickness, AXES_HELPER_LENGTH),
            Vec3::new(0.0, 0.0, half),
            Color::srgb(0.0, 0.0, 1.0),
        ),
    ];

    for (size, offset, color) in axes {
        commands.spawn((
            Mesh3d(meshes.add(Cuboid::from_size(size))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: color,
                unlit: true,
                ..default()
            })),
            Transform::from_translation(offset),
            AxesHelper,
        ));
    }
}

/// Debug keys: F fps meter, H position helpers, M sound.
pub fn handle_debug_keys(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut field: ResMut<GameField>,
    mut sound: ResMut<SoundSettings>,
) {
    if keyboard.just_pressed(KeyCode::KeyF) {
        field.toggle_fps_meter();
    }

    if keyboard.just_pressed(KeyCode::KeyH) {
        let visible = field.toggle_position_helpers();
        info!("Position helpers {}", if visible { "shown" } else { "hidden" });
    }

    if keyboard.just_pressed(KeyCode::KeyM) {
        field.toggle_sound(&mut sound);
        info!("Sound {}", if sound.enabled { "enabled" } else { "disabled" });
    }
}

pub fn apply_debug_events(
    mut events: EventReader<GameEvent>,
    mut menu: ResMut<DebugMenu>,
    mut fps_text: Query<&mut Visibility, With<FpsText>>,
) {
    for event in events.read() {
        if *event != GameEvent::FpsMeterChanged {
            continue;
        }

        let visible = menu.toggle_fps();
        for mut visibility in &mut fps_text {
            *visibility = visibility_of(visible);
        }
    }
}

/// Keep one helper marker per obstacle, shown only while helpers are enabled.
pub fn sync_position_helpers(
    mut commands: Commands,
    field: Res<GameField>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut helpers: Query<(Entity, &PositionHelperView, &mut Visibility)>,
    mut marker: Local<Option<(Handle<Mesh>, Handle<StandardMaterial>)>>,
) {
    let obstacles = field.obstacles();
    let field_size = field.session().field();
    let visible = visibility_of(obstacles.helpers_visible());

    let mut present = Vec::new();
    for (entity, view, mut visibility) in &mut helpers {
        // Ids restart with every session, so a stale helper may share an id with a new obstacle.
        let current = obstacles.obstacle(view.obstacle).map(|o| o.position());
        if current != Some(view.position) {
            commands.entity(entity).despawn();
            continue;
        }
        visibility.set_if_neq(visible);
        present.push(view.obstacle);
    }

    let (mesh, material) = marker
        .get_or_insert_with(|| {
            (
                meshes.add(Cuboid::new(0.9, 0.02, 0.9)),
                materials.add(StandardMaterial {
                    base_color: Color::srgba(1.0, 0.2, 0.6, 0.5),
                    alpha_mode: AlphaMode::Blend,
                    unlit: true,
                    ..default()
                }),
            )
        })
        .clone();

    for helper in obstacles.position_helpers() {
        if present.contains(&helper.obstacle) {
            continue;
        }
        commands.spawn((
            Mesh3d(mesh.clone()),
            MeshMaterial3d(material.clone()),
            Transform::from_translation(helper.position.to_world(field_size) + Vec3::Y * 0.01),
            visible,
            PositionHelperView {
                obstacle: helper.obstacle,
                position: helper.position,
            },
        ));
    }
}
