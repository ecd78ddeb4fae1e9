use std::collections::HashMap;

use bevy::prelude::*;
use constants::gameplay::CELL_SIZE;

use crate::game::consumables::ConsumableType;
use crate::game::field::GameField;
use crate::game::grid::{EntityId, FieldSize, GridPosition};
use crate::game::obstacles::obstacle::{Obstacle, ObstacleType};

const PLAYER_SIZE: Vec3 = Vec3::new(0.55, 0.8, 0.55);
const CONSUMABLE_RADIUS: f32 = 0.2;
const CONSUMABLE_HEIGHT: f32 = 0.35;

/// Shared meshes and materials for every view attached to the field.
#[derive(Resource)]
pub struct ScenePalette {
    ground: Handle<StandardMaterial>,
    obstacles: HashMap<ObstacleType, (Handle<Mesh>, Handle<StandardMaterial>)>,
    consumable_mesh: Handle<Mesh>,
    candy: Handle<StandardMaterial>,
    shield: Handle<StandardMaterial>,
    player_mesh: Handle<Mesh>,
    player: Handle<StandardMaterial>,
    player_shielded: Handle<StandardMaterial>,
}

impl FromWorld for ScenePalette {
    fn from_world(world: &mut World) -> Self {
        let mut obstacle_meshes = Vec::new();
        let (consumable_mesh, player_mesh) = {
            let mut meshes = world.resource_mut::<Assets<Mesh>>();
            for obstacle_type in ObstacleType::ALL {
                obstacle_meshes.push((obstacle_type, meshes.add(Cuboid::from_size(obstacle_type.size()))));
            }
            (
                meshes.add(Sphere::new(CONSUMABLE_RADIUS)),
                meshes.add(Cuboid::from_size(PLAYER_SIZE)),
            )
        };

        let mut materials = world.resource_mut::<Assets<StandardMaterial>>();
        let obstacles = obstacle_meshes
            .into_iter()
            .map(|(obstacle_type, mesh)| {
                let material = materials.add(StandardMaterial {
                    base_color: obstacle_type.color(),
                    perceptual_roughness: 0.9,
                    ..default()
                });
                (obstacle_type, (mesh, material))
            })
            .collect();

        Self {
            ground: materials.add(StandardMaterial {
                base_color: Color::srgb(0.16, 0.2, 0.14),
                perceptual_roughness: 1.0,
                ..default()
            }),
            obstacles,
            consumable_mesh,
            candy: materials.add(StandardMaterial {
                base_color: Color::srgb(1.0, 0.55, 0.1),
                emissive: LinearRgba::rgb(0.4, 0.15, 0.0),
                ..default()
            }),
            shield: materials.add(StandardMaterial {
                base_color: Color::srgb(0.3, 0.6, 1.0),
                emissive: LinearRgba::rgb(0.0, 0.1, 0.4),
                ..default()
            }),
            player_mesh,
            player: materials.add(StandardMaterial {
                base_color: Color::srgb(0.9, 0.9, 0.85),
                ..default()
            }),
            player_shielded: materials.add(StandardMaterial {
                base_color: Color::srgb(0.5, 0.8, 1.0),
                emissive: LinearRgba::rgb(0.1, 0.3, 0.6),
                ..default()
            }),
        }
    }
}

pub fn init_scene_palette(mut commands: Commands) {
    commands.init_resource::<ScenePalette>();
}

impl ScenePalette {
    fn consumable_material(&self, kind: ConsumableType) -> Handle<StandardMaterial> {
        match kind {
            ConsumableType::Candy => self.candy.clone(),
            ConsumableType::Shield => self.shield.clone(),
        }
    }
}

#[derive(Component)]
pub struct GroundView(FieldSize);

/// Render attachment of an obstacle. Ids restart per session, so the cell and
/// the grave type are part of the key.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObstacleView {
    id: EntityId,
    position: GridPosition,
    obstacle_type: ObstacleType,
}

impl ObstacleView {
    pub fn of(obstacle: &Obstacle) -> Self {
        Self {
            id: obstacle.id(),
            position: obstacle.position(),
            obstacle_type: obstacle.obstacle_type(),
        }
    }

    /// Whether this view still shows `obstacle`, rather than an older one with a reused id.
    pub fn shows(&self, obstacle: &Obstacle) -> bool {
        *self == Self::of(obstacle)
    }
}

#[derive(Component)]
pub struct ConsumableView {
    id: EntityId,
    position: GridPosition,
}

#[derive(Component)]
pub struct PlayerView;

/// World transform of an obstacle resting on (or falling towards) its cell.
pub fn obstacle_translation(obstacle: &Obstacle, field: FieldSize) -> Vec3 {
    let size = obstacle.obstacle_type().size();
    obstacle.position().to_world(field) + Vec3::Y * (size.y * 0.5 + obstacle.fall_offset())
}

pub fn sync_ground(
    mut commands: Commands,
    field: Res<GameField>,
    palette: Res<ScenePalette>,
    mut meshes: ResMut<Assets<Mesh>>,
    ground: Query<(Entity, &GroundView)>,
) {
    let size = field.session().field();
    let mut current = false;
    for (entity, view) in &ground {
        if view.0 == size {
            current = true;
        } else {
            commands.entity(entity).despawn();
        }
    }
    if current {
        return;
    }

    let extent = Vec2::new(size.columns as f32, size.rows as f32) * CELL_SIZE;
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(extent.x, extent.y))),
        MeshMaterial3d(palette.ground.clone()),
        Transform::default(),
        GroundView(size),
    ));
}

pub fn sync_obstacle_views(
    mut commands: Commands,
    field: Res<GameField>,
    palette: Res<ScenePalette>,
    mut views: Query<(Entity, &ObstacleView, &mut Transform, &mut Visibility)>,
) {
    let size = field.session().field();
    let obstacles = field.obstacles();

    let mut attached = Vec::new();
    for (entity, view, mut transform, mut visibility) in &mut views {
        let Some(obstacle) = obstacles.obstacle(view.id).filter(|o| view.shows(o)) else {
            commands.entity(entity).despawn();
            continue;
        };

        transform.translation = obstacle_translation(obstacle, size);
        visibility.set_if_neq(if obstacle.is_visible() {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        });
        attached.push(view.id);
    }

    for obstacle in obstacles.obstacles() {
        if attached.contains(&obstacle.id()) {
            continue;
        }
        let Some((mesh, material)) = palette.obstacles.get(&obstacle.obstacle_type()) else {
            continue;
        };

        commands.spawn((
            Mesh3d(mesh.clone()),
            MeshMaterial3d(material.clone()),
            Transform::from_translation(obstacle_translation(obstacle, size)),
            if obstacle.is_visible() {
                Visibility::Inherited
            } else {
                Visibility::Hidden
            },
            ObstacleView::of(obstacle),
        ));
    }
}

pub fn sync_consumable_views(
    mut commands: Commands,
    field: Res<GameField>,
    palette: Res<ScenePalette>,
    views: Query<(Entity, &ConsumableView)>,
) {
    let size = field.session().field();
    let items = field.consumables().items();

    let mut attached = Vec::new();
    for (entity, view) in &views {
        let alive = items
            .iter()
            .any(|item| item.id == view.id && item.position == view.position);
        if alive {
            attached.push(view.id);
        } else {
            commands.entity(entity).despawn();
        }
    }

    for item in items {
        if attached.contains(&item.id) {
            continue;
        }
        commands.spawn((
            Mesh3d(palette.consumable_mesh.clone()),
            MeshMaterial3d(palette.consumable_material(item.kind)),
            Transform::from_translation(item.position.to_world(size) + Vec3::Y * CONSUMABLE_HEIGHT),
            ConsumableView {
                id: item.id,
                position: item.position,
            },
        ));
    }
}

pub fn sync_player_view(
    mut commands: Commands,
    field: Res<GameField>,
    palette: Res<ScenePalette>,
    mut player: Query<
        (&mut Transform, &mut MeshMaterial3d<StandardMaterial>),
        With<PlayerView>,
    >,
) {
    let translation = field.player_position().to_world(field.session().field())
        + Vec3::Y * (PLAYER_SIZE.y * 0.5);
    let material = if field.is_invulnerable() {
        &palette.player_shielded
    } else {
        &palette.player
    };

    let Ok((mut transform, mut current)) = player.single_mut() else {
        commands.spawn((
            Mesh3d(palette.player_mesh.clone()),
            MeshMaterial3d(material.clone()),
            Transform::from_translation(translation),
            PlayerView,
        ));
        return;
    };

    transform.translation = translation;
    if current.0 != *material {
        current.0 = material.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falling_obstacle_sits_above_its_cell() {
        let field = FieldSize {
            rows: 3,
            columns: 3,
        };
        let mut obstacle = Obstacle::new(EntityId(0), ObstacleType::Grave04, GridPosition::new(1, 1));
        let half_height = ObstacleType::Grave04.size().y * 0.5;

        assert_eq!(obstacle_translation(&obstacle, field), Vec3::new(0.0, half_height, 0.0));

        obstacle.start_intro();
        assert!(obstacle_translation(&obstacle, field).y > half_height);
    }

    #[test]
    fn reused_id_on_same_cell_with_new_type_is_a_new_view() {
        let cell = GridPosition::new(2, 0);
        let old = Obstacle::new(EntityId(3), ObstacleType::Grave01, cell);
        let view = ObstacleView::of(&old);
        assert!(view.shows(&old));

        let replaced = Obstacle::new(EntityId(3), ObstacleType::Grave05, cell);
        assert!(!view.shows(&replaced));

        let moved = Obstacle::new(EntityId(3), ObstacleType::Grave01, GridPosition::new(0, 0));
        assert!(!view.shows(&moved));
    }
}
