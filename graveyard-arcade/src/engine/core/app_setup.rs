use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::pbr::DirectionalLightShadowMap;
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};
use bevy_common_assets::json::JsonAssetPlugin;
use constants::light::{
    AMBIENT_BRIGHTNESS, AMBIENT_COLOR, AMBIENT_ENABLED, DIRECTIONAL_ILLUMINANCE,
    DIRECTIONAL_POSITION, SHADOW_MAP_SIZE,
};
use constants::scene::{STAGE_HEIGHT, STAGE_WIDTH};

// Crate engine modules
use crate::engine::camera::viewport::{
    DeviceProfile, ViewportClass, cap_pixel_ratio, handle_window_resize, spawn_camera,
};
use crate::engine::core::app_state::{AppState, transition_after_loading};
use crate::engine::core::window_config::create_window_config;
use crate::engine::loading::asset_loader::{GameAssets, check_asset_loading, start_loading};
use crate::engine::loading::progress::LoadingProgress;
// Game, UI and debug plugins
use crate::debug::DebugPlugin;
use crate::debug::debug_menu::{DebugMenu, spawn_axes_helper, spawn_fps_text};
use crate::game::GamePlugin;
use crate::game::level::LevelCatalog;
use crate::rpc::web_rpc::WebRpcPlugin;
use crate::ui::{UiPlugin, spawn_ui};

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // Registers LevelCatalog as a loadable asset type from JSON files.
        .add_plugins(JsonAssetPlugin::<LevelCatalog>::new(&["json"]))
        .add_plugins(WebRpcPlugin)
        .add_plugins(GamePlugin)
        .add_plugins(UiPlugin)
        .add_plugins(DebugPlugin);

    // Initialise resources early
    app.init_resource::<LoadingProgress>()
        .init_resource::<GameAssets>()
        .insert_resource(DeviceProfile::detect())
        .insert_resource(DirectionalLightShadowMap {
            size: SHADOW_MAP_SIZE,
        })
        .insert_resource(AmbientLight {
            color: AMBIENT_COLOR,
            brightness: if AMBIENT_ENABLED {
                AMBIENT_BRIGHTNESS
            } else {
                0.0
            },
            ..default()
        });

    // State-based system scheduling
    app.add_systems(Startup, (setup, start_loading, cap_pixel_ratio).chain())
        .add_systems(
            Update,
            (check_asset_loading, transition_after_loading)
                .chain()
                .run_if(in_state(AppState::Loading)),
        )
        .add_systems(
            Update,
            (handle_window_resize, cap_pixel_ratio.run_if(on_event::<WindowResized>)),
        );

    app
}

fn spawn_lighting(commands: &mut Commands) {
    commands.spawn((
        DirectionalLight {
            illuminance: DIRECTIONAL_ILLUMINANCE,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_translation(DIRECTIONAL_POSITION).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

// Startup system that only handles basic initialisation
fn setup(
    mut commands: Commands,
    device: Res<DeviceProfile>,
    menu: Res<DebugMenu>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let (width, height) = windows
        .single()
        .map(|window| (window.width(), window.height()))
        .unwrap_or((STAGE_WIDTH, STAGE_HEIGHT));
    let class = ViewportClass::classify(width, height, *device);
    info!(
        "Viewport {}x{} classified as {:?} (mobile: {})",
        width, height, class.orientation, class.is_mobile
    );

    spawn_lighting(&mut commands);
    spawn_camera(&mut commands, class);
    spawn_axes_helper(&mut commands, &mut meshes, &mut materials);
    spawn_ui(&mut commands);
    spawn_fps_text(&mut commands, *menu);
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
