use std::collections::{HashMap, HashSet};

use bevy::asset::LoadState;
use bevy::prelude::*;
use constants::assets::{AUDIO_ASSETS, LEVELS_PATH};

use super::progress::{AssetStatus, LoadingProgress};
use crate::game::level::LevelCatalog;

/// Keyed registry of loaded assets. Lookups miss until the asset has finished loading.
#[derive(Resource, Default)]
pub struct GameAssets {
    levels: Option<Handle<LevelCatalog>>,
    audio: HashMap<String, Handle<AudioSource>>,
    ready_audio: HashSet<String>,
}

impl GameAssets {
    pub fn audio(&self, key: &str) -> Option<Handle<AudioSource>> {
        if !self.ready_audio.contains(key) {
            return None;
        }
        self.audio.get(key).cloned()
    }

    fn mark_audio_ready(&mut self, key: &str) {
        self.ready_audio.insert(key.to_string());
    }
}

/// Fired once when every tracked asset has settled.
#[derive(Event, Debug, Clone, Copy)]
pub struct AssetsLoaded;

pub fn start_loading(
    mut assets: ResMut<GameAssets>,
    mut progress: ResMut<LoadingProgress>,
    asset_server: Res<AssetServer>,
) {
    info!("Loading level catalog from {}", LEVELS_PATH);
    assets.levels = Some(asset_server.load(LEVELS_PATH));

    for (key, path) in AUDIO_ASSETS {
        assets
            .audio
            .insert(key.to_string(), asset_server.load(*path));
        progress
            .audio
            .push((key.to_string(), AssetStatus::Pending));
    }
}

/// Poll load states, validate the level catalog, and record progress.
pub fn check_asset_loading(
    mut commands: Commands,
    mut assets: ResMut<GameAssets>,
    mut progress: ResMut<LoadingProgress>,
    mut loaded_events: EventWriter<AssetsLoaded>,
    asset_server: Res<AssetServer>,
    catalogs: Res<Assets<LevelCatalog>>,
) {
    if progress.error.is_some() || progress.is_complete() {
        return;
    }

    if !progress.levels_loaded {
        if let Some(handle) = assets.levels.clone() {
            match asset_server.load_state(handle.id()) {
                LoadState::Loaded => {
                    if let Some(catalog) = catalogs.get(&handle) {
                        match catalog.validate() {
                            Ok(()) => {
                                info!("✓ Level catalog loaded: {} levels", catalog.levels.len());
                                commands.insert_resource(catalog.clone());
                                progress.levels_loaded = true;
                            }
                            Err(err) => {
                                progress.error = Some(format!("Invalid level catalog: {err}"));
                            }
                        }
                    }
                }
                LoadState::Failed(err) => {
                    progress.error = Some(format!("Could not load {LEVELS_PATH}: {err}"));
                }
                _ => {}
            }
        }
    }

    let mut newly_ready = Vec::new();
    for (key, status) in progress.audio.iter_mut() {
        if *status != AssetStatus::Pending {
            continue;
        }
        let Some(handle) = assets.audio.get(key.as_str()) else {
            *status = AssetStatus::Missing;
            continue;
        };

        match asset_server.load_state(handle.id()) {
            LoadState::Loaded => {
                *status = AssetStatus::Loaded;
                newly_ready.push(key.clone());
            }
            LoadState::Failed(err) => {
                warn!("Audio '{}' failed to load, continuing without it: {}", key, err);
                *status = AssetStatus::Missing;
            }
            _ => {}
        }
    }

    for key in newly_ready {
        assets.mark_audio_ready(&key);
    }

    if progress.is_complete() {
        loaded_events.write(AssetsLoaded);
    }
}
