use bevy::audio::Volume;
use bevy::prelude::*;
use constants::sound::{MASTER_VOLUME, OBSTACLE_FALL_VOLUME, SOUND_ENABLED};

use crate::engine::loading::asset_loader::GameAssets;

/// Global sound switches read by every sound source.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct SoundSettings {
    pub enabled: bool,
    pub master_volume: f32,
    pub obstacle_fall_volume: f32,
}

impl Default for SoundSettings {
    fn default() -> Self {
        Self {
            enabled: SOUND_ENABLED,
            master_volume: MASTER_VOLUME,
            obstacle_fall_volume: OBSTACLE_FALL_VOLUME,
        }
    }
}

impl SoundSettings {
    /// Effective playback volume for an effect with the given multiplier.
    pub fn effect_volume(&self, multiplier: f32) -> f32 {
        if self.enabled {
            self.master_volume * multiplier
        } else {
            0.0
        }
    }

    pub fn obstacle_fall(&self) -> f32 {
        self.effect_volume(self.obstacle_fall_volume)
    }

    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }
}

/// One-shot sound played at a world position.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct PositionalSound {
    pub key: &'static str,
    pub position: Vec3,
    pub volume: f32,
}

/// Marker for the currently playing obstacle landing sound.
#[derive(Component)]
pub struct FallSound;

/// Spawn spatial audio for queued sounds. A new landing sound replaces the one still playing.
pub fn play_positional_sounds(
    mut commands: Commands,
    mut sounds: EventReader<PositionalSound>,
    assets: Res<GameAssets>,
    playing: Query<Entity, With<FallSound>>,
    mut warned_missing: Local<bool>,
) {
    for sound in sounds.read() {
        if sound.volume <= 0.0 {
            continue;
        }

        let Some(handle) = assets.audio(sound.key) else {
            if !*warned_missing {
                warn!("Audio '{}' is not available, playing nothing", sound.key);
                *warned_missing = true;
            }
            continue;
        };

        for entity in &playing {
            commands.entity(entity).despawn();
        }

        commands.spawn((
            AudioPlayer::new(handle),
            PlaybackSettings::DESPAWN
                .with_spatial(true)
                .with_volume(Volume::Linear(sound.volume)),
            Transform::from_translation(sound.position),
            FallSound,
        ));
    }
}
