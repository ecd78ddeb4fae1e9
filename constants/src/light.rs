use bevy::prelude::*;

pub const AMBIENT_ENABLED: bool = true;
pub const AMBIENT_COLOR: Color = Color::srgb(0.75, 0.75, 1.0);
pub const AMBIENT_BRIGHTNESS: f32 = 350.0;

pub const DIRECTIONAL_ILLUMINANCE: f32 = 4_000.0;
pub const DIRECTIONAL_POSITION: Vec3 = Vec3::new(-3.0, 5.0, 5.0);

/// Shadow map resolution for the directional light
pub const SHADOW_MAP_SIZE: usize = 1024;
