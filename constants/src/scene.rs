use bevy::prelude::*;

/// Near/far distances for linear distance fog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FogRange {
    pub near: f32,
    pub far: f32,
}

/// Vertical field of view in degrees for desktop viewports
pub const FOV_DESKTOP: f32 = 45.0;
/// Vertical field of view in degrees for mobile viewports held upright
pub const FOV_MOBILE_PORTRAIT: f32 = 70.0;
/// Vertical field of view in degrees for mobile viewports held sideways
pub const FOV_MOBILE_LANDSCAPE: f32 = 40.0;

pub const CAMERA_NEAR: f32 = 0.5;
pub const CAMERA_FAR: f32 = 40.0;

/// Camera placement relative to the field centre.
pub const CAMERA_POSITION: Vec3 = Vec3::new(0.0, 9.0, 8.5);

pub const FOG_ENABLED: bool = true;
pub const FOG_DESKTOP: FogRange = FogRange {
    near: 12.0,
    far: 26.0,
};
pub const FOG_MOBILE_PORTRAIT: FogRange = FogRange {
    near: 14.0,
    far: 30.0,
};
pub const FOG_MOBILE_LANDSCAPE: FogRange = FogRange {
    near: 11.0,
    far: 24.0,
};

pub const BACKGROUND_COLOR: Color = Color::srgb(0.09, 0.07, 0.16);

/// Upper bound for the device pixel ratio used by the renderer
pub const MAX_PIXEL_RATIO: f32 = 2.0;

/// Logical size of the letterboxed UI stage
pub const STAGE_WIDTH: f32 = 640.0;
pub const STAGE_HEIGHT: f32 = 960.0;

/// CSS selector of the canvas the game renders into on the web
pub const CANVAS_SELECTOR: &str = "#game";
