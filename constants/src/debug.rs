/// Skip the start button and begin gameplay as soon as assets are loaded
pub const START_FROM_GAMEPLAY: bool = false;

/// Draw world axes at the origin
pub const AXES_HELPER: bool = false;
pub const AXES_HELPER_LENGTH: f32 = 5.0;

/// Show obstacle position helpers from the start
pub const POSITION_HELPERS: bool = false;

/// Show the FPS meter from the start
pub const FPS_METER: bool = false;
