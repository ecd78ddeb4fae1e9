/// Sounds are enabled when the game boots
pub const SOUND_ENABLED: bool = true;

pub const MASTER_VOLUME: f32 = 0.5;

/// Per-effect multiplier applied on top of the master volume
pub const OBSTACLE_FALL_VOLUME: f32 = 0.6;

/// Gap between the listener's virtual ears, in world units
pub const LISTENER_EAR_GAP: f32 = 0.4;
