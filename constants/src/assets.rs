/// Level catalog loaded at startup
pub const LEVELS_PATH: &str = "levels/levels.json";

/// Registry key of the obstacle landing sound
pub const OBSTACLE_FALL_SOUND: &str = "obstacle-fall";

/// Audio assets by registry key
pub const AUDIO_ASSETS: &[(&str, &str)] = &[(OBSTACLE_FALL_SOUND, "audio/obstacle-fall.ogg")];
