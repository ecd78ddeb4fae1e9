/// Largest frame delta (seconds) the simulation will observe
pub const MAX_FRAME_DELTA: f32 = 0.1;

/// World-space spacing between neighbouring grid cells
pub const CELL_SIZE: f32 = 1.0;

/// Delay between consecutive obstacle reveals during the intro (seconds)
pub const INTRO_DELAY_STEP: f32 = 0.13;
/// Offset from an obstacle reveal to its landing sound on desktop (seconds)
pub const INTRO_SOUND_OFFSET_DESKTOP: f32 = 0.4;
/// Offset from an obstacle reveal to its landing sound on mobile (seconds)
pub const INTRO_SOUND_OFFSET_MOBILE: f32 = 0.7;
/// Trailing buffer after the last reveal, in delay steps
pub const INTRO_TRAILING_STEPS: f32 = 1.5;
/// Duration of a single obstacle's fall animation (seconds)
pub const INTRO_FALL_DURATION: f32 = 0.4;
/// Height obstacles fall from during the intro
pub const INTRO_FALL_HEIGHT: f32 = 3.0;

/// Random placement gives up after this many samples per requested cell
pub const PLACEMENT_ATTEMPTS_PER_CELL: usize = 64;

/// Drag distance (stage units) that turns into a directional press
pub const SWIPE_THRESHOLD: f32 = 40.0;

/// Seconds a shield keeps the player invulnerable
pub const INVULNERABILITY_DURATION: f32 = 5.0;

/// Rounds a player must clear before a restart moves on to the next level
pub const ROUNDS_TO_ADVANCE: u32 = 3;
