use bevy::prelude::*;
use constants::gameplay::{INTRO_FALL_DURATION, INTRO_FALL_HEIGHT};
use serde::{Deserialize, Serialize};

use crate::game::grid::{EntityId, GridPosition};

/// Grave variants an obstacle can be built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleType {
    Grave01,
    Grave02,
    Grave03,
    Grave04,
    Grave05,
}

impl ObstacleType {
    pub const ALL: [ObstacleType; 5] = [
        Self::Grave01,
        Self::Grave02,
        Self::Grave03,
        Self::Grave04,
        Self::Grave05,
    ];

    /// Headstone dimensions (width, height, depth) in world units.
    pub fn size(self) -> Vec3 {
        match self {
            Self::Grave01 => Vec3::new(0.7, 0.9, 0.2),
            Self::Grave02 => Vec3::new(0.6, 1.1, 0.25),
            Self::Grave03 => Vec3::new(0.8, 0.7, 0.3),
            Self::Grave04 => Vec3::new(0.5, 1.3, 0.2),
            Self::Grave05 => Vec3::new(0.75, 0.8, 0.35),
        }
    }

    pub fn color(self) -> Color {
        match self {
            Self::Grave01 => Color::srgb(0.55, 0.55, 0.6),
            Self::Grave02 => Color::srgb(0.45, 0.47, 0.5),
            Self::Grave03 => Color::srgb(0.6, 0.57, 0.52),
            Self::Grave04 => Color::srgb(0.4, 0.42, 0.48),
            Self::Grave05 => Color::srgb(0.5, 0.5, 0.45),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleVisibility {
    Hidden,
    Visible,
}

/// Grid-bound grave. Rendering is attached separately by the scene adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    id: EntityId,
    obstacle_type: ObstacleType,
    position: GridPosition,
    visibility: ObstacleVisibility,
    /// Seconds since the intro fall started, while it is running.
    intro_elapsed: Option<f32>,
}

impl Obstacle {
    pub fn new(id: EntityId, obstacle_type: ObstacleType, position: GridPosition) -> Self {
        Self {
            id,
            obstacle_type,
            position,
            visibility: ObstacleVisibility::Hidden,
            intro_elapsed: None,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn obstacle_type(&self) -> ObstacleType {
        self.obstacle_type
    }

    pub fn position(&self) -> GridPosition {
        self.position
    }

    pub fn is_visible(&self) -> bool {
        self.visibility == ObstacleVisibility::Visible
    }

    pub fn show(&mut self) {
        self.visibility = ObstacleVisibility::Visible;
    }

    /// Make the obstacle visible and drop it onto its cell.
    pub fn start_intro(&mut self) {
        self.show();
        self.intro_elapsed = Some(0.0);
    }

    pub fn update(&mut self, delta: f32) {
        if let Some(elapsed) = self.intro_elapsed.as_mut() {
            *elapsed += delta;
            if *elapsed >= INTRO_FALL_DURATION {
                self.intro_elapsed = None;
            }
        }
    }

    /// Height above the ground during the intro fall; zero once landed.
    pub fn fall_offset(&self) -> f32 {
        let Some(elapsed) = self.intro_elapsed else {
            return 0.0;
        };

        let t = (elapsed / INTRO_FALL_DURATION).clamp(0.0, 1.0);
        // Quadratic ease-in: accelerates like a dropped stone.
        INTRO_FALL_HEIGHT * (1.0 - t * t)
    }
}
