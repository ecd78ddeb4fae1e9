use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::grid::{FieldSize, GridPosition};
use crate::game::obstacles::obstacle::ObstacleType;

/// Inclusive range for randomized counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRange {
    pub min: usize,
    pub max: usize,
}

/// One explicitly placed obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObstaclePlacement {
    #[serde(rename = "type")]
    pub obstacle_type: ObstacleType,
    pub position: GridPosition,
}

/// How a level lays out its obstacles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "placement", rename_all = "snake_case")]
pub enum ObstaclesConfig {
    /// Fixed list of obstacles.
    Map { map: Vec<ObstaclePlacement> },
    /// Random cells, never touching `ignore_positions`.
    Random {
        count: CountRange,
        #[serde(default)]
        ignore_positions: Vec<GridPosition>,
    },
}

/// Collectibles spawned at the start of each round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumablesConfig {
    pub candies: usize,
    #[serde(default)]
    pub shields: usize,
}

/// Static descriptor of a single level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub field: FieldSize,
    pub obstacles: ObstaclesConfig,
    pub consumables: ConsumablesConfig,
    pub player_start: GridPosition,
    pub lives: u32,
    /// Seconds the player has to clear a round.
    pub round_duration: f32,
}

/// All levels, loaded from JSON.
#[derive(Asset, TypePath, Debug, Clone, PartialEq, Serialize, Deserialize, Resource)]
pub struct LevelCatalog {
    pub levels: Vec<LevelConfig>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LevelError {
    #[error("level catalog contains no levels")]
    Empty,
    #[error("level {index} does not exist (catalog has {count})")]
    UnknownLevel { index: usize, count: usize },
    #[error("level {level}: field must have at least one row and column, got {rows}x{columns}")]
    EmptyField {
        level: usize,
        rows: usize,
        columns: usize,
    },
    #[error("level {level}: obstacle at {position} lies outside the {rows}x{columns} field")]
    ObstacleOutOfBounds {
        level: usize,
        position: GridPosition,
        rows: usize,
        columns: usize,
    },
    #[error("level {level}: two obstacles share cell {position}")]
    DuplicateObstacle { level: usize, position: GridPosition },
    #[error("level {level}: obstacle count range {min}..={max} is inverted")]
    InvertedCount { level: usize, min: usize, max: usize },
    #[error("level {level}: player start {position} is outside the field or on an obstacle")]
    InvalidPlayerStart { level: usize, position: GridPosition },
    #[error("level {level}: lives must be at least 1")]
    NoLives { level: usize },
    #[error("level {level}: round duration must be positive, got {duration}")]
    InvalidRoundDuration { level: usize, duration: f32 },
}

impl LevelCatalog {
    pub fn level(&self, index: usize) -> Result<&LevelConfig, LevelError> {
        self.levels.get(index).ok_or(LevelError::UnknownLevel {
            index,
            count: self.levels.len(),
        })
    }

    /// Check every level once, before the game touches any of them.
    pub fn validate(&self) -> Result<(), LevelError> {
        if self.levels.is_empty() {
            return Err(LevelError::Empty);
        }

        self.levels
            .iter()
            .enumerate()
            .try_for_each(|(index, level)| level.validate(index))
    }
}

impl LevelConfig {
    pub fn validate(&self, level: usize) -> Result<(), LevelError> {
        let field = self.field;
        if field.rows == 0 || field.columns == 0 {
            return Err(LevelError::EmptyField {
                level,
                rows: field.rows,
                columns: field.columns,
            });
        }

        if !field.contains(self.player_start) {
            return Err(LevelError::InvalidPlayerStart {
                level,
                position: self.player_start,
            });
        }

        match &self.obstacles {
            ObstaclesConfig::Map { map } => {
                let mut seen = std::collections::HashSet::new();
                for placement in map {
                    let position = placement.position;
                    if !field.contains(position) {
                        return Err(LevelError::ObstacleOutOfBounds {
                            level,
                            position,
                            rows: field.rows,
                            columns: field.columns,
                        });
                    }
                    if !seen.insert(position) {
                        return Err(LevelError::DuplicateObstacle { level, position });
                    }
                    if position == self.player_start {
                        return Err(LevelError::InvalidPlayerStart { level, position });
                    }
                }
            }
            ObstaclesConfig::Random { count, .. } => {
                if count.min > count.max {
                    return Err(LevelError::InvertedCount {
                        level,
                        min: count.min,
                        max: count.max,
                    });
                }
            }
        }

        if self.lives == 0 {
            return Err(LevelError::NoLives { level });
        }

        if !(self.round_duration > 0.0) {
            return Err(LevelError::InvalidRoundDuration {
                level,
                duration: self.round_duration,
            });
        }

        Ok(())
    }

    /// Cells random obstacle placement must avoid: the configured ignore list plus the player start.
    pub fn obstacle_exclusions(&self) -> Vec<GridPosition> {
        match &self.obstacles {
            ObstaclesConfig::Random {
                ignore_positions, ..
            } => {
                let mut excluded = ignore_positions.clone();
                if !excluded.contains(&self.player_start) {
                    excluded.push(self.player_start);
                }
                excluded
            }
            ObstaclesConfig::Map { .. } => Vec::new(),
        }
    }
}
