use crate::game::grid::{EntityId, FieldSize, GameMaps};

/// Where the current round is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    /// No level has been initialised yet.
    #[default]
    Idle,
    /// Level built, waiting for the start button.
    Ready,
    /// Obstacle intro is playing.
    Intro,
    Gameplay,
    GameOver,
}

/// Per-session world state shared by the field controllers.
///
/// One session exists per level run; restarting builds a fresh one.
#[derive(Debug, Clone)]
pub struct GameSession {
    pub level_index: usize,
    pub maps: GameMaps,
    pub phase: GamePhase,
    pub score: u32,
    pub lives: u32,
    pub round: u32,
    next_entity_id: u32,
}

impl GameSession {
    pub fn new(level_index: usize, field: FieldSize, lives: u32) -> Self {
        Self {
            level_index,
            maps: GameMaps::new(field),
            phase: GamePhase::Idle,
            score: 0,
            lives,
            round: 1,
            next_entity_id: 0,
        }
    }

    pub fn field(&self) -> FieldSize {
        self.maps.size()
    }

    /// Hand out an id unique within this session.
    pub fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_entity_id);
        self.next_entity_id += 1;
        id
    }
}
