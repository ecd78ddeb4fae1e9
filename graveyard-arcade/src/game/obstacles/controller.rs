use bevy::prelude::*;
use constants::gameplay::{INTRO_DELAY_STEP, INTRO_TRAILING_STEPS};
use rand::Rng;
use rand::seq::SliceRandom;

use super::obstacle::{Obstacle, ObstacleType};
use super::placement::{PlacementError, random_positions};
use crate::engine::scheduler::{DelayedCallId, DelayedCalls};
use crate::game::audio::SoundSettings;
use crate::game::grid::{EntityId, GridPosition};
use crate::game::level::{LevelConfig, ObstaclePlacement, ObstaclesConfig};
use crate::game::session::GameSession;

/// Timed steps of the obstacle intro.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IntroCue {
    Reveal(EntityId),
    FallSound(EntityId),
    Finished,
}

/// Debug marker outlining the cell an obstacle sits on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionHelper {
    pub obstacle: EntityId,
    pub position: GridPosition,
}

/// Owns every obstacle of the running level.
#[derive(Debug, Default)]
pub struct ObstaclesController {
    obstacles: Vec<Obstacle>,
    position_helpers: Vec<PositionHelper>,
    helpers_visible: bool,
    fall_sound_volume: f32,
}

impl ObstaclesController {
    pub fn new(sound: &SoundSettings, helpers_visible: bool) -> Self {
        Self {
            obstacles: Vec::new(),
            position_helpers: Vec::new(),
            helpers_visible,
            fall_sound_volume: sound.obstacle_fall(),
        }
    }

    /// Build the level's obstacles and register them in the session's obstacle layer.
    /// Obstacles start hidden until the intro reveals them.
    pub fn create_obstacles<R: Rng + ?Sized>(
        &mut self,
        session: &mut GameSession,
        level: &LevelConfig,
        rng: &mut R,
    ) -> Result<usize, PlacementError> {
        let placements = match &level.obstacles {
            ObstaclesConfig::Map { map } => map.clone(),
            ObstaclesConfig::Random { count, .. } => {
                let count = rng.gen_range(count.min..=count.max);
                random_placements(level, count, rng)?
            }
        };

        for placement in placements {
            let id = session.allocate_id();
            self.obstacles
                .push(Obstacle::new(id, placement.obstacle_type, placement.position));
        }

        self.create_position_helpers();
        self.init_map(session);

        info!(
            "Created {} obstacles for level {}",
            self.obstacles.len(),
            session.level_index
        );
        Ok(self.obstacles.len())
    }

    /// Schedule the staggered reveal, one landing sound per obstacle, and a completion
    /// call after the last reveal. Obstacles are visited in row-major map order.
    pub fn show_intro(
        &self,
        session: &GameSession,
        calls: &mut DelayedCalls<IntroCue>,
        sound_offset: f32,
    ) -> DelayedCallId {
        let mut delay = 0.0;

        for (_, id) in session.maps.obstacles.occupied() {
            calls.call(delay, IntroCue::Reveal(id));
            calls.call(delay + sound_offset, IntroCue::FallSound(id));
            delay += INTRO_DELAY_STEP;
        }

        calls.call(delay + INTRO_DELAY_STEP * INTRO_TRAILING_STEPS, IntroCue::Finished)
    }

    /// Start an obstacle's fall. Unknown ids are ignored.
    pub fn reveal(&mut self, id: EntityId) {
        if let Some(obstacle) = self.obstacles.iter_mut().find(|o| o.id() == id) {
            obstacle.start_intro();
        }
    }

    pub fn update(&mut self, delta: f32) {
        self.obstacles
            .iter_mut()
            .for_each(|obstacle| obstacle.update(delta));
    }

    /// Drop every obstacle and helper and empty the obstacle layer.
    pub fn reset(&mut self, session: &mut GameSession) {
        self.obstacles.clear();
        self.position_helpers.clear();
        session.maps.obstacles.clear();
    }

    pub fn on_sound_changed(&mut self, settings: &SoundSettings) {
        self.fall_sound_volume = settings.obstacle_fall();
    }

    pub fn fall_sound_volume(&self) -> f32 {
        self.fall_sound_volume
    }

    pub fn obstacle_at(&self, position: GridPosition) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.position() == position)
    }

    pub fn obstacle(&self, id: EntityId) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.id() == id)
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn position_helpers(&self) -> &[PositionHelper] {
        &self.position_helpers
    }

    pub fn helpers_visible(&self) -> bool {
        self.helpers_visible
    }

    /// Flip helper visibility and re-sync each helper with its obstacle.
    pub fn toggle_position_helpers(&mut self) -> bool {
        self.helpers_visible = !self.helpers_visible;

        for (helper, obstacle) in self.position_helpers.iter_mut().zip(&self.obstacles) {
            helper.position = obstacle.position();
        }
        self.helpers_visible
    }

    fn create_position_helpers(&mut self) {
        self.position_helpers = self
            .obstacles
            .iter()
            .map(|obstacle| PositionHelper {
                obstacle: obstacle.id(),
                position: obstacle.position(),
            })
            .collect();
    }

    fn init_map(&self, session: &mut GameSession) {
        let obstacle_map = &mut session.maps.obstacles;

        for obstacle in &self.obstacles {
            if let Some(previous) = obstacle_map.set(obstacle.position(), obstacle.id()) {
                warn!(
                    "Obstacle {:?} replaced {:?} at {}",
                    obstacle.id(),
                    previous,
                    obstacle.position()
                );
            }
        }
    }
}

fn random_placements<R: Rng + ?Sized>(
    level: &LevelConfig,
    count: usize,
    rng: &mut R,
) -> Result<Vec<ObstaclePlacement>, PlacementError> {
    let positions = random_positions(level.field, count, &level.obstacle_exclusions(), rng)?;

    Ok(positions
        .into_iter()
        .map(|position| ObstaclePlacement {
            obstacle_type: *ObstacleType::ALL
                .choose(rng)
                .unwrap_or(&ObstacleType::Grave01),
            position,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::level::tests::{map_level, random_level};
    use constants::gameplay::INTRO_SOUND_OFFSET_DESKTOP;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn session_for(level: &LevelConfig) -> GameSession {
        GameSession::new(0, level.field, level.lives)
    }

    fn controller() -> ObstaclesController {
        ObstaclesController::new(&SoundSettings::default(), false)
    }

    #[test]
    fn random_level_places_requested_count() {
        let level = random_level(5, 5, 3, 3);
        let mut session = session_for(&level);
        let mut obstacles = controller();
        let mut rng = StdRng::seed_from_u64(11);

        let created = obstacles
            .create_obstacles(&mut session, &level, &mut rng)
            .unwrap();

        assert_eq!(created, 3);
        assert_eq!(session.maps.obstacles.occupied_count(), 3);

        let cells: HashSet<_> = session
            .maps
            .obstacles
            .occupied()
            .map(|(position, _)| position)
            .collect();
        assert_eq!(cells.len(), 3);
        assert!(!cells.contains(&GridPosition::new(0, 0)));
        assert!(cells.iter().all(|p| p.row <= 4 && p.column <= 4));
    }

    #[test]
    fn random_count_stays_in_range() {
        let level = random_level(6, 6, 2, 5);
        for seed in 0..50 {
            let mut session = session_for(&level);
            let mut obstacles = controller();
            let mut rng = StdRng::seed_from_u64(seed);

            let created = obstacles
                .create_obstacles(&mut session, &level, &mut rng)
                .unwrap();
            assert!((2..=5).contains(&created));
            assert_eq!(session.maps.obstacles.occupied_count(), created);
        }
    }

    #[test]
    fn explicit_map_registers_single_cell() {
        let level = map_level(
            5,
            5,
            vec![ObstaclePlacement {
                obstacle_type: ObstacleType::Grave01,
                position: GridPosition::new(1, 2),
            }],
        );
        let mut session = session_for(&level);
        let mut obstacles = controller();
        let mut rng = StdRng::seed_from_u64(0);

        obstacles
            .create_obstacles(&mut session, &level, &mut rng)
            .unwrap();

        let id = session.maps.obstacles.get(GridPosition::new(1, 2)).unwrap();
        let obstacle = obstacles.obstacle(id).unwrap();
        assert_eq!(obstacle.obstacle_type(), ObstacleType::Grave01);
        assert_eq!(obstacle.position(), GridPosition::new(1, 2));
        assert_eq!(session.maps.obstacles.occupied_count(), 1);
        assert_eq!(obstacles.position_helpers().len(), 1);
        assert!(!obstacle.is_visible());
    }

    #[test]
    fn reset_then_create_leaves_only_new_obstacles() {
        let level = random_level(5, 5, 4, 4);
        let mut session = session_for(&level);
        let mut obstacles = controller();
        let mut rng = StdRng::seed_from_u64(5);

        obstacles
            .create_obstacles(&mut session, &level, &mut rng)
            .unwrap();
        let first_ids: HashSet<_> = obstacles.obstacles().iter().map(|o| o.id()).collect();

        obstacles.reset(&mut session);
        assert_eq!(session.maps.obstacles.occupied_count(), 0);
        assert!(obstacles.position_helpers().is_empty());

        obstacles
            .create_obstacles(&mut session, &level, &mut rng)
            .unwrap();

        assert_eq!(obstacles.obstacles().len(), 4);
        assert_eq!(session.maps.obstacles.occupied_count(), 4);
        for (position, id) in session.maps.obstacles.occupied() {
            assert!(!first_ids.contains(&id));
            assert_eq!(obstacles.obstacle(id).unwrap().position(), position);
        }
    }

    #[test]
    fn overconstrained_level_fails() {
        let level = random_level(2, 2, 4, 4);
        let mut session = session_for(&level);
        let mut obstacles = controller();
        let mut rng = StdRng::seed_from_u64(0);

        let result = obstacles.create_obstacles(&mut session, &level, &mut rng);
        assert!(matches!(
            result,
            Err(PlacementError::InsufficientCells { requested: 4, available: 3, .. })
        ));
        assert_eq!(session.maps.obstacles.occupied_count(), 0);
    }

    #[test]
    fn intro_completes_after_last_reveal_once() {
        let level = map_level(
            3,
            3,
            vec![
                ObstaclePlacement {
                    obstacle_type: ObstacleType::Grave02,
                    position: GridPosition::new(2, 2),
                },
                ObstaclePlacement {
                    obstacle_type: ObstacleType::Grave04,
                    position: GridPosition::new(0, 1),
                },
            ],
        );
        let mut session = session_for(&level);
        let mut obstacles = controller();
        let mut rng = StdRng::seed_from_u64(0);
        obstacles
            .create_obstacles(&mut session, &level, &mut rng)
            .unwrap();

        let mut calls = DelayedCalls::default();
        let finished = obstacles.show_intro(&session, &mut calls, INTRO_SOUND_OFFSET_DESKTOP);

        let mut reveals = Vec::new();
        let mut finished_at = Vec::new();
        let step = 0.01;
        for _ in 0..200 {
            for (id, cue) in calls.advance(step) {
                match cue {
                    IntroCue::Reveal(obstacle) => {
                        reveals.push((calls.elapsed(), obstacle));
                        obstacles.reveal(obstacle);
                    }
                    IntroCue::Finished => {
                        assert_eq!(id, finished);
                        finished_at.push(calls.elapsed());
                    }
                    IntroCue::FallSound(_) => {}
                }
            }
        }

        // Row-major order: (0, 1) before (2, 2).
        let first = session.maps.obstacles.get(GridPosition::new(0, 1)).unwrap();
        let second = session.maps.obstacles.get(GridPosition::new(2, 2)).unwrap();
        assert_eq!(reveals.iter().map(|(_, id)| *id).collect::<Vec<_>>(), vec![first, second]);

        assert_eq!(finished_at.len(), 1);
        let last_reveal = reveals.last().unwrap().0;
        assert!(finished_at[0] > last_reveal);
        assert!(obstacles.obstacles().iter().all(|o| o.is_visible()));
    }

    #[test]
    fn sound_volume_follows_settings() {
        let mut settings = SoundSettings::default();
        let mut obstacles = ObstaclesController::new(&settings, false);
        assert!(obstacles.fall_sound_volume() > 0.0);

        settings.enabled = false;
        obstacles.on_sound_changed(&settings);
        assert_eq!(obstacles.fall_sound_volume(), 0.0);

        settings.enabled = true;
        settings.master_volume = 0.5;
        settings.obstacle_fall_volume = 0.4;
        obstacles.on_sound_changed(&settings);
        assert!((obstacles.fall_sound_volume() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn lookup_misses_return_none() {
        let obstacles = controller();
        assert!(obstacles.obstacle_at(GridPosition::new(0, 0)).is_none());
    }
}
