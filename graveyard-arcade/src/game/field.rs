use bevy::prelude::*;
use constants::assets::OBSTACLE_FALL_SOUND;
use constants::gameplay::{INVULNERABILITY_DURATION, SWIPE_THRESHOLD};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::engine::scheduler::{DelayedCallId, DelayedCalls};
use crate::game::audio::{PositionalSound, SoundSettings};
use crate::game::consumables::{ConsumableType, ConsumablesController};
use crate::game::events::GameEvent;
use crate::game::grid::{Direction, EntityId, GridPosition};
use crate::game::level::LevelConfig;
use crate::game::obstacles::controller::{IntroCue, ObstaclesController};
use crate::game::obstacles::placement::PlacementError;
use crate::game::session::{GamePhase, GameSession};

/// Pointer drag tracking for swipe control.
#[derive(Debug, Default, Clone, Copy)]
struct DragState {
    pressed: bool,
    anchor: Option<Vec2>,
    last: Option<Vec2>,
}

/// Grid world of the running level: obstacles, collectibles and the player.
///
/// Input arrives through the `on_*` methods; everything the outside world should
/// hear about is queued and drained by the scene adapter once per frame.
#[derive(Resource)]
pub struct GameField {
    level: LevelConfig,
    session: GameSession,
    obstacles: ObstaclesController,
    consumables: ConsumablesController,
    player: EntityId,
    player_position: GridPosition,
    intro_calls: DelayedCalls<IntroCue>,
    intro_finished: Option<DelayedCallId>,
    round_remaining: f32,
    booster_remaining: Option<f32>,
    drag: DragState,
    sound_offset: f32,
    rng: StdRng,
    events: Vec<GameEvent>,
    sounds: Vec<PositionalSound>,
}

impl GameField {
    pub fn new(
        level_index: usize,
        level: LevelConfig,
        sound: &SoundSettings,
        helpers_visible: bool,
        sound_offset: f32,
        rng: StdRng,
    ) -> Self {
        let session = GameSession::new(level_index, level.field, level.lives);

        Self {
            player: EntityId(0),
            player_position: level.player_start,
            round_remaining: level.round_duration,
            level,
            session,
            obstacles: ObstaclesController::new(sound, helpers_visible),
            consumables: ConsumablesController::default(),
            intro_calls: DelayedCalls::default(),
            intro_finished: None,
            booster_remaining: None,
            drag: DragState::default(),
            sound_offset,
            rng,
            events: Vec::new(),
            sounds: Vec::new(),
        }
    }

    /// Seed from OS entropy.
    pub fn with_entropy(
        level_index: usize,
        level: LevelConfig,
        sound: &SoundSettings,
        helpers_visible: bool,
        sound_offset: f32,
    ) -> Self {
        Self::new(
            level_index,
            level,
            sound,
            helpers_visible,
            sound_offset,
            StdRng::from_entropy(),
        )
    }

    /// Build a fresh session: obstacles (hidden), player at its start cell.
    pub fn init_level(&mut self) -> Result<(), PlacementError> {
        self.session = GameSession::new(self.session.level_index, self.level.field, self.level.lives);
        self.obstacles.reset(&mut self.session);
        self.consumables.reset(&mut self.session);

        self.obstacles
            .create_obstacles(&mut self.session, &self.level, &mut self.rng)?;

        self.player = self.session.allocate_id();
        self.player_position = self.level.player_start;
        self.session.maps.player.set(self.player_position, self.player);

        self.round_remaining = self.level.round_duration;
        self.session.phase = GamePhase::Ready;

        self.events.push(GameEvent::LevelReady {
            level: self.session.level_index,
        });
        self.events.push(GameEvent::ScoreChanged(0));
        self.events.push(GameEvent::LivesChanged(self.session.lives));
        self.events.push(GameEvent::RoundChanged(self.session.round));
        Ok(())
    }

    pub fn on_start_game(&mut self) {
        if self.session.phase != GamePhase::Ready {
            debug!("Start ignored in phase {:?}", self.session.phase);
            return;
        }

        self.session.phase = GamePhase::Intro;
        self.intro_finished = Some(self.obstacles.show_intro(
            &self.session,
            &mut self.intro_calls,
            self.sound_offset,
        ));
    }

    /// Tear the round down and play the level again from its intro.
    pub fn on_restart_game(&mut self) -> Result<(), PlacementError> {
        self.reset();
        self.init_level()?;
        self.on_start_game();
        Ok(())
    }

    /// Swap in another level. Takes effect on the next `init_level`.
    pub fn switch_level(&mut self, level_index: usize, level: LevelConfig) {
        self.reset();
        self.level = level;
        self.session.level_index = level_index;
    }

    pub fn reset(&mut self) {
        self.intro_calls.clear();
        self.intro_finished = None;
        if self.booster_remaining.take().is_some() {
            self.events.push(GameEvent::StopBooster);
        }
        self.drag = DragState::default();

        self.obstacles.reset(&mut self.session);
        self.consumables.reset(&mut self.session);
        self.session.maps.player.clear();
        self.session.phase = GamePhase::Idle;
    }

    pub fn on_button_pressed(&mut self, direction: Direction) {
        if self.session.phase != GamePhase::Gameplay {
            return;
        }
        self.events.push(GameEvent::ButtonPressed);

        let Some(target) = self.player_position.step(direction, self.session.field()) else {
            return;
        };
        if self.session.maps.obstacles.is_occupied(target) {
            return;
        }

        self.session.maps.player.remove(self.player_position);
        self.session.maps.player.set(target, self.player);
        self.player_position = target;

        self.collect_at(target);
    }

    pub fn on_pointer_move(&mut self, x: f32, y: f32) {
        let point = Vec2::new(x, y);
        self.drag.last = Some(point);

        if !self.drag.pressed {
            return;
        }
        let Some(anchor) = self.drag.anchor else {
            self.drag.anchor = Some(point);
            return;
        };

        if let Some(direction) = swipe_direction(point - anchor) {
            self.drag.anchor = Some(point);
            self.on_button_pressed(direction);
        }
    }

    pub fn on_pointer_down(&mut self) {
        self.drag.pressed = true;
        self.drag.anchor = self.drag.last;
    }

    pub fn on_pointer_up(&mut self) {
        self.drag.pressed = false;
        self.drag.anchor = None;
    }

    pub fn on_sound_changed(&mut self, settings: &SoundSettings) {
        self.obstacles.on_sound_changed(settings);
    }

    /// Keyboard sound toggle from inside the game.
    pub fn toggle_sound(&mut self, settings: &mut SoundSettings) {
        settings.toggle();
        self.on_sound_changed(settings);
        self.events.push(GameEvent::SoundsEnabledChanged);
    }

    pub fn toggle_fps_meter(&mut self) {
        self.events.push(GameEvent::FpsMeterChanged);
    }

    pub fn toggle_position_helpers(&mut self) -> bool {
        self.obstacles.toggle_position_helpers()
    }

    /// Advance intro cues, animations, boosters and the round clock.
    pub fn update(&mut self, delta: f32) {
        for (id, cue) in self.intro_calls.advance(delta) {
            match cue {
                IntroCue::Reveal(obstacle) => self.obstacles.reveal(obstacle),
                IntroCue::FallSound(obstacle) => self.queue_fall_sound(obstacle),
                IntroCue::Finished => {
                    if self.intro_finished == Some(id) {
                        self.intro_finished = None;
                        self.begin_gameplay();
                    }
                }
            }
        }

        self.obstacles.update(delta);

        if self.session.phase == GamePhase::Gameplay {
            self.update_booster(delta);
            self.update_round_clock(delta);
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn drain_sounds(&mut self) -> Vec<PositionalSound> {
        std::mem::take(&mut self.sounds)
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn obstacles(&self) -> &ObstaclesController {
        &self.obstacles
    }

    pub fn consumables(&self) -> &ConsumablesController {
        &self.consumables
    }

    pub fn player_position(&self) -> GridPosition {
        self.player_position
    }

    pub fn is_invulnerable(&self) -> bool {
        self.booster_remaining.is_some()
    }

    /// Leave the intro. A failed spawn only costs the round its consumables.
    fn begin_gameplay(&mut self) {
        if let Err(err) = self.consumables.spawn_round(
            &mut self.session,
            &self.level.consumables,
            self.player_position,
            &mut self.rng,
        ) {
            warn!("Gameplay starts without consumables: {}", err);
        }

        self.round_remaining = self.level.round_duration;
        self.session.phase = GamePhase::Gameplay;
        self.events.push(GameEvent::GameplayStarted);
        info!("Gameplay started on level {}", self.session.level_index);
    }

    fn collect_at(&mut self, position: GridPosition) {
        let Some(item) = self.consumables.collect(&mut self.session, position) else {
            return;
        };

        self.events.push(GameEvent::ConsumableCollected {
            kind: item.kind,
            position,
        });

        match item.kind {
            ConsumableType::Candy => {
                self.session.score += 1;
                self.events.push(GameEvent::ScoreChanged(self.session.score));
            }
            ConsumableType::Shield => {
                self.booster_remaining = Some(INVULNERABILITY_DURATION);
                self.events.push(GameEvent::StartInvulnerabilityBooster {
                    duration: INVULNERABILITY_DURATION,
                });
            }
        }

        if self.consumables.is_round_cleared() {
            self.next_round();
        }
    }

    fn next_round(&mut self) {
        self.session.round += 1;
        self.round_remaining = self.level.round_duration;
        self.events.push(GameEvent::RoundChanged(self.session.round));

        if let Err(err) = self.consumables.spawn_round(
            &mut self.session,
            &self.level.consumables,
            self.player_position,
            &mut self.rng,
        ) {
            warn!("Round {} starts without consumables: {}", self.session.round, err);
        }
    }

    fn update_booster(&mut self, delta: f32) {
        let Some(remaining) = self.booster_remaining.as_mut() else {
            return;
        };

        *remaining -= delta;
        if *remaining <= 0.0 {
            self.booster_remaining = None;
            self.events.push(GameEvent::StopBooster);
        }
    }

    fn update_round_clock(&mut self, delta: f32) {
        self.round_remaining -= delta;
        if self.round_remaining > 0.0 {
            return;
        }
        self.round_remaining = self.level.round_duration;

        if self.is_invulnerable() {
            debug!("Round clock ran out while shielded");
            return;
        }

        self.session.lives = self.session.lives.saturating_sub(1);
        self.events.push(GameEvent::LivesChanged(self.session.lives));

        if self.session.lives == 0 {
            self.session.phase = GamePhase::GameOver;
            self.events.push(GameEvent::GameOver);
            info!("Game over with score {}", self.session.score);
        }
    }

    fn queue_fall_sound(&mut self, obstacle: EntityId) {
        let Some(obstacle) = self.obstacles.obstacle(obstacle) else {
            return;
        };

        self.sounds.push(PositionalSound {
            key: OBSTACLE_FALL_SOUND,
            position: obstacle.position().to_world(self.session.field()),
            volume: self.obstacles.fall_sound_volume(),
        });
    }
}

/// Dominant-axis direction of a drag, once it passes the swipe threshold.
/// Stage y grows downwards.
pub fn swipe_direction(delta: Vec2) -> Option<Direction> {
    if delta.x.abs() >= delta.y.abs() {
        if delta.x > SWIPE_THRESHOLD {
            Some(Direction::Right)
        } else if delta.x < -SWIPE_THRESHOLD {
            Some(Direction::Left)
        } else {
            None
        }
    } else if delta.y > SWIPE_THRESHOLD {
        Some(Direction::Down)
    } else if delta.y < -SWIPE_THRESHOLD {
        Some(Direction::Up)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::level::tests::map_level;
    use crate::game::grid::FieldSize;
    use crate::game::level::{ConsumablesConfig, ObstaclePlacement};
    use crate::game::obstacles::obstacle::ObstacleType;

    fn field_with(level: LevelConfig) -> GameField {
        GameField::new(
            0,
            level,
            &SoundSettings::default(),
            false,
            0.4,
            StdRng::seed_from_u64(21),
        )
    }

    /// 1x4 corridor, grave at the far end, player on the left.
    fn corridor() -> GameField {
        let mut level = map_level(
            1,
            4,
            vec![ObstaclePlacement {
                obstacle_type: ObstacleType::Grave05,
                position: GridPosition::new(0, 3),
            }],
        );
        level.consumables = ConsumablesConfig {
            candies: 2,
            shields: 0,
        };
        field_with(level)
    }

    fn run_intro(field: &mut GameField) {
        for _ in 0..100 {
            field.update(0.05);
            if field.session().phase == GamePhase::Gameplay {
                return;
            }
        }
        panic!("intro never finished");
    }

    #[test]
    fn start_plays_intro_then_gameplay() {
        let mut field = corridor();
        field.init_level().unwrap();
        assert_eq!(field.session().phase, GamePhase::Ready);
        field.drain_events();

        field.on_start_game();
        assert_eq!(field.session().phase, GamePhase::Intro);

        run_intro(&mut field);
        // The landing sound trails the reveal.
        field.update(0.5);

        let events = field.drain_events();
        assert_eq!(
            events.iter().filter(|e| **e == GameEvent::GameplayStarted).count(),
            1
        );
        assert!(field.obstacles().obstacles().iter().all(|o| o.is_visible()));

        let sounds = field.drain_sounds();
        assert_eq!(sounds.len(), 1);
        assert_eq!(sounds[0].key, OBSTACLE_FALL_SOUND);
    }

    #[test]
    fn dense_map_still_reaches_gameplay() {
        let open = [GridPosition::new(0, 0), GridPosition::new(5, 5)];
        let player = GridPosition::new(9, 9);
        let map = FieldSize::new(10, 10)
            .cells()
            .filter(|cell| *cell != player && !open.contains(cell))
            .map(|position| ObstaclePlacement {
                obstacle_type: ObstacleType::Grave02,
                position,
            })
            .collect();
        let mut level = map_level(10, 10, map);
        level.player_start = player;
        level.consumables = ConsumablesConfig {
            candies: 2,
            shields: 0,
        };

        for seed in 0..50 {
            let mut field = GameField::new(
                0,
                level.clone(),
                &SoundSettings::default(),
                false,
                0.4,
                StdRng::seed_from_u64(seed),
            );
            field.init_level().unwrap();
            field.on_start_game();
            for _ in 0..400 {
                field.update(0.05);
            }

            assert_eq!(field.session().phase, GamePhase::Gameplay);
            let cells: Vec<_> = field.consumables().items().iter().map(|c| c.position).collect();
            assert_eq!(cells.len(), 2);
            assert!(cells.iter().all(|cell| open.contains(cell)));
        }
    }

    #[test]
    fn input_ignored_outside_gameplay() {
        let mut field = corridor();
        field.init_level().unwrap();
        field.drain_events();

        field.on_button_pressed(Direction::Right);
        assert_eq!(field.player_position(), GridPosition::new(0, 0));
        assert!(field.drain_events().is_empty());
    }

    #[test]
    fn corridor_collects_both_candies_and_advances_round() {
        let mut field = corridor();
        field.init_level().unwrap();
        field.on_start_game();
        run_intro(&mut field);
        field.drain_events();

        // Candies fill the two free cells (0, 1) and (0, 2).
        field.on_button_pressed(Direction::Right);
        field.on_button_pressed(Direction::Right);
        // Blocked by the grave.
        field.on_button_pressed(Direction::Right);

        assert_eq!(field.player_position(), GridPosition::new(0, 2));
        assert_eq!(field.session().score, 2);
        assert_eq!(field.session().round, 2);

        let events = field.drain_events();
        assert!(events.contains(&GameEvent::ScoreChanged(2)));
        assert!(events.contains(&GameEvent::RoundChanged(2)));
        assert_eq!(
            events.iter().filter(|e| **e == GameEvent::ButtonPressed).count(),
            3
        );
        assert_eq!(
            field.session().maps.player.get(GridPosition::new(0, 2)),
            Some(field.player)
        );
        assert_eq!(field.session().maps.player.occupied_count(), 1);
    }

    #[test]
    fn swipe_moves_player() {
        let mut field = corridor();
        field.init_level().unwrap();
        field.on_start_game();
        run_intro(&mut field);

        field.on_pointer_move(100.0, 100.0);
        field.on_pointer_down();
        field.on_pointer_move(120.0, 105.0);
        assert_eq!(field.player_position(), GridPosition::new(0, 0));

        field.on_pointer_move(150.0, 110.0);
        assert_eq!(field.player_position(), GridPosition::new(0, 1));

        field.on_pointer_up();
        field.on_pointer_move(300.0, 110.0);
        assert_eq!(field.player_position(), GridPosition::new(0, 1));
    }

    #[test]
    fn running_out_of_lives_ends_the_game() {
        let mut level = map_level(3, 3, vec![]);
        level.lives = 2;
        level.round_duration = 1.0;
        let mut field = field_with(level);
        field.init_level().unwrap();
        field.on_start_game();
        run_intro(&mut field);
        field.drain_events();

        field.update(1.05);
        assert_eq!(field.session().lives, 1);
        field.update(1.05);

        assert_eq!(field.session().phase, GamePhase::GameOver);
        let events = field.drain_events();
        assert!(events.contains(&GameEvent::LivesChanged(0)));
        assert!(events.contains(&GameEvent::GameOver));

        field.on_button_pressed(Direction::Down);
        assert_eq!(field.player_position(), GridPosition::new(0, 0));
    }

    #[test]
    fn shield_absorbs_round_timeout_then_expires() {
        let mut level = map_level(1, 2, vec![]);
        level.consumables = ConsumablesConfig {
            candies: 0,
            shields: 1,
        };
        level.round_duration = 2.0;
        let mut field = field_with(level);
        field.init_level().unwrap();
        field.on_start_game();
        run_intro(&mut field);
        field.drain_events();

        field.on_button_pressed(Direction::Right);
        assert!(field.is_invulnerable());

        field.update(2.5);
        assert_eq!(field.session().lives, 2);

        field.update(INVULNERABILITY_DURATION);
        assert!(!field.is_invulnerable());
        let events = field.drain_events();
        assert!(events.contains(&GameEvent::StartInvulnerabilityBooster {
            duration: INVULNERABILITY_DURATION
        }));
        assert!(events.contains(&GameEvent::StopBooster));
    }

    #[test]
    fn restart_rebuilds_a_clean_session() {
        let mut field = corridor();
        field.init_level().unwrap();
        field.on_start_game();
        run_intro(&mut field);
        field.on_button_pressed(Direction::Right);
        assert_eq!(field.session().score, 1);

        field.on_restart_game().unwrap();

        assert_eq!(field.session().phase, GamePhase::Intro);
        assert_eq!(field.session().score, 0);
        assert_eq!(field.player_position(), GridPosition::new(0, 0));
        assert_eq!(field.session().maps.obstacles.occupied_count(), 1);
        assert_eq!(field.session().maps.consumables.occupied_count(), 0);
        assert!(field.obstacles().obstacles().iter().all(|o| !o.is_visible()));
    }

    #[test]
    fn sound_toggle_reaches_obstacles() {
        let mut field = corridor();
        let mut settings = SoundSettings::default();

        field.toggle_sound(&mut settings);
        assert!(!settings.enabled);
        assert_eq!(field.obstacles().fall_sound_volume(), 0.0);
        assert_eq!(field.drain_events(), vec![GameEvent::SoundsEnabledChanged]);
    }

    #[test]
    fn swipe_needs_threshold_on_dominant_axis() {
        assert_eq!(swipe_direction(Vec2::new(SWIPE_THRESHOLD * 0.5, 0.0)), None);
        assert_eq!(
            swipe_direction(Vec2::new(-SWIPE_THRESHOLD - 1.0, 5.0)),
            Some(Direction::Left)
        );
        assert_eq!(
            swipe_direction(Vec2::new(3.0, SWIPE_THRESHOLD + 1.0)),
            Some(Direction::Down)
        );
        assert_eq!(
            swipe_direction(Vec2::new(0.0, -SWIPE_THRESHOLD - 1.0)),
            Some(Direction::Up)
        );
    }
}
