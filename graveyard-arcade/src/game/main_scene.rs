use bevy::prelude::*;
use constants::debug::{POSITION_HELPERS, START_FROM_GAMEPLAY};
use constants::gameplay::ROUNDS_TO_ADVANCE;
use constants::scene::BACKGROUND_COLOR;

use crate::engine::camera::viewport::DeviceProfile;
use crate::engine::core::app_state::AppState;
use crate::engine::core::frame::FrameClock;
use crate::engine::loading::progress::LoadingProgress;
use crate::game::audio::{PositionalSound, SoundSettings};
use crate::game::events::{GameEvent, UiEvent};
use crate::game::field::GameField;
use crate::game::level::LevelCatalog;
use crate::game::session::GameSession;

/// Build the first level once assets are in and hand it to the field.
pub fn after_assets_load(
    mut commands: Commands,
    catalog: Option<Res<LevelCatalog>>,
    device: Res<DeviceProfile>,
    sound: Res<SoundSettings>,
    mut progress: ResMut<LoadingProgress>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    commands.insert_resource(ClearColor(BACKGROUND_COLOR));

    let level = match catalog.as_deref().map(|catalog| catalog.level(0)) {
        Some(Ok(level)) => level.clone(),
        Some(Err(err)) => return fail(&mut progress, &mut next_state, err.to_string()),
        None => {
            return fail(
                &mut progress,
                &mut next_state,
                "Level catalog is not available".to_string(),
            );
        }
    };

    let mut field = GameField::with_entropy(
        0,
        level,
        &sound,
        POSITION_HELPERS,
        device.intro_sound_offset(),
    );

    if let Err(err) = field.init_level() {
        return fail(
            &mut progress,
            &mut next_state,
            format!("Could not build level 0: {err}"),
        );
    }

    if START_FROM_GAMEPLAY {
        info!("Starting straight into gameplay");
        field.on_start_game();
    }

    info!(
        "Level 0 ready: {}x{} field, {} obstacles",
        field.session().field().rows,
        field.session().field().columns,
        field.obstacles().obstacles().len()
    );
    commands.insert_resource(field);
}

fn fail(progress: &mut LoadingProgress, next_state: &mut NextState<AppState>, message: String) {
    error!("{}", message);
    progress.error = Some(message);
    next_state.set(AppState::LoadFailed);
}

/// Level to play after a restart: the next one (wrapping) once enough rounds
/// were cleared, otherwise the same one again.
pub fn level_after_restart(session: &GameSession, level_count: usize) -> usize {
    let cleared = session.round.saturating_sub(1);
    if cleared < ROUNDS_TO_ADVANCE || level_count == 0 {
        return session.level_index;
    }
    (session.level_index + 1) % level_count
}

fn advance_level(field: &mut GameField, catalog: &LevelCatalog) {
    let next = level_after_restart(field.session(), catalog.levels.len());
    if next == field.session().level_index {
        return;
    }

    match catalog.level(next) {
        Ok(level) => {
            info!("Advancing to level {}", next);
            field.switch_level(next, level.clone());
        }
        Err(err) => warn!("Staying on level {}: {}", field.session().level_index, err),
    }
}

/// Route semantic UI input to the field.
pub fn relay_ui_events(
    mut events: EventReader<UiEvent>,
    mut field: ResMut<GameField>,
    catalog: Option<Res<LevelCatalog>>,
    sound: Res<SoundSettings>,
) {
    for event in events.read() {
        match *event {
            UiEvent::StartGame => field.on_start_game(),
            UiEvent::RestartGame => {
                if let Some(catalog) = catalog.as_deref() {
                    advance_level(&mut field, catalog);
                }
                if let Err(err) = field.on_restart_game() {
                    error!("Restart failed: {}", err);
                }
            }
            UiEvent::Direction(direction) => field.on_button_pressed(direction),
            UiEvent::PointerMove { x, y } => field.on_pointer_move(x, y),
            UiEvent::PointerDown => field.on_pointer_down(),
            UiEvent::PointerUp => field.on_pointer_up(),
            UiEvent::SoundChanged => field.on_sound_changed(&sound),
        }
    }
}

/// Advance the simulation by the clamped frame delta.
pub fn update_field(clock: Res<FrameClock>, mut field: ResMut<GameField>) {
    field.update(clock.delta);
}

/// Publish what the field queued this frame to the rest of the app.
pub fn publish_field_events(
    mut field: ResMut<GameField>,
    mut game_events: EventWriter<GameEvent>,
    mut sounds: EventWriter<PositionalSound>,
) {
    game_events.write_batch(field.drain_events());
    sounds.write_batch(field.drain_sounds());
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::state::app::StatesPlugin;

    use crate::game::add_simulation;
    use crate::game::grid::{Direction, GridPosition};
    use crate::game::level::tests::map_level;
    use crate::game::level::{ConsumablesConfig, LevelConfig};
    use crate::game::session::GamePhase;

    /// 1x3 corridor without graves, one candy per round.
    fn corridor(lives: u32) -> LevelConfig {
        let mut level = map_level(1, 3, vec![]);
        level.lives = lives;
        level.consumables = ConsumablesConfig {
            candies: 1,
            shields: 0,
        };
        level
    }

    fn headless_app(levels: Vec<LevelConfig>) -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .init_state::<AppState>()
            .init_resource::<LoadingProgress>()
            .insert_resource(DeviceProfile::default())
            .insert_resource(LevelCatalog { levels });
        add_simulation(&mut app);
        app
    }

    fn enter_running(app: &mut App) {
        app.world_mut()
            .resource_mut::<NextState<AppState>>()
            .set(AppState::Running);
        app.update();
    }

    fn published(app: &App) -> Vec<GameEvent> {
        let events = app.world().resource::<Events<GameEvent>>();
        events.get_cursor().read(events).copied().collect()
    }

    fn phase(app: &App) -> GamePhase {
        app.world().resource::<GameField>().session().phase
    }

    #[test]
    fn simulation_waits_for_running_state() {
        let mut app = headless_app(vec![corridor(3)]);
        app.world_mut().send_event(UiEvent::StartGame);
        for _ in 0..3 {
            app.update();
        }

        assert!(app.world().get_resource::<GameField>().is_none());
        assert_eq!(app.world().resource::<FrameClock>().elapsed, 0.0);

        enter_running(&mut app);
        assert_eq!(phase(&app), GamePhase::Ready);
        assert!(published(&app).contains(&GameEvent::ScoreChanged(0)));
    }

    #[test]
    fn ui_events_reach_the_field() {
        let mut app = headless_app(vec![corridor(3)]);
        enter_running(&mut app);

        app.world_mut().send_event(UiEvent::StartGame);
        app.update();
        assert_eq!(phase(&app), GamePhase::Intro);

        // No graves, so the intro finishes after its trailing buffer.
        app.world_mut()
            .resource_mut::<GameField>()
            .update(1.0);
        assert_eq!(phase(&app), GamePhase::Gameplay);

        app.world_mut()
            .send_event(UiEvent::Direction(Direction::Right));
        app.update();
        let field = app.world().resource::<GameField>();
        assert_eq!(field.player_position(), GridPosition::new(0, 1));
        assert!(published(&app).contains(&GameEvent::ButtonPressed));
    }

    #[test]
    fn failed_level_moves_to_load_failed() {
        let mut app = headless_app(vec![]);
        enter_running(&mut app);
        app.update();

        assert!(app.world().get_resource::<GameField>().is_none());
        assert_eq!(
            *app.world().resource::<State<AppState>>().get(),
            AppState::LoadFailed
        );
        assert!(app.world().resource::<LoadingProgress>().error.is_some());
    }

    #[test]
    fn restart_advances_only_after_enough_rounds() {
        let mut session = GameSession::new(1, corridor(3).field, 3);
        assert_eq!(level_after_restart(&session, 3), 1);

        session.round = ROUNDS_TO_ADVANCE + 1;
        assert_eq!(level_after_restart(&session, 3), 2);

        session.level_index = 2;
        assert_eq!(level_after_restart(&session, 3), 0);
        assert_eq!(level_after_restart(&session, 0), 2);
    }

    #[test]
    fn restart_switches_to_the_next_level() {
        let mut second = map_level(4, 4, vec![]);
        second.lives = 5;
        let mut app = headless_app(vec![corridor(3), second]);
        enter_running(&mut app);

        {
            let mut field = app.world_mut().resource_mut::<GameField>();
            field.on_start_game();
            field.update(1.0);
            // Clear enough rounds by walking onto the single candy each time.
            for _ in 0..ROUNDS_TO_ADVANCE {
                let candy = field.consumables().items()[0].position;
                let direction = if candy.column > field.player_position().column {
                    Direction::Right
                } else {
                    Direction::Left
                };
                while field.player_position() != candy {
                    field.on_button_pressed(direction);
                }
            }
            assert_eq!(field.session().round, ROUNDS_TO_ADVANCE + 1);
        }

        app.world_mut().send_event(UiEvent::RestartGame);
        app.update();

        let field = app.world().resource::<GameField>();
        assert_eq!(field.session().level_index, 1);
        assert_eq!(field.session().lives, 5);
        assert_eq!(field.session().field().rows, 4);
        assert_eq!(field.session().phase, GamePhase::Intro);
    }
}
