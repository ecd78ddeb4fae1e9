use bevy::prelude::*;

use crate::engine::loading::progress::LoadingProgress;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    Loading,
    Running,
    /// A required asset was missing or invalid; the loading overlay shows why.
    LoadFailed,
}

/// Move on once every asset has settled, or bail out on the first hard failure.
pub fn transition_after_loading(
    loading_progress: Res<LoadingProgress>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if let Some(error) = &loading_progress.error {
        error!("Loading failed: {}", error);
        next_state.set(AppState::LoadFailed);
        return;
    }

    if loading_progress.is_complete() {
        info!("→ Assets loaded, transitioning to Running state");
        next_state.set(AppState::Running);
    }
}
