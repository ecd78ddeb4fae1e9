use bevy::prelude::*;

/// Load outcome of a single tracked asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetStatus {
    Pending,
    Loaded,
    /// Optional asset that could not be loaded; the game runs without it.
    Missing,
}

#[derive(Resource, Default, Debug)]
pub struct LoadingProgress {
    pub levels_loaded: bool,
    pub audio: Vec<(String, AssetStatus)>,
    /// Set when a required asset failed; loading stops here.
    pub error: Option<String>,
}

impl LoadingProgress {
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
            && self.levels_loaded
            && self
                .audio
                .iter()
                .all(|(_, status)| *status != AssetStatus::Pending)
    }

    /// Fraction of tracked assets that have settled, for the loading overlay.
    pub fn fraction(&self) -> f32 {
        let total = self.audio.len() + 1;
        let settled = usize::from(self.levels_loaded)
            + self
                .audio
                .iter()
                .filter(|(_, status)| *status != AssetStatus::Pending)
                .count();
        settled as f32 / total as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_audio_does_not_block_completion() {
        let mut progress = LoadingProgress {
            levels_loaded: true,
            audio: vec![("obstacle-fall".into(), AssetStatus::Pending)],
            error: None,
        };
        assert!(!progress.is_complete());
        assert_eq!(progress.fraction(), 0.5);

        progress.audio[0].1 = AssetStatus::Missing;
        assert!(progress.is_complete());
        assert_eq!(progress.fraction(), 1.0);
    }

    #[test]
    fn errors_block_completion() {
        let progress = LoadingProgress {
            levels_loaded: true,
            audio: vec![],
            error: Some("bad level".into()),
        };
        assert!(!progress.is_complete());
    }
}
