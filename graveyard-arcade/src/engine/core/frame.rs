use bevy::prelude::*;
use constants::gameplay::MAX_FRAME_DELTA;

/// Frame delta as seen by the simulation, after clamping.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct FrameClock {
    pub delta: f32,
    pub elapsed: f32,
}

/// Cap a raw frame delta so a stalled tab does not teleport the simulation.
pub fn clamp_delta(raw: f32) -> f32 {
    raw.clamp(0.0, MAX_FRAME_DELTA)
}

impl FrameClock {
    pub fn tick(&mut self, raw: f32) {
        self.delta = clamp_delta(raw);
        self.elapsed += self.delta;
    }
}

pub fn advance_frame_clock(time: Res<Time>, mut clock: ResMut<FrameClock>) {
    clock.tick(time.delta_secs());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn large_deltas_are_clamped() {
        assert_eq!(clamp_delta(5.0), 0.1);
        assert_eq!(clamp_delta(0.016), 0.016);
        assert_eq!(clamp_delta(-1.0), 0.0);
    }

    #[test]
    fn clock_accumulates_clamped_time() {
        let mut clock = FrameClock::default();
        clock.tick(5.0);
        clock.tick(0.05);

        assert_eq!(clock.delta, 0.05);
        assert!((clock.elapsed - 0.15).abs() < 1e-6);
    }
}
