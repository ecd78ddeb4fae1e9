use bevy::audio::SpatialListener;
use bevy::pbr::{DistanceFog, FogFalloff};
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};
use constants::gameplay::{INTRO_SOUND_OFFSET_DESKTOP, INTRO_SOUND_OFFSET_MOBILE};
use constants::scene::{
    BACKGROUND_COLOR, CAMERA_FAR, CAMERA_NEAR, CAMERA_POSITION, FOG_DESKTOP, FOG_ENABLED,
    FOG_MOBILE_LANDSCAPE, FOG_MOBILE_PORTRAIT, FOV_DESKTOP, FOV_MOBILE_LANDSCAPE,
    FOV_MOBILE_PORTRAIT, FogRange, MAX_PIXEL_RATIO,
};
use constants::sound::LISTENER_EAR_GAP;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Device class detected once at startup.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceProfile {
    pub is_mobile: bool,
}

impl DeviceProfile {
    pub fn detect() -> Self {
        Self {
            is_mobile: detect_mobile(),
        }
    }

    /// Delay between an obstacle reveal and its landing sound.
    pub fn intro_sound_offset(&self) -> f32 {
        if self.is_mobile {
            INTRO_SOUND_OFFSET_MOBILE
        } else {
            INTRO_SOUND_OFFSET_DESKTOP
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn detect_mobile() -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    let Ok(agent) = window.navigator().user_agent() else {
        return false;
    };
    is_mobile_user_agent(&agent)
}

#[cfg(not(target_arch = "wasm32"))]
fn detect_mobile() -> bool {
    false
}

pub fn is_mobile_user_agent(agent: &str) -> bool {
    const MARKERS: [&str; 6] = ["Android", "iPhone", "iPad", "iPod", "Mobile", "Windows Phone"];
    MARKERS.iter().any(|marker| agent.contains(marker))
}

/// Viewport classification driving camera and fog tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportClass {
    pub orientation: Orientation,
    pub is_mobile: bool,
}

impl ViewportClass {
    pub fn classify(width: f32, height: f32, device: DeviceProfile) -> Self {
        let orientation = if width < height {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        };
        Self {
            orientation,
            is_mobile: device.is_mobile,
        }
    }

    /// Vertical field of view in degrees. Desktop ignores orientation.
    pub fn fov_degrees(&self) -> f32 {
        match (self.is_mobile, self.orientation) {
            (false, _) => FOV_DESKTOP,
            (true, Orientation::Portrait) => FOV_MOBILE_PORTRAIT,
            (true, Orientation::Landscape) => FOV_MOBILE_LANDSCAPE,
        }
    }

    pub fn fog(&self) -> FogRange {
        match (self.is_mobile, self.orientation) {
            (false, _) => FOG_DESKTOP,
            (true, Orientation::Portrait) => FOG_MOBILE_PORTRAIT,
            (true, Orientation::Landscape) => FOG_MOBILE_LANDSCAPE,
        }
    }
}

#[derive(Component)]
pub struct GameCamera;

pub fn spawn_camera(commands: &mut Commands, class: ViewportClass) {
    let fog = class.fog();

    let mut camera = commands.spawn((
        Camera3d::default(),
        Projection::from(PerspectiveProjection {
            fov: class.fov_degrees().to_radians(),
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            ..default()
        }),
        Transform::from_translation(CAMERA_POSITION).looking_at(Vec3::ZERO, Vec3::Y),
        SpatialListener::new(LISTENER_EAR_GAP),
        GameCamera,
    ));

    if FOG_ENABLED {
        camera.insert(DistanceFog {
            color: BACKGROUND_COLOR,
            falloff: FogFalloff::Linear {
                start: fog.near,
                end: fog.far,
            },
            ..default()
        });
    }
}

/// Re-tune projection and fog whenever the window changes shape.
pub fn handle_window_resize(
    mut resize_events: EventReader<WindowResized>,
    device: Res<DeviceProfile>,
    mut cameras: Query<(&mut Projection, Option<&mut DistanceFog>), With<GameCamera>>,
) {
    let Some(resized) = resize_events.read().last() else {
        return;
    };
    let class = ViewportClass::classify(resized.width, resized.height, *device);

    for (mut projection, fog) in &mut cameras {
        if let Projection::Perspective(perspective) = projection.as_mut() {
            perspective.fov = class.fov_degrees().to_radians();
        }

        if let Some(mut fog) = fog {
            let range = class.fog();
            fog.falloff = FogFalloff::Linear {
                start: range.near,
                end: range.far,
            };
        }
    }
}

/// Keep high-density displays from rendering more pixels than needed.
pub fn cap_pixel_ratio(mut windows: Query<&mut Window, With<PrimaryWindow>>) {
    let Ok(mut window) = windows.single_mut() else {
        return;
    };

    if window.resolution.base_scale_factor() > MAX_PIXEL_RATIO {
        window
            .resolution
            .set_scale_factor_override(Some(MAX_PIXEL_RATIO));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESKTOP: DeviceProfile = DeviceProfile { is_mobile: false };
    const MOBILE: DeviceProfile = DeviceProfile { is_mobile: true };

    #[test]
    fn desktop_ignores_orientation() {
        let tall = ViewportClass::classify(600.0, 900.0, DESKTOP);
        let wide = ViewportClass::classify(1600.0, 900.0, DESKTOP);

        assert_eq!(tall.orientation, Orientation::Portrait);
        assert_eq!(wide.orientation, Orientation::Landscape);
        assert_eq!(tall.fov_degrees(), FOV_DESKTOP);
        assert_eq!(wide.fov_degrees(), FOV_DESKTOP);
        assert_eq!(tall.fog(), FOG_DESKTOP);
    }

    #[test]
    fn mobile_uses_orientation() {
        let portrait = ViewportClass::classify(390.0, 844.0, MOBILE);
        let landscape = ViewportClass::classify(844.0, 390.0, MOBILE);

        assert_eq!(portrait.fov_degrees(), FOV_MOBILE_PORTRAIT);
        assert_eq!(landscape.fov_degrees(), FOV_MOBILE_LANDSCAPE);
        assert_eq!(portrait.fog(), FOG_MOBILE_PORTRAIT);
        assert_eq!(landscape.fog(), FOG_MOBILE_LANDSCAPE);
    }

    #[test]
    fn square_viewport_counts_as_landscape() {
        let square = ViewportClass::classify(500.0, 500.0, MOBILE);
        assert_eq!(square.orientation, Orientation::Landscape);
    }

    #[test]
    fn detects_mobile_agents() {
        assert!(is_mobile_user_agent(
            "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) Mobile/15E148"
        ));
        assert!(!is_mobile_user_agent(
            "Mozilla/5.0 (X11; Linux x86_64) Gecko/20100101 Firefox/128.0"
        ));
        assert_eq!(MOBILE.intro_sound_offset(), INTRO_SOUND_OFFSET_MOBILE);
    }
}
