use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::prelude::*;

use super::scene::SceneViewState;

const ORBIT_BUTTON: MouseButton = MouseButton::Right;
const PAN_BUTTON: MouseButton = MouseButton::Middle;
// Fraction of the orbit radius moved per scroll unit.
const ZOOM_RATE: f32 = 0.05;
const MIN_RADIUS: f32 = 0.05;

#[derive(Component)]
pub struct PanOrbitCamera {
    /// Point orbited around, moved by panning.
    pub focus: Vec3,
    pub radius: f32,
    pub upside_down: bool,
}

impl Default for PanOrbitCamera {
    fn default() -> Self {
        PanOrbitCamera {
            focus: Vec3::ZERO,
            radius: 5.0,
            upside_down: false,
        }
    }
}

/// Mouse input gathered over one frame.
#[derive(Default, Debug)]
struct CameraInput {
    orbit: Vec2,
    pan: Vec2,
    scroll: f32,
    orbit_button_changed: bool,
}

impl CameraInput {
    fn gather(
        ev_motion: &mut EventReader<MouseMotion>,
        ev_scroll: &mut EventReader<MouseWheel>,
        input_mouse: &ButtonInput<MouseButton>,
    ) -> Self {
        let mut input = CameraInput::default();
        // Orbiting wins over panning when both buttons are held.
        if input_mouse.pressed(ORBIT_BUTTON) {
            input.orbit = ev_motion.read().map(|ev| ev.delta).sum();
        } else if input_mouse.pressed(PAN_BUTTON) {
            input.pan = ev_motion.read().map(|ev| ev.delta).sum();
        }
        input.scroll = ev_scroll.read().map(|ev| ev.y).sum();
        input.orbit_button_changed =
            input_mouse.just_released(ORBIT_BUTTON) || input_mouse.just_pressed(ORBIT_BUTTON);
        input
    }
}

pub fn pan_orbit_camera_update(
    mut ev_motion: EventReader<MouseMotion>,
    mut ev_scroll: EventReader<MouseWheel>,
    input_mouse: Res<ButtonInput<MouseButton>>,
    mut camera_query: Query<(&mut PanOrbitCamera, &mut Transform, &Projection)>,
    window_query: Query<&Window, With<bevy::window::PrimaryWindow>>,
) {
    let mut input = CameraInput::gather(&mut ev_motion, &mut ev_scroll, &input_mouse);
    // Unread motion events would otherwise pile up.
    ev_motion.clear();

    let Ok(window) = window_query.get_single() else {
        warn!("No window found");
        return;
    };
    let window = Vec2::new(window.width(), window.height());

    for (mut pan_orbit, mut transform, projection) in camera_query.iter_mut() {
        if input.orbit_button_changed {
            // Horizontal orbiting inverts when the camera is upside down.
            let up = transform.rotation * Vec3::Y;
            pan_orbit.upside_down = up.y <= 0.0;
            debug!("Camera upside down: {:?}", pan_orbit.upside_down);
        }

        if input.orbit.length_squared() > 0.0 {
            debug!("Orbiting camera: {:?}", input.orbit);
            let mut delta_x = input.orbit.x / window.x * std::f32::consts::TAU;
            if pan_orbit.upside_down {
                delta_x = -delta_x;
            }
            let delta_y = input.orbit.y / window.y * std::f32::consts::PI;
            // Yaw about the world y axis, pitch about the local x axis.
            transform.rotation = Quat::from_rotation_y(-delta_x) * transform.rotation;
            transform.rotation *= Quat::from_rotation_x(-delta_y);
        } else if input.pan.length_squared() > 0.0 {
            debug!("Panning camera: {:?}", input.pan);
            if let Projection::Perspective(projection) = projection {
                input.pan *=
                    Vec2::new(projection.fov * projection.aspect_ratio, projection.fov) / window;
            }
            let right = transform.rotation * Vec3::X * -input.pan.x;
            let up = transform.rotation * Vec3::Y * input.pan.y;
            let radius = pan_orbit.radius;
            pan_orbit.focus += (right + up) * radius;
        } else if input.scroll.abs() > 0.0 {
            debug!("Zooming camera: {:?}", input.scroll);
            pan_orbit.radius -= input.scroll * pan_orbit.radius * ZOOM_RATE;
            pan_orbit.radius = pan_orbit.radius.max(MIN_RADIUS);
        } else {
            continue;
        }

        transform.translation =
            pan_orbit.focus + transform.rotation * Vec3::new(0.0, 0.0, pan_orbit.radius);
    }
}

/// Starts the camera far enough back on +z to see the whole initial scene.
pub fn add_camera(mut commands: Commands, view_state: Res<SceneViewState>) {
    let (focus, extent) = match view_state.current.build_scene().ok().and_then(|s| s.bounds()) {
        Some((min, max)) => {
            let centre = nalgebra::center(&min, &max);
            (
                Vec3::new(centre.x as f32, centre.y as f32, centre.z as f32),
                (max - min).amax() as f32,
            )
        }
        None => (Vec3::ZERO, 10.0),
    };
    let radius = 1.5 * extent;
    let translation = focus + Vec3::new(0.0, 0.0, radius);
    info!("Starting camera position: {:?}, looking at {:?}", translation, focus);

    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(translation).looking_at(focus, Vec3::Y),
        PanOrbitCamera {
            focus,
            radius,
            ..Default::default()
        },
    ));

    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 200.0,
    });
}
