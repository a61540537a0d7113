use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::{Vec2, Vec3};
use orbitview_common::PixelSize;
use orbitview_input::{InputEvent, PointerButton};
use orbitview_render::PerspectiveCamera;

/// Keeps the polar angle strictly inside (0, π).
const POLAR_EPSILON: f32 = 1e-6;
const CHANGE_EPSILON: f32 = 1e-6;

/// Orbit-control capability, bound to a camera and an input surface.
pub trait Orbitable {
    /// Attach to `camera` and an input surface of `element` size.
    fn bind(&mut self, camera: &PerspectiveCamera, element: PixelSize);

    /// Current pivot.
    fn target(&self) -> Vec3;

    fn set_target(&mut self, target: Vec3);

    /// Inform the bindings of a new input surface size.
    fn set_viewport_size(&mut self, size: PixelSize);

    /// Feed a pointer or wheel event to the orbit bindings.
    fn handle_input(&mut self, event: &InputEvent);

    /// Advance one damped step. Returns true if the camera moved.
    fn update(&mut self, camera: &mut PerspectiveCamera) -> bool;

    fn dispose(&mut self);
}

/// Tuning for [`OrbitControls`].
#[derive(Debug, Clone)]
pub struct OrbitSettings {
    pub enable_damping: bool,
    /// Fraction of the pending motion applied per update.
    pub damping_factor: f32,
    /// Polar angle bounds in radians, measured from +Y.
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    /// When false, vertical pan slides the pivot across the ground plane
    /// instead of along the screen's up axis.
    pub screen_space_panning: bool,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: 0.1,
            min_polar_angle: 0.0,
            max_polar_angle: FRAC_PI_2,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            screen_space_panning: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragMode {
    None,
    Rotate,
    Pan,
    Dolly,
}

/// Camera position relative to the pivot in spherical coordinates.
/// `theta` is the azimuth from +Z toward +X, `phi` the polar angle from +Y.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Spherical {
    radius: f32,
    phi: f32,
    theta: f32,
}

impl Spherical {
    fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius == 0.0 {
            return Self::default();
        }
        Self {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    fn to_offset(self) -> Vec3 {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }
}

/// Damped orbit controls in the style of a turntable viewer.
///
/// Primary drag orbits, secondary drag pans, middle drag and the wheel
/// dolly. Input only accumulates pending motion; [`Orbitable::update`]
/// applies a damped share of it each frame.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub settings: OrbitSettings,
    target: Vec3,
    element: PixelSize,
    spherical_delta: Spherical,
    scale: f32,
    pan_offset: Vec3,
    /// Pan input in pixels, converted to world units at the next update.
    pending_pan: Vec2,
    mode: DragMode,
    drag_start: Vec2,
    last_position: Option<Vec3>,
    bound: bool,
    disposed: bool,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new(OrbitSettings::default())
    }
}

impl OrbitControls {
    pub fn new(settings: OrbitSettings) -> Self {
        Self {
            settings,
            target: Vec3::ZERO,
            element: PixelSize::new(1, 1),
            spherical_delta: Spherical::default(),
            scale: 1.0,
            pan_offset: Vec3::ZERO,
            pending_pan: Vec2::ZERO,
            mode: DragMode::None,
            drag_start: Vec2::ZERO,
            last_position: None,
            bound: false,
            disposed: false,
        }
    }

    pub fn is_bound(&self) -> bool {
        self.bound
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn zoom_scale(&self) -> f32 {
        0.95_f32.powf(self.settings.zoom_speed)
    }

    fn element_height(&self) -> f32 {
        self.element.height.max(1) as f32
    }

    fn rotate_left(&mut self, angle: f32) {
        self.spherical_delta.theta -= angle;
    }

    fn rotate_up(&mut self, angle: f32) {
        self.spherical_delta.phi -= angle;
    }

    fn dolly_in(&mut self) {
        self.scale *= self.zoom_scale();
    }

    fn dolly_out(&mut self) {
        self.scale /= self.zoom_scale();
    }

    fn drag_to(&mut self, position: Vec2) {
        let delta = position - self.drag_start;
        self.drag_start = position;
        match self.mode {
            DragMode::Rotate => {
                let delta = delta * self.settings.rotate_speed;
                let height = self.element_height();
                self.rotate_left(TAU * delta.x / height);
                self.rotate_up(TAU * delta.y / height);
            }
            DragMode::Pan => {
                self.pending_pan += delta * self.settings.pan_speed;
            }
            DragMode::Dolly => {
                if delta.y > 0.0 {
                    self.dolly_out();
                } else if delta.y < 0.0 {
                    self.dolly_in();
                }
            }
            DragMode::None => {}
        }
    }

    /// Convert accumulated pixel pan into a world-space pivot offset.
    fn resolve_pan(&mut self, camera: &PerspectiveCamera) {
        if self.pending_pan == Vec2::ZERO {
            return;
        }
        let offset = camera.position - self.target;
        // Half the visible height at the pivot distance.
        let target_distance = offset.length() * (camera.fov_degrees.to_radians() / 2.0).tan();
        let height = self.element_height();
        let right = camera.right();

        let left = 2.0 * self.pending_pan.x * target_distance / height;
        let up = 2.0 * self.pending_pan.y * target_distance / height;

        self.pan_offset += right * -left;
        let up_axis = if self.settings.screen_space_panning {
            right.cross(camera.forward()).normalize_or_zero()
        } else {
            camera.up.cross(right)
        };
        self.pan_offset += up_axis * up;
        self.pending_pan = Vec2::ZERO;
    }
}

impl Orbitable for OrbitControls {
    fn bind(&mut self, camera: &PerspectiveCamera, element: PixelSize) {
        self.element = element;
        self.last_position = Some(camera.position);
        self.bound = true;
        self.disposed = false;
        tracing::debug!(
            width = element.width,
            height = element.height,
            "orbit controls bound"
        );
    }

    fn target(&self) -> Vec3 {
        self.target
    }

    fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    fn set_viewport_size(&mut self, size: PixelSize) {
        self.element = size;
    }

    fn handle_input(&mut self, event: &InputEvent) {
        if self.disposed || !self.bound {
            return;
        }
        match *event {
            InputEvent::PointerDown { position, button } => {
                self.mode = match button {
                    PointerButton::Primary => DragMode::Rotate,
                    PointerButton::Secondary => DragMode::Pan,
                    PointerButton::Middle => DragMode::Dolly,
                };
                self.drag_start = position;
            }
            InputEvent::PointerMove { position } => {
                if self.mode != DragMode::None {
                    self.drag_to(position);
                }
            }
            InputEvent::PointerUp { .. } => {
                self.mode = DragMode::None;
            }
            InputEvent::Wheel { delta } => {
                if delta > 0.0 {
                    self.dolly_out();
                } else if delta < 0.0 {
                    self.dolly_in();
                }
            }
            InputEvent::Resized(_) => {}
        }
    }

    fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        self.resolve_pan(camera);

        let s = &self.settings;
        let mut spherical = Spherical::from_offset(camera.position - self.target);

        if s.enable_damping {
            spherical.theta += self.spherical_delta.theta * s.damping_factor;
            spherical.phi += self.spherical_delta.phi * s.damping_factor;
        } else {
            spherical.theta += self.spherical_delta.theta;
            spherical.phi += self.spherical_delta.phi;
        }

        spherical.phi = spherical
            .phi
            .clamp(s.min_polar_angle, s.max_polar_angle)
            .clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        spherical.radius = (spherical.radius * self.scale).clamp(s.min_distance, s.max_distance);

        if s.enable_damping {
            self.target += self.pan_offset * s.damping_factor;
        } else {
            self.target += self.pan_offset;
        }

        camera.position = self.target + spherical.to_offset();
        camera.look_at(self.target);

        if s.enable_damping {
            let keep = 1.0 - s.damping_factor;
            self.spherical_delta.theta *= keep;
            self.spherical_delta.phi *= keep;
            self.pan_offset *= keep;
        } else {
            self.spherical_delta = Spherical::default();
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;

        let moved = self
            .last_position
            .is_none_or(|last| last.distance_squared(camera.position) > CHANGE_EPSILON);
        self.last_position = Some(camera.position);
        if moved {
            tracing::trace!(position = ?camera.position, target = ?self.target, "orbit moved camera");
        }
        moved
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.bound = false;
        self.mode = DragMode::None;
        tracing::debug!("orbit controls disposed");
    }
}
