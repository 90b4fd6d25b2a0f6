use foundation::math::Vec3;
use serde::{Deserialize, Serialize};

use crate::camera::Camera3D;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitSettings {
    pub enable_damping: bool,
    pub damping_factor: f64,
    pub min_distance: f64,
    pub max_distance: f64,
    /// Polar limits in radians, measured from +Y.
    pub min_polar_angle: f64,
    pub max_polar_angle: f64,
    pub rotate_speed: f64,
    pub zoom_speed: f64,
    pub target: [f64; 3],
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: 0.05,
            min_distance: 2.0,
            max_distance: 10.0,
            min_polar_angle: 0.5,
            max_polar_angle: 1.5,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            target: [0.0, 1.0, 0.0],
        }
    }
}

const EPS: f64 = 1e-6;

/// Spherical coordinates: `phi` from +Y, `theta` around Y starting at +Z.
#[derive(Debug, Copy, Clone, PartialEq)]
struct Spherical {
    radius: f64,
    phi: f64,
    theta: f64,
}

impl Spherical {
    fn from_offset(v: Vec3) -> Self {
        let radius = v.length();
        if radius == 0.0 {
            return Self {
                radius,
                phi: 0.0,
                theta: 0.0,
            };
        }
        Self {
            radius,
            theta: v.x.atan2(v.z),
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    fn to_offset(self) -> Vec3 {
        let sin_phi_r = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi_r * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_r * self.theta.cos(),
        )
    }
}

/// Orbit camera control around a pivot, without panning.
///
/// Input only accumulates deltas; `update` applies them to the camera.
/// With damping on, each update applies a fraction of the pending rotation
/// and keeps the rest for later frames.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    pub settings: OrbitSettings,
    /// Settings as configured, before any framing widened the limits.
    base: OrbitSettings,
    pub target: Vec3,
    delta_theta: f64,
    delta_phi: f64,
    scale: f64,
}

impl OrbitControls {
    pub fn new(settings: OrbitSettings) -> Self {
        Self {
            target: Vec3::from_array(settings.target),
            settings,
            base: settings,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
        }
    }

    /// Horizontal and vertical pointer drag, in pixels.
    pub fn rotate(&mut self, delta_x_px: f64, delta_y_px: f64, viewport_height_px: f64) {
        let h = viewport_height_px.max(1.0);
        let k = std::f64::consts::TAU * self.settings.rotate_speed / h;
        self.delta_theta -= delta_x_px * k;
        self.delta_phi -= delta_y_px * k;
    }

    /// Mouse-wheel dolly. Positive `wheel_delta_y` moves the camera away.
    pub fn dolly(&mut self, wheel_delta_y: f64) {
        let zoom_scale = 0.95f64.powf(self.settings.zoom_speed);
        if wheel_delta_y > 0.0 {
            self.scale /= zoom_scale;
        } else if wheel_delta_y < 0.0 {
            self.scale *= zoom_scale;
        }
    }

    /// Resets the distance limits to the configured ones, widened just
    /// enough to make `distance` reachable. Non-positive or non-finite
    /// distances leave the configured limits untouched.
    pub fn allow_distance(&mut self, distance: f64) {
        self.reset_limits();
        if !(distance > 0.0 && distance.is_finite()) {
            return;
        }
        self.settings.min_distance = self.base.min_distance.min(distance);
        self.settings.max_distance = self.base.max_distance.max(distance);
    }

    pub fn reset_limits(&mut self) {
        self.settings.min_distance = self.base.min_distance;
        self.settings.max_distance = self.base.max_distance;
    }

    pub fn reset_motion(&mut self) {
        self.delta_theta = 0.0;
        self.delta_phi = 0.0;
        self.scale = 1.0;
    }

    pub fn update(&mut self, camera: &mut Camera3D) {
        let s = self.settings;
        let mut sph = Spherical::from_offset(camera.position - self.target);

        if s.enable_damping {
            sph.theta += self.delta_theta * s.damping_factor;
            sph.phi += self.delta_phi * s.damping_factor;
        } else {
            sph.theta += self.delta_theta;
            sph.phi += self.delta_phi;
        }

        sph.phi = sph
            .phi
            .clamp(s.min_polar_angle, s.max_polar_angle)
            .clamp(EPS, std::f64::consts::PI - EPS);
        sph.radius = (sph.radius * self.scale).clamp(s.min_distance, s.max_distance);

        camera.position = self.target + sph.to_offset();
        camera.target = self.target;

        if s.enable_damping {
            self.delta_theta *= 1.0 - s.damping_factor;
            self.delta_phi *= 1.0 - s.damping_factor;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
        }
        self.scale = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera_at(position: Vec3, target: Vec3) -> Camera3D {
        Camera3D::look_at(position, target, 45f64.to_radians(), 1.0, 1000.0)
    }

    #[test]
    fn spherical_round_trip() {
        let v = Vec3::new(1.0, 2.0, -3.0);
        let back = Spherical::from_offset(v).to_offset();
        assert!((back - v).length() < 1e-9);
    }

    #[test]
    fn update_clamps_distance_and_polar_angle() {
        let mut controls = OrbitControls::new(OrbitSettings::default());
        let mut cam = camera_at(Vec3::new(0.0, 51.0, 0.0), controls.target);
        controls.update(&mut cam);

        let d = cam.distance_to_target();
        assert!((d - 10.0).abs() < 1e-9);
        let offset = cam.position - controls.target;
        let phi = (offset.y / d).acos();
        assert!((phi - 0.5).abs() < 1e-9);
    }

    #[test]
    fn damping_spreads_rotation_over_frames() {
        let mut controls = OrbitControls::new(OrbitSettings {
            min_polar_angle: 0.0,
            max_polar_angle: std::f64::consts::PI,
            ..OrbitSettings::default()
        });
        let mut cam = camera_at(Vec3::new(0.0, 1.0, 5.0), controls.target);
        controls.rotate(-100.0, 0.0, 600.0);

        controls.update(&mut cam);
        let first = cam.position;
        controls.update(&mut cam);
        let second = cam.position;

        assert!(first.x > 0.0);
        assert!(second.x > first.x);
        assert!((cam.distance_to_target() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn without_damping_rotation_applies_at_once() {
        let mut controls = OrbitControls::new(OrbitSettings {
            enable_damping: false,
            min_polar_angle: 0.0,
            max_polar_angle: std::f64::consts::PI,
            ..OrbitSettings::default()
        });
        let mut cam = camera_at(Vec3::new(0.0, 1.0, 5.0), controls.target);
        // A drag of half the viewport height turns by half a revolution.
        controls.rotate(-300.0, 0.0, 600.0);
        controls.update(&mut cam);
        assert!((cam.position.z - (-5.0)).abs() < 1e-9);

        let before = cam.position;
        controls.update(&mut cam);
        assert!((cam.position - before).length() < 1e-12);
    }

    #[test]
    fn dolly_out_increases_distance_until_limit() {
        let mut controls = OrbitControls::new(OrbitSettings::default());
        let mut cam = camera_at(Vec3::new(0.0, 1.0, 5.0), controls.target);
        controls.dolly(120.0);
        controls.update(&mut cam);
        assert!(cam.distance_to_target() > 5.0);

        for _ in 0..200 {
            controls.dolly(120.0);
            controls.update(&mut cam);
        }
        assert!((cam.distance_to_target() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn allow_distance_widens_limits() {
        let mut controls = OrbitControls::new(OrbitSettings::default());
        controls.allow_distance(1.2);
        assert_eq!(controls.settings.min_distance, 1.2);
        assert_eq!(controls.settings.max_distance, 10.0);
        controls.allow_distance(12.0);
        assert_eq!(controls.settings.max_distance, 12.0);
    }

    #[test]
    fn each_framing_starts_from_configured_limits() {
        let mut controls = OrbitControls::new(OrbitSettings::default());
        controls.allow_distance(1.2);
        controls.allow_distance(5.0);
        assert_eq!(controls.settings.min_distance, 2.0);
        assert_eq!(controls.settings.max_distance, 10.0);

        controls.allow_distance(0.0);
        assert_eq!(controls.settings.min_distance, 2.0);
        controls.allow_distance(f64::NAN);
        assert_eq!(controls.settings.max_distance, 10.0);
    }

    #[test]
    fn settings_accept_partial_json() {
        let s: OrbitSettings = serde_json::from_str(r#"{"max_distance": 20.0}"#).expect("json");
        assert_eq!(s.max_distance, 20.0);
        assert_eq!(s.min_distance, 2.0);
    }
}
