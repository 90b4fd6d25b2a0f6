use foundation::bounds::Aabb3;
use foundation::math::Vec3;
use serde::{Deserialize, Serialize};

/// Extra distance applied when framing so the model does not touch the
/// viewport edges.
pub const DEFAULT_FRAMING_MARGIN: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub fov_y_deg: f64,
    pub near: f64,
    pub far: f64,
    pub position: [f64; 3],
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov_y_deg: 45.0,
            near: 1.0,
            far: 1000.0,
            position: [4.0, 5.0, 11.0],
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera3D {
    pub position: Vec3,
    pub target: Vec3,
    pub fov_y_rad: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
}

impl Camera3D {
    pub fn look_at(position: Vec3, target: Vec3, fov_y_rad: f64, near: f64, far: f64) -> Self {
        Self {
            position,
            target,
            fov_y_rad,
            aspect: 1.0,
            near,
            far,
        }
    }

    pub fn from_settings(settings: &CameraSettings, target: Vec3) -> Self {
        Self::look_at(
            Vec3::from_array(settings.position),
            target,
            settings.fov_y_deg.to_radians(),
            settings.near,
            settings.far,
        )
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.aspect = if height <= 0.0 {
            1.0
        } else {
            (width / height).max(1e-6)
        };
    }

    pub fn distance_to_target(&self) -> f64 {
        self.position.distance(self.target)
    }

    pub fn view_proj(&self) -> [[f32; 4]; 4] {
        let view = mat4_look_at_rh(self.position, self.target, Vec3::UP);
        let proj = mat4_perspective_rh_z0(self.fov_y_rad, self.aspect, self.near, self.far);
        mat4_mul(proj, view)
    }
}

/// Camera pose that frames a bounding box.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Framing {
    pub position: Vec3,
    pub target: Vec3,
    pub distance: f64,
}

/// Distance at which a box of edge `max_dim` fits a vertical field of view,
/// times `margin`.
pub fn framing_distance(max_dim: f64, fov_y_rad: f64, margin: f64) -> f64 {
    (max_dim / 2.0 / (fov_y_rad / 2.0).tan()).abs() * margin
}

/// Places the camera on the +Z side of the box center, looking at it.
pub fn frame_bounds(bounds: &Aabb3, fov_y_rad: f64, margin: f64) -> Framing {
    let center = bounds.center();
    let distance = framing_distance(bounds.max_dimension(), fov_y_rad, margin);
    Framing {
        position: Vec3::new(center.x, center.y, center.z + distance),
        target: center,
        distance,
    }
}

pub fn mat4_mul(a: [[f32; 4]; 4], b: [[f32; 4]; 4]) -> [[f32; 4]; 4] {
    // Column-major matrix multiply: c = a * b
    let mut c = [[0.0f32; 4]; 4];
    for col in 0..4 {
        for row in 0..4 {
            c[col][row] = a[0][row] * b[col][0]
                + a[1][row] * b[col][1]
                + a[2][row] * b[col][2]
                + a[3][row] * b[col][3];
        }
    }
    c
}

pub fn mat4_perspective_rh_z0(fov_y_rad: f64, aspect: f64, near: f64, far: f64) -> [[f32; 4]; 4] {
    let f = 1.0 / (0.5 * fov_y_rad).tan();
    let m00 = (f / aspect) as f32;
    let m11 = f as f32;
    let m22 = (far / (near - far)) as f32;
    let m23 = ((near * far) / (near - far)) as f32;

    // Column-major (WGSL) perspective matrix, RH, depth range [0, 1].
    [
        [m00, 0.0, 0.0, 0.0],
        [0.0, m11, 0.0, 0.0],
        [0.0, 0.0, m22, -1.0],
        [0.0, 0.0, m23, 0.0],
    ]
}

pub fn mat4_look_at_rh(eye: Vec3, target: Vec3, up: Vec3) -> [[f32; 4]; 4] {
    let f = (target - eye).normalize();
    let s = f.cross(up).normalize();
    let u = s.cross(f);

    let ex = -s.dot(eye);
    let ey = -u.dot(eye);
    let ez = f.dot(eye);

    // Column-major (WGSL) view matrix.
    [
        [s.x as f32, u.x as f32, (-f.x) as f32, 0.0],
        [s.y as f32, u.y as f32, (-f.y) as f32, 0.0],
        [s.z as f32, u.z as f32, (-f.z) as f32, 0.0],
        [ex as f32, ey as f32, ez as f32, 1.0],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn framing_distance_matches_fov_formula() {
        let fov = 45f64.to_radians();
        let d = framing_distance(0.7, fov, DEFAULT_FRAMING_MARGIN);
        let expected = (0.7 / 2.0) / (fov / 2.0).tan() * 1.5;
        assert!(approx(d, expected));
    }

    #[test]
    fn frame_bounds_targets_center_along_z() {
        let bounds = Aabb3::new(Vec3::new(-0.35, 1.8, -1.2), Vec3::new(0.35, 2.2, -0.8));
        let fov = 45f64.to_radians();
        let framing = frame_bounds(&bounds, fov, 1.5);
        assert_eq!(framing.target, Vec3::new(0.0, 2.0, -1.0));
        assert!(approx(framing.position.x, 0.0));
        assert!(approx(framing.position.y, 2.0));
        assert!(approx(framing.position.z, -1.0 + framing.distance));
        assert!(approx(
            framing.distance,
            framing_distance(0.7, fov, 1.5)
        ));
    }

    #[test]
    fn view_proj_maps_target_to_screen_center() {
        let mut cam = Camera3D::look_at(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::ZERO,
            45f64.to_radians(),
            1.0,
            1000.0,
        );
        cam.set_viewport(1280.0, 720.0);
        let m = cam.view_proj();
        // Clip-space of the origin is the last column.
        let (x, y, w) = (m[3][0], m[3][1], m[3][3]);
        assert!(w > 0.0);
        assert!((x / w).abs() < 1e-6);
        assert!((y / w).abs() < 1e-6);
    }

    #[test]
    fn zero_height_viewport_falls_back_to_square() {
        let mut cam = Camera3D::look_at(Vec3::new(0.0, 0.0, 1.0), Vec3::ZERO, 1.0, 0.1, 10.0);
        cam.set_viewport(800.0, 0.0);
        assert_eq!(cam.aspect, 1.0);
    }
}
