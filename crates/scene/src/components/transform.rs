use foundation::math::Vec3;

/// Translation plus uniform scale. Models are never rotated by the viewer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub scale: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            scale: 1.0,
        }
    }

    /// Column-major model matrix for the GPU.
    pub fn to_cols_array_2d(&self) -> [[f32; 4]; 4] {
        let s = self.scale as f32;
        let p = self.position;
        [
            [s, 0.0, 0.0, 0.0],
            [0.0, s, 0.0, 0.0],
            [0.0, 0.0, s, 0.0],
            [p.x as f32, p.y as f32, p.z as f32, 1.0],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::Transform;
    use foundation::math::Vec3;

    #[test]
    fn identity_is_origin() {
        let transform = Transform::identity();
        assert_eq!(transform.position, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(transform.scale, 1.0);
    }

    #[test]
    fn matrix_scales_diagonal_and_translates_last_column() {
        let t = Transform {
            position: Vec3::new(0.0, 2.0, -1.0),
            scale: 0.5,
        };
        let m = t.to_cols_array_2d();
        assert_eq!(m[0][0], 0.5);
        assert_eq!(m[2][2], 0.5);
        assert_eq!(m[3], [0.0, 2.0, -1.0, 1.0]);
    }
}
