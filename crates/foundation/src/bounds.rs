use crate::math::Vec3;

/// Axis-aligned bounding box.
///
/// An empty box has `min > max` on every axis so that the first
/// `expand` call snaps it to the point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb3 {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for Aabb3 {
    fn default() -> Self {
        Self::empty()
    }
}

impl Aabb3 {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Aabb3 { min, max }
    }

    pub fn empty() -> Self {
        Aabb3 {
            min: Vec3::splat(f64::INFINITY),
            max: Vec3::splat(f64::NEG_INFINITY),
        }
    }

    pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Self {
        points.into_iter().fold(Self::empty(), |mut b, p| {
            b.expand(p);
            b
        })
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn expand(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn union(&self, other: &Aabb3) -> Aabb3 {
        Aabb3 {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            return Vec3::ZERO;
        }
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        if self.is_empty() {
            return Vec3::ZERO;
        }
        (self.min + self.max) * 0.5
    }

    /// Largest edge length; zero for an empty box.
    pub fn max_dimension(&self) -> f64 {
        self.size().max_element()
    }

    /// Bounds after a uniform scale followed by a translation.
    pub fn scaled_then_translated(&self, scale: f64, offset: Vec3) -> Aabb3 {
        if self.is_empty() {
            return *self;
        }
        let a = self.min * scale + offset;
        let b = self.max * scale + offset;
        Aabb3 {
            min: a.min(b),
            max: a.max(b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Aabb3;
    use crate::math::Vec3;

    #[test]
    fn empty_box_has_no_size() {
        let b = Aabb3::empty();
        assert!(b.is_empty());
        assert_eq!(b.size(), Vec3::ZERO);
        assert_eq!(b.max_dimension(), 0.0);
    }

    #[test]
    fn from_points_encloses_all() {
        let b = Aabb3::from_points([
            Vec3::new(-1.0, 0.0, 2.0),
            Vec3::new(3.0, -4.0, 0.5),
            Vec3::new(0.0, 1.0, 1.0),
        ]);
        assert_eq!(b.min, Vec3::new(-1.0, -4.0, 0.5));
        assert_eq!(b.max, Vec3::new(3.0, 1.0, 2.0));
        assert_eq!(b.max_dimension(), 5.0);
        assert_eq!(b.center(), Vec3::new(1.0, -1.5, 1.25));
    }

    #[test]
    fn scale_then_translate_moves_center() {
        let b = Aabb3::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 3.0, 1.0));
        let t = b.scaled_then_translated(0.5, Vec3::new(0.0, 2.0, -1.0));
        assert_eq!(t.size(), Vec3::new(1.0, 2.0, 1.0));
        assert_eq!(t.center(), Vec3::new(0.0, 2.5, -1.0));
    }
}
