use foundation::math::Vec3;

/// Object placement: Euler rotation (radians, applied in XYZ order, i.e. the
/// combined matrix is `Rx * Ry * Rz`) followed by a translation.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
        }
    }

    pub fn translate(position: Vec3) -> Self {
        Self {
            position,
            rotation: Vec3::ZERO,
        }
    }

    pub fn new(position: Vec3, rotation: Vec3) -> Self {
        Self { position, rotation }
    }

    /// Maps a point from object space to scene space.
    pub fn apply(&self, p: Vec3) -> Vec3 {
        let (sz, cz) = self.rotation.z.sin_cos();
        let p = Vec3::new(p.x * cz - p.y * sz, p.x * sz + p.y * cz, p.z);

        let (sy, cy) = self.rotation.y.sin_cos();
        let p = Vec3::new(p.x * cy + p.z * sy, p.y, -p.x * sy + p.z * cy);

        let (sx, cx) = self.rotation.x.sin_cos();
        let p = Vec3::new(p.x, p.y * cx - p.z * sx, p.y * sx + p.z * cx);

        p + self.position
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
