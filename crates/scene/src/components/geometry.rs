use foundation::math::Vec3;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    LineStrip,
    LineSegments,
    Mesh,
    Sphere,
}

/// Object-space geometry of a scene object.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Connected polyline through `points`.
    LineStrip { points: Vec<Vec3> },
    /// Disjoint segments, two points each.
    LineSegments { segments: Vec<[Vec3; 2]> },
    /// Indexed triangle list.
    Mesh {
        vertices: Vec<Vec3>,
        indices: Vec<u32>,
    },
    /// UV sphere; `inverted` spheres are viewed from inside.
    Sphere {
        radius: f64,
        width_segments: u32,
        height_segments: u32,
        inverted: bool,
    },
}

impl Geometry {
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::LineStrip { .. } => GeometryKind::LineStrip,
            Geometry::LineSegments { .. } => GeometryKind::LineSegments,
            Geometry::Mesh { .. } => GeometryKind::Mesh,
            Geometry::Sphere { .. } => GeometryKind::Sphere,
        }
    }

    pub fn vertex_count(&self) -> usize {
        match self {
            Geometry::LineStrip { points } => points.len(),
            Geometry::LineSegments { segments } => segments.len() * 2,
            Geometry::Mesh { vertices, .. } => vertices.len(),
            Geometry::Sphere {
                width_segments,
                height_segments,
                ..
            } => ((*width_segments + 1) * (*height_segments + 1)) as usize,
        }
    }

    pub fn triangle_count(&self) -> usize {
        match self {
            Geometry::Mesh { indices, .. } => indices.len() / 3,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Geometry, GeometryKind};
    use foundation::math::Vec3;

    #[test]
    fn counts_vertices_per_kind() {
        let strip = Geometry::LineStrip {
            points: vec![Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0)],
        };
        assert_eq!(strip.kind(), GeometryKind::LineStrip);
        assert_eq!(strip.vertex_count(), 2);

        let segs = Geometry::LineSegments {
            segments: vec![[Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0)]],
        };
        assert_eq!(segs.vertex_count(), 2);

        let mesh = Geometry::Mesh {
            vertices: vec![Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)],
            indices: vec![0, 1, 2],
        };
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(strip.triangle_count(), 0);
    }
}
