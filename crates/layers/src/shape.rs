use earcutr::earcut;
use foundation::math::{Vec2, Vec3};
use scene::components::Geometry;

/// Closed outline in the projected plane. The ring is stored open: a closing
/// vertex equal to the first one is dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanarShape {
    points: Vec<Vec2>,
}

impl PlanarShape {
    pub const MIN_POINTS: usize = 3;

    /// Flattens a projected ring onto `z = 0`. `None` when fewer than three
    /// distinct points remain.
    pub fn from_ring(ring: &[Vec3]) -> Option<Self> {
        let mut points: Vec<Vec2> = ring.iter().map(|p| p.xy()).collect();
        points.dedup();
        while points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        if points.len() < Self::MIN_POINTS {
            return None;
        }
        Some(Self { points })
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Ear-clipped fill. `None` if the ring is degenerate (e.g. collinear).
    pub fn triangulate(&self) -> Option<Geometry> {
        let coords: Vec<f64> = self.points.iter().flat_map(|p| [p.x, p.y]).collect();
        let indices = earcut(&coords, &[], 2).ok()?;
        if indices.is_empty() {
            return None;
        }

        Some(Geometry::Mesh {
            vertices: self.points.iter().map(|p| Vec3::new(p.x, p.y, 0.0)).collect(),
            indices: indices.into_iter().map(|i| i as u32).collect(),
        })
    }

    /// Boundary edges, closing back to the first point.
    pub fn outline(&self) -> Geometry {
        let n = self.points.len();
        let segments = (0..n)
            .map(|i| {
                let a = self.points[i];
                let b = self.points[(i + 1) % n];
                [Vec3::new(a.x, a.y, 0.0), Vec3::new(b.x, b.y, 0.0)]
            })
            .collect();
        Geometry::LineSegments { segments }
    }
}

#[cfg(test)]
mod tests {
    use super::PlanarShape;
    use foundation::math::Vec3;
    use scene::components::Geometry;

    fn square() -> Vec<Vec3> {
        vec![
            Vec3::new(0.0, 0.0, 4.0),
            Vec3::new(10.0, 0.0, 4.0),
            Vec3::new(10.0, 10.0, 4.0),
            Vec3::new(0.0, 10.0, 4.0),
            Vec3::new(0.0, 0.0, 4.0),
        ]
    }

    #[test]
    fn drops_closing_vertex_and_flattens() {
        let shape = PlanarShape::from_ring(&square()).expect("shape");
        assert_eq!(shape.points().len(), 4);

        let Some(Geometry::Mesh { vertices, indices }) = shape.triangulate() else {
            panic!("expected mesh");
        };
        assert_eq!(vertices.len(), 4);
        assert_eq!(indices.len(), 6);
        assert!(vertices.iter().all(|v| v.z == 0.0));
    }

    #[test]
    fn outline_closes_the_ring() {
        let shape = PlanarShape::from_ring(&square()).expect("shape");
        let Geometry::LineSegments { segments } = shape.outline() else {
            panic!("expected segments");
        };
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[3][1], Vec3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn rejects_degenerate_rings() {
        let two = [Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO];
        assert!(PlanarShape::from_ring(&two).is_none());
        assert!(PlanarShape::from_ring(&[]).is_none());

        let collinear = [
            Vec3::ZERO,
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::ZERO,
        ];
        let shape = PlanarShape::from_ring(&collinear).expect("three points");
        assert!(shape.triangulate().is_none());
    }
}
