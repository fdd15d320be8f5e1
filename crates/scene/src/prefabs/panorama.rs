use crate::components::{Color, Geometry, Material, Transform};
use crate::object::{ObjectId, SceneObject};
use crate::scene::SceneHandle;

pub const PANORAMA_RADIUS: f64 = 500.0;
pub const PANORAMA_WIDTH_SEGMENTS: u32 = 60;
pub const PANORAMA_HEIGHT_SEGMENTS: u32 = 40;
pub const PANORAMA_OPACITY: f32 = 0.8;

/// Inside-out sphere carrying the panorama image; the backdrop every overlay
/// object is drawn against.
pub fn spawn_panorama_sphere(scene: &mut impl SceneHandle) -> ObjectId {
    scene.add(SceneObject::new(
        Geometry::Sphere {
            radius: PANORAMA_RADIUS,
            width_segments: PANORAMA_WIDTH_SEGMENTS,
            height_segments: PANORAMA_HEIGHT_SEGMENTS,
            inverted: true,
        },
        Material::translucent(Color::WHITE, PANORAMA_OPACITY).double_sided(),
        Transform::identity(),
    ))
}

#[cfg(test)]
mod tests {
    use super::spawn_panorama_sphere;
    use crate::Scene;
    use crate::components::Geometry;

    #[test]
    fn spawns_inverted_sphere_without_overlay_tag() {
        let mut scene = Scene::new();
        let id = spawn_panorama_sphere(&mut scene);

        let object = scene.get(id).expect("sphere");
        assert!(matches!(
            object.geometry,
            Geometry::Sphere { inverted: true, .. }
        ));
        assert!(object.overlay.is_none());
        assert_eq!(scene.overlay_count(), 0);
    }
}
