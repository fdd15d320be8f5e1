use foundation::handles::Handle;

use crate::components::{Geometry, Material, OverlayTag, Transform};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub Handle);

impl ObjectId {
    pub fn index(&self) -> u32 {
        self.0.index()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub geometry: Geometry,
    pub material: Material,
    pub transform: Transform,
    /// Present only on objects the road overlay owns.
    pub overlay: Option<OverlayTag>,
}

impl SceneObject {
    pub fn new(geometry: Geometry, material: Material, transform: Transform) -> Self {
        Self {
            geometry,
            material,
            transform,
            overlay: None,
        }
    }

    pub fn with_overlay_tag(mut self, tag: OverlayTag) -> Self {
        self.overlay = Some(tag);
        self
    }
}
