//! Per-frame draw collection.
//!
//! A GPU backend consumes [`RenderFrame`]s; collecting them needs nothing but
//! the scene, which keeps the render loop testable headless.

use crate::components::{GeometryKind, Material, Transform};
use crate::object::ObjectId;
use crate::scene::Scene;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DrawCommand {
    pub object: ObjectId,
    pub kind: GeometryKind,
    pub transform: Transform,
    pub material: Material,
    pub vertex_count: usize,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct RenderFrame {
    pub commands: Vec<DrawCommand>,
}

impl RenderFrame {
    pub fn overlay_draws(&self, scene: &Scene) -> usize {
        self.commands
            .iter()
            .filter(|c| scene.get(c.object).is_some_and(|o| o.overlay.is_some()))
            .count()
    }
}

/// Opaque objects first, then transparent ones; slot order within each pass.
pub fn collect(scene: &Scene) -> RenderFrame {
    let mut opaque = Vec::new();
    let mut transparent = Vec::new();

    for (id, object) in scene.iter() {
        let cmd = DrawCommand {
            object: id,
            kind: object.geometry.kind(),
            transform: object.transform,
            material: object.material,
            vertex_count: object.geometry.vertex_count(),
        };
        if object.material.is_transparent() {
            transparent.push(cmd);
        } else {
            opaque.push(cmd);
        }
    }

    opaque.extend(transparent);
    RenderFrame { commands: opaque }
}
