//! Keeps the scene's overlay objects in sync with the features near the
//! current reference point.
//!
//! Residency is keyed by feature kind and position in the source collection,
//! the same position that picks the palette colour. Each update
//! diffs the newly visible key set against the resident one: features that
//! left the radius lose their objects, new ones are projected and inserted,
//! and features that stay visible are re-projected in place when the
//! reference point moved.

use std::collections::{BTreeMap, BTreeSet};

use formats::{FeatureId, LineFeature, PolygonFeature};
use foundation::math::{LocalProjector, ReferencePoint};
use scene::components::{Geometry, OverlayKind, OverlayPart, OverlayTag, Transform};
use scene::{ObjectId, SceneHandle, SceneObject};
use serde::Serialize;
use streaming::FeatureStore;
use tracing::{debug, info, warn};

use crate::config::OverlayConfig;
use crate::proximity::RadiusFilter;
use crate::shape::PlanarShape;
use crate::symbology::{FeatureStyle, ground_placement};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureKey {
    pub kind: OverlayKind,
    pub index: usize,
}

impl FeatureKey {
    pub fn line(index: usize) -> Self {
        Self {
            kind: OverlayKind::Line,
            index,
        }
    }

    pub fn polygon(index: usize) -> Self {
        Self {
            kind: OverlayKind::Polygon,
            index,
        }
    }
}

impl std::fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.kind.as_str(), self.index)
    }
}

/// What one [`OverlaySceneManager::update`] did. `added`, `removed` and
/// `refreshed` count scene objects; `skipped` counts features.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize)]
pub struct UpdateSummary {
    pub added: usize,
    pub removed: usize,
    pub refreshed: usize,
    pub skipped: usize,
    pub resident: usize,
}

impl UpdateSummary {
    pub fn is_unchanged(&self) -> bool {
        self.added == 0 && self.removed == 0 && self.refreshed == 0
    }
}

pub struct OverlaySceneManager {
    store: FeatureStore,
    config: OverlayConfig,
    filter: RadiusFilter,
    placement: Transform,
    /// Features that can never be drawn (too few vertices, degenerate ring).
    unrenderable: BTreeSet<FeatureKey>,
    resident: BTreeMap<FeatureKey, Vec<ObjectId>>,
    last_reference: Option<ReferencePoint>,
}

impl OverlaySceneManager {
    pub fn new(store: FeatureStore, config: OverlayConfig) -> Self {
        let unrenderable = find_unrenderable(&store, &config);
        if !unrenderable.is_empty() {
            debug!(count = unrenderable.len(), "features cannot be rendered");
        }
        Self {
            filter: RadiusFilter::from_config(&config),
            store,
            config,
            placement: ground_placement(),
            unrenderable,
            resident: BTreeMap::new(),
            last_reference: None,
        }
    }

    pub fn last_reference(&self) -> Option<ReferencePoint> {
        self.last_reference
    }

    pub fn resident_count(&self) -> usize {
        self.resident.values().map(Vec::len).sum()
    }

    pub fn is_resident(&self, key: FeatureKey) -> bool {
        self.resident.contains_key(&key)
    }

    /// Resident features in key order (lines first), with their objects.
    pub fn resident_features(&self) -> impl Iterator<Item = (FeatureKey, &[ObjectId])> {
        self.resident.iter().map(|(k, ids)| (*k, ids.as_slice()))
    }

    pub fn feature_id(&self, key: FeatureKey) -> Option<&FeatureId> {
        match key.kind {
            OverlayKind::Line => self.store.line(key.index).map(|f| &f.id),
            OverlayKind::Polygon => self.store.polygon(key.index).map(|f| &f.id),
        }
    }

    pub fn attributes(&self, key: FeatureKey) -> Option<Vec<(&'static str, String)>> {
        match key.kind {
            OverlayKind::Line => self.store.line(key.index).map(LineFeature::attributes),
            OverlayKind::Polygon => self.store.polygon(key.index).map(PolygonFeature::attributes),
        }
    }

    /// Brings the scene's overlay objects in line with the features within
    /// radius of `reference`.
    pub fn update<S: SceneHandle + ?Sized>(
        &mut self,
        scene: &mut S,
        reference: ReferencePoint,
    ) -> UpdateSummary {
        let projector = LocalProjector::new(reference, self.config.projection_params());
        let visible = self.visible_keys(reference);
        let mut summary = UpdateSummary {
            skipped: self.unrenderable.len(),
            ..UpdateSummary::default()
        };

        let departed: Vec<FeatureKey> = self
            .resident
            .keys()
            .filter(|k| !visible.contains(k))
            .copied()
            .collect();
        for key in departed {
            summary.removed += self.evict(scene, key);
        }

        let moved = self.last_reference != Some(reference);
        for key in visible {
            if self.resident.contains_key(&key) && !moved {
                continue;
            }
            let Some(objects) = self.build_objects(key, &projector) else {
                // Only reachable if projection degenerates a ring at this
                // reference; treat the feature as not drawable here.
                summary.removed += self.evict(scene, key);
                summary.skipped += 1;
                continue;
            };

            match self.resident.remove(&key) {
                Some(ids) => {
                    let ids = self.refresh(scene, ids, objects, &mut summary);
                    self.resident.insert(key, ids);
                }
                None => {
                    summary.added += objects.len();
                    let ids = objects.into_iter().map(|o| scene.add(o)).collect();
                    self.resident.insert(key, ids);
                }
            }
        }

        self.last_reference = Some(reference);
        summary.resident = self.resident_count();
        debug!(
            reference = %reference,
            added = summary.added,
            removed = summary.removed,
            refreshed = summary.refreshed,
            skipped = summary.skipped,
            resident = summary.resident,
            "overlay updated"
        );
        summary
    }

    /// Removes every resident object. Returns how many left the scene.
    pub fn teardown<S: SceneHandle + ?Sized>(&mut self, scene: &mut S) -> usize {
        let keys: Vec<FeatureKey> = self.resident.keys().copied().collect();
        let removed: usize = keys.into_iter().map(|k| self.evict(scene, k)).sum();
        self.last_reference = None;
        info!(removed, "overlay torn down");
        removed
    }

    fn visible_keys(&self, reference: ReferencePoint) -> BTreeSet<FeatureKey> {
        let lines = self
            .store
            .lines()
            .iter()
            .filter(|f| self.filter.line_in_radius(&f.coordinates, reference))
            .map(|f| FeatureKey::line(f.index));
        let polygons = self
            .store
            .polygons()
            .iter()
            .filter(|f| self.filter.polygon_in_radius(&f.rings, reference))
            .map(|f| FeatureKey::polygon(f.index));

        lines
            .chain(polygons)
            .filter(|k| !self.unrenderable.contains(k))
            .collect()
    }

    fn evict<S: SceneHandle + ?Sized>(&mut self, scene: &mut S, key: FeatureKey) -> usize {
        let Some(ids) = self.resident.remove(&key) else {
            return 0;
        };
        let mut removed = 0;
        for id in ids {
            if scene.remove(id).is_some() {
                removed += 1;
            } else {
                warn!(feature = %key, ?id, "overlay object already gone from scene");
            }
        }
        removed
    }

    fn refresh<S: SceneHandle + ?Sized>(
        &self,
        scene: &mut S,
        ids: Vec<ObjectId>,
        objects: Vec<SceneObject>,
        summary: &mut UpdateSummary,
    ) -> Vec<ObjectId> {
        let mut kept = Vec::with_capacity(objects.len());
        let mut ids = ids.into_iter();
        for object in objects {
            let replaced = match ids.next() {
                Some(id) => scene.replace(id, object).map(|()| id),
                None => Err(object),
            };
            match replaced {
                Ok(id) => {
                    summary.refreshed += 1;
                    kept.push(id);
                }
                Err(object) => {
                    warn!("overlay object missing on refresh, re-adding");
                    summary.added += 1;
                    kept.push(scene.add(object));
                }
            }
        }
        for leftover in ids {
            if scene.remove(leftover).is_some() {
                summary.removed += 1;
            }
        }
        kept
    }

    fn build_objects(
        &self,
        key: FeatureKey,
        projector: &LocalProjector,
    ) -> Option<Vec<SceneObject>> {
        match key.kind {
            OverlayKind::Line => {
                let feature = self.store.line(key.index)?;
                Some(vec![line_object(feature, projector, self.placement)])
            }
            OverlayKind::Polygon => {
                let feature = self.store.polygon(key.index)?;
                polygon_objects(feature, projector, self.placement)
            }
        }
    }
}

fn line_object(
    feature: &LineFeature,
    projector: &LocalProjector,
    placement: Transform,
) -> SceneObject {
    SceneObject::new(
        Geometry::LineStrip {
            points: projector.project_all(&feature.coordinates),
        },
        FeatureStyle::line(feature.index).fill,
        placement,
    )
    .with_overlay_tag(OverlayTag::new(
        OverlayKind::Line,
        feature.index,
        feature.id.as_str(),
        OverlayPart::Strip,
    ))
}

fn polygon_objects(
    feature: &PolygonFeature,
    projector: &LocalProjector,
    placement: Transform,
) -> Option<Vec<SceneObject>> {
    let ring = projector.project_all(feature.outer_ring());
    let shape = PlanarShape::from_ring(&ring)?;
    let surface = shape.triangulate()?;
    let style = FeatureStyle::polygon(feature.index);
    let tag = |part| {
        OverlayTag::new(
            OverlayKind::Polygon,
            feature.index,
            feature.id.as_str(),
            part,
        )
    };

    let mut objects = vec![
        SceneObject::new(surface, style.fill, placement)
            .with_overlay_tag(tag(OverlayPart::Surface)),
    ];
    if let Some(outline) = style.outline {
        objects.push(
            SceneObject::new(shape.outline(), outline, placement)
                .with_overlay_tag(tag(OverlayPart::Outline)),
        );
    }
    Some(objects)
}

/// Renderability does not depend on where the viewer stands, so it is
/// decided once per store, projecting each ring around its own first vertex.
fn find_unrenderable(store: &FeatureStore, config: &OverlayConfig) -> BTreeSet<FeatureKey> {
    let params = config.projection_params();
    let lines = store
        .lines()
        .iter()
        .filter(|f| !f.is_renderable())
        .map(|f| FeatureKey::line(f.index));
    let polygons = store
        .polygons()
        .iter()
        .filter(|f| {
            let ring = f.outer_ring();
            let Some(anchor) = ring.first() else {
                return true;
            };
            let projector =
                LocalProjector::new(ReferencePoint::new(anchor.lon_deg, anchor.lat_deg), params);
            PlanarShape::from_ring(&projector.project_all(ring))
                .and_then(|shape| shape.triangulate())
                .is_none()
        })
        .map(|f| FeatureKey::polygon(f.index));
    lines.chain(polygons).collect()
}
