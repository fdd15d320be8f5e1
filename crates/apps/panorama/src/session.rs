//! Panorama open/close lifecycle around one live scene.
//!
//! Opening a panorama creates the scene and issues a [`LoadTicket`]. The
//! feature load completes later; its result is applied only while the same
//! panorama is still open. Closing stops the render loop, releases every
//! overlay object and only then drops the scene.

use foundation::math::ReferencePoint;
use layers::{OverlayConfig, OverlaySceneManager, UpdateSummary};
use runtime::{EventBus, EventKind, Frame, RenderLoop};
use scene::prefabs::spawn_panorama_sphere;
use scene::render::{RenderFrame, collect};
use scene::{ObjectId, Scene};
use streaming::{FeatureStore, LoadReport};
use tracing::{debug, info, warn};

/// Identifies one open-panorama load.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied(UpdateSummary),
    /// The panorama was closed or reopened before the load finished.
    Discarded,
}

struct OpenView {
    ticket: LoadTicket,
    reference: ReferencePoint,
    scene: Scene,
    backdrop: ObjectId,
    overlay: Option<OverlaySceneManager>,
}

pub struct PanoramaSession {
    config: OverlayConfig,
    next_ticket: u64,
    view: Option<OpenView>,
    render_loop: RenderLoop,
    events: EventBus,
}

impl PanoramaSession {
    pub fn new(config: OverlayConfig) -> Self {
        Self {
            config,
            next_ticket: 1,
            view: None,
            render_loop: RenderLoop::default(),
            events: EventBus::new(),
        }
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn is_open(&self) -> bool {
        self.view.is_some()
    }

    pub fn is_rendering(&self) -> bool {
        self.render_loop.is_running()
    }

    pub fn ticket(&self) -> Option<LoadTicket> {
        self.view.as_ref().map(|v| v.ticket)
    }

    pub fn reference(&self) -> Option<ReferencePoint> {
        self.view.as_ref().map(|v| v.reference)
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.view.as_ref().map(|v| &v.scene)
    }

    pub fn backdrop(&self) -> Option<ObjectId> {
        self.view.as_ref().map(|v| v.backdrop)
    }

    pub fn overlay(&self) -> Option<&OverlaySceneManager> {
        self.view.as_ref().and_then(|v| v.overlay.as_ref())
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    /// Opens a panorama at `reference`, closing any panorama already open.
    pub fn open(&mut self, reference: ReferencePoint) -> LoadTicket {
        if self.is_open() {
            self.close();
        }

        let ticket = LoadTicket(self.next_ticket);
        self.next_ticket += 1;

        let mut scene = Scene::new();
        let backdrop = spawn_panorama_sphere(&mut scene);
        self.view = Some(OpenView {
            ticket,
            reference,
            scene,
            backdrop,
            overlay: None,
        });

        info!(ticket = ticket.0, %reference, "panorama opened");
        self.emit(EventKind::LoadStarted { ticket: ticket.0 });
        ticket
    }

    /// Applies a finished load: one overlay update at the current reference,
    /// then the render loop starts. Stale tickets leave everything untouched.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        store: FeatureStore,
        report: &LoadReport,
    ) -> LoadOutcome {
        let Some(view) = self
            .view
            .as_mut()
            .filter(|v| v.ticket == ticket && v.overlay.is_none())
        else {
            warn!(ticket = ticket.0, "load finished after its panorama closed; discarding");
            self.emit(EventKind::LoadDiscarded { ticket: ticket.0 });
            return LoadOutcome::Discarded;
        };

        let mut overlay = OverlaySceneManager::new(store, self.config);
        let summary = overlay.update(&mut view.scene, view.reference);
        view.overlay = Some(overlay);
        self.render_loop.start();

        let failures: Vec<EventKind> = report
            .outcomes()
            .into_iter()
            .filter_map(|o| {
                o.result.as_ref().err().map(|e| EventKind::SourceFailed {
                    source: o.location.clone(),
                    error: e.to_string(),
                })
            })
            .collect();
        for failure in failures {
            self.emit(failure);
        }
        self.emit_summary(&summary);

        info!(
            ticket = ticket.0,
            resident = summary.resident,
            skipped = summary.skipped,
            "overlay ready"
        );
        LoadOutcome::Applied(summary)
    }

    /// Moves the viewpoint. `None` while no panorama is open or its data has
    /// not arrived yet; a pending load still picks up the new reference.
    pub fn move_reference(&mut self, reference: ReferencePoint) -> Option<UpdateSummary> {
        let view = self.view.as_mut()?;
        view.reference = reference;
        let overlay = view.overlay.as_mut()?;
        let summary = overlay.update(&mut view.scene, reference);
        if !summary.is_unchanged() {
            self.emit_summary(&summary);
        }
        Some(summary)
    }

    /// Advances the render loop one frame and collects its draw list.
    pub fn render_frame(&mut self) -> Option<(Frame, RenderFrame)> {
        let scene = &self.view.as_ref()?.scene;
        let frame = self.render_loop.tick()?;
        let draws = collect(scene);
        debug!(
            frame = frame.index,
            draws = draws.commands.len(),
            overlay = draws.overlay_draws(scene),
            "frame rendered"
        );
        Some((frame, draws))
    }

    /// Returns how many overlay objects were released.
    pub fn close(&mut self) -> usize {
        let Some(mut view) = self.view.take() else {
            return 0;
        };
        self.render_loop.cancel();
        let released = view
            .overlay
            .as_mut()
            .map(|o| o.teardown(&mut view.scene))
            .unwrap_or(0);
        drop(view);

        info!(released, "panorama closed");
        self.emit(EventKind::Closed { released });
        released
    }

    fn emit_summary(&mut self, summary: &UpdateSummary) {
        self.emit(EventKind::OverlayUpdated {
            added: summary.added,
            removed: summary.removed,
            refreshed: summary.refreshed,
            resident: summary.resident,
        });
    }

    fn emit(&mut self, kind: EventKind) {
        self.events.emit(self.render_loop.frames_run(), kind);
    }
}

impl Default for PanoramaSession {
    fn default() -> Self {
        Self::new(OverlayConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::{LoadOutcome, PanoramaSession};
    use formats::{FeatureId, LineFeature};
    use foundation::math::{GeoCoordinate, ReferencePoint};
    use runtime::EventKind;
    use streaming::{FeatureSource, FeatureStore, LoadReport};

    fn near_line(r: ReferencePoint) -> LineFeature {
        LineFeature {
            index: 0,
            id: FeatureId("road-1".to_string()),
            coordinates: vec![
                GeoCoordinate::new(r.lon_deg, r.lat_deg, 31.4),
                GeoCoordinate::new(r.lon_deg + 0.0001, r.lat_deg, 31.4),
            ],
            properties: Default::default(),
        }
    }

    async fn empty_report() -> LoadReport {
        let missing = FeatureSource::parse("/no/such/panorama/line.json");
        FeatureStore::load(&missing, &missing).await.1
    }

    fn store(r: ReferencePoint) -> FeatureStore {
        FeatureStore::new(vec![near_line(r)], Vec::new())
    }

    #[tokio::test]
    async fn load_applies_one_update_and_starts_rendering() {
        let r = ReferencePoint::default();
        let report = empty_report().await;
        let mut session = PanoramaSession::default();
        let ticket = session.open(r);
        assert!(!session.is_rendering());
        assert_eq!(session.render_frame(), None);

        let LoadOutcome::Applied(summary) = session.complete_load(ticket, store(r), &report) else {
            panic!("load should apply");
        };
        assert_eq!(summary.added, 1);
        assert!(session.is_rendering());

        let (frame, draws) = session.render_frame().expect("frame");
        assert_eq!(frame.index, 0);
        // Backdrop sphere plus the line strip.
        assert_eq!(draws.commands.len(), 2);
        assert_eq!(
            session.scene().map(|s| draws.overlay_draws(s)),
            Some(1)
        );

        let kinds: Vec<_> = session.events().events().iter().map(|e| e.kind.name()).collect();
        assert_eq!(
            kinds,
            vec!["load_started", "source_failed", "source_failed", "overlay_updated"]
        );
    }

    #[tokio::test]
    async fn load_after_close_is_discarded() {
        let r = ReferencePoint::default();
        let report = empty_report().await;
        let mut session = PanoramaSession::default();
        let ticket = session.open(r);
        assert_eq!(session.close(), 0);

        assert_eq!(
            session.complete_load(ticket, store(r), &report),
            LoadOutcome::Discarded
        );
        assert!(session.scene().is_none());
        assert!(!session.is_rendering());
        assert!(matches!(
            session.events().events().last().map(|e| &e.kind),
            Some(EventKind::LoadDiscarded { ticket: 1 })
        ));
    }

    #[tokio::test]
    async fn reopening_invalidates_the_previous_ticket() {
        let r = ReferencePoint::default();
        let report = empty_report().await;
        let mut session = PanoramaSession::default();
        let first = session.open(r);
        let second = session.open(r);
        assert_ne!(first, second);

        assert_eq!(
            session.complete_load(first, store(r), &report),
            LoadOutcome::Discarded
        );
        assert!(session.overlay().is_none());
        assert!(matches!(
            session.complete_load(second, store(r), &report),
            LoadOutcome::Applied(_)
        ));
        // A second completion for the same ticket is stale too.
        assert_eq!(
            session.complete_load(second, store(r), &report),
            LoadOutcome::Discarded
        );
    }

    #[tokio::test]
    async fn close_releases_overlay_and_stops_rendering() {
        let r = ReferencePoint::default();
        let report = empty_report().await;
        let mut session = PanoramaSession::default();
        let ticket = session.open(r);
        session.complete_load(ticket, store(r), &report);
        session.render_frame();

        assert_eq!(session.close(), 1);
        assert!(!session.is_open());
        assert!(!session.is_rendering());
        assert_eq!(session.render_frame(), None);
        assert!(matches!(
            session.events().events().last().map(|e| &e.kind),
            Some(EventKind::Closed { released: 1 })
        ));
    }

    #[tokio::test]
    async fn move_reference_without_data_is_a_no_op() {
        let r = ReferencePoint::default();
        let mut session = PanoramaSession::default();
        assert_eq!(session.move_reference(r), None);

        let ticket = session.open(ReferencePoint::new(0.0, 0.0));
        assert_eq!(session.move_reference(r), None);

        // The pending load uses the reference set while it was in flight.
        let report = empty_report().await;
        let LoadOutcome::Applied(summary) = session.complete_load(ticket, store(r), &report) else {
            panic!("load should apply");
        };
        assert_eq!(summary.resident, 1);

        let far = ReferencePoint::new(r.lon_deg + 0.01, r.lat_deg);
        let moved = session.move_reference(far).expect("live overlay");
        assert_eq!(moved.removed, 1);
        assert_eq!(session.scene().map(|s| s.overlay_count()), Some(0));
        assert!(session.scene().is_some_and(|s| session.backdrop().is_some_and(|b| s.contains(b))));
    }
}
