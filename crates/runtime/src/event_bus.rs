/// Session lifecycle events. Counts are scene objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    LoadStarted { ticket: u64 },
    SourceFailed { source: String, error: String },
    LoadDiscarded { ticket: u64 },
    OverlayUpdated {
        added: usize,
        removed: usize,
        refreshed: usize,
        resident: usize,
    },
    Closed { released: usize },
}

impl EventKind {
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::LoadStarted { .. } => "load_started",
            EventKind::SourceFailed { .. } => "source_failed",
            EventKind::LoadDiscarded { .. } => "load_discarded",
            EventKind::OverlayUpdated { .. } => "overlay_updated",
            EventKind::Closed { .. } => "closed",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::LoadStarted { ticket } => write!(f, "load #{ticket} started"),
            EventKind::SourceFailed { source, error } => write!(f, "{source} failed: {error}"),
            EventKind::LoadDiscarded { ticket } => write!(f, "load #{ticket} discarded"),
            EventKind::OverlayUpdated {
                added,
                removed,
                refreshed,
                resident,
            } => write!(
                f,
                "+{added} -{removed} ~{refreshed} ({resident} resident)"
            ),
            EventKind::Closed { released } => write!(f, "closed, released {released} objects"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub frame_index: u64,
    pub kind: EventKind,
}

#[derive(Debug, Default)]
pub struct EventBus {
    events: Vec<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, frame_index: u64, kind: EventKind) {
        self.events.push(Event { frame_index, kind });
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}
