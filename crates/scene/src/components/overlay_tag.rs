/// Which feature collection an overlay object was derived from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OverlayKind {
    Line,
    Polygon,
}

impl OverlayKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverlayKind::Line => "line",
            OverlayKind::Polygon => "polygon",
        }
    }
}

/// Role of an object within its feature's representation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OverlayPart {
    Strip,
    Surface,
    Outline,
}

/// Marks a scene object as a projected overlay of a source feature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OverlayTag {
    pub kind: OverlayKind,
    /// Position of the feature in its collection.
    pub index: usize,
    pub feature_id: String,
    pub part: OverlayPart,
}

impl OverlayTag {
    pub fn new(
        kind: OverlayKind,
        index: usize,
        feature_id: impl Into<String>,
        part: OverlayPart,
    ) -> Self {
        Self {
            kind,
            index,
            feature_id: feature_id.into(),
            part,
        }
    }
}
