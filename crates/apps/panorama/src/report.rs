use std::collections::BTreeMap;
use std::fmt::Write as _;

use layers::UpdateSummary;
use runtime::Event;
use serde::Serialize;
use streaming::LoadReport;

use crate::session::PanoramaSession;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceSummary {
    pub role: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loaded: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResidentFeature {
    pub key: String,
    pub id: String,
    pub objects: usize,
    pub attributes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventRecord {
    pub frame: u64,
    pub event: &'static str,
    pub detail: String,
}

impl From<&Event> for EventRecord {
    fn from(e: &Event) -> Self {
        Self {
            frame: e.frame_index,
            event: e.kind.name(),
            detail: e.kind.to_string(),
        }
    }
}

/// What the CLI prints once the session has run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub reference: Option<String>,
    pub interrupted: bool,
    pub sources: Vec<SourceSummary>,
    pub updates: Vec<UpdateSummary>,
    pub frames: u64,
    pub resident: Vec<ResidentFeature>,
    pub events: Vec<EventRecord>,
}

impl RunReport {
    pub fn new(load: Option<&LoadReport>) -> Self {
        Self {
            reference: None,
            interrupted: false,
            sources: load.map(summarize_sources).unwrap_or_default(),
            updates: Vec::new(),
            frames: 0,
            resident: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Snapshot of the live overlay; call before the session closes.
    pub fn capture_resident(&mut self, session: &PanoramaSession) {
        self.reference = session.reference().map(|r| r.to_string());
        let Some(overlay) = session.overlay() else {
            return;
        };
        self.resident = overlay
            .resident_features()
            .map(|(key, ids)| ResidentFeature {
                key: key.to_string(),
                id: overlay
                    .feature_id(key)
                    .map(|id| id.to_string())
                    .unwrap_or_default(),
                objects: ids.len(),
                attributes: overlay
                    .attributes(key)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v))
                    .collect(),
            })
            .collect();
    }

    pub fn capture_events(&mut self, session: &mut PanoramaSession) {
        self.events = session
            .events_mut()
            .drain()
            .iter()
            .map(EventRecord::from)
            .collect();
    }

    /// Human-readable listing; `attributes` adds each resident feature's
    /// metadata.
    pub fn describe(&self, attributes: bool) -> String {
        let mut out = String::new();
        if let Some(reference) = &self.reference {
            let _ = writeln!(out, "reference: {reference}");
        }
        for source in &self.sources {
            match &source.error {
                Some(error) => {
                    let _ = writeln!(out, "{} ({}): {error}", source.role, source.location);
                }
                None => {
                    let _ = writeln!(
                        out,
                        "{} ({}): {} loaded, {} rejected",
                        source.role,
                        source.location,
                        source.loaded.unwrap_or(0),
                        source.rejected.unwrap_or(0)
                    );
                }
            }
        }
        let _ = writeln!(out, "frames: {}", self.frames);
        let _ = writeln!(out, "resident features: {}", self.resident.len());
        for feature in &self.resident {
            let _ = writeln!(out, "{} {}", feature.key, feature.id);
            if !attributes {
                continue;
            }
            for (k, v) in &feature.attributes {
                let _ = writeln!(out, "  {k}: {v}");
            }
        }
        for event in &self.events {
            let _ = writeln!(out, "[{}] {}: {}", event.frame, event.event, event.detail);
        }
        if self.interrupted {
            out.push_str("interrupted\n");
        }
        out
    }
}

fn summarize_sources(report: &LoadReport) -> Vec<SourceSummary> {
    report
        .outcomes()
        .into_iter()
        .map(|o| match &o.result {
            Ok(stats) => SourceSummary {
                role: o.role.to_string(),
                location: o.location.clone(),
                loaded: Some(stats.loaded),
                rejected: Some(stats.rejected),
                error: None,
            },
            Err(e) => SourceSummary {
                role: o.role.to_string(),
                location: o.location.clone(),
                loaded: None,
                rejected: None,
                error: Some(e.to_string()),
            },
        })
        .collect()
}
