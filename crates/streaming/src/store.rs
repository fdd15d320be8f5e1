use formats::{
    FeatureBatch, GeoJsonError, LineFeature, PolygonFeature, parse_line_features,
    parse_polygon_features,
};
use tracing::{debug, info, warn};

use crate::source::{FeatureSource, SourceError};

/// Which of the two collections a source feeds.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SourceRole {
    Lines,
    Polygons,
}

impl std::fmt::Display for SourceRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceRole::Lines => f.write_str("lines"),
            SourceRole::Polygons => f.write_str("polygons"),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct SourceStats {
    pub loaded: usize,
    pub rejected: usize,
}

#[derive(Debug)]
pub struct SourceOutcome {
    pub role: SourceRole,
    pub location: String,
    pub result: Result<SourceStats, SourceError>,
}

impl SourceOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-source result of [`FeatureStore::load`]; one failure never hides the
/// other source's outcome.
#[derive(Debug)]
pub struct LoadReport {
    pub lines: SourceOutcome,
    pub polygons: SourceOutcome,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.lines.is_ok() && self.polygons.is_ok()
    }

    pub fn outcomes(&self) -> [&SourceOutcome; 2] {
        [&self.lines, &self.polygons]
    }

    pub fn failures(&self) -> impl Iterator<Item = (SourceRole, &SourceError)> {
        self.outcomes()
            .into_iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.role, e)))
    }
}

/// Every line and polygon feature of the session, in collection order.
/// Read-only once loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureStore {
    lines: Vec<LineFeature>,
    polygons: Vec<PolygonFeature>,
}

impl FeatureStore {
    pub fn new(lines: Vec<LineFeature>, polygons: Vec<PolygonFeature>) -> Self {
        Self { lines, polygons }
    }

    pub fn lines(&self) -> &[LineFeature] {
        &self.lines
    }

    pub fn polygons(&self) -> &[PolygonFeature] {
        &self.polygons
    }

    /// Line at `index` in its source collection. `None` if that entry was
    /// rejected or never existed.
    pub fn line(&self, index: usize) -> Option<&LineFeature> {
        let slot = self.lines.binary_search_by_key(&index, |f| f.index).ok()?;
        self.lines.get(slot)
    }

    pub fn polygon(&self, index: usize) -> Option<&PolygonFeature> {
        let slot = self
            .polygons
            .binary_search_by_key(&index, |f| f.index)
            .ok()?;
        self.polygons.get(slot)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.polygons.is_empty()
    }

    pub async fn load(lines: &FeatureSource, polygons: &FeatureSource) -> (Self, LoadReport) {
        Self::load_with_client(&reqwest::Client::new(), lines, polygons).await
    }

    /// Fetches both sources concurrently. A failed source leaves its
    /// collection empty and is recorded in the report.
    pub async fn load_with_client(
        http: &reqwest::Client,
        lines: &FeatureSource,
        polygons: &FeatureSource,
    ) -> (Self, LoadReport) {
        let (line_result, polygon_result) = tokio::join!(
            fetch_batch(http, SourceRole::Lines, lines, parse_line_features),
            fetch_batch(http, SourceRole::Polygons, polygons, parse_polygon_features),
        );

        let (line_features, line_outcome) = settle(SourceRole::Lines, lines, line_result);
        let (polygon_features, polygon_outcome) =
            settle(SourceRole::Polygons, polygons, polygon_result);

        (
            Self::new(line_features, polygon_features),
            LoadReport {
                lines: line_outcome,
                polygons: polygon_outcome,
            },
        )
    }
}

async fn fetch_batch<T>(
    http: &reqwest::Client,
    role: SourceRole,
    source: &FeatureSource,
    decode: fn(&str) -> Result<FeatureBatch<T>, GeoJsonError>,
) -> Result<FeatureBatch<T>, SourceError> {
    debug!(%role, %source, "fetching feature collection");
    let payload = source.fetch(http).await?;
    decode(&payload).map_err(SourceError::Decode)
}

fn settle<T>(
    role: SourceRole,
    source: &FeatureSource,
    result: Result<FeatureBatch<T>, SourceError>,
) -> (Vec<T>, SourceOutcome) {
    let location = source.to_string();
    match result {
        Ok(batch) => {
            for rejected in &batch.rejected {
                debug!(%role, %rejected, "skipping feature");
            }
            let stats = SourceStats {
                loaded: batch.features.len(),
                rejected: batch.rejected.len(),
            };
            info!(
                %role,
                source = %location,
                loaded = stats.loaded,
                rejected = stats.rejected,
                "feature collection loaded"
            );
            (
                batch.features,
                SourceOutcome {
                    role,
                    location,
                    result: Ok(stats),
                },
            )
        }
        Err(err) => {
            warn!(%role, source = %location, error = %err, "feature collection unavailable");
            (
                Vec::new(),
                SourceOutcome {
                    role,
                    location,
                    result: Err(err),
                },
            )
        }
    }
}
