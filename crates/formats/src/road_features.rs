use foundation::math::GeoCoordinate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::geojson::{
    FeatureError, GeoJsonError, RawFeature, parse_positions, parse_rings, read_feature_collection,
};

/// GeoJSON feature `id`, normalized to text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FeatureId(pub String);

impl FeatureId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn resolve(raw: &RawFeature, kind: &str) -> Self {
        match &raw.id {
            Some(id) => FeatureId(id.clone()),
            None => FeatureId(format!("{kind}-{}", raw.index)),
        }
    }
}

impl std::fmt::Display for FeatureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineProperties {
    #[serde(rename = "roadid")]
    pub road_id: Option<String>,
    pub road_code: Option<i64>,
    /// Start chainage (km).
    pub km_beg: Option<f64>,
    /// End chainage (km).
    pub km_end: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolygonProperties {
    #[serde(rename = "roadid")]
    pub road_id: Option<String>,
    pub road_code: Option<i64>,
    pub km_beg: Option<f64>,
    pub name: Option<String>,
    pub width: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineFeature {
    /// Position in the source collection, rejected features included.
    pub index: usize,
    pub id: FeatureId,
    pub coordinates: Vec<GeoCoordinate>,
    pub properties: LineProperties,
}

impl LineFeature {
    pub const MIN_VERTICES: usize = 2;

    pub fn is_renderable(&self) -> bool {
        self.coordinates.len() >= Self::MIN_VERTICES
    }

    /// `key: value` listing of the metadata, as shown in the inspect panel.
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        let p = &self.properties;
        let mut out = Vec::new();
        push_attr(&mut out, "roadid", p.road_id.as_ref());
        push_attr(&mut out, "road_code", p.road_code.as_ref());
        push_attr(&mut out, "km_beg", p.km_beg.as_ref());
        push_attr(&mut out, "km_end", p.km_end.as_ref());
        out
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolygonFeature {
    pub index: usize,
    pub id: FeatureId,
    /// Never empty; ring 0 is the outer ring.
    pub rings: Vec<Vec<GeoCoordinate>>,
    pub properties: PolygonProperties,
}

impl PolygonFeature {
    pub fn outer_ring(&self) -> &[GeoCoordinate] {
        self.rings.first().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        let p = &self.properties;
        let mut out = Vec::new();
        push_attr(&mut out, "roadid", p.road_id.as_ref());
        push_attr(&mut out, "road_code", p.road_code.as_ref());
        push_attr(&mut out, "km_beg", p.km_beg.as_ref());
        push_attr(&mut out, "name", p.name.as_ref());
        push_attr(&mut out, "width", p.width.as_ref());
        out
    }
}

fn push_attr<T: std::fmt::Display>(
    out: &mut Vec<(&'static str, String)>,
    key: &'static str,
    value: Option<&T>,
) {
    if let Some(v) = value {
        out.push((key, v.to_string()));
    }
}

/// Features that decoded cleanly plus the ones that were skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureBatch<T> {
    pub features: Vec<T>,
    pub rejected: Vec<FeatureError>,
}

impl<T> Default for FeatureBatch<T> {
    fn default() -> Self {
        Self {
            features: Vec::new(),
            rejected: Vec::new(),
        }
    }
}

pub fn parse_line_features(payload: &str) -> Result<FeatureBatch<LineFeature>, GeoJsonError> {
    parse_batch(payload, line_from_raw)
}

pub fn parse_polygon_features(
    payload: &str,
) -> Result<FeatureBatch<PolygonFeature>, GeoJsonError> {
    parse_batch(payload, polygon_from_raw)
}

fn parse_batch<T>(
    payload: &str,
    decode: fn(&RawFeature) -> Result<T, FeatureError>,
) -> Result<FeatureBatch<T>, GeoJsonError> {
    let mut batch = FeatureBatch::default();
    for entry in read_feature_collection(payload)? {
        match entry.and_then(|raw| decode(&raw)) {
            Ok(feature) => batch.features.push(feature),
            Err(e) => batch.rejected.push(e),
        }
    }
    Ok(batch)
}

fn line_from_raw(raw: &RawFeature) -> Result<LineFeature, FeatureError> {
    expect_geometry(raw, "LineString")?;
    let coordinates =
        parse_positions(raw.coordinates()?).map_err(|reason| FeatureError::new(raw.index, reason))?;
    ensure_finite(raw.index, &coordinates)?;

    Ok(LineFeature {
        index: raw.index,
        id: FeatureId::resolve(raw, "line"),
        coordinates,
        properties: decode_properties(raw)?,
    })
}

fn polygon_from_raw(raw: &RawFeature) -> Result<PolygonFeature, FeatureError> {
    expect_geometry(raw, "Polygon")?;
    let rings =
        parse_rings(raw.coordinates()?).map_err(|reason| FeatureError::new(raw.index, reason))?;
    if rings.is_empty() {
        return Err(FeatureError::new(raw.index, "Polygon has no rings"));
    }
    for ring in &rings {
        ensure_finite(raw.index, ring)?;
    }

    Ok(PolygonFeature {
        index: raw.index,
        id: FeatureId::resolve(raw, "polygon"),
        rings,
        properties: decode_properties(raw)?,
    })
}

fn expect_geometry(raw: &RawFeature, expected: &str) -> Result<(), FeatureError> {
    match raw.geometry_type() {
        Some(ty) if ty == expected => Ok(()),
        Some(ty) => Err(FeatureError::new(
            raw.index,
            format!("expected {expected} geometry, found {ty}"),
        )),
        None => Err(FeatureError::new(raw.index, "geometry missing type")),
    }
}

fn ensure_finite(index: usize, coords: &[GeoCoordinate]) -> Result<(), FeatureError> {
    if coords.iter().all(GeoCoordinate::is_finite) {
        Ok(())
    } else {
        Err(FeatureError::new(index, "non-finite coordinate"))
    }
}

fn decode_properties<T: DeserializeOwned>(raw: &RawFeature) -> Result<T, FeatureError> {
    serde_json::from_value(Value::Object(raw.properties.clone()))
        .map_err(|e| FeatureError::new(raw.index, format!("invalid properties: {e}")))
}
