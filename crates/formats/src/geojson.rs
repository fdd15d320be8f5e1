//! Structural GeoJSON decoding.
//!
//! Document-level problems fail the whole collection; anything wrong with a
//! single feature is reported as a [`FeatureError`] so callers can skip it
//! and keep the rest.

use foundation::math::GeoCoordinate;
use serde_json::{Map, Value};

#[derive(Debug)]
pub enum GeoJsonError {
    InvalidJson(serde_json::Error),
    NotAFeatureCollection,
}

impl std::fmt::Display for GeoJsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeoJsonError::InvalidJson(e) => write!(f, "JSON parse error: {e}"),
            GeoJsonError::NotAFeatureCollection => {
                write!(f, "expected GeoJSON FeatureCollection")
            }
        }
    }
}

impl std::error::Error for GeoJsonError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GeoJsonError::InvalidJson(e) => Some(e),
            GeoJsonError::NotAFeatureCollection => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureError {
    pub index: usize,
    pub reason: String,
}

impl FeatureError {
    pub fn new(index: usize, reason: impl Into<String>) -> Self {
        Self {
            index,
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for FeatureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid feature at index {}: {}", self.index, self.reason)
    }
}

impl std::error::Error for FeatureError {}

/// One `Feature` object, geometry still undecoded.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFeature {
    pub index: usize,
    pub id: Option<String>,
    pub properties: Map<String, Value>,
    pub geometry: Value,
}

impl RawFeature {
    /// Geometry `type` member, if present.
    pub fn geometry_type(&self) -> Option<&str> {
        self.geometry.get("type").and_then(|v| v.as_str())
    }

    pub fn coordinates(&self) -> Result<&Value, FeatureError> {
        self.geometry
            .get("coordinates")
            .ok_or_else(|| FeatureError::new(self.index, "geometry missing coordinates"))
    }
}

/// Splits a FeatureCollection into raw features. Entries that are not
/// `Feature` objects come back as errors next to the good ones.
pub fn read_feature_collection(
    payload: &str,
) -> Result<Vec<Result<RawFeature, FeatureError>>, GeoJsonError> {
    let value: Value = serde_json::from_str(payload).map_err(GeoJsonError::InvalidJson)?;
    let obj = value.as_object().ok_or(GeoJsonError::NotAFeatureCollection)?;
    if obj.get("type").and_then(|v| v.as_str()) != Some("FeatureCollection") {
        return Err(GeoJsonError::NotAFeatureCollection);
    }
    let features = obj
        .get("features")
        .and_then(|v| v.as_array())
        .ok_or(GeoJsonError::NotAFeatureCollection)?;

    Ok(features
        .iter()
        .enumerate()
        .map(|(index, value)| read_feature(index, value))
        .collect())
}

fn read_feature(index: usize, value: &Value) -> Result<RawFeature, FeatureError> {
    let obj = value
        .as_object()
        .ok_or_else(|| FeatureError::new(index, "feature must be an object"))?;

    match obj.get("type").and_then(|v| v.as_str()) {
        Some("Feature") => {}
        Some(other) => {
            return Err(FeatureError::new(
                index,
                format!("unexpected feature type: {other}"),
            ));
        }
        None => return Err(FeatureError::new(index, "feature missing type")),
    }

    let id = match obj.get("id") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };

    let properties = obj
        .get("properties")
        .and_then(|v| v.as_object())
        .cloned()
        .unwrap_or_default();

    let geometry = match obj.get("geometry") {
        Some(g) if g.is_object() => g.clone(),
        _ => return Err(FeatureError::new(index, "feature missing geometry")),
    };

    Ok(RawFeature {
        index,
        id,
        properties,
        geometry,
    })
}

/// `[lon, lat]` or `[lon, lat, alt]`; a missing altitude reads as 0.
pub fn parse_position(value: &Value) -> Result<GeoCoordinate, String> {
    let arr = value
        .as_array()
        .ok_or_else(|| "position must be an array".to_string())?;
    if arr.len() < 2 {
        return Err("position must have [lon, lat]".to_string());
    }
    let lon = arr[0]
        .as_f64()
        .ok_or_else(|| "lon must be a number".to_string())?;
    let lat = arr[1]
        .as_f64()
        .ok_or_else(|| "lat must be a number".to_string())?;
    let alt = match arr.get(2) {
        Some(v) => v
            .as_f64()
            .ok_or_else(|| "altitude must be a number".to_string())?,
        None => 0.0,
    };
    Ok(GeoCoordinate::new(lon, lat, alt))
}

pub fn parse_positions(value: &Value) -> Result<Vec<GeoCoordinate>, String> {
    let arr = value
        .as_array()
        .ok_or_else(|| "coordinates must be an array".to_string())?;
    arr.iter().map(parse_position).collect()
}

pub fn parse_rings(value: &Value) -> Result<Vec<Vec<GeoCoordinate>>, String> {
    let rings = value
        .as_array()
        .ok_or_else(|| "Polygon coordinates must be an array of rings".to_string())?;
    rings.iter().map(parse_positions).collect()
}

#[cfg(test)]
mod tests {
    use super::{GeoJsonError, parse_position, read_feature_collection};
    use serde_json::json;

    #[test]
    fn rejects_non_collections() {
        assert!(matches!(
            read_feature_collection(r#"{"type":"Feature"}"#),
            Err(GeoJsonError::NotAFeatureCollection)
        ));
        assert!(matches!(
            read_feature_collection("not json"),
            Err(GeoJsonError::InvalidJson(_))
        ));
    }

    #[test]
    fn bad_entries_are_reported_individually() {
        let payload = json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "id": 3, "properties": {}, "geometry": {"type": "Point", "coordinates": [1, 2]}},
                {"type": "Nope"},
                {"type": "Feature", "properties": {}}
            ]
        })
        .to_string();

        let features = read_feature_collection(&payload).expect("collection");
        assert_eq!(features.len(), 3);
        let first = features[0].as_ref().expect("first feature");
        assert_eq!(first.id.as_deref(), Some("3"));
        assert_eq!(first.geometry_type(), Some("Point"));
        assert_eq!(features[1].as_ref().unwrap_err().index, 1);
        assert_eq!(
            features[2].as_ref().unwrap_err().reason,
            "feature missing geometry"
        );
    }

    #[test]
    fn altitude_defaults_to_zero() {
        let c = parse_position(&json!([38.9, 45.0])).expect("position");
        assert_eq!(c.alt_m, 0.0);
        let c = parse_position(&json!([38.9, 45.0, 31.5])).expect("position");
        assert_eq!(c.alt_m, 31.5);
        assert!(parse_position(&json!([38.9])).is_err());
        assert!(parse_position(&json!(["a", 45.0])).is_err());
    }
}
