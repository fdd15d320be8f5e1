pub mod geojson;
pub mod road_features;

pub use geojson::{FeatureError, GeoJsonError};
pub use road_features::*;
