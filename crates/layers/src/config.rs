use foundation::math::{
    DEFAULT_GROUND_OFFSET_M, MEAN_EARTH_RADIUS_M, ProjectionModel, ProjectionParams,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_RADIUS_M: f64 = 50.0;

/// Beyond this radius the flat-Earth projection distorts visibly.
pub const EQUIRECTANGULAR_MAX_RADIUS_M: f64 = 1_000.0;
pub const ENU_MAX_RADIUS_M: f64 = 10_000.0;

fn max_radius_m(model: ProjectionModel) -> f64 {
    match model {
        ProjectionModel::Equirectangular => EQUIRECTANGULAR_MAX_RADIUS_M,
        ProjectionModel::Enu => ENU_MAX_RADIUS_M,
    }
}

/// Proximity and projection settings of the overlay.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct OverlayConfig {
    /// Proximity cutoff (meters) for a feature to be shown.
    pub radius_meters: f64,
    /// Vertical shift (meters) subtracted from every altitude.
    pub ground_offset: f64,
    /// Sphere radius for both projection and haversine distance.
    pub earth_radius_meters: f64,
    pub projection: ProjectionModel,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            radius_meters: DEFAULT_RADIUS_M,
            ground_offset: DEFAULT_GROUND_OFFSET_M,
            earth_radius_meters: MEAN_EARTH_RADIUS_M,
            projection: ProjectionModel::Equirectangular,
        }
    }
}

impl OverlayConfig {
    /// Missing options take their defaults. Ranges are not checked here, so
    /// later overrides can still bring a value back in range before
    /// [`OverlayConfig::validate`].
    pub fn from_json_str(payload: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(payload).map_err(ConfigError::Parse)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.radius_meters.is_finite() && self.radius_meters > 0.0) {
            return Err(ConfigError::Invalid {
                field: "radiusMeters",
                value: self.radius_meters,
            });
        }
        if !(self.earth_radius_meters.is_finite() && self.earth_radius_meters > 0.0) {
            return Err(ConfigError::Invalid {
                field: "earthRadiusMeters",
                value: self.earth_radius_meters,
            });
        }
        if !self.ground_offset.is_finite() {
            return Err(ConfigError::Invalid {
                field: "groundOffset",
                value: self.ground_offset,
            });
        }
        let limit = max_radius_m(self.projection);
        if self.radius_meters > limit {
            return Err(ConfigError::RadiusBeyondProjection {
                radius: self.radius_meters,
                limit,
                projection: self.projection,
            });
        }
        Ok(())
    }

    pub fn projection_params(&self) -> ProjectionParams {
        ProjectionParams {
            model: self.projection,
            earth_radius_m: self.earth_radius_meters,
            ground_offset_m: self.ground_offset,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    Invalid {
        field: &'static str,
        value: f64,
    },
    RadiusBeyondProjection {
        radius: f64,
        limit: f64,
        projection: ProjectionModel,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "invalid overlay config: {e}"),
            ConfigError::Invalid { field, value } => write!(f, "{field} out of range: {value}"),
            ConfigError::RadiusBeyondProjection {
                radius,
                limit,
                projection,
            } => write!(
                f,
                "radiusMeters {radius} exceeds {limit} m supported by the {projection} projection"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, OverlayConfig};
    use foundation::math::ProjectionModel;

    #[test]
    fn defaults_match_panorama_constants() {
        let config = OverlayConfig::default();
        assert_eq!(config.radius_meters, 50.0);
        assert_eq!(config.ground_offset, 31.4);
        assert_eq!(config.earth_radius_meters, 6_371_000.0);
        assert!(config.validate().is_ok());
        assert_eq!(
            config.projection_params().model,
            ProjectionModel::Equirectangular
        );
    }

    #[test]
    fn reads_camel_case_options_and_fills_defaults() {
        let config =
            OverlayConfig::from_json_str(r#"{"radiusMeters": 75, "groundOffset": 2.5}"#)
                .expect("config");
        assert_eq!(config.radius_meters, 75.0);
        assert_eq!(config.ground_offset, 2.5);
        assert_eq!(config.earth_radius_meters, 6_371_000.0);
        assert_eq!(config.projection, ProjectionModel::Equirectangular);
    }

    #[test]
    fn rejects_unknown_options() {
        let err = OverlayConfig::from_json_str(r#"{"radius": 75}"#).expect_err("unknown field");
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn caps_radius_by_projection_model() {
        let flat = OverlayConfig::from_json_str(r#"{"radiusMeters": 5000}"#).expect("config");
        let err = flat.validate().expect_err("too wide for flat earth");
        assert!(matches!(err, ConfigError::RadiusBeyondProjection { .. }));
        assert!(err.to_string().contains("equirectangular projection"));

        let config =
            OverlayConfig::from_json_str(r#"{"radiusMeters": 5000, "projection": "enu"}"#)
                .expect("config");
        assert!(config.validate().is_ok(), "enu allows wider radius");
        assert_eq!(config.projection, ProjectionModel::Enu);
    }

    #[test]
    fn rejects_non_positive_radius() {
        let config = OverlayConfig {
            radius_meters: 0.0,
            ..OverlayConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "radiusMeters",
                ..
            })
        ));
    }
}
