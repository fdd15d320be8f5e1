//! Local tangent-plane frames anchored at a reference point.
//!
//! Output axes: `x` east, `y` north, `z` up, all in meters, origin at the
//! reference point lifted by the ground offset.

use serde::{Deserialize, Serialize};

use super::{GeoCoordinate, ReferencePoint, Vec3, geodetic_to_ecef};

/// Default camera-to-ground height (meters) subtracted from altitudes.
pub const DEFAULT_GROUND_OFFSET_M: f64 = 31.4;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionModel {
    /// Angular offsets scaled by the sphere radius, with no cos(latitude)
    /// correction on the east axis. Only usable within about a kilometer.
    #[default]
    Equirectangular,
    /// WGS84 geodetic → ECEF → East-North-Up at the reference point.
    Enu,
}

impl ProjectionModel {
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectionModel::Equirectangular => "equirectangular",
            ProjectionModel::Enu => "enu",
        }
    }
}

impl std::str::FromStr for ProjectionModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "equirectangular" => Ok(ProjectionModel::Equirectangular),
            "enu" => Ok(ProjectionModel::Enu),
            other => Err(format!("unknown projection: {other}")),
        }
    }
}

impl std::fmt::Display for ProjectionModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ProjectionParams {
    pub model: ProjectionModel,
    pub earth_radius_m: f64,
    pub ground_offset_m: f64,
}

impl Default for ProjectionParams {
    fn default() -> Self {
        Self {
            model: ProjectionModel::Equirectangular,
            earth_radius_m: super::MEAN_EARTH_RADIUS_M,
            ground_offset_m: DEFAULT_GROUND_OFFSET_M,
        }
    }
}

/// Project a geographic coordinate into the local frame of `reference`.
pub fn project(coord: GeoCoordinate, reference: ReferencePoint, params: &ProjectionParams) -> Vec3 {
    match params.model {
        ProjectionModel::Equirectangular => {
            let x = (coord.lon_deg - reference.lon_deg).to_radians() * params.earth_radius_m;
            let y = (coord.lat_deg - reference.lat_deg).to_radians() * params.earth_radius_m;
            Vec3::new(x, y, coord.alt_m - params.ground_offset_m)
        }
        ProjectionModel::Enu => {
            let enu = ecef_to_enu(geodetic_to_ecef(coord), reference.as_coordinate());
            Vec3::new(enu.x, enu.y, enu.z - params.ground_offset_m)
        }
    }
}

/// Projector bound to one reference point; what the overlay holds per update.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LocalProjector {
    reference: ReferencePoint,
    params: ProjectionParams,
}

impl LocalProjector {
    pub fn new(reference: ReferencePoint, params: ProjectionParams) -> Self {
        Self { reference, params }
    }

    pub fn project(&self, coord: GeoCoordinate) -> Vec3 {
        project(coord, self.reference, &self.params)
    }

    pub fn project_all(&self, coords: &[GeoCoordinate]) -> Vec<Vec3> {
        coords.iter().map(|c| self.project(*c)).collect()
    }
}

/// ECEF point expressed as (east, north, up) relative to `origin`.
fn ecef_to_enu(point: Vec3, origin: GeoCoordinate) -> Vec3 {
    let d = point - geodetic_to_ecef(origin);

    let (sin_lat, cos_lat) = origin.lat_deg.to_radians().sin_cos();
    let (sin_lon, cos_lon) = origin.lon_deg.to_radians().sin_cos();

    let east = -sin_lon * d.x + cos_lon * d.y;
    let north = -sin_lat * cos_lon * d.x - sin_lat * sin_lon * d.y + cos_lat * d.z;
    let up = cos_lat * cos_lon * d.x + cos_lat * sin_lon * d.y + sin_lat * d.z;

    Vec3::new(east, north, up)
}

#[cfg(test)]
mod tests {
    use super::{LocalProjector, ProjectionModel, ProjectionParams, project};
    use crate::math::{GeoCoordinate, ReferencePoint};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn reference_projects_to_origin() {
        let params = ProjectionParams::default();
        let reference = ReferencePoint::new(38.97349, 45.02956);
        for alt in [-5.0, 0.0, 31.4, 120.0] {
            let p = project(GeoCoordinate::new(38.97349, 45.02956, alt), reference, &params);
            assert_eq!(p.x, 0.0);
            assert_eq!(p.y, 0.0);
            assert_close(p.z, alt - 31.4, 1e-12);
        }
    }

    #[test]
    fn equirectangular_scales_each_axis_independently() {
        let params = ProjectionParams::default();
        let reference = ReferencePoint::new(10.0, 60.0);
        let p = project(GeoCoordinate::new(10.001, 60.001, 0.0), reference, &params);
        let expected = 0.001f64.to_radians() * 6_371_000.0;
        // No cos(lat) shrink on the east axis, even at 60°N.
        assert_close(p.x, expected, 1e-6);
        assert_close(p.y, expected, 1e-6);
    }

    #[test]
    fn enu_reference_projects_to_origin_and_shrinks_east_axis() {
        let params = ProjectionParams {
            model: ProjectionModel::Enu,
            ..ProjectionParams::default()
        };
        let reference = ReferencePoint::new(10.0, 60.0);
        let origin = project(GeoCoordinate::new(10.0, 60.0, 31.4), reference, &params);
        assert_close(origin.x, 0.0, 1e-6);
        assert_close(origin.y, 0.0, 1e-6);
        assert_close(origin.z, 0.0, 1e-6);

        let east = project(GeoCoordinate::new(10.001, 60.0, 31.4), reference, &params);
        let north = project(GeoCoordinate::new(10.0, 60.001, 31.4), reference, &params);
        assert!(east.x > 0.0 && north.y > 0.0);
        // At 60°N a degree of longitude is about half a degree of latitude.
        assert_close(east.x / north.y, 0.5, 0.01);
    }

    #[test]
    fn projector_projects_every_vertex() {
        let projector = LocalProjector::new(ReferencePoint::default(), ProjectionParams::default());
        let coords = [
            GeoCoordinate::new(38.97349, 45.02956, 31.4),
            GeoCoordinate::new(38.97359, 45.02956, 31.4),
        ];
        let points = projector.project_all(&coords);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].x, 0.0);
        assert!(points[1].x > 7.0 && points[1].x < 12.0);
    }

    #[test]
    fn model_names_parse_case_insensitively() {
        assert_eq!("ENU".parse::<ProjectionModel>(), Ok(ProjectionModel::Enu));
        assert_eq!(
            ProjectionModel::Equirectangular.to_string().parse::<ProjectionModel>(),
            Ok(ProjectionModel::Equirectangular)
        );
        assert!("mercator".parse::<ProjectionModel>().is_err());
    }
}
