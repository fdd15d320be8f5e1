//! Radius filter deciding which features are near the viewpoint.
//!
//! Lines and polygons are tested per vertex: a feature counts as near when
//! any of its vertices is within the radius. A long segment passing close to
//! the viewpoint with both ends far away is therefore missed.

use foundation::math::{GeoCoordinate, ReferencePoint, haversine_distance_m};

use crate::config::OverlayConfig;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RadiusFilter {
    radius_m: f64,
    earth_radius_m: f64,
}

impl RadiusFilter {
    pub fn new(radius_m: f64, earth_radius_m: f64) -> Self {
        Self {
            radius_m,
            earth_radius_m,
        }
    }

    pub fn from_config(config: &OverlayConfig) -> Self {
        Self::new(config.radius_meters, config.earth_radius_meters)
    }

    pub fn distance_m(&self, point: &GeoCoordinate, reference: ReferencePoint) -> f64 {
        haversine_distance_m(
            point.lon_deg,
            point.lat_deg,
            reference.lon_deg,
            reference.lat_deg,
            self.earth_radius_m,
        )
    }

    /// Inclusive: a point exactly on the radius is inside.
    pub fn point_in_radius(&self, point: &GeoCoordinate, reference: ReferencePoint) -> bool {
        self.distance_m(point, reference) <= self.radius_m
    }

    pub fn line_in_radius(&self, coordinates: &[GeoCoordinate], reference: ReferencePoint) -> bool {
        coordinates
            .iter()
            .any(|c| self.point_in_radius(c, reference))
    }

    pub fn polygon_in_radius(
        &self,
        rings: &[Vec<GeoCoordinate>],
        reference: ReferencePoint,
    ) -> bool {
        rings
            .iter()
            .any(|ring| self.line_in_radius(ring, reference))
    }
}

impl Default for RadiusFilter {
    fn default() -> Self {
        Self::from_config(&OverlayConfig::default())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::RadiusFilter;
    use foundation::math::{GeoCoordinate, MEAN_EARTH_RADIUS_M, ReferencePoint};

    /// Coordinate `east_m`/`north_m` meters away from `reference`.
    pub(crate) fn offset(reference: ReferencePoint, east_m: f64, north_m: f64) -> GeoCoordinate {
        let lat_rad = reference.lat_deg.to_radians();
        let d_lat = (north_m / MEAN_EARTH_RADIUS_M).to_degrees();
        let d_lon = (east_m / (MEAN_EARTH_RADIUS_M * lat_rad.cos())).to_degrees();
        GeoCoordinate::new(reference.lon_deg + d_lon, reference.lat_deg + d_lat, 31.4)
    }

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn offset_helper_is_accurate_at_short_range() {
        let r = ReferencePoint::default();
        let filter = RadiusFilter::default();
        assert_close(filter.distance_m(&offset(r, 30.0, 40.0), r), 50.0, 0.01);
    }

    #[test]
    fn reference_is_within_its_own_radius() {
        let r = ReferencePoint::default();
        assert!(RadiusFilter::default().point_in_radius(&r.as_coordinate(), r));
    }

    #[test]
    fn boundary_is_inclusive() {
        let r = ReferencePoint::default();
        let filter = RadiusFilter::default();
        assert!(filter.point_in_radius(&offset(r, 0.0, 49.99), r));
        assert!(!filter.point_in_radius(&offset(r, 0.0, 50.01), r));
    }

    #[test]
    fn line_is_near_when_any_vertex_is_near() {
        let r = ReferencePoint::new(38.97349, 45.02956);
        let filter = RadiusFilter::default();
        let line = [offset(r, 10.0, 0.0), offset(r, 1000.0, 0.0)];
        assert!(filter.line_in_radius(&line, r));

        let far = [offset(r, 1000.0, 0.0), offset(r, -1000.0, 0.0)];
        // Passes straight through the reference but has no near vertex.
        assert!(!filter.line_in_radius(&far, r));
        assert!(!filter.line_in_radius(&[], r));
    }

    #[test]
    fn polygon_checks_every_ring() {
        let r = ReferencePoint::default();
        let filter = RadiusFilter::default();
        let outer = vec![
            offset(r, 200.0, 0.0),
            offset(r, 0.0, 200.0),
            offset(r, -200.0, 0.0),
            offset(r, 200.0, 0.0),
        ];
        assert!(!filter.polygon_in_radius(std::slice::from_ref(&outer), r));

        let hole = vec![offset(r, 5.0, 5.0), offset(r, 6.0, 5.0), offset(r, 5.0, 6.0)];
        assert!(filter.polygon_in_radius(&[outer, hole], r));
    }
}
