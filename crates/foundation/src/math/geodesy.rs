use super::Vec3;

/// Mean Earth radius (meters), the sphere used for haversine distances.
pub const MEAN_EARTH_RADIUS_M: f64 = 6_371_000.0;

/// WGS84 semi-major axis (meters).
pub const WGS84_A: f64 = 6_378_137.0;
/// WGS84 flattening.
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;
/// WGS84 first eccentricity squared.
pub const WGS84_E2: f64 = WGS84_F * (2.0 - WGS84_F);

/// Geographic coordinate as read from a data source: degrees, degrees, meters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoCoordinate {
    pub lon_deg: f64,
    pub lat_deg: f64,
    pub alt_m: f64,
}

impl GeoCoordinate {
    pub fn new(lon_deg: f64, lat_deg: f64, alt_m: f64) -> Self {
        Self {
            lon_deg,
            lat_deg,
            alt_m,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.lon_deg.is_finite() && self.lat_deg.is_finite() && self.alt_m.is_finite()
    }
}

impl std::fmt::Display for GeoCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lon_deg, self.lat_deg)
    }
}

/// Panorama viewpoint. Altitude is not part of it: the ground offset is a
/// projection parameter.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ReferencePoint {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl ReferencePoint {
    /// Viewpoint used when the hosting viewer does not supply one.
    pub const FALLBACK: ReferencePoint = ReferencePoint {
        lon_deg: 38.97349,
        lat_deg: 45.02956,
    };

    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }

    pub fn as_coordinate(&self) -> GeoCoordinate {
        GeoCoordinate::new(self.lon_deg, self.lat_deg, 0.0)
    }
}

impl Default for ReferencePoint {
    fn default() -> Self {
        Self::FALLBACK
    }
}

impl std::fmt::Display for ReferencePoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lon_deg, self.lat_deg)
    }
}

/// Great-circle distance in meters between two lon/lat pairs (haversine).
pub fn haversine_distance_m(
    lon1_deg: f64,
    lat1_deg: f64,
    lon2_deg: f64,
    lat2_deg: f64,
    radius_m: f64,
) -> f64 {
    let d_lat = (lat2_deg - lat1_deg).to_radians();
    let d_lon = (lon2_deg - lon1_deg).to_radians();

    let half_lat = (d_lat * 0.5).sin();
    let half_lon = (d_lon * 0.5).sin();
    let a = half_lat * half_lat
        + lat1_deg.to_radians().cos() * lat2_deg.to_radians().cos() * half_lon * half_lon;

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    radius_m * c
}

/// WGS84 geodetic (degrees, meters) to Earth-centered Earth-fixed meters.
pub fn geodetic_to_ecef(coord: GeoCoordinate) -> Vec3 {
    let lat = coord.lat_deg.to_radians();
    let lon = coord.lon_deg.to_radians();
    let (sin_lat, cos_lat) = lat.sin_cos();
    let (sin_lon, cos_lon) = lon.sin_cos();

    let n = WGS84_A / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
    Vec3::new(
        (n + coord.alt_m) * cos_lat * cos_lon,
        (n + coord.alt_m) * cos_lat * sin_lon,
        (n * (1.0 - WGS84_E2) + coord.alt_m) * sin_lat,
    )
}

#[cfg(test)]
mod tests {
    use super::{
        GeoCoordinate, MEAN_EARTH_RADIUS_M, ReferencePoint, WGS84_A, geodetic_to_ecef,
        haversine_distance_m,
    };

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn haversine_is_zero_for_same_point() {
        let d = haversine_distance_m(38.97349, 45.02956, 38.97349, 45.02956, MEAN_EARTH_RADIUS_M);
        assert_eq!(d, 0.0);
    }

    #[test]
    fn haversine_is_symmetric() {
        let pairs = [
            ((38.97349, 45.02956), (38.97411, 45.02901)),
            ((-122.4194, 37.7749), (-73.9352, 40.7306)),
            ((0.0, 0.0), (179.9, -0.5)),
            ((10.0, 89.9), (-170.0, 89.9)),
        ];
        for ((lon1, lat1), (lon2, lat2)) in pairs {
            let ab = haversine_distance_m(lon1, lat1, lon2, lat2, MEAN_EARTH_RADIUS_M);
            let ba = haversine_distance_m(lon2, lat2, lon1, lat1, MEAN_EARTH_RADIUS_M);
            assert_close(ab, ba, 1e-6);
        }
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let d = haversine_distance_m(0.0, 0.0, 0.0, 1.0, MEAN_EARTH_RADIUS_M);
        assert_close(d, 111_194.9, 0.5);
    }

    #[test]
    fn ecef_on_equator_prime_meridian() {
        let ecef = geodetic_to_ecef(GeoCoordinate::new(0.0, 0.0, 0.0));
        assert_close(ecef.x, WGS84_A, 1e-6);
        assert_close(ecef.y, 0.0, 1e-6);
        assert_close(ecef.z, 0.0, 1e-6);
    }

    #[test]
    fn display_uses_six_decimals() {
        let c = GeoCoordinate::new(38.974021834, 45.029457749, 31.5);
        assert_eq!(c.to_string(), "38.974022, 45.029458");
        assert_eq!(ReferencePoint::default().to_string(), "38.973490, 45.029560");
    }
}
