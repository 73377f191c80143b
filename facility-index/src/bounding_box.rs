use serde::{Deserialize, Serialize};

use crate::geometry::{angular_radius_degrees, Position};

/// Extra angular margin (degrees) added around a query cap. About a
/// centimeter at the equator; keeps floating error from excluding a point
/// that lies exactly on the radius.
const SLACK_DEGREES: f64 = 1e-7;

/// A latitude/longitude rectangle in degrees.
///
/// `GeoBounds` is the coarse search region for a radius query: the grid
/// scans every cell that touches it, and the exact distance check decides
/// membership. A box around a cap near the antimeridian may have
/// `min_lon < -180` or `max_lon > 180`; [`GeoBounds::longitude_spans`]
/// splits it into spans that stay inside the valid range.
///
/// # Examples
///
/// ```rust
/// use facility_index::{GeoBounds, Position};
///
/// let bounds = GeoBounds::around(&Position::new(48.215, 16.330), 5_000.0);
/// assert!(bounds.contains(&Position::new(48.221, 16.345)));
/// assert!(!bounds.contains(&Position::new(48.250, 16.450)));
/// ```
#[derive(Clone, Copy, PartialEq, Default, Debug, Serialize, Deserialize)]
pub struct GeoBounds {
    /// Southern edge
    pub min_lat: f64,
    /// Western edge, may be below -180 before splitting
    pub min_lon: f64,
    /// Northern edge
    pub max_lat: f64,
    /// Eastern edge, may be above 180 before splitting
    pub max_lon: f64,
}

impl std::fmt::Display for GeoBounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "GeoBounds({}, {}, {}, {})",
            self.min_lat, self.min_lon, self.max_lat, self.max_lon
        )
    }
}

impl GeoBounds {
    /// Creates a new bounding box with the specified edges.
    pub fn new(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> GeoBounds {
        GeoBounds {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        }
    }

    /// The whole globe.
    pub fn world() -> GeoBounds {
        GeoBounds::new(-90.0, -180.0, 90.0, 180.0)
    }

    /// Tight bounding box of the spherical cap of `radius_m` meters around
    /// `center`.
    ///
    /// Latitude extends by the cap's angular radius. Longitude extends by
    /// `asin(sin θ / cos φ)`, which is where the cap's edge meets its
    /// tangent meridians. When the cap touches a pole every longitude is
    /// covered.
    pub fn around(center: &Position, radius_m: f64) -> GeoBounds {
        let theta = angular_radius_degrees(radius_m) + SLACK_DEGREES;

        let min_lat = center.latitude - theta;
        let max_lat = center.latitude + theta;
        if min_lat <= -90.0 || max_lat >= 90.0 {
            return GeoBounds::new(min_lat.max(-90.0), -180.0, max_lat.min(90.0), 180.0);
        }

        let ratio = theta.to_radians().sin() / center.latitude.to_radians().cos();
        if ratio >= 1.0 {
            return GeoBounds::new(min_lat, -180.0, max_lat, 180.0);
        }

        let delta_lon = ratio.asin().to_degrees() + SLACK_DEGREES;
        if delta_lon >= 180.0 {
            return GeoBounds::new(min_lat, -180.0, max_lat, 180.0);
        }

        GeoBounds::new(
            min_lat,
            center.longitude - delta_lon,
            max_lat,
            center.longitude + delta_lon,
        )
    }

    /// Returns the height of the box in degrees.
    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Returns the width of the box in degrees of longitude.
    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Checks if the box covers every longitude.
    pub fn spans_all_longitudes(&self) -> bool {
        self.width() >= 360.0
    }

    /// Splits the longitude range into at most two `(west, east)` spans
    /// inside −180..=180, unwrapping a box that crosses the antimeridian.
    pub fn longitude_spans(&self) -> Vec<(f64, f64)> {
        if self.spans_all_longitudes() {
            vec![(-180.0, 180.0)]
        } else if self.min_lon < -180.0 {
            vec![(self.min_lon + 360.0, 180.0), (-180.0, self.max_lon)]
        } else if self.max_lon > 180.0 {
            vec![(self.min_lon, 180.0), (-180.0, self.max_lon - 360.0)]
        } else {
            vec![(self.min_lon, self.max_lon)]
        }
    }

    /// Checks if this box contains a position, honouring antimeridian
    /// wrap-around.
    pub fn contains(&self, position: &Position) -> bool {
        if position.latitude < self.min_lat || position.latitude > self.max_lat {
            return false;
        }
        self.longitude_spans()
            .iter()
            .any(|(west, east)| position.longitude >= *west && position.longitude <= *east)
    }

    /// Checks if the box is valid (min <= max on both axes).
    pub fn is_valid(&self) -> bool {
        self.min_lat <= self.max_lat && self.min_lon <= self.max_lon
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{distance, EARTH_RADIUS_METERS};

    #[test]
    fn test_new() {
        let bounds = GeoBounds::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(bounds.min_lat, 1.0);
        assert_eq!(bounds.min_lon, 2.0);
        assert_eq!(bounds.max_lat, 3.0);
        assert_eq!(bounds.max_lon, 4.0);
        assert_eq!(bounds.height(), 2.0);
        assert_eq!(bounds.width(), 2.0);
    }

    #[test]
    fn test_world() {
        let world = GeoBounds::world();
        assert!(world.spans_all_longitudes());
        assert!(world.contains(&Position::new(90.0, 180.0)));
        assert!(world.contains(&Position::new(-90.0, -180.0)));
    }

    #[test]
    fn test_around_covers_cap_extremes() {
        let center = Position::new(48.215, 16.330);
        let radius = 5_000.0;
        let bounds = GeoBounds::around(&center, radius);
        assert!(bounds.is_valid());

        // north, south, east and west points on the circle
        let dlat = (radius / EARTH_RADIUS_METERS).to_degrees();
        assert!(bounds.contains(&Position::new(center.latitude + dlat, center.longitude)));
        assert!(bounds.contains(&Position::new(center.latitude - dlat, center.longitude)));
        let dlon = bounds.max_lon - center.longitude;
        let east = Position::new(center.latitude, center.longitude + dlon);
        assert!(distance(&center, &east) >= radius);
    }

    #[test]
    fn test_around_is_tighter_in_latitude_than_longitude_at_high_latitude() {
        let bounds = GeoBounds::around(&Position::new(60.0, 10.0), 10_000.0);
        assert!(bounds.width() > bounds.height());
    }

    #[test]
    fn test_around_reaching_pole_spans_all_longitudes() {
        let bounds = GeoBounds::around(&Position::new(89.99, 45.0), 5_000.0);
        assert!(bounds.spans_all_longitudes());
        assert_eq!(bounds.max_lat, 90.0);
        assert!(bounds.contains(&Position::new(89.98, -135.0)));
    }

    #[test]
    fn test_around_huge_radius_is_world() {
        let bounds = GeoBounds::around(&Position::new(0.0, 0.0), 30_000_000.0);
        assert_eq!(bounds, GeoBounds::world());
    }

    #[test]
    fn test_longitude_spans_plain() {
        let bounds = GeoBounds::new(0.0, 10.0, 1.0, 20.0);
        assert_eq!(bounds.longitude_spans(), vec![(10.0, 20.0)]);
    }

    #[test]
    fn test_longitude_spans_wrap_east() {
        let bounds = GeoBounds::new(0.0, 179.0, 1.0, 181.0);
        assert_eq!(bounds.longitude_spans(), vec![(179.0, 180.0), (-180.0, -179.0)]);
        assert!(bounds.contains(&Position::new(0.5, -179.5)));
        assert!(!bounds.contains(&Position::new(0.5, -178.0)));
    }

    #[test]
    fn test_longitude_spans_wrap_west() {
        let bounds = GeoBounds::new(0.0, -181.0, 1.0, -179.0);
        assert_eq!(bounds.longitude_spans(), vec![(179.0, 180.0), (-180.0, -179.0)]);
        assert!(bounds.contains(&Position::new(0.5, 179.5)));
    }

    #[test]
    fn test_around_antimeridian() {
        let bounds = GeoBounds::around(&Position::new(0.0, 179.99), 5_000.0);
        assert!(bounds.max_lon > 180.0);
        assert!(bounds.contains(&Position::new(0.0, -179.99)));
    }

    #[test]
    fn test_contains_latitude_edges() {
        let bounds = GeoBounds::new(0.0, 0.0, 10.0, 10.0);
        assert!(bounds.contains(&Position::new(0.0, 0.0)));
        assert!(bounds.contains(&Position::new(10.0, 10.0)));
        assert!(!bounds.contains(&Position::new(-0.1, 5.0)));
        assert!(!bounds.contains(&Position::new(5.0, 10.1)));
    }

    #[test]
    fn test_display() {
        let bounds = GeoBounds::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(format!("{}", bounds), "GeoBounds(1, 2, 3, 4)");
    }

    #[test]
    fn test_serialization() {
        let bounds = GeoBounds::new(1.5, 2.5, 3.5, 4.5);
        let json = serde_json::to_string(&bounds).unwrap();
        let back: GeoBounds = serde_json::from_str(&json).unwrap();
        assert_eq!(bounds, back);
    }
}
