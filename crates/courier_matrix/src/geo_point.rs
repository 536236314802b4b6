use std::{fmt, str::FromStr};

use crate::error::InvalidPoint;

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// A WGS84 coordinate in degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    /// Finite coordinates within the WGS84 degree ranges.
    pub fn new(lat: f64, lng: f64) -> Result<GeoPoint, InvalidPoint> {
        let point = GeoPoint::from_degrees(lat, lng)?;
        point.check_range()?;
        Ok(point)
    }

    /// Finite coordinates, range left unchecked. Origins are built this way:
    /// an origin outside the ranges is unroutable, not malformed.
    pub fn from_degrees(lat: f64, lng: f64) -> Result<GeoPoint, InvalidPoint> {
        if !lat.is_finite() {
            return Err(InvalidPoint::Latitude(lat));
        }

        if !lng.is_finite() {
            return Err(InvalidPoint::Longitude(lng));
        }

        Ok(GeoPoint { lat, lng })
    }

    pub fn check_range(&self) -> Result<(), InvalidPoint> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(InvalidPoint::Latitude(self.lat));
        }

        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(InvalidPoint::Longitude(self.lng));
        }

        Ok(())
    }

    pub fn haversine_distance(&self, other: &GeoPoint) -> f64 {
        let lat1 = self.lat.to_radians();
        let lng1 = self.lng.to_radians();
        let lat2 = other.lat.to_radians();
        let lng2 = other.lng.to_radians();

        let dlat = lat2 - lat1;
        let dlng = lng2 - lng1;

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_METERS * c
    }
}

impl From<&GeoPoint> for geo_types::Point {
    fn from(value: &GeoPoint) -> Self {
        geo_types::Point::new(value.lng, value.lat)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

/// Parses the `lat,lng` form used by the `point` request parameter.
impl FromStr for GeoPoint {
    type Err = InvalidPoint;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(',');

        let (Some(lat), Some(lng), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(InvalidPoint::Format(s.to_string()));
        };

        let lat = lat
            .trim()
            .parse::<f64>()
            .map_err(|_| InvalidPoint::Format(s.to_string()))?;
        let lng = lng
            .trim()
            .parse::<f64>()
            .map_err(|_| InvalidPoint::Format(s.to_string()))?;

        GeoPoint::new(lat, lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lat_lng_pair() {
        let point: GeoPoint = "52.5, 13.4".parse().unwrap();
        assert_eq!(point, GeoPoint { lat: 52.5, lng: 13.4 });
    }

    #[test]
    fn rejects_wrong_arity() {
        assert!(matches!(
            "52.5".parse::<GeoPoint>(),
            Err(InvalidPoint::Format(_))
        ));
        assert!(matches!(
            "52.5,13.4,100".parse::<GeoPoint>(),
            Err(InvalidPoint::Format(_))
        ));
        assert!(matches!(
            "north,east".parse::<GeoPoint>(),
            Err(InvalidPoint::Format(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert!(matches!(
            GeoPoint::new(91.0, 0.0),
            Err(InvalidPoint::Latitude(_))
        ));
        assert!(matches!(
            GeoPoint::new(0.0, -180.5),
            Err(InvalidPoint::Longitude(_))
        ));
        assert!(matches!(
            GeoPoint::new(f64::NAN, 0.0),
            Err(InvalidPoint::Latitude(_))
        ));
    }

    #[test]
    fn from_degrees_only_requires_finite_values() {
        let point = GeoPoint::from_degrees(95.0, 13.4).unwrap();

        assert_eq!(point.check_range(), Err(InvalidPoint::Latitude(95.0)));
        assert!(matches!(
            GeoPoint::from_degrees(52.5, f64::INFINITY),
            Err(InvalidPoint::Longitude(_))
        ));
    }

    #[test]
    fn haversine_distance_between_nearby_points() {
        let a = GeoPoint::new(52.50, 13.40).unwrap();
        let b = GeoPoint::new(52.51, 13.41).unwrap();

        let distance = a.haversine_distance(&b);
        assert!((distance - 1302.0).abs() < 5.0, "got {distance}");
        assert_eq!(a.haversine_distance(&a), 0.0);
    }
}
