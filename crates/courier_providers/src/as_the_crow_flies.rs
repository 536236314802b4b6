use courier_matrix::{
    geo_point::GeoPoint,
    route_query::RouteQuery,
    routing::{BestRoute, RouteCalculator, RouteOutcome, RoutingFailure},
};

pub const DEFAULT_SPEED_KMH: f64 = 50.0;

/// Straight-line legs between consecutive points at a constant speed.
#[derive(Debug, Clone, Copy)]
pub struct AsTheCrowFlies {
    speed_kmh: f64,
}

impl Default for AsTheCrowFlies {
    fn default() -> Self {
        AsTheCrowFlies::new(DEFAULT_SPEED_KMH)
    }
}

impl AsTheCrowFlies {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    pub fn route(&self, points: &[GeoPoint]) -> RouteOutcome {
        if points.len() < 2 {
            return Err(RoutingFailure::NoRoute);
        }

        let distance: f64 = points
            .windows(2)
            .map(|leg| leg[0].haversine_distance(&leg[1]))
            .sum();

        let speed_meters_per_second = self.speed_kmh * (1000.0 / 3600.0);
        let time = (distance / speed_meters_per_second * 1000.0).round() as u64;

        Ok(BestRoute { distance, time })
    }
}

impl RouteCalculator for AsTheCrowFlies {
    async fn calc_route(&self, query: &RouteQuery) -> RouteOutcome {
        self.route(query.points())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lng: f64) -> GeoPoint {
        GeoPoint::new(lat, lng).unwrap()
    }

    #[test]
    fn sums_legs_through_the_waypoint() {
        let crow = AsTheCrowFlies::new(36.0);
        let origin = point(52.52, 13.42);
        let waypoint = point(52.515, 13.415);
        let destination = point(52.50, 13.40);

        let direct = crow.route(&[origin, destination]).unwrap();
        let via = crow.route(&[origin, waypoint, destination]).unwrap();

        let legs = origin.haversine_distance(&waypoint) + waypoint.haversine_distance(&destination);
        assert!((via.distance - legs).abs() < 1e-6);
        assert!(via.distance >= direct.distance);
    }

    #[test]
    fn time_follows_speed() {
        // 36 km/h is 10 m/s
        let crow = AsTheCrowFlies::new(36.0);
        let route = crow.route(&[point(0.0, 0.0), point(0.0, 0.01)]).unwrap();

        let expected_ms = (route.distance * 100.0).round() as i64;
        assert!((route.time as i64 - expected_ms).abs() <= 1);
    }

    #[test]
    fn single_point_has_no_route() {
        let crow = AsTheCrowFlies::default();
        assert_eq!(crow.route(&[point(0.0, 0.0)]), Err(RoutingFailure::NoRoute));
    }
}
