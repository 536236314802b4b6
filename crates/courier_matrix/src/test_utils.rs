use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use parking_lot::Mutex;

use crate::{
    geo_point::GeoPoint,
    route_query::RouteQuery,
    routing::{BestRoute, RouteCalculator, RouteOutcome, RoutingFailure},
};

pub fn point(lat: f64, lng: f64) -> GeoPoint {
    GeoPoint::new(lat, lng).unwrap()
}

/// Deterministic router: succeeds with the crow-flies length of the query
/// (at 10 m/s) unless the query starts at one of the failing points.
#[derive(Default)]
pub struct ScriptedRouter {
    failing: Vec<GeoPoint>,
    delay: Option<Duration>,
    queries: Mutex<Vec<RouteQuery>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedRouter {
    pub fn failing_from(mut self, start: GeoPoint) -> Self {
        self.failing.push(start);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn expected_route(&self, points: &[GeoPoint]) -> BestRoute {
        let distance: f64 = points
            .windows(2)
            .map(|pair| pair[0].haversine_distance(&pair[1]))
            .sum();

        BestRoute {
            distance,
            time: (distance * 100.0).round() as u64,
        }
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().len()
    }

    pub fn points_for(&self, start: GeoPoint) -> Option<Vec<GeoPoint>> {
        self.queries
            .lock()
            .iter()
            .find(|query| query.points().first() == Some(&start))
            .map(|query| query.points().to_vec())
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl RouteCalculator for ScriptedRouter {
    async fn calc_route(&self, query: &RouteQuery) -> RouteOutcome {
        self.queries.lock().push(query.clone());

        let in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(in_flight, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let start = query.points().first();
        if self.failing.iter().any(|point| Some(point) == start) {
            return Err(RoutingFailure::Rejected {
                messages: vec!["Cannot find point 0".to_string()],
            });
        }

        Ok(self.expected_route(query.points()))
    }
}

/// Never finishes; counts how many computations were started and dropped.
#[derive(Default)]
pub struct PendingRouter {
    pub started: AtomicUsize,
    pub dropped: AtomicUsize,
}

struct DropCounter<'a>(&'a AtomicUsize);

impl Drop for DropCounter<'_> {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

impl RouteCalculator for PendingRouter {
    async fn calc_route(&self, _query: &RouteQuery) -> RouteOutcome {
        self.started.fetch_add(1, Ordering::SeqCst);
        let _counter = DropCounter(&self.dropped);

        std::future::pending().await
    }
}
