use std::time::Duration;

use futures::{StreamExt, stream};
use tracing::{Instrument, debug, info, info_span, instrument, warn};

use crate::{
    geo_point::GeoPoint,
    matrix::{MatrixEntry, MatrixResult},
    origin::OriginDescriptor,
    route_query::{RouteOptions, RouteQuery},
    routing::{RouteCalculator, RoutingFailure},
};

pub const DEFAULT_MAX_CONCURRENCY: usize = 8;
pub const DEFAULT_ROUTE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy)]
pub struct AggregatorParams {
    /// Upper bound on route computations in flight for one request.
    pub max_concurrency: usize,
    /// Time budget of a single route computation. Exceeding it counts as a
    /// routing failure for that origin.
    pub route_timeout: Duration,
}

impl Default for AggregatorParams {
    fn default() -> Self {
        AggregatorParams {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            route_timeout: DEFAULT_ROUTE_TIMEOUT,
        }
    }
}

/// A fully decoded request: everything that can fail the request as a whole
/// has already been checked when one of these exists.
#[derive(Debug, Clone)]
pub struct MatrixRequest {
    pub destination: GeoPoint,
    pub origins: Vec<OriginDescriptor>,
    pub options: RouteOptions,
}

pub struct MatrixAggregator<R> {
    router: R,
    params: AggregatorParams,
}

impl<R> MatrixAggregator<R>
where
    R: RouteCalculator,
{
    pub fn new(router: R, params: AggregatorParams) -> Self {
        Self { router, params }
    }

    /// Routes every origin to the destination and collects one entry per
    /// origin.
    ///
    /// Origins are routed concurrently, at most `max_concurrency` at a time.
    /// Workers only hand back `(id, entry)` pairs; the stream collector is the
    /// only writer of the result. Dropping the returned future drops every
    /// in-flight computation.
    #[instrument(
        skip_all,
        fields(destination = %request.destination, origins = request.origins.len())
    )]
    pub async fn compute(&self, request: &MatrixRequest) -> MatrixResult {
        let limit = self.params.max_concurrency.max(1);

        // Futures are inert until the stream polls them.
        let pending: Vec<_> = request
            .origins
            .iter()
            .map(|origin| {
                let span = info_span!("origin", id = %origin.id);
                self.route_origin(origin, request.destination, &request.options)
                    .instrument(span)
            })
            .collect();

        let result: MatrixResult = stream::iter(pending)
            .buffer_unordered(limit)
            .collect()
            .await;

        debug!(
            entries = result.len(),
            unroutable = result.unroutable_count(),
            "matrix complete"
        );

        result
    }

    async fn route_origin(
        &self,
        origin: &OriginDescriptor,
        destination: GeoPoint,
        options: &RouteOptions,
    ) -> (String, MatrixEntry) {
        let query = RouteQuery::for_origin(origin, destination, options);
        debug!(points = ?query.points(), "routing origin");

        let timeout = self.params.route_timeout;
        let outcome = match query.check_bounds() {
            Err(invalid) => Err(RoutingFailure::OutOfBounds(invalid)),
            Ok(()) => tokio::time::timeout(timeout, self.router.calc_route(&query))
                .await
                .unwrap_or(Err(RoutingFailure::Timeout(timeout))),
        };

        match &outcome {
            Ok(route) => info!(
                origin = %origin.id,
                distance = route.distance,
                minutes = (route.time as f64 / 60_000.0).round(),
                "route computed"
            ),
            Err(failure) => warn!(
                origin = %origin.id,
                error = %failure,
                "routing failed, reporting zero distance and time"
            ),
        }

        (origin.id.clone(), MatrixEntry::from(&outcome))
    }
}
