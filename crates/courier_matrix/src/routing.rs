use std::{future::Future, time::Duration};

use thiserror::Error;

use crate::{error::InvalidPoint, route_query::RouteQuery};

/// Aggregate figures of the best route found for a query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestRoute {
    /// Meters
    pub distance: f64,
    /// Milliseconds
    pub time: u64,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum RoutingFailure {
    #[error("routing backend rejected the query: {}", .messages.join("; "))]
    Rejected { messages: Vec<String> },

    #[error("no route was returned")]
    NoRoute,

    #[error("point out of bounds: {0}")]
    OutOfBounds(InvalidPoint),

    #[error("routing did not finish within {0:?}")]
    Timeout(Duration),

    #[error("routing backend unreachable: {0}")]
    Transport(String),
}

pub type RouteOutcome = Result<BestRoute, RoutingFailure>;

/// A point-to-point routing engine.
///
/// Implementations compute the best route visiting the query's points in
/// order. They report failures as values; a failure only ever affects the
/// origin the query was built for.
pub trait RouteCalculator: Send + Sync {
    fn calc_route(&self, query: &RouteQuery) -> impl Future<Output = RouteOutcome> + Send;
}

impl<T> RouteCalculator for &T
where
    T: RouteCalculator,
{
    fn calc_route(&self, query: &RouteQuery) -> impl Future<Output = RouteOutcome> + Send {
        (**self).calc_route(query)
    }
}
