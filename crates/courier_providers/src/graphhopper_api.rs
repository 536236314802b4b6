use std::time::Duration;

use courier_matrix::{
    route_query::{RouteQuery, RouteQueryOptions},
    routing::{BestRoute, RouteCalculator, RouteOutcome, RoutingFailure},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

/// `[lng, lat]`, the order GraphHopper expects in JSON bodies.
pub type GHPoint = [f64; 2];

pub const DEFAULT_GRAPHHOPPER_URL: &str = "http://localhost:8989";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const ROUTE_API_PATH: &str = "/route";

#[derive(Debug, Error)]
pub enum GraphHopperError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {}", .messages.join("; "))]
    Api { status: u16, messages: Vec<String> },

    #[error("Response contained no path")]
    NoPath,
}

impl From<GraphHopperError> for RoutingFailure {
    fn from(error: GraphHopperError) -> Self {
        match error {
            GraphHopperError::Api { messages, .. } => RoutingFailure::Rejected { messages },
            GraphHopperError::NoPath => RoutingFailure::NoRoute,
            GraphHopperError::Request(err) => RoutingFailure::Transport(err.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
struct RouteRequestBody<'a> {
    points: Vec<GHPoint>,
    #[serde(flatten)]
    options: &'a RouteQueryOptions,
}

#[derive(Deserialize)]
struct RouteResponse {
    #[serde(default)]
    paths: Vec<ResponsePath>,
}

#[derive(Deserialize)]
struct ResponsePath {
    /// Meters
    distance: f64,
    /// Milliseconds
    time: u64,
}

#[derive(Deserialize)]
struct ErrorResponse {
    message: Option<String>,
    #[serde(default)]
    hints: Vec<ErrorHint>,
}

#[derive(Deserialize)]
struct ErrorHint {
    message: String,
}

#[derive(Debug, Clone)]
pub struct GraphHopperRouteClientParams {
    /// Root of a GraphHopper server, e.g. `http://localhost:8989` or
    /// `https://graphhopper.com/api/1`.
    pub base_url: String,
    pub api_key: Option<String>,
    pub request_timeout: Duration,
}

impl Default for GraphHopperRouteClientParams {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GRAPHHOPPER_URL.to_string(),
            api_key: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

pub struct GraphHopperRouteClient {
    params: GraphHopperRouteClientParams,
    route_url: String,
    client: reqwest::Client,
}

impl GraphHopperRouteClient {
    pub fn new(params: GraphHopperRouteClientParams) -> Result<Self, GraphHopperError> {
        let client = reqwest::Client::builder()
            .timeout(params.request_timeout)
            .build()?;

        let route_url = format!("{}{}", params.base_url.trim_end_matches('/'), ROUTE_API_PATH);

        Ok(Self {
            params,
            route_url,
            client,
        })
    }

    #[instrument(skip_all, level = "debug")]
    pub async fn fetch_route(&self, query: &RouteQuery) -> Result<BestRoute, GraphHopperError> {
        let body = RouteRequestBody {
            points: query
                .points()
                .iter()
                .map(|p| {
                    let point: geo_types::Point = p.into();
                    [point.x(), point.y()]
                })
                .collect(),
            options: query.options(),
        };

        let mut request = self.client.post(&self.route_url).json(&body);
        if let Some(key) = &self.params.api_key {
            request = request.query(&[("key", key)]);
        }

        let response = request.send().await?;

        self.handle_response(response).await
    }

    async fn handle_response(
        &self,
        response: reqwest::Response,
    ) -> Result<BestRoute, GraphHopperError> {
        let status = response.status();

        if status.is_success() {
            let route_response: RouteResponse = response.json().await?;
            let best = route_response
                .paths
                .into_iter()
                .next()
                .ok_or(GraphHopperError::NoPath)?;

            debug!(
                "GraphHopperApi: route distance = {}, time = {}ms",
                best.distance, best.time
            );

            return Ok(BestRoute {
                distance: best.distance,
                time: best.time,
            });
        }

        let text = response.text().await.unwrap_or_default();
        Err(GraphHopperError::Api {
            status: status.as_u16(),
            messages: error_messages(&text, status),
        })
    }
}

/// Top-level message followed by any hint messages that add to it.
fn error_messages(body: &str, status: reqwest::StatusCode) -> Vec<String> {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(error) => {
            let mut messages: Vec<String> = error.message.into_iter().collect();
            for hint in error.hints {
                if !messages.contains(&hint.message) {
                    messages.push(hint.message);
                }
            }
            messages
        }
        Err(_) if !body.trim().is_empty() => vec![body.trim().to_string()],
        Err(_) => vec![status.to_string()],
    }
}

impl RouteCalculator for GraphHopperRouteClient {
    async fn calc_route(&self, query: &RouteQuery) -> RouteOutcome {
        self.fetch_route(query).await.map_err(RoutingFailure::from)
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::*;

    #[test]
    fn collects_message_and_distinct_hints() {
        let body = r#"{
            "message": "Cannot find point 0: 52.5,13.4",
            "hints": [
                {"message": "Cannot find point 0: 52.5,13.4", "details": "PointNotFoundException"},
                {"message": "Connection between locations not found"}
            ]
        }"#;

        assert_eq!(
            error_messages(body, StatusCode::BAD_REQUEST),
            vec![
                "Cannot find point 0: 52.5,13.4".to_string(),
                "Connection between locations not found".to_string(),
            ]
        );
    }

    #[test]
    fn falls_back_to_raw_body_or_status() {
        assert_eq!(
            error_messages("upstream exploded", StatusCode::BAD_GATEWAY),
            vec!["upstream exploded".to_string()]
        );
        assert_eq!(
            error_messages("", StatusCode::SERVICE_UNAVAILABLE),
            vec!["503 Service Unavailable".to_string()]
        );
    }

    #[test]
    fn api_error_becomes_rejection() {
        let failure = RoutingFailure::from(GraphHopperError::Api {
            status: 400,
            messages: vec!["Point 1 is out of bounds".to_string()],
        });

        assert_eq!(
            failure,
            RoutingFailure::Rejected {
                messages: vec!["Point 1 is out of bounds".to_string()]
            }
        );
    }
}
