use std::time::Duration;

use courier_matrix::{
    geo_point::GeoPoint,
    origin::OriginDescriptor,
    route_query::{RouteOptions, RouteQuery},
    routing::{BestRoute, RouteCalculator, RoutingFailure},
};
use courier_providers::graphhopper_api::{
    GraphHopperError, GraphHopperRouteClient, GraphHopperRouteClientParams,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(base_url: &str, api_key: Option<&str>) -> GraphHopperRouteClient {
    GraphHopperRouteClient::new(GraphHopperRouteClientParams {
        base_url: base_url.to_string(),
        api_key: api_key.map(str::to_string),
        request_timeout: Duration::from_secs(5),
    })
    .unwrap()
}

fn query_via_waypoint() -> RouteQuery {
    let origin = OriginDescriptor::new(
        "d2",
        GeoPoint::new(52.52, 13.42).unwrap(),
        Some(GeoPoint::new(52.515, 13.415).unwrap()),
    );

    RouteQuery::for_origin(
        &origin,
        GeoPoint::new(52.50, 13.40).unwrap(),
        &RouteOptions::default(),
    )
}

#[tokio::test]
async fn posts_ordered_points_without_geometry() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/route"))
        .and(body_partial_json(json!({
            "points": [[13.42, 52.52], [13.415, 52.515], [13.40, 52.50]],
            "profile": "car",
            "locale": "en",
            "calc_points": false,
            "instructions": false,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hints": {},
            "info": {"copyrights": ["GraphHopper", "OpenStreetMap contributors"]},
            "paths": [
                {"distance": 3456.789, "time": 412000, "weight": 500.1},
                {"distance": 4000.0, "time": 380000, "weight": 520.0}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let route = client(&server.uri(), None)
        .calc_route(&query_via_waypoint())
        .await
        .unwrap();

    assert_eq!(
        route,
        BestRoute {
            distance: 3456.789,
            time: 412000
        }
    );
}

#[tokio::test]
async fn sends_api_key_as_query_parameter() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/1/route"))
        .and(query_param("key", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "paths": [{"distance": 10.0, "time": 1000}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let base_url = format!("{}/api/1/", server.uri());
    let route = client(&base_url, Some("secret"))
        .calc_route(&query_via_waypoint())
        .await;

    assert!(route.is_ok());
}

#[tokio::test]
async fn error_response_is_a_rejection_with_messages() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/route"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "Cannot find point 1: 52.515,13.415",
            "hints": [{
                "message": "Cannot find point 1: 52.515,13.415",
                "details": "com.graphhopper.util.exceptions.PointNotFoundException",
                "point_index": 1
            }]
        })))
        .mount(&server)
        .await;

    let gh = client(&server.uri(), None);

    let err = gh.fetch_route(&query_via_waypoint()).await.unwrap_err();
    assert!(matches!(err, GraphHopperError::Api { status: 400, .. }));

    let outcome = gh.calc_route(&query_via_waypoint()).await;
    assert_eq!(
        outcome,
        Err(RoutingFailure::Rejected {
            messages: vec!["Cannot find point 1: 52.515,13.415".to_string()]
        })
    );
}

#[tokio::test]
async fn empty_paths_is_no_route() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/route"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"paths": []})))
        .mount(&server)
        .await;

    let outcome = client(&server.uri(), None)
        .calc_route(&query_via_waypoint())
        .await;

    assert_eq!(outcome, Err(RoutingFailure::NoRoute));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_failure() {
    let outcome = client("http://127.0.0.1:1", None)
        .calc_route(&query_via_waypoint())
        .await;

    assert!(matches!(outcome, Err(RoutingFailure::Transport(_))));
}
