mod error;
mod extmatrix;
mod state;

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::http::Method;
use axum::serve;
use clap::Parser;
use courier_matrix::aggregator::{AggregatorParams, DEFAULT_MAX_CONCURRENCY, MatrixAggregator};
use courier_providers::{parsers, route_client::RouteClient};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::{Level, info};

use crate::extmatrix::routes::extmatrix_routes;
use crate::state::AppState;

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "COURIER_BIND", default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    /// Route computations in flight per request
    #[arg(long, env = "COURIER_CONCURRENCY", default_value_t = DEFAULT_MAX_CONCURRENCY)]
    concurrency: usize,

    /// Time budget of one route computation (e.g., "10s", "PT1M")
    #[arg(
        long,
        env = "COURIER_ROUTE_TIMEOUT",
        default_value = "10s",
        value_parser = parsers::parse_duration
    )]
    route_timeout: Duration,

    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::from_filename("./.env.local").ok();

    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(if args.debug { Level::DEBUG } else { Level::INFO })
        .init();

    let aggregator = MatrixAggregator::new(
        RouteClient::from_env()?,
        AggregatorParams {
            max_concurrency: args.concurrency,
            route_timeout: args.route_timeout,
        },
    );
    let state = Arc::new(AppState { aggregator });

    let cors_layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_origin(Any)
        .allow_headers(Any);

    let app = extmatrix_routes(state).layer(ServiceBuilder::new().layer(cors_layer));

    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    info!("Listening on {}", listener.local_addr()?);

    serve(listener, app).await?;

    Ok(())
}
