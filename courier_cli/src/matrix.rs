use std::{path::PathBuf, time::Duration};

use anyhow::Context;
use clap::Args;
use courier_matrix::{
    aggregator::{
        AggregatorParams, DEFAULT_MAX_CONCURRENCY, MatrixAggregator, MatrixRequest,
    },
    geo_point::GeoPoint,
    matrix::MatrixResult,
    origin::decode_origin_set,
    route_query::{DEFAULT_LOCALE, DEFAULT_PROFILE, RouteOptions},
    routing::RouteCalculator,
};
use courier_providers::{parsers, route_client::RouteClient};
use tracing::info;

use crate::generate::write_file;

#[derive(Args)]
pub struct MatrixArgs {
    /// Origin set document (JSON object keyed by origin id)
    #[arg(short = 'i', long)]
    input: PathBuf,

    /// Destination as "lat,lng"
    #[arg(short, long, allow_hyphen_values = true)]
    point: GeoPoint,

    #[arg(long, default_value = DEFAULT_PROFILE)]
    profile: String,

    #[arg(long, default_value = DEFAULT_LOCALE)]
    locale: String,

    #[arg(long)]
    algorithm: Option<String>,

    /// Route computations in flight at once
    #[arg(short, long, default_value_t = DEFAULT_MAX_CONCURRENCY)]
    concurrency: usize,

    /// Time budget of one route computation (e.g., "10s", "PT1M")
    #[arg(short, long, default_value = "10s", value_parser = parsers::parse_duration)]
    timeout: Duration,

    /// Output file, stdout when omitted
    #[arg(short, long)]
    out: Option<PathBuf>,
}

pub async fn run(args: MatrixArgs) -> anyhow::Result<()> {
    let document = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Cannot read {}", args.input.display()))?;

    let result = compute(RouteClient::from_env()?, &args, &document).await?;
    info!(
        "{} origins, {} unroutable",
        result.len(),
        result.unroutable_count()
    );

    let json = result.to_json_pretty()?;
    match &args.out {
        Some(out) => write_file(out, &json)?,
        None => println!("{json}"),
    }

    Ok(())
}

async fn compute<R>(router: R, args: &MatrixArgs, document: &str) -> anyhow::Result<MatrixResult>
where
    R: RouteCalculator,
{
    let origins = decode_origin_set(document)
        .with_context(|| format!("Invalid origin set in {}", args.input.display()))?;

    let request = MatrixRequest {
        destination: args.point,
        origins,
        options: RouteOptions {
            profile: args.profile.clone(),
            locale: args.locale.clone(),
            algorithm: args.algorithm.clone(),
            ..RouteOptions::default()
        },
    };

    let aggregator = MatrixAggregator::new(
        router,
        AggregatorParams {
            max_concurrency: args.concurrency,
            route_timeout: args.timeout,
        },
    );

    Ok(aggregator.compute(&request).await)
}
