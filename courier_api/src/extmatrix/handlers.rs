use std::sync::Arc;

use axum::{
    Form,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use courier_matrix::routing::RouteCalculator;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    error::ApiError,
    extmatrix::params::{ExtMatrixParams, Pairs, collect_hints},
    state::AppState,
};

/// Encoded matrix document.
pub struct MatrixResponse(String);

impl IntoResponse for MatrixResponse {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            self.0,
        )
            .into_response()
    }
}

pub async fn get_handler<R>(
    State(state): State<Arc<AppState<R>>>,
    Query(query): Query<Pairs>,
) -> Result<MatrixResponse, ApiError>
where
    R: RouteCalculator + 'static,
{
    let params = ExtMatrixParams::from_pairs(&query)?;
    compute_matrix(&state, params, &query).await
}

/// Fields come from the form body; the query string only carries hints.
pub async fn post_handler<R>(
    State(state): State<Arc<AppState<R>>>,
    Query(query): Query<Pairs>,
    Form(form): Form<Pairs>,
) -> Result<MatrixResponse, ApiError>
where
    R: RouteCalculator + 'static,
{
    let params = ExtMatrixParams::from_pairs(&form)?;
    compute_matrix(&state, params, &query).await
}

#[instrument(
    skip_all,
    fields(request_id = %Uuid::new_v4(), destination = %params.destination)
)]
async fn compute_matrix<R>(
    state: &AppState<R>,
    params: ExtMatrixParams,
    query: &Pairs,
) -> Result<MatrixResponse, ApiError>
where
    R: RouteCalculator,
{
    let request = match params.into_request(collect_hints(query)) {
        Ok(request) => request,
        Err(error) => {
            warn!(?error, "Rejected origin set");
            return Err(error);
        }
    };

    info!(origins = request.origins.len(), "Computing matrix");
    let result = state.aggregator.compute(&request).await;

    Ok(MatrixResponse(result.to_json()?))
}
