use std::sync::Arc;

use axum::{Router, routing::get};
use courier_matrix::routing::RouteCalculator;

use crate::{
    extmatrix::handlers::{get_handler, post_handler},
    state::AppState,
};

pub fn extmatrix_routes<R>(state: Arc<AppState<R>>) -> Router
where
    R: RouteCalculator + 'static,
{
    Router::new()
        .route(
            "/extmatrix",
            get(get_handler::<R>).post(post_handler::<R>),
        )
        .with_state(state)
}
