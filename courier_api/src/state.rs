use courier_matrix::aggregator::MatrixAggregator;

pub struct AppState<R> {
    pub aggregator: MatrixAggregator<R>,
}
