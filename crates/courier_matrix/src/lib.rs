pub mod aggregator;
pub mod error;
pub mod geo_point;
pub mod matrix;
pub mod origin;
pub mod route_query;
pub mod routing;
pub mod schema;

#[cfg(test)]
pub(crate) mod test_utils;
