use std::collections::{BTreeMap, HashMap};

use courier_matrix::{
    aggregator::MatrixRequest,
    geo_point::GeoPoint,
    origin::decode_origin_set,
    route_query::{DEFAULT_LOCALE, DEFAULT_PROFILE, RouteOptions},
};
use serde_json::{Number, Value};

use crate::error::ApiError;

/// Raw `key=value` pairs in arrival order, repeated keys included.
pub type Pairs = Vec<(String, String)>;

pub const DRIVER_POINTS_PARAM: &str = "driverPoints";
pub const POINT_PARAM: &str = "point";
pub const ALGORITHM_PARAM: &str = "algorithm";
pub const LOCALE_PARAM: &str = "locale";
pub const PROFILE_PARAM: &str = "profile";

const REQUEST_PARAMS: [&str; 5] = [
    DRIVER_POINTS_PARAM,
    POINT_PARAM,
    ALGORITHM_PARAM,
    LOCALE_PARAM,
    PROFILE_PARAM,
];

/// Fields of an `/extmatrix` request, read from the query string (GET) or the
/// form body (POST).
#[derive(Debug)]
pub struct ExtMatrixParams {
    pub driver_points: String,
    pub destination: GeoPoint,
    pub algorithm: Option<String>,
    pub locale: String,
    pub profile: String,
}

impl ExtMatrixParams {
    pub fn from_pairs(pairs: &[(String, String)]) -> Result<Self, ApiError> {
        let driver_points = first_value(pairs, DRIVER_POINTS_PARAM).ok_or_else(|| {
            ApiError::BadRequest(format!("Missing parameter `{DRIVER_POINTS_PARAM}`"))
        })?;

        // Only the first `point` is the destination.
        let destination = first_value(pairs, POINT_PARAM)
            .ok_or_else(|| ApiError::BadRequest(format!("Missing parameter `{POINT_PARAM}`")))?
            .parse::<GeoPoint>()?;

        Ok(ExtMatrixParams {
            driver_points: driver_points.to_string(),
            destination,
            algorithm: first_value(pairs, ALGORITHM_PARAM).map(str::to_string),
            locale: first_value(pairs, LOCALE_PARAM)
                .unwrap_or(DEFAULT_LOCALE)
                .to_string(),
            profile: first_value(pairs, PROFILE_PARAM)
                .unwrap_or(DEFAULT_PROFILE)
                .to_string(),
        })
    }

    /// Decodes the origin set. Any malformed origin fails the whole request.
    pub fn into_request(self, hints: BTreeMap<String, Value>) -> Result<MatrixRequest, ApiError> {
        let origins = decode_origin_set(&self.driver_points)?;

        Ok(MatrixRequest {
            destination: self.destination,
            origins,
            options: RouteOptions {
                profile: self.profile,
                locale: self.locale,
                algorithm: self.algorithm,
                hints,
            },
        })
    }
}

/// First non-empty value of `key`, as sent.
fn first_value<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .filter(|(k, _)| k == key)
        .map(|(_, value)| value.as_str())
        .find(|value| !value.is_empty())
}

/// Parameters occurring exactly once, other than the request's own fields,
/// become routing hints with snake_case keys and typed values.
pub fn collect_hints(pairs: &[(String, String)]) -> BTreeMap<String, Value> {
    let mut occurrences: HashMap<&str, (usize, &str)> = HashMap::new();
    for (key, value) in pairs {
        occurrences
            .entry(key.as_str())
            .and_modify(|(count, _)| *count += 1)
            .or_insert((1, value.as_str()));
    }

    occurrences
        .into_iter()
        .filter(|(key, (count, _))| *count == 1 && !REQUEST_PARAMS.contains(key))
        .map(|(key, (_, value))| (camel_case_to_snake_case(key), typed_value(value)))
        .collect()
}

pub fn camel_case_to_snake_case(key: &str) -> String {
    let mut snake = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            snake.push('_');
            snake.push(c.to_ascii_lowercase());
        } else {
            snake.push(c);
        }
    }
    snake
}

pub fn typed_value(value: &str) -> Value {
    if value.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if value.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if let Ok(integer) = value.parse::<i64>() {
        return Value::from(integer);
    }
    if let Some(number) = value.parse::<f64>().ok().and_then(Number::from_f64) {
        return Value::Number(number);
    }

    Value::String(value.to_string())
}
