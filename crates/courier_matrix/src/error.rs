use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidPoint {
    #[error("expected a point formatted as `lat,lng`, got `{0}`")]
    Format(String),
    #[error("latitude {0} is outside [-90, 90]")]
    Latitude(f64),
    #[error("longitude {0} is outside [-180, 180]")]
    Longitude(f64),
}

/// The origin set could not be decoded. Fatal to the whole request.
#[derive(Error, Debug)]
pub enum MalformedInput {
    #[error("origin set is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("origin set must be a JSON object keyed by origin id")]
    NotAnObject,

    #[error("origin `{0}` appears more than once")]
    DuplicateOrigin(String),

    #[error("origin `{0}` must be a JSON object")]
    RecordNotAnObject(String),

    #[error("origin `{origin}` is missing field `{field}`")]
    MissingField { origin: String, field: &'static str },

    #[error("origin `{origin}` has a non-numeric `{field}`")]
    NotANumber { origin: String, field: &'static str },

    #[error("origin `{origin}` has `{present}` without `{missing}`")]
    UnpairedWaypoint {
        origin: String,
        present: &'static str,
        missing: &'static str,
    },

    #[error("origin `{origin}` has an invalid coordinate: {source}")]
    InvalidCoordinate {
        origin: String,
        #[source]
        source: InvalidPoint,
    },
}
