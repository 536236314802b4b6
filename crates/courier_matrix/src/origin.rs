use std::{collections::HashSet, fmt};

use schemars::JsonSchema;
use serde::{
    Deserialize, Deserializer,
    de::{MapAccess, Visitor},
};
use serde_json::{Map, Value};
use tracing::instrument;

use crate::{error::MalformedInput, geo_point::GeoPoint};

const LAT: &str = "lat";
const LNG: &str = "lng";
const OVER_LAT: &str = "over-lat";
const OVER_LNG: &str = "over-lng";

/// One origin record of the `driverPoints` document.
#[derive(JsonSchema, Debug, Clone, PartialEq)]
#[schemars(rename = "Origin")]
pub struct JsonOrigin {
    pub lat: f64,
    pub lng: f64,

    /// Latitude of the stop to pass through before the destination.
    /// Must be given together with `over-lng`.
    #[schemars(rename = "over-lat")]
    pub over_lat: Option<f64>,

    /// Longitude of the stop to pass through before the destination.
    /// Must be given together with `over-lat`.
    #[schemars(rename = "over-lng")]
    pub over_lng: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OriginDescriptor {
    pub id: String,
    pub primary: GeoPoint,
    pub waypoint: Option<GeoPoint>,
}

impl OriginDescriptor {
    pub fn new(id: impl Into<String>, primary: GeoPoint, waypoint: Option<GeoPoint>) -> Self {
        OriginDescriptor {
            id: id.into(),
            primary,
            waypoint,
        }
    }

    fn from_json(id: String, origin: JsonOrigin) -> Result<Self, MalformedInput> {
        let primary = GeoPoint::from_degrees(origin.lat, origin.lng).map_err(|source| {
            MalformedInput::InvalidCoordinate {
                origin: id.clone(),
                source,
            }
        })?;

        let waypoint = match (origin.over_lat, origin.over_lng) {
            (Some(lat), Some(lng)) => Some(GeoPoint::from_degrees(lat, lng).map_err(|source| {
                MalformedInput::InvalidCoordinate {
                    origin: id.clone(),
                    source,
                }
            })?),
            (Some(_), None) => {
                return Err(MalformedInput::UnpairedWaypoint {
                    origin: id,
                    present: OVER_LAT,
                    missing: OVER_LNG,
                });
            }
            (None, Some(_)) => {
                return Err(MalformedInput::UnpairedWaypoint {
                    origin: id,
                    present: OVER_LNG,
                    missing: OVER_LAT,
                });
            }
            (None, None) => None,
        };

        Ok(OriginDescriptor {
            id,
            primary,
            waypoint,
        })
    }
}

impl JsonOrigin {
    fn from_record(origin: &str, record: &Map<String, Value>) -> Result<Self, MalformedInput> {
        let required = |field: &'static str| {
            number_field(origin, record, field)?.ok_or_else(|| MalformedInput::MissingField {
                origin: origin.to_string(),
                field,
            })
        };

        Ok(JsonOrigin {
            lat: required(LAT)?,
            lng: required(LNG)?,
            over_lat: number_field(origin, record, OVER_LAT)?,
            over_lng: number_field(origin, record, OVER_LNG)?,
        })
    }
}

/// `null` is treated the same as an absent field.
fn number_field(
    origin: &str,
    record: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<f64>, MalformedInput> {
    match record.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_f64()
            .map(Some)
            .ok_or_else(|| MalformedInput::NotANumber {
                origin: origin.to_string(),
                field,
            }),
    }
}

/// Raw `(id, record)` pairs in document order, duplicates included.
struct OriginEntries(Vec<(String, Value)>);

impl<'de> Deserialize<'de> for OriginEntries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = OriginEntries;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of origin id to origin record")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, Value>()? {
                    entries.push(entry);
                }
                Ok(OriginEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// Decodes a `driverPoints` document into origin descriptors.
///
/// Decoding is all-or-nothing: the first malformed origin fails the whole set.
/// Descriptors are returned in document order.
#[instrument(skip_all, level = "debug")]
pub fn decode_origin_set(document: &str) -> Result<Vec<OriginDescriptor>, MalformedInput> {
    let OriginEntries(entries) = serde_json::from_str(document).map_err(|err| {
        if err.is_data() {
            MalformedInput::NotAnObject
        } else {
            MalformedInput::Json(err)
        }
    })?;

    let mut seen = HashSet::with_capacity(entries.len());
    let mut origins = Vec::with_capacity(entries.len());

    for (id, record) in entries {
        if !seen.insert(id.clone()) {
            return Err(MalformedInput::DuplicateOrigin(id));
        }

        let Value::Object(record) = record else {
            return Err(MalformedInput::RecordNotAnObject(id));
        };

        let origin = JsonOrigin::from_record(&id, &record)?;
        origins.push(OriginDescriptor::from_json(id, origin)?);
    }

    Ok(origins)
}
