use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::{error::InvalidPoint, geo_point::GeoPoint, origin::OriginDescriptor};

pub const DEFAULT_PROFILE: &str = "car";
pub const DEFAULT_LOCALE: &str = "en";

/// Parameters owned by the query itself; hints never override them.
const RESERVED_HINTS: [&str; 6] = [
    "points",
    "profile",
    "locale",
    "algorithm",
    "calc_points",
    "instructions",
];

/// Options chosen by the caller, shared by every origin of a request.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteOptions {
    pub profile: String,
    pub locale: String,
    /// `None` leaves the choice to the routing backend.
    pub algorithm: Option<String>,
    /// Extra backend parameters, forwarded untouched.
    pub hints: BTreeMap<String, Value>,
}

impl Default for RouteOptions {
    fn default() -> Self {
        RouteOptions {
            profile: DEFAULT_PROFILE.to_string(),
            locale: DEFAULT_LOCALE.to_string(),
            algorithm: None,
            hints: BTreeMap::new(),
        }
    }
}

/// Options as sent with a single route computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteQueryOptions {
    pub profile: String,
    pub locale: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
    /// Only aggregate distance and time are consumed, so path geometry is
    /// never requested.
    pub calc_points: bool,
    pub instructions: bool,
    #[serde(flatten)]
    pub hints: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteQuery {
    points: Vec<GeoPoint>,
    options: RouteQueryOptions,
}

impl RouteQuery {
    /// Builds the query for one origin: its primary point, then its waypoint
    /// if any, then the shared destination.
    pub fn for_origin(
        origin: &OriginDescriptor,
        destination: GeoPoint,
        options: &RouteOptions,
    ) -> RouteQuery {
        let mut points = Vec::with_capacity(3);
        points.push(origin.primary);
        if let Some(waypoint) = origin.waypoint {
            points.push(waypoint);
        }
        points.push(destination);

        RouteQuery {
            points,
            options: RouteQueryOptions {
                profile: options.profile.clone(),
                locale: options.locale.clone(),
                algorithm: options.algorithm.clone(),
                calc_points: false,
                instructions: false,
                hints: options
                    .hints
                    .iter()
                    .filter(|(key, _)| !RESERVED_HINTS.contains(&key.as_str()))
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect(),
            },
        }
    }

    /// Fails with the first point outside the WGS84 degree ranges.
    pub fn check_bounds(&self) -> Result<(), InvalidPoint> {
        self.points.iter().try_for_each(GeoPoint::check_range)
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn options(&self) -> &RouteQueryOptions {
        &self.options
    }
}
