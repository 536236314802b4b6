use std::collections::BTreeMap;

use serde::{Serialize, Serializer, ser::SerializeStruct};

use crate::routing::{BestRoute, RouteOutcome};

/// One origin's slot in the matrix response.
///
/// Consumers read `{"distance": 0, "time": 0}` as "no route could be
/// computed for this origin", so an unroutable entry is always written with
/// integer zeros.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatrixEntry {
    Routed { distance: f64, time: u64 },
    Unroutable,
}

impl MatrixEntry {
    pub fn distance(&self) -> f64 {
        match self {
            MatrixEntry::Routed { distance, .. } => *distance,
            MatrixEntry::Unroutable => 0.0,
        }
    }

    pub fn time(&self) -> u64 {
        match self {
            MatrixEntry::Routed { time, .. } => *time,
            MatrixEntry::Unroutable => 0,
        }
    }
}

impl From<BestRoute> for MatrixEntry {
    fn from(route: BestRoute) -> Self {
        MatrixEntry::Routed {
            distance: route.distance,
            time: route.time,
        }
    }
}

impl From<&RouteOutcome> for MatrixEntry {
    fn from(outcome: &RouteOutcome) -> Self {
        match outcome {
            Ok(route) => MatrixEntry::from(*route),
            Err(_) => MatrixEntry::Unroutable,
        }
    }
}

impl Serialize for MatrixEntry {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut entry = serializer.serialize_struct("MatrixEntry", 2)?;
        match self {
            MatrixEntry::Routed { distance, time } => {
                entry.serialize_field("distance", distance)?;
                entry.serialize_field("time", time)?;
            }
            MatrixEntry::Unroutable => {
                entry.serialize_field("distance", &0)?;
                entry.serialize_field("time", &0)?;
            }
        }
        entry.end()
    }
}

/// Distance and time to the destination, keyed by origin id.
///
/// Keys are sorted, so equal results encode to identical bytes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MatrixResult {
    entries: BTreeMap<String, MatrixEntry>,
}

impl MatrixResult {
    pub fn get(&self, origin_id: &str) -> Option<&MatrixEntry> {
        self.entries.get(origin_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn origin_ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn unroutable_count(&self) -> usize {
        self.entries
            .values()
            .filter(|entry| matches!(entry, MatrixEntry::Unroutable))
            .count()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl FromIterator<(String, MatrixEntry)> for MatrixResult {
    fn from_iter<I: IntoIterator<Item = (String, MatrixEntry)>>(iter: I) -> Self {
        MatrixResult {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Extend<(String, MatrixEntry)> for MatrixResult {
    fn extend<I: IntoIterator<Item = (String, MatrixEntry)>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}
