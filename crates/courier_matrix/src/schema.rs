use std::collections::BTreeMap;

use schemars::schema_for;

use crate::origin::JsonOrigin;

/// JSON schema of the `driverPoints` document: origin id to origin record.
pub fn generate_origin_set_schema() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&schema_for!(BTreeMap<String, JsonOrigin>))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_describes_waypoint_fields() {
        let schema = generate_origin_set_schema().unwrap();

        assert!(schema.contains("\"over-lat\""));
        assert!(schema.contains("\"over-lng\""));
        assert!(schema.contains("\"lat\""));
    }
}
