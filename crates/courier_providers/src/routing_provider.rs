use std::time::Duration;

use thiserror::Error;

use crate::{
    as_the_crow_flies::DEFAULT_SPEED_KMH,
    graphhopper_api::{DEFAULT_GRAPHHOPPER_URL, DEFAULT_REQUEST_TIMEOUT, GraphHopperError},
    parsers::parse_duration,
};

pub const PROVIDER_ENV_VAR: &str = "COURIER_PROVIDER";
pub const GRAPHHOPPER_URL_ENV_VAR: &str = "GRAPHHOPPER_URL";
pub const GRAPHHOPPER_API_KEY_ENV_VAR: &str = "GRAPHHOPPER_API_KEY";
pub const GRAPHHOPPER_TIMEOUT_ENV_VAR: &str = "GRAPHHOPPER_TIMEOUT";
pub const CROW_FLIES_SPEED_ENV_VAR: &str = "CROW_FLIES_SPEED_KMH";

#[derive(Debug, Error)]
pub enum ProviderConfigError {
    #[error("unknown routing provider `{0}`, expected `graphhopper` or `crow`")]
    UnknownProvider(String),

    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },

    #[error("failed to create routing client: {0}")]
    Client(#[from] GraphHopperError),
}

/// Which routing backend answers route queries.
#[derive(Debug, Clone, PartialEq)]
pub enum RoutingProvider {
    /// A GraphHopper server (self-hosted or the hosted API).
    GraphHopper {
        url: String,
        api_key: Option<String>,
        timeout: Duration,
    },
    /// Straight lines at constant speed, no backend required.
    AsTheCrowFlies { speed_kmh: f64 },
}

impl Default for RoutingProvider {
    fn default() -> Self {
        RoutingProvider::GraphHopper {
            url: DEFAULT_GRAPHHOPPER_URL.to_string(),
            api_key: None,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl RoutingProvider {
    pub fn from_env() -> Result<Self, ProviderConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the provider settings through `lookup`; empty values count as
    /// unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ProviderConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let provider = get(PROVIDER_ENV_VAR).unwrap_or_else(|| "graphhopper".to_string());

        match provider.trim().to_ascii_lowercase().as_str() {
            "graphhopper" | "gh" => {
                let timeout = match get(GRAPHHOPPER_TIMEOUT_ENV_VAR) {
                    Some(value) => parse_duration(&value).map_err(|message| {
                        ProviderConfigError::InvalidValue {
                            key: GRAPHHOPPER_TIMEOUT_ENV_VAR,
                            message,
                        }
                    })?,
                    None => DEFAULT_REQUEST_TIMEOUT,
                };

                Ok(RoutingProvider::GraphHopper {
                    url: get(GRAPHHOPPER_URL_ENV_VAR)
                        .unwrap_or_else(|| DEFAULT_GRAPHHOPPER_URL.to_string()),
                    api_key: get(GRAPHHOPPER_API_KEY_ENV_VAR),
                    timeout,
                })
            }
            "crow" | "as_the_crow_flies" => {
                let speed_kmh = match get(CROW_FLIES_SPEED_ENV_VAR) {
                    Some(value) => value
                        .trim()
                        .parse::<f64>()
                        .ok()
                        .filter(|speed| speed.is_finite() && *speed > 0.0)
                        .ok_or_else(|| ProviderConfigError::InvalidValue {
                            key: CROW_FLIES_SPEED_ENV_VAR,
                            message: format!("`{value}` is not a positive speed"),
                        })?,
                    None => DEFAULT_SPEED_KMH,
                };

                Ok(RoutingProvider::AsTheCrowFlies { speed_kmh })
            }
            _ => Err(ProviderConfigError::UnknownProvider(provider)),
        }
    }
}
