use courier_matrix::{
    route_query::RouteQuery,
    routing::{RouteCalculator, RouteOutcome},
};
use tracing::info;

use crate::{
    as_the_crow_flies::AsTheCrowFlies,
    graphhopper_api::{GraphHopperRouteClient, GraphHopperRouteClientParams},
    routing_provider::{ProviderConfigError, RoutingProvider},
};

/// The configured routing backend.
pub enum RouteClient {
    GraphHopper(GraphHopperRouteClient),
    AsTheCrowFlies(AsTheCrowFlies),
}

impl RouteClient {
    pub fn new(provider: RoutingProvider) -> Result<Self, ProviderConfigError> {
        let client = match provider {
            RoutingProvider::GraphHopper {
                url,
                api_key,
                timeout,
            } => {
                info!("Routing with GraphHopper at {}", url);
                RouteClient::GraphHopper(GraphHopperRouteClient::new(
                    GraphHopperRouteClientParams {
                        base_url: url,
                        api_key,
                        request_timeout: timeout,
                    },
                )?)
            }
            RoutingProvider::AsTheCrowFlies { speed_kmh } => {
                info!("Routing as the crow flies at {} km/h", speed_kmh);
                RouteClient::AsTheCrowFlies(AsTheCrowFlies::new(speed_kmh))
            }
        };

        Ok(client)
    }

    pub fn from_env() -> Result<Self, ProviderConfigError> {
        Self::new(RoutingProvider::from_env()?)
    }
}

impl RouteCalculator for RouteClient {
    async fn calc_route(&self, query: &RouteQuery) -> RouteOutcome {
        match self {
            RouteClient::GraphHopper(client) => client.calc_route(query).await,
            RouteClient::AsTheCrowFlies(crow) => crow.calc_route(query).await,
        }
    }
}
