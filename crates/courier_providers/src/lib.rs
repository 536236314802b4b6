pub mod as_the_crow_flies;
pub mod graphhopper_api;
pub mod parsers;
pub mod route_client;
pub mod routing_provider;
