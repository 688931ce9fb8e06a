mod account_routes;
mod catalog_routes;
pub mod config;
mod favorites_routes;
mod http_layers;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use http_layers::*;
pub use server::run_server;
pub use state::ServerState;
