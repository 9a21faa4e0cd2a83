//! HTTP surface for pool comparisons

pub mod routes;
pub mod server;
pub mod state;

pub use server::{build_app, start_server, DEFAULT_HOST, DEFAULT_PORT};
pub use state::AppState;
