pub mod auth;
pub mod clock;
pub mod config;
pub mod handlers;
pub mod jsonld;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
pub mod submission;
pub mod utils;
pub mod validation;

pub use config::Config;
pub use state::AppState;
