pub mod app;
pub mod auth;
pub mod config;
pub mod database;
pub mod http;
pub mod listing;
pub mod posts;
pub mod schema;
pub mod store;
pub mod telemetry;
pub mod types;
pub mod util;

pub use app::App;
