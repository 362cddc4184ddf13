pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod models;
pub mod schema;
pub mod uploads;

use std::sync::Arc;

/// Application state shared across all handlers
pub struct AppState {
    pub pool: db::DbPool,
    pub config: config::Config,
}

pub type SharedState = Arc<AppState>;
